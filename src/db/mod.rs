//! Store access
//!
//! Apple Books keeps annotations and library metadata in two separate SQLite
//! databases (AEAnnotation and BKLibrary). Both belong to the reader app, so
//! they are opened strictly read-only. Only the columns this exporter
//! consumes are queried; the rest of the schema is left alone.

mod annotations;
mod books;

pub use annotations::{fetch_annotated_asset_ids, fetch_raw_annotations};
pub use books::fetch_library;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

use crate::error::Result;

/// Open one of the Apple Books stores read-only.
///
/// `immutable` additionally tells SQLite the file cannot change underneath
/// us, which avoids locking against a running Books.app.
pub async fn open_store(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .immutable(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}
