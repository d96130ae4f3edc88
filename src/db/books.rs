//! Library store queries
//!
//! Store-derived book metadata: always present but sparse. The richer
//! container-derived record is harvested lazily per book elsewhere.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::library::BookMetadata;

/// One row of the ZBKLIBRARYASSET table, columns as consumed
#[derive(Debug, sqlx::FromRow)]
struct LibraryRow {
    asset_id: String,
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    genre: Option<String>,
    language: Option<String>,
    isbn: Option<String>,
    page_count: Option<i64>,
    rating: Option<f64>,
    path: Option<String>,
    last_opened: Option<f64>,
}

impl From<LibraryRow> for BookMetadata {
    fn from(row: LibraryRow) -> Self {
        BookMetadata {
            asset_id: row.asset_id,
            title: row.title,
            author: row.author,
            description: row.description,
            genre: row.genre,
            language: row.language,
            isbn: row.isbn,
            page_count: row.page_count,
            rating: row.rating,
            container_path: row.path.map(PathBuf::from),
            last_opened: core_data_timestamp(row.last_opened),
            ..Default::default()
        }
    }
}

/// Fetch store-derived metadata for every asset, keyed by asset id.
///
/// Fetched once per run; the caller looks books up as it walks the
/// annotated asset list.
pub async fn fetch_library(pool: &SqlitePool) -> Result<HashMap<String, BookMetadata>> {
    let rows: Vec<LibraryRow> = sqlx::query_as(
        r#"
        SELECT ZASSETID as asset_id,
               ZTITLE as title,
               ZAUTHOR as author,
               ZBOOKDESCRIPTION as description,
               ZGENRE as genre,
               ZLANGUAGE as language,
               ZISBN as isbn,
               ZPAGECOUNT as page_count,
               ZRATING as rating,
               ZPATH as path,
               ZLASTOPENDATE as last_opened
        FROM ZBKLIBRARYASSET
        WHERE ZASSETID IS NOT NULL
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.asset_id.clone(), BookMetadata::from(row)))
        .collect())
}

/// Convert a Core Data timestamp (seconds since 2001-01-01 UTC) to UTC time
pub(super) fn core_data_timestamp(seconds: Option<f64>) -> Option<DateTime<Utc>> {
    let seconds = seconds?;
    let epoch = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).single()?;
    epoch.checked_add_signed(chrono::Duration::milliseconds((seconds * 1000.0) as i64))
}
