//! Export orchestration
//!
//! Sequential per-book pipeline: fetch raw rows, reconcile, harvest and
//! merge metadata, render, write. One book is fully handled before the next
//! begins; a fatal error for one book is logged and counted, never aborts
//! the batch. Documents whose content hash has not changed are left alone.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::annotations::reconcile;
use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::library::{container, merge, BookMetadata};
use crate::render::{render_book, RenderOptions};

/// Outcome counters for one full run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Books with annotations found in the store
    pub books: usize,
    /// Documents written or rewritten
    pub exported: usize,
    /// Documents skipped because their content was unchanged
    pub unchanged: usize,
    /// Books skipped because of a per-book fatal error
    pub skipped: usize,
}

/// Result of exporting one book
enum BookOutcome {
    Written,
    Unchanged,
}

/// Run a full export pass over every annotated book
pub async fn run(config: &Config) -> Result<ExportSummary> {
    let annotation_pool = db::open_store(&config.annotation_db).await?;
    let library_pool = db::open_store(&config.library_db).await?;

    let asset_ids = db::fetch_annotated_asset_ids(&annotation_pool).await?;
    let library = db::fetch_library(&library_pool).await?;

    fs::create_dir_all(&config.output_dir)?;

    let mut summary = ExportSummary {
        books: asset_ids.len(),
        ..Default::default()
    };

    for asset_id in &asset_ids {
        let base = library
            .get(asset_id)
            .cloned()
            .unwrap_or_else(|| BookMetadata::bare(asset_id));

        match export_book(config, &annotation_pool, asset_id, &base).await {
            Ok(BookOutcome::Written) => summary.exported += 1,
            Ok(BookOutcome::Unchanged) => summary.unchanged += 1,
            Err(e) => {
                tracing::warn!(%asset_id, "skipping book: {}", e);
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(
        books = summary.books,
        exported = summary.exported,
        unchanged = summary.unchanged,
        skipped = summary.skipped,
        "export finished"
    );

    Ok(summary)
}

async fn export_book(
    config: &Config,
    annotation_pool: &sqlx::SqlitePool,
    asset_id: &str,
    base: &BookMetadata,
) -> Result<BookOutcome> {
    let raw = db::fetch_raw_annotations(annotation_pool, asset_id).await?;
    let annotations = reconcile(raw, config.sort_annotations);

    // Container metadata is best-effort: any failure degrades to no enrichment
    let enrichment = if config.enrich_metadata {
        base.container_path.as_deref().and_then(|path| {
            container::harvest(asset_id, path)
                .map_err(|e| {
                    tracing::debug!(asset_id, "container harvest failed: {}", e);
                    e
                })
                .ok()
        })
    } else {
        None
    };

    let metadata = merge(base, enrichment.as_ref());

    let document = render_book(
        &metadata,
        &annotations,
        RenderOptions {
            group_by_chapter: config.group_by_chapter,
        },
    );

    let path = document_path(&config.output_dir, &metadata);
    if let Ok(existing) = fs::read(&path) {
        if compute_hash(&existing) == compute_hash(document.as_bytes()) {
            tracing::debug!(asset_id, path = %path.display(), "unchanged");
            return Ok(BookOutcome::Unchanged);
        }
    }

    fs::write(&path, document)?;
    tracing::info!(
        asset_id,
        annotations = annotations.len(),
        path = %path.display(),
        "exported"
    );
    Ok(BookOutcome::Written)
}

/// Output file path for a book, derived from its merged title
fn document_path(output_dir: &Path, metadata: &BookMetadata) -> PathBuf {
    let title = metadata.title.as_deref().unwrap_or(&metadata.asset_id);
    output_dir.join(format!("{}.md", sanitize_filename(title)))
}

/// Replace filesystem-hostile characters and collapse whitespace
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        "untitled".to_string()
    } else {
        collapsed
    }
}

/// SHA-256 digest of document bytes, used for change detection
fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
