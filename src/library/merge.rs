//! Metadata reconciliation
//!
//! Field-by-field merge of a store-derived record with a container-derived
//! one. The container generally knows more, so its value wins whenever it is
//! actually filled in; the store value survives otherwise. The identity
//! field always comes from the base. Pure reducer: neither input is touched.

use super::types::BookMetadata;

/// Merge a base record with an optional enrichment record.
///
/// Precedence is enrichment > base per field, where "present" means
/// non-null and, for strings and lists, non-empty. With no enrichment the
/// base is returned as-is (cloned).
pub fn merge(base: &BookMetadata, enrichment: Option<&BookMetadata>) -> BookMetadata {
    let enrichment = match enrichment {
        Some(e) => e,
        None => return base.clone(),
    };

    BookMetadata {
        // Identity is never overwritten
        asset_id: base.asset_id.clone(),
        title: pick_str(&base.title, &enrichment.title),
        author: pick_str(&base.author, &enrichment.author),
        authors: pick_vec(&base.authors, &enrichment.authors),
        description: pick_str(&base.description, &enrichment.description),
        genre: pick_str(&base.genre, &enrichment.genre),
        language: pick_str(&base.language, &enrichment.language),
        isbn: pick_str(&base.isbn, &enrichment.isbn),
        publisher: pick_str(&base.publisher, &enrichment.publisher),
        publication_date: pick_str(&base.publication_date, &enrichment.publication_date),
        page_count: pick(&base.page_count, &enrichment.page_count),
        rating: pick(&base.rating, &enrichment.rating),
        subjects: pick_vec(&base.subjects, &enrichment.subjects),
        series: pick_str(&base.series, &enrichment.series),
        series_index: pick(&base.series_index, &enrichment.series_index),
        rights: pick_str(&base.rights, &enrichment.rights),
        cover: pick(&base.cover, &enrichment.cover),
        container_path: pick(&base.container_path, &enrichment.container_path),
        last_opened: pick(&base.last_opened, &enrichment.last_opened),
    }
}

fn pick<T: Clone>(base: &Option<T>, enrichment: &Option<T>) -> Option<T> {
    enrichment.clone().or_else(|| base.clone())
}

/// Strings that are empty after trimming count as absent
fn pick_str(base: &Option<String>, enrichment: &Option<String>) -> Option<String> {
    match enrichment {
        Some(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => base.clone(),
    }
}

fn pick_vec<T: Clone>(base: &[T], enrichment: &[T]) -> Vec<T> {
    if enrichment.is_empty() {
        base.to_vec()
    } else {
        enrichment.to_vec()
    }
}
