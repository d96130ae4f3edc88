//! Book metadata record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Descriptive metadata for one book.
///
/// `asset_id` is the identity and always present; everything else is
/// optional because neither provenance (library store, EPUB container) is
/// guaranteed to fill it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMetadata {
    /// Store asset identifier (unique per book)
    pub asset_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// All credited creators (the container often lists more than one)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub subjects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_index: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<String>,
    /// Cover image bytes (not serialized; written separately if wanted)
    #[serde(skip)]
    pub cover: Option<Vec<u8>>,
    /// On-disk location of the book container, when the store knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened: Option<DateTime<Utc>>,
}

impl BookMetadata {
    /// A record carrying only the identity field
    pub fn bare(asset_id: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            ..Default::default()
        }
    }
}
