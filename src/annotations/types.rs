//! Annotation data model
//!
//! One record per highlighted passage or note, as reconstructed from the
//! annotation store. Descriptive fields (style, timestamps, ids) are carried
//! through untouched; only `selected_text`, `location`, and
//! `physical_location` participate in reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user highlight or note tied to a position in a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Store identifier (UUID)
    pub id: String,
    /// The book this annotation belongs to
    pub asset_id: String,
    /// The highlighted passage
    pub selected_text: String,
    /// User note attached to the highlight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// EPUB CFI location string, when the store recorded one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Absolute linear position within the book; authoritative for ordering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_location: Option<i64>,
    /// Highlight color index as stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<i64>,
    /// Underline rather than colored highlight
    pub is_underline: bool,
    /// Chapter name hint recorded by the reader app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Annotation {
    /// Whether this record carries any usable positional data.
    ///
    /// Unanchored records cannot be independently ordered and are merged
    /// into a neighbor by the coalescer, never emitted standalone.
    pub fn is_anchored(&self) -> bool {
        self.location.is_some() || self.physical_location.is_some()
    }
}
