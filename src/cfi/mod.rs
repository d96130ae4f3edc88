//! CFI (Canonical Fragment Identifier) handling for EPUB locations
//!
//! Apple Books anchors annotations with EPUB CFI strings, e.g.
//! `epubcfi(/6/12[chapter_4]!/4/10/1:0)`. This module does two things with
//! them:
//!
//! - [`ordering_key`] reduces a CFI to a flat lexicographic sort key (the
//!   digit groups along the path, bracketed assertions excluded). This is a
//!   deliberately permissive reading of the grammar: the path is depth-first,
//!   so the concatenated indices order well enough without a full parse.
//!   Malformed input degrades to the `[0]` key rather than an error.
//! - [`extract_chapter_label`] turns the first bracketed assertion into a
//!   human-readable chapter name for grouping rendered output.
//!
//! Reference: <https://idpf.org/epub/linking/cfi/epub-cfi.html>

mod chapter;
mod parser;

pub use chapter::extract_chapter_label;
pub use parser::{ordering_key, FALLBACK_KEY};
