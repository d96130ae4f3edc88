//! Dogear
//!
//! Exports highlights and notes from the Apple Books SQLite stores into one
//! markdown document per book, enriched with metadata read from the book's
//! EPUB container.
//!
//! # Modules
//!
//! - `cfi`: CFI ordering keys and chapter label classification
//! - `annotations`: fragment coalescing, ordering, reconciliation
//! - `library`: book metadata, container harvesting, provenance merge
//! - `db`: read-only access to the AEAnnotation and BKLibrary stores
//! - `render`: deterministic markdown rendering
//! - `export`: the per-book export loop

pub mod annotations;
pub mod cfi;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod library;
pub mod render;
