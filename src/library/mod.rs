//! Book metadata
//!
//! Two provenances of metadata exist per book: the sparse record the library
//! store always has, and the richer record harvested from the book's EPUB
//! container when one is on disk. [`merge`] reconciles the two with
//! enrichment-wins precedence; [`container`] does the harvesting.

pub mod container;
mod merge;
mod opf;
mod types;

pub use merge::merge;
pub use opf::parse_opf;
pub use types::BookMetadata;
