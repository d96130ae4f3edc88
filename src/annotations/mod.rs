//! Annotation reconciliation
//!
//! Raw rows from the annotation store are not directly usable: the store
//! sometimes splits one logical highlight into several rows without position
//! data, and rows mix two positioning signals (an absolute physical location
//! and an EPUB CFI string). This module repairs and orders them:
//!
//! 1. [`coalesce`] merges runs of unanchored fragments into the next
//!    anchored row (fetch order is significant input).
//! 2. Empty-text records are dropped.
//! 3. [`compare`] establishes a total order, physical location first,
//!    CFI ordering key as the fallback tier.
//!
//! [`reconcile`] composes the three. All steps are pure and total: a
//! malformed row degrades to a fallback key, never an error.

mod coalesce;
mod order;
mod reconcile;
mod types;

pub use coalesce::coalesce;
pub use order::compare;
pub use reconcile::reconcile;
pub use types::Annotation;
