//! Reconciliation pipeline
//!
//! Composes coalescing, empty-record filtering, and optional sorting into
//! the final per-book annotation list. Once raw rows are in hand every step
//! is total; only the upstream fetch can fail.

use super::coalesce::coalesce;
use super::order::compare;
use super::types::Annotation;

/// Produce the final ordered annotation list for a book.
///
/// `raw` must be in original fetch order. With `sort_enabled` false the
/// coalesced order is preserved as-is.
pub fn reconcile(raw: Vec<Annotation>, sort_enabled: bool) -> Vec<Annotation> {
    let mut records = coalesce(raw);

    // Should not occur post-coalesce, but guards malformed store rows
    records.retain(|a| !a.selected_text.trim().is_empty());

    if sort_enabled {
        // Vec::sort_by is stable; equal keys keep fetch order
        records.sort_by(compare);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::types::test_support::annotation;

    #[test]
    fn test_full_pipeline() {
        let raw = vec![
            annotation("frag", None, None),
            annotation("late", Some("epubcfi(/6/8!/2)"), Some(40)),
            annotation("early", Some("epubcfi(/6/2!/2)"), Some(10)),
        ];

        let result = reconcile(raw, true);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].selected_text, "early");
        assert_eq!(result[1].selected_text, "frag\nlate");
    }

    #[test]
    fn test_sort_disabled_preserves_coalesced_order() {
        let raw = vec![
            annotation("late", None, Some(40)),
            annotation("early", None, Some(10)),
        ];

        let result = reconcile(raw, false);
        assert_eq!(result[0].selected_text, "late");
        assert_eq!(result[1].selected_text, "early");
    }

    #[test]
    fn test_blank_records_discarded() {
        let raw = vec![
            annotation("  \n ", Some("epubcfi(/6/2)"), None),
            annotation("keep", Some("epubcfi(/6/4)"), None),
        ];

        let result = reconcile(raw, true);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].selected_text, "keep");
    }

    #[test]
    fn test_malformed_locations_never_abort() {
        let raw = vec![
            annotation("a", Some("not-a-cfi"), None),
            annotation("b", Some("epubcfi(/6/2"), None),
            annotation("c", Some("epubcfi(/6/2)"), None),
        ];

        // Both malformed records degrade to the fallback key and keep
        // their fetch order ahead of the real path
        let result = reconcile(raw, true);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].selected_text, "a");
        assert_eq!(result[1].selected_text, "b");
        assert_eq!(result[2].selected_text, "c");
    }

    #[test]
    fn test_empty_input() {
        assert!(reconcile(Vec::new(), true).is_empty());
    }
}
