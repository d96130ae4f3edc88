//! Annotation ordering
//!
//! Total-order comparator with two tiers: the store's absolute physical
//! location when both records carry one (the most reliable signal), the
//! CFI ordering key otherwise. Records whose location cannot be parsed get
//! the fallback key and tie; callers must use a stable sort so ties keep
//! their fetch order.

use std::cmp::Ordering;

use crate::cfi::ordering_key;

use super::types::Annotation;

/// Compare two annotations by reading position.
///
/// Physical location is preferred whenever both sides have one; otherwise
/// both locations are reduced to ordering keys and compared element-wise,
/// the shorter key sorting first on a full tie.
pub fn compare(a: &Annotation, b: &Annotation) -> Ordering {
    if let (Some(pa), Some(pb)) = (a.physical_location, b.physical_location) {
        return pa.cmp(&pb);
    }

    let key_a = ordering_key(a.location.as_deref().unwrap_or_default());
    let key_b = ordering_key(b.location.as_deref().unwrap_or_default());
    compare_keys(&key_a, &key_b)
}

/// Lexicographic comparison over key elements, shorter key first on a tie
fn compare_keys(a: &[u64], b: &[u64]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let cmp = x.cmp(y);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    a.len().cmp(&b.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::types::test_support::annotation;

    #[test]
    fn test_physical_location_is_authoritative() {
        // Location strings would sort the other way; physical wins
        let a = annotation("a", Some("epubcfi(/6/2)"), Some(45));
        let b = annotation("b", Some("epubcfi(/6/99)"), Some(12));

        assert_eq!(compare(&a, &b), Ordering::Greater);
        assert_eq!(compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_cfi_fallback_when_physical_missing() {
        let a = annotation("a", Some("epubcfi(/6/4!/4/2)"), None);
        let b = annotation("b", Some("epubcfi(/6/6!/4/2)"), Some(3));

        assert_eq!(compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_shorter_key_sorts_first_on_tie() {
        let a = annotation("a", Some("epubcfi(/6/4)"), None);
        let b = annotation("b", Some("epubcfi(/6/4/2)"), None);

        assert_eq!(compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_unparseable_locations_tie() {
        let a = annotation("a", Some("garbage"), None);
        let b = annotation("b", None, None);

        assert_eq!(compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_fallback_key_sorts_before_real_paths() {
        let a = annotation("a", Some("garbage"), None);
        let b = annotation("b", Some("epubcfi(/6/2)"), None);

        assert_eq!(compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_stable_sort_preserves_equal_physical() {
        let mut records = vec![
            annotation("first", Some("epubcfi(/6/8)"), Some(10)),
            annotation("second", Some("epubcfi(/6/2)"), Some(10)),
        ];
        records.sort_by(compare);

        assert_eq!(records[0].selected_text, "first");
        assert_eq!(records[1].selected_text, "second");
    }

    #[test]
    fn test_sorting_sorted_input_is_noop() {
        let sorted = vec![
            annotation("a", None, Some(1)),
            annotation("b", None, Some(5)),
            annotation("c", None, Some(9)),
        ];
        let mut again = sorted.clone();
        again.sort_by(compare);
        assert_eq!(again, sorted);
    }
}
