//! Fragment coalescing
//!
//! The store occasionally splits one logical highlight across several rows
//! that carry no location at all, stored immediately before the row that
//! does. Scanning in fetch order, runs of such unanchored fragments are
//! folded into the next anchored row so their text is not lost.

use super::types::Annotation;

/// Merge runs of unanchored fragments into the next anchored record.
///
/// Input must be in original fetch order. Each combined record carries the
/// anchor's fields with the group's texts prepended (newline-joined, anchor
/// text last). Trailing fragments with no following anchor are emitted as one
/// combined record based on the first fragment. Total text content is always
/// preserved.
pub fn coalesce(raw: Vec<Annotation>) -> Vec<Annotation> {
    let mut out = Vec::with_capacity(raw.len());
    let mut pending: Vec<Annotation> = Vec::new();

    for record in raw {
        if !record.is_anchored() {
            pending.push(record);
            continue;
        }

        if pending.is_empty() {
            out.push(record);
        } else {
            let mut combined = record;
            combined.selected_text = joined_text(&pending, Some(&combined.selected_text));
            pending.clear();
            out.push(combined);
        }
    }

    // Trailing group: no anchor follows, keep the text anyway
    if let Some(first) = pending.first() {
        let mut combined = first.clone();
        combined.selected_text = joined_text(&pending, None);
        out.push(combined);
    }

    out
}

fn joined_text(group: &[Annotation], anchor_text: Option<&str>) -> String {
    let mut parts: Vec<&str> = group.iter().map(|a| a.selected_text.as_str()).collect();
    if let Some(text) = anchor_text {
        parts.push(text);
    }
    parts.join("\n")
}
