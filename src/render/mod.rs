//! Markdown rendering
//!
//! Deterministic string building: the same metadata and annotation list
//! always produce byte-identical output, which is what makes the hash-based
//! change detection in the exporter meaningful. No I/O here.

use crate::annotations::Annotation;
use crate::cfi::extract_chapter_label;
use crate::library::BookMetadata;

/// Rendering options
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Emit a heading when the chapter label changes
    pub group_by_chapter: bool,
}

/// Render one book's merged metadata and reconciled annotations to markdown
pub fn render_book(
    metadata: &BookMetadata,
    annotations: &[Annotation],
    options: RenderOptions,
) -> String {
    let mut out = String::new();

    render_frontmatter(&mut out, metadata, annotations.len());

    let title = metadata.title.as_deref().unwrap_or(&metadata.asset_id);
    out.push_str(&format!("# {}\n", title));
    if let Some(author) = &metadata.author {
        out.push_str(&format!("\nby {}\n", author));
    }

    let mut current_chapter: Option<String> = None;
    for annotation in annotations {
        if options.group_by_chapter {
            let label = chapter_label(annotation);
            if label.is_some() && label != current_chapter {
                out.push_str(&format!("\n## {}\n", label.as_deref().unwrap_or_default()));
                current_chapter = label;
            }
        }

        out.push('\n');
        for line in annotation.selected_text.lines() {
            out.push_str(&format!("> {}\n", line));
        }
        if let Some(note) = &annotation.note {
            if !note.trim().is_empty() {
                out.push_str(&format!("\n**Note:** {}\n", note.trim()));
            }
        }
    }

    out
}

/// Chapter label for one annotation: classified location first, the store's
/// own chapter hint as a secondary fallback
fn chapter_label(annotation: &Annotation) -> Option<String> {
    annotation
        .location
        .as_deref()
        .and_then(extract_chapter_label)
        .or_else(|| {
            annotation
                .chapter_hint
                .as_ref()
                .filter(|h| !h.trim().is_empty())
                .map(|h| h.trim().to_string())
        })
}

fn render_frontmatter(out: &mut String, metadata: &BookMetadata, count: usize) {
    out.push_str("---\n");
    out.push_str(&format!("asset_id: {}\n", metadata.asset_id));
    push_field(out, "title", metadata.title.as_deref());
    push_field(out, "author", metadata.author.as_deref());
    push_field(out, "publisher", metadata.publisher.as_deref());
    push_field(out, "publication_date", metadata.publication_date.as_deref());
    push_field(out, "isbn", metadata.isbn.as_deref());
    push_field(out, "genre", metadata.genre.as_deref());
    push_field(out, "language", metadata.language.as_deref());
    if let Some(pages) = metadata.page_count {
        out.push_str(&format!("pages: {}\n", pages));
    }
    if !metadata.subjects.is_empty() {
        out.push_str(&format!("subjects: [{}]\n", metadata.subjects.join(", ")));
    }
    out.push_str(&format!("annotations: {}\n", count));
    out.push_str("---\n\n");
}

fn push_field(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            out.push_str(&format!("{}: {}\n", name, v.trim()));
        }
    }
}
