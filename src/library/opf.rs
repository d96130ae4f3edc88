//! OPF package document parsing
//!
//! Parses Dublin Core metadata from an EPUB's OPF file into a
//! container-derived [`BookMetadata`] record. Only the elements the merge
//! consumes are modeled; everything else in the package document is ignored.

use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::Result;

use super::types::BookMetadata;

/// Parse an OPF XML string into a container-derived metadata record.
///
/// Also reports the manifest href of the cover image, when one is declared,
/// so the caller can load its bytes from the container.
pub fn parse_opf(asset_id: &str, xml: &str) -> Result<(BookMetadata, Option<String>)> {
    let package: OpfPackage = from_str(xml)?;
    Ok(from_package(asset_id, package))
}

fn from_package(asset_id: &str, package: OpfPackage) -> (BookMetadata, Option<String>) {
    let metadata = package.metadata;
    let mut record = BookMetadata::bare(asset_id);

    record.title = metadata.title.map(|t| t.content);
    record.publisher = metadata.publisher.map(|p| p.content);
    record.language = metadata.language.map(|l| l.content);
    record.description = metadata.description.map(|d| d.content);
    record.rights = metadata.rights.map(|r| r.content);

    if let Some(creators) = metadata.creator {
        for creator in creators.into_iter() {
            if let Some(name) = creator.content {
                if record.author.is_none() {
                    record.author = Some(name.clone());
                }
                record.authors.push(name);
            }
        }
    }

    if let Some(dates) = metadata.date {
        for date in dates {
            if date.event.as_deref() == Some("publication") || record.publication_date.is_none() {
                record.publication_date = date.content;
            }
        }
    }

    if let Some(subjects) = metadata.subject {
        record.subjects = subjects.into_iter().map(|s| s.content).collect();
    }

    if let Some(identifiers) = metadata.identifier {
        for id in identifiers {
            let scheme = id.scheme.or(id.id).unwrap_or_default().to_lowercase();
            if scheme.contains("isbn") {
                record.isbn = id.content;
            }
        }
    }

    // Series information and the cover pointer live in <meta> elements
    let mut cover_id: Option<String> = None;
    if let Some(metas) = metadata.meta {
        for meta in metas {
            match meta.name.as_deref() {
                Some("calibre:series") => record.series = meta.content,
                Some("calibre:series_index") => {
                    record.series_index = meta.content.and_then(|s| s.parse().ok());
                }
                Some("cover") => cover_id = meta.content,
                _ => {}
            }
        }
    }

    let cover_href = package
        .manifest
        .map(|m| m.item)
        .unwrap_or_default()
        .into_iter()
        .find(|item| {
            item.properties.as_deref() == Some("cover-image")
                || (item.id.is_some() && item.id == cover_id)
                || item.id.as_deref() == Some("cover")
        })
        .and_then(|item| item.href);

    (record, cover_href)
}

// OPF XML structures for deserialization

#[derive(Debug, Deserialize)]
struct OpfPackage {
    metadata: OpfMetadata,
    manifest: Option<OpfManifest>,
}

#[derive(Debug, Deserialize)]
struct OpfMetadata {
    #[serde(rename = "title", default)]
    title: Option<DcElement>,

    #[serde(rename = "creator", default)]
    creator: Option<Vec<DcCreator>>,

    #[serde(rename = "publisher", default)]
    publisher: Option<DcElement>,

    #[serde(rename = "date", default)]
    date: Option<Vec<DcDate>>,

    #[serde(rename = "language", default)]
    language: Option<DcElement>,

    #[serde(rename = "description", default)]
    description: Option<DcElement>,

    #[serde(rename = "rights", default)]
    rights: Option<DcElement>,

    #[serde(rename = "subject", default)]
    subject: Option<Vec<DcElement>>,

    #[serde(rename = "identifier", default)]
    identifier: Option<Vec<DcIdentifier>>,

    #[serde(rename = "meta", default)]
    meta: Option<Vec<OpfMeta>>,
}

#[derive(Debug, Deserialize)]
struct DcElement {
    #[serde(rename = "$text", default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct DcCreator {
    #[serde(rename = "@role", default)]
    _role: Option<String>,

    #[serde(rename = "$text", default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DcDate {
    #[serde(rename = "@event", default)]
    event: Option<String>,

    #[serde(rename = "$text", default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DcIdentifier {
    #[serde(rename = "@id", default)]
    id: Option<String>,

    #[serde(rename = "@scheme", default)]
    scheme: Option<String>,

    #[serde(rename = "$text", default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpfMeta {
    #[serde(rename = "@name", default)]
    name: Option<String>,

    #[serde(rename = "@content", default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpfManifest {
    #[serde(rename = "item", default)]
    item: Vec<OpfManifestItem>,
}

#[derive(Debug, Deserialize)]
struct OpfManifestItem {
    #[serde(rename = "@id", default)]
    id: Option<String>,

    #[serde(rename = "@href", default)]
    href: Option<String>,

    #[serde(rename = "@properties", default)]
    properties: Option<String>,
}
