//! EPUB container harvesting
//!
//! Apple Books keeps most purchased books as unpacked directories; sideloaded
//! books may still be zipped `.epub` files. Both layouts are read the same
//! way: locate the OPF through `META-INF/container.xml`, parse it, and load
//! the cover image bytes when the manifest names one.
//!
//! Every failure here is degraded-silently territory: the caller maps errors
//! to "no enrichment" and keeps going.

use std::fs;
use std::io::Read;
use std::path::Path;

use quick_xml::de::from_str;
use serde::Deserialize;
use zip::ZipArchive;

use crate::error::{AppError, Result};

use super::opf::parse_opf;
use super::types::BookMetadata;

const CONTAINER_XML: &str = "META-INF/container.xml";

/// Harvest container-derived metadata for one book.
///
/// `path` may be an unpacked container directory or a zipped `.epub` file.
pub fn harvest(asset_id: &str, path: &Path) -> Result<BookMetadata> {
    let reader: Box<dyn ContainerReader + '_> = if path.is_dir() {
        Box::new(DirContainer { root: path })
    } else {
        Box::new(ZipContainer::open(path)?)
    };

    let container_xml = reader.read_text(CONTAINER_XML)?;
    let opf_path = rootfile_path(&container_xml)?;
    let opf_xml = reader.read_text(&opf_path)?;

    let (mut record, cover_href) = parse_opf(asset_id, &opf_xml)?;

    if let Some(href) = cover_href {
        let cover_path = resolve_relative(&opf_path, &href);
        match reader.read_bytes(&cover_path) {
            Ok(bytes) => record.cover = Some(bytes),
            Err(e) => {
                tracing::debug!(asset_id, %cover_path, "cover not readable: {}", e);
            }
        }
    }

    Ok(record)
}

/// Uniform access to entries in either container layout
trait ContainerReader {
    fn read_bytes(&self, entry: &str) -> Result<Vec<u8>>;

    fn read_text(&self, entry: &str) -> Result<String> {
        let bytes = self.read_bytes(entry)?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Container(format!("{} is not UTF-8: {}", entry, e)))
    }
}

struct DirContainer<'a> {
    root: &'a Path,
}

impl ContainerReader for DirContainer<'_> {
    fn read_bytes(&self, entry: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.root.join(entry))?)
    }
}

struct ZipContainer {
    archive: std::cell::RefCell<ZipArchive<fs::File>>,
}

impl ZipContainer {
    fn open(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        Ok(Self {
            archive: std::cell::RefCell::new(ZipArchive::new(file)?),
        })
    }
}

impl ContainerReader for ZipContainer {
    fn read_bytes(&self, entry: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(entry)?;
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// Extract the OPF path from container.xml
fn rootfile_path(xml: &str) -> Result<String> {
    let container: ContainerDoc = from_str(xml)?;
    container
        .rootfiles
        .rootfile
        .into_iter()
        .next()
        .and_then(|r| r.full_path)
        .ok_or_else(|| AppError::Container("container.xml names no rootfile".to_string()))
}

/// Resolve `href` relative to the directory of `base` within the container
fn resolve_relative(base: &str, href: &str) -> String {
    match base.rfind('/') {
        Some(slash) => format!("{}/{}", &base[..slash], href),
        None => href.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ContainerDoc {
    rootfiles: Rootfiles,
}

#[derive(Debug, Deserialize)]
struct Rootfiles {
    #[serde(rename = "rootfile", default)]
    rootfile: Vec<Rootfile>,
}

#[derive(Debug, Deserialize)]
struct Rootfile {
    #[serde(rename = "@full-path", default)]
    full_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

    const OPF: &str = r#"<package xmlns="http://www.idpf.org/2007/opf">
        <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
            <dc:title>Packed Book</dc:title>
            <dc:creator>Packed Author</dc:creator>
            <meta name="cover" content="cover-img"/>
        </metadata>
        <manifest>
            <item id="cover-img" href="cover.png" media-type="image/png"/>
        </manifest>
    </package>"#;

    #[test]
    fn test_harvest_unpacked_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("META-INF")).unwrap();
        fs::create_dir_all(dir.path().join("OEBPS")).unwrap();
        fs::write(dir.path().join(CONTAINER_XML), CONTAINER).unwrap();
        fs::write(dir.path().join("OEBPS/content.opf"), OPF).unwrap();
        fs::write(dir.path().join("OEBPS/cover.png"), b"png-bytes").unwrap();

        let record = harvest("asset-1", dir.path()).unwrap();
        assert_eq!(record.title.as_deref(), Some("Packed Book"));
        assert_eq!(record.author.as_deref(), Some("Packed Author"));
        assert_eq!(record.cover.as_deref(), Some(b"png-bytes".as_slice()));
    }

    #[test]
    fn test_harvest_zipped_epub() {
        let dir = tempfile::tempdir().unwrap();
        let epub_path = dir.path().join("book.epub");
        let file = fs::File::create(&epub_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let opts = zip::write::SimpleFileOptions::default();

        zip.start_file(CONTAINER_XML, opts).unwrap();
        zip.write_all(CONTAINER.as_bytes()).unwrap();
        zip.start_file("OEBPS/content.opf", opts).unwrap();
        zip.write_all(OPF.as_bytes()).unwrap();
        zip.start_file("OEBPS/cover.png", opts).unwrap();
        zip.write_all(b"png-bytes").unwrap();
        zip.finish().unwrap();

        let record = harvest("asset-2", &epub_path).unwrap();
        assert_eq!(record.title.as_deref(), Some("Packed Book"));
        assert_eq!(record.cover.as_deref(), Some(b"png-bytes".as_slice()));
    }

    #[test]
    fn test_missing_cover_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("META-INF")).unwrap();
        fs::create_dir_all(dir.path().join("OEBPS")).unwrap();
        fs::write(dir.path().join(CONTAINER_XML), CONTAINER).unwrap();
        fs::write(dir.path().join("OEBPS/content.opf"), OPF).unwrap();
        // cover.png intentionally absent

        let record = harvest("asset-3", dir.path()).unwrap();
        assert_eq!(record.title.as_deref(), Some("Packed Book"));
        assert!(record.cover.is_none());
    }

    #[test]
    fn test_unreadable_container_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(harvest("asset-4", dir.path()).is_err());
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_relative("OEBPS/content.opf", "images/cover.jpg"),
            "OEBPS/images/cover.jpg"
        );
        assert_eq!(resolve_relative("content.opf", "cover.jpg"), "cover.jpg");
    }
}
