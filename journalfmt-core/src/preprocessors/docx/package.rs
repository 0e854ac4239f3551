//! DOCX container: the ZIP archive holding the XML parts and media.
//!
//! Parts are kept in archive order so that writing a package back out
//! reproduces the original entry sequence (with `[Content_Types].xml` first,
//! as Word writes it), followed by any parts added during assembly.

use crate::error::{DocxError, DocxResult};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::xml::XmlDocument;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";
pub const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";

pub const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxPackage {
    parts: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    pub fn from_bytes(bytes: &[u8]) -> DocxResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push((name, data));
        }

        let package = Self { parts };
        if !package.contains(CONTENT_TYPES_PART) {
            return Err(DocxError::MissingPart(CONTENT_TYPES_PART.to_string()));
        }
        Ok(package)
    }

    pub fn to_bytes(&self) -> DocxResult<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // Content types first, the rest in original order.
        let ordered = self
            .parts
            .iter()
            .filter(|(name, _)| name == CONTENT_TYPES_PART)
            .chain(self.parts.iter().filter(|(name, _)| name != CONTENT_TYPES_PART));

        for (name, data) in ordered {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(part, _)| part == name)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(part, _)| part == name)
            .map(|(_, data)| data.as_slice())
    }

    pub fn require_part(&self, name: &str) -> DocxResult<&[u8]> {
        self.part(name)
            .ok_or_else(|| DocxError::MissingPart(name.to_string()))
    }

    pub fn xml_part(&self, name: &str) -> DocxResult<XmlDocument> {
        XmlDocument::parse(self.require_part(name)?)
    }

    /// Insert or replace a part, keeping the position of an existing one.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|(part, _)| part == name) {
            Some((_, existing)) => *existing = data,
            None => self.parts.push((name.to_string(), data)),
        }
    }

    pub fn set_xml_part(&mut self, name: &str, document: &XmlDocument) {
        self.set_part(name, document.to_bytes());
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    /// Locate the main document part through the package relationships,
    /// falling back to the conventional `word/document.xml`.
    pub fn main_document_part(&self) -> DocxResult<String> {
        if let Some(rels) = self.part(PACKAGE_RELS_PART) {
            let rels = super::relationships::Relationships::parse(rels)?;
            if let Some(rel) = rels.iter().find(|rel| rel.rel_type == OFFICE_DOCUMENT_REL) {
                let target = rel.target.trim_start_matches('/').to_string();
                if self.contains(&target) {
                    return Ok(target);
                }
            };
        }

        if self.contains(DEFAULT_DOCUMENT_PART) {
            Ok(DEFAULT_DOCUMENT_PART.to_string())
        } else {
            Err(DocxError::MissingPart(DEFAULT_DOCUMENT_PART.to_string()))
        }
    }
}

/// `word/document.xml` -> `word/_rels/document.xml.rels`
pub fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Directory of a part, used to resolve relative relationship targets.
pub fn part_dir(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve a relationship target against the directory of its source part.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = part_dir(source_part)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
