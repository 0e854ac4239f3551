//! DOCX Preprocessor
//!
//! Loads WordprocessingML packages. The container, XML tree, relationship and
//! style plumbing live in the submodules; [`DocxPreprocessor`] ties them
//! together into a [`SourceDocument`].

pub mod body;
pub mod content_types;
pub mod package;
pub mod relationships;
pub mod styles;
pub mod xml;

use crate::error::DocxError;
use crate::preprocessors::preprocessor::Preprocessor;
use crate::types::*;
use anyhow::Result;
use std::path::Path;

pub use package::DocxPackage;
pub use styles::{StyleCatalog, StyleId, StyleKind};
pub use xml::{XmlDocument, XmlElement, XmlNode};

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, Default)]
pub struct DocxPreprocessor;

impl DocxPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor for DocxPreprocessor {
    fn load_package(&self, bytes: &[u8]) -> Result<DocxPackage> {
        Ok(DocxPackage::from_bytes(bytes)?)
    }

    fn parse_package(&self, package: DocxPackage) -> Result<SourceDocument> {
        let document_part = package.main_document_part()?;
        let document = package.xml_part(&document_part)?;
        let body_element = document
            .root
            .child("body")
            .ok_or_else(|| DocxError::Malformed(format!("{document_part} has no w:body")))?;

        let blocks = body::ingest_blocks(body_element);
        let images = body::collect_images(&package, &document_part)?;
        let styles = match package.part(styles::STYLES_PART) {
            Some(bytes) => StyleCatalog::parse(bytes)?,
            None => StyleCatalog::default(),
        };

        Ok(SourceDocument {
            package,
            document_part,
            document,
            blocks,
            images,
            styles,
        })
    }

    fn name(&self) -> &str {
        "DocxPreprocessor"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        if let Some(extension) = path.extension() {
            matches!(
                extension.to_str().unwrap_or("").to_lowercase().as_str(),
                "docx" | "docm" | "dotx"
            )
        } else {
            false
        }
    }
}
