// Preprocessor abstraction for document loading
//
// This module defines the boundary between container handling (DOCX bytes -> parts)
// and formatting (parts -> classified, re-styled content). Everything after the
// preprocessor works with SourceDocument and never touches the ZIP layer again.

use crate::preprocessors::docx::DocxPackage;
use crate::types::*;
use anyhow::{Context, Result};
use std::path::Path;

/// Preprocessor trait - converts document bytes to a SourceDocument
///
/// The loading happens in two clear steps:
/// 1. Document bytes -> package (container parts)
/// 2. Package -> SourceDocument (parsed body, block nodes, media, styles)
pub trait Preprocessor {
    /// Step 1: Open the container and collect its parts
    fn load_package(&self, bytes: &[u8]) -> Result<DocxPackage>;

    /// Step 2: Parse the main document part and everything it references
    fn parse_package(&self, package: DocxPackage) -> Result<SourceDocument>;

    /// Convenience method: Full document loading (combines both steps)
    fn process(&self, bytes: &[u8]) -> Result<SourceDocument> {
        let package = self.load_package(bytes)?;
        self.parse_package(package)
    }

    /// Convenience method: Load from file path
    fn process_file(&self, input: &Path) -> Result<SourceDocument> {
        let bytes = std::fs::read(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        self.process(&bytes)
            .with_context(|| format!("failed to load {}", input.display()))
    }

    /// Get preprocessor name for debugging/logging
    fn name(&self) -> &str;

    /// Check if preprocessor supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}
