//! Document Preprocessors
//!
//! This module provides the loading layer that turns a word-processing
//! container into a SourceDocument the formatter can work with.
//!
//! ## Architecture
//!
//! ```text
//! DOCX bytes (template or manuscript)
//!     ↓
//! [DocxPreprocessor]  ZIP parts → XML tree → BlockNodes, ImageRegistry, StyleCatalog
//!     ↓
//! SourceDocument
//!     ↓
//! [FrontMatterClassifier / DocumentAssembler]
//! ```

pub mod docx;
pub mod preprocessor;

pub use docx::DocxPreprocessor;
pub use preprocessor::Preprocessor;
