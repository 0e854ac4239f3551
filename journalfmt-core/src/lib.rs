// journalfmt Core Library
//
// Reformats a DOCX manuscript into a journal template: front-matter detection,
// style-driven body rewriting and package assembly.

pub mod types;
pub mod error;
pub mod preprocessors;
pub mod processor;
pub mod markers;
pub mod config;
pub mod rules;
pub mod classifier;
pub mod assembly;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{DocxError, DocxResult};
pub use preprocessors::{DocxPreprocessor, Preprocessor};
pub use preprocessors::docx::DOCX_MIME_TYPE;
pub use processor::{DocumentProcessor, FormatOutput, PipelineStages, StepProfiler};
pub use config::FormatterConfig;
pub use classifier::FrontMatterClassifier;
pub use assembly::{DocumentAssembler, StyleResolution};
