// Main rules module - delegates to semantic sub-modules
// - pattern_detection.rs: Regex-driven extraction (emails, keyword lists, sub-heading numbering)
// - heading_detection.rs: Style role of body paragraphs from heading markers

pub mod heading_detection;
pub mod pattern_detection;

pub use heading_detection::HeadingRule;
pub use pattern_detection::{normalize_keywords, EmailExtractor, KeywordRule, SubHeadingRule};
