// Review files: the detected SectionMap written out for a human to correct
// before formatting. YAML by default, JSON when the path ends in .json.

use journalfmt_core::config::StyleConfig;
use journalfmt_core::{SectionKey, SectionMap};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("failed to access review file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML in review file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON in review file: {0}")]
    Json(#[from] serde_json::Error),
}

fn is_json(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn save_sections(path: &str, sections: &SectionMap) -> Result<(), ReviewError> {
    let content = if is_json(path) {
        serde_json::to_string_pretty(sections)?
    } else {
        serde_yaml::to_string(sections)?
    };
    fs::write(path, content).map_err(|source| ReviewError::Io {
        path: path.to_string(),
        source,
    })
}

pub fn load_sections(path: &str) -> Result<SectionMap, ReviewError> {
    let content = fs::read_to_string(path).map_err(|source| ReviewError::Io {
        path: path.to_string(),
        source,
    })?;
    if is_json(path) {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// One line per filled field: its display name and the template style it
/// will be written with.
pub fn describe_sections(sections: &SectionMap, styles: &StyleConfig) -> Vec<String> {
    sections
        .iter()
        .filter(|(_, field)| !field.is_empty())
        .map(|(key, _)| describe_key(key, styles))
        .collect()
}

fn describe_key(key: SectionKey, styles: &StyleConfig) -> String {
    format!(
        "Bagian: {} (Style: {})",
        key.display_name(),
        styles.name_for(key.style_role())
    )
}
