//! Lexical marker registry shared by the front-matter classifier and the body
//! walker. All lookups take upper-cased text and are plain substring or
//! prefix tests.

use crate::config::MarkerConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Indonesian
    Local,
    English,
}

/// Numbered chapter headings the walker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingMarker {
    Introduction,
    Methodology,
    Results,
    Conclusion,
}

#[derive(Debug, Clone)]
pub struct MarkerTable {
    introduction: Vec<String>,
    methodology: Vec<String>,
    results: Vec<String>,
    conclusion: Vec<String>,
    abstract_local: String,
    abstract_en: String,
    keywords_local: String,
    keywords_en: String,
    abstract_en_terminators: Vec<String>,
    correspondence: Vec<String>,
}

fn upper_all(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.to_uppercase())
        .filter(|value| !value.is_empty())
        .collect()
}

fn contains_any(text_upper: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| text_upper.contains(marker.as_str()))
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self::from_config(&MarkerConfig::default())
    }
}

impl MarkerTable {
    pub fn from_config(config: &MarkerConfig) -> Self {
        Self {
            introduction: upper_all(&config.introduction),
            methodology: upper_all(&config.methodology),
            results: upper_all(&config.results),
            conclusion: upper_all(&config.conclusion),
            abstract_local: config.abstract_local.to_uppercase(),
            abstract_en: config.abstract_en.to_uppercase(),
            keywords_local: config.keywords_local.to_uppercase(),
            keywords_en: config.keywords_en.to_uppercase(),
            abstract_en_terminators: upper_all(&config.abstract_en_terminators),
            correspondence: upper_all(&config.correspondence),
        }
    }

    pub fn heading_markers(&self, heading: HeadingMarker) -> &[String] {
        match heading {
            HeadingMarker::Introduction => &self.introduction,
            HeadingMarker::Methodology => &self.methodology,
            HeadingMarker::Results => &self.results,
            HeadingMarker::Conclusion => &self.conclusion,
        }
    }

    pub fn is_heading(&self, heading: HeadingMarker, text_upper: &str) -> bool {
        contains_any(text_upper, self.heading_markers(heading))
    }

    pub fn is_introduction(&self, text_upper: &str) -> bool {
        self.is_heading(HeadingMarker::Introduction, text_upper)
    }

    /// Language whose abstract marker starts the text, Indonesian first.
    pub fn abstract_language(&self, text_upper: &str) -> Option<Language> {
        if !self.abstract_local.is_empty() && text_upper.starts_with(&self.abstract_local) {
            Some(Language::Local)
        } else if !self.abstract_en.is_empty() && text_upper.starts_with(&self.abstract_en) {
            Some(Language::English)
        } else {
            None
        }
    }

    pub fn abstract_marker(&self, language: Language) -> &str {
        match language {
            Language::Local => &self.abstract_local,
            Language::English => &self.abstract_en,
        }
    }

    /// Language whose keyword marker occurs anywhere in the text, Indonesian
    /// first.
    pub fn keywords_language(&self, text_upper: &str) -> Option<Language> {
        if !self.keywords_local.is_empty() && text_upper.contains(&self.keywords_local) {
            Some(Language::Local)
        } else if !self.keywords_en.is_empty() && text_upper.contains(&self.keywords_en) {
            Some(Language::English)
        } else {
            None
        }
    }

    pub fn keywords_marker(&self, language: Language) -> &str {
        match language {
            Language::Local => &self.keywords_local,
            Language::English => &self.keywords_en,
        }
    }

    /// Whether a paragraph ends an abstract that is absorbing lines. The
    /// Indonesian abstract runs until its keyword line; the English one also
    /// stops at the start of the body.
    pub fn ends_abstract(&self, language: Language, text_upper: &str) -> bool {
        let keywords = self.keywords_marker(language);
        if !keywords.is_empty() && text_upper.contains(keywords) {
            return true;
        }
        match language {
            Language::Local => false,
            Language::English => {
                self.is_introduction(text_upper)
                    || contains_any(text_upper, &self.abstract_en_terminators)
            }
        }
    }

    pub fn is_correspondence(&self, text_upper: &str) -> bool {
        contains_any(text_upper, &self.correspondence)
    }
}
