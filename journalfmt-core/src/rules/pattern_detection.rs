use crate::config::{MarkerConfig, SubHeadingConfig};
use anyhow::{Context, Result};
use regex::Regex;

use crate::markers::Language;

/// Pulls email addresses out of a line with the configured pattern.
pub struct EmailExtractor {
    pattern: Regex,
}

impl EmailExtractor {
    pub fn new(config: &MarkerConfig) -> Result<Self> {
        let pattern = Regex::new(&config.email_pattern)
            .with_context(|| format!("invalid email pattern {:?}", config.email_pattern))?;
        Ok(Self { pattern })
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|found| found.as_str().to_string())
            .collect()
    }
}

/// Extracts and normalizes keyword lists from "Kata Kunci" / "Keywords" lines.
pub struct KeywordRule {
    local_marker: Regex,
    english_marker: Regex,
}

impl KeywordRule {
    pub fn new(config: &MarkerConfig) -> Result<Self> {
        Ok(Self {
            local_marker: marker_regex(&config.keywords_local)?,
            english_marker: marker_regex(&config.keywords_en)?,
        })
    }

    /// Keyword list of a marker line: the text after the first colon, or the
    /// whole line minus the marker word, normalized to `"a; b; c"`.
    pub fn extract(&self, language: Language, text: &str) -> String {
        let raw = match text.split_once(':') {
            Some((_, after)) => after.to_string(),
            None => {
                let marker = match language {
                    Language::Local => &self.local_marker,
                    Language::English => &self.english_marker,
                };
                marker.replace_all(text, "").into_owned()
            }
        };
        normalize_keywords(&raw)
    }
}

fn marker_regex(marker: &str) -> Result<Regex> {
    Regex::new(&format!("(?i){}", regex::escape(marker)))
        .with_context(|| format!("invalid keyword marker {marker:?}"))
}

/// Commas become semicolons; tokens are trimmed, empties dropped, and the
/// rest joined with `"; "`.
pub fn normalize_keywords(value: &str) -> String {
    value
        .replace(',', ";")
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Numbered sub-chapter detection ("3.1 Uji Validitas").
pub struct SubHeadingRule {
    pattern: Regex,
    max_length: usize,
}

impl SubHeadingRule {
    pub fn new(config: &SubHeadingConfig) -> Result<Self> {
        let pattern = Regex::new(&config.pattern)
            .with_context(|| format!("invalid sub-heading pattern {:?}", config.pattern))?;
        Ok(Self {
            pattern,
            max_length: config.max_length,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        text.chars().count() < self.max_length && self.pattern.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keywords() {
        assert_eq!(normalize_keywords(" ai, ml , data"), "ai; ml; data");
        assert_eq!(normalize_keywords("a;; b ;,c"), "a; b; c");
        assert_eq!(normalize_keywords("  "), "");
    }

    #[test]
    fn test_keyword_extract_after_colon() {
        let rule = KeywordRule::new(&MarkerConfig::default()).unwrap();
        assert_eq!(rule.extract(Language::Local, "KATA KUNCI: ai, ml , data"), "ai; ml; data");
        assert_eq!(rule.extract(Language::English, "Keywords: x: y, z"), "x: y; z");
    }

    #[test]
    fn test_keyword_extract_strips_marker_case_insensitively() {
        let rule = KeywordRule::new(&MarkerConfig::default()).unwrap();
        assert_eq!(rule.extract(Language::Local, "Kata kunci  pajak, desa"), "pajak; desa");
        assert_eq!(rule.extract(Language::English, "KEYWORDS tax; village"), "tax; village");
    }

    #[test]
    fn test_email_extraction() {
        let emails = EmailExtractor::new(&MarkerConfig::default()).unwrap();
        assert_eq!(
            emails.extract("Email: a@x.com, b.c+d@mail.univ.ac.id"),
            vec!["a@x.com".to_string(), "b.c+d@mail.univ.ac.id".to_string()]
        );
        assert!(emails.extract("twitter @handle").is_empty());
    }

    #[test]
    fn test_sub_heading_rule() {
        let rule = SubHeadingRule::new(&SubHeadingConfig::default()).unwrap();
        assert!(rule.matches("3.1 Uji Validitas"));
        assert!(rule.matches("2.1.3 Sampel"));
        assert!(!rule.matches("3. HASIL"));
        assert!(!rule.matches(&format!("3.1 {}", "x".repeat(150))));
    }
}
