use crate::config::{LabelConfig, MarkerConfig};
use crate::markers::{Language, MarkerTable};
use crate::rules::{EmailExtractor, KeywordRule};
use crate::types::*;
use anyhow::Result;

/// Segments the manuscript's leading paragraphs into front-matter fields.
///
/// Positional rules take the first two paragraphs as title and authors. Every
/// later paragraph goes through the first matching rule of: abstract marker,
/// keyword marker, email, affiliation. Affiliation lines are only collected
/// until the first abstract marker of either language.
pub struct FrontMatterClassifier {
    markers: MarkerTable,
    labels: LabelConfig,
    emails: EmailExtractor,
    keywords: KeywordRule,
}

impl FrontMatterClassifier {
    pub fn new(config: &MarkerConfig) -> Result<Self> {
        Ok(Self {
            markers: MarkerTable::from_config(config),
            labels: config.labels.clone(),
            emails: EmailExtractor::new(config)?,
            keywords: KeywordRule::new(config)?,
        })
    }

    pub fn classify(&self, paragraphs: &[ParagraphText]) -> SectionMap {
        let texts: Vec<&str> = paragraphs
            .iter()
            .map(|paragraph| paragraph.text.trim())
            .filter(|text| !text.is_empty())
            .collect();
        self.classify_texts(&texts)
    }

    pub fn classify_texts(&self, texts: &[&str]) -> SectionMap {
        let mut sections = SectionMap::new();
        let Some(title) = texts.first() else {
            return sections;
        };

        sections.set(SectionKey::Title, SectionField::plain(*title));
        if let Some(author) = texts.get(1) {
            sections.set(SectionKey::Author, SectionField::plain(*author));
        }

        let mut affiliations: Vec<&str> = Vec::new();
        let mut affiliation_gate_open = true;
        let mut abstract_seen = (false, false);

        for (index, text) in texts.iter().enumerate().skip(2) {
            let text_upper = text.to_uppercase();

            if let Some(language) = self.markers.abstract_language(&text_upper) {
                affiliation_gate_open = false;
                let seen = match language {
                    Language::Local => &mut abstract_seen.0,
                    Language::English => &mut abstract_seen.1,
                };
                if !*seen {
                    *seen = true;
                    let body = self.absorb_abstract(language, texts, index);
                    let (key, label) = match language {
                        Language::Local => (SectionKey::AbstractLocal, &self.labels.abstract_local),
                        Language::English => (SectionKey::AbstractEn, &self.labels.abstract_en),
                    };
                    sections.set(key, SectionField::labeled(label.as_str(), body));
                }
            } else if let Some(language) = self.markers.keywords_language(&text_upper) {
                let (key, label) = match language {
                    Language::Local => (SectionKey::KeywordsLocal, &self.labels.keywords_local),
                    Language::English => (SectionKey::KeywordsEn, &self.labels.keywords_en),
                };
                let cleaned = self.keywords.extract(language, text);
                sections.set(key, SectionField::labeled(label.as_str(), cleaned));
            } else if text.contains('@') {
                let found = self.emails.extract(text);
                let Some(first) = found.first() else {
                    continue;
                };
                if self.markers.is_correspondence(&text_upper) {
                    sections.set(
                        SectionKey::CorrespondingEmail,
                        SectionField::labeled(self.labels.corresponding_email.as_str(), first.as_str()),
                    );
                } else if sections.get(SectionKey::Email).is_empty() {
                    sections.set(
                        SectionKey::Email,
                        SectionField::labeled(self.labels.email.as_str(), found.join(", ")),
                    );
                }
            } else if affiliation_gate_open && text.chars().count() > 3 {
                affiliations.push(*text);
            }
        }

        if !affiliations.is_empty() {
            sections.set(SectionKey::Affiliation, SectionField::plain(affiliations.join("\n")));
        }
        sections
    }

    /// Abstract body starting at `start`: the rest of the marker line, then
    /// every following paragraph up to the language's terminator.
    fn absorb_abstract(&self, language: Language, texts: &[&str], start: usize) -> String {
        let marker_chars = self.markers.abstract_marker(language).chars().count();
        let remainder: String = texts[start].chars().skip(marker_chars).collect();
        let first_line = remainder.trim_matches([' ', ':', '-']).trim();

        let mut lines: Vec<&str> = Vec::new();
        if !first_line.is_empty() {
            lines.push(first_line);
        }
        for text in &texts[start + 1..] {
            if self.markers.ends_abstract(language, &text.to_uppercase()) {
                break;
            }
            lines.push(*text);
        }
        lines.join(" ")
    }
}
