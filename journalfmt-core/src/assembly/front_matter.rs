use crate::config::LabelConfig;
use crate::preprocessors::docx::XmlElement;
use crate::types::{SectionField, SectionKey, SectionMap};

use super::injector::inject_style;
use super::runs::text_run;
use super::ResolvedStyles;

/// Builds the front-matter paragraphs that open the formatted body.
///
/// Abstract and keyword fields render their own label bold, either from a
/// structured field's label or from plain text that starts with that label.
/// Every other field is a single plain run.
pub struct FrontMatterBuilder<'a> {
    styles: &'a ResolvedStyles,
    labels: &'a LabelConfig,
}

impl<'a> FrontMatterBuilder<'a> {
    pub fn new(styles: &'a ResolvedStyles, labels: &'a LabelConfig) -> Self {
        Self { styles, labels }
    }

    /// One paragraph per non-empty field, in canonical key order.
    pub fn build(&self, sections: &SectionMap) -> Vec<XmlElement> {
        sections
            .iter()
            .filter(|(_, field)| !field.is_empty())
            .map(|(key, field)| self.paragraph(key, field))
            .collect()
    }

    fn paragraph(&self, key: SectionKey, field: &SectionField) -> XmlElement {
        let mut paragraph = XmlElement::new("w:p");
        for run in self.runs(key, field) {
            paragraph = paragraph.with_child(run);
        }
        inject_style(&mut paragraph, self.styles.id(key.style_role()));
        paragraph
    }

    fn runs(&self, key: SectionKey, field: &SectionField) -> Vec<XmlElement> {
        let body = field.body.trim();
        let bold_label = self.bold_label(key).filter(|label| !label.is_empty());

        if let (Some(label), Some(known)) = (field.label.as_deref(), bold_label) {
            if label == known {
                let mut runs = vec![text_run(label, true)];
                if !body.is_empty() {
                    runs.push(text_run(&format!(" {body}"), false));
                }
                return runs;
            }
        }

        let text = field.text();
        let text = text.trim();
        if field.label.is_none() {
            if let Some(label) = bold_label.filter(|label| text.starts_with(*label)) {
                let rest = &text[label.len()..];
                let mut runs = vec![text_run(label, true)];
                if !rest.is_empty() {
                    runs.push(text_run(rest, false));
                }
                return runs;
            }
        }

        vec![text_run(text, false)]
    }

    /// The label a field may render bold; only abstracts and keyword lists have one.
    fn bold_label(&self, key: SectionKey) -> Option<&'a str> {
        let labels: &'a LabelConfig = self.labels;
        let label = match key {
            SectionKey::AbstractLocal => &labels.abstract_local,
            SectionKey::AbstractEn => &labels.abstract_en,
            SectionKey::KeywordsLocal => &labels.keywords_local,
            SectionKey::KeywordsEn => &labels.keywords_en,
            _ => return None,
        };
        Some(label.as_str())
    }
}
