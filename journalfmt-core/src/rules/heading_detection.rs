use crate::markers::{HeadingMarker, MarkerTable};
use crate::types::StyleRole;

use super::pattern_detection::SubHeadingRule;

/// Chooses the style role of a plain body paragraph from its text.
///
/// Precedence: results markers, then methodology/conclusion/introduction
/// markers, then the numbered sub-heading pattern, else body text.
pub struct HeadingRule<'a> {
    markers: &'a MarkerTable,
    sub_heading: SubHeadingRule,
}

impl<'a> HeadingRule<'a> {
    pub fn new(markers: &'a MarkerTable, sub_heading: SubHeadingRule) -> Self {
        Self {
            markers,
            sub_heading,
        }
    }

    pub fn role_for(&self, text: &str) -> StyleRole {
        let text_upper = text.to_uppercase();

        if self.markers.is_heading(HeadingMarker::Results, &text_upper) {
            StyleRole::ResultsHeading
        } else if self.markers.is_heading(HeadingMarker::Methodology, &text_upper)
            || self.markers.is_heading(HeadingMarker::Conclusion, &text_upper)
            || self.markers.is_introduction(&text_upper)
        {
            StyleRole::MainHeading
        } else if self.sub_heading.matches(text) {
            StyleRole::SubHeading
        } else {
            StyleRole::BodyText
        }
    }
}
