use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::preprocessors::docx::relationships::Relationship;
use crate::preprocessors::docx::{DocxPackage, StyleCatalog, StyleKind, XmlDocument, XmlElement};

// ===== FRONT MATTER =====
// The classifier reads body-level paragraph texts and fills a SectionMap.
// A reviewer may edit the map (YAML review file) before assembly consumes it.

/// Trimmed text of one body-level paragraph, with the index of the block it
/// came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphText {
    pub text: String,
    pub block_index: usize,
}

impl ParagraphText {
    pub fn new(text: impl Into<String>, block_index: usize) -> Self {
        Self {
            text: text.into(),
            block_index,
        }
    }
}

/// The nine front-matter fields, declared in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Title,
    Author,
    Affiliation,
    Email,
    CorrespondingEmail,
    AbstractLocal,
    KeywordsLocal,
    AbstractEn,
    KeywordsEn,
}

impl SectionKey {
    pub const ALL: [SectionKey; 9] = [
        SectionKey::Title,
        SectionKey::Author,
        SectionKey::Affiliation,
        SectionKey::Email,
        SectionKey::CorrespondingEmail,
        SectionKey::AbstractLocal,
        SectionKey::KeywordsLocal,
        SectionKey::AbstractEn,
        SectionKey::KeywordsEn,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name shown to the reviewer.
    pub fn display_name(self) -> &'static str {
        match self {
            SectionKey::Title => "Judul",
            SectionKey::Author => "Author",
            SectionKey::Affiliation => "Afiliasi",
            SectionKey::Email => "Email",
            SectionKey::CorrespondingEmail => "Email Korespondensi",
            SectionKey::AbstractLocal => "Abstrak",
            SectionKey::KeywordsLocal => "Kata Kunci",
            SectionKey::AbstractEn => "Abstract (EN)",
            SectionKey::KeywordsEn => "Keywords (EN)",
        }
    }

    pub fn style_role(self) -> StyleRole {
        match self {
            SectionKey::Title => StyleRole::Title,
            SectionKey::Author => StyleRole::Author,
            SectionKey::Affiliation | SectionKey::Email | SectionKey::CorrespondingEmail => {
                StyleRole::Affiliation
            }
            SectionKey::AbstractLocal
            | SectionKey::KeywordsLocal
            | SectionKey::AbstractEn
            | SectionKey::KeywordsEn => StyleRole::Abstract,
        }
    }
}

/// A front-matter value split into an optional label and its body.
///
/// The label ("Abstrak", "Kata Kunci:", "Email:") is kept apart from the body
/// so the assembler can render it bold without re-parsing the text. Review
/// files may give either a plain string or `{ label, body }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldRepr")]
pub struct SectionField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub body: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldRepr {
    // `email:` or `email: ~` in a review file clears the field
    Plain(Option<String>),
    Labeled {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        body: String,
    },
}

impl From<FieldRepr> for SectionField {
    fn from(repr: FieldRepr) -> Self {
        match repr {
            FieldRepr::Plain(text) => SectionField::plain(text.unwrap_or_default()),
            FieldRepr::Labeled { label, body } => SectionField { label, body },
        }
    }
}

impl SectionField {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            label: None,
            body: text.into(),
        }
    }

    pub fn labeled(label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            body: body.into(),
        }
    }

    /// Rendered text: `"<label> <body>"`, or whichever half is present.
    pub fn text(&self) -> String {
        match &self.label {
            Some(label) if self.body.is_empty() => label.clone(),
            Some(label) => format!("{label} {}", self.body),
            None => self.body.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// Ordered mapping over all nine [`SectionKey`]s. Every key is always present;
/// iteration and serialization follow the canonical key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    fields: [SectionField; 9],
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SectionKey) -> &SectionField {
        &self.fields[key.index()]
    }

    pub fn set(&mut self, key: SectionKey, field: SectionField) {
        self.fields[key.index()] = field;
    }

    pub fn text(&self, key: SectionKey) -> String {
        self.get(key).text()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &SectionField)> {
        SectionKey::ALL.into_iter().zip(self.fields.iter())
    }

    pub fn filled_count(&self) -> usize {
        self.fields.iter().filter(|field| !field.is_empty()).count()
    }

    pub fn is_all_empty(&self) -> bool {
        self.filled_count() == 0
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, field) in self.iter() {
            map.serialize_entry(&key, field)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Keys missing from a review file stay empty.
        let entries = HashMap::<SectionKey, SectionField>::deserialize(deserializer)?;
        let mut sections = SectionMap::new();
        for (key, field) in entries {
            sections.set(key, field);
        }
        Ok(sections)
    }
}

// ===== STYLES =====

/// Semantic role a node plays in the formatted document. Each role maps to a
/// template style name through `StyleConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleRole {
    Title,
    Author,
    Affiliation,
    Abstract,
    MainHeading,
    ResultsHeading,
    SubHeading,
    BodyText,
    Table,
}

impl StyleRole {
    pub const ALL: [StyleRole; 9] = [
        StyleRole::Title,
        StyleRole::Author,
        StyleRole::Affiliation,
        StyleRole::Abstract,
        StyleRole::MainHeading,
        StyleRole::ResultsHeading,
        StyleRole::SubHeading,
        StyleRole::BodyText,
        StyleRole::Table,
    ];

    pub fn kind(self) -> StyleKind {
        match self {
            StyleRole::Table => StyleKind::Table,
            _ => StyleKind::Paragraph,
        }
    }
}

// ===== CONTENT TREE =====

/// A body-level block, classified once when the manuscript is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNode {
    Paragraph(ParagraphNode),
    Table(TableNode),
    Other(XmlElement),
}

impl BlockNode {
    pub fn element(&self) -> &XmlElement {
        match self {
            BlockNode::Paragraph(paragraph) => &paragraph.element,
            BlockNode::Table(table) => &table.element,
            BlockNode::Other(element) => element,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            BlockNode::Paragraph(_) => "paragraph",
            BlockNode::Table(_) => "table",
            BlockNode::Other(_) => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphNode {
    /// Trimmed run text.
    pub text: String,
    /// Contains an inline or anchored drawing.
    pub has_image: bool,
    pub element: XmlElement,
}

impl ParagraphNode {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && !self.has_image
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNode {
    pub rows: Vec<TableRow>,
    pub element: XmlElement,
}

impl TableNode {
    /// Non-empty cell texts, cells joined by " | " and rows by " / ".
    pub fn summary(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| cell.paragraphs.join(" ").trim().to_string())
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .filter(|row| !row.is_empty())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    /// Text of each paragraph in the cell, in order.
    pub paragraphs: Vec<String>,
}

// ===== MEDIA =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub rel_id: String,
    pub part_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageBlob {
    /// Lower-case extension of the source part, `bin` when it has none.
    pub fn extension(&self) -> String {
        crate::preprocessors::docx::content_types::extension_of(&self.part_name)
            .unwrap_or_else(|| "bin".to_string())
    }
}

/// Binary payloads and external targets reachable from the manuscript body,
/// keyed by source relationship id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRegistry {
    images: BTreeMap<String, ImageBlob>,
    external: BTreeMap<String, Relationship>,
}

impl ImageRegistry {
    pub fn insert_image(&mut self, blob: ImageBlob) {
        self.images.insert(blob.rel_id.clone(), blob);
    }

    pub fn insert_external(&mut self, relationship: Relationship) {
        self.external.insert(relationship.id.clone(), relationship);
    }

    pub fn image(&self, rel_id: &str) -> Option<&ImageBlob> {
        self.images.get(rel_id)
    }

    pub fn external(&self, rel_id: &str) -> Option<&Relationship> {
        self.external.get(rel_id)
    }

}

// ===== LOADED DOCUMENTS =====

/// A DOCX package loaded for formatting. Manuscripts contribute `blocks` and
/// `images`; templates contribute `styles` and the document shell.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub package: DocxPackage,
    pub document_part: String,
    pub document: XmlDocument,
    pub blocks: Vec<BlockNode>,
    pub images: ImageRegistry,
    pub styles: StyleCatalog,
}

impl SourceDocument {
    /// Non-blank body-level paragraph texts in document order, the
    /// classifier's input.
    pub fn paragraphs(&self) -> Vec<ParagraphText> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(index, block)| match block {
                BlockNode::Paragraph(paragraph) if !paragraph.text.is_empty() => {
                    Some(ParagraphText::new(paragraph.text.clone(), index))
                }
                _ => None,
            })
            .collect()
    }
}

// ===== WALK REPORT =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkPath {
    Image,
    Table,
    Paragraph,
    Other,
}

/// One emitted node of a body walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkRecord {
    pub source_index: usize,
    pub path: WalkPath,
    pub role: Option<StyleRole>,
    pub style: Option<String>,
    pub preview: String,
}

/// Newly owned body nodes ready to append, plus what was done to produce them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    pub blocks: Vec<XmlElement>,
    pub records: Vec<WalkRecord>,
}

impl WalkOutput {
    pub fn count_path(&self, path: WalkPath) -> usize {
        self.records.iter().filter(|record| record.path == path).count()
    }
}
