//! Template style catalog (`word/styles.xml`).
//!
//! Styles are referenced from paragraphs and tables by `w:styleId`, while the
//! journal contract names them by their display name (`w:name`). Resolution
//! accepts either and falls back to a fixed default per kind instead of
//! failing, so a template missing a contract style still produces output.

use serde::Serialize;

use super::xml::XmlDocument;
use crate::error::DocxResult;

pub const STYLES_PART: &str = "word/styles.xml";

pub const PARAGRAPH_FALLBACK: &str = "Normal";
pub const TABLE_FALLBACK: &str = "Table Grid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleKind {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("character") => StyleKind::Character,
            Some("table") => StyleKind::Table,
            Some("numbering") => StyleKind::Numbering,
            // w:type defaults to paragraph when omitted
            _ => StyleKind::Paragraph,
        }
    }
}

/// Identifier written into `w:pStyle` / `w:tblStyle`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StyleId(pub String);

impl StyleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StyleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleEntry {
    pub id: String,
    pub name: String,
    pub kind: StyleKind,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StyleCatalog {
    entries: Vec<StyleEntry>,
}

impl StyleCatalog {
    pub fn from_entries(entries: Vec<StyleEntry>) -> Self {
        Self { entries }
    }

    pub fn parse(bytes: &[u8]) -> DocxResult<Self> {
        let document = XmlDocument::parse(bytes)?;
        let entries = document
            .root
            .elements()
            .filter(|element| element.is("style"))
            .filter_map(|element| {
                let id = element.attr("w:styleId")?.to_string();
                let name = element
                    .child("name")
                    .and_then(|name| name.attr("w:val"))
                    .unwrap_or(id.as_str())
                    .to_string();
                Some(StyleEntry {
                    id,
                    name,
                    kind: StyleKind::from_attr(element.attr("w:type")),
                })
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[StyleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look a style up by id or display name. Exact matches win over
    /// case-insensitive name matches.
    pub fn lookup(&self, name: &str, kind: StyleKind) -> Option<&StyleEntry> {
        let of_kind = || self.entries.iter().filter(move |entry| entry.kind == kind);
        of_kind()
            .find(|entry| entry.id == name || entry.name == name)
            .or_else(|| of_kind().find(|entry| entry.name.eq_ignore_ascii_case(name)))
    }

    pub fn contains(&self, name: &str, kind: StyleKind) -> bool {
        self.lookup(name, kind).is_some()
    }

    /// Resolve a style name to the id to reference, falling back to `Normal`
    /// for paragraphs and `Table Grid` for tables.
    pub fn resolve_style(&self, name: &str, kind: StyleKind) -> StyleId {
        if let Some(entry) = self.lookup(name, kind) {
            return StyleId(entry.id.clone());
        }
        let fallback = match kind {
            StyleKind::Table => TABLE_FALLBACK,
            _ => PARAGRAPH_FALLBACK,
        };
        match self.lookup(fallback, kind) {
            Some(entry) => StyleId(entry.id.clone()),
            // Word's built-in ids, valid even when the catalog omits them
            None => StyleId(fallback.replace(' ', "")),
        }
    }
}
