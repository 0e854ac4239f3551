//! Package relationship parts (`*.rels`).

use crate::error::DocxResult;

use super::xml::{XmlDocument, XmlElement, XmlNode};

pub const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
/// Namespace of `r:id` / `r:embed` style attributes inside document parts.
pub const OFFICE_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const IMAGE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const HYPERLINK_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn is_image(&self) -> bool {
        !self.external && (self.rel_type == IMAGE_REL || self.target.contains("image"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    pub fn parse(bytes: &[u8]) -> DocxResult<Self> {
        let document = XmlDocument::parse(bytes)?;
        let entries = document
            .root
            .elements()
            .filter(|element| element.is("Relationship"))
            .filter_map(|element| {
                Some(Relationship {
                    id: element.attr("Id")?.to_string(),
                    rel_type: element.attr("Type").unwrap_or_default().to_string(),
                    target: element.attr("Target").unwrap_or_default().to_string(),
                    external: element.attr("TargetMode") == Some("External"),
                })
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One past the highest numbered `rIdN`, so ids never reuse a gap.
    pub fn next_id(&self) -> String {
        let highest = self
            .entries
            .iter()
            .filter_map(|rel| rel.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", highest.saturating_add(1))
    }

    pub fn push(&mut self, relationship: Relationship) {
        self.entries.push(relationship);
    }

    pub fn to_document(&self) -> XmlDocument {
        let mut root = XmlElement::new("Relationships").with_attr("xmlns", RELATIONSHIPS_NS);
        for rel in &self.entries {
            let mut element = XmlElement::new("Relationship")
                .with_attr("Id", rel.id.as_str())
                .with_attr("Type", rel.rel_type.as_str())
                .with_attr("Target", rel.target.as_str());
            if rel.external {
                element.set_attr("TargetMode", "External");
            }
            root.children.push(XmlNode::Element(element));
        }
        XmlDocument { root }
    }
}
