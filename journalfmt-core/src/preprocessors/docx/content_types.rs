//! `[Content_Types].xml`: extension defaults and per-part overrides.

use crate::error::DocxResult;

use super::xml::{XmlDocument, XmlElement, XmlNode};

#[derive(Debug, Clone)]
pub struct ContentTypes {
    document: XmlDocument,
}

impl ContentTypes {
    pub fn parse(bytes: &[u8]) -> DocxResult<Self> {
        Ok(Self {
            document: XmlDocument::parse(bytes)?,
        })
    }

    /// Content type of a part: its Override if present, else the Default for
    /// its extension.
    pub fn content_type_of(&self, part: &str) -> Option<String> {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        let overridden = self
            .document
            .root
            .elements()
            .filter(|element| element.is("Override"))
            .find(|element| element.attr("PartName") == Some(part_name.as_str()))
            .and_then(|element| element.attr("ContentType"));
        if let Some(content_type) = overridden {
            return Some(content_type.to_string());
        }

        let extension = extension_of(part)?;
        self.default_for(&extension).map(str::to_string)
    }

    pub fn default_for(&self, extension: &str) -> Option<&str> {
        self.document
            .root
            .elements()
            .filter(|element| element.is("Default"))
            .find(|element| {
                element
                    .attr("Extension")
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .and_then(|element| element.attr("ContentType"))
    }

    pub fn ensure_default(&mut self, extension: &str, content_type: &str) {
        if self.default_for(extension).is_some() {
            return;
        }
        let element = XmlElement::new("Default")
            .with_attr("Extension", extension.to_ascii_lowercase())
            .with_attr("ContentType", content_type);
        // Defaults conventionally precede overrides.
        let position = self
            .document
            .root
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(e) if e.is("Override")))
            .unwrap_or(self.document.root.children.len());
        self.document
            .root
            .children
            .insert(position, XmlNode::Element(element));
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.document.to_bytes()
    }
}

pub fn extension_of(part: &str) -> Option<String> {
    let file = part.rsplit('/').next()?;
    let (_, extension) = file.rsplit_once('.')?;
    Some(extension.to_ascii_lowercase())
}

/// Best-effort content type for an image extension when the source package
/// does not declare one.
pub fn image_content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
