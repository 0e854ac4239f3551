//! Template assembly: clear the template body, write front matter, append
//! the walked manuscript body and serialize the package.

use anyhow::Result;

use crate::config::FormatterConfig;
use crate::error::DocxError;
use crate::markers::MarkerTable;
use crate::preprocessors::docx::relationships::OFFICE_RELATIONSHIPS_NS;
use crate::preprocessors::docx::xml::local_part;
use crate::preprocessors::docx::{XmlElement, XmlNode};
use crate::rules::SubHeadingRule;
use crate::types::{SectionMap, SourceDocument, WalkRecord};

use super::front_matter::FrontMatterBuilder;
use super::media::{max_drawing_id_of, TargetMedia};
use super::walker::ContentTreeWalker;
use super::{ResolvedStyles, StyleResolution};

pub const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const WORDPROCESSING_DRAWING_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";

/// Declarations the generated markup relies on being bound at the root.
const REQUIRED_NAMESPACES: [(&str, &str); 3] = [
    ("xmlns:w", WORDPROCESSING_NS),
    ("xmlns:r", OFFICE_RELATIONSHIPS_NS),
    ("xmlns:wp", WORDPROCESSING_DRAWING_NS),
];

#[derive(Debug, Clone)]
pub struct AssemblyOutput {
    /// The finished DOCX package.
    pub bytes: Vec<u8>,
    pub front_matter_paragraphs: usize,
    pub records: Vec<WalkRecord>,
    pub styles: Vec<StyleResolution>,
    pub embedded_media: usize,
}

pub struct DocumentAssembler<'a> {
    config: &'a FormatterConfig,
    markers: MarkerTable,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(config: &'a FormatterConfig) -> Self {
        Self {
            config,
            markers: MarkerTable::from_config(&config.markers),
        }
    }

    pub fn assemble(
        &self,
        template: SourceDocument,
        manuscript: &SourceDocument,
        sections: &SectionMap,
    ) -> Result<AssemblyOutput> {
        let styles = ResolvedStyles::resolve(&template.styles, &self.config.styles);
        for resolution in styles.fallbacks() {
            eprintln!(
                "⚠️  Style '{}' not found in template, using '{}'",
                resolution.requested, resolution.id
            );
        }

        let SourceDocument {
            mut package,
            document_part,
            mut document,
            ..
        } = template;

        let front_matter = FrontMatterBuilder::new(&styles, &self.config.markers.labels).build(sections);

        let first_drawing_id = max_drawing_id_of(&[&document, &manuscript.document]) + 1;
        let mut media = TargetMedia::for_package(&package, &document_part, first_drawing_id)?;
        let walker = ContentTreeWalker::new(
            &self.markers,
            SubHeadingRule::new(&self.config.sub_heading)?,
            &styles,
        )
        .with_relationship_prefixes(relationship_prefixes(&manuscript.document.root));
        let walked = walker.walk(&manuscript.blocks, &manuscript.images, &mut media);
        let embedded_media = media.embedded_count();

        merge_namespaces(&mut document.root, &manuscript.document.root);

        let body = document
            .root
            .child_mut("body")
            .ok_or_else(|| DocxError::Malformed(format!("{document_part} has no w:body")))?;
        clear_body(body);
        let front_matter_paragraphs = front_matter.len();
        append_before_section_properties(body, front_matter.into_iter().chain(walked.blocks));

        media.write_into(&mut package)?;
        package.set_xml_part(&document_part, &document);

        Ok(AssemblyOutput {
            bytes: package.to_bytes()?,
            front_matter_paragraphs,
            records: walked.records,
            styles: styles.resolutions().to_vec(),
            embedded_media,
        })
    }
}

/// Drop every body-level paragraph and table.
pub fn clear_body(body: &mut XmlElement) {
    body.children.retain(|node| {
        !matches!(node, XmlNode::Element(element) if element.is("p") || element.is("tbl"))
    });
}

/// Insert `elements` before the body's trailing `w:sectPr`, or at the end
/// when there is none.
pub fn append_before_section_properties(body: &mut XmlElement, elements: impl IntoIterator<Item = XmlElement>) {
    let mut position = body
        .children
        .iter()
        .rposition(|node| matches!(node, XmlNode::Element(element) if element.is("sectPr")))
        .unwrap_or(body.children.len());
    for element in elements {
        body.children.insert(position, XmlNode::Element(element));
        position += 1;
    }
}

/// Prefixes `root` binds to the office relationships namespace.
pub fn relationship_prefixes(root: &XmlElement) -> Vec<String> {
    root.attributes
        .iter()
        .filter(|(key, value)| key.starts_with("xmlns:") && value == OFFICE_RELATIONSHIPS_NS)
        .map(|(key, _)| local_part(key).to_string())
        .collect()
}

/// Carry the manuscript root's namespace declarations and ignorable prefixes
/// over to the template root, then make sure the prefixes generated markup
/// uses are bound. A prefix the template already binds is never rebound.
pub fn merge_namespaces(target: &mut XmlElement, source: &XmlElement) {
    for (key, value) in &source.attributes {
        if !key.starts_with("xmlns:") {
            continue;
        }
        let existing = target.attr(key).map(str::to_string);
        match existing {
            None => target.set_attr(key.as_str(), value.as_str()),
            Some(existing) if existing != *value => eprintln!(
                "⚠️  Namespace prefix {} bound differently in template and manuscript, keeping template's",
                local_part(key)
            ),
            Some(_) => {}
        }
    }

    for (key, uri) in REQUIRED_NAMESPACES {
        if target.attr(key).is_none() {
            target.set_attr(key, uri);
        }
    }
    merge_ignorable(target, source);
}

fn ignorable_attr(element: &XmlElement) -> Option<(String, String)> {
    element
        .attributes
        .iter()
        .find(|(key, _)| local_part(key) == "Ignorable")
        .cloned()
}

fn merge_ignorable(target: &mut XmlElement, source: &XmlElement) {
    let Some((source_key, source_value)) = ignorable_attr(source) else {
        return;
    };
    let (key, mut tokens) = match ignorable_attr(target) {
        Some((key, value)) => (key, value.split_whitespace().map(str::to_string).collect::<Vec<_>>()),
        None => (source_key, Vec::new()),
    };

    for token in source_value.split_whitespace() {
        let declared = target.attr(&format!("xmlns:{token}")).is_some();
        if declared && !tokens.iter().any(|existing| existing == token) {
            tokens.push(token.to_string());
        }
    }
    if !tokens.is_empty() {
        target.set_attr(key, tokens.join(" "));
    }
}
