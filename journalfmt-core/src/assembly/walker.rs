//! Manuscript body walk: turns source [`BlockNode`]s into new, template-styled
//! body elements.

use crate::markers::MarkerTable;
use crate::preprocessors::docx::body::is_drawing_container;
use crate::preprocessors::docx::xml::{local_part, prefix_part};
use crate::preprocessors::docx::{XmlElement, XmlNode};
use crate::rules::{HeadingRule, SubHeadingRule};
use crate::types::*;

use super::injector::{inject_style, inject_table_style};
use super::media::RelationshipSink;
use super::runs::{drawing_extent, picture_run, text_run, DEFAULT_EXTENT};
use super::ResolvedStyles;

/// Elements that point into manuscript parts the output never carries.
const SCRUBBED_ELEMENTS: [&str; 5] = [
    "headerReference",
    "footerReference",
    "commentRangeStart",
    "commentRangeEnd",
    "commentReference",
];

const PREVIEW_CHARS: usize = 60;

pub struct ContentTreeWalker<'a> {
    markers: &'a MarkerTable,
    headings: HeadingRule<'a>,
    styles: &'a ResolvedStyles,
    rel_prefixes: Vec<String>,
}

impl<'a> ContentTreeWalker<'a> {
    pub fn new(markers: &'a MarkerTable, sub_heading: SubHeadingRule, styles: &'a ResolvedStyles) -> Self {
        Self {
            markers,
            headings: HeadingRule::new(markers, sub_heading),
            styles,
            rel_prefixes: vec!["r".to_string()],
        }
    }

    /// Prefixes the manuscript binds to the office relationships namespace.
    pub fn with_relationship_prefixes(mut self, prefixes: Vec<String>) -> Self {
        if !prefixes.is_empty() {
            self.rel_prefixes = prefixes;
        }
        self
    }

    /// Walk `blocks` in order. Nothing is emitted before the first paragraph
    /// carrying an introduction marker; blank paragraphs are always dropped.
    pub fn walk(
        &self,
        blocks: &[BlockNode],
        images: &ImageRegistry,
        sink: &mut dyn RelationshipSink,
    ) -> WalkOutput {
        let mut output = WalkOutput::default();
        let mut started = false;

        for (index, block) in blocks.iter().enumerate() {
            if !started {
                match block {
                    BlockNode::Paragraph(paragraph)
                        if self.markers.is_introduction(&paragraph.text.to_uppercase()) =>
                    {
                        started = true;
                    }
                    _ => continue,
                }
            }

            match block {
                BlockNode::Paragraph(paragraph) if paragraph.is_blank() => {}
                BlockNode::Paragraph(paragraph) if paragraph.has_image => {
                    let element = self.rebuild_image_paragraph(paragraph, images, sink);
                    let text = element.run_text();
                    self.emit(&mut output, index, WalkPath::Image, Some(StyleRole::BodyText), &text, element);
                }
                BlockNode::Paragraph(paragraph) => {
                    let role = self.headings.role_for(&paragraph.text);
                    let mut element = self.copy(&paragraph.element, images, sink);
                    inject_style(&mut element, self.styles.id(role));
                    self.emit(&mut output, index, WalkPath::Paragraph, Some(role), &paragraph.text, element);
                }
                BlockNode::Table(table) => {
                    let mut element = self.copy(&table.element, images, sink);
                    inject_table_style(
                        &mut element,
                        self.styles.id(StyleRole::Table),
                        self.styles.id(StyleRole::BodyText),
                    );
                    self.emit(&mut output, index, WalkPath::Table, Some(StyleRole::Table), &table.summary(), element);
                }
                // the template's own section properties govern
                BlockNode::Other(element) if element.is("sectPr") => {}
                BlockNode::Other(element) => {
                    let element = self.copy(element, images, sink);
                    let text = element.run_text();
                    self.emit(&mut output, index, WalkPath::Other, None, &text, element);
                }
            }
        }

        output
    }

    fn emit(
        &self,
        output: &mut WalkOutput,
        source_index: usize,
        path: WalkPath,
        role: Option<StyleRole>,
        text: &str,
        element: XmlElement,
    ) {
        output.records.push(WalkRecord {
            source_index,
            path,
            role,
            style: role.map(|role| self.styles.id(role).to_string()),
            preview: preview(text),
        });
        output.blocks.push(element);
    }

    /// New paragraph holding, per source child in order, its pictures
    /// followed by its text as plain runs.
    fn rebuild_image_paragraph(
        &self,
        paragraph: &ParagraphNode,
        images: &ImageRegistry,
        sink: &mut dyn RelationshipSink,
    ) -> XmlElement {
        let mut rebuilt = XmlElement::new("w:p");

        for child in paragraph.element.elements() {
            let containers = std::iter::once(child)
                .chain(child.descendants())
                .filter(|element| is_drawing_container(element));
            for container in containers {
                let extent = drawing_extent(container).unwrap_or(DEFAULT_EXTENT);
                let embeds = container
                    .descendants()
                    .filter_map(|element| self.rel_attr(element, "embed"));
                for rel_id in embeds {
                    let Some(image) = images.image(rel_id) else {
                        continue;
                    };
                    let target_id = sink.embed_image(image);
                    let drawing_id = sink.next_drawing_id();
                    let name = local_part_of_path(&image.part_name);
                    rebuilt
                        .children
                        .push(XmlNode::Element(picture_run(&target_id, drawing_id, extent, name)));
                }
            }

            let texts = std::iter::once(child)
                .chain(child.descendants())
                .filter(|element| element.is("t") && prefix_part(&element.name) == Some("w"))
                .map(text_content)
                .filter(|text| !text.is_empty());
            for text in texts {
                rebuilt.children.push(XmlNode::Element(text_run(&text, false)));
            }
        }

        inject_style(&mut rebuilt, self.styles.id(StyleRole::BodyText));
        rebuilt
    }

    /// Deep copy with relationship references re-created in the target and
    /// drawing ids renumbered.
    fn copy(&self, source: &XmlElement, images: &ImageRegistry, sink: &mut dyn RelationshipSink) -> XmlElement {
        let mut copy = source.clone();
        copy.visit_mut(&mut |element: &mut XmlElement| {
            for name in SCRUBBED_ELEMENTS {
                element.remove_children(name);
            }
            if element.is("docPr") {
                element.set_attr("id", sink.next_drawing_id().to_string());
            }

            let references: Vec<(String, String)> = element
                .attributes
                .iter()
                .filter(|(key, _)| self.is_rel_attr(key))
                .cloned()
                .collect();
            for (key, rel_id) in references {
                if let Some(image) = images.image(&rel_id) {
                    element.set_attr(key, sink.embed_image(image));
                } else if let Some(external) = images.external(&rel_id) {
                    element.set_attr(key, sink.link_external(&external.rel_type, &external.target));
                } else {
                    element.remove_attr(&key);
                }
            }
        });
        copy
    }

    fn is_rel_attr(&self, key: &str) -> bool {
        prefix_part(key).is_some_and(|prefix| self.rel_prefixes.iter().any(|known| known == prefix))
    }

    fn rel_attr<'e>(&self, element: &'e XmlElement, local: &str) -> Option<&'e str> {
        element
            .attributes
            .iter()
            .find(|(key, _)| self.is_rel_attr(key) && local_part(key) == local)
            .map(|(_, value)| value.as_str())
    }
}

fn text_content(element: &XmlElement) -> String {
    element
        .children
        .iter()
        .filter_map(|node| match node {
            XmlNode::Text(value) | XmlNode::CData(value) => Some(value.as_str()),
            _ => None,
        })
        .collect()
}

fn local_part_of_path(part_name: &str) -> &str {
    part_name.rsplit('/').next().unwrap_or(part_name)
}

fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= PREVIEW_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    }
}
