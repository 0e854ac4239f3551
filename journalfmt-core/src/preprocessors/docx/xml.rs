//! Owned XML element tree for WordprocessingML parts.
//!
//! Parts are small enough to hold in memory, and both the walker and the
//! assembler need random access (deep copies, insert-before-sectPr), so each
//! part is parsed once into an owned tree with quick-xml and written back with
//! a deterministic serializer. Qualified names are kept verbatim (`w:p`,
//! `wp:inline`); matching is done on the local part so documents that bind
//! the WordprocessingML namespace to an unusual prefix still classify.

use crate::error::{DocxError, DocxResult};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
    Instruction(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Name without its namespace prefix (`w:p` -> `p`).
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let position = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(position).1)
    }

    /// Direct element children, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.is(local))
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|element| element.is(local))
    }

    /// Return the child with the given qualified name, inserting an empty one
    /// at `index` (clamped) when absent.
    pub fn ensure_child(&mut self, name: &str, index: usize) -> &mut XmlElement {
        let local = local_part(name);
        let position = match self.children.iter().position(
            |node| matches!(node, XmlNode::Element(element) if element.is(local)),
        ) {
            Some(position) => position,
            None => {
                let position = index.min(self.children.len());
                self.children
                    .insert(position, XmlNode::Element(XmlElement::new(name)));
                position
            }
        };

        match &mut self.children[position] {
            XmlNode::Element(element) => element,
            _ => unreachable!("position always points at an element node"),
        }
    }

    /// Remove every direct element child with the given local name.
    pub fn remove_children(&mut self, local: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, XmlNode::Element(element) if element.is(local)));
        before - self.children.len()
    }

    /// Pre-order walk over all descendant elements (excluding `self`).
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&XmlElement> = self.elements().collect();
        stack.reverse();
        Descendants { stack }
    }

    pub fn has_descendant(&self, local: &str) -> bool {
        self.descendants().any(|element| element.is(local))
    }

    /// Visit `self` and every descendant element mutably, pre-order.
    pub fn visit_mut(&mut self, visitor: &mut dyn FnMut(&mut XmlElement)) {
        visitor(self);
        for child in self.elements_mut() {
            child.visit_mut(visitor);
        }
    }

    /// Concatenated text of the paragraph-like subtree: `w:t` contents, with
    /// run-level `w:tab` as a tab and `w:br`/`w:cr` as line breaks. Property
    /// blocks are skipped so tab-stop definitions don't leak into the text.
    pub fn run_text(&self) -> String {
        let mut text = String::new();
        collect_run_text(self, &mut text);
        text
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.write_into(out),
                XmlNode::Text(text) => out.push_str(&escape(text)),
                XmlNode::CData(data) => {
                    out.push_str("<![CDATA[");
                    out.push_str(data);
                    out.push_str("]]>");
                }
                XmlNode::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
                XmlNode::Instruction(instruction) => {
                    out.push_str("<?");
                    out.push_str(instruction);
                    out.push_str("?>");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(element.elements());
        self.stack[start..].reverse();
        Some(element)
    }
}

impl XmlDocument {
    pub fn parse(bytes: &[u8]) -> DocxResult<Self> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, XmlNode::Element(element))?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| DocxError::Malformed("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, XmlNode::Element(element))?;
                }
                Event::Text(text) => {
                    // Whitespace outside the root element carries no content.
                    if !stack.is_empty() {
                        let value = text.unescape()?.into_owned();
                        attach(&mut stack, &mut root, XmlNode::Text(value))?;
                    }
                }
                Event::CData(data) => {
                    let value = String::from_utf8(data.into_inner().into_owned())?;
                    attach(&mut stack, &mut root, XmlNode::CData(value))?;
                }
                Event::Comment(comment) => {
                    if !stack.is_empty() {
                        let value = String::from_utf8_lossy(&comment).into_owned();
                        attach(&mut stack, &mut root, XmlNode::Comment(value))?;
                    }
                }
                Event::PI(instruction) => {
                    if !stack.is_empty() {
                        let value = String::from_utf8_lossy(&instruction).into_owned();
                        attach(&mut stack, &mut root, XmlNode::Instruction(value))?;
                    }
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(DocxError::Malformed(format!(
                "unclosed element <{}>",
                stack[stack.len() - 1].name
            )));
        }

        root.map(|root| Self { root })
            .ok_or_else(|| DocxError::Malformed("document has no root element".to_string()))
    }

    pub fn to_xml_string(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str(XML_DECLARATION);
        out.push_str("\r\n");
        self.root.write_into(&mut out);
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml_string().into_bytes()
    }
}

fn element_from_start(start: &BytesStart<'_>) -> DocxResult<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    node: XmlNode,
) -> DocxResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }

    match node {
        XmlNode::Element(element) if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        XmlNode::Element(element) => Err(DocxError::Malformed(format!(
            "second root element <{}>",
            element.name
        ))),
        _ => Ok(()),
    }
}

fn collect_run_text(element: &XmlElement, out: &mut String) {
    for child in element.elements() {
        match child.local_name() {
            "pPr" | "rPr" | "tblPr" | "trPr" | "tcPr" | "sectPr" => {}
            "t" => {
                for node in &child.children {
                    if let XmlNode::Text(value) | XmlNode::CData(value) = node {
                        out.push_str(value);
                    }
                }
            }
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            _ => collect_run_text(child, out),
        }
    }
}

pub fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}

/// Namespace prefix of a qualified name (`r:embed` -> `Some("r")`).
pub fn prefix_part(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}
