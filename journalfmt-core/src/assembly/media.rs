//! Relationship bookkeeping for content copied into the template package.
//!
//! Copied manuscript markup refers to relationships by id. Those ids mean
//! nothing in the template, so every reference is re-created through a
//! [`RelationshipSink`], which hands back the id to write in its place.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::preprocessors::docx::content_types::ContentTypes;
use crate::preprocessors::docx::package::{part_dir, rels_part_for, DocxPackage, CONTENT_TYPES_PART};
use crate::preprocessors::docx::relationships::{Relationship, Relationships, IMAGE_REL};
use crate::preprocessors::docx::{XmlDocument, XmlElement};
use crate::error::DocxResult;
use crate::types::ImageBlob;

pub trait RelationshipSink {
    /// Store the image in the target package and return its relationship id.
    fn embed_image(&mut self, image: &ImageBlob) -> String;

    /// Re-create an external relationship and return its id.
    fn link_external(&mut self, rel_type: &str, target: &str) -> String;

    /// Next unused `wp:docPr` id.
    fn next_drawing_id(&mut self) -> u32;
}

/// Sink that collects new media parts and relationships for the template's
/// main document part. Ids and media names are assigned in call order, so the
/// same walk always yields the same package.
#[derive(Debug)]
pub struct TargetMedia {
    document_part: String,
    relationships: Relationships,
    taken_parts: HashSet<String>,
    new_parts: Vec<(String, Vec<u8>)>,
    new_defaults: BTreeMap<String, String>,
    embedded: HashMap<String, String>,
    linked: HashMap<(String, String), String>,
    image_counter: usize,
    next_drawing_id: u32,
}

impl TargetMedia {
    pub fn for_package(package: &DocxPackage, document_part: &str, first_drawing_id: u32) -> DocxResult<Self> {
        let relationships = match package.part(&rels_part_for(document_part)) {
            Some(bytes) => Relationships::parse(bytes)?,
            None => Relationships::default(),
        };
        Ok(Self {
            document_part: document_part.to_string(),
            relationships,
            taken_parts: package.part_names().map(str::to_string).collect(),
            new_parts: Vec::new(),
            new_defaults: BTreeMap::new(),
            embedded: HashMap::new(),
            linked: HashMap::new(),
            image_counter: 0,
            next_drawing_id: first_drawing_id.max(1),
        })
    }

    pub fn embedded_count(&self) -> usize {
        self.new_parts.len()
    }

    pub fn has_changes(&self) -> bool {
        !self.embedded.is_empty() || !self.linked.is_empty()
    }

    fn next_media_name(&mut self, extension: &str) -> (String, String) {
        let dir = part_dir(&self.document_part);
        loop {
            self.image_counter += 1;
            let target = format!("media/formatted_image{}.{extension}", self.image_counter);
            let part = if dir.is_empty() {
                target.clone()
            } else {
                format!("{dir}/{target}")
            };
            if self.taken_parts.insert(part.clone()) {
                return (part, target);
            }
        }
    }

    /// Write new media, the updated relationship part and any missing
    /// content-type defaults into `package`.
    pub fn write_into(self, package: &mut DocxPackage) -> DocxResult<()> {
        if !self.has_changes() {
            return Ok(());
        }

        for (part, data) in self.new_parts {
            package.set_part(&part, data);
        }
        package.set_xml_part(&rels_part_for(&self.document_part), &self.relationships.to_document());

        if !self.new_defaults.is_empty() {
            let mut content_types = ContentTypes::parse(package.require_part(CONTENT_TYPES_PART)?)?;
            for (extension, content_type) in &self.new_defaults {
                content_types.ensure_default(extension, content_type);
            }
            package.set_part(CONTENT_TYPES_PART, content_types.to_bytes());
        }
        Ok(())
    }
}

impl RelationshipSink for TargetMedia {
    fn embed_image(&mut self, image: &ImageBlob) -> String {
        if let Some(id) = self.embedded.get(&image.part_name) {
            return id.clone();
        }

        let extension = image.extension();
        let (part, target) = self.next_media_name(&extension);
        self.new_parts.push((part, image.data.clone()));
        self.new_defaults
            .entry(extension)
            .or_insert_with(|| image.content_type.clone());

        let id = self.relationships.next_id();
        self.relationships.push(Relationship {
            id: id.clone(),
            rel_type: IMAGE_REL.to_string(),
            target,
            external: false,
        });
        self.embedded.insert(image.part_name.clone(), id.clone());
        id
    }

    fn link_external(&mut self, rel_type: &str, target: &str) -> String {
        let key = (rel_type.to_string(), target.to_string());
        if let Some(id) = self.linked.get(&key) {
            return id.clone();
        }

        let id = self.relationships.next_id();
        self.relationships.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            external: true,
        });
        self.linked.insert(key, id.clone());
        id
    }

    fn next_drawing_id(&mut self) -> u32 {
        let id = self.next_drawing_id;
        self.next_drawing_id += 1;
        id
    }
}

/// Highest `wp:docPr` id below `root`, 0 when there is none.
pub fn max_drawing_id(root: &XmlElement) -> u32 {
    root.descendants()
        .filter(|element| element.is("docPr"))
        .filter_map(|element| element.attr("id")?.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Highest drawing id across several documents.
pub fn max_drawing_id_of(documents: &[&XmlDocument]) -> u32 {
    documents
        .iter()
        .map(|document| max_drawing_id(&document.root))
        .max()
        .unwrap_or(0)
}
