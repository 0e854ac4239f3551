//! Body ingestion: `w:body` children into [`BlockNode`]s, and the document's
//! relationships into an [`ImageRegistry`].

use crate::error::DocxResult;
use crate::types::{
    BlockNode, ImageBlob, ImageRegistry, ParagraphNode, TableCell, TableNode, TableRow,
};

use super::content_types::{extension_of, image_content_type_for, ContentTypes};
use super::package::{rels_part_for, resolve_target, DocxPackage, CONTENT_TYPES_PART};
use super::relationships::Relationships;
use super::xml::{prefix_part, XmlElement};

pub fn ingest_blocks(body: &XmlElement) -> Vec<BlockNode> {
    body.elements().map(ingest_block).collect()
}

pub fn ingest_block(element: &XmlElement) -> BlockNode {
    match element.local_name() {
        "p" => BlockNode::Paragraph(ingest_paragraph(element)),
        "tbl" => BlockNode::Table(ingest_table(element)),
        _ => BlockNode::Other(element.clone()),
    }
}

pub fn ingest_paragraph(element: &XmlElement) -> ParagraphNode {
    ParagraphNode {
        text: element.run_text().trim().to_string(),
        has_image: has_drawing(element),
        element: element.clone(),
    }
}

fn ingest_table(element: &XmlElement) -> TableNode {
    let rows = element
        .elements()
        .filter(|child| child.is("tr"))
        .map(|row| TableRow {
            cells: row
                .elements()
                .filter(|child| child.is("tc"))
                .map(|cell| TableCell {
                    paragraphs: cell
                        .elements()
                        .filter(|child| child.is("p"))
                        .map(|p| p.run_text().trim().to_string())
                        .collect(),
                })
                .collect(),
        })
        .collect();

    TableNode {
        rows,
        element: element.clone(),
    }
}

/// Inline or anchored DrawingML picture anywhere below `element`.
pub fn has_drawing(element: &XmlElement) -> bool {
    element.descendants().any(is_drawing_container)
}

/// `wp:inline` / `wp:anchor`, whatever prefix the drawing namespace is bound to.
pub fn is_drawing_container(element: &XmlElement) -> bool {
    (element.is("inline") || element.is("anchor")) && prefix_part(&element.name) != Some("w")
}

/// Collect every image payload and external target the main document part
/// references. Image relationships whose part is missing are skipped.
pub fn collect_images(package: &DocxPackage, document_part: &str) -> DocxResult<ImageRegistry> {
    let mut registry = ImageRegistry::default();

    let Some(rels_bytes) = package.part(&rels_part_for(document_part)) else {
        return Ok(registry);
    };
    let relationships = Relationships::parse(rels_bytes)?;
    let content_types = match package.part(CONTENT_TYPES_PART) {
        Some(bytes) => Some(ContentTypes::parse(bytes)?),
        None => None,
    };

    for relationship in relationships.iter() {
        if relationship.external {
            registry.insert_external(relationship.clone());
            continue;
        }
        if !relationship.is_image() {
            continue;
        }

        let part_name = resolve_target(document_part, &relationship.target);
        let Some(data) = package.part(&part_name) else {
            eprintln!(
                "⚠️  Image relationship {} points at missing part {}",
                relationship.id, part_name
            );
            continue;
        };

        let content_type = content_types
            .as_ref()
            .and_then(|types| types.content_type_of(&part_name))
            .unwrap_or_else(|| {
                let extension = extension_of(&part_name).unwrap_or_default();
                image_content_type_for(&extension).to_string()
            });

        registry.insert_image(ImageBlob {
            rel_id: relationship.id.clone(),
            part_name,
            content_type,
            data: data.to_vec(),
        });
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessors::docx::xml::XmlDocument;

    const BODY: &str = r#"<w:document xmlns:w="w" xmlns:wp="wp"><w:body>
<w:p><w:r><w:t>  1. PENDAHULUAN </w:t></w:r></w:p>
<w:p><w:r><w:drawing><wp:inline><wp:extent cx="10" cy="20"/></wp:inline></w:drawing></w:r></w:p>
<w:tbl><w:tblPr/><w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p><w:p/></w:tc><w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:bookmarkStart w:id="0"/>
<w:sectPr/>
</w:body></w:document>"#;

    fn blocks() -> Vec<BlockNode> {
        let doc = XmlDocument::parse(BODY.as_bytes()).unwrap();
        ingest_blocks(doc.root.child("body").unwrap())
    }

    #[test]
    fn test_blocks_are_classified_once() {
        let kinds: Vec<_> = blocks().iter().map(|b| b.kind_name()).collect();
        assert_eq!(kinds, vec!["paragraph", "paragraph", "table", "other", "other"]);
    }

    #[test]
    fn test_paragraph_text_is_trimmed_and_images_flagged() {
        let blocks = blocks();
        let BlockNode::Paragraph(first) = &blocks[0] else { panic!("expected paragraph") };
        assert_eq!(first.text, "1. PENDAHULUAN");
        assert!(!first.has_image);
        let BlockNode::Paragraph(second) = &blocks[1] else { panic!("expected paragraph") };
        assert!(second.has_image);
        assert!(!second.is_blank());
    }

    #[test]
    fn test_table_rows_cells_and_paragraphs() {
        let blocks = blocks();
        let BlockNode::Table(table) = &blocks[2] else { panic!("expected table") };
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells.len(), 2);
        assert_eq!(table.rows[0].cells[0].paragraphs, vec!["a".to_string(), String::new()]);
    }
}
