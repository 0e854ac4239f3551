//! Builders for freshly created WordprocessingML runs.

use crate::preprocessors::docx::XmlElement;

pub const DRAWINGML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const PICTURE_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// Fallback picture size when the source drawing has no extent: 6in x 4in.
pub const DEFAULT_EXTENT: (u64, u64) = (5_486_400, 3_657_600);

/// A run carrying `text`, with `\n` as line breaks and `\t` as tabs. No font
/// overrides are written so the paragraph style governs.
pub fn text_run(text: &str, bold: bool) -> XmlElement {
    let mut run = XmlElement::new("w:r");
    if bold {
        run = run.with_child(XmlElement::new("w:rPr").with_child(XmlElement::new("w:b")));
    }

    let mut pending = String::new();
    for c in text.chars() {
        match c {
            '\n' | '\t' => {
                flush_text(&mut run, &mut pending);
                let name = if c == '\n' { "w:br" } else { "w:tab" };
                run = run.with_child(XmlElement::new(name));
            }
            '\r' => {}
            _ => pending.push(c),
        }
    }
    flush_text(&mut run, &mut pending);
    run
}

fn flush_text(run: &mut XmlElement, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let t = XmlElement::new("w:t")
        .with_attr("xml:space", "preserve")
        .with_text(std::mem::take(pending));
    run.children.push(crate::preprocessors::docx::XmlNode::Element(t));
}

/// A run holding one inline picture that references `rel_id`.
pub fn picture_run(rel_id: &str, drawing_id: u32, extent: (u64, u64), name: &str) -> XmlElement {
    let (cx, cy) = (extent.0.to_string(), extent.1.to_string());

    let pic = XmlElement::new("pic:pic")
        .with_attr("xmlns:pic", PICTURE_NS)
        .with_child(
            XmlElement::new("pic:nvPicPr")
                .with_child(
                    XmlElement::new("pic:cNvPr")
                        .with_attr("id", "0")
                        .with_attr("name", name),
                )
                .with_child(XmlElement::new("pic:cNvPicPr")),
        )
        .with_child(
            XmlElement::new("pic:blipFill")
                .with_child(XmlElement::new("a:blip").with_attr("r:embed", rel_id))
                .with_child(XmlElement::new("a:stretch").with_child(XmlElement::new("a:fillRect"))),
        )
        .with_child(
            XmlElement::new("pic:spPr")
                .with_child(
                    XmlElement::new("a:xfrm")
                        .with_child(XmlElement::new("a:off").with_attr("x", "0").with_attr("y", "0"))
                        .with_child(
                            XmlElement::new("a:ext")
                                .with_attr("cx", cx.as_str())
                                .with_attr("cy", cy.as_str()),
                        ),
                )
                .with_child(
                    XmlElement::new("a:prstGeom")
                        .with_attr("prst", "rect")
                        .with_child(XmlElement::new("a:avLst")),
                ),
        );

    let inline = XmlElement::new("wp:inline")
        .with_attr("distT", "0")
        .with_attr("distB", "0")
        .with_attr("distL", "0")
        .with_attr("distR", "0")
        .with_child(
            XmlElement::new("wp:extent")
                .with_attr("cx", cx.as_str())
                .with_attr("cy", cy.as_str()),
        )
        .with_child(
            XmlElement::new("wp:docPr")
                .with_attr("id", drawing_id.to_string())
                .with_attr("name", format!("Picture {drawing_id}")),
        )
        .with_child(
            XmlElement::new("wp:cNvGraphicFramePr").with_child(
                XmlElement::new("a:graphicFrameLocks")
                    .with_attr("xmlns:a", DRAWINGML_NS)
                    .with_attr("noChangeAspect", "1"),
            ),
        )
        .with_child(
            XmlElement::new("a:graphic")
                .with_attr("xmlns:a", DRAWINGML_NS)
                .with_child(
                    XmlElement::new("a:graphicData")
                        .with_attr("uri", PICTURE_NS)
                        .with_child(pic),
                ),
        );

    XmlElement::new("w:r").with_child(XmlElement::new("w:drawing").with_child(inline))
}

/// `(cx, cy)` of a `wp:inline` / `wp:anchor` container.
pub fn drawing_extent(container: &XmlElement) -> Option<(u64, u64)> {
    let extent = container.child("extent")?;
    let cx = extent.attr("cx")?.parse().ok()?;
    let cy = extent.attr("cy")?.parse().ok()?;
    Some((cx, cy))
}
