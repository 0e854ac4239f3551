//! Style injection: point a paragraph or table at a template style and drop
//! the inline overrides that would otherwise win over it.

use crate::preprocessors::docx::{StyleId, XmlElement, XmlNode};

/// `w:tblPr` children that follow `w:tblLayout` in schema order.
const AFTER_TBL_LAYOUT: [&str; 4] = ["tblCellMar", "tblLook", "tblCaption", "tblDescription"];

/// Set `w:pPr/w:pStyle` and strip paragraph shading plus run-level highlight,
/// shading and color on direct runs. Re-applying is a no-op.
pub fn inject_style(paragraph: &mut XmlElement, style: &StyleId) {
    let ppr = paragraph.ensure_child("w:pPr", 0);
    ppr.ensure_child("w:pStyle", 0).set_attr("w:val", style.as_str());
    ppr.remove_children("shd");

    for run in paragraph.elements_mut().filter(|child| child.is("r")) {
        if let Some(rpr) = run.child_mut("rPr") {
            rpr.remove_children("highlight");
            rpr.remove_children("shd");
            rpr.remove_children("color");
        }
    }
}

/// Table-level styling: `w:tblStyle`, autofit layout, and `body_style` on
/// every paragraph of every cell.
pub fn inject_table_style(table: &mut XmlElement, table_style: &StyleId, body_style: &StyleId) {
    let tbl_pr = table.ensure_child("w:tblPr", 0);
    tbl_pr
        .ensure_child("w:tblStyle", 0)
        .set_attr("w:val", table_style.as_str());

    let layout_position = tbl_pr
        .children
        .iter()
        .position(|node| {
            matches!(node, XmlNode::Element(e) if AFTER_TBL_LAYOUT.contains(&e.local_name()))
        })
        .unwrap_or(tbl_pr.children.len());
    tbl_pr
        .ensure_child("w:tblLayout", layout_position)
        .set_attr("w:type", "autofit");

    for row in table.elements_mut().filter(|child| child.is("tr")) {
        for cell in row.elements_mut().filter(|child| child.is("tc")) {
            for paragraph in cell.elements_mut().filter(|child| child.is("p")) {
                inject_style(paragraph, body_style);
            }
        }
    }
}
