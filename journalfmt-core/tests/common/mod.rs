//! In-memory DOCX fixtures for pipeline tests.

#![allow(dead_code)]

use journalfmt_core::preprocessors::docx::XmlElement;
use journalfmt_core::{DocxPreprocessor, Preprocessor, SourceDocument};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const CONTRACT_STYLES: [&str; 8] = [
    "Judul_Jurnal",
    "Author_Jurnal",
    "Afiliasi_Jurnal",
    "Abstrak_Jurnal",
    "Subjudul_Jurnal",
    "Sub_Judul",
    "Subsubjudul_Jurnal",
    "Isi_Jurnal",
];

const NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#,
);

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Builder for a minimal but well-formed WordprocessingML package.
#[derive(Default, Clone)]
pub struct DocxFixture {
    body: Vec<String>,
    root_attributes: Vec<String>,
    paragraph_styles: Vec<String>,
    table_styles: Vec<(String, String)>,
    images: Vec<(String, String, Vec<u8>)>,
    section_properties: bool,
}

impl DocxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template with every contract style, `Normal`, `Table Grid` and
    /// `Tabel_Jurnal`, plus placeholder content to be cleared.
    pub fn journal_template() -> Self {
        Self::new()
            .with_paragraph_styles(&CONTRACT_STYLES)
            .with_table_style("Tabel_Jurnal", "Tabel_Jurnal")
            .paragraph("JUDUL ARTIKEL DITULIS DI SINI")
            .table(&[&["placeholder"]])
            .paragraph("Isi template")
            .with_section_properties()
    }

    /// Template with only the built-in fallback styles.
    pub fn bare_template() -> Self {
        Self::new().paragraph("placeholder").with_section_properties()
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.body.push(format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            escape(text)
        ));
        self
    }

    pub fn paragraphs(self, texts: &[&str]) -> Self {
        texts.iter().fold(self, |fixture, text| fixture.paragraph(text))
    }

    pub fn blank(mut self) -> Self {
        self.body.push("<w:p/>".to_string());
        self
    }

    /// Paragraph with direct formatting the injector is expected to strip.
    pub fn highlighted(mut self, text: &str) -> Self {
        self.body.push(format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:shd w:val="clear" w:fill="FFFF00"/></w:pPr><w:r><w:rPr><w:b/><w:highlight w:val="yellow"/><w:color w:val="FF0000"/></w:rPr><w:t>{}</w:t></w:r></w:p>"#,
            escape(text)
        ));
        self
    }

    pub fn table(mut self, rows: &[&[&str]]) -> Self {
        let rows: String = rows
            .iter()
            .map(|cells| {
                let cells: String = cells
                    .iter()
                    .map(|cell| format!("<w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc>", escape(cell)))
                    .collect();
                format!("<w:tr>{cells}</w:tr>")
            })
            .collect();
        self.body.push(format!(
            r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/><w:tblLook w:val="04A0"/></w:tblPr>{rows}</w:tbl>"#
        ));
        self
    }

    /// Inline picture referencing `rel_id`, followed by a caption run in the
    /// same paragraph.
    pub fn image(mut self, rel_id: &str, media_name: &str, data: &[u8], caption: &str) -> Self {
        let drawing_id = self.images.len() + 1;
        self.body.push(format!(
            concat!(
                r#"<w:p><w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="914400" cy="457200"/><wp:docPr id="{id}" name="Picture {id}"/>"#,
                r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="0" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{rel}"/></pic:blipFill><pic:spPr/></pic:pic>"#,
                r#"</a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
                r#"<w:r><w:t xml:space="preserve">{caption}</w:t></w:r></w:p>"#,
            ),
            id = drawing_id,
            name = media_name,
            rel = rel_id,
            caption = escape(caption),
        ));
        self.images
            .push((rel_id.to_string(), media_name.to_string(), data.to_vec()));
        self
    }

    pub fn raw(mut self, xml: &str) -> Self {
        self.body.push(xml.to_string());
        self
    }

    pub fn with_root_attribute(mut self, attribute: &str) -> Self {
        self.root_attributes.push(attribute.to_string());
        self
    }

    pub fn with_paragraph_styles(mut self, names: &[&str]) -> Self {
        self.paragraph_styles
            .extend(names.iter().map(|name| name.to_string()));
        self
    }

    pub fn with_table_style(mut self, id: &str, name: &str) -> Self {
        self.table_styles.push((id.to_string(), name.to_string()));
        self
    }

    pub fn with_section_properties(mut self) -> Self {
        self.section_properties = true;
        self
    }

    fn document_xml(&self) -> String {
        let mut body = self.body.concat();
        if self.section_properties {
            body.push_str(r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#);
        }
        let extra = self
            .root_attributes
            .iter()
            .map(|attribute| format!(" {attribute}"))
            .collect::<String>();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {NAMESPACES}{extra}><w:body>{body}</w:body></w:document>"#
        )
    }

    fn styles_xml(&self) -> String {
        let mut styles = String::from(
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/></w:style>"#,
        );
        for name in &self.paragraph_styles {
            styles.push_str(&format!(
                r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="{name}"><w:name w:val="{name}"/></w:style>"#
            ));
        }
        for (id, name) in &self.table_styles {
            styles.push_str(&format!(
                r#"<w:style w:type="table" w:customStyle="1" w:styleId="{id}"><w:name w:val="{name}"/></w:style>"#
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{styles}</w:styles>"#
        )
    }

    fn document_rels_xml(&self) -> String {
        let mut rels = String::from(
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        );
        for (rel_id, media_name, _) in &self.images {
            rels.push_str(&format!(
                r#"<Relationship Id="{rel_id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{media_name}"/>"#
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
        )
    }

    fn content_types_xml(&self) -> String {
        let image_default = if self.images.is_empty() {
            ""
        } else {
            r#"<Default Extension="png" ContentType="image/png"/>"#
        };
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
                r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
                r#"<Default Extension="xml" ContentType="application/xml"/>{image_default}"#,
                r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
                r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
                r#"</Types>"#,
            ),
            image_default = image_default,
        )
    }

    pub fn build(&self) -> Vec<u8> {
        let package_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

        let mut parts: Vec<(String, Vec<u8>)> = vec![
            ("[Content_Types].xml".to_string(), self.content_types_xml().into_bytes()),
            ("_rels/.rels".to_string(), package_rels.as_bytes().to_vec()),
            ("word/document.xml".to_string(), self.document_xml().into_bytes()),
            ("word/_rels/document.xml.rels".to_string(), self.document_rels_xml().into_bytes()),
            ("word/styles.xml".to_string(), self.styles_xml().into_bytes()),
        ];
        for (_, media_name, data) in &self.images {
            parts.push((format!("word/media/{media_name}"), data.clone()));
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(&data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

pub fn open(bytes: &[u8]) -> SourceDocument {
    DocxPreprocessor::new().process(bytes).unwrap()
}

pub fn paragraph_style(element: &XmlElement) -> Option<String> {
    Some(element.child("pPr")?.child("pStyle")?.attr("w:val")?.to_string())
}

/// `(style, text)` of every body-level element except `w:sectPr`.
pub fn body_outline(document: &SourceDocument) -> Vec<(Option<String>, String)> {
    document
        .blocks
        .iter()
        .map(|block| block.element())
        .filter(|element| !element.is("sectPr"))
        .map(|element| {
            let style = if element.is("tbl") {
                element
                    .child("tblPr")
                    .and_then(|tbl_pr| tbl_pr.child("tblStyle"))
                    .and_then(|style| style.attr("w:val"))
                    .map(str::to_string)
            } else {
                paragraph_style(element)
            };
            (style, element.run_text().trim().to_string())
        })
        .collect()
}

/// The manuscript used across pipeline tests: full front matter, all four
/// chapter headings, a numbered sub-heading, a table and one picture.
pub fn sample_manuscript(image_bytes: &[u8]) -> DocxFixture {
    DocxFixture::new()
        .paragraphs(&[
            "Analisis Pajak Desa",
            "Budi Santoso, Siti Aminah",
            "Fakultas Ekonomi, Universitas Contoh",
            "email: budi@contoh.ac.id",
            "*Corresponding author: siti@contoh.ac.id",
            "Abstrak: Penelitian ini membahas pajak desa.",
            "Kata Kunci: pajak, desa , keuangan",
            "Abstract: This study discusses village tax.",
            "Keywords: tax, village",
        ])
        .blank()
        .paragraph("1. PENDAHULUAN")
        .highlighted("Pajak merupakan sumber penerimaan desa.")
        .image("rId5", "image1.png", image_bytes, "Gambar 1. Grafik penerimaan")
        .paragraphs(&["2. METODE PENELITIAN", "3. HASIL DAN PEMBAHASAN", "3.1 Uji Validitas"])
        .table(&[&["Variabel", "Nilai"], &["X1", "0.82"]])
        .paragraphs(&["4. KESIMPULAN", "Kesimpulan penelitian."])
        .with_section_properties()
}
