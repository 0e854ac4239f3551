//! Pipeline boundary tests: manuscript + template in, formatted package out.
//!
//! Fixtures are built in memory (see `common`), pushed through
//! `DocumentProcessor`, and the output package is re-opened with the same
//! preprocessor to assert on what Word would see:
//!
//! - Boundary 1 (detection): SectionMap fields from the manuscript
//! - Boundary 2 (assembly): body order, style ids, media and relationships

mod common;

use common::*;
use journalfmt_core::preprocessors::docx::body::collect_images;
use journalfmt_core::preprocessors::docx::content_types::ContentTypes;
use journalfmt_core::preprocessors::docx::package::CONTENT_TYPES_PART;
use journalfmt_core::*;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];

fn format(template: &DocxFixture, manuscript: &DocxFixture) -> FormatOutput {
    DocumentProcessor::new()
        .format_bytes(&template.build(), &manuscript.build(), None, &FormatterConfig::default())
        .unwrap()
}

fn styled(style: &str, text: &str) -> (Option<String>, String) {
    (Some(style.to_string()), text.to_string())
}

// ============================================================================
// Boundary 1: front-matter detection
// ============================================================================

mod detection_boundary {
    use super::*;

    #[test]
    fn sample_manuscript_fills_all_nine_fields() {
        let manuscript = open(&sample_manuscript(PNG).build());
        let sections = DocumentProcessor::new()
            .detect_sections_from_document(&manuscript, &FormatterConfig::default())
            .unwrap();

        assert_eq!(sections.filled_count(), 9);
        assert_eq!(sections.text(SectionKey::Title), "Analisis Pajak Desa");
        assert_eq!(sections.text(SectionKey::Author), "Budi Santoso, Siti Aminah");
        assert_eq!(sections.text(SectionKey::Affiliation), "Fakultas Ekonomi, Universitas Contoh");
        assert_eq!(sections.text(SectionKey::Email), "Email: budi@contoh.ac.id");
        assert_eq!(
            sections.text(SectionKey::CorrespondingEmail),
            "Email Penulis Korespondensi: siti@contoh.ac.id"
        );
        assert_eq!(
            sections.text(SectionKey::AbstractLocal),
            "Abstrak Penelitian ini membahas pajak desa."
        );
        assert_eq!(sections.text(SectionKey::KeywordsLocal), "Kata Kunci: pajak; desa; keuangan");
        assert_eq!(
            sections.text(SectionKey::AbstractEn),
            "Abstract This study discusses village tax."
        );
        assert_eq!(sections.text(SectionKey::KeywordsEn), "Keywords: tax; village");
    }

    #[test]
    fn empty_manuscript_gives_nine_empty_keys() {
        let manuscript = open(&DocxFixture::new().with_section_properties().build());
        let sections = DocumentProcessor::new()
            .detect_sections_from_document(&manuscript, &FormatterConfig::default())
            .unwrap();
        assert_eq!(sections.iter().count(), 9);
        assert!(sections.is_all_empty());
    }

    #[test]
    fn paragraph_texts_skip_blank_paragraphs() {
        let manuscript = open(&DocxFixture::new().paragraph("A").blank().paragraph("B").build());
        let texts: Vec<_> = manuscript.paragraphs().into_iter().map(|p| p.text).collect();
        assert_eq!(texts, vec!["A", "B"]);
    }
}

// ============================================================================
// Boundary 2: assembled package
// ============================================================================

mod assembly_boundary {
    use super::*;

    #[test]
    fn front_matter_then_body_with_contract_styles() {
        let output = format(&DocxFixture::journal_template(), &sample_manuscript(PNG));
        let document = open(&output.bytes);

        let outline = body_outline(&document);
        assert_eq!(
            outline,
            vec![
                styled("Judul_Jurnal", "Analisis Pajak Desa"),
                styled("Author_Jurnal", "Budi Santoso, Siti Aminah"),
                styled("Afiliasi_Jurnal", "Fakultas Ekonomi, Universitas Contoh"),
                styled("Afiliasi_Jurnal", "Email: budi@contoh.ac.id"),
                styled("Afiliasi_Jurnal", "Email Penulis Korespondensi: siti@contoh.ac.id"),
                styled("Abstrak_Jurnal", "Abstrak Penelitian ini membahas pajak desa."),
                styled("Abstrak_Jurnal", "Kata Kunci: pajak; desa; keuangan"),
                styled("Abstrak_Jurnal", "Abstract This study discusses village tax."),
                styled("Abstrak_Jurnal", "Keywords: tax; village"),
                styled("Subjudul_Jurnal", "1. PENDAHULUAN"),
                styled("Isi_Jurnal", "Pajak merupakan sumber penerimaan desa."),
                styled("Isi_Jurnal", "Gambar 1. Grafik penerimaan"),
                styled("Subjudul_Jurnal", "2. METODE PENELITIAN"),
                styled("Sub_Judul", "3. HASIL DAN PEMBAHASAN"),
                styled("Subsubjudul_Jurnal", "3.1 Uji Validitas"),
                styled("Tabel_Jurnal", "VariabelNilaiX10.82"),
                styled("Subjudul_Jurnal", "4. KESIMPULAN"),
                styled("Isi_Jurnal", "Kesimpulan penelitian."),
            ]
        );
    }

    #[test]
    fn template_section_properties_stay_last() {
        let output = format(&DocxFixture::journal_template(), &sample_manuscript(PNG));
        let document = open(&output.bytes);
        let last = document.blocks.last().unwrap().element();
        assert!(last.is("sectPr"));
        assert_eq!(document.blocks.iter().filter(|b| b.element().is("sectPr")).count(), 1);
    }

    #[test]
    fn abstract_and_keyword_labels_are_bold() {
        let output = format(&DocxFixture::journal_template(), &sample_manuscript(PNG));
        let document = open(&output.bytes);

        let abstract_paragraph = document.blocks[5].element();
        let runs: Vec<_> = abstract_paragraph.elements().filter(|e| e.is("r")).collect();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].child("rPr").and_then(|rpr| rpr.child("b")).is_some());
        assert_eq!(runs[0].run_text(), "Abstrak");
        assert!(runs[1].child("rPr").is_none());
        assert_eq!(runs[1].run_text(), " Penelitian ini membahas pajak desa.");

        let title = document.blocks[0].element();
        assert!(!title.has_descendant("b"));
    }

    #[test]
    fn direct_formatting_is_stripped_from_body_paragraphs() {
        let output = format(&DocxFixture::journal_template(), &sample_manuscript(PNG));
        let document = open(&output.bytes);
        let paragraph = document.blocks[10].element();

        assert_eq!(paragraph_style(paragraph).as_deref(), Some("Isi_Jurnal"));
        assert!(!paragraph.has_descendant("highlight"));
        assert!(!paragraph.has_descendant("color"));
        assert!(!paragraph.has_descendant("shd"));
        // bold is content, not an override
        assert!(paragraph.has_descendant("b"));
    }

    #[test]
    fn table_gets_template_style_and_autofit() {
        let output = format(&DocxFixture::journal_template(), &sample_manuscript(PNG));
        let document = open(&output.bytes);
        let table = document
            .blocks
            .iter()
            .map(|block| block.element())
            .find(|element| element.is("tbl"))
            .unwrap();

        let tbl_pr = table.child("tblPr").unwrap();
        assert_eq!(tbl_pr.child("tblLayout").unwrap().attr("w:type"), Some("autofit"));
        for cell_paragraph in table.descendants().filter(|e| e.is("p")) {
            assert_eq!(paragraph_style(cell_paragraph).as_deref(), Some("Isi_Jurnal"));
        }
    }

    #[test]
    fn walk_report_matches_emitted_body() {
        let output = format(&DocxFixture::journal_template(), &sample_manuscript(PNG));
        let walk = &output.stages.walk;
        assert_eq!(walk.len(), 9);
        assert_eq!(walk.iter().filter(|r| r.path == WalkPath::Image).count(), 1);
        assert_eq!(walk.iter().filter(|r| r.path == WalkPath::Table).count(), 1);
        assert_eq!(walk[0].preview, "1. PENDAHULUAN");
        assert_eq!(walk[3].role, Some(StyleRole::MainHeading));
        assert_eq!(walk[4].role, Some(StyleRole::ResultsHeading));
    }
}

// ============================================================================
// Media and relationships
// ============================================================================

mod media_boundary {
    use super::*;

    #[test]
    fn image_bytes_survive_next_to_caption() {
        let output = format(&DocxFixture::journal_template(), &sample_manuscript(PNG));
        let document = open(&output.bytes);

        let picture_paragraph = document
            .blocks
            .iter()
            .map(|block| block.element())
            .find(|element| element.has_descendant("drawing"))
            .unwrap();
        assert_eq!(picture_paragraph.run_text().trim(), "Gambar 1. Grafik penerimaan");

        let runs: Vec<_> = picture_paragraph.elements().filter(|e| e.is("r")).collect();
        assert!(runs[0].has_descendant("drawing"));

        let embed = picture_paragraph
            .descendants()
            .find(|e| e.is("blip"))
            .and_then(|blip| blip.attr("r:embed"))
            .unwrap();
        let images = collect_images(&document.package, &document.document_part).unwrap();
        assert_eq!(images.image(embed).unwrap().data, PNG);
    }

    #[test]
    fn new_media_gets_content_type_default() {
        let output = format(&DocxFixture::journal_template(), &sample_manuscript(PNG));
        let document = open(&output.bytes);
        let content_types = ContentTypes::parse(document.package.part(CONTENT_TYPES_PART).unwrap()).unwrap();
        assert_eq!(content_types.default_for("png"), Some("image/png"));
    }

    #[test]
    fn unresolvable_image_reference_keeps_caption_only() {
        let manuscript = DocxFixture::new()
            .paragraph("1. INTRODUCTION")
            .raw(r#"<w:p><w:r><w:drawing><wp:inline><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId99"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r><w:r><w:t>Figure 1</w:t></w:r></w:p>"#);
        let output = format(&DocxFixture::journal_template(), &manuscript);
        let document = open(&output.bytes);

        let last = document.blocks.iter().rev().map(|b| b.element()).find(|e| e.is("p")).unwrap();
        assert_eq!(last.run_text(), "Figure 1");
        assert!(!last.has_descendant("drawing"));
    }

    #[test]
    fn manuscript_namespaces_are_carried_over() {
        let manuscript = sample_manuscript(PNG)
            .with_root_attribute(r#"xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml""#);
        let output = format(&DocxFixture::journal_template(), &manuscript);
        let document = open(&output.bytes);
        assert_eq!(
            document.document.root.attr("xmlns:w14"),
            Some("http://schemas.microsoft.com/office/word/2010/wordml")
        );
    }
}

// ============================================================================
// Edge cases and determinism
// ============================================================================

mod edge_cases {
    use super::*;

    #[test]
    fn formatting_twice_is_byte_identical() {
        let template = DocxFixture::journal_template();
        let manuscript = sample_manuscript(PNG);
        let first = format(&template, &manuscript);
        let second = format(&template, &manuscript);
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn empty_manuscript_clears_template_body() {
        let output = format(&DocxFixture::journal_template(), &DocxFixture::new());
        let document = open(&output.bytes);
        assert!(body_outline(&document).is_empty());
        assert!(output.stages.sections.is_all_empty());
        assert!(output.stages.walk.is_empty());
    }

    #[test]
    fn missing_contract_styles_fall_back() {
        let output = format(&DocxFixture::bare_template(), &sample_manuscript(PNG));
        let document = open(&output.bytes);
        let outline = body_outline(&document);

        assert_eq!(outline[0], styled("Normal", "Analisis Pajak Desa"));
        let table_style = outline
            .iter()
            .find(|(_, text)| text.starts_with("Variabel"))
            .and_then(|(style, _)| style.clone());
        assert_eq!(table_style.as_deref(), Some("TableGrid"));
        assert!(output.stages.styles.iter().all(|resolution| resolution.fell_back));
    }

    #[test]
    fn manuscript_without_introduction_keeps_only_front_matter() {
        let manuscript = DocxFixture::new().paragraphs(&["Judul", "Penulis", "Isi tanpa bab"]);
        let output = format(&DocxFixture::journal_template(), &manuscript);
        let document = open(&output.bytes);
        assert_eq!(
            body_outline(&document),
            vec![
                styled("Judul_Jurnal", "Judul"),
                styled("Author_Jurnal", "Penulis"),
                styled("Afiliasi_Jurnal", "Isi tanpa bab"),
            ]
        );
        assert!(output.stages.walk.is_empty());
    }

    #[test]
    fn not_a_docx_is_an_error() {
        let result = DocumentProcessor::new().format_bytes(
            &DocxFixture::journal_template().build(),
            b"plain text",
            None,
            &FormatterConfig::default(),
        );
        assert!(result.is_err());
    }
}

// ============================================================================
// Review loop: detected sections edited before assembly
// ============================================================================

mod review_loop {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reviewed_sections_replace_detection() {
        let processor = DocumentProcessor::new();
        let config = FormatterConfig::default();
        let manuscript_bytes = sample_manuscript(PNG).build();

        let mut sections = processor
            .detect_sections_from_document(&open(&manuscript_bytes), &config)
            .unwrap();
        sections.set(SectionKey::Title, SectionField::plain("Judul Hasil Review"));
        sections.set(SectionKey::Email, SectionField::default());

        let yaml = serde_yaml::to_string(&sections).unwrap();
        let reviewed: SectionMap = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(reviewed, sections);

        let output = processor
            .format_bytes(&DocxFixture::journal_template().build(), &manuscript_bytes, Some(&reviewed), &config)
            .unwrap();
        let outline = body_outline(&open(&output.bytes));
        assert_eq!(outline[0], styled("Judul_Jurnal", "Judul Hasil Review"));
        assert!(!outline.iter().any(|(_, text)| text.starts_with("Email:")));
    }

    #[test]
    fn format_document_reads_from_disk() {
        let dir = TempDir::new().unwrap();
        let template_path = dir.path().join("template.docx");
        let manuscript_path = dir.path().join("manuscript.docx");
        std::fs::write(&template_path, DocxFixture::journal_template().build()).unwrap();
        std::fs::write(&manuscript_path, sample_manuscript(PNG).build()).unwrap();

        let output = DocumentProcessor::new()
            .format_document(
                template_path.to_str().unwrap(),
                manuscript_path.to_str().unwrap(),
                None,
                &FormatterConfig::default(),
            )
            .unwrap();
        assert_eq!(output.stages.sections.filled_count(), 9);
        assert!(!output.bytes.is_empty());
    }

    #[test]
    fn custom_config_changes_style_names() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("journal.yaml");
        std::fs::write(&config_path, "styles:\n  title: Isi_Jurnal\n").unwrap();
        let config = FormatterConfig::load_from_file(config_path.to_str().unwrap()).unwrap();

        let output = DocumentProcessor::new()
            .format_bytes(
                &DocxFixture::journal_template().build(),
                &sample_manuscript(PNG).build(),
                None,
                &config,
            )
            .unwrap();
        let outline = body_outline(&open(&output.bytes));
        assert_eq!(outline[0], styled("Isi_Jurnal", "Analisis Pajak Desa"));
    }
}
