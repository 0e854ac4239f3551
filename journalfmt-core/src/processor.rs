use crate::assembly::{DocumentAssembler, ResolvedStyles, StyleResolution};
use crate::classifier::FrontMatterClassifier;
use crate::config::FormatterConfig;
use crate::preprocessors::{DocxPreprocessor, Preprocessor};
use crate::types::*;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics to inspect each boundary
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub paragraphs: Vec<ParagraphText>,
    pub sections: SectionMap,
    pub walk: Vec<WalkRecord>,
    pub styles: Vec<StyleResolution>,
}

impl PipelineStages {
    /// Per-stage counts, the quick reference written next to stage dumps
    pub fn stage_counts(&self) -> serde_json::Value {
        serde_json::json!({
            "paragraphs": self.paragraphs.len(),
            "sections_filled": self.sections.filled_count(),
            "sections_total": SectionKey::ALL.len(),
            "walk_blocks": self.walk.len(),
            "walk_images": self.walk.iter().filter(|r| r.path == WalkPath::Image).count(),
            "walk_tables": self.walk.iter().filter(|r| r.path == WalkPath::Table).count(),
            "style_fallbacks": self.styles.iter().filter(|s| s.fell_back).count(),
        })
    }
}

/// A formatted package plus the stage outputs that produced it
#[derive(Debug, Clone)]
pub struct FormatOutput {
    pub bytes: Vec<u8>,
    pub stages: PipelineStages,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        println!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

pub struct DocumentProcessor {
    preprocessor: Box<dyn Preprocessor>,
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor {
    /// Processor backed by the DOCX preprocessor
    pub fn new() -> Self {
        Self::new_with_dependencies(Box::new(DocxPreprocessor::new()))
    }

    /// Create DocumentProcessor with an injected preprocessor
    pub fn new_with_dependencies(preprocessor: Box<dyn Preprocessor>) -> Self {
        Self { preprocessor }
    }

    /// Load a document from disk, warning when the extension looks wrong
    pub fn load_document(&self, path: &str) -> Result<SourceDocument> {
        let path = Path::new(path);
        if !self.preprocessor.supports_file_type(path) {
            eprintln!(
                "⚠️  {} does not look like a DOCX file, trying {} anyway",
                path.display(),
                self.preprocessor.name()
            );
        }
        self.preprocessor.process_file(path)
    }

    /// Detect front-matter sections of the manuscript at `manuscript_path`
    pub fn detect_sections(&self, manuscript_path: &str, config: &FormatterConfig) -> Result<SectionMap> {
        println!("📄 Reading manuscript: {}", manuscript_path);
        let manuscript = self.load_document(manuscript_path)?;
        self.detect_sections_from_document(&manuscript, config)
    }

    pub fn detect_sections_from_document(
        &self,
        manuscript: &SourceDocument,
        config: &FormatterConfig,
    ) -> Result<SectionMap> {
        let classifier = FrontMatterClassifier::new(&config.markers)?;
        let sections = classifier.classify(&manuscript.paragraphs());
        println!(
            "🔍 Detected {}/{} front-matter fields",
            sections.filled_count(),
            SectionKey::ALL.len()
        );
        Ok(sections)
    }

    /// Template style resolution for every role, for diagnostics
    pub fn template_styles(&self, template_path: &str, config: &FormatterConfig) -> Result<(SourceDocument, Vec<StyleResolution>)> {
        let template = self.load_document(template_path)?;
        let resolutions = ResolvedStyles::resolve(&template.styles, &config.styles)
            .resolutions()
            .to_vec();
        Ok((template, resolutions))
    }

    /// Format the manuscript into the template. Without `sections`, front
    /// matter is detected from the manuscript itself.
    pub fn format_document(
        &self,
        template_path: &str,
        manuscript_path: &str,
        sections: Option<&SectionMap>,
        config: &FormatterConfig,
    ) -> Result<FormatOutput> {
        self.format_document_with_profiling(template_path, manuscript_path, sections, config, false)
    }

    pub fn format_document_with_profiling(
        &self,
        template_path: &str,
        manuscript_path: &str,
        sections: Option<&SectionMap>,
        config: &FormatterConfig,
        enable_profiling: bool,
    ) -> Result<FormatOutput> {
        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(enable_profiling);

        println!("📄 Template: {}", template_path);
        println!("📄 Manuscript: {}", manuscript_path);

        let (template_bytes, manuscript_bytes) = profiler.time_step("1. Read Inputs", || {
            let template = std::fs::read(template_path)
                .with_context(|| format!("failed to read template {}", template_path))?;
            let manuscript = std::fs::read(manuscript_path)
                .with_context(|| format!("failed to read manuscript {}", manuscript_path))?;
            Ok::<(Vec<u8>, Vec<u8>), anyhow::Error>((template, manuscript))
        })?;

        let output = self.format_with_profiler(
            &template_bytes,
            &manuscript_bytes,
            sections,
            config,
            &mut profiler,
        )?;

        profiler.print_summary();
        println!(
            "⏱️  Total processing time: {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(output)
    }

    /// In-memory variant of [`format_document`](Self::format_document)
    pub fn format_bytes(
        &self,
        template: &[u8],
        manuscript: &[u8],
        sections: Option<&SectionMap>,
        config: &FormatterConfig,
    ) -> Result<FormatOutput> {
        self.format_with_profiler(template, manuscript, sections, config, &mut StepProfiler::new(false))
    }

    fn format_with_profiler(
        &self,
        template_bytes: &[u8],
        manuscript_bytes: &[u8],
        sections: Option<&SectionMap>,
        config: &FormatterConfig,
        profiler: &mut StepProfiler,
    ) -> Result<FormatOutput> {
        let template = profiler
            .time_step("2. Load Template", || self.preprocessor.process(template_bytes))
            .context("failed to load template")?;
        let manuscript = profiler
            .time_step("3. Load Manuscript", || self.preprocessor.process(manuscript_bytes))
            .context("failed to load manuscript")?;

        let paragraphs = manuscript.paragraphs();
        let sections = match sections {
            Some(reviewed) => {
                println!("📋 Using reviewed sections ({} filled)", reviewed.filled_count());
                reviewed.clone()
            }
            None => profiler.time_step("4. Section Detection", || {
                self.detect_sections_from_document(&manuscript, config)
            })?,
        };

        let assembler = DocumentAssembler::new(config);
        let assembled = profiler.time_step("5. Assembly", || {
            assembler.assemble(template, &manuscript, &sections)
        })?;

        let records = assembled.records;
        let count_path = |path| records.iter().filter(|record| record.path == path).count();
        println!(
            "✅ Formatted {} front-matter paragraphs and {} body blocks ({} paragraphs, {} tables, {} images, {} media parts)",
            assembled.front_matter_paragraphs,
            records.len(),
            count_path(WalkPath::Paragraph),
            count_path(WalkPath::Table),
            count_path(WalkPath::Image),
            assembled.embedded_media
        );

        Ok(FormatOutput {
            bytes: assembled.bytes,
            stages: PipelineStages {
                paragraphs,
                sections,
                walk: records,
                styles: assembled.styles,
            },
        })
    }
}
