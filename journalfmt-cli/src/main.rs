use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;

// Import from journalfmt-core
use journalfmt_core::{DocumentProcessor, FormatterConfig, PipelineStages, DOCX_MIME_TYPE};

// Import CLI utilities
use journalfmt::{describe_sections, load_sections, save_sections};

#[derive(Parser)]
#[command(name = "journalfmt")]
#[command(about = "Format a raw DOCX manuscript into a journal template")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect front-matter sections and write them to a review file
    Detect {
        /// Path to the manuscript DOCX
        #[arg(short, long)]
        manuscript: String,

        /// Review file to write (YAML, or JSON for a .json path)
        #[arg(short, long, default_value = "sections.yaml")]
        output: String,

        /// Path to custom config file (YAML format)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Format the manuscript into the template
    Format {
        /// Path to the journal template DOCX
        #[arg(short, long)]
        template: String,

        /// Path to the manuscript DOCX
        #[arg(short, long)]
        manuscript: String,

        /// Reviewed sections file; detection runs inline when omitted
        #[arg(short, long)]
        sections: Option<String>,

        /// Output file path (default: output.file_name from the config)
        #[arg(short, long)]
        output: Option<String>,

        /// Path to custom config file (YAML format)
        #[arg(short, long)]
        config: Option<String>,

        /// Enable detailed profiling of all pipeline steps
        #[arg(long)]
        profile: bool,

        /// Dump all intermediate pipeline stage outputs to a directory
        /// Captures: paragraphs, sections, walk report and style resolution
        #[arg(long)]
        dump_stages: bool,

        /// Directory for stage dump output (default: test_outputs/stages)
        #[arg(long, default_value = "test_outputs/stages")]
        stages_dir: String,
    },

    /// List the template's styles and show which ones will fall back
    Styles {
        /// Path to the journal template DOCX
        #[arg(short, long)]
        template: String,

        /// Path to custom config file (YAML format)
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("📰 journalfmt Manuscript Formatter");

    let result = match cli.command {
        Command::Detect {
            manuscript,
            output,
            config,
        } => run_detect(&manuscript, &output, config.as_deref()),
        Command::Format {
            template,
            manuscript,
            sections,
            output,
            config,
            profile,
            dump_stages,
            stages_dir,
        } => run_format(FormatArgs {
            template: &template,
            manuscript: &manuscript,
            sections: sections.as_deref(),
            output: output.as_deref(),
            config: config.as_deref(),
            profile,
            stages_dir: dump_stages.then_some(stages_dir.as_str()),
        }),
        Command::Styles { template, config } => run_styles(&template, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Processing failed: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(path: Option<&str>) -> FormatterConfig {
    let config = FormatterConfig::load_with_fallback(path);
    if let Some(config_path) = path {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }
    config
}

fn check_input(path: &str, what: &str) -> Result<()> {
    if !Path::new(path).exists() {
        anyhow::bail!("{what} not found at: {path}");
    }
    Ok(())
}

fn run_detect(manuscript: &str, output: &str, config_path: Option<&str>) -> Result<()> {
    check_input(manuscript, "Manuscript")?;
    let config = load_config(config_path);
    let processor = DocumentProcessor::new();

    let sections = processor.detect_sections(manuscript, &config)?;
    for line in describe_sections(&sections, &config.styles) {
        println!("   {}", line);
    }
    if sections.is_all_empty() {
        eprintln!("⚠️  No front matter detected; the review file will be empty");
    }

    save_sections(output, &sections)?;
    println!("💾 Sections saved to: {}", output);
    println!("   Edit the file, then run: journalfmt format -t <template> -m {} -s {}", manuscript, output);
    Ok(())
}

struct FormatArgs<'a> {
    template: &'a str,
    manuscript: &'a str,
    sections: Option<&'a str>,
    output: Option<&'a str>,
    config: Option<&'a str>,
    profile: bool,
    stages_dir: Option<&'a str>,
}

fn run_format(args: FormatArgs<'_>) -> Result<()> {
    check_input(args.template, "Template")?;
    check_input(args.manuscript, "Manuscript")?;
    let config = load_config(args.config);
    let processor = DocumentProcessor::new();

    let reviewed = match args.sections {
        Some(path) => {
            println!("📋 Loading reviewed sections from: {}", path);
            Some(load_sections(path)?)
        }
        None => None,
    };

    let formatted = processor.format_document_with_profiling(
        args.template,
        args.manuscript,
        reviewed.as_ref(),
        &config,
        args.profile,
    )?;

    for line in describe_sections(&formatted.stages.sections, &config.styles) {
        println!("   {}", line);
    }

    let output_path = args
        .output
        .map(str::to_string)
        .unwrap_or_else(|| config.output.file_name.clone());
    std::fs::write(&output_path, &formatted.bytes)
        .with_context(|| format!("failed to write {}", output_path))?;
    println!("💾 Formatted document saved to: {} ({})", output_path, DOCX_MIME_TYPE);

    if let Some(stages_dir) = args.stages_dir {
        println!("\n🔬 Pipeline stage dump mode");
        save_stages(&formatted.stages, args.template, args.manuscript, stages_dir)?;
        println!("\n✅ All stages dumped to: {}", stages_dir);
    }

    println!("✅ Successfully formatted document");
    Ok(())
}

fn run_styles(template: &str, config_path: Option<&str>) -> Result<()> {
    check_input(template, "Template")?;
    let config = load_config(config_path);
    let processor = DocumentProcessor::new();

    let (document, resolutions) = processor.template_styles(template, &config)?;
    println!("📊 Template styles: {}", document.styles.len());
    for entry in document.styles.entries() {
        println!("   {:.<35} {:?} ({})", entry.name, entry.kind, entry.id);
    }

    println!("\n📋 Style contract:");
    let mut missing = 0;
    for resolution in &resolutions {
        if resolution.fell_back {
            missing += 1;
            println!(
                "   ⚠️  {:<22} missing, falls back to {}",
                resolution.requested, resolution.id
            );
        } else {
            println!("   ✅ {:<22} -> {}", resolution.requested, resolution.id);
        }
    }
    println!("\n{} of {} contract styles present", resolutions.len() - missing, resolutions.len());
    Ok(())
}

fn save_stages(stages: &PipelineStages, template: &str, manuscript: &str, output_dir: &str) -> Result<()> {
    use std::fs;
    fs::create_dir_all(output_dir)?;

    // Stage 1: Body paragraphs fed to the classifier
    let paragraphs_path = format!("{}/stage1_paragraphs.json", output_dir);
    fs::write(&paragraphs_path, serde_json::to_string_pretty(&stages.paragraphs)?)?;
    println!("  💾 {} ({} paragraphs)", paragraphs_path, stages.paragraphs.len());

    // Stage 2: Front-matter sections
    let sections_path = format!("{}/stage2_sections.json", output_dir);
    fs::write(&sections_path, serde_json::to_string_pretty(&stages.sections)?)?;
    println!("  💾 {} ({} filled)", sections_path, stages.sections.filled_count());

    // Stage 3: Body walk report
    let walk_path = format!("{}/stage3_walk.json", output_dir);
    fs::write(&walk_path, serde_json::to_string_pretty(&stages.walk)?)?;
    println!("  💾 {} ({} blocks)", walk_path, stages.walk.len());

    // Stage 4: Style resolution against the template
    let styles_path = format!("{}/stage4_styles.json", output_dir);
    fs::write(&styles_path, serde_json::to_string_pretty(&stages.styles)?)?;
    println!("  💾 {} ({} roles)", styles_path, stages.styles.len());

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "template": template,
        "manuscript": manuscript,
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": stages.stage_counts(),
    });
    let summary_path = format!("{}/summary.json", output_dir);
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {}", summary_path);

    Ok(())
}
