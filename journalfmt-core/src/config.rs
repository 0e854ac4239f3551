use crate::types::StyleRole;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_sub_heading_pattern() -> String {
    r"^\d+\.\d+".to_string()
}

fn default_sub_heading_max_length() -> usize {
    150
}

fn default_output_file_name() -> String {
    "Formatted_Journal_Final.docx".to_string()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Formatter configuration. Every section falls back to the journal's
/// built-in contract, so an empty YAML file is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatterConfig {
    #[serde(default)]
    pub styles: StyleConfig,
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub sub_heading: SubHeadingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Template style names per role, as they appear in the template's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub title: String,
    pub author: String,
    pub affiliation: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Chapters 1, 2 and 4
    pub main_heading: String,
    /// Chapter 3 (results and discussion)
    pub results_heading: String,
    /// Numbered sub-chapters such as 2.1 or 3.2.1
    pub sub_heading: String,
    pub body_text: String,
    pub table: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            title: "Judul_Jurnal".to_string(),
            author: "Author_Jurnal".to_string(),
            affiliation: "Afiliasi_Jurnal".to_string(),
            abstract_text: "Abstrak_Jurnal".to_string(),
            main_heading: "Subjudul_Jurnal".to_string(),
            results_heading: "Sub_Judul".to_string(),
            sub_heading: "Subsubjudul_Jurnal".to_string(),
            body_text: "Isi_Jurnal".to_string(),
            table: "Tabel_Jurnal".to_string(),
        }
    }
}

impl StyleConfig {
    pub fn name_for(&self, role: StyleRole) -> &str {
        match role {
            StyleRole::Title => &self.title,
            StyleRole::Author => &self.author,
            StyleRole::Affiliation => &self.affiliation,
            StyleRole::Abstract => &self.abstract_text,
            StyleRole::MainHeading => &self.main_heading,
            StyleRole::ResultsHeading => &self.results_heading,
            StyleRole::SubHeading => &self.sub_heading,
            StyleRole::BodyText => &self.body_text,
            StyleRole::Table => &self.table,
        }
    }
}

/// Lexical markers, Indonesian and English variants side by side.
/// Matching is case-insensitive; values are upper-cased when the marker
/// table is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub introduction: Vec<String>,
    pub methodology: Vec<String>,
    pub results: Vec<String>,
    pub conclusion: Vec<String>,
    pub abstract_local: String,
    pub abstract_en: String,
    pub keywords_local: String,
    pub keywords_en: String,
    /// Extra words that end the English abstract besides the keyword marker
    /// and the introduction headings.
    pub abstract_en_terminators: Vec<String>,
    pub correspondence: Vec<String>,
    pub email_pattern: String,
    pub labels: LabelConfig,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            introduction: strings(&["1. PENDAHULUAN", "1. INTRODUCTION"]),
            methodology: strings(&[
                "2. METODOLOGI PENELITIAN",
                "2. RESEARCH METHODOLOGY",
                "2. METODE PENELITIAN",
                "2. RESEARCH METHOD",
            ]),
            results: strings(&[
                "3. HASIL DAN PEMBAHASAN",
                "3. RESULTS AND DISCUSSION",
                "3. HASIL PENELITIAN DAN PEMBAHASAN",
                "3. HASIL",
            ]),
            conclusion: strings(&[
                "4. KESIMPULAN",
                "4. CONCLUSION",
                "4. PENUTUP",
                "KESIMPULAN DAN SARAN",
            ]),
            abstract_local: "ABSTRAK".to_string(),
            abstract_en: "ABSTRACT".to_string(),
            keywords_local: "KATA KUNCI".to_string(),
            keywords_en: "KEYWORDS".to_string(),
            abstract_en_terminators: strings(&["PENDAHULUAN"]),
            correspondence: strings(&["CORRESPONDING", "KORESPONDENSI", "*"]),
            email_pattern: r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+".to_string(),
            labels: LabelConfig::default(),
        }
    }
}

/// Literal labels written in front of detected values. The first four are
/// rendered bold by the assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub abstract_local: String,
    pub abstract_en: String,
    pub keywords_local: String,
    pub keywords_en: String,
    pub email: String,
    pub corresponding_email: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            abstract_local: "Abstrak".to_string(),
            abstract_en: "Abstract".to_string(),
            keywords_local: "Kata Kunci:".to_string(),
            keywords_en: "Keywords:".to_string(),
            email: "Email:".to_string(),
            corresponding_email: "Email Penulis Korespondensi:".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubHeadingConfig {
    /// Anchored numbering pattern, matched against the trimmed paragraph text
    #[serde(default = "default_sub_heading_pattern")]
    pub pattern: String,
    /// Paragraphs this long or longer are body text even when numbered
    #[serde(default = "default_sub_heading_max_length")]
    pub max_length: usize,
}

impl Default for SubHeadingConfig {
    fn default() -> Self {
        Self {
            pattern: default_sub_heading_pattern(),
            max_length: default_sub_heading_max_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_file_name")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_output_file_name(),
        }
    }
}

impl FormatterConfig {
    /// Load config from file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {path}"))?;
        let config: FormatterConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {path}"))?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                eprintln!("⚠️  Failed to load config from {}, using defaults: {e:#}", p);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
