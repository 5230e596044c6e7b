use crate::reader::{read_source, SourceText};
use crate::sanitize::Sanitizer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The research sources compared on the site, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Claude,
    Gemini,
    Manus,
    OpenAi,
    Perplexity,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Claude,
        Provider::Gemini,
        Provider::Manus,
        Provider::OpenAi,
        Provider::Perplexity,
    ];

    /// Object key in the generated data.
    pub fn key(self) -> &'static str {
        match self {
            Provider::Claude => "claude",
            Provider::Gemini => "gemini",
            Provider::Manus => "manus",
            Provider::OpenAi => "openai",
            Provider::Perplexity => "perplexity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Gemini => "Gemini",
            Provider::Manus => "Manus",
            Provider::OpenAi => "OpenAI",
            Provider::Perplexity => "Perplexity",
        }
    }
}

const CLAUDE_FILES: [&str; 18] = [
    "00_Executive_Summary.md",
    "01_Full_Report_Part1_Current_Landscape.md",
    "02_Full_Report_Part2_End_User_Solutions.md",
    "03_Full_Report_Part3_Technical_Architecture_Ch14.md",
    "03_Full_Report_Part3_Technical_Architecture_Ch15.md",
    "03_Full_Report_Part3_Technical_Architecture_Ch16.md",
    "03_Full_Report_Part3_Technical_Architecture_Ch17.md",
    "03_Full_Report_Part3_Technical_Architecture_Ch18.md",
    "04_Full_Report_Part4_Effectiveness_Ch19.md",
    "04_Full_Report_Part4_Effectiveness_Ch20.md",
    "04_Full_Report_Part4_Effectiveness_Ch21.md",
    "04_Full_Report_Part4_Effectiveness_Ch22.md",
    "04_Full_Report_Part4_Effectiveness_Ch23.md",
    "05_Full_Report_Part5_Standards_Ch24.md",
    "05_Full_Report_Part5_Standards_Ch25.md",
    "05_Full_Report_Part5_Standards_Ch26.md",
    "05_Full_Report_Part5_Standards_Ch27.md",
    "05_Full_Report_Part5_Standards_Ch28.md",
];

const MANUS_FILES: [&str; 9] = [
    "field_briefing.md",
    "Comprehensive Field Briefing_ Detecting AI-Generated Content.md",
    "ai_text_detection_overview.md",
    "ai_image_detection_overview.md",
    "ai_video_detection_overview.md",
    "ai_voice_detection_overview.md",
    "end_user_toolkit.md",
    "developer_blueprints.md",
    "roadmap_tables.md",
];

/// Where one provider's research lives and how to stitch it together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub provider: Provider,
    /// Directory holding `files`, relative to the root.
    pub base_dir: PathBuf,
    /// File whose text becomes the summary. Defaults to the first of `files`.
    #[serde(default)]
    pub summary_file: Option<String>,
    /// Concatenated in this order; it is the reading order on the site.
    pub files: Vec<String>,
    /// Put a `# <filename>` heading above each file's text.
    #[serde(default)]
    pub heading_prefix: bool,
}

impl ProviderDescriptor {
    pub fn builtin(provider: Provider) -> Self {
        fn owned(files: &[&str]) -> Vec<String> {
            files.iter().map(|f| f.to_string()).collect()
        }

        let (base_dir, summary_file, files, heading_prefix) = match provider {
            Provider::Claude => (
                "../Claude Code Deep Research output",
                Some("00_Executive_Summary.md"),
                owned(&CLAUDE_FILES),
                false,
            ),
            Provider::Gemini => (
                "../Gemini Output (pro plan)",
                None,
                owned(&["Gemini output.md"]),
                false,
            ),
            Provider::Manus => (
                "../Manus output (free plan)",
                Some("field_briefing.md"),
                owned(&MANUS_FILES),
                true,
            ),
            Provider::OpenAi => (
                "../Openai Output (pro plan)",
                None,
                owned(&["Openai Deep Research output.md"]),
                false,
            ),
            Provider::Perplexity => (
                "../Perpelxity deep research (pro plan)",
                None,
                owned(&["AI Content Detection Field Briefing_ Methods, Tool.md"]),
                false,
            ),
        };

        Self {
            provider,
            base_dir: PathBuf::from(base_dir),
            summary_file: summary_file.map(str::to_string),
            files,
            heading_prefix,
        }
    }

    pub fn summary_file(&self) -> Option<&str> {
        self.summary_file
            .as_deref()
            .or_else(|| self.files.first().map(String::as_str))
    }
}

pub fn default_descriptors() -> Vec<ProviderDescriptor> {
    Provider::ALL.into_iter().map(ProviderDescriptor::builtin).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResult {
    pub summary: String,
    pub full_research: String,
}

/// A provider's result plus what was found on disk.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub result: ProviderResult,
    pub found: Vec<String>,
    pub missing: Vec<String>,
    pub unreadable: Vec<String>,
}

/// Knobs shared by every extractor call.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions<'a> {
    pub sanitizer: &'a Sanitizer,
    pub summary_chars: usize,
    pub separator: &'a str,
}

/// First `max_chars` characters of `text`, or all of it when it is no longer.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Read and clean one file; `None` when it is missing or unreadable.
pub fn read_cleaned(path: &Path, sanitizer: &Sanitizer) -> (SourceText, Option<String>) {
    let source = read_source(path);
    let cleaned = source.text().map(|t| sanitizer.clean(t));
    (source, cleaned)
}

/// Build one provider's summary and full research from its descriptor.
///
/// Missing and unreadable files are skipped the same way for every provider.
pub fn extract(root: &Path, desc: &ProviderDescriptor, opts: ExtractOptions<'_>) -> Extraction {
    let base = root.join(&desc.base_dir);
    let summary_name = desc.summary_file();

    let mut out = Extraction::default();
    let mut parts: Vec<String> = Vec::with_capacity(desc.files.len());
    let mut summary_text: Option<String> = None;

    for name in &desc.files {
        let path = base.join(name);
        let (source, cleaned) = read_cleaned(&path, opts.sanitizer);
        match (&source, cleaned) {
            (SourceText::Text(_), Some(text)) => {
                out.found.push(name.clone());
                if summary_name == Some(name.as_str()) && summary_text.is_none() {
                    summary_text = Some(text.clone());
                }
                if desc.heading_prefix {
                    parts.push(format!("# {name}\n\n{text}"));
                } else {
                    parts.push(text);
                }
            }
            (SourceText::Unreadable(e), _) => {
                eprintln!("[research-compiler] WARN: could not read {}: {e}", path.display());
                out.unreadable.push(name.clone());
            }
            _ => {
                crate::debug_log!("[research-compiler] DEBUG: missing {}", path.display());
                out.missing.push(name.clone());
            }
        }
    }

    // A summary file outside the concatenation list is read on its own.
    if let Some(name) = summary_name {
        if !desc.files.iter().any(|f| f == name) {
            let path = base.join(name);
            let (source, cleaned) = read_cleaned(&path, opts.sanitizer);
            match &source {
                SourceText::Text(_) => out.found.push(name.to_string()),
                SourceText::Unreadable(e) => {
                    eprintln!("[research-compiler] WARN: could not read {}: {e}", path.display());
                    out.unreadable.push(name.to_string());
                }
                SourceText::Missing => out.missing.push(name.to_string()),
            }
            summary_text = cleaned;
        }
    }

    out.result = ProviderResult {
        summary: summary_text
            .as_deref()
            .map(|t| truncate_chars(t, opts.summary_chars).to_string())
            .unwrap_or_default(),
        full_research: parts.join(opts.separator),
    };
    out
}
