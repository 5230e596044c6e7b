use crate::error::CompileError;
use crate::provider::{default_descriptors, Provider, ProviderDescriptor};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name looked up in the root directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = ".research-compiler.json";

/// Preview length for every provider summary, in characters.
pub const DEFAULT_SUMMARY_CHARS: usize = 5000;

/// Placed between concatenated research files.
pub const DEFAULT_SEPARATOR: &str = "\n\n---\n\n";

/// Marker left behind when files are copied off an NTFS volume
/// (`report.md:Zone.Identifier` lines in directory dumps).
pub const ZONE_IDENTIFIER_PATTERN: &str = r":Zone\.Identifier";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generated artifact, relative to the root.
    pub output_file: PathBuf,
    /// Name of the global the artifact attaches to `window`.
    pub global_name: String,
    pub summary_chars: usize,
    pub separator: String,
    /// Regexes; any line matching one of them is dropped from every source file.
    pub strip_line_patterns: Vec<String>,
    /// The prompt every provider was given. Stored whole, never truncated.
    pub initial_prompt: PathBuf,
    /// Per-provider corpus layout. Providers missing here keep their built-in layout.
    pub providers: Vec<ProviderDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("data-loader.js"),
            global_name: "researchData".to_string(),
            summary_chars: DEFAULT_SUMMARY_CHARS,
            separator: DEFAULT_SEPARATOR.to_string(),
            strip_line_patterns: vec![ZONE_IDENTIFIER_PATTERN.to_string()],
            initial_prompt: PathBuf::from("../Initial Prompt Used.md"),
            providers: default_descriptors(),
        }
    }
}

impl Config {
    /// Layout for `provider`: the configured descriptor if there is one,
    /// otherwise the built-in one.
    pub fn descriptor(&self, provider: Provider) -> ProviderDescriptor {
        self.providers
            .iter()
            .find(|d| d.provider == provider)
            .cloned()
            .unwrap_or_else(|| ProviderDescriptor::builtin(provider))
    }
}

/// Config for `root`, read from [`CONFIG_FILE_NAME`] when present.
///
/// The file is optional: when it is absent the defaults apply silently; when
/// it cannot be read or parsed the defaults apply with a warning.
pub fn load_config(root: &Path) -> Config {
    match load_config_from(&root.join(CONFIG_FILE_NAME)) {
        Ok(cfg) => cfg,
        Err(CompileError::ConfigRead { source, .. }) if source.kind() == ErrorKind::NotFound => {
            Config::default()
        }
        Err(e) => {
            eprintln!("[research-compiler] WARN: {e}; using defaults");
            Config::default()
        }
    }
}

/// Config from an explicit path. Every failure is an error.
pub fn load_config_from(path: &Path) -> Result<Config, CompileError> {
    let text = std::fs::read_to_string(path).map_err(|source| CompileError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str::<Config>(&text).map_err(|source| CompileError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
