use crate::artifact;
use crate::config::Config;
use crate::error::CompileError;
use crate::provider::{extract, read_cleaned, ExtractOptions, Provider, ProviderResult};
use crate::reader::SourceText;
use crate::sanitize::Sanitizer;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn js_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static regex"))
}

/// Everything the site needs, rebuilt from disk on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchBundle {
    pub providers: BTreeMap<Provider, ProviderResult>,
    pub initial_prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStats {
    pub provider: Provider,
    pub summary_chars: usize,
    pub full_research_chars: usize,
    pub files_found: usize,
    pub files_missing: Vec<String>,
    pub files_unreadable: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub bundle: ResearchBundle,
    pub stats: Vec<ProviderStats>,
    pub initial_prompt_found: bool,
}

impl Collection {
    /// True when not a single provider file was found under the root.
    pub fn is_empty_corpus(&self) -> bool {
        self.stats.iter().all(|s| s.files_found == 0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileReport {
    /// `None` when the artifact went to stdout.
    pub output: Option<PathBuf>,
    pub bytes: usize,
    pub providers: Vec<ProviderStats>,
    pub initial_prompt_found: bool,
    pub initial_prompt_chars: usize,
}

impl CompileReport {
    pub fn to_json(&self) -> Result<String, CompileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Turns the research corpus under `root` into the site's data file.
///
/// Every relative path in the config resolves against `root`; the process
/// working directory is never consulted or changed.
#[derive(Debug, Clone)]
pub struct Compiler {
    root: PathBuf,
    config: Config,
    sanitizer: Sanitizer,
}

impl Compiler {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Result<Self, CompileError> {
        if !js_identifier().is_match(&config.global_name) {
            return Err(CompileError::GlobalName(config.global_name));
        }
        let sanitizer = Sanitizer::new(config.strip_line_patterns.as_slice())?;
        Ok(Self {
            root: root.into(),
            config,
            sanitizer,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.output_file)
    }

    pub fn collect(&self) -> Collection {
        self.collect_with_progress(|_| {})
    }

    /// Run every extractor once, in provider order, then read the prompt.
    /// `on_step` is called with a label before each of the six reads.
    pub fn collect_with_progress(&self, mut on_step: impl FnMut(&str)) -> Collection {
        let opts = ExtractOptions {
            sanitizer: &self.sanitizer,
            summary_chars: self.config.summary_chars,
            separator: &self.config.separator,
        };

        let mut bundle = ResearchBundle::default();
        let mut stats = Vec::with_capacity(Provider::ALL.len());

        for provider in Provider::ALL {
            on_step(provider.label());
            let desc = self.config.descriptor(provider);
            let ex = extract(&self.root, &desc, opts);

            stats.push(ProviderStats {
                provider,
                summary_chars: ex.result.summary.chars().count(),
                full_research_chars: ex.result.full_research.chars().count(),
                files_found: ex.found.len(),
                files_missing: ex.missing,
                files_unreadable: ex.unreadable,
            });
            bundle.providers.insert(provider, ex.result);
        }

        on_step("Initial prompt");
        let prompt_path = self.root.join(&self.config.initial_prompt);
        let (source, cleaned) = read_cleaned(&prompt_path, &self.sanitizer);
        if let SourceText::Unreadable(e) = &source {
            eprintln!("[research-compiler] WARN: could not read {}: {e}", prompt_path.display());
        }
        let initial_prompt_found = cleaned.is_some();
        bundle.initial_prompt = cleaned.unwrap_or_default();

        Collection {
            bundle,
            stats,
            initial_prompt_found,
        }
    }

    pub fn render(&self, collection: &Collection) -> String {
        artifact::render(&collection.bundle, &self.config.global_name)
    }

    /// Report for an artifact of `bytes` length; `output` is where it went.
    pub fn report(
        &self,
        collection: Collection,
        bytes: usize,
        output: Option<PathBuf>,
    ) -> CompileReport {
        CompileReport {
            output,
            bytes,
            initial_prompt_chars: collection.bundle.initial_prompt.chars().count(),
            initial_prompt_found: collection.initial_prompt_found,
            providers: collection.stats,
        }
    }

    /// Write the rendered artifact to the configured output, replacing it.
    pub fn write(&self, artifact: &str) -> Result<PathBuf, CompileError> {
        let path = self.output_path();
        write_artifact(&path, artifact)?;
        Ok(path)
    }

    /// Collect, render and write in one go.
    pub fn run(&self) -> Result<CompileReport, CompileError> {
        let collection = self.collect();
        let js = self.render(&collection);
        let path = self.write(&js)?;
        Ok(self.report(collection, js.len(), Some(path)))
    }
}

/// Truncate-and-write `contents` to `path`. The handle is closed on return,
/// error or not.
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), CompileError> {
    let mut file = File::create(path).map_err(|e| CompileError::write(path, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| CompileError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_non_identifier_global() {
        let cfg = Config {
            global_name: "research-data".into(),
            ..Config::default()
        };
        let err = Compiler::new(".", cfg).unwrap_err();
        assert!(matches!(err, CompileError::GlobalName(_)));
    }

    #[test]
    fn empty_root_still_writes_artifact() {
        let tmp = TempDir::new().unwrap();
        // Default layout reaches into `..`, so keep that inside the temp dir too.
        let root = tmp.path().join("website");
        std::fs::create_dir_all(&root).unwrap();
        let compiler = Compiler::new(&root, Config::default()).unwrap();
        let report = compiler.run().unwrap();

        let written = std::fs::read_to_string(root.join("data-loader.js")).unwrap();
        assert_eq!(written.len(), report.bytes);
        assert!(!report.initial_prompt_found);
        assert!(compiler.collect().is_empty_corpus());
        assert!(report.providers.iter().all(|p| p.full_research_chars == 0));
        assert_eq!(report.providers.len(), 5);
    }

    #[test]
    fn write_failure_is_structured() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config {
            output_file: PathBuf::from("no/such/dir/data-loader.js"),
            ..Config::default()
        };
        let compiler = Compiler::new(tmp.path(), cfg).unwrap();
        match compiler.run() {
            Err(CompileError::Write { path, .. }) => {
                assert!(path.ends_with("no/such/dir/data-loader.js"));
            }
            other => panic!("expected write error, got {other:?}"),
        }
    }
}
