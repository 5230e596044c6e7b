use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use research_compiler::config::{load_config, load_config_from};
use research_compiler::{CompileReport, Compiler, Provider};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "research-compiler")]
#[command(version)]
#[command(about = "Compile provider research reports into the website's data-loader.js")]
struct Cli {
    /// Directory all corpus and output paths are relative to.
    /// Defaults to the current directory; the built-in layout expects the
    /// website folder, with provider folders one level up.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Config file (defaults to <ROOT>/.research-compiler.json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the generated file path (relative to ROOT)
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Override the summary preview length, in characters
    #[arg(long, value_name = "N")]
    summary_chars: Option<usize>,

    /// Print the artifact to stdout instead of writing it
    #[arg(long)]
    stdout: bool,

    /// Print the compile report as JSON to stdout
    #[arg(long, conflicts_with = "stdout")]
    json: bool,

    /// No progress bar or count lines
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn print_counts(report: &CompileReport, to_stderr: bool) {
    for stats in &report.providers {
        let line = format!(
            "{} research: {} chars",
            stats.provider.label(),
            stats.full_research_chars
        );
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

/// A reader that hangs up early (`| head`) is not an error.
fn write_stdout(text: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    match out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e).context("Failed to write artifact to stdout"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = match cli.root {
        Some(r) => r,
        None => std::env::current_dir().context("Failed to get current dir")?,
    };

    let mut cfg = match cli.config.as_ref() {
        Some(p) => {
            let path = root.join(p);
            load_config_from(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => load_config(&root),
    };
    if let Some(output) = cli.output {
        cfg.output_file = output;
    }
    if let Some(n) = cli.summary_chars {
        cfg.summary_chars = n;
    }

    let compiler = Compiler::new(root, cfg).context("Invalid configuration")?;

    // Human-readable lines move to stderr when stdout carries data.
    let to_stderr = cli.stdout || cli.json;
    if !cli.quiet {
        if to_stderr {
            eprintln!("Compiling research data...");
        } else {
            println!("Compiling research data...");
        }
    }

    let bar = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new((Provider::ALL.len() + 1) as u64);
        bar.set_style(ProgressStyle::with_template("{spinner} [{pos}/{len}] reading {msg}")?);
        bar
    };
    let collection = compiler.collect_with_progress(|label| {
        bar.set_message(label.to_string());
        bar.inc(1);
    });
    bar.finish_and_clear();

    if collection.is_empty_corpus() {
        eprintln!(
            "[research-compiler] WARN: no research files found under {}; \
             is --root the website directory?",
            compiler.root().display()
        );
    }

    let js = compiler.render(&collection);
    let report = if cli.stdout {
        write_stdout(&js)?;
        compiler.report(collection, js.len(), None)
    } else {
        let path = compiler.write(&js)?;
        compiler.report(collection, js.len(), Some(path))
    };

    if cli.json {
        println!("{}", report.to_json()?);
    }

    if !cli.quiet {
        if to_stderr {
            eprintln!("Research data compiled successfully!");
        } else {
            println!("Research data compiled successfully!");
        }
        print_counts(&report, to_stderr);
        if !report.initial_prompt_found {
            eprintln!(
                "[research-compiler] WARN: initial prompt not found at {}",
                compiler.root().join(&compiler.config().initial_prompt).display()
            );
        }
    }

    Ok(())
}
