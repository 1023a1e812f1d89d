mod output;
mod progress;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use docinfer_core::{DocinferConfig, ExitCode, OutputConfig};
use docinfer_extract::enrichment::unavailable_warning;
use docinfer_extract::{AiRoute, EnrichmentPipeline, find_pdfs};

use crate::output::{print_error, print_warning, render_batch, render_metadata, to_json};
use crate::progress::{BatchProgress, Spinner};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "docinfer",
    about = "Extract metadata from PDF files using AI",
    version,
    long_about = None
)]
struct Cli {
    /// PDF file or directory to process.
    path: PathBuf,

    /// Output as JSON instead of formatted text.
    #[arg(long)]
    json: bool,

    /// Also write the JSON result to this file.
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Skip AI analysis, show embedded metadata only.
    #[arg(long)]
    no_ai: bool,

    /// Ollama model used for AI analysis [default: gemma3:4b].
    #[arg(long)]
    model: Option<String>,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,

    /// Pages of text sent to the model (1-100) [default: 10].
    #[arg(long)]
    max_pages: Option<usize>,

    /// Config file (defaults to ~/.config/docinfer/config.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ollama server URL [default: http://localhost:11434].
    #[arg(long, value_name = "URL")]
    ollama_url: Option<String>,
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let code = run(&cli)?;
    if code != ExitCode::Success {
        std::process::exit(code.code());
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DOCINFER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let output = OutputConfig {
        json_output: cli.json,
        export_path: cli.export.clone(),
        quiet: cli.quiet,
    };

    let path = cli.path.as_path();
    if !path.exists() {
        print_error(&format!("Path not found: {}", path.display()));
        return Ok(ExitCode::Failure);
    }

    if path.is_file() {
        process_single_file(path, &config, &output)
    } else if path.is_dir() {
        process_directory(path, &config, &output)
    } else {
        print_error(&format!(
            "Path is neither a file nor directory: {}",
            path.display()
        ));
        Ok(ExitCode::Failure)
    }
}

// ─── Commands ────────────────────────────────────────────────────────────────

fn process_single_file(
    path: &Path,
    config: &DocinferConfig,
    output: &OutputConfig,
) -> Result<ExitCode> {
    if !has_pdf_extension(path) {
        print_error(&format!("File is not a PDF: {}", path.display()));
        return Ok(ExitCode::Failure);
    }

    let pipeline = EnrichmentPipeline::from_config(config)?;
    let spinner = Spinner::start(
        "Analyzing with AI...",
        pipeline.ai_enabled() && output.shows_progress(),
    );
    let outcome = pipeline.process_file(path);
    drop(spinner);

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            print_error(&err.to_string());
            return Ok(ExitCode::Failure);
        }
    };

    let model = config.extraction.model.as_str();
    emit(&result, output, |result| render_metadata(result, model))?;

    if !output.json_output {
        for warning in &result.warnings {
            print_warning(warning);
        }
    }
    Ok(ExitCode::Success)
}

fn process_directory(
    dir: &Path,
    config: &DocinferConfig,
    output: &OutputConfig,
) -> Result<ExitCode> {
    let files = find_pdfs(dir)?;
    if files.is_empty() {
        print_error(&format!("No PDF files found in: {}", dir.display()));
        return Ok(ExitCode::Failure);
    }

    let pipeline = EnrichmentPipeline::from_config(config)?;
    let route = pipeline.check_ai();
    if route == AiRoute::Unavailable && !output.json_output {
        print_warning(&unavailable_warning(&config.extraction.model));
    }

    let progress = BatchProgress::new(output.shows_progress());
    let batch = pipeline.process_batch(dir, &files, route, &progress);

    emit(&batch, output, render_batch)?;
    Ok(ExitCode::Success)
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> Result<DocinferConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            DocinferConfig::load_from(path)?
        }
        None => DocinferConfig::load()?,
    };
    config.apply_env_overrides(|key| std::env::var(key).ok());
    apply_cli_overrides(cli, &mut config);
    config.validate()?;
    debug!(
        model = %config.extraction.model,
        max_pages = config.extraction.max_pages,
        skip_ai = config.extraction.skip_ai,
        ollama = %config.ollama.base_url,
        "configuration loaded"
    );
    Ok(config)
}

fn apply_cli_overrides(cli: &Cli, config: &mut DocinferConfig) {
    if let Some(model) = &cli.model {
        config.extraction.model = model.trim().to_string();
    }
    if let Some(max_pages) = cli.max_pages {
        config.extraction.max_pages = max_pages;
    }
    if let Some(url) = &cli.ollama_url {
        config.ollama.base_url = url.trim().trim_end_matches('/').to_string();
    }
    if cli.no_ai {
        config.extraction.skip_ai = true;
    }
}

/// Print the result as JSON or text, then write the export file if one was asked for.
fn emit<T, F>(value: &T, output: &OutputConfig, render_text: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let json = to_json(value)?;
    if output.json_output {
        println!("{json}");
    } else {
        print!("{}", render_text(value));
    }

    if let Some(export_path) = &output.export_path {
        fs::write(export_path, &json)
            .with_context(|| format!("failed to write {}", export_path.display()))?;
        if !output.quiet {
            println!("\nExported to: {}", export_path.display());
        }
    }
    Ok(())
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
