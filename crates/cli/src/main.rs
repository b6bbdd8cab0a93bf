//! Refdoc command line
//!
//! Loads package type facts from a directory, builds the documented type
//! graph and renders it as an API reference.
//!
//! ```text
//! refdoc --source-path facts/ --renderer markdown --output-path docs/
//! refdoc --source-path facts/ --templates-dir templates/ --output-mode group
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use refdoc_processor::process;
use refdoc_render::{OutputMode, OutputOptions};
use refdoc_source::SourceSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod config;

use config::Config;

/// Generate API reference documentation from package type facts
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the TOML config file [default: refdoc.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory containing the package fact files
    #[arg(long)]
    source_path: PathBuf,

    /// Renderer to use ('asciidoctor', 'markdown' or 'json')
    #[arg(long, default_value = "asciidoctor")]
    renderer: String,

    /// Directory of handlebars templates overriding the built-in ones
    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// Path to output the rendered result
    #[arg(long, default_value = ".")]
    output_path: PathBuf,

    /// Generate a single file or one file per group ('single' or 'group')
    #[arg(long, default_value = "single")]
    output_mode: OutputMode,

    /// Maximum recursion level for type discovery, overrides the config file
    #[arg(long)]
    max_depth: Option<usize>,

    /// Log level (error, warn, info, debug, trace), RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.as_str()),
    )
    .target(env_logger::Target::Stderr)
    .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    log::info!(
        "Loading configuration from {}",
        cli.config
            .as_deref()
            .unwrap_or_else(|| Path::new(config::DEFAULT_CONFIG_PATH))
            .display()
    );
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(max_depth) = cli.max_depth {
        config.processor.max_depth = max_depth;
    }
    if let Some(templates_dir) = cli.templates_dir {
        config.render.templates_dir = Some(templates_dir);
    }

    let output = OutputOptions {
        path: cli.output_path,
        mode: cli.output_mode,
    };
    let renderer = refdoc_render::new(&cli.renderer, &config.render, output.clone())
        .context("Failed to create renderer")?;

    let start = Instant::now();

    log::info!(
        "Processing source directory {} (max depth {})",
        cli.source_path.display(),
        config.processor.max_depth
    );
    let source = SourceSet::load_dir(&cli.source_path).with_context(|| {
        format!("Failed to load package facts from {}", cli.source_path.display())
    })?;
    let model = process(&source, &config.processor).context("Failed to process source directory")?;
    for diagnostic in &model.diagnostics {
        log::debug!("{diagnostic}");
    }
    if !model.diagnostics.is_empty() {
        log::warn!(
            "{} types could not be fully resolved, rerun with --log-level debug for details",
            model.diagnostics.len()
        );
    }

    log::info!("Rendering output to {} ({} mode)", output.path.display(), output.mode);
    renderer.render(&model).context("Failed to render")?;

    log::info!("API reference documentation generated");
    log::info!("Execution time: {:?}", start.elapsed());
    Ok(())
}
