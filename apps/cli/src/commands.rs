//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use docbuild_core::{
    CommandConverter, CorpusDirectoryDocumenter, CorpusReferenceWriter, JsonModuleCatalog,
    ModuleReferenceWriter, NotebookDirectory, NotebookPaths, NotebookSource, NotebookWriter,
    RstWriter, WriteReporter,
};
use docbuild_shared::{AppConfig, RunSummary, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docbuild: regenerate documentation ReST from notebooks and module docs.
#[derive(Parser)]
#[command(
    name = "docbuild",
    version,
    about = "Convert notebooks and module documentation into ReST for the documentation site.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.docbuild/docbuild.toml.
    #[arg(long, global = true, env = "DOCBUILD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert notebooks to ReST.
    Notebooks {
        /// Notebooks to convert. Defaults to every notebook under the configured directory.
        paths: Vec<PathBuf>,
    },

    /// Write module reference pages and their index.
    Modules,

    /// Write the corpus reference page.
    Corpus,

    /// Run every writer: modules, corpus, then notebooks.
    All,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// the per-file report.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = format!(
        "docbuild={level},docbuild_core={level},docbuild_rst={level},docbuild_shared={level}"
    );

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let load = || resolve_config(config_path);

    match cli.command {
        Command::Notebooks { paths } => run_writers(&[notebook_writer(&load()?, paths)]),
        Command::Modules => run_writers(&[module_writer(&load()?)]),
        Command::Corpus => run_writers(&[corpus_writer(&load()?)]),
        Command::All => {
            let config = load()?;
            run_writers(&[
                module_writer(&config),
                corpus_writer(&config),
                notebook_writer(&config, Vec::new()),
            ])
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

fn module_writer(config: &AppConfig) -> Box<dyn RstWriter> {
    Box::new(ModuleReferenceWriter::new(
        Box::new(JsonModuleCatalog::new(&config.paths.module_catalog)),
        &config.paths.module_reference_dir,
    ))
}

fn corpus_writer(config: &AppConfig) -> Box<dyn RstWriter> {
    Box::new(CorpusReferenceWriter::new(
        Box::new(CorpusDirectoryDocumenter::new(&config.paths.corpus_dir)),
        &config.paths.system_reference_dir,
    ))
}

fn notebook_writer(config: &AppConfig, paths: Vec<PathBuf>) -> Box<dyn RstWriter> {
    let source: Box<dyn NotebookSource> = if paths.is_empty() {
        Box::new(NotebookDirectory::new(&config.paths.notebook_dir))
    } else {
        Box::new(NotebookPaths(paths))
    };
    Box::new(NotebookWriter::new(
        source,
        Box::new(CommandConverter::from(&config.converter)),
    ))
}

fn run_writers(writers: &[Box<dyn RstWriter>]) -> Result<()> {
    let reporter = CliReporter::new();
    let mut total = RunSummary::default();

    for writer in writers {
        info!(writer = writer.name(), "running writer");
        match writer.run(&reporter) {
            Ok(summary) => total.merge(summary),
            Err(e) => {
                reporter.finish();
                return Err(e).wrap_err_with(|| format!("{} failed", writer.name()));
            }
        }
    }

    reporter.finish();
    info!(
        written = total.written,
        skipped = total.skipped,
        "documentation build complete"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI reporter
// ---------------------------------------------------------------------------

/// Prints `WROTE`/`SKIPPED` lines under an indicatif spinner.
struct CliReporter {
    spinner: ProgressBar,
    cwd: Option<PathBuf>,
}

impl CliReporter {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self {
            spinner,
            cwd: std::env::current_dir().ok(),
        }
    }

    fn report(&self, label: &str, path: &Path) {
        let shown = display_path(path, self.cwd.as_deref());
        self.spinner.suspend(|| println!("{}", report_line(label, &shown)));
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl WriteReporter for CliReporter {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn wrote(&self, path: &Path) {
        self.report("WROTE", path);
    }

    fn skipped(&self, path: &Path) {
        self.report("SKIPPED", path);
    }
}

/// One report line: a tab, the label padded to seven columns, then the path.
fn report_line(label: &str, shown: &str) -> String {
    format!("\t{label:<7} {shown}")
}

/// Show `path` relative to the working directory when it lies below it.
fn display_path(path: &Path, cwd: Option<&Path>) -> String {
    cwd.and_then(|cwd| path.strip_prefix(cwd).ok())
        .unwrap_or(path)
        .display()
        .to_string()
}

// ---------------------------------------------------------------------------
// Config handlers
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created config at {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let rendered = toml::to_string_pretty(&config)?;
    println!("{rendered}");
    Ok(())
}
