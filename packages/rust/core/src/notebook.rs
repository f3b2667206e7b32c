//! Notebook to ReST conversion driver.
//!
//! Wraps an external converter that writes `<stem>.rst` (and images under
//! `<stem>_files/`) beside each notebook, then repairs that output in place.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, instrument};

use docbuild_rst::{render_lines, split_lines, transform_notebook_lines};
use docbuild_shared::{
    ConverterConfig, DocBuildError, DocumentUnit, NotebookOutcome, Result, RunSummary,
};

use crate::walk::walk_files;
use crate::writer::{RstWriter, WriteReporter};

/// File name fragment of editor autosave copies.
const CHECKPOINT_MARKER: &str = "-checkpoint";

/// Extension of throwaway files the converter leaves in `<stem>_files/`.
const AUXILIARY_EXTENSION: &str = "text";

const NOTEBOOK_EXTENSION: &str = "ipynb";

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// External notebook-to-ReST converter.
pub trait NotebookConverter {
    /// Convert `notebook`, leaving `<stem>.rst` in the notebook's directory.
    fn convert(&self, notebook: &Path) -> Result<()>;
}

/// Runs a converter program such as `jupyter nbconvert --to rst <notebook>`.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    command: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

impl From<&ConverterConfig> for CommandConverter {
    fn from(config: &ConverterConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }
}

impl NotebookConverter for CommandConverter {
    #[instrument(skip(self), fields(cmd = %self.command))]
    fn convert(&self, notebook: &Path) -> Result<()> {
        let status = Command::new(&self.command)
            .args(&self.args)
            .arg(notebook)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit()) // Converter logs go to parent stderr
            .status()
            .map_err(|e| {
                DocBuildError::Converter(format!(
                    "failed to run converter: {e}. Is `{}` installed?",
                    self.command
                ))
            })?;

        if !status.success() {
            return Err(DocBuildError::Converter(format!(
                "`{}` exited with {status} for {}",
                self.command,
                notebook.display()
            )));
        }
        Ok(())
    }
}

/// Enumerates the notebooks to convert.
pub trait NotebookSource {
    fn notebooks(&self) -> Result<Vec<PathBuf>>;
}

/// Every `*.ipynb` below a directory, sorted by path. The directory must exist.
#[derive(Debug, Clone)]
pub struct NotebookDirectory {
    root: PathBuf,
}

impl NotebookDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl NotebookSource for NotebookDirectory {
    fn notebooks(&self) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = walk_files(&self.root, |_| true)?
            .into_iter()
            .filter(|entry| {
                entry.path().extension().and_then(|e| e.to_str()) == Some(NOTEBOOK_EXTENSION)
            })
            .map(walkdir::DirEntry::into_path)
            .collect();
        paths.sort();
        debug!(root = %self.root.display(), count = paths.len(), "notebooks found");
        Ok(paths)
    }
}

/// An explicit list of notebooks, converted in the given order.
#[derive(Debug, Clone)]
pub struct NotebookPaths(pub Vec<PathBuf>);

impl NotebookSource for NotebookPaths {
    fn notebooks(&self) -> Result<Vec<PathBuf>> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Single notebook
// ---------------------------------------------------------------------------

/// Convert one notebook and repair the generated ReST.
///
/// Returns [`NotebookOutcome::SkippedCheckpoint`] for autosave copies and
/// [`NotebookOutcome::SkippedStale`] when the `.rst` is already newer than
/// the notebook; the converter is not invoked in either case. A missing
/// notebook is [`DocBuildError::NotebookNotFound`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn convert_one(path: &Path, converter: &dyn NotebookConverter) -> Result<NotebookOutcome> {
    if path.to_string_lossy().contains(CHECKPOINT_MARKER) {
        debug!("checkpoint file");
        return Ok(NotebookOutcome::SkippedCheckpoint);
    }
    if !path.exists() {
        return Err(DocBuildError::notebook_not_found(path));
    }

    let unit = DocumentUnit::notebook(path);
    if rst_is_newer(&unit)? {
        debug!(rst = %unit.target.display(), "rst newer than notebook");
        return Ok(NotebookOutcome::SkippedStale);
    }

    converter.convert(&unit.source)?;

    let raw = std::fs::read_to_string(&unit.target)
        .map_err(|e| DocBuildError::io(&unit.target, e))?;
    let lines = transform_notebook_lines(&split_lines(&raw), &unit.stem());
    std::fs::write(&unit.target, render_lines(&lines))
        .map_err(|e| DocBuildError::io(&unit.target, e))?;

    let removed = cleanup_assets(&unit.assets_dir())?;
    debug!(removed, "auxiliary files removed");

    Ok(NotebookOutcome::Converted)
}

fn rst_is_newer(unit: &DocumentUnit) -> Result<bool> {
    let rst_meta = match std::fs::metadata(&unit.target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(DocBuildError::io(&unit.target, e)),
    };
    let rst_time = rst_meta
        .modified()
        .map_err(|e| DocBuildError::io(&unit.target, e))?;
    let notebook_time = std::fs::metadata(&unit.source)
        .and_then(|m| m.modified())
        .map_err(|e| DocBuildError::io(&unit.source, e))?;
    Ok(rst_time > notebook_time)
}

/// Delete `*.text` files in the assets directory. A missing directory is fine.
fn cleanup_assets(assets_dir: &Path) -> Result<usize> {
    let entries = match std::fs::read_dir(assets_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(DocBuildError::io(assets_dir, e)),
    };

    let mut removed = 0;
    for entry in entries {
        let path = entry.map_err(|e| DocBuildError::io(assets_dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) == Some(AUXILIARY_EXTENSION) {
            std::fs::remove_file(&path).map_err(|e| DocBuildError::io(&path, e))?;
            removed += 1;
        }
    }
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Converts every notebook from a [`NotebookSource`].
pub struct NotebookWriter {
    source: Box<dyn NotebookSource>,
    converter: Box<dyn NotebookConverter>,
}

impl NotebookWriter {
    pub fn new(source: Box<dyn NotebookSource>, converter: Box<dyn NotebookConverter>) -> Self {
        Self { source, converter }
    }
}

impl RstWriter for NotebookWriter {
    fn name(&self) -> &'static str {
        "notebooks"
    }

    #[instrument(skip_all)]
    fn run(&self, reporter: &dyn WriteReporter) -> Result<RunSummary> {
        reporter.phase("Converting notebooks");

        let mut summary = RunSummary::default();
        for path in self.source.notebooks()? {
            let outcome = convert_one(&path, self.converter.as_ref())?;
            // Both skip kinds are reported the same way.
            if outcome.is_converted() {
                reporter.wrote(&path);
            } else {
                reporter.skipped(&path);
            }
            summary.record(outcome.is_converted());
        }

        info!(
            converted = summary.written,
            skipped = summary.skipped,
            "notebook conversion complete"
        );
        Ok(summary)
    }
}
