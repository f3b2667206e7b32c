//! Corpus reference page (`referenceCorpus.rst`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use docbuild_rst::render_lines;
use docbuild_shared::{Result, RunSummary};

use crate::walk::walk_files;
use crate::writer::{RstWriter, WriteReporter, write_and_report};

/// Output file name inside the system reference directory.
pub const CORPUS_REFERENCE_FILE: &str = "referenceCorpus.rst";

/// Produces the lines of the corpus reference page.
pub trait CorpusDocumenter {
    fn lines(&self) -> Result<Vec<String>>;
}

/// Lists every file under a corpus directory, grouped by sub-directory.
#[derive(Debug, Clone)]
pub struct CorpusDirectoryDocumenter {
    root: PathBuf,
}

impl CorpusDirectoryDocumenter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Relative file paths keyed by their parent directory, both sorted.
    ///
    /// A missing root is an error rather than an empty corpus.
    fn collect_entries(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for entry in walk_files(&self.root, |entry| !is_hidden(entry.path()))? {
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let group = relative
                .parent()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            groups
                .entry(group)
                .or_default()
                .push(relative.to_string_lossy().replace('\\', "/"));
        }

        for files in groups.values_mut() {
            files.sort();
        }
        Ok(groups)
    }
}

impl CorpusDocumenter for CorpusDirectoryDocumenter {
    fn lines(&self) -> Result<Vec<String>> {
        let groups = self.collect_entries()?;

        let mut lines: Vec<String> = [
            ".. _referenceCorpus:",
            "",
            ".. WARNING: DO NOT EDIT THIS FILE:",
            "   AUTOMATICALLY GENERATED.",
            "",
            "Corpus Reference",
            "================",
        ]
        .iter()
        .map(|l| l.to_string())
        .collect();

        for (group, files) in groups {
            lines.push(String::new());
            if !group.is_empty() {
                lines.push(group.clone());
                lines.push("-".repeat(group.chars().count()));
                lines.push(String::new());
            }
            lines.extend(files.iter().map(|f| format!("- ``{f}``")));
        }

        Ok(lines)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// Writes `referenceCorpus.rst` from a [`CorpusDocumenter`].
pub struct CorpusReferenceWriter {
    documenter: Box<dyn CorpusDocumenter>,
    output_dir: PathBuf,
}

impl CorpusReferenceWriter {
    pub fn new(documenter: Box<dyn CorpusDocumenter>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            documenter,
            output_dir: output_dir.into(),
        }
    }
}

impl RstWriter for CorpusReferenceWriter {
    fn name(&self) -> &'static str {
        "corpus reference"
    }

    #[instrument(skip_all, fields(output_dir = %self.output_dir.display()))]
    fn run(&self, reporter: &dyn WriteReporter) -> Result<RunSummary> {
        reporter.phase("Writing corpus reference");

        let rst = render_lines(&self.documenter.lines()?);
        let path = self.output_dir.join(CORPUS_REFERENCE_FILE);
        let outcome = write_and_report(&path, &rst, reporter)?;

        let mut summary = RunSummary::default();
        summary.record(outcome.is_written());
        info!(written = outcome.is_written(), "corpus reference complete");
        Ok(summary)
    }
}
