//! Core domain types shared by the writers and the CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a single content-compared write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was absent or differed, and the new content was written.
    Written,
    /// The file already held exactly this content; nothing was touched.
    Skipped,
}

impl WriteOutcome {
    pub fn is_written(self) -> bool {
        matches!(self, Self::Written)
    }
}

/// Result of converting one notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotebookOutcome {
    /// The converter ran and the `.rst` file was rewritten.
    Converted,
    /// The path names an editor autosave artifact.
    SkippedCheckpoint,
    /// The existing `.rst` is newer than the notebook.
    SkippedStale,
}

impl NotebookOutcome {
    pub fn is_converted(self) -> bool {
        matches!(self, Self::Converted)
    }
}

/// Written/skipped tally for one writer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
}

impl RunSummary {
    /// Count one outcome.
    pub fn record(&mut self, written: bool) {
        if written {
            self.written += 1;
        } else {
            self.skipped += 1;
        }
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: RunSummary) {
        self.written += other.written;
        self.skipped += other.skipped;
    }
}

// ---------------------------------------------------------------------------
// DocumentUnit
// ---------------------------------------------------------------------------

/// One source of content and where its ReST output lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUnit {
    /// Module catalog entry name or notebook file path.
    pub source: PathBuf,
    /// Target `.rst` path.
    pub target: PathBuf,
}

impl DocumentUnit {
    /// A notebook unit: `<dir>/<stem>.ipynb` maps to `<dir>/<stem>.rst`.
    pub fn notebook(path: impl Into<PathBuf>) -> Self {
        let source = path.into();
        let target = source.with_extension("rst");
        Self { source, target }
    }

    /// A module reference unit: `<dir>/<reference_name>.rst`.
    pub fn module_reference(reference_name: &str, output_dir: &Path) -> Self {
        Self {
            source: PathBuf::from(reference_name),
            target: output_dir.join(format!("{reference_name}.rst")),
        }
    }

    /// File stem of the source, used as the ReST label and asset prefix.
    pub fn stem(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The `<stem>_files` directory beside the source.
    pub fn assets_dir(&self) -> PathBuf {
        let parent = self.source.parent().unwrap_or(Path::new(""));
        parent.join(format!("{}_files", self.stem()))
    }
}

// ---------------------------------------------------------------------------
// ModuleDoc
// ---------------------------------------------------------------------------

/// Rendered documentation for one module, as produced by an introspection step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDoc {
    /// Reference name, also the output file stem (e.g. `moduleStream`).
    pub reference_name: String,
    /// Rendered ReST body, one entry per line.
    #[serde(default)]
    pub lines: Vec<String>,
    /// Number of documented classes.
    #[serde(default)]
    pub class_count: usize,
    /// Number of documented functions.
    #[serde(default)]
    pub function_count: usize,
}

impl ModuleDoc {
    /// Modules with neither classes nor functions get no reference page.
    pub fn has_members(&self) -> bool {
        self.class_count > 0 || self.function_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notebook_unit_paths() {
        let unit = DocumentUnit::notebook("docs/source/usersGuide/usersGuide_02.ipynb");
        assert_eq!(
            unit.target,
            PathBuf::from("docs/source/usersGuide/usersGuide_02.rst")
        );
        assert_eq!(unit.stem(), "usersGuide_02");
        assert_eq!(
            unit.assets_dir(),
            PathBuf::from("docs/source/usersGuide/usersGuide_02_files")
        );
    }

    #[test]
    fn module_reference_unit_target() {
        let unit = DocumentUnit::module_reference("moduleStream", Path::new("out/moduleReference"));
        assert_eq!(unit.target, PathBuf::from("out/moduleReference/moduleStream.rst"));
        assert_eq!(unit.stem(), "moduleStream");
    }

    #[test]
    fn module_doc_members() {
        let doc: ModuleDoc =
            toml::from_str("reference_name = \"moduleBase\"\nlines = [\"Base\", \"====\"]")
                .expect("deserialize module doc");
        assert_eq!(doc.lines.len(), 2);
        assert!(!doc.has_members());

        let doc = ModuleDoc {
            function_count: 1,
            ..doc
        };
        assert!(doc.has_members());
    }

    #[test]
    fn run_summary_tally() {
        let mut summary = RunSummary::default();
        summary.record(true);
        summary.record(false);
        summary.record(false);
        summary.merge(RunSummary {
            written: 2,
            skipped: 0,
        });
        assert_eq!(summary.written, 3);
        assert_eq!(summary.skipped, 2);
    }
}
