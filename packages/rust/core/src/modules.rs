//! Module reference pages and their generated index.
//!
//! Module discovery and docstring rendering happen outside this crate; a
//! [`ModuleCatalog`] hands over the rendered pages.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use docbuild_rst::{module_reference_index, render_lines};
use docbuild_shared::{DocBuildError, DocumentUnit, ModuleDoc, Result, RunSummary};

use crate::writer::{RstWriter, WriteReporter, write_and_report};

/// Source of rendered module documentation.
pub trait ModuleCatalog {
    /// All modules, in discovery order.
    fn modules(&self) -> Result<Vec<ModuleDoc>>;
}

/// A JSON array of [`ModuleDoc`] objects written by an introspection step.
///
/// ```json
/// [{"reference_name": "moduleNote", "lines": ["..."], "class_count": 3, "function_count": 0}]
/// ```
#[derive(Debug, Clone)]
pub struct JsonModuleCatalog {
    path: PathBuf,
}

impl JsonModuleCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModuleCatalog for JsonModuleCatalog {
    fn modules(&self) -> Result<Vec<ModuleDoc>> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| DocBuildError::io(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            DocBuildError::catalog(format!("invalid module catalog {}: {e}", self.path.display()))
        })
    }
}

/// Writes one `<reference_name>.rst` per documented module plus `index.rst`.
pub struct ModuleReferenceWriter {
    catalog: Box<dyn ModuleCatalog>,
    output_dir: PathBuf,
}

impl ModuleReferenceWriter {
    pub fn new(catalog: Box<dyn ModuleCatalog>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            output_dir: output_dir.into(),
        }
    }
}

impl RstWriter for ModuleReferenceWriter {
    fn name(&self) -> &'static str {
        "module reference"
    }

    #[instrument(skip_all, fields(output_dir = %self.output_dir.display()))]
    fn run(&self, reporter: &dyn WriteReporter) -> Result<RunSummary> {
        reporter.phase("Writing module reference");

        let mut summary = RunSummary::default();
        let mut reference_names = Vec::new();

        for module in self.catalog.modules()? {
            if !module.has_members() {
                debug!(module = %module.reference_name, "no classes or functions, skipping");
                continue;
            }
            let unit = DocumentUnit::module_reference(&module.reference_name, &self.output_dir);
            let outcome = write_and_report(&unit.target, &render_lines(&module.lines), reporter)?;
            summary.record(outcome.is_written());
            reference_names.push(module.reference_name);
        }

        let index_path = self.output_dir.join("index.rst");
        let outcome =
            write_and_report(&index_path, &module_reference_index(&reference_names), reporter)?;
        summary.record(outcome.is_written());

        info!(
            modules = reference_names.len(),
            written = summary.written,
            skipped = summary.skipped,
            "module reference complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::testing::{RecordingReporter, temp_dir};

    struct FixedCatalog(Vec<ModuleDoc>);

    impl ModuleCatalog for FixedCatalog {
        fn modules(&self) -> Result<Vec<ModuleDoc>> {
            Ok(self.0.clone())
        }
    }

    fn module(name: &str, classes: usize, functions: usize) -> ModuleDoc {
        ModuleDoc {
            reference_name: name.into(),
            lines: vec![format!(".. _{name}:"), String::new(), name.to_string()],
            class_count: classes,
            function_count: functions,
        }
    }

    fn sample_catalog() -> Box<dyn ModuleCatalog> {
        Box::new(FixedCatalog(vec![
            module("moduleStream", 4, 0),
            module("moduleBase", 1, 2),
            module("moduleExceptions", 0, 0),
        ]))
    }

    #[test]
    fn writes_documented_modules_and_sorted_index() {
        let tmp = temp_dir("docbuild-modules-test");
        let writer = ModuleReferenceWriter::new(sample_catalog(), &tmp);
        let reporter = RecordingReporter::default();

        let summary = writer.run(&reporter).unwrap();
        assert_eq!(summary, RunSummary { written: 3, skipped: 0 });

        assert_eq!(
            std::fs::read_to_string(tmp.join("moduleStream.rst")).unwrap(),
            ".. _moduleStream:\n\nmoduleStream"
        );
        assert!(!tmp.join("moduleExceptions.rst").exists());

        let index = std::fs::read_to_string(tmp.join("index.rst")).unwrap();
        assert!(index.starts_with(".. moduleReference:\n\n.. WARNING: DO NOT EDIT THIS FILE:"));
        assert!(index.ends_with("\n   moduleBase\n   moduleStream"));
        assert!(!index.contains("moduleExceptions"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn second_run_skips_everything() {
        let tmp = temp_dir("docbuild-modules-test");
        let writer = ModuleReferenceWriter::new(sample_catalog(), &tmp);

        writer.run(&RecordingReporter::default()).unwrap();
        let reporter = RecordingReporter::default();
        let summary = writer.run(&reporter).unwrap();

        assert_eq!(summary, RunSummary { written: 0, skipped: 3 });
        assert!(reporter.written_paths().is_empty());
        assert_eq!(reporter.skipped_paths().last(), Some(&tmp.join("index.rst")));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn json_catalog_loads_modules() {
        let tmp = temp_dir("docbuild-modules-test");
        let path = tmp.join("catalog.json");
        std::fs::write(
            &path,
            r#"[
                {"reference_name": "moduleNote", "lines": ["Note", "===="], "class_count": 2},
                {"reference_name": "moduleDefaults"}
            ]"#,
        )
        .unwrap();

        let modules = JsonModuleCatalog::new(&path).modules().unwrap();
        assert_eq!(modules.len(), 2);
        assert!(modules[0].has_members());
        assert!(!modules[1].has_members());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn json_catalog_rejects_malformed_file() {
        let tmp = temp_dir("docbuild-modules-test");
        let path = tmp.join("catalog.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonModuleCatalog::new(&path).modules().unwrap_err();
        assert!(matches!(err, DocBuildError::Catalog { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
