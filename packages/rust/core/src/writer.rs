//! Content-compared file writes and the writer abstraction.
//!
//! Every generated page goes through [`write_if_changed`], so an unchanged
//! page keeps its modification time and the site generator does not rebuild it.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, instrument};

use docbuild_shared::{DocBuildError, Result, RunSummary, WriteOutcome};

/// Receives per-unit outcomes while a writer runs.
pub trait WriteReporter {
    /// Called when a writer starts a new phase.
    fn phase(&self, name: &str);
    /// Called after a unit was written.
    fn wrote(&self, path: &Path);
    /// Called after a unit was skipped, for any reason.
    fn skipped(&self, path: &Path);
}

/// No-op reporter for headless/test usage.
pub struct SilentReporter;

impl WriteReporter for SilentReporter {
    fn phase(&self, _name: &str) {}
    fn wrote(&self, _path: &Path) {}
    fn skipped(&self, _path: &Path) {}
}

/// A generator of one family of ReST files.
pub trait RstWriter {
    /// Short name used for logging and progress.
    fn name(&self) -> &'static str;

    /// Generate and persist every unit, reporting each outcome.
    fn run(&self, reporter: &dyn WriteReporter) -> Result<RunSummary>;
}

/// Write `content` to `path` unless the file already holds exactly that content.
///
/// The parent directory must exist. Read and write failures are returned as
/// [`DocBuildError::Io`].
#[instrument(skip_all, fields(path = %path.display(), len = content.len()))]
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteOutcome> {
    match std::fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => {
            debug!("content unchanged");
            return Ok(WriteOutcome::Skipped);
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(DocBuildError::io(path, e)),
    }

    std::fs::write(path, content).map_err(|e| DocBuildError::io(path, e))?;
    debug!("content written");
    Ok(WriteOutcome::Written)
}

/// [`write_if_changed`], then report the outcome.
pub fn write_and_report(
    path: &Path,
    content: &str,
    reporter: &dyn WriteReporter,
) -> Result<WriteOutcome> {
    let outcome = write_if_changed(path, content)?;
    match outcome {
        WriteOutcome::Written => reporter.wrote(path),
        WriteOutcome::Skipped => reporter.skipped(path),
    }
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;

    /// Reporter that remembers every outcome in order.
    #[derive(Default)]
    pub(crate) struct RecordingReporter {
        events: Mutex<Vec<(bool, PathBuf)>>,
    }

    impl RecordingReporter {
        pub(crate) fn written_paths(&self) -> Vec<PathBuf> {
            self.filtered(true)
        }

        pub(crate) fn skipped_paths(&self) -> Vec<PathBuf> {
            self.filtered(false)
        }

        fn filtered(&self, written: bool) -> Vec<PathBuf> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|(w, _)| *w == written)
                .map(|(_, p)| p.clone())
                .collect()
        }
    }

    impl WriteReporter for RecordingReporter {
        fn phase(&self, _name: &str) {}

        fn wrote(&self, path: &Path) {
            self.events.lock().unwrap().push((true, path.to_path_buf()));
        }

        fn skipped(&self, path: &Path) {
            self.events.lock().unwrap().push((false, path.to_path_buf()));
        }
    }

    pub(crate) fn temp_dir(prefix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Push a file's modification time into the past.
    pub(crate) fn age_file(path: &Path, secs: u64) {
        let when = std::time::SystemTime::now() - std::time::Duration::from_secs(secs);
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(when)
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn mtime(path: &Path) -> std::time::SystemTime {
        std::fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn writes_new_file() {
        let tmp = temp_dir("docbuild-writer-test");
        let path = tmp.join("index.rst");

        let outcome = write_if_changed(&path, "Title\n=====").unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Title\n=====");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn identical_content_is_skipped_and_untouched() {
        let tmp = temp_dir("docbuild-writer-test");
        let path = tmp.join("moduleNote.rst");
        std::fs::write(&path, "same").unwrap();
        age_file(&path, 3600);
        let before = mtime(&path);

        let outcome = write_if_changed(&path, "same").unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(mtime(&path), before);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn differing_content_is_overwritten() {
        let tmp = temp_dir("docbuild-writer-test");
        let path = tmp.join("moduleNote.rst");
        std::fs::write(&path, "old body\n").unwrap();

        let outcome = write_if_changed(&path, "old body").unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old body");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_parent_is_io_error() {
        let tmp = temp_dir("docbuild-writer-test");
        let path = tmp.join("no-such-dir").join("index.rst");

        let err = write_if_changed(&path, "x").unwrap_err();
        assert!(matches!(err, DocBuildError::Io { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_and_report_reports_both_outcomes() {
        let tmp = temp_dir("docbuild-writer-test");
        let path = tmp.join("referenceCorpus.rst");
        let reporter = RecordingReporter::default();

        write_and_report(&path, "corpus", &reporter).unwrap();
        write_and_report(&path, "corpus", &reporter).unwrap();

        assert_eq!(reporter.written_paths(), vec![path.clone()]);
        assert_eq!(reporter.skipped_paths(), vec![path]);

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
