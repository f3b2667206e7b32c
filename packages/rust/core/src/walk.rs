//! Directory walking shared by the corpus and notebook sources.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use docbuild_shared::{DocBuildError, Result};

/// Every regular file below `root`, in walk order.
///
/// A root that is not a directory and any error met while walking are
/// returned as [`DocBuildError::Io`]. `keep` prunes entries below the root,
/// so a rejected directory is not descended into.
pub(crate) fn walk_files<F>(root: &Path, keep: F) -> Result<Vec<DirEntry>>
where
    F: FnMut(&DirEntry) -> bool,
{
    if !root.is_dir() {
        return Err(DocBuildError::io(
            root,
            std::io::Error::new(ErrorKind::NotFound, "directory not found"),
        ));
    }

    let mut keep = keep;
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || keep(entry))
    {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_file() {
            files.push(entry);
        }
    }
    Ok(files)
}

fn walk_error(root: &Path, err: walkdir::Error) -> DocBuildError {
    let path = err.path().map_or_else(|| root.to_path_buf(), PathBuf::from);
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    DocBuildError::io(path, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::testing::temp_dir;

    #[test]
    fn missing_root_is_io_error() {
        let tmp = temp_dir("docbuild-walk-test");
        let err = walk_files(&tmp.join("absent"), |_| true).unwrap_err();
        match err {
            DocBuildError::Io { path, source } => {
                assert_eq!(path, tmp.join("absent"));
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_root_is_io_error() {
        let tmp = temp_dir("docbuild-walk-test");
        let file = tmp.join("corpus.txt");
        std::fs::write(&file, "").unwrap();

        assert!(matches!(
            walk_files(&file, |_| true),
            Err(DocBuildError::Io { .. })
        ));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn pruned_directories_are_not_descended() {
        let tmp = temp_dir("docbuild-walk-test");
        std::fs::create_dir_all(tmp.join("skip")).unwrap();
        std::fs::write(tmp.join("skip/inner"), "").unwrap();
        std::fs::write(tmp.join("top"), "").unwrap();

        let files = walk_files(&tmp, |e| e.file_name() != "skip").unwrap();
        let paths: Vec<PathBuf> = files.into_iter().map(DirEntry::into_path).collect();
        assert_eq!(paths, vec![tmp.join("top")]);

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
