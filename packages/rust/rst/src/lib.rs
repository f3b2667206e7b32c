//! ReST post-processing for generated documentation.
//!
//! Repairs the raw ReST an external notebook converter produces, and renders
//! the generated index pages that accompany module reference files.

mod notebook;

use tracing::{debug, instrument};

/// Header lines of the generated module reference index.
const MODULE_INDEX_HEADER: &[&str] = &[
    ".. moduleReference:",
    "",
    ".. WARNING: DO NOT EDIT THIS FILE:",
    "   AUTOMATICALLY GENERATED.",
    "",
    "Module Reference",
    "================",
    "",
    ".. toctree::",
    "   :maxdepth: 1",
    "",
];

// ---------------------------------------------------------------------------
// Notebook output
// ---------------------------------------------------------------------------

/// Correct the converter's ReST output for one notebook.
///
/// The result starts with a `.. _<unit_name>:` label and has:
/// 1. Execution prompts (and the line after each) removed
/// 2. Bare image file names moved under `<unit_name>_files/`
/// 3. Setup cells marked `# ignore this` removed
/// 4. Doubled backticks in `class`/`ref`/`func`/`meth` roles collapsed
/// 5. A blank line after every literal block, and a result class on parsed literals
#[instrument(skip(raw_lines), fields(lines = raw_lines.len()))]
pub fn transform_notebook_lines(raw_lines: &[String], unit_name: &str) -> Vec<String> {
    let lines = notebook::run_pipeline(raw_lines, unit_name);
    debug!(out_lines = lines.len(), "notebook lines transformed");
    lines
}

/// Split converter output into lines, as read from disk.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A final terminator does
/// not produce a trailing empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Join lines with `\n`. No trailing newline is added.
pub fn render_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Module reference index
// ---------------------------------------------------------------------------

/// Build `index.rst` for the module reference directory.
///
/// Reference names are listed in lexicographic order under a toctree.
pub fn module_reference_index<S: AsRef<str>>(reference_names: &[S]) -> String {
    let mut names: Vec<&str> = reference_names.iter().map(AsRef::as_ref).collect();
    names.sort_unstable();

    let mut lines: Vec<String> = MODULE_INDEX_HEADER.iter().map(|l| l.to_string()).collect();
    lines.extend(names.into_iter().map(|name| format!("   {name}")));
    render_lines(&lines)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
