//! Line rewriting passes for converter-produced notebook ReST.
//!
//! Pass 1 walks the raw lines with an explicit cursor, because some matches
//! consume two lines. Pass 2 smooths the result pairwise.

use std::sync::LazyLock;

use regex::Regex;

/// Marker placed in a setup cell that must not appear in the docs.
const IGNORE_MARKER: &str = "# ignore this";

/// Prefix of an image directive as emitted by the converter.
const IMAGE_DIRECTIVE: &str = ".. image:: ";

/// Marker for rendered output cells.
const PARSED_LITERAL: &str = ".. parsed-literal::";

/// Class option attached to every parsed literal.
const RESULT_CLASS_LINE: &str = "   :class: ipython-result";

/// Run both passes, anchoring the output at `unit_name`.
pub(crate) fn run_pipeline(raw: &[String], unit_name: &str) -> Vec<String> {
    let rewritten = rewrite_lines(raw, unit_name);
    insert_literal_breaks(&rewritten)
}

// ---------------------------------------------------------------------------
// Pass 1: Prompt removal, image paths, reference repair
// ---------------------------------------------------------------------------

fn rewrite_lines(raw: &[String], unit_name: &str) -> Vec<String> {
    static PROMPT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^In\[[\d ]+\]:").expect("valid regex"));

    let mut lines = vec![format!(".. _{unit_name}:")];
    let mut cursor = 0;

    while cursor < raw.len() {
        let line = raw[cursor].as_str();

        if PROMPT_RE.is_match(line) {
            // The prompt is followed by its echoed line.
            cursor += 2;
        } else if let Some(file_name) = line.strip_prefix(IMAGE_DIRECTIVE) {
            lines.push(rewrite_image_path(line, file_name, unit_name));
            cursor += 1;
        } else if line.contains(IGNORE_MARKER) {
            cursor += 2;
        } else {
            lines.push(repair_references(line));
            cursor += 1;
        }
    }

    lines
}

/// Point bare image file names at the notebook's `<unit>_files` directory.
fn rewrite_image_path(line: &str, file_name: &str, unit_name: &str) -> String {
    if line.contains('/') {
        line.to_string()
    } else {
        format!("{IMAGE_DIRECTIVE}{unit_name}_files/{file_name}")
    }
}

/// Undo the doubled backticks the converter puts around class, ref, func and meth roles.
fn repair_references(line: &str) -> String {
    static MANGLED_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r":(class|ref|func|meth):``?(.*?)``?").expect("valid regex")
    });

    MANGLED_REF_RE
        .replace_all(line, ":${1}:`${2}`")
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: Blank line after literal blocks, result class
// ---------------------------------------------------------------------------

/// Literal blocks need a blank line before body text resumes.
fn insert_literal_breaks(lines: &[String]) -> Vec<String> {
    let Some(first) = lines.first() else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(lines.len() + lines.len() / 4);
    out.push(first.clone());

    for pair in lines.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if is_indented_text(prev) && !is_blank(next) && !starts_with_space(next) {
            out.push(String::new());
        }
        out.push(next.clone());
        if next.contains(PARSED_LITERAL) {
            out.push(RESULT_CLASS_LINE.to_string());
        }
    }

    out
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn starts_with_space(line: &str) -> bool {
    line.starts_with(char::is_whitespace)
}

fn is_indented_text(line: &str) -> bool {
    !is_blank(line) && starts_with_space(line)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
