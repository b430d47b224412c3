// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Parsing clang-tidy's stdout into diagnostics.
//!
//! Format: `file:line:col: (error|warning): message [check-name]`
//!
//! The location prefix is mandatory. `note:` lines, code excerpts and caret
//! lines do not match and are ignored.

use crate::utils::read_file_line;
use crate::utils::types::{Diagnostic, Severity};
use regex::Regex;
use std::path::PathBuf;

/// Value of [`Diagnostic::source`] for parsed diagnostics.
pub const SOURCE: &str = "clang-tidy";

lazy_static::lazy_static! {
    static ref DIAGNOSTIC_RE: Regex = Regex::new(
        r"^(?P<file>.+?):(?P<line>\d+):(?P<col>\d+): (?P<severity>error|warning): (?P<message>.+)$"
    )
    .unwrap();
    static ref CHECK_NAME_RE: Regex =
        Regex::new(r"^(?P<message>.*\S)\s+\[(?P<code>[-\w.,]+)\]$").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"^([-\w:#]+)").unwrap();
}

/// Parse a single line of clang-tidy output.
///
/// A line number that does not fit in `usize` becomes 0 so the diagnostic
/// still shows up, attached to the first line. Same for the column.
pub fn parse_line(line: &str) -> Option<Diagnostic> {
    let line = line.trim_end_matches(['\r', '\n']);
    let caps = DIAGNOSTIC_RE.captures(line)?;

    let line_num = caps["line"].parse::<usize>().unwrap_or(0);
    let column = caps["col"].parse::<usize>().unwrap_or(0);
    let severity = Severity::parse(&caps["severity"])?;

    let (message, code) = split_check_name(&caps["message"]);

    let mut diagnostic = Diagnostic::new(line_num, column, message, severity)
        .with_file(PathBuf::from(&caps["file"]))
        .with_source(SOURCE.to_string());
    if let Some(c) = code {
        diagnostic = diagnostic.with_code(c);
    }

    Some(diagnostic)
}

/// Parse clang-tidy stdout, one diagnostic per matching line.
pub fn parse_output(output: &str) -> Vec<Diagnostic> {
    output.lines().filter_map(parse_line).collect()
}

/// Split a trailing ` [check-a,check-b]` off the message.
fn split_check_name(message: &str) -> (String, Option<String>) {
    match CHECK_NAME_RE.captures(message) {
        Some(caps) => (caps["message"].to_string(), Some(caps["code"].to_string())),
        None => (message.to_string(), None),
    }
}

/// Word starting at 1-indexed byte `column` of `source_line`.
pub fn word_at(source_line: &str, column: usize) -> Option<String> {
    if column == 0 {
        return None;
    }
    let rest = source_line.get(column - 1..)?;
    WORD_RE.captures(rest).map(|caps| caps[1].to_string())
}

/// Fill [`Diagnostic::near`] from the source file, best effort.
pub fn attach_near(diagnostic: &mut Diagnostic) {
    if diagnostic.near.is_some() {
        return;
    }
    let word = diagnostic
        .file
        .as_deref()
        .and_then(|file| read_file_line(file, diagnostic.line))
        .and_then(|text| word_at(&text, diagnostic.column));
    diagnostic.near = word;
}
