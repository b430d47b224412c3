// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Filtering clang-tidy's stderr for actual errors.

use crate::host::DiagnosticSink;
use crate::utils::types::Report;
use regex::Regex;
use std::path::Path;

lazy_static::lazy_static! {
    // Printed for every header that is not in the compilation database.
    static ref SKIPPING_RE: Regex =
        Regex::new(r"^Skipping .+\. Compile command not found\.").unwrap();
    static ref GENERATED_RE: Regex =
        Regex::new(r"(?m)^\d+.+(warning|error).+generated\.[ \t]*(\r?\n|$)").unwrap();
    static ref PROCESSING_RE: Regex =
        Regex::new(r"(?m)^Error while processing .+\.[ \t]*(\r?\n|$)").unwrap();
}

/// Verdict on a chunk of stderr text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Routine "compile command not found" message.
    Benign(String),
    /// Nothing left after removing the summary lines.
    Suppressed,
    /// Remaining text after stripping, returned verbatim.
    Reported(String),
}

impl Classification {
    pub fn is_suppressed(&self) -> bool {
        !matches!(self, Classification::Reported(_))
    }
}

/// Remove the `N warnings generated.` and `Error while processing ...` lines.
pub fn strip_boilerplate(stderr: &str) -> String {
    let stripped = GENERATED_RE.replace_all(stderr, "");
    PROCESSING_RE.replace_all(&stripped, "").into_owned()
}

pub fn classify(stderr: &str) -> Classification {
    if SKIPPING_RE.is_match(stderr) {
        return Classification::Benign(stderr.to_string());
    }

    let remaining = strip_boilerplate(stderr);
    if remaining.trim().is_empty() {
        Classification::Suppressed
    } else {
        Classification::Reported(remaining)
    }
}

/// Classify `stderr` from a run on `file` and send the matching report.
pub fn classify_and_report(
    stderr: &str,
    file: Option<&Path>,
    sink: &dyn DiagnosticSink,
) -> Classification {
    let classification = classify(stderr);
    match &classification {
        Classification::Benign(text) => sink.report(Report::BenignToolMessage { text: text.clone() }),
        Classification::Reported(text) => sink.report(Report::ToolFailure {
            file: file.map(Path::to_path_buf),
            text: text.clone(),
        }),
        Classification::Suppressed => {}
    }
    classification
}
