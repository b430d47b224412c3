// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Core types for tidylint results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Diagnostic severity levels reported by clang-tidy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic parsed from clang-tidy output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the diagnostic points at, as printed by the tool
    pub file: Option<PathBuf>,
    /// Line number (1-indexed, 0 = unknown, shown on the first line)
    pub line: usize,
    /// Column number (1-indexed, 0 = unknown)
    pub column: usize,
    pub severity: Severity,
    /// Human-readable description, without the check name
    pub message: String,
    /// clang-tidy check name(s), e.g. "modernize-use-nullptr"
    pub code: Option<String>,
    /// Word at the diagnostic location, for highlighting
    pub near: Option<String>,
    /// Which tool produced this diagnostic
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn new(line: usize, column: usize, message: String, severity: Severity) -> Self {
        Self {
            file: None,
            line,
            column,
            severity,
            message,
            code: None,
            near: None,
            source: None,
        }
    }

    pub fn with_file(mut self, file: PathBuf) -> Self {
        self.file = Some(file);
        self
    }

    pub fn with_code(mut self, code: String) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }
}

/// Non-diagnostic events raised while linting a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// No compilation database directory is configured.
    ConfigurationMissing,
    /// A directory is configured but holds no `compile_commands.json`.
    CompilationDatabaseNotFound { path: PathBuf },
    /// Routine stderr chatter, e.g. a header missing from the database.
    BenignToolMessage { text: String },
    /// Anything else clang-tidy printed on stderr, or a failed run.
    ToolFailure { file: Option<PathBuf>, text: String },
}

impl Report {
    /// Log level this report is emitted at.
    pub fn level(&self) -> log::Level {
        match self {
            Report::BenignToolMessage { .. } => log::Level::Info,
            _ => log::Level::Error,
        }
    }

    /// Reports about the shared configuration rather than a single file.
    /// Every file of a run raises the same one.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Report::ConfigurationMissing | Report::CompilationDatabaseNotFound { .. }
        )
    }

    /// Whether the report should be surfaced to the user as a failure.
    pub fn is_failure(&self) -> bool {
        self.level() == log::Level::Error
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::ConfigurationMissing => write!(
                f,
                "No \"compile_commands\" setting present. Please check your configuration."
            ),
            Report::CompilationDatabaseNotFound { path } => {
                write!(f, "\"{}\" is not a compilation database.", path.display())
            }
            Report::BenignToolMessage { text } => write!(f, "{}", text.trim_end()),
            Report::ToolFailure { file: Some(file), text } => {
                write!(f, "clang-tidy failed on {}: {}", file.display(), text.trim_end())
            }
            Report::ToolFailure { file: None, text } => {
                write!(f, "clang-tidy failed: {}", text.trim_end())
            }
        }
    }
}

/// Aggregated result of a tidylint run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResult {
    /// Total number of files processed
    pub total_files: usize,
    /// Number of files with diagnostics
    pub files_with_issues: usize,
    /// All diagnostics found
    pub diagnostics: Vec<Diagnostic>,
    /// Failure reports (configuration problems, tool failures)
    pub reports: Vec<Report>,
    /// Total execution time in milliseconds
    pub duration_ms: u64,
    /// Exit code: 0 = success, 1 = issues found, 2 = error
    pub exit_code: i32,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn add_report(&mut self, report: Report) {
        self.reports.push(report);
    }

    /// Calculate exit code based on results
    pub fn calculate_exit_code(&mut self) {
        self.calculate_exit_code_with_warnings(false);
    }

    /// Calculate exit code based on results, with option to fail on warnings
    pub fn calculate_exit_code_with_warnings(&mut self, fail_on_warnings: bool) {
        let has_errors = self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error);
        let has_warnings = self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning);
        let has_failures = self.reports.iter().any(Report::is_failure);

        if has_failures {
            self.exit_code = 2;
        } else if has_errors || (fail_on_warnings && has_warnings) {
            self.exit_code = 1;
        } else {
            self.exit_code = 0;
        }
    }

    /// Count files with diagnostics
    pub fn count_files_with_issues(&mut self) {
        use std::collections::HashSet;
        let unique_files: HashSet<_> = self.diagnostics.iter().map(|d| &d.file).collect();
        self.files_with_issues = unique_files.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(file: &str, severity: Severity) -> Diagnostic {
        Diagnostic::new(1, 1, "msg".to_string(), severity).with_file(PathBuf::from(file))
    }

    // ==================== Severity tests ====================

    #[test]
    fn test_severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warning), "warning");
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("note"), None);
    }

    // ==================== Diagnostic tests ====================

    #[test]
    fn test_diagnostic_builder_chaining() {
        let d = Diagnostic::new(10, 5, "unused".to_string(), Severity::Warning)
            .with_file(PathBuf::from("a.cpp"))
            .with_code("misc-unused".to_string())
            .with_source("clang-tidy".to_string());

        assert_eq!(d.file, Some(PathBuf::from("a.cpp")));
        assert_eq!(d.line, 10);
        assert_eq!(d.column, 5);
        assert_eq!(d.code.as_deref(), Some("misc-unused"));
        assert_eq!(d.near, None);
        assert_eq!(d.source.as_deref(), Some("clang-tidy"));
    }

    // ==================== Report tests ====================

    #[test]
    fn test_report_levels() {
        assert_eq!(Report::ConfigurationMissing.level(), log::Level::Error);
        assert_eq!(
            Report::BenignToolMessage {
                text: "Skipping".to_string()
            }
            .level(),
            log::Level::Info
        );
        assert!(!Report::BenignToolMessage {
            text: String::new()
        }
        .is_failure());
    }

    #[test]
    fn test_report_display_names_missing_path() {
        let report = Report::CompilationDatabaseNotFound {
            path: PathBuf::from("/build/compile_commands.json"),
        };
        assert_eq!(
            report.to_string(),
            "\"/build/compile_commands.json\" is not a compilation database."
        );
    }

    #[test]
    fn test_report_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Report::ConfigurationMissing).unwrap();
        assert_eq!(json, r#"{"kind":"configuration_missing"}"#);
    }

    // ==================== RunResult tests ====================

    #[test]
    fn test_run_result_exit_code_success() {
        let mut result = RunResult::new();
        result.calculate_exit_code();
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn test_run_result_exit_code_with_error() {
        let mut result = RunResult::new();
        result.add_diagnostic(diag("a.cpp", Severity::Error));
        result.calculate_exit_code();
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn test_run_result_exit_code_with_warning() {
        let mut result = RunResult::new();
        result.add_diagnostic(diag("a.cpp", Severity::Warning));
        result.calculate_exit_code();
        assert_eq!(result.exit_code, 0);

        result.calculate_exit_code_with_warnings(true);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn test_run_result_exit_code_failure_report() {
        let mut result = RunResult::new();
        result.add_report(Report::ConfigurationMissing);
        result.calculate_exit_code();
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn test_run_result_benign_report_keeps_success() {
        let mut result = RunResult::new();
        result.add_report(Report::BenignToolMessage {
            text: "Skipping a.h. Compile command not found.".to_string(),
        });
        result.calculate_exit_code();
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn test_run_result_count_files_with_issues() {
        let mut result = RunResult::new();
        result.add_diagnostic(diag("a.cpp", Severity::Warning));
        result.add_diagnostic(diag("a.cpp", Severity::Error));
        result.add_diagnostic(diag("b.cpp", Severity::Warning));

        result.count_files_with_issues();
        assert_eq!(result.files_with_issues, 2);
    }
}
