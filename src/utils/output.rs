// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Output formatting utilities for tidylint results.

use crate::utils::types::{Diagnostic, Report, RunResult, Severity};
use colored::Colorize;

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    GithubActions,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            "github-actions" | "github" | "ga" => Some(OutputFormat::GithubActions),
            _ => None,
        }
    }
}

fn location(diagnostic: &Diagnostic) -> String {
    let file = diagnostic
        .file
        .as_ref()
        .map(|f| f.display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string());
    if diagnostic.column > 0 {
        format!("{}:{}:{}", file, diagnostic.line, diagnostic.column)
    } else {
        format!("{}:{}", file, diagnostic.line)
    }
}

/// Format a single diagnostic for human-readable output.
pub fn format_diagnostic_human(diagnostic: &Diagnostic) -> String {
    let severity_str = match diagnostic.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
    };

    let code_str = diagnostic
        .code
        .as_ref()
        .map(|c| format!(" [{}]", c))
        .unwrap_or_default();

    let mut output = format!(
        "{}: {}: {}{}",
        location(diagnostic).bold(),
        severity_str,
        diagnostic.message,
        code_str
    );

    if let Some(near) = &diagnostic.near {
        output.push_str(&format!("\n  --> near {}", near.cyan()));
    }

    output
}

/// Escape the message part of a GitHub Actions workflow command.
fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a `key=value` property of a workflow command.
fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

/// Format a single diagnostic for GitHub Actions output.
pub fn format_diagnostic_github_actions(diagnostic: &Diagnostic) -> String {
    let severity = match diagnostic.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };

    let file_str = diagnostic
        .file
        .as_ref()
        .map(|f| format!(" file={},", escape_property(&f.display().to_string())))
        .unwrap_or_else(|| " ".to_string());

    let col_str = if diagnostic.column > 0 {
        format!(",col={}", diagnostic.column)
    } else {
        String::new()
    };

    let code_str = diagnostic
        .code
        .as_ref()
        .map(|c| format!(" [{}]", c))
        .unwrap_or_default();

    format!(
        "::{}{}line={}{}::{}",
        severity,
        file_str,
        diagnostic.line,
        col_str,
        escape_data(&format!("{}{}", diagnostic.message, code_str))
    )
}

/// Format a failure report for human-readable output.
pub fn format_report_human(report: &Report) -> String {
    let label = if report.is_failure() {
        "failure".red().bold()
    } else {
        "info".blue().bold()
    };
    format!("{}: {}", label, report)
}

/// Format the run result summary for human-readable output.
pub fn format_summary_human(result: &RunResult) -> String {
    let issue_count = result.diagnostics.len();
    let error_count = result
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = issue_count - error_count;
    let failure_count = result.reports.iter().filter(|r| r.is_failure()).count();

    let mut summary = String::new();

    if issue_count == 0 && failure_count == 0 {
        summary.push_str(&format!("{}", "All checks passed".green().bold()));
    }

    if issue_count > 0 {
        summary.push_str(&format!(
            "{} {} issue{} ({} error{}, {} warning{}) in {} file{}",
            "✗".red(),
            issue_count,
            if issue_count == 1 { "" } else { "s" },
            error_count,
            if error_count == 1 { "" } else { "s" },
            warning_count,
            if warning_count == 1 { "" } else { "s" },
            result.files_with_issues,
            if result.files_with_issues == 1 {
                ""
            } else {
                "s"
            }
        ));
    }

    if failure_count > 0 {
        if !summary.is_empty() {
            summary.push('\n');
        }
        summary.push_str(&format!(
            "{} {} clang-tidy failure{}",
            "✗".red(),
            failure_count,
            if failure_count == 1 { "" } else { "s" }
        ));
    }

    summary.push('\n');
    let duration_str = if result.duration_ms >= 1000 {
        format!("{:.2}s", result.duration_ms as f64 / 1000.0)
    } else {
        format!("{}ms", result.duration_ms)
    };
    summary.push_str(&format!(
        "Checked {} file{} in {}",
        result.total_files,
        if result.total_files == 1 { "" } else { "s" },
        duration_str.cyan()
    ));

    summary
}

/// Format the entire run result for human-readable output.
pub fn format_result_human(result: &RunResult) -> String {
    let mut output = String::new();

    let errors: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    let warnings: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();

    // Output errors with [E1], [E2], etc.
    for (idx, diagnostic) in errors.iter().enumerate() {
        output.push_str(&format!(
            "{} {}",
            format!("[E{}]", idx + 1).red().bold(),
            format_diagnostic_human(diagnostic)
        ));
        output.push('\n');
    }

    // Output warnings with [W1], [W2], etc.
    for (idx, diagnostic) in warnings.iter().enumerate() {
        output.push_str(&format!(
            "{} {}",
            format!("[W{}]", idx + 1).yellow().bold(),
            format_diagnostic_human(diagnostic)
        ));
        output.push('\n');
    }

    for report in result.reports.iter().filter(|r| r.is_failure()) {
        output.push_str(&format_report_human(report));
        output.push('\n');
    }

    if !output.is_empty() {
        output.push('\n');
    }

    output.push_str(&format_summary_human(result));

    output
}

/// Format the entire run result as JSON.
pub fn format_result_json(result: &RunResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}

/// Format the entire run result for GitHub Actions.
pub fn format_result_github_actions(result: &RunResult) -> String {
    let mut lines: Vec<String> = result
        .diagnostics
        .iter()
        .map(format_diagnostic_github_actions)
        .collect();
    lines.extend(
        result
            .reports
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| format!("::error::{}", escape_data(&r.to_string()))),
    );
    lines.join("\n")
}

/// Format result according to the specified output format.
pub fn format_result(result: &RunResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_result_human(result),
        OutputFormat::Json => format_result_json(result),
        OutputFormat::GithubActions => format_result_github_actions(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> Diagnostic {
        Diagnostic::new(42, 10, "unused variable 'x'".to_string(), Severity::Warning)
            .with_file(PathBuf::from("src/main.cpp"))
            .with_code("clang-diagnostic-unused-variable".to_string())
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("ga"), Some(OutputFormat::GithubActions));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn test_format_diagnostic_human() {
        let output = format_diagnostic_human(&sample());
        assert!(output.contains("src/main.cpp:42:10"));
        assert!(output.contains("unused variable 'x'"));
        assert!(output.contains("clang-diagnostic-unused-variable"));
    }

    #[test]
    fn test_format_diagnostic_github_actions() {
        let mut d = sample();
        d.severity = Severity::Error;
        let output = format_diagnostic_github_actions(&d);
        assert!(output.starts_with("::error file=src/main.cpp,line=42,col=10::"));
        assert!(output.ends_with("[clang-diagnostic-unused-variable]"));
    }

    #[test]
    fn test_github_actions_includes_failures() {
        let mut result = RunResult::new();
        result.add_report(Report::ConfigurationMissing);
        result.add_report(Report::BenignToolMessage {
            text: "Skipping".to_string(),
        });
        let output = format_result_github_actions(&result);
        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("::error::No \"compile_commands\""));
    }

    #[test]
    fn test_github_actions_multiline_failure_stays_one_line() {
        let mut result = RunResult::new();
        result.add_report(Report::ToolFailure {
            file: None,
            text: "line one\nline two\n".to_string(),
        });
        let output = format_result_github_actions(&result);
        assert_eq!(output.lines().count(), 1);
        assert_eq!(output, "::error::clang-tidy failed: line one%0Aline two");
    }

    #[test]
    fn test_github_actions_escapes_properties_and_percent() {
        let d = Diagnostic::new(3, 0, "100% wrong".to_string(), Severity::Warning)
            .with_file(PathBuf::from("gen,v2/a:b.cpp"));
        let output = format_diagnostic_github_actions(&d);
        assert_eq!(output, "::warning file=gen%2Cv2/a%3Ab.cpp,line=3::100%25 wrong");
    }

    #[test]
    fn test_format_result_json() {
        let mut result = RunResult::new();
        result.add_diagnostic(sample());
        let json = format_result_json(&result);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["diagnostics"][0]["line"], 42);
        assert_eq!(value["diagnostics"][0]["severity"], "warning");
    }

    #[test]
    fn test_summary_all_passed() {
        colored::control::set_override(false);
        let mut result = RunResult::new();
        result.total_files = 1;
        let summary = format_summary_human(&result);
        assert!(summary.starts_with("All checks passed"));
        assert!(summary.contains("Checked 1 file in"));
    }
}
