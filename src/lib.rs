// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! tidylint - run clang-tidy against a compilation database and collect
//! structured diagnostics.

pub mod checkers;
pub mod classifier;
pub mod compdb;
pub mod config;
pub mod host;
pub mod invocation;
pub mod parser;
pub mod utils;

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use checkers::{Checker, ClangTidyChecker};
use compdb::CompilationDatabase;
use host::settings::COMPILE_COMMANDS_KEY;
use host::{CollectingSink, DiagnosticSink, ProcessRunner, SettingsProvider};
use invocation::database_path;
use utils::types::{Report, RunResult};
use utils::walker::{build_glob_set, is_excluded, walk_paths, WalkerConfig};

#[derive(Error, Debug)]
pub enum TidyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Checker error: {0}")]
    Checker(String),

    #[error("Compilation database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, TidyError>;

/// Languages clang-tidy is run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    ObjectiveC,
    ObjectiveCpp,
}

impl Language {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "c" => Some(Language::C),
            "cc" | "cpp" | "cxx" | "c++" | "h" | "hh" | "hpp" | "hxx" | "h++" | "inl" => {
                Some(Language::Cpp)
            }
            "m" => Some(Language::ObjectiveC),
            "mm" => Some(Language::ObjectiveCpp),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "c" => Some(Language::C),
            "cpp" | "c++" | "cxx" => Some(Language::Cpp),
            "objc" | "oc" | "objective-c" => Some(Language::ObjectiveC),
            "objcpp" | "objc++" | "objective-c++" => Some(Language::ObjectiveCpp),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::ObjectiveC => "objc",
            Language::ObjectiveCpp => "objcpp",
        }
    }
}

/// Options for running tidylint
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Paths to check (files or directories). Empty = every translation unit
    /// in the compilation database.
    pub paths: Vec<PathBuf>,
    /// Languages to check (empty = all C-family languages)
    pub languages: Vec<Language>,
    /// Exclusion patterns
    pub exclude_patterns: Vec<String>,
    /// Exit with 1 on warnings too
    pub fail_on_warnings: bool,
}

/// Translation units listed in the configured compilation database.
///
/// Configuration problems are reported to `sink` and yield an empty list.
pub fn database_files(
    settings: &dyn SettingsProvider,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<PathBuf>> {
    let dir = settings
        .get(COMPILE_COMMANDS_KEY)
        .map(|raw| settings.expand(&raw, None))
        .filter(|d| !d.trim().is_empty());

    let dir = match dir {
        Some(d) => PathBuf::from(d),
        None => {
            sink.report(Report::ConfigurationMissing);
            return Ok(Vec::new());
        }
    };

    if !database_path(&dir).is_file() {
        sink.report(Report::CompilationDatabaseNotFound {
            path: database_path(&dir),
        });
        return Ok(Vec::new());
    }

    Ok(CompilationDatabase::load(&dir)?.source_files())
}

/// Collect the files a run should lint.
fn collect_files(
    options: &RunOptions,
    settings: &dyn SettingsProvider,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<PathBuf>> {
    let walker_config = WalkerConfig {
        exclude_patterns: options.exclude_patterns.clone(),
        languages: options.languages.clone(),
        ..Default::default()
    };

    if !options.paths.is_empty() {
        let (files, warnings) = walk_paths(&options.paths, &walker_config);
        for warning in warnings {
            log::warn!("{}", warning);
        }
        return Ok(files);
    }

    // Database entries are absolute; match excludes relative to the project
    let project_root = settings
        .variables(None)
        .get("project_path")
        .map(PathBuf::from)
        .unwrap_or_default();
    let glob_set = build_glob_set(&options.exclude_patterns);
    let files = database_files(settings, sink)?
        .into_iter()
        .filter(|f| {
            let relative = f.strip_prefix(&project_root).unwrap_or(f.as_path());
            !is_excluded(relative, &glob_set)
        })
        .filter(|f| match Language::from_path(f) {
            Some(lang) => options.languages.is_empty() || options.languages.contains(&lang),
            None => false,
        })
        .collect();
    Ok(files)
}

/// Main entry point for running tidylint.
///
/// Files are linted in parallel; each lint is independent. Per-file failures
/// become [`Report::ToolFailure`] entries instead of aborting the run.
pub fn run(
    options: &RunOptions,
    settings: Arc<dyn SettingsProvider>,
    runner: Arc<dyn ProcessRunner>,
) -> Result<RunResult> {
    let start = Instant::now();
    let mut result = RunResult::new();

    let sink = Arc::new(CollectingSink::new());
    let files = collect_files(options, settings.as_ref(), sink.as_ref())?;
    result.total_files = files.len();
    log::debug!("Found {} files to check", files.len());

    let checker = ClangTidyChecker::new(settings, runner, sink.clone());

    // One report for a missing tool instead of a spawn failure per file
    let available = files.is_empty() || checker.is_available();
    if !available {
        sink.report(Report::ToolFailure {
            file: None,
            text: format!(
                "'{} -version' did not run; is {} installed?",
                checker.executable(),
                checker.name()
            ),
        });
    }

    let to_lint: &[PathBuf] = if available { &files } else { &[] };
    let per_file: Vec<_> = to_lint
        .par_iter()
        .map(|file| {
            checker.check(file).unwrap_or_else(|e| {
                checker.sink().report(Report::ToolFailure {
                    file: Some(file.clone()),
                    text: e.to_string(),
                });
                Vec::new()
            })
        })
        .collect();

    for diagnostics in per_file {
        for diagnostic in diagnostics {
            result.add_diagnostic(diagnostic);
        }
    }

    // The same configuration problem is raised once per file
    for report in sink.reports() {
        if !result.reports.contains(&report) {
            result.add_report(report);
        }
    }

    result.count_files_with_issues();
    result.calculate_exit_code_with_warnings(options.fail_on_warnings);
    result.duration_ms = start.elapsed().as_millis() as u64;

    Ok(result)
}

// Re-export commonly used types
pub use utils::types::{Diagnostic, Severity};
