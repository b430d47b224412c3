// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Building the clang-tidy command line for one file.
//!
//! A full invocation needs a directory holding `compile_commands.json`. When
//! none is configured, or the database file is missing, the builder degrades
//! to `clang-tidy -version`: the run still happens, yields no diagnostics, and
//! the problem is reported to the sink once.

use crate::host::DiagnosticSink;
use crate::utils::types::Report;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default clang-tidy executable name.
pub const DEFAULT_EXECUTABLE: &str = "clang-tidy";

/// File name of a JSON compilation database.
pub const COMPILATION_DATABASE: &str = "compile_commands.json";

const DATABASE_PLACEHOLDER: &str = "${compile_commands}";
const ARGS_PLACEHOLDER: &str = "${args}";
const FILE_PLACEHOLDER: &str = "${file}";

/// Arguments following the executable in a full invocation.
const COMMAND_TEMPLATE: &[&str] = &[
    "-quiet",
    "-p=${compile_commands}",
    "-config=",
    ARGS_PLACEHOLDER,
    FILE_PLACEHOLDER,
];

/// An immutable command line, executable first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// `tokens` must contain at least the executable.
    pub fn new(tokens: Vec<String>) -> Self {
        debug_assert!(!tokens.is_empty(), "command line without executable");
        Self { tokens }
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Result of building an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Lint the file against the compilation database.
    Full(CommandLine),
    /// Version probe used when the database cannot be used.
    Degraded(CommandLine),
}

impl Invocation {
    pub fn command_line(&self) -> &CommandLine {
        match self {
            Invocation::Full(c) | Invocation::Degraded(c) => c,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Invocation::Degraded(_))
    }
}

/// Path of the database file inside `dir`.
pub fn database_path(dir: &Path) -> PathBuf {
    dir.join(COMPILATION_DATABASE)
}

/// Builds clang-tidy invocations for a fixed executable.
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    executable: String,
}

impl InvocationBuilder {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// `[executable, "-version"]`
    pub fn version_probe(&self) -> CommandLine {
        CommandLine::new(vec![self.executable.clone(), "-version".to_string()])
    }

    /// Build the invocation for `file`.
    ///
    /// `compile_commands_dir` must already have its placeholders expanded.
    /// Exactly one report is sent to `sink` when the result is degraded.
    pub fn build(
        &self,
        compile_commands_dir: Option<&str>,
        file: &Path,
        extra_args: &[String],
        sink: &dyn DiagnosticSink,
    ) -> Invocation {
        let dir = match compile_commands_dir.map(str::trim) {
            Some(d) if !d.is_empty() => d,
            _ => {
                sink.report(Report::ConfigurationMissing);
                return Invocation::Degraded(self.version_probe());
            }
        };

        let compdb = database_path(Path::new(dir));
        if !compdb.is_file() {
            sink.report(Report::CompilationDatabaseNotFound { path: compdb });
            return Invocation::Degraded(self.version_probe());
        }

        let mut tokens = vec![self.executable.clone()];
        for token in COMMAND_TEMPLATE {
            match *token {
                ARGS_PLACEHOLDER => tokens.extend(extra_args.iter().cloned()),
                FILE_PLACEHOLDER => tokens.push(file.display().to_string()),
                t => tokens.push(t.replace(DATABASE_PLACEHOLDER, dir)),
            }
        }

        Invocation::Full(CommandLine::new(tokens))
    }
}

impl Default for InvocationBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CollectingSink;
    use std::fs;
    use tempfile::TempDir;

    fn tokens(invocation: &Invocation) -> Vec<&str> {
        invocation
            .command_line()
            .tokens()
            .iter()
            .map(String::as_str)
            .collect()
    }

    fn database_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(COMPILATION_DATABASE), "[]").unwrap();
        dir
    }

    #[test]
    fn test_unset_directory_degrades() {
        let sink = CollectingSink::new();
        let invocation =
            InvocationBuilder::default().build(None, Path::new("a.cpp"), &[], &sink);

        assert!(invocation.is_degraded());
        assert_eq!(tokens(&invocation), vec!["clang-tidy", "-version"]);
        assert_eq!(sink.reports(), vec![Report::ConfigurationMissing]);
    }

    #[test]
    fn test_blank_directory_degrades() {
        let sink = CollectingSink::new();
        let invocation =
            InvocationBuilder::default().build(Some("  "), Path::new("a.cpp"), &[], &sink);

        assert!(invocation.is_degraded());
        assert_eq!(sink.reports(), vec![Report::ConfigurationMissing]);
    }

    #[test]
    fn test_full_invocation_token_order() {
        let dir = database_dir();
        let dir_str = dir.path().display().to_string();
        let sink = CollectingSink::new();

        let invocation = InvocationBuilder::default().build(
            Some(&dir_str),
            Path::new("/src/a.cpp"),
            &[],
            &sink,
        );

        assert!(!invocation.is_degraded());
        let expected_p = format!("-p={}", dir_str);
        assert_eq!(
            tokens(&invocation),
            vec!["clang-tidy", "-quiet", expected_p.as_str(), "-config=", "/src/a.cpp"]
        );
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn test_extra_args_before_file() {
        let dir = database_dir();
        let dir_str = dir.path().display().to_string();
        let sink = CollectingSink::new();
        let extra = vec!["-checks=-*,bugprone-*".to_string(), "-fix".to_string()];

        let invocation = InvocationBuilder::new("/opt/llvm/bin/clang-tidy").build(
            Some(&dir_str),
            Path::new("b.cc"),
            &extra,
            &sink,
        );

        let t = tokens(&invocation);
        assert_eq!(t[0], "/opt/llvm/bin/clang-tidy");
        assert_eq!(&t[3..], &["-config=", "-checks=-*,bugprone-*", "-fix", "b.cc"]);
    }

    #[test]
    fn test_missing_database_degrades_with_single_report() {
        let dir = TempDir::new().unwrap();
        let dir_str = dir.path().display().to_string();
        let sink = CollectingSink::new();

        let invocation = InvocationBuilder::default().build(
            Some(&dir_str),
            Path::new("a.cpp"),
            &[],
            &sink,
        );

        assert!(invocation.is_degraded());
        assert_eq!(tokens(&invocation), vec!["clang-tidy", "-version"]);
        assert_eq!(
            sink.reports(),
            vec![Report::CompilationDatabaseNotFound {
                path: dir.path().join(COMPILATION_DATABASE)
            }]
        );
        assert!(sink.reports()[0]
            .to_string()
            .contains(&dir.path().join(COMPILATION_DATABASE).display().to_string()));
    }

    #[test]
    fn test_database_as_directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(COMPILATION_DATABASE)).unwrap();
        let dir_str = dir.path().display().to_string();
        let sink = CollectingSink::new();

        let invocation = InvocationBuilder::default().build(
            Some(&dir_str),
            Path::new("a.cpp"),
            &[],
            &sink,
        );

        assert!(invocation.is_degraded());
        assert_eq!(sink.failures().len(), 1);
    }

    #[test]
    fn test_command_line_display() {
        let command = InvocationBuilder::default().version_probe();
        assert_eq!(command.to_string(), "clang-tidy -version");
        assert_eq!(command.program(), "clang-tidy");
        assert_eq!(command.args(), &["-version".to_string()]);
    }
}
