// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! C/C++/Objective-C checker using clang-tidy.

use crate::checkers::Checker;
use crate::classifier;
use crate::host::settings::{ARGS_KEY, COMPILE_COMMANDS_KEY, EXECUTABLE_KEY};
use crate::host::{DiagnosticSink, ProcessRunner, SettingsProvider};
use crate::invocation::{Invocation, InvocationBuilder, DEFAULT_EXECUTABLE};
use crate::parser;
use crate::utils::types::Diagnostic;
use crate::{Language, Result};
use std::path::Path;
use std::sync::Arc;

/// clang-tidy checker wired with its settings, process runner and sink.
///
/// Every lint is stateless: build the invocation, run it, classify stderr,
/// parse stdout. The checker can be shared across threads.
pub struct ClangTidyChecker {
    settings: Arc<dyn SettingsProvider>,
    runner: Arc<dyn ProcessRunner>,
    sink: Arc<dyn DiagnosticSink>,
    builder: InvocationBuilder,
}

impl ClangTidyChecker {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        runner: Arc<dyn ProcessRunner>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let executable = settings
            .get(EXECUTABLE_KEY)
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string());

        Self {
            settings,
            runner,
            sink,
            builder: InvocationBuilder::new(executable),
        }
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    pub fn executable(&self) -> &str {
        self.builder.executable()
    }

    /// Expanded compilation database directory for `file`, if configured.
    pub fn compile_commands_dir(&self, file: Option<&Path>) -> Option<String> {
        self.settings
            .get(COMPILE_COMMANDS_KEY)
            .map(|raw| self.settings.expand(&raw, file))
    }

    /// Build the invocation for `path`, reporting configuration problems.
    pub fn invocation(&self, path: &Path) -> Invocation {
        let dir = self.compile_commands_dir(Some(path));
        let extra_args: Vec<String> = self
            .settings
            .get_list(ARGS_KEY)
            .iter()
            .map(|arg| self.settings.expand(arg, Some(path)))
            .collect();

        self.builder
            .build(dir.as_deref(), path, &extra_args, self.sink.as_ref())
    }
}

impl Checker for ClangTidyChecker {
    fn name(&self) -> &str {
        "clang-tidy"
    }

    fn supported_languages(&self) -> &[Language] {
        &[
            Language::C,
            Language::Cpp,
            Language::ObjectiveC,
            Language::ObjectiveCpp,
        ]
    }

    fn check(&self, path: &Path) -> Result<Vec<Diagnostic>> {
        let invocation = self.invocation(path);
        let output = self.runner.run(invocation.command_line())?;

        if invocation.is_degraded() {
            log::debug!("{}", output.stdout.trim());
        }

        classifier::classify_and_report(&output.stderr, Some(path), self.sink.as_ref());

        let mut diagnostics = parser::parse_output(&output.stdout);
        for diagnostic in &mut diagnostics {
            parser::attach_near(diagnostic);
            self.sink.diagnostic(diagnostic);
        }

        Ok(diagnostics)
    }

    fn is_available(&self) -> bool {
        self.runner
            .run(&self.builder.version_probe())
            .map(|o| o.success())
            .unwrap_or(false)
    }
}
