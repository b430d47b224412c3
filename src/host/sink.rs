// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Destinations for diagnostics and failure reports.

use crate::utils::types::{Diagnostic, Report};
use std::sync::{Mutex, PoisonError};

/// Receives the diagnostics and reports produced while linting.
///
/// A sink doubles as the checker's logger: implementations are expected to
/// forward each report to the `log` facade at [`Report::level`].
pub trait DiagnosticSink: Send + Sync {
    fn diagnostic(&self, diagnostic: &Diagnostic);

    fn report(&self, report: Report);
}

/// Logs reports and keeps everything it receives, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    reports: Mutex<Vec<Report>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reports at error level only.
    pub fn failures(&self) -> Vec<Report> {
        self.reports()
            .into_iter()
            .filter(Report::is_failure)
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn diagnostic(&self, diagnostic: &Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }

    fn report(&self, report: Report) {
        let mut reports = self.reports.lock().unwrap_or_else(PoisonError::into_inner);
        if should_log(&reports, &report) {
            log::log!(report.level(), "{}", report);
        }
        reports.push(report);
    }
}

/// Configuration reports are logged on first sight only.
fn should_log(seen: &[Report], report: &Report) -> bool {
    !(report.is_configuration() && seen.contains(report))
}
