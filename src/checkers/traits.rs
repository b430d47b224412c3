// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Checker trait definition.

use crate::utils::types::Diagnostic;
use crate::{Language, Result};
use std::path::Path;

/// Trait for implementing checkers (linters).
///
/// Each checker implementation should shell out to an external linter
/// and parse its output into standardized Diagnostic structs.
pub trait Checker: Send + Sync {
    /// Returns the name of this checker (e.g., "clang-tidy").
    fn name(&self) -> &str;

    /// Returns the languages this checker supports.
    fn supported_languages(&self) -> &[Language];

    /// Check a single file and return any diagnostics found.
    ///
    /// Configuration problems and tool failures are reported to the checker's
    /// sink rather than returned as errors; an `Err` means the tool could not
    /// be run at all.
    fn check(&self, path: &Path) -> Result<Vec<Diagnostic>>;

    /// Check if this checker supports the given language.
    fn supports(&self, lang: Language) -> bool {
        self.supported_languages().contains(&lang)
    }

    /// Check if the external linter tool is available.
    fn is_available(&self) -> bool;
}
