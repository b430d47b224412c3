// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Collaborators the checker is wired with: settings, process execution and
//! the sink that receives diagnostics and failure reports.

pub mod process;
pub mod settings;
pub mod sink;
pub mod variables;

pub use process::{ProcessOutput, ProcessRunner, SystemRunner};
pub use settings::{SettingsProvider, WorkspaceSettings};
pub use sink::{CollectingSink, DiagnosticSink};
pub use variables::{expand_variables, VariableTable};
