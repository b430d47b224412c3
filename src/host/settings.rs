// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Settings lookup for the clang-tidy checker.

use super::variables::{expand_variables, VariableTable};
use crate::config::Config;
use std::path::{Path, PathBuf};

/// Setting holding the compilation database directory.
pub const COMPILE_COMMANDS_KEY: &str = "compile_commands";
/// Setting holding the clang-tidy executable.
pub const EXECUTABLE_KEY: &str = "executable";
/// Setting holding extra arguments spliced into `${args}`.
pub const ARGS_KEY: &str = "args";

/// Key/value settings plus the workspace variables used to expand them.
pub trait SettingsProvider: Send + Sync {
    /// Look up a scalar setting.
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a list setting. Unknown keys yield an empty list.
    fn get_list(&self, key: &str) -> Vec<String> {
        let _ = key;
        Vec::new()
    }

    /// Variable table for `file`, or the project-only table when `None`.
    fn variables(&self, file: Option<&Path>) -> VariableTable;

    /// Expand placeholders in `template` for `file`.
    fn expand(&self, template: &str, file: Option<&Path>) -> String {
        expand_variables(template, &self.variables(file))
    }
}

/// Settings backed by the merged configuration of a project.
#[derive(Debug, Clone)]
pub struct WorkspaceSettings {
    config: Config,
    project_root: PathBuf,
}

impl WorkspaceSettings {
    pub fn new(config: Config, project_root: PathBuf) -> Self {
        Self {
            config,
            project_root,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl SettingsProvider for WorkspaceSettings {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            COMPILE_COMMANDS_KEY => self.config.compile_commands().map(str::to_string),
            EXECUTABLE_KEY => self.config.executable.clone(),
            _ => None,
        }
    }

    fn get_list(&self, key: &str) -> Vec<String> {
        match key {
            ARGS_KEY => self.config.args.clone(),
            _ => Vec::new(),
        }
    }

    fn variables(&self, file: Option<&Path>) -> VariableTable {
        let mut table = match file {
            Some(f) => VariableTable::for_file(f, &self.project_root),
            None => VariableTable::for_project(&self.project_root),
        };
        table.extend(self.config.variables.clone());
        table
    }
}
