// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Configuration system for tidylint with hierarchical precedence.
//!
//! Configuration is loaded and merged from multiple sources with the following precedence
//! (higher precedence overrides lower):
//!
//! 1. CLI arguments (highest)
//! 2. Explicit `--config` file
//! 3. Project config (.tidylint/config.toml in project root or an ancestor)
//! 4. User config (~/.tidylint/config.toml)
//! 5. Built-in defaults (lowest)

use crate::invocation::DEFAULT_EXECUTABLE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory holding tidylint configuration.
pub const CONFIG_DIR: &str = ".tidylint";
/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory containing compile_commands.json (may use ${variables})
    #[serde(default)]
    pub compile_commands: Option<String>,

    /// clang-tidy executable
    #[serde(default)]
    pub executable: Option<String>,

    /// Extra clang-tidy arguments, inserted before the file
    #[serde(default)]
    pub args: Vec<String>,

    /// Paths/patterns to exclude (glob patterns)
    #[serde(default, alias = "exclude")]
    pub excludes: Vec<String>,

    /// User-defined variables for ${placeholder} expansion
    #[serde(default)]
    pub variables: HashMap<String, String>,

    /// Exit with 1 when only warnings are found
    #[serde(default)]
    pub fail_on_warnings: Option<bool>,

    /// Verbose output
    #[serde(default)]
    pub verbose: Option<bool>,

    /// Older layout: `[settings] compile_commands = "..."`
    #[serde(default)]
    pub settings: Option<LegacySettings>,
}

/// Nested settings table kept for backward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LegacySettings {
    #[serde(default)]
    pub compile_commands: Option<String>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Compilation database directory, falling back to `[settings]`.
    pub fn compile_commands(&self) -> Option<&str> {
        self.compile_commands
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.settings
                    .as_ref()
                    .and_then(|s| s.compile_commands.as_deref())
            })
    }

    /// Move a legacy `[settings] compile_commands` up to the top-level key,
    /// so each file layer overrides lower layers whichever form it uses.
    fn fold_legacy_settings(mut self) -> Self {
        if self.compile_commands.as_deref().map_or(true, str::is_empty) {
            if let Some(legacy) = self.settings.take().and_then(|s| s.compile_commands) {
                self.compile_commands = Some(legacy);
            }
        }
        self
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::TidyError::Config(format!("Failed to read config: {}", e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext {
            "yml" | "yaml" => serde_yaml::from_str(&content)
                .map_err(|e| crate::TidyError::Config(format!("Failed to parse YAML: {}", e))),
            "toml" => toml::from_str(&content)
                .map_err(|e| crate::TidyError::Config(format!("Failed to parse TOML: {}", e))),
            "json" => serde_json::from_str(&content)
                .map_err(|e| crate::TidyError::Config(format!("Failed to parse JSON: {}", e))),
            _ => Err(crate::TidyError::Config(format!(
                "Unsupported config format: {}",
                ext
            ))),
        }?;

        Ok(config.fold_legacy_settings())
    }

    /// Load built-in default configuration
    pub fn built_in_defaults() -> Self {
        Config {
            executable: Some(DEFAULT_EXECUTABLE.to_string()),
            ..Default::default()
        }
    }

    /// Load user-level configuration from ~/.tidylint/config.toml
    pub fn load_user_config() -> Option<Self> {
        let dirs = directories::BaseDirs::new()?;
        let config_path = dirs.home_dir().join(CONFIG_DIR).join(CONFIG_FILE);
        Self::load_if_present(&config_path)
    }

    /// Load `path` if it exists. A malformed file is logged and skipped.
    fn load_if_present(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load(path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Load project-level configuration from the given directory
    /// Searches for .tidylint/config.toml in the start directory and parent directories
    pub fn load_project_config(start_dir: &Path) -> Option<Self> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
            if let Some(config) = Self::load_if_present(&config_path) {
                return Some(config);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Merge another configuration into this one.
    /// Values from `other` override values in `self`.
    pub fn merge(&mut self, other: Config) {
        if other.compile_commands.is_some() {
            self.compile_commands = other.compile_commands;
        }
        if other.executable.is_some() {
            self.executable = other.executable;
        }

        // Lists append, don't replace
        self.args.extend(other.args);
        self.excludes.extend(other.excludes);

        self.variables.extend(other.variables);

        if other.fail_on_warnings.is_some() {
            self.fail_on_warnings = other.fail_on_warnings;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.settings.is_some() {
            self.settings = other.settings;
        }
    }

    /// Load and merge configuration from all sources with proper precedence.
    /// Precedence: project > user > built-in
    pub fn load_merged(project_dir: &Path) -> Self {
        let mut config = Self::built_in_defaults();

        if let Some(user_config) = Self::load_user_config() {
            config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(project_dir) {
            config.merge(project_config);
        }

        config
    }

    /// Generate a default configuration file content
    pub fn generate_default_toml() -> String {
        r#"# tidylint configuration

# Directory containing compile_commands.json.
# Variables such as ${project_path}, ${folder} and ${file_path} are expanded.
compile_commands = "${project_path}/build"

# clang-tidy executable
executable = "clang-tidy"

# Extra clang-tidy arguments, inserted before the file name
# args = ["-checks=-*,modernize-*", "-header-filter=${project_path}/src/.*"]
args = []

# Patterns to exclude (in addition to defaults)
excludes = []

# Exit with code 1 when only warnings are found
# fail_on_warnings = true

# Custom variables usable in the settings above
# [variables]
# build_type = "debug"
"#
        .to_string()
    }

    /// Get the path for a new project config file
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_DIR).join(CONFIG_FILE)
    }
}
