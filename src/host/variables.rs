// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Workspace variable table and `${placeholder}` expansion.
//!
//! Settings such as `compile_commands = "${project_path}/build"` are expanded
//! against a table describing the file being linted and the project it lives
//! in. Supported forms are `$name`, `${name}`, `${name:default}` and `\$` for
//! a literal dollar sign. Unknown variables expand to their default, or to the
//! empty string when none is given.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;

lazy_static::lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(
        r"\\\$|\$\{([A-Za-z_][A-Za-z0-9_]*)(?::([^}]*))?\}|\$([A-Za-z_][A-Za-z0-9_]*)"
    )
    .unwrap();
}

/// Name -> value table used for placeholder expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    vars: HashMap<String, String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project-level variables only (`folder`, `project`, `project_path`, ...).
    pub fn for_project(project_root: &Path) -> Self {
        let mut table = Self::new();
        table.insert_project(project_root);
        table
    }

    /// Variables for a file being linted inside `project_root`.
    pub fn for_file(file: &Path, project_root: &Path) -> Self {
        let mut table = Self::for_project(project_root);

        table.set("file", file.display().to_string());
        if let Some(parent) = file.parent() {
            table.set("file_path", parent.display().to_string());
        }
        if let Some(name) = file.file_name() {
            table.set("file_name", name.to_string_lossy());
        }
        if let Some(stem) = file.file_stem() {
            table.set("file_base_name", stem.to_string_lossy());
        }
        if let Some(ext) = file.extension() {
            table.set("file_extension", ext.to_string_lossy());
        }

        table
    }

    fn insert_project(&mut self, root: &Path) {
        let root_str = root.display().to_string();
        self.set("folder", root_str.clone());
        self.set("project", root_str.clone());
        self.set("project_path", root_str);
        if let Some(name) = root.file_name() {
            self.set("project_name", name.to_string_lossy());
        }
        if let Some(stem) = root.file_stem() {
            self.set("project_base_name", stem.to_string_lossy());
        }
        if let Some(ext) = root.extension() {
            self.set("project_extension", ext.to_string_lossy());
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Add every entry of `other`, overriding existing names.
    pub fn extend<I, K, V>(&mut self, other: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in other {
            self.set(k, v);
        }
    }
}

/// Expand placeholders in `template` against `vars`.
pub fn expand_variables(template: &str, vars: &VariableTable) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            if &caps[0] == "\\$" {
                return "$".to_string();
            }
            if let Some(name) = caps.get(1) {
                return vars
                    .get(name.as_str())
                    .map(str::to_string)
                    .or_else(|| caps.get(2).map(|d| d.as_str().to_string()))
                    .unwrap_or_default();
            }
            caps.get(3)
                .and_then(|name| vars.get(name.as_str()))
                .unwrap_or_default()
                .to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VariableTable {
        VariableTable::for_file(Path::new("/work/proj/src/main.cpp"), Path::new("/work/proj"))
    }

    #[test]
    fn test_file_variables() {
        let vars = table();
        assert_eq!(vars.get("file"), Some("/work/proj/src/main.cpp"));
        assert_eq!(vars.get("file_path"), Some("/work/proj/src"));
        assert_eq!(vars.get("file_name"), Some("main.cpp"));
        assert_eq!(vars.get("file_base_name"), Some("main"));
        assert_eq!(vars.get("file_extension"), Some("cpp"));
    }

    #[test]
    fn test_project_variables() {
        let vars = VariableTable::for_project(Path::new("/work/proj"));
        assert_eq!(vars.get("folder"), Some("/work/proj"));
        assert_eq!(vars.get("project_path"), Some("/work/proj"));
        assert_eq!(vars.get("project_name"), Some("proj"));
        assert_eq!(vars.get("project_base_name"), Some("proj"));
        assert_eq!(vars.get("file"), None);
    }

    #[test]
    fn test_expand_braced_and_bare() {
        let vars = table();
        assert_eq!(
            expand_variables("${project_path}/build", &vars),
            "/work/proj/build"
        );
        assert_eq!(expand_variables("$folder/out", &vars), "/work/proj/out");
    }

    #[test]
    fn test_expand_default_value() {
        let vars = table();
        assert_eq!(expand_variables("${build_dir:build}", &vars), "build");
        assert_eq!(
            expand_variables("${project_name:fallback}", &vars),
            "proj"
        );
    }

    #[test]
    fn test_expand_unknown_is_empty() {
        let vars = VariableTable::new();
        assert_eq!(expand_variables("${nope}", &vars), "");
        assert_eq!(expand_variables("a$nope/b", &vars), "a/b");
    }

    #[test]
    fn test_expand_escaped_dollar() {
        let vars = table();
        assert_eq!(expand_variables(r"\$folder", &vars), "$folder");
    }

    #[test]
    fn test_expand_plain_text_untouched() {
        let vars = table();
        assert_eq!(expand_variables("/opt/build", &vars), "/opt/build");
    }

    #[test]
    fn test_user_variables_override() {
        let mut vars = table();
        vars.extend([("build", "/tmp/b"), ("folder", "/elsewhere")]);
        assert_eq!(expand_variables("${build}", &vars), "/tmp/b");
        assert_eq!(expand_variables("${folder}", &vars), "/elsewhere");
    }
}
