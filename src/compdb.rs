// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Reading a JSON compilation database (`compile_commands.json`).
//!
//! Only the fields needed to enumerate translation units are read; the
//! database itself is owned by the build system and handed to clang-tidy
//! untouched.

use crate::invocation::database_path;
use crate::{Result, TidyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One entry of the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    /// Working directory of the compilation
    pub directory: PathBuf,
    /// Main source file, relative to `directory` or absolute
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl CompileCommand {
    /// Absolute (or directory-joined) path of the source file.
    pub fn source_path(&self) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            self.directory.join(&self.file)
        }
    }
}

/// A loaded compilation database.
#[derive(Debug, Clone)]
pub struct CompilationDatabase {
    path: PathBuf,
    entries: Vec<CompileCommand>,
}

impl CompilationDatabase {
    /// Load `compile_commands.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = database_path(dir);
        let content = fs::read_to_string(&path).map_err(|e| {
            TidyError::Database(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: PathBuf) -> Result<Self> {
        let entries: Vec<CompileCommand> = serde_json::from_str(content).map_err(|e| {
            TidyError::Database(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[CompileCommand] {
        &self.entries
    }

    /// Distinct source files, sorted.
    pub fn source_files(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .map(CompileCommand::source_path)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"[
        {"directory": "/proj/build", "command": "c++ -c ../src/a.cpp", "file": "../src/a.cpp"},
        {"directory": "/proj/build", "arguments": ["cc", "-c", "/proj/src/b.c"], "file": "/proj/src/b.c", "output": "b.o"},
        {"directory": "/proj/build", "command": "c++ -c ../src/a.cpp -DX", "file": "../src/a.cpp"}
    ]"#;

    fn sample() -> CompilationDatabase {
        CompilationDatabase::parse(SAMPLE, PathBuf::from("/proj/build/compile_commands.json"))
            .unwrap()
    }

    #[test]
    fn test_parse_entries() {
        let db = sample();
        assert_eq!(db.entries().len(), 3);
        assert_eq!(db.entries()[0].command.as_deref(), Some("c++ -c ../src/a.cpp"));
        assert_eq!(db.entries()[1].arguments.as_ref().unwrap().len(), 3);
        assert_eq!(db.entries()[1].output, Some(PathBuf::from("b.o")));
    }

    #[test]
    fn test_source_files_dedup_and_resolve() {
        let files = sample().source_files();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/proj/build/../src/a.cpp"),
                PathBuf::from("/proj/src/b.c"),
            ]
        );
    }

    #[test]
    fn test_load_missing_is_database_error() {
        let dir = TempDir::new().unwrap();
        let err = CompilationDatabase::load(dir.path()).unwrap_err();
        assert!(matches!(err, TidyError::Database(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("compile_commands.json"), "{not json").unwrap();
        let err = CompilationDatabase::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("compile_commands.json"), SAMPLE).unwrap();
        let db = CompilationDatabase::load(dir.path()).unwrap();
        assert_eq!(db.path(), dir.path().join("compile_commands.json"));
        assert_eq!(db.entries().len(), 3);
    }
}
