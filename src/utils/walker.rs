// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! File system walker with exclusion support.

use crate::Language;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// File walker configuration.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Glob patterns to exclude
    pub exclude_patterns: Vec<String>,
    /// Only include files with these languages (empty = all C-family)
    pub languages: Vec<Language>,
}

/// Build a GlobSet from patterns.
pub fn build_glob_set(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => log::warn!("Ignoring exclude pattern '{}': {}", pattern, e),
        }
    }
    builder.build().ok()
}

/// Check if a path should be excluded based on glob patterns.
///
/// Patterns are matched against the path and against every trailing run of its
/// components, so `build/**` also excludes `src/build/gen.cpp`. Pass paths
/// relative to the walked root: an ancestor of the root named `build` would
/// otherwise exclude everything below it.
pub fn is_excluded(path: &Path, glob_set: &Option<GlobSet>) -> bool {
    let Some(gs) = glob_set else {
        return false;
    };

    if gs.is_match(path) {
        return true;
    }

    let names: Vec<&OsStr> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect();

    for start in 0..names.len() {
        let suffix: PathBuf = names[start..].iter().collect();
        if gs.is_match(&suffix) {
            return true;
        }
    }

    // Bare directory names, e.g. "build"
    names.iter().any(|name| gs.is_match(Path::new(name)))
}

/// Check if a file is a C-family source matching the language filter.
fn matches_language_filter(path: &Path, languages: &[Language]) -> bool {
    match Language::from_path(path) {
        Some(lang) => languages.is_empty() || languages.contains(&lang),
        None => false,
    }
}

/// Walk a directory and collect files matching the criteria.
pub fn walk_files(root: &Path, config: &WalkerConfig) -> Vec<PathBuf> {
    let glob_set = build_glob_set(&config.exclude_patterns);

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            // The root itself is never excluded
            e.depth() == 0
                || !is_excluded(e.path().strip_prefix(root).unwrap_or(e.path()), &glob_set)
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| matches_language_filter(e.path(), &config.languages))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Walk multiple paths (files or directories).
/// Returns (files, warnings) tuple.
pub fn walk_paths(paths: &[PathBuf], config: &WalkerConfig) -> (Vec<PathBuf>, Vec<String>) {
    let glob_set = build_glob_set(&config.exclude_patterns);

    let cwd = std::env::current_dir().unwrap_or_default();

    let mut result = Vec::new();
    let mut warnings = Vec::new();

    for path in paths {
        if path.is_file() {
            let relative = path.strip_prefix(&cwd).unwrap_or(path.as_path());
            if is_excluded(relative, &glob_set) {
                warnings.push(format!(
                    "Path '{}' is excluded by exclude patterns",
                    path.display()
                ));
            } else if !matches_language_filter(path, &config.languages) {
                warnings.push(format!(
                    "Path '{}' is not a C/C++/Objective-C source",
                    path.display()
                ));
            } else {
                result.push(path.clone());
            }
        } else if path.is_dir() {
            result.extend(walk_files(path, config));
        } else if !path.exists() {
            warnings.push(format!("Path '{}' does not exist", path.display()));
        }
    }

    (result, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_excluded() {
        let patterns = vec!["*.pb.cc".to_string(), "third_party/**".to_string()];
        let glob_set = build_glob_set(&patterns);

        assert!(is_excluded(Path::new("gen/msg.pb.cc"), &glob_set));
        assert!(is_excluded(
            Path::new("third_party/zlib/inflate.c"),
            &glob_set
        ));
        assert!(!is_excluded(Path::new("src/main.cpp"), &glob_set));
        assert!(!is_excluded(Path::new("src/main.cpp"), &None));
    }

    #[test]
    fn test_is_excluded_nested_and_dotted() {
        let patterns = vec!["build/**".to_string(), "third_party/**".to_string()];
        let glob_set = build_glob_set(&patterns);

        assert!(is_excluded(Path::new("./build/gen.cpp"), &glob_set));
        assert!(is_excluded(Path::new("src/build/gen.cpp"), &glob_set));
        assert!(is_excluded(
            Path::new("lib/third_party/z/z.c"),
            &glob_set
        ));
        assert!(!is_excluded(Path::new("src/builder.cpp"), &glob_set));
    }

    #[test]
    fn test_matches_language_filter() {
        assert!(matches_language_filter(Path::new("src/a.cpp"), &[]));
        assert!(matches_language_filter(Path::new("src/a.h"), &[]));
        assert!(!matches_language_filter(Path::new("README.md"), &[]));

        let only_c = vec![Language::C];
        assert!(matches_language_filter(Path::new("a.c"), &only_c));
        assert!(!matches_language_filter(Path::new("a.cpp"), &only_c));
    }

    #[test]
    fn test_walk_files_filters_and_excludes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("src/a.cpp"), "").unwrap();
        fs::write(root.join("src/a.h"), "").unwrap();
        fs::write(root.join("src/notes.txt"), "").unwrap();
        fs::write(root.join("build/gen.cpp"), "").unwrap();

        let config = WalkerConfig {
            exclude_patterns: vec!["build/**".to_string(), "build".to_string()],
            ..Default::default()
        };
        let files = walk_files(root, &config);

        assert_eq!(files, vec![root.join("src/a.cpp"), root.join("src/a.h")]);
    }

    #[test]
    fn test_walk_absolute_root_applies_default_excludes() {
        let dir = TempDir::new().unwrap();
        // An excluded name above the walked root must not hide the project
        let root = dir.path().join("build").join("proj");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::create_dir_all(root.join("third_party/z")).unwrap();
        fs::write(root.join("src/a.cpp"), "").unwrap();
        fs::write(root.join("build/gen.cpp"), "").unwrap();
        fs::write(root.join("third_party/z/z.c"), "").unwrap();

        let config = WalkerConfig {
            exclude_patterns: crate::utils::DEFAULT_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..Default::default()
        };
        let (files, warnings) = walk_paths(&[root.clone()], &config);

        assert!(root.is_absolute());
        assert!(warnings.is_empty());
        assert_eq!(files, vec![root.join("src/a.cpp")]);
    }

    #[test]
    fn test_walk_paths_warnings() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        fs::write(&txt, "").unwrap();
        let missing = dir.path().join("missing.cpp");

        let (files, warnings) = walk_paths(&[txt, missing], &WalkerConfig::default());

        assert!(files.is_empty());
        assert_eq!(warnings.len(), 2);
        assert!(warnings[1].contains("does not exist"));
    }
}
