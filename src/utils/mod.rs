// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Utility modules for tidylint.

pub mod output;
pub mod types;
pub mod walker;

use std::path::{Path, PathBuf};
use std::process::Command;

/// Default exclusion patterns for directories that shouldn't be linted.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    // Version control
    ".git/**",
    ".hg/**",
    ".svn/**",
    // Third-party libraries
    "third_party/**",
    "thirdparty/**",
    "third-party/**",
    "3rdparty/**",
    "external/**",
    "vendor/**",
    // Build outputs
    "build/**",
    "cmake-build-*/**",
    "out/**",
    "CMakeFiles/**",
    // IDE and editor
    ".idea/**",
    ".vscode/**",
    ".vs/**",
    ".cache/**",
    // Generated files
    "*.generated.*",
    "*.pb.h",
    "*.pb.cc",
    // Package managers (iOS)
    "Pods/**",
    "**/Pods/**",
];

/// Read a specific line from a file (1-indexed).
pub fn read_file_line(path: &Path, line_number: usize) -> Option<String> {
    use std::fs::File;
    use std::io::{BufRead, BufReader};

    if line_number == 0 {
        return None;
    }

    let file = File::open(path).ok()?;
    let reader = BufReader::new(file);

    reader
        .lines()
        .nth(line_number - 1)
        .and_then(|line| line.ok())
}

/// Get the project root directory (git root or current directory).
pub fn get_project_root() -> PathBuf {
    Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_file_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file, "second").unwrap();

        assert_eq!(read_file_line(file.path(), 1), Some("first".to_string()));
        assert_eq!(read_file_line(file.path(), 2), Some("second".to_string()));
        assert_eq!(read_file_line(file.path(), 3), None);
        assert_eq!(read_file_line(file.path(), 0), None);
    }

    #[test]
    fn test_read_file_line_missing_file() {
        assert_eq!(read_file_line(Path::new("/no/such/file.cpp"), 1), None);
    }
}
