//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code outside the readiness module
//! - No unwrap()/expect() in production code
//!
//! The helpers here walk the workspace sources and strip the parts that are
//! not production code (comments, `#[cfg(test)]` modules).

use std::fs;
use std::path::{Path, PathBuf};

/// Production source directories checked by the tests
pub const PRODUCTION_DIRS: &[&str] = &["client/core/src", "client/cli/src"];

/// A forbidden call found in production code
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to the workspace root
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Workspace root, two levels above this package
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// All `.rs` files below `dir` (relative to the workspace root)
#[must_use]
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Lines of production code with their 1-based line numbers
///
/// Everything from the first `#[cfg(test)]` on is dropped; test modules sit
/// at the end of each file. Line comments are removed.
#[must_use]
pub fn production_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim_start().starts_with("#[cfg(test)]") {
            break;
        }
        let code = strip_line_comment(line);
        if !code.trim().is_empty() {
            lines.push((idx + 1, code.to_string()));
        }
    }
    lines
}

/// The part of `line` before a `//` comment
///
/// A `//` inside a string or char literal (URLs, mostly) is code.
#[must_use]
pub fn strip_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'\'' if !in_string => {
                if bytes.get(i + 1) == Some(&b'\\') {
                    // '\n', '\'', '\u{..}'
                    if let Some(end) = line.get(i + 3..).and_then(|rest| rest.find('\'')) {
                        i += 3 + end;
                    }
                } else if bytes.get(i + 2) == Some(&b'\'') {
                    i += 2;
                }
            }
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
        i += 1;
    }
    line
}

/// Scan production files for lines matching `is_violation`
pub fn find_violations<F>(dirs: &[&str], allowed_files: &[&str], is_violation: F) -> Vec<Violation>
where
    F: Fn(&str) -> bool,
{
    let root = workspace_root();
    let mut violations = Vec::new();

    for dir in dirs {
        for file in rust_files(dir) {
            let relative = file.strip_prefix(&root).unwrap_or(&file).to_path_buf();
            if allowed_files.iter().any(|allowed| relative.ends_with(allowed)) {
                continue;
            }
            let Ok(content) = fs::read_to_string(&file) else {
                continue;
            };
            for (line, code) in production_lines(&content) {
                if is_violation(&code) {
                    violations.push(Violation {
                        path: relative.clone(),
                        line,
                        text: code.trim().to_string(),
                    });
                }
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let content = concat!(
            "fn a() {}\n",
            "// comment only\n",
            "fn b() { x(); } // trailing\n",
            "#[cfg(test)]\n",
            "mod tests { fn t() { y.unwrap(); } }\n",
        );
        let lines = production_lines(content);
        assert_eq!(
            lines,
            vec![(1, "fn a() {}".to_string()), (3, "fn b() { x(); } ".to_string())]
        );
    }

    #[test]
    fn test_comment_markers_inside_literals_are_code() {
        let line = r#"let u = Url::parse("http://xd:9393").unwrap(); // admin"#;
        assert_eq!(
            strip_line_comment(line),
            r#"let u = Url::parse("http://xd:9393").unwrap(); "#
        );

        let escaped = r#"let s = "say \"//\"".len(); // quoted"#;
        assert_eq!(strip_line_comment(escaped), r#"let s = "say \"//\"".len(); "#);

        let chars = r#"if c == '"' || c == '\'' { x.unwrap() } // chars"#;
        assert_eq!(
            strip_line_comment(chars),
            r#"if c == '"' || c == '\'' { x.unwrap() } "#
        );

        assert_eq!(strip_line_comment("fn f<'a>(x: &'a str) // life"), "fn f<'a>(x: &'a str) ");
        assert_eq!(strip_line_comment("// whole line"), "");
    }

    #[test]
    fn test_workspace_root_contains_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
