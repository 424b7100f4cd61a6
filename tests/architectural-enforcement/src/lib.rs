//! Architectural Enforcement
//!
//! Source scanners shared by the integration tests in `tests/`. They
//! enforce:
//! - No sleep() calls in production code outside frame limiting
//! - No blocking I/O inside async functions
//! - A headless core with no terminal or clipboard dependencies
//!
//! The scanners work line by line on source text. They are heuristics,
//! tuned to the way this workspace is formatted (rustfmt defaults, test
//! modules at the bottom of each file).

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, two levels above this crate
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// A Rust source file split into lines
#[derive(Debug)]
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// Raw lines
    pub lines: Vec<String>,
}

impl SourceFile {
    /// `path:line - text` for a violation report
    #[must_use]
    pub fn describe(&self, idx: usize, what: &str) -> String {
        format!(
            "{}:{} - {what}: {}",
            self.path.display(),
            idx + 1,
            self.lines[idx].trim()
        )
    }
}

/// Every `.rs` file under `dir` (relative to the workspace root)
#[must_use]
pub fn rust_files(dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let base = root.join(dir);
    if !base.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(&base)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|entry| {
            let content = fs::read_to_string(entry.path()).ok()?;
            let path = entry
                .path()
                .strip_prefix(&root)
                .unwrap_or(entry.path())
                .to_path_buf();
            Some(SourceFile {
                path,
                lines: content.lines().map(str::to_string).collect(),
            })
        })
        .collect()
}

/// The part of a line before any `//` comment
#[must_use]
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Whether a trimmed line starts a function signature
#[must_use]
pub fn is_fn_signature(line: &str) -> bool {
    let mut rest = line.trim_start();
    for prefix in ["pub(crate) ", "pub(super) ", "pub ", "const ", "async ", "unsafe "] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
        }
    }
    rest.starts_with("fn ")
}

/// Index of the function whose body contains `idx`, if any
#[must_use]
pub fn enclosing_fn<S: AsRef<str>>(lines: &[S], idx: usize) -> Option<usize> {
    let fn_idx = (0..idx).rev().find(|&i| is_fn_signature(lines[i].as_ref()))?;

    let mut depth: i64 = 0;
    let mut opened = false;
    for line in &lines[fn_idx..idx] {
        for c in code_part(line.as_ref()).chars() {
            match c {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
        if opened && depth <= 0 {
            return None;
        }
    }
    Some(fn_idx)
}

/// Whether `idx` sits in an async function body
#[must_use]
pub fn is_in_async_fn<S: AsRef<str>>(lines: &[S], idx: usize) -> bool {
    enclosing_fn(lines, idx).is_some_and(|fn_idx| {
        let signature = lines[fn_idx].as_ref();
        signature.contains("async fn ")
    })
}

/// Whether `idx` is test code: below `#[cfg(test)]` or in a test function
#[must_use]
pub fn is_test_code<S: AsRef<str>>(lines: &[S], idx: usize) -> bool {
    if lines[..idx]
        .iter()
        .any(|line| line.as_ref().trim() == "#[cfg(test)]")
    {
        return true;
    }

    let Some(fn_idx) = enclosing_fn(lines, idx) else {
        return false;
    };
    lines[..fn_idx]
        .iter()
        .rev()
        .map(|line| line.as_ref().trim())
        .take_while(|line| line.starts_with("#[") || line.starts_with("///"))
        .any(|line| line.starts_with("#[test]") || line.starts_with("#[tokio::test"))
}

/// Whether a sleep call is frame rate limiting: frame or FPS talk nearby
#[must_use]
pub fn is_frame_limiting_context<S: AsRef<str>>(lines: &[S], idx: usize) -> bool {
    let start = idx.saturating_sub(10);
    let end = (idx + 5).min(lines.len());
    lines[start..end].iter().any(|line| {
        let line = line.as_ref().to_lowercase();
        line.contains("frame") || line.contains("fps")
    })
}

/// Whether a line uses `tokio::time::interval` nearby
#[must_use]
pub fn is_interval_context<S: AsRef<str>>(lines: &[S], idx: usize) -> bool {
    let start = idx.saturating_sub(20);
    let end = (idx + 5).min(lines.len());
    lines[start..end].iter().any(|line| {
        let line = line.as_ref();
        line.contains("interval.tick()") || line.contains("tokio::time::interval")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_signatures() {
        assert!(is_fn_signature("fn main() {"));
        assert!(is_fn_signature("    pub async fn open(services: LabServices) -> Self {"));
        assert!(is_fn_signature("pub(crate) fn helper() {"));
        assert!(!is_fn_signature("let f = fn_pointer;"));
        assert!(!is_fn_signature("// fn commented()"));
    }

    #[test]
    fn test_enclosing_fn_ends_with_body() {
        let code = [
            "fn first() {",
            "    one();",
            "}",
            "",
            "const X: u8 = 1;",
        ];
        assert_eq!(enclosing_fn(&code, 1), Some(0));
        assert_eq!(enclosing_fn(&code, 4), None);
    }

    #[test]
    fn test_async_detection() {
        let code = [
            "async fn load() {",
            "    std::fs::read_to_string(path);",
            "}",
            "fn sync_load() {",
            "    std::fs::read_to_string(path);",
            "}",
        ];
        assert!(is_in_async_fn(&code, 1));
        assert!(!is_in_async_fn(&code, 4));
    }

    #[test]
    fn test_test_code_detection() {
        let code = [
            "fn prod() {",
            "    work();",
            "}",
            "#[tokio::test]",
            "async fn test_it() {",
            "    tokio::time::sleep(d).await;",
            "}",
        ];
        assert!(!is_test_code(&code, 1));
        assert!(is_test_code(&code, 5));

        let module = ["fn prod() {}", "#[cfg(test)]", "mod tests {", "    x();", "}"];
        assert!(is_test_code(&module, 3));
    }

    #[test]
    fn test_frame_limiting_detection() {
        let code = [
            "fn render_loop() {",
            "    let frame_duration = Duration::from_millis(100);",
            "    loop {",
            "        render();",
            "        tokio::time::sleep(frame_duration).await;",
            "    }",
            "}",
        ];
        assert!(is_frame_limiting_context(&code, 4));

        let polling = ["loop {", "    check();", "    tokio::time::sleep(d).await;", "}"];
        assert!(!is_frame_limiting_context(&polling, 2));
    }

    #[test]
    fn test_interval_detection() {
        let code = [
            "let mut ticker = tokio::time::interval(step);",
            "loop {",
            "    ticker.tick().await;",
            "}",
        ];
        assert!(is_interval_context(&code, 2));
    }
}
