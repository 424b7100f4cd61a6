//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Async functions in the lab core and the TUI MUST NOT use
//! blocking I/O.
//! **Required**: `tokio::fs`, `tokio::net`, `tokio::process`, async reqwest.
//! **Acceptable**: Non-async functions (config loading, terminal setup
//! before the loop starts) and test code.

use architectural_enforcement::{code_part, is_in_async_fn, is_test_code, rust_files};

/// Blocking calls and what they are
const FORBIDDEN: &[(&str, &str)] = &[
    ("std::fs::", "Blocking file I/O"),
    ("std::net::", "Blocking network I/O"),
    ("std::process::Command", "Blocking process I/O"),
    ("reqwest::blocking", "Blocking HTTP client"),
    ("std::thread::sleep", "Blocking sleep"),
    ("std::io::stdin()", "Blocking stdin"),
];

/// Test that async code does not use blocking I/O
#[test]
fn test_no_blocking_io_in_async_code() {
    let violations = find_blocking_io_violations();

    if !violations.is_empty() {
        eprintln!("\nBlocking I/O found in async code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nUse tokio::fs, tokio::net, tokio::process or move the call");
        eprintln!("into a non-async function that runs before the event loop.");

        panic!(
            "\nFound {} blocking I/O violation(s) in async code.",
            violations.len()
        );
    }
}

fn find_blocking_io_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for dir in ["lab/core/src", "tui/src"] {
        for file in rust_files(dir) {
            for (idx, line) in file.lines.iter().enumerate() {
                let code = code_part(line);
                let Some((_, what)) = FORBIDDEN.iter().find(|(pattern, _)| code.contains(pattern))
                else {
                    continue;
                };
                if is_test_code(&file.lines, idx) || !is_in_async_fn(&file.lines, idx) {
                    continue;
                }
                violations.push(file.describe(idx, what));
            }
        }
    }

    violations
}

#[test]
fn test_lab_core_uses_async_process_and_fs() {
    let speech = rust_files("lab/core/src")
        .into_iter()
        .find(|file| file.path.ends_with("lab/core/src/speech.rs"))
        .expect("speech module present");
    assert!(speech
        .lines
        .iter()
        .any(|line| line.contains("tokio::process::Command")));

    let persistence = rust_files("lab/core/src")
        .into_iter()
        .find(|file| file.path.ends_with("lab/core/src/persistence.rs"))
        .expect("persistence module present");
    assert!(persistence.lines.iter().any(|line| line.contains("tokio::fs")));
}
