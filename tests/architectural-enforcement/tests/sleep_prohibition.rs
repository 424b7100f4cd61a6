//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the lab core and the TUI MUST NOT call
//! sleep methods. Waiting happens on I/O, channels or intervals.
//! **Exceptions**: Frame rate limiting (TUI app loop only), interval
//! tickers, test code.

use architectural_enforcement::{
    code_part, is_frame_limiting_context, is_interval_context, is_test_code, rust_files,
};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nAcceptable sleep uses:");
        eprintln!("  - Frame rate limiting in tui/src/app.rs");
        eprintln!("  - Periodic tasks using tokio::time::interval()");
        eprintln!("  - Test code");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for (dir, allow_frame_limiting) in [("lab/core/src", false), ("tui/src", true)] {
        for file in rust_files(dir) {
            for (idx, line) in file.lines.iter().enumerate() {
                let code = code_part(line);
                if !code.contains("::sleep(") && !code.contains(".sleep(") {
                    continue;
                }
                if is_test_code(&file.lines, idx) {
                    continue;
                }
                if allow_frame_limiting
                    && file.path.ends_with("tui/src/app.rs")
                    && is_frame_limiting_context(&file.lines, idx)
                {
                    continue;
                }
                if is_interval_context(&file.lines, idx) {
                    continue;
                }
                violations.push(file.describe(idx, "sleep"));
            }
        }
    }

    violations
}

#[test]
fn test_scanner_sees_the_workspace() {
    assert!(
        !rust_files("lab/core/src").is_empty(),
        "lab/core/src should contain Rust sources"
    );
    assert!(
        rust_files("tui/src")
            .iter()
            .any(|file| file.path.ends_with("tui/src/app.rs")),
        "tui/src/app.rs should be scanned"
    );
}
