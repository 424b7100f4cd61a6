//! Integration Test: Headless Core
//!
//! **Policy**: `lab-core` holds all state and behavior and knows nothing
//! about terminals. Rendering, key events and the system clipboard belong
//! to surfaces.

use std::fs;

use architectural_enforcement::{code_part, rust_files, workspace_root};

/// Crates only a surface may use
const SURFACE_CRATES: &[&str] = &["ratatui", "crossterm", "arboard"];

#[test]
fn test_core_sources_do_not_use_surface_crates() {
    let mut violations = Vec::new();
    for file in rust_files("lab/core/src") {
        for (idx, line) in file.lines.iter().enumerate() {
            let code = code_part(line);
            if let Some(name) = SURFACE_CRATES
                .iter()
                .find(|name| code.contains(&format!("{name}::")))
            {
                violations.push(file.describe(idx, name));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "lab-core must stay headless:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_core_manifest_has_no_surface_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("lab/core/Cargo.toml"))
        .expect("lab-core manifest readable");

    for name in SURFACE_CRATES {
        assert!(
            !manifest
                .lines()
                .any(|line| line.trim_start().starts_with(&format!("{name} "))
                    || line.trim_start().starts_with(&format!("{name}="))),
            "lab-core must not depend on {name}"
        );
    }
}
