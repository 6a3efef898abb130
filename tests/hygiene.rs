//! Source hygiene checks for the library and the CLI.
//!
//! Each pattern has a budget. The budget only ever shrinks: fix an existing
//! hit before adding a new one.

use std::fs;
use std::path::{Path, PathBuf};

/// (pattern, what it means, budget)
const BUDGETS: &[(&str, &str, usize)] = &[
    (".unwrap()", "panics on error", 0),
    (".expect(", "panics on error", 0),
    ("panic!(", "crashes the process", 0),
    ("unreachable!(", "crashes the process", 0),
    ("todo!(", "unfinished stub", 0),
    ("unimplemented!(", "unfinished stub", 0),
    ("let _ =", "discards a result unseen", 0),
    ("#[allow(dead_code)]", "hides unused code", 0),
    // Each `.ok()` maps a lookup failure to "absent": header text, role
    // parsing, browser handles.
    (".ok()", "drops an error", 4),
];

const ROOTS: &[&str] = &["src", "cli/src"];

fn is_test_file(path: &Path) -> bool {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    name.ends_with("_test.rs") || name == "test_helpers.rs"
}

fn collect(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") && !is_test_file(&path) {
            out.push(path);
        }
    }
}

fn production_sources() -> Vec<(String, String)> {
    let mut paths = Vec::new();
    for root in ROOTS {
        collect(Path::new(root), &mut paths);
    }
    paths
        .into_iter()
        .filter_map(|path| {
            let content = fs::read_to_string(&path).ok()?;
            Some((path.to_string_lossy().into_owned(), content))
        })
        .collect()
}

#[test]
fn sources_are_found() {
    let sources = production_sources();
    assert!(sources.iter().any(|(path, _)| path.ends_with("token_manager.rs")));
    assert!(sources.iter().all(|(path, _)| !path.ends_with("_test.rs")));
}

#[test]
fn pattern_budgets_hold() {
    let sources = production_sources();
    let mut failures = Vec::new();

    for &(pattern, meaning, budget) in BUDGETS {
        let hits: Vec<String> = sources
            .iter()
            .filter_map(|(path, content)| {
                let count = content.lines().filter(|line| line.contains(pattern)).count();
                (count > 0).then(|| format!("  {path}: {count}"))
            })
            .collect();
        let total: usize = sources
            .iter()
            .map(|(_, content)| content.lines().filter(|line| line.contains(pattern)).count())
            .sum();
        if total > budget {
            failures.push(format!("`{pattern}` ({meaning}): found {total}, max {budget}\n{}", hits.join("\n")));
        }
    }

    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}
