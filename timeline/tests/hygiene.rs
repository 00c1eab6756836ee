//! Hygiene: coding standards checked at test time.
//!
//! Scans the timeline crate's production sources for patterns the project
//! keeps out. Each pattern has a budget (zero for all of them today). To add
//! an occurrence you first have to remove another; budgets only shrink.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    // Panics: a host embedding the core must never crash from it.
    Budget { pattern: ".unwrap()", max: 0, why: "propagate or handle the error" },
    Budget { pattern: ".expect(", max: 0, why: "propagate or handle the error" },
    Budget { pattern: "panic!(", max: 0, why: "return an error instead" },
    Budget { pattern: "unreachable!(", max: 0, why: "make the state unrepresentable" },
    Budget { pattern: "todo!(", max: 0, why: "finish the stub" },
    Budget { pattern: "unimplemented!(", max: 0, why: "finish the stub" },
    // Silent loss.
    Budget { pattern: "let _ =", max: 0, why: "inspect or log the discarded value" },
    Budget { pattern: ".ok()", max: 0, why: "inspect or log the discarded error" },
    // Output goes through tracing.
    Budget { pattern: "println!(", max: 0, why: "use tracing" },
    Budget { pattern: "eprintln!(", max: 0, why: "use tracing" },
    Budget { pattern: "dbg!(", max: 0, why: "use tracing" },
    // Structure.
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete the code" },
];

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`. Sibling `_test.rs` files and the
/// shared test fakes are excluded.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn is_test_source(path: &str) -> bool {
    path.ends_with("_test.rs") || path.ends_with("test_helpers.rs")
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path.extension().is_none_or(|e| e != "rs") || is_test_source(&path_str) {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")), "run from the timeline crate root");
    assert!(!files.iter().any(|f| is_test_source(&f.path)));
}

#[test]
fn budgets_hold() {
    let files = source_files();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            let detail: Vec<String> = found.iter().map(|(path, c)| format!("    {path}: {c}")).collect();
            failures.push(format!(
                "`{}` budget exceeded: found {count}, max {} ({}).\n{}",
                budget.pattern,
                budget.max,
                budget.why,
                detail.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
