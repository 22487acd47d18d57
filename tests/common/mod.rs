//! Shared test infrastructure for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

/// Fixtures that have a golden rendering under `tests/golden/`.
pub const GOLDEN_FIXTURES: [&str; 7] = [
    "readme",
    "support_ticket",
    "expense_table",
    "tech_setup",
    "morning_routine",
    "data_entry",
    "app_tour",
];

fn tests_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests")
}

pub fn fixture_path(name: &str) -> PathBuf {
    tests_dir().join("data").join(format!("{name}.txt"))
}

/// Raw workflow text from `tests/data/<name>.txt`.
pub fn fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("read fixture {}: {err}", path.display()))
}

/// Expected rendering from `tests/golden/<name>.txt`, without the final newline.
pub fn golden(name: &str) -> String {
    let path = tests_dir().join("golden").join(format!("{name}.txt"));
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("read golden {}: {err}", path.display()));
    text.trim_end().to_string()
}

/// Non-blank lines that carry text beyond a bare list marker.
pub fn content_lines(text: &str) -> usize {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_bare_marker(line))
        .count()
}

fn is_bare_marker(line: &str) -> bool {
    let body = line.trim_end_matches(['.', ')', ':']);
    let body = body
        .strip_prefix("Step ")
        .or_else(|| body.strip_prefix("step "))
        .unwrap_or(body);
    if matches!(line, "-" | "*" | "•") {
        return true;
    }
    body.len() <= 4
        && body.chars().next().is_some_and(|ch| ch.is_ascii_digit())
        && body.chars().all(|ch| ch.is_ascii_alphanumeric())
}
