use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use blocklang::builder::build_tree;
use blocklang::parser::{ParseError, Parser};

#[derive(Debug, Deserialize)]
pub struct ExpectedError {
    /// Substring that must appear in the error message.
    pub contains: String,

    /// If set, the error's span must start on this 1-based listing line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Expected indented tree rendering (trimmed comparison).
    #[serde(default)]
    pub expect_tree: Option<String>,

    /// If true, the test expects the listing to fail to parse.
    #[serde(default)]
    pub expect_parse_error: bool,

    /// Expected parse errors, checked in order against the reported ones.
    /// Implies expect_parse_error when non-empty.
    #[serde(default)]
    pub expect_errors: Option<Vec<ExpectedError>>,
}

/// Parse a `.test.blocks` file into its TOML config and listing source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn fail(path: &Path, description: Option<String>, reason: String) -> TestResult {
    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    }
}

fn run_single_test(path: &Path) -> TestResult {
    // 1. Read file
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(path, None, format!("cannot read file: {}", e)),
    };

    // 2. Parse frontmatter
    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(path, None, format!("frontmatter error: {}", e)),
    };

    let description = config.description.clone();
    let expects_errors =
        config.expect_parse_error || config.expect_errors.as_ref().is_some_and(|e| !e.is_empty());

    // 3. Parse the listing
    let parser = Parser::new(source.to_string(), 0);
    let program = match parser.parse() {
        Ok(p) => p,
        Err(errors) => {
            if !expects_errors {
                let msgs: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
                return fail(
                    path,
                    description,
                    format!("unexpected parse error: {}", msgs.join("; ")),
                );
            }
            if let Some(expected) = &config.expect_errors {
                if let Some(reason) = check_errors(source, &errors, expected) {
                    return fail(path, description, reason);
                }
            }
            return TestResult {
                path: path.to_path_buf(),
                description,
                outcome: TestOutcome::Pass,
            };
        }
    };

    if expects_errors {
        return fail(
            path,
            description,
            "expected parse error, but parsing succeeded".into(),
        );
    }

    // 4. Build the tree and check the rendering
    if let Some(expected_tree) = &config.expect_tree {
        let actual = build_tree(&program.blocks).to_string();
        let actual_trimmed = actual.trim();
        let expected_trimmed = expected_tree.trim();
        if actual_trimmed != expected_trimmed {
            return fail(
                path,
                description,
                format!(
                    "tree mismatch\n  expected:\n{}\n  actual:\n{}",
                    indent(expected_trimmed),
                    indent(actual_trimmed)
                ),
            );
        }
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Pass,
    }
}

fn indent(s: &str) -> String {
    s.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that reported parse errors match expectations. Returns `Some(reason)`
/// on mismatch.
fn check_errors(
    source: &str,
    actual: &[ParseError],
    expected: &[ExpectedError],
) -> Option<String> {
    if actual.len() != expected.len() {
        let msgs: Vec<String> = actual.iter().map(|e| format!("  - {}", e.message)).collect();
        return Some(format!(
            "expected {} error(s), got {}\n  actual errors:\n{}",
            expected.len(),
            actual.len(),
            if msgs.is_empty() {
                "    (none)".to_string()
            } else {
                msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in actual.iter().zip(expected.iter()).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Some(format!(
                "error[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, actual.message
            ));
        }

        if let Some(expected_line) = expected.line {
            let actual_line = byte_offset_to_line(source, actual.span.start);
            if actual_line != expected_line {
                return Some(format!(
                    "error[{}]: expected on line {}, but span is on line {}",
                    i, expected_line, actual_line
                ));
            }
        }
    }

    None
}

/// Discover `.test.blocks` files grouped by category (subfolder relative to
/// root). Files directly in `root` get category "" (uncategorized).
/// Returns a BTreeMap so categories are sorted alphabetically.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".test.blocks") {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.blocks files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn result_label(result: &TestResult) -> String {
    result
        .description
        .clone()
        .unwrap_or_else(|| {
            result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("?")
                .to_string()
        })
}

fn print_summary(passed: usize, failed: usize, no_color: bool) {
    eprintln!();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!("test result: {}. {} passed, 0 failed", ok, passed);
    } else {
        let label = if no_color {
            "FAILED"
        } else {
            "\x1b[31mFAILED\x1b[0m"
        };
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            label,
            passed,
            failed,
            passed + failed
        );
    }
}

fn print_failures(failures: &[TestResult]) {
    if failures.is_empty() {
        return;
    }
    eprintln!();
    eprintln!("failures:");
    for f in failures {
        eprintln!();
        eprintln!("  --- {} ---", f.path.display());
        if let TestOutcome::Fail(reason) = &f.outcome {
            for line in reason.lines() {
                eprintln!("  {}", line);
            }
        }
    }
}

/// Run all `.test.blocks` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    // Single file mode — ignore categories
    if path.is_file() {
        let result = run_single_test(path);
        let label = result_label(&result);
        return match &result.outcome {
            TestOutcome::Pass => {
                eprintln!("  {}  {}", pass_label(no_color), label);
                print_summary(1, 0, no_color);
                0
            }
            TestOutcome::Fail(_) => {
                eprintln!("  {}  {}", fail_label(no_color), label);
                print_failures(std::slice::from_ref(&result));
                print_summary(0, 1, no_color);
                1
            }
        };
    }

    let all_categories = discover_categorized(path);

    if all_categories.is_empty() {
        eprintln!("no .test.blocks files found in {}", path.display());
        return 1;
    }

    // Filter categories if specified
    let run_categories: BTreeMap<&str, &Vec<PathBuf>> = if categories.is_empty() {
        all_categories.iter().map(|(k, v)| (k.as_str(), v)).collect()
    } else {
        let mut filtered = BTreeMap::new();
        for requested in categories {
            let req = requested.trim_matches('/');
            let mut found = false;
            for (cat, files) in &all_categories {
                if cat == req || cat.starts_with(&format!("{}/", req)) {
                    filtered.insert(cat.as_str(), files);
                    found = true;
                }
            }
            if !found {
                eprintln!(
                    "warning: category '{}' not found (available: {})",
                    req,
                    all_categories
                        .keys()
                        .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
        filtered
    };

    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &run_categories {
        let header = if cat.is_empty() {
            "(root)".to_string()
        } else {
            cat.to_string()
        };
        eprintln!();
        eprintln!("{}", bold(&header, no_color));

        for file in *files {
            let result = run_single_test(file);
            let label = result_label(&result);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), label);
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", fail_label(no_color), label);
                    failures.push(result);
                }
            }
        }
    }

    print_failures(&failures);
    let failed = failures.len();
    print_summary(passed, failed, no_color);
    if failed == 0 { 0 } else { 1 }
}
