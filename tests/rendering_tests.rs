use std::fs;
use std::path::Path;

use sop_tree::config::Config;
use sop_tree::document::Document;
use sop_tree::expand_state::ExpandState;
use sop_tree::main_lib::render_outline;
use sop_tree::style::IconSet;

/// Test structure to hold test case information
#[derive(Debug)]
struct RenderingTest {
    name: String,
    document_path: String,
    expected_path: String,
}

/// Discover all rendering tests in the tests/rendering_tests directory
fn discover_rendering_tests() -> Vec<RenderingTest> {
    let test_dir = "tests/rendering_tests";
    let mut tests = Vec::new();

    if let Ok(entries) = fs::read_dir(test_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                if file_name.ends_with(".json") {
                    let name = file_name.trim_end_matches(".json").to_string();
                    let expected_path = format!("{}/{}.expected.txt", test_dir, name);

                    // Only include tests where the expected file exists
                    if Path::new(&expected_path).exists() {
                        tests.push(RenderingTest {
                            name,
                            document_path: path.to_string_lossy().to_string(),
                            expected_path,
                        });
                    }
                }
            }
        }
    }

    tests.sort_by(|a, b| a.name.cmp(&b.name));
    tests
}

/// Render a document file with its own initial expand set and ASCII icons
fn render_fixture(document_path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let document = Document::load_from_file(document_path)?;
    let expanded = ExpandState::with_expanded(document.expanded.iter().cloned());
    let config = Config {
        icons: IconSet::Ascii,
        ..Config::default()
    };
    Ok(render_outline(&document, &expanded, &config))
}

#[test]
fn test_all_rendering_fixtures() {
    let tests = discover_rendering_tests();
    assert!(!tests.is_empty(), "no rendering fixtures found");

    let mut failures = Vec::new();
    for test in &tests {
        let actual = render_fixture(&test.document_path)
            .unwrap_or_else(|e| panic!("{}: failed to render: {}", test.name, e));
        let expected = fs::read_to_string(&test.expected_path)
            .unwrap_or_else(|e| panic!("{}: failed to read expected output: {}", test.name, e));

        if actual != expected {
            failures.push(format!(
                "{}\n--- expected ---\n{}--- actual ---\n{}",
                test.name, expected, actual
            ));
        }
    }

    assert!(failures.is_empty(), "rendering mismatches:\n{}", failures.join("\n"));
}

#[test]
fn test_fixture_output_is_stable() {
    for test in discover_rendering_tests() {
        let first = render_fixture(&test.document_path).unwrap();
        let second = render_fixture(&test.document_path).unwrap();
        assert_eq!(first, second, "{} rendered differently twice", test.name);
    }
}
