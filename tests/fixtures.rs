//! Fixture corpus tests.
//!
//! Each fixture pins the exact HTML for one input, so output drift in any
//! stage shows up as a concrete diff.

use draftmark::render;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    markdown: String,
    html: String,
}

fn load_fixtures() -> Vec<Fixture> {
    let json = fs::read_to_string("tests/fixtures.json").expect("failed to read tests/fixtures.json");
    serde_json::from_str(&json).expect("failed to parse fixtures.json")
}

#[test]
fn fixtures_render_exactly() {
    let mut failures = Vec::new();

    for fixture in load_fixtures() {
        let output = render(&fixture.markdown);
        if output != fixture.html {
            failures.push(format!(
                "{}:\n  input:    {:?}\n  expected: {:?}\n  actual:   {:?}",
                fixture.name, fixture.markdown, fixture.html, output
            ));
        }
    }

    assert!(failures.is_empty(), "\n{}", failures.join("\n"));
}
