//! Runs every merge scenario under `tests/scenarios/`. Each `.yml` file
//! holds one or more YAML documents of the shape:
//!
//! ```not_rust
//! name: what the scenario shows
//! base: |-
//!   ...
//! user: |-
//!   ...
//! server: |-
//!   ...
//! expected: |-
//!   ...
//! verse_alignment: true   # optional, defaults to true
//! conflicts: []           # optional expected conflict records
//! ```

use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use serde::Deserialize;
use usfm_merge::{MergeOptions, merge};

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    base: String,
    user: String,
    server: String,
    expected: String,
    #[serde(default = "default_verse_alignment")]
    verse_alignment: bool,
    #[serde(default)]
    conflicts: Vec<ExpectedConflict>,
}

#[derive(Debug, Deserialize)]
struct ExpectedConflict {
    base: String,
    user: String,
    server: String,
}

fn default_verse_alignment() -> bool { true }

impl Scenario {
    fn options(&self) -> MergeOptions {
        MergeOptions {
            verse_alignment: self.verse_alignment,
            ..MergeOptions::default()
        }
    }
}

fn all_scenarios() -> Vec<Scenario> {
    let scenarios_dir = Path::new("tests/scenarios");
    let mut paths: Vec<_> = fs::read_dir(scenarios_dir)
        .expect("Failed to read scenarios directory")
        .map(|entry| entry.expect("Failed to read directory entry").path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("yml"))
        .collect();
    paths.sort();

    let mut scenarios = Vec::new();
    for path in paths {
        let file = fs::File::open(&path).expect("Failed to open scenario file");
        for document in serde_yaml::Deserializer::from_reader(file) {
            scenarios.push(Scenario::deserialize(document).expect("Failed to deserialize scenario"));
        }
    }

    assert!(!scenarios.is_empty(), "No scenarios found");
    scenarios
}

#[test]
fn test_scenarios_merge_as_expected() {
    for scenario in all_scenarios() {
        let merged = merge(
            &scenario.base,
            &scenario.user,
            &scenario.server,
            &scenario.options(),
        );

        assert_eq!(
            merged.text, scenario.expected,
            "merged text of '{}'",
            scenario.name
        );
        assert_eq!(
            merged.conflicts.len(),
            scenario.conflicts.len(),
            "conflict count of '{}'",
            scenario.name
        );

        for (actual, expected) in merged.conflicts.iter().zip(&scenario.conflicts) {
            assert_eq!(actual.base, expected.base, "conflict base of '{}'", scenario.name);
            assert_eq!(actual.user, expected.user, "conflict user of '{}'", scenario.name);
            assert_eq!(
                actual.server, expected.server,
                "conflict server of '{}'",
                scenario.name
            );
            assert_eq!(
                actual.resolved, actual.server,
                "conflict resolution of '{}' must prefer the server",
                scenario.name
            );
            assert_eq!(
                actual.location, None,
                "the engine must not invent a location for '{}'",
                scenario.name
            );
        }
    }
}

#[test]
fn test_scenarios_are_deterministic() {
    for scenario in all_scenarios() {
        let options = scenario.options();
        let first = merge(&scenario.base, &scenario.user, &scenario.server, &options);
        let second = merge(&scenario.base, &scenario.user, &scenario.server, &options);
        assert_eq!(first, second, "'{}' must be reproducible", scenario.name);
    }
}

#[test]
fn test_scenarios_with_agreeing_sides_ignore_base() {
    // Whatever the ancestor, two sides that agree are already merged.
    for scenario in all_scenarios() {
        let merged = merge(
            &scenario.base,
            &scenario.user,
            &scenario.user,
            &scenario.options(),
        );
        assert_eq!(merged.text, scenario.user, "'{}'", scenario.name);
        assert_eq!(merged.conflicts.len(), 0, "'{}'", scenario.name);
    }
}

#[test]
fn test_scenarios_merged_three_ways_with_itself_are_stable() {
    // Merging the expected output with itself against itself is an identity.
    for scenario in all_scenarios() {
        let merged = merge(
            &scenario.expected,
            &scenario.expected,
            &scenario.expected,
            &scenario.options(),
        );
        assert_eq!(merged.text, scenario.expected, "'{}'", scenario.name);
        assert_eq!(merged.conflicts.len(), 0, "'{}'", scenario.name);
    }
}
