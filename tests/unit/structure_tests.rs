/*!
 * Tests for collecting string leaves and rebuilding structures
 */

use std::collections::HashSet;

use serde_json::json;

use kisan_translate::errors::StructureError;
use kisan_translate::translation::structure::{collect, reconstruct};
use kisan_translate::translation::{Path, TreeValue};

fn keys(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn farm_report() -> TreeValue {
    TreeValue::from(json!({
        "crop": "Wheat",
        "acres": 4.5,
        "irrigated": false,
        "advice": [
            {"step": "Plough the field", "day": 1},
            {"step": "Sow seeds", "day": 3, "tags": ["rabi", "--"]}
        ],
        "farmer": {"id": "F-102", "name": "Ramesh"}
    }))
}

#[test]
fn test_collect_exclusionExample_shouldSkipExcludedSubtree() {
    let data = TreeValue::from(json!({"a": "hello", "secret": {"b": "world"}}));

    let collected = collect(&data, &keys(&["secret"]));

    assert_eq!(collected, vec![(Path::root().key("a"), "hello".to_string())]);
}

#[test]
fn test_collect_excludedKeyAtDepth_shouldSkipOnlyThatSubtree() {
    let collected = collect(&farm_report(), &keys(&["farmer", "tags"]));
    let texts: Vec<&str> = collected.iter().map(|(_, text)| text.as_str()).collect();

    assert_eq!(texts, vec!["Plough the field", "Sow seeds", "Wheat"]);
}

#[test]
fn test_collect_pathsShouldAddressTheirLeaves() {
    let data = farm_report();

    for (path, text) in collect(&data, &HashSet::new()) {
        assert_eq!(data.get_path(&path).and_then(TreeValue::as_str), Some(text.as_str()));
    }
}

#[test]
fn test_reconstruct_identity_shouldReturnEqualValue() {
    let data = farm_report();
    let (paths, texts): (Vec<Path>, Vec<String>) = collect(&data, &HashSet::new()).into_iter().unzip();

    let rebuilt = reconstruct(&data, &paths, &texts).unwrap();

    assert_eq!(rebuilt, data);
}

#[test]
fn test_reconstruct_shouldPreserveShapeAndScalars() {
    let data = farm_report();
    let (paths, texts): (Vec<Path>, Vec<String>) = collect(&data, &HashSet::new()).into_iter().unzip();
    let shouted: Vec<String> = texts.iter().map(|t| t.to_uppercase()).collect();

    let rebuilt = reconstruct(&data, &paths, &shouted).unwrap();

    assert_eq!(
        serde_json::Value::from(rebuilt),
        json!({
            "crop": "WHEAT",
            "acres": 4.5,
            "irrigated": false,
            "advice": [
                {"step": "PLOUGH THE FIELD", "day": 1},
                {"step": "SOW SEEDS", "day": 3, "tags": ["RABI", "--"]}
            ],
            "farmer": {"id": "F-102", "name": "RAMESH"}
        })
    );
    // input left untouched
    assert_eq!(data.get_path(&Path::root().key("crop")).and_then(TreeValue::as_str), Some("Wheat"));
}

#[test]
fn test_reconstruct_countMismatch_shouldFail() {
    let data = farm_report();
    let paths = vec![Path::root().key("crop")];

    let result = reconstruct(&data, &paths, &[]);

    assert_eq!(
        result,
        Err(StructureError::CountMismatch {
            paths: 1,
            translations: 0
        })
    );
}

#[test]
fn test_reconstruct_missingPath_shouldFail() {
    let data = farm_report();
    let paths = vec![Path::root().key("advice").index(7).key("step")];

    let result = reconstruct(&data, &paths, &["x".to_string()]);

    assert!(matches!(result, Err(StructureError::PathNotFound { .. })));
}

#[test]
fn test_reconstruct_nonStringLeaf_shouldFail() {
    let data = farm_report();
    let paths = vec![Path::root().key("acres")];

    let result = reconstruct(&data, &paths, &["x".to_string()]);

    assert_eq!(
        result,
        Err(StructureError::NotAString {
            path: "$.acres".to_string()
        })
    );
}

#[test]
fn test_path_display_shouldUseJsonPathNotation() {
    let path = Path::root().key("advice").index(1).key("tags");
    assert_eq!(path.to_string(), "$.advice[1].tags");
}
