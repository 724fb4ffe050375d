// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId;
}

#[test]
fn define_id_hash_map_lookup_by_str() {
    let mut map = HashMap::new();
    map.insert(TestId::new("k"), 42);
    assert_eq!(map.get("k"), Some(&42));
}

#[test]
fn define_id_serializes_transparently() {
    let id = TestId::new("1f0c-77");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"1f0c-77\"");
    let parsed: TestId = serde_json::from_str("\"1f0c-77\"").unwrap();
    assert_eq!(parsed, id);
}

#[yare::parameterized(
    empty      = { "",       true },
    blank      = { "  ",     true },
    job        = { "job-1",  false },
)]
fn blank_ids_are_empty(raw: &str, empty: bool) {
    assert_eq!(TestId::new(raw).is_empty(), empty);
}

#[test]
fn compares_with_str() {
    let id = TestId::from(String::from("job-42"));
    assert!(id == *"job-42");
    assert_eq!(id.to_string(), "job-42");
}
