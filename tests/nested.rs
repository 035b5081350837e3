use std::cell::Cell;

use gatherwait::{Error, memo::Memo, nested::access_nested_map};
use serde_json::json;

#[test]
fn access_nested_map_follows_path() {
    let cases = [
        (json!({"a": 1}), vec!["a"], json!(1)),
        (json!({"a": {"b": 2}}), vec!["a"], json!({"b": 2})),
        (json!({"a": {"b": 2}}), vec!["a", "b"], json!(2)),
        (json!({"a": {"b": 2}}), vec![], json!({"a": {"b": 2}})),
    ];

    for (map, path, expected) in cases {
        assert_eq!(
            access_nested_map(&map, &path).unwrap(),
            &expected,
            "access_nested_map({map}, {path:?})"
        );
    }
}

#[test]
fn access_nested_map_reports_missing_key() {
    let cases = [
        (json!({}), vec!["a"], "a"),
        (json!({"a": 1}), vec!["a", "b"], "b"),
        (json!({"a": {"b": 2}}), vec!["a", "b", "c"], "c"),
    ];

    for (map, path, missing) in cases {
        let err = access_nested_map(&map, &path).unwrap_err();
        assert!(
            matches!(&err, Error::KeyNotFound { key } if key == missing),
            "Lookup of {path:?} should fail on {missing:?}, got {err}"
        );
        assert!(
            err.to_string().contains(&format!("{missing:?}")),
            "Error message should cite the key: {err}"
        );
    }
}

#[test]
fn access_nested_map_accepts_owned_keys() {
    let map = json!({"license": {"key": "mit"}});
    let path = vec!["license".to_string(), "key".to_string()];
    assert_eq!(access_nested_map(&map, &path).unwrap(), &json!("mit"));
}

#[test]
fn memo_evaluates_once() {
    let calls = Cell::new(0);
    let memo = Memo::new();

    let compute = || {
        calls.set(calls.get() + 1);
        42
    };
    assert!(!memo.is_computed(), "Nothing should be cached yet");
    assert_eq!(*memo.get_or_init(compute), 42);
    assert_eq!(*memo.get_or_init(compute), 42);

    assert_eq!(calls.get(), 1, "Initializer should run exactly once");
    assert_eq!(memo.get(), Some(&42), "Value should stay cached");
}

#[test]
fn memo_retries_failed_initialization() {
    let calls = Cell::new(0);
    let memo: Memo<u32> = Memo::default();

    let failed: Result<&u32, &str> = memo.get_or_try_init(|| {
        calls.set(calls.get() + 1);
        Err("not yet")
    });
    assert_eq!(failed, Err("not yet"), "Failure should be propagated");
    assert!(!memo.is_computed(), "Failure should not be cached");

    for _ in 0..3 {
        let value = memo.get_or_try_init(|| {
            calls.set(calls.get() + 1);
            Ok::<_, &str>(7)
        });
        assert_eq!(value, Ok(&7));
    }
    assert_eq!(calls.get(), 2, "Initializer should stop running after success");
}
