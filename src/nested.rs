use serde_json::Value;

use crate::error::{Error, Result};

/// Walks `map` along `path`, one object key per step.
///
/// An empty path yields `map` itself. Fails with [`Error::KeyNotFound`] naming
/// the first key that is missing, or that is applied to a value which is not
/// an object.
///
/// ```
/// # use gatherwait::nested::access_nested_map;
/// # use serde_json::json;
/// let map = json!({"a": {"b": 2}});
/// assert_eq!(access_nested_map(&map, &["a", "b"]).unwrap(), &json!(2));
/// assert!(access_nested_map(&map, &["a", "b", "c"]).is_err());
/// ```
pub fn access_nested_map<'a, K>(map: &'a Value, path: &[K]) -> Result<&'a Value>
where
    K: AsRef<str>,
{
    path.iter().try_fold(map, |current, key| {
        let key = key.as_ref();
        current
            .as_object()
            .and_then(|object| object.get(key))
            .ok_or_else(|| Error::KeyNotFound {
                key: key.to_owned(),
            })
    })
}
