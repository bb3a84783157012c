//! Conversion from plain JSON values at the library boundary.
//!
//! Saved state often arrives as a JSON array for the dataset and an object whose
//! properties are arrays of used values, keyed by consumer. These helpers check that
//! shape before handing typed values to the [`Selector`].

use crate::error::Error;
use crate::model::Config;
use crate::selector::Selector;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Debug;
use std::hash::Hash;

/// Decode a dataset, which must be a JSON array
pub fn decode_dataset<T: DeserializeOwned>(value: &Value) -> Result<Vec<T>, Error> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value.clone())?),
        other => Err(Error::InvalidArgument(format!(
            "dataset must be an array, got {}",
            kind(other)
        ))),
    }
}

/// Decode histories, which must be a JSON object whose properties are all arrays.
///
/// Keys come back in the order they appear in the input. An array is rejected even
/// though it is a JSON container, as is `null`.
pub fn decode_histories<T: DeserializeOwned>(
    value: &Value,
) -> Result<Vec<(String, Vec<T>)>, Error> {
    let Value::Object(map) = value else {
        return Err(Error::InvalidArgument(format!(
            "used data points must be an object, got {}",
            kind(value)
        )));
    };

    map.iter()
        .map(|(key, history)| {
            if !history.is_array() {
                return Err(Error::InvalidArgument(format!(
                    "used data points for {key:?} must be an array, got {}",
                    kind(history)
                )));
            }
            Ok((key.clone(), serde_json::from_value(history.clone())?))
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<T> Selector<String, T>
where
    T: Clone + Eq + Hash + Debug + DeserializeOwned,
{
    /// Build a Selector from a JSON dataset array and an optional JSON object of histories
    pub fn from_json(dataset: &Value, histories: Option<&Value>) -> Result<Self, Error> {
        Self::from_json_with_config(dataset, histories, Config::default())
    }

    pub fn from_json_with_config(
        dataset: &Value,
        histories: Option<&Value>,
        config: Config,
    ) -> Result<Self, Error> {
        let dataset = decode_dataset(dataset)?;
        let histories = match histories {
            Some(histories) => decode_histories(histories)?,
            None => Vec::new(),
        };
        Selector::with_config(dataset, histories, config)
    }
}

impl<K, T> Selector<K, T>
where
    K: Clone + Eq + Hash + Debug,
    T: Clone + Eq + Hash + Debug + DeserializeOwned,
{
    /// Replace the dataset from a JSON array, leaving it unchanged on failure
    pub fn set_dataset_json(&mut self, dataset: &Value) -> Result<(), Error> {
        self.set_dataset(decode_dataset(dataset)?);
        Ok(())
    }

    /// Overwrite the history for `key` from a JSON array, leaving it unchanged on failure
    pub fn set_history_json(&mut self, key: K, history: &Value) -> Result<(), Error> {
        if !history.is_array() {
            return Err(Error::InvalidArgument(format!(
                "used data points for {key:?} must be an array, got {}",
                kind(history)
            )));
        }
        self.set_history(key, serde_json::from_value(history.clone())?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_dataset_rejects_non_arrays() {
        for value in [json!("test"), json!({}), json!(null), json!(3)] {
            assert!(matches!(
                decode_dataset::<String>(&value),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_decode_dataset_element_type_mismatch() {
        assert!(matches!(
            decode_dataset::<u32>(&json!([1, "two"])),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_decode_histories_rejects_arrays_and_scalars() {
        for value in [json!([]), json!("test"), json!(null)] {
            assert!(matches!(
                decode_histories::<String>(&value),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_decode_histories_rejects_non_array_property() {
        let err = decode_histories::<String>(&json!({"user1": ["1"], "user2": "1"})).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument(
                "used data points for \"user2\" must be an array, got a string".to_string()
            )
        );
    }

    #[test]
    fn test_decode_histories() {
        let histories =
            decode_histories::<String>(&json!({"user1": ["1", "4"], "user2": []})).unwrap();
        assert_eq!(
            histories,
            vec![
                ("user1".to_string(), vec!["1".to_string(), "4".to_string()]),
                ("user2".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn test_decode_histories_keeps_input_order() {
        let histories: Vec<(String, Vec<u32>)> =
            serde_json::from_str::<Value>(r#"{"zeta": [1], "alpha": [], "mid": [2]}"#)
                .map_err(Error::from)
                .and_then(|value| decode_histories(&value))
                .unwrap();

        let keys: Vec<&str> = histories.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_set_history_json_leaves_state_on_failure() {
        let mut selector: Selector<String, u32> =
            Selector::from_json(&json!([1, 2, 3]), Some(&json!({"a": [1]}))).unwrap();

        assert!(selector.set_history_json("a".to_string(), &json!("test")).is_err());
        assert!(selector.set_dataset_json(&json!({})).is_err());

        assert_eq!(selector.history(&"a".to_string()), Some(&[1][..]));
        assert_eq!(selector.dataset(), &[1, 2, 3]);
    }
}
