use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Default fraction of the dataset a history may reach before it gets trimmed
pub const DEFAULT_RESET_THRESHOLD: f64 = 0.9;
pub const MIN_RESET_THRESHOLD: f64 = 0.01;
pub const MAX_RESET_THRESHOLD: f64 = 0.99;

/// Check a reset threshold the same way for the setter, the config and snapshots.
pub fn validate_reset_threshold(threshold: f64) -> Result<f64, Error> {
    if !threshold.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "reset threshold must be numerical, got {threshold}"
        )));
    }

    if !(MIN_RESET_THRESHOLD..=MAX_RESET_THRESHOLD).contains(&threshold) {
        return Err(Error::OutOfRange(threshold));
    }

    Ok(threshold)
}

/// History length at which a key gets trimmed on its next pick.
///
/// Returns `None` for an empty dataset, which never triggers a trim.
pub fn trim_limit(dataset_len: usize, threshold: f64) -> Option<usize> {
    if dataset_len == 0 {
        return None;
    }
    Some((dataset_len as f64 * threshold).floor() as usize)
}

/// Number of oldest entries dropped by a trim: `ceil(len / 2)`.
pub fn trim_count(history_len: usize) -> usize {
    history_len.div_ceil(2)
}

/// Configuration for a Selector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Fraction of the dataset size at which a key's history gets trimmed
    pub reset_threshold: f64,
    /// Seed for a reproducible draw sequence; seeded from the OS when absent
    pub seed: Option<u64>,
}

impl Config {
    pub fn new(reset_threshold: f64, seed: Option<u64>) -> Self {
        Self {
            reset_threshold,
            seed,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_reset_threshold(self.reset_threshold).map(|_| ())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reset_threshold: DEFAULT_RESET_THRESHOLD,
            seed: None,
        }
    }
}

/// Payload delivered to reset listeners after a key's history was trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetEvent<K> {
    pub key: K,
}

/// Serializable state of a Selector, for saving to and restoring from an external store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<K, T>
where
    K: std::hash::Hash + Eq,
{
    pub dataset: Vec<T>,
    pub histories: IndexMap<K, Vec<T>>,
    #[serde(default = "default_reset_threshold")]
    pub reset_threshold: f64,
}

fn default_reset_threshold() -> f64 {
    DEFAULT_RESET_THRESHOLD
}
