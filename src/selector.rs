use crate::error::Error;
use crate::listener::{ListenerId, Listeners, ResetListener};
use crate::model::{trim_count, trim_limit, validate_reset_threshold, Config, ResetEvent, Snapshot};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

#[cfg(feature = "tracing")]
use tracing::{debug, info, instrument, warn};

// No-op macros when tracing is disabled
#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {{}};
}
#[cfg(not(feature = "tracing"))]
macro_rules! info {
    ($($tt:tt)*) => {{}};
}
#[cfg(not(feature = "tracing"))]
macro_rules! warn {
    ($($tt:tt)*) => {{}};
}

/// Random selection over a shared dataset that avoids repeating values per key.
///
/// Each key keeps a history of the values already drawn for it, oldest first. Draws
/// only consider dataset values missing from that history, and once the history
/// reaches `floor(dataset.len() * reset_threshold)` entries its oldest half is dropped
/// before the next draw.
pub struct Selector<K, T> {
    dataset: Vec<T>,
    histories: IndexMap<K, Vec<T>>,
    reset_threshold: f64,
    listeners: Listeners<K>,
    rng: StdRng,
}

impl<K, T> Selector<K, T>
where
    K: Clone + Eq + Hash + Debug,
    T: Clone + Eq + Hash + Debug,
{
    /// Create a Selector with no histories and the default configuration
    pub fn new(dataset: Vec<T>) -> Self {
        Self::with_histories(dataset, std::iter::empty())
    }

    /// Create a Selector with initial histories, e.g. restored from an external store
    pub fn with_histories<I>(dataset: Vec<T>, histories: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<T>)>,
    {
        Self::build(dataset, histories.into_iter().collect(), &Config::default())
    }

    /// Create a Selector with an explicit configuration
    pub fn with_config<I>(dataset: Vec<T>, histories: I, config: Config) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, Vec<T>)>,
    {
        config.validate()?;
        Ok(Self::build(dataset, histories.into_iter().collect(), &config))
    }

    /// Restore a Selector from a [`Snapshot`], drawing from an OS-seeded RNG
    pub fn from_snapshot(snapshot: Snapshot<K, T>) -> Result<Self, Error> {
        let config = Config::new(snapshot.reset_threshold, None);
        config.validate()?;
        Ok(Self::build(snapshot.dataset, snapshot.histories, &config))
    }

    fn build(dataset: Vec<T>, histories: IndexMap<K, Vec<T>>, config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            dataset,
            histories,
            reset_threshold: config.reset_threshold,
            listeners: Listeners::new(),
            rng,
        }
    }

    /// Copy out the dataset, histories and threshold
    pub fn snapshot(&self) -> Snapshot<K, T> {
        Snapshot {
            dataset: self.dataset.clone(),
            histories: self.histories.clone(),
            reset_threshold: self.reset_threshold,
        }
    }

    pub fn dataset(&self) -> &[T] {
        &self.dataset
    }

    /// Replace the dataset wholesale.
    ///
    /// Histories are left untouched, so they may keep values that are no longer in
    /// the dataset. Use [`Selector::remove_dataset_point`] to prune a value everywhere.
    pub fn set_dataset(&mut self, dataset: Vec<T>) {
        debug!(len = dataset.len(), "Replacing dataset");
        self.dataset = dataset;
    }

    pub fn reset_threshold(&self) -> f64 {
        self.reset_threshold
    }

    pub fn set_reset_threshold(&mut self, threshold: f64) -> Result<(), Error> {
        self.reset_threshold = validate_reset_threshold(threshold)?;
        Ok(())
    }

    /// Append a value to the dataset. Duplicates are allowed.
    pub fn add_dataset_point(&mut self, value: T) {
        self.dataset.push(value);
    }

    /// Remove every occurrence of `value` from the dataset and from every history
    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub fn remove_dataset_point(&mut self, value: &T) {
        self.dataset.retain(|v| v != value);
        for history in self.histories.values_mut() {
            history.retain(|v| v != value);
        }
        debug!("Removed data point from dataset and histories");
    }

    /// All histories, in key insertion order
    pub fn histories(&self) -> &IndexMap<K, Vec<T>> {
        &self.histories
    }

    pub fn history(&self, key: &K) -> Option<&[T]> {
        self.histories.get(key).map(Vec::as_slice)
    }

    pub fn has_history(&self, key: &K) -> bool {
        self.histories.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.histories.keys()
    }

    /// Overwrite (or create) the history for `key`
    pub fn set_history(&mut self, key: K, history: Vec<T>) {
        self.histories.insert(key, history);
    }

    /// Record `value` as used for `key` without drawing it.
    ///
    /// Fails with `NotFound` when the key has no history or the value is not in the
    /// dataset, and with `AlreadyExists` when the key already used the value.
    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub fn add_used_point(&mut self, key: &K, value: T) -> Result<(), Error> {
        let history = self
            .histories
            .get_mut(key)
            .ok_or_else(|| Error::key_missing(key))?;

        if !self.dataset.contains(&value) {
            return Err(Error::NotFound(format!("data point {value:?}")));
        }

        if history.contains(&value) {
            return Err(Error::AlreadyExists(format!(
                "data point {value:?} for key {key:?}"
            )));
        }

        history.push(value);
        Ok(())
    }

    /// Start an empty history for `key`. With `force` an existing history is emptied.
    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub fn create_history_key(&mut self, key: K, force: bool) -> Result<(), Error> {
        if !force && self.histories.contains_key(&key) {
            return Err(Error::key_exists(&key));
        }

        self.histories.insert(key, Vec::new());
        Ok(())
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub fn remove_history_key(&mut self, key: &K) -> Result<Vec<T>, Error> {
        self.histories
            .shift_remove(key)
            .ok_or_else(|| Error::key_missing(key))
    }

    /// Register a listener called synchronously whenever a history gets trimmed.
    ///
    /// Listeners run in registration order, before the draw that triggered the trim.
    pub fn on_reset<L>(&mut self, listener: L) -> ListenerId
    where
        L: ResetListener<K> + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    /// Returns false if the listener was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Draw a random dataset value not yet used by `key` and record it in its history.
    ///
    /// When the history has reached the reset threshold, its oldest half is dropped
    /// first and reset listeners are notified. Exclusion is by value: a value with any
    /// used occurrence is excluded together with all its duplicates.
    ///
    /// Fails with `NotFound` when the key has no history, and with `Exhausted` when
    /// every dataset value is already in the history (a trim, if any, is kept).
    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub fn pick_next(&mut self, key: &K) -> Result<T, Error> {
        let history = self
            .histories
            .get_mut(key)
            .ok_or_else(|| Error::key_missing(key))?;

        let trimmed = match trim_limit(self.dataset.len(), self.reset_threshold) {
            Some(limit) if history.len() >= limit => {
                let dropped = trim_count(history.len());
                *history = history.split_off(dropped);
                info!(
                    dropped,
                    retained = history.len(),
                    limit,
                    "History reached reset threshold - dropped oldest entries"
                );
                true
            }
            _ => false,
        };

        if trimmed {
            self.listeners.notify(&ResetEvent { key: key.clone() });
        }

        let used: HashSet<&T> = history.iter().collect();
        let candidates: Vec<&T> = self
            .dataset
            .iter()
            .filter(|value| !used.contains(value))
            .collect();

        let Some(&picked) = candidates.choose(&mut self.rng) else {
            warn!(
                dataset_len = self.dataset.len(),
                "No unused data points left to draw from"
            );
            return Err(Error::Exhausted(format!("{key:?}")));
        };
        let picked = picked.clone();

        debug!(
            candidates = candidates.len(),
            picked = ?picked,
            "Picked data point"
        );

        drop(used);
        history.push(picked.clone());
        Ok(picked)
    }
}

impl<K: Debug, T: Debug> Debug for Selector<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("dataset", &self.dataset)
            .field("histories", &self.histories)
            .field("reset_threshold", &self.reset_threshold)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
