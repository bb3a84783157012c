//! MinRand - random selection that cycles through a dataset before repeating
//!
//! A [`Selector`] holds a shared dataset and, for every key (a user, a session, a
//! device...), the history of values already drawn for that key. Each draw picks
//! uniformly among the values the key has not used yet. Once a key's history reaches
//! a configurable fraction of the dataset, its oldest half is dropped, so the key
//! starts cycling again while its most recent draws stay excluded for a while.
//!
//! # Example
//!
//! ```
//! use minrand_rs::{Config, ResetEvent, Selector};
//!
//! # fn example() -> Result<(), minrand_rs::Error> {
//! let mut selector: Selector<&str, u32> =
//!     Selector::with_config(vec![1, 2, 3, 4, 5], [], Config::seeded(42))?;
//!
//! selector.on_reset(|event: &ResetEvent<&str>| {
//!     println!("history of {} was trimmed", event.key);
//! });
//!
//! selector.create_history_key("alice", false)?;
//!
//! // The first four draws are all distinct
//! let mut drawn = Vec::new();
//! for _ in 0..4 {
//!     let value = selector.pick_next(&"alice")?;
//!     assert!(!drawn.contains(&value));
//!     drawn.push(value);
//! }
//!
//! // The fifth draw trims the two oldest entries first
//! selector.pick_next(&"alice")?;
//! assert_eq!(selector.history(&"alice").map(|h| h.len()), Some(3));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod error;
pub mod json;
pub mod listener;
pub mod model;
pub mod selector;
pub mod shared;

// Re-export commonly used types
pub use error::Error;
pub use listener::{ListenerId, ResetListener};
pub use model::{Config, ResetEvent, Snapshot};
pub use selector::Selector;
pub use shared::SharedSelector;
