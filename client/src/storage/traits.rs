//! # Storage Traits
//!
//! The domain layer only needs a tiny string key-value store (display
//! preferences such as the chart color map). Implementations are injected so
//! the aggregation logic can be tested without touching the filesystem.

use anyhow::Result;

/// Persistent string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Replace the value under `key` with `apply(current)` in one step.
    /// No other write to the store lands between the read and the write.
    fn update(&self, key: &str, apply: &mut dyn FnMut(Option<String>) -> Result<String>) -> Result<()>;
}
