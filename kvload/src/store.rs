//! The store capability exercised by a read test.
use std::fmt;

/// A key-value store read path.
///
/// `Ok(Some(_))` is a hit, `Ok(None)` a miss and `Err(_)` an operation failure. Only hits count
/// as successful operations. Implement [`KvStore`]; `LocalKvStore` is generated alongside it
/// for stores whose futures are not `Send`.
///
/// # Example
/// ```
/// use kvload::KvStore;
/// use std::collections::HashMap;
///
/// struct MapStore(HashMap<u64, String>);
///
/// impl KvStore for MapStore {
///     type Value = String;
///     type Error = std::convert::Infallible;
///
///     async fn read(&self, key: u64) -> Result<Option<String>, Self::Error> {
///         Ok(self.0.get(&key).cloned())
///     }
/// }
/// ```
#[trait_variant::make(KvStore: Send)]
pub trait LocalKvStore {
    type Value;
    type Error: fmt::Display;

    async fn read(&self, key: u64) -> Result<Option<Self::Value>, Self::Error>;
}

/// Classification of a single read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Hit,
    Miss,
    Error,
}

impl ReadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ReadOutcome::Hit)
    }
}
