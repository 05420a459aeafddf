use crate::error::Result;

/// Abstract interface for persisted client state.
///
/// Values are opaque strings; callers serialize structured data themselves.
/// All methods take `&self` so one backend can be shared through `Rc` by the
/// session store, the preference store and the HTTP adapter.
pub trait StorageBackend {
    /// Read the value under `key`, `Ok(None)` when absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove_item(&self, key: &str) -> Result<()>;
}
