use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Round-robin literal lists keyed by qualified name.
///
/// The first request for a key materializes its list; every request returns
/// the current head and moves it to the tail. State is never reset, so
/// repeated requests keep cycling across unrelated generation runs.
#[derive(Debug, Default)]
pub struct RotationTable {
    entries: Mutex<HashMap<(String, String), VecDeque<String>>>,
}

impl RotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next value for `(namespace, local_name)`, materializing the list with
    /// `values` on first use. Returns `None` for an empty list.
    pub fn next<F>(&self, namespace: &str, local_name: &str, values: F) -> Option<String>
    where
        F: FnOnce() -> Vec<String>,
    {
        let mut entries = self.entries.lock();
        let queue = entries
            .entry((namespace.to_string(), local_name.to_string()))
            .or_insert_with(|| values().into());

        let value = queue.pop_front()?;
        queue.push_back(value.clone());
        Some(value)
    }

}
