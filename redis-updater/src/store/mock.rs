use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use common_stream::SinkError;

use super::FieldMapStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockStoreCall {
    Replace(String),
    Read(String),
}

#[derive(Default)]
struct MockState {
    maps: HashMap<String, HashMap<String, String>>,
    calls: Vec<MockStoreCall>,
}

/// In-memory field map store for tests and local runs.
#[derive(Clone, Default)]
pub struct MockFieldMapStore {
    state: Arc<Mutex<MockState>>,
    replace_errors: HashMap<String, SinkError>,
    read_error: Option<SinkError>,
}

impl MockFieldMapStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Fail every replace of `key`, leaving the stored map as it was.
    pub fn replace_error_for(mut self, key: &str, err: SinkError) -> Self {
        self.replace_errors.insert(key.to_owned(), err);
        self
    }

    pub fn read_error(mut self, err: SinkError) -> Self {
        self.read_error = Some(err);
        self
    }

    pub fn get_calls(&self) -> Vec<MockStoreCall> {
        self.lock_state().calls.clone()
    }

    /// Keys currently holding a field map, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock_state().maps.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl FieldMapStore for MockFieldMapStore {
    async fn replace(&self, key: &str, fields: &[(&'static str, String)]) -> Result<(), SinkError> {
        let mut state = self.lock_state();
        state.calls.push(MockStoreCall::Replace(key.to_owned()));

        if let Some(err) = self.replace_errors.get(key) {
            return Err(err.clone());
        }

        let map = fields
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect();
        state.maps.insert(key.to_owned(), map);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<HashMap<String, String>, SinkError> {
        let mut state = self.lock_state();
        state.calls.push(MockStoreCall::Read(key.to_owned()));

        if let Some(err) = &self.read_error {
            return Err(err.clone());
        }

        Ok(state.maps.get(key).cloned().unwrap_or_default())
    }
}
