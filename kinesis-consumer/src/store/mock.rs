use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use common_stream::SinkError;

use super::DocumentStore;
use crate::item::TrackingItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockStoreCall {
    Put(TrackingItem),
    Get(String),
}

#[derive(Default)]
struct MockState {
    items: HashMap<String, TrackingItem>,
    calls: Vec<MockStoreCall>,
}

/// In-memory document store for tests and local runs.
///
/// Writes can be made to fail per `program_id`; failed writes are recorded as
/// calls but leave the stored items untouched.
#[derive(Clone, Default)]
pub struct MockDocumentStore {
    state: Arc<Mutex<MockState>>,
    put_errors: HashMap<String, SinkError>,
    get_error: Option<SinkError>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Fail every write of an item with the given `program_id`.
    pub fn put_error_for(mut self, program_id: &str, err: SinkError) -> Self {
        self.put_errors.insert(program_id.to_owned(), err);
        self
    }

    pub fn get_error(mut self, err: SinkError) -> Self {
        self.get_error = Some(err);
        self
    }

    pub fn get_calls(&self) -> Vec<MockStoreCall> {
        self.lock_state().calls.clone()
    }

    /// Every item currently stored, in no particular order.
    pub fn items(&self) -> Vec<TrackingItem> {
        self.lock_state().items.values().cloned().collect()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn put(&self, item: &TrackingItem) -> Result<(), SinkError> {
        let mut state = self.lock_state();
        state.calls.push(MockStoreCall::Put(item.clone()));

        if let Some(err) = self.put_errors.get(&item.program_id) {
            return Err(err.clone());
        }

        state.items.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<TrackingItem>, SinkError> {
        let mut state = self.lock_state();
        state.calls.push(MockStoreCall::Get(id.to_owned()));

        if let Some(err) = &self.get_error {
            return Err(err.clone());
        }

        Ok(state.items.get(id).cloned())
    }
}
