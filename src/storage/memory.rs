//! An in-process [`Store`], for tests and embedding.

use std::cell::RefCell;

use crate::{
    Request,
    storage::{Store, StoreError},
};

/// Keeps requests in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    requests: RefCell<Vec<Request>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `requests`.
    #[must_use]
    pub const fn with_requests(requests: Vec<Request>) -> Self {
        Self {
            requests: RefCell::new(requests),
        }
    }

    /// Returns a copy of the stored requests.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Vec<Request>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, requests: &[Request]) -> Result<(), StoreError> {
        *self.requests.borrow_mut() = requests.to_vec();
        Ok(())
    }
}
