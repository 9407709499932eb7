//! The persistence-collaborator boundary.
//!
//! The tracker treats its document database as an async key-value store of
//! JSON documents. There is no retry, no timeout, and no transaction here;
//! callers get a plain `Result` and decide what to tell the user. Stale
//! reads across sessions are a known property of the system, not something
//! this boundary papers over.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

/// Errors crossing the document-store boundary.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("Corrupt document: {0}")]
    Corrupt(String),
}

/// Async CRUD over plan documents, keyed by plan id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load every plan document in the collection.
    async fn load_all(&self) -> Result<Vec<Value>, PersistenceError>;

    /// Create a new document. Rejected when the id already exists.
    async fn create(&self, id: &str, doc: Value) -> Result<(), PersistenceError>;

    /// Replace an existing document. Rejected when the id is absent.
    async fn update(&self, id: &str, doc: Value) -> Result<(), PersistenceError>;

    /// Delete a document. Deleting an absent id is not an error.
    async fn delete(&self, id: &str) -> Result<(), PersistenceError>;
}

/// In-memory [`DocumentStore`] used by tests and as the default local
/// collaborator. An injectable failure mode simulates an unreachable
/// backend for exercising fail-closed hydration.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    docs: Mutex<HashMap<String, Value>>,
    unavailable: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load documents, bypassing the `create` duplicate check.
    pub async fn seed(&self, docs: impl IntoIterator<Item = (String, Value)>) {
        self.docs.lock().await.extend(docs);
    }

    /// Toggle the simulated outage. While set, every operation returns
    /// [`PersistenceError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.lock().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<Value> {
        self.docs.lock().await.get(id).cloned()
    }

    fn check_available(&self) -> Result<(), PersistenceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "simulated outage".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load_all(&self) -> Result<Vec<Value>, PersistenceError> {
        self.check_available()?;
        Ok(self.docs.lock().await.values().cloned().collect())
    }

    async fn create(&self, id: &str, doc: Value) -> Result<(), PersistenceError> {
        self.check_available()?;
        let mut docs = self.docs.lock().await;
        if docs.contains_key(id) {
            return Err(PersistenceError::Rejected(format!(
                "document {id} already exists"
            )));
        }
        docs.insert(id.to_string(), doc);
        Ok(())
    }

    async fn update(&self, id: &str, doc: Value) -> Result<(), PersistenceError> {
        self.check_available()?;
        let mut docs = self.docs.lock().await;
        match docs.get_mut(id) {
            Some(slot) => {
                *slot = doc;
                Ok(())
            }
            None => Err(PersistenceError::Rejected(format!(
                "document {id} does not exist"
            ))),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        self.check_available()?;
        self.docs.lock().await.remove(id);
        Ok(())
    }
}
