//! Per-call message history
//!
//! History is mutated through a scoped transaction: [`MessageStore::begin`]
//! takes the call's lock, [`MessageTransaction::append`] stages messages and
//! [`MessageTransaction::commit`] makes them visible. Dropping a transaction
//! without committing releases the lock and discards what was staged.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use voicebot_core::Message;

use crate::PersistenceError;

/// Message history store trait
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Open a transaction on one call's history. Waits while another
    /// transaction on the same call is open.
    async fn begin(&self, call_id: Uuid) -> Result<Box<dyn MessageTransaction>, PersistenceError>;

    /// Committed messages of a call, oldest first
    async fn messages(&self, call_id: Uuid) -> Result<Vec<Message>, PersistenceError>;
}

/// Open transaction on one call's history
#[async_trait]
pub trait MessageTransaction: Send {
    fn append(&mut self, message: Message);

    /// Number of staged messages
    fn pending(&self) -> usize;

    async fn commit(self: Box<Self>) -> Result<(), PersistenceError>;
}

type History = Arc<Mutex<Vec<Message>>>;

/// In-memory message store (default)
#[derive(Default)]
pub struct InMemoryMessageStore {
    calls: RwLock<HashMap<Uuid, History>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn history(&self, call_id: Uuid) -> History {
        if let Some(history) = self.calls.read().get(&call_id) {
            return Arc::clone(history);
        }
        Arc::clone(self.calls.write().entry(call_id).or_default())
    }

    /// Forget a call's history
    pub fn remove(&self, call_id: Uuid) {
        self.calls.write().remove(&call_id);
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn begin(&self, call_id: Uuid) -> Result<Box<dyn MessageTransaction>, PersistenceError> {
        let guard = self.history(call_id).lock_owned().await;
        Ok(Box::new(InMemoryTransaction {
            call_id,
            guard,
            staged: Vec::new(),
        }))
    }

    async fn messages(&self, call_id: Uuid) -> Result<Vec<Message>, PersistenceError> {
        let history = self.history(call_id);
        let messages = history.lock().await.clone();
        Ok(messages)
    }
}

struct InMemoryTransaction {
    call_id: Uuid,
    guard: OwnedMutexGuard<Vec<Message>>,
    staged: Vec<Message>,
}

#[async_trait]
impl MessageTransaction for InMemoryTransaction {
    fn append(&mut self, message: Message) {
        self.staged.push(message);
    }

    fn pending(&self) -> usize {
        self.staged.len()
    }

    async fn commit(self: Box<Self>) -> Result<(), PersistenceError> {
        let InMemoryTransaction {
            call_id,
            mut guard,
            staged,
        } = *self;
        let count = staged.len();
        guard.extend(staged);
        tracing::debug!(call_id = %call_id, count, total = guard.len(), "Committed messages");
        Ok(())
    }
}
