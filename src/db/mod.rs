//! Conversation persistence.
//!
//! Routes and services only see [`ConversationStore`]; the backend is picked at
//! startup from `conversation_store.backend`.

pub mod chat;
pub mod memory;

use crate::models::{Conversation, ConversationSummary, Message, Role};
use async_trait::async_trait;
use uuid::Uuid;

pub use chat::PgConversationStore;
pub use memory::InMemoryConversationStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Creates an empty conversation with a fresh identifier.
    async fn create(&self) -> Result<Conversation, StoreError>;

    /// Conversation with its messages in insertion order.
    async fn fetch(&self, id: Uuid) -> Result<Option<Conversation>, StoreError>;

    /// Appends a message. An unknown `id` starts a new conversation whose first
    /// message is this one; the returned message carries the id actually used.
    async fn append_message(
        &self,
        id: Uuid,
        role: Role,
        text: &str,
    ) -> Result<Message, StoreError>;

    /// Messages in insertion order, empty for an unknown conversation.
    async fn history(&self, id: Uuid) -> Result<Vec<Message>, StoreError>;

    /// The last `limit` messages in insertion order.
    async fn recent_messages(&self, id: Uuid, limit: usize) -> Result<Vec<Message>, StoreError> {
        let mut messages = self.history(id).await?;
        let skip = messages.len().saturating_sub(limit);
        Ok(messages.split_off(skip))
    }

    /// All conversations, newest first.
    async fn list(&self) -> Result<Vec<ConversationSummary>, StoreError>;
}
