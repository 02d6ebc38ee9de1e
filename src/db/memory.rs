use super::{ConversationStore, StoreError};
use crate::models::{self, Conversation, ConversationSummary, Message, Role};
use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Per-process store; everything is lost on restart.
#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<IndexMap<Uuid, Conversation>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self) -> Result<Conversation, StoreError> {
        let conversation = Conversation::new();
        self.conversations
            .write()
            .await
            .insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Conversation>, StoreError> {
        Ok(self.conversations.read().await.get(&id).cloned())
    }

    async fn append_message(
        &self,
        id: Uuid,
        role: Role,
        text: &str,
    ) -> Result<Message, StoreError> {
        let mut conversations = self.conversations.write().await;

        let id = if conversations.contains_key(&id) {
            id
        } else {
            let conversation = Conversation::new();
            tracing::info!(
                requested = %id,
                created = %conversation.id,
                "Unknown conversation, starting a new one"
            );
            let created = conversation.id;
            conversations.insert(created, conversation);
            created
        };

        let conversation = conversations
            .get_mut(&id)
            .ok_or_else(|| StoreError::Corrupt(format!("conversation {} vanished", id)))?;

        let message = Message::new(id, role, text);
        conversation.messages.push(message.clone());

        if role == Role::User && conversation.user_message_count() == 1 {
            conversation.title = models::title_from_question(text);
        }

        Ok(message)
    }

    async fn history(&self, id: Uuid) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .conversations
            .read()
            .await
            .get(&id)
            .map(|conversation| conversation.messages.clone())
            .unwrap_or_default())
    }

    async fn list(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        Ok(self
            .conversations
            .read()
            .await
            .values()
            .rev()
            .map(ConversationSummary::from)
            .collect())
    }
}
