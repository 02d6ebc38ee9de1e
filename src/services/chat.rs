//! Chat controller: validates questions, keeps the active conversation,
//! persists both sides of an exchange and calls the model.

use crate::connectors::{ConnectorError, GenerativeModel};
use crate::db::{ConversationStore, StoreError};
use crate::forms::{ErrorResponse, SendMessageForm};
use crate::models::{Conversation, ConversationSummary, Message, Role};
use crate::services::prompt::PromptAssembler;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_valid::Validate;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const EMPTY_QUESTION: &str = "Pergunta não pode estar vazia";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),
    #[error("Erro interno: {0}")]
    Store(#[from] StoreError),
    #[error("Erro interno: {0}")]
    Render(String),
}

impl ChatError {
    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }
}

impl ResponseError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// Reply stored in place of the model answer when the call fails.
pub fn fallback_reply(err: &ConnectorError) -> String {
    format!(
        "❌ Erro ao processar pergunta: {}\n\nPor favor, tente novamente ou verifique sua conexão.",
        err
    )
}

/// Both stored sides of one question.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub conversation_id: Uuid,
    pub user_message: Message,
    pub bot_message: Message,
}

#[derive(Debug)]
pub enum ConversationPage {
    /// The caller should send the browser to this conversation.
    Redirect(Uuid),
    Show {
        conversation: Conversation,
        conversations: Vec<ConversationSummary>,
    },
}

pub struct ChatService {
    store: Arc<dyn ConversationStore>,
    model: Arc<dyn GenerativeModel>,
    assembler: PromptAssembler,
    active: RwLock<Option<Uuid>>,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        model: Arc<dyn GenerativeModel>,
        assembler: PromptAssembler,
    ) -> Self {
        Self {
            store,
            model,
            assembler,
            active: RwLock::new(None),
        }
    }

    async fn activate(&self, id: Uuid) {
        *self.active.write().await = Some(id);
    }

    pub async fn active_conversation_id(&self) -> Option<Uuid> {
        *self.active.read().await
    }

    /// Creates a conversation and makes it the active one.
    pub async fn new_conversation(&self) -> Result<Conversation, ChatError> {
        let conversation = self.store.create().await?;
        tracing::info!(conversation_id = %conversation.id, "New conversation");
        self.activate(conversation.id).await;
        Ok(conversation)
    }

    /// Active conversation, created when none is active or it no longer exists.
    pub async fn current_conversation(&self) -> Result<Conversation, ChatError> {
        if let Some(id) = self.active_conversation_id().await {
            if let Some(conversation) = self.store.fetch(id).await? {
                return Ok(conversation);
            }
        }
        self.new_conversation().await
    }

    pub async fn switch_conversation(&self, id: Uuid) -> Result<bool, ChatError> {
        match self.store.fetch(id).await? {
            Some(_) => {
                self.activate(id).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolves what the chat page shows for an optional `conversation_id`.
    pub async fn open_conversation(&self, requested: Option<&str>) -> Result<ConversationPage, ChatError> {
        let requested = requested.map(str::trim).filter(|id| !id.is_empty());

        let Some(raw) = requested else {
            let conversation = self.current_conversation().await?;
            return Ok(ConversationPage::Redirect(conversation.id));
        };

        let found = match Uuid::parse_str(raw) {
            Ok(id) => self.store.fetch(id).await?,
            Err(_) => None,
        };

        match found {
            Some(conversation) => {
                self.activate(conversation.id).await;
                let conversations = self.store.list().await?;
                Ok(ConversationPage::Show {
                    conversation,
                    conversations,
                })
            }
            None => {
                tracing::info!(requested = raw, "Conversation not found, starting a new one");
                let conversation = self.new_conversation().await?;
                Ok(ConversationPage::Redirect(conversation.id))
            }
        }
    }

    pub async fn send_message(&self, form: SendMessageForm) -> Result<Exchange, ChatError> {
        if let Err(errors) = form.validate() {
            let message = if form.question().is_empty() {
                EMPTY_QUESTION.to_string()
            } else {
                format!("Erro na validação: {}", errors)
            };
            return Err(ChatError::Validation(message));
        }

        let question = form.question();
        let conversation_id = match form.conversation_id() {
            // unknown or malformed ids fall through to the store, which starts a new conversation
            Some(raw) => Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::new_v4()),
            None => self.current_conversation().await?.id,
        };

        let user_message = self
            .store
            .append_message(conversation_id, Role::User, question)
            .await?;
        let conversation_id = user_message.conversation_id;
        self.activate(conversation_id).await;

        let history = self
            .store
            .recent_messages(conversation_id, self.assembler.history_limit())
            .await?;
        let prompt = self.assembler.build(&history, question);
        tracing::debug!(%conversation_id, prompt = %prompt, "Prompt assembled");

        let reply = match self.model.generate(&prompt).await {
            Ok(answer) => {
                tracing::info!(%conversation_id, chars = answer.chars().count(), "Model answered");
                answer.trim().to_string()
            }
            Err(err) => {
                tracing::error!(%conversation_id, error = %err, "Model call failed");
                fallback_reply(&err)
            }
        };

        let bot_message = self
            .store
            .append_message(conversation_id, Role::Bot, &reply)
            .await?;

        Ok(Exchange {
            conversation_id,
            user_message,
            bot_message,
        })
    }

    pub async fn history(&self, id: Uuid) -> Result<Option<Vec<Message>>, ChatError> {
        Ok(self.store.fetch(id).await?.map(|conversation| conversation.messages))
    }

    pub async fn conversations(&self) -> Result<Vec<ConversationSummary>, ChatError> {
        Ok(self.store.list().await?)
    }
}
