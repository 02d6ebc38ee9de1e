use crate::services::{ChatError, ChatService, ConversationPage};
use crate::views::Renderer;
use actix_web::http::header;
use actix_web::{get, web, HttpResponse, Result};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct Query {
    pub conversation_id: Option<String>,
}

pub(crate) fn redirect_to_conversation(id: Uuid) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/chat/?conversation_id={}", id)))
        .finish()
}

/// GET /chat/?conversation_id={id}
#[tracing::instrument(name = "Chat page.", skip(chat, renderer))]
#[get("/")]
pub async fn item(
    query: web::Query<Query>,
    chat: web::Data<ChatService>,
    renderer: web::Data<Renderer>,
) -> Result<HttpResponse> {
    match chat.open_conversation(query.conversation_id.as_deref()).await? {
        ConversationPage::Redirect(id) => Ok(redirect_to_conversation(id)),
        ConversationPage::Show {
            conversation,
            conversations,
        } => {
            let html = renderer
                .chat_page(&conversation, &conversations)
                .map_err(ChatError::render)?;
            Ok(HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(html))
        }
    }
}

/// GET /new-conversation/
#[tracing::instrument(name = "New conversation.", skip(chat))]
#[get("/new-conversation/")]
pub async fn new_conversation(chat: web::Data<ChatService>) -> Result<HttpResponse> {
    let conversation = chat.new_conversation().await?;
    Ok(redirect_to_conversation(conversation.id))
}

/// GET /
#[get("/")]
pub async fn home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/chat/"))
        .finish()
}
