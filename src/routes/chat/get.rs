use crate::helpers::JsonResponse;
use crate::models;
use crate::services::ChatService;
use actix_web::{get, web, Responder, Result};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct Query {
    pub conversation_id: String,
}

/// GET /chat/history?conversation_id={id}
/// Returns the messages of one conversation in the order they were sent.
#[tracing::instrument(name = "Get chat history.", skip(chat))]
#[get("/history")]
pub async fn history(
    query: web::Query<Query>,
    chat: web::Data<ChatService>,
) -> Result<impl Responder> {
    let id = Uuid::parse_str(query.conversation_id.trim()).map_err(|_| {
        JsonResponse::<models::Message>::build().bad_request("Invalid conversation id")
    })?;

    chat.history(id)
        .await
        .map_err(|err| JsonResponse::<models::Message>::build().internal_server_error(&err.to_string()))?
        .map(|messages| JsonResponse::build().set_list(messages).ok("OK"))
        .ok_or_else(|| JsonResponse::<models::Message>::build().not_found("Conversation not found"))
}

/// GET /chat/conversations
/// Lists every conversation, newest first.
#[tracing::instrument(name = "List conversations.", skip(chat))]
#[get("/conversations")]
pub async fn list(chat: web::Data<ChatService>) -> Result<impl Responder> {
    chat.conversations()
        .await
        .map(|conversations| JsonResponse::build().set_list(conversations).ok("OK"))
        .map_err(|err| {
            JsonResponse::<models::ConversationSummary>::build()
                .internal_server_error(&err.to_string())
        })
}
