use crate::forms::{SendMessageForm, SendMessageResponse};
use crate::services::{ChatError, ChatService};
use crate::views::Renderer;
use actix_web::{post, web, Responder, Result};

/// POST /chat/send/
/// Stores the question, asks the model and answers with both rendered bubbles.
#[tracing::instrument(name = "Send chat message.", skip(form, chat, renderer))]
#[post("/send/")]
pub async fn item(
    form: web::Json<SendMessageForm>,
    chat: web::Data<ChatService>,
    renderer: web::Data<Renderer>,
) -> Result<impl Responder> {
    let exchange = chat.send_message(form.into_inner()).await?;

    let user_html = renderer
        .message_bubble(&exchange.user_message)
        .map_err(ChatError::render)?;
    let bot_html = renderer
        .message_bubble(&exchange.bot_message)
        .map_err(ChatError::render)?;

    Ok(web::Json(SendMessageResponse {
        ok: true,
        conversation_id: exchange.conversation_id,
        user_html,
        bot_html,
    }))
}
