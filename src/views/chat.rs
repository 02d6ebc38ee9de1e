use crate::models::{Conversation, ConversationSummary, Message};
use anyhow::{Context, Result};
use tera::{Context as TeraContext, Tera};

const CHAT_PAGE_TEMPLATE: &str = include_str!("../../templates/chat.html");
const MESSAGE_TEMPLATE: &str = include_str!("../../templates/message.html");

/// Renders the chat page and message bubbles. Templates are `.html`, so tera
/// escapes every interpolated value.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("message.html", MESSAGE_TEMPLATE),
            ("chat.html", CHAT_PAGE_TEMPLATE),
        ])
        .context("Failed to add chat templates")?;

        Ok(Self { tera })
    }

    pub fn message_bubble(&self, message: &Message) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("message", message);
        let html = self
            .tera
            .render("message.html", &context)
            .context("Failed to render message")?;
        Ok(html.trim_end().to_string())
    }

    pub fn chat_page(
        &self,
        conversation: &Conversation,
        conversations: &[ConversationSummary],
    ) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("conversation", conversation);
        context.insert("conversations", conversations);
        self.tera
            .render("chat.html", &context)
            .context("Failed to render chat page")
    }
}
