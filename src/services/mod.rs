pub mod chat;
pub mod homelab;
pub mod prompt;

pub use chat::{ChatError, ChatService, ConversationPage, Exchange};
pub use prompt::PromptAssembler;
