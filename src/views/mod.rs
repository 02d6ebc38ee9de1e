mod chat;
pub mod homelab;

pub use chat::Renderer;
