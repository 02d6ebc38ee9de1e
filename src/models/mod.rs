mod chat;
mod homelab;

pub use chat::*;
pub use homelab::*;
