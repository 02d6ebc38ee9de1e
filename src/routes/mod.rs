pub(crate) mod chat;
pub mod health_checks;
pub(crate) mod homelab;

pub use health_checks::*;
