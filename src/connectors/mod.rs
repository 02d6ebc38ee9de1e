//! External Service Connectors
//!
//! The only external collaborator is the hosted generative model. Routes and
//! services depend on the [`GenerativeModel`] trait; the HTTP client is injected
//! at startup so tests can swap in [`gemini_service::mock`] implementations.
//!
//! 1. Trait and HTTP client live in `gemini_service.rs`
//! 2. Configuration in `config.rs`
//! 3. Failures are typed in `errors.rs`; callers decide how to present them

pub mod config;
pub mod errors;
pub mod gemini_service;

pub use config::GeminiSettings;
pub use errors::ConnectorError;
pub use gemini_service::{GeminiClient, GenerativeModel};

pub use gemini_service::init as init_gemini;
