//! Language model capability.
//!
//! Workflows depend on the [`LanguageModel`] trait only. [`GeminiProvider`]
//! is the production implementation; tests substitute scripted models.

pub mod error_display;
pub mod gemini;
pub mod provider;

pub use gemini::GeminiProvider;
pub use provider::{ChatTurn, LLMError, LanguageModel, ModelRequest, ModelResponse, SearchSource, TurnRole};
