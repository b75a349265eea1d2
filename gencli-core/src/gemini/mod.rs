//! Gemini `generateContent` client.
//!
//! Only the non-streaming endpoint is used. Requests may carry a JSON
//! response schema or the Google Search tool; grounding metadata from search
//! calls is surfaced on the response.

pub mod client;
pub mod models;

pub use client::{Client, ClientConfig};
pub use models::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GroundingMetadata, Part, Tool,
};
