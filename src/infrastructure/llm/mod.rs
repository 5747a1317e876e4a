//! Simple LLM API wrapper for the console's two providers
//!
//! Gemini drives every agent prompt, plan and research call; the
//! OpenAI-compatible API is keyed at runtime (`/key`) and backs `/cli openai`
//! and container creation.
//!
//! ```rust,ignore
//! let gateway = GeminiGateway::new(config.providers.gemini.clone());
//! let text = gateway.complete("Hello", "You are Lyra.", 0.4).await?;
//! ```

mod client;
pub mod providers;
mod types;

pub use client::{GeminiGateway, OPENAI_NOT_READY, OpenAiService, strip_code_fence};

pub use types::{Context, Message, MessageRole, Provider, Response, TokenUsage};
