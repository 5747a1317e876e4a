//! # Strings Module
//!
//! Centralizes user-facing strings, prompts, and help text.

pub mod help;
pub mod messages;
pub mod prompts;
