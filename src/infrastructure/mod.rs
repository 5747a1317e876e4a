//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (`LlmGateway`, `ContainerProvider`,
//! `VirtualFs`, `Store`).

pub mod fs;
pub mod llm;
pub mod store;
