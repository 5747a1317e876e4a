//! # Domain Layer
//!
//! Core definitions, types, and traits that define the business domain of the console.
//! Independent of specific providers or storage, serving as the contract for other layers.

pub mod catalog;
pub mod config;
pub mod error;
pub mod plan;
pub mod roster;
pub mod traits;
pub mod types;
