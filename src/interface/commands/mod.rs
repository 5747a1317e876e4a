//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (e.g., /exec, /agent, /ls).
//! These handlers are invoked by the Router and report a `CommandOutcome`.

pub mod agent;
pub mod fs;
pub mod help;
pub mod logbook;
pub mod orchestrate;
pub mod query;
pub mod schedule;
pub mod settings;
pub mod tasks;
pub mod workflow;
