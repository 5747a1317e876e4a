//! # Application Layer
//!
//! Core logic of the console: state, command routing, plan generation and
//! execution, task invocation, workflows and the scheduler.

pub mod executor;
pub mod planner;
pub mod router;
pub mod scheduler;
pub mod state;
pub mod tasks;
pub mod workflows;

#[cfg(test)]
pub mod testing;
