//! # campus-core
//!
//! Core types and error types for the Campus recommendation flows.
//!
//! This crate provides the foundational types shared across all Campus crates:
//! - Entity structs (questions, answers, recommendations, persisted results,
//!   domain descriptors)
//! - Phase and presentation enums, with the phase state machine transitions
//! - The JSON wire contract spoken with the recommendation backend
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;

pub use errors::QuizError;
