//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and scoring into use-case level APIs.
//! - Keep CLI/transport layers decoupled from storage details.

pub mod task_service;
