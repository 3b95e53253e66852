//! # Strings Module
//!
//! Centralizes the backend instruction prompt and operational log text.

pub mod logs;
pub mod prompts;
