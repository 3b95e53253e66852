//! # Application Layer
//!
//! The planning pipeline: extraction of model output, normalization into the
//! plan schema, the rule-based planner and the orchestrator tying them together.

pub mod extraction;
pub mod normalizer;
pub mod orchestrator;
pub mod rule_based;
