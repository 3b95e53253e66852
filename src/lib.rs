//! # voxplan
//!
//! Turns voice transcripts into bounded, validated input-automation plans.
//!
//! - Domain: plan types, configuration, backend trait and errors
//! - Application: extraction, normalization, rule-based planning, orchestration
//! - Infrastructure: generation backend client and HTTP surface
//! - Strings: backend instruction prompt and log text

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod strings;

pub use application::orchestrator::{Planner, PlannerConfig};
pub use domain::config::{AppConfig, PlanningMode};
pub use domain::types::{Action, ActionKind, ActionPlan, IntentDescriptor, Modifier, PlanRequest};
