//! # Rule-Based Planner
//!
//! Deterministic plans for "open/launch/start <app> [and type <text>]".
//! The plan drives the Start menu search the way a person would, with short
//! pauses so search results and the launched window have time to appear.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::types::{Action, ActionPlan};

const LAUNCH_VERBS: [&str; 3] = ["open ", "launch ", "start "];

const SEARCH_OPEN_DELAY_MS: u64 = 150;
const SEARCH_RESULTS_DELAY_MS: u64 = 400;
const APP_LAUNCH_DELAY_MS: u64 = 1200;
const BEFORE_TYPING_DELAY_MS: u64 = 300;

fn verb_prefix() -> &'static Regex {
    static VERB: OnceLock<Regex> = OnceLock::new();
    VERB.get_or_init(|| Regex::new(r"(?i)^(open|launch|start)\s+").expect("static regex"))
}

fn and_type() -> &'static Regex {
    static AND_TYPE: OnceLock<Regex> = OnceLock::new();
    AND_TYPE.get_or_init(|| Regex::new(r"(?i)\s+and\s+type\s+").expect("static regex"))
}

/// Build a launch plan, or `None` when the transcript is not a launch command.
pub fn rule_based_plan(transcript: &str) -> Option<ActionPlan> {
    let transcript = transcript.trim();
    let lower = transcript.to_lowercase();
    if !LAUNCH_VERBS.iter().any(|verb| lower.starts_with(verb)) {
        return None;
    }

    let mut parts = and_type().splitn(transcript, 2);
    let app_part = parts.next().unwrap_or_default();
    let type_text = parts.next().map(str::trim).unwrap_or_default();

    let app_name = verb_prefix().replace(app_part, "");
    let app_name = app_name.trim();
    if app_name.is_empty() {
        return None;
    }

    let mut actions = vec![
        Action::key_tap("LWIN"),
        Action::wait(SEARCH_OPEN_DELAY_MS),
        Action::text_input(app_name),
        Action::wait(SEARCH_RESULTS_DELAY_MS),
        Action::key_tap("RETURN"),
        Action::wait(APP_LAUNCH_DELAY_MS),
    ];

    if !type_text.is_empty() {
        actions.push(Action::wait(BEFORE_TYPING_DELAY_MS));
        actions.push(Action::text_input(type_text));
    }

    let name = format!("Open{}", plan_name_suffix(app_name));
    tracing::debug!("Rule-based plan {} with {} actions", name, actions.len());
    Some(ActionPlan::new(name, actions))
}

/// Title-case the app name and keep only word characters: "vs code" -> "VsCode".
fn plan_name_suffix(app_name: &str) -> String {
    let mut out = String::with_capacity(app_name.len());
    let mut prev_cased = false;
    for c in app_name.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out.retain(|c| c.is_alphanumeric() || c == '_');
    out
}
