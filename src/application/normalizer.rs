//! # Plan Normalizer
//!
//! Turns an arbitrary JSON value into a well-formed [`ActionPlan`]. Nothing here
//! fails: malformed actions are dropped one at a time and anything that is not a
//! plan object collapses to the `NoOp` plan. The input is never modified.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::domain::types::{Action, ActionKind, ActionPlan, DEFAULT_PLAN_NAME, Modifier};

/// Runs of characters that separate key names: `|`, `+`, `,` and whitespace.
fn key_delimiters() -> &'static Regex {
    static DELIMITERS: OnceLock<Regex> = OnceLock::new();
    DELIMITERS.get_or_init(|| Regex::new(r"[|+,\s]+").expect("static regex"))
}

/// Normalize a raw plan structure.
pub fn normalize_plan(raw: &Value) -> ActionPlan {
    let Some(plan) = raw.as_object() else {
        tracing::debug!("Plan is not an object, returning NoOp");
        return ActionPlan::noop();
    };

    let entries = plan
        .get("actions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut actions: Vec<Action> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(action) = normalize_action(entry) else {
            tracing::debug!("Dropped action #{}: {}", index, entry);
            continue;
        };

        if is_repeated_text(actions.last(), &action) {
            tracing::debug!("Dropped repeated TextInput #{}", index);
            continue;
        }

        actions.push(action);
    }

    let name = string_field(plan, "name").unwrap_or_else(|| DEFAULT_PLAN_NAME.to_string());
    ActionPlan::new(name, actions)
}

/// Normalize a plan that is already typed, e.g. from the rule-based planner.
/// Applies the same invariants as [`normalize_plan`].
pub fn normalize_action_plan(plan: &ActionPlan) -> ActionPlan {
    match serde_json::to_value(plan) {
        Ok(value) => normalize_plan(&value),
        Err(e) => {
            tracing::warn!("Failed to serialize plan {}: {}", plan.name, e);
            ActionPlan::noop()
        }
    }
}

/// Validate a single entry. `None` means the entry is dropped.
fn normalize_action(entry: &Value) -> Option<Action> {
    let fields = entry.as_object()?;
    let kind = fields
        .get("kind")
        .and_then(Value::as_str)
        .and_then(ActionKind::parse)?;

    let mut action = Action {
        text: string_field(fields, "text"),
        scroll_delta: int_field(fields, "scrollDelta"),
        milliseconds_delay: int_field(fields, "millisecondsDelay"),
        x: int_field(fields, "x"),
        y: int_field(fields, "y"),
        delta_x: int_field(fields, "deltaX"),
        delta_y: int_field(fields, "deltaY"),
        button: string_field(fields, "button"),
        ..Action::new(kind)
    };

    if kind.is_key() {
        action.main_key = Some(main_key(fields)?);
        action.modifiers = modifiers(fields.get("modifiers"));
    }

    Some(action)
}

/// First token of `mainKey`. An empty first token ("+R") rejects the action.
fn main_key(fields: &Map<String, Value>) -> Option<String> {
    let raw = string_field(fields, "mainKey")?;
    let first = key_delimiters().split(raw.trim()).next()?;
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// Canonical modifiers in their original order. Unknown tokens are dropped.
fn modifiers(value: Option<&Value>) -> Option<Vec<Modifier>> {
    let tokens: Vec<String> = match value? {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        Value::String(s) => key_delimiters().split(s).map(str::to_string).collect(),
        _ => return None,
    };

    let canonical: Vec<Modifier> = tokens.iter().filter_map(|t| Modifier::parse(t)).collect();
    if canonical.is_empty() { None } else { Some(canonical) }
}

fn is_repeated_text(previous: Option<&Action>, current: &Action) -> bool {
    let Some(previous) = previous else {
        return false;
    };
    if previous.kind != ActionKind::TextInput || current.kind != ActionKind::TextInput {
        return false;
    }
    let prev_text = previous.text.as_deref().unwrap_or_default().to_lowercase();
    let text = current.text.as_deref().unwrap_or_default().to_lowercase();
    prev_text == text
}

/// Strings and other scalars as text. Blank strings count as absent.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(scalar_to_string)
}

/// Integers, floats (truncated) and numeric strings. Out-of-range is absent.
fn int_field<T: TryFrom<i64>>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    let wide = match fields.get(key)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?
        }
        _ => return None,
    };
    T::try_from(wide).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::NOOP_PLAN_NAME;
    use serde_json::json;

    fn plan_of(actions: Value) -> ActionPlan {
        normalize_plan(&json!({ "name": "Test", "actions": actions }))
    }

    #[test]
    fn test_non_object_is_noop() {
        for raw in [json!(null), json!([1, 2]), json!("plan"), json!(42), json!(true)] {
            let plan = normalize_plan(&raw);
            assert_eq!(plan.name, NOOP_PLAN_NAME);
            assert!(plan.actions.is_empty());
        }
    }

    #[test]
    fn test_missing_or_bad_actions_list() {
        assert!(normalize_plan(&json!({"name": "X"})).actions.is_empty());
        assert!(normalize_plan(&json!({"name": "X", "actions": "KeyTap"})).actions.is_empty());
        assert!(normalize_plan(&json!({"name": "X", "actions": {"kind": "Wait"}})).actions.is_empty());
    }

    #[test]
    fn test_invalid_kinds_are_dropped() {
        let plan = plan_of(json!([
            {"kind": "NoOp"},
            {"kind": "Teleport", "x": 1},
            {"kind": "keytap", "mainKey": "A"},
            {"kind": 7},
            {"mainKey": "A"},
            "KeyTap",
            42,
            {"kind": " Wait ", "millisecondsDelay": 100},
        ]));
        assert_eq!(plan.actions, vec![Action::wait(100)]);
    }

    #[test]
    fn test_main_key_keeps_first_token() {
        let plan = plan_of(json!([
            {"kind": "KeyTap", "mainKey": "LWIN+R"},
            {"kind": "KeyChord", "mainKey": "VK_T | VK_W"},
            {"kind": "KeyTap", "mainKey": "  RETURN , TAB"},
        ]));
        let keys: Vec<_> = plan.actions.iter().map(|a| a.main_key.as_deref().unwrap()).collect();
        assert_eq!(keys, vec!["LWIN", "VK_T", "RETURN"]);
    }

    #[test]
    fn test_key_action_without_usable_key_is_dropped() {
        let plan = plan_of(json!([
            {"kind": "KeyTap"},
            {"kind": "KeyTap", "mainKey": "   "},
            {"kind": "KeyChord", "mainKey": "+R", "modifiers": ["CONTROL"]},
            {"kind": "KeyTap", "mainKey": null},
            {"kind": "KeyTap", "mainKey": "ESCAPE"},
        ]));
        assert_eq!(plan.actions, vec![Action::key_tap("ESCAPE")]);
    }

    #[test]
    fn test_modifier_normalization() {
        let plan = plan_of(json!([
            {"kind": "KeyChord", "mainKey": "VK_T", "modifiers": ["ctrl", "bogus", "ALT"]},
            {"kind": "KeyChord", "mainKey": "VK_T", "modifiers": ["bogus"]},
            {"kind": "KeyChord", "mainKey": "VK_T", "modifiers": []},
            {"kind": "KeyChord", "mainKey": "VK_S", "modifiers": "ctrl+shift"},
            {"kind": "KeyChord", "mainKey": "VK_S", "modifiers": [" shift ", null, 3, "lwin"]},
        ]));
        assert_eq!(plan.actions[0].modifiers, Some(vec![Modifier::Control, Modifier::Menu]));
        assert_eq!(plan.actions[1].modifiers, None);
        assert_eq!(plan.actions[2].modifiers, None);
        assert_eq!(plan.actions[3].modifiers, Some(vec![Modifier::Control, Modifier::Shift]));
        assert_eq!(plan.actions[4].modifiers, Some(vec![Modifier::Shift, Modifier::Lwin]));
    }

    #[test]
    fn test_non_key_actions_lose_key_fields() {
        let plan = plan_of(json!([
            {"kind": "TextInput", "text": "hi", "mainKey": "A", "modifiers": ["SHIFT"]},
            {"kind": "MouseClick", "button": "Left", "mainKey": "LBUTTON"},
        ]));
        assert!(plan.actions.iter().all(|a| a.main_key.is_none() && a.modifiers.is_none()));
        assert_eq!(plan.actions[1].button.as_deref(), Some("Left"));
    }

    #[test]
    fn test_blank_strings_become_absent() {
        let plan = plan_of(json!([
            {"kind": "MouseClick", "button": "  ", "text": ""},
        ]));
        assert_eq!(plan.actions[0], Action::new(ActionKind::MouseClick));
    }

    #[test]
    fn test_adjacent_text_inputs_deduplicated() {
        let plan = plan_of(json!([
            {"kind": "TextInput", "text": "Hello"},
            {"kind": "TextInput", "text": "hello"},
            {"kind": "TextInput", "text": "HELLO"},
        ]));
        assert_eq!(plan.actions, vec![Action::text_input("Hello")]);
    }

    #[test]
    fn test_dedupe_compares_against_retained_action_only() {
        let plan = plan_of(json!([
            {"kind": "TextInput", "text": "go"},
            {"kind": "Teleport"},
            {"kind": "TextInput", "text": "GO"},
            {"kind": "Wait", "millisecondsDelay": 10},
            {"kind": "TextInput", "text": "go"},
        ]));
        assert_eq!(
            plan.actions,
            vec![Action::text_input("go"), Action::wait(10), Action::text_input("go")]
        );
    }

    #[test]
    fn test_absent_texts_count_as_equal() {
        let plan = plan_of(json!([
            {"kind": "TextInput"},
            {"kind": "TextInput", "text": "  "},
        ]));
        assert_eq!(plan.actions.len(), 1);
    }

    #[test]
    fn test_numeric_coercion() {
        let plan = plan_of(json!([
            {"kind": "Wait", "millisecondsDelay": "250"},
            {"kind": "Wait", "millisecondsDelay": 99.9},
            {"kind": "Wait", "millisecondsDelay": -5},
            {"kind": "ScrollVertical", "scrollDelta": -3},
            {"kind": "MouseMoveTo", "x": 500, "y": "abc"},
            {"kind": "MouseMoveBy", "deltaX": 1e12, "deltaY": -10},
        ]));
        assert_eq!(plan.actions[0].milliseconds_delay, Some(250));
        assert_eq!(plan.actions[1].milliseconds_delay, Some(99));
        assert_eq!(plan.actions[2].milliseconds_delay, None);
        assert_eq!(plan.actions[3].scroll_delta, Some(-3));
        assert_eq!((plan.actions[4].x, plan.actions[4].y), (Some(500), None));
        assert_eq!((plan.actions[5].delta_x, plan.actions[5].delta_y), (None, Some(-10)));
    }

    #[test]
    fn test_plan_name_defaults() {
        assert_eq!(normalize_plan(&json!({"actions": []})).name, DEFAULT_PLAN_NAME);
        assert_eq!(normalize_plan(&json!({"name": "", "actions": []})).name, DEFAULT_PLAN_NAME);
        assert_eq!(normalize_plan(&json!({"name": " ", "actions": []})).name, DEFAULT_PLAN_NAME);
        assert_eq!(normalize_plan(&json!({"name": "Mine", "actions": []})).name, "Mine");
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = json!({"actions": [{"kind": "KeyTap", "mainKey": "LWIN+R", "text": " "}]});
        let before = raw.clone();
        let _ = normalize_plan(&raw);
        assert_eq!(raw, before);
    }

    #[test]
    fn test_typed_plan_normalization_is_idempotent() {
        let plan = ActionPlan::new(
            "OpenNotepad",
            vec![Action::key_tap("LWIN"), Action::wait(150), Action::text_input("notepad")],
        );
        let once = normalize_action_plan(&plan);
        assert_eq!(once, plan);
        assert_eq!(normalize_action_plan(&once), once);
    }
}
