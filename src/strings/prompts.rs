//! # Prompts
//!
//! The instruction document sent to the generation backend and the per-request
//! context that accompanies it.

use crate::domain::types::{ActionKind, Modifier, PlanRequest};

/// A builder for rendering prompts with context.
pub struct PromptRenderer<'a> {
    template: &'a str,
    replacements: Vec<(&'a str, String)>,
}

impl<'a> PromptRenderer<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            replacements: Vec::new(),
        }
    }

    pub fn set(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.replacements.push((key, value.into()));
        self
    }

    pub fn render(self) -> String {
        let mut result = self.template.to_string();
        for (key, value) in self.replacements {
            result = result.replace(key, &value);
        }

        // Validate: Check for unreplaced placeholders
        if let Some(start) = result.find("{{")
            && let Some(end) = result[start..].find("}}")
        {
            let placeholder = &result[start..start + end + 2];
            tracing::error!("[PROMPT RENDER ERROR] Unreplaced placeholder found in output: {}", placeholder);
        }

        result
    }
}

pub const SYSTEM_TEMPLATE: &str = include_str!("../../prompts/system.md");

/// The fixed instruction document: vocabulary, key rules and examples.
pub fn system_prompt() -> String {
    let kinds = ActionKind::ALL
        .iter()
        .map(ActionKind::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let modifiers = Modifier::ALL
        .iter()
        .map(|m| format!("\"{}\"", m.as_str()))
        .collect::<Vec<_>>()
        .join(",");

    PromptRenderer::new(SYSTEM_TEMPLATE)
        .set("{{ACTION_KINDS}}", kinds)
        .set("{{MODIFIERS}}", modifiers)
        .render()
}

/// The per-request context, encoded as a JSON object.
pub fn user_prompt(request: &PlanRequest) -> String {
    let intents: Vec<serde_json::Value> = request
        .intents
        .iter()
        .map(|i| serde_json::json!({ "kind": i.kind, "rawText": i.raw_text }))
        .collect();

    serde_json::json!({
        "transcript": request.transcript.trim(),
        "activeProcessName": request.active_process_name,
        "activeWindowTitle": request.active_window_title,
        "intents": intents,
    })
    .to_string()
}
