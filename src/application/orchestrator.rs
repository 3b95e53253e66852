//! # Plan Orchestrator
//!
//! Picks a plan source for a request, runs the result through the normalizer and
//! always hands back a plan. Backend failures, timeouts and unusable output all
//! degrade to the `NoOp` plan so nothing half-formed reaches the input executor.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::application::extraction::extract_json;
use crate::application::normalizer::{normalize_action_plan, normalize_plan};
use crate::application::rule_based::rule_based_plan;
use crate::domain::config::{AppConfig, PlanningMode};
use crate::domain::error::BackendError;
use crate::domain::traits::PlanBackend;
use crate::domain::types::{ActionPlan, PlanRequest};
use crate::strings::{logs, prompts};

#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    pub mode: PlanningMode,
    /// Upper bound on a single backend call.
    pub timeout: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            mode: PlanningMode::default(),
            timeout: Duration::from_secs(20),
        }
    }
}

impl From<&AppConfig> for PlannerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            mode: config.planner.mode,
            timeout: Duration::from_secs(config.backend.timeout_secs),
        }
    }
}

pub struct Planner {
    backend: Arc<dyn PlanBackend>,
    config: PlannerConfig,
    system_prompt: String,
}

impl Planner {
    pub fn new(backend: Arc<dyn PlanBackend>, config: PlannerConfig) -> Self {
        Self {
            backend,
            config,
            system_prompt: prompts::system_prompt(),
        }
    }

    pub fn mode(&self) -> PlanningMode {
        self.config.mode
    }

    /// Plan with the configured mode.
    pub async fn plan(&self, request: &PlanRequest) -> ActionPlan {
        self.plan_with_mode(request, self.config.mode).await
    }

    /// Plan with an explicit mode, overriding the configured one.
    pub async fn plan_with_mode(&self, request: &PlanRequest, mode: PlanningMode) -> ActionPlan {
        let transcript = request.transcript.trim();
        if transcript.is_empty() {
            tracing::debug!("Blank transcript");
            return ActionPlan::empty();
        }

        if matches!(mode, PlanningMode::RuleBased | PlanningMode::RulesOnly) {
            if let Some(plan) = rule_based_plan(transcript) {
                let plan = normalize_action_plan(&plan);
                tracing::info!("{}", logs::plan_ready(&plan.name, plan.actions.len(), "rules"));
                return plan;
            }
            if mode == PlanningMode::RulesOnly {
                tracing::debug!("No rule matched and backend disabled");
                return ActionPlan::noop();
            }
        }

        let plan = self.plan_from_backend(request).await;
        tracing::info!(
            "{}",
            logs::plan_ready(&plan.name, plan.actions.len(), self.backend.name())
        );
        plan
    }

    async fn plan_from_backend(&self, request: &PlanRequest) -> ActionPlan {
        let user_prompt = prompts::user_prompt(request);

        let text = match self.generate(&user_prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(kind = e.kind(), "{}", logs::backend_failed(self.backend.name(), &e.to_string()));
                return ActionPlan::noop();
            }
        };

        let Some(raw) = extract_json(&text) else {
            tracing::warn!("No JSON in backend output ({} bytes)", text.len());
            return ActionPlan::noop();
        };

        if is_blank_structure(&raw) {
            tracing::debug!("Backend returned an empty structure");
            return ActionPlan::noop();
        }

        normalize_plan(&raw)
    }

    async fn generate(&self, user_prompt: &str) -> Result<String, BackendError> {
        let call = self.backend.generate(&self.system_prompt, user_prompt);
        match tokio::time::timeout(self.config.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::TimedOut(self.config.timeout)),
        }
    }
}

/// `null`, `false`, `0`, `""`, `[]` and `{}` carry no plan.
fn is_blank_structure(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Action, EMPTY_PLAN_NAME, NOOP_PLAN_NAME};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays canned responses and records the prompts it was given.
    struct ScriptedBackend {
        responses: Mutex<Vec<Result<String, BackendError>>>,
        calls: AtomicUsize,
        last_user_prompt: Mutex<Option<String>>,
        delay: Option<Duration>,
    }

    impl ScriptedBackend {
        fn new(response: Result<String, BackendError>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(vec![response]),
                calls: AtomicUsize::new(0),
                last_user_prompt: Mutex::new(None),
                delay: None,
            })
        }

        fn text(text: &str) -> Arc<Self> {
            Self::new(Ok(text.to_string()))
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(vec![Ok("{}".to_string())]),
                calls: AtomicUsize::new(0),
                last_user_prompt: Mutex::new(None),
                delay: Some(delay),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlanBackend for ScriptedBackend {
        async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, BackendError> {
            assert!(system_prompt.contains("Output JSON ONLY"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_user_prompt.lock().unwrap() = Some(user_prompt.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(BackendError::Transport("script exhausted".into())))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn planner(backend: Arc<ScriptedBackend>, mode: PlanningMode) -> Planner {
        Planner::new(
            backend,
            PlannerConfig {
                mode,
                timeout: Duration::from_millis(200),
            },
        )
    }

    #[tokio::test]
    async fn test_blank_transcript_skips_backend() {
        let backend = ScriptedBackend::text(r#"{"name":"X","actions":[]}"#);
        let planner = planner(backend.clone(), PlanningMode::Llm);

        for transcript in ["", "   ", "\n\t"] {
            let plan = planner.plan(&PlanRequest::new(transcript)).await;
            assert_eq!(plan.name, EMPTY_PLAN_NAME);
            assert!(plan.actions.is_empty());
        }
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_plan_is_normalized() {
        let backend = ScriptedBackend::text(
            "Here you go:\n```json\n{\"name\":\"NewTab\",\"actions\":[\
             {\"kind\":\"KeyChord\",\"mainKey\":\"CTRL+T\",\"modifiers\":[\"ctrl\"]},\
             {\"kind\":\"NoOp\"},\
             {\"kind\":\"TextInput\",\"text\":\"news\"},\
             {\"kind\":\"TextInput\",\"text\":\"NEWS\"}]}\n```",
        );
        let planner = planner(backend.clone(), PlanningMode::Llm);

        let plan = planner.plan(&PlanRequest::new("open a new tab and search news")).await;
        assert_eq!(plan.name, "NewTab");
        assert_eq!(plan.actions.len(), 2);
        assert_eq!(plan.actions[0].main_key.as_deref(), Some("CTRL"));
        assert_eq!(plan.actions[1], Action::text_input("news"));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_commentary_without_json_is_noop() {
        let backend = ScriptedBackend::text("I'm not sure what you want me to do.");
        let plan = planner(backend, PlanningMode::Llm)
            .plan(&PlanRequest::new("do the thing"))
            .await;
        assert_eq!(plan, ActionPlan::noop());
    }

    #[tokio::test]
    async fn test_empty_or_non_object_structures_are_noop() {
        for text in ["{}", "[]", "null", r#"[{"kind":"KeyTap","mainKey":"LWIN"}]"#] {
            let plan = planner(ScriptedBackend::text(text), PlanningMode::Llm)
                .plan(&PlanRequest::new("press windows"))
                .await;
            assert_eq!(plan.name, NOOP_PLAN_NAME, "for {text}");
            assert!(plan.actions.is_empty());
        }
    }

    #[tokio::test]
    async fn test_backend_errors_are_noop() {
        let errors = [
            BackendError::Transport("connection refused".into()),
            BackendError::Status { status: 500, body: "boom".into() },
            BackendError::InvalidResponse("missing message".into()),
            BackendError::Config("no key".into()),
        ];
        for error in errors {
            let plan = planner(ScriptedBackend::new(Err(error)), PlanningMode::Llm)
                .plan(&PlanRequest::new("scroll down"))
                .await;
            assert_eq!(plan, ActionPlan::noop());
        }
    }

    #[tokio::test]
    async fn test_slow_backend_times_out_to_noop() {
        let backend = ScriptedBackend::slow(Duration::from_secs(5));
        let plan = planner(backend.clone(), PlanningMode::Llm)
            .plan(&PlanRequest::new("scroll down"))
            .await;
        assert_eq!(plan, ActionPlan::noop());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_rule_based_mode_skips_backend_on_match() {
        let backend = ScriptedBackend::text(r#"{"name":"Wrong","actions":[]}"#);
        let plan = planner(backend.clone(), PlanningMode::RuleBased)
            .plan(&PlanRequest::new("open chrome and type hello world"))
            .await;

        assert_eq!(plan.name, "OpenChrome");
        assert_eq!(plan.actions.len(), 8);
        assert_eq!(plan.actions[6], Action::wait(300));
        assert_eq!(plan.actions[7], Action::text_input("hello world"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_rule_based_mode_falls_back_to_backend() {
        let backend = ScriptedBackend::text(
            r#"{"name":"Scroll","actions":[{"kind":"ScrollVertical","scrollDelta":-3}]}"#,
        );
        let plan = planner(backend.clone(), PlanningMode::RuleBased)
            .plan(&PlanRequest::new("scroll down a bit"))
            .await;
        assert_eq!(plan.name, "Scroll");
        assert_eq!(plan.actions[0].scroll_delta, Some(-3));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_rules_only_mode_never_calls_backend() {
        let backend = ScriptedBackend::text(r#"{"name":"Scroll","actions":[]}"#);
        let planner = planner(backend.clone(), PlanningMode::RulesOnly);

        assert_eq!(planner.plan(&PlanRequest::new("scroll down")).await, ActionPlan::noop());
        assert_eq!(planner.plan(&PlanRequest::new("launch paint")).await.name, "OpenPaint");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_llm_mode_sends_launch_commands_to_backend() {
        let backend = ScriptedBackend::text(r#"{"actions":[{"kind":"KeyTap","mainKey":"LWIN"}]}"#);
        let plan = planner(backend.clone(), PlanningMode::Llm)
            .plan(&PlanRequest::new("open chrome"))
            .await;
        assert_eq!(plan.name, "LLMPlan");
        assert_eq!(plan.actions, vec![Action::key_tap("LWIN")]);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_mode_override_per_request() {
        let backend = ScriptedBackend::text(r#"{"name":"FromModel","actions":[]}"#);
        let planner = planner(backend.clone(), PlanningMode::Llm);
        let plan = planner
            .plan_with_mode(&PlanRequest::new("start calculator"), PlanningMode::RulesOnly)
            .await;
        assert_eq!(plan.name, "OpenCalculator");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_context_is_forwarded() {
        let backend = ScriptedBackend::text("{}");
        let request = PlanRequest {
            transcript: "close this".to_string(),
            active_process_name: Some("notepad".to_string()),
            active_window_title: Some("Untitled - Notepad".to_string()),
            intents: Vec::new(),
        };
        planner(backend.clone(), PlanningMode::Llm).plan(&request).await;

        let sent = backend.last_user_prompt.lock().unwrap().clone().unwrap();
        let sent: Value = serde_json::from_str(&sent).unwrap();
        assert_eq!(sent["transcript"], "close this");
        assert_eq!(sent["activeWindowTitle"], "Untitled - Notepad");
    }

    #[test]
    fn test_blank_structures() {
        use serde_json::json;
        assert!(is_blank_structure(&json!(null)));
        assert!(is_blank_structure(&json!({})));
        assert!(is_blank_structure(&json!(0)));
        assert!(!is_blank_structure(&json!({"name": "x"})));
        assert!(!is_blank_structure(&json!([1])));
    }
}
