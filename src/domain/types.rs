//! # Domain Types
//!
//! The plan data model shared by the normalizer, the rule-based planner and the
//! wire surface. Field names serialize in camelCase to match the executor.

use serde::{Deserialize, Serialize};

/// Name used when the source supplied no usable plan name.
pub const DEFAULT_PLAN_NAME: &str = "LLMPlan";
/// Name of the plan returned when nothing actionable was produced.
pub const NOOP_PLAN_NAME: &str = "NoOp";
/// Name of the plan returned for a blank transcript.
pub const EMPTY_PLAN_NAME: &str = "Empty";

/// The closed vocabulary of action kinds the executor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    KeyChord,
    KeyTap,
    TextInput,
    ScrollVertical,
    ScrollHorizontal,
    MouseMoveTo,
    MouseMoveBy,
    MouseDown,
    MouseUp,
    MouseClick,
    MouseDoubleClick,
    Wait,
}

impl ActionKind {
    pub const ALL: [ActionKind; 12] = [
        ActionKind::KeyChord,
        ActionKind::KeyTap,
        ActionKind::TextInput,
        ActionKind::ScrollVertical,
        ActionKind::ScrollHorizontal,
        ActionKind::MouseMoveTo,
        ActionKind::MouseMoveBy,
        ActionKind::MouseDown,
        ActionKind::MouseUp,
        ActionKind::MouseClick,
        ActionKind::MouseDoubleClick,
        ActionKind::Wait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::KeyChord => "KeyChord",
            ActionKind::KeyTap => "KeyTap",
            ActionKind::TextInput => "TextInput",
            ActionKind::ScrollVertical => "ScrollVertical",
            ActionKind::ScrollHorizontal => "ScrollHorizontal",
            ActionKind::MouseMoveTo => "MouseMoveTo",
            ActionKind::MouseMoveBy => "MouseMoveBy",
            ActionKind::MouseDown => "MouseDown",
            ActionKind::MouseUp => "MouseUp",
            ActionKind::MouseClick => "MouseClick",
            ActionKind::MouseDoubleClick => "MouseDoubleClick",
            ActionKind::Wait => "Wait",
        }
    }

    /// Exact, case-sensitive lookup. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Key actions are the only kinds that carry `mainKey` and `modifiers`.
    pub fn is_key(&self) -> bool {
        matches!(self, ActionKind::KeyChord | ActionKind::KeyTap)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical modifier tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modifier {
    Shift,
    Control,
    Menu,
    Lwin,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [
        Modifier::Shift,
        Modifier::Control,
        Modifier::Menu,
        Modifier::Lwin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Shift => "SHIFT",
            Modifier::Control => "CONTROL",
            Modifier::Menu => "MENU",
            Modifier::Lwin => "LWIN",
        }
    }

    /// Case-insensitive, collapsing `CTRL` and `ALT` onto their canonical names.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_uppercase().as_str() {
            "SHIFT" => Some(Modifier::Shift),
            "CONTROL" | "CTRL" => Some(Modifier::Control),
            "MENU" | "ALT" => Some(Modifier::Menu),
            "LWIN" => Some(Modifier::Lwin),
            _ => None,
        }
    }
}

/// One step of a plan. Which optional fields matter depends on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub kind: ActionKind,
    #[serde(default)]
    pub main_key: Option<String>,
    #[serde(default)]
    pub modifiers: Option<Vec<Modifier>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub scroll_delta: Option<i32>,
    #[serde(default)]
    pub milliseconds_delay: Option<u64>,
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
    #[serde(default)]
    pub delta_x: Option<i32>,
    #[serde(default)]
    pub delta_y: Option<i32>,
    #[serde(default)]
    pub button: Option<String>,
}

impl Action {
    /// An action of the given kind with every optional field absent.
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            main_key: None,
            modifiers: None,
            text: None,
            scroll_delta: None,
            milliseconds_delay: None,
            x: None,
            y: None,
            delta_x: None,
            delta_y: None,
            button: None,
        }
    }

    pub fn key_tap(main_key: impl Into<String>) -> Self {
        Self {
            main_key: Some(main_key.into()),
            ..Self::new(ActionKind::KeyTap)
        }
    }

    pub fn text_input(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(ActionKind::TextInput)
        }
    }

    pub fn wait(milliseconds: u64) -> Self {
        Self {
            milliseconds_delay: Some(milliseconds),
            ..Self::new(ActionKind::Wait)
        }
    }
}

/// A named, ordered list of actions produced for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub name: String,
    pub actions: Vec<Action>,
}

impl ActionPlan {
    /// Builds a plan, falling back to [`DEFAULT_PLAN_NAME`] for a blank name.
    pub fn new(name: impl Into<String>, actions: Vec<Action>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            DEFAULT_PLAN_NAME.to_string()
        } else {
            name
        };
        Self { name, actions }
    }

    pub fn noop() -> Self {
        Self::new(NOOP_PLAN_NAME, Vec::new())
    }

    pub fn empty() -> Self {
        Self::new(EMPTY_PLAN_NAME, Vec::new())
    }
}

/// Upstream intent classification, forwarded to the backend untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDescriptor {
    #[serde(rename = "Kind", alias = "kind", default)]
    pub kind: String,
    #[serde(rename = "RawText", alias = "rawText", default)]
    pub raw_text: String,
}

/// Incoming planning request as sent by the desktop client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(rename = "Transcript", alias = "transcript", default)]
    pub transcript: String,
    #[serde(rename = "ActiveProcessName", alias = "activeProcessName", default)]
    pub active_process_name: Option<String>,
    #[serde(rename = "ActiveWindowTitle", alias = "activeWindowTitle", default)]
    pub active_window_title: Option<String>,
    #[serde(rename = "Intents", alias = "intents", default)]
    pub intents: Vec<IntentDescriptor>,
}

impl PlanRequest {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            ..Default::default()
        }
    }
}
