//! # Extraction
//!
//! Pulls a single JSON document out of raw model output. Models wrap their answer
//! in prose, code fences or trailing commentary, so the whole text is tried first
//! and then every balanced `{...}` is tried in order of its opening brace.

use serde_json::Value;

/// Returns the first JSON document found in `text`, or `None`.
pub fn extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    for (start, end) in object_spans(text) {
        match serde_json::from_str::<Value>(&text[start..end]) {
            Ok(value) => return Some(value),
            Err(e) => tracing::debug!("Skipping unparsable candidate at byte {}: {}", start, e),
        }
    }

    tracing::debug!("No JSON object found in {} bytes of model output", text.len());
    None
}

/// Byte spans of every brace-balanced object in `text`, ordered by start.
///
/// One pass with a stack of open braces. Quotes only open a string literal
/// while some object is open, so prose around an object never hides its braces.
/// An unclosed `{` stays on the stack and objects nested after it still close.
fn object_spans(text: &str) -> Vec<(usize, usize)> {
    let mut open = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    // Delimiters are ASCII and never occur inside a multibyte UTF-8 sequence
    for (i, b) in text.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    spans.push((start, i + 1));
                }
            }
            _ => {}
        }
    }

    spans.sort_unstable_by_key(|&(start, _)| start);
    spans
}
