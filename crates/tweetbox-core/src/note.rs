use serde::{Deserialize, Serialize};

/// A single tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    /// Older payloads written by the browser script used `texto`.
    #[serde(alias = "texto")]
    pub text: String,
}

impl Note {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Single-line preview, truncated to `max_len` characters.
    pub fn preview(&self, max_len: usize) -> String {
        // Convert newlines to spaces and take first max_len characters
        let normalized: String = self
            .text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        let trimmed = normalized.trim();

        if trimmed.chars().count() > max_len {
            let cut: String = trimmed.chars().take(max_len).collect();
            format!("{}...", cut)
        } else {
            trimmed.to_string()
        }
    }
}

/// Trim `text` and reject it if nothing is left.
pub(crate) fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
