//! Shared domain types: exercises and conversation turns.

use serde::{Deserialize, Serialize};

// =============================================================================
// Exercise
// =============================================================================

/// Normalize an exercise name into its canonical key.
///
/// Splits on whitespace and underscores, capitalizes each word (first
/// character upper-case, the rest lower-case) and joins the words with `_`.
/// `"push up exercise"` becomes `"Push_Up_Exercise"`. The function is
/// idempotent.
pub fn normalize(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("_")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// A known exercise in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Identifier as listed by the catalog service.
    pub name: String,
    /// Canonical normalized key used for matching and media paths.
    pub key: String,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = normalize(&name);
        Self { name, key }
    }

    /// Human-readable label: the canonical key with underscores as spaces.
    pub fn display_name(&self) -> String {
        self.key.replace('_', " ")
    }
}

// =============================================================================
// Conversation
// =============================================================================

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: Role,
    text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- normalize ----

    #[test]
    fn test_normalize_multi_word() {
        assert_eq!(normalize("push up exercise"), "Push_Up_Exercise");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["push up exercise", "Push_Up", "  jumping   JACKS ", "squats", ""] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_normalize_underscore_and_space_equivalent() {
        assert_eq!(normalize("Push_Up"), normalize("push up"));
        assert_eq!(normalize("push__up"), "Push_Up");
    }

    #[test]
    fn test_normalize_lowercases_tail() {
        assert_eq!(normalize("SQUATS"), "Squats");
        assert_eq!(normalize("hIIT sprint"), "Hiit_Sprint");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("\tlunge \n walk "), "Lunge_Walk");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_unicode() {
        assert_eq!(normalize("élan vital"), "Élan_Vital");
    }

    // ---- Exercise ----

    #[test]
    fn test_exercise_new_computes_key() {
        let ex = Exercise::new("Push Up");
        assert_eq!(ex.name, "Push Up");
        assert_eq!(ex.key, "Push_Up");
        assert_eq!(ex.display_name(), "Push Up");
    }

    // ---- Conversation ----

    #[test]
    fn test_turn_constructors() {
        let u = ConversationTurn::user("hi");
        assert_eq!(u.role(), Role::User);
        assert_eq!(u.text(), "hi");
        let a = ConversationTurn::assistant("hello");
        assert_eq!(a.role(), Role::Assistant);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
