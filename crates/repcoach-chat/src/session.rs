//! Conversation session state.
//!
//! A [`SessionContext`] is created once per interactive session and owned by
//! the orchestrator. It holds the append-only turn history and the current
//! position in the turn state machine. Nothing here is persisted.

use chrono::Local;
use uuid::Uuid;

use repcoach_core::types::ConversationTurn;

use crate::error::ChatError;
use crate::state_machine::{validate_transition, TurnState};

// =============================================================================
// ConversationSession
// =============================================================================

/// Insertion-ordered, append-only turn history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationSession {
    turns: Vec<ConversationTurn>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user question and its answer, in that order.
    pub fn append_exchange(&mut self, question: &str, answer: &str) {
        self.turns.push(ConversationTurn::user(question));
        self.turns.push(ConversationTurn::assistant(answer));
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

// =============================================================================
// SessionContext
// =============================================================================

/// Per-session state owned by the orchestrator.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub id: Uuid,
    /// Epoch seconds when the session (or its last reset) started.
    pub started_at: i64,
    history: ConversationSession,
    state: TurnState,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Local::now().timestamp(),
            history: ConversationSession::new(),
            state: TurnState::Idle,
        }
    }

    /// Discard the history and start over with a fresh session id.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn history(&self) -> &ConversationSession {
        &self.history
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Move to `next`, rejecting transitions the state machine forbids.
    pub(crate) fn advance(&mut self, next: TurnState) -> Result<(), ChatError> {
        validate_transition(self.state, next)?;
        tracing::debug!(session = %self.id, from = ?self.state, to = ?next, "Turn state change");
        self.state = next;
        Ok(())
    }

    /// Record a completed exchange.
    ///
    /// Only legal while the turn is in `Complete`.
    pub(crate) fn commit(&mut self, question: &str, answer: &str) -> Result<(), ChatError> {
        if self.state != TurnState::Complete {
            return Err(ChatError::InvalidTransition(self.state, TurnState::Complete));
        }
        self.history.append_exchange(question, answer);
        Ok(())
    }

    /// Drop an interrupted turn without recording anything.
    pub(crate) fn abandon_turn(&mut self) {
        self.state = TurnState::Idle;
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
