//! Turn state machine with validated transitions.
//!
//! Enforces the allowed lifecycle of a single chat turn:
//! Idle -> AwaitingGeneration -> ImageDecision -> Complete -> Idle
//! AwaitingGeneration -> Failed -> Idle

use serde::Serialize;

use crate::error::ChatError;

/// Where the orchestrator is within the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Idle,
    AwaitingGeneration,
    ImageDecision,
    Complete,
    Failed,
}

/// Validate that a state transition is allowed.
pub fn validate_transition(from: TurnState, to: TurnState) -> Result<(), ChatError> {
    let valid = matches!(
        (from, to),
        (TurnState::Idle, TurnState::AwaitingGeneration)
            | (TurnState::AwaitingGeneration, TurnState::ImageDecision)
            | (TurnState::AwaitingGeneration, TurnState::Failed)
            | (TurnState::ImageDecision, TurnState::Complete)
            | (TurnState::Complete, TurnState::Idle)
            | (TurnState::Failed, TurnState::Idle)
    );

    if valid {
        Ok(())
    } else {
        Err(ChatError::InvalidTransition(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Valid transitions
    // =====================================================================

    #[test]
    fn test_idle_to_awaiting() {
        assert!(validate_transition(TurnState::Idle, TurnState::AwaitingGeneration).is_ok());
    }

    #[test]
    fn test_awaiting_to_image_decision() {
        assert!(
            validate_transition(TurnState::AwaitingGeneration, TurnState::ImageDecision).is_ok()
        );
    }

    #[test]
    fn test_awaiting_to_failed() {
        assert!(validate_transition(TurnState::AwaitingGeneration, TurnState::Failed).is_ok());
    }

    #[test]
    fn test_image_decision_to_complete() {
        assert!(validate_transition(TurnState::ImageDecision, TurnState::Complete).is_ok());
    }

    #[test]
    fn test_terminal_states_return_to_idle() {
        assert!(validate_transition(TurnState::Complete, TurnState::Idle).is_ok());
        assert!(validate_transition(TurnState::Failed, TurnState::Idle).is_ok());
    }

    // =====================================================================
    // Invalid transitions
    // =====================================================================

    #[test]
    fn test_idle_to_complete_invalid() {
        let err = validate_transition(TurnState::Idle, TurnState::Complete).unwrap_err();
        assert!(matches!(
            err,
            ChatError::InvalidTransition(TurnState::Idle, TurnState::Complete)
        ));
    }

    #[test]
    fn test_image_decision_to_failed_invalid() {
        assert!(validate_transition(TurnState::ImageDecision, TurnState::Failed).is_err());
    }

    #[test]
    fn test_failed_to_complete_invalid() {
        assert!(validate_transition(TurnState::Failed, TurnState::Complete).is_err());
    }

    #[test]
    fn test_self_transitions_invalid() {
        for state in [
            TurnState::Idle,
            TurnState::AwaitingGeneration,
            TurnState::ImageDecision,
            TurnState::Complete,
            TurnState::Failed,
        ] {
            assert!(validate_transition(state, state).is_err(), "{:?}", state);
        }
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&TurnState::AwaitingGeneration).unwrap();
        assert_eq!(json, "\"awaiting_generation\"");
    }
}
