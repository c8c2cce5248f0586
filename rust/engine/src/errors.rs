use thiserror::Error;

use crate::risk::RiskPhase;

/// Reasons an action is rejected. A rejected action never changes game state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Select between 1 and {max} cards (selected {selected})")]
    InvalidSelection { selected: usize, max: usize },
    #[error("No hands remaining in this blind")]
    NoHandsRemaining,
    #[error("Select at least one card to discard")]
    EmptyDiscard,
    #[error("No discards remaining this round")]
    NoDiscardsRemaining,
    #[error("Hand actions are disabled while the roulette is active")]
    RiskActive,
    #[error("The roulette is not active")]
    RiskInactive,
    #[error("Cannot {action} during {phase}")]
    WrongRiskPhase { action: &'static str, phase: RiskPhase },
    #[error("No spins remaining")]
    NoSpinsRemaining,
    #[error("The game is over; start a new game")]
    GameOver,
    #[error("Invalid rules: {0}")]
    InvalidRules(String),
}
