use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::hand::{HandTable, PokerHand};

/// Tunable constants of the progression engine.
///
/// Every field has a default, so a configuration file only needs to name the values
/// it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub starting_money: u64,
    pub hand_size: usize,
    pub max_selection: usize,
    pub max_hands_per_blind: u32,
    pub discards_per_round: u32,
    pub blinds_per_round: u8,
    /// Subtracted from the multiplier per round number on a failed hand.
    pub failure_penalty_per_round: f64,
    /// Target growth for each round past the end of [`ROUND_TABLE`].
    pub overflow_growth: f64,
    pub hand_table: HandTable,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_money: 10,
            hand_size: 8,
            max_selection: 5,
            max_hands_per_blind: 3,
            discards_per_round: 5,
            blinds_per_round: 3,
            failure_penalty_per_round: 0.2,
            overflow_growth: 2.5,
            hand_table: HandTable::default(),
        }
    }
}

impl Rules {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.hand_size == 0 || self.hand_size > 52 {
            return Err(GameError::InvalidRules("hand_size must be in 1..=52".into()));
        }
        if self.max_selection == 0 || self.max_selection > 5 {
            return Err(GameError::InvalidRules("max_selection must be in 1..=5".into()));
        }
        if self.max_hands_per_blind == 0 {
            return Err(GameError::InvalidRules("max_hands_per_blind must be >= 1".into()));
        }
        if self.blinds_per_round == 0 {
            return Err(GameError::InvalidRules("blinds_per_round must be >= 1".into()));
        }
        if !self.failure_penalty_per_round.is_finite() || !(self.failure_penalty_per_round >= 0.0) {
            return Err(GameError::InvalidRules(
                "failure_penalty_per_round must be >= 0".into(),
            ));
        }
        if !self.overflow_growth.is_finite() || !(self.overflow_growth >= 1.0) {
            return Err(GameError::InvalidRules("overflow_growth must be >= 1".into()));
        }
        if self.hand_table.multipliers().iter().any(|m| !m.is_finite() || !(*m >= 0.0)) {
            return Err(GameError::InvalidRules("hand multipliers must be finite and >= 0".into()));
        }
        Ok(())
    }
}

/// What a round demands: a minimum category per hand and a money target at the end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundRequirement {
    pub required_hand: PokerHand,
    pub target_money: u64,
}

pub const ROUND_TABLE: [RoundRequirement; 6] = [
    RoundRequirement { required_hand: PokerHand::Pair, target_money: 20 },
    RoundRequirement { required_hand: PokerHand::Pair, target_money: 60 },
    RoundRequirement { required_hand: PokerHand::TwoPair, target_money: 150 },
    RoundRequirement { required_hand: PokerHand::ThreeOfAKind, target_money: 500 },
    RoundRequirement { required_hand: PokerHand::Flush, target_money: 2_500 },
    RoundRequirement { required_hand: PokerHand::FullHouse, target_money: 25_000 },
];

/// Requirement for a 1-based round. Past the table the last category holds and the
/// target grows by `growth` per extra round.
///
/// # Examples
///
/// ```
/// use chamber_engine::hand::PokerHand;
/// use chamber_engine::rules::requirement_for_round;
///
/// let r1 = requirement_for_round(1, 2.5);
/// assert_eq!(r1.required_hand, PokerHand::Pair);
///
/// let r7 = requirement_for_round(7, 2.5);
/// assert_eq!(r7.required_hand, PokerHand::FullHouse);
/// assert_eq!(r7.target_money, 62_500);
/// ```
pub fn requirement_for_round(round: u32, growth: f64) -> RoundRequirement {
    let idx = round.max(1) as usize - 1;
    if let Some(req) = ROUND_TABLE.get(idx) {
        return *req;
    }
    let last = ROUND_TABLE[ROUND_TABLE.len() - 1];
    let extra = (idx + 1 - ROUND_TABLE.len()) as i32;
    RoundRequirement {
        required_hand: last.required_hand,
        target_money: (last.target_money as f64 * growth.powi(extra)) as u64,
    }
}

/// Checks a play request against the selection size and hand budget.
pub fn validate_play(
    selected: usize,
    max_selection: usize,
    hands_played: u32,
    max_hands: u32,
) -> Result<(), GameError> {
    if selected == 0 || selected > max_selection {
        return Err(GameError::InvalidSelection {
            selected,
            max: max_selection,
        });
    }
    if hands_played >= max_hands {
        return Err(GameError::NoHandsRemaining);
    }
    Ok(())
}

pub fn validate_discard(selected: usize, discards_remaining: u32) -> Result<(), GameError> {
    if selected == 0 {
        return Err(GameError::EmptyDiscard);
    }
    if discards_remaining == 0 {
        return Err(GameError::NoDiscardsRemaining);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_escalates_requirement_and_target() {
        for pair in ROUND_TABLE.windows(2) {
            assert!(pair[0].required_hand <= pair[1].required_hand);
            assert!(pair[0].target_money < pair[1].target_money);
        }
    }

    #[test]
    fn overflow_rounds_scale_geometrically() {
        assert_eq!(requirement_for_round(6, 2.5).target_money, 25_000);
        assert_eq!(requirement_for_round(7, 2.5).target_money, 62_500);
        assert_eq!(requirement_for_round(8, 2.5).target_money, 156_250);
        assert_eq!(requirement_for_round(9, 2.0).target_money, 200_000);
        assert_eq!(requirement_for_round(0, 2.5), ROUND_TABLE[0]);
    }

    #[test]
    fn play_validation_reports_reason() {
        assert_eq!(
            validate_play(0, 5, 0, 3),
            Err(GameError::InvalidSelection { selected: 0, max: 5 })
        );
        assert_eq!(
            validate_play(6, 5, 0, 3),
            Err(GameError::InvalidSelection { selected: 6, max: 5 })
        );
        assert_eq!(validate_play(3, 5, 3, 3), Err(GameError::NoHandsRemaining));
        assert!(validate_play(5, 5, 2, 3).is_ok());
    }

    #[test]
    fn discard_validation_reports_reason() {
        assert_eq!(validate_discard(0, 5), Err(GameError::EmptyDiscard));
        assert_eq!(validate_discard(2, 0), Err(GameError::NoDiscardsRemaining));
        assert!(validate_discard(1, 1).is_ok());
    }

    #[test]
    fn default_rules_are_valid_and_bad_ones_are_named() {
        assert!(Rules::default().validate().is_ok());
        let bad = Rules {
            max_selection: 6,
            ..Rules::default()
        };
        match bad.validate() {
            Err(GameError::InvalidRules(msg)) => assert!(msg.contains("max_selection")),
            other => panic!("expected InvalidRules, got {:?}", other),
        }
    }

    #[test]
    fn non_finite_tuning_is_rejected() {
        let mut table = *HandTable::default().multipliers();
        table[PokerHand::Flush.rank_index()] = f64::INFINITY;
        let cases = [
            Rules {
                failure_penalty_per_round: f64::INFINITY,
                ..Rules::default()
            },
            Rules {
                overflow_growth: f64::INFINITY,
                ..Rules::default()
            },
            Rules {
                overflow_growth: f64::NAN,
                ..Rules::default()
            },
            Rules {
                hand_table: HandTable::new(table),
                ..Rules::default()
            },
        ];
        for rules in cases {
            assert!(
                matches!(rules.validate(), Err(GameError::InvalidRules(_))),
                "{:?}",
                rules
            );
        }
    }
}
