use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::game::GameState;
use crate::hand::{classify, PokerHand};
use crate::logger::{GameEvent, GameOverReason};
use crate::risk::{RiskConfig, RiskOutcome, RiskPhase, RiskSession};
use crate::rng::{RandomSource, SeededRng};
use crate::rules::{validate_discard, validate_play, Rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Over(GameOverReason),
}

/// Where the blind stands after a hand (or a roulette result) has been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlindResolution {
    /// The hand failed but attempts and cards remain; select again.
    Retry,
    /// The blind was won and the next one has been dealt.
    NextBlind { blind: u8 },
    /// The round was won; `money` is the settled balance and the next round is dealt.
    RoundWon { round: u32, money: u64 },
    GameOver(GameOverReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayOutcome {
    pub cards: Vec<Card>,
    pub hand: PokerHand,
    pub success: bool,
    /// Requested change; the multiplier itself is floored at zero.
    pub multiplier_delta: f64,
    pub multiplier: f64,
    pub resolution: BlindResolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardOutcome {
    Replaced { discarded: usize, drawn: usize },
    /// The deck could not refill the hand; the game is over.
    DeckExhausted,
}

/// Progression controller: the single entry point the UI drives.
///
/// Owns the session state, the randomness source and, while the roulette is in play,
/// the [`RiskSession`]. Rejected actions return a [`GameError`] and leave everything
/// untouched; terminal conditions come back as [`GameOverReason`]s inside `Ok` values.
///
/// # Examples
///
/// ```
/// use chamber_engine::engine::Engine;
///
/// let mut engine = Engine::with_seed(12345);
/// assert_eq!(engine.hand().len(), 8);
///
/// engine.toggle_card_selection(0).unwrap();
/// engine.toggle_card_selection(1).unwrap();
/// let outcome = engine.play_hand().unwrap();
/// assert_eq!(outcome.cards.len(), 2);
/// println!("{} -> {:?}", outcome.hand, outcome.resolution);
/// ```
#[derive(Debug)]
pub struct Engine {
    state: GameState,
    rng: Box<dyn RandomSource>,
    seed: Option<u64>,
    risk_config: RiskConfig,
    risk: Option<RiskSession>,
    status: GameStatus,
    events: Vec<GameEvent>,
}

impl Engine {
    /// Validates both configurations and deals the first hand.
    pub fn new(
        rules: Rules,
        risk_config: RiskConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, GameError> {
        rules.validate()?;
        risk_config.validate()?;
        Ok(Self::build(rules, risk_config, rng, None))
    }

    /// Default rules with a ChaCha20 source seeded from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(
            Rules::default(),
            RiskConfig::default(),
            Box::new(SeededRng::new_with_seed(seed)),
            Some(seed),
        )
    }

    /// Default rules with a caller-supplied source.
    pub fn with_rng<R: RandomSource + 'static>(rng: R) -> Self {
        Self::build(Rules::default(), RiskConfig::default(), Box::new(rng), None)
    }

    pub fn with_config(
        rules: Rules,
        risk_config: RiskConfig,
        seed: u64,
    ) -> Result<Self, GameError> {
        rules.validate()?;
        risk_config.validate()?;
        Ok(Self::build(
            rules,
            risk_config,
            Box::new(SeededRng::new_with_seed(seed)),
            Some(seed),
        ))
    }

    fn build(
        rules: Rules,
        risk_config: RiskConfig,
        mut rng: Box<dyn RandomSource>,
        seed: Option<u64>,
    ) -> Self {
        let state = GameState::new(rules, rng.as_mut());
        let mut eng = Self {
            state,
            rng,
            seed,
            risk_config,
            risk: None,
            status: GameStatus::Playing,
            events: Vec::new(),
        };
        eng.start_new_game();
        eng
    }

    pub fn start_new_game(&mut self) {
        self.risk = None;
        self.status = GameStatus::Playing;
        self.state.reset(self.rng.as_mut());
        self.state.start_new_round(self.rng.as_mut());
        self.events.push(GameEvent::GameStarted { seed: self.seed });
        tracing::info!(seed = ?self.seed, "new game");
        if !self.deal() {
            self.end_game(GameOverReason::DeckEmpty);
        }
    }

    /// Toggles the card at `index` in the current hand. Indices past the end are
    /// ignored. Returns whether the card ends up selected.
    pub fn toggle_card_selection(&mut self, index: usize) -> Result<bool, GameError> {
        self.ensure_hand_actions()?;
        let selected = self.state.toggle_selection(index);
        if index >= self.state.player_hand().len() {
            tracing::debug!(index, "selection index out of range ignored");
        }
        Ok(selected)
    }

    /// Replaces the selection with the cards at `indices`, skipping invalid ones.
    pub fn set_selection(&mut self, indices: &[usize]) -> Result<(), GameError> {
        self.ensure_hand_actions()?;
        self.state.clear_selection();
        for &i in indices {
            let already = self
                .state
                .player_hand()
                .get(i)
                .is_some_and(|c| self.state.selected_cards().contains(c));
            if !already {
                self.state.toggle_selection(i);
            }
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) -> Result<(), GameError> {
        self.ensure_hand_actions()?;
        self.state.clear_selection();
        Ok(())
    }

    /// Scores the selection against the round requirement and settles the blind.
    pub fn play_hand(&mut self) -> Result<PlayOutcome, GameError> {
        self.ensure_hand_actions()?;
        let rules = self.state.rules();
        validate_play(
            self.state.selected_cards().len(),
            rules.max_selection,
            self.state.hands_played(),
            rules.max_hands_per_blind,
        )?;

        let hand = classify(self.state.selected_cards());
        let success = hand.meets(self.state.required_hand());
        let multiplier_delta = if success {
            rules.hand_table.multiplier(hand)
        } else {
            -(rules.failure_penalty_per_round * self.state.current_round() as f64)
        };

        let cards = self.state.spend_selection();
        self.state.record_hand_played();
        self.state.add_multiplier(multiplier_delta);
        tracing::debug!(
            round = self.state.current_round(),
            blind = self.state.current_blind(),
            %hand,
            success,
            multiplier = self.state.multiplier(),
            "hand played"
        );
        self.events.push(GameEvent::HandPlayed {
            cards: cards.clone(),
            hand,
            success,
            multiplier: self.state.multiplier(),
        });

        let resolution = if success {
            self.resolve_blind_success()
        } else if self.state.hands_remaining() > 0 && !self.state.player_hand().is_empty() {
            BlindResolution::Retry
        } else {
            self.end_game(GameOverReason::OutOfHands)
        };

        Ok(PlayOutcome {
            cards,
            hand,
            success,
            multiplier_delta,
            multiplier: self.state.multiplier(),
            resolution,
        })
    }

    /// Throws the selection away and refills the hand.
    pub fn discard_cards(&mut self) -> Result<DiscardOutcome, GameError> {
        self.ensure_hand_actions()?;
        validate_discard(
            self.state.selected_cards().len(),
            self.state.discards_remaining(),
        )?;

        let cards = self.state.spend_selection();
        let before = self.state.player_hand().len();
        let complete = self.state.fill_hand();
        let drawn = self.state.player_hand().len() - before;
        tracing::debug!(discarded = cards.len(), drawn, "discard");
        let discarded = cards.len();
        self.events.push(GameEvent::Discarded { cards, drawn });

        if !complete {
            self.end_game(GameOverReason::DeckEmpty);
            return Ok(DiscardOutcome::DeckExhausted);
        }
        self.state.use_discard();
        Ok(DiscardOutcome::Replaced { discarded, drawn })
    }

    /// Opens the roulette warning. Hand actions stay disabled until it is cancelled
    /// or continued past its result.
    pub fn activate_risk(&mut self) -> Result<(), GameError> {
        self.ensure_playing()?;
        if let Some(session) = &self.risk {
            return Err(GameError::WrongRiskPhase {
                action: "activate",
                phase: session.phase(),
            });
        }
        self.risk = Some(RiskSession::new(self.risk_config.clone()));
        self.events.push(GameEvent::RiskActivated);
        Ok(())
    }

    /// Accepts the gamble; returns the rolled bullet count.
    pub fn confirm_risk(&mut self) -> Result<u8, GameError> {
        self.ensure_playing()?;
        let session = self.risk.as_mut().ok_or(GameError::RiskInactive)?;
        let bullets = session.confirm(self.rng.as_mut())?;
        self.events.push(GameEvent::RiskRolled { bullets });
        Ok(bullets)
    }

    pub fn cancel_risk(&mut self) -> Result<(), GameError> {
        let session = self.risk.as_ref().ok_or(GameError::RiskInactive)?;
        if !session.can_cancel() {
            return Err(GameError::WrongRiskPhase {
                action: "cancel",
                phase: session.phase(),
            });
        }
        self.risk = None;
        self.events.push(GameEvent::RiskCancelled);
        Ok(())
    }

    pub fn spin(&mut self) -> Result<(), GameError> {
        self.risk_mut()?.spin()
    }

    pub fn boost_spin(&mut self) -> Result<(), GameError> {
        self.risk_mut()?.boost_spin()
    }

    pub fn fire(&mut self) -> Result<(), GameError> {
        self.risk_mut()?.fire()
    }

    /// Host tick: moves the roulette's timed phases forward. Returns the outcome on
    /// the tick it resolves; the multiplier has already been adjusted by then.
    pub fn advance(&mut self, elapsed: Duration) -> Option<RiskOutcome> {
        let session = self.risk.as_mut()?;
        let outcome = session.advance(elapsed, self.rng.as_mut())?;
        self.apply_risk_outcome(outcome);
        Some(outcome)
    }

    /// Leaves the roulette result screen and settles the blind accordingly.
    pub fn continue_after_result(&mut self) -> Result<BlindResolution, GameError> {
        self.ensure_playing()?;
        let session = self.risk.as_ref().ok_or(GameError::RiskInactive)?;
        let outcome = match (session.phase(), session.outcome()) {
            (RiskPhase::Result, Some(outcome)) => outcome,
            (phase, _) => {
                return Err(GameError::WrongRiskPhase {
                    action: "continue",
                    phase,
                })
            }
        };
        self.risk = None;

        let resolution = match outcome {
            RiskOutcome::Died { .. } => self.end_game(GameOverReason::Shot),
            RiskOutcome::SixPenalty => self.resolve_blind_success(),
            RiskOutcome::Survived { .. } => {
                let money = self.state.projected_money().max(self.state.target_money());
                self.win_round(money)
            }
        };
        Ok(resolution)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }
    pub fn status(&self) -> GameStatus {
        self.status
    }
    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over(_))
    }
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
    pub fn round(&self) -> u32 {
        self.state.current_round()
    }
    pub fn blind(&self) -> u8 {
        self.state.current_blind()
    }
    pub fn hands_remaining(&self) -> u32 {
        self.state.hands_remaining()
    }
    pub fn discards_remaining(&self) -> u32 {
        self.state.discards_remaining()
    }
    pub fn multiplier(&self) -> f64 {
        self.state.multiplier()
    }
    pub fn money(&self) -> u64 {
        self.state.money()
    }
    pub fn target_money(&self) -> u64 {
        self.state.target_money()
    }
    pub fn required_hand(&self) -> PokerHand {
        self.state.required_hand()
    }
    pub fn hand(&self) -> &[Card] {
        self.state.player_hand()
    }
    pub fn selection(&self) -> &[Card] {
        self.state.selected_cards()
    }
    pub fn risk(&self) -> Option<&RiskSession> {
        self.risk.as_ref()
    }
    pub fn risk_phase(&self) -> Option<RiskPhase> {
        self.risk.as_ref().map(|s| s.phase())
    }
    pub fn risk_config(&self) -> &RiskConfig {
        &self.risk_config
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hands the journal to the host, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn resolve_blind_success(&mut self) -> BlindResolution {
        if !self.state.is_last_blind() {
            self.state.next_blind();
            let blind = self.state.current_blind();
            self.events.push(GameEvent::BlindAdvanced {
                round: self.state.current_round(),
                blind,
            });
            tracing::info!(round = self.state.current_round(), blind, "blind won");
            if !self.deal() {
                return self.end_game(GameOverReason::DeckEmpty);
            }
            return BlindResolution::NextBlind { blind };
        }
        let projected = self.state.projected_money();
        let target = self.state.target_money();
        if projected < target {
            return self.end_game(GameOverReason::TargetMissed { projected, target });
        }
        self.win_round(projected)
    }

    fn win_round(&mut self, money: u64) -> BlindResolution {
        let round = self.state.current_round();
        self.state.settle_money(money);
        self.events.push(GameEvent::RoundWon { round, money });
        tracing::info!(round, money, "round won");
        self.state.next_round();
        self.state.start_new_round(self.rng.as_mut());
        if !self.deal() {
            return self.end_game(GameOverReason::DeckEmpty);
        }
        BlindResolution::RoundWon { round, money }
    }

    fn apply_risk_outcome(&mut self, outcome: RiskOutcome) {
        match outcome {
            RiskOutcome::SixPenalty => {
                self.state.set_multiplier(0.0);
                self.state.force_last_blind();
            }
            RiskOutcome::Survived { bonus, .. } => self.state.scale_multiplier(bonus),
            RiskOutcome::Died { .. } => {}
        }
        tracing::info!(?outcome, multiplier = self.state.multiplier(), "roulette resolved");
        self.events.push(GameEvent::RiskResolved {
            outcome,
            multiplier: self.state.multiplier(),
        });
    }

    fn deal(&mut self) -> bool {
        let complete = self.state.fill_hand();
        self.events.push(GameEvent::Dealt {
            round: self.state.current_round(),
            blind: self.state.current_blind(),
            cards: self.state.player_hand().to_vec(),
        });
        complete
    }

    fn end_game(&mut self, reason: GameOverReason) -> BlindResolution {
        self.status = GameStatus::Over(reason);
        self.risk = None;
        self.events.push(GameEvent::GameOver { reason });
        tracing::info!(
            ?reason,
            round = self.state.current_round(),
            money = self.state.money(),
            "game over"
        );
        BlindResolution::GameOver(reason)
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        match self.status {
            GameStatus::Playing => Ok(()),
            GameStatus::Over(_) => Err(GameError::GameOver),
        }
    }

    fn ensure_hand_actions(&self) -> Result<(), GameError> {
        self.ensure_playing()?;
        if self.risk.is_some() {
            return Err(GameError::RiskActive);
        }
        Ok(())
    }

    fn risk_mut(&mut self) -> Result<&mut RiskSession, GameError> {
        self.ensure_playing()?;
        self.risk.as_mut().ok_or(GameError::RiskInactive)
    }
}
