//! Simulation command handler.
//!
//! Autoplays whole sessions with a greedy strategy and reports how far they got:
//!
//! - play the best five-card subset when it meets the round requirement
//! - otherwise discard unpaired cards (lowest first) while discards remain
//! - with `--risk`, take the roulette instead of a hopeless last attempt
//! - otherwise play the best subset anyway
//!
//! Game `i` is seeded with `seed + i`, so a run is reproducible from its base seed.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::time::Duration;

use chamber_engine::cards::{Card, Rank};
use chamber_engine::engine::{Engine, GameStatus};
use chamber_engine::hand::best_five;
use chamber_engine::logger::GameOverReason;
use chamber_engine::risk::{RiskOutcome, RiskPhase};

use super::drive_risk;
use crate::config;
use crate::error::CliError;
use crate::formatters::format_money;
use crate::ui;

/// Actions per game before the run is cut short.
const MAX_STEPS: u32 = 10_000;
const SIM_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct SimStats {
    games: u32,
    rounds_total: u64,
    best_round: u32,
    best_money: u64,
    reasons: BTreeMap<&'static str, u32>,
    risks_taken: u32,
    risks_survived: u32,
    unfinished: u32,
}

pub fn handle_sim_command(
    games: u32,
    seed: Option<u64>,
    risk: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if games == 0 {
        ui::write_error(err, "games must be >= 1")?;
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }
    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    let base_seed = seed.or(cfg.seed).unwrap_or_else(rand::random);

    writeln!(out, "sim: games={} seed={} risk={}", games, base_seed, risk)?;

    let mut stats = SimStats::default();
    for i in 0..games {
        let mut engine =
            Engine::with_config(cfg.rules.clone(), cfg.risk.clone(), base_seed.wrapping_add(i as u64))?;
        play_out(&mut engine, risk, &mut stats)?;

        stats.games += 1;
        stats.rounds_total += engine.round() as u64;
        stats.best_round = stats.best_round.max(engine.round());
        stats.best_money = stats.best_money.max(engine.money());
        match engine.status() {
            GameStatus::Over(reason) => *stats.reasons.entry(reason_key(&reason)).or_insert(0) += 1,
            GameStatus::Playing => stats.unfinished += 1,
        }
        tracing::debug!(game = i, round = engine.round(), money = engine.money(), "sim game finished");
    }

    writeln!(
        out,
        "Average round reached: {:.2}",
        stats.rounds_total as f64 / stats.games as f64
    )?;
    writeln!(out, "Best round: {}", stats.best_round)?;
    writeln!(out, "Best money: ${}", format_money(stats.best_money as f64))?;
    if risk {
        writeln!(
            out,
            "Roulette: taken {} survived {}",
            stats.risks_taken, stats.risks_survived
        )?;
    }
    writeln!(out, "Game over reasons:")?;
    for (reason, n) in &stats.reasons {
        writeln!(out, "  {}: {}", reason, n)?;
    }
    if stats.unfinished > 0 {
        ui::display_warning(
            err,
            &format!("{} game(s) stopped after {} actions", stats.unfinished, MAX_STEPS),
        )?;
    }
    Ok(())
}

fn play_out(engine: &mut Engine, risk: bool, stats: &mut SimStats) -> Result<(), CliError> {
    for _ in 0..MAX_STEPS {
        if engine.is_over() {
            return Ok(());
        }
        let hand = engine.hand().to_vec();
        let (best, chosen) = best_five(&hand, &engine.state().rules().hand_table);

        if best.meets(engine.required_hand()) {
            engine.set_selection(&positions(&hand, &chosen))?;
            engine.play_hand()?;
        } else if engine.discards_remaining() > 0 {
            engine.set_selection(&positions(&hand, &discard_candidates(&hand)))?;
            engine.discard_cards()?;
        } else if risk && engine.hands_remaining() == 1 {
            stats.risks_taken += 1;
            if take_roulette(engine)? {
                stats.risks_survived += 1;
            }
        } else {
            engine.set_selection(&positions(&hand, &chosen))?;
            engine.play_hand()?;
        }
    }
    Ok(())
}

/// Runs one roulette to completion. Returns whether the player survived it.
fn take_roulette(engine: &mut Engine) -> Result<bool, CliError> {
    engine.activate_risk()?;
    engine.confirm_risk()?;
    let mut outcome = drive_risk(engine, SIM_TICK);
    if engine.risk_phase() == Some(RiskPhase::ReadyToSpin) {
        engine.spin()?;
        drive_risk(engine, SIM_TICK);
        engine.fire()?;
        outcome = drive_risk(engine, SIM_TICK);
    }
    engine.continue_after_result()?;
    Ok(matches!(outcome, Some(RiskOutcome::Survived { .. })))
}

fn positions(hand: &[Card], cards: &[Card]) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(_, c)| cards.contains(c))
        .map(|(i, _)| i)
        .collect()
}

/// Unpaired cards, lowest rank first, at most five. Falls back to the lowest card.
fn discard_candidates(hand: &[Card]) -> Vec<Card> {
    let mut counts: HashMap<Rank, usize> = HashMap::new();
    for c in hand {
        *counts.entry(c.rank).or_insert(0) += 1;
    }
    let mut singles: Vec<Card> = hand.iter().copied().filter(|c| counts[&c.rank] == 1).collect();
    singles.sort();
    singles.truncate(5);
    if singles.is_empty() {
        if let Some(lowest) = hand.iter().min() {
            singles.push(*lowest);
        }
    }
    singles
}

fn reason_key(reason: &GameOverReason) -> &'static str {
    match reason {
        GameOverReason::DeckEmpty => "deck_empty",
        GameOverReason::OutOfHands => "out_of_hands",
        GameOverReason::TargetMissed { .. } => "target_missed",
        GameOverReason::Shot => "shot",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn discards_prefer_low_singletons() {
        let hand = cards("AH AD 2C 9S 3H KC KD 7D");
        let picks = discard_candidates(&hand);
        assert_eq!(picks, cards("2C 3H 7D 9S"));
    }

    #[test]
    fn positions_follow_hand_order() {
        let hand = cards("AH 2C 9S");
        assert_eq!(positions(&hand, &cards("9S AH")), vec![0, 2]);
    }

    #[test]
    fn sim_reports_aggregates() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_sim_command(3, Some(1), false, &mut out, &mut err).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("sim: games=3 seed=1 risk=false"));
        assert!(s.contains("Average round reached:"));
        assert!(s.contains("Game over reasons:"));
    }

    #[test]
    fn sim_with_risk_is_reproducible() {
        let run = || {
            let mut out = Vec::new();
            let mut err = Vec::new();
            handle_sim_command(5, Some(99), true, &mut out, &mut err).unwrap();
            out
        };
        let a = run();
        assert_eq!(a, run());
        assert!(String::from_utf8(a).unwrap().contains("Roulette: taken"));
    }

    #[test]
    fn zero_games_is_rejected() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        assert!(matches!(
            handle_sim_command(0, None, false, &mut out, &mut err),
            Err(CliError::InvalidInput(_))
        ));
    }
}
