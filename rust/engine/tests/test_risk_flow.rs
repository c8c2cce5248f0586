use std::time::Duration;

use chamber_engine::engine::{BlindResolution, Engine};
use chamber_engine::errors::GameError;
use chamber_engine::logger::{GameEvent, GameOverReason};
use chamber_engine::risk::{RiskOutcome, RiskPhase};
use chamber_engine::rng::ScriptedRng;

const TICK: Duration = Duration::from_millis(50);

/// Ticks until the roulette reaches `phase`, collecting any resolved outcome.
fn run_until(engine: &mut Engine, phase: RiskPhase) -> Option<RiskOutcome> {
    let mut resolved = None;
    for _ in 0..10_000 {
        if engine.risk_phase() == Some(phase) {
            return resolved;
        }
        if let Some(o) = engine.advance(TICK) {
            resolved = Some(o);
        }
    }
    panic!("roulette never reached {:?}", phase);
}

/// Script: first value picks the bullet count (value + 1), second the final chamber.
fn roulette(bullet_roll: usize, chamber: usize) -> Engine {
    let mut engine = Engine::with_rng(ScriptedRng::new([bullet_roll, chamber]));
    engine.activate_risk().unwrap();
    engine
}

#[test]
fn hand_actions_are_locked_while_risk_is_active() {
    let mut engine = roulette(2, 3);
    assert_eq!(engine.toggle_card_selection(0), Err(GameError::RiskActive));
    assert_eq!(engine.discard_cards(), Err(GameError::RiskActive));
    assert_eq!(engine.play_hand(), Err(GameError::RiskActive));
}

#[test]
fn cancel_only_from_warning() {
    let mut engine = roulette(2, 3);
    let hand = engine.hand().to_vec();
    engine.cancel_risk().unwrap();
    assert!(engine.risk().is_none());
    assert_eq!(engine.hand(), hand.as_slice());
    assert_eq!(engine.multiplier(), 1.0);

    engine.activate_risk().unwrap();
    engine.confirm_risk().unwrap();
    assert_eq!(
        engine.cancel_risk(),
        Err(GameError::WrongRiskPhase {
            action: "cancel",
            phase: RiskPhase::Rolling
        })
    );
}

#[test]
fn survival_scales_multiplier_and_wins_the_round() {
    let mut engine = roulette(2, 3);
    assert_eq!(engine.confirm_risk().unwrap(), 3);
    run_until(&mut engine, RiskPhase::ReadyToSpin);
    engine.spin().unwrap();
    run_until(&mut engine, RiskPhase::ReadyToShoot);
    engine.fire().unwrap();
    let outcome = run_until(&mut engine, RiskPhase::Result);
    assert_eq!(
        outcome,
        Some(RiskOutcome::Survived {
            chamber: 3,
            bonus: 16.0
        })
    );
    assert_eq!(engine.multiplier(), 16.0);

    let resolution = engine.continue_after_result().unwrap();
    assert_eq!(
        resolution,
        BlindResolution::RoundWon {
            round: 1,
            money: 160
        }
    );
    assert_eq!(engine.round(), 2);
    assert_eq!(engine.money(), 160);
    assert!(engine.risk().is_none());
}

#[test]
fn survival_never_settles_below_target() {
    // One bullet, chamber 5 is empty. Two failed hands leave the multiplier at 0.6 and
    // three spins cut the bonus to 1, so 10 x 0.6 falls short and the target is paid.
    let mut engine = Engine::with_rng(ScriptedRng::new([0, 5]));
    for _ in 0..2 {
        engine.set_selection(&[0]).unwrap();
        engine.play_hand().unwrap();
    }
    engine.activate_risk().unwrap();
    assert_eq!(engine.confirm_risk().unwrap(), 1);
    run_until(&mut engine, RiskPhase::ReadyToSpin);
    engine.spin().unwrap();
    engine.boost_spin().unwrap();
    engine.boost_spin().unwrap();
    run_until(&mut engine, RiskPhase::ReadyToShoot);
    engine.fire().unwrap();
    let outcome = run_until(&mut engine, RiskPhase::Result);
    assert_eq!(
        outcome,
        Some(RiskOutcome::Survived {
            chamber: 5,
            bonus: 1.0
        })
    );
    let resolution = engine.continue_after_result().unwrap();
    assert_eq!(
        resolution,
        BlindResolution::RoundWon {
            round: 1,
            money: 20
        }
    );
}

#[test]
fn landing_on_a_loaded_chamber_is_fatal() {
    // Three bullets: chamber 2 is the last loaded one.
    let mut engine = roulette(2, 2);
    engine.confirm_risk().unwrap();
    run_until(&mut engine, RiskPhase::ReadyToSpin);
    engine.spin().unwrap();
    run_until(&mut engine, RiskPhase::ReadyToShoot);
    engine.fire().unwrap();
    let outcome = run_until(&mut engine, RiskPhase::Result);
    assert_eq!(outcome, Some(RiskOutcome::Died { chamber: 2 }));

    let resolution = engine.continue_after_result().unwrap();
    assert_eq!(resolution, BlindResolution::GameOver(GameOverReason::Shot));
    assert!(engine.is_over());
    assert_eq!(engine.activate_risk(), Err(GameError::GameOver));
}

#[test]
fn six_bullets_wipe_the_multiplier_and_lose_the_round() {
    let mut engine = roulette(5, 0);
    assert_eq!(engine.confirm_risk().unwrap(), 6);
    let outcome = run_until(&mut engine, RiskPhase::Result);
    assert_eq!(outcome, Some(RiskOutcome::SixPenalty));
    assert_eq!(engine.multiplier(), 0.0);
    assert_eq!(engine.blind(), 3, "six bullets force the last blind");
    assert!(engine.risk().unwrap().spins_used() == 0);

    let resolution = engine.continue_after_result().unwrap();
    assert_eq!(
        resolution,
        BlindResolution::GameOver(GameOverReason::TargetMissed {
            projected: 0,
            target: 20
        })
    );
}

#[test]
fn extra_spins_halve_the_bonus() {
    let mut engine = roulette(2, 4);
    engine.confirm_risk().unwrap();
    run_until(&mut engine, RiskPhase::ReadyToSpin);
    engine.spin().unwrap();
    engine.boost_spin().unwrap();
    engine.boost_spin().unwrap();
    assert_eq!(engine.boost_spin(), Err(GameError::NoSpinsRemaining));
    run_until(&mut engine, RiskPhase::ReadyToShoot);
    engine.fire().unwrap();
    let outcome = run_until(&mut engine, RiskPhase::Result);
    assert_eq!(
        outcome,
        Some(RiskOutcome::Survived {
            chamber: 4,
            bonus: 4.0
        })
    );
}

#[test]
fn continue_is_rejected_before_the_result() {
    let mut engine = roulette(2, 3);
    assert_eq!(
        engine.continue_after_result(),
        Err(GameError::WrongRiskPhase {
            action: "continue",
            phase: RiskPhase::Warning
        })
    );
    assert_eq!(engine.fire(), Err(GameError::WrongRiskPhase {
        action: "fire",
        phase: RiskPhase::Warning
    }));
}

#[test]
fn roulette_is_journaled() {
    let mut engine = roulette(5, 0);
    engine.confirm_risk().unwrap();
    run_until(&mut engine, RiskPhase::Result);
    let events = engine.drain_events();
    let tail: Vec<&GameEvent> = events.iter().rev().take(3).collect();
    assert!(matches!(tail[0], GameEvent::RiskResolved { outcome: RiskOutcome::SixPenalty, .. }));
    assert!(matches!(tail[1], GameEvent::RiskRolled { bullets: 6 }));
    assert!(matches!(tail[2], GameEvent::RiskActivated));
}
