//! Command handler modules for the Chamber CLI.
//!
//! Each command lives in its own module with the same shape:
//!
//! - Public handler: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) and stdin (`&mut dyn BufRead`) passed in
//! - Errors propagated via [`CliError`](crate::error::CliError)

mod cfg;
mod deal;
mod eval;
mod play;
mod rng;
mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use play::handle_play_command;
pub use rng::handle_rng_command;
pub use sim::handle_sim_command;

use std::time::Duration;

use chamber_engine::engine::Engine;
use chamber_engine::risk::RiskOutcome;

/// Upper bound on ticks per drive; a valid [`RiskConfig`](chamber_engine::risk::RiskConfig)
/// settles long before this.
const MAX_DRIVE_TICKS: u32 = 1_000_000;

/// Advances the roulette in `tick` steps until it waits for player input. Returns the
/// outcome if one resolved on the way.
pub(crate) fn drive_risk(engine: &mut Engine, tick: Duration) -> Option<RiskOutcome> {
    let mut resolved = None;
    for _ in 0..MAX_DRIVE_TICKS {
        match engine.risk() {
            Some(session) if !session.awaiting_input() => {}
            _ => break,
        }
        if let Some(outcome) = engine.advance(tick) {
            resolved = Some(outcome);
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_engine::risk::RiskPhase;

    #[test]
    fn drive_stops_at_input_phases() {
        let mut engine = Engine::with_seed(11);
        assert_eq!(drive_risk(&mut engine, Duration::from_millis(100)), None);

        engine.activate_risk().unwrap();
        let bullets = engine.confirm_risk().unwrap();
        let outcome = drive_risk(&mut engine, Duration::from_millis(100));
        if bullets == 6 {
            assert_eq!(outcome, Some(RiskOutcome::SixPenalty));
            assert_eq!(engine.risk_phase(), Some(RiskPhase::Result));
        } else {
            assert_eq!(outcome, None);
            assert_eq!(engine.risk_phase(), Some(RiskPhase::ReadyToSpin));
        }
    }
}
