//! # Play Command
//!
//! Interactive, line-oriented session on stdin.
//!
//! Each line is one command (`select 1 3 5`, `play`, `discard`, `risk`, ...; see
//! [`PLAY_HELP`]). Rejected actions print an error and the session continues. The
//! roulette's timed phases are driven in fixed ticks until the next phase that needs
//! input, so the session never blocks on wall-clock time.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

use chamber_engine::engine::{BlindResolution, DiscardOutcome, Engine};
use chamber_engine::errors::GameError;
use chamber_engine::logger::EventLogger;

use super::drive_risk;
use crate::config;
use crate::error::CliError;
use crate::formatters::{format_cards, format_hand, format_money, format_multiplier, format_risk, format_status};
use crate::io_utils::{ensure_parent_dir, read_stdin_line};
use crate::ui;
use crate::validation::{PLAY_HELP, ParseResult, PlayCommand, parse_play_command};

/// Handle the play command.
///
/// # Arguments
///
/// * `seed` - RNG seed (falls back to configuration, then a random seed)
/// * `tick_ms` - Roulette timer step (falls back to configuration)
/// * `log` - Optional path for the JSONL event journal
/// * `out` - Output stream for game display
/// * `err` - Error stream for warnings and rejected actions
/// * `stdin` - Input stream for session commands
///
/// # Examples
///
/// ```ignore
/// use chamber_cli::commands::handle_play_command;
/// use std::io::{stdin, stdout, stderr};
///
/// let mut input = stdin().lock();
/// handle_play_command(Some(42), None, None, &mut stdout(), &mut stderr(), &mut input).unwrap();
/// ```
pub fn handle_play_command(
    seed: Option<u64>,
    tick_ms: Option<u64>,
    log: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let tick_ms = tick_ms.unwrap_or(cfg.tick_ms);
    if tick_ms == 0 {
        ui::write_error(err, "tick-ms must be >= 1")?;
        return Err(CliError::InvalidInput("tick-ms must be >= 1".to_string()));
    }

    let mut logger = match log {
        Some(path) => {
            ensure_parent_dir(Path::new(&path)).map_err(CliError::InvalidInput)?;
            Some(EventLogger::create(&path)?)
        }
        None => None,
    };

    let mut engine = Engine::with_config(cfg.rules, cfg.risk, seed)?;
    let mut session = Session {
        engine: &mut engine,
        tick: Duration::from_millis(tick_ms),
        out,
        err,
    };
    session.run(stdin, &mut logger)
}

struct Session<'a> {
    engine: &'a mut Engine,
    tick: Duration,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl Session<'_> {
    fn run(
        &mut self,
        stdin: &mut dyn BufRead,
        logger: &mut Option<EventLogger>,
    ) -> Result<(), CliError> {
        writeln!(
            self.out,
            "play: seed={} tick_ms={}",
            self.engine.seed().unwrap_or_default(),
            self.tick.as_millis()
        )?;
        ui::banner(self.out, "ROUND 1")?;
        writeln!(self.out, "{}", format_status(self.engine))?;
        writeln!(self.out, "Type 'help' for commands.")?;

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = read_stdin_line(stdin) else {
                break;
            };
            match parse_play_command(&line) {
                ParseResult::Quit => break,
                ParseResult::Invalid(msg) => ui::write_error(self.err, &msg)?,
                ParseResult::Command(cmd) => match self.execute(cmd) {
                    Ok(()) => {}
                    Err(CliError::Engine(msg)) => ui::write_error(self.err, &msg)?,
                    Err(e) => return Err(e),
                },
            }
            self.flush_events(logger)?;
            if self.engine.is_over() {
                break;
            }
        }
        self.flush_events(logger)?;

        let state = self.engine.state();
        writeln!(
            self.out,
            "Session over: round {} reached, money ${}, score {}",
            state.current_round(),
            format_money(state.money() as f64),
            state.score()
        )?;
        Ok(())
    }

    fn execute(&mut self, cmd: PlayCommand) -> Result<(), CliError> {
        match cmd {
            PlayCommand::Select(indices) => {
                let len = self.engine.hand().len();
                for i in indices {
                    if i >= len {
                        ui::display_warning(
                            self.err,
                            &format!("Position {} is out of range (1-{})", i + 1, len),
                        )?;
                        continue;
                    }
                    self.engine.toggle_card_selection(i)?;
                }
                writeln!(
                    self.out,
                    "Hand: {}",
                    format_hand(self.engine.hand(), self.engine.selection())
                )?;
            }
            PlayCommand::Play => {
                let outcome = self.engine.play_hand()?;
                writeln!(
                    self.out,
                    "{} {} -> {} ({}{}) multiplier {}",
                    format_cards(&outcome.cards),
                    outcome.hand,
                    if outcome.success { "success" } else { "failed" },
                    if outcome.multiplier_delta >= 0.0 { "+" } else { "" },
                    format_money(outcome.multiplier_delta),
                    format_multiplier(outcome.multiplier)
                )?;
                self.report(outcome.resolution)?;
            }
            PlayCommand::Discard => match self.engine.discard_cards()? {
                DiscardOutcome::Replaced { discarded, drawn } => {
                    writeln!(
                        self.out,
                        "Discarded {}, drew {}. Discards left: {}",
                        discarded,
                        drawn,
                        self.engine.discards_remaining()
                    )?;
                    writeln!(
                        self.out,
                        "Hand: {}",
                        format_hand(self.engine.hand(), self.engine.selection())
                    )?;
                }
                DiscardOutcome::DeckExhausted => {
                    self.report_game_over()?;
                }
            },
            PlayCommand::Risk => {
                self.engine.activate_risk()?;
                self.show_risk()?;
            }
            PlayCommand::Confirm => {
                let bullets = self.engine.confirm_risk()?;
                writeln!(self.out, "Rolled {} bullet(s).", bullets)?;
                self.drive()?;
            }
            PlayCommand::Cancel => {
                self.engine.cancel_risk()?;
                writeln!(self.out, "Roulette cancelled.")?;
                writeln!(self.out, "{}", format_status(self.engine))?;
            }
            PlayCommand::Spin { boosts } => {
                self.engine.spin()?;
                for _ in 0..boosts {
                    if let Err(e) = self.engine.boost_spin() {
                        ui::display_warning(self.err, &e.to_string())?;
                        break;
                    }
                }
                self.drive()?;
            }
            PlayCommand::Fire => {
                self.engine.fire()?;
                self.drive()?;
            }
            PlayCommand::Continue => {
                let resolution = self.engine.continue_after_result()?;
                self.report(resolution)?;
            }
            PlayCommand::Status => {
                writeln!(self.out, "{}", format_status(self.engine))?;
                if self.engine.risk().is_some() {
                    self.show_risk()?;
                }
            }
            PlayCommand::Help => writeln!(self.out, "{}", PLAY_HELP)?,
        }
        Ok(())
    }

    fn drive(&mut self) -> Result<(), CliError> {
        if let Some(outcome) = drive_risk(self.engine, self.tick) {
            writeln!(
                self.out,
                "Roulette resolved. Multiplier now {}",
                format_multiplier(self.engine.multiplier())
            )?;
            tracing::debug!(%outcome, "roulette outcome shown");
        }
        self.show_risk()
    }

    fn show_risk(&mut self) -> Result<(), CliError> {
        match self.engine.risk() {
            Some(session) => writeln!(self.out, "{}", format_risk(session))?,
            None => return Err(GameError::RiskInactive.into()),
        }
        Ok(())
    }

    fn report(&mut self, resolution: BlindResolution) -> Result<(), CliError> {
        match resolution {
            BlindResolution::Retry => {
                writeln!(
                    self.out,
                    "Hand failed. {} hand(s) left.",
                    self.engine.hands_remaining()
                )?;
                writeln!(
                    self.out,
                    "Hand: {}",
                    format_hand(self.engine.hand(), self.engine.selection())
                )?;
            }
            BlindResolution::NextBlind { blind } => {
                writeln!(self.out, "Blind won! Blind {} begins.", blind)?;
                writeln!(self.out, "{}", format_status(self.engine))?;
            }
            BlindResolution::RoundWon { round, money } => {
                writeln!(
                    self.out,
                    "Round {} complete! Money: ${}",
                    round,
                    format_money(money as f64)
                )?;
                ui::banner(self.out, &format!("ROUND {}", self.engine.round()))?;
                writeln!(self.out, "{}", format_status(self.engine))?;
            }
            BlindResolution::GameOver(_) => self.report_game_over()?,
        }
        Ok(())
    }

    fn report_game_over(&mut self) -> Result<(), CliError> {
        if let chamber_engine::engine::GameStatus::Over(reason) = self.engine.status() {
            writeln!(self.out, "GAME OVER: {}", reason)?;
        }
        Ok(())
    }

    fn flush_events(&mut self, logger: &mut Option<EventLogger>) -> Result<(), CliError> {
        let events = self.engine.drain_events();
        if let Some(l) = logger.as_mut() {
            for ev in events {
                l.log(ev)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn play(input: &str, seed: u64) -> (Result<(), CliError>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(input.as_bytes().to_vec());
        let res = handle_play_command(Some(seed), Some(100), None, &mut out, &mut err, &mut stdin);
        (
            res,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn quit_immediately_prints_header_and_summary() {
        let (res, out, _) = play("quit\n", 42);
        assert!(res.is_ok());
        assert!(out.contains("play: seed=42"));
        assert!(out.contains("ROUND 1"));
        assert!(out.contains("Session over: round 1 reached"));
    }

    #[test]
    fn rejected_actions_do_not_end_the_session() {
        let (res, out, err) = play("play\ndiscard\nbogus\nstatus\nq\n", 7);
        assert!(res.is_ok());
        assert!(err.contains("Select between 1 and 5 cards"));
        assert!(err.contains("Select at least one card to discard"));
        assert!(err.contains("Unrecognized command"));
        assert!(out.contains("Hands left: 3"));
    }

    #[test]
    fn eof_ends_the_session() {
        let (res, out, _) = play("select 1 2\n", 9);
        assert!(res.is_ok());
        assert!(out.contains("*1:"));
        assert!(out.contains("Session over"));
    }

    #[test]
    fn zero_tick_is_invalid_input() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(b"q\n".to_vec());
        let res = handle_play_command(Some(1), Some(0), None, &mut out, &mut err, &mut stdin);
        assert!(matches!(res, Err(CliError::InvalidInput(_))));
    }
}
