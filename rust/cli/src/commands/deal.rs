//! Deal command handler.
//!
//! Shuffles a fresh deck, deals one hand of the configured size and shows it with the
//! best category it contains. Seeded runs are reproducible.

use crate::config;
use crate::error::CliError;
use crate::formatters::{format_cards, format_multiplier};
use chamber_engine::deck::Deck;
use chamber_engine::hand::best_five;
use chamber_engine::rng::SeededRng;
use std::io::Write;

/// Handle the deal command.
///
/// # Examples
///
/// ```ignore
/// let mut out = Vec::new();
/// handle_deal_command(Some(42), &mut out).unwrap();
/// ```
pub fn handle_deal_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let mut rng = SeededRng::new_with_seed(seed);
    let mut deck = Deck::new();
    deck.reset(&mut rng);
    let hand = deck.draw(cfg.rules.hand_size);
    let (best, chosen) = best_five(&hand, &cfg.rules.hand_table);

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Hand: {}", format_cards(&hand))?;
    writeln!(
        out,
        "Best: {} {} ({})",
        best,
        format_cards(&chosen),
        format_multiplier(cfg.rules.hand_table.multiplier(best))
    )?;
    Ok(())
}
