//! Eval command handler: classify cards given on the command line.
//!
//! Up to five cards are classified as played (flushes and straights need exactly
//! five). Six to eight cards are searched for their best five-card subset.

use crate::config;
use crate::error::CliError;
use crate::formatters::{format_cards, format_multiplier};
use crate::ui;
use crate::validation::parse_cards;
use chamber_engine::cards::Card;
use chamber_engine::hand::{HandTable, best_five, classify};
use std::io::Write;

/// Multipliers come from the configured hand table, the same one `play` scores with.
pub fn handle_eval_command(
    cards: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cards = match parse_cards(cards) {
        Ok(c) => c,
        Err(msg) => {
            ui::write_error(err, &msg)?;
            return Err(CliError::InvalidInput(msg));
        }
    };
    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    write_evaluation(&cards, &cfg.rules.hand_table, out)
}

fn write_evaluation(cards: &[Card], table: &HandTable, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(out, "Cards: {}", format_cards(cards))?;
    let hand = if cards.len() <= 5 {
        classify(cards)
    } else {
        let (hand, chosen) = best_five(cards, table);
        writeln!(out, "Best five: {}", format_cards(&chosen))?;
        hand
    };
    writeln!(out, "Category: {} ({})", hand, format_multiplier(table.multiplier(hand)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(args: &[&str]) -> (Result<(), CliError>, String, String) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let res = handle_eval_command(&args, &mut out, &mut err);
        (res, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn five_cards_are_classified_directly() {
        let (res, out, _) = eval(&["AH", "KH", "QH", "JH", "TH"]);
        assert!(res.is_ok());
        assert!(out.contains("Category: Royal Flush (x100)"));
    }

    #[test]
    fn short_plays_never_flush() {
        let (_, out, _) = eval(&["2H", "5H", "9H", "KH"]);
        assert!(out.contains("Category: High Card"));
    }

    #[test]
    fn eight_cards_search_best_five() {
        let (_, out, _) = eval(&["QC", "QD", "QH", "4S", "4C", "9D", "2S", "8H"]);
        assert!(out.contains("Best five:"));
        assert!(out.contains("Category: Full House (x5)"));
    }

    #[test]
    fn retuned_table_changes_the_pick_and_the_payout() {
        let cards: Vec<Card> = ["2H", "7H", "9H", "JH", "KH", "2C", "7D", "3S"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let mut m = *HandTable::default().multipliers();
        m[chamber_engine::hand::PokerHand::Pair.rank_index()] = 200.0;
        let mut out = Vec::new();
        write_evaluation(&cards, &HandTable::new(m), &mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("Category: Pair (x200)"), "{}", s);
    }

    #[test]
    fn bad_card_is_invalid_input() {
        let (res, _, err) = eval(&["AH", "XX"]);
        assert!(matches!(res, Err(CliError::InvalidInput(_))));
        assert!(err.starts_with("Error: "));
    }
}
