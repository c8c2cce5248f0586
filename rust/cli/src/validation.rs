//! Input parsing and validation for interactive commands.
//!
//! Validation functions return structured results ([`ParseResult`], `Result`) so
//! callers can print a clear message and keep the session going.

use std::collections::HashSet;

use chamber_engine::cards::Card;

/// A line typed during `chamber play`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    /// Toggle cards by 0-based hand position
    Select(Vec<usize>),
    Play,
    Discard,
    Risk,
    Confirm,
    Cancel,
    /// Start the cylinder and boost it `boosts` more times
    Spin { boosts: u32 },
    Fire,
    Continue,
    Status,
    Help,
}

#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Command(PlayCommand),
    /// User entered quit command (q or quit)
    Quit,
    Invalid(String),
}

pub const PLAY_HELP: &str = "Commands: select <n>... (1-based, toggles), play, discard, risk, confirm, cancel, spin [boosts], fire, continue, status, help, quit";

/// Parse one line of the interactive session.
///
/// # Example
///
/// ```rust
/// # use chamber_cli::validation::{parse_play_command, ParseResult, PlayCommand};
/// assert_eq!(
///     parse_play_command("select 1 3"),
///     ParseResult::Command(PlayCommand::Select(vec![0, 2]))
/// );
/// assert_eq!(parse_play_command("q"), ParseResult::Quit);
///
/// match parse_play_command("bet 100") {
///     ParseResult::Invalid(msg) => assert!(msg.contains("Unrecognized")),
///     _ => panic!("Expected Invalid"),
/// }
/// ```
pub fn parse_play_command(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.is_empty() {
        return ParseResult::Invalid("Empty input".to_string());
    }

    if parts[0] == "q" || parts[0] == "quit" {
        return ParseResult::Quit;
    }

    let cmd = match parts[0] {
        "select" | "s" => {
            if parts.len() < 2 {
                return ParseResult::Invalid(
                    "Select requires card positions (e.g., 'select 1 4 5')".to_string(),
                );
            }
            let mut indices = Vec::with_capacity(parts.len() - 1);
            for p in &parts[1..] {
                match p.parse::<usize>() {
                    Ok(n) if n >= 1 => indices.push(n - 1),
                    _ => {
                        return ParseResult::Invalid(format!(
                            "Invalid card position '{}': positions start at 1",
                            p
                        ));
                    }
                }
            }
            PlayCommand::Select(indices)
        }
        "play" | "p" => PlayCommand::Play,
        "discard" | "d" => PlayCommand::Discard,
        "risk" | "r" => PlayCommand::Risk,
        "confirm" | "y" => PlayCommand::Confirm,
        "cancel" | "n" => PlayCommand::Cancel,
        "spin" => {
            let boosts = match parts.get(1) {
                None => 0,
                Some(v) => match v.parse::<u32>() {
                    Ok(n) => n,
                    Err(_) => {
                        return ParseResult::Invalid(format!("Invalid boost count '{}'", v));
                    }
                },
            };
            PlayCommand::Spin { boosts }
        }
        "fire" | "f" => PlayCommand::Fire,
        "continue" | "c" => PlayCommand::Continue,
        "status" => PlayCommand::Status,
        "help" | "h" | "?" => PlayCommand::Help,
        other => {
            return ParseResult::Invalid(format!(
                "Unrecognized command '{}'. {}",
                other, PLAY_HELP
            ));
        }
    };
    ParseResult::Command(cmd)
}

/// Parse card arguments for `eval`: 1 to 8 distinct cards.
pub fn parse_cards(args: &[String]) -> Result<Vec<Card>, String> {
    if args.is_empty() || args.len() > 8 {
        return Err(format!("Expected 1 to 8 cards, got {}", args.len()));
    }
    let mut seen = HashSet::new();
    let mut cards = Vec::with_capacity(args.len());
    for a in args {
        let card: Card = a.parse().map_err(|e| format!("{}", e))?;
        if !seen.insert(card) {
            return Err(format!("Duplicate card: {}", card));
        }
        cards.push(card);
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_session_command() {
        let cases = [
            ("play", PlayCommand::Play),
            ("DISCARD", PlayCommand::Discard),
            ("risk", PlayCommand::Risk),
            ("confirm", PlayCommand::Confirm),
            ("cancel", PlayCommand::Cancel),
            ("spin", PlayCommand::Spin { boosts: 0 }),
            ("spin 2", PlayCommand::Spin { boosts: 2 }),
            ("fire", PlayCommand::Fire),
            ("continue", PlayCommand::Continue),
            ("status", PlayCommand::Status),
            ("?", PlayCommand::Help),
        ];
        for (line, expected) in cases {
            assert_eq!(parse_play_command(line), ParseResult::Command(expected), "{}", line);
        }
    }

    #[test]
    fn select_positions_are_one_based() {
        assert_eq!(
            parse_play_command("  select 8 1 "),
            ParseResult::Command(PlayCommand::Select(vec![7, 0]))
        );
        assert!(matches!(parse_play_command("select 0"), ParseResult::Invalid(_)));
        assert!(matches!(parse_play_command("select x"), ParseResult::Invalid(_)));
        assert!(matches!(parse_play_command("select"), ParseResult::Invalid(_)));
    }

    #[test]
    fn empty_and_unknown_lines_are_invalid() {
        assert_eq!(
            parse_play_command("   "),
            ParseResult::Invalid("Empty input".to_string())
        );
        assert!(matches!(parse_play_command("spin lots"), ParseResult::Invalid(_)));
        assert_eq!(parse_play_command("QUIT"), ParseResult::Quit);
    }

    #[test]
    fn parse_cards_rejects_duplicates_and_bad_counts() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(parse_cards(&args(&["AH", "Kd"])).unwrap().len(), 2);
        assert!(parse_cards(&args(&["AH", "A♥"])).unwrap_err().contains("Duplicate"));
        assert!(parse_cards(&args(&[])).is_err());
        assert!(parse_cards(&args(&["2C", "3C", "4C", "5C", "6C", "7C", "8C", "9C", "TC"])).is_err());
        assert!(parse_cards(&args(&["ZZ"])).is_err());
    }
}
