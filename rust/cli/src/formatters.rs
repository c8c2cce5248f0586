//! Card, money and session formatters for terminal display.
//!
//! Pure functions over engine values. Suits render as ♥ ♦ ♣ ♠ where the terminal
//! supports it and fall back to h d c s otherwise (see [`supports_unicode`]).
//!
//! ## Example
//!
//! ```rust
//! use chamber_engine::cards::{Card, Rank, Suit};
//! use chamber_cli::formatters::{format_card, format_money};
//!
//! let ten = Card::new(Rank::Ten, Suit::Spades);
//! assert!(format_card(&ten) == "10♠" || format_card(&ten) == "10s");
//! assert_eq!(format_money(2500.0), "2500");
//! ```

use chamber_engine::cards::{Card, Suit};
use chamber_engine::engine::Engine;
use chamber_engine::risk::{RiskPhase, RiskSession};

/// On Windows, checks for Windows Terminal (WT_SESSION), modern terminals
/// (TERM_PROGRAM) or VS Code (VSCODE_INJECTION). Unix-like systems are assumed to
/// render Unicode.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: Suit) -> String {
    if supports_unicode() {
        suit.glyph().to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

pub fn format_card(card: &Card) -> String {
    format!("{}{}", card.rank.symbol(), format_suit(card.suit))
}

/// "[A♠ K♥ Q♦]", or "[]" when empty.
pub fn format_cards(cards: &[Card]) -> String {
    let formatted: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted.join(" "))
}

/// Numbered hand listing; selected cards carry a `*`.
///
/// ```rust
/// use chamber_engine::cards::Card;
/// # use chamber_cli::formatters::format_hand;
/// let hand: Vec<Card> = ["AH", "KD"].iter().map(|s| s.parse().unwrap()).collect();
/// let line = format_hand(&hand, &hand[1..]);
/// assert!(line.starts_with(" 1:A"));
/// assert!(line.contains("*2:K"));
/// ```
pub fn format_hand(hand: &[Card], selected: &[Card]) -> String {
    hand.iter()
        .enumerate()
        .map(|(i, c)| {
            let mark = if selected.contains(c) { '*' } else { ' ' };
            format!("{}{}:{}", mark, i + 1, format_card(c))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Values of a million or more use scientific notation with two decimals; integral
/// values print without decimals; anything else keeps one decimal.
pub fn format_money(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.2e}", value)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

pub fn format_multiplier(value: f64) -> String {
    format!("x{}", format_money(value))
}

/// Multi-line status block for the interactive session.
pub fn format_status(engine: &Engine) -> String {
    let state = engine.state();
    let mut lines = vec![
        format!(
            "Round {} | Blind {}/{} | Need: {} | Target: ${}",
            engine.round(),
            engine.blind(),
            state.rules().blinds_per_round,
            engine.required_hand(),
            format_money(engine.target_money() as f64)
        ),
        format!(
            "Money: ${} | Multiplier: {} | Projected: ${} | Score: {}",
            format_money(engine.money() as f64),
            format_multiplier(engine.multiplier()),
            format_money(state.projected_money() as f64),
            state.score()
        ),
        format!(
            "Hands left: {} | Discards left: {} | Deck: {}",
            engine.hands_remaining(),
            engine.discards_remaining(),
            state.deck().remaining()
        ),
    ];
    if engine.risk().is_none() {
        lines.push(format!("Hand: {}", format_hand(engine.hand(), engine.selection())));
    }
    lines.join("\n")
}

/// One line describing where the roulette stands.
pub fn format_risk(session: &RiskSession) -> String {
    match session.phase() {
        RiskPhase::Warning => {
            "WARNING: the roulette can end your run. Type 'confirm' or 'cancel'.".to_string()
        }
        RiskPhase::Rolling => "Rolling for bullets...".to_string(),
        RiskPhase::Loading => format!(
            "Loading {}/{}",
            session.loaded_chambers(),
            session.bullet_count().unwrap_or(0)
        ),
        RiskPhase::ReadyToSpin => format!(
            "{} bullet(s) loaded. Survival pays {}. Type 'spin [boosts]'.",
            session.bullet_count().unwrap_or(0),
            session
                .potential_bonus()
                .map(format_multiplier)
                .unwrap_or_else(|| "-".to_string())
        ),
        RiskPhase::Spinning => format!(
            "Spinning at {:.1} rad/s, {} spin(s) left",
            session.angular_velocity(),
            session.spins_remaining()
        ),
        RiskPhase::ReadyToShoot => format!(
            "Cylinder stopped at {:.0} degrees. Bonus now {}. Type 'fire'.",
            session.chamber_angle(),
            session
                .potential_bonus()
                .map(format_multiplier)
                .unwrap_or_else(|| "-".to_string())
        ),
        RiskPhase::Shooting | RiskPhase::Firing => "...".to_string(),
        RiskPhase::Result => format!(
            "{} Type 'continue'.",
            session.outcome_text().unwrap_or_default()
        ),
    }
}
