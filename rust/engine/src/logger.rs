use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cards::Card;
use crate::hand::PokerHand;
use crate::risk::RiskOutcome;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameOverReason {
    /// The deck could not refill the hand
    DeckEmpty,
    /// Every attempt at the blind failed
    OutOfHands,
    /// The round closed below its money target
    TargetMissed { projected: u64, target: u64 },
    /// The roulette fired a loaded chamber
    Shot,
}

impl std::fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOverReason::DeckEmpty => write!(f, "Deck empty"),
            GameOverReason::OutOfHands => write!(f, "Out of hands"),
            GameOverReason::TargetMissed { projected, target } => {
                write!(f, "Target missed: ${} of ${}", projected, target)
            }
            GameOverReason::Shot => write!(f, "Shot by the roulette"),
        }
    }
}

/// One state-changing step of a session, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted { seed: Option<u64> },
    Dealt { round: u32, blind: u8, cards: Vec<Card> },
    HandPlayed {
        cards: Vec<Card>,
        hand: PokerHand,
        success: bool,
        multiplier: f64,
    },
    Discarded { cards: Vec<Card>, drawn: usize },
    BlindAdvanced { round: u32, blind: u8 },
    RoundWon { round: u32, money: u64 },
    RiskActivated,
    RiskCancelled,
    RiskRolled { bullets: u8 },
    RiskResolved { outcome: RiskOutcome, multiplier: f64 },
    GameOver { reason: GameOverReason },
}

/// A journal line: the event plus its position in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier (format: YYYYMMDD-NNNNNN)
    pub event_id: String,
    /// Wall clock time (RFC3339), filled in when written if absent
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(flatten)]
    pub event: GameEvent,
}

pub fn format_event_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`EventRecord`]s as JSON lines.
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl EventLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_event_id(&self.date, self.seq)
    }

    /// Wraps `event` in a fresh record and writes it.
    pub fn log(&mut self, event: GameEvent) -> std::io::Result<EventRecord> {
        let record = EventRecord {
            event_id: self.next_id(),
            ts: None,
            event,
        };
        self.write(&record)?;
        Ok(record)
    }

    pub fn write(&mut self, record: &EventRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
