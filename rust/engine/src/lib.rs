//! # chamber-engine: Poker Progression Engine Core
//!
//! A single-player, round-based poker progression game with an optional Russian
//! roulette gamble. Hands are scored against a per-round requirement, successes grow
//! a money multiplier, and the roulette trades survival odds for a large boost.
//! All randomness flows through an injectable source so sessions are reproducible.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), parsing and display
//! - [`deck`] - Draw and discard piles with reshuffling
//! - [`rng`] - Randomness seam: seeded ChaCha20 source and a scripted source for tests
//! - [`hand`] - Hand classification, multiplier table and best-of-N search
//! - [`rules`] - Tunable constants, round requirements and action validation
//! - [`game`] - Session state: counters, economy, hand and selection
//! - [`risk`] - Roulette phase machine, bonus formula and spin physics
//! - [`engine`] - Progression controller tying the above together
//! - [`logger`] - Session events and JSONL journaling
//! - [`errors`] - Error types for rejected actions
//!
//! ## Quick Start
//!
//! ```rust
//! use chamber_engine::cards::Card;
//! use chamber_engine::hand::{classify, PokerHand};
//!
//! let cards: Vec<Card> = ["A♥", "K♥", "Q♥", "J♥", "10♥"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! assert_eq!(classify(&cards), PokerHand::RoyalFlush);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! Two engines built from the same seed deal the same cards:
//!
//! ```rust
//! use chamber_engine::engine::Engine;
//!
//! let a = Engine::with_seed(42);
//! let b = Engine::with_seed(42);
//! assert_eq!(a.hand(), b.hand());
//! ```
//!
//! ## The Roulette
//!
//! ```rust
//! use std::time::Duration;
//! use chamber_engine::engine::Engine;
//! use chamber_engine::risk::RiskPhase;
//!
//! let mut engine = Engine::with_seed(7);
//! engine.activate_risk().unwrap();
//! let bullets = engine.confirm_risk().unwrap();
//! assert!((1..=6).contains(&bullets));
//!
//! // Drive the timed phases until the gun is ready to spin (or the six-bullet penalty lands).
//! while !matches!(engine.risk_phase(), Some(RiskPhase::ReadyToSpin | RiskPhase::Result)) {
//!     engine.advance(Duration::from_millis(100));
//! }
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod risk;
pub mod rng;
pub mod rules;
