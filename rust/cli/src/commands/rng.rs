//! Random number generator inspection command.
//!
//! Prints raw ChaCha20 output for a seed together with the bullet counts the roulette
//! would roll from the same seed, so a seeded session can be checked by hand.

use crate::error::CliError;
use chamber_engine::risk::CHAMBERS;
use chamber_engine::rng::{RandomSource, SeededRng};
use rand::{RngCore, SeedableRng};
use std::io::Write;

/// Handle the rng command.
///
/// # Example
///
/// ```ignore
/// handle_rng_command(Some(12345), &mut io::stdout()).expect("RNG command failed");
/// ```
pub fn handle_rng_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let s = seed.unwrap_or_else(rand::random);
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(s);
    let vals: Vec<u64> = (0..5).map(|_| rng.next_u64()).collect();
    writeln!(out, "RNG sample: {:?}", vals)?;

    let mut source = SeededRng::new_with_seed(s);
    let rolls: Vec<usize> = (0..10)
        .map(|_| source.next_below(CHAMBERS as usize) + 1)
        .collect();
    writeln!(out, "Bullet rolls: {:?}", rolls)?;
    Ok(())
}
