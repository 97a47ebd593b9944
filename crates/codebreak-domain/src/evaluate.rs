//! Guess scoring.
//!
//! Two passes over sequences of equal length:
//!
//! 1. count indices where guess and secret agree (exact positions);
//! 2. build per-value frequency counts of both sequences and sum, per
//!    distinct value, `min(count_in_secret, count_in_guess)`.
//!
//! The multiset minimum is what makes duplicates score correctly: if the
//! secret holds two 1s and the guess holds three, the value 1 contributes
//! exactly 2 to the total, not 3.

use std::collections::HashMap;

use crate::{Code, Feedback, Guess};

/// Scores `guess` against `secret`.
///
/// Stateless and infallible; callers validate length and range first, and
/// callers decide what a win means (`exact_positions == length`).
pub fn evaluate(secret: &Code, guess: &Guess) -> Feedback {
    let s = secret.digits();
    let g = guess.digits();

    let exact_positions = s.iter().zip(g).filter(|(a, b)| a == b).count();

    let mut freq_s: HashMap<u8, usize> = HashMap::new();
    let mut freq_g: HashMap<u8, usize> = HashMap::new();
    for &d in s {
        *freq_s.entry(d).or_default() += 1;
    }
    for &d in g {
        *freq_g.entry(d).or_default() += 1;
    }

    let total_matches = freq_s
        .iter()
        .map(|(digit, &in_secret)| in_secret.min(freq_g.get(digit).copied().unwrap_or(0)))
        .sum();

    Feedback {
        exact_positions,
        total_matches,
    }
}
