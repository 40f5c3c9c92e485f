//! Lehmer-code permutation ranking.
//!
//! A permutation of `[0, n)` is identified by its factorial-base digit
//! sequence: digit `i` counts how many still-unused elements are smaller than
//! the `i`-th chosen element, and the rank is `Σ dᵢ · (n−1−i)!`. With
//! `n ≤ 10` every rank fits comfortably in a `u64`.

use crate::error::{GameError, Result};

/// `n!` for small `n`.
pub fn factorial(n: usize) -> u64 {
    (1..=n as u64).product()
}

/// Rank of a permutation of `[0, n)` in `[0, n!)`.
///
/// The input must be a valid permutation; use
/// [`crate::codec::ActionCodec::permutation_action`] for a validating entry
/// point.
pub fn rank(perm: &[usize]) -> u64 {
    let n = perm.len();
    let mut pool: Vec<usize> = (0..n).collect();
    let mut rank = 0u64;
    for (i, &element) in perm.iter().enumerate() {
        if let Some(index) = pool.iter().position(|&p| p == element) {
            rank += index as u64 * factorial(n - 1 - i);
            pool.remove(index);
        }
    }
    rank
}

/// The `rank`-th permutation of `[0, n)`.
///
/// Fails only when `rank >= n!`.
pub fn unrank(rank: u64, n: usize) -> Result<Vec<usize>> {
    if rank >= factorial(n) {
        return Err(GameError::PermutationRank { rank, n });
    }

    let mut digits = Vec::with_capacity(n);
    let mut rest = rank;
    for i in (0..n).rev() {
        let base = factorial(i);
        digits.push((rest / base) as usize);
        rest %= base;
    }

    let mut pool: Vec<usize> = (0..n).collect();
    let mut perm = Vec::with_capacity(n);
    for digit in digits {
        perm.push(pool.remove(digit));
    }
    Ok(perm)
}
