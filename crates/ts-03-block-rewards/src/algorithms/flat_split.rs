//! # Flat Split
//!
//! Even split of a fixed reward across `n` ranked recipients using
//! cumulative differences: recipient *i* (1-based) gets
//! `floor(reward * i / n) - floor(reward * (i - 1) / n)`. The last
//! cumulative value is exactly `reward`, so the parts always sum to it.

use primitive_types::U256;
use shared_types::Amount;

/// Parts of `reward` for `n` recipients, in rank order.
pub fn flat_split(reward: Amount, n: usize) -> Vec<Amount> {
    if n == 0 {
        return Vec::new();
    }

    let total = U256::from(reward);
    let count = U256::from(n);
    let mut last: Amount = 0;
    let mut parts = Vec::with_capacity(n);
    for rank in 1..=n {
        // cur <= reward, so the low 128 bits hold it exactly
        let cur = (total * U256::from(rank) / count).low_u128();
        parts.push(cur - last);
        last = cur;
    }
    parts
}
