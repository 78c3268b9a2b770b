//! Per-point armor mitigation.

use crate::env::CombatRng;

/// One whole in 32-bit fixed point.
const ONE: u64 = 1 << 32;

/// Chance per armor point that a single damage point gets through: 80/81.
const PASS_NUMERATOR: u64 = 80;
const PASS_DENOMINATOR: u64 = 81;

/// Probability in 32-bit fixed point that one damage point is blocked.
///
/// ```text
/// blocked = 1 − (80 / 81) ^ armor
/// ```
///
/// Computed by repeated integer multiplication so no floating point enters
/// the rolls. The truncation error stays below `armor / 2^32`.
pub fn block_threshold(armor: i32) -> u64 {
    if armor <= 0 {
        return 0;
    }
    let mut pass = ONE;
    for _ in 0..armor {
        pass = pass * PASS_NUMERATOR / PASS_DENOMINATOR;
        if pass == 0 {
            break;
        }
    }
    ONE - pass
}

/// Number of `damage` points blocked by `armor`.
///
/// Every point of damage is tested independently against the block
/// probability, so the expected block is `damage × (1 − (80/81)^armor)`.
/// Non-positive damage or armor blocks nothing. The result never exceeds
/// `damage`.
pub fn mitigate(damage: i32, armor: i32, rng: &mut dyn CombatRng) -> i32 {
    if damage <= 0 || armor <= 0 {
        return 0;
    }
    let threshold = block_threshold(armor);
    let mut blocked = 0;
    for _ in 0..damage {
        if u64::from(rng.next_u32()) < threshold {
            blocked += 1;
        }
    }
    blocked
}
