//! Per-tick growth rolls.

use rand::Rng;

/// Number of distinct values a percentage roll can produce
pub const ROLL_SPAN: u8 = 100;

/// Draw a uniform value in `0..100` by rejection sampling random bytes.
///
/// Draws at or above 100 are thrown away and redrawn, so the sequence of
/// consumed bytes depends only on the generator state.
pub fn roll_percent<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    loop {
        let value: u8 = rng.gen();
        if value < ROLL_SPAN {
            return value;
        }
    }
}

/// Whether a fungus gains a growth point this tick, given a rate in `0..=100`
pub fn should_grow<R: Rng + ?Sized>(rng: &mut R, growth_rate: u8) -> bool {
    roll_percent(rng) < growth_rate
}
