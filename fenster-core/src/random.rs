//! Pseudo-Zufallsgenerator
//!
//! Xorshift32 reicht für Flackern völlig aus. Der Seed kommt in der
//! Firmware vom Hardware-RNG, in Tests ist er fest.

use crate::traits::RandomSource;

pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    pub fn new(seed: u32) -> Self {
        // Zustand 0 würde nur noch Nullen liefern
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }
}

impl RandomSource for Xorshift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_is_replaced() {
        let mut rng = Xorshift32::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_between_stays_in_range() {
        let mut rng = Xorshift32::new(0xDEAD_BEEF);
        for _ in 0..1000 {
            let value = rng.between(1, 12);
            assert!((1..=12).contains(&value));
        }
    }

    #[test]
    fn test_between_degenerate_range() {
        let mut rng = Xorshift32::new(7);
        assert_eq!(rng.between(5, 5), 5);
        assert_eq!(rng.between(9, 3), 9);
    }

    #[test]
    fn test_below_zero_bound() {
        let mut rng = Xorshift32::new(7);
        assert_eq!(rng.below(0), 0);
        assert!(rng.below(700_000) < 700_000);
    }
}
