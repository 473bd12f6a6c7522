//! RNG module - random piece generation
//!
//! Each draw picks one of the seven kinds uniformly, like the classic
//! handheld versions of the game. A small LCG keeps draws deterministic for a
//! given seed, which tests and replays rely on.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid a zero seed
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones
        (self.next_u32() >> 16) % max.max(1)
    }
}

/// Uniform piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: SimpleRng,
}

impl PieceQueue {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.next_range(PieceKind::ALL.len() as u32) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = SimpleRng::new(12345);
        let mut b = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(7) < 7);
        }
    }

    #[test]
    fn test_queue_draws_every_kind_eventually() {
        let mut queue = PieceQueue::new(42);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let kind = queue.draw();
            seen[(kind.color_id() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_queue_same_seed_same_sequence() {
        let mut a = PieceQueue::new(99);
        let mut b = PieceQueue::new(99);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
