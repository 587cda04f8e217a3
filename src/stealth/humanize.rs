//! Humanized timing and movement choices
//!
//! Spreads actions over randomized intervals and offsets so the bot does
//! not fall into a fixed rhythm.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::IntervalRange;
use crate::game::Direction;

/// Source of all randomized decisions
pub struct Humanizer {
    rng: StdRng,
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Humanizer {
    /// Create a humanizer seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a reproducible humanizer
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    /// Derive an independent humanizer, e.g. for another task.
    ///
    /// Forks of a seeded humanizer are themselves reproducible.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.rng.random())
    }

    /// Uniform millisecond count in `[min, max)`.
    ///
    /// Panics on an empty range; ranges are validated at startup.
    pub fn sample_ms(&mut self, range: IntervalRange) -> u64 {
        self.rng.random_range(range.min_ms..range.max_ms)
    }

    pub fn sample(&mut self, range: IntervalRange) -> Duration {
        Duration::from_millis(self.sample_ms(range))
    }

    /// Resolve a run direction: `Random` becomes forward, left or right
    pub fn run_direction(&mut self, requested: Direction) -> Direction {
        match requested {
            Direction::Random => match self.rng.random_range(0..3) {
                0 => Direction::Forward,
                1 => Direction::Left,
                _ => Direction::Right,
            },
            concrete => concrete,
        }
    }

    /// Resolve a turn direction: `Random` becomes left or right
    pub fn turn_direction(&mut self, requested: Direction) -> Direction {
        match requested {
            Direction::Random => {
                if self.rng.random_bool(0.5) {
                    Direction::Left
                } else {
                    Direction::Right
                }
            }
            concrete => concrete,
        }
    }

    /// Pixel offset in `[0, max_exclusive)`
    pub fn gap(&mut self, max_exclusive: i32) -> i32 {
        if max_exclusive <= 0 {
            return 0;
        }
        self.rng.random_range(0..max_exclusive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sampled_intervals_in_range() {
        let mut humanizer = Humanizer::new();
        let ranges = [
            IntervalRange::new(4000, 8000),
            IntervalRange::new(800, 1500),
            IntervalRange::new(1500, 6000),
            IntervalRange::new(7, 8),
        ];

        for range in ranges {
            for _ in 0..1000 {
                let ms = humanizer.sample_ms(range);
                assert!(range.min_ms <= ms && ms < range.max_ms);
            }
        }
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let decide = |seed| {
            let mut humanizer = Humanizer::seeded(seed);
            (0..50)
                .map(|_| {
                    (
                        humanizer.run_direction(Direction::Random),
                        humanizer.turn_direction(Direction::Random),
                        humanizer.gap(300),
                        humanizer.sample_ms(IntervalRange::new(800, 1500)),
                    )
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(decide(42), decide(42));
        assert_ne!(decide(42), decide(43));
    }

    #[test]
    fn test_forks_are_reproducible() {
        let mut a = Humanizer::seeded(7);
        let mut b = Humanizer::seeded(7);

        let mut fork_a = a.fork();
        let mut fork_b = b.fork();
        for _ in 0..20 {
            assert_eq!(fork_a.gap(1000), fork_b.gap(1000));
        }
    }

    #[test]
    fn test_run_direction_covers_all() {
        let mut humanizer = Humanizer::seeded(1);
        let seen: HashSet<_> = (0..300)
            .map(|_| humanizer.run_direction(Direction::Random))
            .collect();

        assert_eq!(seen.len(), 3);
        assert!(!seen.contains(&Direction::Random));
    }

    #[test]
    fn test_turn_direction_never_forward() {
        let mut humanizer = Humanizer::seeded(2);
        let seen: HashSet<_> = (0..300)
            .map(|_| humanizer.turn_direction(Direction::Random))
            .collect();

        assert_eq!(
            seen,
            HashSet::from([Direction::Left, Direction::Right])
        );
    }

    #[test]
    fn test_concrete_directions_pass_through() {
        let mut humanizer = Humanizer::new();
        assert_eq!(humanizer.run_direction(Direction::Left), Direction::Left);
        assert_eq!(humanizer.turn_direction(Direction::Forward), Direction::Forward);
    }

    #[test]
    fn test_gap_bounds() {
        let mut humanizer = Humanizer::new();
        for _ in 0..1000 {
            let gap = humanizer.gap(30);
            assert!((0..30).contains(&gap));
        }
        assert_eq!(humanizer.gap(0), 0);
    }
}
