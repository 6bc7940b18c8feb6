//! Weighted room type and difficulty sampling
//!
//! Each step draws a room type from an adaptive table that discourages
//! repeats, then a difficulty from a fixed triple chosen by how far along
//! the path the builder is.

use crate::rng::GameRng;

use super::room::{Difficulty, RoomType};

/// Starting weight of every sampled room type (percent)
pub const INITIAL_TYPE_WEIGHT: f64 = 20.0;

/// Weight taken from a type each time it is drawn
pub const TYPE_WEIGHT_DECREMENT: f64 = 8.0;

/// Difficulty weights (Easy, Medium, Hard) for the first third of a path
pub const EARLY_DIFFICULTY: [f64; 3] = [70.0, 25.0, 5.0];

/// Difficulty weights for the middle third of a path
pub const MIDDLE_DIFFICULTY: [f64; 3] = [20.0, 60.0, 20.0];

/// Difficulty weights for the final third of a path
pub const LATE_DIFFICULTY: [f64; 3] = [5.0, 25.0, 70.0];

/// Ordered table of categories and non-negative weights
///
/// Order is the tie-break order: on equal cumulative thresholds the earlier
/// entry wins.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable<C> {
    entries: Vec<(C, f64)>,
}

impl<C: Copy + PartialEq> WeightTable<C> {
    pub fn new(entries: impl IntoIterator<Item = (C, f64)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(c, w)| (c, w.max(0.0)))
                .collect(),
        }
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    pub fn weight(&self, category: C) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|&(_, w)| w)
    }

    pub fn entries(&self) -> &[(C, f64)] {
        &self.entries
    }

    /// Map a uniform roll in `[0, 1)` to a category
    ///
    /// Returns `None` only if every weight is zero.
    pub fn pick(&self, roll: f64) -> Option<C> {
        let target = roll.clamp(0.0, 1.0) * self.total();
        let mut cumulative = 0.0;
        let mut last = None;
        for &(category, weight) in &self.entries {
            if weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last = Some(category);
            if cumulative >= target {
                return Some(category);
            }
        }
        // Rounding can leave the target a hair above the final threshold
        last
    }

    /// Take up to `amount` from `chosen` and share it equally among the others
    pub fn penalize(&mut self, chosen: C, amount: f64) {
        let Some(idx) = self.entries.iter().position(|(c, _)| *c == chosen) else {
            return;
        };
        let others = self.entries.len() - 1;
        if others == 0 {
            return;
        }
        let removed = amount.min(self.entries[idx].1).max(0.0);
        let share = removed / others as f64;
        for (i, (_, weight)) in self.entries.iter_mut().enumerate() {
            if i == idx {
                *weight -= removed;
            } else {
                *weight += share;
            }
        }
    }
}

/// Difficulty table for a position along a path of `budget` rooms
pub fn difficulty_table(rooms_placed: usize, budget: usize) -> WeightTable<Difficulty> {
    let weights = if rooms_placed < budget / 3 {
        EARLY_DIFFICULTY
    } else if rooms_placed < 2 * budget / 3 {
        MIDDLE_DIFFICULTY
    } else {
        LATE_DIFFICULTY
    };
    WeightTable::new(Difficulty::ALL.into_iter().zip(weights))
}

/// Per-path sampler state
///
/// Built fresh for every path so weights never leak between builds.
#[derive(Debug, Clone)]
pub struct RoomSampler {
    types: WeightTable<RoomType>,
    budget: usize,
}

impl RoomSampler {
    pub fn new(budget: usize) -> Self {
        Self {
            types: WeightTable::new(
                RoomType::SAMPLED
                    .into_iter()
                    .map(|t| (t, INITIAL_TYPE_WEIGHT)),
            ),
            budget,
        }
    }

    pub fn type_weights(&self) -> &WeightTable<RoomType> {
        &self.types
    }

    /// Draw the type of the next room and update the type weights
    pub fn sample_type(&mut self, rng: &mut GameRng) -> RoomType {
        let room_type = self
            .types
            .pick(rng.fraction())
            .unwrap_or(RoomType::Classic);
        self.types.penalize(room_type, TYPE_WEIGHT_DECREMENT);
        room_type
    }

    pub fn sample_difficulty(&self, rng: &mut GameRng, rooms_placed: usize) -> Difficulty {
        difficulty_table(rooms_placed, self.budget)
            .pick(rng.fraction())
            .unwrap_or_default()
    }

    /// Type then difficulty, one uniform draw each
    pub fn sample(&mut self, rng: &mut GameRng, rooms_placed: usize) -> (RoomType, Difficulty) {
        let room_type = self.sample_type(rng);
        let difficulty = self.sample_difficulty(rng, rooms_placed);
        log::debug!("sampled {room_type} / {difficulty} at step {rooms_placed}");
        (room_type, difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_respects_tie_break_order() {
        let table = WeightTable::new([('a', 50.0), ('b', 50.0)]);
        // Exactly on the first threshold goes to the earlier category
        assert_eq!(table.pick(0.5), Some('a'));
        assert_eq!(table.pick(0.0), Some('a'));
        assert_eq!(table.pick(0.51), Some('b'));
        assert_eq!(table.pick(0.999), Some('b'));
    }

    #[test]
    fn test_pick_skips_zero_weights() {
        let table = WeightTable::new([('a', 0.0), ('b', 10.0), ('c', 0.0)]);
        assert_eq!(table.pick(0.0), Some('b'));
        assert_eq!(table.pick(0.99), Some('b'));
        let empty = WeightTable::new([('a', 0.0)]);
        assert_eq!(empty.pick(0.3), None);
    }

    #[test]
    fn test_penalize_preserves_total() {
        let mut sampler = RoomSampler::new(10);
        for _ in 0..5 {
            sampler.types.penalize(RoomType::Trap, TYPE_WEIGHT_DECREMENT);
        }
        assert!((sampler.type_weights().total() - 100.0).abs() < 1e-9);
        assert_eq!(sampler.type_weights().weight(RoomType::Trap), Some(0.0));
        let classic = sampler.type_weights().weight(RoomType::Classic).unwrap_or(0.0);
        assert!((classic - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_penalize_floors_at_zero() {
        let mut table = WeightTable::new([('a', 3.0), ('b', 0.0), ('c', 0.0)]);
        table.penalize('a', 8.0);
        assert_eq!(table.weight('a'), Some(0.0));
        assert_eq!(table.weight('b'), Some(1.5));
        assert_eq!(table.weight('c'), Some(1.5));
    }

    #[test]
    fn test_difficulty_bands() {
        assert_eq!(difficulty_table(0, 9).entries()[0].1, 70.0);
        assert_eq!(difficulty_table(3, 9).entries()[1].1, 60.0);
        assert_eq!(difficulty_table(6, 9).entries()[2].1, 70.0);
        // Budget 2: the first band is empty
        assert_eq!(difficulty_table(0, 2).entries()[1].1, 60.0);
    }

    #[test]
    fn test_sample_takes_two_draws() {
        let mut rng = GameRng::new(7);
        let mut sampler = RoomSampler::new(6);
        let (room_type, _) = sampler.sample(&mut rng, 0);
        assert_eq!(rng.draws(), 2);
        assert!(RoomType::SAMPLED.contains(&room_type));
        assert!(sampler.type_weights().weight(room_type).unwrap_or(100.0) < INITIAL_TYPE_WEIGHT);
    }

    #[test]
    fn test_sampler_is_deterministic() {
        let run = |seed| {
            let mut rng = GameRng::new(seed);
            let mut sampler = RoomSampler::new(12);
            (0..12).map(|i| sampler.sample(&mut rng, i)).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
