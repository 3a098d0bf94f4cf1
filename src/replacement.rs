use clap::ValueEnum;
use rand::Rng;

use crate::cache::Way;

/// Picks the way to evict when a set is full. Only consulted once every way
/// in the set is valid; cold fills never reach the policy.
pub trait ReplacementPolicy {
    fn select_victim(&mut self, ways: &[Way]) -> usize;
}

/// Policy choice as it appears on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    Lru,
    Fifo,
    Random,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn ReplacementPolicy> {
        match self {
            PolicyKind::Lru => Box::new(Lru),
            PolicyKind::Fifo => Box::new(Fifo),
            PolicyKind::Random => Box::new(Random),
        }
    }
}

/// Evicts the way with the smallest recency stamp, ties to the lowest
/// way index so runs are reproducible.
pub struct Lru;

impl ReplacementPolicy for Lru {
    fn select_victim(&mut self, ways: &[Way]) -> usize {
        let mut victim = 0;
        for (i, way) in ways.iter().enumerate() {
            if way.recency < ways[victim].recency {
                victim = i;
            }
        }
        victim
    }
}

/// Evicts the way filled longest ago, ignoring hits since then.
pub struct Fifo;

impl ReplacementPolicy for Fifo {
    fn select_victim(&mut self, ways: &[Way]) -> usize {
        let mut victim = 0;
        for (i, way) in ways.iter().enumerate() {
            if way.inserted_at < ways[victim].inserted_at {
                victim = i;
            }
        }
        victim
    }
}

/// Evicts a uniformly random way.
pub struct Random;

impl ReplacementPolicy for Random {
    fn select_victim(&mut self, ways: &[Way]) -> usize {
        let mut rng = rand::thread_rng();
        rng.gen_range(0..ways.len())
    }
}
