use std::fmt;

use crate::geometry::{DecodedAddress, Geometry};
use crate::replacement::ReplacementPolicy;

/// One storage line: valid bit, stored tag, and the bookkeeping the
/// replacement policies read.
#[derive(Debug, Clone, Copy)]
pub struct Way {
    pub valid: bool,
    pub tag: u32,
    pub recency: u64,
    pub inserted_at: u64,
}

impl Way {
    fn empty() -> Way {
        Way {
            valid: false,
            tag: 0,
            recency: 0,
            inserted_at: 0,
        }
    }
}

struct CacheSet {
    ways: Vec<Way>,
}

impl CacheSet {
    fn new(associativity: u64) -> CacheSet {
        CacheSet {
            ways: vec![Way::empty(); associativity as usize],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Hit,
    Miss,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Hit => write!(f, "HIT"),
            AccessKind::Miss => write!(f, "MISS"),
        }
    }
}

/// The full array of sets. Starts cold (every way invalid) and is mutated
/// in place by each access, one access at a time.
pub struct CacheState {
    sets: Vec<CacheSet>,
    policy: Box<dyn ReplacementPolicy>,
    tick: u64,
}

impl CacheState {
    pub fn new(geometry: &Geometry, policy: Box<dyn ReplacementPolicy>) -> CacheState {
        let sets = (0..geometry.num_sets())
            .map(|_| CacheSet::new(geometry.associativity()))
            .collect();
        CacheState {
            sets,
            policy,
            tick: 0,
        }
    }

    /// Classify one decoded address and update the cache in the same step.
    /// A hit only refreshes the matching way's recency. A miss fills the
    /// first invalid way, or asks the policy for a victim when the set is
    /// full. Single-way sets skip the policy and overwrite unconditionally.
    pub fn access(&mut self, decoded: &DecodedAddress) -> AccessKind {
        self.tick += 1;
        let set = &mut self.sets[decoded.index as usize];

        if let Some(way) = set.ways.iter_mut().find(|w| w.valid && w.tag == decoded.tag) {
            way.recency = self.tick;
            return AccessKind::Hit;
        }

        let victim = match set.ways.iter().position(|w| !w.valid) {
            Some(invalid) => invalid,
            None if set.ways.len() == 1 => 0,
            None => self.policy.select_victim(&set.ways),
        };

        let way = &mut set.ways[victim];
        way.valid = true;
        way.tag = decoded.tag;
        way.recency = self.tick;
        way.inserted_at = self.tick;
        AccessKind::Miss
    }
}
