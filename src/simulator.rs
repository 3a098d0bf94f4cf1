use std::io;

use tracing::{debug, info};

use crate::cache::{AccessKind, CacheState};
use crate::error::SimError;
use crate::geometry::Geometry;
use crate::replacement::ReplacementPolicy;
use crate::trace::parse_address;

/// One classified access, kept in trace order for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessOutcome {
    pub raw: String,
    pub address: u32,
    pub tag: u32,
    pub index: u32,
    pub kind: AccessKind,
}

impl AccessOutcome {
    /// Render the per-access report line: address, tag and index as
    /// fixed-width binary, and the classification.
    pub fn report_line(&self, geometry: &Geometry) -> String {
        format!(
            "{}|{:0tw$b}|{:0iw$b}|{}",
            self.raw,
            self.tag,
            self.index,
            self.kind,
            tw = geometry.tag_bits() as usize,
            iw = geometry.index_bits() as usize,
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    hits: u64,
    misses: u64,
}

impl Statistics {
    pub fn record(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Hit => self.hits += 1,
            AccessKind::Miss => self.misses += 1,
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate as a percentage; 0.0 for an empty trace.
    pub fn hit_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        100.0 * self.hits as f64 / self.total() as f64
    }

    /// The summary line for the report; an empty trace has no rate.
    pub fn summary(&self) -> String {
        if self.total() == 0 {
            "No accesses".to_string()
        } else {
            format!("Hit rate: {:.1}%", self.hit_rate())
        }
    }
}

#[derive(Debug)]
pub struct SimulationResult {
    pub outcomes: Vec<AccessOutcome>,
    pub stats: Statistics,
}

impl SimulationResult {
    /// The full report: one line per access plus the summary.
    pub fn report(&self, geometry: &Geometry) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            out.push_str(&outcome.report_line(geometry));
            out.push('\n');
        }
        out.push_str(&self.stats.summary());
        out.push('\n');
        out
    }
}

/// Run the trace through a cold cache, strictly in line order. Order drives
/// the LRU recency stamps, so it is part of the contract, not a detail.
/// The first malformed line aborts the whole run.
pub fn run<I>(
    trace: I,
    geometry: &Geometry,
    policy: Box<dyn ReplacementPolicy>,
) -> Result<SimulationResult, SimError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut cache = CacheState::new(geometry, policy);
    let mut stats = Statistics::default();
    let mut outcomes = Vec::new();

    for (i, line) in trace.into_iter().enumerate() {
        let line = line?;
        let address = parse_address(&line, i + 1)?;
        let decoded = geometry.decode(address);
        let kind = cache.access(&decoded);
        stats.record(kind);
        debug!(line = i + 1, address, ?kind, "classified access");
        outcomes.push(AccessOutcome {
            raw: line.trim().to_string(),
            address,
            tag: decoded.tag,
            index: decoded.index,
            kind,
        });
    }

    info!(
        accesses = stats.total(),
        hits = stats.hits(),
        misses = stats.misses(),
        "trace exhausted"
    );
    Ok(SimulationResult { outcomes, stats })
}
