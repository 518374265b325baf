//! Counters describing one trace load, for `-c` summary mode

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// What happened to the events of a trace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Events offered to the loader
    pub events: u64,
    /// Events skipped because the tracer clipped them
    pub clipped: u64,
    /// Events skipped because no interpreter handles their tracepoint
    pub unrecognized: u64,
    /// Events whose interpreter failed (non-strict loads only)
    pub failed: u64,
    /// Successfully interpreted events, per tracepoint name
    pub interpreted: BTreeMap<String, u64>,
    /// Transitions produced
    pub transitions: u64,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_clipped(&mut self) {
        self.events += 1;
        self.clipped += 1;
    }

    pub fn record_unrecognized(&mut self) {
        self.events += 1;
        self.unrecognized += 1;
    }

    pub fn record_failed(&mut self) {
        self.events += 1;
        self.failed += 1;
    }

    pub fn record_interpreted(&mut self, name: &str, transitions: usize) {
        self.events += 1;
        *self.interpreted.entry(name.to_string()).or_default() += 1;
        self.transitions += transitions as u64;
    }

    /// Fold another shard's counters into this one
    pub fn merge(&mut self, other: LoadStats) {
        self.events += other.events;
        self.clipped += other.clipped;
        self.unrecognized += other.unrecognized;
        self.failed += other.failed;
        self.transitions += other.transitions;
        for (name, count) in other.interpreted {
            *self.interpreted.entry(name).or_default() += count;
        }
    }

    /// Human-readable summary table
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        let _ = writeln!(report, "{:<24} {:>12}", "tracepoint", "events");
        let _ = writeln!(report, "{:-<24} {:->12}", "", "");
        for (name, count) in &self.interpreted {
            let _ = writeln!(report, "{:<24} {:>12}", name, count);
        }
        let _ = writeln!(report, "{:-<24} {:->12}", "", "");
        let _ = writeln!(report, "{:<24} {:>12}", "clipped", self.clipped);
        let _ = writeln!(report, "{:<24} {:>12}", "unrecognized", self.unrecognized);
        let _ = writeln!(report, "{:<24} {:>12}", "failed", self.failed);
        let _ = writeln!(report, "{:<24} {:>12}", "total events", self.events);
        let _ = writeln!(report, "{:<24} {:>12}", "transitions", self.transitions);
        report
    }
}
