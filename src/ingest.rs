//! Whole-trace loading
//!
//! Reads decoded events from JSON lines and runs them through an
//! [`EventLoader`]. Large traces can be split into contiguous shards that are
//! interpreted in parallel; every shard shares the one loader and its string
//! bank, and shard outputs are stitched back together in trace order.
//!
//! # Example
//!
//! ```
//! use schedline::ingest::{load_trace, read_events, LoadOptions};
//! use schedline::loader::{EventLoader, LoaderSet};
//! use schedline::string_bank::StringBank;
//! use std::sync::Arc;
//!
//! let trace = r#"{"index":0,"timestamp":10,"cpu":1,"name":"sched_wakeup","number_properties":{"pid":9,"target_cpu":1}}
//! {"index":1,"timestamp":20,"cpu":1,"name":"sched_switch","number_properties":{"next_pid":9,"prev_pid":0,"prev_state":0}}"#;
//!
//! let events = read_events(trace.as_bytes())?;
//! let loader = EventLoader::new(LoaderSet::Default.loaders(), Arc::new(StringBank::new()))?;
//! let load = load_trace(&loader, &events, &LoadOptions::default())?;
//! assert_eq!(load.transitions.len(), 3);
//! assert_eq!(load.stats.events, 2);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::config::LoaderConfig;
use crate::event::Event;
use crate::loader::EventLoader;
use crate::stats::LoadStats;
use crate::transition::ThreadTransition;
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// How to treat a trace as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Abort on the first malformed event instead of skipping it
    pub strict: bool,
    /// Number of parallel shards (at least 1)
    pub jobs: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict: false,
            jobs: 1,
        }
    }
}

impl From<&LoaderConfig> for LoadOptions {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            strict: config.strict,
            jobs: config.jobs,
        }
    }
}

/// Transitions for a whole trace, in event order
#[derive(Debug, Clone, Default)]
pub struct TraceLoad {
    pub transitions: Vec<ThreadTransition>,
    pub stats: LoadStats,
}

/// Parse one JSON event per line; blank lines are skipped
///
/// # Errors
/// Returns error on I/O failure or a malformed line, naming the line number.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read trace line {}", lineno + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event = serde_json::from_str(&line)
            .with_context(|| format!("Malformed event on trace line {}", lineno + 1))?;
        events.push(event);
    }
    Ok(events)
}

/// Read a JSON-lines trace file
pub fn read_events_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Event>> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("Failed to open trace: {}", path.as_ref().display()))?;
    read_events(BufReader::new(file))
        .with_context(|| format!("Failed to load trace: {}", path.as_ref().display()))
}

/// Interpret every event of a trace
///
/// # Errors
/// In strict mode, returns the first interpreter error (in trace order).
/// Also fails if a worker thread panics.
pub fn load_trace(loader: &EventLoader, events: &[Event], options: &LoadOptions) -> Result<TraceLoad> {
    let jobs = options.jobs.max(1);
    let load = if jobs == 1 || events.len() < 2 {
        load_shard(loader, events, options.strict)?
    } else {
        let shard_len = events.len().div_ceil(jobs);
        let strict = options.strict;
        let outcomes = crossbeam::thread::scope(|s| {
            let workers: Vec<_> = events
                .chunks(shard_len)
                .map(|shard| s.spawn(move |_| load_shard(loader, shard, strict)))
                .collect();
            workers
                .into_iter()
                .map(|worker| worker.join())
                .collect::<Vec<_>>()
        })
        .map_err(|_| anyhow!("trace loading worker panicked"))?;

        let mut merged = TraceLoad::default();
        for outcome in outcomes {
            let shard = outcome.map_err(|_| anyhow!("trace loading worker panicked"))??;
            merged.transitions.extend(shard.transitions);
            merged.stats.merge(shard.stats);
        }
        merged
    };

    debug!(
        events = load.stats.events,
        transitions = load.stats.transitions,
        failed = load.stats.failed,
        jobs,
        "trace loaded"
    );
    Ok(load)
}

fn load_shard(loader: &EventLoader, events: &[Event], strict: bool) -> Result<TraceLoad> {
    let mut load = TraceLoad::default();
    for ev in events {
        if ev.clipped {
            load.stats.record_clipped();
            continue;
        }
        if !loader.handles(&ev.name) {
            load.stats.record_unrecognized();
            continue;
        }
        match loader.thread_transitions(ev) {
            Ok(transitions) => {
                load.stats.record_interpreted(&ev.name, transitions.len());
                load.transitions.extend(transitions);
            }
            Err(e) if strict => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, name = %ev.name, "skipping malformed event");
                load.stats.record_failed();
            }
        }
    }
    Ok(load)
}
