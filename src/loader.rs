//! Tracepoint-name registry dispatching events to their interpreters
//!
//! An [`EventLoader`] is built once per trace from a set of interpreters and a
//! shared [`StringBank`], then queried once per event. It holds no per-event
//! state, so a single loader can be shared by any number of worker threads.
//!
//! # Example
//!
//! ```
//! use schedline::event::Event;
//! use schedline::loader::{EventLoader, LoaderSet};
//! use schedline::string_bank::StringBank;
//! use std::sync::Arc;
//!
//! let loader = EventLoader::new(LoaderSet::Default.loaders(), Arc::new(StringBank::new()))?;
//!
//! let ev = Event::new(0, 1000, 1, "sched_wakeup")
//!     .with_number("pid", 9)
//!     .with_number("target_cpu", 4);
//! assert_eq!(loader.thread_transitions(&ev)?.len(), 1);
//!
//! // Tracepoints without an interpreter are skipped, not rejected
//! let ev = Event::new(1, 1001, 1, "irq_handler_entry");
//! assert!(loader.thread_transitions(&ev)?.is_empty());
//! # Ok::<(), schedline::error::LoaderError>(())
//! ```

use crate::builder::ThreadTransitionSetBuilder;
use crate::error::{LoaderError, Result};
use crate::event::Event;
use crate::string_bank::StringBank;
use crate::tracepoints::{default_event_loaders, switch_only_loaders};
use crate::transition::ThreadTransition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Interpreter for one tracepoint: records the event's claims on the builder
pub type LoaderFn = fn(&Event, &mut ThreadTransitionSetBuilder<'_>) -> Result<()>;

/// Preset interpreter sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoaderSet {
    /// `sched_migrate_task`, `sched_switch`, `sched_wakeup`, `sched_wakeup_new`
    #[default]
    Default,
    /// `sched_switch` only, bridging gaps with synthetic transitions
    SwitchOnly,
}

impl LoaderSet {
    pub fn loaders(self) -> HashMap<String, LoaderFn> {
        match self {
            Self::Default => default_event_loaders(),
            Self::SwitchOnly => switch_only_loaders(),
        }
    }
}

/// Maps tracepoint names to interpreters
#[derive(Clone)]
pub struct EventLoader {
    string_bank: Arc<StringBank>,
    loaders: HashMap<String, LoaderFn>,
}

impl fmt::Debug for EventLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tracepoints: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        tracepoints.sort_unstable();
        f.debug_struct("EventLoader")
            .field("tracepoints", &tracepoints)
            .field("interned_strings", &self.string_bank.len())
            .finish()
    }
}

impl EventLoader {
    /// Build a loader from tracepoint-name → interpreter mappings
    ///
    /// # Errors
    /// Returns `EmptyRegistry` if `loaders` is empty: such a loader could never
    /// produce a transition.
    pub fn new(loaders: HashMap<String, LoaderFn>, string_bank: Arc<StringBank>) -> Result<Self> {
        if loaders.is_empty() {
            return Err(LoaderError::EmptyRegistry);
        }
        debug!(tracepoints = loaders.len(), "event loader ready");
        Ok(Self {
            string_bank,
            loaders,
        })
    }

    /// Transitions implied by `ev`, in the order its interpreter produced them
    ///
    /// Clipped events and events without a registered interpreter yield an
    /// empty list.
    ///
    /// # Errors
    /// Passes through the interpreter's error unchanged.
    pub fn thread_transitions(&self, ev: &Event) -> Result<Vec<ThreadTransition>> {
        if ev.clipped {
            trace!(index = ev.index, name = %ev.name, "skipping clipped event");
            return Ok(Vec::new());
        }
        let Some(loader) = self.loaders.get(&ev.name) else {
            trace!(index = ev.index, name = %ev.name, "no interpreter for tracepoint");
            return Ok(Vec::new());
        };
        let mut ttsb = ThreadTransitionSetBuilder::new(&self.string_bank);
        loader(ev, &mut ttsb)?;
        Ok(ttsb.finish())
    }

    /// Whether an interpreter is registered for `name`
    pub fn handles(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    pub fn string_bank(&self) -> &Arc<StringBank> {
        &self.string_bank
    }
}
