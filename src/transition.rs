//! Per-event, per-thread transition records
//!
//! A [`ThreadTransition`] is one event's claim about one thread: the value of
//! each attribute channel (command, priority, CPU, state) immediately before
//! and after the event. Either side of a channel may be unknown, in which case
//! it makes no claim.
//!
//! CPU and state channels also carry a [`ConflictPolicies`] pair telling the
//! timeline assembler how to settle a disagreement with the neighbouring
//! transitions of the same thread:
//!
//! ```text
//!   earlier transition          this transition           later transition
//!   ... next ──── backwards ──── prev   next ──── forwards ──── prev ...
//! ```
//!
//! Neighbours are ordered by `(timestamp, event_index)`; see
//! [`ThreadTransition::chronological_key`].

use crate::string_bank::StringId;
use crate::types::{CpuId, EventIndex, Pid, Priority, ThreadState, Timestamp};
use serde::{Deserialize, Serialize};

/// How to resolve a disagreement between adjacent transitions of one thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// The disagreement is a data-integrity fault for the assembler to surface
    #[default]
    Assert,
    /// Discard this transition's claim for the channel
    Drop,
    /// Bridge the gap with an interpolated transition
    InsertSynthetic,
}

impl ConflictPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assert => "assert",
            Self::Drop => "drop",
            Self::InsertSynthetic => "insert_synthetic",
        }
    }
}

/// Conflict policies for one channel, in both directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConflictPolicies {
    /// Against the next transition's previous value
    pub forwards: ConflictPolicy,
    /// Against the preceding transition's next value
    pub backwards: ConflictPolicy,
}

impl ConflictPolicies {
    /// The same policy in both directions
    pub const fn both(policy: ConflictPolicy) -> Self {
        Self {
            forwards: policy,
            backwards: policy,
        }
    }
}

/// Previous/next values of one attribute channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Change<T> {
    pub prev: T,
    pub next: T,
}

/// One event's claim about a single thread's attributes
///
/// Only the [`builder`](crate::builder) constructs these; once handed out they
/// are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadTransition {
    pub(crate) event_index: EventIndex,
    pub(crate) timestamp: Timestamp,
    pub(crate) pid: Pid,
    pub(crate) command: Change<StringId>,
    pub(crate) priority: Change<Priority>,
    pub(crate) cpu: Change<CpuId>,
    pub(crate) state: Change<ThreadState>,
    pub(crate) cpu_policies: ConflictPolicies,
    pub(crate) state_policies: ConflictPolicies,
}

impl ThreadTransition {
    /// A transition with every channel unknown and every policy `Assert`
    pub(crate) fn new(event_index: EventIndex, timestamp: Timestamp, pid: Pid) -> Self {
        Self {
            event_index,
            timestamp,
            pid,
            command: Change {
                prev: StringId::UNKNOWN,
                next: StringId::UNKNOWN,
            },
            priority: Change {
                prev: Priority::UNKNOWN,
                next: Priority::UNKNOWN,
            },
            cpu: Change {
                prev: CpuId::UNKNOWN,
                next: CpuId::UNKNOWN,
            },
            state: Change {
                prev: ThreadState::Unknown,
                next: ThreadState::Unknown,
            },
            cpu_policies: ConflictPolicies::default(),
            state_policies: ConflictPolicies::default(),
        }
    }

    pub fn event_index(&self) -> EventIndex {
        self.event_index
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn command(&self) -> Change<StringId> {
        self.command
    }

    pub fn priority(&self) -> Change<Priority> {
        self.priority
    }

    pub fn cpu(&self) -> Change<CpuId> {
        self.cpu
    }

    pub fn state(&self) -> Change<ThreadState> {
        self.state
    }

    pub fn cpu_policies(&self) -> ConflictPolicies {
        self.cpu_policies
    }

    pub fn state_policies(&self) -> ConflictPolicies {
        self.state_policies
    }

    /// Ordering key among transitions of the same thread
    pub fn chronological_key(&self) -> (Timestamp, EventIndex) {
        (self.timestamp, self.event_index)
    }
}
