//! Scheduler value types shared by events and thread transitions
//!
//! `CpuId` and `Priority` reserve `-1` as an "unknown" sentinel. A value that is
//! unknown on either side never conflicts with anything; see
//! [`Priority::conflicts_with`] and friends.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an event within its trace, used to break timestamp ties
pub type EventIndex = u64;

/// Event timestamp in nanoseconds
pub type Timestamp = i64;

/// Thread identifier as reported by the kernel tracer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(pub i64);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// CPU identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CpuId(pub i64);

impl CpuId {
    pub const UNKNOWN: CpuId = CpuId(-1);

    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }

    /// True when both CPUs are known and differ
    pub fn conflicts_with(self, other: CpuId) -> bool {
        !self.is_unknown() && !other.is_unknown() && self != other
    }
}

impl Default for CpuId {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for CpuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            f.write_str("?")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Kernel scheduling priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i64);

impl Priority {
    pub const UNKNOWN: Priority = Priority(-1);

    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }

    /// True when both priorities are known and differ
    pub fn conflicts_with(self, other: Priority) -> bool {
        !self.is_unknown() && !other.is_unknown() && self != other
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// An optional raw `prio` field: absent means unknown.
impl From<Option<i64>> for Priority {
    fn from(raw: Option<i64>) -> Self {
        raw.map_or(Self::UNKNOWN, Priority)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            f.write_str("?")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Run-state of a thread, as far as the scheduler tracepoints can tell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadState {
    #[default]
    Unknown,
    /// On a CPU
    Running,
    /// Runnable, queued for a CPU
    Waiting,
    /// Blocked
    Sleeping,
}

impl ThreadState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Running => "running",
            Self::Waiting => "waiting",
            Self::Sleeping => "sleeping",
        }
    }

    pub fn is_unknown(self) -> bool {
        self == Self::Unknown
    }

    /// True when both states are concrete and differ
    pub fn conflicts_with(self, other: ThreadState) -> bool {
        !self.is_unknown() && !other.is_unknown() && self != other
    }

    /// Classify a raw `sched_switch` `prev_state` mask.
    ///
    /// `0` is TASK_RUNNING: the thread was preempted and is still runnable.
    /// Any other bit means it blocked.
    pub fn from_prev_state(raw: i64) -> Self {
        if raw == 0 {
            Self::Waiting
        } else {
            Self::Sleeping
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
