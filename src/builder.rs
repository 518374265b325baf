//! Accumulator for the transitions produced by one event
//!
//! Interpreters call [`ThreadTransitionSetBuilder::with_transition`] once per
//! affected thread and configure the returned [`TransitionBuilder`] by chaining
//! setters. Every channel starts unknown on both sides with `Assert` policies,
//! so leaving a setter out means "no claim". No cross-transition validation
//! happens here; reconciliation belongs to the timeline assembler.
//!
//! # Example
//!
//! ```
//! use schedline::builder::ThreadTransitionSetBuilder;
//! use schedline::string_bank::StringBank;
//! use schedline::transition::ConflictPolicy;
//! use schedline::types::{CpuId, Pid, ThreadState};
//!
//! let bank = StringBank::new();
//! let mut ttsb = ThreadTransitionSetBuilder::new(&bank);
//! ttsb.with_transition(0, 1000, Pid(42))
//!     .with_prev_cpu(CpuId(1))
//!     .with_next_cpu(CpuId(1))
//!     .with_next_state(ThreadState::Waiting)
//!     .on_forwards_cpu_conflict(ConflictPolicy::Drop);
//!
//! let transitions = ttsb.finish();
//! assert_eq!(transitions.len(), 1);
//! assert_eq!(transitions[0].cpu_policies().forwards, ConflictPolicy::Drop);
//! ```

use crate::string_bank::StringBank;
use crate::transition::{ConflictPolicy, ThreadTransition};
use crate::types::{CpuId, EventIndex, Pid, Priority, ThreadState, Timestamp};

/// Collects the transitions generated for a single event
#[derive(Debug)]
pub struct ThreadTransitionSetBuilder<'a> {
    bank: &'a StringBank,
    transitions: Vec<ThreadTransition>,
}

impl<'a> ThreadTransitionSetBuilder<'a> {
    pub fn new(bank: &'a StringBank) -> Self {
        Self {
            bank,
            transitions: Vec::with_capacity(2),
        }
    }

    /// Begin a new transition and return a handle for configuring it
    pub fn with_transition(
        &mut self,
        event_index: EventIndex,
        timestamp: Timestamp,
        pid: Pid,
    ) -> TransitionBuilder<'_> {
        let slot = self.transitions.len();
        self.transitions
            .push(ThreadTransition::new(event_index, timestamp, pid));
        TransitionBuilder {
            bank: self.bank,
            transition: &mut self.transitions[slot],
        }
    }

    /// Number of transitions started so far
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Transitions in the order they were started
    pub fn finish(self) -> Vec<ThreadTransition> {
        self.transitions
    }
}

/// Chainable setters for the transition most recently started
#[derive(Debug)]
pub struct TransitionBuilder<'b> {
    bank: &'b StringBank,
    transition: &'b mut ThreadTransition,
}

impl TransitionBuilder<'_> {
    /// Command before the event; `None` leaves it unknown
    pub fn with_prev_command(self, command: Option<&str>) -> Self {
        if let Some(command) = command {
            self.transition.command.prev = self.bank.intern(command);
        }
        self
    }

    /// Command after the event; `None` leaves it unknown
    pub fn with_next_command(self, command: Option<&str>) -> Self {
        if let Some(command) = command {
            self.transition.command.next = self.bank.intern(command);
        }
        self
    }

    pub fn with_prev_priority(self, priority: Priority) -> Self {
        self.transition.priority.prev = priority;
        self
    }

    pub fn with_next_priority(self, priority: Priority) -> Self {
        self.transition.priority.next = priority;
        self
    }

    pub fn with_prev_cpu(self, cpu: CpuId) -> Self {
        self.transition.cpu.prev = cpu;
        self
    }

    pub fn with_next_cpu(self, cpu: CpuId) -> Self {
        self.transition.cpu.next = cpu;
        self
    }

    pub fn with_prev_state(self, state: ThreadState) -> Self {
        self.transition.state.prev = state;
        self
    }

    pub fn with_next_state(self, state: ThreadState) -> Self {
        self.transition.state.next = state;
        self
    }

    pub fn on_forwards_cpu_conflict(self, policy: ConflictPolicy) -> Self {
        self.transition.cpu_policies.forwards = policy;
        self
    }

    pub fn on_backwards_cpu_conflict(self, policy: ConflictPolicy) -> Self {
        self.transition.cpu_policies.backwards = policy;
        self
    }

    pub fn on_forwards_state_conflict(self, policy: ConflictPolicy) -> Self {
        self.transition.state_policies.forwards = policy;
        self
    }

    pub fn on_backwards_state_conflict(self, policy: ConflictPolicy) -> Self {
        self.transition.state_policies.backwards = policy;
        self
    }
}
