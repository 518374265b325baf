//! Interpreters for the kernel scheduler tracepoints
//!
//! Each interpreter extracts a typed view of its tracepoint's fields (failing
//! fast on a missing required field), then records what the event claims about
//! each affected thread on a [`ThreadTransitionSetBuilder`].
//!
//! Trust differs per tracepoint:
//!
//! | Tracepoint | Transitions | CPU policy | State policy |
//! |---|---|---|---|
//! | `sched_migrate_task` | 1 | assert | assert |
//! | `sched_switch` | 2 | assert | assert |
//! | `sched_wakeup`, `sched_wakeup_new` | 1 | drop both ways | drop forwards |
//! | `sched_switch` (switch-only traces) | 2 | insert synthetic | insert synthetic |

use crate::builder::{ThreadTransitionSetBuilder, TransitionBuilder};
use crate::error::Result;
use crate::event::Event;
use crate::loader::LoaderFn;
use crate::transition::ConflictPolicy;
use crate::types::{CpuId, Pid, Priority, ThreadState};
use std::collections::HashMap;
use std::fmt;

/// Scheduler tracepoints with a known interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tracepoint {
    SchedMigrateTask,
    SchedSwitch,
    SchedWakeup,
    SchedWakeupNew,
}

impl Tracepoint {
    /// Tracepoint name as it appears in the trace
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SchedMigrateTask => "sched_migrate_task",
            Self::SchedSwitch => "sched_switch",
            Self::SchedWakeup => "sched_wakeup",
            Self::SchedWakeupNew => "sched_wakeup_new",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sched_migrate_task" => Some(Self::SchedMigrateTask),
            "sched_switch" => Some(Self::SchedSwitch),
            "sched_wakeup" => Some(Self::SchedWakeup),
            "sched_wakeup_new" => Some(Self::SchedWakeupNew),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::SchedMigrateTask,
            Self::SchedSwitch,
            Self::SchedWakeup,
            Self::SchedWakeupNew,
        ]
    }
}

impl fmt::Display for Tracepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of a `sched_migrate_task` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateData<'e> {
    pub pid: Pid,
    pub comm: Option<&'e str>,
    pub priority: Priority,
    pub orig_cpu: CpuId,
    pub dest_cpu: CpuId,
}

impl<'e> MigrateData<'e> {
    pub fn from_event(ev: &'e Event) -> Result<Self> {
        Ok(Self {
            pid: Pid(ev.number("pid")?),
            comm: ev.text("comm"),
            priority: Priority::from(ev.optional_number("prio")),
            orig_cpu: CpuId(ev.number("orig_cpu")?),
            dest_cpu: CpuId(ev.number("dest_cpu")?),
        })
    }
}

/// Fields of a `sched_switch` event
///
/// `next_*` describe the thread switched in, `prev_*` the thread switched out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchData<'e> {
    pub next_pid: Pid,
    pub next_comm: Option<&'e str>,
    pub next_priority: Priority,
    pub prev_pid: Pid,
    pub prev_comm: Option<&'e str>,
    pub prev_priority: Priority,
    /// Where the switched-out thread went, from its raw `prev_state`
    pub prev_state: ThreadState,
}

impl<'e> SwitchData<'e> {
    pub fn from_event(ev: &'e Event) -> Result<Self> {
        Ok(Self {
            next_pid: Pid(ev.number("next_pid")?),
            next_comm: ev.text("next_comm"),
            next_priority: Priority::from(ev.optional_number("next_prio")),
            prev_pid: Pid(ev.number("prev_pid")?),
            prev_comm: ev.text("prev_comm"),
            prev_priority: Priority::from(ev.optional_number("prev_prio")),
            prev_state: ThreadState::from_prev_state(ev.number("prev_state")?),
        })
    }
}

/// Fields of a `sched_wakeup` or `sched_wakeup_new` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeupData<'e> {
    pub pid: Pid,
    pub comm: Option<&'e str>,
    pub priority: Priority,
    pub target_cpu: CpuId,
}

impl<'e> WakeupData<'e> {
    pub fn from_event(ev: &'e Event) -> Result<Self> {
        Ok(Self {
            pid: Pid(ev.number("pid")?),
            comm: ev.text("comm"),
            priority: Priority::from(ev.optional_number("prio")),
            target_cpu: CpuId(ev.number("target_cpu")?),
        })
    }
}

/// Start a transition whose command and priority are unchanged by the event
fn with_stable_identity<'b>(
    ttsb: &'b mut ThreadTransitionSetBuilder<'_>,
    ev: &Event,
    pid: Pid,
    comm: Option<&str>,
    priority: Priority,
) -> TransitionBuilder<'b> {
    ttsb.with_transition(ev.index, ev.timestamp, pid)
        .with_prev_command(comm)
        .with_next_command(comm)
        .with_prev_priority(priority)
        .with_next_priority(priority)
}

/// Interpret `sched_migrate_task`.
///
/// One transition: the thread leaves `orig_cpu` and arrives on `dest_cpu`.
/// Migrations are authoritative, so every policy stays `Assert`.
pub fn load_sched_migrate_task(ev: &Event, ttsb: &mut ThreadTransitionSetBuilder<'_>) -> Result<()> {
    let md = MigrateData::from_event(ev)?;
    with_stable_identity(ttsb, ev, md.pid, md.comm, md.priority)
        .with_prev_cpu(md.orig_cpu)
        .with_next_cpu(md.dest_cpu);
    Ok(())
}

/// Interpret `sched_switch`.
///
/// Two transitions, both pinned to the reporting CPU:
/// * the switched-in thread ends up Running,
/// * the switched-out thread goes from Running to Waiting or Sleeping,
///   depending on its `prev_state`.
pub fn load_sched_switch(ev: &Event, ttsb: &mut ThreadTransitionSetBuilder<'_>) -> Result<()> {
    let sd = SwitchData::from_event(ev)?;
    let cpu = CpuId(ev.cpu);

    with_stable_identity(ttsb, ev, sd.next_pid, sd.next_comm, sd.next_priority)
        .with_prev_cpu(cpu)
        .with_next_cpu(cpu)
        .with_next_state(ThreadState::Running);
    with_stable_identity(ttsb, ev, sd.prev_pid, sd.prev_comm, sd.prev_priority)
        .with_prev_cpu(cpu)
        .with_next_cpu(cpu)
        .with_prev_state(ThreadState::Running)
        .with_next_state(sd.prev_state);
    Ok(())
}

/// Interpret `sched_wakeup` and `sched_wakeup_new`.
///
/// One transition on `target_cpu`, ending in Waiting. Wakeups fire from
/// interrupt context: they can be misordered against other events, reported
/// for a CPU the thread is not on, or hit a thread that is already running.
/// Their CPU claims (both ways) and forward state claim are dropped on
/// conflict.
pub fn load_sched_wakeup(ev: &Event, ttsb: &mut ThreadTransitionSetBuilder<'_>) -> Result<()> {
    let wd = WakeupData::from_event(ev)?;
    with_stable_identity(ttsb, ev, wd.pid, wd.comm, wd.priority)
        .with_prev_cpu(wd.target_cpu)
        .with_next_cpu(wd.target_cpu)
        .with_next_state(ThreadState::Waiting)
        .on_backwards_cpu_conflict(ConflictPolicy::Drop)
        .on_forwards_cpu_conflict(ConflictPolicy::Drop)
        .on_forwards_state_conflict(ConflictPolicy::Drop);
    Ok(())
}

fn insert_synthetics(tb: TransitionBuilder<'_>) -> TransitionBuilder<'_> {
    tb.on_forwards_cpu_conflict(ConflictPolicy::InsertSynthetic)
        .on_backwards_cpu_conflict(ConflictPolicy::InsertSynthetic)
        .on_forwards_state_conflict(ConflictPolicy::InsertSynthetic)
        .on_backwards_state_conflict(ConflictPolicy::InsertSynthetic)
}

/// Interpret `sched_switch` in a trace that has no wakeup or migrate events.
///
/// Same claims as [`load_sched_switch`], plus the switched-in thread was
/// Waiting. Any CPU or state change between two switches must have happened
/// silently, so every conflict asks for a synthetic bridging transition.
pub fn load_sched_switch_with_synthetics(
    ev: &Event,
    ttsb: &mut ThreadTransitionSetBuilder<'_>,
) -> Result<()> {
    let sd = SwitchData::from_event(ev)?;
    let cpu = CpuId(ev.cpu);

    insert_synthetics(
        with_stable_identity(ttsb, ev, sd.next_pid, sd.next_comm, sd.next_priority)
            .with_prev_cpu(cpu)
            .with_next_cpu(cpu)
            .with_prev_state(ThreadState::Waiting)
            .with_next_state(ThreadState::Running),
    );
    insert_synthetics(
        with_stable_identity(ttsb, ev, sd.prev_pid, sd.prev_comm, sd.prev_priority)
            .with_prev_cpu(cpu)
            .with_next_cpu(cpu)
            .with_prev_state(ThreadState::Running)
            .with_next_state(sd.prev_state),
    );
    Ok(())
}

/// Interpreters for traces carrying the standard scheduling tracepoints
pub fn default_event_loaders() -> HashMap<String, LoaderFn> {
    Tracepoint::all()
        .iter()
        .map(|tp| {
            let loader: LoaderFn = match tp {
                Tracepoint::SchedMigrateTask => load_sched_migrate_task,
                Tracepoint::SchedSwitch => load_sched_switch,
                Tracepoint::SchedWakeup | Tracepoint::SchedWakeupNew => load_sched_wakeup,
            };
            (tp.as_str().to_string(), loader)
        })
        .collect()
}

/// Interpreters for traces in which only `sched_switch` was recorded
pub fn switch_only_loaders() -> HashMap<String, LoaderFn> {
    let mut loaders: HashMap<String, LoaderFn> = HashMap::new();
    loaders.insert(
        Tracepoint::SchedSwitch.as_str().to_string(),
        load_sched_switch_with_synthetics,
    );
    loaders
}
