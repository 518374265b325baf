//! JSON output format for thread transitions
//!
//! Commands are resolved through the string bank and unknown values are
//! rendered as `null`, so the output stands alone without the bank.

use crate::stats::LoadStats;
use crate::string_bank::{StringBank, StringId};
use crate::transition::{ConflictPolicy, ThreadTransition};
use crate::types::{CpuId, EventIndex, Priority, ThreadState, Timestamp};
use serde::{Deserialize, Serialize};

/// Previous/next pair with unknowns as `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonChange<T> {
    pub prev: Option<T>,
    pub next: Option<T>,
}

/// Conflict policies for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonPolicies {
    pub forwards: ConflictPolicy,
    pub backwards: ConflictPolicy,
}

/// A single thread transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonTransition {
    pub event_index: EventIndex,
    pub timestamp: Timestamp,
    pub pid: i64,
    pub command: JsonChange<String>,
    pub priority: JsonChange<i64>,
    pub cpu: JsonChange<i64>,
    pub state: JsonChange<ThreadState>,
    pub cpu_policy: JsonPolicies,
    pub state_policy: JsonPolicies,
}

fn command(bank: &StringBank, id: StringId) -> Option<String> {
    bank.lookup(id).map(|s| s.to_string())
}

fn priority(p: Priority) -> Option<i64> {
    (!p.is_unknown()).then_some(p.0)
}

fn cpu(c: CpuId) -> Option<i64> {
    (!c.is_unknown()).then_some(c.0)
}

fn state(s: ThreadState) -> Option<ThreadState> {
    (!s.is_unknown()).then_some(s)
}

impl JsonTransition {
    pub fn new(tt: &ThreadTransition, bank: &StringBank) -> Self {
        let cmd = tt.command();
        let prio = tt.priority();
        let cpus = tt.cpu();
        let states = tt.state();
        JsonTransition {
            event_index: tt.event_index(),
            timestamp: tt.timestamp(),
            pid: tt.pid().0,
            command: JsonChange {
                prev: command(bank, cmd.prev),
                next: command(bank, cmd.next),
            },
            priority: JsonChange {
                prev: priority(prio.prev),
                next: priority(prio.next),
            },
            cpu: JsonChange {
                prev: cpu(cpus.prev),
                next: cpu(cpus.next),
            },
            state: JsonChange {
                prev: state(states.prev),
                next: state(states.next),
            },
            cpu_policy: JsonPolicies {
                forwards: tt.cpu_policies().forwards,
                backwards: tt.cpu_policies().backwards,
            },
            state_policy: JsonPolicies {
                forwards: tt.state_policies().forwards,
                backwards: tt.state_policies().backwards,
            },
        }
    }
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Format version identifier
    pub format: String,
    pub transitions: Vec<JsonTransition>,
    pub summary: LoadStats,
}

impl JsonReport {
    pub fn new(transitions: &[ThreadTransition], bank: &StringBank, summary: LoadStats) -> Self {
        JsonReport {
            format: "schedline-json-v1".to_string(),
            transitions: transitions
                .iter()
                .map(|tt| JsonTransition::new(tt, bank))
                .collect(),
            summary,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ThreadTransitionSetBuilder;
    use crate::types::Pid;

    fn wakeup_like(bank: &StringBank) -> Vec<ThreadTransition> {
        let mut ttsb = ThreadTransitionSetBuilder::new(bank);
        ttsb.with_transition(3, 700, Pid(9))
            .with_prev_command(Some("bash"))
            .with_next_command(Some("bash"))
            .with_prev_cpu(CpuId(4))
            .with_next_cpu(CpuId(4))
            .with_next_state(ThreadState::Waiting)
            .on_forwards_cpu_conflict(ConflictPolicy::Drop);
        ttsb.finish()
    }

    #[test]
    fn test_unknowns_become_null() {
        let bank = StringBank::new();
        let json = JsonTransition::new(&wakeup_like(&bank)[0], &bank);

        assert_eq!(json.pid, 9);
        assert_eq!(json.command.prev.as_deref(), Some("bash"));
        assert_eq!(json.priority, JsonChange { prev: None, next: None });
        assert_eq!(json.cpu, JsonChange { prev: Some(4), next: Some(4) });
        assert_eq!(json.state.prev, None);
        assert_eq!(json.state.next, Some(ThreadState::Waiting));
        assert_eq!(json.cpu_policy.forwards, ConflictPolicy::Drop);
        assert_eq!(json.cpu_policy.backwards, ConflictPolicy::Assert);
    }

    #[test]
    fn test_report_serializes() {
        let bank = StringBank::new();
        let report = JsonReport::new(&wakeup_like(&bank), &bank, LoadStats::new());
        let text = report.to_json().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["format"], "schedline-json-v1");
        assert_eq!(parsed["transitions"][0]["state"]["next"], "waiting");
        assert_eq!(parsed["transitions"][0]["cpu_policy"]["forwards"], "drop");
        assert!(parsed["transitions"][0]["priority"]["prev"].is_null());
        assert!(parsed["summary"].is_object());
    }
}
