//! schedline - per-thread scheduling transitions from kernel tracepoints
//!
//! This library translates raw `sched_switch`, `sched_wakeup`,
//! `sched_wakeup_new` and `sched_migrate_task` events into thread transitions:
//! one event's claim about a thread's command, priority, CPU and run-state just
//! before and after the event, tagged with the policy a timeline assembler
//! should apply when neighbouring claims disagree.

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod ingest;
pub mod json_output;
pub mod loader;
pub mod stats;
pub mod string_bank;
pub mod tracepoints;
pub mod transition;
pub mod types;
