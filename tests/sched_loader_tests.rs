//! Integration tests for scheduler event interpretation
//!
//! Each test drives the public `EventLoader` API the way a timeline assembler
//! would: build the loader once, feed it decoded events, inspect transitions.

use schedline::error::LoaderError;
use schedline::event::Event;
use schedline::loader::{EventLoader, LoaderSet};
use schedline::string_bank::StringBank;
use schedline::transition::{ConflictPolicies, ConflictPolicy};
use schedline::types::{CpuId, Pid, Priority, ThreadState};
use std::sync::Arc;

fn loader(set: LoaderSet) -> (EventLoader, Arc<StringBank>) {
    let bank = Arc::new(StringBank::new());
    let loader = EventLoader::new(set.loaders(), Arc::clone(&bank)).unwrap();
    (loader, bank)
}

fn switch(prev_state: i64) -> Event {
    Event::new(20, 2_000, 2, "sched_switch")
        .with_number("next_pid", 5)
        .with_number("prev_pid", 7)
        .with_number("prev_state", prev_state)
        .with_text("next_comm", "a")
        .with_text("prev_comm", "b")
}

#[test]
fn test_migrate_task() {
    let (loader, bank) = loader(LoaderSet::Default);
    let ev = Event::new(1, 1_000, 0, "sched_migrate_task")
        .with_number("pid", 42)
        .with_number("orig_cpu", 1)
        .with_number("dest_cpu", 3)
        .with_number("prio", 10)
        .with_text("comm", "x");

    let tts = loader.thread_transitions(&ev).unwrap();
    assert_eq!(tts.len(), 1);
    let tt = &tts[0];
    assert_eq!(tt.pid(), Pid(42));
    assert_eq!(tt.cpu().prev, CpuId(1));
    assert_eq!(tt.cpu().next, CpuId(3));
    assert_eq!(tt.command().prev, tt.command().next);
    assert_eq!(bank.lookup(tt.command().next).as_deref(), Some("x"));
    assert_eq!(tt.priority().prev, Priority(10));
    assert_eq!(tt.priority().next, Priority(10));
    assert_eq!(tt.cpu_policies(), ConflictPolicies::both(ConflictPolicy::Assert));
    assert_eq!(tt.state_policies(), ConflictPolicies::both(ConflictPolicy::Assert));
}

#[test]
fn test_switch_preempted_and_blocked() {
    let (loader, bank) = loader(LoaderSet::Default);

    let tts = loader.thread_transitions(&switch(0)).unwrap();
    assert_eq!(tts.len(), 2);
    assert_eq!(tts[0].pid(), Pid(5));
    assert_eq!(tts[0].state().next, ThreadState::Running);
    assert_eq!(tts[0].cpu().prev, CpuId(2));
    assert_eq!(tts[0].cpu().next, CpuId(2));
    assert_eq!(bank.lookup(tts[0].command().prev).as_deref(), Some("a"));
    assert_eq!(tts[1].pid(), Pid(7));
    assert_eq!(tts[1].state().prev, ThreadState::Running);
    assert_eq!(tts[1].state().next, ThreadState::Waiting);
    assert_eq!(tts[1].cpu().prev, CpuId(2));
    assert_eq!(tts[1].cpu().next, CpuId(2));
    assert_eq!(bank.lookup(tts[1].command().prev).as_deref(), Some("b"));

    for prev_state in [1, 2, 64, 1024] {
        let blocked = loader.thread_transitions(&switch(prev_state)).unwrap();
        assert_eq!(blocked[1].state().next, ThreadState::Sleeping);
        assert_eq!(blocked[0], tts[0]);
        assert_eq!(blocked[1].cpu(), tts[1].cpu());
        assert_eq!(blocked[1].command(), tts[1].command());
        assert_eq!(blocked[1].priority(), tts[1].priority());
        assert_eq!(blocked[1].state().prev, tts[1].state().prev);
    }
}

#[test]
fn test_switch_transitions_share_placement() {
    let (loader, _) = loader(LoaderSet::Default);
    let tts = loader.thread_transitions(&switch(0)).unwrap();
    assert_eq!(tts[0].chronological_key(), tts[1].chronological_key());
    assert_eq!(tts[0].chronological_key(), (2_000, 20));
}

#[test]
fn test_wakeup_policies_are_relaxed() {
    let (loader, _) = loader(LoaderSet::Default);
    for name in ["sched_wakeup", "sched_wakeup_new"] {
        let ev = Event::new(4, 400, 0, name)
            .with_number("pid", 9)
            .with_number("target_cpu", 4);
        let tts = loader.thread_transitions(&ev).unwrap();
        assert_eq!(tts.len(), 1);
        let tt = &tts[0];
        assert_eq!(tt.pid(), Pid(9));
        assert_eq!(tt.cpu().prev, CpuId(4));
        assert_eq!(tt.cpu().next, CpuId(4));
        assert_eq!(tt.state().next, ThreadState::Waiting);
        assert_eq!(tt.cpu_policies().forwards, ConflictPolicy::Drop);
        assert_eq!(tt.cpu_policies().backwards, ConflictPolicy::Drop);
        assert_eq!(tt.state_policies().forwards, ConflictPolicy::Drop);
        assert_eq!(tt.state_policies().backwards, ConflictPolicy::Assert);
    }
}

#[test]
fn test_switch_only_inserts_synthetics() {
    let (loader, _) = loader(LoaderSet::SwitchOnly);
    let tts = loader.thread_transitions(&switch(1)).unwrap();
    assert_eq!(tts.len(), 2);
    for tt in &tts {
        assert_eq!(
            tt.cpu_policies(),
            ConflictPolicies::both(ConflictPolicy::InsertSynthetic)
        );
        assert_eq!(
            tt.state_policies(),
            ConflictPolicies::both(ConflictPolicy::InsertSynthetic)
        );
    }
    assert_eq!(tts[0].state().next, ThreadState::Running);
    assert_eq!(tts[1].state().next, ThreadState::Sleeping);
}

#[test]
fn test_missing_field_names_field_and_event() {
    let (loader, _) = loader(LoaderSet::Default);
    let ev = Event::new(99, 0, 0, "sched_switch")
        .with_number("next_pid", 5)
        .with_number("prev_pid", 7);
    let err = loader.thread_transitions(&ev).unwrap_err();
    assert_eq!(
        err,
        LoaderError::MissingField {
            field: "prev_state",
            event_index: 99
        }
    );
    assert_eq!(err.to_string(), "field 'prev_state' not found for event 99");
}

#[test]
fn test_empty_registry_is_a_configuration_error() {
    let result = EventLoader::new(Default::default(), Arc::new(StringBank::new()));
    assert!(matches!(result, Err(LoaderError::EmptyRegistry)));
}

#[test]
fn test_shared_loader_across_threads() {
    let (loader, bank) = loader(LoaderSet::Default);
    let loader = Arc::new(loader);

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let loader = Arc::clone(&loader);
            std::thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        let ev = Event::new(worker * 50 + i, i as i64, 0, "sched_wakeup")
                            .with_number("pid", i as i64)
                            .with_number("target_cpu", 0)
                            .with_text("comm", format!("comm-{}", i % 5));
                        loader.thread_transitions(&ev).unwrap().len()
                    })
                    .sum::<usize>()
            })
        })
        .collect();

    let total: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();
    assert_eq!(total, 200);
    assert_eq!(bank.len(), 5);
}
