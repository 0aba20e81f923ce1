//! Integration tests for the restart coordinator

use osprefs::config::default_restart_set;
use osprefs::process::{ProcessTerminator, RestartCoordinator};
use osprefs::{PrefsResult, RestartSet, RunOptions, TerminateOutcome};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Signals {
    running: Vec<&'static str>,
    sent: Mutex<Vec<String>>,
}

impl ProcessTerminator for Signals {
    fn terminate(&self, app: &str) -> PrefsResult<bool> {
        self.sent.lock().unwrap().push(app.to_string());
        Ok(self.running.contains(&app))
    }
}

#[test]
fn test_skip_restart_signals_nothing() {
    let coordinator = RestartCoordinator::new(Signals::default());
    let options = RunOptions {
        skip_restart: true,
        ..RunOptions::default()
    };

    assert!(coordinator
        .restart_if_requested(&options, &default_restart_set())
        .is_none());
    assert!(coordinator.terminator().sent.lock().unwrap().is_empty());
}

#[test]
fn test_every_app_signalled_exactly_once() {
    let coordinator = RestartCoordinator::new(Signals::default());
    let set = default_restart_set();
    coordinator
        .restart_if_requested(&RunOptions::default(), &set)
        .unwrap();

    let sent = coordinator.terminator().sent.lock().unwrap().clone();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for app in &sent {
        *counts.entry(app.as_str()).or_default() += 1;
    }

    assert_eq!(sent.len(), set.len());
    assert!(set.iter().all(|app| counts.get(app) == Some(&1)));
    assert_eq!(sent, set.iter().map(String::from).collect::<Vec<_>>());
}

#[test]
fn test_absent_processes_are_not_errors() {
    let coordinator = RestartCoordinator::new(Signals {
        running: vec!["Finder"],
        ..Signals::default()
    });
    let set = RestartSet::new(["Dock", "Finder"]);
    let report = coordinator
        .restart_if_requested(&RunOptions::default(), &set)
        .unwrap();

    assert_eq!(
        report.outcomes,
        vec![
            ("Dock".to_string(), TerminateOutcome::NotRunning),
            ("Finder".to_string(), TerminateOutcome::Terminated),
        ]
    );
    assert_eq!(report.failures().count(), 0);
}
