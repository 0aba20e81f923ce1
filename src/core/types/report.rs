//! Result types produced by each phase of a run

use super::{PrivilegeState, SettingId};
use serde::{Deserialize, Serialize};

/// A setting the store refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingFailure {
    pub id: SettingId,
    pub reason: String,
}

/// Summary of the apply phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Settings handed to the store
    pub attempted: usize,
    /// Settings the store accepted
    pub applied: usize,
    /// Settings not attempted for lack of privilege
    pub skipped: Vec<SettingId>,
    pub failed: Vec<SettingFailure>,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_applied(&mut self) {
        self.attempted += 1;
        self.applied += 1;
    }

    pub fn record_skipped(&mut self, id: SettingId) {
        self.skipped.push(id);
    }

    pub fn record_failed(&mut self, id: SettingId, reason: impl Into<String>) {
        self.attempted += 1;
        self.failed.push(SettingFailure {
            id,
            reason: reason.into(),
        });
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of signalling one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum TerminateOutcome {
    Terminated,
    NotRunning,
    Failed(String),
}

/// Summary of the restart phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartReport {
    pub outcomes: Vec<(String, TerminateOutcome)>,
}

impl RestartReport {
    pub fn record(&mut self, app: impl Into<String>, outcome: TerminateOutcome) {
        self.outcomes.push((app.into(), outcome));
    }

    pub fn terminated(&self) -> usize {
        self.count(|o| matches!(o, TerminateOutcome::Terminated))
    }

    pub fn not_running(&self) -> usize {
        self.count(|o| matches!(o, TerminateOutcome::NotRunning))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(app, outcome)| match outcome {
            TerminateOutcome::Failed(reason) => Some((app.as_str(), reason.as_str())),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&TerminateOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Everything a completed run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub privilege: PrivilegeState,
    pub apply: ApplyResult,
    /// `None` when the restart phase was skipped
    pub restart: Option<RestartReport>,
}

impl RunReport {
    /// One-line human summary printed when the run completes
    pub fn summary_line(&self) -> String {
        format!(
            "Done. {} applied, {} skipped, {} failed. Some changes require a logout/restart to take effect.",
            self.apply.applied,
            self.apply.skipped_count(),
            self.apply.failed_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(key: &str) -> SettingId {
        SettingId {
            domain: "com.apple.dock".to_string(),
            key: key.to_string(),
        }
    }

    #[test]
    fn test_apply_result_counts() {
        let mut result = ApplyResult::new();
        result.record_applied();
        result.record_applied();
        result.record_failed(id("bogus"), "exit status 1");
        result.record_skipped(id("gated"));

        assert_eq!(result.attempted, 3);
        assert_eq!(result.applied, 2);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.skipped_count(), 1);
        assert!(!result.is_clean());
        assert_eq!(result.failed[0].id.key, "bogus");
    }

    #[test]
    fn test_restart_report_counts() {
        let mut report = RestartReport::default();
        report.record("Dock", TerminateOutcome::Terminated);
        report.record("Finder", TerminateOutcome::NotRunning);
        report.record("cfprefsd", TerminateOutcome::Failed("denied".to_string()));

        assert_eq!(report.terminated(), 1);
        assert_eq!(report.not_running(), 1);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures, vec![("cfprefsd", "denied")]);
    }

    #[test]
    fn test_summary_line() {
        let mut apply = ApplyResult::new();
        apply.record_applied();
        apply.record_skipped(id("gated"));
        let report = RunReport {
            privilege: PrivilegeState::NotElevated,
            apply,
            restart: None,
        };

        assert!(report
            .summary_line()
            .starts_with("Done. 1 applied, 1 skipped, 0 failed."));
    }

    #[test]
    fn test_run_report_json() {
        let report = RunReport {
            privilege: PrivilegeState::Elevated,
            apply: ApplyResult::new(),
            restart: Some(RestartReport::default()),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"privilege\":\"elevated\""));
    }
}
