//! # Run Summary
//!
//! Aggregate counts for one harness run and the process-level success
//! signal derived from them. The summary is an explicit value threaded
//! through the orchestrator; there is no global accumulator.

use serde::Serialize;

/// Process exit status of a harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    /// Every case matched its expected outcome.
    Success,
    /// At least one case failed.
    CasesFailed,
    /// A manifest or closure error aborted the run before validation.
    ConfigurationError,
}

impl ExitStatus {
    /// Numeric process exit code: 0, 1, or 2.
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::CasesFailed => 1,
            Self::ConfigurationError => 2,
        }
    }
}

/// Total and failed case counts across all schemas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Number of cases attempted.
    pub total: usize,
    /// Number of cases whose outcome contradicted their label.
    pub failed: usize,
}

impl RunSummary {
    /// Count one case.
    pub fn record(&mut self, passed: bool) {
        self.total += 1;
        if !passed {
            self.failed += 1;
        }
    }

    /// Fold another summary into this one.
    pub fn absorb(&mut self, other: RunSummary) {
        self.total += other.total;
        self.failed += other.failed;
    }

    /// Number of cases that matched their label.
    pub fn passed(&self) -> usize {
        self.total - self.failed
    }

    /// True if no case failed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Exit status for a run that reached validation.
    pub fn exit_status(&self) -> ExitStatus {
        if self.all_passed() {
            ExitStatus::Success
        } else {
            ExitStatus::CasesFailed
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Summary: {} example(s) validated, {} failed.",
            self.total, self.failed
        )
    }
}
