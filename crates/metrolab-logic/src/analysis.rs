//! Analysis and report figures derived from a session.
//!
//! Two independent views of the same results live side by side: the
//! conformance checks in [`crate::conformance`] and the narrative findings in
//! [`crate::content`]. They are not reconciled here. Where they disagree the
//! disagreement is reported as a [`NarrativeConflict`].

use serde::{Deserialize, Serialize};

use crate::conformance::{self, Assessment, Verdict};
use crate::content;
use crate::controller::SimulationState;
use crate::measurement::{MeasurementKind, Measurements};

/// Conformance assessment of every check, in bench order.
pub fn findings(m: &Measurements) -> Vec<Assessment> {
    MeasurementKind::ALL
        .iter()
        .map(|&kind| conformance::assess(kind, m))
        .collect()
}

/// Headline numbers for the report screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub measurements_taken: usize,
    /// Checks whose conformance verdict is a failure.
    pub deviations_detected: usize,
    pub corrective_actions: usize,
    pub standards_referenced: usize,
}

impl ReportSummary {
    pub fn from_state(state: &SimulationState) -> Self {
        let m = &state.measurements;
        Self {
            measurements_taken: m.recorded_count(),
            deviations_detected: findings(m)
                .iter()
                .filter(|a| a.verdict == Verdict::NonConforming)
                .count(),
            corrective_actions: content::CORRECTIVE_ACTIONS.len(),
            standards_referenced: content::STANDARDS.len(),
        }
    }
}

/// A narrative finding that contradicts the conformance check for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeConflict {
    pub kind: MeasurementKind,
    /// What the narrative text says.
    pub narrative_claims_deviation: bool,
    /// What the threshold check says.
    pub verdict: Verdict,
}

impl std::fmt::Display for NarrativeConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let said = if self.narrative_claims_deviation {
            "a deviation"
        } else {
            "no deviation"
        };
        let checked = match self.verdict {
            Verdict::Conforming => "conforms",
            Verdict::NonConforming => "does not conform",
            Verdict::Pending => "is not measured",
        };
        write!(
            f,
            "{}: narrative reports {}, but the measured value {}",
            self.kind, said, checked
        )
    }
}

/// Every recorded check where the narrative and the threshold check disagree.
///
/// Unmeasured checks are skipped.
pub fn narrative_conflicts(m: &Measurements) -> Vec<NarrativeConflict> {
    findings(m)
        .into_iter()
        .filter(|a| a.verdict != Verdict::Pending)
        .filter_map(|a| {
            let claims = content::finding(a.kind).claims_deviation;
            let fails = a.verdict == Verdict::NonConforming;
            (claims != fails).then_some(NarrativeConflict {
                kind: a.kind,
                narrative_claims_deviation: claims,
                verdict: a.verdict,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::SealIntegrity;

    fn case_measurements() -> Measurements {
        Measurements {
            volume_ml: Some(248.0),
            ph: Some(3.2),
            seal: SealIntegrity::Leaking,
        }
    }

    #[test]
    fn test_findings_in_bench_order() {
        let f = findings(&case_measurements());
        let kinds: Vec<_> = f.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, MeasurementKind::ALL.to_vec());
    }

    #[test]
    fn test_summary_counts_predicate_deviations() {
        let state = SimulationState {
            measurements: case_measurements(),
            progress: 100.0,
            ..SimulationState::default()
        };
        let s = ReportSummary::from_state(&state);
        assert_eq!(s.measurements_taken, 3);
        // 248 ml is inside the window, so only pH and seal fail
        assert_eq!(s.deviations_detected, 2);
        assert_eq!(s.corrective_actions, 3);
        assert_eq!(s.standards_referenced, 2);
    }

    #[test]
    fn test_volume_conflict_flagged() {
        let conflicts = narrative_conflicts(&case_measurements());
        assert_eq!(
            conflicts,
            vec![NarrativeConflict {
                kind: MeasurementKind::Volume,
                narrative_claims_deviation: true,
                verdict: Verdict::Conforming,
            }]
        );
        assert!(conflicts[0].to_string().contains("conforms"));
    }

    #[test]
    fn test_no_conflict_when_underfilled() {
        let m = Measurements {
            volume_ml: Some(243.0),
            ..case_measurements()
        };
        assert!(narrative_conflicts(&m).is_empty());
    }

    #[test]
    fn test_unmeasured_not_conflicting() {
        assert!(narrative_conflicts(&Measurements::default()).is_empty());
    }
}
