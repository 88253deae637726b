//! Session state and the controller that owns it.
//!
//! [`SimulationController`] is the only writer of [`SimulationState`]. The
//! presentation layer reads the state through [`SimulationController::state`]
//! and changes it through the transition operations, each of which runs to
//! completion before returning.
//!
//! ```
//! use metrolab_logic::controller::SimulationController;
//! use metrolab_logic::measurement::MeasurementKind;
//! use metrolab_logic::stage::Stage;
//!
//! let mut sim = SimulationController::new();
//! sim.advance(Stage::Mission).unwrap();
//! sim.advance(Stage::Laboratory).unwrap();
//! sim.record(MeasurementKind::Volume).unwrap();
//! assert_eq!(sim.state().progress_display(), 33);
//! assert!(sim.advance(Stage::Analysis).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::measurement::{MeasurementKind, Measurements, Reading, SealIntegrity};
use crate::source::{FixedSource, MeasurementSource};
use crate::stage::Stage;

/// Everything one session holds. `Default` is the initial state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationState {
    pub stage: Stage,
    pub measurements: Measurements,
    /// Share of checks recorded, 0.0..=100.0, full precision.
    pub progress: f64,
}

impl SimulationState {
    /// Progress rounded to a whole percent, for display only.
    pub fn progress_display(&self) -> u32 {
        self.progress.round() as u32
    }
}

/// Percentage of the three checks that have a recorded value.
pub fn progress_percent(m: &Measurements) -> f64 {
    (m.recorded_count() as f64 / MeasurementKind::ALL.len() as f64) * 100.0
}

/// A stage change the machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransitionError {
    #[error("cannot go from {from} to {to}")]
    OutOfSequence { from: Stage, to: Stage },
    #[error("laboratory work incomplete ({progress:.0}% measured)")]
    LaboratoryIncomplete { progress: f64 },
    #[error("a session can only be restarted from the report (currently at {stage})")]
    ResetOutsideReport { stage: Stage },
}

/// A measurement request the controller refused.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MeasurementError {
    #[error("measurements are taken in the laboratory (currently at {stage})")]
    NotInLaboratory { stage: Stage },
    #[error("source returned a {got} reading for a {requested} request")]
    SourceMismatch {
        requested: MeasurementKind,
        got: MeasurementKind,
    },
    #[error("source returned an empty {0} reading")]
    EmptyReading(MeasurementKind),
}

/// Drives one session: stage transitions, readings, progress.
#[derive(Debug, Clone)]
pub struct SimulationController<S = FixedSource> {
    state: SimulationState,
    source: S,
}

impl SimulationController<FixedSource> {
    /// A fresh session using the scripted case readings.
    pub fn new() -> Self {
        Self::with_source(FixedSource)
    }
}

impl Default for SimulationController<FixedSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MeasurementSource> SimulationController<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            state: SimulationState::default(),
            source,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether the forward edge out of the current stage is open right now.
    pub fn can_advance(&self) -> bool {
        self.check_transition(self.state.stage.next()).is_ok()
    }

    /// Move to `target` if the stage machine allows it.
    ///
    /// `Report → Intro` is the restart edge and clears the session.
    pub fn advance(&mut self, target: Stage) -> Result<Stage, TransitionError> {
        if let Err(e) = self.check_transition(target) {
            log::warn!("rejected transition {} -> {}: {}", self.state.stage, target, e);
            return Err(e);
        }
        if self.state.stage == Stage::Report {
            self.state = SimulationState::default();
            log::info!("session restarted");
        } else {
            log::debug!("stage {} -> {}", self.state.stage, target);
            self.state.stage = target;
        }
        Ok(self.state.stage)
    }

    /// Advance along the fixed sequence.
    pub fn advance_next(&mut self) -> Result<Stage, TransitionError> {
        self.advance(self.state.stage.next())
    }

    /// Restart from the report: stage, readings and progress back to initial.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        if self.state.stage != Stage::Report {
            let e = TransitionError::ResetOutsideReport {
                stage: self.state.stage,
            };
            log::warn!("rejected reset: {}", e);
            return Err(e);
        }
        self.advance(Stage::Intro).map(|_| ())
    }

    /// Take a reading from the source and store it.
    ///
    /// Repeating a kind overwrites the earlier value.
    pub fn record(&mut self, kind: MeasurementKind) -> Result<Reading, MeasurementError> {
        if self.state.stage != Stage::Laboratory {
            let e = MeasurementError::NotInLaboratory {
                stage: self.state.stage,
            };
            log::warn!("rejected {} measurement: {}", kind, e);
            return Err(e);
        }

        let reading = self.source.read(kind);
        if reading.kind() != kind {
            return Err(MeasurementError::SourceMismatch {
                requested: kind,
                got: reading.kind(),
            });
        }
        if reading == Reading::Seal(SealIntegrity::Unmeasured) {
            return Err(MeasurementError::EmptyReading(kind));
        }

        self.state.measurements.apply(reading);
        self.state.progress = progress_percent(&self.state.measurements);
        log::debug!(
            "recorded {} = {} (progress {:.2}%)",
            kind,
            reading,
            self.state.progress
        );
        Ok(reading)
    }

    /// Whether the bench offers `kind` yet. The seal check opens once volume
    /// and acidity are both recorded. `record` itself does not enforce this.
    pub fn is_unlocked(&self, kind: MeasurementKind) -> bool {
        let m = &self.state.measurements;
        match kind {
            MeasurementKind::Volume | MeasurementKind::Ph => true,
            MeasurementKind::Sealed => {
                m.is_recorded(MeasurementKind::Volume) && m.is_recorded(MeasurementKind::Ph)
            }
        }
    }

    fn check_transition(&self, target: Stage) -> Result<(), TransitionError> {
        let from = self.state.stage;
        if !from.allows(target) {
            return Err(TransitionError::OutOfSequence { from, to: target });
        }
        if from == Stage::Laboratory && !self.state.measurements.is_complete() {
            return Err(TransitionError::LaboratoryIncomplete {
                progress: self.state.progress,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_laboratory() -> SimulationController {
        let mut sim = SimulationController::new();
        sim.advance(Stage::Mission).unwrap();
        sim.advance(Stage::Laboratory).unwrap();
        sim
    }

    fn at_report() -> SimulationController {
        let mut sim = at_laboratory();
        for kind in MeasurementKind::ALL {
            sim.record(kind).unwrap();
        }
        sim.advance(Stage::Analysis).unwrap();
        sim.advance(Stage::Report).unwrap();
        sim
    }

    #[test]
    fn test_initial_state() {
        let sim = SimulationController::new();
        let s = sim.state();
        assert_eq!(s.stage, Stage::Intro);
        assert_eq!(s.measurements, Measurements::default());
        assert_eq!(s.progress, 0.0);
        assert_eq!(*s, SimulationState::default());
    }

    #[test]
    fn test_progress_percent_steps() {
        let mut m = Measurements::default();
        assert_eq!(progress_percent(&m), 0.0);
        m.apply(Reading::Ph(3.2));
        assert_eq!(progress_percent(&m), 1.0 / 3.0 * 100.0);
        m.apply(Reading::Seal(SealIntegrity::Leaking));
        assert_eq!(progress_percent(&m), 2.0 / 3.0 * 100.0);
        m.apply(Reading::Volume(248.0));
        assert_eq!(progress_percent(&m), 100.0);
    }

    #[test]
    fn test_record_sets_literals() {
        let mut sim = at_laboratory();
        assert_eq!(sim.record(MeasurementKind::Volume), Ok(Reading::Volume(248.0)));
        assert_eq!(sim.record(MeasurementKind::Ph), Ok(Reading::Ph(3.2)));
        assert_eq!(
            sim.record(MeasurementKind::Sealed),
            Ok(Reading::Seal(SealIntegrity::Leaking))
        );
        let m = sim.state().measurements;
        assert_eq!(m.volume_ml, Some(248.0));
        assert_eq!(m.ph, Some(3.2));
        assert_eq!(m.seal, SealIntegrity::Leaking);
        assert_eq!(sim.state().progress, 100.0);
    }

    #[test]
    fn test_rerecord_does_not_accumulate() {
        let mut sim = at_laboratory();
        sim.record(MeasurementKind::Volume).unwrap();
        let before = *sim.state();
        sim.record(MeasurementKind::Volume).unwrap();
        assert_eq!(*sim.state(), before);
        assert_eq!(sim.state().progress_display(), 33);
    }

    #[test]
    fn test_record_outside_laboratory_rejected() {
        let mut sim = SimulationController::new();
        assert_eq!(
            sim.record(MeasurementKind::Volume),
            Err(MeasurementError::NotInLaboratory {
                stage: Stage::Intro
            })
        );
        assert_eq!(*sim.state(), SimulationState::default());
    }

    #[test]
    fn test_out_of_sequence_rejected() {
        let mut sim = SimulationController::new();
        let err = sim.advance(Stage::Laboratory).unwrap_err();
        assert_eq!(
            err,
            TransitionError::OutOfSequence {
                from: Stage::Intro,
                to: Stage::Laboratory
            }
        );
        assert_eq!(sim.stage(), Stage::Intro);
        assert!(sim.advance(Stage::Intro).is_err());
        assert!(sim.advance(Stage::Report).is_err());
    }

    #[test]
    fn test_laboratory_gate() {
        let mut sim = at_laboratory();
        assert!(!sim.can_advance());
        sim.record(MeasurementKind::Volume).unwrap();
        sim.record(MeasurementKind::Ph).unwrap();
        match sim.advance(Stage::Analysis) {
            Err(TransitionError::LaboratoryIncomplete { progress }) => {
                assert!(progress < 100.0);
            }
            other => panic!("expected gate rejection, got {:?}", other),
        }
        assert_eq!(sim.stage(), Stage::Laboratory);

        sim.record(MeasurementKind::Sealed).unwrap();
        assert!(sim.can_advance());
        assert_eq!(sim.advance(Stage::Analysis), Ok(Stage::Analysis));
    }

    #[test]
    fn test_seal_unlocks_after_volume_and_ph() {
        let mut sim = at_laboratory();
        assert!(sim.is_unlocked(MeasurementKind::Volume));
        assert!(sim.is_unlocked(MeasurementKind::Ph));
        assert!(!sim.is_unlocked(MeasurementKind::Sealed));
        sim.record(MeasurementKind::Volume).unwrap();
        assert!(!sim.is_unlocked(MeasurementKind::Sealed));
        sim.record(MeasurementKind::Ph).unwrap();
        assert!(sim.is_unlocked(MeasurementKind::Sealed));
    }

    #[test]
    fn test_seal_record_not_blocked_by_lock() {
        let mut sim = at_laboratory();
        assert!(sim.record(MeasurementKind::Sealed).is_ok());
        assert_eq!(sim.state().progress_display(), 33);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut sim = at_report();
        assert_eq!(sim.stage(), Stage::Report);
        sim.reset().unwrap();
        assert_eq!(*sim.state(), SimulationState::default());
    }

    #[test]
    fn test_advance_from_report_is_reset() {
        let mut sim = at_report();
        assert_eq!(sim.advance_next(), Ok(Stage::Intro));
        assert_eq!(*sim.state(), SimulationState::default());
    }

    #[test]
    fn test_reset_outside_report_rejected() {
        let mut sim = at_laboratory();
        sim.record(MeasurementKind::Volume).unwrap();
        let before = *sim.state();
        assert_eq!(
            sim.reset(),
            Err(TransitionError::ResetOutsideReport {
                stage: Stage::Laboratory
            })
        );
        assert_eq!(*sim.state(), before);
    }

    struct SwappedSource;

    impl MeasurementSource for SwappedSource {
        fn read(&mut self, _kind: MeasurementKind) -> Reading {
            Reading::Ph(7.0)
        }
    }

    #[test]
    fn test_source_mismatch_not_stored() {
        let mut sim = SimulationController::with_source(SwappedSource);
        sim.advance_next().unwrap();
        sim.advance_next().unwrap();
        assert_eq!(
            sim.record(MeasurementKind::Volume),
            Err(MeasurementError::SourceMismatch {
                requested: MeasurementKind::Volume,
                got: MeasurementKind::Ph
            })
        );
        assert_eq!(sim.state().measurements, Measurements::default());
        assert_eq!(sim.state().progress, 0.0);
    }

    #[test]
    fn test_state_serializes() {
        let sim = at_report();
        let json = serde_json::to_string(sim.state()).unwrap();
        assert!(json.contains("\"stage\":\"Report\""));
        assert!(json.contains("\"seal\":\"Leaking\""));
    }
}
