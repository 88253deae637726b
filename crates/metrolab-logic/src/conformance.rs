//! Conformance checks against the juice standards.
//!
//! Pure threshold predicates over recorded values. Results are computed when a
//! screen is drawn and are never stored in the session state.
//!
//! | Check | Requirement | Source |
//! |-------|-------------|--------|
//! | Volume | 250 ± 5 ml, inclusive | GOST 32104-2013 |
//! | Acidity | pH 3.5–4.5, inclusive | GOST 32104-2013 |
//! | Seal | no leak | TR CU 021/2011 |

use serde::{Deserialize, Serialize};

use crate::measurement::{MeasurementKind, Measurements, SealIntegrity};

/// Declared package volume.
pub const VOLUME_NOMINAL_ML: f64 = 250.0;
/// Allowed deviation either side of the declared volume.
pub const VOLUME_TOLERANCE_ML: f64 = 5.0;
pub const VOLUME_MIN_ML: f64 = VOLUME_NOMINAL_ML - VOLUME_TOLERANCE_ML;
pub const VOLUME_MAX_ML: f64 = VOLUME_NOMINAL_ML + VOLUME_TOLERANCE_ML;

pub const PH_MIN: f64 = 3.5;
pub const PH_MAX: f64 = 4.5;

pub fn volume_conforms(volume_ml: f64) -> bool {
    (VOLUME_MIN_ML..=VOLUME_MAX_ML).contains(&volume_ml)
}

/// Underfill warning. Only the low side is flagged.
pub fn volume_below_minimum(volume_ml: f64) -> bool {
    volume_ml < VOLUME_MIN_ML
}

pub fn ph_conforms(ph: f64) -> bool {
    (PH_MIN..=PH_MAX).contains(&ph)
}

pub fn ph_too_acidic(ph: f64) -> bool {
    ph < PH_MIN
}

pub fn seal_conforms(seal: SealIntegrity) -> bool {
    seal == SealIntegrity::Sealed
}

pub fn seal_leaking(seal: SealIntegrity) -> bool {
    seal == SealIntegrity::Leaking
}

/// Badge state for one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Not measured yet.
    Pending,
    Conforming,
    NonConforming,
}

/// Warning line shown under a result badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// Volume under the lower limit.
    Underfilled,
    /// pH under the lower limit.
    TooAcidic,
    /// Seal check found a leak.
    LeakDetected,
}

impl Warning {
    pub fn message(self) -> &'static str {
        match self {
            Self::Underfilled => "Deviation from the norm",
            Self::TooAcidic => "Too acidic!",
            Self::LeakDetected => "Leak detected",
        }
    }
}

/// Verdict and optional warning for one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub kind: MeasurementKind,
    pub verdict: Verdict,
    pub warning: Option<Warning>,
}

/// Evaluate one check against the stored measurements.
pub fn assess(kind: MeasurementKind, m: &Measurements) -> Assessment {
    let (verdict, warning) = match kind {
        MeasurementKind::Volume => match m.volume_ml {
            None => (Verdict::Pending, None),
            Some(v) => (
                verdict_of(volume_conforms(v)),
                volume_below_minimum(v).then_some(Warning::Underfilled),
            ),
        },
        MeasurementKind::Ph => match m.ph {
            None => (Verdict::Pending, None),
            Some(ph) => (
                verdict_of(ph_conforms(ph)),
                ph_too_acidic(ph).then_some(Warning::TooAcidic),
            ),
        },
        MeasurementKind::Sealed => match m.seal {
            SealIntegrity::Unmeasured => (Verdict::Pending, None),
            seal => (
                verdict_of(seal_conforms(seal)),
                seal_leaking(seal).then_some(Warning::LeakDetected),
            ),
        },
    };
    Assessment {
        kind,
        verdict,
        warning,
    }
}

fn verdict_of(conforms: bool) -> Verdict {
    if conforms {
        Verdict::Conforming
    } else {
        Verdict::NonConforming
    }
}

/// Requirement line as printed next to each check.
pub fn requirement(kind: MeasurementKind) -> String {
    match kind {
        MeasurementKind::Volume => format!(
            "{VOLUME_NOMINAL_ML} ± {VOLUME_TOLERANCE_ML} ml ({VOLUME_MIN_ML}–{VOLUME_MAX_ML} ml)"
        ),
        MeasurementKind::Ph => format!("pH {PH_MIN}–{PH_MAX}"),
        MeasurementKind::Sealed => "Fully sealed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_window_inclusive() {
        assert!(volume_conforms(245.0));
        assert!(volume_conforms(255.0));
        assert!(volume_conforms(248.0));
        assert!(!volume_conforms(244.9));
        assert!(!volume_conforms(255.1));
    }

    #[test]
    fn test_underfill_only_below_minimum() {
        assert!(volume_below_minimum(244.0));
        assert!(!volume_below_minimum(245.0));
        assert!(!volume_below_minimum(248.0));
        // Overfill is non-conforming but not an underfill
        assert!(!volume_below_minimum(260.0));
        assert!(!volume_conforms(260.0));
    }

    #[test]
    fn test_ph_window_inclusive() {
        assert!(ph_conforms(3.5));
        assert!(ph_conforms(4.5));
        assert!(!ph_conforms(3.2));
        assert!(!ph_conforms(4.6));
    }

    #[test]
    fn test_too_acidic_exactly_below_min() {
        assert!(ph_too_acidic(3.2));
        assert!(ph_too_acidic(3.49));
        assert!(!ph_too_acidic(3.5));
        assert!(!ph_too_acidic(5.0));
    }

    #[test]
    fn test_seal_predicates() {
        assert!(seal_conforms(SealIntegrity::Sealed));
        assert!(!seal_conforms(SealIntegrity::Leaking));
        assert!(!seal_conforms(SealIntegrity::Unmeasured));
        assert!(seal_leaking(SealIntegrity::Leaking));
        assert!(!seal_leaking(SealIntegrity::Unmeasured));
    }

    #[test]
    fn test_assess_pending_when_unmeasured() {
        let m = Measurements::default();
        for kind in MeasurementKind::ALL {
            let a = assess(kind, &m);
            assert_eq!(a.verdict, Verdict::Pending);
            assert!(a.warning.is_none());
        }
    }

    #[test]
    fn test_assess_case_values() {
        let m = Measurements {
            volume_ml: Some(248.0),
            ph: Some(3.2),
            seal: SealIntegrity::Leaking,
        };
        let vol = assess(MeasurementKind::Volume, &m);
        assert_eq!(vol.verdict, Verdict::Conforming);
        assert_eq!(vol.warning, None);

        let ph = assess(MeasurementKind::Ph, &m);
        assert_eq!(ph.verdict, Verdict::NonConforming);
        assert_eq!(ph.warning, Some(Warning::TooAcidic));

        let seal = assess(MeasurementKind::Sealed, &m);
        assert_eq!(seal.verdict, Verdict::NonConforming);
        assert_eq!(seal.warning, Some(Warning::LeakDetected));
    }

    #[test]
    fn test_requirement_lines() {
        assert_eq!(requirement(MeasurementKind::Volume), "250 ± 5 ml (245–255 ml)");
        assert_eq!(requirement(MeasurementKind::Ph), "pH 3.5–4.5");
    }
}
