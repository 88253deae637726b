//! Measurement kinds, readings, and the per-session measurement record.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three checks a player runs in the laboratory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MeasurementKind {
    /// Fill volume of one package, in millilitres.
    Volume = 0,
    /// Acidity of the juice.
    Ph = 1,
    /// Package seal integrity under pressure and submersion.
    Sealed = 2,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 3] = [Self::Volume, Self::Ph, Self::Sealed];

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Self::Volume),
            1 => Some(Self::Ph),
            2 => Some(Self::Sealed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Volume => "Volume",
            Self::Ph => "Acidity",
            Self::Sealed => "Seal integrity",
        }
    }

    /// Display unit, empty for unitless checks.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Volume => "ml",
            Self::Ph => "pH",
            Self::Sealed => "",
        }
    }
}

impl std::fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown measurement name at a text boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown measurement kind `{0}` (expected volume, ph or seal)")]
pub struct ParseKindError(pub String);

impl FromStr for MeasurementKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "volume" | "vol" => Ok(Self::Volume),
            "ph" | "acidity" => Ok(Self::Ph),
            "seal" | "sealed" => Ok(Self::Sealed),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// Outcome of the seal check. `Unmeasured` is distinct from a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SealIntegrity {
    #[default]
    Unmeasured,
    Sealed,
    Leaking,
}

/// A single value produced by a measurement source, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Reading {
    Volume(f64),
    Ph(f64),
    Seal(SealIntegrity),
}

impl Reading {
    pub fn kind(&self) -> MeasurementKind {
        match self {
            Self::Volume(_) => MeasurementKind::Volume,
            Self::Ph(_) => MeasurementKind::Ph,
            Self::Seal(_) => MeasurementKind::Sealed,
        }
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Volume(ml) => write!(f, "{ml} ml"),
            Self::Ph(ph) => write!(f, "pH {ph}"),
            Self::Seal(SealIntegrity::Sealed) => f.write_str("sealed"),
            Self::Seal(SealIntegrity::Leaking) => f.write_str("leaking"),
            Self::Seal(SealIntegrity::Unmeasured) => f.write_str("not checked"),
        }
    }
}

/// Results recorded so far in one session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    pub volume_ml: Option<f64>,
    pub ph: Option<f64>,
    pub seal: SealIntegrity,
}

impl Measurements {
    pub fn is_recorded(&self, kind: MeasurementKind) -> bool {
        match kind {
            MeasurementKind::Volume => self.volume_ml.is_some(),
            MeasurementKind::Ph => self.ph.is_some(),
            MeasurementKind::Sealed => self.seal != SealIntegrity::Unmeasured,
        }
    }

    /// Number of kinds with a recorded value (0..=3).
    pub fn recorded_count(&self) -> usize {
        MeasurementKind::ALL
            .iter()
            .filter(|&&kind| self.is_recorded(kind))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.recorded_count() == MeasurementKind::ALL.len()
    }

    /// The stored reading for `kind`, if any.
    pub fn reading(&self, kind: MeasurementKind) -> Option<Reading> {
        match kind {
            MeasurementKind::Volume => self.volume_ml.map(Reading::Volume),
            MeasurementKind::Ph => self.ph.map(Reading::Ph),
            MeasurementKind::Sealed => match self.seal {
                SealIntegrity::Unmeasured => None,
                seal => Some(Reading::Seal(seal)),
            },
        }
    }

    /// Store a reading, overwriting any earlier value of the same kind.
    pub fn apply(&mut self, reading: Reading) {
        match reading {
            Reading::Volume(ml) => self.volume_ml = Some(ml),
            Reading::Ph(ph) => self.ph = Some(ph),
            Reading::Seal(seal) => self.seal = seal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for i in 0..3u8 {
            let kind = MeasurementKind::from_u8(i).unwrap();
            assert_eq!(kind as u8, i);
        }
        assert!(MeasurementKind::from_u8(3).is_none());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("volume".parse::<MeasurementKind>(), Ok(MeasurementKind::Volume));
        assert_eq!(" PH ".parse::<MeasurementKind>(), Ok(MeasurementKind::Ph));
        assert_eq!("seal".parse::<MeasurementKind>(), Ok(MeasurementKind::Sealed));
        assert_eq!("sealed".parse::<MeasurementKind>(), Ok(MeasurementKind::Sealed));
        let err = "weight".parse::<MeasurementKind>().unwrap_err();
        assert_eq!(err, ParseKindError("weight".into()));
    }

    #[test]
    fn test_empty_measurements() {
        let m = Measurements::default();
        assert_eq!(m.recorded_count(), 0);
        assert!(!m.is_complete());
        for kind in MeasurementKind::ALL {
            assert!(!m.is_recorded(kind));
            assert!(m.reading(kind).is_none());
        }
    }

    #[test]
    fn test_leaking_counts_as_recorded() {
        let mut m = Measurements::default();
        m.apply(Reading::Seal(SealIntegrity::Leaking));
        assert!(m.is_recorded(MeasurementKind::Sealed));
        assert_eq!(m.recorded_count(), 1);
    }

    #[test]
    fn test_apply_overwrites() {
        let mut m = Measurements::default();
        m.apply(Reading::Volume(248.0));
        m.apply(Reading::Volume(248.0));
        assert_eq!(m.volume_ml, Some(248.0));
        assert_eq!(m.recorded_count(), 1);
    }

    #[test]
    fn test_reading_kind_and_display() {
        assert_eq!(Reading::Ph(3.2).kind(), MeasurementKind::Ph);
        assert_eq!(Reading::Volume(248.0).to_string(), "248 ml");
        assert_eq!(Reading::Ph(3.2).to_string(), "pH 3.2");
        assert_eq!(Reading::Seal(SealIntegrity::Leaking).to_string(), "leaking");
    }
}
