//! Where readings come from.
//!
//! The controller never invents values itself; it asks a [`MeasurementSource`].
//! [`FixedSource`] returns the scripted outcomes of the juice-factory case.
//! Swapping in another source changes the readings without touching the
//! stage machine or the conformance checks.

use crate::measurement::{MeasurementKind, Reading, SealIntegrity};

/// Scripted fill volume of the sampled package.
pub const FIXED_VOLUME_ML: f64 = 248.0;
/// Scripted acidity of the sampled juice.
pub const FIXED_PH: f64 = 3.2;
/// Scripted seal check outcome.
pub const FIXED_SEAL: SealIntegrity = SealIntegrity::Leaking;

/// Produces a reading for a requested measurement kind.
///
/// Implementations must return a [`Reading`] tagged with the requested kind;
/// the controller rejects anything else.
pub trait MeasurementSource {
    fn read(&mut self, kind: MeasurementKind) -> Reading;
}

/// The case script: the same three outcomes every session.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSource;

impl MeasurementSource for FixedSource {
    fn read(&mut self, kind: MeasurementKind) -> Reading {
        match kind {
            MeasurementKind::Volume => Reading::Volume(FIXED_VOLUME_ML),
            MeasurementKind::Ph => Reading::Ph(FIXED_PH),
            MeasurementKind::Sealed => Reading::Seal(FIXED_SEAL),
        }
    }
}

impl<S: MeasurementSource + ?Sized> MeasurementSource for &mut S {
    fn read(&mut self, kind: MeasurementKind) -> Reading {
        (**self).read(kind)
    }
}
