//! Copy text for the five screens of the juice-factory case.
//!
//! Static data only. Renderers decide layout; [`crate::analysis`] compares the
//! narrative findings here with the conformance checks.

use crate::measurement::MeasurementKind;

// ============================================================================
// INTRO
// ============================================================================

pub const TITLE: &str = "The World of Metrology and Quality";
pub const TAGLINE: &str =
    "An interactive simulator for learning metrology, standardization and quality management";

/// One tile on the intro screen.
#[derive(Debug, Clone, Copy)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 3] = [
    Feature {
        title: "Research",
        description: "Take measurements",
    },
    Feature {
        title: "Analysis",
        description: "Compare against GOST standards",
    },
    Feature {
        title: "Decision",
        description: "Propose improvements",
    },
];

pub const SESSION_FACTS: [&str; 3] = [
    "Team game: 3-5 players",
    "Duration: 45-90 minutes",
    "For students in grades 8-11",
];

// ============================================================================
// MISSION
// ============================================================================

pub const MISSION_NUMBER: u32 = 1;
pub const CASE_TITLE: &str = "The Sour Juice Mystery";
pub const CASE_SUBTITLE: &str = "An investigation at the juice factory";

pub const COMPLAINTS: [&str; 3] = [
    "The juice is too sour and does not taste right",
    "The packaging leaks during transport",
    "The volume does not match the label",
];

/// A normative document the case is judged against.
#[derive(Debug, Clone, Copy)]
pub struct Standard {
    pub code: &'static str,
    pub title: &'static str,
}

pub const STANDARDS: [Standard; 2] = [
    Standard {
        code: "GOST 32104-2013",
        title: "Fruit juices. General specifications",
    },
    Standard {
        code: "TR CU 021/2011",
        title: "On the safety of food products",
    },
];

pub const TASK: &str = "Carry out laboratory measurements of product samples, identify \
    nonconformities with the standards and propose corrective actions to improve quality.";

// ============================================================================
// LABORATORY
// ============================================================================

/// Bench instructions for one check.
#[derive(Debug, Clone, Copy)]
pub struct LabStep {
    pub title: &'static str,
    pub instructions: &'static str,
}

pub fn lab_step(kind: MeasurementKind) -> LabStep {
    match kind {
        MeasurementKind::Volume => LabStep {
            title: "Volume measurement",
            instructions: "Use a measuring cylinder and scales to find the real volume of juice \
                in the package. Compare it with the volume on the label (250 ml).",
        },
        MeasurementKind::Ph => LabStep {
            title: "Acidity (pH) test",
            instructions: "Use a pH meter or indicator strips to find the acidity level. \
                Orange juice should have a pH between 3.5 and 4.5.",
        },
        MeasurementKind::Sealed => LabStep {
            title: "Seal integrity check",
            instructions: "Check the package under pressure and in water. The package must \
                stay sealed under normal transport conditions.",
        },
    }
}

// ============================================================================
// ANALYSIS
// ============================================================================

/// A finding as the analysis screen narrates it.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeFinding {
    pub kind: MeasurementKind,
    pub title: &'static str,
    pub text: &'static str,
    /// Whether the text reports this check as a deviation.
    pub claims_deviation: bool,
}

pub static FINDINGS: [NarrativeFinding; 3] = [
    NarrativeFinding {
        kind: MeasurementKind::Volume,
        title: "Underfilled product",
        text: "Volume is 2 ml below the minimum allowed by GOST 32104-2013",
        claims_deviation: true,
    },
    NarrativeFinding {
        kind: MeasurementKind::Ph,
        title: "Excess acidity",
        text: "pH 3.2 is below the norm (3.5-4.5); taste properties are affected",
        claims_deviation: true,
    },
    NarrativeFinding {
        kind: MeasurementKind::Sealed,
        title: "Packaging defect",
        text: "Seal is broken; does not comply with TR CU 021/2011",
        claims_deviation: true,
    },
];

/// A recommended corrective action.
#[derive(Debug, Clone, Copy)]
pub struct CorrectiveAction {
    pub title: &'static str,
    pub description: &'static str,
}

pub const CORRECTIVE_ACTIONS: [CorrectiveAction; 3] = [
    CorrectiveAction {
        title: "Calibrate the dispensers",
        description: "Verify and adjust the filling equipment",
    },
    CorrectiveAction {
        title: "Adjust the recipe",
        description: "Review the acid balance of the juice",
    },
    CorrectiveAction {
        title: "Replace the packaging supplier",
        description: "Audit the quality of packaging materials",
    },
];

// ============================================================================
// REPORT
// ============================================================================

pub const REPORT_HEADLINE: &str = "Mission complete!";
pub const REPORT_SUBHEAD: &str =
    "You carried out the investigation and found the causes of the nonconformities";

pub const SKILLS: [&str; 4] = [
    "Taking laboratory measurements",
    "Working with normative documents (GOST)",
    "Analysing product conformity with standards",
    "Developing corrective actions",
];

/// Narrative finding for `kind`.
pub fn finding(kind: MeasurementKind) -> &'static NarrativeFinding {
    match kind {
        MeasurementKind::Volume => &FINDINGS[0],
        MeasurementKind::Ph => &FINDINGS[1],
        MeasurementKind::Sealed => &FINDINGS[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_finding_per_kind() {
        for kind in MeasurementKind::ALL {
            assert_eq!(finding(kind).kind, kind);
        }
    }

    #[test]
    fn test_volume_narrative_claims_underfill() {
        let f = finding(MeasurementKind::Volume);
        assert!(f.claims_deviation);
        assert!(f.text.contains("2 ml below the minimum"));
    }

    #[test]
    fn test_lab_steps_present() {
        for kind in MeasurementKind::ALL {
            let step = lab_step(kind);
            assert!(!step.title.is_empty());
            assert!(!step.instructions.is_empty());
        }
    }
}
