//! Session stages and the transition table between them.
//!
//! A session walks a fixed five-stage sequence:
//!
//! ```text
//! Intro → Mission → Laboratory → Analysis → Report → (reset) → Intro
//! ```
//!
//! Every edge not in that sequence is rejected. The only conditional edge,
//! Laboratory → Analysis, is gated by the controller on measurement progress.

use serde::{Deserialize, Serialize};

/// One of the five mutually exclusive phases of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Stage {
    /// Title screen with the game overview.
    #[default]
    Intro = 0,
    /// Mission briefing: complaints, standards, task.
    Mission = 1,
    /// Measurement bench; the only stage where readings are taken.
    Laboratory = 2,
    /// Results compared against the standards.
    Analysis = 3,
    /// Final report; the session can be restarted from here.
    Report = 4,
}

impl Stage {
    /// All stages in sequence order.
    pub const ALL: [Stage; 5] = [
        Self::Intro,
        Self::Mission,
        Self::Laboratory,
        Self::Analysis,
        Self::Report,
    ];

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Self::Intro),
            1 => Some(Self::Mission),
            2 => Some(Self::Laboratory),
            3 => Some(Self::Analysis),
            4 => Some(Self::Report),
            _ => None,
        }
    }

    /// Forward successor. `Report` wraps to `Intro` (the reset edge).
    pub fn next(self) -> Self {
        match self {
            Self::Intro => Self::Mission,
            Self::Mission => Self::Laboratory,
            Self::Laboratory => Self::Analysis,
            Self::Analysis => Self::Report,
            Self::Report => Self::Intro,
        }
    }

    /// Whether `self → target` is an edge of the stage machine.
    ///
    /// This is the static table only; the progress gate on
    /// Laboratory → Analysis is checked by the controller.
    pub fn allows(self, target: Stage) -> bool {
        self.next() == target
    }

    /// 1-based position in the sequence, for "step N of 5" displays.
    pub fn ordinal(self) -> u8 {
        self as u8 + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Intro => "Introduction",
            Self::Mission => "Mission Briefing",
            Self::Laboratory => "Laboratory",
            Self::Analysis => "Analysis",
            Self::Report => "Report",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_roundtrip() {
        for i in 0..5u8 {
            let stage = Stage::from_u8(i).unwrap();
            assert_eq!(stage as u8, i);
        }
        assert!(Stage::from_u8(5).is_none());
    }

    #[test]
    fn test_default_is_intro() {
        assert_eq!(Stage::default(), Stage::Intro);
    }

    #[test]
    fn test_next_follows_sequence() {
        for pair in Stage::ALL.windows(2) {
            assert_eq!(pair[0].next(), pair[1]);
        }
        assert_eq!(Stage::Report.next(), Stage::Intro);
    }

    #[test]
    fn test_allows_only_forward_edges() {
        let mut allowed = 0;
        for from in Stage::ALL {
            for to in Stage::ALL {
                if from.allows(to) {
                    allowed += 1;
                    assert_eq!(from.next(), to);
                }
            }
        }
        // One outgoing edge per stage
        assert_eq!(allowed, 5);
        assert!(!Stage::Intro.allows(Stage::Laboratory));
        assert!(!Stage::Analysis.allows(Stage::Laboratory));
        assert!(!Stage::Mission.allows(Stage::Mission));
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(Stage::Intro.ordinal(), 1);
        assert_eq!(Stage::Report.ordinal(), 5);
    }
}
