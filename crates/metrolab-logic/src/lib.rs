//! Pure simulation logic for MetroLab.
//!
//! MetroLab walks a player through a five-stage quality investigation at a
//! juice factory: briefing, laboratory measurements, analysis against the
//! standards, and a final report. This crate holds the stage machine and the
//! checks behind it. It does no I/O, so the terminal client and the headless
//! harness drive exactly the same code.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`analysis`] | Findings, report figures, narrative/threshold conflicts |
//! | [`conformance`] | Volume, pH and seal threshold predicates |
//! | [`content`] | Copy text for every screen |
//! | [`controller`] | Session state, transitions, progress gate |
//! | [`measurement`] | Measurement kinds, readings, recorded results |
//! | [`source`] | Pluggable reading source (scripted case values) |
//! | [`stage`] | The five stages and their transition table |

pub mod analysis;
pub mod conformance;
pub mod content;
pub mod controller;
pub mod measurement;
pub mod source;
pub mod stage;
