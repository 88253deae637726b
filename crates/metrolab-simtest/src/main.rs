//! MetroLab Headless Simulation Harness
//!
//! Validates the stage machine, measurement progress and conformance checks
//! without a terminal front end. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p metrolab-simtest
//!   cargo run -p metrolab-simtest -- --verbose
//!   cargo run -p metrolab-simtest -- --json

use clap::Parser;
use metrolab_logic::analysis::{self, ReportSummary};
use metrolab_logic::conformance::{self, Verdict, Warning};
use metrolab_logic::controller::{SimulationController, SimulationState, TransitionError};
use metrolab_logic::measurement::{MeasurementKind, SealIntegrity};
use metrolab_logic::source::{FIXED_PH, FIXED_SEAL, FIXED_VOLUME_ML};
use metrolab_logic::stage::Stage;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "metrolab-simtest", about = "Headless checks for MetroLab logic")]
struct Args {
    /// Print every check, not only failures.
    #[arg(long, short)]
    verbose: bool,
    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,
    /// Log filter (overrides RUST_LOG).
    #[arg(long)]
    log: Option<String>,
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TestResult {
    section: &'static str,
    name: String,
    passed: bool,
    detail: String,
}

type Section = (&'static str, fn(bool) -> Vec<TestResult>);

const SECTIONS: [Section; 7] = [
    ("Stage Table", validate_stage_table),
    ("Progress", validate_progress),
    ("Conformance", validate_conformance),
    ("Analysis Gate", validate_gate),
    ("Reset", validate_reset),
    ("End-to-End Scenario", validate_scenario),
    ("Narrative vs Thresholds", validate_narrative),
];

fn main() {
    let args = Args::parse();
    init_logging(args.log.as_deref());

    if !args.json {
        println!("=== MetroLab Simulation Harness ===\n");
    }

    let mut results = Vec::new();
    for (title, validate) in SECTIONS {
        if !args.json {
            println!("--- {} ---", title);
        }
        let mut section = validate(args.verbose && !args.json);
        for r in &mut section {
            r.section = title;
        }
        results.extend(section);
    }

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if args.json {
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("failed to encode results: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || args.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            results.len(),
            failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        section: "",
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn at_laboratory() -> SimulationController {
    let mut sim = SimulationController::new();
    let _ = sim.advance(Stage::Mission);
    let _ = sim.advance(Stage::Laboratory);
    sim
}

fn completed_lab() -> SimulationController {
    let mut sim = at_laboratory();
    for kind in MeasurementKind::ALL {
        let _ = sim.record(kind);
    }
    sim
}

// ── 1. Stage Table ──────────────────────────────────────────────────────

fn validate_stage_table(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    // Exactly one outgoing edge per stage, along the fixed sequence
    let mut edges = Vec::new();
    for from in Stage::ALL {
        for to in Stage::ALL {
            if from.allows(to) {
                edges.push((from, to));
            }
        }
    }
    let expected = [
        (Stage::Intro, Stage::Mission),
        (Stage::Mission, Stage::Laboratory),
        (Stage::Laboratory, Stage::Analysis),
        (Stage::Analysis, Stage::Report),
        (Stage::Report, Stage::Intro),
    ];
    results.push(check(
        "stage_edges_match_sequence",
        edges == expected,
        format!("{} edges allowed", edges.len()),
    ));

    // Every other edge is rejected by the controller and leaves the stage as is
    let mut rejected = 0;
    let mut leaked = Vec::new();
    for target in Stage::ALL {
        if target == Stage::Mission {
            continue;
        }
        let mut sim = SimulationController::new();
        match sim.advance(target) {
            Err(TransitionError::OutOfSequence { .. }) if sim.stage() == Stage::Intro => {
                rejected += 1
            }
            other => leaked.push(format!("{:?}: {:?}", target, other)),
        }
    }
    results.push(check(
        "stage_skips_rejected",
        leaked.is_empty(),
        if leaked.is_empty() {
            format!("{} out-of-sequence requests from Intro rejected", rejected)
        } else {
            format!("accepted: {}", leaked.join(", "))
        },
    ));

    if verbose {
        for (from, to) in &edges {
            println!("    {} → {}", from, to);
        }
    }

    results
}

// ── 2. Progress ─────────────────────────────────────────────────────────

fn validate_progress(_verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let fresh = SimulationController::new();
    results.push(check(
        "progress_initial_zero",
        fresh.state().progress == 0.0 && fresh.state().measurements.recorded_count() == 0,
        format!("initial progress {}", fresh.state().progress),
    ));

    // Every order of the three kinds yields k/3 * 100 after k readings
    use MeasurementKind::*;
    let orders = [
        [Volume, Ph, Sealed],
        [Volume, Sealed, Ph],
        [Ph, Volume, Sealed],
        [Ph, Sealed, Volume],
        [Sealed, Volume, Ph],
        [Sealed, Ph, Volume],
    ];
    let mut bad = Vec::new();
    for order in &orders {
        let mut sim = at_laboratory();
        for (i, &kind) in order.iter().enumerate() {
            let _ = sim.record(kind);
            let expected = (i + 1) as f64 / 3.0 * 100.0;
            if sim.state().progress != expected {
                bad.push(format!("{:?}@{}={}", order, i + 1, sim.state().progress));
            }
        }
    }
    results.push(check(
        "progress_k_thirds_all_orders",
        bad.is_empty(),
        if bad.is_empty() {
            "6 orders x 3 steps exact".to_string()
        } else {
            bad.join("; ")
        },
    ));

    // Re-measuring does not accumulate
    let mut sim = at_laboratory();
    for _ in 0..3 {
        let _ = sim.record(Volume);
    }
    results.push(check(
        "progress_no_accumulation",
        sim.state().progress_display() == 33,
        format!("3x volume → {}%", sim.state().progress_display()),
    ));

    // Display rounding leaves the stored value untouched
    let mut sim = at_laboratory();
    let _ = sim.record(Volume);
    let _ = sim.record(Ph);
    results.push(check(
        "progress_display_rounding",
        sim.state().progress_display() == 67 && sim.state().progress < 66.67,
        format!(
            "stored {:.6}, shown {}%",
            sim.state().progress,
            sim.state().progress_display()
        ),
    ));

    results
}

// ── 3. Conformance ──────────────────────────────────────────────────────

fn validate_conformance(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();
    let sim = completed_lab();
    let m = sim.state().measurements;

    results.push(check(
        "conformance_case_literals",
        m.volume_ml == Some(FIXED_VOLUME_ML) && m.ph == Some(FIXED_PH) && m.seal == FIXED_SEAL,
        format!("volume={:?} ph={:?} seal={:?}", m.volume_ml, m.ph, m.seal),
    ));

    let vol = conformance::assess(MeasurementKind::Volume, &m);
    results.push(check(
        "conformance_volume_248_in_window",
        vol.verdict == Verdict::Conforming && vol.warning.is_none(),
        format!("248 ml → {:?}, warning {:?}", vol.verdict, vol.warning),
    ));

    let ph = conformance::assess(MeasurementKind::Ph, &m);
    results.push(check(
        "conformance_ph_too_acidic",
        ph.verdict == Verdict::NonConforming && ph.warning == Some(Warning::TooAcidic),
        format!("pH 3.2 → {:?}, warning {:?}", ph.verdict, ph.warning),
    ));

    let seal = conformance::assess(MeasurementKind::Sealed, &m);
    results.push(check(
        "conformance_seal_always_fails",
        seal.verdict == Verdict::NonConforming && m.seal == SealIntegrity::Leaking,
        format!("seal → {:?}", seal.verdict),
    ));

    // Boundary sweep in 0.1 steps around each window
    let mut boundary_ok = true;
    for tenth in 2400..=2600 {
        let v = tenth as f64 / 10.0;
        if conformance::volume_conforms(v) != (245.0..=255.0).contains(&v) {
            boundary_ok = false;
        }
        if conformance::volume_below_minimum(v) != (v < 245.0) {
            boundary_ok = false;
        }
    }
    for hundredth in 300..=500 {
        let ph = hundredth as f64 / 100.0;
        if conformance::ph_too_acidic(ph) != (ph < 3.5) {
            boundary_ok = false;
        }
    }
    results.push(check(
        "conformance_boundaries",
        boundary_ok,
        "volume 240–260 ml and pH 3.0–5.0 sweeps",
    ));

    if verbose {
        for kind in MeasurementKind::ALL {
            println!("    {:<15} {}", kind.label(), conformance::requirement(kind));
        }
    }

    results
}

// ── 4. Analysis Gate ────────────────────────────────────────────────────

fn validate_gate(_verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let mut sim = at_laboratory();
    let mut blocked_at = Vec::new();
    for kind in MeasurementKind::ALL {
        if matches!(
            sim.advance(Stage::Analysis),
            Err(TransitionError::LaboratoryIncomplete { .. })
        ) {
            blocked_at.push(sim.state().progress_display());
        }
        let _ = sim.record(kind);
    }
    results.push(check(
        "gate_blocks_below_100",
        blocked_at == [0, 33, 67],
        format!("blocked at {:?}%", blocked_at),
    ));

    let opened = sim.can_advance() && sim.advance(Stage::Analysis) == Ok(Stage::Analysis);
    results.push(check(
        "gate_opens_at_100",
        opened,
        format!("stage now {}", sim.stage()),
    ));

    let mut early = SimulationController::new();
    let refused = early.record(MeasurementKind::Volume).is_err();
    results.push(check(
        "gate_no_readings_outside_lab",
        refused && early.state().progress == 0.0,
        "recording at Intro refused",
    ));

    results
}

// ── 5. Reset ────────────────────────────────────────────────────────────

fn validate_reset(_verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let mut sim = completed_lab();
    let refused = sim.reset().is_err() && sim.state().progress == 100.0;
    results.push(check(
        "reset_refused_before_report",
        refused,
        "reset in Laboratory leaves readings intact",
    ));

    let _ = sim.advance(Stage::Analysis);
    let _ = sim.advance(Stage::Report);
    let ok = sim.reset().is_ok();
    results.push(check(
        "reset_restores_initial",
        ok && *sim.state() == SimulationState::default(),
        format!("{:?}", sim.state()),
    ));

    results
}

// ── 6. End-to-End Scenario ──────────────────────────────────────────────

fn validate_scenario(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut sim = SimulationController::new();
    let mut log = Vec::new();

    let mut step = |label: &str, ok: bool, sim: &SimulationController| {
        log.push(format!(
            "{:<22} stage={:<12} progress={:.2}%",
            label,
            sim.stage().to_string(),
            sim.state().progress
        ));
        ok
    };

    let mut ok = true;
    ok &= step("start", sim.stage() == Stage::Intro, &sim);
    let r = sim.advance(Stage::Mission).is_ok();
    ok &= step("advance Mission", r, &sim);
    let r = sim.advance(Stage::Laboratory).is_ok();
    ok &= step("advance Laboratory", r, &sim);
    let r = sim.record(MeasurementKind::Volume).is_ok()
        && (sim.state().progress - 33.33).abs() < 0.01;
    ok &= step("record Volume", r, &sim);
    let r = sim.record(MeasurementKind::Ph).is_ok() && (sim.state().progress - 66.67).abs() < 0.01;
    ok &= step("record Ph", r, &sim);
    let r = sim.record(MeasurementKind::Sealed).is_ok() && sim.state().progress == 100.0;
    ok &= step("record Sealed", r, &sim);
    let r = sim.advance(Stage::Analysis).is_ok();
    ok &= step("advance Analysis", r, &sim);
    let r = sim.advance(Stage::Report).is_ok();
    ok &= step("advance Report", r, &sim);
    let r = sim.reset().is_ok() && *sim.state() == SimulationState::default();
    ok &= step("reset", r, &sim);

    if verbose {
        for line in &log {
            println!("    {}", line);
        }
    }

    results.push(check(
        "scenario_full_session",
        ok,
        format!("{} steps", log.len()),
    ));
    results
}

// ── 7. Narrative vs Thresholds ──────────────────────────────────────────

fn validate_narrative(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();
    let sim = completed_lab();
    let m = &sim.state().measurements;

    // The volume text says "2 ml below the minimum"; 248 ml is inside 245–255
    let conflicts = analysis::narrative_conflicts(m);
    results.push(check(
        "narrative_volume_conflict_flagged",
        conflicts.len() == 1 && conflicts[0].kind == MeasurementKind::Volume,
        format!("{} conflict(s)", conflicts.len()),
    ));

    let summary = ReportSummary::from_state(sim.state());
    results.push(check(
        "narrative_summary_uses_thresholds",
        summary.deviations_detected == 2 && summary.measurements_taken == 3,
        format!("{:?}", summary),
    ));

    if verbose {
        for c in &conflicts {
            println!("    ⚠ {}", c);
        }
    }

    results
}
