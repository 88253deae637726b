//! Screen rendering for the MetroLab client.
//!
//! One renderer per stage. Renderers only read the session; every badge is
//! computed from the stored readings at draw time.

use metrolab_logic::analysis::{self, ReportSummary};
use metrolab_logic::conformance::{self, Assessment, Verdict};
use metrolab_logic::content;
use metrolab_logic::controller::SimulationController;
use metrolab_logic::measurement::MeasurementKind;
use metrolab_logic::source::MeasurementSource;
use metrolab_logic::stage::Stage;

const RULE_WIDTH: usize = 64;
const BAR_WIDTH: usize = 30;

/// Text being assembled for one screen.
#[derive(Default)]
struct Screen {
    lines: Vec<String>,
}

impl Screen {
    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn rule(&mut self) {
        self.lines.push("─".repeat(RULE_WIDTH));
    }

    fn heading(&mut self, text: &str) {
        self.blank();
        self.line(text);
        self.line("-".repeat(text.chars().count()));
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Draw the screen for the current stage.
pub fn render<S: MeasurementSource>(sim: &SimulationController<S>) -> String {
    let mut screen = Screen::default();
    let stage = sim.stage();
    screen.rule();
    screen.line(format!("Step {} of 5 · {}", stage.ordinal(), stage.title()));
    screen.rule();

    match stage {
        Stage::Intro => render_intro(&mut screen),
        Stage::Mission => render_mission(&mut screen),
        Stage::Laboratory => render_laboratory(&mut screen, sim),
        Stage::Analysis => render_analysis(&mut screen, sim),
        Stage::Report => render_report(&mut screen, sim),
    }
    screen.finish()
}

fn render_intro(screen: &mut Screen) {
    screen.line(content::TITLE.to_uppercase());
    screen.line(content::TAGLINE);
    screen.blank();
    for feature in &content::FEATURES {
        screen.line(format!("  * {} — {}", feature.title, feature.description));
    }
    screen.blank();
    for fact in &content::SESSION_FACTS {
        screen.line(format!("  {}", fact));
    }
    screen.blank();
    screen.line("[next] Start the mission");
}

fn render_mission(screen: &mut Screen) {
    screen.line(format!(
        "{}  (Mission #{})",
        content::CASE_TITLE,
        content::MISSION_NUMBER
    ));
    screen.line(content::CASE_SUBTITLE);

    screen.heading("Consumer complaints");
    for complaint in &content::COMPLAINTS {
        screen.line(format!("  ✗ {}", complaint));
    }

    screen.heading("Normative documents");
    for standard in &content::STANDARDS {
        screen.line(format!("  {} — {}", standard.code, standard.title));
    }

    screen.heading("Your task");
    screen.line(content::TASK);
    screen.blank();
    screen.line("[next] Go to the laboratory");
}

fn render_laboratory<S: MeasurementSource>(screen: &mut Screen, sim: &SimulationController<S>) {
    let state = sim.state();
    screen.line(format!(
        "Progress {} {}%",
        progress_bar(state.progress),
        state.progress_display()
    ));

    for kind in MeasurementKind::ALL {
        let step = content::lab_step(kind);
        screen.heading(step.title);
        screen.line(step.instructions);
        screen.line(format!("Requirement: {}", conformance::requirement(kind)));

        let assessment = conformance::assess(kind, &state.measurements);
        if let Some(reading) = state.measurements.reading(kind) {
            screen.line(format!("Result: {}  {}", reading, badge(&assessment)));
            if let Some(warning) = assessment.warning {
                screen.line(format!("  ! {}", warning.message()));
            }
        }

        let control = if state.measurements.is_recorded(kind) {
            "[done] Measurement complete".to_string()
        } else if !sim.is_unlocked(kind) {
            "[locked] Finish the previous measurements".to_string()
        } else {
            format!("[measure {}] Run the check", command_word(kind))
        };
        screen.line(control);
    }

    if sim.can_advance() {
        screen.blank();
        screen.line("[next] Go to results analysis");
    }
}

fn render_analysis<S: MeasurementSource>(screen: &mut Screen, sim: &SimulationController<S>) {
    let m = &sim.state().measurements;

    screen.line("Results compared with the GOST requirements");
    screen.blank();
    for assessment in analysis::findings(m) {
        let value = m
            .reading(assessment.kind)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "—".to_string());
        screen.line(format!(
            "  {:<15} {:<10} {}  norm: {}",
            assessment.kind.label(),
            value,
            badge(&assessment),
            conformance::requirement(assessment.kind)
        ));
    }

    screen.heading("Nonconformities found");
    for finding in &content::FINDINGS {
        screen.line(format!("  ✗ {}", finding.title));
        screen.line(format!("    {}", finding.text));
    }

    let conflicts = analysis::narrative_conflicts(m);
    if !conflicts.is_empty() {
        screen.blank();
        for conflict in &conflicts {
            screen.line(format!("  ⚠ Check the record: {}", conflict));
        }
    }

    screen.heading("Recommended corrective actions");
    for action in &content::CORRECTIVE_ACTIONS {
        screen.line(format!("  ✓ {} — {}", action.title, action.description));
    }
    screen.blank();
    screen.line("[next] Write the report");
}

fn render_report<S: MeasurementSource>(screen: &mut Screen, sim: &SimulationController<S>) {
    let summary = ReportSummary::from_state(sim.state());

    screen.line(content::REPORT_HEADLINE);
    screen.line(content::REPORT_SUBHEAD);

    screen.heading("Final report");
    screen.line(format!("  Measurements taken    {}", summary.measurements_taken));
    screen.line(format!("  Deviations detected   {}", summary.deviations_detected));
    screen.line(format!("  Solutions proposed    {}", summary.corrective_actions));
    screen.line(format!("  Standards used        {}", summary.standards_referenced));

    screen.heading("You have learned");
    for skill in &content::SKILLS {
        screen.line(format!("  ✓ {}", skill));
    }
    screen.blank();
    screen.line("[reset] Start again");
}

fn badge(assessment: &Assessment) -> &'static str {
    match assessment.verdict {
        Verdict::Pending => "[ pending ]",
        Verdict::Conforming => "[   OK    ]",
        Verdict::NonConforming => "[DEVIATION]",
    }
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn command_word(kind: MeasurementKind) -> &'static str {
    match kind {
        MeasurementKind::Volume => "volume",
        MeasurementKind::Ph => "ph",
        MeasurementKind::Sealed => "seal",
    }
}
