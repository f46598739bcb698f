//! Subcommand implementations
//!
//! Each command returns its rendered output instead of printing, so the
//! binary owns stdout and exit codes.

use crate::config::AppConfig;
use crate::demo::seed_demo;
use anyhow::{Context, Result};
use mlb_catalog::{CardCatalog, StaticCatalog};
use mlb_gates::{validate, GateThresholds, ValidationReport};
use mlb_workspace::{Workspace, WorkspaceConfig, WorkspaceSnapshot};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Load and validate a card catalog
///
/// # Errors
/// Fails when the file is missing, malformed or inconsistent.
pub fn load_catalog(path: &Path) -> Result<StaticCatalog> {
    StaticCatalog::from_path(path)
        .with_context(|| format!("failed to load catalog {}", path.display()))
}

/// Load a snapshot and admit it against the catalog
///
/// # Errors
/// Fails when the file is unreadable or fails integrity checks.
pub fn load_workspace<C: CardCatalog + ?Sized>(
    path: &Path,
    catalog: &C,
    config: WorkspaceConfig,
) -> Result<Workspace> {
    let snapshot = WorkspaceSnapshot::from_path(path)
        .with_context(|| format!("failed to read workspace {}", path.display()))?;
    Workspace::from_snapshot(snapshot, catalog, config)
        .with_context(|| format!("workspace {} rejected", path.display()))
}

/// Output of `mlb validate`
#[derive(Debug)]
pub struct ValidateOutcome {
    pub report: ValidationReport,
    pub rendered: String,
}

impl ValidateOutcome {
    /// Exit status: 0 when a report can be generated
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.report.can_generate_report)
    }
}

/// Run the gate engine over a stored workspace
///
/// # Errors
/// Fails on unreadable inputs or JSON rendering errors.
pub fn run_validate(
    catalog_path: &Path,
    workspace_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> Result<ValidateOutcome> {
    let config = AppConfig::load(config_path)?;
    let catalog = load_catalog(catalog_path)?;
    let workspace = load_workspace(workspace_path, &catalog, config.workspace)?;

    let report = validate(workspace.state(), &catalog, &config.gates);
    let rendered = if json {
        serde_json::to_string_pretty(&report)?
    } else {
        render_report(&report)
    };
    Ok(ValidateOutcome { report, rendered })
}

/// Plain-text gate report
#[must_use]
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Completion: {}%", report.completion_percentage);
    let _ = writeln!(out);
    for gate in &report.gates {
        let mark = if gate.passed { "PASS" } else { "FAIL" };
        let kind = if gate.required { "required" } else { "advisory" };
        let _ = writeln!(out, "  [{mark}] {} ({kind}): {}", gate.name, gate.details);
    }
    let _ = writeln!(out);
    if report.can_generate_report {
        let _ = writeln!(out, "Report can be generated.");
    } else {
        let _ = writeln!(out, "Report blocked. Missing:");
        for missing in &report.missing_requirements {
            let _ = writeln!(out, "  - {missing}");
        }
    }
    if !report.advisories.is_empty() {
        let _ = writeln!(out, "Suggestions:");
        for advisory in &report.advisories {
            let _ = writeln!(out, "  - {advisory}");
        }
    }
    out
}

/// Collection counts and activity progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub session_id: String,
    pub activity_id: Option<String>,
    pub risk_assignments: usize,
    pub stage_assignments: usize,
    pub lifecycle_stages_covered: usize,
    pub card_pairs: usize,
    pub annotations: usize,
    pub completed_lifecycle_stages: usize,
    pub current_activity_stage: u8,
    pub activity_progress: u8,
    pub activity_complete: bool,
    pub blocking_gates: usize,
}

impl Summary {
    /// Summarize a workspace
    #[must_use]
    pub fn of<C: CardCatalog + ?Sized>(
        workspace: &Workspace,
        catalog: &C,
        thresholds: &GateThresholds,
    ) -> Self {
        let state = workspace.state();
        let activity = workspace.activity();
        let report = validate(state, catalog, thresholds);
        Self {
            session_id: workspace.session().session_id.clone(),
            activity_id: workspace.session().activity_id.clone(),
            risk_assignments: state.risk_assignment_count(),
            stage_assignments: state.stage_assignment_count(),
            lifecycle_stages_covered: state.covered_stages().len(),
            card_pairs: state.card_pair_count(),
            annotations: state.annotations().count(),
            completed_lifecycle_stages: state.completed_stages().len(),
            current_activity_stage: activity.current_stage().number(),
            activity_progress: activity.completed_progress(),
            activity_complete: activity.is_complete(),
            blocking_gates: report.missing_requirements.len(),
        }
    }

    /// Plain-text rendering
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Session:            {}", self.session_id);
        if let Some(activity) = &self.activity_id {
            let _ = writeln!(out, "Activity:           {activity}");
        }
        let _ = writeln!(out, "Risk assignments:   {}", self.risk_assignments);
        let _ = writeln!(
            out,
            "Stage placements:   {} across {} stage(s)",
            self.stage_assignments, self.lifecycle_stages_covered
        );
        let _ = writeln!(out, "Mitigation pairs:   {}", self.card_pairs);
        let _ = writeln!(out, "Notes:              {}", self.annotations);
        let _ = writeln!(out, "Stages completed:   {}", self.completed_lifecycle_stages);
        let _ = writeln!(
            out,
            "Activity stage:     {} of 5 (progress {}/5{})",
            self.current_activity_stage,
            self.activity_progress,
            if self.activity_complete { ", complete" } else { "" }
        );
        let _ = writeln!(out, "Blocking gates:     {}", self.blocking_gates);
        out
    }
}

/// Run `mlb summary`
///
/// # Errors
/// Fails on unreadable inputs or JSON rendering errors.
pub fn run_summary(
    catalog_path: &Path,
    workspace_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> Result<String> {
    let config = AppConfig::load(config_path)?;
    let catalog = load_catalog(catalog_path)?;
    let workspace = load_workspace(workspace_path, &catalog, config.workspace)?;
    let summary = Summary::of(&workspace, &catalog, &config.gates);
    if json {
        Ok(serde_json::to_string_pretty(&summary)?)
    } else {
        Ok(summary.render())
    }
}

/// Run `mlb demo`: seed a fresh workspace and optionally write it out
///
/// Returns the snapshot JSON.
///
/// # Errors
/// Fails on an unreadable catalog or when the output cannot be written.
pub fn run_demo(
    catalog_path: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<String> {
    let config = AppConfig::load(config_path)?;
    let catalog = load_catalog(catalog_path)?;
    let mut workspace = Workspace::new(config.workspace);
    seed_demo(&mut workspace, &catalog);

    let snapshot = workspace.snapshot();
    if let Some(path) = output {
        snapshot
            .write_to_path(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote demo workspace");
    }
    Ok(snapshot.to_json_pretty()?)
}
