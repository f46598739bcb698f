//! End-to-end command tests over temporary files

use mlb_cli::commands::{run_demo, run_summary, run_validate, Summary};
use mlb_cli::demo::seed_demo;
use mlb_gates::{validate, GateId, GateThresholds};
use mlb_test_utils::{empty_workspace, ready_workspace, sample_catalog, SAMPLE_CATALOG_JSON};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    catalog: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let catalog = dir.path().join("catalog.json");
        std::fs::write(&catalog, SAMPLE_CATALOG_JSON).unwrap();
        Self { dir, catalog }
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn write_workspace(fx: &Fixture, name: &str, ws: &mlb_workspace::Workspace) -> PathBuf {
    let path = fx.path(name);
    ws.snapshot().write_to_path(&path).unwrap();
    path
}

#[test]
fn test_demo_seeds_a_report_ready_workspace() {
    let catalog = sample_catalog();
    let mut ws = empty_workspace();

    assert!(seed_demo(&mut ws, &catalog));
    assert_eq!(ws.state().risk_assignment_count(), 6);
    assert_eq!(ws.state().card_pair_count(), 6);

    let report = validate(ws.state(), &catalog, &GateThresholds::default());
    assert!(report.can_generate_report);
    assert!(report.passed(GateId::HighRiskMitigated));

    // risk, placement, pair and pair update per seeded bias
    assert!(ws.can_undo());
    assert_eq!(ws.history().undo_len(), 6 * 4);
    while ws.undo() {}
    assert!(ws.state().is_empty());
}

#[test]
fn test_demo_refuses_non_empty_workspace() {
    let catalog = sample_catalog();
    let mut ws = ready_workspace();
    let before = ws.state().clone();

    assert!(!seed_demo(&mut ws, &catalog));
    assert_eq!(ws.state(), &before);
}

#[test]
fn test_demo_then_validate() {
    mlb_cli::logging::init_test();
    let fx = Fixture::new();
    let output = fx.path("demo.json");

    let json = run_demo(&fx.catalog, Some(&output), None).unwrap();
    assert!(json.contains("\"risk_assignments\""));
    assert!(output.exists());

    let outcome = run_validate(&fx.catalog, &output, None, false).unwrap();
    assert_eq!(outcome.exit_code(), 0);
    assert!(outcome.rendered.contains("Report can be generated."));
}

#[test]
fn test_validate_blocked_workspace() {
    let fx = Fixture::new();
    let workspace = write_workspace(&fx, "empty.json", &empty_workspace());

    let outcome = run_validate(&fx.catalog, &workspace, None, false).unwrap();
    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.rendered.contains("Report blocked. Missing:"));
    assert!(outcome.rendered.contains("[FAIL] Risk assessment (required)"));
}

#[test]
fn test_validate_json_output() {
    let fx = Fixture::new();
    let workspace = write_workspace(&fx, "ready.json", &ready_workspace());

    let outcome = run_validate(&fx.catalog, &workspace, None, true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&outcome.rendered).unwrap();

    assert_eq!(value["can_generate_report"], true);
    assert_eq!(value["completion_percentage"], 100);
    assert_eq!(value["gates"][0]["id"], "risk-assessed");
}

#[test]
fn test_config_thresholds_apply() {
    let fx = Fixture::new();
    let workspace = write_workspace(&fx, "ready.json", &ready_workspace());
    let config = fx.file("mlb.toml", "[gates]\nmin_card_pairs = 10\n");

    let outcome = run_validate(&fx.catalog, &workspace, Some(&config), false).unwrap();
    assert_eq!(outcome.exit_code(), 1);
    assert!(!outcome.report.passed(GateId::MitigationPairs));
}

#[test]
fn test_summary_counts() {
    let fx = Fixture::new();
    let ws = ready_workspace();
    let workspace = write_workspace(&fx, "ready.json", &ws);

    let json = run_summary(&fx.catalog, &workspace, None, true).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(summary["risk_assignments"], 3);
    assert_eq!(summary["stage_assignments"], 4);
    assert_eq!(summary["card_pairs"], 3);
    assert_eq!(summary["blocking_gates"], 0);

    let expected = Summary::of(&ws, &sample_catalog(), &GateThresholds::default());
    assert_eq!(
        run_summary(&fx.catalog, &workspace, None, false).unwrap(),
        expected.render()
    );
}

#[test]
fn test_rejects_workspace_with_unknown_cards() {
    let fx = Fixture::new();
    let mut ws = empty_workspace();
    ws.assign_bias_risk("ghost-bias", mlb_workspace::RiskCategory::HighRisk, None);
    let workspace = write_workspace(&fx, "ghost.json", &ws);

    let err = run_validate(&fx.catalog, &workspace, None, false).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("rejected"));
    assert!(message.contains("ghost-bias"));
}

#[test]
fn test_missing_catalog_has_context() {
    let err = run_demo(Path::new("/no/such/catalog.json"), None, None).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load catalog"));
}
