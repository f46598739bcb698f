//! Gate engine tests against the shared sample catalog

use mlb_gates::{
    stage_readiness, try_complete_activity_stage, validate, GateError, GateId, GateThresholds,
    ValidationReport,
};
use mlb_test_utils::{empty_workspace, rating, ready_workspace, sample_catalog};
use mlb_workspace::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn report(ws: &Workspace) -> ValidationReport {
    validate(ws.state(), &sample_catalog(), &GateThresholds::default())
}

fn outcomes(report: &ValidationReport) -> Vec<(GateId, bool)> {
    report.gates.iter().map(|g| (g.id, g.passed)).collect()
}

#[test]
fn test_ready_workspace_passes_everything() {
    let report = report(&ready_workspace());

    assert!(report.can_generate_report);
    assert_eq!(report.completion_percentage, 100);
    assert!(report.missing_requirements.is_empty());
    assert!(report.advisories.is_empty());
    assert_eq!(
        report.gates.iter().map(|g| g.id).collect::<Vec<_>>(),
        GateId::REPORT.to_vec()
    );
}

#[test]
fn test_empty_workspace_report() {
    let report = report(&empty_workspace());

    assert!(!report.can_generate_report);
    // only the vacuous high-risk gate passes
    assert_eq!(report.completion_percentage, 14);
    assert_eq!(report.missing_requirements.len(), 4);
    assert_eq!(report.advisories.len(), 2);
    assert!(report.passed(GateId::HighRiskMitigated));
}

#[test]
fn test_gate_independence_pair_documentation() {
    let mut ws = ready_workspace();
    let before = outcomes(&report(&ws));

    for (bias, mitigation) in [
        ("confirmation-bias", "peer-review"),
        ("representation-bias", "data-audit"),
    ] {
        ws.update_card_pair(bias, mitigation, PairUpdate::default().rating(None));
    }
    let after = report(&ws);

    let flipped: Vec<GateId> = before
        .iter()
        .zip(outcomes(&after))
        .filter(|(b, a)| b.1 != a.1)
        .map(|(b, _)| b.0)
        .collect();
    assert_eq!(flipped, vec![GateId::PairDocumentation]);
    assert!(!after.can_generate_report);
    assert_eq!(after.missing_requirements.len(), 1);

    // adding one rating back restores the gate and the report
    ws.update_card_pair("confirmation-bias", "peer-review", PairUpdate::default().rating(rating(2)));
    assert_eq!(outcomes(&report(&ws)), before);
    assert!(report(&ws).can_generate_report);
}

#[test]
fn test_note_counts_as_documentation() {
    let mut ws = empty_workspace();
    ws.create_card_pair("confirmation-bias", "peer-review");
    ws.create_card_pair("automation-bias", "red-teaming");
    assert!(!report(&ws).passed(GateId::PairDocumentation));

    ws.update_card_pair(
        "automation-bias",
        "red-teaming",
        PairUpdate::default().annotation(Some("simulate overrides".into())),
    );
    assert!(report(&ws).passed(GateId::PairDocumentation));

    ws.update_card_pair(
        "automation-bias",
        "red-teaming",
        PairUpdate::default().annotation(Some("   ".into())),
    );
    assert!(!report(&ws).passed(GateId::PairDocumentation));
}

#[test]
fn test_unmitigated_high_risk_is_advisory() {
    let mut ws = ready_workspace();
    ws.assign_bias_risk("automation-bias", RiskCategory::HighRisk, None);
    ws.assign_bias_risk("uncatalogued-bias", RiskCategory::HighRisk, None);

    let report = report(&ws);
    let gate = report.gate(GateId::HighRiskMitigated).unwrap();

    assert!(!gate.passed);
    assert!(!gate.required);
    assert!(gate.details.contains("Automation Bias"));
    assert!(gate.details.contains("uncatalogued-bias"));
    assert!(report.can_generate_report);
    assert_eq!(report.completion_percentage, 86);
    assert_eq!(report.advisories, vec![gate.details.clone()]);
}

#[test]
fn test_thresholds_change_outcomes() {
    let ws = ready_workspace();
    let strict = GateThresholds::new()
        .with_min_card_pairs(5)
        .with_min_lifecycle_stages(6);
    let report = validate(ws.state(), &sample_catalog(), &strict);

    assert!(!report.passed(GateId::MitigationPairs));
    assert!(!report.passed(GateId::LifecycleCoverage));
    assert!(report.passed(GateId::RiskAssessed));
    assert!(!report.can_generate_report);
}

#[test]
fn test_thresholds_from_partial_config() {
    let t: GateThresholds = toml::from_str("min_card_pairs = 4\nrationale_ratio = 0.75\n").unwrap();
    assert_eq!(t.min_card_pairs, 4);
    assert!((t.rationale_ratio - 0.75).abs() < f64::EPSILON);
    assert_eq!(t.min_risk_assignments, 1);
    assert_eq!(t.min_lifecycle_stages, 3);

    let t: GateThresholds = serde_json::from_str("{}").unwrap();
    assert_eq!(t, GateThresholds::default());
}

#[test]
fn test_thresholds_reject_out_of_range_ratios() {
    let err = serde_json::from_str::<GateThresholds>(r#"{"rationale_ratio": -0.1}"#).unwrap_err();
    assert!(err.to_string().contains("rationale_ratio"));

    assert!(toml::from_str::<GateThresholds>("pair_documentation_ratio = 1.5\n").is_err());
    assert!(toml::from_str::<GateThresholds>("rationale_ratio = nan\n").is_err());
    assert!(toml::from_str::<GateThresholds>("rationale_ratio = 1.0\n").is_ok());
}

#[test]
fn test_stage_readiness_progression() {
    let catalog = sample_catalog();
    let t = GateThresholds::default();
    let mut ws = empty_workspace();

    let ready = |ws: &Workspace, stage| stage_readiness(stage, ws.state(), &catalog, &t).passed;

    assert!(!ready(&ws, ActivityStage::RiskCategorize));
    ws.assign_bias_risk("confirmation-bias", RiskCategory::HighRisk, None);
    assert!(ready(&ws, ActivityStage::RiskCategorize));

    assert!(!ready(&ws, ActivityStage::LifecycleAssign));
    ws.assign_card_to_stage("confirmation-bias", LifecycleStage::DataAnalysis, None);
    assert!(ready(&ws, ActivityStage::LifecycleAssign));
    assert!(!ready(&ws, ActivityStage::Rationale));

    assert!(!ready(&ws, ActivityStage::Mitigate));
    assert!(!ready(&ws, ActivityStage::Review));

    assert!(ready(&ready_workspace(), ActivityStage::Review));
}

#[test]
fn test_try_complete_activity_stage() {
    let catalog = sample_catalog();
    let t = GateThresholds::default();
    let mut ws = empty_workspace();

    let err = try_complete_activity_stage(&mut ws, ActivityStage::RiskCategorize, &catalog, &t)
        .unwrap_err();
    assert!(matches!(
        err,
        GateError::StageNotReady {
            stage: ActivityStage::RiskCategorize,
            ..
        }
    ));
    assert!(!ws.activity().is_completed(ActivityStage::RiskCategorize));

    ws.assign_bias_risk("optimism-bias", RiskCategory::MediumRisk, None);
    assert_eq!(
        try_complete_activity_stage(&mut ws, ActivityStage::RiskCategorize, &catalog, &t),
        Ok(true)
    );
    assert_eq!(
        try_complete_activity_stage(&mut ws, ActivityStage::RiskCategorize, &catalog, &t),
        Ok(false)
    );
    assert!(ws.can_advance_to_stage(ActivityStage::LifecycleAssign));
}

fn cards() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "confirmation-bias",
        "automation-bias",
        "optimism-bias",
        "status-quo-bias",
        "representation-bias",
    ])
}

fn mitigations() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["peer-review", "stakeholder-engagement", "data-audit"])
}

proptest! {
    #[test]
    fn prop_report_is_consistent(
        risks in proptest::collection::vec((cards(), 0..4usize), 0..6),
        placements in proptest::collection::vec((cards(), 0..12usize, any::<bool>()), 0..8),
        pairs in proptest::collection::vec((cards(), mitigations(), proptest::option::of(1u8..=5)), 0..6),
    ) {
        let mut ws = empty_workspace();
        for (card, r) in risks {
            ws.assign_bias_risk(card, RiskCategory::ALL[r], None);
        }
        for (card, s, why) in placements {
            ws.assign_card_to_stage(card, LifecycleStage::ALL[s], why.then(|| "because".to_string()));
        }
        for (bias, mitigation, stars) in pairs {
            ws.create_card_pair(bias, mitigation);
            let stars = stars.and_then(|v| EffectivenessRating::new(v).ok());
            ws.update_card_pair(bias, mitigation, PairUpdate::default().rating(stars));
        }

        let before = ws.state().clone();
        let report = report(&ws);
        prop_assert_eq!(ws.state(), &before);

        let blocking = report.gates.iter().filter(|g| g.required && !g.passed).count();
        prop_assert_eq!(report.can_generate_report, blocking == 0);
        prop_assert_eq!(report.missing_requirements.len(), blocking);
        prop_assert!(report.completion_percentage <= 100);
        prop_assert_eq!(report.clone(), validate(ws.state(), &sample_catalog(), &GateThresholds::default()));
    }
}
