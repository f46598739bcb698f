//! Testing utilities for MLB workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use mlb_catalog::StaticCatalog;
use mlb_workspace::{
    EffectivenessRating, LifecycleStage, PairUpdate, RiskCategory, Workspace, WorkspaceConfig,
};

pub const SAMPLE_CATALOG_JSON: &str = r#"{
  "cards": [
    { "id": "confirmation-bias", "category": "cognitive-bias", "number": 1, "caption": "Confirmation Bias" },
    { "id": "automation-bias", "category": "cognitive-bias", "number": 2, "caption": "Automation Bias" },
    { "id": "optimism-bias", "category": "cognitive-bias", "number": 3, "caption": "Optimism Bias" },
    { "id": "status-quo-bias", "category": "social-bias", "number": 1, "caption": "Status Quo Bias" },
    { "id": "representation-bias", "category": "statistical-bias", "number": 1, "caption": "Representation Bias" },
    { "id": "missing-data-bias", "category": "statistical-bias", "number": 2, "caption": "Missing Data Bias" },
    { "id": "peer-review", "category": "mitigation-technique", "number": 1, "caption": "Peer Review" },
    { "id": "stakeholder-engagement", "category": "mitigation-technique", "number": 2, "caption": "Stakeholder Engagement" },
    { "id": "data-audit", "category": "mitigation-technique", "number": 3, "caption": "Data Audit" },
    { "id": "red-teaming", "category": "mitigation-technique", "number": 4, "caption": "Red Teaming" }
  ]
}"#;

pub fn sample_catalog() -> StaticCatalog {
    StaticCatalog::from_json_str(SAMPLE_CATALOG_JSON).unwrap()
}

pub fn empty_workspace() -> Workspace {
    Workspace::new(WorkspaceConfig::default())
}

pub fn workspace_with_history(max_history_size: usize) -> Workspace {
    Workspace::new(WorkspaceConfig::new().with_max_history_size(max_history_size))
}

pub fn rating(value: u8) -> Option<EffectivenessRating> {
    Some(EffectivenessRating::new(value).unwrap())
}

/// Workspace that passes every gate under default thresholds
///
/// Built through the public mutation API against [`sample_catalog`].
pub fn ready_workspace() -> Workspace {
    let mut ws = empty_workspace();

    ws.assign_bias_risk("confirmation-bias", RiskCategory::HighRisk, None);
    ws.assign_bias_risk("representation-bias", RiskCategory::HighRisk, None);
    ws.assign_bias_risk("optimism-bias", RiskCategory::MediumRisk, None);

    for (card, stage, why) in [
        ("confirmation-bias", LifecycleStage::ProblemFormulation, "framing follows the sponsor's hypothesis"),
        ("representation-bias", LifecycleStage::DataExtractionProcurement, "rural users under-sampled"),
        ("optimism-bias", LifecycleStage::ProjectPlanning, "timeline assumes clean data"),
        ("representation-bias", LifecycleStage::ModelTestingValidation, "test split mirrors training skew"),
    ] {
        ws.assign_card_to_stage(card, stage, Some(why.to_string()));
    }

    for (bias, mitigation, stars) in [
        ("confirmation-bias", "peer-review", 4),
        ("representation-bias", "data-audit", 5),
        ("optimism-bias", "stakeholder-engagement", 3),
    ] {
        ws.create_card_pair(bias, mitigation);
        ws.update_card_pair(bias, mitigation, PairUpdate::default().rating(rating(stars)));
    }

    ws
}
