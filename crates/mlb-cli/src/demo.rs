//! Demo workspace seeding
//!
//! Fills an empty workspace with a plausible analysis drawn from whatever
//! catalog is loaded, using only the public mutation API. Every seeded
//! mutation lands in undo history like any other edit.

use mlb_catalog::CardCatalog;
use mlb_workspace::{
    ActivityStage, EffectivenessRating, LifecycleStage, PairUpdate, RiskCategory, Workspace,
};

/// Number of biases the demo touches
pub const DEMO_BIAS_COUNT: usize = 6;

/// Seed `workspace` from `catalog`
///
/// Returns `false` without touching anything if the workspace already holds
/// data.
pub fn seed_demo<C: CardCatalog + ?Sized>(workspace: &mut Workspace, catalog: &C) -> bool {
    if !workspace.state().is_empty() {
        tracing::warn!("workspace is not empty, demo data not seeded");
        return false;
    }

    let biases = catalog.bias_cards();
    let mitigations = catalog.mitigation_cards();

    for (i, bias) in biases.iter().take(DEMO_BIAS_COUNT).enumerate() {
        let risk = RiskCategory::ALL[i % RiskCategory::ALL.len()];
        workspace.assign_bias_risk(bias.id.clone(), risk, None);

        let stage = LifecycleStage::ALL[(i * 3) % LifecycleStage::ALL.len()];
        let rationale = format!("{} can shape decisions during {}", bias.caption, stage.label());
        workspace.assign_card_to_stage(bias.id.clone(), stage, Some(rationale));

        if mitigations.is_empty() {
            continue;
        }
        let mitigation = mitigations[i % mitigations.len()];
        workspace.create_card_pair(bias.id.clone(), mitigation.id.clone());

        let update = if i % 2 == 0 {
            let stars = u8::try_from(i % 5 + 1).ok().and_then(|n| EffectivenessRating::new(n).ok());
            PairUpdate::default().rating(stars)
        } else {
            PairUpdate::default().annotation(Some(format!(
                "{} applied at every {} review",
                mitigation.caption,
                stage.phase()
            )))
        };
        workspace.update_card_pair(bias.id.as_str(), mitigation.id.as_str(), update);
    }

    workspace.complete_activity_stage(ActivityStage::RiskCategorize);

    tracing::info!(
        risks = workspace.state().risk_assignment_count(),
        placements = workspace.state().stage_assignment_count(),
        pairs = workspace.state().card_pair_count(),
        "seeded demo workspace"
    );
    true
}
