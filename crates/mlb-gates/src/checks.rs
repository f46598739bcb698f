//! Individual gate predicates
//!
//! Each check is a pure function of the current state and thresholds. None
//! of them caches, mutates or panics, so any gate can be evaluated on its own.

use crate::gate::{Gate, GateId};
use crate::thresholds::GateThresholds;
use mlb_catalog::CardCatalog;
use mlb_workspace::{DomainState, RiskCategory};

/// At least `min_risk_assignments` biases have a risk category
#[must_use]
pub fn risk_assessed(state: &DomainState, thresholds: &GateThresholds) -> Gate {
    let count = state.risk_assignment_count();
    let min = thresholds.min_risk_assignments;
    let passed = count >= min;
    let details = if passed {
        format!("{count} bias(es) assessed for risk")
    } else {
        format!("Assess at least {min} bias(es) for risk ({count} so far)")
    };
    Gate::new(GateId::RiskAssessed, passed, details)
}

/// At least `min_rationale_assignments` stage placements carry a rationale
#[must_use]
pub fn stage_rationale(state: &DomainState, thresholds: &GateThresholds) -> Gate {
    let count = rationale_count(state);
    let min = thresholds.min_rationale_assignments;
    let passed = count >= min;
    let details = if passed {
        format!("{count} stage placement(s) explained")
    } else {
        format!("Explain at least {min} stage placement(s) ({count} so far)")
    };
    Gate::new(GateId::StageRationale, passed, details)
}

/// At least `min_card_pairs` bias/mitigation pairs exist
#[must_use]
pub fn mitigation_pairs(state: &DomainState, thresholds: &GateThresholds) -> Gate {
    let count = state.card_pair_count();
    let min = thresholds.min_card_pairs;
    let passed = count >= min;
    let details = if passed {
        format!("{count} mitigation pair(s) recorded")
    } else {
        format!("Pair at least {min} bias(es) with a mitigation ({count} so far)")
    };
    Gate::new(GateId::MitigationPairs, passed, details)
}

/// Enough pairs carry a rating or a note
///
/// Fails when there are no pairs at all.
#[must_use]
pub fn pair_documentation(state: &DomainState, thresholds: &GateThresholds) -> Gate {
    let total = state.card_pair_count();
    let documented = state.card_pairs().filter(|p| p.is_documented()).count();
    let passed = meets_ratio(documented, total, thresholds.pair_documentation_ratio);
    let details = format!(
        "{documented} of {total} pair(s) rated or annotated (need {}%)",
        as_percent(thresholds.pair_documentation_ratio)
    );
    Gate::new(GateId::PairDocumentation, passed, details)
}

/// Most stage placements carry a rationale
#[must_use]
pub fn rationale_depth(state: &DomainState, thresholds: &GateThresholds) -> Gate {
    let total = state.stage_assignment_count();
    let explained = rationale_count(state);
    let passed = meets_ratio(explained, total, thresholds.rationale_ratio);
    let details = format!(
        "{explained} of {total} stage placement(s) have a rationale (suggested {}%)",
        as_percent(thresholds.rationale_ratio)
    );
    Gate::new(GateId::RationaleDepth, passed, details)
}

/// Placements span at least `min_lifecycle_stages` distinct stages
#[must_use]
pub fn lifecycle_coverage(state: &DomainState, thresholds: &GateThresholds) -> Gate {
    let covered = state.covered_stages().len();
    let min = thresholds.min_lifecycle_stages;
    let passed = covered >= min;
    let details = if passed {
        format!("{covered} lifecycle stage(s) covered")
    } else {
        format!("Cover at least {min} lifecycle stage(s) ({covered} so far)")
    };
    Gate::new(GateId::LifecycleCoverage, passed, details)
}

/// Every high-risk bias has at least one mitigation pair
///
/// Unmitigated biases are named by catalog caption, falling back to the id
/// for cards the catalog does not know. Passes trivially with no high-risk
/// biases.
#[must_use]
pub fn high_risk_mitigated<C: CardCatalog + ?Sized>(state: &DomainState, catalog: &C) -> Gate {
    let unmitigated: Vec<&str> = state
        .risk_assignments()
        .filter(|a| a.risk_category == RiskCategory::HighRisk)
        .filter(|a| state.pairs_for_bias(a.card_id.as_str()).next().is_none())
        .map(|a| catalog.caption_or_id(a.card_id.as_str()))
        .collect();

    let details = if unmitigated.is_empty() {
        "All high-risk biases have a mitigation".to_string()
    } else {
        format!("High-risk biases without mitigation: {}", unmitigated.join(", "))
    };
    Gate::new(GateId::HighRiskMitigated, unmitigated.is_empty(), details)
}

fn rationale_count(state: &DomainState) -> usize {
    state
        .stage_assignments()
        .filter(|a| a.has_rationale())
        .count()
}

#[allow(clippy::cast_precision_loss)]
fn meets_ratio(part: usize, total: usize, ratio: f64) -> bool {
    total > 0 && part as f64 / total as f64 >= ratio
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_percent(ratio: f64) -> u32 {
    (ratio.clamp(0.0, 1.0) * 100.0).round() as u32
}
