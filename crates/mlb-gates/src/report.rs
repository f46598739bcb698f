//! Report assembly and activity-stage readiness

use crate::checks;
use crate::gate::{Gate, GateId, ValidationReport};
use crate::thresholds::GateThresholds;
use mlb_catalog::CardCatalog;
use mlb_workspace::{ActivityStage, DomainState, Workspace};

/// Errors from gated workspace operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// The stage's readiness gate has not passed
    #[error("activity stage {stage} is not ready: {details}")]
    StageNotReady { stage: ActivityStage, details: String },
}

/// Evaluate every gate against the current state
///
/// Always recomputed from scratch; nothing is cached between calls.
#[must_use]
pub fn validate<C: CardCatalog + ?Sized>(
    state: &DomainState,
    catalog: &C,
    thresholds: &GateThresholds,
) -> ValidationReport {
    let gates = GateId::REPORT
        .into_iter()
        .map(|id| evaluate(id, state, catalog, thresholds))
        .collect();
    let report = ValidationReport::from_gates(gates);
    tracing::debug!(
        can_generate_report = report.can_generate_report,
        completion = report.completion_percentage,
        missing = report.missing_requirements.len(),
        "validated workspace"
    );
    report
}

/// Evaluate a single gate by id
#[must_use]
pub fn evaluate<C: CardCatalog + ?Sized>(
    id: GateId,
    state: &DomainState,
    catalog: &C,
    thresholds: &GateThresholds,
) -> Gate {
    match id {
        GateId::RiskAssessed => checks::risk_assessed(state, thresholds),
        GateId::StageRationale => checks::stage_rationale(state, thresholds),
        GateId::MitigationPairs => checks::mitigation_pairs(state, thresholds),
        GateId::PairDocumentation => checks::pair_documentation(state, thresholds),
        GateId::RationaleDepth => checks::rationale_depth(state, thresholds),
        GateId::LifecycleCoverage => checks::lifecycle_coverage(state, thresholds),
        GateId::HighRiskMitigated => checks::high_risk_mitigated(state, catalog),
        GateId::ReportReady => report_ready(state, catalog, thresholds),
    }
}

/// Gate deciding whether an activity stage may be marked complete
///
/// | stage            | requires |
/// |------------------|----------|
/// | risk-categorize  | risk gate |
/// | lifecycle-assign | one stage placement |
/// | rationale        | rationale gate |
/// | mitigate         | pairs gate |
/// | review           | every required gate |
#[must_use]
pub fn stage_readiness<C: CardCatalog + ?Sized>(
    stage: ActivityStage,
    state: &DomainState,
    catalog: &C,
    thresholds: &GateThresholds,
) -> Gate {
    match stage {
        ActivityStage::RiskCategorize => checks::risk_assessed(state, thresholds),
        ActivityStage::LifecycleAssign => {
            let lenient = thresholds.with_min_lifecycle_stages(1);
            checks::lifecycle_coverage(state, &lenient)
        }
        ActivityStage::Rationale => checks::stage_rationale(state, thresholds),
        ActivityStage::Mitigate => checks::mitigation_pairs(state, thresholds),
        ActivityStage::Review => report_ready(state, catalog, thresholds),
    }
}

/// Complete an activity stage only when its readiness gate passes
///
/// Returns `Ok(false)` if the stage was already complete.
///
/// # Errors
/// Returns [`GateError::StageNotReady`] with the gate details otherwise.
pub fn try_complete_activity_stage<C: CardCatalog + ?Sized>(
    workspace: &mut Workspace,
    stage: ActivityStage,
    catalog: &C,
    thresholds: &GateThresholds,
) -> Result<bool, GateError> {
    let gate = stage_readiness(stage, workspace.state(), catalog, thresholds);
    if !gate.passed {
        tracing::debug!(stage = %stage, details = %gate.details, "activity stage not ready");
        return Err(GateError::StageNotReady {
            stage,
            details: gate.details,
        });
    }
    Ok(workspace.complete_activity_stage(stage))
}

fn report_ready<C: CardCatalog + ?Sized>(
    state: &DomainState,
    catalog: &C,
    thresholds: &GateThresholds,
) -> Gate {
    let report = validate(state, catalog, thresholds);
    let details = if report.can_generate_report {
        format!("Report ready ({}% complete)", report.completion_percentage)
    } else {
        format!("Outstanding: {}", report.missing_requirements.join("; "))
    };
    Gate::new(GateId::ReportReady, report.can_generate_report, details)
}
