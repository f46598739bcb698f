//! Gate and report types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a completion gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateId {
    RiskAssessed,
    StageRationale,
    MitigationPairs,
    PairDocumentation,
    RationaleDepth,
    LifecycleCoverage,
    HighRiskMitigated,
    /// Activity-stage readiness wrapper produced by `stage_readiness`
    ReportReady,
}

impl GateId {
    /// Gates evaluated by `validate`, in report order
    pub const REPORT: [Self; 7] = [
        Self::RiskAssessed,
        Self::StageRationale,
        Self::MitigationPairs,
        Self::PairDocumentation,
        Self::RationaleDepth,
        Self::LifecycleCoverage,
        Self::HighRiskMitigated,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RiskAssessed => "risk-assessed",
            Self::StageRationale => "stage-rationale",
            Self::MitigationPairs => "mitigation-pairs",
            Self::PairDocumentation => "pair-documentation",
            Self::RationaleDepth => "rationale-depth",
            Self::LifecycleCoverage => "lifecycle-coverage",
            Self::HighRiskMitigated => "high-risk-mitigated",
            Self::ReportReady => "report-ready",
        }
    }

    /// Human-readable title
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RiskAssessed => "Risk assessment",
            Self::StageRationale => "Stage rationale",
            Self::MitigationPairs => "Mitigation pairs",
            Self::PairDocumentation => "Pair documentation",
            Self::RationaleDepth => "Rationale depth",
            Self::LifecycleCoverage => "Lifecycle coverage",
            Self::HighRiskMitigated => "High-risk mitigation",
            Self::ReportReady => "Report readiness",
        }
    }

    /// What the gate checks
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::RiskAssessed => "Biases have been sorted into risk categories",
            Self::StageRationale => "Stage placements explain why the bias applies there",
            Self::MitigationPairs => "Biases are paired with mitigation techniques",
            Self::PairDocumentation => "Pairs carry an effectiveness rating or a note",
            Self::RationaleDepth => "Most stage placements carry a rationale",
            Self::LifecycleCoverage => "Placements span several lifecycle stages",
            Self::HighRiskMitigated => "Every high-risk bias has at least one mitigation",
            Self::ReportReady => "All required gates pass",
        }
    }

    /// Whether report generation depends on this gate
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(
            self,
            Self::RiskAssessed
                | Self::StageRationale
                | Self::MitigationPairs
                | Self::PairDocumentation
                | Self::ReportReady
        )
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub id: GateId,
    pub name: String,
    pub description: String,
    pub required: bool,
    pub passed: bool,
    /// Human-readable status, e.g. "2 of 3 placements have a rationale"
    pub details: String,
}

impl Gate {
    /// Build a gate outcome with the id's stock name and description
    #[must_use]
    pub fn new(id: GateId, passed: bool, details: impl Into<String>) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            description: id.description().to_string(),
            required: id.is_required(),
            passed,
            details: details.into(),
        }
    }

    /// Check if this gate blocks report generation
    #[inline]
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.required && !self.passed
    }
}

/// Full validation result, recomputed on every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub gates: Vec<Gate>,
    pub can_generate_report: bool,
    /// Rounded percentage of all gates passed
    pub completion_percentage: u8,
    pub missing_requirements: Vec<String>,
    pub advisories: Vec<String>,
}

impl ValidationReport {
    /// Assemble a report from evaluated gates
    #[must_use]
    pub fn from_gates(gates: Vec<Gate>) -> Self {
        let can_generate_report = gates.iter().all(|g| !g.is_blocking());
        let passed = gates.iter().filter(|g| g.passed).count();
        let completion_percentage = percentage(passed, gates.len());
        let missing_requirements = gates
            .iter()
            .filter(|g| g.is_blocking())
            .map(|g| g.details.clone())
            .collect();
        let advisories = gates
            .iter()
            .filter(|g| !g.required && !g.passed)
            .map(|g| g.details.clone())
            .collect();
        Self {
            gates,
            can_generate_report,
            completion_percentage,
            missing_requirements,
            advisories,
        }
    }

    /// Look up a gate by id
    #[must_use]
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id == id)
    }

    /// Check whether a gate passed; unknown ids count as failed
    #[must_use]
    pub fn passed(&self, id: GateId) -> bool {
        self.gate(id).is_some_and(|g| g.passed)
    }
}

/// Rounded `part / whole` as a percentage, 0 for an empty whole
fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (part * 200 + whole) / (whole * 2);
    u8::try_from(pct.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(0, 7), 0);
        assert_eq!(percentage(1, 7), 14);
        assert_eq!(percentage(4, 7), 57);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(7, 7), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn report_splits_required_and_advisory_failures() {
        let report = ValidationReport::from_gates(vec![
            Gate::new(GateId::RiskAssessed, true, "ok"),
            Gate::new(GateId::MitigationPairs, false, "need pairs"),
            Gate::new(GateId::LifecycleCoverage, false, "cover more stages"),
        ]);

        assert!(!report.can_generate_report);
        assert_eq!(report.completion_percentage, 33);
        assert_eq!(report.missing_requirements, vec!["need pairs".to_string()]);
        assert_eq!(report.advisories, vec!["cover more stages".to_string()]);
        assert!(report.passed(GateId::RiskAssessed));
        assert!(!report.passed(GateId::HighRiskMitigated));
    }

    #[test]
    fn gate_ids_serialize_kebab_case() {
        assert_eq!(
            serde_json::to_string(&GateId::HighRiskMitigated).unwrap(),
            "\"high-risk-mitigated\""
        );
        for id in GateId::REPORT {
            assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{id}\""));
        }
    }
}
