//! CVSS v3.0 / v3.1 metric model
//!
//! Both minor versions share codes and weights; they differ only in
//! rounding and the modified-impact equation.

use crate::codec::{legal, optional, optional_str, required, MetricSet, MetricValue};
use forgescore_core::{Error, Result};

/// Sentinel for an undefined temporal or environmental metric
pub const NOT_DEFINED: &str = "X";

/// Metric codes in canonical vector order
pub const METRIC_CODES: &[&str] = &[
    "AV", "AC", "PR", "UI", "S", "C", "I", "A", "E", "RL", "RC", "CR", "IR", "AR", "MAV", "MAC",
    "MPR", "MUI", "MS", "MC", "MI", "MA",
];

pub const BASE_CODES: &[&str] = &["AV", "AC", "PR", "UI", "S", "C", "I", "A"];
pub const TEMPORAL_CODES: &[&str] = &["E", "RL", "RC"];
pub const ENVIRONMENTAL_CODES: &[&str] = &[
    "CR", "IR", "AR", "MAV", "MAC", "MPR", "MUI", "MS", "MC", "MI", "MA",
];

metric_value! {
    pub enum AttackVector {
        Network = "N",
        Adjacent = "A",
        Local = "L",
        Physical = "P",
    }
}

impl AttackVector {
    pub fn weight(&self) -> f64 {
        match self {
            AttackVector::Network => 0.85,
            AttackVector::Adjacent => 0.62,
            AttackVector::Local => 0.55,
            AttackVector::Physical => 0.2,
        }
    }
}

metric_value! {
    pub enum AttackComplexity {
        Low = "L",
        High = "H",
    }
}

impl AttackComplexity {
    pub fn weight(&self) -> f64 {
        match self {
            AttackComplexity::Low => 0.77,
            AttackComplexity::High => 0.44,
        }
    }
}

metric_value! {
    pub enum PrivilegesRequired {
        None = "N",
        Low = "L",
        High = "H",
    }
}

impl PrivilegesRequired {
    /// Weight depends on whether the scope changed
    pub fn weight(&self, scope: Scope) -> f64 {
        match (self, scope) {
            (PrivilegesRequired::None, _) => 0.85,
            (PrivilegesRequired::Low, Scope::Unchanged) => 0.62,
            (PrivilegesRequired::Low, Scope::Changed) => 0.68,
            (PrivilegesRequired::High, Scope::Unchanged) => 0.27,
            (PrivilegesRequired::High, Scope::Changed) => 0.5,
        }
    }
}

metric_value! {
    pub enum UserInteraction {
        None = "N",
        Required = "R",
    }
}

impl UserInteraction {
    pub fn weight(&self) -> f64 {
        match self {
            UserInteraction::None => 0.85,
            UserInteraction::Required => 0.62,
        }
    }
}

metric_value! {
    pub enum Scope {
        Unchanged = "U",
        Changed = "C",
    }
}

metric_value! {
    /// Confidentiality, integrity and availability impact
    pub enum Impact {
        High = "H",
        Low = "L",
        None = "N",
    }
}

impl Impact {
    pub fn weight(&self) -> f64 {
        match self {
            Impact::High => 0.56,
            Impact::Low => 0.22,
            Impact::None => 0.0,
        }
    }
}

metric_value! {
    pub enum ExploitCodeMaturity {
        High = "H",
        Functional = "F",
        ProofOfConcept = "P",
        Unproven = "U",
    }
}

impl ExploitCodeMaturity {
    pub fn weight(&self) -> f64 {
        match self {
            ExploitCodeMaturity::High => 1.0,
            ExploitCodeMaturity::Functional => 0.97,
            ExploitCodeMaturity::ProofOfConcept => 0.94,
            ExploitCodeMaturity::Unproven => 0.91,
        }
    }
}

metric_value! {
    pub enum RemediationLevel {
        Unavailable = "U",
        Workaround = "W",
        TemporaryFix = "T",
        OfficialFix = "O",
    }
}

impl RemediationLevel {
    pub fn weight(&self) -> f64 {
        match self {
            RemediationLevel::Unavailable => 1.0,
            RemediationLevel::Workaround => 0.97,
            RemediationLevel::TemporaryFix => 0.96,
            RemediationLevel::OfficialFix => 0.95,
        }
    }
}

metric_value! {
    pub enum ReportConfidence {
        Confirmed = "C",
        Reasonable = "R",
        Unknown = "U",
    }
}

impl ReportConfidence {
    pub fn weight(&self) -> f64 {
        match self {
            ReportConfidence::Confirmed => 1.0,
            ReportConfidence::Reasonable => 0.96,
            ReportConfidence::Unknown => 0.92,
        }
    }
}

metric_value! {
    /// Confidentiality, integrity and availability requirement
    pub enum SecurityRequirement {
        High = "H",
        Medium = "M",
        Low = "L",
    }
}

impl SecurityRequirement {
    pub fn weight(&self) -> f64 {
        match self {
            SecurityRequirement::High => 1.5,
            SecurityRequirement::Medium => 1.0,
            SecurityRequirement::Low => 0.5,
        }
    }
}

pub(crate) fn exploit_maturity_weight(value: Option<ExploitCodeMaturity>) -> f64 {
    value.map_or(1.0, |v| v.weight())
}

pub(crate) fn remediation_level_weight(value: Option<RemediationLevel>) -> f64 {
    value.map_or(1.0, |v| v.weight())
}

pub(crate) fn report_confidence_weight(value: Option<ReportConfidence>) -> f64 {
    value.map_or(1.0, |v| v.weight())
}

pub(crate) fn requirement_weight(value: Option<SecurityRequirement>) -> f64 {
    value.map_or(1.0, |v| v.weight())
}

/// CVSS v3.x metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Metrics {
    pub attack_vector: AttackVector,
    pub attack_complexity: AttackComplexity,
    pub privileges_required: PrivilegesRequired,
    pub user_interaction: UserInteraction,
    pub scope: Scope,
    pub confidentiality: Impact,
    pub integrity: Impact,
    pub availability: Impact,

    pub exploit_code_maturity: Option<ExploitCodeMaturity>,
    pub remediation_level: Option<RemediationLevel>,
    pub report_confidence: Option<ReportConfidence>,

    pub confidentiality_requirement: Option<SecurityRequirement>,
    pub integrity_requirement: Option<SecurityRequirement>,
    pub availability_requirement: Option<SecurityRequirement>,
    pub modified_attack_vector: Option<AttackVector>,
    pub modified_attack_complexity: Option<AttackComplexity>,
    pub modified_privileges_required: Option<PrivilegesRequired>,
    pub modified_user_interaction: Option<UserInteraction>,
    pub modified_scope: Option<Scope>,
    pub modified_confidentiality: Option<Impact>,
    pub modified_integrity: Option<Impact>,
    pub modified_availability: Option<Impact>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::least_impact()
    }
}

impl Metrics {
    /// Whether any temporal metric is defined
    pub fn has_temporal(&self) -> bool {
        self.exploit_code_maturity.is_some()
            || self.remediation_level.is_some()
            || self.report_confidence.is_some()
    }

    /// Whether any environmental metric is defined
    pub fn has_environmental(&self) -> bool {
        self.confidentiality_requirement.is_some()
            || self.integrity_requirement.is_some()
            || self.availability_requirement.is_some()
            || self.modified_attack_vector.is_some()
            || self.modified_attack_complexity.is_some()
            || self.modified_privileges_required.is_some()
            || self.modified_user_interaction.is_some()
            || self.modified_scope.is_some()
            || self.modified_confidentiality.is_some()
            || self.modified_integrity.is_some()
            || self.modified_availability.is_some()
    }

    pub(crate) fn effective_attack_vector(&self) -> AttackVector {
        self.modified_attack_vector.unwrap_or(self.attack_vector)
    }

    pub(crate) fn effective_attack_complexity(&self) -> AttackComplexity {
        self.modified_attack_complexity.unwrap_or(self.attack_complexity)
    }

    pub(crate) fn effective_privileges_required(&self) -> PrivilegesRequired {
        self.modified_privileges_required.unwrap_or(self.privileges_required)
    }

    pub(crate) fn effective_user_interaction(&self) -> UserInteraction {
        self.modified_user_interaction.unwrap_or(self.user_interaction)
    }

    pub(crate) fn effective_scope(&self) -> Scope {
        self.modified_scope.unwrap_or(self.scope)
    }

    pub(crate) fn effective_confidentiality(&self) -> Impact {
        self.modified_confidentiality.unwrap_or(self.confidentiality)
    }

    pub(crate) fn effective_integrity(&self) -> Impact {
        self.modified_integrity.unwrap_or(self.integrity)
    }

    pub(crate) fn effective_availability(&self) -> Impact {
        self.modified_availability.unwrap_or(self.availability)
    }
}

impl MetricSet for Metrics {
    const METRIC_CODES: &'static [&'static str] = METRIC_CODES;
    const BASE_CODES: &'static [&'static str] = BASE_CODES;
    const NOT_DEFINED: &'static str = NOT_DEFINED;

    fn least_impact() -> Self {
        Self {
            attack_vector: AttackVector::Physical,
            attack_complexity: AttackComplexity::High,
            privileges_required: PrivilegesRequired::High,
            user_interaction: UserInteraction::Required,
            scope: Scope::Unchanged,
            confidentiality: Impact::None,
            integrity: Impact::None,
            availability: Impact::None,
            exploit_code_maturity: None,
            remediation_level: None,
            report_confidence: None,
            confidentiality_requirement: None,
            integrity_requirement: None,
            availability_requirement: None,
            modified_attack_vector: None,
            modified_attack_complexity: None,
            modified_privileges_required: None,
            modified_user_interaction: None,
            modified_scope: None,
            modified_confidentiality: None,
            modified_integrity: None,
            modified_availability: None,
        }
    }

    fn get(&self, code: &str) -> Option<&'static str> {
        let value = match code {
            "AV" => self.attack_vector.as_str(),
            "AC" => self.attack_complexity.as_str(),
            "PR" => self.privileges_required.as_str(),
            "UI" => self.user_interaction.as_str(),
            "S" => self.scope.as_str(),
            "C" => self.confidentiality.as_str(),
            "I" => self.integrity.as_str(),
            "A" => self.availability.as_str(),
            "E" => optional_str(self.exploit_code_maturity, NOT_DEFINED),
            "RL" => optional_str(self.remediation_level, NOT_DEFINED),
            "RC" => optional_str(self.report_confidence, NOT_DEFINED),
            "CR" => optional_str(self.confidentiality_requirement, NOT_DEFINED),
            "IR" => optional_str(self.integrity_requirement, NOT_DEFINED),
            "AR" => optional_str(self.availability_requirement, NOT_DEFINED),
            "MAV" => optional_str(self.modified_attack_vector, NOT_DEFINED),
            "MAC" => optional_str(self.modified_attack_complexity, NOT_DEFINED),
            "MPR" => optional_str(self.modified_privileges_required, NOT_DEFINED),
            "MUI" => optional_str(self.modified_user_interaction, NOT_DEFINED),
            "MS" => optional_str(self.modified_scope, NOT_DEFINED),
            "MC" => optional_str(self.modified_confidentiality, NOT_DEFINED),
            "MI" => optional_str(self.modified_integrity, NOT_DEFINED),
            "MA" => optional_str(self.modified_availability, NOT_DEFINED),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, code: &str, value: &str) -> Result<bool> {
        match code {
            "AV" => self.attack_vector = required(code, value)?,
            "AC" => self.attack_complexity = required(code, value)?,
            "PR" => self.privileges_required = required(code, value)?,
            "UI" => self.user_interaction = required(code, value)?,
            "S" => self.scope = required(code, value)?,
            "C" => self.confidentiality = required(code, value)?,
            "I" => self.integrity = required(code, value)?,
            "A" => self.availability = required(code, value)?,
            "E" => self.exploit_code_maturity = optional(code, value, NOT_DEFINED)?,
            "RL" => self.remediation_level = optional(code, value, NOT_DEFINED)?,
            "RC" => self.report_confidence = optional(code, value, NOT_DEFINED)?,
            "CR" => self.confidentiality_requirement = optional(code, value, NOT_DEFINED)?,
            "IR" => self.integrity_requirement = optional(code, value, NOT_DEFINED)?,
            "AR" => self.availability_requirement = optional(code, value, NOT_DEFINED)?,
            "MAV" => self.modified_attack_vector = optional(code, value, NOT_DEFINED)?,
            "MAC" => self.modified_attack_complexity = optional(code, value, NOT_DEFINED)?,
            "MPR" => self.modified_privileges_required = optional(code, value, NOT_DEFINED)?,
            "MUI" => self.modified_user_interaction = optional(code, value, NOT_DEFINED)?,
            "MS" => self.modified_scope = optional(code, value, NOT_DEFINED)?,
            "MC" => self.modified_confidentiality = optional(code, value, NOT_DEFINED)?,
            "MI" => self.modified_integrity = optional(code, value, NOT_DEFINED)?,
            "MA" => self.modified_availability = optional(code, value, NOT_DEFINED)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn legal_values(code: &str) -> Option<Vec<&'static str>> {
        let x = Some(NOT_DEFINED);
        let values = match code {
            "AV" => legal::<AttackVector>(None),
            "AC" => legal::<AttackComplexity>(None),
            "PR" => legal::<PrivilegesRequired>(None),
            "UI" => legal::<UserInteraction>(None),
            "S" => legal::<Scope>(None),
            "C" | "I" | "A" => legal::<Impact>(None),
            "E" => legal::<ExploitCodeMaturity>(x),
            "RL" => legal::<RemediationLevel>(x),
            "RC" => legal::<ReportConfidence>(x),
            "CR" | "IR" | "AR" => legal::<SecurityRequirement>(x),
            "MAV" => legal::<AttackVector>(x),
            "MAC" => legal::<AttackComplexity>(x),
            "MPR" => legal::<PrivilegesRequired>(x),
            "MUI" => legal::<UserInteraction>(x),
            "MS" => legal::<Scope>(x),
            "MC" | "MI" | "MA" => legal::<Impact>(x),
            _ => return None,
        };
        Some(values)
    }
}

/// Numeric weight of a v3.x metric value.
///
/// Privileges Required is weighted for an unchanged scope. Scope has no
/// weight of its own.
pub fn weight_of(code: &str, value: &str) -> Result<f64> {
    let weight = match code {
        "AV" | "MAV" => required::<AttackVector>(code, value)?.weight(),
        "AC" | "MAC" => required::<AttackComplexity>(code, value)?.weight(),
        "PR" | "MPR" => required::<PrivilegesRequired>(code, value)?.weight(Scope::Unchanged),
        "UI" | "MUI" => required::<UserInteraction>(code, value)?.weight(),
        "C" | "I" | "A" | "MC" | "MI" | "MA" => required::<Impact>(code, value)?.weight(),
        "E" => exploit_maturity_weight(optional(code, value, NOT_DEFINED)?),
        "RL" => remediation_level_weight(optional(code, value, NOT_DEFINED)?),
        "RC" => report_confidence_weight(optional(code, value, NOT_DEFINED)?),
        "CR" | "IR" | "AR" => requirement_weight(optional(code, value, NOT_DEFINED)?),
        _ => return Err(Error::unknown_value(code, value)),
    };
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_lookup() {
        assert_eq!(weight_of("AV", "N").unwrap(), 0.85);
        assert_eq!(weight_of("PR", "L").unwrap(), 0.62);
        assert_eq!(weight_of("C", "H").unwrap(), 0.56);
        assert_eq!(weight_of("E", "X").unwrap(), 1.0);
        assert_eq!(weight_of("RC", "R").unwrap(), 0.96);
        assert_eq!(weight_of("CR", "H").unwrap(), 1.5);
    }

    #[test]
    fn test_privileges_follow_scope() {
        assert_eq!(PrivilegesRequired::Low.weight(Scope::Changed), 0.68);
        assert_eq!(PrivilegesRequired::High.weight(Scope::Changed), 0.5);
        assert_eq!(PrivilegesRequired::None.weight(Scope::Changed), 0.85);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!(matches!(
            weight_of("AV", "Q"),
            Err(Error::UnknownMetricValue { .. })
        ));
        assert!(weight_of("S", "U").is_err());
        assert!(weight_of("Au", "N").is_err());
    }

    #[test]
    fn test_every_code_round_trips_through_get_and_set() {
        for code in METRIC_CODES {
            for value in Metrics::legal_values(code).unwrap() {
                let mut metrics = Metrics::least_impact();
                assert!(metrics.set(code, value).unwrap());
                assert_eq!(metrics.get(code), Some(value));
            }
        }
    }

    #[test]
    fn test_modified_metrics_fall_back_to_base() {
        let mut metrics = Metrics::least_impact();
        assert_eq!(metrics.effective_attack_vector(), AttackVector::Physical);
        metrics.set("MAV", "N").unwrap();
        assert_eq!(metrics.effective_attack_vector(), AttackVector::Network);
    }
}
