//! CVSS v2.0 metric model

use crate::codec::{legal, optional, optional_str, required, MetricSet, MetricValue};
use forgescore_core::{Error, Result};

/// Sentinel for an undefined temporal or environmental metric
pub const NOT_DEFINED: &str = "ND";

/// Metric codes in canonical vector order
pub const METRIC_CODES: &[&str] = &[
    "AV", "AC", "Au", "C", "I", "A", "E", "RL", "RC", "CDP", "TD", "CR", "IR", "AR",
];

pub const BASE_CODES: &[&str] = &["AV", "AC", "Au", "C", "I", "A"];
pub const TEMPORAL_CODES: &[&str] = &["E", "RL", "RC"];
pub const ENVIRONMENTAL_CODES: &[&str] = &["CDP", "TD", "CR", "IR", "AR"];

metric_value! {
    pub enum AccessVector {
        Local = "L",
        AdjacentNetwork = "A",
        Network = "N",
    }
}

impl AccessVector {
    pub fn weight(&self) -> f64 {
        match self {
            AccessVector::Local => 0.395,
            AccessVector::AdjacentNetwork => 0.646,
            AccessVector::Network => 1.0,
        }
    }
}

metric_value! {
    pub enum AccessComplexity {
        High = "H",
        Medium = "M",
        Low = "L",
    }
}

impl AccessComplexity {
    pub fn weight(&self) -> f64 {
        match self {
            AccessComplexity::High => 0.35,
            AccessComplexity::Medium => 0.61,
            AccessComplexity::Low => 0.71,
        }
    }
}

metric_value! {
    pub enum Authentication {
        Multiple = "M",
        Single = "S",
        None = "N",
    }
}

impl Authentication {
    pub fn weight(&self) -> f64 {
        match self {
            Authentication::Multiple => 0.45,
            Authentication::Single => 0.56,
            Authentication::None => 0.704,
        }
    }
}

metric_value! {
    /// Confidentiality, integrity and availability impact
    pub enum Impact {
        None = "N",
        Partial = "P",
        Complete = "C",
    }
}

impl Impact {
    pub fn weight(&self) -> f64 {
        match self {
            Impact::None => 0.0,
            Impact::Partial => 0.275,
            Impact::Complete => 0.660,
        }
    }
}

metric_value! {
    pub enum Exploitability {
        Unproven = "U",
        ProofOfConcept = "POC",
        Functional = "F",
        High = "H",
    }
}

impl Exploitability {
    pub fn weight(&self) -> f64 {
        match self {
            Exploitability::Unproven => 0.85,
            Exploitability::ProofOfConcept => 0.9,
            Exploitability::Functional => 0.95,
            Exploitability::High => 1.0,
        }
    }
}

metric_value! {
    pub enum RemediationLevel {
        OfficialFix = "OF",
        TemporaryFix = "TF",
        Workaround = "W",
        Unavailable = "U",
    }
}

impl RemediationLevel {
    pub fn weight(&self) -> f64 {
        match self {
            RemediationLevel::OfficialFix => 0.87,
            RemediationLevel::TemporaryFix => 0.90,
            RemediationLevel::Workaround => 0.95,
            RemediationLevel::Unavailable => 1.0,
        }
    }
}

metric_value! {
    pub enum ReportConfidence {
        Unconfirmed = "UC",
        Uncorroborated = "UR",
        Confirmed = "C",
    }
}

impl ReportConfidence {
    pub fn weight(&self) -> f64 {
        match self {
            ReportConfidence::Unconfirmed => 0.90,
            ReportConfidence::Uncorroborated => 0.95,
            ReportConfidence::Confirmed => 1.0,
        }
    }
}

metric_value! {
    pub enum CollateralDamagePotential {
        None = "N",
        Low = "L",
        LowMedium = "LM",
        MediumHigh = "MH",
        High = "H",
    }
}

impl CollateralDamagePotential {
    pub fn weight(&self) -> f64 {
        match self {
            CollateralDamagePotential::None => 0.0,
            CollateralDamagePotential::Low => 0.1,
            CollateralDamagePotential::LowMedium => 0.3,
            CollateralDamagePotential::MediumHigh => 0.4,
            CollateralDamagePotential::High => 0.5,
        }
    }
}

metric_value! {
    pub enum TargetDistribution {
        None = "N",
        Low = "L",
        Medium = "M",
        High = "H",
    }
}

impl TargetDistribution {
    pub fn weight(&self) -> f64 {
        match self {
            TargetDistribution::None => 0.0,
            TargetDistribution::Low => 0.25,
            TargetDistribution::Medium => 0.75,
            TargetDistribution::High => 1.0,
        }
    }
}

metric_value! {
    /// Confidentiality, integrity and availability requirement
    pub enum SecurityRequirement {
        Low = "L",
        Medium = "M",
        High = "H",
    }
}

impl SecurityRequirement {
    pub fn weight(&self) -> f64 {
        match self {
            SecurityRequirement::Low => 0.5,
            SecurityRequirement::Medium => 1.0,
            SecurityRequirement::High => 1.51,
        }
    }
}

// "ND" is neutral for every multiplier except CDP, where it adds nothing.

pub(crate) fn exploitability_weight(value: Option<Exploitability>) -> f64 {
    value.map_or(1.0, |v| v.weight())
}

pub(crate) fn remediation_level_weight(value: Option<RemediationLevel>) -> f64 {
    value.map_or(1.0, |v| v.weight())
}

pub(crate) fn report_confidence_weight(value: Option<ReportConfidence>) -> f64 {
    value.map_or(1.0, |v| v.weight())
}

pub(crate) fn collateral_damage_weight(value: Option<CollateralDamagePotential>) -> f64 {
    value.map_or(0.0, |v| v.weight())
}

pub(crate) fn target_distribution_weight(value: Option<TargetDistribution>) -> f64 {
    value.map_or(1.0, |v| v.weight())
}

pub(crate) fn requirement_weight(value: Option<SecurityRequirement>) -> f64 {
    value.map_or(1.0, |v| v.weight())
}

/// CVSS v2.0 metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Metrics {
    pub access_vector: AccessVector,
    pub access_complexity: AccessComplexity,
    pub authentication: Authentication,
    pub confidentiality: Impact,
    pub integrity: Impact,
    pub availability: Impact,

    pub exploitability: Option<Exploitability>,
    pub remediation_level: Option<RemediationLevel>,
    pub report_confidence: Option<ReportConfidence>,

    pub collateral_damage_potential: Option<CollateralDamagePotential>,
    pub target_distribution: Option<TargetDistribution>,
    pub confidentiality_requirement: Option<SecurityRequirement>,
    pub integrity_requirement: Option<SecurityRequirement>,
    pub availability_requirement: Option<SecurityRequirement>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::least_impact()
    }
}

impl Metrics {
    /// Whether any temporal metric is defined
    pub fn has_temporal(&self) -> bool {
        self.exploitability.is_some()
            || self.remediation_level.is_some()
            || self.report_confidence.is_some()
    }

    /// Whether any environmental metric is defined
    pub fn has_environmental(&self) -> bool {
        self.collateral_damage_potential.is_some()
            || self.target_distribution.is_some()
            || self.confidentiality_requirement.is_some()
            || self.integrity_requirement.is_some()
            || self.availability_requirement.is_some()
    }
}

impl MetricSet for Metrics {
    const METRIC_CODES: &'static [&'static str] = METRIC_CODES;
    const BASE_CODES: &'static [&'static str] = BASE_CODES;
    const NOT_DEFINED: &'static str = NOT_DEFINED;

    fn least_impact() -> Self {
        Self {
            access_vector: AccessVector::Local,
            access_complexity: AccessComplexity::High,
            authentication: Authentication::Multiple,
            confidentiality: Impact::None,
            integrity: Impact::None,
            availability: Impact::None,
            exploitability: None,
            remediation_level: None,
            report_confidence: None,
            collateral_damage_potential: None,
            target_distribution: None,
            confidentiality_requirement: None,
            integrity_requirement: None,
            availability_requirement: None,
        }
    }

    fn get(&self, code: &str) -> Option<&'static str> {
        let value = match code {
            "AV" => self.access_vector.as_str(),
            "AC" => self.access_complexity.as_str(),
            "Au" => self.authentication.as_str(),
            "C" => self.confidentiality.as_str(),
            "I" => self.integrity.as_str(),
            "A" => self.availability.as_str(),
            "E" => optional_str(self.exploitability, NOT_DEFINED),
            "RL" => optional_str(self.remediation_level, NOT_DEFINED),
            "RC" => optional_str(self.report_confidence, NOT_DEFINED),
            "CDP" => optional_str(self.collateral_damage_potential, NOT_DEFINED),
            "TD" => optional_str(self.target_distribution, NOT_DEFINED),
            "CR" => optional_str(self.confidentiality_requirement, NOT_DEFINED),
            "IR" => optional_str(self.integrity_requirement, NOT_DEFINED),
            "AR" => optional_str(self.availability_requirement, NOT_DEFINED),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, code: &str, value: &str) -> Result<bool> {
        match code {
            "AV" => self.access_vector = required(code, value)?,
            "AC" => self.access_complexity = required(code, value)?,
            "Au" => self.authentication = required(code, value)?,
            "C" => self.confidentiality = required(code, value)?,
            "I" => self.integrity = required(code, value)?,
            "A" => self.availability = required(code, value)?,
            "E" => self.exploitability = optional(code, value, NOT_DEFINED)?,
            "RL" => self.remediation_level = optional(code, value, NOT_DEFINED)?,
            "RC" => self.report_confidence = optional(code, value, NOT_DEFINED)?,
            "CDP" => self.collateral_damage_potential = optional(code, value, NOT_DEFINED)?,
            "TD" => self.target_distribution = optional(code, value, NOT_DEFINED)?,
            "CR" => self.confidentiality_requirement = optional(code, value, NOT_DEFINED)?,
            "IR" => self.integrity_requirement = optional(code, value, NOT_DEFINED)?,
            "AR" => self.availability_requirement = optional(code, value, NOT_DEFINED)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn legal_values(code: &str) -> Option<Vec<&'static str>> {
        let nd = Some(NOT_DEFINED);
        let values = match code {
            "AV" => legal::<AccessVector>(None),
            "AC" => legal::<AccessComplexity>(None),
            "Au" => legal::<Authentication>(None),
            "C" | "I" | "A" => legal::<Impact>(None),
            "E" => legal::<Exploitability>(nd),
            "RL" => legal::<RemediationLevel>(nd),
            "RC" => legal::<ReportConfidence>(nd),
            "CDP" => legal::<CollateralDamagePotential>(nd),
            "TD" => legal::<TargetDistribution>(nd),
            "CR" | "IR" | "AR" => legal::<SecurityRequirement>(nd),
            _ => return None,
        };
        Some(values)
    }
}

/// Numeric weight of a v2.0 metric value
pub fn weight_of(code: &str, value: &str) -> Result<f64> {
    let unknown = || Error::unknown_value(code, value);
    let weight = match code {
        "AV" => required::<AccessVector>(code, value)?.weight(),
        "AC" => required::<AccessComplexity>(code, value)?.weight(),
        "Au" => required::<Authentication>(code, value)?.weight(),
        "C" | "I" | "A" => required::<Impact>(code, value)?.weight(),
        "E" => exploitability_weight(optional(code, value, NOT_DEFINED)?),
        "RL" => remediation_level_weight(optional(code, value, NOT_DEFINED)?),
        "RC" => report_confidence_weight(optional(code, value, NOT_DEFINED)?),
        "CDP" => collateral_damage_weight(optional(code, value, NOT_DEFINED)?),
        "TD" => target_distribution_weight(optional(code, value, NOT_DEFINED)?),
        "CR" | "IR" | "AR" => requirement_weight(optional(code, value, NOT_DEFINED)?),
        _ => return Err(unknown()),
    };
    Ok(weight)
}
