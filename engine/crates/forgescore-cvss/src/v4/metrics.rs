//! CVSS v4.0 metric model
//!
//! Besides the vector codes, every value that takes part in scoring carries
//! an ordinal severity level. Levels are what the MacroVector interpolation
//! measures distances with; lower is more severe.

use crate::codec::{legal, optional, optional_str, required, MetricSet, MetricValue};
use forgescore_core::{Error, Result};

/// Sentinel for an undefined threat, environmental or supplemental metric
pub const NOT_DEFINED: &str = "X";

/// Metric codes in canonical vector order
pub const METRIC_CODES: &[&str] = &[
    "AV", "AC", "AT", "PR", "UI", "VC", "VI", "VA", "SC", "SI", "SA", "E", "CR", "IR", "AR",
    "MAV", "MAC", "MAT", "MPR", "MUI", "MVC", "MVI", "MVA", "MSC", "MSI", "MSA", "S", "AU", "R",
    "V", "RE", "U",
];

pub const BASE_CODES: &[&str] = &[
    "AV", "AC", "AT", "PR", "UI", "VC", "VI", "VA", "SC", "SI", "SA",
];
pub const THREAT_CODES: &[&str] = &["E"];
pub const ENVIRONMENTAL_CODES: &[&str] = &[
    "CR", "IR", "AR", "MAV", "MAC", "MAT", "MPR", "MUI", "MVC", "MVI", "MVA", "MSC", "MSI", "MSA",
];
pub const SUPPLEMENTAL_CODES: &[&str] = &["S", "AU", "R", "V", "RE", "U"];

metric_value! {
    pub enum AttackVector {
        Network = "N",
        Adjacent = "A",
        Local = "L",
        Physical = "P",
    }
}

impl AttackVector {
    pub fn level(&self) -> f64 {
        match self {
            AttackVector::Network => 0.0,
            AttackVector::Adjacent => 0.1,
            AttackVector::Local => 0.2,
            AttackVector::Physical => 0.3,
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
    pub fn level(&self) -> f64 {
        match self {
            AttackComplexity::Low => 0.0,
            AttackComplexity::High => 0.1,
        }
    }
}

metric_value! {
    pub enum AttackRequirements {
        None = "N",
        Present = "P",
    }
}

impl AttackRequirements {
    pub fn level(&self) -> f64 {
        match self {
            AttackRequirements::None => 0.0,
            AttackRequirements::Present => 0.1,
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
    pub fn level(&self) -> f64 {
        match self {
            PrivilegesRequired::None => 0.0,
            PrivilegesRequired::Low => 0.1,
            PrivilegesRequired::High => 0.2,
        }
    }
}

metric_value! {
    pub enum UserInteraction {
        None = "N",
        Passive = "P",
        Active = "A",
    }
}

impl UserInteraction {
    pub fn level(&self) -> f64 {
        match self {
            UserInteraction::None => 0.0,
            UserInteraction::Passive => 0.1,
            UserInteraction::Active => 0.2,
        }
    }
}

metric_value! {
    /// Impact on the vulnerable or a subsequent system
    pub enum Impact {
        High = "H",
        Low = "L",
        None = "N",
    }
}

impl Impact {
    /// Level as a vulnerable-system impact (VC, VI, VA)
    pub fn vulnerable_level(&self) -> f64 {
        match self {
            Impact::High => 0.0,
            Impact::Low => 0.1,
            Impact::None => 0.2,
        }
    }

    /// Level as subsequent-system confidentiality (SC)
    pub fn subsequent_level(&self) -> f64 {
        match self {
            Impact::High => 0.1,
            Impact::Low => 0.2,
            Impact::None => 0.3,
        }
    }
}

metric_value! {
    /// Modified subsequent integrity and availability, which add Safety
    pub enum SubsequentImpact {
        Safety = "S",
        High = "H",
        Low = "L",
        None = "N",
    }
}

impl SubsequentImpact {
    pub fn level(&self) -> f64 {
        match self {
            SubsequentImpact::Safety => 0.0,
            SubsequentImpact::High => 0.1,
            SubsequentImpact::Low => 0.2,
            SubsequentImpact::None => 0.3,
        }
    }
}

impl From<Impact> for SubsequentImpact {
    fn from(impact: Impact) -> Self {
        match impact {
            Impact::High => SubsequentImpact::High,
            Impact::Low => SubsequentImpact::Low,
            Impact::None => SubsequentImpact::None,
        }
    }
}

metric_value! {
    pub enum ExploitMaturity {
        Attacked = "A",
        ProofOfConcept = "P",
        Unreported = "U",
    }
}

impl ExploitMaturity {
    pub fn level(&self) -> f64 {
        match self {
            ExploitMaturity::Attacked => 0.0,
            ExploitMaturity::ProofOfConcept => 0.1,
            ExploitMaturity::Unreported => 0.2,
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
    pub fn level(&self) -> f64 {
        match self {
            SecurityRequirement::High => 0.0,
            SecurityRequirement::Medium => 0.1,
            SecurityRequirement::Low => 0.2,
        }
    }
}

metric_value! {
    pub enum Safety {
        Negligible = "N",
        Present = "P",
    }
}

metric_value! {
    pub enum Automatable {
        No = "N",
        Yes = "Y",
    }
}

metric_value! {
    pub enum Recovery {
        Automatic = "A",
        User = "U",
        Irrecoverable = "I",
    }
}

metric_value! {
    pub enum ValueDensity {
        Diffuse = "D",
        Concentrated = "C",
    }
}

metric_value! {
    pub enum ResponseEffort {
        Low = "L",
        Moderate = "M",
        High = "H",
    }
}

metric_value! {
    pub enum ProviderUrgency {
        Clear = "Clear",
        Green = "Green",
        Amber = "Amber",
        Red = "Red",
    }
}

/// CVSS v4.0 metrics.
///
/// Supplemental metrics are carried through parsing and generation but never
/// change the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Metrics {
    pub attack_vector: AttackVector,
    pub attack_complexity: AttackComplexity,
    pub attack_requirements: AttackRequirements,
    pub privileges_required: PrivilegesRequired,
    pub user_interaction: UserInteraction,
    pub vulnerable_confidentiality: Impact,
    pub vulnerable_integrity: Impact,
    pub vulnerable_availability: Impact,
    pub subsequent_confidentiality: Impact,
    pub subsequent_integrity: Impact,
    pub subsequent_availability: Impact,

    pub exploit_maturity: Option<ExploitMaturity>,

    pub confidentiality_requirement: Option<SecurityRequirement>,
    pub integrity_requirement: Option<SecurityRequirement>,
    pub availability_requirement: Option<SecurityRequirement>,
    pub modified_attack_vector: Option<AttackVector>,
    pub modified_attack_complexity: Option<AttackComplexity>,
    pub modified_attack_requirements: Option<AttackRequirements>,
    pub modified_privileges_required: Option<PrivilegesRequired>,
    pub modified_user_interaction: Option<UserInteraction>,
    pub modified_vulnerable_confidentiality: Option<Impact>,
    pub modified_vulnerable_integrity: Option<Impact>,
    pub modified_vulnerable_availability: Option<Impact>,
    pub modified_subsequent_confidentiality: Option<Impact>,
    pub modified_subsequent_integrity: Option<SubsequentImpact>,
    pub modified_subsequent_availability: Option<SubsequentImpact>,

    pub safety: Option<Safety>,
    pub automatable: Option<Automatable>,
    pub recovery: Option<Recovery>,
    pub value_density: Option<ValueDensity>,
    pub response_effort: Option<ResponseEffort>,
    pub provider_urgency: Option<ProviderUrgency>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::least_impact()
    }
}

/// Values that scoring actually uses, after applying modified metrics and
/// the defaults for undefined threat and requirement metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Effective {
    pub av: AttackVector,
    pub ac: AttackComplexity,
    pub at: AttackRequirements,
    pub pr: PrivilegesRequired,
    pub ui: UserInteraction,
    pub vc: Impact,
    pub vi: Impact,
    pub va: Impact,
    pub sc: Impact,
    pub si: SubsequentImpact,
    pub sa: SubsequentImpact,
    pub e: ExploitMaturity,
    pub cr: SecurityRequirement,
    pub ir: SecurityRequirement,
    pub ar: SecurityRequirement,
}

impl Metrics {
    /// Whether the threat metric (E) is defined
    pub fn has_threat(&self) -> bool {
        self.exploit_maturity.is_some()
    }

    /// Whether any environmental metric is defined
    pub fn has_environmental(&self) -> bool {
        self.confidentiality_requirement.is_some()
            || self.integrity_requirement.is_some()
            || self.availability_requirement.is_some()
            || self.modified_attack_vector.is_some()
            || self.modified_attack_complexity.is_some()
            || self.modified_attack_requirements.is_some()
            || self.modified_privileges_required.is_some()
            || self.modified_user_interaction.is_some()
            || self.modified_vulnerable_confidentiality.is_some()
            || self.modified_vulnerable_integrity.is_some()
            || self.modified_vulnerable_availability.is_some()
            || self.modified_subsequent_confidentiality.is_some()
            || self.modified_subsequent_integrity.is_some()
            || self.modified_subsequent_availability.is_some()
    }

    pub(crate) fn effective(&self) -> Effective {
        Effective {
            av: self.modified_attack_vector.unwrap_or(self.attack_vector),
            ac: self.modified_attack_complexity.unwrap_or(self.attack_complexity),
            at: self.modified_attack_requirements.unwrap_or(self.attack_requirements),
            pr: self.modified_privileges_required.unwrap_or(self.privileges_required),
            ui: self.modified_user_interaction.unwrap_or(self.user_interaction),
            vc: self
                .modified_vulnerable_confidentiality
                .unwrap_or(self.vulnerable_confidentiality),
            vi: self.modified_vulnerable_integrity.unwrap_or(self.vulnerable_integrity),
            va: self
                .modified_vulnerable_availability
                .unwrap_or(self.vulnerable_availability),
            sc: self
                .modified_subsequent_confidentiality
                .unwrap_or(self.subsequent_confidentiality),
            si: self
                .modified_subsequent_integrity
                .unwrap_or_else(|| self.subsequent_integrity.into()),
            sa: self
                .modified_subsequent_availability
                .unwrap_or_else(|| self.subsequent_availability.into()),
            e: self.exploit_maturity.unwrap_or(ExploitMaturity::Attacked),
            cr: self
                .confidentiality_requirement
                .unwrap_or(SecurityRequirement::High),
            ir: self.integrity_requirement.unwrap_or(SecurityRequirement::High),
            ar: self.availability_requirement.unwrap_or(SecurityRequirement::High),
        }
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
            attack_requirements: AttackRequirements::Present,
            privileges_required: PrivilegesRequired::High,
            user_interaction: UserInteraction::Active,
            vulnerable_confidentiality: Impact::None,
            vulnerable_integrity: Impact::None,
            vulnerable_availability: Impact::None,
            subsequent_confidentiality: Impact::None,
            subsequent_integrity: Impact::None,
            subsequent_availability: Impact::None,
            exploit_maturity: None,
            confidentiality_requirement: None,
            integrity_requirement: None,
            availability_requirement: None,
            modified_attack_vector: None,
            modified_attack_complexity: None,
            modified_attack_requirements: None,
            modified_privileges_required: None,
            modified_user_interaction: None,
            modified_vulnerable_confidentiality: None,
            modified_vulnerable_integrity: None,
            modified_vulnerable_availability: None,
            modified_subsequent_confidentiality: None,
            modified_subsequent_integrity: None,
            modified_subsequent_availability: None,
            safety: None,
            automatable: None,
            recovery: None,
            value_density: None,
            response_effort: None,
            provider_urgency: None,
        }
    }

    fn get(&self, code: &str) -> Option<&'static str> {
        let value = match code {
            "AV" => self.attack_vector.as_str(),
            "AC" => self.attack_complexity.as_str(),
            "AT" => self.attack_requirements.as_str(),
            "PR" => self.privileges_required.as_str(),
            "UI" => self.user_interaction.as_str(),
            "VC" => self.vulnerable_confidentiality.as_str(),
            "VI" => self.vulnerable_integrity.as_str(),
            "VA" => self.vulnerable_availability.as_str(),
            "SC" => self.subsequent_confidentiality.as_str(),
            "SI" => self.subsequent_integrity.as_str(),
            "SA" => self.subsequent_availability.as_str(),
            "E" => optional_str(self.exploit_maturity, NOT_DEFINED),
            "CR" => optional_str(self.confidentiality_requirement, NOT_DEFINED),
            "IR" => optional_str(self.integrity_requirement, NOT_DEFINED),
            "AR" => optional_str(self.availability_requirement, NOT_DEFINED),
            "MAV" => optional_str(self.modified_attack_vector, NOT_DEFINED),
            "MAC" => optional_str(self.modified_attack_complexity, NOT_DEFINED),
            "MAT" => optional_str(self.modified_attack_requirements, NOT_DEFINED),
            "MPR" => optional_str(self.modified_privileges_required, NOT_DEFINED),
            "MUI" => optional_str(self.modified_user_interaction, NOT_DEFINED),
            "MVC" => optional_str(self.modified_vulnerable_confidentiality, NOT_DEFINED),
            "MVI" => optional_str(self.modified_vulnerable_integrity, NOT_DEFINED),
            "MVA" => optional_str(self.modified_vulnerable_availability, NOT_DEFINED),
            "MSC" => optional_str(self.modified_subsequent_confidentiality, NOT_DEFINED),
            "MSI" => optional_str(self.modified_subsequent_integrity, NOT_DEFINED),
            "MSA" => optional_str(self.modified_subsequent_availability, NOT_DEFINED),
            "S" => optional_str(self.safety, NOT_DEFINED),
            "AU" => optional_str(self.automatable, NOT_DEFINED),
            "R" => optional_str(self.recovery, NOT_DEFINED),
            "V" => optional_str(self.value_density, NOT_DEFINED),
            "RE" => optional_str(self.response_effort, NOT_DEFINED),
            "U" => optional_str(self.provider_urgency, NOT_DEFINED),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, code: &str, value: &str) -> Result<bool> {
        match code {
            "AV" => self.attack_vector = required(code, value)?,
            "AC" => self.attack_complexity = required(code, value)?,
            "AT" => self.attack_requirements = required(code, value)?,
            "PR" => self.privileges_required = required(code, value)?,
            "UI" => self.user_interaction = required(code, value)?,
            "VC" => self.vulnerable_confidentiality = required(code, value)?,
            "VI" => self.vulnerable_integrity = required(code, value)?,
            "VA" => self.vulnerable_availability = required(code, value)?,
            "SC" => self.subsequent_confidentiality = required(code, value)?,
            "SI" => self.subsequent_integrity = required(code, value)?,
            "SA" => self.subsequent_availability = required(code, value)?,
            "E" => self.exploit_maturity = optional(code, value, NOT_DEFINED)?,
            "CR" => self.confidentiality_requirement = optional(code, value, NOT_DEFINED)?,
            "IR" => self.integrity_requirement = optional(code, value, NOT_DEFINED)?,
            "AR" => self.availability_requirement = optional(code, value, NOT_DEFINED)?,
            "MAV" => self.modified_attack_vector = optional(code, value, NOT_DEFINED)?,
            "MAC" => self.modified_attack_complexity = optional(code, value, NOT_DEFINED)?,
            "MAT" => self.modified_attack_requirements = optional(code, value, NOT_DEFINED)?,
            "MPR" => self.modified_privileges_required = optional(code, value, NOT_DEFINED)?,
            "MUI" => self.modified_user_interaction = optional(code, value, NOT_DEFINED)?,
            "MVC" => {
                self.modified_vulnerable_confidentiality = optional(code, value, NOT_DEFINED)?
            }
            "MVI" => self.modified_vulnerable_integrity = optional(code, value, NOT_DEFINED)?,
            "MVA" => {
                self.modified_vulnerable_availability = optional(code, value, NOT_DEFINED)?
            }
            "MSC" => {
                self.modified_subsequent_confidentiality = optional(code, value, NOT_DEFINED)?
            }
            "MSI" => self.modified_subsequent_integrity = optional(code, value, NOT_DEFINED)?,
            "MSA" => {
                self.modified_subsequent_availability = optional(code, value, NOT_DEFINED)?
            }
            "S" => self.safety = optional(code, value, NOT_DEFINED)?,
            "AU" => self.automatable = optional(code, value, NOT_DEFINED)?,
            "R" => self.recovery = optional(code, value, NOT_DEFINED)?,
            "V" => self.value_density = optional(code, value, NOT_DEFINED)?,
            "RE" => self.response_effort = optional(code, value, NOT_DEFINED)?,
            "U" => self.provider_urgency = optional(code, value, NOT_DEFINED)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn legal_values(code: &str) -> Option<Vec<&'static str>> {
        let x = Some(NOT_DEFINED);
        let values = match code {
            "AV" => legal::<AttackVector>(None),
            "AC" => legal::<AttackComplexity>(None),
            "AT" => legal::<AttackRequirements>(None),
            "PR" => legal::<PrivilegesRequired>(None),
            "UI" => legal::<UserInteraction>(None),
            "VC" | "VI" | "VA" | "SC" | "SI" | "SA" => legal::<Impact>(None),
            "E" => legal::<ExploitMaturity>(x),
            "CR" | "IR" | "AR" => legal::<SecurityRequirement>(x),
            "MAV" => legal::<AttackVector>(x),
            "MAC" => legal::<AttackComplexity>(x),
            "MAT" => legal::<AttackRequirements>(x),
            "MPR" => legal::<PrivilegesRequired>(x),
            "MUI" => legal::<UserInteraction>(x),
            "MVC" | "MVI" | "MVA" | "MSC" => legal::<Impact>(x),
            "MSI" | "MSA" => legal::<SubsequentImpact>(x),
            "S" => legal::<Safety>(x),
            "AU" => legal::<Automatable>(x),
            "R" => legal::<Recovery>(x),
            "V" => legal::<ValueDensity>(x),
            "RE" => legal::<ResponseEffort>(x),
            "U" => legal::<ProviderUrgency>(x),
            _ => return None,
        };
        Some(values)
    }
}

/// Ordinal severity level of a v4.0 metric value.
///
/// Undefined threat and requirement metrics take the level of their worst
/// case (E:A, CR/IR/AR:H). Supplemental metrics have no level.
pub fn level_of(code: &str, value: &str) -> Result<f64> {
    let level = match code {
        "AV" | "MAV" => required::<AttackVector>(code, value)?.level(),
        "AC" | "MAC" => required::<AttackComplexity>(code, value)?.level(),
        "AT" | "MAT" => required::<AttackRequirements>(code, value)?.level(),
        "PR" | "MPR" => required::<PrivilegesRequired>(code, value)?.level(),
        "UI" | "MUI" => required::<UserInteraction>(code, value)?.level(),
        "VC" | "VI" | "VA" | "MVC" | "MVI" | "MVA" => {
            required::<Impact>(code, value)?.vulnerable_level()
        }
        "SC" | "MSC" => required::<Impact>(code, value)?.subsequent_level(),
        "SI" | "SA" => SubsequentImpact::from(required::<Impact>(code, value)?).level(),
        "MSI" | "MSA" => required::<SubsequentImpact>(code, value)?.level(),
        "E" => optional::<ExploitMaturity>(code, value, NOT_DEFINED)?
            .unwrap_or(ExploitMaturity::Attacked)
            .level(),
        "CR" | "IR" | "AR" => optional::<SecurityRequirement>(code, value, NOT_DEFINED)?
            .unwrap_or(SecurityRequirement::High)
            .level(),
        _ => return Err(Error::unknown_value(code, value)),
    };
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_of("AV", "P").unwrap(), 0.3);
        assert_eq!(level_of("VC", "N").unwrap(), 0.2);
        assert_eq!(level_of("SC", "H").unwrap(), 0.1);
        assert_eq!(level_of("SI", "H").unwrap(), 0.1);
        assert_eq!(level_of("MSI", "S").unwrap(), 0.0);
        assert_eq!(level_of("E", "X").unwrap(), 0.0);
        assert_eq!(level_of("CR", "L").unwrap(), 0.2);
    }

    #[test]
    fn test_safety_only_on_modified_subsequent_metrics() {
        assert!(level_of("SI", "S").is_err());
        let mut metrics = Metrics::least_impact();
        assert!(metrics.set("SI", "S").is_err());
        assert!(metrics.set("MSI", "S").unwrap());
        assert_eq!(metrics.effective().si, SubsequentImpact::Safety);
    }

    #[test]
    fn test_supplemental_metrics_have_no_level() {
        assert!(level_of("AU", "Y").is_err());
        assert!(level_of("U", "Red").is_err());
    }

    #[test]
    fn test_effective_defaults() {
        let effective = Metrics::least_impact().effective();
        assert_eq!(effective.e, ExploitMaturity::Attacked);
        assert_eq!(effective.cr, SecurityRequirement::High);
        assert_eq!(effective.si, SubsequentImpact::None);
        assert_eq!(effective.av, AttackVector::Physical);
    }

    #[test]
    fn test_modified_metrics_override_base() {
        let mut metrics = Metrics::least_impact();
        metrics.set("MAV", "N").unwrap();
        metrics.set("MVC", "H").unwrap();
        let effective = metrics.effective();
        assert_eq!(effective.av, AttackVector::Network);
        assert_eq!(effective.vc, Impact::High);
        assert!(metrics.has_environmental());
        assert!(!metrics.has_threat());
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
}
