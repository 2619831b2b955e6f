//! CVSS v3.0 and v3.1 scoring
//!
//! v3.0 uses a plain ceiling for Roundup, v3.1 the integer-scaled Roundup.
//! v3.1 also changed the modified-impact equation for a changed scope.

pub mod metrics;

pub use metrics::{weight_of, Metrics};

use crate::codec::{self, strip_any_prefix, ParseMode};
use crate::result::{FormulaScores, ScoreResult, SubScores};
use crate::rounding::{roundup_v30, roundup_v31};
use forgescore_core::{CvssVersion, Result, Severity};
use metrics::{
    exploit_maturity_weight, remediation_level_weight, report_confidence_weight,
    requirement_weight, Scope,
};

/// Serialize v3.x metrics with the `CVSS:3.x/` prefix of `version`
pub fn generate(metrics: &Metrics, version: CvssVersion) -> String {
    let version = match version {
        CvssVersion::V30 => CvssVersion::V30,
        _ => CvssVersion::V31,
    };
    format!(
        "{}{}",
        version.prefix().unwrap_or_default(),
        codec::generate_body(metrics)
    )
}

/// Parse a v3.x vector, with or without its version prefix
pub fn parse(vector: &str, mode: ParseMode) -> Result<Metrics> {
    codec::parse_body(strip_any_prefix(vector.trim()), mode)
}

fn roundup(version: CvssVersion, value: f64) -> f64 {
    match version {
        CvssVersion::V30 => roundup_v30(value),
        _ => roundup_v31(value),
    }
}

fn impact_subscore(iss: f64, scope: Scope) -> f64 {
    match scope {
        Scope::Unchanged => 6.42 * iss,
        Scope::Changed => 7.52 * (iss - 0.029) - 3.25 * (iss - 0.02).powi(15),
    }
}

fn modified_impact_subscore(miss: f64, scope: Scope, version: CvssVersion) -> f64 {
    match (scope, version) {
        (Scope::Unchanged, _) => 6.42 * miss,
        (Scope::Changed, CvssVersion::V30) => 7.52 * (miss - 0.029) - 3.25 * (miss - 0.02).powi(15),
        (Scope::Changed, _) => 7.52 * (miss - 0.029) - 3.25 * (miss * 0.9731 - 0.02).powi(13),
    }
}

/// Combine impact and exploitability, capping at 10 before rounding
fn combine(version: CvssVersion, impact: f64, exploitability: f64, scope: Scope) -> f64 {
    if impact <= 0.0 {
        return 0.0;
    }
    let total = match scope {
        Scope::Unchanged => impact + exploitability,
        Scope::Changed => 1.08 * (impact + exploitability),
    };
    roundup(version, total.min(10.0))
}

/// Score v3.x metrics with the rounding and equations of `version`.
///
/// Any version other than v3.0 is scored as v3.1.
pub fn calculate(metrics: &Metrics, version: CvssVersion) -> ScoreResult {
    let version = match version {
        CvssVersion::V30 => CvssVersion::V30,
        _ => CvssVersion::V31,
    };

    let iss = 1.0
        - (1.0 - metrics.confidentiality.weight())
            * (1.0 - metrics.integrity.weight())
            * (1.0 - metrics.availability.weight());
    let impact = impact_subscore(iss, metrics.scope);
    let exploitability = 8.22
        * metrics.attack_vector.weight()
        * metrics.attack_complexity.weight()
        * metrics.privileges_required.weight(metrics.scope)
        * metrics.user_interaction.weight();
    let base_score = combine(version, impact, exploitability, metrics.scope);

    let temporal_multiplier = exploit_maturity_weight(metrics.exploit_code_maturity)
        * remediation_level_weight(metrics.remediation_level)
        * report_confidence_weight(metrics.report_confidence);

    let temporal_score = metrics
        .has_temporal()
        .then(|| roundup(version, base_score * temporal_multiplier));

    let (environmental_score, modified_impact) = if metrics.has_environmental() {
        let scope = metrics.effective_scope();
        let miss = (1.0
            - (1.0
                - requirement_weight(metrics.confidentiality_requirement)
                    * metrics.effective_confidentiality().weight())
                * (1.0
                    - requirement_weight(metrics.integrity_requirement)
                        * metrics.effective_integrity().weight())
                * (1.0
                    - requirement_weight(metrics.availability_requirement)
                        * metrics.effective_availability().weight()))
        .min(0.915);
        let modified_impact = modified_impact_subscore(miss, scope, version);
        let modified_exploitability = 8.22
            * metrics.effective_attack_vector().weight()
            * metrics.effective_attack_complexity().weight()
            * metrics.effective_privileges_required().weight(scope)
            * metrics.effective_user_interaction().weight();

        let environmental = if modified_impact <= 0.0 {
            0.0
        } else {
            let modified_base = combine(version, modified_impact, modified_exploitability, scope);
            roundup(version, modified_base * temporal_multiplier)
        };
        (
            Some(environmental),
            Some(roundup(version, modified_impact.max(0.0))),
        )
    } else {
        (None, None)
    };

    let score = environmental_score.or(temporal_score).unwrap_or(base_score);

    ScoreResult {
        version,
        score,
        severity: Severity::from_score(score),
        vector: generate(metrics, version),
        sub_scores: SubScores::Formula(FormulaScores {
            base_score,
            impact: roundup(version, impact.max(0.0)),
            exploitability: roundup(version, exploitability),
            temporal_score,
            environmental_score,
            modified_impact,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(vector: &str) -> ScoreResult {
        let version = if vector.starts_with("CVSS:3.0/") {
            CvssVersion::V30
        } else {
            CvssVersion::V31
        };
        calculate(&parse(vector, ParseMode::Strict).unwrap(), version)
    }

    fn formula(result: &ScoreResult) -> &FormulaScores {
        match &result.sub_scores {
            SubScores::Formula(scores) => scores,
            other => panic!("unexpected sub-scores {:?}", other),
        }
    }

    #[test]
    fn test_critical_network_vector() {
        let result = score("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H");
        assert_eq!(result.score, 9.8);
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.vector, "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H");
        let scores = formula(&result);
        assert_eq!(scores.impact, 5.9);
        assert_eq!(scores.exploitability, 3.9);
    }

    #[test]
    fn test_changed_scope_caps_at_ten() {
        let result = score("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:H/I:H/A:H");
        assert_eq!(result.score, 10.0);
        assert_eq!(result.severity, Severity::Critical);
    }

    #[test]
    fn test_reference_base_scores() {
        assert_eq!(score("CVSS:3.1/AV:N/AC:L/PR:N/UI:R/S:C/C:L/I:L/A:N").score, 6.1);
        assert_eq!(score("CVSS:3.1/AV:L/AC:L/PR:L/UI:N/S:U/C:H/I:H/A:H").score, 7.8);
        assert_eq!(score("CVSS:3.0/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H").score, 9.8);
    }

    #[test]
    fn test_no_impact_scores_zero() {
        let result = score("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:N/I:N/A:N");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.severity, Severity::None);
        assert_eq!(formula(&result).impact, 0.0);
    }

    #[test]
    fn test_temporal_score() {
        let result = score("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H/E:P/RL:O/RC:C");
        let scores = formula(&result);
        assert_eq!(scores.base_score, 9.8);
        assert_eq!(scores.temporal_score, Some(8.8));
        assert_eq!(scores.environmental_score, None);
        assert_eq!(result.score, 8.8);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn test_environmental_score_with_low_requirements() {
        let result = score("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H/CR:L/IR:L/AR:L");
        let scores = formula(&result);
        assert_eq!(scores.environmental_score, Some(8.0));
        assert_eq!(result.score, 8.0);
    }

    #[test]
    fn test_modified_metrics_override_base() {
        // Environment removes every impact
        let result = score("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H/MC:N/MI:N/MA:N");
        assert_eq!(formula(&result).base_score, 9.8);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.severity, Severity::None);
    }

    #[test]
    fn test_generate_keeps_version_prefix() {
        let metrics = parse("CVSS:3.0/AV:L/AC:H/PR:H/UI:R/S:U/C:L/I:N/A:N/E:X", ParseMode::Strict)
            .unwrap();
        assert_eq!(
            generate(&metrics, CvssVersion::V30),
            "CVSS:3.0/AV:L/AC:H/PR:H/UI:R/S:U/C:L/I:N/A:N"
        );
    }

    #[test]
    fn test_strict_parse_rejects_unknown_value() {
        assert!(parse("CVSS:3.1/AV:Z/AC:L", ParseMode::Strict).is_err());
        let lenient = parse("CVSS:3.1/AV:Z/AC:L", ParseMode::Lenient).unwrap();
        assert_eq!(lenient.attack_vector, metrics::AttackVector::Physical);
        assert_eq!(lenient.attack_complexity, metrics::AttackComplexity::Low);
    }
}
