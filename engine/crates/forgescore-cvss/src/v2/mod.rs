//! CVSS v2.0 scoring
//!
//! Base, temporal and environmental equations from the CVSS v2 guide.
//! Scores are rounded to one decimal with [`round_to_tenth`].

pub mod metrics;

pub use metrics::{weight_of, Metrics};

use crate::codec::{self, strip_any_prefix, ParseMode};
use crate::result::{FormulaScores, ScoreResult, SubScores};
use crate::rounding::round_to_tenth;
use forgescore_core::{CvssVersion, Result, Severity};
use metrics::{
    collateral_damage_weight, exploitability_weight, remediation_level_weight,
    report_confidence_weight, requirement_weight, target_distribution_weight,
};

/// Serialize v2.0 metrics to their canonical vector (no prefix)
pub fn generate(metrics: &Metrics) -> String {
    codec::generate_body(metrics)
}

/// Parse a v2.0 vector.
///
/// Accepts the NVD parenthesized form and tolerates a leading `CVSS:` tag.
pub fn parse(vector: &str, mode: ParseMode) -> Result<Metrics> {
    let trimmed = vector.trim();
    let body = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);
    codec::parse_body(strip_any_prefix(body), mode)
}

fn impact_equation(c: f64, i: f64, a: f64) -> f64 {
    10.41 * (1.0 - (1.0 - c) * (1.0 - i) * (1.0 - a))
}

fn exploitability_equation(metrics: &Metrics) -> f64 {
    20.0
        * metrics.access_vector.weight()
        * metrics.access_complexity.weight()
        * metrics.authentication.weight()
}

fn base_equation(impact: f64, exploitability: f64) -> f64 {
    let f_impact = if impact == 0.0 { 0.0 } else { 1.176 };
    round_to_tenth(((0.6 * impact) + (0.4 * exploitability) - 1.5) * f_impact)
}

fn temporal_multiplier(metrics: &Metrics) -> f64 {
    exploitability_weight(metrics.exploitability)
        * remediation_level_weight(metrics.remediation_level)
        * report_confidence_weight(metrics.report_confidence)
}

/// Score v2.0 metrics.
///
/// The reported score is the environmental score when environmental metrics
/// are defined, else the temporal score when temporal metrics are defined,
/// else the base score.
pub fn calculate(metrics: &Metrics) -> ScoreResult {
    let c = metrics.confidentiality.weight();
    let i = metrics.integrity.weight();
    let a = metrics.availability.weight();

    let impact = impact_equation(c, i, a);
    let exploitability = exploitability_equation(metrics);
    let base_score = base_equation(impact, exploitability);

    let temporal_score = metrics
        .has_temporal()
        .then(|| round_to_tenth(base_score * temporal_multiplier(metrics)));

    let (environmental_score, modified_impact) = if metrics.has_environmental() {
        let adjusted_impact = impact_equation(
            c * requirement_weight(metrics.confidentiality_requirement),
            i * requirement_weight(metrics.integrity_requirement),
            a * requirement_weight(metrics.availability_requirement),
        )
        .min(10.0);
        let adjusted_base = base_equation(adjusted_impact, exploitability);
        let adjusted_temporal = round_to_tenth(adjusted_base * temporal_multiplier(metrics));
        let cdp = collateral_damage_weight(metrics.collateral_damage_potential);
        let td = target_distribution_weight(metrics.target_distribution);
        let environmental =
            round_to_tenth((adjusted_temporal + (10.0 - adjusted_temporal) * cdp) * td);
        (Some(environmental), Some(round_to_tenth(adjusted_impact)))
    } else {
        (None, None)
    };

    let score = environmental_score.or(temporal_score).unwrap_or(base_score);

    ScoreResult {
        version: CvssVersion::V2,
        score,
        severity: Severity::from_v2_score(score),
        vector: generate(metrics),
        sub_scores: SubScores::Formula(FormulaScores {
            base_score,
            impact: round_to_tenth(impact),
            exploitability: round_to_tenth(exploitability),
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
        calculate(&parse(vector, ParseMode::Strict).unwrap())
    }

    fn formula(result: &ScoreResult) -> &FormulaScores {
        match &result.sub_scores {
            SubScores::Formula(scores) => scores,
            other => panic!("unexpected sub-scores {:?}", other),
        }
    }

    #[test]
    fn test_complete_network_compromise() {
        let result = score("AV:N/AC:L/Au:N/C:C/I:C/A:C");
        assert_eq!(result.score, 10.0);
        assert_eq!(result.severity, Severity::High);
        let scores = formula(&result);
        assert_eq!(scores.impact, 10.0);
        assert_eq!(scores.exploitability, 10.0);
        assert_eq!(scores.temporal_score, None);
    }

    #[test]
    fn test_reference_base_scores() {
        assert_eq!(score("AV:N/AC:L/Au:N/C:P/I:P/A:P").score, 7.5);
        assert_eq!(score("AV:N/AC:M/Au:N/C:N/I:P/A:N").score, 4.3);
        assert_eq!(score("AV:L/AC:L/Au:N/C:C/I:C/A:C").score, 7.2);
        assert_eq!(score("AV:N/AC:L/Au:N/C:N/I:N/A:C").score, 7.8);
    }

    #[test]
    fn test_no_impact_scores_zero() {
        let result = score("AV:N/AC:L/Au:N/C:N/I:N/A:N");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.severity, Severity::None);
    }

    #[test]
    fn test_temporal_score() {
        // CVE-2002-0392 example from the v2 guide
        let result = score("AV:N/AC:L/Au:N/C:N/I:N/A:C/E:F/RL:OF/RC:C");
        let scores = formula(&result);
        assert_eq!(scores.base_score, 7.8);
        assert_eq!(scores.temporal_score, Some(6.4));
        assert_eq!(result.score, 6.4);
    }

    #[test]
    fn test_environmental_score() {
        let result = score("AV:N/AC:L/Au:N/C:N/I:N/A:C/E:F/CDP:MH/TD:H/AR:H");
        let scores = formula(&result);
        assert_eq!(scores.temporal_score, Some(7.4));
        assert_eq!(scores.modified_impact, Some(10.0));
        assert_eq!(scores.environmental_score, Some(9.7));
        assert_eq!(result.score, 9.7);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn test_target_distribution_none_zeroes_environmental() {
        let result = score("AV:N/AC:L/Au:N/C:C/I:C/A:C/TD:N");
        assert_eq!(result.score, 0.0);
        assert_eq!(formula(&result).base_score, 10.0);
    }

    #[test]
    fn test_parse_parenthesized_and_generate() {
        let metrics = parse("(AV:N/AC:L/Au:N/C:P/I:P/A:P)", ParseMode::Strict).unwrap();
        assert_eq!(generate(&metrics), "AV:N/AC:L/Au:N/C:P/I:P/A:P");
    }

    #[test]
    fn test_generate_skips_not_defined() {
        let metrics = parse("AV:N/AC:L/Au:N/C:P/I:P/A:P/E:ND/RL:W", ParseMode::Strict).unwrap();
        assert_eq!(generate(&metrics), "AV:N/AC:L/Au:N/C:P/I:P/A:P/RL:W");
    }
}
