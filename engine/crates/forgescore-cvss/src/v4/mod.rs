//! CVSS v4.0 scoring
//!
//! v4.0 has no closed-form equation. Metrics are reduced to a six digit
//! MacroVector whose score comes from a published table, and that score is
//! then lowered in proportion to how far the metrics sit from the most
//! severe vector of their equivalence classes.

pub mod metrics;
mod tables;

pub use metrics::{level_of, Metrics};

use crate::codec::{self, ParseMode};
use crate::result::{MacroVectorScores, ScoreResult, SubScores};
use crate::rounding::round_to_tenth;
use forgescore_core::{CvssVersion, Error, Result, Severity};
use metrics::{
    AttackComplexity, AttackRequirements, AttackVector, Effective, ExploitMaturity, Impact,
    PrivilegesRequired, SecurityRequirement, SubsequentImpact, UserInteraction,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

const STEP: f64 = 0.1;

/// Equivalence-class levels EQ1 through EQ6.
///
/// Serialized as its six digit string, e.g. `"000200"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacroVector {
    pub eq1: u8,
    pub eq2: u8,
    pub eq3: u8,
    pub eq4: u8,
    pub eq5: u8,
    pub eq6: u8,
}

impl MacroVector {
    /// Reported for metrics without any impact, which score 0.0 without a lookup
    pub const NO_IMPACT: MacroVector = MacroVector {
        eq1: 2,
        eq2: 2,
        eq3: 2,
        eq4: 2,
        eq5: 2,
        eq6: 0,
    };

    /// Classify metrics into their MacroVector
    pub fn of(metrics: &Metrics) -> Self {
        Self::classify(&metrics.effective())
    }

    fn classify(eff: &Effective) -> Self {
        let av_n = eff.av == AttackVector::Network;
        let pr_n = eff.pr == PrivilegesRequired::None;
        let ui_n = eff.ui == UserInteraction::None;
        let eq1 = if av_n && pr_n && ui_n {
            0
        } else if (av_n || pr_n || ui_n) && eff.av != AttackVector::Physical {
            1
        } else {
            2
        };

        let eq2 = if eff.ac == AttackComplexity::Low && eff.at == AttackRequirements::None {
            0
        } else {
            1
        };

        let eq3 = if eff.vc == Impact::High && eff.vi == Impact::High {
            0
        } else if eff.vc == Impact::High || eff.vi == Impact::High || eff.va == Impact::High {
            1
        } else {
            2
        };

        let eq4 = if eff.si == SubsequentImpact::Safety || eff.sa == SubsequentImpact::Safety {
            0
        } else if eff.sc == Impact::High
            || eff.si == SubsequentImpact::High
            || eff.sa == SubsequentImpact::High
        {
            1
        } else {
            2
        };

        let eq5 = match eff.e {
            ExploitMaturity::Attacked => 0,
            ExploitMaturity::ProofOfConcept => 1,
            ExploitMaturity::Unreported => 2,
        };

        let high = SecurityRequirement::High;
        let eq6 = if (eff.cr == high && eff.vc == Impact::High)
            || (eff.ir == high && eff.vi == Impact::High)
            || (eff.ar == high && eff.va == Impact::High)
        {
            0
        } else {
            1
        };

        Self {
            eq1,
            eq2,
            eq3,
            eq4,
            eq5,
            eq6,
        }
    }

    /// Score of this MacroVector from the lookup table
    pub fn score(&self) -> Option<f64> {
        tables::lookup(&self.to_string())
    }

    fn bumped(self, f: impl FnOnce(&mut Self)) -> Option<f64> {
        let mut next = self;
        f(&mut next);
        next.score()
    }
}

impl fmt::Display for MacroVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}{}",
            self.eq1, self.eq2, self.eq3, self.eq4, self.eq5, self.eq6
        )
    }
}

impl FromStr for MacroVector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits: Vec<u8> = s
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| Error::InvalidMacroVector(s.to_string()))?;
        match digits.as_slice() {
            &[eq1, eq2, eq3, eq4, eq5, eq6] => Ok(Self {
                eq1,
                eq2,
                eq3,
                eq4,
                eq5,
                eq6,
            }),
            _ => Err(Error::InvalidMacroVector(s.to_string())),
        }
    }
}

impl TryFrom<String> for MacroVector {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MacroVector> for String {
    fn from(value: MacroVector) -> Self {
        value.to_string()
    }
}

/// Which metric groups contributed to a v4.0 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nomenclature {
    #[serde(rename = "CVSS-B")]
    Base,
    #[serde(rename = "CVSS-BT")]
    BaseThreat,
    #[serde(rename = "CVSS-BE")]
    BaseEnvironmental,
    #[serde(rename = "CVSS-BTE")]
    BaseThreatEnvironmental,
}

impl Nomenclature {
    pub fn of(metrics: &Metrics) -> Self {
        match (metrics.has_threat(), metrics.has_environmental()) {
            (false, false) => Nomenclature::Base,
            (true, false) => Nomenclature::BaseThreat,
            (false, true) => Nomenclature::BaseEnvironmental,
            (true, true) => Nomenclature::BaseThreatEnvironmental,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Nomenclature::Base => "CVSS-B",
            Nomenclature::BaseThreat => "CVSS-BT",
            Nomenclature::BaseEnvironmental => "CVSS-BE",
            Nomenclature::BaseThreatEnvironmental => "CVSS-BTE",
        }
    }
}

impl fmt::Display for Nomenclature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize v4.0 metrics with the `CVSS:4.0/` prefix
pub fn generate(metrics: &Metrics) -> String {
    let prefix = CvssVersion::V40.prefix().unwrap_or_default();
    format!("{}{}", prefix, codec::generate_body(metrics))
}

/// Parse a v4.0 vector. The `CVSS:4.0/` prefix is mandatory.
pub fn parse(vector: &str, mode: ParseMode) -> Result<Metrics> {
    let prefix = CvssVersion::V40.prefix().unwrap_or_default();
    let trimmed = vector.trim();
    let body = if trimmed == prefix.trim_end_matches('/') {
        ""
    } else {
        trimmed.strip_prefix(prefix).ok_or_else(|| {
            Error::MalformedVector(format!("CVSS v4.0 vector must start with {:?}", prefix))
        })?
    };
    codec::parse_body(body, mode)
}

/// Summed level distances from the chosen most-severe vector, per class
#[derive(Debug, Default, Clone, Copy)]
struct Distances {
    eq1: f64,
    eq2: f64,
    eq3_eq6: f64,
    eq4: f64,
}

/// Measure the distance to the first most-severe vector that the metrics do
/// not exceed, falling back to the last candidate
fn distances(eff: &Effective, mv: &MacroVector) -> Distances {
    let mut chosen = Distances::default();

    'search: for (av, pr, ui) in tables::eq1_maxes(mv.eq1) {
        for (ac, at) in tables::eq2_maxes(mv.eq2) {
            for (vc, vi, va, cr, ir, ar) in tables::eq3_eq6_maxes(mv.eq3, mv.eq6) {
                for (sc, si, sa) in tables::eq4_maxes(mv.eq4) {
                    let each = [
                        eff.av.level() - av.level(),
                        eff.pr.level() - pr.level(),
                        eff.ui.level() - ui.level(),
                        eff.ac.level() - ac.level(),
                        eff.at.level() - at.level(),
                        eff.vc.vulnerable_level() - vc.vulnerable_level(),
                        eff.vi.vulnerable_level() - vi.vulnerable_level(),
                        eff.va.vulnerable_level() - va.vulnerable_level(),
                        eff.cr.level() - cr.level(),
                        eff.ir.level() - ir.level(),
                        eff.ar.level() - ar.level(),
                        eff.sc.subsequent_level() - sc.subsequent_level(),
                        eff.si.level() - si.level(),
                        eff.sa.level() - sa.level(),
                    ];
                    chosen = Distances {
                        eq1: each[0] + each[1] + each[2],
                        eq2: each[3] + each[4],
                        eq3_eq6: each[5..11].iter().sum(),
                        eq4: each[11] + each[12] + each[13],
                    };
                    if each.iter().all(|d| *d >= 0.0) {
                        break 'search;
                    }
                }
            }
        }
    }

    chosen
}

/// Score of the next lower MacroVector on the joint EQ3/EQ6 axis
fn eq3_eq6_lower(mv: MacroVector) -> Option<f64> {
    match (mv.eq3, mv.eq6) {
        (0, 0) => {
            let left = mv.bumped(|m| m.eq6 += 1);
            let right = mv.bumped(|m| m.eq3 += 1);
            match (left, right) {
                (Some(left), Some(right)) if left > right => Some(left),
                (left, right) => right.or(left),
            }
        }
        (0, 1) | (1, 1) => mv.bumped(|m| m.eq3 += 1),
        (1, 0) => mv.bumped(|m| m.eq6 += 1),
        _ => mv.bumped(|m| {
            m.eq3 += 1;
            m.eq6 += 1;
        }),
    }
}

fn interpolate(eff: &Effective, mv: MacroVector, value: f64) -> f64 {
    let dist = distances(eff, &mv);

    // (score of next lower MacroVector, distance, depth of the class)
    let neighbours = [
        (mv.bumped(|m| m.eq1 += 1), dist.eq1, tables::eq1_depth(mv.eq1)),
        (mv.bumped(|m| m.eq2 += 1), dist.eq2, tables::eq2_depth(mv.eq2)),
        (
            eq3_eq6_lower(mv),
            dist.eq3_eq6,
            tables::eq3_eq6_depth(mv.eq3, mv.eq6),
        ),
        (mv.bumped(|m| m.eq4 += 1), dist.eq4, tables::eq4_depth(mv.eq4)),
        // EQ5 has a depth of one step, so it only counts toward the mean
        (mv.bumped(|m| m.eq5 += 1), 0.0, 1.0),
    ];

    let (count, sum) = neighbours
        .iter()
        .filter_map(|(lower, distance, depth)| {
            lower.map(|lower| (value - lower) * (distance / (depth * STEP)))
        })
        .fold((0usize, 0.0), |(n, sum), normalized| (n + 1, sum + normalized));

    let mean = if count == 0 { 0.0 } else { sum / count as f64 };
    trace!(macro_vector = %mv, value, mean, neighbours = count, "Interpolated MacroVector score");

    round_to_tenth((value - mean).clamp(0.0, 10.0))
}

/// Score v4.0 metrics.
///
/// Fails with `InvalidMacroVector` only if the computed MacroVector is
/// missing from the lookup table.
pub fn calculate(metrics: &Metrics) -> Result<ScoreResult> {
    let eff = metrics.effective();
    let nomenclature = Nomenclature::of(metrics);

    let no_impact = [eff.vc, eff.vi, eff.va, eff.sc]
        .iter()
        .all(|i| *i == Impact::None)
        && eff.si == SubsequentImpact::None
        && eff.sa == SubsequentImpact::None;

    let (score, macro_vector) = if no_impact {
        (0.0, MacroVector::NO_IMPACT)
    } else {
        let mv = MacroVector::classify(&eff);
        let value = mv
            .score()
            .ok_or_else(|| Error::InvalidMacroVector(mv.to_string()))?;
        (interpolate(&eff, mv, value), mv)
    };

    Ok(ScoreResult {
        version: CvssVersion::V40,
        score,
        severity: Severity::from_score(score),
        vector: generate(metrics),
        sub_scores: SubScores::MacroVector(MacroVectorScores {
            macro_vector,
            nomenclature,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(vector: &str) -> ScoreResult {
        calculate(&parse(vector, ParseMode::Strict).unwrap()).unwrap()
    }

    fn details(result: &ScoreResult) -> &MacroVectorScores {
        match &result.sub_scores {
            SubScores::MacroVector(scores) => scores,
            other => panic!("unexpected sub-scores {:?}", other),
        }
    }

    #[test]
    fn test_highest_severity_vector() {
        let result = score("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:H/SI:H/SA:H");
        assert_eq!(result.score, 10.0);
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(details(&result).macro_vector.to_string(), "000100");
        assert_eq!(details(&result).nomenclature, Nomenclature::Base);
    }

    #[test]
    fn test_no_subsequent_impact() {
        let result = score("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N");
        assert_eq!(result.score, 9.3);
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(details(&result).macro_vector.to_string(), "000200");
    }

    #[test]
    fn test_interpolation_lowers_local_vector() {
        let result = score("CVSS:4.0/AV:L/AC:L/AT:N/PR:L/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N");
        assert_eq!(details(&result).macro_vector.to_string(), "100200");
        assert_eq!(result.score, 8.5);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn test_threat_metric() {
        let result =
            score("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N/E:U");
        assert_eq!(result.score, 8.1);
        assert_eq!(details(&result).macro_vector.to_string(), "000220");
        assert_eq!(details(&result).nomenclature, Nomenclature::BaseThreat);
    }

    #[test]
    fn test_no_impact_short_circuits() {
        let result = score("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:N/VI:N/VA:N/SC:N/SI:N/SA:N");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.severity, Severity::None);
        assert_eq!(details(&result).macro_vector, MacroVector::NO_IMPACT);
        assert_eq!(details(&result).macro_vector.to_string(), "222220");
    }

    #[test]
    fn test_safety_impact_selects_eq4_zero() {
        let metrics = parse(
            "CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N/MSI:S",
            ParseMode::Strict,
        )
        .unwrap();
        assert_eq!(MacroVector::of(&metrics).eq4, 0);
        assert_eq!(
            Nomenclature::of(&metrics),
            Nomenclature::BaseEnvironmental
        );
    }

    #[test]
    fn test_eq1_classification() {
        let eq1 = |vector: &str| MacroVector::of(&parse(vector, ParseMode::Lenient).unwrap()).eq1;
        assert_eq!(eq1("CVSS:4.0/AV:N/PR:N/UI:N"), 0);
        assert_eq!(eq1("CVSS:4.0/AV:A/PR:N/UI:N"), 1);
        assert_eq!(eq1("CVSS:4.0/AV:N/PR:L/UI:P"), 1);
        assert_eq!(eq1("CVSS:4.0/AV:P/PR:N/UI:N"), 2);
        assert_eq!(eq1("CVSS:4.0/AV:L/PR:L/UI:P"), 2);
    }

    #[test]
    fn test_nomenclature_with_threat_and_environment() {
        let result = score(
            "CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N/E:A/CR:H",
        );
        assert_eq!(
            details(&result).nomenclature,
            Nomenclature::BaseThreatEnvironmental
        );
        assert_eq!(details(&result).nomenclature.to_string(), "CVSS-BTE");
    }

    #[test]
    fn test_prefix_is_required() {
        assert!(matches!(
            parse("AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N", ParseMode::Lenient),
            Err(Error::MalformedVector(_))
        ));
        assert!(parse("CVSS:3.1/AV:N", ParseMode::Lenient).is_err());
        assert_eq!(
            parse("CVSS:4.0", ParseMode::Strict).unwrap(),
            Metrics::default()
        );
    }

    #[test]
    fn test_generate_includes_supplemental_metrics() {
        let metrics = parse(
            "CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N/U:Amber/AU:Y",
            ParseMode::Strict,
        )
        .unwrap();
        assert_eq!(
            generate(&metrics),
            "CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N/AU:Y/U:Amber"
        );
        assert_eq!(score(&generate(&metrics)).score, 9.3);
    }

    #[test]
    fn test_macro_vector_string_form() {
        let mv: MacroVector = "102211".parse().unwrap();
        assert_eq!(mv.eq3, 2);
        assert_eq!(mv.score(), Some(2.1));
        assert!("10221".parse::<MacroVector>().is_err());
        assert!("10221x".parse::<MacroVector>().is_err());
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, "\"102211\"");
    }
}
