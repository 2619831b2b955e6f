//! CVSS calculator
//!
//! Front door for scoring: parses vector strings, dispatches to the engine
//! of their version and answers "what if" questions about single metrics.

use crate::codec::ParseMode;
use crate::metrics::{self, CvssMetrics};
use crate::result::ScoreResult;
use crate::rounding::round_to_tenth;
use forgescore_core::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Version-dispatching CVSS calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct CvssCalculator {
    mode: ParseMode,
}

/// Score change caused by setting one metric to one value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionImpact {
    pub code: String,
    pub value: String,
    /// Candidate score minus current score, one decimal
    pub delta: f64,
}

impl CvssCalculator {
    /// Create a calculator that parses leniently
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator with an explicit parse mode
    pub fn with_mode(mode: ParseMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Detect the version of a vector and parse it
    pub fn parse(&self, vector: &str) -> Result<CvssMetrics> {
        CvssMetrics::parse_with_mode(vector, self.mode)
    }

    /// Parse and score a vector string
    pub fn score_vector(&self, vector: &str) -> Result<ScoreResult> {
        let metrics = self.parse(vector)?;
        self.score(&metrics)
    }

    /// Score parsed metrics
    pub fn score(&self, metrics: &CvssMetrics) -> Result<ScoreResult> {
        let result = metrics.score()?;
        debug!(
            version = %result.version,
            vector = %result.vector,
            score = result.score,
            severity = %result.severity,
            "Scored CVSS vector"
        );
        Ok(result)
    }

    /// Score change from setting `code` to `value`
    pub fn option_impact(&self, metrics: &CvssMetrics, code: &str, value: &str) -> Result<f64> {
        calculate_option_impact(metrics, code, value)
    }

    /// Score change of every legal value of every metric, in canonical order
    pub fn option_impacts(&self, metrics: &CvssMetrics) -> Result<Vec<OptionImpact>> {
        let version = metrics.version();
        let current = metrics.score()?.score;
        let mut impacts = Vec::new();

        for code in metrics::metric_codes(version) {
            for value in metrics::legal_values(version, code).unwrap_or_default() {
                let candidate = metrics.with_metric(code, value)?.score()?.score;
                impacts.push(OptionImpact {
                    code: (*code).to_string(),
                    value: value.to_string(),
                    delta: round_to_tenth(candidate - current),
                });
            }
        }

        debug!(
            version = %version,
            options = impacts.len(),
            "Computed option impacts"
        );
        Ok(impacts)
    }
}

/// Score change from setting `code` to `value`, rounded to one decimal.
///
/// `metrics` is left untouched. Fails with `UnknownMetricValue` when the
/// code or value is not legal for the version.
pub fn calculate_option_impact(metrics: &CvssMetrics, code: &str, value: &str) -> Result<f64> {
    let candidate = metrics.with_metric(code, value)?.score()?;
    let current = metrics.score()?;
    Ok(round_to_tenth(candidate.score - current.score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgescore_core::{CvssVersion, Error, Severity};

    #[test]
    fn test_score_vector_dispatches_by_version() {
        let calc = CvssCalculator::new();

        let v2 = calc.score_vector("AV:N/AC:L/Au:N/C:C/I:C/A:C").unwrap();
        assert_eq!(v2.version, CvssVersion::V2);
        assert_eq!(v2.score, 10.0);
        assert_eq!(v2.severity, Severity::High);

        let v31 = calc
            .score_vector("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H")
            .unwrap();
        assert_eq!(v31.score, 9.8);
        assert_eq!(v31.severity, Severity::Critical);

        let v4 = calc
            .score_vector("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:H/SI:H/SA:H")
            .unwrap();
        assert_eq!(v4.score, 10.0);
    }

    #[test]
    fn test_lenient_and_strict_modes() {
        let vector = "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H/ZZ:Q";
        assert_eq!(CvssCalculator::new().score_vector(vector).unwrap().score, 9.8);
        assert!(matches!(
            CvssCalculator::with_mode(ParseMode::Strict).score_vector(vector),
            Err(Error::UnknownMetricValue { .. })
        ));
    }

    #[test]
    fn test_option_impact() {
        let metrics = CvssMetrics::parse("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H").unwrap();
        assert_eq!(calculate_option_impact(&metrics, "AV", "N").unwrap(), 0.0);
        let delta = calculate_option_impact(&metrics, "C", "N").unwrap();
        assert!(delta < 0.0);
        assert_eq!(metrics.metric("C"), Some("H"));
    }

    #[test]
    fn test_option_impact_is_antisymmetric() {
        let high = CvssMetrics::parse("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H").unwrap();
        let low = high.with_metric("AV", "P").unwrap();
        let down = calculate_option_impact(&high, "AV", "P").unwrap();
        let up = calculate_option_impact(&low, "AV", "N").unwrap();
        assert_eq!(down, -up);
    }

    #[test]
    fn test_option_impact_rejects_unknown_values() {
        let metrics = CvssMetrics::least_impact(CvssVersion::V2);
        assert!(calculate_option_impact(&metrics, "AV", "P").is_err());
        assert!(calculate_option_impact(&metrics, "AT", "N").is_err());
    }

    #[test]
    fn test_option_impacts_cover_every_legal_value() {
        let calc = CvssCalculator::new();
        let metrics = CvssMetrics::least_impact(CvssVersion::V30);
        let impacts = calc.option_impacts(&metrics).unwrap();
        let expected: usize = metrics::metric_codes(CvssVersion::V30)
            .iter()
            .map(|code| metrics::legal_values(CvssVersion::V30, code).unwrap().len())
            .sum();
        assert_eq!(impacts.len(), expected);
        assert_eq!(impacts[0].code, "AV");
        assert!(impacts
            .iter()
            .filter(|i| i.code == "AV" && i.value == "P")
            .all(|i| i.delta == 0.0));
    }
}
