//! Version-tagged metrics
//!
//! [`CvssMetrics`] is the single entry type for callers that do not know
//! the CVSS version of a vector ahead of time.

use crate::codec::{detect_version, MetricSet, ParseMode};
use crate::result::ScoreResult;
use crate::{v2, v3, v4};
use forgescore_core::{CvssVersion, Error, Result};
use std::fmt;
use std::str::FromStr;

/// Metrics of one CVSS version
#[derive(Debug, Clone, PartialEq)]
pub enum CvssMetrics {
    V2(v2::Metrics),
    V30(v3::Metrics),
    V31(v3::Metrics),
    V40(v4::Metrics),
}

impl CvssMetrics {
    /// Least-impact metrics of a version
    pub fn least_impact(version: CvssVersion) -> Self {
        match version {
            CvssVersion::V2 => CvssMetrics::V2(v2::Metrics::least_impact()),
            CvssVersion::V30 => CvssMetrics::V30(v3::Metrics::least_impact()),
            CvssVersion::V31 => CvssMetrics::V31(v3::Metrics::least_impact()),
            CvssVersion::V40 => CvssMetrics::V40(v4::Metrics::least_impact()),
        }
    }

    /// Detect the version of a vector and parse it leniently
    pub fn parse(vector: &str) -> Result<Self> {
        Self::parse_with_mode(vector, ParseMode::Lenient)
    }

    /// Detect the version of a vector and parse it with `mode`
    pub fn parse_with_mode(vector: &str, mode: ParseMode) -> Result<Self> {
        let version = detect_version(vector).ok_or_else(|| {
            Error::MalformedVector(format!("cannot detect CVSS version of {:?}", vector.trim()))
        })?;
        Self::parse_as(version, vector, mode)
    }

    /// Parse a vector as a known version
    pub fn parse_as(version: CvssVersion, vector: &str, mode: ParseMode) -> Result<Self> {
        let metrics = match version {
            CvssVersion::V2 => CvssMetrics::V2(v2::parse(vector, mode)?),
            CvssVersion::V30 => CvssMetrics::V30(v3::parse(vector, mode)?),
            CvssVersion::V31 => CvssMetrics::V31(v3::parse(vector, mode)?),
            CvssVersion::V40 => CvssMetrics::V40(v4::parse(vector, mode)?),
        };
        Ok(metrics)
    }

    pub fn version(&self) -> CvssVersion {
        match self {
            CvssMetrics::V2(_) => CvssVersion::V2,
            CvssMetrics::V30(_) => CvssVersion::V30,
            CvssMetrics::V31(_) => CvssVersion::V31,
            CvssMetrics::V40(_) => CvssVersion::V40,
        }
    }

    /// Canonical vector string
    pub fn vector(&self) -> String {
        match self {
            CvssMetrics::V2(m) => v2::generate(m),
            CvssMetrics::V30(m) => v3::generate(m, CvssVersion::V30),
            CvssMetrics::V31(m) => v3::generate(m, CvssVersion::V31),
            CvssMetrics::V40(m) => v4::generate(m),
        }
    }

    /// Current value of a metric, `None` for a code this version lacks
    pub fn metric(&self, code: &str) -> Option<&'static str> {
        match self {
            CvssMetrics::V2(m) => m.get(code),
            CvssMetrics::V30(m) | CvssMetrics::V31(m) => m.get(code),
            CvssMetrics::V40(m) => m.get(code),
        }
    }

    /// Copy of these metrics with one value replaced
    pub fn with_metric(&self, code: &str, value: &str) -> Result<Self> {
        let mut next = self.clone();
        let known = match &mut next {
            CvssMetrics::V2(m) => m.set(code, value)?,
            CvssMetrics::V30(m) | CvssMetrics::V31(m) => m.set(code, value)?,
            CvssMetrics::V40(m) => m.set(code, value)?,
        };
        if !known {
            return Err(Error::unknown_value(code, value));
        }
        Ok(next)
    }

    /// Score these metrics with the engine of their version
    pub fn score(&self) -> Result<ScoreResult> {
        match self {
            CvssMetrics::V2(m) => Ok(v2::calculate(m)),
            CvssMetrics::V30(m) => Ok(v3::calculate(m, CvssVersion::V30)),
            CvssMetrics::V31(m) => Ok(v3::calculate(m, CvssVersion::V31)),
            CvssMetrics::V40(m) => v4::calculate(m),
        }
    }
}

impl FromStr for CvssMetrics {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CvssMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.vector())
    }
}

/// Metric codes of a version in canonical vector order
pub fn metric_codes(version: CvssVersion) -> &'static [&'static str] {
    match version {
        CvssVersion::V2 => v2::metrics::METRIC_CODES,
        CvssVersion::V30 | CvssVersion::V31 => v3::metrics::METRIC_CODES,
        CvssVersion::V40 => v4::metrics::METRIC_CODES,
    }
}

/// Legal values of a code, `None` when the version has no such code
pub fn legal_values(version: CvssVersion, code: &str) -> Option<Vec<&'static str>> {
    match version {
        CvssVersion::V2 => v2::Metrics::legal_values(code),
        CvssVersion::V30 | CvssVersion::V31 => v3::Metrics::legal_values(code),
        CvssVersion::V40 => v4::Metrics::legal_values(code),
    }
}

/// Numeric weight (v2.0, v3.x) or ordinal level (v4.0) of a metric value
pub fn weight_of(version: CvssVersion, code: &str, value: &str) -> Result<f64> {
    match version {
        CvssVersion::V2 => v2::weight_of(code, value),
        CvssVersion::V30 | CvssVersion::V31 => v3::weight_of(code, value),
        CvssVersion::V40 => v4::level_of(code, value),
    }
}
