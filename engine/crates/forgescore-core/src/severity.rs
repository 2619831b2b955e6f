//! Qualitative severity ratings

use crate::version::CvssVersion;
use serde::{Deserialize, Serialize};

/// Qualitative severity rating for a CVSS score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Score of exactly 0.0
    #[default]
    None,
    /// 0.1 - 3.9
    Low,
    /// 4.0 - 6.9
    Medium,
    /// 7.0 - 8.9 (7.0 - 10.0 for CVSS v2.0)
    High,
    /// 9.0 - 10.0, not defined for CVSS v2.0
    Critical,
}

impl Severity {
    /// Rate a score with the thresholds of the given CVSS version
    pub fn classify(version: CvssVersion, score: f64) -> Self {
        match version {
            CvssVersion::V2 => Self::from_v2_score(score),
            CvssVersion::V30 | CvssVersion::V31 | CvssVersion::V40 => Self::from_score(score),
        }
    }

    /// Convert a CVSS 3.x / 4.0 score to severity
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 9.0 => Severity::Critical,
            s if s >= 7.0 => Severity::High,
            s if s >= 4.0 => Severity::Medium,
            s if s > 0.0 => Severity::Low,
            _ => Severity::None,
        }
    }

    /// Convert a CVSS 2.0 score to severity (no Critical band)
    pub fn from_v2_score(score: f64) -> Self {
        match score {
            s if s >= 7.0 => Severity::High,
            s if s >= 4.0 => Severity::Medium,
            s if s > 0.0 => Severity::Low,
            _ => Severity::None,
        }
    }

    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_to_severity() {
        assert_eq!(Severity::from_score(9.8), Severity::Critical);
        assert_eq!(Severity::from_score(7.5), Severity::High);
        assert_eq!(Severity::from_score(5.0), Severity::Medium);
        assert_eq!(Severity::from_score(2.0), Severity::Low);
        assert_eq!(Severity::from_score(0.0), Severity::None);
    }

    #[test]
    fn test_boundaries() {
        for version in [CvssVersion::V30, CvssVersion::V31, CvssVersion::V40] {
            assert_eq!(Severity::classify(version, 0.1), Severity::Low);
            assert_eq!(Severity::classify(version, 3.9), Severity::Low);
            assert_eq!(Severity::classify(version, 4.0), Severity::Medium);
            assert_eq!(Severity::classify(version, 6.9), Severity::Medium);
            assert_eq!(Severity::classify(version, 7.0), Severity::High);
            assert_eq!(Severity::classify(version, 8.9), Severity::High);
            assert_eq!(Severity::classify(version, 9.0), Severity::Critical);
            assert_eq!(Severity::classify(version, 10.0), Severity::Critical);
        }
    }

    #[test]
    fn test_v2_has_no_critical() {
        assert_eq!(Severity::classify(CvssVersion::V2, 0.0), Severity::None);
        assert_eq!(Severity::classify(CvssVersion::V2, 3.9), Severity::Low);
        assert_eq!(Severity::classify(CvssVersion::V2, 4.0), Severity::Medium);
        assert_eq!(Severity::classify(CvssVersion::V2, 6.9), Severity::Medium);
        assert_eq!(Severity::classify(CvssVersion::V2, 7.0), Severity::High);
        assert_eq!(Severity::classify(CvssVersion::V2, 9.0), Severity::High);
        assert_eq!(Severity::classify(CvssVersion::V2, 10.0), Severity::High);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::None);
    }
}
