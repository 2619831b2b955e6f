//! Supported CVSS specification versions

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CVSS specification version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CvssVersion {
    #[serde(rename = "2.0")]
    V2,
    #[serde(rename = "3.0")]
    V30,
    #[serde(rename = "3.1")]
    V31,
    #[serde(rename = "4.0")]
    V40,
}

impl CvssVersion {
    /// All supported versions, oldest first
    pub const ALL: [CvssVersion; 4] = [
        CvssVersion::V2,
        CvssVersion::V30,
        CvssVersion::V31,
        CvssVersion::V40,
    ];

    /// Version number as written in vector prefixes
    pub fn as_str(&self) -> &'static str {
        match self {
            CvssVersion::V2 => "2.0",
            CvssVersion::V30 => "3.0",
            CvssVersion::V31 => "3.1",
            CvssVersion::V40 => "4.0",
        }
    }

    /// Vector string prefix including the trailing slash (v2.0 has none)
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            CvssVersion::V2 => None,
            CvssVersion::V30 => Some("CVSS:3.0/"),
            CvssVersion::V31 => Some("CVSS:3.1/"),
            CvssVersion::V40 => Some("CVSS:4.0/"),
        }
    }
}

impl fmt::Display for CvssVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CVSS {}", self.as_str())
    }
}

impl FromStr for CvssVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed
            .strip_prefix("CVSS:")
            .or_else(|| trimmed.strip_prefix("cvss:"))
            .unwrap_or(trimmed)
            .trim_start_matches(['v', 'V']);
        match number {
            "2" | "2.0" => Ok(CvssVersion::V2),
            "3.0" => Ok(CvssVersion::V30),
            "3" | "3.1" => Ok(CvssVersion::V31),
            "4" | "4.0" => Ok(CvssVersion::V40),
            _ => Err(Error::Parse(format!("unsupported CVSS version: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!("2.0".parse::<CvssVersion>().unwrap(), CvssVersion::V2);
        assert_eq!("v3.0".parse::<CvssVersion>().unwrap(), CvssVersion::V30);
        assert_eq!("CVSS:3.1".parse::<CvssVersion>().unwrap(), CvssVersion::V31);
        assert_eq!("4".parse::<CvssVersion>().unwrap(), CvssVersion::V40);
        assert!("5.0".parse::<CvssVersion>().is_err());
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(CvssVersion::V2.prefix(), None);
        assert_eq!(CvssVersion::V31.prefix(), Some("CVSS:3.1/"));
        assert_eq!(CvssVersion::V40.prefix(), Some("CVSS:4.0/"));
    }

    #[test]
    fn test_serde_uses_version_number() {
        let json = serde_json::to_string(&CvssVersion::V31).unwrap();
        assert_eq!(json, "\"3.1\"");
        let back: CvssVersion = serde_json::from_str("\"4.0\"").unwrap();
        assert_eq!(back, CvssVersion::V40);
    }
}
