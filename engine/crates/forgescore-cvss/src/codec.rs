//! Vector string codec shared by all CVSS versions
//!
//! A vector is a slash-delimited list of `CODE:VALUE` tokens, optionally
//! preceded by a `CVSS:x.y` version tag. Each version supplies a
//! [`MetricSet`] describing its codes and canonical order; the functions
//! here do the tokenizing and serialization.

use forgescore_core::{CvssVersion, Error, Result};
use tracing::debug;

/// A closed set of values for one metric
pub trait MetricValue: Copy + Sized + 'static {
    /// Vector codes of every value, in declaration order
    const CODES: &'static [&'static str];

    /// Vector code of this value
    fn as_str(&self) -> &'static str;

    /// Look a value up by its vector code
    fn from_code(code: &str) -> Option<Self>;
}

/// Per-version metrics record that can be read and written by metric code
pub trait MetricSet: Clone + PartialEq {
    /// Every metric code in canonical vector order
    const METRIC_CODES: &'static [&'static str];

    /// Codes that are always emitted
    const BASE_CODES: &'static [&'static str];

    /// Sentinel for an optional metric that is not defined
    const NOT_DEFINED: &'static str;

    /// Least-impact metrics: lowest base values, every optional metric undefined
    fn least_impact() -> Self;

    /// Current value of a metric, `None` for an unknown code
    fn get(&self, code: &str) -> Option<&'static str>;

    /// Set a metric from its vector code.
    ///
    /// Returns `Ok(false)` when the code is not part of this version and
    /// `UnknownMetricValue` when the value is not legal for the code.
    fn set(&mut self, code: &str, value: &str) -> Result<bool>;

    /// Legal values for a code, including the sentinel for optional metrics
    fn legal_values(code: &str) -> Option<Vec<&'static str>>;
}

/// How strictly vector strings are parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Drop unknown codes, unknown values and stray tokens
    #[default]
    Lenient,
    /// Reject anything that is not a known `CODE:VALUE` pair
    Strict,
}

impl ParseMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, ParseMode::Strict)
    }
}

/// Detect the CVSS version of a vector string.
///
/// Exact prefixes win. Without a prefix, a vector containing both `AV:` and
/// `AC:` is taken to be v2.0. Unknown `CVSS:` prefixes are never treated as
/// v2.0.
pub fn detect_version(vector: &str) -> Option<CvssVersion> {
    let vector = vector.trim();
    let prefixed = CvssVersion::ALL
        .into_iter()
        .find(|version| version.prefix().is_some_and(|prefix| vector.starts_with(prefix)));
    if prefixed.is_some() {
        return prefixed;
    }
    if vector.starts_with("CVSS:") {
        return None;
    }
    if vector.contains("AV:") && vector.contains("AC:") {
        return Some(CvssVersion::V2);
    }
    None
}

/// Drop a leading `CVSS:x.y` tag of any version, if present
pub(crate) fn strip_any_prefix(vector: &str) -> &str {
    if vector.starts_with("CVSS:") {
        vector.split_once('/').map_or("", |(_, rest)| rest)
    } else {
        vector
    }
}

/// Serialize metrics without any version prefix
pub fn generate_body<M: MetricSet>(metrics: &M) -> String {
    M::METRIC_CODES
        .iter()
        .filter_map(|code| {
            let value = metrics.get(code)?;
            if value == M::NOT_DEFINED && !M::BASE_CODES.contains(code) {
                None
            } else {
                Some(format!("{}:{}", code, value))
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Parse a prefix-free vector body on top of the least-impact defaults
pub fn parse_body<M: MetricSet>(body: &str, mode: ParseMode) -> Result<M> {
    let mut metrics = M::least_impact();

    for token in body.split('/').map(str::trim).filter(|t| !t.is_empty()) {
        let Some((code, value)) = token.split_once(':') else {
            if mode.is_strict() {
                return Err(Error::MalformedVector(format!(
                    "token {:?} is not a CODE:VALUE pair",
                    token
                )));
            }
            debug!(token, "Ignoring token without a metric separator");
            continue;
        };

        match metrics.set(code, value) {
            Ok(true) => {}
            Ok(false) => {
                if mode.is_strict() {
                    return Err(Error::unknown_value(code, value));
                }
                debug!(code, value, "Ignoring unknown metric code");
            }
            Err(e) => {
                if mode.is_strict() {
                    return Err(e);
                }
                debug!(code, value, "Ignoring unknown metric value");
            }
        }
    }

    Ok(metrics)
}

/// Parse a required metric value
pub(crate) fn required<T: MetricValue>(code: &str, value: &str) -> Result<T> {
    T::from_code(value).ok_or_else(|| Error::unknown_value(code, value))
}

/// Parse an optional metric value, mapping the sentinel to `None`
pub(crate) fn optional<T: MetricValue>(
    code: &str,
    value: &str,
    not_defined: &str,
) -> Result<Option<T>> {
    if value == not_defined {
        return Ok(None);
    }
    required(code, value).map(Some)
}

/// Vector code of an optional metric value
pub(crate) fn optional_str<T: MetricValue>(value: Option<T>, not_defined: &'static str) -> &'static str {
    value.map_or(not_defined, |v| v.as_str())
}

/// Legal codes of a value set, with the sentinel first for optional metrics
pub(crate) fn legal<T: MetricValue>(not_defined: Option<&'static str>) -> Vec<&'static str> {
    not_defined.into_iter().chain(T::CODES.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_every_prefixed_version() {
        for version in CvssVersion::ALL {
            if let Some(prefix) = version.prefix() {
                let vector = format!("{}AV:N/AC:L", prefix);
                assert_eq!(detect_version(&vector), Some(version));
            }
        }
        assert_eq!(detect_version("CVSS:3.2/AV:N/AC:L"), None);
    }

    #[test]
    fn test_detect_prefixed_versions() {
        assert_eq!(
            detect_version("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"),
            Some(CvssVersion::V31)
        );
        assert_eq!(
            detect_version("CVSS:3.0/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"),
            Some(CvssVersion::V30)
        );
        assert_eq!(
            detect_version("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N"),
            Some(CvssVersion::V40)
        );
    }

    #[test]
    fn test_detect_v2_heuristic() {
        assert_eq!(
            detect_version("AV:N/AC:L/Au:N/C:C/I:C/A:C"),
            Some(CvssVersion::V2)
        );
        assert_eq!(detect_version("  AV:L/AC:H/Au:M/C:N/I:N/A:N  "), Some(CvssVersion::V2));
        assert_eq!(detect_version("C:C/I:C/A:C"), None);
        assert_eq!(detect_version(""), None);
    }

    #[test]
    fn test_unknown_prefix_is_not_v2() {
        assert_eq!(detect_version("CVSS:5.0/AV:N/AC:L"), None);
        assert_eq!(detect_version("CVSS:3.1"), None);
    }

    #[test]
    fn test_strip_any_prefix() {
        assert_eq!(strip_any_prefix("CVSS:3.1/AV:N"), "AV:N");
        assert_eq!(strip_any_prefix("CVSS:9.9/AV:N"), "AV:N");
        assert_eq!(strip_any_prefix("AV:N/AC:L"), "AV:N/AC:L");
        assert_eq!(strip_any_prefix("CVSS:3.1"), "");
    }
}
