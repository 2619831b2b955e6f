//! Version-specific rounding
//!
//! CVSS v2.0 "rounds to one decimal" (half away from zero), v3.x rounds *up*
//! to the next tenth, and v4.0 rounds like v2.0. These must stay separate:
//! unifying them changes published scores.

/// Round half away from zero at one decimal (v2.0, v4.0)
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// CVSS v3.0 Roundup: smallest tenth greater than or equal to the input
pub fn roundup_v30(value: f64) -> f64 {
    (value * 10.0).ceil() / 10.0
}

/// CVSS v3.1 Roundup.
///
/// Works on an integer scaled by 100000 so that floating point noise such
/// as `4.000000000000001` does not bump the result to 4.1.
pub fn roundup_v31(value: f64) -> f64 {
    let int_input = (value * 100_000.0).round() as i64;
    if int_input % 10_000 == 0 {
        int_input as f64 / 100_000.0
    } else {
        ((int_input / 10_000) as f64 + 1.0) / 10.0
    }
}
