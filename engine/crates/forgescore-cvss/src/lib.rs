//! ForgeScore CVSS - vector parsing and scoring for CVSS v2.0, v3.0, v3.1 and v4.0
//!
//! This crate provides:
//! - Typed metric models for every supported version
//! - A shared vector codec (parse, generate, version detection)
//! - The v2.0 and v3.x closed-form equations
//! - The v4.0 MacroVector lookup and interpolation
//! - A version-dispatching calculator with per-option score impacts

#[macro_use]
mod macros;

pub mod calculator;
pub mod codec;
pub mod metrics;
pub mod result;
pub mod rounding;
pub mod v2;
pub mod v3;
pub mod v4;

pub use calculator::{calculate_option_impact, CvssCalculator, OptionImpact};
pub use codec::{detect_version, MetricSet, MetricValue, ParseMode};
pub use metrics::{legal_values, metric_codes, weight_of, CvssMetrics};
pub use result::{FormulaScores, MacroVectorScores, ScoreResult, SubScores};
pub use v4::{MacroVector, Nomenclature};

pub use forgescore_core::{CvssVersion, Error, Result, Severity};
