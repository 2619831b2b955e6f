//! Scoring results

use crate::v4::{MacroVector, Nomenclature};
use forgescore_core::{CvssVersion, ScoreRecord, Severity};
use serde::{Deserialize, Serialize};

/// Outcome of scoring one set of metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub version: CvssVersion,
    /// Reported score (0.0 - 10.0, one decimal)
    pub score: f64,
    pub severity: Severity,
    /// Canonical vector string
    pub vector: String,
    pub sub_scores: SubScores,
}

impl ScoreResult {
    /// Turn this result into a record for a history or persistence layer
    pub fn to_record(&self, label: Option<String>) -> ScoreRecord {
        let builder = ScoreRecord::builder(self.version, self.vector.clone(), self.score, self.severity);
        match label {
            Some(label) => builder.label(label).build(),
            None => builder.build(),
        }
    }
}

/// Version-specific breakdown of a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubScores {
    /// CVSS v2.0 and v3.x closed-form scores
    Formula(FormulaScores),
    /// CVSS v4.0 MacroVector scoring
    MacroVector(MacroVectorScores),
}

/// Sub-scores of the v2.0 / v3.x formulas, each rounded to one decimal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaScores {
    pub base_score: f64,
    pub impact: f64,
    pub exploitability: f64,
    /// Present when any temporal metric is defined
    pub temporal_score: Option<f64>,
    /// Present when any environmental metric is defined
    pub environmental_score: Option<f64>,
    /// Adjusted (v2.0) or modified (v3.x) impact, with the environmental score
    pub modified_impact: Option<f64>,
}

/// Details of a v4.0 score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroVectorScores {
    pub macro_vector: MacroVector,
    pub nomenclature: Nomenclature,
}
