//! Text and JSON rendering of command results

use anyhow::Result;
use forgescore_core::{CvssVersion, ScoreRecord};
use forgescore_cvss::{legal_values, metric_codes, OptionImpact, ScoreResult, SubScores};
use serde::Serialize;

/// A scored vector with the label it was requested under
#[derive(Debug, Serialize)]
pub struct ScoredVector<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'a str>,
    #[serde(flatten)]
    pub result: &'a ScoreResult,
}

/// Metric codes of a version with their legal values
#[derive(Debug, Serialize)]
pub struct MetricListing {
    pub version: CvssVersion,
    pub metrics: Vec<MetricEntry>,
}

#[derive(Debug, Serialize)]
pub struct MetricEntry {
    pub code: &'static str,
    pub values: Vec<&'static str>,
}

impl MetricListing {
    pub fn of(version: CvssVersion) -> Self {
        let metrics = metric_codes(version)
            .iter()
            .map(|code| MetricEntry {
                code: *code,
                values: legal_values(version, code).unwrap_or_default(),
            })
            .collect();
        Self { version, metrics }
    }
}

#[derive(Debug, Serialize)]
struct Delta<'a> {
    code: &'a str,
    value: &'a str,
    delta: f64,
}

/// Writes results to stdout as text or JSON
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    json: bool,
    pretty: bool,
}

impl Printer {
    pub fn new(json: bool, pretty: bool) -> Self {
        Self { json, pretty }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        let rendered = if self.json && self.pretty {
            serde_json::to_string_pretty(value)?
        } else if self.json {
            serde_json::to_string(value)?
        } else {
            text()
        };
        println!("{}", rendered);
        Ok(())
    }

    pub fn print_scores(&self, rows: &[ScoredVector<'_>]) -> Result<()> {
        self.emit(rows, || {
            rows.iter().map(score_line).collect::<Vec<_>>().join("\n")
        })
    }

    pub fn print_records(&self, records: &[ScoreRecord]) -> Result<()> {
        self.emit(records, || {
            records
                .iter()
                .map(|r| {
                    format!(
                        "{}\t{}\t{:.1}\t{}\t{}",
                        r.id,
                        r.vector,
                        r.score,
                        r.severity,
                        r.timestamp.to_rfc3339()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    pub fn print_delta(&self, code: &str, value: &str, delta: f64) -> Result<()> {
        self.emit(&Delta { code, value, delta }, || delta_line(code, value, delta))
    }

    pub fn print_impacts(&self, impacts: &[OptionImpact]) -> Result<()> {
        self.emit(impacts, || {
            impacts
                .iter()
                .map(|i| delta_line(&i.code, &i.value, i.delta))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    pub fn print_listing(&self, listing: &MetricListing) -> Result<()> {
        self.emit(listing, || listing_text(listing))
    }
}

/// `label  vector  score  severity  details`
pub fn score_line(row: &ScoredVector<'_>) -> String {
    let result = row.result;
    let details = match &result.sub_scores {
        SubScores::Formula(scores) => {
            let mut parts = vec![format!("base {:.1}", scores.base_score)];
            if let Some(temporal) = scores.temporal_score {
                parts.push(format!("temporal {:.1}", temporal));
            }
            if let Some(environmental) = scores.environmental_score {
                parts.push(format!("environmental {:.1}", environmental));
            }
            parts.join(", ")
        }
        SubScores::MacroVector(details) => {
            format!("{} macrovector {}", details.nomenclature, details.macro_vector)
        }
    };
    let line = format!(
        "{}\t{:.1}\t{}\t{}",
        result.vector, result.score, result.severity, details
    );
    match row.label {
        Some(label) => format!("{}\t{}", label, line),
        None => line,
    }
}

fn delta_line(code: &str, value: &str, delta: f64) -> String {
    format!("{}:{}\t{:+.1}", code, value, delta)
}

fn listing_text(listing: &MetricListing) -> String {
    let mut lines = vec![listing.version.to_string()];
    for entry in &listing.metrics {
        lines.push(format!("{:<4} {}", entry.code, entry.values.join(" ")));
    }
    lines.join("\n")
}
