//! Score records - the shape persistence and history layers store
//!
//! Storage itself lives outside ForgeScore; this module only defines
//! what a stored score looks like.

use crate::severity::Severity;
use crate::version::CvssVersion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scored vector as handed to a history or persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Opaque record identifier
    pub id: Uuid,

    /// When the score was computed
    pub timestamp: DateTime<Utc>,

    /// CVSS version the vector was scored under
    pub version: CvssVersion,

    /// Canonical vector string
    pub vector: String,

    pub score: f64,
    pub severity: Severity,

    /// Optional user label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ScoreRecord {
    /// Create a new record builder
    pub fn builder(
        version: CvssVersion,
        vector: impl Into<String>,
        score: f64,
        severity: Severity,
    ) -> ScoreRecordBuilder {
        ScoreRecordBuilder::new(version, vector, score, severity)
    }
}

/// Builder for constructing score records
pub struct ScoreRecordBuilder {
    record: ScoreRecord,
}

impl ScoreRecordBuilder {
    pub fn new(
        version: CvssVersion,
        vector: impl Into<String>,
        score: f64,
        severity: Severity,
    ) -> Self {
        Self {
            record: ScoreRecord {
                id: Uuid::new_v4(),
                timestamp: Utc::now(),
                version,
                vector: vector.into(),
                score,
                severity,
                label: None,
            },
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.record.label = Some(label.into());
        self
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.record.id = id;
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.record.timestamp = timestamp;
        self
    }

    pub fn build(self) -> ScoreRecord {
        self.record
    }
}
