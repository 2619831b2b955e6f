//! ForgeScore Core - Foundation types and error handling
//!
//! This crate provides the core abstractions used throughout ForgeScore:
//! - `Error` / `Result`: the shared error taxonomy
//! - `Severity`: qualitative ratings and the per-version classifier
//! - `CvssVersion`: supported specification versions
//! - `ScoreRecord`: the shape of a stored score

pub mod error;
pub mod record;
pub mod severity;
pub mod version;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use record::{ScoreRecord, ScoreRecordBuilder};
pub use severity::Severity;
pub use version::CvssVersion;
