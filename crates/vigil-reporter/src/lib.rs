//! # vigil-reporter
//!
//! The orchestration crate of the Vigil pipeline: snapshot capture and
//! the [`ErrorReporter`] that ties collection, analysis, storage,
//! notification, and recovery together behind one ingestion call.

pub mod report;
pub mod reporter;
pub mod snapshot;

pub use report::{ErrorReport, ErrorStatistics, PatternSummary};
pub use reporter::ErrorReporter;
pub use snapshot::SnapshotCapture;

pub use vigil_core::models::ReportScope;
