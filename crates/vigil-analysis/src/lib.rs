//! # vigil-analysis
//!
//! Front half of the error pipeline: bounded collection, deterministic
//! fingerprinting, severity/category classification, and per-fingerprint
//! pattern tracking with trend detection.

pub mod analyzer;
pub mod classify;
pub mod collector;
pub mod fingerprint;

pub use analyzer::ErrorAnalyzer;
pub use collector::ErrorCollector;
pub use fingerprint::fingerprint;
