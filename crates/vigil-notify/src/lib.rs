//! Notification pipeline.
//!
//! Errors arriving from the analysis layer pass five stages: filters,
//! rate limiting, severity thresholds, aggregation, and channel
//! dispatch. Every stage can veto; the caller learns only whether a
//! notification was issued or queued.

pub mod aggregation;
pub mod channels;
pub mod rate_limit;
pub mod system;

pub use aggregation::Aggregator;
pub use channels::{ChannelDispatcher, ReqwestTransport};
pub use rate_limit::{RateLimitStatus, RateLimiter};
pub use system::{NotificationStats, NotificationSystem};
