//! Notification-channel errors, isolated per channel at dispatch.

use crate::models::Channel;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("channel {channel} failed: {message}")]
    ChannelFailed { channel: Channel, message: String },

    #[error("notification rate limit reached")]
    RateLimited,

    #[error("webhook endpoint not configured")]
    NoEndpoint,
}
