//! Webhook transport: one-shot HTTP POST of a JSON body. No automatic
//! retry. `Send + Sync` because dispatch detaches a thread so the
//! synchronous ingestion path never waits on the network.

use crate::errors::NotifyError;

pub trait WebhookTransport: Send + Sync {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<(), NotifyError>;
}
