//! Capability traits for every external collaborator. The pipeline
//! never reaches for globals; all of these are injected at construction.

mod kv;
mod runtime;
mod surface;
mod transport;
mod ui;

pub use kv::{KeyValueStore, MemoryKvStore};
pub use runtime::{GameRuntime, NullRuntime};
pub use surface::RenderSurface;
pub use transport::WebhookTransport;
pub use ui::UiHost;
