//! Renderable-surface capability: produces an encoded visual snapshot
//! of current output on demand. May be absent entirely (the capture
//! component holds an `Option<Box<dyn RenderSurface>>`) or may fail.

use crate::errors::SnapshotError;

pub trait RenderSurface {
    /// Encoded snapshot payload (e.g. a data URL or base64 image).
    fn capture(&self) -> Result<String, SnapshotError>;
}
