//! Error taxonomy for the synchronization and rendering pipeline.

use thiserror::Error;

/// Errors surfaced by the store, the renderer and the session driver.
///
/// None of these are fatal to a session. A rejected update leaves the
/// snapshot in its last-known-good state.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A field of an update failed validation; the whole update was rejected.
    #[error("malformed update: {field}: {reason}")]
    MalformedUpdate { field: &'static str, reason: String },

    /// A redraw was attempted before a drawing target was attached.
    #[error("drawing surface is not available")]
    SurfaceUnavailable,

    /// The inbound message could not be decoded into an update.
    #[error("failed to decode server message: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ViewError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        ViewError::MalformedUpdate {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ViewError> = std::result::Result<T, E>;
