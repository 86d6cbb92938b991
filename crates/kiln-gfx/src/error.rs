//! Error taxonomy.
//!
//! Three classes with different recovery stories:
//!
//! - [`FatalError`] mirrors the backend's fatal categories. Unrecoverable;
//!   propagate to teardown, never retry internally.
//! - [`HandleError`] — a destroyed or never-created handle reached the
//!   registry boundary. Always surfaced, never forwarded to the backend.
//! - [`TransientError`] — a transient-buffer write was rejected before any
//!   memory was touched. The current frame degrades; the process survives.

use thiserror::Error;

use crate::handle::HandleKind;

/// Unrecoverable backend failure. Mirrors the native fatal categories.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum FatalError {
    /// Internal consistency check failed.
    #[error("consistency check failed: {reason}")]
    DebugCheck { reason: &'static str },

    /// Shader bytecode was rejected.
    #[error("invalid shader bytecode")]
    InvalidShader,

    /// Backend context could not be brought up (or was brought up twice).
    #[error("unable to initialize renderer backend")]
    UnableToInitialize,

    /// Texture creation failed.
    #[error("unable to create texture: {reason}")]
    UnableToCreateTexture { reason: &'static str },

    /// The rendering device was lost.
    #[error("rendering device lost")]
    DeviceLost,
}

/// A handle that does not refer to a live resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
#[error("{kind} handle {index} is not a live resource")]
pub struct HandleError {
    pub kind: HandleKind,
    pub index: u16,
}

/// Rejected access to a transient (frame-scoped) buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum TransientError {
    /// Write larger than the allocated capacity. Nothing was written.
    #[error("write of {requested} bytes exceeds transient capacity of {capacity} bytes")]
    OutOfBounds { requested: usize, capacity: usize },

    /// Buffer used after the frame that allocated it ended.
    #[error("transient buffer allocated in frame {allocated} used in frame {current}")]
    StaleFrame { allocated: u64, current: u64 },
}

/// Any error the wrapper can produce, for call sites that mix classes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum GfxError {
    #[error(transparent)]
    Fatal(#[from] FatalError),
    #[error(transparent)]
    Handle(#[from] HandleError),
    #[error(transparent)]
    Transient(#[from] TransientError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_error_names_kind_and_index() {
        let err = HandleError {
            kind: HandleKind::Shader,
            index: 12,
        };
        assert_eq!(err.to_string(), "shader handle 12 is not a live resource");
    }

    #[test]
    fn gfx_error_is_transparent() {
        let err: GfxError = FatalError::DeviceLost.into();
        assert_eq!(err.to_string(), FatalError::DeviceLost.to_string());
    }
}
