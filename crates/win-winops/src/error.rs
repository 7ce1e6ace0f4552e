use thiserror::Error;

use crate::WindowId;

/// Errors that can occur during window operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The window handle no longer refers to a live window.
    #[error("window {0:?} no longer exists")]
    WindowGone(WindowId),

    /// Reparenting the embedded window under the host failed.
    #[error("reparent failed: {0}")]
    Reparent(String),

    /// The owning monitor could not be determined.
    #[error("monitor query failed for window {0:?}")]
    Monitor(WindowId),

    /// A window-system call failed.
    #[error("window system call failed: {0}")]
    Sys(String),
}

/// Result alias for window operations.
pub type Result<T> = std::result::Result<T, Error>;
