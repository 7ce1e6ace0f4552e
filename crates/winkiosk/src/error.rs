use thiserror::Error;

/// Startup and runtime errors for the kiosk host.
///
/// Everything here except [`Error::WinOps`]'s non-fatal variants aborts
/// startup: the composition root logs it, shows a blocking dialog, and
/// exits.
#[derive(Debug, Error)]
pub enum Error {
    /// Declared width/height outside the sentinel scheme.
    #[error("invalid geometry: width/height values must be -1, 0, or positive")]
    InvalidGeometry,

    /// No top-level window matched the requested title, or the launched
    /// process never presented one.
    #[error("target window not found: {0}")]
    TargetNotFound(String),

    /// The target window's owning process could not be determined.
    #[error("unable to determine owning process of target window")]
    TargetProcess,

    /// Launching the target command failed.
    #[error("failed to launch target: {0}")]
    Launch(String),

    /// Host window class registration failed.
    #[error("window class registration failed")]
    ClassRegistration,

    /// Host window creation failed.
    #[error("host window creation failed: {0}")]
    HostCreate(String),

    /// A window operation failed (reparent failures arrive through here and
    /// are fatal).
    #[error(transparent)]
    WinOps(#[from] win_winops::Error),
}

/// Result alias for the kiosk host.
pub type Result<T> = std::result::Result<T, Error>;
