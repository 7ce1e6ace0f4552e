//! winkiosk: borderless kiosk host that embeds a foreign top-level window.
//!
//! The library half carries everything testable off-platform: the CLI, the
//! geometry resolution policy, the embedding controller, message-routing
//! decisions, and asset math. The Windows-only composition root (`app`) and
//! target-process resolution (`target`) sit behind `cfg(target_os)`.

/// Windows-only composition root, session, wndproc, and message loop.
#[cfg(target_os = "windows")]
pub mod app;
/// Command-line interface.
pub mod args;
/// Bitmap loading and overlay anchoring.
pub mod assets;
/// Embedding controller.
pub mod embed;
/// Error types.
pub mod error;
/// Geometry resolution policy.
pub mod geometry;
/// Message-routing policy (timers, click arbitration).
pub mod router;
/// Target window/process resolution.
#[cfg(target_os = "windows")]
pub mod target;
