//! win-winops: Win32 window operations for winkiosk.
//!
//! Provides the geometry primitives shared across the workspace, window
//! style-bit manipulation for decoration stripping, and the [`WindowOps`]
//! trait seam over the raw window API. Policy code in other crates is
//! written against [`WindowOps`] so it can be exercised with a fake
//! implementation on any platform; the production implementation
//! ([`RealWinOps`]) only exists on Windows.

mod error;
pub mod geom;
mod ops;
pub mod styles;
#[cfg(target_os = "windows")]
mod win;

pub use error::{Error, Result};
pub use geom::{Extent, Pos, Rect};
pub use ops::WindowOps;
#[cfg(target_os = "windows")]
pub use win::{RealWinOps, hide_cursor, show_cursor, wide_string};

/// Opaque window handle as used by the window system.
///
/// On Windows this is the `HWND` value; the newtype keeps handles from
/// mixing with other integers and lets platform-neutral code pass them
/// around without touching the raw API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowId(isize);

impl WindowId {
    /// Wrap a raw handle value.
    #[must_use]
    pub const fn new(raw: isize) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[must_use]
    pub const fn raw(self) -> isize {
        self.0
    }
}

/// A physical display: origin and extent in virtual-screen coordinates.
///
/// Used as the reference frame for all resolved geometry so positioning is
/// monitor-independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Monitor {
    /// Top-left corner in virtual-screen coordinates.
    pub origin: Pos,
    /// Width and height of the display.
    pub extent: Extent,
}
