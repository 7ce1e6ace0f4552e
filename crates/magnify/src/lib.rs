//! magnify: live magnification overlay for the embedded window.
//!
//! Split the way the rest of the workspace splits platform glue from
//! policy: this module owns the zoom table, the clamped index state, and
//! the overlay sizing math, all platform-neutral and unit-tested; the
//! `sys` module (Windows only) drives the OS Magnification API. The
//! subsystem is optional end to end: when [`sys::Magnifier::new`] fails
//! the host keeps running without zoom.

use thiserror::Error;
use win_winops::geom::{Extent, Rect};

#[cfg(target_os = "windows")]
pub mod sys;

/// Allowed zoom factors, ascending. The current factor is always a member.
pub const ZOOM_TABLE: [f32; 9] = [1.0, 1.1, 1.25, 1.5, 1.75, 2.0, 2.5, 3.0, 4.0];

/// Factors closer to 1.0 than this count as "no zoom".
pub const ZOOM_EPSILON: f32 = 0.01;

/// Errors from the magnification subsystem.
#[derive(Debug, Error)]
pub enum Error {
    /// Factors below 1.0 are not representable by the overlay.
    #[error("zoom factor {0} below 1.0")]
    FactorTooSmall(f32),
    /// The OS magnification runtime refused to initialize.
    #[error("magnification subsystem unavailable")]
    Unavailable,
    /// Overlay window creation failed.
    #[error("overlay window creation failed: {0}")]
    Create(String),
}

/// How a requested factor should be applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomMode {
    /// Factor is 1.0 (within [`ZOOM_EPSILON`]): hide the overlay, restore
    /// the cursor.
    Disabled,
    /// Scale both axes by the factor; no skew, no rotation.
    Scale(f32),
}

/// Validate a requested factor. Rejects factors below 1.0; treats factors
/// within [`ZOOM_EPSILON`] of 1.0 as disabled.
pub fn classify_factor(factor: f32) -> Result<ZoomMode, Error> {
    if factor < 1.0 {
        return Err(Error::FactorTooSmall(factor));
    }
    if (factor - 1.0).abs() < ZOOM_EPSILON {
        Ok(ZoomMode::Disabled)
    } else {
        Ok(ZoomMode::Scale(factor))
    }
}

/// Current position in the zoom table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoomState {
    index: usize,
}

impl ZoomState {
    /// Start at factor 1.0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current factor; always a [`ZOOM_TABLE`] member.
    #[must_use]
    pub fn factor(self) -> f32 {
        ZOOM_TABLE[self.index]
    }

    /// True when the current factor magnifies.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(classify_factor(self.factor()), Ok(ZoomMode::Scale(_)))
    }

    /// Step up one table entry. Returns false (no-op) at the top.
    pub fn zoom_in(&mut self) -> bool {
        if self.index + 1 < ZOOM_TABLE.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Step down one table entry. Returns false (no-op) at the bottom.
    pub fn zoom_out(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Back to factor 1.0. Returns false when already there.
    pub fn reset(&mut self) -> bool {
        let changed = self.index != 0;
        self.index = 0;
        changed
    }
}

/// Overlay bounds for a given zoom: the magnified view covers
/// `min(host extent, embedded extent × factor)` per axis, centered over
/// the host. `host` is the host window's rectangle in screen coordinates;
/// the result is in the same frame.
#[must_use]
pub fn overlay_rect(host: Rect, embedded: Extent, factor: f32) -> Rect {
    let scaled = Extent {
        w: (embedded.w as f32 * factor) as i32,
        h: (embedded.h as f32 * factor) as i32,
    };
    let clamped = Extent {
        w: scaled.w.min(host.w),
        h: scaled.h.min(host.h),
    };
    host.center(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_walk_is_monotonic_and_clamped() {
        let mut z = ZoomState::new();
        for i in 0..ZOOM_TABLE.len() - 1 {
            assert_eq!(z.factor(), ZOOM_TABLE[i]);
            assert!(z.zoom_in());
            assert_eq!(z.factor(), ZOOM_TABLE[i + 1]);
        }
        // At the top: no-op.
        assert!(!z.zoom_in());
        assert_eq!(z.factor(), 4.0);

        for _ in 0..ZOOM_TABLE.len() - 1 {
            assert!(z.zoom_out());
        }
        assert!(!z.zoom_out());
        assert_eq!(z.factor(), 1.0);
    }

    #[test]
    fn reset_returns_to_unity() {
        let mut z = ZoomState::new();
        assert!(z.zoom_in());
        assert!(z.zoom_in());
        assert!(z.reset());
        assert_eq!(z.factor(), 1.0);
        assert!(!z.reset());
        assert!(!z.is_active());
    }

    #[test]
    fn near_unity_factor_disables() {
        assert_eq!(classify_factor(0.995).unwrap(), ZoomMode::Disabled);
        assert_eq!(classify_factor(1.0).unwrap(), ZoomMode::Disabled);
        assert_eq!(classify_factor(1.009).unwrap(), ZoomMode::Disabled);
        assert_eq!(classify_factor(1.5).unwrap(), ZoomMode::Scale(1.5));
    }

    #[test]
    fn sub_unity_factor_rejected() {
        assert!(matches!(
            classify_factor(0.5),
            Err(Error::FactorTooSmall(_))
        ));
    }

    #[test]
    fn overlay_clamps_to_host_and_centers() {
        let host = Rect::new(0, 0, 1920, 1080);
        // Small embedded window at 2x still fits: centered at scaled size.
        let r = overlay_rect(host, Extent { w: 400, h: 300 }, 2.0);
        assert_eq!(r, Rect::new(560, 240, 800, 600));
        // Large embedded window at 4x clamps to the host extent.
        let r = overlay_rect(host, Extent { w: 1000, h: 800 }, 4.0);
        assert_eq!(r, Rect::new(0, 0, 1920, 1080));
    }
}
