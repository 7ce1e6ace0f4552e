//! Background/overlay bitmap loading and overlay anchoring.

use std::path::Path;

use clap::ValueEnum;
use tracing::warn;
use win_winops::geom::{Extent, Pos};

/// Where the overlay image sits within the host client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Anchor {
    /// Centered both ways.
    Center,
    /// Flush with the top-left corner.
    TopLeft,
    /// Flush with the top-right corner.
    TopRight,
    /// Flush with the bottom-left corner.
    BottomLeft,
    /// Flush with the bottom-right corner.
    BottomRight,
}

/// Top-left corner for an overlay of extent `overlay` anchored within a
/// host client area of extent `host`.
#[must_use]
pub fn overlay_origin(anchor: Anchor, host: Extent, overlay: Extent) -> Pos {
    match anchor {
        Anchor::Center => Pos {
            x: (host.w - overlay.w) / 2,
            y: (host.h - overlay.h) / 2,
        },
        Anchor::TopLeft => Pos { x: 0, y: 0 },
        Anchor::TopRight => Pos {
            x: host.w - overlay.w,
            y: 0,
        },
        Anchor::BottomLeft => Pos {
            x: 0,
            y: host.h - overlay.h,
        },
        Anchor::BottomRight => Pos {
            x: host.w - overlay.w,
            y: host.h - overlay.h,
        },
    }
}

/// A decoded image as a top-down BGRA pixel buffer, ready for blitting.
#[derive(Debug, Clone)]
pub struct Bitmap {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
    /// `w * h * 4` bytes, row-major, top-down, BGRA order.
    pub bgra: Vec<u8>,
}

impl Bitmap {
    /// The bitmap's extent.
    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent {
            w: self.w,
            h: self.h,
        }
    }
}

/// Decode an image file into a [`Bitmap`]. Failures are reported to the
/// caller, which treats them as a degraded feature, not an error.
pub fn load_bitmap(path: &Path) -> Option<Bitmap> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "bitmap_load_failed");
            return None;
        }
    };
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut bgra = rgba.into_raw();
    for px in bgra.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    Some(Bitmap {
        w: w as i32,
        h: h as i32,
        bgra,
    })
}
