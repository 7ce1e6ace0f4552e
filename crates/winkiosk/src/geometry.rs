//! Geometry resolution for the embedded window.
//!
//! Pure policy: given the declared request, the embedded window's current
//! extent, and the host's extent, decide the extent the embedded window
//! gets and whether it sits at a caller-chosen position. DPI-aware foreign
//! processes get caller coordinates (assumed to be in the unaware 96-DPI
//! frame) rescaled into the window's native scale.

use win_winops::geom::{Extent, Pos};

use crate::error::{Error, Result};

/// Per-process DPI classification of the foreign application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpiAwareness {
    /// The OS rescales the process's coordinate space; no conversion.
    Unaware,
    /// The process handles scaling itself; caller coordinates are converted
    /// into the window's native scale.
    Aware,
}

/// The declared embedding parameters, read once at startup.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddingRequest {
    /// Declared width: -1 = current extent, 0 = auto-fit, positive = exact.
    pub width: i32,
    /// Declared height, same sentinels as width.
    pub height: i32,
    /// Optional absolute position in caller coordinates.
    pub position: Option<Pos>,
    /// The foreign process's DPI classification.
    pub dpi_awareness: DpiAwareness,
    /// The embedded window's DPI (96 = unscaled).
    pub window_dpi: u32,
}

/// How the resolved extent reacts to later host resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMode {
    /// `(0,0)`: follow the host, preserving self-sized apps.
    Auto,
    /// `(-1,-1)`: the embedded window's own extent.
    Current,
    /// Positive values: fixed, never recomputed.
    Explicit,
}

/// Resolved geometry, relative to the owning monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryState {
    /// The extent the embedded window gets. Never negative.
    pub extent: Extent,
    /// Caller-chosen position (converted to the window's scale when
    /// DPI-aware), still in absolute caller coordinates; positioning
    /// subtracts the monitor origin.
    pub custom_pos: Option<Pos>,
    /// Sizing mode the extent was resolved under.
    pub mode: SizeMode,
}

impl GeometryState {
    /// Whether positioning uses the caller-supplied coordinates.
    #[must_use]
    pub fn uses_custom_position(self) -> bool {
        self.custom_pos.is_some()
    }
}

/// Convert a value from the unaware 96-DPI frame into `dpi` scale,
/// truncating toward zero.
#[inline]
fn to_native(value: i32, dpi: u32) -> i32 {
    value * 96 / dpi as i32
}

/// Resolve the declared request against live extents.
///
/// `current` is the embedded window's extent right now; `host` is the host
/// client extent. Fails only on out-of-range sentinels.
pub fn resolve(request: &EmbeddingRequest, current: Extent, host: Extent) -> Result<GeometryState> {
    if request.width < -1 || request.height < -1 {
        return Err(Error::InvalidGeometry);
    }

    let (mut extent, mode) = match (request.width, request.height) {
        (0, 0) => {
            // Auto-fit: a window smaller than the host sized itself; leave
            // it alone. Otherwise clamp to exactly the host.
            if current.w < host.w || current.h < host.h {
                (current, SizeMode::Auto)
            } else {
                (host, SizeMode::Auto)
            }
        }
        (-1, -1) => (current, SizeMode::Current),
        (w, h) if w > 0 && h > 0 => (Extent { w, h }, SizeMode::Explicit),
        // Mixed sentinels: keep the window's own value for the
        // non-positive dimension.
        (w, h) => (
            Extent {
                w: if w > 0 { w } else { current.w },
                h: if h > 0 { h } else { current.h },
            },
            SizeMode::Explicit,
        ),
    };

    let mut custom_pos = request.position;
    if let Some(pos) = request.position
        && request.dpi_awareness == DpiAwareness::Aware
        && request.window_dpi != 96
    {
        let dpi = request.window_dpi;
        custom_pos = Some(Pos {
            x: to_native(pos.x, dpi),
            y: to_native(pos.y, dpi),
        });
        extent = Extent {
            w: to_native(extent.w, dpi),
            h: to_native(extent.h, dpi),
        };
    }

    Ok(GeometryState {
        extent,
        custom_pos,
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(width: i32, height: i32) -> EmbeddingRequest {
        EmbeddingRequest {
            width,
            height,
            position: None,
            dpi_awareness: DpiAwareness::Unaware,
            window_dpi: 96,
        }
    }

    const CURRENT: Extent = Extent { w: 400, h: 300 };
    const HOST: Extent = Extent { w: 1920, h: 1080 };

    #[test]
    fn rejects_out_of_range_sentinels() {
        assert!(matches!(
            resolve(&request(-2, 600), CURRENT, HOST),
            Err(Error::InvalidGeometry)
        ));
        assert!(matches!(
            resolve(&request(800, -5), CURRENT, HOST),
            Err(Error::InvalidGeometry)
        ));
    }

    #[test]
    fn auto_keeps_self_sized_window() {
        let state = resolve(&request(0, 0), CURRENT, HOST).unwrap();
        assert_eq!(state.extent, CURRENT);
        assert_eq!(state.mode, SizeMode::Auto);
    }

    #[test]
    fn auto_clamps_oversized_window_to_host() {
        let state = resolve(&request(0, 0), Extent { w: 2000, h: 1200 }, HOST).unwrap();
        assert_eq!(state.extent, HOST);
    }

    #[test]
    fn auto_keeps_window_smaller_in_one_dimension() {
        // Smaller in either dimension counts as self-sized, even when the
        // other dimension exceeds the host.
        let wide = Extent { w: 2000, h: 300 };
        let state = resolve(&request(0, 0), wide, HOST).unwrap();
        assert_eq!(state.extent, wide);

        let tall = Extent { w: 400, h: 1200 };
        let state = resolve(&request(0, 0), tall, HOST).unwrap();
        assert_eq!(state.extent, tall);
    }

    #[test]
    fn current_sentinel_ignores_host() {
        let big = Extent { w: 4000, h: 2500 };
        let state = resolve(&request(-1, -1), big, HOST).unwrap();
        assert_eq!(state.extent, big);
        assert_eq!(state.mode, SizeMode::Current);
    }

    #[test]
    fn explicit_extent_taken_verbatim() {
        let state = resolve(&request(800, 600), CURRENT, HOST).unwrap();
        assert_eq!(state.extent, Extent { w: 800, h: 600 });
        assert_eq!(state.mode, SizeMode::Explicit);
        assert!(!state.uses_custom_position());
    }

    #[test]
    fn dpi_aware_coordinates_convert_with_truncation() {
        let req = EmbeddingRequest {
            width: 800,
            height: 600,
            position: Some(Pos { x: 100, y: 200 }),
            dpi_awareness: DpiAwareness::Aware,
            window_dpi: 144, // 1.5x scale
        };
        let state = resolve(&req, CURRENT, HOST).unwrap();
        assert_eq!(state.custom_pos, Some(Pos { x: 66, y: 133 }));
        assert_eq!(state.extent, Extent { w: 533, h: 400 });
        assert!(state.uses_custom_position());
    }

    #[test]
    fn dpi_unaware_coordinates_stored_unchanged() {
        let req = EmbeddingRequest {
            width: 800,
            height: 600,
            position: Some(Pos { x: 100, y: 200 }),
            dpi_awareness: DpiAwareness::Unaware,
            window_dpi: 144,
        };
        let state = resolve(&req, CURRENT, HOST).unwrap();
        assert_eq!(state.custom_pos, Some(Pos { x: 100, y: 200 }));
        assert_eq!(state.extent, Extent { w: 800, h: 600 });
    }
}
