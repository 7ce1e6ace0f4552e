use crate::{
    Monitor, Result, WindowId,
    geom::{Extent, Rect},
    styles::StylePair,
};

/// Trait abstraction over window operations to improve testability.
///
/// Production code uses [`crate::RealWinOps`]; tests substitute a fake that
/// records calls and serves canned geometry. All methods take `&self`: the
/// underlying window API is stateless from the caller's perspective.
pub trait WindowOps {
    /// True while the handle refers to a live window.
    fn is_window(&self, id: WindowId) -> bool;

    /// The window's bounding rectangle in virtual-screen coordinates.
    fn window_rect(&self, id: WindowId) -> Result<Rect>;

    /// The extent of the window's client area.
    fn client_extent(&self, id: WindowId) -> Result<Extent>;

    /// Make `child` a child of `parent`. Failure is surfaced; the caller
    /// decides whether it is fatal.
    fn set_parent(&self, child: WindowId, parent: WindowId) -> Result<()>;

    /// Current style and extended-style words.
    fn style(&self, id: WindowId) -> StylePair;

    /// Replace the style and extended-style words.
    fn set_style(&self, id: WindowId, pair: StylePair);

    /// Force a frame-change repaint after a style edit.
    fn apply_frame_change(&self, id: WindowId);

    /// Move and resize the window. `rect` is in the parent's client
    /// coordinates for child windows, screen coordinates otherwise.
    fn move_window(&self, id: WindowId, rect: Rect) -> Result<()>;

    /// Re-enable input on the window.
    fn enable(&self, id: WindowId);

    /// Force keyboard focus and foreground status onto the window.
    fn focus(&self, id: WindowId);

    /// The window's parent, if any.
    fn parent(&self, id: WindowId) -> Option<WindowId>;

    /// The current foreground window, if any.
    fn foreground(&self) -> Option<WindowId>;

    /// The monitor hosting the window.
    fn monitor_for(&self, id: WindowId) -> Result<Monitor>;

    /// The DPI the window is rendered at (96 = unscaled).
    fn dpi_for(&self, id: WindowId) -> u32;
}
