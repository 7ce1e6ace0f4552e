//! Window style-bit math for decoration stripping.
//!
//! The bit constants are the documented Win32 values, defined locally so
//! the stripping policy stays testable off-platform. The production
//! implementation applies the result through `SetWindowLongPtrW`.

/// Title bar.
pub const WS_CAPTION: u32 = 0x00C0_0000;
/// Sizing border.
pub const WS_THICKFRAME: u32 = 0x0004_0000;
/// System menu box.
pub const WS_SYSMENU: u32 = 0x0008_0000;
/// Minimize box.
pub const WS_MINIMIZEBOX: u32 = 0x0002_0000;
/// Maximize box.
pub const WS_MAXIMIZEBOX: u32 = 0x0001_0000;
/// Dialog frame.
pub const WS_DLGFRAME: u32 = 0x0040_0000;
/// Thin border.
pub const WS_BORDER: u32 = 0x0080_0000;
/// Child window.
pub const WS_CHILD: u32 = 0x4000_0000;

/// Double border (modal dialog).
pub const WS_EX_DLGMODALFRAME: u32 = 0x0000_0001;
/// Double-buffered composition.
pub const WS_EX_COMPOSITED: u32 = 0x0200_0000;
/// Raised edge border.
pub const WS_EX_WINDOWEDGE: u32 = 0x0000_0100;
/// Sunken edge border.
pub const WS_EX_CLIENTEDGE: u32 = 0x0000_0200;
/// Layered window.
pub const WS_EX_LAYERED: u32 = 0x0008_0000;
/// Static three-dimensional border.
pub const WS_EX_STATICEDGE: u32 = 0x0002_0000;
/// Tool window (thin title bar, no taskbar entry).
pub const WS_EX_TOOLWINDOW: u32 = 0x0000_0080;
/// Forced taskbar entry.
pub const WS_EX_APPWINDOW: u32 = 0x0004_0000;

/// A window's style and extended-style words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StylePair {
    /// GWL_STYLE word.
    pub style: u32,
    /// GWL_EXSTYLE word.
    pub ex_style: u32,
}

/// All decoration bits cleared by embedding.
const STRIP_STYLE: u32 = WS_CAPTION
    | WS_THICKFRAME
    | WS_SYSMENU
    | WS_MINIMIZEBOX
    | WS_MAXIMIZEBOX
    | WS_DLGFRAME
    | WS_BORDER;

/// All extended decoration bits cleared by embedding.
const STRIP_EX_STYLE: u32 = WS_EX_DLGMODALFRAME
    | WS_EX_COMPOSITED
    | WS_EX_WINDOWEDGE
    | WS_EX_CLIENTEDGE
    | WS_EX_LAYERED
    | WS_EX_STATICEDGE
    | WS_EX_TOOLWINDOW
    | WS_EX_APPWINDOW;

/// True when the window currently shows a caption or a sizing frame, i.e.
/// decoration stripping would visibly change it.
#[inline]
#[must_use]
pub fn has_decoration(pair: StylePair) -> bool {
    pair.style & (WS_CAPTION | WS_THICKFRAME) != 0
}

/// The style words after decoration stripping: frame/caption/box bits
/// cleared, child bit set.
#[must_use]
pub fn stripped(pair: StylePair) -> StylePair {
    StylePair {
        style: (pair.style & !STRIP_STYLE) | WS_CHILD,
        ex_style: pair.ex_style & !STRIP_EX_STYLE,
    }
}
