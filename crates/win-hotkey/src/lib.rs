//! win-hotkey: global zoom hotkeys for winkiosk.
//!
//! Three fixed system-wide chords against the host window:
//! Ctrl+Alt+'=' (zoom in), Ctrl+Alt+'-' (zoom out), Ctrl+Alt+'0' (reset).
//! Registration is per-key and non-fatal: a chord another application
//! already owns is logged and simply unavailable.

#[cfg(not(target_os = "windows"))]
use win_winops::WindowId;

/// Action bound to a registered hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Step the zoom factor up.
    ZoomIn,
    /// Step the zoom factor down.
    ZoomOut,
    /// Return to factor 1.0.
    ZoomReset,
}

/// Hotkey id as it arrives in the hotkey message's wparam.
const ID_ZOOM_IN: i32 = 1;
const ID_ZOOM_OUT: i32 = 2;
const ID_ZOOM_RESET: i32 = 3;

/// Map a hotkey message id back to its action. Unknown ids (stale messages
/// from a previous registration) map to `None`.
#[must_use]
pub fn action_for_id(id: i32) -> Option<HotkeyAction> {
    match id {
        ID_ZOOM_IN => Some(HotkeyAction::ZoomIn),
        ID_ZOOM_OUT => Some(HotkeyAction::ZoomOut),
        ID_ZOOM_RESET => Some(HotkeyAction::ZoomReset),
        _ => None,
    }
}

#[cfg(target_os = "windows")]
mod sys {
    use std::ffi::c_void;

    use tracing::{debug, warn};
    use win_winops::WindowId;
    use windows::Win32::{
        Foundation::HWND,
        UI::Input::KeyboardAndMouse::{
            MOD_ALT, MOD_CONTROL, RegisterHotKey, UnregisterHotKey, VK_OEM_MINUS, VK_OEM_PLUS,
        },
    };

    use super::{ID_ZOOM_IN, ID_ZOOM_OUT, ID_ZOOM_RESET};

    /// Virtual-key code for the top-row '0'.
    const VK_0: u32 = 0x30;

    /// Register all three zoom chords against `host`. Returns how many
    /// registrations succeeded; each failure is logged and skipped.
    pub fn register_all(host: WindowId) -> usize {
        let hwnd = HWND(host.raw() as *mut c_void);
        let chords = [
            (ID_ZOOM_IN, VK_OEM_PLUS.0 as u32, "zoom_in"),
            (ID_ZOOM_OUT, VK_OEM_MINUS.0 as u32, "zoom_out"),
            (ID_ZOOM_RESET, VK_0, "zoom_reset"),
        ];
        let mut registered = 0;
        for (id, vk, name) in chords {
            match unsafe { RegisterHotKey(hwnd, id, MOD_CONTROL | MOD_ALT, vk) } {
                Ok(()) => {
                    debug!(hotkey = name, "hotkey_registered");
                    registered += 1;
                }
                Err(e) => warn!(hotkey = name, error = %e, "hotkey_register_failed"),
            }
        }
        registered
    }

    /// Unregister every chord. Safe to call for chords that never
    /// registered; those unregistrations simply fail quietly.
    pub fn unregister_all(host: WindowId) {
        let hwnd = HWND(host.raw() as *mut c_void);
        for id in [ID_ZOOM_IN, ID_ZOOM_OUT, ID_ZOOM_RESET] {
            let _ = unsafe { UnregisterHotKey(hwnd, id) };
        }
    }
}

#[cfg(target_os = "windows")]
pub use sys::{register_all, unregister_all};

#[cfg(not(target_os = "windows"))]
/// Stub for non-Windows builds; registers nothing.
pub fn register_all(_host: WindowId) -> usize {
    0
}

#[cfg(not(target_os = "windows"))]
/// Stub for non-Windows builds.
pub fn unregister_all(_host: WindowId) {}
