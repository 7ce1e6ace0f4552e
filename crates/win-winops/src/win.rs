//! Production [`WindowOps`] backed by the Win32 API.

use std::{
    ffi::c_void,
    mem,
    sync::atomic::{AtomicBool, Ordering},
};

use tracing::{trace, warn};
use windows::Win32::{
    Foundation::{HWND, RECT},
    Graphics::Gdi::{
        GetMonitorInfoW, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow,
    },
    UI::{
        HiDpi::GetDpiForWindow,
        Input::KeyboardAndMouse::{EnableWindow, SetFocus},
        WindowsAndMessaging::{
            GWL_EXSTYLE, GWL_STYLE, GetClientRect, GetForegroundWindow, GetParent, GetWindowLongPtrW,
            GetWindowRect, IsWindow, MoveWindow, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE,
            SWP_NOSIZE, SWP_NOZORDER, SetForegroundWindow, SetParent, SetWindowLongPtrW,
            SetWindowPos, ShowCursor,
        },
    },
};

use crate::{
    Error, Monitor, Result, WindowId,
    geom::{Extent, Pos, Rect},
    ops::WindowOps,
    styles::StylePair,
};

#[inline]
fn hwnd(id: WindowId) -> HWND {
    HWND(id.raw() as *mut c_void)
}

#[inline]
fn wid(h: HWND) -> WindowId {
    WindowId::new(h.0 as isize)
}

#[inline]
fn from_win_rect(r: RECT) -> Rect {
    Rect {
        x: r.left,
        y: r.top,
        w: r.right - r.left,
        h: r.bottom - r.top,
    }
}

/// Production implementation of [`WindowOps`] delegating to Win32 calls.
pub struct RealWinOps;

impl WindowOps for RealWinOps {
    fn is_window(&self, id: WindowId) -> bool {
        unsafe { IsWindow(hwnd(id)) }.as_bool()
    }

    fn window_rect(&self, id: WindowId) -> Result<Rect> {
        let mut r = RECT::default();
        unsafe { GetWindowRect(hwnd(id), &mut r) }.map_err(|_| Error::WindowGone(id))?;
        Ok(from_win_rect(r))
    }

    fn client_extent(&self, id: WindowId) -> Result<Extent> {
        let mut r = RECT::default();
        unsafe { GetClientRect(hwnd(id), &mut r) }.map_err(|_| Error::WindowGone(id))?;
        Ok(from_win_rect(r).extent())
    }

    fn set_parent(&self, child: WindowId, parent: WindowId) -> Result<()> {
        unsafe { SetParent(hwnd(child), hwnd(parent)) }
            .map_err(|e| Error::Reparent(e.to_string()))?;
        trace!(?child, ?parent, "reparented");
        Ok(())
    }

    fn style(&self, id: WindowId) -> StylePair {
        let h = hwnd(id);
        unsafe {
            StylePair {
                style: GetWindowLongPtrW(h, GWL_STYLE) as u32,
                ex_style: GetWindowLongPtrW(h, GWL_EXSTYLE) as u32,
            }
        }
    }

    fn set_style(&self, id: WindowId, pair: StylePair) {
        let h = hwnd(id);
        unsafe {
            SetWindowLongPtrW(h, GWL_STYLE, pair.style as isize);
            SetWindowLongPtrW(h, GWL_EXSTYLE, pair.ex_style as isize);
        }
    }

    fn apply_frame_change(&self, id: WindowId) {
        if let Err(e) = unsafe {
            SetWindowPos(
                hwnd(id),
                None,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE | SWP_FRAMECHANGED,
            )
        } {
            warn!(?id, error = %e, "frame_change_failed");
        }
    }

    fn move_window(&self, id: WindowId, rect: Rect) -> Result<()> {
        unsafe { MoveWindow(hwnd(id), rect.x, rect.y, rect.w, rect.h, true) }
            .map_err(|e| Error::Sys(e.to_string()))
    }

    fn enable(&self, id: WindowId) {
        let _ = unsafe { EnableWindow(hwnd(id), true) };
    }

    fn focus(&self, id: WindowId) {
        let h = hwnd(id);
        unsafe {
            let _ = SetForegroundWindow(h);
            let _ = SetFocus(h);
        }
    }

    fn parent(&self, id: WindowId) -> Option<WindowId> {
        let p = unsafe { GetParent(hwnd(id)) }.ok()?;
        if p.0.is_null() { None } else { Some(wid(p)) }
    }

    fn foreground(&self) -> Option<WindowId> {
        let h = unsafe { GetForegroundWindow() };
        if h.0.is_null() { None } else { Some(wid(h)) }
    }

    fn monitor_for(&self, id: WindowId) -> Result<Monitor> {
        let hm = unsafe { MonitorFromWindow(hwnd(id), MONITOR_DEFAULTTONEAREST) };
        if hm.is_invalid() {
            return Err(Error::Monitor(id));
        }
        let mut info = MONITORINFO {
            cbSize: mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        if !unsafe { GetMonitorInfoW(hm, &mut info) }.as_bool() {
            return Err(Error::Monitor(id));
        }
        let r = from_win_rect(info.rcMonitor);
        Ok(Monitor {
            origin: Pos { x: r.x, y: r.y },
            extent: r.extent(),
        })
    }

    fn dpi_for(&self, id: WindowId) -> u32 {
        let dpi = unsafe { GetDpiForWindow(hwnd(id)) };
        if dpi == 0 { 96 } else { dpi }
    }
}

// ShowCursor keeps a per-thread display counter; the flag keeps hide/show
// balanced so repeated focus flips cannot push the counter below -1.
static CURSOR_HIDDEN: AtomicBool = AtomicBool::new(false);

/// Hide the system cursor (no-op when already hidden by us).
pub fn hide_cursor() {
    if !CURSOR_HIDDEN.swap(true, Ordering::SeqCst) {
        let _ = unsafe { ShowCursor(false) };
    }
}

/// Restore the system cursor (no-op unless we hid it).
pub fn show_cursor() {
    if CURSOR_HIDDEN.swap(false, Ordering::SeqCst) {
        let _ = unsafe { ShowCursor(true) };
    }
}

/// Convert a &str to a null-terminated wide string.
pub fn wide_string(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
