//! Windows Magnification API glue.
//!
//! Owns two windows: a layered, click-through, non-activating popup that
//! tracks the overlay bounds, and the magnifier control child inside it
//! that renders the scaled view. Neither ever takes focus.

use std::{ffi::c_void, mem};

use tracing::{debug, warn};
use win_winops::{geom::Rect, wide_string};
use windows::{
    Win32::{
        Foundation::{COLORREF, HWND, LPARAM, LRESULT, RECT, WPARAM},
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Magnification::{
                MAGTRANSFORM, MagInitialize, MagSetWindowSource, MagSetWindowTransform,
                MagUninitialize,
            },
            WindowsAndMessaging::{
                CreateWindowExW, DefWindowProcW, DestroyWindow, LWA_ALPHA, RegisterClassExW,
                SW_HIDE, SW_SHOWNOACTIVATE, SWP_NOACTIVATE, SWP_NOZORDER,
                SetLayeredWindowAttributes, SetWindowPos, ShowWindow, WNDCLASSEXW, WS_CHILD,
                WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
                WS_VISIBLE,
            },
        },
    },
    core::PCWSTR,
};

use crate::Error;

/// Class name of the overlay's outer popup.
const HOST_CLASS: &str = "WinkioskMagnifierHost";
/// Class registered by `MagInitialize` for the magnifier control.
const MAGNIFIER_CLASS: &str = "Magnifier";

unsafe extern "system" fn host_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

/// The live magnification overlay.
///
/// Construction initializes the OS magnification runtime and creates both
/// windows; any failure is reported once and the caller runs without the
/// feature. Teardown is idempotent.
pub struct Magnifier {
    host: isize,
    control: isize,
    shown: bool,
    active: bool,
}

impl Magnifier {
    /// Initialize the magnification runtime and create the (hidden)
    /// overlay windows.
    pub fn new() -> Result<Self, Error> {
        if !unsafe { MagInitialize() }.as_bool() {
            return Err(Error::Unavailable);
        }

        let instance = unsafe { GetModuleHandleW(None) }.map_err(|e| {
            unsafe { MagUninitialize() };
            Error::Create(format!("GetModuleHandleW failed: {e}"))
        })?;

        let class_name = wide_string(HOST_CLASS);
        let wc = WNDCLASSEXW {
            cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
            lpfnWndProc: Some(host_proc),
            hInstance: instance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            ..Default::default()
        };
        // ERROR_CLASS_ALREADY_EXISTS is fine; anything else surfaces at
        // CreateWindowExW below.
        let _ = unsafe { RegisterClassExW(&wc) };

        let host = unsafe {
            CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOOLWINDOW,
                PCWSTR(class_name.as_ptr()),
                PCWSTR(wide_string("winkiosk magnifier").as_ptr()),
                WS_POPUP,
                0,
                0,
                0,
                0,
                None,
                None,
                instance,
                None,
            )
        }
        .map_err(|e| {
            unsafe { MagUninitialize() };
            Error::Create(format!("overlay host: {e}"))
        })?;

        if let Err(e) = unsafe { SetLayeredWindowAttributes(host, COLORREF(0), 255, LWA_ALPHA) } {
            warn!(error = %e, "magnifier_alpha_failed");
        }

        let control = unsafe {
            CreateWindowExW(
                Default::default(),
                PCWSTR(wide_string(MAGNIFIER_CLASS).as_ptr()),
                PCWSTR(wide_string("magnifier surface").as_ptr()),
                WS_CHILD | WS_VISIBLE,
                0,
                0,
                0,
                0,
                host,
                None,
                instance,
                None,
            )
        }
        .map_err(|e| {
            unsafe {
                let _ = DestroyWindow(host);
                MagUninitialize();
            }
            Error::Create(format!("magnifier control: {e}"))
        })?;

        debug!("magnifier_initialized");
        Ok(Self {
            host: host.0 as isize,
            control: control.0 as isize,
            shown: false,
            active: true,
        })
    }

    #[inline]
    fn host_hwnd(&self) -> HWND {
        HWND(self.host as *mut c_void)
    }

    #[inline]
    fn control_hwnd(&self) -> HWND {
        HWND(self.control as *mut c_void)
    }

    /// Apply a scale-only transform and resize the overlay to `bounds`
    /// (screen coordinates).
    pub fn apply(&self, factor: f32, bounds: Rect) {
        if !self.active {
            return;
        }
        let mut transform = MAGTRANSFORM::default();
        transform.v[0] = factor;
        transform.v[4] = factor;
        transform.v[8] = 1.0;
        unsafe {
            if !MagSetWindowTransform(self.control_hwnd(), &mut transform).as_bool() {
                warn!(factor, "magnifier_transform_failed");
            }
            let _ = SetWindowPos(
                self.host_hwnd(),
                None,
                bounds.x,
                bounds.y,
                bounds.w,
                bounds.h,
                SWP_NOACTIVATE | SWP_NOZORDER,
            );
            // The control fills the host popup.
            let _ = SetWindowPos(
                self.control_hwnd(),
                None,
                0,
                0,
                bounds.w,
                bounds.h,
                SWP_NOACTIVATE | SWP_NOZORDER,
            );
        }
    }

    /// Push the embedded window's current screen rectangle as the
    /// magnified source. No-op after teardown.
    pub fn set_source(&self, source: Rect) {
        if !self.active {
            return;
        }
        let rect = RECT {
            left: source.x,
            top: source.y,
            right: source.right(),
            bottom: source.bottom(),
        };
        let _ = unsafe { MagSetWindowSource(self.control_hwnd(), rect) };
    }

    /// Show the overlay without taking focus from the embedded window.
    pub fn show(&mut self) {
        if self.active && !self.shown {
            let _ = unsafe { ShowWindow(self.host_hwnd(), SW_SHOWNOACTIVATE) };
            self.shown = true;
        }
    }

    /// Hide the overlay.
    pub fn hide(&mut self) {
        if self.active && self.shown {
            let _ = unsafe { ShowWindow(self.host_hwnd(), SW_HIDE) };
            self.shown = false;
        }
    }

    /// Destroy the overlay windows and release the magnification runtime.
    /// Safe to call multiple times.
    pub fn teardown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.shown = false;
        unsafe {
            let _ = DestroyWindow(self.control_hwnd());
            let _ = DestroyWindow(self.host_hwnd());
            let _ = MagUninitialize();
        }
        debug!("magnifier_torn_down");
    }
}

impl Drop for Magnifier {
    fn drop(&mut self) {
        self.teardown();
    }
}
