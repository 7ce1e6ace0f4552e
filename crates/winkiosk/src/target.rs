//! Target window resolution and the owning foreign process.
//!
//! Thin wrappers around window enumeration and process queries: find the
//! target by title substring or launch it and wait for its main window,
//! classify its DPI awareness, and force-kill it at shutdown.

use std::{ffi::c_void, process::Command, thread, time::Duration};

use tracing::{debug, warn};
use win_winops::WindowId;
use windows::Win32::{
    Foundation::{CloseHandle, HWND, LPARAM},
    System::Threading::{
        OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE, TerminateProcess,
    },
    UI::{
        HiDpi::{GetProcessDpiAwareness, PROCESS_DPI_UNAWARE},
        WindowsAndMessaging::{
            EnumWindows, GetWindowTextW, GetWindowThreadProcessId, IsWindowVisible,
        },
    },
};

use crate::{
    error::{Error, Result},
    geometry::DpiAwareness,
};

/// Poll cadence/attempts while waiting for a launched target's window.
const WAIT_ATTEMPTS: u32 = 50;
const WAIT_INTERVAL: Duration = Duration::from_millis(100);

/// Search criteria for the window enumeration callback.
struct FindCtx {
    title_needle: Option<String>,
    pid: Option<u32>,
    found: Option<isize>,
}

unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> windows::Win32::Foundation::BOOL {
    let ctx = unsafe { &mut *(lparam.0 as *mut FindCtx) };
    unsafe {
        if !IsWindowVisible(hwnd).as_bool() {
            return true.into();
        }
        if let Some(want_pid) = ctx.pid {
            let mut pid = 0u32;
            GetWindowThreadProcessId(hwnd, Some(&mut pid));
            if pid != want_pid {
                return true.into();
            }
        }
        if let Some(needle) = &ctx.title_needle {
            let mut buf = [0u16; 512];
            let len = GetWindowTextW(hwnd, &mut buf) as usize;
            if len == 0 {
                return true.into();
            }
            let title = String::from_utf16_lossy(&buf[..len]).to_lowercase();
            if !title.contains(needle) {
                return true.into();
            }
        }
        ctx.found = Some(hwnd.0 as isize);
    }
    false.into()
}

fn find(ctx: &mut FindCtx) -> Option<WindowId> {
    // EnumWindows reports failure when the callback stops it early; a find
    // hit is not an error.
    let _ = unsafe { EnumWindows(Some(enum_callback), LPARAM(ctx as *mut FindCtx as isize)) };
    ctx.found.map(WindowId::new)
}

/// First visible top-level window whose title contains `needle`
/// (case-insensitive).
pub fn find_by_title(needle: &str) -> Option<WindowId> {
    find(&mut FindCtx {
        title_needle: Some(needle.to_lowercase()),
        pid: None,
        found: None,
    })
}

/// First visible titled top-level window owned by `pid`.
pub fn find_for_pid(pid: u32) -> Option<WindowId> {
    find(&mut FindCtx {
        title_needle: Some(String::new()),
        pid: Some(pid),
        found: None,
    })
}

/// Spawn `command` and return its pid. The child is left detached; the
/// window-system handle is what the kiosk tracks from here on.
pub fn launch(command: &str) -> Result<u32> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| Error::Launch("empty command".into()))?;
    let child = Command::new(program)
        .args(parts)
        .spawn()
        .map_err(|e| Error::Launch(e.to_string()))?;
    let pid = child.id();
    debug!(pid, command, "target_launched");
    Ok(pid)
}

/// Wait for a freshly launched process to present a visible main window.
pub fn wait_for_window(pid: u32) -> Option<WindowId> {
    for _ in 0..WAIT_ATTEMPTS {
        if let Some(id) = find_for_pid(pid) {
            return Some(id);
        }
        thread::sleep(WAIT_INTERVAL);
    }
    None
}

/// The pid owning the window. Fatal when the OS cannot name one.
pub fn owning_process(id: WindowId) -> Result<u32> {
    let mut pid = 0u32;
    let thread =
        unsafe { GetWindowThreadProcessId(HWND(id.raw() as *mut c_void), Some(&mut pid)) };
    if thread == 0 || pid == 0 {
        return Err(Error::TargetProcess);
    }
    Ok(pid)
}

/// Classify the process's DPI awareness. Query failures degrade to
/// `Unaware` (no coordinate conversion).
pub fn dpi_awareness(pid: u32) -> DpiAwareness {
    let handle = match unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) } {
        Ok(h) => h,
        Err(e) => {
            warn!(pid, error = %e, "dpi_awareness_open_failed");
            return DpiAwareness::Unaware;
        }
    };
    let awareness = unsafe { GetProcessDpiAwareness(handle) };
    let _ = unsafe { CloseHandle(handle) };
    match awareness {
        Ok(a) if a == PROCESS_DPI_UNAWARE => DpiAwareness::Unaware,
        Ok(_) => DpiAwareness::Aware,
        Err(e) => {
            warn!(pid, error = %e, "dpi_awareness_query_failed");
            DpiAwareness::Unaware
        }
    }
}

/// Force-kill the tracked foreign process. Failures are logged, not
/// surfaced; the host is exiting either way.
pub fn kill(pid: u32) {
    let handle = match unsafe { OpenProcess(PROCESS_TERMINATE, false, pid) } {
        Ok(h) => h,
        Err(e) => {
            warn!(pid, error = %e, "target_kill_open_failed");
            return;
        }
    };
    if let Err(e) = unsafe { TerminateProcess(handle, 1) } {
        warn!(pid, error = %e, "target_kill_failed");
    } else {
        debug!(pid, "target_terminated");
    }
    let _ = unsafe { CloseHandle(handle) };
}
