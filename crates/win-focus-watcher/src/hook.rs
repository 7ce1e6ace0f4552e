//! Process-wide WinEvent foreground hook.
//!
//! The OS delivers foreground changes through a bare `extern "system"`
//! callback with no closure context, so the active subscription lives in a
//! process-wide slot and the callback forwards into it. One subscription at
//! a time; a second [`subscribe`] fails rather than silently stacking.

use std::ffi::c_void;

use parking_lot::Mutex;
use tracing::{debug, warn};
use win_winops::WindowId;
use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::{
        Accessibility::{HWINEVENTHOOK, SetWinEventHook, UnhookWinEvent},
        WindowsAndMessaging::{
            EVENT_SYSTEM_FOREGROUND, GetForegroundWindow, PostMessageW, WINEVENT_OUTOFCONTEXT,
        },
    },
};

use crate::{Error, MSG_FOREGROUND};

/// The active subscription: raw hook handle plus the window that receives
/// forwarded [`MSG_FOREGROUND`] messages. Handles stored as `isize` so the
/// slot is `Send`.
struct Subscription {
    hook: isize,
    target: isize,
}

static ACTIVE: Mutex<Option<Subscription>> = Mutex::new(None);

/// Forwards each foreground change to the subscribed window's message loop.
unsafe extern "system" fn on_foreground(
    _hook: HWINEVENTHOOK,
    _event: u32,
    hwnd: HWND,
    _id_object: i32,
    _id_child: i32,
    _id_event_thread: u32,
    _time: u32,
) {
    let target = match ACTIVE.lock().as_ref() {
        Some(sub) => sub.target,
        None => return,
    };
    let _ = unsafe {
        PostMessageW(
            HWND(target as *mut c_void),
            MSG_FOREGROUND,
            WPARAM(0),
            LPARAM(hwnd.0 as isize),
        )
    };
}

/// Install the foreground hook and direct notifications at `host`.
///
/// Immediately posts one notification carrying the *current* foreground
/// window so a focus change that happened before subscription is still
/// observed. Fails if a subscription is already active.
pub fn subscribe(host: WindowId) -> Result<(), Error> {
    let mut active = ACTIVE.lock();
    if active.is_some() {
        return Err(Error::AlreadySubscribed);
    }
    let hook = unsafe {
        SetWinEventHook(
            EVENT_SYSTEM_FOREGROUND,
            EVENT_SYSTEM_FOREGROUND,
            None,
            Some(on_foreground),
            0,
            0,
            WINEVENT_OUTOFCONTEXT,
        )
    };
    if hook.0.is_null() {
        warn!("foreground_hook_install_failed");
        return Err(Error::HookInstall);
    }
    *active = Some(Subscription {
        hook: hook.0 as isize,
        target: host.raw(),
    });
    drop(active);
    debug!("foreground_hook_installed");

    // Seed with the current foreground window.
    let fg = unsafe { GetForegroundWindow() };
    let _ = unsafe {
        PostMessageW(
            HWND(host.raw() as *mut c_void),
            MSG_FOREGROUND,
            WPARAM(0),
            LPARAM(fg.0 as isize),
        )
    };
    Ok(())
}

/// Remove the hook and clear the subscription. Idempotent.
pub fn unsubscribe() {
    let mut active = ACTIVE.lock();
    if let Some(sub) = active.take() {
        let ok = unsafe { UnhookWinEvent(HWINEVENTHOOK(sub.hook as *mut c_void)) };
        debug!(unhooked = ok.as_bool(), "foreground_hook_removed");
    }
}
