//! Composition root and message loop.
//!
//! Owns the `Session` (the one place all window handles live), the host
//! window's wndproc, and the startup/teardown sequence. All OS events
//! arrive on this single loop: paint, resize, clicks, both poll timers,
//! the one-shot re-strip timer, forwarded foreground changes, and the
//! zoom hotkeys.

use std::{ffi::c_void, mem, process};

use tracing::{error, info, warn};
use win_winops::{
    Monitor, RealWinOps, WindowId, WindowOps,
    geom::{Extent, Pos, Rect},
    hide_cursor, show_cursor, wide_string,
};
use windows::{
    Win32::{
        Foundation::{HWND, LPARAM, LRESULT, WPARAM},
        System::LibraryLoader::GetModuleHandleW,
        Graphics::Gdi::{
            BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BLACK_BRUSH, BeginPaint, DIB_RGB_COLORS,
            EndPaint, GetStockObject, HBRUSH, HDC, InvalidateRect, PAINTSTRUCT, SRCCOPY,
            StretchDIBits,
        },
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GWLP_USERDATA,
            GetMessageW, GetWindowLongPtrW, KillTimer, MB_ICONERROR, MB_OK, MSG, MessageBoxW,
            PostQuitMessage, RegisterClassExW, SetTimer, SetWindowLongPtrW, TranslateMessage,
            WM_CLOSE, WM_DESTROY, WM_HOTKEY, WM_LBUTTONDOWN, WM_PAINT, WM_SIZE, WM_TIMER,
            WNDCLASSEXW, WS_POPUP, WS_VISIBLE,
        },
    },
    core::PCWSTR,
};

use magnify::{ZoomMode, ZoomState, classify_factor, overlay_rect, sys::Magnifier};
use win_focus_watcher::{FocusArbiter, FocusState, MSG_FOREGROUND};
use win_hotkey::HotkeyAction;

use crate::{
    args::Cli,
    assets::{Anchor, Bitmap, load_bitmap, overlay_origin},
    embed::EmbeddingController,
    error::Error,
    geometry::{self, EmbeddingRequest},
    router::{
        self, ClickRouting, DRIFT_INTERVAL_MS, MAGNIFIER_INTERVAL_MS, RESTRIP_DELAY_MS,
        TIMER_DRIFT, TIMER_MAGNIFIER, TIMER_RESTRIP, TimerAction,
    },
    target,
};

/// Host window class.
const HOST_CLASS: &str = "WinkioskHost";

#[inline]
fn hwnd_of(id: WindowId) -> HWND {
    HWND(id.raw() as *mut c_void)
}

/// Log a fatal startup error, show the blocking dialog, and exit.
///
/// The exit code is success on every path; errors surface only through the
/// dialog and the log.
fn fatal(err: &Error) -> ! {
    error!(%err, "fatal_startup_error");
    let text = wide_string(&err.to_string());
    let caption = wide_string("winkiosk");
    unsafe {
        MessageBoxW(
            None,
            PCWSTR(text.as_ptr()),
            PCWSTR(caption.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
    process::exit(0)
}

/// Everything the message loop touches, owned in one place and reachable
/// from the wndproc via GWLP_USERDATA.
struct Session {
    ops: RealWinOps,
    host: WindowId,
    controller: EmbeddingController,
    arbiter: FocusArbiter,
    zoom: ZoomState,
    magnifier: Option<Magnifier>,
    background: Option<Bitmap>,
    overlay: Option<(Bitmap, Anchor)>,
    /// Extent last seen by the drift timer.
    cached_extent: Extent,
}

impl Session {
    /// Dispatch one message. `None` falls through to `DefWindowProcW`.
    fn handle(&mut self, hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<LRESULT> {
        match msg {
            WM_PAINT => {
                self.paint(hwnd);
                Some(LRESULT(0))
            }
            WM_SIZE => {
                if let Err(e) = self.controller.on_host_resize(&self.ops) {
                    warn!(error = %e, "host_resize_failed");
                }
                if self.zoom.is_active() {
                    self.apply_zoom();
                }
                let _ = unsafe { InvalidateRect(hwnd, None, true) };
                Some(LRESULT(0))
            }
            WM_LBUTTONDOWN => {
                let pos = Pos {
                    x: (lparam.0 & 0xFFFF) as i16 as i32,
                    y: ((lparam.0 >> 16) & 0xFFFF) as i16 as i32,
                };
                let client = self.ops.client_extent(self.host).unwrap_or_default();
                match router::route_click(pos, self.controller.bounds_in_host(client)) {
                    ClickRouting::PassThrough => None,
                    ClickRouting::RedirectFocus => {
                        self.ops.focus(self.controller.embedded());
                        Some(LRESULT(0))
                    }
                }
            }
            MSG_FOREGROUND => {
                let fg = (lparam.0 != 0).then(|| WindowId::new(lparam.0));
                match self.arbiter.note(&self.ops, fg) {
                    Some(FocusState::Inside) => self.on_focus_inside(),
                    Some(FocusState::Outside) => self.on_focus_outside(),
                    None => {}
                }
                Some(LRESULT(0))
            }
            WM_TIMER => match router::timer_action(wparam.0) {
                Some(TimerAction::DriftCheck) => {
                    self.drift_check();
                    Some(LRESULT(0))
                }
                Some(TimerAction::MagnifierRefresh) => {
                    self.refresh_magnifier_source();
                    Some(LRESULT(0))
                }
                Some(TimerAction::Restrip) => {
                    // One-shot: kill first so a slow handler can't refire.
                    let _ = unsafe { KillTimer(hwnd, TIMER_RESTRIP) };
                    self.controller.restrip(&self.ops);
                    Some(LRESULT(0))
                }
                None => None,
            },
            WM_HOTKEY => {
                let changed =
                    match router::route_hotkey(wparam.0 as i32, self.magnifier.is_some()) {
                        Some(HotkeyAction::ZoomIn) => self.zoom.zoom_in(),
                        Some(HotkeyAction::ZoomOut) => self.zoom.zoom_out(),
                        Some(HotkeyAction::ZoomReset) => self.zoom.reset(),
                        None => false,
                    };
                if changed {
                    self.apply_zoom();
                }
                Some(LRESULT(0))
            }
            WM_CLOSE => {
                let _ = unsafe { DestroyWindow(hwnd) };
                Some(LRESULT(0))
            }
            WM_DESTROY => {
                unsafe { PostQuitMessage(0) };
                Some(LRESULT(0))
            }
            _ => None,
        }
    }

    /// Focus came back inside the container: re-enable the embedded window
    /// and force input onto it; bring the overlay back when zoomed.
    fn on_focus_inside(&mut self) {
        let embedded = self.controller.embedded();
        self.ops.enable(embedded);
        self.ops.focus(embedded);
        if self.zoom.is_active()
            && let Some(mag) = self.magnifier.as_mut()
        {
            mag.show();
            hide_cursor();
        }
    }

    /// Focus left for the rest of the desktop: drop the overlay and give
    /// the cursor back.
    fn on_focus_outside(&mut self) {
        if let Some(mag) = self.magnifier.as_mut() {
            mag.hide();
        }
        show_cursor();
    }

    /// Apply the current zoom factor to the overlay, or disable it when
    /// the factor is (near) 1.0.
    fn apply_zoom(&mut self) {
        let Some(mag) = self.magnifier.as_mut() else {
            return;
        };
        match classify_factor(self.zoom.factor()) {
            Err(_) | Ok(ZoomMode::Disabled) => {
                mag.hide();
                show_cursor();
            }
            Ok(ZoomMode::Scale(factor)) => {
                let embedded = self.controller.embedded();
                let (Ok(host_rect), Ok(embedded_rect)) = (
                    self.ops.window_rect(self.host),
                    self.ops.window_rect(embedded),
                ) else {
                    return;
                };
                mag.apply(factor, overlay_rect(host_rect, embedded_rect.extent(), factor));
                mag.set_source(embedded_rect);
                // Only surface the overlay while the embedded window holds
                // focus; shown without activating either way.
                if self.arbiter.last() == FocusState::Inside {
                    mag.show();
                    hide_cursor();
                }
            }
        }
    }

    /// Slow poll: notice the embedded app resizing itself.
    fn drift_check(&mut self) {
        let embedded = self.controller.embedded();
        if !self.ops.is_window(embedded) {
            return;
        }
        let Ok(rect) = self.ops.window_rect(embedded) else {
            return;
        };
        if rect.extent() != self.cached_extent {
            self.cached_extent = rect.extent();
            if let Err(e) = self.controller.on_drift(&self.ops, rect.extent()) {
                warn!(error = %e, "drift_reposition_failed");
            }
            if self.zoom.is_active() {
                self.apply_zoom();
            }
        }
    }

    /// Fast poll: track the embedded app's own animation/movement in the
    /// magnified view.
    fn refresh_magnifier_source(&self) {
        if !self.zoom.is_active() {
            return;
        }
        let Some(mag) = self.magnifier.as_ref() else {
            return;
        };
        let embedded = self.controller.embedded();
        if let Ok(rect) = self.ops.window_rect(embedded) {
            mag.set_source(rect);
        }
    }

    fn paint(&self, hwnd: HWND) {
        let mut ps = PAINTSTRUCT::default();
        let hdc = unsafe { BeginPaint(hwnd, &mut ps) };
        let client = self.ops.client_extent(self.host).unwrap_or_default();
        if let Some(bg) = &self.background {
            blit(hdc, bg, Rect::new(0, 0, client.w, client.h));
        }
        if let Some((img, anchor)) = &self.overlay {
            let origin = overlay_origin(*anchor, client, img.extent());
            blit(hdc, img, Rect::new(origin.x, origin.y, img.w, img.h));
        }
        let _ = unsafe { EndPaint(hwnd, &ps) };
    }
}

/// Blit a top-down BGRA bitmap into `dest` on the device context.
fn blit(hdc: HDC, bmp: &Bitmap, dest: Rect) {
    let bmi = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: bmp.w,
            biHeight: -bmp.h, // Top-down DIB
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        ..Default::default()
    };
    unsafe {
        StretchDIBits(
            hdc,
            dest.x,
            dest.y,
            dest.w,
            dest.h,
            0,
            0,
            bmp.w,
            bmp.h,
            Some(bmp.bgra.as_ptr() as *const c_void),
            &bmi,
            DIB_RGB_COLORS,
            SRCCOPY,
        );
    }
}

unsafe extern "system" fn host_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let session = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *mut Session;
    if !session.is_null()
        && let Some(result) = unsafe { &mut *session }.handle(hwnd, msg, wparam, lparam)
    {
        return result;
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

/// Register the host class and create the borderless host window covering
/// the monitor.
fn create_host(monitor: &Monitor) -> Result<WindowId, Error> {
    let instance =
        unsafe { GetModuleHandleW(None) }.map_err(|_| Error::ClassRegistration)?;
    let class_name = wide_string(HOST_CLASS);
    let wc = WNDCLASSEXW {
        cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
        lpfnWndProc: Some(host_proc),
        hInstance: instance.into(),
        hbrBackground: HBRUSH(unsafe { GetStockObject(BLACK_BRUSH) }.0),
        lpszClassName: PCWSTR(class_name.as_ptr()),
        ..Default::default()
    };
    if unsafe { RegisterClassExW(&wc) } == 0 {
        return Err(Error::ClassRegistration);
    }
    let hwnd = unsafe {
        CreateWindowExW(
            Default::default(),
            PCWSTR(class_name.as_ptr()),
            PCWSTR(wide_string("winkiosk").as_ptr()),
            WS_POPUP | WS_VISIBLE,
            monitor.origin.x,
            monitor.origin.y,
            monitor.extent.w,
            monitor.extent.h,
            None,
            None,
            instance,
            None,
        )
    }
    .map_err(|e| Error::HostCreate(e.to_string()))?;
    Ok(WindowId::new(hwnd.0 as isize))
}

/// Resolve the target window per the CLI: by title, or by launching.
fn resolve_target(cli: &Cli) -> Result<WindowId, Error> {
    if let Some(title) = &cli.title {
        return target::find_by_title(title).ok_or_else(|| Error::TargetNotFound(title.clone()));
    }
    // clap guarantees exactly one of the two.
    let command = cli.launch.as_deref().unwrap_or_default();
    let pid = target::launch(command)?;
    target::wait_for_window(pid).ok_or_else(|| Error::TargetNotFound(command.to_string()))
}

/// Full startup/run/teardown sequence. Never returns an error: fatal
/// startup problems exit through [`fatal`].
pub fn run(cli: Cli) {
    let ops = RealWinOps;

    let embedded = resolve_target(&cli).unwrap_or_else(|e| fatal(&e));
    let pid = target::owning_process(embedded).unwrap_or_else(|e| fatal(&e));
    let monitor = ops.monitor_for(embedded).unwrap_or_else(|e| fatal(&e.into()));
    let current = ops
        .window_rect(embedded)
        .unwrap_or_else(|e| fatal(&e.into()))
        .extent();

    let request = EmbeddingRequest {
        width: cli.width,
        height: cli.height,
        position: cli.x.zip(cli.y).map(|(x, y)| Pos { x, y }),
        dpi_awareness: target::dpi_awareness(pid),
        window_dpi: ops.dpi_for(embedded),
    };
    let state = geometry::resolve(&request, current, monitor.extent).unwrap_or_else(|e| fatal(&e));

    let host = create_host(&monitor).unwrap_or_else(|e| fatal(&e));
    info!(?host, ?embedded, pid, "host_created");

    let magnifier = match Magnifier::new() {
        Ok(m) => Some(m),
        Err(e) => {
            warn!(error = %e, "magnification_unavailable");
            None
        }
    };

    let mut session = Box::new(Session {
        ops,
        host,
        controller: EmbeddingController::new(host, embedded, monitor, request, state),
        arbiter: FocusArbiter::new(host, embedded),
        zoom: ZoomState::new(),
        magnifier,
        background: cli.background.as_deref().and_then(load_bitmap),
        overlay: cli
            .overlay
            .as_deref()
            .and_then(load_bitmap)
            .map(|b| (b, cli.overlay_anchor)),
        cached_extent: state.extent,
    });
    unsafe {
        SetWindowLongPtrW(
            hwnd_of(host),
            GWLP_USERDATA,
            &mut *session as *mut Session as isize,
        );
    }

    if let Err(e) = session.controller.embed(&session.ops) {
        fatal(&e);
    }
    if let Err(e) = session.controller.position(&session.ops) {
        warn!(error = %e, "initial_position_failed");
    }

    unsafe {
        SetTimer(hwnd_of(host), TIMER_DRIFT, DRIFT_INTERVAL_MS, None);
        SetTimer(hwnd_of(host), TIMER_MAGNIFIER, MAGNIFIER_INTERVAL_MS, None);
        SetTimer(hwnd_of(host), TIMER_RESTRIP, RESTRIP_DELAY_MS, None);
    }
    if let Err(e) = win_focus_watcher::subscribe(host) {
        warn!(error = %e, "focus_watcher_unavailable");
    }
    // No magnifier means no zoom at all; leave the chords to other apps.
    if session.magnifier.is_some() {
        let _ = win_hotkey::register_all(host);
    }

    let mut msg = MSG::default();
    while unsafe { GetMessageW(&mut msg, None, 0, 0) }.0 > 0 {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    win_focus_watcher::unsubscribe();
    win_hotkey::unregister_all(host);
    if let Some(mag) = session.magnifier.as_mut() {
        mag.teardown();
    }
    show_cursor();
    target::kill(pid);
    info!("shutdown_complete");
}
