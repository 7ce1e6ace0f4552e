//! Message-routing policy: timer identities and click arbitration.
//!
//! The wndproc itself lives in `app` (Windows only); the decisions it
//! makes are pure functions here so they stay testable anywhere.

use win_hotkey::{HotkeyAction, action_for_id};
use win_winops::geom::{Pos, Rect};

/// Slow poll comparing the embedded window's live extent to the cached one.
pub const TIMER_DRIFT: usize = 1;
/// Fast poll pushing the embedded screen rect as the magnifier source.
pub const TIMER_MAGNIFIER: usize = 2;
/// One-shot decoration re-strip after embedding.
pub const TIMER_RESTRIP: usize = 3;

/// Drift poll period.
pub const DRIFT_INTERVAL_MS: u32 = 500;
/// Magnifier source refresh period (~60 Hz).
pub const MAGNIFIER_INTERVAL_MS: u32 = 16;
/// Delay before the one-shot re-strip fires.
pub const RESTRIP_DELAY_MS: u32 = 500;

/// What a timer message means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Check the embedded window for self-resizing.
    DriftCheck,
    /// Refresh the magnifier source rectangle.
    MagnifierRefresh,
    /// Fire the deferred decoration re-strip (exactly once).
    Restrip,
}

/// Map a timer id to its action; foreign timer ids are ignored.
#[must_use]
pub fn timer_action(id: usize) -> Option<TimerAction> {
    match id {
        TIMER_DRIFT => Some(TimerAction::DriftCheck),
        TIMER_MAGNIFIER => Some(TimerAction::MagnifierRefresh),
        TIMER_RESTRIP => Some(TimerAction::Restrip),
        _ => None,
    }
}

/// What to do with a button-down in the host client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRouting {
    /// The click landed on the embedded window; leave it alone.
    PassThrough,
    /// The click landed on host chrome; swallow it and push focus back
    /// onto the embedded window.
    RedirectFocus,
}

/// Route a click at `pos` (host client coordinates) against the embedded
/// window's bounds within the host.
#[must_use]
pub fn route_click(pos: Pos, embedded_bounds: Rect) -> ClickRouting {
    if embedded_bounds.contains(pos) {
        ClickRouting::PassThrough
    } else {
        ClickRouting::RedirectFocus
    }
}

/// Map a zoom hotkey message to its action. Zoom exists only while the
/// magnification overlay is available; without it every press is ignored
/// instead of mutating state nothing renders.
#[must_use]
pub fn route_hotkey(id: i32, magnifier_available: bool) -> Option<HotkeyAction> {
    if !magnifier_available {
        return None;
    }
    action_for_id(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_ids_map_to_actions() {
        assert_eq!(timer_action(TIMER_DRIFT), Some(TimerAction::DriftCheck));
        assert_eq!(
            timer_action(TIMER_MAGNIFIER),
            Some(TimerAction::MagnifierRefresh)
        );
        assert_eq!(timer_action(TIMER_RESTRIP), Some(TimerAction::Restrip));
        assert_eq!(timer_action(0), None);
        assert_eq!(timer_action(42), None);
    }

    #[test]
    fn clicks_inside_embedded_bounds_pass_through() {
        let bounds = Rect::new(560, 240, 800, 600);
        assert_eq!(
            route_click(Pos { x: 560, y: 240 }, bounds),
            ClickRouting::PassThrough
        );
        assert_eq!(
            route_click(Pos { x: 1359, y: 839 }, bounds),
            ClickRouting::PassThrough
        );
    }

    #[test]
    fn hotkeys_ignored_without_magnifier() {
        assert_eq!(route_hotkey(1, false), None);
        assert_eq!(route_hotkey(2, false), None);
        assert_eq!(route_hotkey(3, false), None);
        assert_eq!(route_hotkey(1, true), Some(HotkeyAction::ZoomIn));
        assert_eq!(route_hotkey(2, true), Some(HotkeyAction::ZoomOut));
        assert_eq!(route_hotkey(3, true), Some(HotkeyAction::ZoomReset));
        assert_eq!(route_hotkey(42, true), None);
    }

    #[test]
    fn clicks_one_pixel_outside_are_swallowed() {
        let bounds = Rect::new(560, 240, 800, 600);
        assert_eq!(
            route_click(Pos { x: 559, y: 240 }, bounds),
            ClickRouting::RedirectFocus
        );
        assert_eq!(
            route_click(Pos { x: 1360, y: 500 }, bounds),
            ClickRouting::RedirectFocus
        );
        assert_eq!(
            route_click(Pos { x: 700, y: 840 }, bounds),
            ClickRouting::RedirectFocus
        );
    }
}
