//! win-focus-watcher: observe foreground-window changes for winkiosk.
//!
//! Two halves:
//! - [`FocusArbiter`]: platform-neutral classification and edge detection.
//!   Given the current foreground window it decides whether focus is inside
//!   the container (the host, the embedded window, or any descendant of the
//!   host) and reports only *transitions*, never repeats.
//! - The process-wide WinEvent hook (Windows only): exactly one
//!   subscription may be active at a time. Rather than invoking callers on
//!   the hook thread, every foreground change is forwarded as a
//!   [`MSG_FOREGROUND`] message posted to the subscribing window, so all
//!   focus handling stays on the single message loop. Subscribing also
//!   posts the *current* foreground window once, covering focus changes
//!   that happened before the hook was installed.

use thiserror::Error;
use win_winops::{WindowId, WindowOps};

#[cfg(target_os = "windows")]
mod hook;

#[cfg(target_os = "windows")]
pub use hook::{subscribe, unsubscribe};

/// Window message carrying a foreground change; `lparam` is the raw handle
/// of the new foreground window (0 when none).
pub const MSG_FOREGROUND: u32 = 0x8000 + 1; // WM_APP + 1

/// Errors from the hook half of the watcher.
#[derive(Debug, Error)]
pub enum Error {
    /// A subscription is already active; only one may exist process-wide.
    #[error("focus watcher already subscribed")]
    AlreadySubscribed,
    /// The OS rejected the WinEvent hook.
    #[error("failed to install foreground event hook")]
    HookInstall,
}

/// Which side of the container currently holds focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    /// The host, the embedded window, or a descendant of the host.
    Inside,
    /// Anything else on the desktop.
    Outside,
}

/// Edge-triggered inside/outside classifier for foreground changes.
#[derive(Debug)]
pub struct FocusArbiter {
    host: WindowId,
    embedded: WindowId,
    last: FocusState,
}

/// Cap on parent-link hops; foreign windows cannot nest deeper in practice
/// and the cap guards against cyclic parent chains from a dying window.
const MAX_ANCESTRY_HOPS: u32 = 64;

impl FocusArbiter {
    /// New arbiter for the given container windows. The last-known state
    /// starts as `Outside`, so the first notification only fires when focus
    /// is actually found inside the container.
    #[must_use]
    pub fn new(host: WindowId, embedded: WindowId) -> Self {
        Self {
            host,
            embedded,
            last: FocusState::Outside,
        }
    }

    /// Classify a foreground window: inside iff it is the host, the
    /// embedded window, or reaches the host by walking parent links.
    pub fn classify<W: WindowOps>(&self, ops: &W, fg: Option<WindowId>) -> FocusState {
        let Some(mut cur) = fg else {
            return FocusState::Outside;
        };
        if cur == self.host || cur == self.embedded {
            return FocusState::Inside;
        }
        for _ in 0..MAX_ANCESTRY_HOPS {
            match ops.parent(cur) {
                Some(p) if p == self.host => return FocusState::Inside,
                Some(p) => cur = p,
                None => break,
            }
        }
        FocusState::Outside
    }

    /// Record a foreground change. Returns the new state only when it
    /// differs from the last reported one (edge-triggered); repeated
    /// notifications for the same side produce `None`. Reentrant
    /// notifications caused by the caller forcing focus are therefore
    /// harmless.
    pub fn note<W: WindowOps>(&mut self, ops: &W, fg: Option<WindowId>) -> Option<FocusState> {
        let state = self.classify(ops, fg);
        if self.last == state {
            return None;
        }
        self.last = state;
        Some(state)
    }

    /// The last-known state.
    #[must_use]
    pub fn last(&self) -> FocusState {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use win_winops::{
        Monitor, Result,
        geom::{Extent, Rect},
        styles::StylePair,
    };

    use super::*;

    /// Fake ops exposing only a parent map; everything else is unreachable
    /// from the arbiter.
    struct ParentMap(Vec<(WindowId, WindowId)>);

    impl WindowOps for ParentMap {
        fn is_window(&self, _id: WindowId) -> bool {
            true
        }
        fn window_rect(&self, _id: WindowId) -> Result<Rect> {
            unreachable!()
        }
        fn client_extent(&self, _id: WindowId) -> Result<Extent> {
            unreachable!()
        }
        fn set_parent(&self, _child: WindowId, _parent: WindowId) -> Result<()> {
            unreachable!()
        }
        fn style(&self, _id: WindowId) -> StylePair {
            unreachable!()
        }
        fn set_style(&self, _id: WindowId, _pair: StylePair) {
            unreachable!()
        }
        fn apply_frame_change(&self, _id: WindowId) {
            unreachable!()
        }
        fn move_window(&self, _id: WindowId, _rect: Rect) -> Result<()> {
            unreachable!()
        }
        fn enable(&self, _id: WindowId) {
            unreachable!()
        }
        fn focus(&self, _id: WindowId) {
            unreachable!()
        }
        fn parent(&self, id: WindowId) -> Option<WindowId> {
            self.0.iter().find(|(c, _)| *c == id).map(|(_, p)| *p)
        }
        fn foreground(&self) -> Option<WindowId> {
            None
        }
        fn monitor_for(&self, _id: WindowId) -> Result<Monitor> {
            unreachable!()
        }
        fn dpi_for(&self, _id: WindowId) -> u32 {
            96
        }
    }

    const HOST: WindowId = WindowId::new(100);
    const EMBEDDED: WindowId = WindowId::new(200);
    const STRANGER: WindowId = WindowId::new(900);

    #[test]
    fn classifies_host_embedded_and_descendants() {
        let child_of_embedded = WindowId::new(201);
        let ops = ParentMap(vec![(EMBEDDED, HOST), (child_of_embedded, EMBEDDED)]);
        let arb = FocusArbiter::new(HOST, EMBEDDED);
        assert_eq!(arb.classify(&ops, Some(HOST)), FocusState::Inside);
        assert_eq!(arb.classify(&ops, Some(EMBEDDED)), FocusState::Inside);
        assert_eq!(arb.classify(&ops, Some(child_of_embedded)), FocusState::Inside);
        assert_eq!(arb.classify(&ops, Some(STRANGER)), FocusState::Outside);
        assert_eq!(arb.classify(&ops, None), FocusState::Outside);
    }

    #[test]
    fn note_is_edge_triggered() {
        let ops = ParentMap(vec![(EMBEDDED, HOST)]);
        let mut arb = FocusArbiter::new(HOST, EMBEDDED);
        // Outside, Outside, Inside, Inside, Outside: exactly two edges, on
        // the third and fifth notifications.
        let seq = [
            Some(STRANGER),
            Some(STRANGER),
            Some(EMBEDDED),
            Some(HOST),
            Some(STRANGER),
        ];
        let fired: Vec<_> = seq
            .into_iter()
            .filter_map(|fg| arb.note(&ops, fg))
            .collect();
        assert_eq!(fired, vec![FocusState::Inside, FocusState::Outside]);
    }

    #[test]
    fn classify_tolerates_cyclic_parents() {
        let a = WindowId::new(1);
        let b = WindowId::new(2);
        let ops = ParentMap(vec![(a, b), (b, a)]);
        let arb = FocusArbiter::new(HOST, EMBEDDED);
        assert_eq!(arb.classify(&ops, Some(a)), FocusState::Outside);
    }
}
