//! Embedding controller: reparenting, decoration stripping, positioning.
//!
//! Drives every mutation of the embedded window through a [`WindowOps`],
//! so the whole state machine runs against a fake in tests. The deferred
//! re-strip is scheduled by the message router (a one-shot timer on the
//! same loop); [`EmbeddingController::restrip`] only has to tolerate being
//! called after either window is gone.

use tracing::{debug, trace};
use win_winops::{
    Monitor, WindowId, WindowOps,
    geom::{Extent, Rect},
    styles::{self, StylePair},
};

use crate::{
    error::Result,
    geometry::{self, EmbeddingRequest, GeometryState, SizeMode},
};

/// Orchestrates the embedded window's lifecycle inside the host.
#[derive(Debug)]
pub struct EmbeddingController {
    host: WindowId,
    embedded: WindowId,
    monitor: Monitor,
    request: EmbeddingRequest,
    state: GeometryState,
}

impl EmbeddingController {
    /// Build a controller around an already-resolved geometry state.
    #[must_use]
    pub fn new(
        host: WindowId,
        embedded: WindowId,
        monitor: Monitor,
        request: EmbeddingRequest,
        state: GeometryState,
    ) -> Self {
        Self {
            host,
            embedded,
            monitor,
            request,
            state,
        }
    }

    /// The embedded window.
    #[must_use]
    pub fn embedded(&self) -> WindowId {
        self.embedded
    }

    /// Current resolved geometry.
    #[must_use]
    pub fn state(&self) -> GeometryState {
        self.state
    }

    /// Reparent the embedded window under the host and strip decoration if
    /// the window currently shows any. Reparent failure is fatal and
    /// surfaces to the caller.
    pub fn embed<W: WindowOps>(&self, ops: &W) -> Result<()> {
        ops.set_parent(self.embedded, self.host)?;
        let style = ops.style(self.embedded);
        if styles::has_decoration(style) {
            strip_decoration(ops, self.embedded, style);
        }
        debug!(embedded = ?self.embedded, host = ?self.host, "embedded");
        Ok(())
    }

    /// Unconditional decoration re-strip, deferred ~500 ms after embedding
    /// to undo style bits foreign apps reassert after creation. A silent
    /// no-op once either window is destroyed.
    pub fn restrip<W: WindowOps>(&self, ops: &W) {
        if !ops.is_window(self.host) || !ops.is_window(self.embedded) {
            trace!("restrip_skipped_window_gone");
            return;
        }
        strip_decoration(ops, self.embedded, ops.style(self.embedded));
        debug!("decoration_restripped");
    }

    /// The embedded window's bounds within the host client area.
    #[must_use]
    pub fn bounds_in_host(&self, host_client: Extent) -> Rect {
        match self.state.custom_pos {
            Some(pos) => Rect {
                x: pos.x - self.monitor.origin.x,
                y: pos.y - self.monitor.origin.y,
                w: self.state.extent.w,
                h: self.state.extent.h,
            },
            None => Rect::new(0, 0, host_client.w, host_client.h).center(self.state.extent),
        }
    }

    /// Place the embedded window: at the caller's coordinates (translated
    /// into the monitor frame) when custom, centered in the host client
    /// area otherwise.
    pub fn position<W: WindowOps>(&self, ops: &W) -> Result<()> {
        let host_client = ops.client_extent(self.host)?;
        let bounds = self.bounds_in_host(host_client);
        ops.move_window(self.embedded, bounds)?;
        trace!(?bounds, "positioned");
        Ok(())
    }

    /// React to a host resize: re-resolve the extent unless it was declared
    /// explicitly, then reapply position.
    pub fn on_host_resize<W: WindowOps>(&mut self, ops: &W) -> Result<()> {
        if self.state.mode != SizeMode::Explicit {
            let current = ops.window_rect(self.embedded)?.extent();
            let host_client = ops.client_extent(self.host)?;
            self.state = geometry::resolve(&self.request, current, host_client)?;
        }
        self.position(ops)
    }

    /// React to the embedded window resizing itself (observed by the drift
    /// timer): adopt the new extent and reposition.
    pub fn on_drift<W: WindowOps>(&mut self, ops: &W, new_extent: Extent) -> Result<()> {
        self.state.extent = new_extent;
        self.position(ops)
    }
}

/// Clear every decoration bit, mark the window as a child, and force a
/// frame-change repaint.
fn strip_decoration<W: WindowOps>(ops: &W, id: WindowId, current: StylePair) {
    ops.set_style(id, styles::stripped(current));
    ops.apply_frame_change(id);
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        collections::{HashMap, HashSet},
    };

    use win_winops::{Error as OpsError, Result as OpsResult, geom::Pos};

    use super::*;
    use crate::geometry::{DpiAwareness, SizeMode};

    /// Recording fake standing in for the window system.
    #[derive(Default)]
    struct FakeWinOps {
        live: RefCell<HashSet<WindowId>>,
        styles: RefCell<HashMap<WindowId, StylePair>>,
        rects: RefCell<HashMap<WindowId, Rect>>,
        clients: RefCell<HashMap<WindowId, Extent>>,
        moves: RefCell<Vec<(WindowId, Rect)>>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl FakeWinOps {
        fn with_window(self, id: WindowId, rect: Rect, style: StylePair) -> Self {
            self.live.borrow_mut().insert(id);
            self.rects.borrow_mut().insert(id, rect);
            self.styles.borrow_mut().insert(id, style);
            self
        }

        fn with_client(self, id: WindowId, extent: Extent) -> Self {
            self.clients.borrow_mut().insert(id, extent);
            self
        }

        fn destroy(&self, id: WindowId) {
            self.live.borrow_mut().remove(&id);
        }

        fn last_move(&self) -> Option<Rect> {
            self.moves.borrow().last().map(|(_, r)| *r)
        }

        fn called(&self, name: &str) -> bool {
            self.calls.borrow().iter().any(|c| *c == name)
        }
    }

    impl WindowOps for FakeWinOps {
        fn is_window(&self, id: WindowId) -> bool {
            self.live.borrow().contains(&id)
        }
        fn window_rect(&self, id: WindowId) -> OpsResult<Rect> {
            self.rects
                .borrow()
                .get(&id)
                .copied()
                .ok_or(OpsError::WindowGone(id))
        }
        fn client_extent(&self, id: WindowId) -> OpsResult<Extent> {
            self.clients
                .borrow()
                .get(&id)
                .copied()
                .ok_or(OpsError::WindowGone(id))
        }
        fn set_parent(&self, _child: WindowId, _parent: WindowId) -> OpsResult<()> {
            self.calls.borrow_mut().push("set_parent");
            Ok(())
        }
        fn style(&self, id: WindowId) -> StylePair {
            self.styles.borrow().get(&id).copied().unwrap_or_default()
        }
        fn set_style(&self, id: WindowId, pair: StylePair) {
            self.calls.borrow_mut().push("set_style");
            self.styles.borrow_mut().insert(id, pair);
        }
        fn apply_frame_change(&self, _id: WindowId) {
            self.calls.borrow_mut().push("apply_frame_change");
        }
        fn move_window(&self, id: WindowId, rect: Rect) -> OpsResult<()> {
            self.moves.borrow_mut().push((id, rect));
            Ok(())
        }
        fn enable(&self, _id: WindowId) {
            self.calls.borrow_mut().push("enable");
        }
        fn focus(&self, _id: WindowId) {
            self.calls.borrow_mut().push("focus");
        }
        fn parent(&self, _id: WindowId) -> Option<WindowId> {
            None
        }
        fn foreground(&self) -> Option<WindowId> {
            None
        }
        fn monitor_for(&self, _id: WindowId) -> OpsResult<Monitor> {
            Ok(MONITOR)
        }
        fn dpi_for(&self, _id: WindowId) -> u32 {
            96
        }
    }

    const HOST: WindowId = WindowId::new(1);
    const EMBEDDED: WindowId = WindowId::new(2);
    const MONITOR: Monitor = Monitor {
        origin: Pos { x: 1920, y: 0 },
        extent: Extent { w: 1920, h: 1080 },
    };

    fn request(width: i32, height: i32, position: Option<Pos>) -> EmbeddingRequest {
        EmbeddingRequest {
            width,
            height,
            position,
            dpi_awareness: DpiAwareness::Unaware,
            window_dpi: 96,
        }
    }

    fn controller(req: EmbeddingRequest, ops: &FakeWinOps) -> EmbeddingController {
        let current = ops.window_rect(EMBEDDED).unwrap().extent();
        let state = geometry::resolve(&req, current, MONITOR.extent).unwrap();
        EmbeddingController::new(HOST, EMBEDDED, MONITOR, req, state)
    }

    fn decorated() -> StylePair {
        StylePair {
            style: styles::WS_CAPTION | styles::WS_THICKFRAME | styles::WS_SYSMENU,
            ex_style: styles::WS_EX_WINDOWEDGE,
        }
    }

    #[test]
    fn embed_reparents_and_strips_decorated_window() {
        let ops = FakeWinOps::default()
            .with_window(HOST, Rect::new(1920, 0, 1920, 1080), StylePair::default())
            .with_window(EMBEDDED, Rect::new(0, 0, 800, 600), decorated())
            .with_client(HOST, MONITOR.extent);
        let ctl = controller(request(-1, -1, None), &ops);
        ctl.embed(&ops).unwrap();
        assert!(ops.called("set_parent"));
        assert!(ops.called("apply_frame_change"));
        let after = ops.style(EMBEDDED);
        assert!(!styles::has_decoration(after));
        assert_ne!(after.style & styles::WS_CHILD, 0);
    }

    #[test]
    fn embed_leaves_undecorated_styles_alone() {
        let plain = StylePair {
            style: styles::WS_CHILD,
            ex_style: 0,
        };
        let ops = FakeWinOps::default()
            .with_window(HOST, Rect::new(1920, 0, 1920, 1080), StylePair::default())
            .with_window(EMBEDDED, Rect::new(0, 0, 800, 600), plain)
            .with_client(HOST, MONITOR.extent);
        let ctl = controller(request(-1, -1, None), &ops);
        ctl.embed(&ops).unwrap();
        assert!(ops.called("set_parent"));
        assert!(!ops.called("set_style"));
    }

    #[test]
    fn restrip_is_silent_noop_once_host_is_destroyed() {
        let ops = FakeWinOps::default()
            .with_window(HOST, Rect::new(1920, 0, 1920, 1080), StylePair::default())
            .with_window(EMBEDDED, Rect::new(0, 0, 800, 600), decorated())
            .with_client(HOST, MONITOR.extent);
        let ctl = controller(request(-1, -1, None), &ops);
        ops.destroy(HOST);
        ctl.restrip(&ops);
        assert!(!ops.called("set_style"));
    }

    #[test]
    fn restrip_reapplies_when_both_windows_live() {
        let ops = FakeWinOps::default()
            .with_window(HOST, Rect::new(1920, 0, 1920, 1080), StylePair::default())
            .with_window(EMBEDDED, Rect::new(0, 0, 800, 600), decorated())
            .with_client(HOST, MONITOR.extent);
        let ctl = controller(request(-1, -1, None), &ops);
        ctl.restrip(&ops);
        assert!(ops.called("set_style"));
        assert!(!styles::has_decoration(ops.style(EMBEDDED)));
    }

    #[test]
    fn position_centers_in_host_client_area() {
        let ops = FakeWinOps::default()
            .with_window(HOST, Rect::new(1920, 0, 1920, 1080), StylePair::default())
            .with_window(EMBEDDED, Rect::new(0, 0, 800, 600), decorated())
            .with_client(HOST, MONITOR.extent);
        let ctl = controller(request(-1, -1, None), &ops);
        ctl.position(&ops).unwrap();
        assert_eq!(ops.last_move(), Some(Rect::new(560, 240, 800, 600)));
    }

    #[test]
    fn custom_position_is_monitor_relative() {
        let ops = FakeWinOps::default()
            .with_window(HOST, Rect::new(1920, 0, 1920, 1080), StylePair::default())
            .with_window(EMBEDDED, Rect::new(0, 0, 800, 600), decorated())
            .with_client(HOST, MONITOR.extent);
        // Absolute caller position on the second monitor.
        let ctl = controller(request(800, 600, Some(Pos { x: 2020, y: 100 })), &ops);
        assert!(ctl.state().uses_custom_position());
        ctl.position(&ops).unwrap();
        assert_eq!(ops.last_move(), Some(Rect::new(100, 100, 800, 600)));
    }

    #[test]
    fn host_resize_recomputes_auto_but_not_explicit() {
        let ops = FakeWinOps::default()
            .with_window(HOST, Rect::new(1920, 0, 1920, 1080), StylePair::default())
            .with_window(EMBEDDED, Rect::new(0, 0, 2000, 1200), decorated())
            .with_client(HOST, Extent { w: 1600, h: 900 });
        let mut ctl = controller(request(0, 0, None), &ops);
        ctl.on_host_resize(&ops).unwrap();
        // Oversized auto window clamps to the shrunken host client area.
        assert_eq!(ctl.state().extent, Extent { w: 1600, h: 900 });

        let mut explicit = controller(request(800, 600, None), &ops);
        assert_eq!(explicit.state().mode, SizeMode::Explicit);
        explicit.on_host_resize(&ops).unwrap();
        assert_eq!(explicit.state().extent, Extent { w: 800, h: 600 });
    }

    #[test]
    fn drift_adopts_new_extent_and_repositions() {
        let ops = FakeWinOps::default()
            .with_window(HOST, Rect::new(1920, 0, 1920, 1080), StylePair::default())
            .with_window(EMBEDDED, Rect::new(0, 0, 800, 600), decorated())
            .with_client(HOST, MONITOR.extent);
        let mut ctl = controller(request(-1, -1, None), &ops);
        ctl.on_drift(&ops, Extent { w: 640, h: 480 }).unwrap();
        assert_eq!(ctl.state().extent, Extent { w: 640, h: 480 });
        assert_eq!(ops.last_move(), Some(Rect::new(640, 300, 640, 480)));
    }
}
