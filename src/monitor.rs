/*
 * Monitor and work-area bookkeeping for the window's position-change handling.
 *
 * Some desktop managers change the work area without any notification and only send the
 * window a repositioning request. `FrameGeometry` remembers what the monitor looked like
 * the last time a position change was seen so the handler can notice that case.
 */

use crate::native::NativeWindow;
use crate::types::{MonitorId, MonitorInfo, Rect};

/// Monitor intersecting `rect`, with its monitor and work-area rectangles.
pub fn monitor_and_rects<W: NativeWindow + ?Sized>(native: &W, rect: &Rect) -> Option<MonitorInfo> {
    native.monitor_from_rect(rect)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkAreaChange {
    /// Same monitor as last time.
    pub same_monitor: bool,
    /// The work area moved while the monitor rectangle stayed put.
    pub work_area_changed: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameGeometry {
    last_monitor: Option<MonitorId>,
    last_monitor_rect: Rect,
    last_work_area: Rect,
}

impl FrameGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_monitor(&self) -> Option<MonitorId> {
        self.last_monitor
    }

    pub fn last_work_area(&self) -> Rect {
        self.last_work_area
    }

    /// Compares `info` with the previous observation and records it.
    pub fn observe(&mut self, info: &MonitorInfo) -> WorkAreaChange {
        let change = WorkAreaChange {
            same_monitor: self.last_monitor == Some(info.id),
            work_area_changed: info.monitor_rect == self.last_monitor_rect
                && info.work_area != self.last_work_area,
        };
        self.last_monitor = Some(info.id);
        self.last_monitor_rect = info.monitor_rect;
        self.last_work_area = info.work_area;
        change
    }
}
