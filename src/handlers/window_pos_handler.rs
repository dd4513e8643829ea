/*
 * Position, size and work-area messages.
 *
 * Besides forwarding move and size notifications, this is where asynchronous work-area
 * changes are caught: some desktop managers move the taskbar without telling anyone and
 * then send the window a stale position. The handler throws that position away, fits the
 * window to the new work area and ignores the burst of corrections Windows sends next.
 */

use crate::message_handler::MessageHandler;
use crate::messages::*;
use crate::monitor::monitor_and_rects;
use crate::native::{
    MinMaxInfo, NativeWindow, RDW_ALLCHILDREN, RDW_INVALIDATE, SWP_FRAMECHANGED, SWP_HIDEWINDOW, SWP_NOACTIVATE, SWP_NOCOPYBITS,
    SWP_NOMOVE, SWP_NOOWNERZORDER, SWP_NOREDRAW, SWP_NOSIZE, SWP_NOZORDER, SWP_SHOWWINDOW,
    SystemMetric, WS_EX_COMPOSITED, WindowPos,
};
use crate::types::{Insets, Rect, Size};

/// DWM margins applied when the standard frame is removed and its glass kept.
const REMOVED_FRAME_GLASS_MARGIN: i32 = 10;

impl<W: NativeWindow + 'static> MessageHandler<W> {
    pub(crate) fn process_geometry_message(
        &self,
        message: u32,
        wparam: usize,
        lparam: isize,
    ) -> Option<isize> {
        match message {
            WM_MOVE => {
                self.notify(|d| d.handle_move());
                None
            }
            WM_MOVING => {
                self.notify(|d| d.handle_move());
                Some(0)
            }
            WM_SIZE => {
                self.on_size();
                Some(0)
            }
            WM_WINDOWPOSCHANGING if lparam != 0 => {
                let window_pos = lparam as *mut WindowPos;
                let mut pos = unsafe { *window_pos };
                self.on_window_pos_changing(&mut pos);
                unsafe { *window_pos = pos };
                None
            }
            WM_WINDOWPOSCHANGED if lparam != 0 => {
                let pos = unsafe { *(lparam as *const WindowPos) };
                self.on_window_pos_changed(&pos);
                None
            }
            WM_GETMINMAXINFO if lparam != 0 => {
                let info = lparam as *mut MinMaxInfo;
                let mut minmax = unsafe { *info };
                self.on_get_min_max_info(&mut minmax);
                unsafe { *info = minmax };
                None
            }
            WM_ENTERSIZEMOVE => {
                // Hidden for the duration of the loop to avoid scroll bar flicker.
                if self.flags.in_size_loop.get() && self.needs_scroll_styles.get() {
                    self.native.show_scroll_bars(false);
                }
                self.notify(|d| d.handle_begin_size_move());
                None
            }
            WM_EXITSIZEMOVE => {
                self.notify(|d| d.handle_end_size_move());
                if self.flags.in_size_loop.get() && self.needs_scroll_styles.get() {
                    self.add_scroll_styles();
                }
                None
            }
            WM_SETTINGCHANGE => self.on_setting_change(wparam),
            WM_DISPLAYCHANGE => {
                self.notify(|d| d.handle_display_change());
                Some(0)
            }
            _ => None,
        }
    }

    fn on_size(&self) {
        self.native.redraw_window(RDW_INVALIDATE | RDW_ALLCHILDREN);
        // Runs after the widget has laid out for the new size.
        self.reset_window_region(false, true);

        // Legacy trackpad drivers only scroll windows with scroll styles, but Windows
        // must not draw the bars. Re-adding the styles from a task avoids a nested
        // WM_SIZE.
        if self.needs_scroll_styles.get() && !self.flags.in_size_loop.get() {
            self.native.show_scroll_bars(false);
            self.post_task(None, |handler| handler.add_scroll_styles());
        }
    }

    fn on_setting_change(&self, flags: usize) -> Option<isize> {
        if self.native.parent().is_none()
            && flags == SPI_SETWORKAREA
            && !self.query(false, |d| d.will_process_work_area_change())
        {
            // A no-op position change trips the work-area detection in
            // WM_WINDOWPOSCHANGING.
            log::debug!("MessageHandler: work area changed, re-fitting window");
            self.native.set_window_pos(
                None,
                SWP_NOSIZE
                    | SWP_NOMOVE
                    | SWP_NOZORDER
                    | SWP_NOREDRAW
                    | SWP_NOACTIVATE
                    | SWP_NOOWNERZORDER,
            );
            return Some(0);
        }
        if flags == SPI_SETWORKAREA {
            self.notify(|d| d.handle_work_area_changed());
        }
        None
    }

    fn on_window_pos_changing(&self, pos: &mut WindowPos) {
        if self.flags.ignore_window_pos_changes.get() {
            // Visibility, frame, z-order and activation changes still go through.
            let toggles = if self.native.is_visible() {
                SWP_HIDEWINDOW
            } else {
                SWP_SHOWWINDOW
            };
            if pos.flags & (toggles | SWP_FRAMECHANGED) == 0
                && pos.flags & (SWP_NOZORDER | SWP_NOACTIVATE) != 0
            {
                pos.flags |= SWP_NOSIZE | SWP_NOMOVE | SWP_NOREDRAW;
                pos.flags &= !(SWP_SHOWWINDOW | SWP_HIDEWINDOW);
            }
        } else if self.native.parent().is_none() {
            self.fit_to_changed_work_area(pos);
        }

        let old_size = self
            .native
            .window_rect()
            .map(|r| r.size())
            .unwrap_or_default();
        let new_size = Size::new(pos.cx, pos.cy);
        if (old_size != new_size && pos.flags & SWP_NOSIZE == 0)
            || pos.flags & SWP_FRAMECHANGED != 0
        {
            self.notify(|d| d.handle_window_size_changing());
        }

        if pos.flags & SWP_SHOWWINDOW != 0 {
            self.notify(|d| d.handle_visibility_changing(true));
        } else if pos.flags & SWP_HIDEWINDOW != 0 {
            self.notify(|d| d.handle_visibility_changing(false));
        }
    }

    fn fit_to_changed_work_area(&self, pos: &mut WindowPos) {
        let Some(window_rect) = self.native.window_rect() else {
            return;
        };
        let Some(info) = monitor_and_rects(self.native.as_ref(), &window_rect) else {
            return;
        };
        let change = self.geometry.borrow_mut().observe(&info);
        if !change.same_monitor || !(self.fullscreen.get() || change.work_area_changed) {
            return;
        }

        let new_rect = if self.fullscreen.get() {
            info.monitor_rect
        } else if self.native.is_maximized() {
            let border = self.native.system_metric(SystemMetric::SizeFrameWidth);
            info.work_area.inset(-border, -border)
        } else {
            window_rect.adjust_to_fit(&info.work_area)
        };
        log::debug!(
            "MessageHandler: work area of {:?} changed, moving window to {new_rect:?}",
            info.id
        );
        pos.x = new_rect.left;
        pos.y = new_rect.top;
        pos.cx = new_rect.width();
        pos.cy = new_rect.height();
        // SWP_FRAMECHANGED here breaks moving child windows.
        pos.flags &= !(SWP_NOSIZE | SWP_NOMOVE | SWP_NOREDRAW);
        pos.flags |= SWP_NOCOPYBITS;

        // Windows follows up with its own, wrong, recalculations.
        self.flags.ignore_window_pos_changes.set(true);
        self.post_task(None, |handler| {
            handler.flags.ignore_window_pos_changes.set(false)
        });
    }

    fn on_window_pos_changed(&self, pos: &WindowPos) {
        if pos.flags & SWP_NOSIZE == 0 || pos.flags & SWP_FRAMECHANGED != 0 {
            self.client_area_size_changed();
        }
        if self.config.remove_standard_frame
            && pos.flags & SWP_FRAMECHANGED != 0
            && self.native.is_composition_enabled()
            && self.native.ex_style() & WS_EX_COMPOSITED == 0
        {
            self.native
                .extend_frame_into_client(Insets::uniform(REMOVED_FRAME_GLASS_MARGIN));
        }
        if pos.flags & SWP_SHOWWINDOW != 0 {
            self.notify(|d| d.handle_visibility_changed(true));
        } else if pos.flags & SWP_HIDEWINDOW != 0 {
            self.notify(|d| d.handle_visibility_changed(false));
        }
    }

    /*
     * Fills in the tracking limits from the delegate. When the widget's size is its
     * client size, the native frame is added so the limits apply to the content. A
     * zero maximum axis means unbounded and gets the system maximum.
     */
    fn on_get_min_max_info(&self, info: &mut MinMaxInfo) {
        let (mut min_size, mut max_size) =
            self.query((Size::default(), Size::default()), |d| d.get_min_max_size());

        if self.query(true, |d| d.widget_size_is_client_size()) {
            let client = self.native.client_rect().unwrap_or_default();
            let window = self.native.window_rect().unwrap_or_default();
            let frame = frame_size(&window, &client);
            min_size.width += frame.width;
            min_size.height += frame.height;
            if max_size.width != 0 {
                max_size.width += frame.width;
            }
            if max_size.height != 0 {
                max_size.height += frame.height;
            }
        }

        info.min_track_size.x = min_size.width;
        info.min_track_size.y = min_size.height;
        if max_size.width != 0 || max_size.height != 0 {
            if max_size.width == 0 {
                max_size.width = self.native.system_metric(SystemMetric::MaxTrackWidth);
            }
            if max_size.height == 0 {
                max_size.height = self.native.system_metric(SystemMetric::MaxTrackHeight);
            }
            info.max_track_size.x = max_size.width;
            info.max_track_size.y = max_size.height;
        }
    }
}

// Size of the native frame around a client rectangle in client coordinates.
fn frame_size(window: &Rect, client: &Rect) -> Size {
    Size::new(
        window.width() - client.right - client.left,
        window.height() - client.bottom - client.top,
    )
}
