/*
 * Mouse messages, cursor updates and mouse-leave tracking.
 *
 * The system follows touch input with synthesized mouse messages. While a touch contact
 * is live, and for messages that are recognisably synthesized, nothing reaches the
 * delegate, so one physical gesture is never handled twice.
 */

use crate::events::{EventFlags, MouseEvent, MouseEventKind, NativeMessage};
use crate::message_handler::MessageHandler;
use crate::messages::*;
use crate::native::{CursorHandle, NativeWindow, StockCursor, TME_CANCEL, TME_LEAVE, TME_NONCLIENT};
use crate::touch::is_synthesized_mouse_message;
use crate::types::Point;

impl<W: NativeWindow + 'static> MessageHandler<W> {
    /*
     * Entry point for every mouse-range message. `track_mouse` is false for messages
     * forwarded from another window, which does its own leave tracking. A `Some` result
     * means the message must not reach default processing.
     */
    pub(crate) fn handle_mouse_event_internal(
        &self,
        message: u32,
        wparam: usize,
        lparam: isize,
        track_mouse: bool,
    ) -> Option<isize> {
        if self.touch.borrow().has_live_contacts() {
            log::trace!("MouseHandler: {message:#x} swallowed during touch");
            return Some(0);
        }

        let message_time = self.native.message_time();
        let extra_info = self.native.message_extra_info();
        let from_touch = is_mouse_event_from_touch(extra_info);
        if from_touch {
            // Touch only produces WM_TOUCH for the client area; elsewhere the
            // synthesized message is the only record of the gesture.
            let screen_point = self.message_screen_point(message, lparam);
            let hit_test = self
                .native
                .send_message(WM_NCHITTEST, 0, lparam_from_point(screen_point));
            if hit_test == HTCLIENT || hit_test == HTNOWHERE {
                log::trace!("MouseHandler: touch-synthesized {message:#x} dropped");
                return Some(0);
            }
        } else if is_synthesized_mouse_message(
            self.native.as_ref(),
            extra_info,
            message_time,
            lparam,
            self.config.touch_synthesis_window_ms,
        ) {
            log::trace!("MouseHandler: {message:#x} matches the last touch, dropped");
            return Some(0);
        }

        // Some drivers follow a horizontal wheel message with a vertical one for the
        // same gesture.
        let mut message = message;
        if message == WM_MOUSEHWHEEL {
            self.last_mouse_hwheel_time.set(Some(message_time));
        } else if message == WM_MOUSEWHEEL
            && self.last_mouse_hwheel_time.get() == Some(message_time)
        {
            message = WM_MOUSEHWHEEL;
        }

        let mut wparam = wparam;
        if message == WM_RBUTTONUP && self.is_right_mouse_pressed_on_caption.get() {
            self.is_right_mouse_pressed_on_caption.set(false);
            self.release_capture();
            let screen_point = self.native.client_to_screen(point_from_lparam(lparam));
            let hit_test = self
                .native
                .send_message(WM_NCHITTEST, 0, lparam_from_point(screen_point));
            wparam = hit_test as usize;
            if hit_test == HTCAPTION || hit_test == HTSYSMENU {
                log::debug!("MouseHandler: showing system menu at {screen_point:?}");
                self.native.show_system_menu_at(screen_point);
                return Some(0);
            }
        } else if message == WM_NCLBUTTONDOWN && self.is_using_custom_frame() {
            // The caption buttons are views; default processing would draw classic
            // pressed buttons over them, so the click carries the key state instead.
            if matches!(wparam as isize, HTCLOSE | HTMINBUTTON | HTMAXBUTTON) {
                let modifiers = self.native.key_modifiers();
                if modifiers.contains(EventFlags::CONTROL_DOWN) {
                    wparam |= MK_CONTROL;
                }
                if modifiers.contains(EventFlags::SHIFT_DOWN) {
                    wparam |= MK_SHIFT;
                }
            }
        } else if message == WM_NCRBUTTONDOWN
            && matches!(wparam as isize, HTCAPTION | HTSYSMENU)
        {
            // Capture makes the release arrive as WM_RBUTTONUP, so the menu only
            // opens when press and release are both on the caption.
            self.is_right_mouse_pressed_on_caption.set(true);
            self.native.set_capture();
        }

        let mut flags = self.native.key_modifiers();
        if from_touch {
            flags |= EventFlags::FROM_TOUCH;
        }
        let event = MouseEvent::from_native(
            NativeMessage {
                message,
                wparam,
                lparam,
                time: message_time,
            },
            flags,
        );

        match event.kind {
            MouseEventKind::Moved if track_mouse && !self.native.has_capture() => {
                let tracking = if message == WM_NCMOUSEMOVE {
                    TME_NONCLIENT | TME_LEAVE
                } else {
                    TME_LEAVE
                };
                self.track_mouse_events(tracking);
            }
            MouseEventKind::Exited => {
                // The next move starts a new tracking session.
                self.active_mouse_tracking_flags.set(0);
            }
            MouseEventKind::Wheel => {
                let consumed = self.native.reroute_mouse_wheel(wparam, lparam)
                    || self.query(false, |d| d.handle_mouse_event(&event));
                return Some(if consumed { 0 } else { 1 });
            }
            _ => {}
        }

        let token = self.lifetime.token();
        let mut handled = self.query(false, |d| d.handle_mouse_event(&event));
        if !token.is_alive() {
            return Some(0);
        }

        if !handled
            && message == WM_NCLBUTTONDOWN
            && wparam as isize != HTSYSMENU
            && self.is_using_custom_frame()
        {
            // Default processing paints non-client parts on a button press.
            self.def_window_proc_with_redraw_lock(message, wparam, lparam);
            handled = true;
        }
        handled.then_some(0)
    }

    // Non-client and wheel messages carry screen coordinates, the rest client ones.
    fn message_screen_point(&self, message: u32, lparam: isize) -> Point {
        let point = point_from_lparam(lparam);
        if MouseEvent::from_native(
            NativeMessage {
                message,
                wparam: 0,
                lparam,
                time: 0,
            },
            EventFlags::NONE,
        )
        .non_client
            || matches!(message, WM_MOUSEWHEEL | WM_MOUSEHWHEEL)
        {
            point
        } else {
            self.native.client_to_screen(point)
        }
    }

    /*
     * Requests WM_MOUSELEAVE (or WM_NCMOUSELEAVE) for the current hover. Switching
     * between client and non-client tracking cancels the active request first.
     */
    pub(crate) fn track_mouse_events(&self, flags: u32) {
        let active = self.active_mouse_tracking_flags.get();
        if active == 0 || flags & TME_CANCEL != 0 {
            if flags & TME_CANCEL != 0 {
                self.active_mouse_tracking_flags.set(0);
            } else {
                self.active_mouse_tracking_flags.set(flags);
            }
            self.native.track_mouse_event(flags);
        } else if flags != active {
            self.track_mouse_events(active | TME_CANCEL);
            self.track_mouse_events(flags);
        }
    }

    fn release_capture(&self) {
        if self.native.has_capture() {
            self.native.release_capture();
        }
    }

    /*
     * WM_SETCURSOR, reimplemented because default processing paints non-client parts
     * of windows with a custom frame. The low word of `lparam` is the hit-test code.
     */
    pub(crate) fn on_set_cursor(&self, lparam: isize) -> Option<isize> {
        let hit_test = loword(lparam as usize);
        let cursor = match hit_test as isize {
            HTCLIENT => {
                self.set_cursor(self.current_cursor.get());
                return Some(1);
            }
            HTSIZE | HTTOPLEFT | HTBOTTOMRIGHT => StockCursor::SizeNwse,
            HTLEFT | HTRIGHT => StockCursor::SizeWe,
            HTTOP | HTBOTTOM => StockCursor::SizeNs,
            HTTOPRIGHT | HTBOTTOMLEFT => StockCursor::SizeNesw,
            _ => StockCursor::Arrow,
        };
        self.native.set_cursor(self.native.load_stock_cursor(cursor));
        // HTERROR arrives as a word; default processing beeps for it.
        if hit_test == loword(HTERROR as usize) {
            return None;
        }
        Some(1)
    }

    /*
     * Installs `cursor` as the window's client-area cursor. `None` puts back whatever
     * cursor was active before the last change.
     */
    pub fn set_cursor(&self, cursor: Option<CursorHandle>) {
        if cursor.is_some() {
            self.previous_cursor.set(self.native.set_cursor(cursor));
            self.current_cursor.set(cursor);
        } else if let Some(previous) = self.previous_cursor.take() {
            self.native.set_cursor(Some(previous));
        }
    }
}
