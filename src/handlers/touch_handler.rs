/*
 * WM_TOUCH and WM_MOUSEACTIVATE.
 *
 * Touch points are converted to events while the message is handled but delivered from a
 * posted task: touch input stalls if the delegate enters a nested modal loop from inside
 * the touch message. Each press opens a short "down context" during which mouse
 * activation is refused, so a tap on a menu that closes does not activate the window
 * underneath it.
 */

use crate::events::{TouchEvent, TouchEventKind};
use crate::message_handler::MessageHandler;
use crate::messages::*;
use crate::native::{NativeWindow, WS_EX_NOACTIVATE, WS_EX_TRANSPARENT};
use crate::touch::set_last_touch_message_time;

impl<W: NativeWindow + 'static> MessageHandler<W> {
    /*
     * Converts the points of a touch payload into events. `wparam` carries the point
     * count in its low word and `lparam` the touch input handle, which is always
     * closed. The message itself is left to default processing.
     */
    pub(crate) fn on_touch_event(&self, wparam: usize, lparam: isize) -> Option<isize> {
        let count = loword(wparam) as usize;
        if let Some(inputs) = self.native.touch_inputs(lparam, count) {
            let time_ms = self.native.tick_count();
            let flags = self.native.key_modifiers();
            let mut events = Vec::with_capacity(inputs.len());

            for input in inputs {
                let location = self.native.screen_to_client(input.screen_point);
                set_last_touch_message_time(self.native.message_time());

                let kind = if input.flags & TOUCHEVENTF_DOWN != 0 {
                    self.touch.borrow_mut().contacts.insert(input.id);
                    self.begin_touch_down_context();
                    TouchEventKind::Pressed
                } else if input.flags & TOUCHEVENTF_UP != 0 {
                    self.touch.borrow_mut().contacts.remove(&input.id);
                    TouchEventKind::Released
                } else if input.flags & TOUCHEVENTF_MOVE != 0 {
                    TouchEventKind::Moved
                } else {
                    continue;
                };

                let mut touch = self.touch.borrow_mut();
                let touch_id = touch.ids.generated_id(input.id);
                log::trace!(
                    "TouchHandler: {kind:?} native id {} as {touch_id} at {location:?}",
                    input.id
                );
                events.push(TouchEvent {
                    kind,
                    location,
                    touch_id,
                    time_ms,
                    flags,
                });
                // Released only now so the release event still carries the id.
                if kind == TouchEventKind::Released {
                    touch.ids.release_number(input.id);
                }
            }

            self.post_task(None, move |handler| handler.handle_touch_events(events));
        } else {
            log::warn!("TouchHandler: could not read touch input {lparam:#x}");
        }
        self.native.close_touch_input_handle(lparam);
        None
    }

    fn begin_touch_down_context(&self) {
        self.touch_down_contexts
            .set(self.touch_down_contexts.get() + 1);
        let timeout = self.config.touch_down_context_timeout_ms;
        self.post_task(Some(timeout), |handler| {
            handler.reset_touch_down_context()
        });
    }

    fn reset_touch_down_context(&self) {
        self.touch_down_contexts
            .set(self.touch_down_contexts.get().saturating_sub(1));
    }

    // The delegate may destroy the window while handling any of the events.
    fn handle_touch_events(&self, events: Vec<TouchEvent>) {
        let token = self.lifetime.token();
        for event in &events {
            if !token.is_alive() {
                break;
            }
            self.notify(|d| d.handle_touch_event(event));
        }
    }

    pub(crate) fn on_mouse_activate(&self) -> Option<isize> {
        if self.touch_down_contexts.get() > 0 {
            return Some(MA_NOACTIVATE);
        }

        // Set on this window when a touch-selected menu item closed over it.
        if self.native.take_ignore_touch_activate_prop() {
            return Some(MA_NOACTIVATE);
        }

        // Activating a child window counts as this window losing activation.
        // Transparent children let the click through and are not activated.
        let cursor = self.native.screen_to_client(self.native.cursor_pos());
        let activates_child = self
            .native
            .child_window_at(cursor)
            .is_some_and(|child| child.visible && child.ex_style & WS_EX_TRANSPARENT == 0);
        if activates_child {
            self.post_process_activate_message(WA_INACTIVE, false);
        }

        if self.is_widget_window() {
            return Some(if self.can_activate() {
                MA_ACTIVATE
            } else {
                MA_NOACTIVATEANDEAT
            });
        }
        if self.native.ex_style() & WS_EX_NOACTIVATE != 0 {
            return Some(MA_NOACTIVATE);
        }
        None
    }

    /// Touch releases are never seen after reparenting, so live contacts are dropped.
    pub fn handle_parent_changed(&self) {
        self.touch.borrow_mut().contacts.clear();
    }
}
