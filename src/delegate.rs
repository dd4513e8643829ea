/*
 * The boundary between the message handler and the widget layer that owns it.
 *
 * Queries flow inward (is this a widget window, what are the client insets, which
 * non-client component is under a point) and normalised notifications flow outward.
 * The handler holds its delegate weakly; a delegate that goes away simply stops
 * receiving calls. Every method takes `&self` because the handler may call back into
 * the delegate while an earlier call on it is still on the stack, so implementations
 * keep their own state behind `Cell`/`RefCell`.
 *
 * Defaults describe a plain native-framed window that accepts activation and resizing
 * and ignores every notification.
 */

use crate::events::{Accelerator, KeyEvent, MouseEvent, ScrollEvent, TouchEvent};
use crate::messages::HTNOWHERE;
use crate::types::{AutohideEdges, Insets, MonitorId, Point, Rect, Region, Size, WindowHandle};

pub trait WindowDelegate {
    // Queries.

    fn is_widget_window(&self) -> bool {
        true
    }

    fn is_using_custom_frame(&self) -> bool {
        false
    }

    fn is_modal(&self) -> bool {
        false
    }

    fn can_activate(&self) -> bool {
        true
    }

    fn can_resize(&self) -> bool {
        true
    }

    fn can_maximize(&self) -> bool {
        true
    }

    fn can_minimize(&self) -> bool {
        true
    }

    /// Whether the widget's size is the client size rather than the window size.
    fn widget_size_is_client_size(&self) -> bool {
        true
    }

    fn is_inactive_rendering_disabled(&self) -> bool {
        false
    }

    fn enable_inactive_rendering(&self) {}

    /// Explicit client-area insets, or `None` to let the handler decide.
    fn get_client_area_insets(&self) -> Option<Insets> {
        None
    }

    /// Minimum and maximum window size; a zero axis in the maximum means unbounded.
    fn get_min_max_size(&self) -> (Size, Size) {
        (Size::default(), Size::default())
    }

    /// Hit-test code for a point in client coordinates, `HTNOWHERE` if the widget
    /// does not claim it.
    fn get_non_client_component(&self, _point: Point) -> isize {
        HTNOWHERE
    }

    /// Shape of the window for the given window size, `None` for no mask.
    fn get_window_mask(&self, _window_size: Size) -> Option<Region> {
        None
    }

    fn get_root_view_size(&self) -> Size {
        Size::default()
    }

    fn should_handle_system_commands(&self) -> bool {
        true
    }

    fn will_process_work_area_change(&self) -> bool {
        false
    }

    // Lifecycle and window-state notifications.

    fn handle_create(&self) {}

    fn handle_destroying(&self) {}

    fn handle_destroyed(&self) {}

    fn handle_close(&self) {}

    fn handle_activation_changed(&self, _active: bool) {}

    fn handle_app_deactivated(&self) {}

    fn handle_native_focus(&self, _last_focused: WindowHandle) {}

    fn handle_native_blur(&self, _focused: WindowHandle) {}

    fn handle_capture_lost(&self) {}

    fn handle_cancel_mode(&self) {}

    fn handle_client_size_changed(&self, _size: Size) {}

    fn handle_window_size_changing(&self) {}

    fn handle_visibility_changing(&self, _visible: bool) {}

    fn handle_visibility_changed(&self, _visible: bool) {}

    fn handle_move(&self) {}

    fn handle_begin_size_move(&self) {}

    fn handle_end_size_move(&self) {}

    fn handle_work_area_changed(&self) {}

    fn handle_display_change(&self) {}

    fn handle_frame_changed(&self) {}

    fn reset_window_controls(&self) {}

    fn handle_menu_loop(&self, _in_menu_loop: bool) {}

    fn handle_input_language_change(&self, _character_set: u32, _input_language: isize) {}

    // Painting.

    /// Dirty rectangle in window coordinates.
    fn handle_paint_accelerated(&self, _dirty: Rect) {}

    fn schedule_paint(&self) {}

    // Input. The boolean results report whether the event was consumed.

    fn handle_mouse_event(&self, _event: &MouseEvent) -> bool {
        false
    }

    fn handle_untranslated_key_event(&self, _event: &KeyEvent) -> bool {
        false
    }

    fn handle_key_event(&self, _event: &KeyEvent) -> bool {
        false
    }

    /// Character and IME messages; `Some(result)` when handled.
    fn handle_ime_message(&self, _message: u32, _wparam: usize, _lparam: isize) -> Option<isize> {
        None
    }

    fn handle_touch_event(&self, _event: &TouchEvent) {}

    fn handle_scroll_event(&self, _event: &ScrollEvent) {}

    fn handle_accelerator(&self, _accelerator: &Accelerator) {}

    fn handle_app_command(&self, _command: i32) -> bool {
        false
    }

    /// A `WM_SYSCOMMAND` code; `true` means the widget layer executed it itself.
    fn handle_command(&self, _command: usize) -> bool {
        false
    }

    fn handle_tooltip_notify(&self, _wparam: usize, _lparam: isize) -> Option<isize> {
        None
    }

    // Raw message hooks.

    /// First chance at every message; `Some(result)` claims it.
    fn pre_handle_msg(&self, _message: u32, _wparam: usize, _lparam: isize) -> Option<isize> {
        None
    }

    /// Last look at every message that was handled or default processed.
    fn post_handle_msg(&self, _message: u32, _wparam: usize, _lparam: isize) {}
}

/*
 * Source of auto-hide appbar edges for a monitor. The answer is asynchronous: the
 * provider returns what it knows now and calls `on_changed` later if the edges differ.
 * The handler revokes callbacks from earlier queries by itself.
 */
pub trait AppbarQuery {
    fn autohide_edges(&self, monitor: MonitorId, on_changed: Box<dyn Fn()>) -> AutohideEdges;
}
