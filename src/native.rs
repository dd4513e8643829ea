/*
 * The operating-system surface the message handler drives.
 *
 * `NativeWindow` wraps exactly one window handle and exposes the handful of platform
 * calls the protocol needs, in portable types. The Win32 backend implements it over
 * windows-rs; tests implement it with a scripted fake. Any call here may synchronously
 * deliver further messages to the same window (`send_message`, `def_window_proc`,
 * `set_window_pos`), so callers must not hold borrows of handler state across them.
 *
 * Structures passed by pointer in message parameters are declared with the Win32 layout
 * so the handler can read and write them in place.
 */

use crate::events::EventFlags;
use crate::types::{Insets, MenuHandle, MonitorInfo, Point, Rect, Region, WindowHandle};

// Window styles (GWL_STYLE).
pub const WS_POPUP: u32 = 0x8000_0000;
pub const WS_CHILD: u32 = 0x4000_0000;
pub const WS_VISIBLE: u32 = 0x1000_0000;
pub const WS_MAXIMIZE: u32 = 0x0100_0000;
pub const WS_CAPTION: u32 = 0x00C0_0000;
pub const WS_VSCROLL: u32 = 0x0020_0000;
pub const WS_HSCROLL: u32 = 0x0010_0000;
pub const WS_THICKFRAME: u32 = 0x0004_0000;
pub const WS_MINIMIZEBOX: u32 = 0x0002_0000;
pub const WS_MAXIMIZEBOX: u32 = 0x0001_0000;

// Extended window styles (GWL_EXSTYLE).
pub const WS_EX_TOPMOST: u32 = 0x0000_0008;
pub const WS_EX_TRANSPARENT: u32 = 0x0000_0020;
pub const WS_EX_COMPOSITED: u32 = 0x0200_0000;
pub const WS_EX_NOACTIVATE: u32 = 0x0800_0000;

// SetWindowPos flags, also found in WINDOWPOS::flags.
pub const SWP_NOSIZE: u32 = 0x0001;
pub const SWP_NOMOVE: u32 = 0x0002;
pub const SWP_NOZORDER: u32 = 0x0004;
pub const SWP_NOREDRAW: u32 = 0x0008;
pub const SWP_NOACTIVATE: u32 = 0x0010;
pub const SWP_FRAMECHANGED: u32 = 0x0020;
pub const SWP_SHOWWINDOW: u32 = 0x0040;
pub const SWP_HIDEWINDOW: u32 = 0x0080;
pub const SWP_NOCOPYBITS: u32 = 0x0100;
pub const SWP_NOOWNERZORDER: u32 = 0x0200;
pub const SWP_NOREPOSITION: u32 = SWP_NOOWNERZORDER;
pub const SWP_NOSENDCHANGING: u32 = 0x0400;

// RedrawWindow flags.
pub const RDW_INVALIDATE: u32 = 0x0001;
pub const RDW_NOCHILDREN: u32 = 0x0040;
pub const RDW_ALLCHILDREN: u32 = 0x0080;
pub const RDW_UPDATENOW: u32 = 0x0100;
pub const RDW_FRAME: u32 = 0x0400;

// TrackMouseEvent flags.
pub const TME_LEAVE: u32 = 0x0000_0002;
pub const TME_NONCLIENT: u32 = 0x0000_0010;
pub const TME_CANCEL: u32 = 0x8000_0000;

/// `WINDOWPOS`, passed by pointer with `WM_WINDOWPOSCHANGING`/`WM_WINDOWPOSCHANGED`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowPos {
    pub hwnd: isize,
    pub hwnd_insert_after: isize,
    pub x: i32,
    pub y: i32,
    pub cx: i32,
    pub cy: i32,
    pub flags: u32,
}

/// `MINMAXINFO`, passed by pointer with `WM_GETMINMAXINFO`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinMaxInfo {
    pub reserved: Point,
    pub max_size: Point,
    pub max_position: Point,
    pub min_track_size: Point,
    pub max_track_size: Point,
}

/// `NCCALCSIZE_PARAMS`, passed by pointer with `WM_NCCALCSIZE` when wparam is TRUE.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NcCalcSizeParams {
    pub rgrc: [Rect; 3],
    pub lppos: *mut WindowPos,
}

/// One contact point of a `WM_TOUCH` payload, already converted to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchInput {
    pub id: u32,
    pub screen_point: Point,
    pub flags: u32,
}

/// A child window found under a client point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildWindow {
    pub visible: bool,
    pub ex_style: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMetric {
    SizeFrameWidth,
    SizeFrameHeight,
    VScrollWidth,
    VScrollHeight,
    MaxTrackWidth,
    MaxTrackHeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorHandle(pub isize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCursor {
    Arrow,
    SizeNwse,
    SizeNesw,
    SizeWe,
    SizeNs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Mouse,
    Keyboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle(pub isize);

pub trait NativeWindow {
    fn handle(&self) -> WindowHandle;

    /// Whether the handle still names a live window.
    fn is_window(&self) -> bool;
    fn is_visible(&self) -> bool;
    fn is_minimized(&self) -> bool;
    fn is_maximized(&self) -> bool;

    fn style(&self) -> u32;
    fn set_style(&self, style: u32);
    fn ex_style(&self) -> u32;

    fn parent(&self) -> Option<WindowHandle>;

    fn is_top_level(&self) -> bool {
        self.style() & WS_CHILD == 0 || self.parent().is_none()
    }

    /// Window rectangle in screen coordinates.
    fn window_rect(&self) -> Option<Rect>;
    /// Client rectangle in client coordinates.
    fn client_rect(&self) -> Option<Rect>;
    fn client_to_screen(&self, point: Point) -> Point;
    fn screen_to_client(&self, point: Point) -> Point;

    fn def_window_proc(&self, message: u32, wparam: usize, lparam: isize) -> isize;
    /// Synchronously delivers a message to this window's procedure.
    fn send_message(&self, message: u32, wparam: usize, lparam: isize) -> isize;
    /// Offers a message to the compositor's frame procedure; `Some` if it answered.
    fn dwm_def_window_proc(&self, message: u32, wparam: usize, lparam: isize) -> Option<isize>;
    fn is_composition_enabled(&self) -> bool;

    /// Time stamp of the message currently being processed.
    fn message_time(&self) -> u32;
    /// Cursor position in screen coordinates when the current message was posted.
    fn message_pos(&self) -> Point;
    fn message_extra_info(&self) -> usize;
    /// Identifier of the thread running the message loop.
    fn thread_id(&self) -> u32;
    /// Monotonic milliseconds used to schedule deferred tasks.
    fn tick_count(&self) -> u64;
    /// Asks the message loop to pump the handler's task queue after `delay_ms`.
    fn request_deferred_pump(&self, delay_ms: u32);

    fn cursor_pos(&self) -> Point;
    fn monitor_from_rect(&self, rect: &Rect) -> Option<MonitorInfo>;
    /// Monitor the window is on, `None` if it intersects no monitor.
    fn monitor_from_window(&self) -> Option<MonitorInfo>;
    fn nearest_monitor(&self) -> Option<MonitorInfo>;

    fn window_region(&self) -> Option<Region>;
    fn set_window_region(&self, region: Option<Region>, redraw: bool);
    /// Bounding box of a native region handle, in screen coordinates.
    fn region_box(&self, region: usize) -> Option<Rect>;

    /// `SetWindowPos` without a z-order change. `None` passes an all-zero rectangle.
    fn set_window_pos(&self, rect: Option<Rect>, flags: u32);
    fn redraw_window(&self, flags: u32);
    /// Redraws every child window, synchronously for same-process children.
    fn redraw_child_windows(&self);
    fn notify_children_composition_changed(&self);
    fn invalidate(&self);
    /// Validates the update region and returns its bounds.
    fn validate_paint(&self) -> Rect;
    fn system_metric(&self, metric: SystemMetric) -> i32;

    fn load_stock_cursor(&self, cursor: StockCursor) -> Option<CursorHandle>;
    /// Sets the cursor and returns the previous one.
    fn set_cursor(&self, cursor: Option<CursorHandle>) -> Option<CursorHandle>;
    fn track_mouse_event(&self, flags: u32);
    fn set_capture(&self);
    fn release_capture(&self);
    fn has_capture(&self) -> bool;
    fn key_modifiers(&self) -> EventFlags;
    fn set_focus(&self);

    /// Reads the points of a `WM_TOUCH` payload; `None` if the handle is unreadable.
    fn touch_inputs(&self, touch_handle: isize, count: usize) -> Option<Vec<TouchInput>>;
    fn close_touch_input_handle(&self, touch_handle: isize);
    /// Removes the "ignore touch activation" window property, reporting whether it was set.
    fn take_ignore_touch_activate_prop(&self) -> bool;
    /// The real child window under the client point, if any.
    fn child_window_at(&self, client_point: Point) -> Option<ChildWindow>;
    /// Forwards a wheel message to the window under the pointer; `true` if rerouted.
    fn reroute_mouse_wheel(&self, wparam: usize, lparam: isize) -> bool;

    fn install_input_hook(&self, kind: HookKind) -> Option<HookHandle>;
    fn remove_input_hook(&self, hook: HookHandle);

    fn system_menu(&self) -> Option<MenuHandle>;
    fn show_system_menu_at(&self, screen_point: Point);
    fn enable_menu_item(&self, menu: MenuHandle, command: usize, enabled: bool);
    fn set_menu_default_item(&self, menu: MenuHandle, command: usize);

    fn show_scroll_bars(&self, show: bool);
    fn set_dwm_nc_rendering(&self, enabled: bool);
    fn extend_frame_into_client(&self, margins: Insets);
    fn set_transitions_disabled(&self, disabled: bool);
    fn is_workstation_locked(&self) -> bool;
    fn register_touch_window(&self) -> bool;
    fn set_owner_chain_enabled(&self, enabled: bool);
    fn destroy_window(&self);

    /// Stops the window procedure from routing further messages to the handler.
    fn clear_user_data(&self) {}
}
