/*
 * Scripted stand-ins for the operating system and the widget layer, used by the unit
 * tests of the portable protocol code.
 *
 * `FakeWindow` answers every `NativeWindow` query from public `Cell` fields the test
 * arranges up front and records every side-effecting call in order. Default processing
 * and sent messages can be scripted with hooks that may re-enter the handler, which is
 * how destruction-during-dispatch scenarios are produced.
 *
 * `RecordingDelegate` answers queries from its own `Cell` fields and logs every
 * notification by name. A reaction registered for a notification name runs right after
 * the notification is recorded.
 */

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::HandlerConfig;
use crate::delegate::{AppbarQuery, WindowDelegate};
use crate::events::{Accelerator, EventFlags, KeyEvent, MouseEvent, ScrollEvent, TouchEvent};
use crate::message_handler::MessageHandler;
use crate::messages::{HTCLIENT, HTNOWHERE, WM_NCHITTEST};
use crate::native::{
    ChildWindow, CursorHandle, HookHandle, HookKind, NativeWindow, StockCursor, SWP_HIDEWINDOW,
    SWP_SHOWWINDOW, SystemMetric, TouchInput, WS_VISIBLE,
};
use crate::types::{
    AutohideEdges, Insets, MenuHandle, MonitorId, MonitorInfo, Point, Rect, Region, Size,
    WindowHandle,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    DefWindowProc(u32, usize, isize),
    SendMessage(u32, usize, isize),
    SetWindowPos(Option<Rect>, u32),
    SetWindowRegion(Option<Region>, bool),
    RedrawWindow(u32),
    RedrawChildWindows,
    NotifyChildrenCompositionChanged,
    Invalidate,
    TrackMouseEvent(u32),
    SetCapture,
    ReleaseCapture,
    SetCursor(Option<CursorHandle>),
    SetFocus,
    CloseTouchInputHandle(isize),
    ShowSystemMenuAt(Point),
    EnableMenuItem(usize, bool),
    SetMenuDefaultItem(usize),
    ShowScrollBars(bool),
    SetDwmNcRendering(bool),
    ExtendFrameIntoClient(Insets),
    RegisterTouchWindow,
    SetOwnerChainEnabled(bool),
    DestroyWindow,
    RequestDeferredPump(u32),
    ClearUserData,
}

type MessageHook = Rc<dyn Fn(u32, usize, isize) -> Option<isize>>;

pub struct FakeWindow {
    pub style: Cell<u32>,
    pub ex_style: Cell<u32>,
    pub alive: Cell<bool>,
    pub composition_enabled: Cell<bool>,
    pub minimized: Cell<bool>,
    pub maximized: Cell<bool>,
    pub parent: Cell<Option<WindowHandle>>,
    pub window_rect: Cell<Rect>,
    pub client_rect: Cell<Rect>,
    /// Screen position of the client area's top-left corner.
    pub client_origin: Cell<Point>,
    pub cursor: Cell<Point>,
    pub message_time: Cell<u32>,
    pub message_pos: Cell<Point>,
    pub extra_info: Cell<usize>,
    pub tick: Cell<u64>,
    pub monitor: Cell<Option<MonitorInfo>>,
    pub region: RefCell<Option<Region>>,
    pub region_box: Cell<Option<Rect>>,
    pub update_rect: Cell<Rect>,
    pub capture: Cell<bool>,
    pub modifiers: Cell<EventFlags>,
    pub touch_points: RefCell<Vec<TouchInput>>,
    pub ignore_touch_activate: Cell<bool>,
    pub reroute_wheel: Cell<bool>,
    pub workstation_locked: Cell<bool>,
    pub hooks_fail: Cell<bool>,
    pub transitions_disabled: Cell<bool>,
    /// Answer of default processing and of a sent `WM_NCHITTEST`.
    pub nc_hit_test: Cell<isize>,
    pub dwm_answer: Cell<Option<isize>>,
    pub def_proc_result: Cell<isize>,
    pub has_system_menu: Cell<bool>,
    pub def_proc_hook: RefCell<Option<MessageHook>>,
    pub send_hook: RefCell<Option<MessageHook>>,
    cursor_handle: Cell<Option<CursorHandle>>,
    calls: RefCell<Vec<NativeCall>>,
    style_writes: Cell<usize>,
    installed_hooks: RefCell<Vec<HookHandle>>,
    // Child windows as (client rect, visible, extended style), topmost first.
    children: RefCell<Vec<(Rect, bool, u32)>>,
    next_hook: Cell<isize>,
}

impl FakeWindow {
    pub fn new() -> Self {
        Self {
            style: Cell::new(0),
            ex_style: Cell::new(0),
            alive: Cell::new(true),
            composition_enabled: Cell::new(false),
            minimized: Cell::new(false),
            maximized: Cell::new(false),
            parent: Cell::new(None),
            window_rect: Cell::new(Rect::new(100, 100, 500, 400)),
            client_rect: Cell::new(Rect::new(0, 0, 392, 362)),
            client_origin: Cell::new(Point::new(104, 134)),
            cursor: Cell::new(Point::default()),
            message_time: Cell::new(0),
            message_pos: Cell::new(Point::default()),
            extra_info: Cell::new(0),
            tick: Cell::new(0),
            monitor: Cell::new(Some(MonitorInfo {
                id: MonitorId(1),
                monitor_rect: Rect::new(0, 0, 1920, 1080),
                work_area: Rect::new(0, 0, 1920, 1040),
            })),
            region: RefCell::new(None),
            region_box: Cell::new(None),
            update_rect: Cell::new(Rect::default()),
            capture: Cell::new(false),
            modifiers: Cell::new(EventFlags::NONE),
            touch_points: RefCell::new(Vec::new()),
            ignore_touch_activate: Cell::new(false),
            children: RefCell::new(Vec::new()),
            reroute_wheel: Cell::new(false),
            workstation_locked: Cell::new(false),
            hooks_fail: Cell::new(false),
            transitions_disabled: Cell::new(false),
            nc_hit_test: Cell::new(HTCLIENT),
            dwm_answer: Cell::new(None),
            def_proc_result: Cell::new(0),
            has_system_menu: Cell::new(true),
            def_proc_hook: RefCell::new(None),
            send_hook: RefCell::new(None),
            cursor_handle: Cell::new(None),
            calls: RefCell::new(Vec::new()),
            style_writes: Cell::new(0),
            installed_hooks: RefCell::new(Vec::new()),
            next_hook: Cell::new(1),
        }
    }

    pub fn add_child(&self, client_rect: Rect, visible: bool, ex_style: u32) {
        self.children
            .borrow_mut()
            .push((client_rect, visible, ex_style));
    }

    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count_calls(&self, predicate: impl Fn(&NativeCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }

    pub fn style_writes(&self) -> usize {
        self.style_writes.get()
    }

    pub fn installed_hook_count(&self) -> usize {
        self.installed_hooks.borrow().len()
    }

    pub fn window_pos_calls(&self) -> Vec<(Option<Rect>, u32)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                NativeCall::SetWindowPos(rect, flags) => Some((*rect, *flags)),
                _ => None,
            })
            .collect()
    }

    pub fn set_def_proc_hook(&self, hook: impl Fn(u32, usize, isize) -> Option<isize> + 'static) {
        *self.def_proc_hook.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn set_send_hook(&self, hook: impl Fn(u32, usize, isize) -> Option<isize> + 'static) {
        *self.send_hook.borrow_mut() = Some(Rc::new(hook));
    }

    fn record(&self, call: NativeCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl NativeWindow for FakeWindow {
    fn handle(&self) -> WindowHandle {
        WindowHandle(0x1234)
    }

    fn is_window(&self) -> bool {
        self.alive.get()
    }

    fn is_visible(&self) -> bool {
        self.alive.get() && self.style.get() & WS_VISIBLE != 0
    }

    fn is_minimized(&self) -> bool {
        self.minimized.get()
    }

    fn is_maximized(&self) -> bool {
        self.maximized.get()
    }

    fn style(&self) -> u32 {
        self.style.get()
    }

    fn set_style(&self, style: u32) {
        self.style_writes.set(self.style_writes.get() + 1);
        self.style.set(style);
    }

    fn ex_style(&self) -> u32 {
        self.ex_style.get()
    }

    fn parent(&self) -> Option<WindowHandle> {
        self.parent.get()
    }

    fn window_rect(&self) -> Option<Rect> {
        self.alive.get().then(|| self.window_rect.get())
    }

    fn client_rect(&self) -> Option<Rect> {
        self.alive.get().then(|| self.client_rect.get())
    }

    fn client_to_screen(&self, point: Point) -> Point {
        let origin = self.client_origin.get();
        Point::new(point.x + origin.x, point.y + origin.y)
    }

    fn screen_to_client(&self, point: Point) -> Point {
        let origin = self.client_origin.get();
        Point::new(point.x - origin.x, point.y - origin.y)
    }

    fn def_window_proc(&self, message: u32, wparam: usize, lparam: isize) -> isize {
        self.record(NativeCall::DefWindowProc(message, wparam, lparam));
        let hook = self.def_proc_hook.borrow().clone();
        if let Some(result) = hook.and_then(|hook| hook(message, wparam, lparam)) {
            return result;
        }
        if message == WM_NCHITTEST {
            return self.nc_hit_test.get();
        }
        self.def_proc_result.get()
    }

    fn send_message(&self, message: u32, wparam: usize, lparam: isize) -> isize {
        self.record(NativeCall::SendMessage(message, wparam, lparam));
        let hook = self.send_hook.borrow().clone();
        if let Some(result) = hook.and_then(|hook| hook(message, wparam, lparam)) {
            return result;
        }
        if message == WM_NCHITTEST {
            return self.nc_hit_test.get();
        }
        0
    }

    fn dwm_def_window_proc(&self, _message: u32, _wparam: usize, _lparam: isize) -> Option<isize> {
        self.dwm_answer.get()
    }

    fn is_composition_enabled(&self) -> bool {
        self.composition_enabled.get()
    }

    fn message_time(&self) -> u32 {
        self.message_time.get()
    }

    fn message_pos(&self) -> Point {
        self.message_pos.get()
    }

    fn message_extra_info(&self) -> usize {
        self.extra_info.get()
    }

    fn thread_id(&self) -> u32 {
        1
    }

    fn tick_count(&self) -> u64 {
        self.tick.get()
    }

    fn request_deferred_pump(&self, delay_ms: u32) {
        self.record(NativeCall::RequestDeferredPump(delay_ms));
    }

    fn cursor_pos(&self) -> Point {
        self.cursor.get()
    }

    fn monitor_from_rect(&self, _rect: &Rect) -> Option<MonitorInfo> {
        self.monitor.get()
    }

    fn monitor_from_window(&self) -> Option<MonitorInfo> {
        self.monitor.get()
    }

    fn nearest_monitor(&self) -> Option<MonitorInfo> {
        self.monitor.get()
    }

    fn window_region(&self) -> Option<Region> {
        self.region.borrow().clone()
    }

    fn set_window_region(&self, region: Option<Region>, redraw: bool) {
        self.record(NativeCall::SetWindowRegion(region.clone(), redraw));
        *self.region.borrow_mut() = region;
    }

    fn region_box(&self, _region: usize) -> Option<Rect> {
        self.region_box.get()
    }

    fn set_window_pos(&self, rect: Option<Rect>, flags: u32) {
        self.record(NativeCall::SetWindowPos(rect, flags));
        if flags & SWP_SHOWWINDOW != 0 {
            self.style.set(self.style.get() | WS_VISIBLE);
        }
        if flags & SWP_HIDEWINDOW != 0 {
            self.style.set(self.style.get() & !WS_VISIBLE);
        }
    }

    fn redraw_window(&self, flags: u32) {
        self.record(NativeCall::RedrawWindow(flags));
    }

    fn redraw_child_windows(&self) {
        self.record(NativeCall::RedrawChildWindows);
    }

    fn notify_children_composition_changed(&self) {
        self.record(NativeCall::NotifyChildrenCompositionChanged);
    }

    fn invalidate(&self) {
        self.record(NativeCall::Invalidate);
    }

    fn validate_paint(&self) -> Rect {
        self.update_rect.replace(Rect::default())
    }

    fn system_metric(&self, metric: SystemMetric) -> i32 {
        match metric {
            SystemMetric::SizeFrameWidth | SystemMetric::SizeFrameHeight => 8,
            SystemMetric::VScrollWidth | SystemMetric::VScrollHeight => 17,
            SystemMetric::MaxTrackWidth => 3000,
            SystemMetric::MaxTrackHeight => 2000,
        }
    }

    fn load_stock_cursor(&self, cursor: StockCursor) -> Option<CursorHandle> {
        let id = match cursor {
            StockCursor::Arrow => 1,
            StockCursor::SizeNwse => 2,
            StockCursor::SizeNesw => 3,
            StockCursor::SizeWe => 4,
            StockCursor::SizeNs => 5,
        };
        Some(CursorHandle(id))
    }

    fn set_cursor(&self, cursor: Option<CursorHandle>) -> Option<CursorHandle> {
        self.record(NativeCall::SetCursor(cursor));
        self.cursor_handle.replace(cursor)
    }

    fn track_mouse_event(&self, flags: u32) {
        self.record(NativeCall::TrackMouseEvent(flags));
    }

    fn set_capture(&self) {
        self.record(NativeCall::SetCapture);
        self.capture.set(true);
    }

    fn release_capture(&self) {
        self.record(NativeCall::ReleaseCapture);
        self.capture.set(false);
    }

    fn has_capture(&self) -> bool {
        self.capture.get()
    }

    fn key_modifiers(&self) -> EventFlags {
        self.modifiers.get()
    }

    fn set_focus(&self) {
        self.record(NativeCall::SetFocus);
    }

    fn touch_inputs(&self, _touch_handle: isize, count: usize) -> Option<Vec<TouchInput>> {
        let points = self.touch_points.borrow();
        Some(points.iter().take(count).copied().collect())
    }

    fn close_touch_input_handle(&self, touch_handle: isize) {
        self.record(NativeCall::CloseTouchInputHandle(touch_handle));
    }

    fn take_ignore_touch_activate_prop(&self) -> bool {
        self.ignore_touch_activate.replace(false)
    }

    fn child_window_at(&self, client_point: Point) -> Option<ChildWindow> {
        self.children
            .borrow()
            .iter()
            .find(|(rect, _, _)| rect.contains(client_point))
            .map(|&(_, visible, ex_style)| ChildWindow { visible, ex_style })
    }

    fn reroute_mouse_wheel(&self, _wparam: usize, _lparam: isize) -> bool {
        self.reroute_wheel.get()
    }

    fn install_input_hook(&self, _kind: HookKind) -> Option<HookHandle> {
        if self.hooks_fail.get() {
            return None;
        }
        let hook = HookHandle(self.next_hook.get());
        self.next_hook.set(hook.0 + 1);
        self.installed_hooks.borrow_mut().push(hook);
        Some(hook)
    }

    fn remove_input_hook(&self, hook: HookHandle) {
        self.installed_hooks.borrow_mut().retain(|h| *h != hook);
    }

    fn system_menu(&self) -> Option<MenuHandle> {
        self.has_system_menu.get().then_some(MenuHandle(0x77))
    }

    fn show_system_menu_at(&self, screen_point: Point) {
        self.record(NativeCall::ShowSystemMenuAt(screen_point));
    }

    fn enable_menu_item(&self, _menu: MenuHandle, command: usize, enabled: bool) {
        self.record(NativeCall::EnableMenuItem(command, enabled));
    }

    fn set_menu_default_item(&self, _menu: MenuHandle, command: usize) {
        self.record(NativeCall::SetMenuDefaultItem(command));
    }

    fn show_scroll_bars(&self, show: bool) {
        self.record(NativeCall::ShowScrollBars(show));
    }

    fn set_dwm_nc_rendering(&self, enabled: bool) {
        self.record(NativeCall::SetDwmNcRendering(enabled));
    }

    fn extend_frame_into_client(&self, margins: Insets) {
        self.record(NativeCall::ExtendFrameIntoClient(margins));
    }

    fn set_transitions_disabled(&self, disabled: bool) {
        self.transitions_disabled.set(disabled);
    }

    fn is_workstation_locked(&self) -> bool {
        self.workstation_locked.get()
    }

    fn register_touch_window(&self) -> bool {
        self.record(NativeCall::RegisterTouchWindow);
        true
    }

    fn set_owner_chain_enabled(&self, enabled: bool) {
        self.record(NativeCall::SetOwnerChainEnabled(enabled));
    }

    fn destroy_window(&self) {
        self.record(NativeCall::DestroyWindow);
        self.alive.set(false);
    }

    fn clear_user_data(&self) {
        self.record(NativeCall::ClearUserData);
    }
}

pub struct RecordingDelegate {
    pub widget_window: Cell<bool>,
    pub custom_frame: Cell<bool>,
    pub modal: Cell<bool>,
    pub can_activate: Cell<bool>,
    pub can_resize: Cell<bool>,
    pub can_maximize: Cell<bool>,
    pub can_minimize: Cell<bool>,
    pub widget_is_client: Cell<bool>,
    pub inactive_rendering_disabled: Cell<bool>,
    pub insets: Cell<Option<Insets>>,
    pub min_max: Cell<(Size, Size)>,
    pub non_client_component: Cell<isize>,
    pub window_mask: RefCell<Option<Region>>,
    pub root_view_size: Cell<Size>,
    pub handles_system_commands: Cell<bool>,
    pub processes_work_area: Cell<bool>,
    pub consume_mouse: Cell<bool>,
    pub consume_keys: Cell<bool>,
    pub consume_command: Cell<bool>,
    pub consume_app_command: Cell<bool>,
    pub pre_handle: Cell<Option<isize>>,
    pub mouse_events: RefCell<Vec<MouseEvent>>,
    pub key_events: RefCell<Vec<KeyEvent>>,
    pub touch_events: RefCell<Vec<TouchEvent>>,
    pub scroll_events: RefCell<Vec<ScrollEvent>>,
    pub accelerators: RefCell<Vec<Accelerator>>,
    pub paints: RefCell<Vec<Rect>>,
    notifications: RefCell<Vec<String>>,
    reactions: RefCell<Vec<(String, Rc<dyn Fn()>)>>,
}

impl RecordingDelegate {
    pub fn new() -> Self {
        Self {
            widget_window: Cell::new(true),
            custom_frame: Cell::new(false),
            modal: Cell::new(false),
            can_activate: Cell::new(true),
            can_resize: Cell::new(true),
            can_maximize: Cell::new(true),
            can_minimize: Cell::new(true),
            widget_is_client: Cell::new(true),
            inactive_rendering_disabled: Cell::new(false),
            insets: Cell::new(None),
            min_max: Cell::new((Size::default(), Size::default())),
            non_client_component: Cell::new(HTNOWHERE),
            window_mask: RefCell::new(None),
            root_view_size: Cell::new(Size::default()),
            handles_system_commands: Cell::new(true),
            processes_work_area: Cell::new(false),
            consume_mouse: Cell::new(false),
            consume_keys: Cell::new(false),
            consume_command: Cell::new(false),
            consume_app_command: Cell::new(false),
            pre_handle: Cell::new(None),
            mouse_events: RefCell::new(Vec::new()),
            key_events: RefCell::new(Vec::new()),
            touch_events: RefCell::new(Vec::new()),
            scroll_events: RefCell::new(Vec::new()),
            accelerators: RefCell::new(Vec::new()),
            paints: RefCell::new(Vec::new()),
            notifications: RefCell::new(Vec::new()),
            reactions: RefCell::new(Vec::new()),
        }
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.borrow().clone()
    }

    /// Number of recorded notifications whose text starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.notifications
            .borrow()
            .iter()
            .filter(|n| n.starts_with(prefix))
            .count()
    }

    pub fn clear(&self) {
        self.notifications.borrow_mut().clear();
    }

    /// Runs `reaction` every time a notification starting with `prefix` is recorded.
    pub fn react_to(&self, prefix: &str, reaction: impl Fn() + 'static) {
        self.reactions
            .borrow_mut()
            .push((prefix.to_string(), Rc::new(reaction)));
    }

    fn record(&self, notification: String) {
        let matching: Vec<Rc<dyn Fn()>> = self
            .reactions
            .borrow()
            .iter()
            .filter(|(prefix, _)| notification.starts_with(prefix.as_str()))
            .map(|(_, reaction)| Rc::clone(reaction))
            .collect();
        self.notifications.borrow_mut().push(notification);
        for reaction in matching {
            reaction();
        }
    }
}

impl WindowDelegate for RecordingDelegate {
    fn is_widget_window(&self) -> bool {
        self.widget_window.get()
    }

    fn is_using_custom_frame(&self) -> bool {
        self.custom_frame.get()
    }

    fn is_modal(&self) -> bool {
        self.modal.get()
    }

    fn can_activate(&self) -> bool {
        self.can_activate.get()
    }

    fn can_resize(&self) -> bool {
        self.can_resize.get()
    }

    fn can_maximize(&self) -> bool {
        self.can_maximize.get()
    }

    fn can_minimize(&self) -> bool {
        self.can_minimize.get()
    }

    fn widget_size_is_client_size(&self) -> bool {
        self.widget_is_client.get()
    }

    fn is_inactive_rendering_disabled(&self) -> bool {
        self.inactive_rendering_disabled.get()
    }

    fn enable_inactive_rendering(&self) {
        self.inactive_rendering_disabled.set(false);
        self.record("enable_inactive_rendering".into());
    }

    fn get_client_area_insets(&self) -> Option<Insets> {
        self.insets.get()
    }

    fn get_min_max_size(&self) -> (Size, Size) {
        self.min_max.get()
    }

    fn get_non_client_component(&self, _point: Point) -> isize {
        self.non_client_component.get()
    }

    fn get_window_mask(&self, _window_size: Size) -> Option<Region> {
        self.window_mask.borrow().clone()
    }

    fn get_root_view_size(&self) -> Size {
        self.root_view_size.get()
    }

    fn should_handle_system_commands(&self) -> bool {
        self.handles_system_commands.get()
    }

    fn will_process_work_area_change(&self) -> bool {
        self.processes_work_area.get()
    }

    fn handle_create(&self) {
        self.record("create".into());
    }

    fn handle_destroying(&self) {
        self.record("destroying".into());
    }

    fn handle_destroyed(&self) {
        self.record("destroyed".into());
    }

    fn handle_close(&self) {
        self.record("close".into());
    }

    fn handle_activation_changed(&self, active: bool) {
        self.record(format!("activation_changed({active})"));
    }

    fn handle_app_deactivated(&self) {
        self.record("app_deactivated".into());
    }

    fn handle_native_focus(&self, _last_focused: WindowHandle) {
        self.record("native_focus".into());
    }

    fn handle_native_blur(&self, _focused: WindowHandle) {
        self.record("native_blur".into());
    }

    fn handle_capture_lost(&self) {
        self.record("capture_lost".into());
    }

    fn handle_cancel_mode(&self) {
        self.record("cancel_mode".into());
    }

    fn handle_client_size_changed(&self, size: Size) {
        self.record(format!("client_size_changed({}x{})", size.width, size.height));
    }

    fn handle_window_size_changing(&self) {
        self.record("window_size_changing".into());
    }

    fn handle_visibility_changing(&self, visible: bool) {
        self.record(format!("visibility_changing({visible})"));
    }

    fn handle_visibility_changed(&self, visible: bool) {
        self.record(format!("visibility_changed({visible})"));
    }

    fn handle_move(&self) {
        self.record("move".into());
    }

    fn handle_begin_size_move(&self) {
        self.record("begin_size_move".into());
    }

    fn handle_end_size_move(&self) {
        self.record("end_size_move".into());
    }

    fn handle_work_area_changed(&self) {
        self.record("work_area_changed".into());
    }

    fn handle_display_change(&self) {
        self.record("display_change".into());
    }

    fn handle_frame_changed(&self) {
        self.record("frame_changed".into());
    }

    fn reset_window_controls(&self) {
        self.record("reset_window_controls".into());
    }

    fn handle_menu_loop(&self, in_menu_loop: bool) {
        self.record(format!("menu_loop({in_menu_loop})"));
    }

    fn handle_input_language_change(&self, _character_set: u32, _input_language: isize) {
        self.record("input_language_change".into());
    }

    fn handle_paint_accelerated(&self, dirty: Rect) {
        self.paints.borrow_mut().push(dirty);
        self.record("paint".into());
    }

    fn schedule_paint(&self) {
        self.record("schedule_paint".into());
    }

    fn handle_mouse_event(&self, event: &MouseEvent) -> bool {
        self.mouse_events.borrow_mut().push(*event);
        self.record("mouse_event".into());
        self.consume_mouse.get()
    }

    fn handle_untranslated_key_event(&self, _event: &KeyEvent) -> bool {
        false
    }

    fn handle_key_event(&self, event: &KeyEvent) -> bool {
        self.key_events.borrow_mut().push(*event);
        self.record("key_event".into());
        self.consume_keys.get()
    }

    fn handle_ime_message(&self, message: u32, _wparam: usize, _lparam: isize) -> Option<isize> {
        self.record(format!("ime_message({message:#x})"));
        None
    }

    fn handle_touch_event(&self, event: &TouchEvent) {
        self.touch_events.borrow_mut().push(*event);
        self.record("touch_event".into());
    }

    fn handle_scroll_event(&self, event: &ScrollEvent) {
        self.scroll_events.borrow_mut().push(*event);
        self.record("scroll_event".into());
    }

    fn handle_accelerator(&self, accelerator: &Accelerator) {
        self.accelerators.borrow_mut().push(*accelerator);
        self.record("accelerator".into());
    }

    fn handle_app_command(&self, command: i32) -> bool {
        self.record(format!("app_command({command})"));
        self.consume_app_command.get()
    }

    fn handle_command(&self, command: usize) -> bool {
        self.record(format!("command({command:#x})"));
        self.consume_command.get()
    }

    fn pre_handle_msg(&self, _message: u32, _wparam: usize, _lparam: isize) -> Option<isize> {
        self.pre_handle.get()
    }

    fn post_handle_msg(&self, message: u32, _wparam: usize, _lparam: isize) {
        self.record(format!("post_handle({message:#x})"));
    }
}

/// Appbar provider answering with fixed edges and keeping the last change callback.
pub struct FixedAppbar {
    pub edges: Cell<AutohideEdges>,
    pub queries: Cell<usize>,
    pub last_callback: RefCell<Option<Box<dyn Fn()>>>,
}

impl FixedAppbar {
    pub fn new(edges: AutohideEdges) -> Self {
        Self {
            edges: Cell::new(edges),
            queries: Cell::new(0),
            last_callback: RefCell::new(None),
        }
    }

    /// Simulates the provider learning that the edges changed.
    pub fn fire_changed(&self) {
        let callback = self.last_callback.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
            let mut slot = self.last_callback.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

impl AppbarQuery for FixedAppbar {
    fn autohide_edges(&self, _monitor: MonitorId, on_changed: Box<dyn Fn()>) -> AutohideEdges {
        self.queries.set(self.queries.get() + 1);
        *self.last_callback.borrow_mut() = Some(on_changed);
        self.edges.get()
    }
}

pub struct Harness {
    pub native: Rc<FakeWindow>,
    pub delegate: Rc<RecordingDelegate>,
    pub handler: Rc<MessageHandler<FakeWindow>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(HandlerConfig::default())
    }

    pub fn with_config(config: HandlerConfig) -> Self {
        let native = Rc::new(FakeWindow::new());
        native.style.set(WS_VISIBLE);
        let delegate = Rc::new(RecordingDelegate::new());
        let handler =
            MessageHandler::new(Rc::clone(&native), config).expect("test config is valid");
        handler.set_delegate(&delegate);
        Self {
            native,
            delegate,
            handler,
        }
    }

    pub fn send(&self, message: u32, wparam: usize, lparam: isize) -> isize {
        self.handler.dispatch(message, wparam, lparam)
    }

    /// Advances the fake clock and runs every deferred task that became due.
    pub fn advance(&self, ms: u64) -> usize {
        self.native.tick.set(self.native.tick.get() + ms);
        self.handler.run_deferred_tasks()
    }
}
