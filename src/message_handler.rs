/*
 * Owns one native window's message stream and turns it into calls on a `WindowDelegate`.
 *
 * `dispatch` is the window procedure. Every message is first offered to the delegate's
 * pre-hook, then routed by category to a specialised handler (the `handlers` module
 * holds most of them as further `impl` blocks on `MessageHandler`). Messages a handler
 * leaves unhandled receive default processing. Both the handler and default processing
 * can run nested message loops that destroy the window, and with it this object's owner,
 * so a `LivenessToken` is taken before each such call and checked after it.
 *
 * The handler is shared through `Rc` and all of its state lives in `Cell`/`RefCell`
 * fields: a message handled here may synchronously deliver another message to the same
 * handler, so no borrow is ever held across a native or delegate call.
 */

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::HandlerConfig;
use crate::delegate::{AppbarQuery, WindowDelegate};
use crate::error::Result as PlatformResult;
use crate::events::{KeyEvent, NativeMessage, ScrollEvent};
use crate::liveness::LivenessFactory;
use crate::messages::*;
use crate::monitor::{FrameGeometry, monitor_and_rects};
use crate::native::{
    CursorHandle, NativeWindow, SWP_HIDEWINDOW, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOREPOSITION,
    SWP_NOSIZE, SWP_NOZORDER, WS_CAPTION, WS_CHILD, WS_EX_COMPOSITED, WS_EX_NOACTIVATE,
    WS_EX_TRANSPARENT, WS_HSCROLL, WS_MAXIMIZEBOX, WS_MINIMIZEBOX, WS_POPUP, WS_THICKFRAME,
    WS_VSCROLL,
};
use crate::redraw_lock::{RedrawLock, ScopedRedrawLock};
use crate::task_queue::TaskQueue;
use crate::touch::TouchTracker;
use crate::types::{Insets, ModalType, Rect, Region, Size, WindowHandle};

/// Short-lived state that only matters while a particular native interaction is running.
#[derive(Debug)]
pub(crate) struct TransientFlags {
    /// Nesting depth of menu loops; the delegate hears only about the outermost one.
    pub menu_depth: Cell<u32>,
    /// Set while default processing runs an interactive `SC_SIZE` loop.
    pub in_size_loop: Cell<bool>,
    /// Set after correcting a position for a work-area change, until the loop turns over.
    pub ignore_window_pos_changes: Cell<bool>,
    pub is_first_nccalc: Cell<bool>,
    pub waiting_for_close_now: Cell<bool>,
    pub restored_enabled: Cell<bool>,
    pub destroyed_notified: Cell<bool>,
}

impl Default for TransientFlags {
    fn default() -> Self {
        Self {
            menu_depth: Cell::new(0),
            in_size_loop: Cell::new(false),
            ignore_window_pos_changes: Cell::new(false),
            is_first_nccalc: Cell::new(true),
            waiting_for_close_now: Cell::new(false),
            restored_enabled: Cell::new(false),
            destroyed_notified: Cell::new(false),
        }
    }
}

pub struct MessageHandler<W: NativeWindow + 'static> {
    pub(crate) native: Rc<W>,
    pub(crate) config: HandlerConfig,
    delegate: RefCell<Option<Weak<dyn WindowDelegate>>>,
    appbar_query: RefCell<Option<Rc<dyn AppbarQuery>>>,
    self_ref: Weak<Self>,
    tasks: TaskQueue,
    pub(crate) lifetime: LivenessFactory,
    pub(crate) autohide_factory: LivenessFactory,
    pub(crate) redraw_lock: RedrawLock,
    pub(crate) flags: TransientFlags,

    pub(crate) touch: RefCell<TouchTracker>,
    pub(crate) touch_down_contexts: Cell<u32>,

    pub(crate) active_mouse_tracking_flags: Cell<u32>,
    pub(crate) is_right_mouse_pressed_on_caption: Cell<bool>,
    pub(crate) last_mouse_hwheel_time: Cell<Option<u32>>,
    pub(crate) current_cursor: Cell<Option<CursorHandle>>,
    pub(crate) previous_cursor: Cell<Option<CursorHandle>>,

    pub(crate) custom_window_region: RefCell<Option<Region>>,
    pub(crate) fullscreen: Cell<bool>,
    pub(crate) dwm_transition_desired: Cell<bool>,
    pub(crate) needs_scroll_styles: Cell<bool>,
    pub(crate) geometry: RefCell<FrameGeometry>,
}

impl<W: NativeWindow + 'static> MessageHandler<W> {
    pub fn new(native: Rc<W>, config: HandlerConfig) -> PlatformResult<Rc<Self>> {
        config.validate()?;
        let handler = Rc::new_cyclic(|self_ref| {
            let tasks = TaskQueue::new();
            let pump_target = Rc::clone(&native);
            tasks.set_wake_hook(Box::new(move |delay_ms| {
                pump_target.request_deferred_pump(delay_ms)
            }));
            Self {
                native,
                config,
                delegate: RefCell::new(None),
                appbar_query: RefCell::new(None),
                self_ref: self_ref.clone(),
                tasks,
                lifetime: LivenessFactory::new(),
                autohide_factory: LivenessFactory::new(),
                redraw_lock: RedrawLock::new(),
                flags: TransientFlags::default(),
                touch: RefCell::new(TouchTracker::default()),
                touch_down_contexts: Cell::new(0),
                active_mouse_tracking_flags: Cell::new(0),
                is_right_mouse_pressed_on_caption: Cell::new(false),
                last_mouse_hwheel_time: Cell::new(None),
                current_cursor: Cell::new(None),
                previous_cursor: Cell::new(None),
                custom_window_region: RefCell::new(None),
                fullscreen: Cell::new(false),
                dwm_transition_desired: Cell::new(false),
                needs_scroll_styles: Cell::new(false),
                geometry: RefCell::new(FrameGeometry::new()),
            }
        });
        log::debug!("MessageHandler: created for {:?}", handler.native.handle());
        Ok(handler)
    }

    /// The delegate is held weakly; it must outlive the window to receive `handle_destroyed`.
    pub fn set_delegate<D: WindowDelegate + 'static>(&self, delegate: &Rc<D>) {
        let weak: Weak<dyn WindowDelegate> = Rc::downgrade(delegate) as Weak<dyn WindowDelegate>;
        *self.delegate.borrow_mut() = Some(weak);
    }

    pub fn set_appbar_query(&self, query: Rc<dyn AppbarQuery>) {
        *self.appbar_query.borrow_mut() = Some(query);
    }

    pub fn native(&self) -> &Rc<W> {
        &self.native
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn in_size_loop(&self) -> bool {
        self.flags.in_size_loop.get()
    }

    pub fn menu_depth(&self) -> u32 {
        self.flags.menu_depth.get()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }

    // Delegate access. The delegate is upgraded per call so no borrow of the slot is
    // held while it runs.

    pub(crate) fn delegate(&self) -> Option<Rc<dyn WindowDelegate>> {
        self.delegate.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn query<R>(&self, fallback: R, f: impl FnOnce(&dyn WindowDelegate) -> R) -> R {
        match self.delegate() {
            Some(delegate) => f(delegate.as_ref()),
            None => fallback,
        }
    }

    pub(crate) fn notify(&self, f: impl FnOnce(&dyn WindowDelegate)) {
        if let Some(delegate) = self.delegate() {
            f(delegate.as_ref());
        }
    }

    pub(crate) fn appbar_query(&self) -> Option<Rc<dyn AppbarQuery>> {
        self.appbar_query.borrow().clone()
    }

    pub(crate) fn is_widget_window(&self) -> bool {
        self.query(false, |d| d.is_widget_window())
    }

    pub(crate) fn is_using_custom_frame(&self) -> bool {
        self.query(false, |d| d.is_using_custom_frame())
    }

    pub(crate) fn can_activate(&self) -> bool {
        self.query(true, |d| d.can_activate())
    }

    pub(crate) fn weak_self(&self) -> Weak<Self> {
        self.self_ref.clone()
    }

    // Deferred work.

    /*
     * Queues `task` for a later turn of the message loop. The task only runs if this
     * handler is still alive and has not seen `WM_NCDESTROY` by then.
     */
    pub(crate) fn post_task(&self, delay_ms: Option<u32>, task: impl FnOnce(&Self) + 'static) {
        let weak = self.self_ref.clone();
        let token = self.lifetime.token();
        let task = Box::new(move || {
            if !token.is_alive() {
                return;
            }
            if let Some(handler) = weak.upgrade() {
                task(&handler);
            }
        });
        match delay_ms {
            None => self.tasks.post(task),
            Some(delay) => self
                .tasks
                .post_delayed(delay, self.native.tick_count(), task),
        }
    }

    /// Runs the deferred tasks that are due. Called by the backend when woken.
    pub fn run_deferred_tasks(&self) -> usize {
        self.tasks.run_due(self.native.tick_count())
    }

    pub fn pending_task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn next_task_deadline(&self) -> Option<u64> {
        self.tasks.next_deadline()
    }

    // Dispatch.

    pub fn dispatch(&self, message: u32, wparam: usize, lparam: isize) -> isize {
        if let Some(result) = self
            .delegate()
            .and_then(|d| d.pre_handle_msg(message, wparam, lparam))
        {
            return result;
        }

        let token = self.lifetime.token();
        let handled = self.process_message(message, wparam, lparam);
        if !token.is_alive() {
            return 0;
        }

        let result = match handled {
            Some(result) => result,
            None => {
                let result = self.native.def_window_proc(message, wparam, lparam);
                // Default processing may have destroyed the window and us in a nested loop.
                if !token.is_alive() || !self.native.is_window() {
                    return result;
                }
                result
            }
        };

        if message == WM_NCDESTROY {
            self.notify_destroyed();
            return result;
        }
        self.notify(|d| d.post_handle_msg(message, wparam, lparam));
        if !token.is_alive() {
            return result;
        }

        if message == WM_ACTIVATE && self.native.is_top_level() {
            self.post_process_activate_message(loword(wparam), hiword(wparam) != 0);
        }
        result
    }

    /*
     * Entry point for messages another window forwards to this one, such as a legacy
     * child that hands its input up. Forwarded mouse messages do not start leave
     * tracking; the forwarding window tracks the mouse itself.
     */
    pub fn handle_forwarded_message(
        &self,
        message: u32,
        wparam: usize,
        lparam: isize,
    ) -> Option<isize> {
        match categorize(message) {
            MessageCategory::Mouse => {
                self.handle_mouse_event_internal(message, wparam, lparam, false)
            }
            MessageCategory::Keyboard => self.on_key_event(message, wparam, lparam),
            MessageCategory::Ime if matches!(message, WM_CHAR | WM_SYSCHAR) => {
                self.on_ime_message(message, wparam, lparam)
            }
            MessageCategory::Touch => self.on_touch_event(wparam, lparam),
            MessageCategory::Scroll => self.on_scroll_message(message, wparam, lparam),
            _ if message == WM_NCHITTEST => self.on_nc_hit_test(point_from_lparam(lparam)),
            _ => None,
        }
    }

    fn process_message(&self, message: u32, wparam: usize, lparam: isize) -> Option<isize> {
        match categorize(message) {
            MessageCategory::Mouse => {
                self.handle_mouse_event_internal(message, wparam, lparam, true)
            }
            MessageCategory::Keyboard => self.on_key_event(message, wparam, lparam),
            MessageCategory::Ime => self.on_ime_message(message, wparam, lparam),
            MessageCategory::Touch => self.on_touch_event(wparam, lparam),
            MessageCategory::Scroll => self.on_scroll_message(message, wparam, lparam),
            MessageCategory::NonClient => self.process_frame_message(message, wparam, lparam),
            MessageCategory::Lifecycle => self.process_lifecycle_message(message, wparam, lparam),
            MessageCategory::Activation => {
                self.process_activation_message(message, wparam, lparam)
            }
            MessageCategory::Geometry => self.process_geometry_message(message, wparam, lparam),
            MessageCategory::Menu => self.process_command_message(message, wparam, lparam),
            MessageCategory::Other => self.process_other_message(message, wparam, lparam),
        }
    }

    fn process_lifecycle_message(
        &self,
        message: u32,
        wparam: usize,
        lparam: isize,
    ) -> Option<isize> {
        match message {
            WM_CREATE => Some(self.on_create()),
            WM_DESTROY => {
                log::debug!("MessageHandler: WM_DESTROY for {:?}", self.native.handle());
                self.notify(|d| d.handle_destroying());
                Some(0)
            }
            // Default processing runs here so the destroyed notification can follow it.
            WM_NCDESTROY => Some(self.native.def_window_proc(message, wparam, lparam)),
            WM_CLOSE => {
                self.notify(|d| d.handle_close());
                Some(0)
            }
            _ => None,
        }
    }

    fn process_activation_message(
        &self,
        message: u32,
        wparam: usize,
        lparam: isize,
    ) -> Option<isize> {
        match message {
            WM_ACTIVATEAPP => {
                self.on_activate_app(wparam != 0, lparam as u32);
                Some(0)
            }
            WM_MOUSEACTIVATE => self.on_mouse_activate(),
            WM_SETFOCUS => {
                self.notify(|d| d.handle_native_focus(WindowHandle(wparam as isize)));
                None
            }
            WM_KILLFOCUS => {
                self.notify(|d| d.handle_native_blur(WindowHandle(wparam as isize)));
                None
            }
            _ => None,
        }
    }

    fn process_other_message(&self, message: u32, wparam: usize, lparam: isize) -> Option<isize> {
        match message {
            WM_SETCURSOR => self.on_set_cursor(lparam),
            WM_CANCELMODE => {
                self.notify(|d| d.handle_cancel_mode());
                None
            }
            WM_CAPTURECHANGED => {
                self.notify(|d| d.handle_capture_lost());
                Some(0)
            }
            // Suppresses resize flicker.
            WM_ERASEBKGND => Some(1),
            WM_INPUTLANGCHANGE => {
                self.notify(|d| d.handle_input_language_change(wparam as u32, lparam));
                Some(0)
            }
            WM_NOTIFY => self.query(None, |d| d.handle_tooltip_notify(wparam, lparam)),
            WM_PAINT => {
                let dirty = self.native.validate_paint();
                if !dirty.is_empty() {
                    self.notify(|d| d.handle_paint_accelerated(dirty));
                }
                Some(0)
            }
            WM_SETICON | WM_SETTEXT => {
                Some(self.def_window_proc_with_redraw_lock(message, wparam, lparam))
            }
            WM_THEMECHANGED => {
                log::debug!("MessageHandler: theme changed");
                Some(0)
            }
            _ => None,
        }
    }

    fn notify_destroyed(&self) {
        if self.flags.destroyed_notified.replace(true) {
            return;
        }
        log::debug!("MessageHandler: window {:?} destroyed", self.native.handle());
        self.notify(|d| d.handle_destroyed());
        // Outer dispatch frames still on the stack must see the teardown.
        self.lifetime.invalidate();
        self.autohide_factory.invalidate();
    }

    pub(crate) fn post_process_activate_message(&self, activation_state: u32, minimized: bool) {
        let active = activation_state != WA_INACTIVE && !minimized;
        if self.can_activate() {
            self.notify(|d| d.handle_activation_changed(active));
        }
    }

    // Lifecycle and focus.

    fn on_create(&self) -> isize {
        if self.native.ex_style() & WS_EX_COMPOSITED != 0 {
            self.native.extend_frame_into_client(Insets::uniform(-1));
        }

        // Makes focus rectangles visible from the start.
        self.native.send_message(
            WM_CHANGEUISTATE,
            make_lparam(UIS_CLEAR as i32, UISF_HIDEFOCUS as i32) as usize,
            0,
        );

        if self.config.remove_standard_frame {
            self.native.set_style(self.native.style() & !WS_CAPTION);
            self.send_frame_changed();
        }

        // Obtains the window's own modifiable copy of the system menu.
        let _ = self.native.system_menu();

        if self.config.register_touch && !self.native.register_touch_window() {
            log::warn!("MessageHandler: touch registration failed");
        }

        self.client_area_size_changed();
        self.notify(|d| d.handle_create());
        log::debug!("MessageHandler: WM_CREATE handled for {:?}", self.native.handle());
        0
    }

    fn on_activate_app(&self, active: bool, thread_id: u32) {
        if self.is_widget_window() && !active && thread_id != self.native.thread_id() {
            self.notify(|d| d.handle_app_deactivated());
            // The native frame has to repaint as inactive too.
            if !self.config.remove_standard_frame && !self.is_using_custom_frame() {
                self.def_window_proc_with_redraw_lock(WM_NCACTIVATE, 0, 0);
            }
        }
    }

    fn on_key_event(&self, message: u32, wparam: usize, lparam: isize) -> Option<isize> {
        let native = NativeMessage {
            message,
            wparam,
            lparam,
            time: self.native.message_time(),
        };
        let event = KeyEvent::from_native(native, self.native.key_modifiers());
        let handled = self.query(false, |d| {
            d.handle_untranslated_key_event(&event) || d.handle_key_event(&event)
        });
        handled.then_some(0)
    }

    fn on_ime_message(&self, message: u32, wparam: usize, lparam: isize) -> Option<isize> {
        self.query(None, |d| d.handle_ime_message(message, wparam, lparam))
    }

    fn on_scroll_message(&self, message: u32, wparam: usize, lparam: isize) -> Option<isize> {
        let event = ScrollEvent::from_native(NativeMessage {
            message,
            wparam,
            lparam,
            time: self.native.message_time(),
        });
        self.notify(|d| d.handle_scroll_event(&event));
        Some(0)
    }

    // Window operations requested by the widget layer.

    /*
     * Prepares the handler for a window about to be created at `bounds`. The monitor
     * geometry is recorded so the first position change can be compared against it.
     */
    pub fn init(&self, bounds: Rect) {
        if let Some(info) = monitor_and_rects(self.native.as_ref(), &bounds) {
            self.geometry.borrow_mut().observe(&info);
        }
        if self.config.use_scroll_style_shim
            && self.native.is_top_level()
            && self.native.style() & WS_POPUP == 0
        {
            self.add_scroll_styles();
            self.needs_scroll_styles.set(true);
        }
    }

    pub fn init_modal(&self, modal_type: ModalType) {
        if modal_type == ModalType::None {
            return;
        }
        // Modality disables the owner and its ancestors so they ignore input.
        self.native.set_owner_chain_enabled(false);
    }

    /*
     * Hides the window at once and destroys it from a posted task, so a caller inside a
     * native callback never sees the window disappear under it.
     */
    pub fn close(&self) {
        if !self.native.is_window() {
            return;
        }
        self.hide();
        self.restore_enabled_if_necessary();
        if !self.flags.waiting_for_close_now.replace(true) {
            self.post_task(None, |handler| handler.close_now());
        }
    }

    pub fn close_now(&self) {
        self.flags.waiting_for_close_now.set(false);
        if self.native.is_window() {
            log::debug!("MessageHandler: destroying {:?}", self.native.handle());
            self.native.destroy_window();
        }
    }

    pub fn hide(&self) {
        if self.native.is_window() {
            // Must not activate another window: this can run during a deactivation.
            self.native.set_window_pos(
                None,
                SWP_HIDEWINDOW
                    | SWP_NOACTIVATE
                    | SWP_NOMOVE
                    | SWP_NOREPOSITION
                    | SWP_NOSIZE
                    | SWP_NOZORDER,
            );
        }
    }

    pub fn set_initial_focus(&self) {
        let ex_style = self.native.ex_style();
        if ex_style & (WS_EX_TRANSPARENT | WS_EX_NOACTIVATE) == 0 {
            self.native.set_focus();
        }
    }

    fn restore_enabled_if_necessary(&self) {
        if self.query(false, |d| d.is_modal()) && !self.flags.restored_enabled.replace(true) {
            self.native.set_owner_chain_enabled(true);
        }
    }

    /// Recomputes the resize and min/max box styles after the widget's constraints change.
    pub fn size_constraints_changed(&self) {
        let mut style = self.native.style();
        if style & (WS_POPUP | WS_CHILD) != 0 {
            return;
        }
        let (can_resize, can_maximize, can_minimize) = self.query((true, true, true), |d| {
            (d.can_resize(), d.can_maximize(), d.can_minimize())
        });
        // WS_THICKFRAME cannot be combined with WS_EX_COMPOSITED.
        if can_resize && self.native.ex_style() & WS_EX_COMPOSITED == 0 {
            style |= WS_THICKFRAME | WS_MAXIMIZEBOX;
            if !can_maximize {
                style &= !WS_MAXIMIZEBOX;
            }
        } else {
            style &= !(WS_THICKFRAME | WS_MAXIMIZEBOX);
        }
        if can_minimize {
            style |= WS_MINIMIZEBOX;
        } else {
            style &= !WS_MINIMIZEBOX;
        }
        self.native.set_style(style);
    }

    /// Presents are dropped while the session is locked, so repaint once it unlocks.
    pub fn on_session_unlocked(&self) {
        self.force_redraw_window(self.config.force_redraw_attempts);
    }

    fn force_redraw_window(&self, attempts: u32) {
        if self.native.is_workstation_locked() {
            let remaining = attempts.saturating_sub(1);
            if remaining == 0 {
                log::warn!("MessageHandler: workstation still locked, giving up on redraw");
                return;
            }
            self.post_task(Some(self.config.force_redraw_retry_delay_ms), move |handler| {
                handler.force_redraw_window(remaining)
            });
            return;
        }
        self.native.invalidate();
    }

    pub(crate) fn client_area_size_changed(&self) {
        let size = if self.native.is_minimized() {
            Size::default()
        } else if self.query(true, |d| d.widget_size_is_client_size()) {
            self.native
                .client_rect()
                .map(|r| r.size())
                .unwrap_or_default()
        } else {
            self.native
                .window_rect()
                .map(|r| r.size())
                .unwrap_or_default()
        };
        self.notify(|d| d.handle_client_size_changed(size));
    }

    pub(crate) fn add_scroll_styles(&self) {
        self.native
            .set_style(self.native.style() | WS_VSCROLL | WS_HSCROLL);
    }

    /*
     * Default processing inside a redraw lock. If the call destroys the handler the lock
     * is abandoned rather than released against a dead window.
     */
    pub fn def_window_proc_with_redraw_lock(
        &self,
        message: u32,
        wparam: usize,
        lparam: isize,
    ) -> isize {
        let lock = ScopedRedrawLock::new(&self.redraw_lock, self.native.as_ref());
        let token = self.lifetime.token();
        let result = self.native.def_window_proc(message, wparam, lparam);
        if !token.is_alive() {
            lock.cancel_unlock_operation();
        }
        result
    }
}

impl<W: NativeWindow + 'static> Drop for MessageHandler<W> {
    fn drop(&mut self) {
        self.delegate.get_mut().take();
        self.native.clear_user_data();
    }
}
