/*
 * Watches an interactive window move for its outcome.
 *
 * The system move loop started by `WM_SYSCOMMAND(SC_MOVE)` returns nothing that says
 * whether the user finished or cancelled the drag. While the loop runs, thread input
 * hooks observe the left-button release (finished) and the Escape key (cancelled).
 * Only one watcher can own the hooks per thread: creating a watcher unhooks whichever
 * one was active before. If the mouse hook cannot be installed the watcher reports the
 * move as finished, since reporting every drag as cancelled is worse.
 *
 * The backend's hook procedures forward into `dispatch_mouse_hook` and
 * `dispatch_key_hook`, which find the active watcher through a thread-local slot.
 */

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::messages::{HC_ACTION, VK_ESCAPE, WM_LBUTTONUP};
use crate::native::{
    HookHandle, HookKind, NativeWindow, SWP_HIDEWINDOW, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOREPOSITION, SWP_NOSIZE, SWP_NOZORDER,
};

trait HookTarget {
    fn on_mouse_up(&self);
    fn on_escape(&self);
    fn unhook(&self);
}

thread_local! {
    static ACTIVE_WATCHER: RefCell<Option<Rc<dyn HookTarget>>> = const { RefCell::new(None) };
}

struct WatcherState<W: NativeWindow> {
    native: Rc<W>,
    hide_on_escape: bool,
    got_mouse_up: Cell<bool>,
    mouse_hook: Cell<Option<HookHandle>>,
    key_hook: Cell<Option<HookHandle>>,
}

impl<W: NativeWindow> HookTarget for WatcherState<W> {
    fn on_mouse_up(&self) {
        self.got_mouse_up.set(true);
    }

    fn on_escape(&self) {
        self.native.set_transitions_disabled(true);
        if self.hide_on_escape && self.native.is_window() {
            log::debug!("MoveLoopWatcher: escape pressed, hiding window");
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

    fn unhook(&self) {
        if let Some(hook) = self.mouse_hook.take() {
            self.native.remove_input_hook(hook);
        }
        if let Some(hook) = self.key_hook.take() {
            self.native.remove_input_hook(hook);
        }
    }
}

pub struct MoveLoopWatcher<W: NativeWindow + 'static> {
    state: Rc<WatcherState<W>>,
}

impl<W: NativeWindow + 'static> MoveLoopWatcher<W> {
    pub fn new(native: Rc<W>, hide_on_escape: bool) -> Self {
        if let Some(previous) = ACTIVE_WATCHER.with(|slot| slot.borrow_mut().take()) {
            log::debug!("MoveLoopWatcher: preempting the active watcher");
            previous.unhook();
        }

        let state = Rc::new(WatcherState {
            native,
            hide_on_escape,
            got_mouse_up: Cell::new(false),
            mouse_hook: Cell::new(None),
            key_hook: Cell::new(None),
        });

        match state.native.install_input_hook(HookKind::Mouse) {
            Some(hook) => {
                state.mouse_hook.set(Some(hook));
                let target: Rc<dyn HookTarget> = state.clone();
                ACTIVE_WATCHER.with(|slot| *slot.borrow_mut() = Some(target));
                // The keyboard hook only adds Escape handling.
                state
                    .key_hook
                    .set(state.native.install_input_hook(HookKind::Keyboard));
            }
            None => {
                log::warn!("MoveLoopWatcher: mouse hook unavailable, assuming the move completes");
                state.got_mouse_up.set(true);
            }
        }
        Self { state }
    }

    pub fn got_mouse_up(&self) -> bool {
        self.state.got_mouse_up.get()
    }

    fn is_active(&self) -> bool {
        ACTIVE_WATCHER.with(|slot| {
            slot.borrow().as_ref().is_some_and(|active| {
                std::ptr::addr_eq(Rc::as_ptr(active), Rc::as_ptr(&self.state))
            })
        })
    }
}

impl<W: NativeWindow + 'static> Drop for MoveLoopWatcher<W> {
    fn drop(&mut self) {
        if self.is_active() {
            ACTIVE_WATCHER.with(|slot| slot.borrow_mut().take());
        }
        self.state.unhook();
    }
}

fn active_watcher() -> Option<Rc<dyn HookTarget>> {
    ACTIVE_WATCHER.with(|slot| slot.borrow().clone())
}

/// Mouse hook entry point. `wparam` is the mouse message identifier.
pub fn dispatch_mouse_hook(code: i32, wparam: usize) {
    if code == HC_ACTION && wparam == WM_LBUTTONUP as usize {
        if let Some(watcher) = active_watcher() {
            watcher.on_mouse_up();
        }
    }
}

/// Keyboard hook entry point. `wparam` is the virtual-key code.
pub fn dispatch_key_hook(code: i32, wparam: usize) {
    if code == HC_ACTION && wparam == VK_ESCAPE as usize {
        if let Some(watcher) = active_watcher() {
            watcher.on_escape();
        }
    }
}
