/*
 * Prevents a window from repainting while default processing of certain messages runs.
 *
 * The default procedure for WM_SETTEXT, WM_SETICON, WM_NCLBUTTONDOWN, WM_NCACTIVATE and
 * the system-menu item updates paints pieces of the standard frame directly over a custom
 * one. Clearing WS_VISIBLE for the duration of the call suppresses that painting without
 * hiding the window. Locks nest; the style only changes on the outermost acquire and the
 * matching release. With desktop composition active the lock is skipped unless forced,
 * since the compositor already hides the artifacts and toggling the style can race with
 * child-window presentation.
 */

use std::cell::Cell;

use crate::native::{NativeWindow, WS_CAPTION, WS_VISIBLE};

#[derive(Debug, Default)]
pub struct RedrawLock {
    count: Cell<i32>,
}

impl RedrawLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> i32 {
        self.count.get()
    }

    pub fn lock_updates<W: NativeWindow + ?Sized>(&self, native: &W, force: bool) {
        if !(force || !native.is_composition_enabled()) {
            return;
        }
        let count = self.count.get() + 1;
        self.count.set(count);
        if count == 1 {
            log::trace!("RedrawLock: hiding window for locked update");
            native.set_style(native.style() & !WS_VISIBLE);
        }
    }

    pub fn unlock_updates<W: NativeWindow + ?Sized>(&self, native: &W, force: bool) {
        if !(force || !native.is_composition_enabled()) {
            return;
        }
        let count = self.count.get() - 1;
        if count <= 0 {
            native.set_style(native.style() | WS_VISIBLE);
            self.count.set(0);
            log::trace!("RedrawLock: window visibility restored");
        } else {
            self.count.set(count);
        }
    }
}

/*
 * Holds a `RedrawLock` for the current scope. The lock is only taken when the window
 * was visible on entry; windows without a caption force the lock regardless of
 * composition. On drop the lock is released unless the unlock was cancelled or the
 * window is gone.
 */
pub struct ScopedRedrawLock<'a, W: NativeWindow + ?Sized> {
    lock: &'a RedrawLock,
    native: &'a W,
    was_visible: bool,
    force: bool,
    cancel_unlock: Cell<bool>,
}

impl<'a, W: NativeWindow + ?Sized> ScopedRedrawLock<'a, W> {
    pub fn new(lock: &'a RedrawLock, native: &'a W) -> Self {
        let was_visible = native.is_visible();
        let force = native.style() & WS_CAPTION == 0;
        if was_visible && native.is_window() {
            lock.lock_updates(native, force);
        }
        Self {
            lock,
            native,
            was_visible,
            force,
            cancel_unlock: Cell::new(false),
        }
    }

    /// Call when the owner was destroyed while the lock was held.
    pub fn cancel_unlock_operation(&self) {
        self.cancel_unlock.set(true);
    }
}

impl<W: NativeWindow + ?Sized> Drop for ScopedRedrawLock<'_, W> {
    fn drop(&mut self) {
        if !self.cancel_unlock.get() && self.was_visible && self.native.is_window() {
            self.lock.unlock_updates(self.native, self.force);
        }
    }
}
