/*
 * Menus, system commands and application commands, plus the window operations that go
 * through the system menu: maximize, minimize, restore and the interactive move loop.
 */

use std::rc::Rc;

use crate::events::{Accelerator, EventFlags};
use crate::message_handler::MessageHandler;
use crate::messages::*;
use crate::move_loop::MoveLoopWatcher;
use crate::native::{NativeWindow, WS_VISIBLE};
use crate::redraw_lock::ScopedRedrawLock;
use crate::types::{MenuHandle, Point, WindowHandle};

// Low bits of WM_SYSCOMMAND(SC_MOVE) selecting the mouse-driven variant.
const SC_MOVE_BY_MOUSE: usize = 0x0002;
const FAPPCOMMAND_MASK: u32 = 0xF000;

impl<W: NativeWindow + 'static> MessageHandler<W> {
    pub(crate) fn process_command_message(
        &self,
        message: u32,
        wparam: usize,
        lparam: isize,
    ) -> Option<isize> {
        match message {
            WM_ENTERMENULOOP => {
                let depth = self.flags.menu_depth.get();
                self.flags.menu_depth.set(depth + 1);
                if depth == 0 {
                    self.notify(|d| d.handle_menu_loop(true));
                }
                Some(0)
            }
            WM_EXITMENULOOP => {
                let depth = self.flags.menu_depth.get();
                // Saturates at zero: an unmatched exit must not make the next enter look nested.
                if depth == 0 {
                    log::warn!("MessageHandler: menu loop exit without matching enter");
                    return Some(0);
                }
                self.flags.menu_depth.set(depth - 1);
                if depth == 1 {
                    self.notify(|d| d.handle_menu_loop(false));
                }
                Some(0)
            }
            WM_INITMENU => {
                self.on_init_menu(MenuHandle(wparam as isize));
                Some(0)
            }
            WM_SYSCOMMAND => {
                self.on_sys_command(wparam, lparam);
                Some(0)
            }
            WM_APPCOMMAND => {
                let command = (hiword(lparam as usize) & !FAPPCOMMAND_MASK) as i16 as i32;
                // Answering FALSE for a handled command makes the system run it again,
                // e.g. navigating back two pages instead of one.
                self.query(false, |d| d.handle_app_command(command))
                    .then_some(1)
            }
            WM_COMMAND => {
                // Notification codes above 1 come from controls.
                let notification_code = hiword(wparam);
                let command = loword(wparam) as i32;
                if notification_code > 1 || self.query(false, |d| d.handle_app_command(command)) {
                    None
                } else {
                    Some(0)
                }
            }
            _ => None,
        }
    }

    /*
     * Brings the system menu items in line with the window state right before the menu
     * opens. Updating menu items repaints the native caption, hence the redraw lock.
     */
    fn on_init_menu(&self, menu: MenuHandle) {
        let is_fullscreen = self.fullscreen.get();
        let is_minimized = self.native.is_minimized();
        let is_maximized = self.native.is_maximized();
        let is_restored = !is_fullscreen && !is_minimized && !is_maximized;
        let (can_resize, can_maximize, can_minimize) = self.query((true, true, true), |d| {
            (d.can_resize(), d.can_maximize(), d.can_minimize())
        });

        let _lock = ScopedRedrawLock::new(&self.redraw_lock, self.native.as_ref());
        let native = &self.native;
        native.enable_menu_item(menu, SC_RESTORE, can_resize && (is_minimized || is_maximized));
        native.enable_menu_item(menu, SC_MOVE, is_restored);
        native.enable_menu_item(menu, SC_SIZE, can_resize && is_restored);
        native.enable_menu_item(
            menu,
            SC_MAXIMIZE,
            can_maximize && !is_fullscreen && !is_maximized,
        );
        native.enable_menu_item(menu, SC_MINIMIZE, can_minimize && !is_minimized);

        if is_maximized && can_resize {
            native.set_menu_default_item(menu, SC_RESTORE);
        } else if !is_maximized && can_maximize {
            native.set_menu_default_item(menu, SC_MAXIMIZE);
        }
    }

    fn on_sys_command(&self, code: usize, lparam: isize) {
        if !self.query(true, |d| d.should_handle_system_commands()) {
            return;
        }
        let command = code & SC_MASK;

        if self.fullscreen.get() && matches!(command, SC_SIZE | SC_MOVE | SC_MAXIMIZE) {
            log::debug!("MessageHandler: system command {command:#x} ignored in fullscreen");
            return;
        }
        if self.is_using_custom_frame() {
            match command {
                SC_MINIMIZE | SC_MAXIMIZE | SC_RESTORE => {
                    self.notify(|d| d.reset_window_controls())
                }
                SC_MOVE | SC_SIZE if !self.native.is_visible() => {
                    // Bypasses any redraw lock so the move or size loop paints live.
                    self.native.set_style(self.native.style() | WS_VISIBLE);
                }
                _ => {}
            }
        }

        // Alt pressed and released on its own focuses the menu bar. Shift and control
        // are carried so Alt+Shift input language switching is not swallowed.
        if command == SC_KEYMENU && get_x_lparam(lparam) == 0 {
            let pressed = self.native.key_modifiers();
            let mut modifiers = EventFlags::NONE;
            if pressed.contains(EventFlags::SHIFT_DOWN) {
                modifiers |= EventFlags::SHIFT_DOWN;
            }
            if pressed.contains(EventFlags::CONTROL_DOWN) {
                modifiers |= EventFlags::CONTROL_DOWN;
            }
            let accelerator = Accelerator {
                key_code: VK_MENU,
                modifiers,
            };
            self.notify(|d| d.handle_accelerator(&accelerator));
            return;
        }

        if self.query(false, |d| d.handle_command(code)) {
            return;
        }
        if command == SC_SIZE {
            self.flags.in_size_loop.set(true);
        }
        let token = self.lifetime.token();
        // SC_SIZE and SC_MOVE run a modal loop inside default processing.
        self.native.def_window_proc(WM_SYSCOMMAND, code, lparam);
        if !token.is_alive() {
            return;
        }
        self.flags.in_size_loop.set(false);
    }

    /// Runs `command` as if it had been picked from the system menu. Zero is ignored.
    pub fn execute_system_menu_command(&self, command: usize) {
        if command != 0 {
            self.native.send_message(WM_SYSCOMMAND, command, 0);
        }
    }

    pub fn maximize(&self) {
        self.execute_system_menu_command(SC_MAXIMIZE);
    }

    pub fn minimize(&self) {
        self.execute_system_menu_command(SC_MINIMIZE);
        self.notify(|d| d.handle_native_blur(WindowHandle::NULL));
    }

    pub fn restore(&self) {
        self.execute_system_menu_command(SC_RESTORE);
    }

    /*
     * Lets the user drag the window until the mouse button is released and reports
     * whether the move completed. Windows does not say whether a move was cancelled, so
     * a left-button release counts as completion.
     */
    pub fn run_move_loop(&self, drag_offset: Point, hide_on_escape: bool) -> bool {
        log::debug!("MessageHandler: entering move loop, drag offset {drag_offset:?}");
        self.native.release_capture();
        let watcher = MoveLoopWatcher::new(Rc::clone(&self.native), hide_on_escape);
        self.native.send_message(
            WM_SYSCOMMAND,
            SC_MOVE | SC_MOVE_BY_MOUSE,
            lparam_from_point(self.native.message_pos()),
        );
        let completed = watcher.got_mouse_up();
        log::debug!("MessageHandler: move loop finished, completed: {completed}");
        completed
    }

    pub fn end_move_loop(&self) {
        self.native.send_message(WM_CANCELMODE, 0, 0);
    }
}
