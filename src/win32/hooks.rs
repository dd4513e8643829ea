/*
 * Thread-local mouse and keyboard hooks used while an interactive move loop runs. The hook
 * procedures forward to `move_loop`, which routes to whichever watcher is active.
 */

use std::ffi::c_void;

use windows::Win32::{
    Foundation::{LPARAM, LRESULT, WPARAM},
    UI::WindowsAndMessaging::{
        CallNextHookEx, HHOOK, SetWindowsHookExW, UnhookWindowsHookEx, WH_KEYBOARD, WH_MOUSE,
    },
};

use crate::move_loop::{dispatch_key_hook, dispatch_mouse_hook};
use crate::native::{HookHandle, HookKind};

unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    dispatch_mouse_hook(code, wparam.0);
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

unsafe extern "system" fn key_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    dispatch_key_hook(code, wparam.0);
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

pub(crate) fn install(kind: HookKind, thread_id: u32) -> Option<HookHandle> {
    let installed = match kind {
        HookKind::Mouse => unsafe {
            SetWindowsHookExW(WH_MOUSE, Some(mouse_hook_proc), None, thread_id)
        },
        HookKind::Keyboard => unsafe {
            SetWindowsHookExW(WH_KEYBOARD, Some(key_hook_proc), None, thread_id)
        },
    };
    match installed {
        Ok(hook) => Some(HookHandle(hook.0 as isize)),
        Err(err) => {
            log::warn!("Platform: SetWindowsHookExW({kind:?}) failed: {err:?}");
            None
        }
    }
}

pub(crate) fn remove(hook: HookHandle) {
    if let Err(err) = unsafe { UnhookWindowsHookEx(HHOOK(hook.0 as *mut c_void)) } {
        log::debug!("Platform: UnhookWindowsHookEx failed: {err:?}");
    }
}
