/*
 * Window class registration, window creation and the window procedure router.
 *
 * The handler is built before `CreateWindowExW` so it sees the creation messages. A boxed
 * `WindowContext` holding a weak reference to it travels through `lpCreateParams`, is
 * stored in `GWLP_USERDATA` on `WM_NCCREATE` and freed on `WM_NCDESTROY` (or earlier, if
 * the handler is dropped first). The router also pumps the handler's deferred task queue
 * when woken by `WM_APP_RUN_DEFERRED` or the deferred-task timer.
 */

use std::ffi::c_void;
use std::rc::{Rc, Weak};

use windows::Win32::{
    Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
    System::LibraryLoader::GetModuleHandleW,
    UI::WindowsAndMessaging::*,
};
use windows::core::{HSTRING, PCWSTR};

use crate::config::HandlerConfig;
use crate::delegate::WindowDelegate;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::message_handler::MessageHandler;
use crate::native::NativeWindow;
use crate::types::{Rect, WindowHandle};

use super::window::Win32Window;

/// Class name used when the host does not register its own.
pub const DEFAULT_WINDOW_CLASS: &str = "HwndHostWindow";

pub(crate) const WM_APP_RUN_DEFERRED: u32 = WM_APP + 0x200;
pub(crate) const DEFERRED_TASK_TIMER_ID: usize = 0x4857_4E44;

pub(crate) struct WindowContext {
    handler: Weak<MessageHandler<Win32Window>>,
}

/// What `create_window` passes to `CreateWindowExW`.
#[derive(Debug, Clone)]
pub struct WindowParams {
    pub class_name: String,
    pub title: String,
    pub style: u32,
    pub ex_style: u32,
    /// Initial bounds in screen coordinates (parent client coordinates for children).
    pub bounds: Rect,
    pub parent: Option<WindowHandle>,
}

impl WindowParams {
    pub fn new(title: &str, style: u32, bounds: Rect) -> Self {
        Self {
            class_name: DEFAULT_WINDOW_CLASS.to_string(),
            title: title.to_string(),
            style,
            ex_style: 0,
            bounds,
            parent: None,
        }
    }
}

fn module_instance() -> PlatformResult<HINSTANCE> {
    let module = unsafe { GetModuleHandleW(PCWSTR::null()) }?;
    Ok(module.into())
}

/*
 * Registers `class_name` with the router as its window procedure. Registering a class
 * that already exists is not an error.
 */
pub fn register_window_class(class_name: &str) -> PlatformResult<()> {
    let instance = module_instance()?;
    let class_name_hstring = HSTRING::from(class_name);
    let class_name_pcwstr = PCWSTR(class_name_hstring.as_ptr());

    unsafe {
        let mut existing = WNDCLASSEXW::default();
        if GetClassInfoExW(Some(instance), class_name_pcwstr, &mut existing).is_ok() {
            log::debug!("Platform: Window class '{class_name}' already registered.");
            return Ok(());
        }

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            // No background brush: WM_ERASEBKGND is swallowed to avoid resize flicker.
            style: CS_DBLCLKS,
            lpfnWndProc: Some(window_proc_router),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: instance,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            lpszClassName: class_name_pcwstr,
            ..Default::default()
        };

        if RegisterClassExW(&wc) == 0 {
            let error = GetLastError();
            log::error!("Platform: RegisterClassExW failed: {error:?}");
            Err(PlatformError::InitializationFailed(format!(
                "RegisterClassExW failed: {error:?}"
            )))
        } else {
            log::debug!("Platform: Window class '{class_name}' registered successfully.");
            Ok(())
        }
    }
}

/*
 * Creates the native window and the handler driving it. The returned `Rc` owns the
 * handler; dropping it detaches the window procedure, which then falls back to default
 * processing. `delegate` is held weakly.
 */
pub fn create_window<D: WindowDelegate + 'static>(
    params: &WindowParams,
    config: HandlerConfig,
    delegate: &Rc<D>,
) -> PlatformResult<Rc<MessageHandler<Win32Window>>> {
    let native = Rc::new(Win32Window::new());
    let handler = MessageHandler::new(Rc::clone(&native), config)?;
    handler.set_delegate(delegate);
    handler.init(params.bounds);

    let instance = module_instance()?;
    let context = Box::into_raw(Box::new(WindowContext {
        handler: Rc::downgrade(&handler),
    }));
    let bounds = params.bounds;
    let parent = params.parent.map(|p| HWND(p.0 as *mut c_void));

    let created = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(params.ex_style),
            &HSTRING::from(params.class_name.as_str()),
            &HSTRING::from(params.title.as_str()),
            WINDOW_STYLE(params.style),
            bounds.left,
            bounds.top,
            bounds.width(),
            bounds.height(),
            parent,
            None,
            Some(instance),
            Some(context as *mut c_void),
        )
    };

    let hwnd = match created {
        Ok(hwnd) => hwnd,
        Err(err) => {
            // Once WM_NCCREATE has run, WM_NCDESTROY owns the context.
            if !native.was_attached() {
                drop(unsafe { Box::from_raw(context) });
            }
            log::error!("Platform: CreateWindowExW failed: {err:?}");
            return Err(PlatformError::InitializationFailed(format!(
                "CreateWindowExW failed: {err:?}"
            )));
        }
    };
    log::debug!("Platform: created window {hwnd:?} for '{}'", params.title);

    // Tasks posted before the handle was attached could not wake the loop.
    if let Some(deadline) = handler.next_task_deadline() {
        let delay = deadline.saturating_sub(native.tick_count());
        native.request_deferred_pump(delay.min(u64::from(u32::MAX)) as u32);
    }
    Ok(handler)
}

/// Detaches the context from `hwnd`; the router stops dispatching to its handler.
pub(crate) fn take_window_context(hwnd: HWND) -> Option<Box<WindowContext>> {
    let context = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *mut WindowContext;
    if context.is_null() {
        return None;
    }
    unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
    Some(unsafe { Box::from_raw(context) })
}

unsafe extern "system" fn window_proc_router(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context = if msg == WM_NCCREATE {
        let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
        let context = create_struct.lpCreateParams as *mut WindowContext;
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, context as isize) };
        context
    } else {
        unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowContext }
    };

    if context.is_null() {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }
    // No reference into the context outlives this line: dispatch may free it.
    let Some(handler) = (unsafe { (*context).handler.upgrade() }) else {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    };

    match msg {
        WM_NCCREATE => handler.native().attach(hwnd),
        WM_APP_RUN_DEFERRED => {
            handler.run_deferred_tasks();
            return LRESULT(0);
        }
        WM_TIMER if wparam.0 == DEFERRED_TASK_TIMER_ID => {
            handler.native().disarm_deferred_timer();
            handler.run_deferred_tasks();
            return LRESULT(0);
        }
        _ => {}
    }

    let result = handler.dispatch(msg, wparam.0, lparam.0);

    if msg == WM_NCDESTROY {
        log::debug!("Platform: WM_NCDESTROY for {hwnd:?}, releasing window context.");
        drop(take_window_context(hwnd));
        handler.native().detach();
    }
    LRESULT(result)
}
