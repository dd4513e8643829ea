/*
 * Public entry point of the hwnd_host crate: a per-window layer that turns the native
 * Win32 message stream of one window into normalised calls on a widget delegate.
 *
 * The protocol core (`MessageHandler` and its handlers) is portable and speaks to the
 * operating system only through the `NativeWindow` trait, so it builds and is tested on
 * every platform against a scripted fake. The Win32 backend that owns real window
 * handles, the window class and the window procedure is compiled on Windows only.
 */
pub mod config;
pub mod delegate;
pub mod error;
pub mod events;
pub(crate) mod handlers;
pub(crate) mod liveness;
pub mod message_handler;
pub mod messages;
pub(crate) mod monitor;
pub mod move_loop;
pub mod native;
pub(crate) mod redraw_lock;
pub(crate) mod task_queue;
pub mod touch;
pub mod types;
#[cfg(target_os = "windows")]
pub mod win32;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::HandlerConfig;
pub use delegate::{AppbarQuery, WindowDelegate};
pub use error::{PlatformError, Result as PlatformResult};
pub use events::{
    Accelerator, EventFlags, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind, NativeMessage,
    ScrollEvent, TouchEvent, TouchEventKind,
};
pub use message_handler::MessageHandler;
pub use native::NativeWindow;
pub use types::{
    AutohideEdges, Insets, MenuHandle, ModalType, MonitorId, MonitorInfo, Point, Rect, Region,
    Size, WindowHandle,
};
#[cfg(target_os = "windows")]
pub use win32::{Win32Window, WindowParams, create_window, register_window_class};
