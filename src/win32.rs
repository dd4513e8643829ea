/*
 * Win32 backend: the real `NativeWindow`, the window class and window procedure, and the
 * thread hooks used by interactive move loops. Compiled on Windows only.
 */

mod hooks;
mod window;
mod window_proc;

pub use window::Win32Window;
pub use window_proc::{DEFAULT_WINDOW_CLASS, WindowParams, create_window, register_window_class};
