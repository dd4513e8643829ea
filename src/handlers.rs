/*
 * Message families handled by `MessageHandler`, one `impl` block per file. Each file
 * owns the state transitions for its family; shared state lives on the handler itself.
 */

pub(crate) mod command_handler;
pub(crate) mod frame_handler;
pub(crate) mod mouse_handler;
pub(crate) mod touch_handler;
pub(crate) mod window_pos_handler;
