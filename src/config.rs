/*
 * Tunable policy for a `MessageHandler`. The timing thresholds were tuned empirically
 * against real touch hardware and drivers, so they are exposed here instead of being
 * baked into the protocol code.
 */

use crate::error::{PlatformError, Result as PlatformResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// A mouse message arriving this soon after the last touch message, at the cursor
    /// position, is treated as synthesized from touch.
    pub touch_synthesis_window_ms: u32,
    /// How long a touch press suppresses mouse activation of the window.
    pub touch_down_context_timeout_ms: u32,
    /// Inset applied per screen edge that carries an auto-hide appbar.
    pub autohide_taskbar_thickness_px: i32,
    pub force_redraw_attempts: u32,
    pub force_redraw_retry_delay_ms: u32,
    /// Strip the caption and let the widget layer draw the entire frame.
    pub remove_standard_frame: bool,
    /// Add hidden scroll styles to top-level windows so legacy trackpad drivers emit
    /// scroll messages.
    pub use_scroll_style_shim: bool,
    pub register_touch: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            touch_synthesis_window_ms: 500,
            touch_down_context_timeout_ms: 500,
            autohide_taskbar_thickness_px: 2,
            force_redraw_attempts: 10,
            force_redraw_retry_delay_ms: 500,
            remove_standard_frame: false,
            use_scroll_style_shim: false,
            register_touch: true,
        }
    }
}

impl HandlerConfig {
    pub fn with_touch_synthesis_window_ms(mut self, ms: u32) -> Self {
        self.touch_synthesis_window_ms = ms;
        self
    }

    pub fn with_touch_down_context_timeout_ms(mut self, ms: u32) -> Self {
        self.touch_down_context_timeout_ms = ms;
        self
    }

    pub fn with_autohide_taskbar_thickness_px(mut self, px: i32) -> Self {
        self.autohide_taskbar_thickness_px = px;
        self
    }

    pub fn with_force_redraw(mut self, attempts: u32, retry_delay_ms: u32) -> Self {
        self.force_redraw_attempts = attempts;
        self.force_redraw_retry_delay_ms = retry_delay_ms;
        self
    }

    pub fn with_remove_standard_frame(mut self, remove: bool) -> Self {
        self.remove_standard_frame = remove;
        self
    }

    pub fn with_scroll_style_shim(mut self, enabled: bool) -> Self {
        self.use_scroll_style_shim = enabled;
        self
    }

    pub fn with_register_touch(mut self, register: bool) -> Self {
        self.register_touch = register;
        self
    }

    /*
     * Rejects values that would make the handler misbehave: a zero time window would
     * never classify anything, a zero attempt count would never redraw after unlock.
     */
    pub fn validate(&self) -> PlatformResult<()> {
        if self.touch_synthesis_window_ms == 0 {
            return Err(PlatformError::InvalidConfig(
                "touch_synthesis_window_ms must be greater than zero".into(),
            ));
        }
        if self.touch_down_context_timeout_ms == 0 {
            return Err(PlatformError::InvalidConfig(
                "touch_down_context_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.autohide_taskbar_thickness_px < 0 {
            return Err(PlatformError::InvalidConfig(format!(
                "autohide_taskbar_thickness_px must not be negative, got {}",
                self.autohide_taskbar_thickness_px
            )));
        }
        if self.force_redraw_attempts == 0 {
            return Err(PlatformError::InvalidConfig(
                "force_redraw_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
