/*
 * Normalised input events handed to the `WindowDelegate`. Each one carries the native
 * message it was built from so the widget layer can still reach raw details when needed.
 */

use crate::messages::*;
use crate::types::Point;

/// Modifier and origin flags attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventFlags(u32);

impl EventFlags {
    pub const NONE: EventFlags = EventFlags(0);
    pub const SHIFT_DOWN: EventFlags = EventFlags(1 << 1);
    pub const CONTROL_DOWN: EventFlags = EventFlags(1 << 2);
    pub const ALT_DOWN: EventFlags = EventFlags(1 << 3);
    pub const FROM_TOUCH: EventFlags = EventFlags(1 << 16);

    pub fn contains(self, other: EventFlags) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for EventFlags {
    type Output = EventFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        EventFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The raw triple a normalised event was built from, plus the message time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeMessage {
    pub message: u32,
    pub wparam: usize,
    pub lparam: isize,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Pressed,
    Released,
    Moved,
    Exited,
    Wheel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub location: Point,
    pub flags: EventFlags,
    pub non_client: bool,
    pub native: NativeMessage,
}

impl MouseEvent {
    /*
     * Classifies a mouse-range message. Wheel messages carry their location in screen
     * coordinates and everything else in window coordinates, exactly as the message
     * delivered it.
     */
    pub fn from_native(native: NativeMessage, flags: EventFlags) -> Self {
        let kind = match native.message {
            WM_MOUSEMOVE | WM_NCMOUSEMOVE => MouseEventKind::Moved,
            WM_MOUSELEAVE | WM_NCMOUSELEAVE => MouseEventKind::Exited,
            WM_MOUSEWHEEL | WM_MOUSEHWHEEL => MouseEventKind::Wheel,
            WM_LBUTTONUP | WM_RBUTTONUP | WM_MBUTTONUP | WM_XBUTTONUP | WM_NCLBUTTONUP
            | WM_NCRBUTTONUP | WM_NCMBUTTONUP | WM_NCXBUTTONUP => MouseEventKind::Released,
            _ => MouseEventKind::Pressed,
        };
        let non_client = matches!(
            native.message,
            WM_NCMOUSEMOVE..=WM_NCXBUTTONDBLCLK | WM_NCMOUSELEAVE
        );
        Self {
            kind,
            location: point_from_lparam(native.lparam),
            flags,
            non_client,
            native,
        }
    }

    pub fn is_horizontal_wheel(&self) -> bool {
        self.native.message == WM_MOUSEHWHEEL
    }

    /// Signed wheel delta from the high word of wparam.
    pub fn wheel_delta(&self) -> i32 {
        hiword(self.native.wparam) as u16 as i16 as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key_code: u32,
    pub flags: EventFlags,
    pub is_system: bool,
    pub native: NativeMessage,
}

impl KeyEvent {
    pub fn from_native(native: NativeMessage, flags: EventFlags) -> Self {
        let kind = match native.message {
            WM_KEYUP | WM_SYSKEYUP => KeyEventKind::Released,
            _ => KeyEventKind::Pressed,
        };
        Self {
            kind,
            key_code: loword(native.wparam),
            flags,
            is_system: matches!(native.message, WM_SYSKEYDOWN | WM_SYSKEYUP),
            native,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEventKind {
    Pressed,
    Moved,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub kind: TouchEventKind,
    /// Client coordinates.
    pub location: Point,
    /// Generated id, the lowest one free when the contact went down.
    pub touch_id: u32,
    pub time_ms: u64,
    pub flags: EventFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    pub horizontal: bool,
    pub request: u32,
    pub native: NativeMessage,
}

impl ScrollEvent {
    pub fn from_native(native: NativeMessage) -> Self {
        Self {
            horizontal: native.message == WM_HSCROLL,
            request: loword(native.wparam),
            native,
        }
    }
}

/// A keyboard shortcut synthesized by the handler, such as Alt for the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accelerator {
    pub key_code: u32,
    pub modifiers: EventFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(message: u32, wparam: usize, lparam: isize) -> NativeMessage {
        NativeMessage {
            message,
            wparam,
            lparam,
            time: 0,
        }
    }

    #[test]
    fn mouse_event_classifies_non_client_release() {
        let event = MouseEvent::from_native(
            native(WM_NCLBUTTONUP, HTCAPTION as usize, make_lparam(40, 5)),
            EventFlags::NONE,
        );
        assert_eq!(event.kind, MouseEventKind::Released);
        assert!(event.non_client);
        assert_eq!(event.location, Point::new(40, 5));
    }

    #[test]
    fn wheel_delta_is_signed() {
        let wparam = ((-120i16 as u16 as usize) << 16) | MK_SHIFT;
        let event = MouseEvent::from_native(native(WM_MOUSEWHEEL, wparam, 0), EventFlags::NONE);
        assert_eq!(event.kind, MouseEventKind::Wheel);
        assert_eq!(event.wheel_delta(), -120);
        assert!(!event.is_horizontal_wheel());
    }

    #[test]
    fn flags_combine() {
        let flags = EventFlags::SHIFT_DOWN | EventFlags::FROM_TOUCH;
        assert!(flags.contains(EventFlags::FROM_TOUCH));
        assert!(!flags.contains(EventFlags::CONTROL_DOWN));
    }

    #[test]
    fn syskey_marks_system_key_event() {
        let event = KeyEvent::from_native(native(WM_SYSKEYUP, 0x12, 0), EventFlags::ALT_DOWN);
        assert_eq!(event.kind, KeyEventKind::Released);
        assert!(event.is_system);
        assert_eq!(event.key_code, 0x12);
    }
}
