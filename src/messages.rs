/*
 * Native message identifiers and parameter encodings. These values are a fixed external
 * protocol and must match the Win32 headers exactly; windows-rs does not export several
 * of them (the UAH drawing messages, WM_NCMOUSELEAVE, WM_MOUSEHWHEEL) so all of them are
 * declared here once and shared by the portable core and the Win32 backend.
 */

pub const WM_CREATE: u32 = 0x0001;
pub const WM_DESTROY: u32 = 0x0002;
pub const WM_MOVE: u32 = 0x0003;
pub const WM_SIZE: u32 = 0x0005;
pub const WM_ACTIVATE: u32 = 0x0006;
pub const WM_SETFOCUS: u32 = 0x0007;
pub const WM_KILLFOCUS: u32 = 0x0008;
pub const WM_SETTEXT: u32 = 0x000C;
pub const WM_PAINT: u32 = 0x000F;
pub const WM_CLOSE: u32 = 0x0010;
pub const WM_ERASEBKGND: u32 = 0x0014;
pub const WM_SETTINGCHANGE: u32 = 0x001A;
pub const WM_ACTIVATEAPP: u32 = 0x001C;
pub const WM_CANCELMODE: u32 = 0x001F;
pub const WM_SETCURSOR: u32 = 0x0020;
pub const WM_MOUSEACTIVATE: u32 = 0x0021;
pub const WM_GETMINMAXINFO: u32 = 0x0024;
pub const WM_WINDOWPOSCHANGING: u32 = 0x0046;
pub const WM_WINDOWPOSCHANGED: u32 = 0x0047;
pub const WM_NOTIFY: u32 = 0x004E;
pub const WM_INPUTLANGCHANGE: u32 = 0x0051;
pub const WM_DISPLAYCHANGE: u32 = 0x007E;
pub const WM_SETICON: u32 = 0x0080;
pub const WM_NCDESTROY: u32 = 0x0082;
pub const WM_NCCALCSIZE: u32 = 0x0083;
pub const WM_NCHITTEST: u32 = 0x0084;
pub const WM_NCPAINT: u32 = 0x0085;
pub const WM_NCACTIVATE: u32 = 0x0086;
pub const WM_NCMOUSEMOVE: u32 = 0x00A0;
pub const WM_NCLBUTTONDOWN: u32 = 0x00A1;
pub const WM_NCLBUTTONUP: u32 = 0x00A2;
pub const WM_NCLBUTTONDBLCLK: u32 = 0x00A3;
pub const WM_NCRBUTTONDOWN: u32 = 0x00A4;
pub const WM_NCRBUTTONUP: u32 = 0x00A5;
pub const WM_NCRBUTTONDBLCLK: u32 = 0x00A6;
pub const WM_NCMBUTTONDOWN: u32 = 0x00A7;
pub const WM_NCMBUTTONUP: u32 = 0x00A8;
pub const WM_NCMBUTTONDBLCLK: u32 = 0x00A9;
pub const WM_NCXBUTTONDOWN: u32 = 0x00AB;
pub const WM_NCXBUTTONUP: u32 = 0x00AC;
pub const WM_NCXBUTTONDBLCLK: u32 = 0x00AD;
// Undocumented "unadorned" caption and frame drawing messages.
pub const WM_NCUAHDRAWCAPTION: u32 = 0x00AE;
pub const WM_NCUAHDRAWFRAME: u32 = 0x00AF;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_CHAR: u32 = 0x0102;
pub const WM_DEADCHAR: u32 = 0x0103;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_SYSCHAR: u32 = 0x0106;
pub const WM_SYSDEADCHAR: u32 = 0x0107;
pub const WM_IME_STARTCOMPOSITION: u32 = 0x010D;
pub const WM_IME_ENDCOMPOSITION: u32 = 0x010E;
pub const WM_IME_COMPOSITION: u32 = 0x010F;
pub const WM_COMMAND: u32 = 0x0111;
pub const WM_SYSCOMMAND: u32 = 0x0112;
pub const WM_HSCROLL: u32 = 0x0114;
pub const WM_VSCROLL: u32 = 0x0115;
pub const WM_INITMENU: u32 = 0x0116;
pub const WM_CHANGEUISTATE: u32 = 0x0127;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_LBUTTONDBLCLK: u32 = 0x0203;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_RBUTTONDBLCLK: u32 = 0x0206;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_MBUTTONDBLCLK: u32 = 0x0209;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
pub const WM_XBUTTONDOWN: u32 = 0x020B;
pub const WM_XBUTTONUP: u32 = 0x020C;
pub const WM_XBUTTONDBLCLK: u32 = 0x020D;
pub const WM_MOUSEHWHEEL: u32 = 0x020E;
pub const WM_ENTERMENULOOP: u32 = 0x0211;
pub const WM_EXITMENULOOP: u32 = 0x0212;
pub const WM_CAPTURECHANGED: u32 = 0x0215;
pub const WM_MOVING: u32 = 0x0216;
pub const WM_ENTERSIZEMOVE: u32 = 0x0231;
pub const WM_EXITSIZEMOVE: u32 = 0x0232;
pub const WM_TOUCH: u32 = 0x0240;
pub const WM_IME_SETCONTEXT: u32 = 0x0281;
pub const WM_IME_NOTIFY: u32 = 0x0282;
pub const WM_IME_REQUEST: u32 = 0x0288;
pub const WM_NCMOUSELEAVE: u32 = 0x02A2;
pub const WM_MOUSELEAVE: u32 = 0x02A3;
pub const WM_APPCOMMAND: u32 = 0x0319;
pub const WM_THEMECHANGED: u32 = 0x031A;
pub const WM_DWMCOMPOSITIONCHANGED: u32 = 0x031E;
pub const WM_APP: u32 = 0x8000;

// Hit-test codes returned from WM_NCHITTEST.
pub const HTERROR: isize = -2;
pub const HTTRANSPARENT: isize = -1;
pub const HTNOWHERE: isize = 0;
pub const HTCLIENT: isize = 1;
pub const HTCAPTION: isize = 2;
pub const HTSYSMENU: isize = 3;
pub const HTSIZE: isize = 4;
pub const HTMENU: isize = 5;
pub const HTHSCROLL: isize = 6;
pub const HTVSCROLL: isize = 7;
pub const HTMINBUTTON: isize = 8;
pub const HTMAXBUTTON: isize = 9;
pub const HTLEFT: isize = 10;
pub const HTRIGHT: isize = 11;
pub const HTTOP: isize = 12;
pub const HTTOPLEFT: isize = 13;
pub const HTTOPRIGHT: isize = 14;
pub const HTBOTTOM: isize = 15;
pub const HTBOTTOMLEFT: isize = 16;
pub const HTBOTTOMRIGHT: isize = 17;
pub const HTBORDER: isize = 18;
pub const HTCLOSE: isize = 20;
pub const HTHELP: isize = 21;

// WM_SYSCOMMAND codes. The low four bits carry type-specific data.
pub const SC_MASK: usize = 0xFFF0;
pub const SC_SIZE: usize = 0xF000;
pub const SC_MOVE: usize = 0xF010;
pub const SC_MINIMIZE: usize = 0xF020;
pub const SC_MAXIMIZE: usize = 0xF030;
pub const SC_CLOSE: usize = 0xF060;
pub const SC_KEYMENU: usize = 0xF100;
pub const SC_RESTORE: usize = 0xF120;

// WM_MOUSEACTIVATE answers.
pub const MA_ACTIVATE: isize = 1;
pub const MA_ACTIVATEANDEAT: isize = 2;
pub const MA_NOACTIVATE: isize = 3;
pub const MA_NOACTIVATEANDEAT: isize = 4;

pub const WA_INACTIVE: u32 = 0;
pub const SPI_SETWORKAREA: usize = 0x002F;
pub const WVR_REDRAW: isize = 0x0300;

pub const TOUCHEVENTF_MOVE: u32 = 0x0001;
pub const TOUCHEVENTF_DOWN: u32 = 0x0002;
pub const TOUCHEVENTF_UP: u32 = 0x0004;

pub const MK_SHIFT: usize = 0x0004;
pub const MK_CONTROL: usize = 0x0008;

pub const VK_MENU: u32 = 0x12;
pub const VK_ESCAPE: u32 = 0x1B;

pub const HC_ACTION: i32 = 0;

pub const UIS_CLEAR: usize = 2;
pub const UISF_HIDEFOCUS: usize = 0x1;

// Signature Windows stamps into the extra info of mouse messages it synthesizes from
// touch or pen input.
pub const MOUSEEVENTF_FROMTOUCH_SIGNATURE: usize = 0xFF51_5700;
pub const MOUSEEVENTF_FROMTOUCH_MASK: usize = 0xFFFF_FF00;

#[inline]
pub fn loword(value: usize) -> u32 {
    (value & 0xFFFF) as u32
}

#[inline]
pub fn hiword(value: usize) -> u32 {
    ((value >> 16) & 0xFFFF) as u32
}

/// Signed x coordinate packed into the low word of an lparam.
#[inline]
pub fn get_x_lparam(lparam: isize) -> i32 {
    (lparam & 0xFFFF) as u16 as i16 as i32
}

/// Signed y coordinate packed into the high word of an lparam.
#[inline]
pub fn get_y_lparam(lparam: isize) -> i32 {
    ((lparam >> 16) & 0xFFFF) as u16 as i16 as i32
}

#[inline]
pub fn point_from_lparam(lparam: isize) -> crate::types::Point {
    crate::types::Point::new(get_x_lparam(lparam), get_y_lparam(lparam))
}

#[inline]
pub fn make_lparam(low: i32, high: i32) -> isize {
    (((high as u16 as u32) << 16) | (low as u16 as u32)) as i32 as isize
}

#[inline]
pub fn lparam_from_point(point: crate::types::Point) -> isize {
    make_lparam(point.x, point.y)
}

/// Whether the extra info attached to a mouse message marks it as synthesized from touch.
pub fn is_mouse_event_from_touch(extra_info: usize) -> bool {
    extra_info & MOUSEEVENTF_FROMTOUCH_MASK == MOUSEEVENTF_FROMTOUCH_SIGNATURE
}

/*
 * Coarse routing category of a message. The dispatch table in `MessageHandler` maps a
 * message to its specialised handler through this classification; messages with no
 * dedicated handler fall into `Other` and receive default processing.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    Mouse,
    Keyboard,
    Ime,
    Touch,
    Scroll,
    NonClient,
    Lifecycle,
    Activation,
    Geometry,
    Menu,
    Other,
}

pub fn categorize(message: u32) -> MessageCategory {
    match message {
        WM_MOUSEMOVE..=WM_MOUSEHWHEEL
        | WM_NCMOUSEMOVE..=WM_NCMBUTTONDBLCLK
        | WM_NCXBUTTONDOWN..=WM_NCXBUTTONDBLCLK
        | WM_MOUSELEAVE
        | WM_NCMOUSELEAVE => MessageCategory::Mouse,
        WM_KEYDOWN | WM_KEYUP | WM_SYSKEYDOWN | WM_SYSKEYUP => MessageCategory::Keyboard,
        WM_CHAR | WM_SYSCHAR | WM_DEADCHAR | WM_SYSDEADCHAR | WM_IME_STARTCOMPOSITION
        | WM_IME_ENDCOMPOSITION | WM_IME_COMPOSITION | WM_IME_SETCONTEXT | WM_IME_NOTIFY
        | WM_IME_REQUEST => MessageCategory::Ime,
        WM_TOUCH => MessageCategory::Touch,
        WM_HSCROLL | WM_VSCROLL => MessageCategory::Scroll,
        WM_NCHITTEST | WM_NCCALCSIZE | WM_NCPAINT | WM_NCACTIVATE | WM_NCUAHDRAWCAPTION
        | WM_NCUAHDRAWFRAME | WM_DWMCOMPOSITIONCHANGED => MessageCategory::NonClient,
        WM_CREATE | WM_DESTROY | WM_NCDESTROY | WM_CLOSE => MessageCategory::Lifecycle,
        WM_ACTIVATEAPP | WM_MOUSEACTIVATE | WM_SETFOCUS | WM_KILLFOCUS => {
            MessageCategory::Activation
        }
        WM_MOVE | WM_MOVING | WM_SIZE | WM_WINDOWPOSCHANGING | WM_WINDOWPOSCHANGED
        | WM_GETMINMAXINFO | WM_ENTERSIZEMOVE | WM_EXITSIZEMOVE | WM_SETTINGCHANGE
        | WM_DISPLAYCHANGE => MessageCategory::Geometry,
        WM_ENTERMENULOOP | WM_EXITMENULOOP | WM_INITMENU | WM_SYSCOMMAND | WM_COMMAND
        | WM_APPCOMMAND => MessageCategory::Menu,
        _ => MessageCategory::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn lparam_coordinates_are_sign_extended() {
        let lparam = make_lparam(-5, 300);
        assert_eq!(get_x_lparam(lparam), -5);
        assert_eq!(get_y_lparam(lparam), 300);
        assert_eq!(point_from_lparam(lparam), Point::new(-5, 300));
    }

    #[test]
    fn touch_signature_ignores_low_byte() {
        assert!(is_mouse_event_from_touch(0xFF51_5700));
        assert!(is_mouse_event_from_touch(0xFF51_5780));
        assert!(!is_mouse_event_from_touch(0xFF51_5600));
        assert!(!is_mouse_event_from_touch(0));
    }

    #[test]
    fn categorize_routes_message_families() {
        assert_eq!(categorize(WM_MOUSEMOVE), MessageCategory::Mouse);
        assert_eq!(categorize(WM_NCRBUTTONDOWN), MessageCategory::Mouse);
        assert_eq!(categorize(WM_MOUSELEAVE), MessageCategory::Mouse);
        assert_eq!(categorize(WM_SYSKEYDOWN), MessageCategory::Keyboard);
        assert_eq!(categorize(WM_CHAR), MessageCategory::Ime);
        assert_eq!(categorize(WM_TOUCH), MessageCategory::Touch);
        assert_eq!(categorize(WM_VSCROLL), MessageCategory::Scroll);
        assert_eq!(categorize(WM_NCHITTEST), MessageCategory::NonClient);
        assert_eq!(categorize(WM_NCDESTROY), MessageCategory::Lifecycle);
        assert_eq!(categorize(WM_EXITMENULOOP), MessageCategory::Menu);
        assert_eq!(categorize(WM_APP), MessageCategory::Other);
    }

    #[test]
    fn word_helpers_split_wparam() {
        let wparam = (1usize << 16) | 0x0002;
        assert_eq!(loword(wparam), 2);
        assert_eq!(hiword(wparam), 1);
    }
}
