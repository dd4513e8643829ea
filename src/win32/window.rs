/*
 * `NativeWindow` over a real window handle.
 *
 * `Win32Window` starts out without a handle: it is created before `CreateWindowExW` so
 * the message handler exists when the first messages arrive, and the window procedure
 * attaches the handle on `WM_NCCREATE`. Every call degrades to a harmless default while
 * the handle is null or dead. Failures of individual platform calls are logged and
 * absorbed; the protocol has no error path for them.
 */

use std::cell::Cell;
use std::ffi::c_void;

use windows::Win32::{
    Foundation::{HANDLE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
    Graphics::Dwm::{
        DWMNCRP_DISABLED, DWMNCRP_ENABLED, DWMWA_NCRENDERING_POLICY,
        DWMWA_TRANSITIONS_FORCEDISABLED, DwmDefWindowProc, DwmExtendFrameIntoClientArea,
        DwmIsCompositionEnabled, DwmSetWindowAttribute,
    },
    Graphics::Gdi::{
        ClientToScreen, CombineRgn, CreateRectRgn, DeleteObject, GetMonitorInfoW, GetRegionData,
        GetRgnBox, GetUpdateRect, GetWindowRgn, HGDIOBJ, HMONITOR, HRGN, InvalidateRect,
        MONITOR_DEFAULTTONEAREST, MONITOR_DEFAULTTONULL, MONITORINFO, MonitorFromRect,
        MonitorFromWindow, NULLREGION, REDRAW_WINDOW_FLAGS, RGN_ERROR, RGN_OR, RGNDATA,
        RGNDATAHEADER, RedrawWindow, ScreenToClient, SetWindowRgn, ValidateRect,
    },
    System::StationsAndDesktops::{
        CloseDesktop, DESKTOP_CONTROL_FLAGS, DESKTOP_SWITCHDESKTOP, OpenInputDesktop,
        SwitchDesktop,
    },
    System::SystemInformation::GetTickCount64,
    System::Threading::{GetCurrentProcessId, GetCurrentThreadId},
    UI::Controls::{MARGINS, ShowScrollBar},
    UI::Input::KeyboardAndMouse::{
        EnableWindow, GetCapture, GetKeyState, ReleaseCapture, SetCapture, SetFocus,
        TRACKMOUSEEVENT, TRACKMOUSEEVENT_FLAGS, TrackMouseEvent, VK_CONTROL, VK_MENU, VK_SHIFT,
    },
    UI::Input::Touch::{
        CloseTouchInputHandle, GetTouchInputInfo, HTOUCHINPUT, RegisterTouchWindow, TOUCHINPUT,
        TWF_WANTPALM,
    },
    UI::WindowsAndMessaging::*,
};
use windows::core::{BOOL, w};

use crate::events::EventFlags;
use crate::messages::{WM_DWMCOMPOSITIONCHANGED, get_x_lparam, get_y_lparam};
use crate::native::{
    self as native, ChildWindow, CursorHandle, HookHandle, HookKind, NativeWindow, StockCursor,
    SystemMetric, TouchInput,
};
use crate::types::{Insets, MenuHandle, MonitorId, MonitorInfo, Point, Rect, Region, WindowHandle};

use super::hooks;
use super::window_proc::{DEFERRED_TASK_TIMER_ID, WM_APP_RUN_DEFERRED, take_window_context};

// Set by menus on the window they close over when an item was picked by touch.
const IGNORE_TOUCH_MOUSE_ACTIVATE_PROP: windows::core::PCWSTR =
    w!("ui::IgnoreTouchMouseActivateForWindow");

thread_local! {
    // Guards against wheel messages bouncing between two windows rerouting to each other.
    static REROUTING_WHEEL: Cell<bool> = const { Cell::new(false) };
}

fn to_rect(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

fn to_native_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

fn to_handle(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as isize)
}

fn monitor_info(monitor: HMONITOR) -> Option<MonitorInfo> {
    if monitor.is_invalid() {
        return None;
    }
    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    if !unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
        log::warn!("Platform: GetMonitorInfoW failed for {monitor:?}");
        return None;
    }
    Some(MonitorInfo {
        id: MonitorId(monitor.0 as isize),
        monitor_rect: to_rect(info.rcMonitor),
        work_area: to_rect(info.rcWork),
    })
}

// Reads the rectangles of a GDI region; the region stays owned by the caller.
fn region_rects(region: HRGN) -> Vec<Rect> {
    let size = unsafe { GetRegionData(region, 0, None) };
    if size == 0 {
        return Vec::new();
    }
    // u64 storage keeps the header and the RECTs that follow it aligned.
    let mut buffer = vec![0u64; (size as usize).div_ceil(8)];
    let data = buffer.as_mut_ptr() as *mut RGNDATA;
    if unsafe { GetRegionData(region, size, Some(data)) } == 0 {
        return Vec::new();
    }
    let header: RGNDATAHEADER = unsafe { (*data).rdh };
    let first = unsafe { (data as *const u8).add(header.dwSize as usize) } as *const RECT;
    (0..header.nCount as usize)
        .map(|i| to_rect(unsafe { *first.add(i) }))
        .collect()
}

// Builds a GDI region owned by the caller.
fn create_region(region: &Region) -> HRGN {
    let combined = unsafe { CreateRectRgn(0, 0, 0, 0) };
    for rect in region.rects() {
        unsafe {
            let part = CreateRectRgn(rect.left, rect.top, rect.right, rect.bottom);
            let _ = CombineRgn(Some(combined), Some(combined), Some(part), RGN_OR);
            let _ = DeleteObject(HGDIOBJ(part.0));
        }
    }
    combined
}

#[derive(Debug, Default)]
pub struct Win32Window {
    hwnd: Cell<HWND>,
    attached: Cell<bool>,
    // Tick count at which the deferred-task timer fires, if armed.
    timer_due: Cell<Option<u64>>,
}

impl Win32Window {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd.get()
    }

    pub(crate) fn attach(&self, hwnd: HWND) {
        log::debug!("Platform: attached window {hwnd:?}");
        self.hwnd.set(hwnd);
        self.attached.set(true);
    }

    /// Whether the window procedure ever saw `WM_NCCREATE` for this window.
    pub(crate) fn was_attached(&self) -> bool {
        self.attached.get()
    }

    pub(crate) fn detach(&self) {
        self.hwnd.set(HWND::default());
        self.timer_due.set(None);
    }

    // Called by the window procedure when the deferred-task timer fires.
    pub(crate) fn disarm_deferred_timer(&self) {
        if self.timer_due.take().is_some() {
            unsafe {
                _ = KillTimer(Some(self.hwnd()), DEFERRED_TASK_TIMER_ID);
            }
        }
    }

    fn has_window(&self) -> bool {
        !self.hwnd().is_invalid()
    }

    fn long(&self, index: WINDOW_LONG_PTR_INDEX) -> u32 {
        if !self.has_window() {
            return 0;
        }
        unsafe { GetWindowLongPtrW(self.hwnd(), index) as u32 }
    }

    fn owner_chain(&self) -> Vec<HWND> {
        let mut owners = Vec::new();
        let mut current = self.hwnd();
        while let Ok(owner) = unsafe { GetWindow(current, GW_OWNER) } {
            if owner.is_invalid() {
                break;
            }
            owners.push(owner);
            current = owner;
        }
        owners
    }

    fn key_down(key: i32) -> bool {
        unsafe { GetKeyState(key) } < 0
    }
}

impl NativeWindow for Win32Window {
    fn handle(&self) -> WindowHandle {
        to_handle(self.hwnd())
    }

    fn is_window(&self) -> bool {
        self.has_window() && unsafe { IsWindow(Some(self.hwnd())) }.as_bool()
    }

    fn is_visible(&self) -> bool {
        self.has_window() && unsafe { IsWindowVisible(self.hwnd()) }.as_bool()
    }

    fn is_minimized(&self) -> bool {
        self.has_window() && unsafe { IsIconic(self.hwnd()) }.as_bool()
    }

    fn is_maximized(&self) -> bool {
        self.has_window() && unsafe { IsZoomed(self.hwnd()) }.as_bool()
    }

    fn style(&self) -> u32 {
        self.long(GWL_STYLE)
    }

    fn set_style(&self, style: u32) {
        if self.has_window() {
            unsafe { SetWindowLongPtrW(self.hwnd(), GWL_STYLE, style as isize) };
        }
    }

    fn ex_style(&self) -> u32 {
        self.long(GWL_EXSTYLE)
    }

    fn parent(&self) -> Option<WindowHandle> {
        let parent = unsafe { GetParent(self.hwnd()) }.ok()?;
        (!parent.is_invalid()).then(|| to_handle(parent))
    }

    fn window_rect(&self) -> Option<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(self.hwnd(), &mut rect) }.ok()?;
        Some(to_rect(rect))
    }

    fn client_rect(&self) -> Option<Rect> {
        let mut rect = RECT::default();
        unsafe { GetClientRect(self.hwnd(), &mut rect) }.ok()?;
        Some(to_rect(rect))
    }

    fn client_to_screen(&self, point: Point) -> Point {
        let mut native = POINT {
            x: point.x,
            y: point.y,
        };
        if !unsafe { ClientToScreen(self.hwnd(), &mut native) }.as_bool() {
            return point;
        }
        Point::new(native.x, native.y)
    }

    fn screen_to_client(&self, point: Point) -> Point {
        let mut native = POINT {
            x: point.x,
            y: point.y,
        };
        if !unsafe { ScreenToClient(self.hwnd(), &mut native) }.as_bool() {
            return point;
        }
        Point::new(native.x, native.y)
    }

    fn def_window_proc(&self, message: u32, wparam: usize, lparam: isize) -> isize {
        unsafe { DefWindowProcW(self.hwnd(), message, WPARAM(wparam), LPARAM(lparam)) }.0
    }

    fn send_message(&self, message: u32, wparam: usize, lparam: isize) -> isize {
        if !self.has_window() {
            return 0;
        }
        unsafe {
            SendMessageW(
                self.hwnd(),
                message,
                Some(WPARAM(wparam)),
                Some(LPARAM(lparam)),
            )
        }
        .0
    }

    fn dwm_def_window_proc(&self, message: u32, wparam: usize, lparam: isize) -> Option<isize> {
        let mut result = LRESULT(0);
        let handled = unsafe {
            DwmDefWindowProc(
                self.hwnd(),
                message,
                WPARAM(wparam),
                LPARAM(lparam),
                &mut result,
            )
        };
        handled.as_bool().then_some(result.0)
    }

    fn is_composition_enabled(&self) -> bool {
        unsafe { DwmIsCompositionEnabled() }.is_ok_and(|enabled| enabled.as_bool())
    }

    fn message_time(&self) -> u32 {
        unsafe { GetMessageTime() as u32 }
    }

    fn message_pos(&self) -> Point {
        let pos = unsafe { GetMessagePos() } as isize;
        Point::new(get_x_lparam(pos), get_y_lparam(pos))
    }

    fn message_extra_info(&self) -> usize {
        unsafe { GetMessageExtraInfo() }.0 as usize
    }

    fn thread_id(&self) -> u32 {
        unsafe { GetCurrentThreadId() }
    }

    fn tick_count(&self) -> u64 {
        unsafe { GetTickCount64() }
    }

    /*
     * Immediate pumps are posted messages. Delayed pumps share one timer, re-armed only
     * when the new deadline is earlier than the armed one; the pump itself re-arms the
     * timer for whatever is still pending.
     */
    fn request_deferred_pump(&self, delay_ms: u32) {
        if !self.has_window() {
            return;
        }
        if delay_ms == 0 {
            if let Err(err) =
                unsafe { PostMessageW(Some(self.hwnd()), WM_APP_RUN_DEFERRED, WPARAM(0), LPARAM(0)) }
            {
                log::warn!("Platform: failed to post deferred pump: {err:?}");
            }
            return;
        }
        let due = self.tick_count() + u64::from(delay_ms);
        if self.timer_due.get().is_some_and(|armed| armed <= due) {
            return;
        }
        let timer =
            unsafe { SetTimer(Some(self.hwnd()), DEFERRED_TASK_TIMER_ID, delay_ms, None) };
        if timer == 0 {
            log::warn!("Platform: SetTimer failed for deferred pump in {delay_ms} ms");
            return;
        }
        self.timer_due.set(Some(due));
    }

    fn cursor_pos(&self) -> Point {
        let mut pos = POINT::default();
        if unsafe { GetCursorPos(&mut pos) }.is_err() {
            return Point::default();
        }
        Point::new(pos.x, pos.y)
    }

    fn monitor_from_rect(&self, rect: &Rect) -> Option<MonitorInfo> {
        let rect = to_native_rect(*rect);
        monitor_info(unsafe { MonitorFromRect(&rect, MONITOR_DEFAULTTONULL) })
    }

    fn monitor_from_window(&self) -> Option<MonitorInfo> {
        monitor_info(unsafe { MonitorFromWindow(self.hwnd(), MONITOR_DEFAULTTONULL) })
    }

    fn nearest_monitor(&self) -> Option<MonitorInfo> {
        monitor_info(unsafe { MonitorFromWindow(self.hwnd(), MONITOR_DEFAULTTONEAREST) })
    }

    fn window_region(&self) -> Option<Region> {
        if !self.has_window() {
            return None;
        }
        unsafe {
            let region = CreateRectRgn(0, 0, 0, 0);
            let kind = GetWindowRgn(self.hwnd(), region);
            let rects = if kind == RGN_ERROR || kind == NULLREGION {
                None
            } else {
                Some(region_rects(region))
            };
            let _ = DeleteObject(HGDIOBJ(region.0));
            rects.map(Region::from_rects)
        }
    }

    fn set_window_region(&self, region: Option<Region>, redraw: bool) {
        if !self.has_window() {
            return;
        }
        match region {
            None => unsafe {
                SetWindowRgn(self.hwnd(), None, redraw);
            },
            Some(region) => unsafe {
                let native = create_region(&region);
                // The system owns the region once it is installed.
                if SetWindowRgn(self.hwnd(), Some(native), redraw) == 0 {
                    log::warn!("Platform: SetWindowRgn failed for {:?}", self.hwnd());
                    let _ = DeleteObject(HGDIOBJ(native.0));
                }
            },
        }
    }

    fn region_box(&self, region: usize) -> Option<Rect> {
        let mut rect = RECT::default();
        let kind = unsafe { GetRgnBox(HRGN(region as *mut c_void), &mut rect) };
        (kind != RGN_ERROR).then(|| to_rect(rect))
    }

    fn set_window_pos(&self, rect: Option<Rect>, flags: u32) {
        if !self.has_window() {
            return;
        }
        let rect = rect.unwrap_or_default();
        let result = unsafe {
            SetWindowPos(
                self.hwnd(),
                None,
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                SET_WINDOW_POS_FLAGS(flags | native::SWP_NOZORDER),
            )
        };
        if let Err(err) = result {
            log::debug!("Platform: SetWindowPos({flags:#x}) failed: {err:?}");
        }
    }

    fn redraw_window(&self, flags: u32) {
        unsafe {
            _ = RedrawWindow(Some(self.hwnd()), None, None, REDRAW_WINDOW_FLAGS(flags));
        }
    }

    fn redraw_child_windows(&self) {
        unsafe extern "system" fn redraw_child(child: HWND, _: LPARAM) -> BOOL {
            let mut process_id = 0;
            unsafe { GetWindowThreadProcessId(child, Some(&mut process_id)) };
            let mut flags = native::RDW_INVALIDATE | native::RDW_FRAME | native::RDW_ALLCHILDREN;
            // Children of other processes repaint asynchronously.
            if process_id == unsafe { GetCurrentProcessId() } {
                flags |= native::RDW_UPDATENOW;
            }
            unsafe {
                _ = RedrawWindow(Some(child), None, None, REDRAW_WINDOW_FLAGS(flags));
            }
            BOOL::from(true)
        }
        unsafe {
            _ = EnumChildWindows(Some(self.hwnd()), Some(redraw_child), LPARAM(0));
        }
    }

    fn notify_children_composition_changed(&self) {
        unsafe extern "system" fn send_composition_changed(child: HWND, _: LPARAM) -> BOOL {
            unsafe { SendMessageW(child, WM_DWMCOMPOSITIONCHANGED, None, None) };
            BOOL::from(true)
        }
        unsafe {
            _ = EnumChildWindows(Some(self.hwnd()), Some(send_composition_changed), LPARAM(0));
        }
    }

    fn invalidate(&self) {
        unsafe {
            _ = InvalidateRect(Some(self.hwnd()), None, false);
        }
    }

    fn validate_paint(&self) -> Rect {
        let mut rect = RECT::default();
        unsafe {
            if !GetUpdateRect(self.hwnd(), Some(&mut rect), false).as_bool() {
                return Rect::default();
            }
            _ = ValidateRect(Some(self.hwnd()), None);
        }
        to_rect(rect)
    }

    fn system_metric(&self, metric: SystemMetric) -> i32 {
        let index = match metric {
            SystemMetric::SizeFrameWidth => SM_CXSIZEFRAME,
            SystemMetric::SizeFrameHeight => SM_CYSIZEFRAME,
            SystemMetric::VScrollWidth => SM_CXVSCROLL,
            SystemMetric::VScrollHeight => SM_CYVSCROLL,
            SystemMetric::MaxTrackWidth => SM_CXMAXTRACK,
            SystemMetric::MaxTrackHeight => SM_CYMAXTRACK,
        };
        unsafe { GetSystemMetrics(index) }
    }

    fn load_stock_cursor(&self, cursor: StockCursor) -> Option<CursorHandle> {
        let id = match cursor {
            StockCursor::Arrow => IDC_ARROW,
            StockCursor::SizeNwse => IDC_SIZENWSE,
            StockCursor::SizeNesw => IDC_SIZENESW,
            StockCursor::SizeWe => IDC_SIZEWE,
            StockCursor::SizeNs => IDC_SIZENS,
        };
        let cursor = unsafe { LoadCursorW(None, id) }.ok()?;
        Some(CursorHandle(cursor.0 as isize))
    }

    fn set_cursor(&self, cursor: Option<CursorHandle>) -> Option<CursorHandle> {
        let cursor = cursor.map(|c| HCURSOR(c.0 as *mut c_void));
        let previous = unsafe { SetCursor(cursor) };
        (!previous.is_invalid()).then(|| CursorHandle(previous.0 as isize))
    }

    fn track_mouse_event(&self, flags: u32) {
        let mut request = TRACKMOUSEEVENT {
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TRACKMOUSEEVENT_FLAGS(flags),
            hwndTrack: self.hwnd(),
            dwHoverTime: 0,
        };
        if let Err(err) = unsafe { TrackMouseEvent(&mut request) } {
            log::debug!("MouseHandler: TrackMouseEvent({flags:#x}) failed: {err:?}");
        }
    }

    fn set_capture(&self) {
        unsafe { SetCapture(self.hwnd()) };
    }

    fn release_capture(&self) {
        unsafe {
            _ = ReleaseCapture();
        }
    }

    fn has_capture(&self) -> bool {
        self.has_window() && unsafe { GetCapture() } == self.hwnd()
    }

    fn key_modifiers(&self) -> EventFlags {
        let mut flags = EventFlags::NONE;
        if Self::key_down(i32::from(VK_SHIFT.0)) {
            flags |= EventFlags::SHIFT_DOWN;
        }
        if Self::key_down(i32::from(VK_CONTROL.0)) {
            flags |= EventFlags::CONTROL_DOWN;
        }
        if Self::key_down(i32::from(VK_MENU.0)) {
            flags |= EventFlags::ALT_DOWN;
        }
        flags
    }

    fn set_focus(&self) {
        if let Err(err) = unsafe { SetFocus(Some(self.hwnd())) } {
            log::debug!("Platform: SetFocus failed: {err:?}");
        }
    }

    fn touch_inputs(&self, touch_handle: isize, count: usize) -> Option<Vec<TouchInput>> {
        let mut inputs = vec![TOUCHINPUT::default(); count];
        unsafe {
            GetTouchInputInfo(
                HTOUCHINPUT(touch_handle as *mut c_void),
                &mut inputs,
                std::mem::size_of::<TOUCHINPUT>() as i32,
            )
        }
        .ok()?;
        Some(
            inputs
                .iter()
                .map(|input| TouchInput {
                    id: input.dwID,
                    // Touch coordinates arrive in hundredths of a pixel.
                    screen_point: Point::new(input.x / 100, input.y / 100),
                    flags: input.dwFlags.0,
                })
                .collect(),
        )
    }

    fn close_touch_input_handle(&self, touch_handle: isize) {
        unsafe {
            _ = CloseTouchInputHandle(HTOUCHINPUT(touch_handle as *mut c_void));
        }
    }

    fn take_ignore_touch_activate_prop(&self) -> bool {
        if !self.has_window() {
            return false;
        }
        unsafe { RemovePropW(self.hwnd(), IGNORE_TOUCH_MOUSE_ACTIVATE_PROP) }
            .is_ok_and(|handle: HANDLE| !handle.is_invalid())
    }

    fn child_window_at(&self, client_point: Point) -> Option<ChildWindow> {
        if !self.has_window() {
            return None;
        }
        let point = POINT {
            x: client_point.x,
            y: client_point.y,
        };
        let child = unsafe { RealChildWindowFromPoint(self.hwnd(), point) };
        let is_child = !child.is_invalid() && child != self.hwnd();
        if !is_child || !unsafe { IsWindow(Some(child)) }.as_bool() {
            return None;
        }
        Some(ChildWindow {
            visible: unsafe { IsWindowVisible(child) }.as_bool(),
            ex_style: unsafe { GetWindowLongPtrW(child, GWL_EXSTYLE) } as u32,
        })
    }

    /*
     * Sends the wheel message to the window under the pointer when that window belongs
     * to this process but is not one of our children; the system would otherwise deliver
     * it to the focused window.
     */
    fn reroute_mouse_wheel(&self, wparam: usize, lparam: isize) -> bool {
        if REROUTING_WHEEL.with(Cell::get) {
            return false;
        }
        let point = POINT {
            x: get_x_lparam(lparam),
            y: get_y_lparam(lparam),
        };
        let target = unsafe { WindowFromPoint(point) };
        if target.is_invalid() || target == self.hwnd() {
            return false;
        }
        let mut process_id = 0;
        unsafe { GetWindowThreadProcessId(target, Some(&mut process_id)) };
        if process_id != unsafe { GetCurrentProcessId() }
            || unsafe { IsChild(self.hwnd(), target) }.as_bool()
        {
            return false;
        }
        log::trace!("MouseHandler: rerouting wheel to {target:?}");
        REROUTING_WHEEL.with(|flag| flag.set(true));
        unsafe {
            SendMessageW(
                target,
                crate::messages::WM_MOUSEWHEEL,
                Some(WPARAM(wparam)),
                Some(LPARAM(lparam)),
            )
        };
        REROUTING_WHEEL.with(|flag| flag.set(false));
        true
    }

    fn install_input_hook(&self, kind: HookKind) -> Option<HookHandle> {
        hooks::install(kind, self.thread_id())
    }

    fn remove_input_hook(&self, hook: HookHandle) {
        hooks::remove(hook);
    }

    fn system_menu(&self) -> Option<MenuHandle> {
        if !self.has_window() {
            return None;
        }
        let menu = unsafe { GetSystemMenu(self.hwnd(), false) };
        (!menu.is_invalid()).then(|| MenuHandle(menu.0 as isize))
    }

    fn show_system_menu_at(&self, screen_point: Point) {
        let Some(MenuHandle(menu)) = self.system_menu() else {
            return;
        };
        let command = unsafe {
            TrackPopupMenu(
                HMENU(menu as *mut c_void),
                TPM_LEFTBUTTON | TPM_RIGHTBUTTON | TPM_RETURNCMD,
                screen_point.x,
                screen_point.y,
                Some(0),
                self.hwnd(),
                None,
            )
        };
        if command.0 != 0 {
            self.send_message(WM_SYSCOMMAND, command.0 as usize, 0);
        }
    }

    fn enable_menu_item(&self, menu: MenuHandle, command: usize, enabled: bool) {
        let flags = if enabled {
            MF_BYCOMMAND | MF_ENABLED
        } else {
            MF_BYCOMMAND | MF_DISABLED | MF_GRAYED
        };
        unsafe {
            _ = EnableMenuItem(HMENU(menu.0 as *mut c_void), command as u32, flags);
        }
    }

    fn set_menu_default_item(&self, menu: MenuHandle, command: usize) {
        if let Err(err) =
            unsafe { SetMenuDefaultItem(HMENU(menu.0 as *mut c_void), command as u32, 0) }
        {
            log::debug!("Platform: SetMenuDefaultItem({command:#x}) failed: {err:?}");
        }
    }

    fn show_scroll_bars(&self, show: bool) {
        if let Err(err) = unsafe { ShowScrollBar(self.hwnd(), SB_BOTH, show) } {
            log::debug!("Platform: ShowScrollBar({show}) failed: {err:?}");
        }
    }

    fn set_dwm_nc_rendering(&self, enabled: bool) {
        let policy = if enabled {
            DWMNCRP_ENABLED
        } else {
            DWMNCRP_DISABLED
        };
        unsafe {
            let _ = DwmSetWindowAttribute(
                self.hwnd(),
                DWMWA_NCRENDERING_POLICY,
                &policy as *const _ as *const c_void,
                std::mem::size_of_val(&policy) as u32,
            );
        }
    }

    fn extend_frame_into_client(&self, margins: Insets) {
        let margins = MARGINS {
            cxLeftWidth: margins.left,
            cxRightWidth: margins.right,
            cyTopHeight: margins.top,
            cyBottomHeight: margins.bottom,
        };
        if let Err(err) = unsafe { DwmExtendFrameIntoClientArea(self.hwnd(), &margins) } {
            log::debug!("Platform: DwmExtendFrameIntoClientArea failed: {err:?}");
        }
    }

    fn set_transitions_disabled(&self, disabled: bool) {
        let value = BOOL::from(disabled);
        unsafe {
            let _ = DwmSetWindowAttribute(
                self.hwnd(),
                DWMWA_TRANSITIONS_FORCEDISABLED,
                &value as *const _ as *const c_void,
                std::mem::size_of_val(&value) as u32,
            );
        }
    }

    // The input desktop of a locked session cannot be switched to.
    fn is_workstation_locked(&self) -> bool {
        let Ok(desktop) =
            (unsafe { OpenInputDesktop(DESKTOP_CONTROL_FLAGS(0), false, DESKTOP_SWITCHDESKTOP) })
        else {
            return true;
        };
        let locked = unsafe { SwitchDesktop(desktop) }.is_err();
        unsafe {
            _ = CloseDesktop(desktop);
        }
        locked
    }

    fn register_touch_window(&self) -> bool {
        unsafe { RegisterTouchWindow(self.hwnd(), TWF_WANTPALM) }.is_ok()
    }

    fn set_owner_chain_enabled(&self, enabled: bool) {
        for owner in self.owner_chain() {
            unsafe {
                _ = EnableWindow(owner, enabled);
            }
        }
    }

    fn destroy_window(&self) {
        if !self.is_window() {
            return;
        }
        if let Err(err) = unsafe { DestroyWindow(self.hwnd()) } {
            log::warn!("Platform: DestroyWindow failed for {:?}: {err:?}", self.hwnd());
        }
    }

    fn clear_user_data(&self) {
        if self.has_window() {
            drop(take_window_context(self.hwnd()));
        }
    }
}
