/*
 * Non-client frame handling: hit testing, client-area insets, the window region, the
 * non-client paint and activation messages, and the switch between the native and a
 * custom frame when desktop composition changes.
 *
 * A widget window either lets the system draw the frame (native frame) or draws all of it
 * itself (custom frame). With a native frame the compositor gets the first chance at
 * hit tests and the region stays untouched; with a custom frame the widget layer owns
 * the non-client area and default processing is kept from painting over it.
 */

use crate::message_handler::MessageHandler;
use crate::messages::*;
use crate::native::{
    NativeWindow, NcCalcSizeParams, RDW_INVALIDATE, RDW_NOCHILDREN, RDW_UPDATENOW,
    SWP_FRAMECHANGED, SWP_HIDEWINDOW, SWP_NOACTIVATE, SWP_NOCOPYBITS, SWP_NOMOVE,
    SWP_NOOWNERZORDER, SWP_NOREPOSITION, SWP_NOSENDCHANGING, SWP_NOSIZE, SWP_NOZORDER,
    SWP_SHOWWINDOW, SystemMetric, WS_CAPTION, WS_EX_COMPOSITED,
};
use crate::types::{AutohideEdges, Insets, MonitorId, Point, Rect, Region};

// Region handle value meaning "repaint the whole frame" in WM_NCPAINT.
const NCPAINT_ENTIRE_FRAME: usize = 1;

impl<W: NativeWindow + 'static> MessageHandler<W> {
    pub(crate) fn process_frame_message(
        &self,
        message: u32,
        wparam: usize,
        lparam: isize,
    ) -> Option<isize> {
        match message {
            WM_NCHITTEST => self.on_nc_hit_test(point_from_lparam(lparam)),
            WM_NCCALCSIZE => self.on_nc_calc_size(wparam != 0, lparam),
            WM_NCPAINT => self.on_nc_paint(wparam),
            WM_NCACTIVATE => self.on_nc_activate(wparam),
            // Undocumented messages that draw the standard caption over a custom one.
            WM_NCUAHDRAWCAPTION | WM_NCUAHDRAWFRAME => self.is_using_custom_frame().then_some(0),
            WM_DWMCOMPOSITIONCHANGED => {
                if !self.is_widget_window() {
                    return None;
                }
                self.frame_type_changed();
                Some(0)
            }
            _ => None,
        }
    }

    /*
     * Hit test for a point in screen coordinates. Answers from, in order: the compositor
     * when it draws the caption buttons, the widget layer, then default processing.
     * The scroll-style shim makes default processing report scroll bar parts that are
     * never shown; those codes are mapped back to the client area.
     */
    pub fn on_nc_hit_test(&self, point: Point) -> Option<isize> {
        if !self.is_widget_window() {
            return None;
        }
        let lparam = lparam_from_point(point);

        if !self.config.remove_standard_frame && !self.is_using_custom_frame() {
            if let Some(result) = self.native.dwm_def_window_proc(WM_NCHITTEST, 0, lparam) {
                return Some(result);
            }
        }

        let client_point = self.native.screen_to_client(point);
        let component = self.query(HTNOWHERE, |d| d.get_non_client_component(client_point));
        if component != HTNOWHERE {
            log::trace!("FrameHandler: hit test claimed by widget: {component}");
            return Some(component);
        }

        let mut hit_test_code = self.native.def_window_proc(WM_NCHITTEST, 0, lparam);
        if self.needs_scroll_styles.get() {
            match hit_test_code {
                HTVSCROLL | HTHSCROLL => hit_test_code = HTCLIENT,
                HTBOTTOMRIGHT if self.is_over_scroll_arrow_area(point) => {
                    hit_test_code = HTCLIENT
                }
                _ => {}
            }
        }
        Some(hit_test_code)
    }

    // Area where the hidden vertical scroll bar's down arrow would be drawn.
    fn is_over_scroll_arrow_area(&self, point: Point) -> bool {
        let Some(window_rect) = self.native.window_rect() else {
            return false;
        };
        let border_width = self.native.system_metric(SystemMetric::SizeFrameWidth);
        let border_height = self.native.system_metric(SystemMetric::SizeFrameHeight);
        let scroll_width = self.native.system_metric(SystemMetric::VScrollWidth);
        let scroll_height = self.native.system_metric(SystemMetric::VScrollHeight);
        let right = window_rect.right - border_width;
        let bottom = window_rect.bottom - border_height;
        Rect::new(right - scroll_width, bottom - scroll_height, right, bottom).contains(point)
    }

    /*
     * Insets between the window rectangle and the client area. `None` leaves the
     * computation to default processing. A custom or removed frame has no insets,
     * except when maximized: the system then pushes the window a frame width past
     * every monitor edge.
     */
    pub fn get_client_area_insets(&self) -> Option<Insets> {
        if let Some(insets) = self.query(None, |d| d.get_client_area_insets()) {
            return Some(insets);
        }
        if !self.is_widget_window()
            || (!self.is_using_custom_frame() && !self.config.remove_standard_frame)
        {
            return None;
        }
        if self.native.is_maximized() {
            let mut border = self.native.system_metric(SystemMetric::SizeFrameWidth);
            if self.config.remove_standard_frame {
                border -= 1;
            }
            return Some(Insets::uniform(border));
        }
        Some(Insets::default())
    }

    /*
     * WM_NCCALCSIZE. `lparam` points at an `NcCalcSizeParams` when `mode` is set and at a
     * bare `Rect` otherwise; the first rectangle is rewritten in place to the new client
     * area. A maximized window additionally gives up a thin strip on every monitor edge
     * carrying an auto-hide appbar so the appbar can still be revealed.
     */
    pub fn on_nc_calc_size(&self, mode: bool, lparam: isize) -> Option<isize> {
        // The first pass of a captioned window lets the system set up its caption state.
        if self.flags.is_first_nccalc.replace(false) && self.native.style() & WS_CAPTION != 0 {
            return None;
        }

        let insets = self.get_client_area_insets();
        if insets.is_none() && !self.fullscreen.get() && !(mode && self.config.remove_standard_frame)
        {
            return None;
        }
        let insets = insets.unwrap_or_default();

        if lparam == 0 {
            return None;
        }
        let client_rect_ptr: *mut Rect = if mode {
            // The first rectangle of NCCALCSIZE_PARAMS.
            unsafe { &raw mut (*(lparam as *mut NcCalcSizeParams)).rgrc[0] }
        } else {
            lparam as *mut Rect
        };
        let mut client_rect = unsafe { *client_rect_ptr };
        insets.apply_to(&mut client_rect);

        if self.native.is_maximized() {
            // A window restored straight to maximized from minimized is still parked
            // off-screen, so fall back to the proposed rectangle to find its monitor.
            let monitor = self
                .native
                .monitor_from_window()
                .or_else(|| self.native.monitor_from_rect(&client_rect));
            if let Some(monitor) = monitor {
                let edges = self.appbar_autohide_edges(monitor.id);
                let thickness = self.config.autohide_taskbar_thickness_px;
                if edges.contains(AutohideEdges::LEFT) {
                    client_rect.left += thickness;
                }
                if edges.contains(AutohideEdges::TOP) {
                    if self.is_using_custom_frame() {
                        client_rect.top += thickness;
                    } else {
                        // Any non-client area above the client stops the compositor's
                        // caption buttons from responding, so shrink from the bottom.
                        client_rect.bottom -= 1;
                    }
                }
                if edges.contains(AutohideEdges::RIGHT) {
                    client_rect.right -= thickness;
                }
                if edges.contains(AutohideEdges::BOTTOM) {
                    client_rect.bottom -= thickness;
                }
            } else {
                log::warn!("FrameHandler: maximized window intersects no monitor");
            }
            unsafe { *client_rect_ptr = client_rect };
            // WVR_REDRAW with a non-client area misplaces client pixels and child windows.
            return Some(0);
        }

        unsafe { *client_rect_ptr = client_rect };
        if insets.left == 0 || insets.top == 0 {
            return Some(0);
        }
        Some(if mode { WVR_REDRAW } else { 0 })
    }

    /*
     * Asks the appbar provider which edges of `monitor` carry an auto-hide appbar. Only
     * the most recent query may call back; earlier callbacks are revoked here. Without a
     * provider the taskbar is assumed to sit at the bottom.
     */
    pub fn appbar_autohide_edges(&self, monitor: MonitorId) -> AutohideEdges {
        self.autohide_factory.invalidate();
        let Some(provider) = self.appbar_query() else {
            return AutohideEdges::BOTTOM;
        };
        let token = self.autohide_factory.token();
        let weak = self.weak_self();
        provider.autohide_edges(
            monitor,
            Box::new(move || {
                if !token.is_alive() {
                    return;
                }
                if let Some(handler) = weak.upgrade() {
                    handler.on_appbar_autohide_edges_changed();
                }
            }),
        )
    }

    /// Resizes to the same bounds with a frame change so the insets are recomputed.
    pub fn on_appbar_autohide_edges_changed(&self) {
        if let Some(window_rect) = self.native.window_rect() {
            log::debug!("FrameHandler: autohide edges changed, recomputing frame");
            self.native.set_window_pos(Some(window_rect), SWP_FRAMECHANGED);
        }
    }

    /*
     * Recomputes the window shape. Only composited windows, windows with an explicit
     * region and custom-framed widget windows have a shape of their own; everyone else
     * keeps the native region, which `force` clears. The region is reinstalled only when
     * its shape actually changed, since every installation repaints the window.
     */
    pub fn reset_window_region(&self, force: bool, redraw: bool) {
        let has_custom_region = self.custom_window_region.borrow().is_some();
        if self.native.ex_style() & WS_EX_COMPOSITED == 0
            && !has_custom_region
            && (!self.is_using_custom_frame() || !self.is_widget_window())
        {
            if force {
                self.native.set_window_region(None, redraw);
            }
            return;
        }

        let Some(window_rect) = self.native.window_rect() else {
            return;
        };
        let custom_region = self.custom_window_region.borrow().clone();
        let new_region = if custom_region.is_some() {
            custom_region
        } else if self.native.is_maximized() {
            self.native.nearest_monitor().map(|monitor| {
                Region::from_rect(
                    monitor
                        .work_area
                        .offset(-window_rect.left, -window_rect.top),
                )
            })
        } else {
            let size = window_rect.size();
            self.query(None, |d| d.get_window_mask(size))
                .filter(|mask| !mask.is_empty())
        };

        if self.native.window_region() != new_region {
            log::debug!("FrameHandler: installing window region {new_region:?}");
            self.native.set_window_region(new_region, redraw);
        }
    }

    /// Sets or clears an explicit window shape that overrides the computed one.
    pub fn set_region(&self, region: Option<Region>) {
        *self.custom_window_region.borrow_mut() = region;
        self.reset_window_region(false, true);
    }

    fn on_nc_paint(&self, region: usize) -> Option<isize> {
        if !self.is_widget_window() || !self.is_using_custom_frame() {
            return None;
        }
        let window_rect = self.native.window_rect()?;

        // Painting before WM_SIZE has resized the content would flicker; the region
        // reset that follows WM_SIZE triggers another WM_NCPAINT.
        if window_rect.size() != self.query(Default::default(), |d| d.get_root_view_size()) {
            return Some(0);
        }

        let dirty = if region == 0 || region == NCPAINT_ENTIRE_FRAME {
            Rect::from_origin_size(Point::default(), window_rect.size())
        } else {
            let Some(dirty) = self
                .native
                .region_box(region)
                .and_then(|bounds| bounds.intersect(&window_rect))
            else {
                return Some(0);
            };
            dirty.offset(-window_rect.left, -window_rect.top)
        };

        self.notify(|d| d.handle_paint_accelerated(dirty));
        Some(0)
    }

    fn on_nc_activate(&self, wparam: usize) -> Option<isize> {
        // The high word is set when the window is minimized or restored.
        let active = loword(wparam) != 0;
        let inactive_rendering_disabled = self.query(false, |d| d.is_inactive_rendering_disabled());

        if !self.is_widget_window() {
            return None;
        }
        if !self.can_activate() {
            return Some(1);
        }
        if active && inactive_rendering_disabled {
            self.notify(|d| d.enable_inactive_rendering());
        }

        let custom_frame = self.is_using_custom_frame();
        if custom_frame {
            // Some children do not repaint themselves on activation.
            self.native
                .redraw_window(RDW_NOCHILDREN | RDW_INVALIDATE | RDW_UPDATENOW);
            self.native.redraw_child_windows();
        }
        if self.native.is_visible() {
            self.notify(|d| d.schedule_paint());
        }
        if custom_frame {
            return Some(1);
        }

        let paint_active = usize::from(inactive_rendering_disabled || active);
        Some(self.def_window_proc_with_redraw_lock(WM_NCACTIVATE, paint_active, 0))
    }

    /// Re-evaluates the frame after desktop composition or the frame type changed.
    pub fn frame_type_changed(&self) {
        if self.custom_window_region.borrow().is_none() && !self.is_using_custom_frame() {
            self.dwm_transition_desired.set(true);
        }
        if !self.dwm_transition_desired.get() || !self.fullscreen.get() {
            self.perform_dwm_transition();
        }
    }

    /// A native-frame transition requested while fullscreen runs on leaving fullscreen.
    pub fn set_fullscreen(&self, fullscreen: bool) {
        self.fullscreen.set(fullscreen);
        if !fullscreen && self.dwm_transition_desired.get() {
            self.perform_dwm_transition();
        }
    }

    fn perform_dwm_transition(&self) {
        log::debug!("FrameHandler: performing frame transition");
        self.dwm_transition_desired.set(false);

        self.update_dwm_nc_rendering_policy();
        // The hide/show cycle below repaints anyway.
        self.reset_window_region(true, false);
        self.notify(|d| d.handle_frame_changed());

        if self.native.is_visible() && !self.is_using_custom_frame() {
            // Without a hide/show cycle the client area turns black after switching
            // from a custom frame to the native one.
            let flags = SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER;
            self.native.set_window_pos(None, flags | SWP_HIDEWINDOW);
            self.native.set_window_pos(None, flags | SWP_SHOWWINDOW);
        }
        // Only top-level windows get WM_DWMCOMPOSITIONCHANGED from the system.
        self.native.notify_children_composition_changed();
    }

    fn update_dwm_nc_rendering_policy(&self) {
        if self.fullscreen.get() {
            return;
        }
        let custom =
            self.custom_window_region.borrow().is_some() || self.is_using_custom_frame();
        self.native.set_dwm_nc_rendering(!custom);
    }

    /// Makes the system recompute the non-client area without moving or resizing.
    pub fn send_frame_changed(&self) {
        self.native.set_window_pos(
            None,
            SWP_FRAMECHANGED
                | SWP_NOACTIVATE
                | SWP_NOCOPYBITS
                | SWP_NOMOVE
                | SWP_NOOWNERZORDER
                | SWP_NOREPOSITION
                | SWP_NOSENDCHANGING
                | SWP_NOSIZE
                | SWP_NOZORDER,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::config::HandlerConfig;
    use crate::native::{WS_VISIBLE, WindowPos};
    use crate::test_support::{FixedAppbar, Harness, NativeCall};
    use crate::types::Size;

    fn calc_params(client: Rect) -> NcCalcSizeParams {
        NcCalcSizeParams {
            rgrc: [client, Rect::default(), Rect::default()],
            lppos: std::ptr::null_mut::<WindowPos>(),
        }
    }

    fn send_calc_size(h: &Harness, params: &mut NcCalcSizeParams) -> isize {
        h.send(WM_NCCALCSIZE, 1, params as *mut NcCalcSizeParams as isize)
    }

    fn maximized_custom_insets(h: &Harness) {
        h.native.maximized.set(true);
        h.delegate.insets.set(Some(Insets::default()));
    }

    #[test]
    fn non_widget_window_defers_hit_test() {
        let h = Harness::new();
        h.delegate.widget_window.set(false);
        h.native.nc_hit_test.set(HTCAPTION);

        let result = h.send(WM_NCHITTEST, 0, make_lparam(150, 110));

        assert_eq!(result, HTCAPTION);
        assert!(
            h.native
                .calls()
                .contains(&NativeCall::DefWindowProc(WM_NCHITTEST, 0, make_lparam(150, 110)))
        );
    }

    #[test]
    fn compositor_answers_first_for_native_frame() {
        let h = Harness::new();
        h.native.dwm_answer.set(Some(HTCLOSE));
        h.delegate.non_client_component.set(HTCAPTION);

        let result = h.send(WM_NCHITTEST, 0, make_lparam(480, 110));

        assert_eq!(result, HTCLOSE);
    }

    #[test]
    fn custom_frame_caption_is_claimed_by_widget() {
        let h = Harness::new();
        h.delegate.custom_frame.set(true);
        h.native.dwm_answer.set(Some(HTCLOSE));
        h.delegate.non_client_component.set(HTCAPTION);

        let result = h.send(WM_NCHITTEST, 0, make_lparam(200, 110));

        assert_eq!(result, HTCAPTION);
        assert_eq!(
            h.native
                .count_calls(|c| matches!(c, NativeCall::DefWindowProc(WM_NCHITTEST, _, _))),
            0
        );
    }

    #[test]
    fn scroll_shim_codes_map_back_to_client() {
        let h = Harness::with_config(HandlerConfig::default().with_scroll_style_shim(true));
        h.handler.init(Rect::new(100, 100, 500, 400));
        h.delegate.custom_frame.set(true);

        h.native.nc_hit_test.set(HTVSCROLL);
        assert_eq!(h.handler.on_nc_hit_test(Point::new(300, 300)), Some(HTCLIENT));

        h.native.nc_hit_test.set(HTBOTTOMRIGHT);
        assert_eq!(h.handler.on_nc_hit_test(Point::new(480, 380)), Some(HTCLIENT));
        assert_eq!(
            h.handler.on_nc_hit_test(Point::new(495, 395)),
            Some(HTBOTTOMRIGHT)
        );
    }

    #[test]
    fn first_calc_size_of_captioned_window_uses_default() {
        let h = Harness::new();
        h.native.style.set(WS_VISIBLE | WS_CAPTION);
        h.delegate.insets.set(Some(Insets::uniform(4)));
        let mut params = calc_params(Rect::new(0, 0, 400, 300));

        send_calc_size(&h, &mut params);
        assert_eq!(params.rgrc[0], Rect::new(0, 0, 400, 300));

        let result = send_calc_size(&h, &mut params);
        assert_eq!(params.rgrc[0], Rect::new(4, 4, 396, 296));
        assert_eq!(result, WVR_REDRAW);
    }

    #[test]
    fn native_frame_without_insets_defers_calc_size() {
        let h = Harness::new();
        h.native.def_proc_result.set(0x33);
        let mut params = calc_params(Rect::new(0, 0, 400, 300));

        let result = send_calc_size(&h, &mut params);

        assert_eq!(result, 0x33);
        assert_eq!(params.rgrc[0], Rect::new(0, 0, 400, 300));
    }

    #[test]
    fn custom_frame_maximized_uses_frame_width_insets() {
        let h = Harness::new();
        h.delegate.custom_frame.set(true);
        h.native.maximized.set(true);
        let appbar = Rc::new(FixedAppbar::new(AutohideEdges::NONE));
        h.handler.set_appbar_query(appbar.clone());
        let mut params = calc_params(Rect::new(-8, -8, 1928, 1048));

        let result = send_calc_size(&h, &mut params);

        assert_eq!(result, 0);
        assert_eq!(params.rgrc[0], Rect::new(0, 0, 1920, 1040));
        assert_eq!(appbar.queries.get(), 1);
    }

    #[test]
    fn top_autohide_bar_shrinks_bottom_under_native_frame() {
        let h = Harness::new();
        maximized_custom_insets(&h);
        h.handler
            .set_appbar_query(Rc::new(FixedAppbar::new(AutohideEdges::TOP)));
        let mut params = calc_params(Rect::new(0, 0, 1920, 1040));

        send_calc_size(&h, &mut params);

        assert_eq!(params.rgrc[0], Rect::new(0, 0, 1920, 1039));
    }

    #[test]
    fn top_autohide_bar_grows_top_under_custom_frame() {
        let h = Harness::new();
        maximized_custom_insets(&h);
        h.delegate.custom_frame.set(true);
        h.handler.set_appbar_query(Rc::new(FixedAppbar::new(
            AutohideEdges::TOP | AutohideEdges::LEFT,
        )));
        let mut params = calc_params(Rect::new(0, 0, 1920, 1040));

        send_calc_size(&h, &mut params);

        assert_eq!(params.rgrc[0], Rect::new(2, 2, 1920, 1040));
    }

    #[test]
    fn missing_provider_assumes_bottom_taskbar() {
        let h = Harness::new();
        maximized_custom_insets(&h);
        let mut client = Rect::new(0, 0, 1920, 1040);

        let result = h.send(WM_NCCALCSIZE, 0, &mut client as *mut Rect as isize);

        assert_eq!(result, 0);
        assert_eq!(client, Rect::new(0, 0, 1920, 1038));
    }

    #[test]
    fn maximized_window_off_every_monitor_keeps_rect() {
        let h = Harness::new();
        maximized_custom_insets(&h);
        h.native.monitor.set(None);
        let mut params = calc_params(Rect::new(-32000, -32000, -31000, -31000));

        let result = send_calc_size(&h, &mut params);

        assert_eq!(result, 0);
        assert_eq!(params.rgrc[0], Rect::new(-32000, -32000, -31000, -31000));
    }

    #[test]
    fn only_latest_autohide_callback_relayouts() {
        let h = Harness::new();
        let appbar = Rc::new(FixedAppbar::new(AutohideEdges::NONE));
        h.handler.set_appbar_query(appbar.clone());

        h.handler.appbar_autohide_edges(MonitorId(1));
        let stale = appbar.last_callback.borrow_mut().take();
        h.handler.appbar_autohide_edges(MonitorId(1));

        if let Some(stale) = stale {
            stale();
        }
        assert!(h.native.window_pos_calls().is_empty());

        appbar.fire_changed();
        assert_eq!(
            h.native.window_pos_calls(),
            vec![(Some(Rect::new(100, 100, 500, 400)), SWP_FRAMECHANGED)]
        );
    }

    #[test]
    fn region_reinstalled_only_when_shape_changes() {
        let h = Harness::new();
        h.delegate.custom_frame.set(true);
        let mask = Region::from_rects(vec![Rect::new(0, 0, 400, 300)]);
        *h.delegate.window_mask.borrow_mut() = Some(mask.clone());

        h.handler.reset_window_region(false, true);
        *h.delegate.window_mask.borrow_mut() =
            Some(Region::from_rects(vec![Rect::new(0, 0, 400, 300), Rect::default()]));
        h.handler.reset_window_region(false, true);

        let installs = h
            .native
            .count_calls(|c| matches!(c, NativeCall::SetWindowRegion(..)));
        assert_eq!(installs, 1);
        assert_eq!(h.native.window_region(), Some(mask));
    }

    #[test]
    fn maximized_region_is_work_area_in_window_coordinates() {
        let h = Harness::new();
        h.delegate.custom_frame.set(true);
        h.native.maximized.set(true);

        h.handler.reset_window_region(false, false);

        assert_eq!(
            h.native.window_region(),
            Some(Region::from_rect(Rect::new(-100, -100, 1820, 940)))
        );
    }

    #[test]
    fn native_frame_region_cleared_only_when_forced() {
        let h = Harness::new();

        h.handler.reset_window_region(false, true);
        assert!(h.native.calls().is_empty());

        h.handler.reset_window_region(true, true);
        assert_eq!(h.native.calls(), vec![NativeCall::SetWindowRegion(None, true)]);
    }

    #[test]
    fn explicit_region_overrides_mask() {
        let h = Harness::new();
        let region = Region::from_rect(Rect::new(10, 10, 50, 50));

        h.handler.set_region(Some(region.clone()));

        assert_eq!(
            h.native.calls(),
            vec![NativeCall::SetWindowRegion(Some(region), true)]
        );
    }

    #[test]
    fn nc_paint_reports_dirty_area_in_window_coordinates() {
        let h = Harness::new();
        h.delegate.custom_frame.set(true);
        h.delegate.root_view_size.set(Size::new(400, 300));

        h.send(WM_NCPAINT, NCPAINT_ENTIRE_FRAME, 0);
        h.native.region_box.set(Some(Rect::new(0, 0, 200, 200)));
        h.send(WM_NCPAINT, 0x5000, 0);

        assert_eq!(
            *h.delegate.paints.borrow(),
            vec![Rect::new(0, 0, 400, 300), Rect::new(0, 0, 100, 100)]
        );
        assert_eq!(
            h.native
                .count_calls(|c| matches!(c, NativeCall::DefWindowProc(WM_NCPAINT, _, _))),
            0
        );
    }

    #[test]
    fn nc_paint_skipped_while_content_size_lags() {
        let h = Harness::new();
        h.delegate.custom_frame.set(true);
        h.delegate.root_view_size.set(Size::new(300, 300));

        h.send(WM_NCPAINT, NCPAINT_ENTIRE_FRAME, 0);

        assert!(h.delegate.paints.borrow().is_empty());
        assert!(h.native.calls().is_empty());
    }

    #[test]
    fn nc_paint_outside_window_paints_nothing() {
        let h = Harness::new();
        h.delegate.custom_frame.set(true);
        h.delegate.root_view_size.set(Size::new(400, 300));
        h.native.region_box.set(Some(Rect::new(600, 600, 700, 700)));

        h.send(WM_NCPAINT, 0x5000, 0);

        assert!(h.delegate.paints.borrow().is_empty());
    }

    #[test]
    fn custom_frame_activation_skips_default_painting() {
        let h = Harness::new();
        h.delegate.custom_frame.set(true);
        h.delegate.inactive_rendering_disabled.set(true);

        let result = h.send(WM_NCACTIVATE, 1, 0);

        assert_eq!(result, 1);
        assert_eq!(h.delegate.count("enable_inactive_rendering"), 1);
        assert_eq!(h.delegate.count("schedule_paint"), 1);
        assert!(h.native.calls().contains(&NativeCall::RedrawChildWindows));
        assert_eq!(
            h.native
                .count_calls(|c| matches!(c, NativeCall::DefWindowProc(WM_NCACTIVATE, _, _))),
            0
        );
    }

    #[test]
    fn native_frame_keeps_active_look_when_inactive_rendering_disabled() {
        let h = Harness::new();
        h.delegate.inactive_rendering_disabled.set(true);

        h.send(WM_NCACTIVATE, 0, 0);

        assert!(
            h.native
                .calls()
                .contains(&NativeCall::DefWindowProc(WM_NCACTIVATE, 1, 0))
        );
    }

    #[test]
    fn non_activatable_window_answers_true() {
        let h = Harness::new();
        h.delegate.can_activate.set(false);

        assert_eq!(h.send(WM_NCACTIVATE, 1, 0), 1);
        assert_eq!(h.delegate.count("schedule_paint"), 0);
    }

    #[test]
    fn uah_drawing_swallowed_only_with_custom_frame() {
        let h = Harness::new();
        h.send(WM_NCUAHDRAWCAPTION, 0, 0);
        assert_eq!(h.native.calls().len(), 1);

        h.native.clear_calls();
        h.delegate.custom_frame.set(true);
        h.send(WM_NCUAHDRAWFRAME, 0, 0);
        assert!(h.native.calls().is_empty());
    }

    #[test]
    fn composition_change_cycles_visibility_for_native_frame() {
        let h = Harness::new();

        h.send(WM_DWMCOMPOSITIONCHANGED, 0, 0);

        let positions = h.native.window_pos_calls();
        assert_eq!(positions.len(), 2);
        assert_ne!(positions[0].1 & SWP_HIDEWINDOW, 0);
        assert_ne!(positions[1].1 & SWP_SHOWWINDOW, 0);
        assert_eq!(h.delegate.count("frame_changed"), 1);
        assert!(h.native.calls().contains(&NativeCall::SetDwmNcRendering(true)));
        assert!(
            h.native
                .calls()
                .contains(&NativeCall::NotifyChildrenCompositionChanged)
        );
    }

    #[test]
    fn transition_waits_for_fullscreen_exit() {
        let h = Harness::new();
        h.handler.set_fullscreen(true);

        h.handler.frame_type_changed();
        assert_eq!(h.delegate.count("frame_changed"), 0);

        h.handler.set_fullscreen(false);
        assert_eq!(h.delegate.count("frame_changed"), 1);
    }

    #[test]
    fn frame_changed_request_keeps_geometry() {
        let h = Harness::new();

        h.handler.send_frame_changed();

        let positions = h.native.window_pos_calls();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].0, None);
        assert_ne!(positions[0].1 & SWP_FRAMECHANGED, 0);
        assert_ne!(positions[0].1 & SWP_NOSIZE, 0);
    }
}
