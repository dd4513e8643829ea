/*
 * Portable value types shared by the message protocol and its delegate. `Point`, `Rect`
 * and the structures in `native` use the Win32 memory layout because the message
 * parameters that carry them are pointers into OS-owned memory.
 */

/// Opaque, non-owning identifier of a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Opaque identifier of a display monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MonitorId(pub isize);

/// Opaque identifier of a native menu, as passed with `WM_INITMENU`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuHandle(pub isize);

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Edge-based rectangle with the layout of a Win32 `RECT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Shrinks every edge by the given amount; negative values grow the rectangle.
    pub fn inset(&self, horizontal: i32, vertical: i32) -> Rect {
        Rect::new(
            self.left + horizontal,
            self.top + vertical,
            self.right - horizontal,
            self.bottom - vertical,
        )
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let result = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!result.is_empty()).then_some(result)
    }

    /*
     * Moves and, if needed, shrinks this rectangle so it lies entirely within `bounds`.
     * The size is clamped first, then the origin is pulled inside.
     */
    pub fn adjust_to_fit(&self, bounds: &Rect) -> Rect {
        let width = self.width().min(bounds.width()).max(0);
        let height = self.height().min(bounds.height()).max(0);
        let left = self.left.max(bounds.left).min(bounds.right - width);
        let top = self.top.max(bounds.top).min(bounds.bottom - height);
        Rect::new(left, top, left + width, top + height)
    }
}

/// Per-edge insets applied to a client rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn uniform(thickness: i32) -> Self {
        Self::new(thickness, thickness, thickness, thickness)
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0 && self.left == 0 && self.bottom == 0 && self.right == 0
    }

    pub fn apply_to(&self, rect: &mut Rect) {
        rect.left += self.left;
        rect.top += self.top;
        rect.right -= self.right;
        rect.bottom -= self.bottom;
    }
}

/*
 * A window shape expressed as a union of rectangles in window coordinates. Two regions are
 * equal when their normalised rectangle lists are equal, which is what the region reset
 * logic uses to avoid reinstalling an identical shape.
 */
#[derive(Debug, Clone, Default)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    pub fn from_rect(rect: Rect) -> Self {
        Self::from_rects(vec![rect])
    }

    pub fn from_rects(rects: Vec<Rect>) -> Self {
        let mut rects: Vec<Rect> = rects.into_iter().filter(|r| !r.is_empty()).collect();
        rects.sort_by_key(|r| (r.top, r.left, r.bottom, r.right));
        rects.dedup();
        Self { rects }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn bounds(&self) -> Option<Rect> {
        let first = self.rects.first()?;
        Some(self.rects.iter().skip(1).fold(*first, |acc, r| {
            Rect::new(
                acc.left.min(r.left),
                acc.top.min(r.top),
                acc.right.max(r.right),
                acc.bottom.max(r.bottom),
            )
        }))
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.rects == other.rects
    }
}

impl Eq for Region {}

/// Monitor geometry in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorInfo {
    pub id: MonitorId,
    pub monitor_rect: Rect,
    pub work_area: Rect,
}

/// Screen edges carrying an auto-hide appbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AutohideEdges(u8);

impl AutohideEdges {
    pub const NONE: AutohideEdges = AutohideEdges(0);
    pub const LEFT: AutohideEdges = AutohideEdges(1 << 0);
    pub const TOP: AutohideEdges = AutohideEdges(1 << 1);
    pub const RIGHT: AutohideEdges = AutohideEdges(1 << 2);
    pub const BOTTOM: AutohideEdges = AutohideEdges(1 << 3);

    pub fn contains(self, other: AutohideEdges) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for AutohideEdges {
    type Output = AutohideEdges;

    fn bitor(self, rhs: Self) -> Self::Output {
        AutohideEdges(self.0 | rhs.0)
    }
}

/// Modality requested by the widget layer at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalType {
    None,
    Window,
}
