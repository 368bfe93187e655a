/// Axis-aligned rectangle in logical pixels. `x`/`y` is the top-left corner;
/// `right()`/`bottom()` are exclusive edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn center(&self) -> (i32, i32) {
        (self.center_x(), self.center_y())
    }

    pub fn mid_top(&self) -> (i32, i32) {
        (self.center_x(), self.top())
    }

    pub fn mid_bottom(&self) -> (i32, i32) {
        (self.center_x(), self.bottom())
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_center_x(&mut self, cx: i32) {
        self.x = cx - self.w / 2;
    }

    pub fn set_center(&mut self, (cx, cy): (i32, i32)) {
        self.x = cx - self.w / 2;
        self.y = cy - self.h / 2;
    }

    pub fn set_mid_top(&mut self, (cx, top): (i32, i32)) {
        self.x = cx - self.w / 2;
        self.y = top;
    }

    pub fn set_mid_bottom(&mut self, (cx, bottom): (i32, i32)) {
        self.x = cx - self.w / 2;
        self.y = bottom - self.h;
    }

    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }

    /// Strict overlap: rects that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}
