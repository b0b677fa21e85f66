//! Integer screen geometry used by every entity.
//!
//! World coordinates are arena pixels (1600 x 900 by default), origin at the
//! top-left, y growing downward.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0, y: 0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1, y: 0 };
    pub const LEFT: Vec2 = Vec2 { x: -1, y: 0 };
    pub const UP: Vec2 = Vec2 { x: 0, y: -1 };
    pub const DOWN: Vec2 = Vec2 { x: 0, y: 1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Vec2 { x, y }
    }

    pub fn scaled(self, k: i32) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }

    pub fn is_zero(self) -> bool {
        self == Vec2::ZERO
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Axis-aligned rectangle stored as top-left corner plus size.
///
/// Edge setters move the rectangle without resizing it, so
/// `r.set_right(0)` leaves `r.width` untouched and shifts `r.x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    /// Build from `(left, top, right, bottom)` edges.
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn centered_at(center: Vec2, width: i32, height: i32) -> Self {
        let mut r = Rect::new(0, 0, width, height);
        r.set_center(center);
        r
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.width;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.height;
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.width / 2;
        self.y = center.y - self.height / 2;
    }

    pub fn translate(&mut self, by: Vec2) {
        self.x += by.x;
        self.y += by.y;
    }

    /// Strict overlap test: rectangles that only share an edge do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Push this rectangle inside `bounds`, one edge at a time
    /// (left, top, right, bottom).
    pub fn clamp_into(&mut self, bounds: &Rect) {
        let (min_x, min_y, max_x, max_y) =
            (bounds.left(), bounds.top(), bounds.right(), bounds.bottom());
        self.set_left(min_x.max(self.left().min(max_x)));
        self.set_top(min_y.max(self.top().min(max_y)));
        self.set_right(max_x.min(self.right().max(min_x)));
        self.set_bottom(max_y.min(self.bottom().max(min_y)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_roundtrips_for_even_sizes() {
        let r = Rect::centered_at(Vec2::new(100, 200), 40, 40);
        assert_eq!(r.left(), 80);
        assert_eq!(r.top(), 180);
        assert_eq!(r.center(), Vec2::new(100, 200));
    }

    #[test]
    fn edge_setters_keep_size() {
        let mut r = Rect::new(10, 10, 30, 20);
        r.set_right(0);
        assert_eq!(r.left(), -30);
        assert_eq!(r.width, 30);
        r.set_bottom(0);
        assert_eq!(r.top(), -20);
        assert_eq!(r.height, 20);
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        let c = Rect::new(9, 9, 10, 10);
        assert!(a.intersects(&c));
    }

    #[test]
    fn clamp_pulls_rect_back_inside() {
        let bounds = Rect::from_edges(0, 500, 1600, 900);
        let mut r = Rect::new(-50, 480, 100, 100);
        r.clamp_into(&bounds);
        assert_eq!((r.left(), r.top()), (0, 500));

        let mut r = Rect::new(1580, 850, 100, 100);
        r.clamp_into(&bounds);
        assert_eq!((r.right(), r.bottom()), (1600, 900));
        assert!(bounds.contains_rect(&r));
    }
}
