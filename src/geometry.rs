//! Integer screen rectangles.
//!
//! Entities keep a float position for sub-pixel motion and derive one of
//! these every frame by truncation.  Edge semantics follow the usual
//! raster convention: `right = x + width`, `bottom = y + height`.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// True when the two rectangles share interior area.  Touching edges
    /// do not count, and empty rectangles never collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Point containment, half-open on the right and bottom edges.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.left() as f32
            && px < self.right() as f32
            && py >= self.top() as f32
            && py < self.bottom() as f32
    }

    /// A rectangle of the given size centred inside `self`.
    pub fn centered(&self, width: i32, height: i32) -> Rect {
        Rect::new(
            self.center_x() - width / 2,
            self.center_y() - height / 2,
            width,
            height,
        )
    }
}
