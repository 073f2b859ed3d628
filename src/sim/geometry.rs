//! Axis-aligned box collision predicates
//!
//! Movement is resolved axis by axis: callers move along X, fix up X against
//! platforms with the horizontal predicates, then do the same for Y. Nothing
//! here is swept, so a fast enough mover can skip over a thin box in one tick.
//!
//! All comparisons are inclusive: touching edges count as contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box (top-left origin, Y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(width, height))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Center point of the box
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Whether the X extents of the two boxes touch or overlap
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.right() >= other.left() && self.left() <= other.right()
    }

    /// Whether the Y extents of the two boxes touch or overlap
    #[inline]
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.bottom() >= other.top() && self.top() <= other.bottom()
    }
}

/// Standard AABB intersection test
#[inline]
pub fn boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps_x(b) && a.overlaps_y(b)
}

/// Entity's right edge crossed the box's left edge moving right
pub fn entered_from_left(prev_x: f32, bx: &Aabb, curr_x: f32, width: f32) -> bool {
    prev_x + width <= bx.left() && curr_x + width >= bx.left()
}

/// Entity's left edge crossed the box's right edge moving left
pub fn entered_from_right(prev_x: f32, bx: &Aabb, curr_x: f32, _width: f32) -> bool {
    prev_x >= bx.right() && curr_x <= bx.right()
}

/// Entity's bottom edge crossed the box's top edge moving down (landing)
pub fn entered_from_above(prev_y: f32, bx: &Aabb, curr_y: f32, height: f32) -> bool {
    prev_y + height <= bx.top() && curr_y + height >= bx.top()
}

/// Entity's top edge crossed the box's bottom edge moving up (head bump)
pub fn entered_from_below(prev_y: f32, bx: &Aabb, curr_y: f32, _height: f32) -> bool {
    prev_y >= bx.bottom() && curr_y <= bx.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> Aabb {
        Aabb::from_xywh(100.0, 500.0, 600.0, 30.0)
    }

    #[test]
    fn test_boxes_overlap() {
        let a = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(boxes_overlap(&a, &Aabb::from_xywh(5.0, 5.0, 10.0, 10.0)));
        // Touching edges count
        assert!(boxes_overlap(&a, &Aabb::from_xywh(10.0, 0.0, 10.0, 10.0)));
        assert!(!boxes_overlap(&a, &Aabb::from_xywh(10.5, 0.0, 10.0, 10.0)));
        assert!(!boxes_overlap(&a, &Aabb::from_xywh(0.0, 11.0, 10.0, 10.0)));
    }

    #[test]
    fn test_entered_from_left() {
        let p = platform();
        // Right edge moves from 95 to 105, crossing x=100
        assert!(entered_from_left(-5.0, &p, 5.0, 100.0));
        // Already past the edge last tick
        assert!(!entered_from_left(5.0, &p, 10.0, 100.0));
        // Hasn't reached it yet
        assert!(!entered_from_left(-20.0, &p, -10.0, 100.0));
    }

    #[test]
    fn test_entered_from_right() {
        let p = platform();
        assert!(entered_from_right(702.0, &p, 698.0, 100.0));
        assert!(!entered_from_right(698.0, &p, 690.0, 100.0));
    }

    #[test]
    fn test_entered_from_above() {
        let p = platform();
        // Bottom edge moves from 495 to 505
        assert!(entered_from_above(395.0, &p, 405.0, 100.0));
        // Resting exactly on top still counts as contact
        assert!(entered_from_above(400.0, &p, 400.0, 100.0));
        assert!(!entered_from_above(380.0, &p, 390.0, 100.0));
    }

    #[test]
    fn test_entered_from_below() {
        let p = platform();
        assert!(entered_from_below(535.0, &p, 528.0, 100.0));
        assert!(!entered_from_below(528.0, &p, 520.0, 100.0));
    }

    #[test]
    fn test_center() {
        let a = Aabb::from_xywh(10.0, 20.0, 100.0, 50.0);
        assert_eq!(a.center(), Vec2::new(60.0, 45.0));
    }
}
