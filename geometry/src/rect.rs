// quill/geometry/src/rect.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Axis-aligned rectangles, stored as min/max corners.

use crate::vector::{vec2d, vec2f, vec2i, Vector2D, Vector2F, Vector2I};

macro_rules! declare_rect {
    ($name:ident, $vector:ident, $scalar:ty) => {
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        #[repr(C)]
        pub struct $name {
            pub min: $vector,
            pub max: $vector,
        }

        impl $name {
            #[inline]
            pub fn new(min: $vector, max: $vector) -> $name {
                $name { min, max }
            }

            #[inline]
            pub fn from_points(a: $vector, b: $vector) -> $name {
                $name { min: a.min(b), max: a.max(b) }
            }

            #[inline]
            pub fn origin(&self) -> $vector {
                self.min
            }

            #[inline]
            pub fn size(&self) -> $vector {
                self.max - self.min
            }

            #[inline]
            pub fn width(&self) -> $scalar {
                self.max.x - self.min.x
            }

            #[inline]
            pub fn height(&self) -> $scalar {
                self.max.y - self.min.y
            }

            #[inline]
            pub fn is_empty(&self) -> bool {
                self.max.x <= self.min.x || self.max.y <= self.min.y
            }

            #[inline]
            pub fn contains_point(&self, p: $vector) -> bool {
                p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
            }

            #[inline]
            pub fn contains_rect(&self, other: &$name) -> bool {
                self.min.x <= other.min.x && self.min.y <= other.min.y &&
                    self.max.x >= other.max.x && self.max.y >= other.max.y
            }

            #[inline]
            pub fn intersects(&self, other: &$name) -> bool {
                self.min.x < other.max.x && other.min.x < self.max.x &&
                    self.min.y < other.max.y && other.min.y < self.max.y
            }

            #[inline]
            pub fn intersection(&self, other: &$name) -> Option<$name> {
                let result = $name { min: self.min.max(other.min), max: self.max.min(other.max) };
                if result.is_empty() {
                    None
                } else {
                    Some(result)
                }
            }

            #[inline]
            pub fn union_rect(&self, other: &$name) -> $name {
                $name { min: self.min.min(other.min), max: self.max.max(other.max) }
            }

            #[inline]
            pub fn union_point(&self, p: $vector) -> $name {
                $name { min: self.min.min(p), max: self.max.max(p) }
            }
        }
    };
}

declare_rect!(RectF, Vector2F, f32);
declare_rect!(RectD, Vector2D, f64);
declare_rect!(RectI, Vector2I, i32);

macro_rules! impl_rect_float {
    ($name:ident, $vector:ident, $scalar:ty) => {
        impl $name {
            #[inline]
            pub fn area(&self) -> $scalar {
                if self.is_empty() {
                    0.0
                } else {
                    self.width() * self.height()
                }
            }

            #[inline]
            pub fn center(&self) -> $vector {
                (self.min + self.max) * 0.5
            }

            /// Grows the rect by `amount` on every side.
            #[inline]
            pub fn dilate(&self, amount: $scalar) -> $name {
                $name {
                    min: self.min - $vector::splat(amount),
                    max: self.max + $vector::splat(amount),
                }
            }

            /// Shrinks the rect by `amount` on every side.
            #[inline]
            pub fn contract(&self, amount: $scalar) -> $name {
                self.dilate(-amount)
            }

            #[inline]
            pub fn intersection_area(&self, other: &$name) -> $scalar {
                match self.intersection(other) {
                    Some(rect) => rect.area(),
                    None => 0.0,
                }
            }
        }
    };
}

impl_rect_float!(RectF, Vector2F, f32);
impl_rect_float!(RectD, Vector2D, f64);

impl RectF {
    #[inline]
    pub fn to_f64(&self) -> RectD {
        RectD::new(self.min.to_f64(), self.max.to_f64())
    }
}

impl RectD {
    #[inline]
    pub fn to_f32(&self) -> RectF {
        RectF::new(self.min.to_f32(), self.max.to_f32())
    }

    /// The smallest integer rect containing `self`.
    #[inline]
    pub fn round_out(&self) -> RectI {
        RectI::new(self.min.floor().to_i32(), self.max.ceil().to_i32())
    }
}

impl RectI {
    #[inline]
    pub fn to_f32(&self) -> RectF {
        RectF::new(self.min.to_f32(), self.max.to_f32())
    }

    #[inline]
    pub fn to_f64(&self) -> RectD {
        RectD::new(self.min.to_f64(), self.max.to_f64())
    }

    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.size().area()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let a = RectD::new(vec2d(0.0, 0.0), vec2d(10.0, 10.0));
        let b = RectD::new(vec2d(5.0, 5.0), vec2d(20.0, 20.0));
        let i = a.intersection(&b).unwrap();
        assert_eq!(i, RectD::new(vec2d(5.0, 5.0), vec2d(10.0, 10.0)));
        assert!(a.intersection(&RectD::new(vec2d(11.0, 0.0), vec2d(12.0, 1.0))).is_none());
    }

    #[test]
    fn test_round_out() {
        let r = RectD::new(vec2d(-0.5, 0.5), vec2d(1.2, 2.0));
        assert_eq!(r.round_out(), RectI::new(vec2i(-1, 0), vec2i(2, 2)));
    }

    #[test]
    fn test_float_helpers() {
        let _ = RectF::new(vec2f(0.0, 0.0), vec2f(1.0, 1.0)).area();
    }
}
