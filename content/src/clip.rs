// quill/content/src/clip.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Monotone cubic path clipping against an axis-aligned rect.
//!
//! Because every stored curve is x- and y-monotone, a curve crosses each cut
//! line at most once, and only the endpoints need to be classified. The kept
//! piece is reconnected along the boundary with a single line.

use crate::bezier::cubic_line_intersect_approx;
use crate::cubic_path::CubicPath;
use quill_geometry::rect::RectD;
use quill_geometry::util::{clamp, is_almost_zero_or_one, GEOMETRIC_EPSILON};
use quill_geometry::vector::{vec2d, Vector2D};

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    X,
    Y,
}

#[inline]
fn coord(p: Vector2D, axis: Axis) -> f64 {
    match axis {
        Axis::X => p.x,
        Axis::Y => p.y,
    }
}

#[inline]
fn on_line(value: f64, other: f64, axis: Axis) -> Vector2D {
    match axis {
        Axis::X => vec2d(value, other),
        Axis::Y => vec2d(other, value),
    }
}

/// Keeps the part of the path with `x >= value`.
pub fn clip_to_left(path: &mut CubicPath, value: f64) {
    clip_axis(path, value, Axis::X, true)
}

/// Keeps the part of the path with `x <= value`.
pub fn clip_to_right(path: &mut CubicPath, value: f64) {
    clip_axis(path, value, Axis::X, false)
}

/// Keeps the part of the path with `y >= value`.
pub fn clip_to_top(path: &mut CubicPath, value: f64) {
    clip_axis(path, value, Axis::Y, true)
}

/// Keeps the part of the path with `y <= value`.
pub fn clip_to_bottom(path: &mut CubicPath, value: f64) {
    clip_axis(path, value, Axis::Y, false)
}

/// Clips the path to the rect, one side at a time.
pub fn clip(path: &mut CubicPath, rect: &RectD) {
    clip_to_left(path, rect.min.x);
    clip_to_right(path, rect.max.x);
    clip_to_top(path, rect.min.y);
    clip_to_bottom(path, rect.max.y);
}

fn clip_axis(path: &mut CubicPath, value: f64, axis: Axis, keep_greater: bool) {
    if path.is_empty() {
        return;
    }

    let outside = |c: f64| if keep_greater { c < value } else { c > value };

    let mut new_path = CubicPath::new();
    new_path.points.reserve(path.points.len());

    for index in 0..path.len() {
        let curve = path.curve(index);
        let (c0, c3) = (coord(curve.p0, axis), coord(curve.p3, axis));
        let linear = curve.is_line(GEOMETRIC_EPSILON);

        if outside(c0) {
            if !outside(c3) && c3 != value {
                // Entering: keep the trailing piece, connected along the cut.
                let t0 = clamp((value - c0) / (c3 - c0), 0.0, 1.0);
                if linear {
                    let other = entry_coordinate(&curve, t0, axis);
                    new_path.line_to(on_line(value, other, axis));
                    new_path.line_to(curve.p3);
                } else {
                    let t = refine_crossing(&curve, value, t0, axis);
                    let piece = curve.extract(t, 1.0);
                    new_path.line_to(on_line(value, coord_other(piece.p0, axis), axis));
                    new_path.cubic_to_monotone(piece.p1, piece.p2, piece.p3);
                }
            }
        } else {
            if new_path.points.last() != Some(&curve.p0) {
                new_path.line_to(curve.p0);
            }

            if outside(c3) {
                // Exiting: keep the leading piece up to the cut.
                let t0 = clamp((value - c0) / (c3 - c0), 0.0, 1.0);
                if linear {
                    let other = entry_coordinate(&curve, t0, axis);
                    new_path.line_to(on_line(value, other, axis));
                } else {
                    let t = refine_crossing(&curve, value, t0, axis);
                    let piece = curve.extract(0.0, t);
                    new_path.cubic_to_monotone(piece.p1, piece.p2, piece.p3);
                }
            } else {
                new_path.cubic_to_monotone(curve.p1, curve.p2, curve.p3);
            }
        }
    }

    if !new_path.is_empty() && new_path.points.first() != new_path.points.last() {
        let first = new_path.points[0];
        new_path.line_to(first);
    }

    *path = new_path;
}

#[inline]
fn coord_other(p: Vector2D, axis: Axis) -> f64 {
    match axis {
        Axis::X => p.y,
        Axis::Y => p.x,
    }
}

#[inline]
fn entry_coordinate(curve: &crate::bezier::CubicBezier, t: f64, axis: Axis) -> f64 {
    match axis {
        Axis::X => quill_geometry::util::lerp(curve.p0.y, curve.p3.y, t),
        Axis::Y => quill_geometry::util::lerp(curve.p0.x, curve.p3.x, t),
    }
}

fn refine_crossing(curve: &crate::bezier::CubicBezier, value: f64, t0: f64, axis: Axis) -> f64 {
    if is_almost_zero_or_one(t0) {
        return t0;
    }
    let (a, b, c, d) = curve.coefficients();
    match axis {
        Axis::X => cubic_line_intersect_approx(a.x, b.x, c.x, d.x, value, t0),
        Axis::Y => cubic_line_intersect_approx(a.y, b.y, c.y, d.y, value, t0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> CubicPath {
        let mut path = CubicPath::new();
        path.move_to(vec2d(x0, y0));
        path.line_to(vec2d(x1, y0));
        path.line_to(vec2d(x1, y1));
        path.line_to(vec2d(x0, y1));
        path.close();
        path
    }

    #[test]
    fn test_clip_square() {
        let mut path = square(0.0, 0.0, 10.0, 10.0);
        clip(&mut path, &RectD::new(vec2d(5.0, 5.0), vec2d(20.0, 20.0)));
        assert!(path.is_closed());
        let rect = path.bounding_rect();
        assert_eq!(rect, RectD::new(vec2d(5.0, 5.0), vec2d(10.0, 10.0)));
    }

    #[test]
    fn test_clip_away_everything() {
        let mut path = square(0.0, 0.0, 10.0, 10.0);
        clip(&mut path, &RectD::new(vec2d(20.0, 20.0), vec2d(30.0, 30.0)));
        // Only the degenerate boundary remnant may remain; it covers nothing.
        let rect = path.bounding_rect();
        assert!(rect.area() == 0.0 || path.is_empty());
    }

    #[test]
    fn test_clip_preserves_contained_path() {
        let mut path = square(2.0, 2.0, 8.0, 8.0);
        let original = path.clone();
        clip(&mut path, &RectD::new(vec2d(0.0, 0.0), vec2d(10.0, 10.0)));
        assert_eq!(path, original);
    }

    #[test]
    fn test_clip_idempotent() {
        let mut path = CubicPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.cubic_to(vec2d(30.0, -40.0), vec2d(60.0, 40.0), vec2d(90.0, 0.0));
        path.line_to(vec2d(45.0, 60.0));
        path.close();

        let rect = RectD::new(vec2d(10.0, -10.0), vec2d(80.0, 30.0));
        let mut once = path.clone();
        clip(&mut once, &rect);
        let mut twice = once.clone();
        clip(&mut twice, &rect);

        assert_eq!(once.points.len(), twice.points.len());
        for (a, b) in once.points.iter().zip(twice.points.iter()) {
            assert!((*a - *b).length() < 1e-6);
        }
    }

    #[test]
    fn test_clip_winding_preserved_inside() {
        let mut path = square(0.0, 0.0, 10.0, 10.0);
        clip(&mut path, &RectD::new(vec2d(2.0, 2.0), vec2d(8.0, 8.0)));
        assert_eq!(path.winding_of(vec2d(5.0, 5.0)).abs(), 1);
        assert_eq!(path.winding_of(vec2d(9.0, 5.0)), 0);
    }

    #[test]
    fn test_curve_crossing_lies_on_cut() {
        let mut path = CubicPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.cubic_to(vec2d(10.0, 30.0), vec2d(30.0, 30.0), vec2d(40.0, 0.0));
        path.close();

        clip_to_bottom(&mut path, 20.0);
        // Every remaining point is at or below the cut.
        for p in &path.points {
            assert!(p.y <= 20.0 + 1e-6);
        }
        // The cut produced points exactly on the boundary.
        assert!(path.points.iter().any(|p| (p.y - 20.0).abs() < 1e-3));
    }
}
