// quill/content/src/cubic_path.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Monotone cubic paths, the tiler's input representation.

use crate::bezier::{cubic_line_intersect_approx, CubicBezier};
use quill_geometry::rect::RectD;
use quill_geometry::util::GEOMETRIC_EPSILON;
use quill_geometry::vector::Vector2D;

/// A series of control points connected by cubic curves, where every four
/// consecutive points define one cubic whose x and y components are each
/// monotone over `[0, 1]`.
///
/// The last control point of a curve is the first control point of the next
/// one, so `points.len() % 3 == 1` whenever the path is nonempty. Linear
/// segments are encoded as cubics with `p1 == p2 == p3`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CubicPath {
    pub points: Vec<Vector2D>,
}

impl CubicPath {
    #[inline]
    pub fn new() -> CubicPath {
        CubicPath::default()
    }

    /// A path with fewer than one whole curve is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 4
    }

    /// The number of curves in the path.
    #[inline]
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.points.len() - 1) / 3
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.points.first() == self.points.last()
    }

    #[inline]
    pub fn curve(&self, index: usize) -> CubicBezier {
        let i = index * 3;
        CubicBezier::new(self.points[i], self.points[i + 1], self.points[i + 2], self.points[i + 3])
    }

    pub fn approx_bounding_rect(&self) -> RectD {
        if self.points.is_empty() {
            return RectD::default();
        }
        let mut rect = RectD::from_points(self.points[0], self.points[0]);
        for &p in &self.points[1..] {
            rect = rect.union_point(p);
        }
        rect
    }

    pub fn bounding_rect(&self) -> RectD {
        if self.is_empty() {
            return RectD::default();
        }
        let mut rect = RectD::from_points(self.points[0], self.points[0]);
        for index in 0..self.len() {
            // Monotone curves are bounded by their endpoints.
            rect = rect.union_point(self.points[index * 3]).union_point(self.points[index * 3 + 3]);
        }
        rect
    }

    /// Moves the cursor. On a nonempty path this rewrites the trailing point
    /// (collapsing a trailing degenerate line) rather than starting a new
    /// subpath; see [`CubicMultipath`] for multiple subpaths.
    pub fn move_to(&mut self, p: Vector2D) {
        let n = self.points.len();
        if n == 0 {
            self.points.push(p);
        } else if n > 2 &&
            self.points[n - 2] == self.points[n - 1] &&
            self.points[n - 3] == self.points[n - 1]
        {
            self.points[n - 3] = p;
            self.points[n - 2] = p;
            self.points[n - 1] = p;
        } else {
            self.points[n - 1] = p;
        }
    }

    pub fn line_to(&mut self, p: Vector2D) {
        if self.points.is_empty() {
            self.move_to(p);
        } else if *self.points.last().unwrap() != p {
            self.points.extend_from_slice(&[p, p, p]);
        }
    }

    pub fn quadratic_to(&mut self, p1: Vector2D, p2: Vector2D) {
        debug_assert!(!self.points.is_empty(), "can't add a curve to an empty path");
        let p0 = *self.points.last().unwrap();
        let c1 = p0 + (p1 - p0) * (2.0 / 3.0);
        let c2 = p2 + (p1 - p2) * (2.0 / 3.0);
        self.cubic_to(c1, c2, p2);
    }

    /// Appends a cubic, splitting it at its axis extrema so the stored pieces
    /// are monotone.
    pub fn cubic_to(&mut self, p1: Vector2D, p2: Vector2D, p3: Vector2D) {
        debug_assert!(!self.points.is_empty(), "can't add a curve to an empty path");
        let p0 = *self.points.last().unwrap();
        let curve = CubicBezier::new(p0, p1, p2, p3);
        if curve.is_point() {
            return;
        }
        if curve.is_line(GEOMETRIC_EPSILON) {
            self.line_to(p3);
            return;
        }
        let points = &mut self.points;
        curve.for_each_monotone(|piece| {
            points.extend_from_slice(&[piece.p1, piece.p2, piece.p3]);
        });
    }

    /// Appends a cubic known to already be monotone.
    #[inline]
    pub fn cubic_to_monotone(&mut self, p1: Vector2D, p2: Vector2D, p3: Vector2D) {
        debug_assert!(!self.points.is_empty(), "can't add a curve to an empty path");
        self.points.extend_from_slice(&[p1, p2, p3]);
    }

    /// Forces the path closed with a line if needed.
    pub fn close(&mut self) {
        if !self.is_empty() && !self.is_closed() {
            let first = self.points[0];
            self.line_to(first);
        }
    }

    /// The signed winding number of `p`, positive for clockwise winding in
    /// the y-down coordinate system. Crossings on a curve's minimum-y end
    /// count; crossings on its maximum-y end do not.
    pub fn winding_of(&self, p: Vector2D) -> i32 {
        let mut winding = 0;
        for index in 0..self.len() {
            winding += curve_ray_crossing(&self.curve(index), p);
        }
        winding
    }
}

/// The signed crossing of the leftward horizontal ray from `p` with one
/// monotone curve.
pub(crate) fn curve_ray_crossing(curve: &CubicBezier, p: Vector2D) -> i32 {
    let (y0, y3) = (curve.p0.y, curve.p3.y);
    if y0 == y3 {
        return 0;
    }

    let (y_min, y_max, sign) = if y3 > y0 { (y0, y3, -1) } else { (y3, y0, 1) };
    if p.y < y_min || p.y >= y_max {
        return 0;
    }

    let x = monotone_x_at_y(curve, p.y);
    if x < p.x {
        sign
    } else {
        0
    }
}

/// The x-coordinate at which a y-monotone curve crosses the horizontal line
/// at `y`.
pub fn monotone_x_at_y(curve: &CubicBezier, y: f64) -> f64 {
    if curve.is_line(GEOMETRIC_EPSILON) {
        let t = (y - curve.p0.y) / (curve.p3.y - curve.p0.y);
        return quill_geometry::util::lerp(curve.p0.x, curve.p3.x, t);
    }
    let (a, b, c, d) = curve.coefficients();
    let t0 = (y - curve.p0.y) / (curve.p3.y - curve.p0.y);
    let t = cubic_line_intersect_approx(a.y, b.y, c.y, d.y, y, t0);
    curve.sample(t).x
}

/// A cubic path with multiple subpaths, tracked through their start indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CubicMultipath {
    pub path: CubicPath,
    pub starts: Vec<usize>,
}

impl CubicMultipath {
    #[inline]
    pub fn new() -> CubicMultipath {
        CubicMultipath::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Starts a new subpath at `p`.
    pub fn move_to(&mut self, p: Vector2D) {
        self.starts.push(self.path.points.len());
        self.path.points.push(p);
    }

    /// Appends a whole cubic path as a new subpath.
    pub fn push_subpath(&mut self, subpath: &CubicPath) {
        if subpath.is_empty() {
            return;
        }
        self.starts.push(self.path.points.len());
        self.path.points.extend_from_slice(&subpath.points);
    }

    /// Iterates the subpaths as point ranges.
    pub fn subpath_ranges<'a>(&'a self) -> impl Iterator<Item = std::ops::Range<usize>> + 'a {
        let point_count = self.path.points.len();
        self.starts.iter().enumerate().map(move |(i, &start)| {
            let end = self.starts.get(i + 1).cloned().unwrap_or(point_count);
            start..end
        })
    }

    pub fn winding_of(&self, p: Vector2D) -> i32 {
        let mut winding = 0;
        for range in self.subpath_ranges() {
            let points = &self.path.points[range];
            let mut i = 0;
            while i + 3 < points.len() {
                let curve =
                    CubicBezier::new(points[i], points[i + 1], points[i + 2], points[i + 3]);
                winding += curve_ray_crossing(&curve, p);
                i += 3;
            }
        }
        winding
    }
}

impl From<CubicPath> for CubicMultipath {
    fn from(path: CubicPath) -> CubicMultipath {
        let starts = if path.is_empty() { vec![] } else { vec![0] };
        CubicMultipath { path, starts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_geometry::vector::vec2d;

    fn unit_square() -> CubicPath {
        let mut path = CubicPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.line_to(vec2d(10.0, 0.0));
        path.line_to(vec2d(10.0, 10.0));
        path.line_to(vec2d(0.0, 10.0));
        path.close();
        path
    }

    #[test]
    fn test_point_count_invariant() {
        let mut path = CubicPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.cubic_to(vec2d(30.0, -50.0), vec2d(60.0, 50.0), vec2d(90.0, 0.0));
        path.line_to(vec2d(100.0, 10.0));
        assert_eq!(path.points.len() % 3, 1);
    }

    #[test]
    fn test_square_winding() {
        let path = unit_square();
        assert_eq!(path.winding_of(vec2d(5.0, 5.0)).abs(), 1);
        assert_eq!(path.winding_of(vec2d(15.0, 5.0)), 0);
        assert_eq!(path.winding_of(vec2d(-5.0, 5.0)), 0);
    }

    #[test]
    fn test_curve_winding() {
        let mut path = CubicPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.cubic_to(vec2d(0.0, 60.0), vec2d(100.0, 60.0), vec2d(100.0, 0.0));
        path.close();
        assert_eq!(path.winding_of(vec2d(50.0, 20.0)).abs(), 1);
        assert_eq!(path.winding_of(vec2d(50.0, 50.0)), 0);
        assert_eq!(path.winding_of(vec2d(50.0, -1.0)), 0);
    }

    #[test]
    fn test_multipath_winding_adds() {
        let mut multi = CubicMultipath::new();
        multi.push_subpath(&unit_square());
        let mut inner = CubicPath::new();
        inner.move_to(vec2d(2.0, 2.0));
        inner.line_to(vec2d(8.0, 2.0));
        inner.line_to(vec2d(8.0, 8.0));
        inner.line_to(vec2d(2.0, 8.0));
        inner.close();
        multi.push_subpath(&inner);
        assert_eq!(multi.winding_of(vec2d(5.0, 5.0)).abs(), 2);
    }

    #[test]
    fn test_degenerate_cubic_collapses_to_line() {
        let mut path = CubicPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.cubic_to(vec2d(1.0, 1.0), vec2d(2.0, 2.0), vec2d(3.0, 3.0));
        // Stored as a line: p1 == p2 == p3.
        assert_eq!(path.points.len(), 4);
        assert_eq!(path.points[1], path.points[3]);
    }
}
