// quill/content/src/bezier.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Quadratic and cubic Bézier operations: evaluation, splitting, monotone
//! subdivision, bounding rects and degree conversion.

use quill_geometry::rect::RectD;
use quill_geometry::util::{self, is_unit_interior};
use quill_geometry::vector::Vector2D;

/// A quadratic Bézier curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticBezier {
    pub p0: Vector2D,
    pub p1: Vector2D,
    pub p2: Vector2D,
}

/// A cubic Bézier curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Vector2D,
    pub p1: Vector2D,
    pub p2: Vector2D,
    pub p3: Vector2D,
}

impl QuadraticBezier {
    #[inline]
    pub fn new(p0: Vector2D, p1: Vector2D, p2: Vector2D) -> QuadraticBezier {
        QuadraticBezier { p0, p1, p2 }
    }

    #[inline]
    pub fn sample(&self, t: f64) -> Vector2D {
        let u = 1.0 - t;
        self.p0 * (u * u) + self.p1 * (2.0 * u * t) + self.p2 * (t * t)
    }

    /// First derivative coefficients: `B'(t) = a * t + b`.
    #[inline]
    pub fn derivative_coefficients(&self) -> (Vector2D, Vector2D) {
        let a = (self.p0 - self.p1 * 2.0 + self.p2) * 2.0;
        let b = (self.p1 - self.p0) * 2.0;
        (a, b)
    }

    /// Splits at `t`, returning `(mid, left_control, right_control)`.
    #[inline]
    pub fn split_point(&self, t: f64) -> (Vector2D, Vector2D, Vector2D) {
        let q1 = self.p0.lerp(self.p1, t);
        let q2 = self.p1.lerp(self.p2, t);
        (q1.lerp(q2, t), q1, q2)
    }

    pub fn split(&self, t: f64) -> (QuadraticBezier, QuadraticBezier) {
        let (mid, q1, q2) = self.split_point(t);
        (QuadraticBezier::new(self.p0, q1, mid), QuadraticBezier::new(mid, q2, self.p2))
    }

    #[inline]
    pub fn is_line(&self, epsilon: f64) -> bool {
        chord_deviation(self.p0, self.p2, &[self.p1]) <= epsilon
    }

    /// Degree elevation to an exactly equivalent cubic.
    pub fn to_cubic(&self) -> CubicBezier {
        let c1 = self.p0 + (self.p1 - self.p0) * (2.0 / 3.0);
        let c2 = self.p2 + (self.p1 - self.p2) * (2.0 / 3.0);
        CubicBezier::new(self.p0, c1, c2, self.p2)
    }

    /// Splits at the axis extrema so each piece is x- and y-monotone.
    pub fn for_each_monotone<F>(&self, mut f: F)
    where
        F: FnMut(&QuadraticBezier),
    {
        let (a, b) = self.derivative_coefficients();
        let mut ts = [0.0; 2];
        let mut count = 0;
        for &(da, db) in &[(a.x, b.x), (a.y, b.y)] {
            if da != 0.0 {
                let t = -db / da;
                if is_unit_interior(t) {
                    ts[count] = t;
                    count += 1;
                }
            }
        }
        ts[..count].sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mut rest = *self;
        let mut consumed = 0.0;
        for &t in &ts[..count] {
            let local = (t - consumed) / (1.0 - consumed);
            let (left, right) = rest.split(local);
            f(&left);
            rest = right;
            consumed = t;
        }
        f(&rest);
    }
}

impl CubicBezier {
    #[inline]
    pub fn new(p0: Vector2D, p1: Vector2D, p2: Vector2D, p3: Vector2D) -> CubicBezier {
        CubicBezier { p0, p1, p2, p3 }
    }

    #[inline]
    pub fn sample(&self, t: f64) -> Vector2D {
        let u = 1.0 - t;
        self.p0 * (u * u * u) +
            self.p1 * (3.0 * u * u * t) +
            self.p2 * (3.0 * u * t * t) +
            self.p3 * (t * t * t)
    }

    /// Polynomial coefficients: `B(t) = a*t³ + b*t² + c*t + d`.
    #[inline]
    pub fn coefficients(&self) -> (Vector2D, Vector2D, Vector2D, Vector2D) {
        let a = self.p3 - self.p0 + (self.p1 - self.p2) * 3.0;
        let b = (self.p0 - self.p1 * 2.0 + self.p2) * 3.0;
        let c = (self.p1 - self.p0) * 3.0;
        (a, b, c, self.p0)
    }

    /// First derivative coefficients: `B'(t) = a*t² + b*t + c`.
    #[inline]
    pub fn derivative_coefficients(&self) -> (Vector2D, Vector2D, Vector2D) {
        let a = (self.p3 - self.p0 + (self.p1 - self.p2) * 3.0) * 3.0;
        let b = (self.p0 - self.p1 * 2.0 + self.p2) * 6.0;
        let c = (self.p1 - self.p0) * 3.0;
        (a, b, c)
    }

    pub fn split(&self, t: f64) -> (CubicBezier, CubicBezier) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        let mid = p012.lerp(p123, t);
        (CubicBezier::new(self.p0, p01, p012, mid), CubicBezier::new(mid, p123, p23, self.p3))
    }

    /// The subsegment over the parameter range `[t0, t1]`.
    pub fn extract(&self, t0: f64, t1: f64) -> CubicBezier {
        if t0 <= 0.0 {
            return self.split(t1).0;
        }
        if t1 >= 1.0 {
            return self.split(t0).1;
        }
        let right = self.split(t0).1;
        right.split((t1 - t0) / (1.0 - t0)).0
    }

    /// True when the control polygon deviates from the chord by less than
    /// `epsilon`.
    #[inline]
    pub fn is_line(&self, epsilon: f64) -> bool {
        chord_deviation(self.p0, self.p3, &[self.p1, self.p2]) <= epsilon
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.p0 == self.p1 && self.p1 == self.p2 && self.p2 == self.p3
    }

    /// Tight bounds from the endpooints plus the in-range derivative roots.
    pub fn bounding_rect(&self) -> RectD {
        let mut rect = RectD::from_points(self.p0, self.p3);
        let (a, b, c) = self.derivative_coefficients();
        for &(da, db, dc) in &[(a.x, b.x, c.x), (a.y, b.y, c.y)] {
            let mut roots = [0.0; 2];
            let count = solve_quadratic(da, db, dc, &mut roots);
            for &t in &roots[..count] {
                if is_unit_interior(t) {
                    rect = rect.union_point(self.sample(t));
                }
            }
        }
        rect
    }

    /// Parameter values of the axis extrema, sorted, interior to `(0, 1)`.
    pub fn monotone_split_params(&self) -> ([f64; 4], usize) {
        let (a, b, c) = self.derivative_coefficients();
        let mut ts = [0.0; 4];
        let mut count = 0;
        for &(da, db, dc) in &[(a.x, b.x, c.x), (a.y, b.y, c.y)] {
            let mut roots = [0.0; 2];
            let root_count = solve_quadratic(da, db, dc, &mut roots);
            for &t in &roots[..root_count] {
                if is_unit_interior(t) {
                    ts[count] = t;
                    count += 1;
                }
            }
        }
        ts[..count].sort_by(|a, b| a.partial_cmp(b).unwrap());
        (ts, count)
    }

    /// Splits at the axis extrema so each piece is x- and y-monotone.
    pub fn for_each_monotone<F>(&self, mut f: F)
    where
        F: FnMut(&CubicBezier),
    {
        let (ts, count) = self.monotone_split_params();
        let mut rest = *self;
        let mut consumed = 0.0;
        for &t in &ts[..count] {
            let local = (t - consumed) / (1.0 - consumed);
            let (left, right) = rest.split(local);
            f(&left);
            rest = right;
            consumed = t;
        }
        f(&rest);
    }

    /// Parameter values of the inflection points, interior to `(0, 1)`.
    ///
    /// Roots of `cross(B'(t), B''(t)) = 0`, which is quadratic in t.
    pub fn inflection_params(&self) -> ([f64; 2], usize) {
        let a = self.p1 - self.p0;
        let b = self.p2 - self.p1 * 2.0 + self.p0;
        let c = self.p3 - self.p2 * 3.0 + self.p1 * 3.0 - self.p0;

        let mut roots = [0.0; 2];
        let root_count = solve_quadratic(b.cross(c), a.cross(c), a.cross(b), &mut roots);

        let mut ts = [0.0; 2];
        let mut count = 0;
        for &t in &roots[..root_count] {
            if is_unit_interior(t) {
                ts[count] = t;
                count += 1;
            }
        }
        ts[..count].sort_by(|a, b| a.partial_cmp(b).unwrap());
        (ts, count)
    }

    /// Approximates the curve with quadratics whose midpoint error is within
    /// `tolerance`, splitting first at the inflection points.
    pub fn approximate_with_quadratics<F>(&self, tolerance: f64, f: &mut F)
    where
        F: FnMut(&QuadraticBezier),
    {
        let (ts, count) = self.inflection_params();
        let mut rest = *self;
        let mut consumed = 0.0;
        for &t in &ts[..count] {
            let local = (t - consumed) / (1.0 - consumed);
            let (left, right) = rest.split(local);
            left.approximate_segment_with_quadratics(tolerance, 0, f);
            rest = right;
            consumed = t;
        }
        rest.approximate_segment_with_quadratics(tolerance, 0, f);
    }

    fn approximate_segment_with_quadratics<F>(&self, tolerance: f64, depth: u8, f: &mut F)
    where
        F: FnMut(&QuadraticBezier),
    {
        // Error bound for the midpoint-rule quadratic: sqrt(3)/36 * |d|.
        let d = self.p3 - self.p2 * 3.0 + self.p1 * 3.0 - self.p0;
        let error = d.length() * (3.0f64.sqrt() / 36.0);

        if error <= tolerance || depth >= MAX_RECURSION {
            let control = ((self.p1 + self.p2) * 3.0 - self.p0 - self.p3) * 0.25;
            f(&QuadraticBezier::new(self.p0, control, self.p3));
            return;
        }

        let (left, right) = self.split(0.5);
        left.approximate_segment_with_quadratics(tolerance, depth + 1, f);
        right.approximate_segment_with_quadratics(tolerance, depth + 1, f);
    }
}

pub(crate) const MAX_RECURSION: u8 = 16;

/// Maximum distance of the given control points from the chord `p0..pn`.
fn chord_deviation(from: Vector2D, to: Vector2D, controls: &[Vector2D]) -> f64 {
    let chord = to - from;
    let len = chord.length();
    let mut max = 0.0f64;
    for &control in controls {
        let deviation = if len <= util::GEOMETRIC_EPSILON {
            (control - from).length()
        } else {
            (control - from).cross(chord).abs() / len
        };
        max = max.max(deviation);
    }
    max
}

/// Real roots of `a*t² + b*t + c = 0`. Returns the root count.
pub fn solve_quadratic(a: f64, b: f64, c: f64, roots: &mut [f64; 2]) -> usize {
    if a.abs() <= util::GEOMETRIC_EPSILON {
        if b.abs() <= util::GEOMETRIC_EPSILON {
            return 0;
        }
        roots[0] = -c / b;
        return 1;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return 0;
    }
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    roots[0] = q / a;
    roots[1] = if q == 0.0 { roots[0] } else { c / q };
    if roots[0] > roots[1] {
        roots.swap(0, 1);
    }
    2
}

/// Refines the parameter at which the axis-monotone cubic `a*t³+b*t²+c*t+d`
/// crosses the value `v`, starting from the chord estimate `t0`.
pub fn cubic_line_intersect_approx(a: f64, b: f64, c: f64, d: f64, v: f64, t0: f64) -> f64 {
    let mut t = t0;
    for _ in 0..8 {
        let f = ((a * t + b) * t + c) * t + d - v;
        let df = (3.0 * a * t + 2.0 * b) * t + c;
        if df.abs() <= util::GEOMETRIC_EPSILON {
            break;
        }
        let next = t - f / df;
        if !next.is_finite() {
            break;
        }
        t = util::clamp(next, 0.0, 1.0);
        if f.abs() <= util::GEOMETRIC_EPSILON {
            break;
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_geometry::vector::vec2d;

    fn s_curve() -> CubicBezier {
        CubicBezier::new(vec2d(0.0, 0.0), vec2d(100.0, 0.0), vec2d(0.0, 100.0), vec2d(100.0, 100.0))
    }

    #[test]
    fn test_split_continuity() {
        let curve = s_curve();
        let (left, right) = curve.split(0.3);
        assert_eq!(left.p3, right.p0);
        assert!((left.p3 - curve.sample(0.3)).length() < 1e-9);
    }

    #[test]
    fn test_extract_matches_samples() {
        let curve = s_curve();
        let piece = curve.extract(0.25, 0.75);
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            let expected = curve.sample(0.25 + t * 0.5);
            assert!((piece.sample(t) - expected).length() < 1e-9);
        }
    }

    #[test]
    fn test_monotone_pieces_are_monotone() {
        let curve = s_curve();
        curve.for_each_monotone(|piece| {
            let (a, b, c) = piece.derivative_coefficients();
            for axis in 0..2 {
                let (da, db, dc) = if axis == 0 { (a.x, b.x, c.x) } else { (a.y, b.y, c.y) };
                let mut last = dc;
                let mut sign_change = false;
                for i in 1..=16 {
                    let t = i as f64 / 16.0;
                    let v = (da * t + db) * t + dc;
                    if v * last < -1e-6 {
                        sign_change = true;
                    }
                    if v.abs() > 1e-6 {
                        last = v;
                    }
                }
                assert!(!sign_change);
            }
        });
    }

    #[test]
    fn test_inflections_of_s_curve() {
        let (_, count) = s_curve().inflection_params();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_bounding_rect_tight() {
        let curve = CubicBezier::new(vec2d(0.0, 0.0),
                                     vec2d(0.0, 100.0),
                                     vec2d(100.0, 100.0),
                                     vec2d(100.0, 0.0));
        let rect = curve.bounding_rect();
        assert!((rect.max.y - 75.0).abs() < 1e-9);
        assert_eq!(rect.min.y, 0.0);
    }

    #[test]
    fn test_quadratic_approximation_error() {
        let curve = s_curve();
        let tolerance = 0.05;
        let mut quads = vec![];
        curve.approximate_with_quadratics(tolerance, &mut |q| quads.push(*q));
        assert!(quads.len() > 1);
        // Endpoints chain up.
        for window in quads.windows(2) {
            assert!((window[0].p2 - window[1].p0).length() < 1e-9);
        }
        assert_eq!(quads.first().unwrap().p0, curve.p0);
        assert_eq!(quads.last().unwrap().p2, curve.p3);
    }

    #[test]
    fn test_is_line() {
        let line = CubicBezier::new(vec2d(0.0, 0.0), vec2d(1.0, 1.0), vec2d(2.0, 2.0), vec2d(3.0, 3.0));
        assert!(line.is_line(1e-6));
        assert!(!s_curve().is_line(1e-6));
    }
}
