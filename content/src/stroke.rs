// quill/content/src/stroke.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stroke-to-fill conversion.
//!
//! Both offsets of every quadratic segment are built in one pass. A segment
//! is first decomposed at the parameters where the tangent turns more than a
//! quarter revolution for the given radius (the cusp guard), then each piece
//! is offset with an error-bounded subdivision loop. The two sides are joined
//! per segment and capped at the ends, producing closed fill contours.

use crate::bezier::QuadraticBezier;
use crate::quadratic_path::QuadraticPath;
use quill_geometry::util::{is_unit_interior, GEOMETRIC_EPSILON};
use quill_geometry::vector::{vec2d, Vector2D};
use std::f64::consts::PI;

/// How the ends of an open stroke are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Square,
    Round,
}

/// How the corners of a stroke are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Bevel,
    Round,
}

/// Geometric stroke parameters, paint excluded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
}

impl StrokeStyle {
    #[inline]
    pub fn new(width: f64) -> StrokeStyle {
        StrokeStyle { width, cap: LineCap::Butt, join: LineJoin::Miter, miter_limit: 10.0 }
    }
}

impl Default for StrokeStyle {
    #[inline]
    fn default() -> StrokeStyle {
        StrokeStyle::new(1.0)
    }
}

struct StrokeOutline {
    inner: QuadraticPath,
    outer: QuadraticPath,
}

/// Strokes the path into closed fill contours. Open paths produce one
/// contour; closed paths produce an outer and a reversed inner ring.
pub fn stroke_to_fill(path: &QuadraticPath,
                      style: &StrokeStyle,
                      tolerance: f64)
                      -> Vec<QuadraticPath> {
    let radius = style.width * 0.5;
    if radius <= 0.0 {
        return vec![];
    }

    if path.points.len() == 1 ||
        (path.len() == 1 && path.curve(0).p0 == path.curve(0).p2 &&
             path.curve(0).p0 == path.curve(0).p1)
    {
        return stroke_point(path.points[0], radius, style.cap);
    }
    if path.is_empty() {
        return vec![];
    }

    let closed = path.is_closed();
    let inv_miter_limit = 1.0 / style.miter_limit;

    let mut outline = StrokeOutline { inner: QuadraticPath::new(), outer: QuadraticPath::new() };

    let first_n = segment_start_normal(&path.curve(0));
    outline.inner.move_to(path.curve(0).p0 - first_n * radius);
    outline.outer.move_to(path.curve(0).p0 + first_n * radius);

    let mut last_n = first_n;
    for index in 0..path.len() {
        let curve = path.curve(index);
        let start_n = segment_start_normal(&curve);

        if index != 0 {
            let pivot = curve.p0;
            let inner_start = pivot - start_n * radius;
            let outer_start = pivot + start_n * radius;
            let inner_from = *outline.inner.points.last().unwrap();
            let outer_from = *outline.outer.points.last().unwrap();
            add_join(inner_from, inner_start, pivot, -last_n, -start_n, radius, inv_miter_limit,
                     style.join, &mut outline.inner, true);
            add_join(outer_from, outer_start, pivot, last_n, start_n, radius, inv_miter_limit,
                     style.join, &mut outline.outer, false);
        }

        if curve.p1 == curve.p2 || curve.is_line(GEOMETRIC_EPSILON) {
            let nr = start_n * radius;
            outline.inner.line_to(curve.p2 - nr);
            outline.outer.line_to(curve.p2 + nr);
            last_n = start_n;
        } else {
            last_n = offset_quadratic(&curve, radius, tolerance, &mut outline);
        }
    }

    if closed {
        // Wrap the closing join, then emit the two rings separately; the
        // inner one reversed so its winding cancels the interior.
        let pivot = path.curve(0).p0;
        add_join(*outline.inner.points.last().unwrap(), pivot - first_n * radius, pivot,
                 -last_n, -first_n, radius, inv_miter_limit, style.join, &mut outline.inner, true);
        add_join(*outline.outer.points.last().unwrap(), pivot + first_n * radius, pivot,
                 last_n, first_n, radius, inv_miter_limit, style.join, &mut outline.outer, false);
        outline.outer.close();
        outline.inner.points.reverse();
        outline.inner.close();
        return vec![outline.outer, outline.inner];
    }

    // Open: outer forward, end cap, inner backward, start cap.
    let mut fill = outline.outer;
    let end = *path.points.last().unwrap();
    let end_dir = vec2d(last_n.y, -last_n.x);
    add_cap(*fill.points.last().unwrap(),
            *outline.inner.points.last().unwrap(),
            end,
            end_dir,
            radius,
            style.cap,
            &mut fill);

    for &p in outline.inner.points.iter().rev().skip(1) {
        fill.points.push(p);
    }
    if outline.inner.points.len() % 2 == 0 {
        // Keep the curve framing intact after splicing the reversed side.
        warn!("stroke outline splice produced an unframed point count");
    }

    let start = path.points[0];
    let start_dir = vec2d(-first_n.y, first_n.x);
    add_cap(*fill.points.last().unwrap(),
            start + first_n * radius,
            start,
            start_dir,
            radius,
            style.cap,
            &mut fill);
    fill.close();

    vec![fill]
}

/// The degenerate stroke of a single point.
fn stroke_point(p: Vector2D, radius: f64, cap: LineCap) -> Vec<QuadraticPath> {
    match cap {
        LineCap::Butt => vec![],
        LineCap::Square => {
            let mut fill = QuadraticPath::new();
            fill.move_to(p + vec2d(-radius, -radius));
            fill.line_to(p + vec2d(radius, -radius));
            fill.line_to(p + vec2d(radius, radius));
            fill.line_to(p + vec2d(-radius, radius));
            fill.close();
            vec![fill]
        }
        LineCap::Round => {
            let mut fill = QuadraticPath::new();
            fill.move_to(p + vec2d(radius, 0.0));
            push_arc(&mut fill, p, radius, 0.0, 2.0 * PI);
            fill.close();
            vec![fill]
        }
    }
}

fn segment_start_normal(curve: &QuadraticBezier) -> Vector2D {
    if (curve.p1 - curve.p0).square_length() > GEOMETRIC_EPSILON {
        curve.p0.normal_toward(curve.p1)
    } else {
        curve.p0.normal_toward(curve.p2)
    }
}

/// Offsets one quadratic on both sides, decomposing at the cusp-guard roots
/// of the radius-dependent quadratic in t first. Returns the end normal.
fn offset_quadratic(curve: &QuadraticBezier,
                    radius: f64,
                    tolerance: f64,
                    sink: &mut StrokeOutline)
                    -> Vector2D {
    let v1 = curve.p1 - curve.p0;
    let v2 = curve.p2 - curve.p1;

    if v2.cross(v1).abs() <= GEOMETRIC_EPSILON * 3.0 {
        // Collinear control polygon: offset as a line. A control point lying
        // outside the endpoints makes a cusp; the line offset covers it too.
        let n = segment_start_normal(curve);
        sink.inner.line_to(curve.p2 - n * radius);
        sink.outer.line_to(curve.p2 + n * radius);
        return n;
    }

    let (a, b) = curve.derivative_coefficients();
    let bxa = b.cross(a);
    let boa = b.dot(a);
    let alen2 = a.square_length();
    let blen2 = b.square_length();

    // Tangent-turn guard: roots of |B'(t)|² = cbrt(r²·(b×a)²).
    let radix = (boa * boa - alen2 * (blen2 - (radius * radius * bxa * bxa).cbrt())).sqrt();
    let (t1, t2) = if radix.is_finite() && alen2 > 0.0 {
        let fac = -1.0 / alen2;
        (fac * (boa + radix), fac * (boa - radix))
    } else {
        (-1.0, -1.0)
    };

    let mut splits = [0.0f64; 2];
    let mut split_count = 0;
    for &t in &[t1, t2] {
        if is_unit_interior(t) {
            splits[split_count] = t;
            split_count += 1;
        }
    }
    splits[..split_count].sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut rest = *curve;
    let mut consumed = 0.0;
    for &t in &splits[..split_count] {
        let local = (t - consumed) / (1.0 - consumed);
        let (left, right) = rest.split(local);
        offset_monotonic_quadratic(&left, radius, tolerance, sink);
        rest = right;
        consumed = t;
    }
    offset_monotonic_quadratic(&rest, radius, tolerance, sink);
    segment_end_normal(&rest)
}

fn segment_end_normal(curve: &QuadraticBezier) -> Vector2D {
    if (curve.p2 - curve.p1).square_length() > GEOMETRIC_EPSILON {
        curve.p1.normal_toward(curve.p2)
    } else {
        curve.p0.normal_toward(curve.p2)
    }
}

/// Offsets a tangent-bounded quadratic piece on both sides, subdividing where
/// the parallel-curve error would exceed `tolerance`.
fn offset_monotonic_quadratic(curve: &QuadraticBezier,
                              radius: f64,
                              tolerance: f64,
                              sink: &mut StrokeOutline)
                              -> Vector2D {
    let mut p0 = curve.p0;
    let mut p1 = curve.p1;
    let p2 = curve.p2;
    let mut start_n = segment_start_normal(curve);

    let mut iterations = 0;
    loop {
        if iterations >= 64 {
            warn!("stroke offset subdivision failed to converge; truncating");
            let end_n = segment_end_normal(&QuadraticBezier::new(p0, p1, p2));
            sink.inner.line_to(p2 - end_n * radius);
            sink.outer.line_to(p2 + end_n * radius);
            return end_n;
        }
        iterations += 1;

        let piece = QuadraticBezier::new(p0, p1, p2);
        let (a, b) = piece.derivative_coefficients();
        let aob = a.dot(b);
        let axb = a.cross(b);

        let mut t = if aob == 0.0 {
            1.0
        } else {
            tolerance * b.square_length() / (axb.abs() - tolerance * aob)
        };
        if !is_unit_interior(t) {
            t = 1.0;
        }

        let (mid, q1, _q2) = piece.split_point(t);
        let end_n = if (mid - q1).square_length() > GEOMETRIC_EPSILON {
            q1.normal_toward(mid)
        } else {
            start_n
        };
        let n = start_n + end_n;
        let nr1 = n * (2.0 * radius / n.square_length());
        let nr2 = end_n * radius;

        sink.inner.quadratic_to(q1 - nr1, mid - nr2);
        sink.outer.quadratic_to(q1 + nr1, mid + nr2);

        if t >= 1.0 {
            return end_n;
        }

        let (_, right) = piece.split(t);
        p0 = right.p0;
        p1 = right.p1;
        start_n = end_n;
    }
}

/// Connects `from` to `to` around the endpoint `pivot` with the requested
/// cap. `dir` is the outward unit tangent at the path end.
fn add_cap(from: Vector2D,
           to: Vector2D,
           pivot: Vector2D,
           dir: Vector2D,
           radius: f64,
           cap: LineCap,
           sink: &mut QuadraticPath) {
    match cap {
        LineCap::Butt => sink.line_to(to),
        LineCap::Square => {
            let ext = dir * radius;
            sink.line_to(from + ext);
            sink.line_to(to + ext);
            sink.line_to(to);
        }
        LineCap::Round => {
            let a0 = (from - pivot).y.atan2((from - pivot).x);
            let sweep = if (from - pivot).cross(dir) >= 0.0 { PI } else { -PI };
            push_arc(sink, pivot, radius, a0, sweep);
            sink.line_to(to);
        }
    }
}

/// Connects `from` to `to` with the requested join around `pivot`. Joins
/// turning through a reflex angle degrade to bevels; so do miters past the
/// limit.
fn add_join(from: Vector2D,
            to: Vector2D,
            pivot: Vector2D,
            from_normal: Vector2D,
            to_normal: Vector2D,
            radius: f64,
            inv_miter_limit: f64,
            mut join: LineJoin,
            sink: &mut QuadraticPath,
            reverse: bool) {
    if (from - to).square_length() <= GEOMETRIC_EPSILON {
        return;
    }

    let a = from - pivot;
    let b = to - pivot;
    let mut cross = a.cross(b);
    if reverse {
        cross = -cross;
    }
    let mut angle = cross.atan2(a.dot(b));
    if angle < 0.0 {
        angle += 2.0 * PI;
    }
    if angle >= PI {
        join = LineJoin::Bevel;
    }
    if angle.abs() <= GEOMETRIC_EPSILON {
        return;
    }

    match join {
        LineJoin::Round => {
            let a0 = a.y.atan2(a.x);
            let sweep = a.cross(b).atan2(a.dot(b));
            push_arc(sink, pivot, radius, a0, sweep);
            sink.line_to(to);
        }
        LineJoin::Miter => {
            let dot = from_normal.dot(to_normal);
            let sin_half = ((1.0 + dot) * 0.5).sqrt();
            if sin_half < inv_miter_limit {
                sink.line_to(to);
            } else {
                let mid = from_normal + to_normal;
                let len = radius / (sin_half * mid.length());
                sink.line_to(pivot + mid * len);
                sink.line_to(to);
            }
        }
        LineJoin::Bevel => sink.line_to(to),
    }
}

/// Appends quadratic arc segments sweeping `sweep` radians from `a0` around
/// `center`. Each piece spans at most a quarter-turn minus change.
fn push_arc(sink: &mut QuadraticPath, center: Vector2D, radius: f64, a0: f64, sweep: f64) {
    let steps = ((sweep.abs() / (PI / 4.0)).ceil() as usize).max(1);
    let delta = sweep / steps as f64;
    let control_radius = radius / (delta * 0.5).cos();
    let mut angle = a0;
    for _ in 0..steps {
        let mid_angle = angle + delta * 0.5;
        let end_angle = angle + delta;
        let control = center + vec2d(mid_angle.cos(), mid_angle.sin()) * control_radius;
        let end = center + vec2d(end_angle.cos(), end_angle.sin()) * radius;
        sink.quadratic_to(control, end);
        angle = end_angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_line() -> QuadraticPath {
        let mut path = QuadraticPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.line_to(vec2d(100.0, 0.0));
        path
    }

    #[test]
    fn test_butt_stroke_is_rectangle() {
        let style = StrokeStyle::new(10.0);
        let contours = stroke_to_fill(&horizontal_line(), &style, 0.1);
        assert_eq!(contours.len(), 1);
        let fill = &contours[0];
        assert!(fill.is_closed());
        let rect = fill.approx_bounding_rect();
        assert!((rect.min.x - 0.0).abs() < 1e-6);
        assert!((rect.max.x - 100.0).abs() < 1e-6);
        assert!((rect.min.y + 5.0).abs() < 1e-6);
        assert!((rect.max.y - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_square_cap_extends() {
        let mut style = StrokeStyle::new(10.0);
        style.cap = LineCap::Square;
        let contours = stroke_to_fill(&horizontal_line(), &style, 0.1);
        let rect = contours[0].approx_bounding_rect();
        assert!((rect.min.x + 5.0).abs() < 1e-6);
        assert!((rect.max.x - 105.0).abs() < 1e-6);
    }

    #[test]
    fn test_offset_distance_on_curve() {
        let mut path = QuadraticPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.quadratic_to(vec2d(50.0, 80.0), vec2d(100.0, 0.0));

        let style = StrokeStyle::new(8.0);
        let tolerance = 0.05;
        let contours = stroke_to_fill(&path, &style, tolerance);
        assert_eq!(contours.len(), 1);

        // Every boundary point sits `radius` away from the source curve, to
        // within the stroking tolerance.
        let source = path.curve(0);
        for index in 0..contours[0].len() {
            let boundary = contours[0].curve(index);
            for &p in &[boundary.p0, boundary.p2] {
                let mut best = f64::INFINITY;
                for i in 0..=256 {
                    let t = i as f64 / 256.0;
                    let d = (source.sample(t) - p).length();
                    if d < best {
                        best = d;
                    }
                }
                // Caps add points closer than the radius along the end
                // circles; distance must never exceed radius + tolerance.
                assert!(best <= 4.0 + tolerance * 4.0 + 1e-6,
                        "boundary point {:?} strayed to {}", p, best);
            }
        }
    }

    #[test]
    fn test_closed_path_produces_two_rings() {
        let mut path = QuadraticPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.line_to(vec2d(100.0, 0.0));
        path.line_to(vec2d(100.0, 100.0));
        path.line_to(vec2d(0.0, 100.0));
        path.close();

        let style = StrokeStyle::new(10.0);
        let contours = stroke_to_fill(&path, &style, 0.1);
        assert_eq!(contours.len(), 2);
        assert!(contours.iter().all(|c| c.is_closed()));

        let outer = contours[0].approx_bounding_rect();
        assert!(outer.min.x <= -5.0 + 1e-6 && outer.max.x >= 105.0 - 1e-6);
        let inner = contours[1].approx_bounding_rect();
        assert!(inner.min.x >= 4.0 && inner.max.x <= 96.0);
    }

    #[test]
    fn test_point_stroke_round() {
        let mut path = QuadraticPath::new();
        path.move_to(vec2d(5.0, 5.0));
        let mut style = StrokeStyle::new(4.0);
        style.cap = LineCap::Round;
        let contours = stroke_to_fill(&path, &style, 0.1);
        assert_eq!(contours.len(), 1);
        let rect = contours[0].approx_bounding_rect();
        assert!(rect.contains_point(vec2d(6.9, 5.0)));
        assert!(rect.width() <= 4.2 && rect.height() <= 4.2);

        style.cap = LineCap::Butt;
        assert!(stroke_to_fill(&path, &style, 0.1).is_empty());
    }
}
