// quill/content/src/flatten.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Curve flattening with a pixel error tolerance.
//!
//! Two strategies: a forward-stepping fast path for curves inside the clip
//! rect, and a recursive midpoint subdivision that degrades to single chords
//! once a curve leaves the clip rect.

use crate::bezier::{CubicBezier, QuadraticBezier, MAX_RECURSION};
use crate::quadratic_path::QuadraticPath;
use quill_geometry::line_segment::LineSegmentD;
use quill_geometry::rect::RectD;
use quill_geometry::vector::Vector2D;

/// Flattens a whole quadratic path into line segments. Curves mostly outside
/// `clip` are only coarsely approximated.
pub fn flatten_path(path: &QuadraticPath,
                    clip: &RectD,
                    tolerance: f64,
                    sink: &mut Vec<LineSegmentD>) {
    if path.is_empty() {
        return;
    }

    let bounds = path.approx_bounding_rect();
    let area = bounds.area();
    let coverage = if area <= 0.0 { 1.0 } else { bounds.intersection_area(clip) / area };
    if coverage <= 0.0 {
        return;
    }
    let clipped = coverage <= 0.5;

    for index in 0..path.len() {
        let curve = path.curve(index);
        if curve.p1 == curve.p2 {
            sink.push(LineSegmentD::new(curve.p0, curve.p2));
        } else if clipped {
            recursive_flatten(&curve, clip, tolerance, 0, sink);
        } else {
            fast_flatten(&curve, tolerance, sink);
        }
    }
}

/// Forward-stepping flattening with a uniform parameter step derived from
/// the second derivative.
pub fn fast_flatten(curve: &QuadraticBezier, tolerance: f64, sink: &mut Vec<LineSegmentD>) {
    let a = curve.p0 - curve.p1 * 2.0 + curve.p2;
    let b = (curve.p1 - curve.p0) * 2.0;
    let c = curve.p0;

    let a_len = a.length();
    if a_len <= 0.0 {
        sink.push(LineSegmentD::new(curve.p0, curve.p2));
        return;
    }

    let dt = (2.0 * tolerance / a_len).sqrt();
    let mut last = curve.p0;
    let mut t = dt;
    while t < 1.0 {
        let p = a * (t * t) + b * t + c;
        sink.push(LineSegmentD::new(last, p));
        last = p;
        t += dt;
    }
    sink.push(LineSegmentD::new(last, curve.p2));
}

fn recursive_flatten(curve: &QuadraticBezier,
                     clip: &RectD,
                     tolerance: f64,
                     depth: u8,
                     sink: &mut Vec<LineSegmentD>) {
    if depth > MAX_RECURSION {
        sink.push(LineSegmentD::new(curve.p0, curve.p2));
        return;
    }

    let p0_in = clip.contains_point(curve.p0);
    let p1_in = clip.contains_point(curve.p1);
    let p2_in = clip.contains_point(curve.p2);

    if !p0_in && !p1_in && !p2_in {
        sink.push(LineSegmentD::new(curve.p0, curve.p2));
        return;
    }
    if p0_in && p1_in && p2_in {
        fast_flatten(curve, tolerance, sink);
        return;
    }

    let mid = curve.sample(0.5);
    let num = (curve.p2.x - curve.p0.x) * (curve.p0.y - mid.y) -
        (curve.p0.x - mid.x) * (curve.p2.y - curve.p0.y);
    let den = (curve.p2 - curve.p0).square_length();
    if den > 0.0 && num * num / den < tolerance * tolerance {
        sink.push(LineSegmentD::new(curve.p0, curve.p2));
        return;
    }

    let (left, right) = curve.split(0.5);
    recursive_flatten(&left, clip, tolerance, depth + 1, sink);
    recursive_flatten(&right, clip, tolerance, depth + 1, sink);
}

/// Flattens one cubic into a polyline by midpoint subdivision, emitting the
/// interior points (the caller already has the endpoints).
pub fn flatten_cubic<F>(curve: &CubicBezier, tolerance: f64, emit: &mut F)
where
    F: FnMut(Vector2D),
{
    flatten_cubic_inner(curve, tolerance, 0, emit)
}

fn flatten_cubic_inner<F>(curve: &CubicBezier, tolerance: f64, depth: u8, emit: &mut F)
where
    F: FnMut(Vector2D),
{
    if depth > MAX_RECURSION || curve.is_line(tolerance) {
        return;
    }
    let (left, right) = curve.split(0.5);
    flatten_cubic_inner(&left, tolerance, depth + 1, emit);
    emit(left.p3);
    flatten_cubic_inner(&right, tolerance, depth + 1, emit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_geometry::vector::vec2d;

    #[test]
    fn test_flatten_error_within_tolerance() {
        let curve = QuadraticBezier::new(vec2d(0.0, 0.0), vec2d(50.0, 100.0), vec2d(100.0, 0.0));
        let mut segments = vec![];
        let tolerance = 0.25;
        fast_flatten(&curve, tolerance, &mut segments);
        assert!(segments.len() > 4);

        // Every curve sample is near the polyline.
        for i in 0..=64 {
            let p = curve.sample(i as f64 / 64.0);
            let min = segments
                .iter()
                .map(|s| s.square_distance_to(p))
                .fold(f64::INFINITY, f64::min);
            assert!(min.sqrt() <= tolerance * 2.0);
        }
    }

    #[test]
    fn test_offscreen_curve_single_chord() {
        let curve = QuadraticBezier::new(vec2d(200.0, 0.0), vec2d(250.0, 100.0), vec2d(300.0, 0.0));
        let clip = RectD::new(vec2d(0.0, 0.0), vec2d(100.0, 100.0));
        let mut segments = vec![];
        recursive_flatten(&curve, &clip, 0.25, 0, &mut segments);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_flatten_path_chains() {
        let mut path = QuadraticPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.quadratic_to(vec2d(25.0, 50.0), vec2d(50.0, 0.0));
        path.line_to(vec2d(100.0, 0.0));

        let clip = RectD::new(vec2d(0.0, -100.0), vec2d(200.0, 100.0));
        let mut segments = vec![];
        flatten_path(&path, &clip, 0.25, &mut segments);

        for window in segments.windows(2) {
            assert_eq!(window[0].to, window[1].from);
        }
        assert_eq!(segments.first().unwrap().from, vec2d(0.0, 0.0));
        assert_eq!(segments.last().unwrap().to, vec2d(100.0, 0.0));
    }

    #[test]
    fn test_flatten_cubic_monotone_progression() {
        let curve = CubicBezier::new(vec2d(0.0, 0.0),
                                     vec2d(10.0, 40.0),
                                     vec2d(50.0, 90.0),
                                     vec2d(100.0, 100.0));
        let mut points = vec![curve.p0];
        flatten_cubic(&curve, 0.25, &mut |p| points.push(p));
        points.push(curve.p3);
        // A monotone curve flattens to a monotone polyline.
        for window in points.windows(2) {
            assert!(window[1].x >= window[0].x);
            assert!(window[1].y >= window[0].y);
        }
    }
}
