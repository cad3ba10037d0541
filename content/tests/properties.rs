// quill/content/tests/properties.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Randomized properties of the geometry pipeline.

#[macro_use]
extern crate quickcheck;

use quill_content::bezier::CubicBezier;
use quill_content::clip;
use quill_content::cubic_path::CubicPath;
use quill_geometry::rect::RectD;
use quill_geometry::vector::{vec2d, Vector2D};

/// Maps arbitrary floats into a sane coordinate range.
fn coord(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    (raw % 1000.0 * 100.0).round() / 100.0
}

fn point(raw: (f64, f64)) -> Vector2D {
    vec2d(coord(raw.0), coord(raw.1))
}

/// Builds a closed monotone path from arbitrary cubic segments.
fn build_path(start: (f64, f64), segments: &[((f64, f64), (f64, f64), (f64, f64))]) -> CubicPath {
    let mut path = CubicPath::new();
    path.move_to(point(start));
    for &(c1, c2, p) in segments {
        path.cubic_to(point(c1), point(c2), point(p));
    }
    path.close();
    path
}

quickcheck! {
    /// Every curve stored in a cubic path is x- and y-monotone.
    fn prop_monotone_pieces(start: (f64, f64),
                            segments: Vec<((f64, f64), (f64, f64), (f64, f64))>) -> bool {
        let path = build_path(start, &segments);
        for index in 0..path.len() {
            let curve = path.curve(index);
            if !is_monotone(&curve) {
                return false;
            }
        }
        true
    }

    /// Clipping is idempotent: clipping an already clipped path changes
    /// nothing beyond floating point noise.
    fn prop_clip_idempotent(start: (f64, f64),
                            segments: Vec<((f64, f64), (f64, f64), (f64, f64))>,
                            rect: ((f64, f64), (f64, f64))) -> bool {
        let path = build_path(start, &segments);
        let rect = RectD::from_points(point(rect.0), point(rect.1));
        if rect.is_empty() {
            return true;
        }

        let mut once = path.clone();
        clip::clip(&mut once, &rect);
        let mut twice = once.clone();
        clip::clip(&mut twice, &rect);

        if once.points.len() != twice.points.len() {
            return false;
        }
        once.points
            .iter()
            .zip(twice.points.iter())
            .all(|(a, b)| (*a - *b).length() < 1e-6)
    }

    /// Clipping never produces geometry outside the (slightly inflated)
    /// clip rect.
    fn prop_clip_bounded(start: (f64, f64),
                         segments: Vec<((f64, f64), (f64, f64), (f64, f64))>,
                         rect: ((f64, f64), (f64, f64))) -> bool {
        let path = build_path(start, &segments);
        let rect = RectD::from_points(point(rect.0), point(rect.1));
        if rect.is_empty() {
            return true;
        }

        let mut clipped = path.clone();
        clip::clip(&mut clipped, &rect);
        let bounds = clipped.bounding_rect();
        clipped.is_empty() || rect.dilate(1e-6).contains_rect(&bounds)
    }
}

fn is_monotone(curve: &CubicBezier) -> bool {
    let (a, b, c) = curve.derivative_coefficients();
    for &(da, db, dc) in &[(a.x, b.x, c.x), (a.y, b.y, c.y)] {
        // Normalized samples, so the sign test tolerates the parameter-space
        // epsilon the splitter works to.
        let scale = (da.abs() + db.abs() + dc.abs()).max(1.0);
        let mut last = 0.0f64;
        for i in 0..=32 {
            let t = i as f64 / 32.0;
            let v = ((da * t + db) * t + dc) / scale;
            if v * last < -1e-5 {
                return false;
            }
            if v.abs() > 1e-7 {
                last = v;
            }
        }
    }
    true
}
