// quill/geometry/src/transform2d.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! 2D affine transforms.

use crate::rect::RectD;
use crate::vector::{vec2d, Vector2D, Vector2F};
use std::ops::Mul;

/// A 2×3 affine transform: a 2×2 linear part plus a translation.
///
/// Column-vector convention: `p' = M * p + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform2D {
    #[inline]
    fn default() -> Transform2D {
        Transform2D::identity()
    }
}

impl Transform2D {
    #[inline]
    pub fn identity() -> Transform2D {
        Transform2D { m11: 1.0, m12: 0.0, m21: 0.0, m22: 1.0, tx: 0.0, ty: 0.0 }
    }

    #[inline]
    pub fn from_translation(translation: Vector2D) -> Transform2D {
        Transform2D { tx: translation.x, ty: translation.y, ..Transform2D::identity() }
    }

    #[inline]
    pub fn from_scale(scale: Vector2D) -> Transform2D {
        Transform2D { m11: scale.x, m22: scale.y, ..Transform2D::identity() }
    }

    #[inline]
    pub fn from_uniform_scale(scale: f64) -> Transform2D {
        Transform2D::from_scale(vec2d(scale, scale))
    }

    #[inline]
    pub fn from_rotation(theta: f64) -> Transform2D {
        let (sin, cos) = theta.sin_cos();
        Transform2D { m11: cos, m12: -sin, m21: sin, m22: cos, tx: 0.0, ty: 0.0 }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Transform2D::identity()
    }

    #[inline]
    pub fn translation(&self) -> Vector2D {
        vec2d(self.tx, self.ty)
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// An upper bound on the factor by which the transform scales lengths.
    #[inline]
    pub fn max_scale(&self) -> f64 {
        let x = vec2d(self.m11, self.m21).length();
        let y = vec2d(self.m12, self.m22).length();
        x.max(y)
    }

    pub fn inverse(&self) -> Transform2D {
        let det = self.determinant();
        if det.abs() <= crate::util::GEOMETRIC_EPSILON {
            warn!("inverting a near-singular transform (determinant {})", det);
        }
        let inv_det = 1.0 / det;
        let m11 = self.m22 * inv_det;
        let m12 = -self.m12 * inv_det;
        let m21 = -self.m21 * inv_det;
        let m22 = self.m11 * inv_det;
        Transform2D {
            m11,
            m12,
            m21,
            m22,
            tx: -(m11 * self.tx + m12 * self.ty),
            ty: -(m21 * self.tx + m22 * self.ty),
        }
    }
}

impl Mul<Vector2D> for Transform2D {
    type Output = Vector2D;
    #[inline]
    fn mul(self, p: Vector2D) -> Vector2D {
        vec2d(self.m11 * p.x + self.m12 * p.y + self.tx,
              self.m21 * p.x + self.m22 * p.y + self.ty)
    }
}

impl Mul<Vector2F> for Transform2D {
    type Output = Vector2D;
    #[inline]
    fn mul(self, p: Vector2F) -> Vector2D {
        self * p.to_f64()
    }
}

impl Mul<Transform2D> for Transform2D {
    type Output = Transform2D;
    fn mul(self, other: Transform2D) -> Transform2D {
        Transform2D {
            m11: self.m11 * other.m11 + self.m12 * other.m21,
            m12: self.m11 * other.m12 + self.m12 * other.m22,
            m21: self.m21 * other.m11 + self.m22 * other.m21,
            m22: self.m21 * other.m12 + self.m22 * other.m22,
            tx: self.m11 * other.tx + self.m12 * other.ty + self.tx,
            ty: self.m21 * other.tx + self.m22 * other.ty + self.ty,
        }
    }
}

impl Mul<RectD> for Transform2D {
    type Output = RectD;

    /// Transforms the four corners and returns their bounding rect.
    fn mul(self, rect: RectD) -> RectD {
        let p0 = self * rect.min;
        let p1 = self * vec2d(rect.max.x, rect.min.y);
        let p2 = self * rect.max;
        let p3 = self * vec2d(rect.min.x, rect.max.y);
        RectD::new(p0.min(p1).min(p2.min(p3)), p0.max(p1).max(p2.max(p3)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse() {
        let transform = Transform2D::from_translation(vec2d(5.0, -3.0)) *
            Transform2D::from_rotation(0.7) *
            Transform2D::from_scale(vec2d(2.0, 0.5));
        let p = vec2d(3.0, 4.0);
        let round_trip = transform.inverse() * (transform * p);
        assert!((round_trip - p).length() < 1e-9);
    }

    #[test]
    fn test_rect_transform() {
        let transform = Transform2D::from_rotation(std::f64::consts::FRAC_PI_2);
        let rect = RectD::new(vec2d(0.0, 0.0), vec2d(2.0, 1.0));
        let transformed = transform * rect;
        assert!((transformed.min.x - -1.0).abs() < 1e-9);
        assert!((transformed.max.y - 2.0).abs() < 1e-9);
    }
}
