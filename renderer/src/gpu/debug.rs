// quill/renderer/src/gpu/debug.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The debug overlay: screen-space primitives drawn on top of everything,
//! compiled in only with the `debug_overlay` feature.

#![cfg(feature = "debug_overlay")]

use crate::instances::InstanceBuffer;
use quill_color::ColorF;
use quill_geometry::rect::RectF;
use quill_geometry::vector::Vector2F;

const MAX_DEBUG_INSTANCES: usize = 4096;

/// Collects debug primitives for the current frame. Positions are in screen
/// pixels.
pub struct DebugOverlay {
    pub instances: InstanceBuffer,
}

impl DebugOverlay {
    pub fn new() -> DebugOverlay {
        DebugOverlay { instances: InstanceBuffer::new(MAX_DEBUG_INSTANCES) }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn rect(&mut self, rect: &RectF, color: ColorF) {
        // Outline, not filled, so the overlay stays readable.
        let (min, max) = (rect.min, rect.max);
        self.line(min, Vector2F { x: max.x, y: min.y }, color);
        self.line(Vector2F { x: max.x, y: min.y }, max, color);
        self.line(max, Vector2F { x: min.x, y: max.y }, color);
        self.line(Vector2F { x: min.x, y: max.y }, min, color);
    }

    pub fn square(&mut self, center: Vector2F, radius: f32, color: ColorF) {
        self.instances.push_square(center, radius, color);
    }

    pub fn circle(&mut self, center: Vector2F, radius: f32, color: ColorF) {
        self.instances.push_circle(center, radius, color);
    }

    pub fn line(&mut self, start: Vector2F, end: Vector2F, color: ColorF) {
        self.instances.push_line(start, end, color, 1.0);
    }

    pub fn lines(&mut self, points: &[Vector2F], color: ColorF) {
        for window in points.windows(2) {
            self.line(window[0], window[1], color);
        }
    }
}
