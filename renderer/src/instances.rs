// quill/renderer/src/instances.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Instanced primitives for the UI and debug overlays: lines, rects and
//! circles, one instance each.

use quill_color::ColorF;
use quill_geometry::rect::RectF;
use quill_geometry::vector::Vector2F;

const PRIMITIVE_LINE: u32 = 0;
const PRIMITIVE_RECT: u32 = 1;
const PRIMITIVE_CIRCLE: u32 = 2;

/// One overlay primitive (24 bytes). The low byte of `attr3` carries the
/// kind; for lines the width, fixed point with 10 fractional bits, sits
/// above it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct PrimitiveInstance {
    pub attr1: Vector2F,
    pub attr2: Vector2F,
    pub attr3: u32,
    pub color: [u8; 4],
}

impl PrimitiveInstance {
    pub fn line(start: Vector2F, end: Vector2F, width: f32, color: ColorF) -> PrimitiveInstance {
        let packed_width = ((width * 1024.0) as u32) & 0xffffff;
        PrimitiveInstance {
            attr1: start,
            attr2: end,
            attr3: (packed_width << 8) | PRIMITIVE_LINE,
            color: color_bytes(color),
        }
    }

    pub fn rect(center: Vector2F, size: Vector2F, color: ColorF) -> PrimitiveInstance {
        PrimitiveInstance {
            attr1: center,
            attr2: size,
            attr3: PRIMITIVE_RECT,
            color: color_bytes(color),
        }
    }

    pub fn circle(center: Vector2F, radius: f32, color: ColorF) -> PrimitiveInstance {
        PrimitiveInstance {
            attr1: center,
            attr2: Vector2F::splat(radius),
            attr3: PRIMITIVE_CIRCLE,
            color: color_bytes(color),
        }
    }
}

#[inline]
fn color_bytes(color: ColorF) -> [u8; 4] {
    let c = color.to_u8();
    [c.r, c.g, c.b, c.a]
}

/// Instances split into batches of bounded size.
pub struct InstanceBuffer {
    pub batches: Vec<Vec<PrimitiveInstance>>,
    max_instances_per_batch: usize,
}

impl InstanceBuffer {
    pub fn new(max_instances_per_batch: usize) -> InstanceBuffer {
        InstanceBuffer { batches: vec![vec![]], max_instances_per_batch }
    }

    #[inline]
    pub fn max_instances(&self) -> usize {
        self.max_instances_per_batch
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(|batch| batch.is_empty())
    }

    pub fn clear(&mut self) {
        self.batches.truncate(1);
        self.batches[0].clear();
    }

    pub fn push(&mut self, instance: PrimitiveInstance) {
        if self.batches.last().unwrap().len() >= self.max_instances_per_batch {
            self.batches.push(Vec::with_capacity(self.max_instances_per_batch));
        }
        self.batches.last_mut().unwrap().push(instance);
    }

    #[inline]
    pub fn push_line(&mut self, start: Vector2F, end: Vector2F, color: ColorF, width: f32) {
        self.push(PrimitiveInstance::line(start, end, width, color));
    }

    #[inline]
    pub fn push_rect(&mut self, rect: &RectF, color: ColorF) {
        self.push(PrimitiveInstance::rect(rect.center(), rect.size(), color));
    }

    #[inline]
    pub fn push_square(&mut self, center: Vector2F, radius: f32, color: ColorF) {
        self.push(PrimitiveInstance::rect(center, Vector2F::splat(radius * 2.0), color));
    }

    #[inline]
    pub fn push_circle(&mut self, center: Vector2F, radius: f32, color: ColorF) {
        self.push(PrimitiveInstance::circle(center, radius, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_geometry::vector::vec2f;

    #[test]
    fn test_instance_size() {
        assert_eq!(std::mem::size_of::<PrimitiveInstance>(), 24);
    }

    #[test]
    fn test_kind_in_low_byte() {
        let line = PrimitiveInstance::line(vec2f(0.0, 0.0), vec2f(1.0, 0.0), 2.0, ColorF::white());
        assert_eq!(line.attr3 & 0xff, PRIMITIVE_LINE);
        assert_eq!(line.attr3 >> 8, 2048);

        let circle = PrimitiveInstance::circle(vec2f(0.0, 0.0), 3.0, ColorF::white());
        assert_eq!(circle.attr3 & 0xff, PRIMITIVE_CIRCLE);
    }

    #[test]
    fn test_batch_rollover() {
        let mut buffer = InstanceBuffer::new(2);
        for _ in 0..5 {
            buffer.push_circle(vec2f(0.0, 0.0), 1.0, ColorF::white());
        }
        assert_eq!(buffer.batches.len(), 3);
        assert_eq!(buffer.batches[0].len(), 2);
        assert_eq!(buffer.batches[2].len(), 1);
    }
}
