// quill/renderer/src/batch.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fixed-capacity batches and the packer that fills them.
//!
//! Two staging batches exist per frame: tiles (vertices + curves texture +
//! bands texture) and fills (vertices only). A drawable that no longer fits
//! forces a flush; the packer never overruns a capacity. Z-indices decrease
//! monotonically so that, drawn with a less-than depth test, later drawables
//! cover earlier ones across batch boundaries.

use crate::drawable::{Drawable, FillVertex, TileVertex};
use crate::paint::{PaintId, PaintType};
use fxhash::FxHashMap;
use quill_geometry::vector::Vector2F;

/// Side of the RGBA32F curves lookup texture.
pub const CURVES_TEXTURE_SIZE: usize = 128;
/// Side of the R16UI bands lookup texture.
pub const BANDS_TEXTURE_SIZE: usize = 128;

/// Vertex capacity of each batch.
pub const MAX_VERTICES: usize = 1 << 16;
/// Curve record capacity: each record is four control points, two texels.
pub const MAX_CURVES: usize = CURVES_TEXTURE_SIZE * CURVES_TEXTURE_SIZE / 2;
/// Band directory entry capacity.
pub const MAX_BANDS: usize = BANDS_TEXTURE_SIZE * BANDS_TEXTURE_SIZE;

/// Paint texture slots available to one batch.
pub const MAX_PAINT_TEXTURES: usize = 4;

/// The z-index assigned to the first drawable of a frame.
pub const Z_INDEX_START: u32 = (1 << 20) - 1;

/// Staging for one tile draw call.
#[derive(Default)]
pub struct TileBatch {
    pub vertices: Vec<TileVertex>,
    pub curves: Vec<Vector2F>,
    pub bands: Vec<u16>,
}

impl TileBatch {
    #[inline]
    pub fn vertices_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn indices_count(&self) -> usize {
        self.vertices.len() / 4 * 6
    }

    #[inline]
    pub fn curve_records(&self) -> usize {
        self.curves.len() / 4
    }

    #[inline]
    pub fn bands_count(&self) -> usize {
        self.bands.len()
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.curves.clear();
        self.bands.clear();
    }
}

/// Staging for one fill draw call.
#[derive(Default)]
pub struct FillBatch {
    pub vertices: Vec<FillVertex>,
}

impl FillBatch {
    #[inline]
    pub fn vertices_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn indices_count(&self) -> usize {
        self.vertices.len() / 4 * 6
    }

    fn clear(&mut self) {
        self.vertices.clear();
    }
}

/// The paired tile/fill staging of a frame segment.
#[derive(Default)]
pub struct Batch {
    pub tiles: TileBatch,
    pub fills: FillBatch,
}

/// The outcome of offering a drawable to the packer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushResult {
    Pushed,
    /// The current batch must be flushed (and cleared) before retrying.
    NeedsFlush,
}

/// Packs drawables into batches, rewriting z-indices and paint coordinates
/// and assigning texture paints to texture slots.
pub struct BatchPacker {
    pub batch: Batch,
    z_index: u32,
    bound_textures: FxHashMap<PaintId, u16>,
    texture_slots: Vec<PaintId>,
}

#[inline]
fn binding_uses_texture(paint_type: PaintType) -> bool {
    paint_type == PaintType::Texture || paint_type == PaintType::Gradient
}

impl BatchPacker {
    pub fn new() -> BatchPacker {
        BatchPacker {
            batch: Batch::default(),
            z_index: Z_INDEX_START,
            bound_textures: FxHashMap::default(),
            texture_slots: vec![],
        }
    }

    /// Resets the z counter for a new frame. Batches are expected to have
    /// been flushed already.
    pub fn begin_frame(&mut self) {
        self.z_index = Z_INDEX_START;
        debug_assert!(self.batch.tiles.vertices.is_empty());
        debug_assert!(self.batch.fills.vertices.is_empty());
    }

    /// The texture slot assignments of the current batch, in slot order.
    #[inline]
    pub fn texture_slots(&self) -> &[PaintId] {
        &self.texture_slots
    }

    /// Empties the staging arrays and releases the texture slots after the
    /// caller has issued the draw calls. The z counter keeps decreasing so
    /// ordering holds across batches.
    pub fn clear_after_flush(&mut self) {
        self.batch.tiles.clear();
        self.batch.fills.clear();
        self.bound_textures.clear();
        self.texture_slots.clear();
    }

    /// Whether the drawable can never fit, even in an empty batch. Such a
    /// drawable must be rebuilt at a coarser level of detail.
    pub fn exceeds_empty_batch(drawable: &Drawable) -> bool {
        drawable.tiles.len() > MAX_VERTICES || drawable.fills.len() > MAX_VERTICES ||
            drawable.curve_records() > MAX_CURVES ||
            drawable.bands.len() > MAX_BANDS
    }

    fn fits(&self, drawable: &Drawable) -> bool {
        let tiles = &self.batch.tiles;
        if tiles.vertices_count() + drawable.tiles.len() > MAX_VERTICES {
            return false;
        }
        if tiles.curve_records() + drawable.curve_records() > MAX_CURVES {
            return false;
        }
        if tiles.bands_count() + drawable.bands.len() > MAX_BANDS {
            return false;
        }
        if self.batch.fills.vertices_count() + drawable.fills.len() > MAX_VERTICES {
            return false;
        }

        // Every texture-backed paint (image or gradient) needs a slot in
        // this batch.
        let mut needed = 0;
        for binding in &drawable.paints {
            if binding_uses_texture(binding.paint_type) {
                if let Some(id) = binding.paint_id {
                    if !self.bound_textures.contains_key(&id) {
                        needed += 1;
                    }
                }
            }
        }
        self.texture_slots.len() + needed <= MAX_PAINT_TEXTURES
    }

    /// Copies the drawable into the batch and finalizes its vertices.
    pub fn push_drawable(&mut self, drawable: &Drawable) -> PushResult {
        if !self.fits(drawable) {
            return PushResult::NeedsFlush;
        }

        let curves_offset = self.batch.tiles.curve_records() as u32;
        self.batch.tiles.curves.extend_from_slice(&drawable.curves);
        self.batch.tiles.bands.extend_from_slice(&drawable.bands);

        let tile_start = self.batch.tiles.vertices_count();
        self.batch.tiles.vertices.extend_from_slice(&drawable.tiles);
        let fill_start = self.batch.fills.vertices_count();
        self.batch.fills.vertices.extend_from_slice(&drawable.fills);

        let mut last_tile = 0;
        let mut last_fill = 0;
        let mut binding_index = 0u32;
        for binding in &drawable.paints {
            let z_index = self.z_index.saturating_sub(binding_index);
            let slot = match binding.paint_id {
                Some(id) if binding_uses_texture(binding.paint_type) => Some(self.slot_for(id)),
                _ => None,
            };

            for vertex in
                &mut self.batch.tiles.vertices[tile_start + last_tile..
                                               tile_start + binding.last_tile_index]
            {
                vertex.add_curves_offset(curves_offset);
                vertex.set_z_index(z_index);
                if let Some(slot) = slot {
                    vertex.set_paint_coord(slot);
                }
            }
            for vertex in
                &mut self.batch.fills.vertices[fill_start + last_fill..
                                               fill_start + binding.last_fill_index]
            {
                vertex.set_z_index(z_index);
                if let Some(slot) = slot {
                    vertex.set_paint_coord(slot);
                }
            }

            last_tile = binding.last_tile_index;
            last_fill = binding.last_fill_index;
            binding_index += 1;
        }

        debug_assert_eq!(last_tile, drawable.tiles.len(),
                         "drawable vertices not covered by paint bindings");
        debug_assert_eq!(last_fill, drawable.fills.len());

        self.z_index = self.z_index.saturating_sub(binding_index.max(1));

        debug_assert!(self.batch.tiles.vertices_count() <= MAX_VERTICES);
        debug_assert!(self.batch.tiles.curve_records() <= MAX_CURVES);
        debug_assert!(self.batch.tiles.bands_count() <= MAX_BANDS);
        debug_assert!(self.batch.fills.vertices_count() <= MAX_VERTICES);

        PushResult::Pushed
    }

    fn slot_for(&mut self, id: PaintId) -> u16 {
        if let Some(&slot) = self.bound_textures.get(&id) {
            return slot;
        }
        let slot = self.texture_slots.len() as u16;
        debug_assert!((slot as usize) < MAX_PAINT_TEXTURES);
        self.texture_slots.push(id);
        self.bound_textures.insert(id, slot);
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::CurvesKind;
    use crate::paint::PaintType;

    fn quad_drawable(curve_records: usize, paint: PaintType, id: Option<PaintId>) -> Drawable {
        let mut drawable = Drawable::default();
        for _ in 0..curve_records {
            drawable.push_curve3(Vector2F::default(),
                                 Vector2F { x: 0.5, y: 0.5 },
                                 Vector2F { x: 1.0, y: 0.0 });
            drawable.bands.push(0);
        }
        let attr_1 = TileVertex::create_attr_1(0, paint, 0);
        let attr_2 = TileVertex::create_attr_2(0, CurvesKind::Quadratic, false, 0);
        let attr_3 = TileVertex::create_attr_3(0, curve_records as u16);
        drawable.push_tile(Vector2F::default(),
                           Vector2F { x: 16.0, y: 16.0 },
                           Vector2F::default(),
                           Vector2F { x: 1.0, y: 1.0 },
                           &[Vector2F::default(); 4],
                           [255; 4],
                           attr_1,
                           attr_2,
                           attr_3);
        let attr_1 = FillVertex::create_attr_1(0, paint);
        let attr_2 = FillVertex::create_attr_2(0, 0);
        drawable.push_fill(Vector2F::default(),
                           Vector2F { x: 16.0, y: 16.0 },
                           [255; 4],
                           &[Vector2F::default(); 4],
                           attr_1,
                           attr_2);
        drawable.push_paint_binding(paint, id);
        drawable
    }

    #[test]
    fn test_z_indices_decrease() {
        let mut packer = BatchPacker::new();
        packer.begin_frame();
        let drawable = quad_drawable(1, PaintType::Color, None);
        assert_eq!(packer.push_drawable(&drawable), PushResult::Pushed);
        assert_eq!(packer.push_drawable(&drawable), PushResult::Pushed);

        let z0 = packer.batch.tiles.vertices[0].z_index();
        let z1 = packer.batch.tiles.vertices[4].z_index();
        assert!(z1 < z0);
        assert_eq!(z0, Z_INDEX_START);
    }

    #[test]
    fn test_curves_offset_rebased() {
        let mut packer = BatchPacker::new();
        packer.begin_frame();
        let drawable = quad_drawable(3, PaintType::Color, None);
        packer.push_drawable(&drawable);
        packer.push_drawable(&drawable);
        assert_eq!(packer.batch.tiles.vertices[0].curves_offset(), 0);
        assert_eq!(packer.batch.tiles.vertices[4].curves_offset(), 3);
        assert_eq!(packer.batch.tiles.curve_records(), 6);
        assert_eq!(packer.batch.tiles.bands_count(), 6);
    }

    #[test]
    fn test_capacity_flush_boundary() {
        let mut packer = BatchPacker::new();
        packer.begin_frame();
        let per_push = MAX_CURVES / 3;
        let drawable = quad_drawable(per_push, PaintType::Color, None);
        let mut pushes = 0;
        loop {
            match packer.push_drawable(&drawable) {
                PushResult::Pushed => pushes += 1,
                PushResult::NeedsFlush => break,
            }
            assert!(packer.batch.tiles.curve_records() <= MAX_CURVES);
        }
        assert_eq!(pushes, 3);

        packer.clear_after_flush();
        assert_eq!(packer.push_drawable(&drawable), PushResult::Pushed);
        // Ordering is preserved across the flush.
        assert!(packer.batch.tiles.vertices[0].z_index() < Z_INDEX_START - 2);
    }

    quickcheck::quickcheck! {
        /// Capacity invariance: no sequence of pushes (with flush-on-demand)
        /// ever exceeds a batch limit.
        fn prop_capacities_hold(sizes: Vec<(u16, bool)>) -> bool {
            let mut packer = BatchPacker::new();
            packer.begin_frame();
            for (raw, textured) in sizes {
                let records = raw as usize % 600 + 1;
                let (paint, id) = if textured {
                    (PaintType::Texture, Some(PaintId(raw as u64 % 6 + 1)))
                } else {
                    (PaintType::Color, None)
                };
                let drawable = quad_drawable(records, paint, id);
                if packer.push_drawable(&drawable) == PushResult::NeedsFlush {
                    packer.clear_after_flush();
                    if packer.push_drawable(&drawable) != PushResult::Pushed {
                        return false;
                    }
                }
                let tiles = &packer.batch.tiles;
                if tiles.vertices_count() > MAX_VERTICES || tiles.curve_records() > MAX_CURVES ||
                    tiles.bands_count() > MAX_BANDS ||
                    packer.batch.fills.vertices_count() > MAX_VERTICES ||
                    packer.texture_slots().len() > MAX_PAINT_TEXTURES
                {
                    return false;
                }
            }
            true
        }
    }

    #[test]
    fn test_texture_slot_assignment() {
        let mut packer = BatchPacker::new();
        packer.begin_frame();
        for index in 0..MAX_PAINT_TEXTURES {
            let drawable =
                quad_drawable(1, PaintType::Texture, Some(PaintId(index as u64 + 1)));
            assert_eq!(packer.push_drawable(&drawable), PushResult::Pushed);
        }
        assert_eq!(packer.texture_slots().len(), MAX_PAINT_TEXTURES);

        // A repeated paint reuses its slot.
        let drawable = quad_drawable(1, PaintType::Texture, Some(PaintId(1)));
        assert_eq!(packer.push_drawable(&drawable), PushResult::Pushed);

        // A fifth distinct texture forces a flush.
        let drawable = quad_drawable(1, PaintType::Texture, Some(PaintId(99)));
        assert_eq!(packer.push_drawable(&drawable), PushResult::NeedsFlush);
        packer.clear_after_flush();
        assert_eq!(packer.push_drawable(&drawable), PushResult::Pushed);
        assert_eq!(packer.batch.tiles.vertices[0].attr_2 & 0x1ff, 0);
    }
}
