// quill/renderer/src/drawable.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The per-path render package: packed vertices, the curve blob and the band
//! directory, ready for the batch packer.

use crate::paint::{Appearance, PaintId, PaintType};
use quill_geometry::rect::RectD;
use quill_geometry::vector::Vector2F;

/// How the curve records of a tile are encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurvesKind {
    /// No curves; the tile is a plain fill.
    None = 0,
    Quadratic = 1,
    Cubic = 2,
}

/// Vertical slices per boundary tile used to prune curve traversal in the
/// shader. Stays within the soft cap of 32 (the format allows up to 256).
pub const TILE_BANDS: usize = 8;

/// A vertex of the tile shader (40 bytes).
///
/// Attribute words:
/// `attr_1` = blend (5) | paint type (7) | curves offset (20)
/// `attr_2` = z-index (20) | curves kind (2) | even-odd (1) | paint coord (9)
/// `attr_3` = left-edge winding + 32768 (16) | curves count (16)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct TileVertex {
    pub position: Vector2F,
    pub color: [u8; 4],
    pub tex_coord: Vector2F,
    pub tex_coord_curves: Vector2F,
    pub attr_1: u32,
    pub attr_2: u32,
    pub attr_3: u32,
}

impl TileVertex {
    pub fn create_attr_1(blend_mode: u8, paint_type: PaintType, curves_offset: u32) -> u32 {
        debug_assert!(blend_mode < 32);
        debug_assert!(curves_offset < (1 << 20));
        ((blend_mode as u32) << 27) | (((paint_type as u32) & 0x7f) << 20) |
            (curves_offset & 0xfffff)
    }

    pub fn create_attr_2(z_index: u32,
                         curves_kind: CurvesKind,
                         is_even_odd: bool,
                         paint_coord: u16)
                         -> u32 {
        debug_assert!(z_index < (1 << 20));
        (z_index << 12) | ((curves_kind as u32) << 10) | ((is_even_odd as u32) << 9) |
            ((paint_coord as u32) & 0x1ff)
    }

    pub fn create_attr_3(winding: i32, curves_count: u16) -> u32 {
        debug_assert!(winding >= -32768 && winding < 32768);
        ((((winding + 32768) as u32) & 0xffff) << 16) | (curves_count as u32)
    }

    /// Rebases the curves offset after the blob is copied into a batch.
    #[inline]
    pub fn add_curves_offset(&mut self, offset: u32) {
        let rebased = ((self.attr_1 & 0xfffff) + offset) & 0xfffff;
        self.attr_1 = (self.attr_1 >> 20 << 20) | rebased;
    }

    #[inline]
    pub fn set_z_index(&mut self, z_index: u32) {
        self.attr_2 = (self.attr_2 << 20 >> 20) | (z_index << 12);
    }

    #[inline]
    pub fn set_paint_coord(&mut self, paint_coord: u16) {
        self.attr_2 = (self.attr_2 >> 9 << 9) | ((paint_coord as u32) & 0x1ff);
    }

    #[inline]
    pub fn curves_offset(&self) -> u32 {
        self.attr_1 & 0xfffff
    }

    #[inline]
    pub fn curves_count(&self) -> u16 {
        self.attr_3 as u16
    }

    #[inline]
    pub fn winding(&self) -> i32 {
        ((self.attr_3 >> 16) & 0xffff) as i32 - 32768
    }

    #[inline]
    pub fn z_index(&self) -> u32 {
        self.attr_2 >> 12
    }
}

/// A vertex of the fill shader (28 bytes).
///
/// `attr_1` = blend (5) | paint type (7) | unused (20)
/// `attr_2` = z-index (20) | unused (2) | paint coord (10)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct FillVertex {
    pub position: Vector2F,
    pub color: [u8; 4],
    pub tex_coord: Vector2F,
    pub attr_1: u32,
    pub attr_2: u32,
}

impl FillVertex {
    pub fn create_attr_1(blend_mode: u8, paint_type: PaintType) -> u32 {
        debug_assert!(blend_mode < 32);
        ((blend_mode as u32) << 27) | (((paint_type as u32) & 0x7f) << 20)
    }

    pub fn create_attr_2(z_index: u32, paint_coord: u16) -> u32 {
        debug_assert!(z_index < (1 << 20));
        (z_index << 12) | ((paint_coord as u32) & 0x3ff)
    }

    #[inline]
    pub fn set_z_index(&mut self, z_index: u32) {
        self.attr_2 = (self.attr_2 << 20 >> 20) | (z_index << 12);
    }

    #[inline]
    pub fn set_paint_coord(&mut self, paint_coord: u16) {
        self.attr_2 = (self.attr_2 >> 10 << 10) | ((paint_coord as u32) & 0x3ff);
    }

    #[inline]
    pub fn z_index(&self) -> u32 {
        self.attr_2 >> 12
    }
}

/// Marks the end of the vertex ranges drawn with one paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintBinding {
    pub last_tile_index: usize,
    pub last_fill_index: usize,
    pub paint_type: PaintType,
    pub paint_id: Option<PaintId>,
}

/// The only thing the renderer can draw directly.
#[derive(Clone, Debug, Default)]
pub struct Drawable {
    /// The tiling pyramid level the drawable was built at.
    pub lod: u8,
    pub bounding_rect: RectD,
    /// The region within which the drawable stays correct without re-tiling.
    pub valid_rect: RectD,

    /// Flat curve records, four control points each.
    pub curves: Vec<Vector2F>,
    /// Band directory entries, [`TILE_BANDS`] per boundary tile, in lockstep
    /// with the curve records.
    pub bands: Vec<u16>,

    pub tiles: Vec<TileVertex>,
    pub fills: Vec<FillVertex>,

    pub paints: Vec<PaintBinding>,

    pub appearance: Appearance,
}

impl Drawable {
    #[inline]
    pub fn new(bounding_rect: RectD, valid_rect: RectD) -> Drawable {
        Drawable { bounding_rect, valid_rect, ..Drawable::default() }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.fills.is_empty()
    }

    /// The number of curve records.
    #[inline]
    pub fn curve_records(&self) -> usize {
        self.curves.len() / 4
    }

    #[inline]
    pub fn push_curve3(&mut self, p0: Vector2F, p1: Vector2F, p2: Vector2F) {
        self.curves.extend_from_slice(&[p0, p1, p2, Vector2F::default()]);
    }

    #[inline]
    pub fn push_curve4(&mut self, p0: Vector2F, p1: Vector2F, p2: Vector2F, p3: Vector2F) {
        self.curves.extend_from_slice(&[p0, p1, p2, p3]);
    }

    /// Appends the four vertices of one boundary tile quad.
    pub fn push_tile(&mut self,
                     min: Vector2F,
                     max: Vector2F,
                     curves_coord_min: Vector2F,
                     curves_coord_max: Vector2F,
                     tex_coords: &[Vector2F; 4],
                     color: [u8; 4],
                     attr_1: u32,
                     attr_2: u32,
                     attr_3: u32) {
        let positions = [min,
                         Vector2F { x: max.x, y: min.y },
                         max,
                         Vector2F { x: min.x, y: max.y }];
        let curve_coords = [curves_coord_min,
                            Vector2F { x: curves_coord_max.x, y: curves_coord_min.y },
                            curves_coord_max,
                            Vector2F { x: curves_coord_min.x, y: curves_coord_max.y }];
        for corner in 0..4 {
            self.tiles.push(TileVertex {
                position: positions[corner],
                color,
                tex_coord: tex_coords[corner],
                tex_coord_curves: curve_coords[corner],
                attr_1,
                attr_2,
                attr_3,
            });
        }
    }

    /// Appends the four vertices of one interior fill quad.
    pub fn push_fill(&mut self,
                     min: Vector2F,
                     max: Vector2F,
                     color: [u8; 4],
                     tex_coords: &[Vector2F; 4],
                     attr_1: u32,
                     attr_2: u32) {
        let positions = [min,
                         Vector2F { x: max.x, y: min.y },
                         max,
                         Vector2F { x: min.x, y: max.y }];
        for corner in 0..4 {
            self.fills.push(FillVertex {
                position: positions[corner],
                color,
                tex_coord: tex_coords[corner],
                attr_1,
                attr_2,
            });
        }
    }

    /// Records that everything pushed since the previous binding uses the
    /// given paint.
    pub fn push_paint_binding(&mut self, paint_type: PaintType, paint_id: Option<PaintId>) {
        self.paints.push(PaintBinding {
            last_tile_index: self.tiles.len(),
            last_fill_index: self.fills.len(),
            paint_type,
            paint_id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn test_vertex_sizes() {
        assert_eq!(mem::size_of::<TileVertex>(), 40);
        assert_eq!(mem::size_of::<FillVertex>(), 28);
    }

    #[test]
    fn test_attr_round_trip() {
        let attr_1 = TileVertex::create_attr_1(3, PaintType::Texture, 0x12345);
        let attr_2 = TileVertex::create_attr_2(0x54321, CurvesKind::Cubic, true, 257);
        let attr_3 = TileVertex::create_attr_3(-7, 12);
        let vertex = TileVertex { attr_1, attr_2, attr_3, ..TileVertex::default() };

        assert_eq!(vertex.curves_offset(), 0x12345);
        assert_eq!(vertex.z_index(), 0x54321);
        assert_eq!((vertex.attr_2 >> 10) & 3, CurvesKind::Cubic as u32);
        assert_eq!((vertex.attr_2 >> 9) & 1, 1);
        assert_eq!(vertex.attr_2 & 0x1ff, 257);
        assert_eq!(vertex.winding(), -7);
        assert_eq!(vertex.curves_count(), 12);
        assert_eq!(vertex.attr_1 >> 27, 3);
        assert_eq!((vertex.attr_1 >> 20) & 0x7f, PaintType::Texture as u32);
    }

    #[test]
    fn test_finalize_preserves_neighbors() {
        let attr_1 = TileVertex::create_attr_1(1, PaintType::Color, 10);
        let attr_2 = TileVertex::create_attr_2(0, CurvesKind::Quadratic, true, 3);
        let attr_3 = TileVertex::create_attr_3(2, 5);
        let mut vertex = TileVertex { attr_1, attr_2, attr_3, ..TileVertex::default() };

        vertex.add_curves_offset(100);
        assert_eq!(vertex.curves_offset(), 110);
        assert_eq!(vertex.attr_1 >> 27, 1);

        vertex.set_z_index(999);
        assert_eq!(vertex.z_index(), 999);
        assert_eq!((vertex.attr_2 >> 10) & 3, CurvesKind::Quadratic as u32);

        vertex.set_paint_coord(2);
        assert_eq!(vertex.attr_2 & 0x1ff, 2);
        // The even-odd bit survives a paint coord rewrite.
        assert_eq!((vertex.attr_2 >> 9) & 1, 1);
        assert_eq!(vertex.z_index(), 999);
    }

    #[test]
    fn test_quad_corners() {
        let mut drawable = Drawable::default();
        let min = Vector2F { x: 1.0, y: 2.0 };
        let max = Vector2F { x: 3.0, y: 4.0 };
        drawable.push_fill(min, max, [255; 4], &[Vector2F::default(); 4], 0, 0);
        assert_eq!(drawable.fills.len(), 4);
        assert_eq!(drawable.fills[0].position, min);
        assert_eq!(drawable.fills[2].position, max);
        assert_eq!(drawable.fills[1].position, Vector2F { x: 3.0, y: 2.0 });
    }
}
