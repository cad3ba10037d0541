// quill/renderer/src/cache.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The renderer-side cache: a coarse screen-aligned validity grid plus
//! memoized bounding rects and drawables keyed by entity id.
//!
//! The document drives invalidation: any mutation whose screen-space effect
//! intersects the grid is reported through [`RendererCache::invalidate_rect`]
//! between frames.

use crate::drawable::Drawable;
use crate::paint::EntityId;
use hashbrown::HashMap;
use quill_geometry::rect::{RectD, RectF};
use quill_geometry::vector::{vec2d, vec2i, Vector2I};

/// Approximate screen pixels per validity cell.
pub const CACHE_CELL_SIDE: f32 = 256.0;

pub struct RendererCache {
    bounding_rects: HashMap<EntityId, RectD>,
    drawables: HashMap<EntityId, Drawable>,

    grid: Vec<bool>,
    invalid_rects: Vec<RectF>,
    subdivisions: Vector2I,
    grid_rect: RectF,
}

impl RendererCache {
    pub fn new() -> RendererCache {
        RendererCache {
            bounding_rects: HashMap::new(),
            drawables: HashMap::new(),
            grid: vec![],
            invalid_rects: vec![],
            subdivisions: Vector2I::default(),
            grid_rect: RectF::default(),
        }
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.bounding_rects.clear();
        self.drawables.clear();
        for valid in &mut self.grid {
            *valid = false;
        }
        self.invalid_rects.clear();
    }

    /// Releases the cached state of one entity. Must be called when the
    /// entity is removed from the document, to bound memory.
    pub fn clear_id(&mut self, id: EntityId) {
        self.bounding_rects.remove(&id);
        self.drawables.remove(&id);
    }

    /// Sets the screen region covered by the validity grid. Called when the
    /// viewport changes; every cell starts invalid.
    pub fn set_grid_rect(&mut self, grid_rect: RectF, subdivisions: Vector2I) {
        self.grid_rect = grid_rect;
        self.subdivisions = subdivisions;
        self.grid.clear();
        self.grid.resize((subdivisions.x * subdivisions.y).max(0) as usize, false);
        self.invalid_rects.clear();
        self.invalid_rects.push(grid_rect);
    }

    /// Resets the grid for a viewport panned by `shift` whole pixels: the
    /// region still covered by the previous frame starts valid, the exposed
    /// strips start invalid.
    pub fn reset_with_shift(&mut self,
                            grid_rect: RectF,
                            subdivisions: Vector2I,
                            shift: Vector2I) {
        self.set_grid_rect(grid_rect, subdivisions);
        self.invalid_rects.clear();

        let shifted = RectF::new(
            quill_geometry::vector::vec2f(grid_rect.min.x + shift.x as f32,
                                          grid_rect.min.y + shift.y as f32),
            quill_geometry::vector::vec2f(grid_rect.max.x + shift.x as f32,
                                          grid_rect.max.y + shift.y as f32),
        );
        let overlap = match grid_rect.intersection(&shifted) {
            Some(overlap) => overlap,
            None => {
                self.invalid_rects.push(grid_rect);
                return;
            }
        };
        self.validate_rect(overlap);

        // The exposed complement, as up to one horizontal and one vertical
        // strip.
        if overlap.min.x > grid_rect.min.x {
            self.invalidate_rect(RectF::new(grid_rect.min,
                                            quill_geometry::vector::vec2f(overlap.min.x,
                                                                          grid_rect.max.y)));
        }
        if overlap.max.x < grid_rect.max.x {
            self.invalidate_rect(RectF::new(quill_geometry::vector::vec2f(overlap.max.x,
                                                                          grid_rect.min.y),
                                            grid_rect.max));
        }
        if overlap.min.y > grid_rect.min.y {
            self.invalidate_rect(RectF::new(grid_rect.min,
                                            quill_geometry::vector::vec2f(grid_rect.max.x,
                                                                          overlap.min.y)));
        }
        if overlap.max.y < grid_rect.max.y {
            self.invalidate_rect(RectF::new(quill_geometry::vector::vec2f(grid_rect.min.x,
                                                                          overlap.max.y),
                                            grid_rect.max));
        }
    }

    /// The subdivisions that give roughly [`CACHE_CELL_SIDE`]-pixel cells for
    /// a viewport.
    pub fn subdivisions_for(viewport_size: Vector2I) -> Vector2I {
        vec2i(((viewport_size.x as f32 / CACHE_CELL_SIDE).ceil() as i32).max(1),
              ((viewport_size.y as f32 / CACHE_CELL_SIDE).ceil() as i32).max(1))
    }

    /// Marks every grid cell touched by the rect invalid and queues the rect.
    pub fn invalidate_rect(&mut self, invalidated_rect: RectF) {
        if self.grid.is_empty() || !self.grid_rect.intersects(&invalidated_rect) {
            return;
        }

        let cell = vec2d((self.grid_rect.width() / self.subdivisions.x as f32) as f64,
                         (self.grid_rect.height() / self.subdivisions.y as f32) as f64);
        let min_x = (((invalidated_rect.min.x - self.grid_rect.min.x) as f64 / cell.x).floor()
            as i32)
            .max(0);
        let min_y = (((invalidated_rect.min.y - self.grid_rect.min.y) as f64 / cell.y).floor()
            as i32)
            .max(0);
        let max_x = (((invalidated_rect.max.x - self.grid_rect.min.x) as f64 / cell.x).ceil()
            as i32)
            .min(self.subdivisions.x);
        let max_y = (((invalidated_rect.max.y - self.grid_rect.min.y) as f64 / cell.y).ceil()
            as i32)
            .min(self.subdivisions.y);

        for y in min_y..max_y {
            for x in min_x..max_x {
                self.grid[(y * self.subdivisions.x + x) as usize] = false;
            }
        }

        self.invalid_rects.push(invalidated_rect);
    }

    /// Marks every cell covered by the rect as freshly drawn.
    pub fn validate_rect(&mut self, rect: RectF) {
        if self.grid.is_empty() {
            return;
        }
        let cell_w = self.grid_rect.width() / self.subdivisions.x as f32;
        let cell_h = self.grid_rect.height() / self.subdivisions.y as f32;
        for y in 0..self.subdivisions.y {
            for x in 0..self.subdivisions.x {
                let cell_rect = RectF::new(
                    quill_geometry::vector::vec2f(self.grid_rect.min.x + x as f32 * cell_w,
                                                  self.grid_rect.min.y + y as f32 * cell_h),
                    quill_geometry::vector::vec2f(self.grid_rect.min.x + (x + 1) as f32 * cell_w,
                                                  self.grid_rect.min.y + (y + 1) as f32 * cell_h),
                );
                if rect.contains_rect(&cell_rect) {
                    self.grid[(y * self.subdivisions.x + x) as usize] = true;
                }
            }
        }
        self.invalid_rects.retain(|invalid| !rect.contains_rect(invalid));
    }

    #[inline]
    pub fn invalid_rects(&self) -> &[RectF] {
        &self.invalid_rects
    }

    #[inline]
    pub fn is_fully_valid(&self) -> bool {
        !self.grid.is_empty() && self.grid.iter().all(|&valid| valid)
    }

    // Bounding rects

    pub fn bounding_rect(&self, id: EntityId) -> Option<&RectD> {
        self.bounding_rects.get(&id)
    }

    /// Memoizing lookup.
    pub fn bounding_rect_or_insert<F>(&mut self, id: EntityId, compute: F) -> RectD
    where
        F: FnOnce() -> RectD,
    {
        *self.bounding_rects.entry(id).or_insert_with(compute)
    }

    pub fn set_bounding_rect(&mut self, id: EntityId, bounding_rect: RectD) {
        self.bounding_rects.insert(id, bounding_rect);
    }

    // Drawables

    pub fn drawable(&self, id: EntityId) -> Option<&Drawable> {
        self.drawables.get(&id)
    }

    pub fn set_drawable(&mut self, id: EntityId, drawable: Drawable) {
        self.drawables.insert(id, drawable);
    }

    pub fn has_drawable(&self, id: EntityId) -> bool {
        self.drawables.contains_key(&id)
    }

    /// Drops every cached drawable whose valid rect no longer covers its
    /// visible portion. Called at the start of each frame.
    pub fn evict_outside(&mut self, visible: &RectD) {
        self.drawables.retain(|_, drawable| {
            match drawable.bounding_rect.intersection(visible) {
                Some(needed) => drawable.valid_rect.contains_rect(&needed),
                None => true,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_geometry::vector::vec2f;

    fn grid_1024() -> RendererCache {
        let mut cache = RendererCache::new();
        cache.set_grid_rect(RectF::new(vec2f(0.0, 0.0), vec2f(1024.0, 1024.0)), vec2i(4, 4));
        cache
    }

    #[test]
    fn test_fresh_grid_is_invalid() {
        let cache = grid_1024();
        assert!(!cache.is_fully_valid());
        assert_eq!(cache.invalid_rects().len(), 1);
    }

    #[test]
    fn test_validate_then_invalidate() {
        let mut cache = grid_1024();
        cache.validate_rect(RectF::new(vec2f(0.0, 0.0), vec2f(1024.0, 1024.0)));
        assert!(cache.is_fully_valid());
        assert!(cache.invalid_rects().is_empty());

        cache.invalidate_rect(RectF::new(vec2f(10.0, 10.0), vec2f(20.0, 20.0)));
        assert!(!cache.is_fully_valid());
        assert_eq!(cache.invalid_rects().len(), 1);
    }

    #[test]
    fn test_invalidate_outside_grid_ignored() {
        let mut cache = grid_1024();
        cache.validate_rect(RectF::new(vec2f(0.0, 0.0), vec2f(1024.0, 1024.0)));
        cache.invalidate_rect(RectF::new(vec2f(2000.0, 0.0), vec2f(2100.0, 100.0)));
        assert!(cache.is_fully_valid());
    }

    #[test]
    fn test_entity_lifecycle() {
        let mut cache = grid_1024();
        let id = EntityId(7);
        let rect = cache.bounding_rect_or_insert(id, || {
            RectD::new(vec2d(0.0, 0.0), vec2d(10.0, 10.0))
        });
        assert_eq!(cache.bounding_rect(id), Some(&rect));

        cache.set_drawable(id, Drawable::default());
        assert!(cache.has_drawable(id));

        cache.clear_id(id);
        assert!(cache.bounding_rect(id).is_none());
        assert!(!cache.has_drawable(id));
    }

    #[test]
    fn test_evict_outside() {
        let mut cache = grid_1024();
        let visible = RectD::new(vec2d(0.0, 0.0), vec2d(100.0, 100.0));

        let mut covered = Drawable::default();
        covered.valid_rect = RectD::new(vec2d(-10.0, -10.0), vec2d(200.0, 200.0));
        covered.bounding_rect = RectD::new(vec2d(0.0, 0.0), vec2d(50.0, 50.0));
        cache.set_drawable(EntityId(1), covered);

        let mut stale = Drawable::default();
        stale.valid_rect = RectD::new(vec2d(0.0, 0.0), vec2d(30.0, 30.0));
        stale.bounding_rect = RectD::new(vec2d(0.0, 0.0), vec2d(50.0, 50.0));
        cache.set_drawable(EntityId(2), stale);

        cache.evict_outside(&visible);
        assert!(cache.has_drawable(EntityId(1)));
        assert!(!cache.has_drawable(EntityId(2)));
    }
}
