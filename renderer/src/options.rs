// quill/renderer/src/options.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-frame and per-draw options.

use crate::paint::{Fill, Outline, Stroke};
use quill_color::ColorF;
use quill_geometry::rect::RectD;
use quill_geometry::vector::{vec2d, Vector2D, Vector2I};

/// The area of the screen the renderer draws, and its mapping into the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Size in physical pixels.
    pub size: Vector2I,
    /// Scene-space translation of the viewport origin.
    pub position: Vector2D,
    /// Pixels per scene unit, pre-multiplied by the device pixel ratio.
    pub zoom: f64,
    /// The device pixel ratio.
    pub dpr: f64,
    /// Clear color.
    pub background: ColorF,
}

impl Viewport {
    pub fn new(size: Vector2I,
               position: Vector2D,
               zoom: f64,
               dpr: f64,
               background: ColorF)
               -> Viewport {
        Viewport { size, position, zoom, dpr, background }
    }

    /// The scene-space rect visible through the viewport.
    #[inline]
    pub fn visible(&self) -> RectD {
        let min = -self.position;
        RectD::new(min, min + self.size.to_f64() / self.zoom)
    }

    /// Converts a client-space point to scene space.
    #[inline]
    pub fn project(&self, p: Vector2D) -> Vector2D {
        p / self.zoom - self.position
    }
}

impl Default for Viewport {
    fn default() -> Viewport {
        Viewport {
            size: Vector2I { x: 0, y: 0 },
            position: vec2d(0.0, 0.0),
            zoom: 1.0,
            dpr: 1.0,
            background: ColorF::white(),
        }
    }
}

/// Options for one frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub viewport: Viewport,
    /// Redraw everything from scratch, bypassing the cache this frame.
    pub ignore_cache: bool,
}

/// Which attributes to draw a path with. All optional; a draw with none is a
/// no-op.
#[derive(Clone, Default)]
pub struct DrawingOptions<'a> {
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
    pub outline: Option<Outline<'a>>,
}
