// quill/renderer/src/settings.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tunable renderer settings.

use quill_color::ColorF;

/// Renderer behavior knobs, owned by the renderer instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererSettings {
    /// Maximum distance between a curve and its polyline approximation, in
    /// device pixels. Smaller values produce more geometry.
    pub flattening_tolerance: f64,
    /// Maximum parallel-curve error when offsetting strokes, in device
    /// pixels.
    pub stroking_tolerance: f64,
    /// Paths whose transformed bounding rect area falls below this many
    /// square pixels are dropped without tiling.
    pub culling_threshold: f64,

    /// Size of the square editing handles, in pixels.
    pub ui_handle_size: f64,
    /// Width of overlay lines, in pixels.
    pub ui_line_width: f64,
    /// Accent color of the overlay.
    pub ui_primary_color: ColorF,
}

impl Default for RendererSettings {
    fn default() -> RendererSettings {
        RendererSettings {
            flattening_tolerance: 0.25,
            stroking_tolerance: 0.1,
            culling_threshold: 1.0,
            ui_handle_size: 4.0,
            ui_line_width: 1.0,
            ui_primary_color: ColorF::new(0.18, 0.49, 0.96, 1.0),
        }
    }
}
