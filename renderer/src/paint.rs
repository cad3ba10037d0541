// quill/renderer/src/paint.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Paints and the drawing attributes built from them.

use quill_color::ColorF;
use quill_content::fill::FillRule;
use quill_content::gradient::Gradient;
use quill_content::stroke::{LineCap, LineJoin};
use quill_geometry::transform2d::Transform2D;
use std::collections::HashSet;

/// An opaque 64-bit id resolved by the external resource manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaintId(pub u64);

/// An opaque 64-bit id of a document entity, used as a cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// What a path is painted with. References are resolved externally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Color(ColorF),
    Swatch(PaintId),
    Gradient(PaintId),
    Texture(PaintId),
}

/// The wire tag of a paint kind, as stored in the packed vertex attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintType {
    Color = 0,
    Swatch = 1,
    Gradient = 2,
    Texture = 3,
}

impl Paint {
    #[inline]
    pub fn black() -> Paint {
        Paint::Color(ColorF::black())
    }

    #[inline]
    pub fn paint_type(&self) -> PaintType {
        match *self {
            Paint::Color(_) => PaintType::Color,
            Paint::Swatch(_) => PaintType::Swatch,
            Paint::Gradient(_) => PaintType::Gradient,
            Paint::Texture(_) => PaintType::Texture,
        }
    }

    #[inline]
    pub fn id(&self) -> Option<PaintId> {
        match *self {
            Paint::Color(_) => None,
            Paint::Swatch(id) | Paint::Gradient(id) | Paint::Texture(id) => Some(id),
        }
    }

    /// Whether drawing with this paint can have any effect.
    #[inline]
    pub fn is_visible(&self) -> bool {
        match *self {
            Paint::Color(color) => color.a > 0.0,
            _ => true,
        }
    }
}

/// Fill attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fill {
    pub paint: Paint,
    pub rule: FillRule,
}

impl Fill {
    #[inline]
    pub fn new(paint: Paint, rule: FillRule) -> Fill {
        Fill { paint, rule }
    }
}

impl Default for Fill {
    #[inline]
    fn default() -> Fill {
        Fill { paint: Paint::black(), rule: FillRule::NonZero }
    }
}

/// Stroke attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub cap: LineCap,
    pub join: LineJoin,
    pub width: f64,
    pub miter_limit: f64,
}

impl Stroke {
    #[inline]
    pub fn new(paint: Paint, width: f64) -> Stroke {
        Stroke { paint, cap: LineCap::Butt, join: LineJoin::Miter, width, miter_limit: 10.0 }
    }

    #[inline]
    pub fn style(&self) -> quill_content::stroke::StrokeStyle {
        quill_content::stroke::StrokeStyle {
            width: self.width,
            cap: self.cap,
            join: self.join,
            miter_limit: self.miter_limit,
        }
    }
}

/// Outline attributes for the editing overlay.
#[derive(Clone, Debug)]
pub struct Outline<'a> {
    pub color: ColorF,
    pub draw_vertices: bool,
    /// `None` means every vertex is selected.
    pub selected_vertices: Option<&'a HashSet<usize>>,
}

/// The blending mode of a drawable. Only `Normal` currently maps to a
/// dedicated GPU blend state; the rest are carried through the vertex format
/// for forward compatibility and composite as `Normal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Normal = 0,
    Dissolve,
    Behind,
    Clear,
    Darken,
    Multiply,
    ColorBurn,
    LinearBurn,
    Lighten,
    Screen,
    ColorDodge,
    Add,
    Overlay,
    SoftLight,
    HardLight,
    VividLight,
    LinearLight,
    PinLight,
    HardMix,
    Difference,
    Exclusion,
    Subtract,
    Divide,
    Hue,
    Saturation,
    Color,
    Luminosity,
    LighterColor,
    DarkerColor,
}

impl Default for BlendMode {
    #[inline]
    fn default() -> BlendMode {
        BlendMode::Normal
    }
}

impl BlendMode {
    /// The GPU blend state of the mode. Partial: only `Normal` is exercised
    /// by the editor today, everything else composites like `Normal`.
    pub fn to_blend_state(self) -> quill_gpu::BlendState {
        quill_gpu::BlendState::default()
    }
}

/// Per-drawable compositing attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub blend_mode: BlendMode,
    pub opacity: f32,
}

impl Default for Appearance {
    #[inline]
    fn default() -> Appearance {
        Appearance { blend_mode: BlendMode::Normal, opacity: 1.0 }
    }
}

/// A decoded image handed over by the resource manager.
pub struct ImageData<'a> {
    pub pixels: &'a [u8],
    pub size: quill_geometry::vector::Vector2I,
    pub channels: u32,
}

/// The external resource manager the renderer resolves paint references
/// against.
pub trait ResourceManager {
    fn get_image(&self, id: PaintId) -> Option<ImageData>;
    fn get_gradient(&self, id: PaintId) -> Option<(&Gradient, Transform2D)>;
    fn get_swatch(&self, id: PaintId) -> Option<ColorF>;
}

/// A resource manager with no resources; every reference misses and falls
/// back.
pub struct NoResources;

impl ResourceManager for NoResources {
    fn get_image(&self, _: PaintId) -> Option<ImageData> {
        None
    }
    fn get_gradient(&self, _: PaintId) -> Option<(&Gradient, Transform2D)> {
        None
    }
    fn get_swatch(&self, _: PaintId) -> Option<ColorF> {
        None
    }
}
