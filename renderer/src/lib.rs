// quill/renderer/src/lib.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Quill rendering core: converts transformed Bézier paths with fill,
//! stroke and outline attributes into GPU draw calls, reusing work across
//! frames through a viewport cache.

#[macro_use]
extern crate log;

pub mod batch;
pub mod cache;
pub mod drawable;
pub mod gpu;
pub mod instances;
pub mod options;
pub mod paint;
pub mod settings;
pub mod tiler;

pub use crate::gpu::renderer::{RenderStats, Renderer};
pub use crate::options::{DrawingOptions, RenderOptions, Viewport};
pub use crate::paint::{EntityId, Fill, Outline, Paint, PaintId, Stroke};
