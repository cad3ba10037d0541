// quill/renderer/src/gpu/renderer.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The renderer: frame orchestration, cached compositing and batch flushing.
//!
//! A frame renders the scene layer into an offscreen framebuffer that doubles
//! as the cache: when the camera is unchanged, the previous frame's color
//! attachment is blitted back and only drawables intersecting invalidated
//! rects are redrawn. The UI and debug layers are drawn directly to the
//! output every frame, after the scene blit.

#[cfg(feature = "debug_overlay")]
use crate::gpu::debug::DebugOverlay;

use crate::batch::{BatchPacker, PushResult, BANDS_TEXTURE_SIZE, CURVES_TEXTURE_SIZE};
use crate::batch::{MAX_PAINT_TEXTURES, MAX_VERTICES};
use crate::cache::RendererCache;
use crate::drawable::Drawable;
use crate::gpu::shaders::{BlitProgram, BlitVertexArray, FillProgram, FillVertexArray};
use crate::gpu::shaders::{PrimitiveProgram, PrimitiveVertexArray, TileProgram, TileVertexArray};
use crate::instances::InstanceBuffer;
use crate::options::{DrawingOptions, RenderOptions, Viewport};
use crate::paint::{EntityId, Outline, Paint, PaintId, PaintType, ResourceManager};
use crate::settings::RendererSettings;
use crate::tiler::{TileAttributes, Tiler};
use fxhash::{FxHashMap, FxHashSet};
use instant::Instant;
use quill_color::ColorF;
use quill_content::clip;
use quill_content::cubic_path::CubicMultipath;
use quill_content::fill::FillRule;
use quill_content::flatten;
use quill_content::path::Path;
use quill_content::stroke;
use quill_geometry::rect::{RectD, RectF, RectI};
use quill_geometry::transform2d::Transform2D;
use quill_geometry::vector::{vec2d, vec2f, Vector2F, Vector2I};
use quill_gpu::{BlendState, BufferData, BufferTarget, BufferUploadMode, ClearOps, DepthFunc};
use quill_gpu::{DepthState, Device, FramebufferAttachments, Primitive, RenderState};
use quill_gpu::{RenderTarget, TextureDataRef, TextureFormat, TextureSamplingFlags, UniformData};
use quill_resources::ResourceLoader;
use std::mem;
use std::time::Duration;

const MAX_UI_INSTANCES: usize = 1 << 14;
const GRADIENT_STRIP_LENGTH: i32 = 256;

static QUAD_CORNERS: [u8; 12] = [0, 0, 1, 0, 1, 1, 1, 1, 0, 1, 0, 0];

/// Counters for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderStats {
    pub path_count: usize,
    pub drawable_count: usize,
    pub cache_hits: usize,
    pub tile_count: usize,
    pub fill_count: usize,
    pub batch_flushes: usize,
    pub device_errors: u32,
    pub cpu_frame_time: Duration,
}

enum CacheBlit {
    None,
    Previous(Vector2I),
}

/// The renderer. One instance per GPU context; all state is explicit.
pub struct Renderer<D>
where
    D: Device,
{
    pub device: D,
    pub stats: RenderStats,

    settings: RendererSettings,
    cache: RendererCache,
    tiler: Tiler,
    packer: BatchPacker,
    ui_instances: InstanceBuffer,
    #[cfg(feature = "debug_overlay")]
    debug_overlay: DebugOverlay,

    tile_program: TileProgram<D>,
    fill_program: FillProgram<D>,
    primitive_program: PrimitiveProgram<D>,
    blit_program: BlitProgram<D>,
    tile_vertex_array: TileVertexArray<D>,
    fill_vertex_array: FillVertexArray<D>,
    primitive_vertex_array: PrimitiveVertexArray<D>,
    blit_vertex_array: BlitVertexArray<D>,

    tile_vertex_buffer: D::Buffer,
    fill_vertex_buffer: D::Buffer,
    quad_index_buffer: D::Buffer,
    corner_buffer: D::Buffer,
    corner_index_buffer: D::Buffer,
    instance_buffer: D::Buffer,

    curves_texture: D::Texture,
    bands_texture: D::Texture,
    fallback_texture: D::Texture,
    curves_staging: Vec<f32>,
    bands_staging: Vec<u16>,

    scene_framebuffer: Option<D::Framebuffer>,
    cache_framebuffer: Option<D::Framebuffer>,

    paint_textures: FxHashMap<PaintId, D::Texture>,
    missing_paints: FxHashSet<PaintId>,

    viewport: Viewport,
    last_viewport: Option<Viewport>,
    frame_invalid_rects: Vec<RectF>,
    cached_rendering: bool,
    pending_clear: Option<ColorF>,
    frame_start: Option<Instant>,
}

impl<D> Renderer<D>
where
    D: Device,
{
    pub fn new(device: D, resources: &dyn ResourceLoader) -> Renderer<D> {
        let tile_program = TileProgram::new(&device, resources);
        let fill_program = FillProgram::new(&device, resources);
        let primitive_program = PrimitiveProgram::new(&device, resources);
        let blit_program = BlitProgram::new(&device, resources);

        let tile_vertex_buffer = device.create_buffer();
        device.allocate_buffer::<crate::drawable::TileVertex>(
            &tile_vertex_buffer,
            BufferData::Uninitialized(MAX_VERTICES),
            BufferTarget::Vertex,
            BufferUploadMode::Dynamic,
        );
        let fill_vertex_buffer = device.create_buffer();
        device.allocate_buffer::<crate::drawable::FillVertex>(
            &fill_vertex_buffer,
            BufferData::Uninitialized(MAX_VERTICES),
            BufferTarget::Vertex,
            BufferUploadMode::Dynamic,
        );

        // The static quad index pattern, replicated to full capacity.
        let mut quad_indices: Vec<u32> = Vec::with_capacity(MAX_VERTICES / 4 * 6);
        for quad in 0..(MAX_VERTICES / 4) as u32 {
            let base = quad * 4;
            quad_indices.extend_from_slice(&[base, base + 1, base + 2,
                                             base + 2, base + 3, base]);
        }
        let quad_index_buffer = device.create_buffer();
        device.allocate_buffer(&quad_index_buffer,
                               BufferData::Memory(&quad_indices),
                               BufferTarget::Index,
                               BufferUploadMode::Static);

        let corner_buffer = device.create_buffer();
        device.allocate_buffer(&corner_buffer,
                               BufferData::Memory(&QUAD_CORNERS),
                               BufferTarget::Vertex,
                               BufferUploadMode::Static);
        let corner_index_buffer = device.create_buffer();
        device.allocate_buffer(&corner_index_buffer,
                               BufferData::Memory(&[0u32, 1, 2, 3, 4, 5]),
                               BufferTarget::Index,
                               BufferUploadMode::Static);

        let instance_buffer = device.create_buffer();
        device.allocate_buffer::<crate::instances::PrimitiveInstance>(
            &instance_buffer,
            BufferData::Uninitialized(MAX_UI_INSTANCES),
            BufferTarget::Vertex,
            BufferUploadMode::Stream,
        );

        let tile_vertex_array =
            TileVertexArray::new(&device, &tile_program, &tile_vertex_buffer, &quad_index_buffer);
        let fill_vertex_array =
            FillVertexArray::new(&device, &fill_program, &fill_vertex_buffer, &quad_index_buffer);
        let primitive_vertex_array = PrimitiveVertexArray::new(&device,
                                                               &primitive_program,
                                                               &corner_buffer,
                                                               &instance_buffer,
                                                               &corner_index_buffer);
        let blit_vertex_array =
            BlitVertexArray::new(&device, &blit_program, &corner_buffer, &corner_index_buffer);

        let lookup_flags = TextureSamplingFlags::NEAREST_MIN | TextureSamplingFlags::NEAREST_MAG;
        let curves_texture = device.create_texture(
            TextureFormat::RGBA32F,
            Vector2I { x: CURVES_TEXTURE_SIZE as i32, y: CURVES_TEXTURE_SIZE as i32 },
        );
        device.set_texture_sampling_mode(&curves_texture, lookup_flags);
        let bands_texture = device.create_texture(
            TextureFormat::R16UI,
            Vector2I { x: BANDS_TEXTURE_SIZE as i32, y: BANDS_TEXTURE_SIZE as i32 },
        );
        device.set_texture_sampling_mode(&bands_texture, lookup_flags);

        // Missing paints render through this, per the fallback policy.
        let fallback_texture = device.create_texture_from_data(TextureFormat::RGBA8,
                                                               Vector2I { x: 1, y: 1 },
                                                               TextureDataRef::U8(&[255, 0, 255,
                                                                                    255]));

        Renderer {
            device,
            stats: RenderStats::default(),
            settings: RendererSettings::default(),
            cache: RendererCache::new(),
            tiler: Tiler::new(),
            packer: BatchPacker::new(),
            ui_instances: InstanceBuffer::new(MAX_UI_INSTANCES),
            #[cfg(feature = "debug_overlay")]
            debug_overlay: DebugOverlay::new(),
            tile_program,
            fill_program,
            primitive_program,
            blit_program,
            tile_vertex_array,
            fill_vertex_array,
            primitive_vertex_array,
            blit_vertex_array,
            tile_vertex_buffer,
            fill_vertex_buffer,
            quad_index_buffer,
            corner_buffer,
            corner_index_buffer,
            instance_buffer,
            curves_texture,
            bands_texture,
            fallback_texture,
            curves_staging: vec![],
            bands_staging: vec![],
            scene_framebuffer: None,
            cache_framebuffer: None,
            paint_textures: FxHashMap::default(),
            missing_paints: FxHashSet::default(),
            viewport: Viewport::default(),
            last_viewport: None,
            frame_invalid_rects: vec![],
            cached_rendering: false,
            pending_clear: None,
            frame_start: None,
        }
    }

    #[inline]
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    /// The cache interface the document invalidates through.
    #[inline]
    pub fn cache_mut(&mut self) -> &mut RendererCache {
        &mut self.cache
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Starts a frame: snapshots the viewport, decides whether the previous
    /// frame can be reused, and prepares the scene target.
    pub fn begin_frame(&mut self, options: &RenderOptions) {
        self.frame_start = Some(Instant::now());
        self.stats = RenderStats::default();
        self.device.begin_commands();

        let viewport = options.viewport;
        let size_changed =
            self.last_viewport.map_or(true, |last| last.size != viewport.size);
        if size_changed {
            self.recreate_framebuffers(viewport.size);
        }

        let grid_rect = RectF::new(vec2f(0.0, 0.0),
                                   vec2f(viewport.size.x as f32, viewport.size.y as f32));
        let subdivisions = RendererCache::subdivisions_for(viewport.size);

        let mut blit = CacheBlit::None;
        match self.last_viewport {
            None => self.cache.set_grid_rect(grid_rect, subdivisions),
            Some(_) if options.ignore_cache || size_changed => {
                self.cache.set_grid_rect(grid_rect, subdivisions);
            }
            Some(last) if last.zoom != viewport.zoom => {
                self.cache.set_grid_rect(grid_rect, subdivisions);
            }
            Some(last) if last.position != viewport.position => {
                // A pure pan: the old frame is reusable, shifted.
                let shift = (viewport.position - last.position) * viewport.zoom;
                let rounded = vec2d(shift.x.round(), shift.y.round());
                if (shift - rounded).length() < 1e-3 {
                    let shift_px = Vector2I { x: rounded.x as i32, y: rounded.y as i32 };
                    self.cache.reset_with_shift(grid_rect, subdivisions, shift_px);
                    blit = CacheBlit::Previous(shift_px);
                } else {
                    self.cache.set_grid_rect(grid_rect, subdivisions);
                }
            }
            Some(_) => {
                // Camera unchanged; pending document invalidations remain.
                blit = CacheBlit::Previous(Vector2I::default());
            }
        }

        self.viewport = viewport;
        self.last_viewport = Some(viewport);
        self.cached_rendering = !options.ignore_cache;
        self.frame_invalid_rects = self.cache.invalid_rects().to_vec();
        self.pending_clear = Some(viewport.background);

        let visible = viewport.visible();
        self.cache.evict_outside(&visible);
        self.tiler.setup(viewport.zoom, visible, self.settings.flattening_tolerance);
        self.packer.begin_frame();
        self.ui_instances.clear();
        #[cfg(feature = "debug_overlay")]
        self.debug_overlay.clear();

        if self.cached_rendering {
            if let CacheBlit::Previous(shift) = blit {
                self.blit_cache_into_scene(shift);
                self.clear_invalid_regions();
            }
        }
    }

    /// Draws a path into the scene layer, with optional outline overlays.
    /// Returns whether the path was visible.
    pub fn draw(&mut self,
                path: &Path,
                transform: &Transform2D,
                options: &DrawingOptions,
                id: Option<EntityId>,
                resources: &dyn ResourceManager)
                -> bool {
        if path.is_empty() {
            return false;
        }
        self.stats.path_count += 1;

        let has_fill = options.fill.map_or(false, |fill| fill.paint.is_visible());
        let has_stroke =
            options.stroke.map_or(false, |stroke| stroke.width > 0.0 && stroke.paint.is_visible());

        let base_bounds = match id {
            Some(id) => {
                let path_ref = &path;
                self.cache.bounding_rect_or_insert(id, || {
                    path_ref.bounding_rect_transformed(transform)
                })
            }
            None => path.bounding_rect_transformed(transform),
        };
        let stroke_margin = options.stroke.map_or(0.0, |stroke| {
            let factor = if stroke.join == stroke::LineJoin::Miter {
                stroke.miter_limit
            } else {
                1.0
            };
            stroke.width * 0.5 * factor
        });
        let bounds = base_bounds.dilate(stroke_margin);

        let visible = self.viewport.visible();
        if !bounds.intersects(&visible) {
            return false;
        }

        let zoom = self.viewport.zoom;
        if bounds.area() * zoom * zoom < self.settings.culling_threshold {
            return false;
        }

        if has_fill || has_stroke {
            let screen_bounds = self.to_screen_rect(&bounds);
            let region_valid = self.cached_rendering &&
                !self.frame_invalid_rects.iter().any(|rect| rect.intersects(&screen_bounds));
            if region_valid {
                self.stats.cache_hits += 1;
            } else {
                self.draw_scene_path(path, transform, options, &bounds, id, resources);
            }
        }

        if let Some(ref outline) = options.outline {
            self.push_outline(path, transform, outline);
        }

        true
    }

    /// Ends the frame: flushes the scene, presents it, then draws the UI and
    /// debug layers on top.
    pub fn end_frame(&mut self) {
        self.flush_scene_batch();
        self.present_scene();
        self.flush_ui_layer();
        #[cfg(feature = "debug_overlay")]
        self.flush_debug_layer();

        // The just-drawn scene becomes next frame's cache.
        mem::swap(&mut self.scene_framebuffer, &mut self.cache_framebuffer);
        let grid_rect = RectF::new(vec2f(0.0, 0.0),
                                   vec2f(self.viewport.size.x as f32,
                                         self.viewport.size.y as f32));
        self.cache.validate_rect(grid_rect);

        self.stats.device_errors += self.device.take_error_count();
        if let Some(start) = self.frame_start.take() {
            self.stats.cpu_frame_time = start.elapsed();
        }
        self.device.end_commands();
    }

    // UI layer

    pub fn ui_line(&mut self, start: Vector2F, end: Vector2F, color: ColorF, width: f32) {
        self.ui_instances.push_line(start, end, color, width);
    }

    pub fn ui_rect(&mut self, rect: &RectF, color: ColorF) {
        self.ui_instances.push_rect(rect, color);
    }

    pub fn ui_square(&mut self, center: Vector2F, radius: f32, color: ColorF) {
        self.ui_instances.push_square(center, radius, color);
    }

    pub fn ui_circle(&mut self, center: Vector2F, radius: f32, color: ColorF) {
        self.ui_instances.push_circle(center, radius, color);
    }

    // Debug layer

    #[cfg(feature = "debug_overlay")]
    pub fn debug_rect(&mut self, rect: &RectF, color: ColorF) {
        self.debug_overlay.rect(rect, color);
    }

    #[cfg(feature = "debug_overlay")]
    pub fn debug_square(&mut self, center: Vector2F, radius: f32, color: ColorF) {
        self.debug_overlay.square(center, radius, color);
    }

    #[cfg(feature = "debug_overlay")]
    pub fn debug_circle(&mut self, center: Vector2F, radius: f32, color: ColorF) {
        self.debug_overlay.circle(center, radius, color);
    }

    #[cfg(feature = "debug_overlay")]
    pub fn debug_line(&mut self, start: Vector2F, end: Vector2F, color: ColorF) {
        self.debug_overlay.line(start, end, color);
    }

    #[cfg(feature = "debug_overlay")]
    pub fn debug_lines(&mut self, points: &[Vector2F], color: ColorF) {
        self.debug_overlay.lines(points, color);
    }

    // Scene building

    fn draw_scene_path(&mut self,
                       path: &Path,
                       transform: &Transform2D,
                       options: &DrawingOptions,
                       bounds: &RectD,
                       id: Option<EntityId>,
                       resources: &dyn ResourceManager) {
        let visible = self.viewport.visible();
        let needed = match bounds.intersection(&visible) {
            Some(needed) => needed,
            None => return,
        };

        let cached_usable = match id.and_then(|id| self.cache.drawable(id)) {
            Some(drawable) => {
                drawable.valid_rect.contains_rect(&needed) && drawable.lod == self.tiler.lod()
            }
            None => false,
        };

        if !cached_usable {
            let mut lod_bias = 0u8;
            let drawable = loop {
                let drawable =
                    self.build_drawable(path, transform, options, bounds, lod_bias, resources);
                if !BatchPacker::exceeds_empty_batch(&drawable) || lod_bias >= 4 {
                    break drawable;
                }
                // Too dense for a whole empty batch: re-tile coarser.
                lod_bias += 1;
            };
            match id {
                Some(id) => self.cache.set_drawable(id, drawable),
                None => {
                    self.push_drawable_flushing(&drawable);
                    self.stats.drawable_count += 1;
                    return;
                }
            }
        }

        let id = id.expect("cached path without an id");
        self.stats.drawable_count += 1;
        loop {
            let result = {
                let drawable = self.cache.drawable(id).expect("drawable vanished");
                self.packer.push_drawable(drawable)
            };
            match result {
                PushResult::Pushed => break,
                PushResult::NeedsFlush => self.flush_scene_batch(),
            }
        }
    }

    fn push_drawable_flushing(&mut self, drawable: &Drawable) {
        loop {
            match self.packer.push_drawable(drawable) {
                PushResult::Pushed => return,
                PushResult::NeedsFlush => self.flush_scene_batch(),
            }
        }
    }

    /// Clips, strokes and tiles one path into a fresh drawable.
    fn build_drawable(&mut self,
                      path: &Path,
                      transform: &Transform2D,
                      options: &DrawingOptions,
                      bounds: &RectD,
                      lod_bias: u8,
                      resources: &dyn ResourceManager)
                      -> Drawable {
        let visible = self.viewport.visible();
        if lod_bias > 0 {
            let coarse_zoom = self.viewport.zoom / (1u32 << lod_bias) as f64;
            self.tiler.setup(coarse_zoom, visible, self.settings.flattening_tolerance);
        }

        let cell = self.tiler.cell_size();
        let clip_rect = visible.dilate(cell * 2.0);
        let valid_rect = visible.dilate(cell);

        let mut drawable = Drawable::new(*bounds, valid_rect);
        let zoom = self.viewport.zoom;

        if let Some(fill) = options.fill {
            if fill.paint.is_visible() {
                let mut cubic_path = path.to_cubic_path(transform, true);
                clip::clip(&mut cubic_path, &clip_rect);
                let multipath = CubicMultipath::from(cubic_path);

                let attributes = self.resolve_paint(&fill.paint,
                                                    fill.rule == FillRule::EvenOdd,
                                                    resources);
                self.tiler.tile_cubic(&multipath, bounds, fill.rule, &attributes, &mut drawable);
                drawable.push_paint_binding(attributes.paint_type, fill.paint.id());
            }
        }

        if let Some(stroke_attrs) = options.stroke {
            if stroke_attrs.width > 0.0 && stroke_attrs.paint.is_visible() {
                let tolerance = self.settings.stroking_tolerance / zoom;
                let quadratic_path = path.to_quadratic_path(transform, tolerance);
                let contours =
                    stroke::stroke_to_fill(&quadratic_path, &stroke_attrs.style(), tolerance);

                let attributes = self.resolve_paint(&stroke_attrs.paint, false, resources);
                self.tiler.tile_quadratic(&contours,
                                          bounds,
                                          FillRule::NonZero,
                                          &attributes,
                                          &mut drawable);
                drawable.push_paint_binding(attributes.paint_type, stroke_attrs.paint.id());
            }
        }

        if lod_bias > 0 {
            self.tiler.setup(zoom, visible, self.settings.flattening_tolerance);
        }

        drawable
    }

    /// Resolves a paint into vertex attributes, uploading its backing
    /// texture if needed. Missing references fall back to magenta.
    fn resolve_paint(&mut self,
                     paint: &Paint,
                     is_even_odd: bool,
                     resources: &dyn ResourceManager)
                     -> TileAttributes {
        let mut attributes = TileAttributes {
            color: [255, 255, 255, 255],
            paint_type: paint.paint_type(),
            blend_mode: 0,
            is_even_odd,
        };

        match *paint {
            Paint::Color(color) => attributes.color = color_bytes(color),
            Paint::Swatch(id) => match resources.get_swatch(id) {
                Some(color) => attributes.color = color_bytes(color),
                None => {
                    self.warn_missing(id);
                    attributes.color = [255, 0, 255, 255];
                }
            },
            Paint::Gradient(id) => {
                if !self.paint_textures.contains_key(&id) {
                    match resources.get_gradient(id) {
                        Some((gradient, _)) => {
                            let mut texels =
                                Vec::with_capacity(GRADIENT_STRIP_LENGTH as usize * 4);
                            for i in 0..GRADIENT_STRIP_LENGTH {
                                let t = i as f32 / (GRADIENT_STRIP_LENGTH - 1) as f32;
                                let color = gradient.sample(t);
                                texels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
                            }
                            let texture = self.device.create_texture_from_data(
                                TextureFormat::RGBA8,
                                Vector2I { x: GRADIENT_STRIP_LENGTH, y: 1 },
                                TextureDataRef::U8(&texels),
                            );
                            self.paint_textures.insert(id, texture);
                        }
                        None => self.warn_missing(id),
                    }
                }
            }
            Paint::Texture(id) => {
                if !self.paint_textures.contains_key(&id) {
                    match resources.get_image(id) {
                        Some(image) => {
                            let texture = match image.channels {
                                4 => self.device.create_texture_from_data(
                                    TextureFormat::RGBA8,
                                    image.size,
                                    TextureDataRef::U8(image.pixels),
                                ),
                                1 => self.device.create_texture_from_data(
                                    TextureFormat::R8,
                                    image.size,
                                    TextureDataRef::U8(image.pixels),
                                ),
                                channels => {
                                    warn!("unsupported image channel count {}", channels);
                                    self.warn_missing(id);
                                    return attributes;
                                }
                            };
                            self.paint_textures.insert(id, texture);
                        }
                        None => self.warn_missing(id),
                    }
                }
            }
        }

        attributes
    }

    fn warn_missing(&mut self, id: PaintId) {
        if self.missing_paints.insert(id) {
            warn!("paint {:?} has no backing resource; rendering fallback", id);
        }
    }

    // Outline overlay

    fn push_outline(&mut self, path: &Path, transform: &Transform2D, outline: &Outline) {
        let zoom = self.viewport.zoom as f32;
        let tolerance = self.settings.flattening_tolerance / zoom as f64;
        let quadratic_path = path.to_quadratic_path(transform, tolerance);
        let clip_rect = self.viewport.visible().dilate(self.tiler.cell_size());

        let mut segments = vec![];
        flatten::flatten_path(&quadratic_path, &clip_rect, tolerance, &mut segments);
        let width = self.settings.ui_line_width as f32;
        for segment in &segments {
            self.ui_instances.push_line(segment.from.to_f32(),
                                        segment.to.to_f32(),
                                        outline.color,
                                        width);
        }

        if outline.draw_vertices {
            let radius = (self.settings.ui_handle_size / self.viewport.zoom) as f32;
            let primary = self.settings.ui_primary_color;
            for index in path.vertex_indices() {
                let position = (*transform * path.point_at(index)).to_f32();
                let selected =
                    outline.selected_vertices.map_or(true, |selected| selected.contains(&index));
                let color = if selected { primary } else { ColorF::white() };
                self.ui_instances.push_square(position, radius, color);
            }
            if path.has_in_handle() {
                let p = (*transform * path.point_at(quill_content::path::IN_HANDLE)).to_f32();
                self.ui_instances.push_circle(p, radius * 0.75, primary);
            }
            if path.has_out_handle() {
                let p = (*transform * path.point_at(quill_content::path::OUT_HANDLE)).to_f32();
                self.ui_instances.push_circle(p, radius * 0.75, primary);
            }
        }
    }

    // Flushing

    /// Uploads the staged batches and issues the scene draw calls.
    fn flush_scene_batch(&mut self) {
        let has_tiles = !self.packer.batch.tiles.vertices.is_empty();
        let has_fills = !self.packer.batch.fills.vertices.is_empty();
        if !has_tiles && !has_fills && self.pending_clear.is_none() {
            return;
        }
        if self.scene_framebuffer.is_none() {
            return;
        }
        self.stats.batch_flushes += 1;
        debug!("flushing batch: {} tile quads, {} fill quads, {} curve records",
               self.packer.batch.tiles.vertices_count() / 4,
               self.packer.batch.fills.vertices_count() / 4,
               self.packer.batch.tiles.curve_records());

        let transform = self.scene_transform();
        let viewport_rect = self.viewport_rect();

        if has_tiles {
            self.upload_lookup_textures();
        }

        // Resolve the batch's texture slots, falling back for missing paints.
        let mut paint_textures: Vec<&D::Texture> = Vec::with_capacity(MAX_PAINT_TEXTURES);
        for slot_id in self.packer.texture_slots() {
            match self.paint_textures.get(slot_id) {
                Some(texture) => paint_textures.push(texture),
                None => paint_textures.push(&self.fallback_texture),
            }
        }
        while paint_textures.len() < MAX_PAINT_TEXTURES {
            paint_textures.push(&self.fallback_texture);
        }

        let mut clear_ops = ClearOps::default();
        if let Some(color) = self.pending_clear.take() {
            clear_ops.color = Some(color);
        }
        clear_ops.depth = clear_ops.color.map(|_| 1.0);

        let depth = Some(DepthState { func: DepthFunc::Less, write: true });
        let blend = Some(BlendState::default());

        // Fill pass first; the depth buffer keeps cross-drawable ordering
        // intact between the two passes.
        if has_fills || clear_ops.has_ops() {
            let fills = &self.packer.batch.fills;
            self.device.allocate_buffer(&self.fill_vertex_buffer,
                                        BufferData::Memory(&fills.vertices),
                                        BufferTarget::Vertex,
                                        BufferUploadMode::Dynamic);
            self.stats.fill_count += fills.vertices_count() / 4;

            let mut uniforms = vec![(&self.fill_program.transform_uniform,
                                     UniformData::Mat4(transform))];
            for (index, uniform) in self.fill_program.paint_texture_uniforms.iter().enumerate() {
                uniforms.push((uniform, UniformData::TextureUnit(index as u32)));
            }

            let framebuffer = self.scene_framebuffer.as_ref().unwrap();
            self.device.draw_elements(fills.indices_count() as u32, &RenderState {
                target: &RenderTarget::Framebuffer(framebuffer),
                program: &self.fill_program.program,
                vertex_array: &self.fill_vertex_array.vertex_array,
                primitive: Primitive::Triangles,
                uniforms: &uniforms,
                textures: &paint_textures,
                viewport: viewport_rect,
                options: quill_gpu::RenderOptions {
                    blend,
                    depth,
                    clear_ops: mem::replace(&mut clear_ops, ClearOps::default()),
                    ..quill_gpu::RenderOptions::new()
                },
            });
        }

        if has_tiles {
            let tiles = &self.packer.batch.tiles;
            self.device.allocate_buffer(&self.tile_vertex_buffer,
                                        BufferData::Memory(&tiles.vertices),
                                        BufferTarget::Vertex,
                                        BufferUploadMode::Dynamic);
            self.stats.tile_count += tiles.vertices_count() / 4;

            let mut textures: Vec<&D::Texture> = Vec::with_capacity(MAX_PAINT_TEXTURES + 2);
            textures.push(&self.curves_texture);
            textures.push(&self.bands_texture);
            textures.extend_from_slice(&paint_textures);

            let mut uniforms = vec![
                (&self.tile_program.transform_uniform, UniformData::Mat4(transform)),
                (&self.tile_program.curves_texture_uniform, UniformData::TextureUnit(0)),
                (&self.tile_program.bands_texture_uniform, UniformData::TextureUnit(1)),
            ];
            for (index, uniform) in self.tile_program.paint_texture_uniforms.iter().enumerate() {
                uniforms.push((uniform, UniformData::TextureUnit(index as u32 + 2)));
            }

            let framebuffer = self.scene_framebuffer.as_ref().unwrap();
            self.device.draw_elements(tiles.indices_count() as u32, &RenderState {
                target: &RenderTarget::Framebuffer(framebuffer),
                program: &self.tile_program.program,
                vertex_array: &self.tile_vertex_array.vertex_array,
                primitive: Primitive::Triangles,
                uniforms: &uniforms,
                textures: &textures,
                viewport: viewport_rect,
                options: quill_gpu::RenderOptions {
                    blend,
                    depth,
                    clear_ops,
                    ..quill_gpu::RenderOptions::new()
                },
            });
        } else if clear_ops.has_ops() {
            // A frame with no geometry still clears its target.
            let framebuffer = self.scene_framebuffer.as_ref().unwrap();
            self.device.draw_elements(0, &RenderState {
                target: &RenderTarget::Framebuffer(framebuffer),
                program: &self.fill_program.program,
                vertex_array: &self.fill_vertex_array.vertex_array,
                primitive: Primitive::Triangles,
                uniforms: &[],
                textures: &[],
                viewport: viewport_rect,
                options: quill_gpu::RenderOptions {
                    clear_ops,
                    ..quill_gpu::RenderOptions::new()
                },
            });
        }

        self.packer.clear_after_flush();
    }

    /// Packs the curve and band blobs into whole texture rows and uploads
    /// them.
    fn upload_lookup_textures(&mut self) {
        let tiles = &self.packer.batch.tiles;

        let texel_count = tiles.curves.len() / 2;
        let rows = (texel_count + CURVES_TEXTURE_SIZE - 1) / CURVES_TEXTURE_SIZE;
        if rows > 0 {
            self.curves_staging.clear();
            self.curves_staging.resize(rows * CURVES_TEXTURE_SIZE * 4, 0.0);
            for (index, point) in tiles.curves.iter().enumerate() {
                self.curves_staging[index * 2] = point.x;
                self.curves_staging[index * 2 + 1] = point.y;
            }
            let rect = RectI::new(Vector2I::default(),
                                  Vector2I { x: CURVES_TEXTURE_SIZE as i32, y: rows as i32 });
            self.device.upload_to_texture(&self.curves_texture,
                                          rect,
                                          TextureDataRef::F32(&self.curves_staging));
        }

        let band_rows = (tiles.bands.len() + BANDS_TEXTURE_SIZE - 1) / BANDS_TEXTURE_SIZE;
        if band_rows > 0 {
            self.bands_staging.clear();
            self.bands_staging.resize(band_rows * BANDS_TEXTURE_SIZE, 0);
            self.bands_staging[..tiles.bands.len()].copy_from_slice(&tiles.bands);
            let rect = RectI::new(Vector2I::default(),
                                  Vector2I { x: BANDS_TEXTURE_SIZE as i32, y: band_rows as i32 });
            self.device.upload_to_texture(&self.bands_texture,
                                          rect,
                                          TextureDataRef::U16(&self.bands_staging));
        }
    }

    /// Blits the finished scene framebuffer onto the output.
    fn present_scene(&mut self) {
        let framebuffer = match self.scene_framebuffer {
            Some(ref framebuffer) => framebuffer,
            None => return,
        };
        let texture = self.device.framebuffer_texture(framebuffer);
        let uniforms = [
            (&self.blit_program.dest_rect_uniform,
             UniformData::Vec4([-1.0, -1.0, 1.0, 1.0])),
            (&self.blit_program.src_rect_uniform, UniformData::Vec4([0.0, 0.0, 1.0, 1.0])),
            (&self.blit_program.src_uniform, UniformData::TextureUnit(0)),
        ];
        self.device.draw_elements(6, &RenderState {
            target: &RenderTarget::Default,
            program: &self.blit_program.program,
            vertex_array: &self.blit_vertex_array.vertex_array,
            primitive: Primitive::Triangles,
            uniforms: &uniforms,
            textures: &[texture],
            viewport: self.viewport_rect(),
            options: quill_gpu::RenderOptions::new(),
        });
    }

    /// Copies the previous frame into the scene target, optionally shifted
    /// by a whole-pixel pan.
    fn blit_cache_into_scene(&mut self, shift: Vector2I) {
        let (cache_fb, scene_fb) = match (&self.cache_framebuffer, &self.scene_framebuffer) {
            (Some(cache_fb), Some(scene_fb)) => (cache_fb, scene_fb),
            _ => return,
        };
        let size = self.viewport.size;
        let dx = 2.0 * shift.x as f32 / size.x as f32;
        let dy = 2.0 * shift.y as f32 / size.y as f32;
        let texture = self.device.framebuffer_texture(cache_fb);
        let uniforms = [
            (&self.blit_program.dest_rect_uniform,
             UniformData::Vec4([-1.0 + dx, -1.0 - dy, 1.0 + dx, 1.0 - dy])),
            (&self.blit_program.src_rect_uniform, UniformData::Vec4([0.0, 0.0, 1.0, 1.0])),
            (&self.blit_program.src_uniform, UniformData::TextureUnit(0)),
        ];
        self.device.draw_elements(6, &RenderState {
            target: &RenderTarget::Framebuffer(scene_fb),
            program: &self.blit_program.program,
            vertex_array: &self.blit_vertex_array.vertex_array,
            primitive: Primitive::Triangles,
            uniforms: &uniforms,
            textures: &[texture],
            viewport: self.viewport_rect(),
            options: quill_gpu::RenderOptions {
                clear_ops: ClearOps {
                    color: Some(self.viewport.background),
                    depth: Some(1.0),
                    stencil: None,
                },
                ..quill_gpu::RenderOptions::new()
            },
        });
        self.pending_clear = None;
    }

    /// Paints the background color over every invalidated screen rect so
    /// redrawn content composites onto a clean slate.
    fn clear_invalid_regions(&mut self) {
        if self.frame_invalid_rects.is_empty() {
            return;
        }
        let framebuffer = match self.scene_framebuffer {
            Some(ref framebuffer) => framebuffer,
            None => return,
        };

        let mut instances = InstanceBuffer::new(MAX_UI_INSTANCES);
        for rect in &self.frame_invalid_rects {
            instances.push_rect(rect, self.viewport.background);
        }
        let batch = &instances.batches[0];

        self.device.allocate_buffer(&self.instance_buffer,
                                    BufferData::Memory(batch),
                                    BufferTarget::Vertex,
                                    BufferUploadMode::Stream);
        let transform = self.screen_transform();
        let uniforms = [
            (&self.primitive_program.transform_uniform, UniformData::Mat4(transform)),
            (&self.primitive_program.zoom_uniform, UniformData::Float(1.0)),
        ];
        self.device.draw_elements_instanced(6, batch.len() as u32, &RenderState {
            target: &RenderTarget::Framebuffer(framebuffer),
            program: &self.primitive_program.program,
            vertex_array: &self.primitive_vertex_array.vertex_array,
            primitive: Primitive::Triangles,
            uniforms: &uniforms,
            textures: &[],
            viewport: self.viewport_rect(),
            options: quill_gpu::RenderOptions {
                clear_ops: ClearOps { depth: Some(1.0), ..ClearOps::default() },
                ..quill_gpu::RenderOptions::new()
            },
        });
    }

    /// Draws the UI overlay instances onto the output. Issues at least one
    /// draw per frame, even when empty.
    fn flush_ui_layer(&mut self) {
        let transform = self.scene_transform();
        let zoom = self.viewport.zoom as f32;
        let batches = mem::replace(&mut self.ui_instances,
                                   InstanceBuffer::new(MAX_UI_INSTANCES));
        for batch in &batches.batches {
            self.device.allocate_buffer(&self.instance_buffer,
                                        BufferData::Memory(batch),
                                        BufferTarget::Vertex,
                                        BufferUploadMode::Stream);
            let uniforms = [
                (&self.primitive_program.transform_uniform, UniformData::Mat4(transform)),
                (&self.primitive_program.zoom_uniform, UniformData::Float(zoom)),
            ];
            self.device.draw_elements_instanced(6, batch.len() as u32, &RenderState {
                target: &RenderTarget::Default,
                program: &self.primitive_program.program,
                vertex_array: &self.primitive_vertex_array.vertex_array,
                primitive: Primitive::Triangles,
                uniforms: &uniforms,
                textures: &[],
                viewport: self.viewport_rect(),
                options: quill_gpu::RenderOptions {
                    blend: Some(BlendState::default()),
                    ..quill_gpu::RenderOptions::new()
                },
            });
        }
        self.ui_instances = batches;
        self.ui_instances.clear();
    }

    #[cfg(feature = "debug_overlay")]
    fn flush_debug_layer(&mut self) {
        let transform = self.screen_transform();
        let batches = mem::replace(&mut self.debug_overlay.instances,
                                   InstanceBuffer::new(MAX_UI_INSTANCES));
        for batch in &batches.batches {
            if batch.is_empty() {
                continue;
            }
            self.device.allocate_buffer(&self.instance_buffer,
                                        BufferData::Memory(batch),
                                        BufferTarget::Vertex,
                                        BufferUploadMode::Stream);
            let uniforms = [
                (&self.primitive_program.transform_uniform, UniformData::Mat4(transform)),
                (&self.primitive_program.zoom_uniform, UniformData::Float(1.0)),
            ];
            self.device.draw_elements_instanced(6, batch.len() as u32, &RenderState {
                target: &RenderTarget::Default,
                program: &self.primitive_program.program,
                vertex_array: &self.primitive_vertex_array.vertex_array,
                primitive: Primitive::Triangles,
                uniforms: &uniforms,
                textures: &[],
                viewport: self.viewport_rect(),
                options: quill_gpu::RenderOptions {
                    blend: Some(BlendState::default()),
                    ..quill_gpu::RenderOptions::new()
                },
            });
        }
        self.debug_overlay.instances = batches;
        self.debug_overlay.instances.clear();
    }

    // Helpers

    fn recreate_framebuffers(&mut self, size: Vector2I) {
        if size.x <= 0 || size.y <= 0 {
            self.scene_framebuffer = None;
            self.cache_framebuffer = None;
            return;
        }
        let scene_texture = self.device.create_texture(TextureFormat::RGBA8, size);
        self.scene_framebuffer = Some(self.device
                                          .create_framebuffer(scene_texture,
                                                              FramebufferAttachments::with_depth()));
        let cache_texture = self.device.create_texture(TextureFormat::RGBA8, size);
        self.cache_framebuffer = Some(self.device
                                          .create_framebuffer(cache_texture,
                                                              FramebufferAttachments::with_depth()));
    }

    #[inline]
    fn viewport_rect(&self) -> RectI {
        RectI::new(Vector2I::default(), self.viewport.size)
    }

    /// Scene space to normalized device coordinates.
    fn scene_transform(&self) -> [f32; 16] {
        let size = self.viewport.size;
        let zoom = self.viewport.zoom;
        let position = self.viewport.position;
        let sx = (2.0 * zoom / size.x as f64) as f32;
        let sy = (-2.0 * zoom / size.y as f64) as f32;
        let tx = (2.0 * zoom * position.x / size.x as f64 - 1.0) as f32;
        let ty = (1.0 - 2.0 * zoom * position.y / size.y as f64) as f32;
        [sx, 0.0, 0.0, 0.0,
         0.0, sy, 0.0, 0.0,
         0.0, 0.0, 1.0, 0.0,
         tx, ty, 0.0, 1.0]
    }

    /// Screen pixels to normalized device coordinates.
    fn screen_transform(&self) -> [f32; 16] {
        let size = self.viewport.size;
        let sx = 2.0 / size.x as f32;
        let sy = -2.0 / size.y as f32;
        [sx, 0.0, 0.0, 0.0,
         0.0, sy, 0.0, 0.0,
         0.0, 0.0, 1.0, 0.0,
         -1.0, 1.0, 0.0, 1.0]
    }

    fn to_screen_rect(&self, rect: &RectD) -> RectF {
        let zoom = self.viewport.zoom;
        let position = self.viewport.position;
        let min = (rect.min + position) * zoom;
        let max = (rect.max + position) * zoom;
        RectF::new(min.to_f32(), max.to_f32())
    }
}

#[inline]
fn color_bytes(color: ColorF) -> [u8; 4] {
    let color = color.to_u8();
    [color.r, color.g, color.b, color.a]
}
