// quill/renderer/tests/pipeline.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Frame-loop scenarios, driven against a recording device that logs every
//! draw call instead of touching a GPU.

use quill_color::ColorF;
use quill_content::fill::FillRule;
use quill_content::path::Path;
use quill_geometry::rect::{RectF, RectI};
use quill_geometry::transform2d::Transform2D;
use quill_geometry::vector::{vec2d, vec2f, vec2i, Vector2I};
use quill_gpu::{BufferData, BufferTarget, BufferUploadMode, Device, FramebufferAttachments};
use quill_gpu::{RenderState, RenderTarget, ShaderKind, TextureData, TextureDataRef};
use quill_gpu::{TextureFormat, TextureSamplingFlags, VertexAttrDescriptor};
use quill_renderer::paint::{NoResources, Paint};
use quill_renderer::{DrawingOptions, EntityId, Fill, RenderOptions, Renderer, Stroke, Viewport};
use std::cell::RefCell;
use std::rc::Rc;

// A device that records draw calls.

#[derive(Clone, Debug, PartialEq)]
enum DrawEvent {
    Draw { target_default: bool, indices: u32, cleared: bool },
    DrawInstanced { target_default: bool, instances: u32 },
}

#[derive(Default)]
struct Log {
    events: Vec<DrawEvent>,
}

struct RecordingDevice {
    log: Rc<RefCell<Log>>,
}

struct RecordedTexture {
    format: TextureFormat,
    size: Vector2I,
}

struct RecordedFramebuffer {
    texture: RecordedTexture,
}

impl Device for RecordingDevice {
    type Buffer = ();
    type Framebuffer = RecordedFramebuffer;
    type Program = String;
    type Shader = String;
    type Texture = RecordedTexture;
    type Uniform = String;
    type VertexArray = ();
    type VertexAttr = ();

    fn create_texture(&self, format: TextureFormat, size: Vector2I) -> RecordedTexture {
        RecordedTexture { format, size }
    }

    fn create_texture_from_data(&self,
                                format: TextureFormat,
                                size: Vector2I,
                                _: TextureDataRef)
                                -> RecordedTexture {
        RecordedTexture { format, size }
    }

    fn upload_to_texture(&self, texture: &RecordedTexture, rect: RectI, _: TextureDataRef) {
        assert!(rect.max.x <= texture.size.x && rect.max.y <= texture.size.y);
    }

    fn set_texture_sampling_mode(&self, _: &RecordedTexture, _: TextureSamplingFlags) {}

    fn texture_size(&self, texture: &RecordedTexture) -> Vector2I {
        texture.size
    }

    fn texture_format(&self, texture: &RecordedTexture) -> TextureFormat {
        texture.format
    }

    fn create_shader_from_source(&self, name: &str, source: &[u8], _: ShaderKind) -> String {
        assert!(!source.is_empty());
        name.to_string()
    }

    fn create_program_from_shaders(&self, name: &str, _: String, _: String) -> String {
        name.to_string()
    }

    fn get_vertex_attr(&self, _: &String, name: &str) -> Option<()> {
        assert!(!name.is_empty());
        Some(())
    }

    fn get_uniform(&self, _: &String, name: &str) -> String {
        name.to_string()
    }

    fn create_vertex_array(&self) {}

    fn bind_buffer(&self, _: &(), _: &(), _: BufferTarget) {}

    fn configure_vertex_attr(&self, _: &(), _: &(), descriptor: &VertexAttrDescriptor) {
        assert!(descriptor.stride > 0);
    }

    fn create_framebuffer(&self,
                          texture: RecordedTexture,
                          _: FramebufferAttachments)
                          -> RecordedFramebuffer {
        RecordedFramebuffer { texture }
    }

    fn framebuffer_texture<'f>(&self, framebuffer: &'f RecordedFramebuffer) -> &'f RecordedTexture {
        &framebuffer.texture
    }

    fn create_buffer(&self) {}

    fn allocate_buffer<T>(&self, _: &(), _: BufferData<T>, _: BufferTarget, _: BufferUploadMode) {}

    fn draw_elements(&self, index_count: u32, render_state: &RenderState<Self>) {
        self.log.borrow_mut().events.push(DrawEvent::Draw {
            target_default: matches!(render_state.target, RenderTarget::Default),
            indices: index_count,
            cleared: render_state.options.clear_ops.has_ops(),
        });
    }

    fn draw_elements_instanced(&self,
                               _index_count: u32,
                               instance_count: u32,
                               render_state: &RenderState<Self>) {
        self.log.borrow_mut().events.push(DrawEvent::DrawInstanced {
            target_default: matches!(render_state.target, RenderTarget::Default),
            instances: instance_count,
        });
    }

    fn begin_commands(&self) {}
    fn end_commands(&self) {}

    fn read_pixels(&self, _: &RenderTarget<Self>, viewport: RectI) -> TextureData {
        TextureData::U8(vec![0; viewport.size().area() as usize * 4])
    }
}

fn make_renderer() -> (Renderer<RecordingDevice>, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let device = RecordingDevice { log: log.clone() };
    let renderer = Renderer::new(device, &quill_resources::EmbeddedResourceLoader);
    (renderer, log)
}

fn viewport() -> Viewport {
    Viewport::new(vec2i(800, 600), vec2d(0.0, 0.0), 1.0, 1.0, ColorF::new(0.1, 0.1, 0.1, 1.0))
}

fn frame_options() -> RenderOptions {
    RenderOptions { viewport: viewport(), ignore_cache: false }
}

fn triangle() -> Path {
    let mut path = Path::new();
    path.move_to(vec2f(0.0, 0.0));
    path.line_to(vec2f(100.0, 0.0), false);
    path.line_to(vec2f(50.0, 100.0), false);
    path.close();
    path
}

fn red_fill() -> DrawingOptions<'static> {
    DrawingOptions {
        fill: Some(Fill::new(Paint::Color(ColorF::new(1.0, 0.0, 0.0, 1.0)), FillRule::NonZero)),
        stroke: None,
        outline: None,
    }
}

#[test]
fn test_empty_frame_clears_and_draws_ui() {
    let (mut renderer, log) = make_renderer();
    renderer.begin_frame(&frame_options());
    renderer.end_frame();

    let events = log.borrow().events.clone();
    // Exactly one clearing draw of the scene target.
    let clears: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, DrawEvent::Draw { cleared: true, .. }))
        .collect();
    assert_eq!(clears.len(), 1);

    // One UI draw of zero instances on the output.
    assert!(events
        .iter()
        .any(|event| *event == DrawEvent::DrawInstanced { target_default: true, instances: 0 }));

    // The scene was presented to the default framebuffer.
    assert!(events
        .iter()
        .any(|event| matches!(event,
                              DrawEvent::Draw { target_default: true, indices: 6, .. })));
}

#[test]
fn test_filled_triangle_issues_scene_draws() {
    let (mut renderer, log) = make_renderer();
    renderer.begin_frame(&frame_options());
    let drawn = renderer.draw(&triangle(),
                              &Transform2D::identity(),
                              &red_fill(),
                              Some(EntityId(1)),
                              &NoResources);
    assert!(drawn);
    renderer.end_frame();

    assert_eq!(renderer.stats.path_count, 1);
    assert_eq!(renderer.stats.drawable_count, 1);
    assert!(renderer.stats.tile_count > 0);
    assert!(renderer.stats.fill_count > 0);
    assert_eq!(renderer.stats.device_errors, 0);

    // Scene draws landed offscreen, not on the default framebuffer.
    let events = log.borrow().events.clone();
    let offscreen_draws = events
        .iter()
        .filter(|event| matches!(event,
                                 DrawEvent::Draw { target_default: false, indices, .. }
                                     if *indices > 6))
        .count();
    assert!(offscreen_draws >= 2, "expected fill and tile passes, got {:?}", events);
}

#[test]
fn test_offscreen_path_is_culled() {
    let (mut renderer, _log) = make_renderer();
    renderer.begin_frame(&frame_options());
    let mut transform = Transform2D::from_translation(vec2d(5000.0, 5000.0));
    let drawn = renderer.draw(&triangle(), &transform, &red_fill(), None, &NoResources);
    assert!(!drawn);

    // Tiny paths fall below the culling threshold.
    transform = Transform2D::from_uniform_scale(0.001);
    let drawn = renderer.draw(&triangle(), &transform, &red_fill(), None, &NoResources);
    assert!(!drawn);
    renderer.end_frame();

    assert_eq!(renderer.stats.drawable_count, 0);
}

#[test]
fn test_unchanged_frame_reuses_cache() {
    let (mut renderer, _log) = make_renderer();

    renderer.begin_frame(&frame_options());
    renderer.draw(&triangle(),
                  &Transform2D::identity(),
                  &red_fill(),
                  Some(EntityId(1)),
                  &NoResources);
    renderer.end_frame();
    assert_eq!(renderer.stats.drawable_count, 1);

    // Second frame, camera and document unchanged: nothing re-tiles, the
    // previous frame is blitted.
    renderer.begin_frame(&frame_options());
    renderer.draw(&triangle(),
                  &Transform2D::identity(),
                  &red_fill(),
                  Some(EntityId(1)),
                  &NoResources);
    renderer.end_frame();
    assert_eq!(renderer.stats.drawable_count, 0);
    assert_eq!(renderer.stats.cache_hits, 1);
}

#[test]
fn test_invalidation_forces_redraw_from_cached_drawable() {
    let (mut renderer, _log) = make_renderer();

    renderer.begin_frame(&frame_options());
    renderer.draw(&triangle(),
                  &Transform2D::identity(),
                  &red_fill(),
                  Some(EntityId(1)),
                  &NoResources);
    renderer.end_frame();

    // The document reports a mutation over the path.
    renderer.cache_mut().invalidate_rect(RectF::new(vec2f(10.0, 10.0), vec2f(40.0, 40.0)));

    renderer.begin_frame(&frame_options());
    renderer.draw(&triangle(),
                  &Transform2D::identity(),
                  &red_fill(),
                  Some(EntityId(1)),
                  &NoResources);
    renderer.end_frame();

    // Redrawn, but from the cached drawable: no hit counted, one drawable.
    assert_eq!(renderer.stats.cache_hits, 0);
    assert_eq!(renderer.stats.drawable_count, 1);
}

#[test]
fn test_pan_keeps_cached_drawable() {
    let (mut renderer, _log) = make_renderer();

    renderer.begin_frame(&frame_options());
    renderer.draw(&triangle(),
                  &Transform2D::identity(),
                  &red_fill(),
                  Some(EntityId(1)),
                  &NoResources);
    renderer.end_frame();

    // Pan by 10 pixels; the path sits away from the exposed strip, so the
    // blit covers it and nothing is redrawn.
    let mut options = frame_options();
    options.viewport.position = vec2d(10.0, 0.0);
    renderer.begin_frame(&options);
    renderer.draw(&triangle(),
                  &Transform2D::identity(),
                  &red_fill(),
                  Some(EntityId(1)),
                  &NoResources);
    renderer.end_frame();

    assert_eq!(renderer.stats.drawable_count, 0);
    assert_eq!(renderer.stats.cache_hits, 1);
}

#[test]
fn test_stroked_line_covers_rectangle() {
    let (mut renderer, _log) = make_renderer();
    let mut path = Path::new();
    path.move_to(vec2f(0.0, 50.0));
    path.line_to(vec2f(100.0, 50.0), false);

    let options = DrawingOptions {
        fill: None,
        stroke: Some(Stroke::new(Paint::Color(ColorF::white()), 10.0)),
        outline: None,
    };

    renderer.begin_frame(&frame_options());
    let drawn = renderer.draw(&path, &Transform2D::identity(), &options, None, &NoResources);
    renderer.end_frame();
    assert!(drawn);
    assert!(renderer.stats.tile_count > 0 || renderer.stats.fill_count > 0);
}

#[test]
fn test_capacity_rollover_flushes_once_per_batch() {
    let (mut renderer, log) = make_renderer();
    renderer.begin_frame(&frame_options());

    // Many separate paths with plenty of curves each; together they exceed
    // one curves texture.
    let mut path = Path::new();
    path.move_to(vec2f(0.0, 0.0));
    let mut x = 0.0f32;
    for _ in 0..64 {
        path.cubic_to(vec2f(x + 2.0, -40.0), vec2f(x + 5.0, 40.0), vec2f(x + 8.0, 0.0), false);
        x += 8.0;
    }
    path.close();

    for index in 0..40 {
        let transform =
            Transform2D::from_translation(vec2d(0.0, (index % 12) as f64 * 48.0 + 2.0));
        renderer.draw(&path, &transform, &red_fill(), None, &NoResources);
    }
    renderer.end_frame();

    // More than one batch flush occurred, and the frame completed without
    // device errors or capacity violations (checked by debug asserts in the
    // packer).
    assert!(renderer.stats.batch_flushes > 1,
            "expected a capacity rollover, stats: {:?}", renderer.stats);
    assert_eq!(renderer.stats.device_errors, 0);
    assert!(!log.borrow().events.is_empty());
}
