// quill/gpu/src/lib.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The minimum abstraction over a GPU device that the renderer needs:
//! buffers, textures, framebuffers, programs and draw calls, bundled per draw
//! into a [`RenderState`] that implementations diff against the previous one.

#[macro_use]
extern crate bitflags;

use half::f16;
use quill_color::ColorF;
use quill_geometry::rect::RectI;
use quill_geometry::vector::Vector2I;
use quill_resources::ResourceLoader;

/// The texel layout of a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    R8,
    R16UI,
    R16F,
    R32F,
    RGBA8,
    RGBA16F,
    RGBA32F,
}

impl TextureFormat {
    /// Channel count of the format.
    pub fn channels(self) -> usize {
        match self {
            TextureFormat::R8 |
            TextureFormat::R16UI |
            TextureFormat::R16F |
            TextureFormat::R32F => 1,
            TextureFormat::RGBA8 | TextureFormat::RGBA16F | TextureFormat::RGBA32F => 4,
        }
    }

    /// Bytes per texel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::R16UI | TextureFormat::R16F => 2,
            TextureFormat::R32F | TextureFormat::RGBA8 => 4,
            TextureFormat::RGBA16F => 8,
            TextureFormat::RGBA32F => 16,
        }
    }
}

bitflags! {
    /// Sampling behavior of a bound texture.
    pub struct TextureSamplingFlags: u8 {
        const REPEAT_U    = 0x01;
        const REPEAT_V    = 0x02;
        const NEAREST_MIN = 0x04;
        const NEAREST_MAG = 0x08;
    }
}

/// Texel data for upload, by value.
#[derive(Clone, Debug)]
pub enum TextureData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F16(Vec<f16>),
    F32(Vec<f32>),
}

/// Texel data for upload, borrowed.
#[derive(Clone, Copy, Debug)]
pub enum TextureDataRef<'a> {
    U8(&'a [u8]),
    U16(&'a [u16]),
    F16(&'a [f16]),
    F32(&'a [f32]),
}

/// What a buffer binds as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferTarget {
    Vertex,
    Index,
}

/// The expected update frequency of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUploadMode {
    Static,
    Dynamic,
    Stream,
}

/// Initial buffer contents.
pub enum BufferData<'a, T> {
    /// Allocate without uploading; the length is in elements.
    Uninitialized(usize),
    Memory(&'a [T]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Lines,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexAttrClass {
    Float,
    FloatNorm,
    Int,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexAttrType {
    F32,
    I8,
    I16,
    I32,
    U8,
    U16,
    U32,
}

/// How one vertex attribute maps into its buffer.
#[derive(Clone, Copy, Debug)]
pub struct VertexAttrDescriptor {
    pub size: usize,
    pub class: VertexAttrClass,
    pub attr_type: VertexAttrType,
    pub stride: usize,
    pub offset: usize,
    pub divisor: u32,
    pub buffer_index: u32,
}

/// A uniform value for one draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformData {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
    TextureUnit(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    DestAlpha,
    OneMinusDestAlpha,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendOp {
    Add,
    Min,
    Max,
}

/// A full blend equation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendState {
    pub src_rgb_factor: BlendFactor,
    pub dest_rgb_factor: BlendFactor,
    pub src_alpha_factor: BlendFactor,
    pub dest_alpha_factor: BlendFactor,
    pub op: BlendOp,
}

impl Default for BlendState {
    #[inline]
    fn default() -> BlendState {
        BlendState {
            src_rgb_factor: BlendFactor::One,
            dest_rgb_factor: BlendFactor::OneMinusSrcAlpha,
            src_alpha_factor: BlendFactor::One,
            dest_alpha_factor: BlendFactor::OneMinusSrcAlpha,
            op: BlendOp::Add,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthFunc {
    Less,
    LessEqual,
    Always,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthState {
    pub func: DepthFunc,
    pub write: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StencilFunc {
    Always,
    Equal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilState {
    pub func: StencilFunc,
    pub reference: u32,
    pub mask: u32,
    pub write: bool,
}

/// Clears applied before a draw.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClearOps {
    pub color: Option<ColorF>,
    pub depth: Option<f32>,
    pub stencil: Option<u8>,
}

impl ClearOps {
    #[inline]
    pub fn has_ops(&self) -> bool {
        self.color.is_some() || self.depth.is_some() || self.stencil.is_some()
    }
}

/// Extra renderbuffer attachments of a framebuffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FramebufferAttachments {
    pub depth: bool,
    pub stencil: bool,
}

impl FramebufferAttachments {
    #[inline]
    pub fn color_only() -> FramebufferAttachments {
        FramebufferAttachments::default()
    }

    #[inline]
    pub fn with_depth() -> FramebufferAttachments {
        FramebufferAttachments { depth: true, stencil: false }
    }
}

/// Where a draw lands.
pub enum RenderTarget<'a, D>
where
    D: Device,
{
    Default,
    Framebuffer(&'a D::Framebuffer),
}

/// Per-draw options beyond the pipeline bindings.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    pub blend: Option<BlendState>,
    pub depth: Option<DepthState>,
    pub stencil: Option<StencilState>,
    pub clear_ops: ClearOps,
    pub color_mask: bool,
}

impl RenderOptions {
    #[inline]
    pub fn new() -> RenderOptions {
        RenderOptions {
            blend: None,
            depth: None,
            stencil: None,
            clear_ops: ClearOps::default(),
            color_mask: true,
        }
    }
}

/// Everything one draw call depends on. Implementations diff consecutive
/// states to skip redundant GL calls.
pub struct RenderState<'a, D>
where
    D: Device,
{
    pub target: &'a RenderTarget<'a, D>,
    pub program: &'a D::Program,
    pub vertex_array: &'a D::VertexArray,
    pub primitive: Primitive,
    pub uniforms: &'a [(&'a D::Uniform, UniformData)],
    pub textures: &'a [&'a D::Texture],
    pub viewport: RectI,
    pub options: RenderOptions,
}

/// The device abstraction. One instance owns all GPU objects the renderer
/// creates through it.
pub trait Device: Sized {
    type Buffer;
    type Framebuffer;
    type Program;
    type Shader;
    type Texture;
    type Uniform;
    type VertexArray;
    type VertexAttr;

    fn create_texture(&self, format: TextureFormat, size: Vector2I) -> Self::Texture;
    fn create_texture_from_data(&self,
                                format: TextureFormat,
                                size: Vector2I,
                                data: TextureDataRef)
                                -> Self::Texture;
    fn upload_to_texture(&self, texture: &Self::Texture, rect: RectI, data: TextureDataRef);
    fn set_texture_sampling_mode(&self, texture: &Self::Texture, flags: TextureSamplingFlags);
    fn texture_size(&self, texture: &Self::Texture) -> Vector2I;
    fn texture_format(&self, texture: &Self::Texture) -> TextureFormat;

    fn create_shader_from_source(&self, name: &str, source: &[u8], kind: ShaderKind)
                                 -> Self::Shader;
    fn create_program_from_shaders(&self,
                                   name: &str,
                                   vertex_shader: Self::Shader,
                                   fragment_shader: Self::Shader)
                                   -> Self::Program;
    fn get_vertex_attr(&self, program: &Self::Program, name: &str) -> Option<Self::VertexAttr>;
    fn get_uniform(&self, program: &Self::Program, name: &str) -> Self::Uniform;

    fn create_vertex_array(&self) -> Self::VertexArray;
    fn bind_buffer(&self,
                   vertex_array: &Self::VertexArray,
                   buffer: &Self::Buffer,
                   target: BufferTarget);
    fn configure_vertex_attr(&self,
                             vertex_array: &Self::VertexArray,
                             attr: &Self::VertexAttr,
                             descriptor: &VertexAttrDescriptor);

    /// Creates a framebuffer with the texture as its color attachment plus
    /// the requested renderbuffer attachments.
    fn create_framebuffer(&self,
                          texture: Self::Texture,
                          attachments: FramebufferAttachments)
                          -> Self::Framebuffer;
    fn framebuffer_texture<'f>(&self, framebuffer: &'f Self::Framebuffer) -> &'f Self::Texture;

    fn create_buffer(&self) -> Self::Buffer;
    fn allocate_buffer<T>(&self,
                          buffer: &Self::Buffer,
                          data: BufferData<T>,
                          target: BufferTarget,
                          mode: BufferUploadMode);

    fn draw_elements(&self, index_count: u32, render_state: &RenderState<Self>);
    fn draw_elements_instanced(&self,
                               index_count: u32,
                               instance_count: u32,
                               render_state: &RenderState<Self>);

    fn begin_commands(&self);
    fn end_commands(&self);

    fn read_pixels(&self, target: &RenderTarget<Self>, viewport: RectI) -> TextureData;

    /// The number of device errors observed since the last call. Per the
    /// error policy, errors are counted and the frame continues.
    fn take_error_count(&self) -> u32 {
        0
    }

    /// Builds a raster program from `shaders/<name>.vs.glsl` and
    /// `shaders/<name>.fs.glsl` provided by the resource loader.
    fn create_raster_program(&self,
                             resources: &dyn ResourceLoader,
                             name: &str)
                             -> Self::Program {
        let vertex_source = resources
            .load(&format!("shaders/{}.vs.glsl", name))
            .expect("missing vertex shader");
        let fragment_source = resources
            .load(&format!("shaders/{}.fs.glsl", name))
            .expect("missing fragment shader");
        let vertex_shader =
            self.create_shader_from_source(name, &vertex_source, ShaderKind::Vertex);
        let fragment_shader =
            self.create_shader_from_source(name, &fragment_source, ShaderKind::Fragment);
        self.create_program_from_shaders(name, vertex_shader, fragment_shader)
    }
}
