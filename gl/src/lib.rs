// quill/gl/src/lib.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An OpenGL 3 implementation of the device abstraction.
//!
//! The device caches the pieces of pipeline state it set last and diffs each
//! incoming [`RenderState`] against them, so consecutive draws that share a
//! program, vertex array or blend state do not reissue those calls.

#[macro_use]
extern crate log;

use gl::types::{GLboolean, GLenum, GLint, GLsizei, GLuint, GLvoid};
use quill_geometry::rect::RectI;
use quill_geometry::vector::Vector2I;
use quill_gpu::{BlendFactor, BlendOp, BlendState, BufferData, BufferTarget, BufferUploadMode};
use quill_gpu::{ClearOps, DepthFunc, DepthState, Device, FramebufferAttachments, Primitive};
use quill_gpu::{RenderState, RenderTarget};
use quill_gpu::{ShaderKind, StencilFunc, StencilState, TextureData, TextureDataRef};
use quill_gpu::{TextureFormat, TextureSamplingFlags, UniformData, VertexAttrClass};
use quill_gpu::{VertexAttrDescriptor, VertexAttrType};
use std::cell::{Cell, RefCell};
use std::ffi::CString;
use std::mem;
use std::ptr;

const MAX_TEXTURE_UNITS: usize = 8;

pub struct GLDevice {
    default_framebuffer: GLuint,
    cached: RefCell<CachedState>,
    error_count: Cell<u32>,
}

#[derive(Default)]
struct CachedState {
    framebuffer: Option<GLuint>,
    program: Option<GLuint>,
    vertex_array: Option<GLuint>,
    viewport: Option<RectI>,
    textures: [Option<GLuint>; MAX_TEXTURE_UNITS],
    blend: Option<Option<BlendState>>,
    depth: Option<Option<DepthState>>,
    stencil: Option<Option<StencilState>>,
}

impl GLDevice {
    /// The GL function pointers must already be loaded.
    pub fn new(default_framebuffer: GLuint) -> GLDevice {
        GLDevice {
            default_framebuffer,
            cached: RefCell::new(CachedState::default()),
            error_count: Cell::new(0),
        }
    }

    pub fn set_default_framebuffer(&mut self, framebuffer: GLuint) {
        self.default_framebuffer = framebuffer;
        self.cached.borrow_mut().framebuffer = None;
    }

    fn ck(&self) {
        unsafe {
            loop {
                let error = gl::GetError();
                if error == gl::NO_ERROR {
                    break;
                }
                self.error_count.set(self.error_count.get() + 1);
                warn!("GL error: 0x{:x}", error);
            }
        }
    }

    fn bind_render_target(&self, target: &RenderTarget<GLDevice>) {
        let gl_framebuffer = match *target {
            RenderTarget::Default => self.default_framebuffer,
            RenderTarget::Framebuffer(framebuffer) => framebuffer.gl_framebuffer,
        };
        let mut cached = self.cached.borrow_mut();
        if cached.framebuffer != Some(gl_framebuffer) {
            unsafe {
                gl::BindFramebuffer(gl::FRAMEBUFFER, gl_framebuffer);
            }
            cached.framebuffer = Some(gl_framebuffer);
        }
    }

    fn bind_texture_unit(&self, texture: &GLTexture, unit: usize) {
        let mut cached = self.cached.borrow_mut();
        if cached.textures[unit] == Some(texture.gl_texture) {
            return;
        }
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as GLuint);
            gl::BindTexture(gl::TEXTURE_2D, texture.gl_texture);
        }
        cached.textures[unit] = Some(texture.gl_texture);
    }

    fn set_render_state(&self, render_state: &RenderState<GLDevice>) {
        self.bind_render_target(render_state.target);

        {
            let mut cached = self.cached.borrow_mut();
            if cached.viewport != Some(render_state.viewport) {
                let (origin, size) =
                    (render_state.viewport.origin(), render_state.viewport.size());
                unsafe {
                    gl::Viewport(origin.x, origin.y, size.x, size.y);
                }
                cached.viewport = Some(render_state.viewport);
            }
        }

        if render_state.options.clear_ops.has_ops() {
            self.clear(&render_state.options.clear_ops);
        }

        {
            let mut cached = self.cached.borrow_mut();
            let gl_program = render_state.program.gl_program;
            if cached.program != Some(gl_program) {
                unsafe {
                    gl::UseProgram(gl_program);
                }
                cached.program = Some(gl_program);
            }
            let gl_vertex_array = render_state.vertex_array.gl_vertex_array;
            if cached.vertex_array != Some(gl_vertex_array) {
                unsafe {
                    gl::BindVertexArray(gl_vertex_array);
                }
                cached.vertex_array = Some(gl_vertex_array);
            }
        }

        for (unit, texture) in render_state.textures.iter().enumerate() {
            debug_assert!(unit < MAX_TEXTURE_UNITS);
            self.bind_texture_unit(texture, unit);
        }

        for (uniform, data) in render_state.uniforms {
            self.set_uniform(uniform, data);
        }

        self.set_blend(render_state.options.blend);
        self.set_depth(render_state.options.depth);
        self.set_stencil(render_state.options.stencil);

        unsafe {
            let mask = render_state.options.color_mask as GLboolean;
            gl::ColorMask(mask, mask, mask, mask);
        }
    }

    fn clear(&self, ops: &ClearOps) {
        let mut flags = 0;
        unsafe {
            if let Some(color) = ops.color {
                gl::ColorMask(gl::TRUE, gl::TRUE, gl::TRUE, gl::TRUE);
                gl::ClearColor(color.r, color.g, color.b, color.a);
                flags |= gl::COLOR_BUFFER_BIT;
            }
            if let Some(depth) = ops.depth {
                gl::DepthMask(gl::TRUE);
                gl::ClearDepth(depth as f64);
                flags |= gl::DEPTH_BUFFER_BIT;
            }
            if let Some(stencil) = ops.stencil {
                gl::StencilMask(!0);
                gl::ClearStencil(stencil as GLint);
                flags |= gl::STENCIL_BUFFER_BIT;
            }
            if flags != 0 {
                gl::Clear(flags);
            }
        }
    }

    fn set_uniform(&self, uniform: &GLUniform, data: &UniformData) {
        unsafe {
            match *data {
                UniformData::Int(value) => gl::Uniform1i(uniform.location, value),
                UniformData::TextureUnit(unit) => gl::Uniform1i(uniform.location, unit as GLint),
                UniformData::Float(value) => gl::Uniform1f(uniform.location, value),
                UniformData::Vec2(value) => gl::Uniform2f(uniform.location, value[0], value[1]),
                UniformData::Vec3(value) => {
                    gl::Uniform3f(uniform.location, value[0], value[1], value[2])
                }
                UniformData::Vec4(value) => {
                    gl::Uniform4f(uniform.location, value[0], value[1], value[2], value[3])
                }
                UniformData::Mat4(ref value) => {
                    gl::UniformMatrix4fv(uniform.location, 1, gl::FALSE, value.as_ptr())
                }
            }
        }
    }

    fn set_blend(&self, blend: Option<BlendState>) {
        let mut cached = self.cached.borrow_mut();
        if cached.blend == Some(blend) {
            return;
        }
        unsafe {
            match blend {
                None => gl::Disable(gl::BLEND),
                Some(state) => {
                    gl::BlendFuncSeparate(state.src_rgb_factor.to_gl_factor(),
                                          state.dest_rgb_factor.to_gl_factor(),
                                          state.src_alpha_factor.to_gl_factor(),
                                          state.dest_alpha_factor.to_gl_factor());
                    gl::BlendEquation(state.op.to_gl_equation());
                    gl::Enable(gl::BLEND);
                }
            }
        }
        cached.blend = Some(blend);
    }

    fn set_depth(&self, depth: Option<DepthState>) {
        let mut cached = self.cached.borrow_mut();
        if cached.depth == Some(depth) {
            return;
        }
        unsafe {
            match depth {
                None => gl::Disable(gl::DEPTH_TEST),
                Some(state) => {
                    gl::DepthFunc(state.func.to_gl_func());
                    gl::DepthMask(state.write as GLboolean);
                    gl::Enable(gl::DEPTH_TEST);
                }
            }
        }
        cached.depth = Some(depth);
    }

    fn set_stencil(&self, stencil: Option<StencilState>) {
        let mut cached = self.cached.borrow_mut();
        if cached.stencil == Some(stencil) {
            return;
        }
        unsafe {
            match stencil {
                None => gl::Disable(gl::STENCIL_TEST),
                Some(state) => {
                    gl::StencilFunc(state.func.to_gl_func(),
                                    state.reference as GLint,
                                    state.mask);
                    let (pass_action, write_mask) = if state.write {
                        (gl::REPLACE, state.mask)
                    } else {
                        (gl::KEEP, 0)
                    };
                    gl::StencilOp(gl::KEEP, gl::KEEP, pass_action);
                    gl::StencilMask(write_mask);
                    gl::Enable(gl::STENCIL_TEST);
                }
            }
        }
        cached.stencil = Some(stencil);
    }
}

impl Device for GLDevice {
    type Buffer = GLBuffer;
    type Framebuffer = GLFramebuffer;
    type Program = GLProgram;
    type Shader = GLShader;
    type Texture = GLTexture;
    type Uniform = GLUniform;
    type VertexArray = GLVertexArray;
    type VertexAttr = GLVertexAttr;

    fn create_texture(&self, format: TextureFormat, size: Vector2I) -> GLTexture {
        let mut gl_texture = 0;
        unsafe {
            gl::GenTextures(1, &mut gl_texture);
            gl::BindTexture(gl::TEXTURE_2D, gl_texture);
            gl::TexImage2D(gl::TEXTURE_2D,
                           0,
                           format.gl_internal_format() as GLint,
                           size.x,
                           size.y,
                           0,
                           format.gl_format(),
                           format.gl_type(),
                           ptr::null());
        }
        self.cached.borrow_mut().textures = [None; MAX_TEXTURE_UNITS];
        let texture = GLTexture { gl_texture, size, format };
        self.set_texture_sampling_mode(&texture, TextureSamplingFlags::empty());
        self.ck();
        texture
    }

    fn create_texture_from_data(&self,
                                format: TextureFormat,
                                size: Vector2I,
                                data: TextureDataRef)
                                -> GLTexture {
        let texture = self.create_texture(format, size);
        self.upload_to_texture(&texture, RectI::new(Vector2I::default(), size), data);
        texture
    }

    fn upload_to_texture(&self, texture: &GLTexture, rect: RectI, data: TextureDataRef) {
        debug_assert!(rect.max.x <= texture.size.x && rect.max.y <= texture.size.y);
        let data_ptr = match data {
            TextureDataRef::U8(data) => data.as_ptr() as *const GLvoid,
            TextureDataRef::U16(data) => data.as_ptr() as *const GLvoid,
            TextureDataRef::F16(data) => data.as_ptr() as *const GLvoid,
            TextureDataRef::F32(data) => data.as_ptr() as *const GLvoid,
        };
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, texture.gl_texture);
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexSubImage2D(gl::TEXTURE_2D,
                              0,
                              rect.min.x,
                              rect.min.y,
                              rect.width(),
                              rect.height(),
                              texture.format.gl_format(),
                              texture.format.gl_type(),
                              data_ptr);
        }
        self.cached.borrow_mut().textures = [None; MAX_TEXTURE_UNITS];
        self.ck();
    }

    fn set_texture_sampling_mode(&self, texture: &GLTexture, flags: TextureSamplingFlags) {
        let min_filter = if flags.contains(TextureSamplingFlags::NEAREST_MIN) {
            gl::NEAREST
        } else {
            gl::LINEAR
        };
        let mag_filter = if flags.contains(TextureSamplingFlags::NEAREST_MAG) {
            gl::NEAREST
        } else {
            gl::LINEAR
        };
        let wrap_s = if flags.contains(TextureSamplingFlags::REPEAT_U) {
            gl::REPEAT
        } else {
            gl::CLAMP_TO_EDGE
        };
        let wrap_t = if flags.contains(TextureSamplingFlags::REPEAT_V) {
            gl::REPEAT
        } else {
            gl::CLAMP_TO_EDGE
        };
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, texture.gl_texture);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min_filter as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mag_filter as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap_s as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap_t as GLint);
        }
        self.cached.borrow_mut().textures = [None; MAX_TEXTURE_UNITS];
    }

    #[inline]
    fn texture_size(&self, texture: &GLTexture) -> Vector2I {
        texture.size
    }

    #[inline]
    fn texture_format(&self, texture: &GLTexture) -> TextureFormat {
        texture.format
    }

    fn create_shader_from_source(&self, name: &str, source: &[u8], kind: ShaderKind) -> GLShader {
        let gl_shader_kind = match kind {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        };
        unsafe {
            let gl_shader = gl::CreateShader(gl_shader_kind);
            gl::ShaderSource(gl_shader,
                             1,
                             [source.as_ptr() as *const _].as_ptr(),
                             [source.len() as GLint].as_ptr());
            gl::CompileShader(gl_shader);

            let mut compile_status = 0;
            gl::GetShaderiv(gl_shader, gl::COMPILE_STATUS, &mut compile_status);
            if compile_status != gl::TRUE as GLint {
                let mut info_log_length = 0;
                gl::GetShaderiv(gl_shader, gl::INFO_LOG_LENGTH, &mut info_log_length);
                let mut info_log = vec![0u8; info_log_length as usize];
                gl::GetShaderInfoLog(gl_shader,
                                     info_log.len() as GLint,
                                     ptr::null_mut(),
                                     info_log.as_mut_ptr() as *mut _);
                error!("shader info log:\n{}", String::from_utf8_lossy(&info_log));
                panic!("{:?} shader '{}' compilation failed", kind, name);
            }

            GLShader { gl_shader }
        }
    }

    fn create_program_from_shaders(&self,
                                   name: &str,
                                   vertex_shader: GLShader,
                                   fragment_shader: GLShader)
                                   -> GLProgram {
        unsafe {
            let gl_program = gl::CreateProgram();
            gl::AttachShader(gl_program, vertex_shader.gl_shader);
            gl::AttachShader(gl_program, fragment_shader.gl_shader);
            gl::LinkProgram(gl_program);

            let mut link_status = 0;
            gl::GetProgramiv(gl_program, gl::LINK_STATUS, &mut link_status);
            if link_status != gl::TRUE as GLint {
                let mut info_log_length = 0;
                gl::GetProgramiv(gl_program, gl::INFO_LOG_LENGTH, &mut info_log_length);
                let mut info_log = vec![0u8; info_log_length as usize];
                gl::GetProgramInfoLog(gl_program,
                                      info_log.len() as GLint,
                                      ptr::null_mut(),
                                      info_log.as_mut_ptr() as *mut _);
                error!("program info log:\n{}", String::from_utf8_lossy(&info_log));
                self.error_count.set(self.error_count.get() + 1);
                warn!("program '{}' linking failed; draws with it will be dropped", name);
            }

            GLProgram { gl_program, vertex_shader, fragment_shader }
        }
    }

    fn get_vertex_attr(&self, program: &GLProgram, name: &str) -> Option<GLVertexAttr> {
        let name = CString::new(format!("a{}", name)).unwrap();
        let attr = unsafe { gl::GetAttribLocation(program.gl_program, name.as_ptr()) };
        if attr < 0 {
            return None;
        }
        Some(GLVertexAttr { attr: attr as GLuint })
    }

    fn get_uniform(&self, program: &GLProgram, name: &str) -> GLUniform {
        let name = CString::new(format!("u{}", name)).unwrap();
        let location = unsafe { gl::GetUniformLocation(program.gl_program, name.as_ptr()) };
        GLUniform { location }
    }

    fn create_vertex_array(&self) -> GLVertexArray {
        let mut gl_vertex_array = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut gl_vertex_array);
        }
        GLVertexArray { gl_vertex_array }
    }

    fn bind_buffer(&self,
                   vertex_array: &GLVertexArray,
                   buffer: &GLBuffer,
                   target: BufferTarget) {
        unsafe {
            gl::BindVertexArray(vertex_array.gl_vertex_array);
            gl::BindBuffer(target.to_gl_target(), buffer.gl_buffer);
            gl::BindVertexArray(0);
        }
        self.cached.borrow_mut().vertex_array = None;
    }

    fn configure_vertex_attr(&self,
                             vertex_array: &GLVertexArray,
                             attr: &GLVertexAttr,
                             descriptor: &VertexAttrDescriptor) {
        debug_assert_ne!(descriptor.stride, 0);
        unsafe {
            gl::BindVertexArray(vertex_array.gl_vertex_array);
            let attr_type = descriptor.attr_type.to_gl_type();
            match descriptor.class {
                VertexAttrClass::Float | VertexAttrClass::FloatNorm => {
                    let normalized = if descriptor.class == VertexAttrClass::FloatNorm {
                        gl::TRUE
                    } else {
                        gl::FALSE
                    };
                    gl::VertexAttribPointer(attr.attr,
                                            descriptor.size as GLint,
                                            attr_type,
                                            normalized,
                                            descriptor.stride as GLsizei,
                                            descriptor.offset as *const GLvoid);
                }
                VertexAttrClass::Int => {
                    gl::VertexAttribIPointer(attr.attr,
                                             descriptor.size as GLint,
                                             attr_type,
                                             descriptor.stride as GLsizei,
                                             descriptor.offset as *const GLvoid);
                }
            }
            gl::VertexAttribDivisor(attr.attr, descriptor.divisor);
            gl::EnableVertexAttribArray(attr.attr);
            gl::BindVertexArray(0);
        }
        self.cached.borrow_mut().vertex_array = None;
        self.ck();
    }

    fn create_framebuffer(&self,
                          texture: GLTexture,
                          attachments: FramebufferAttachments)
                          -> GLFramebuffer {
        let mut gl_framebuffer = 0;
        let mut gl_renderbuffer = 0;
        unsafe {
            gl::GenFramebuffers(1, &mut gl_framebuffer);
            gl::BindFramebuffer(gl::FRAMEBUFFER, gl_framebuffer);
            gl::FramebufferTexture2D(gl::FRAMEBUFFER,
                                     gl::COLOR_ATTACHMENT0,
                                     gl::TEXTURE_2D,
                                     texture.gl_texture,
                                     0);

            if attachments.depth || attachments.stencil {
                gl::GenRenderbuffers(1, &mut gl_renderbuffer);
                gl::BindRenderbuffer(gl::RENDERBUFFER, gl_renderbuffer);
                let (storage, attachment) = if attachments.stencil {
                    (gl::DEPTH24_STENCIL8, gl::DEPTH_STENCIL_ATTACHMENT)
                } else {
                    (gl::DEPTH_COMPONENT24, gl::DEPTH_ATTACHMENT)
                };
                gl::RenderbufferStorage(gl::RENDERBUFFER,
                                        storage,
                                        texture.size.x,
                                        texture.size.y);
                gl::FramebufferRenderbuffer(gl::FRAMEBUFFER,
                                            attachment,
                                            gl::RENDERBUFFER,
                                            gl_renderbuffer);
            }

            let status = gl::CheckFramebufferStatus(gl::FRAMEBUFFER);
            if status != gl::FRAMEBUFFER_COMPLETE {
                self.error_count.set(self.error_count.get() + 1);
                warn!("framebuffer incomplete: 0x{:x}", status);
            }
        }
        self.cached.borrow_mut().framebuffer = None;
        GLFramebuffer { gl_framebuffer, gl_renderbuffer, texture }
    }

    #[inline]
    fn framebuffer_texture<'f>(&self, framebuffer: &'f GLFramebuffer) -> &'f GLTexture {
        &framebuffer.texture
    }

    fn create_buffer(&self) -> GLBuffer {
        let mut gl_buffer = 0;
        unsafe {
            gl::GenBuffers(1, &mut gl_buffer);
        }
        GLBuffer { gl_buffer }
    }

    fn allocate_buffer<T>(&self,
                          buffer: &GLBuffer,
                          data: BufferData<T>,
                          target: BufferTarget,
                          mode: BufferUploadMode) {
        let target = target.to_gl_target();
        let usage = mode.to_gl_usage();
        unsafe {
            gl::BindBuffer(target, buffer.gl_buffer);
            match data {
                BufferData::Uninitialized(len) => {
                    gl::BufferData(target,
                                   (len * mem::size_of::<T>()) as isize,
                                   ptr::null(),
                                   usage);
                }
                BufferData::Memory(slice) => {
                    gl::BufferData(target,
                                   (slice.len() * mem::size_of::<T>()) as isize,
                                   slice.as_ptr() as *const GLvoid,
                                   usage);
                }
            }
        }
        self.ck();
    }

    fn draw_elements(&self, index_count: u32, render_state: &RenderState<GLDevice>) {
        self.set_render_state(render_state);
        unsafe {
            gl::DrawElements(render_state.primitive.to_gl_primitive(),
                             index_count as GLsizei,
                             gl::UNSIGNED_INT,
                             ptr::null());
        }
        self.ck();
    }

    fn draw_elements_instanced(&self,
                               index_count: u32,
                               instance_count: u32,
                               render_state: &RenderState<GLDevice>) {
        self.set_render_state(render_state);
        unsafe {
            gl::DrawElementsInstanced(render_state.primitive.to_gl_primitive(),
                                      index_count as GLsizei,
                                      gl::UNSIGNED_INT,
                                      ptr::null(),
                                      instance_count as GLsizei);
        }
        self.ck();
    }

    fn begin_commands(&self) {}

    fn end_commands(&self) {
        unsafe {
            gl::Flush();
        }
    }

    fn read_pixels(&self, target: &RenderTarget<GLDevice>, viewport: RectI) -> TextureData {
        self.bind_render_target(target);
        let size = viewport.size();
        let mut pixels = vec![0u8; size.x as usize * size.y as usize * 4];
        unsafe {
            gl::ReadPixels(viewport.min.x,
                           viewport.min.y,
                           size.x,
                           size.y,
                           gl::RGBA,
                           gl::UNSIGNED_BYTE,
                           pixels.as_mut_ptr() as *mut GLvoid);
        }
        self.ck();
        TextureData::U8(pixels)
    }

    fn take_error_count(&self) -> u32 {
        self.ck();
        self.error_count.replace(0)
    }
}

pub struct GLShader {
    gl_shader: GLuint,
}

impl Drop for GLShader {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.gl_shader);
        }
    }
}

pub struct GLProgram {
    pub gl_program: GLuint,
    #[allow(dead_code)]
    vertex_shader: GLShader,
    #[allow(dead_code)]
    fragment_shader: GLShader,
}

impl Drop for GLProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.gl_program);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GLUniform {
    location: GLint,
}

pub struct GLVertexArray {
    pub gl_vertex_array: GLuint,
}

impl Drop for GLVertexArray {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.gl_vertex_array);
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GLVertexAttr {
    attr: GLuint,
}

pub struct GLBuffer {
    pub gl_buffer: GLuint,
}

impl Drop for GLBuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.gl_buffer);
        }
    }
}

pub struct GLTexture {
    gl_texture: GLuint,
    size: Vector2I,
    format: TextureFormat,
}

impl Drop for GLTexture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.gl_texture);
        }
    }
}

pub struct GLFramebuffer {
    pub gl_framebuffer: GLuint,
    gl_renderbuffer: GLuint,
    pub texture: GLTexture,
}

impl Drop for GLFramebuffer {
    fn drop(&mut self) {
        unsafe {
            if self.gl_renderbuffer != 0 {
                gl::DeleteRenderbuffers(1, &self.gl_renderbuffer);
            }
            gl::DeleteFramebuffers(1, &self.gl_framebuffer);
        }
    }
}

trait ToGLFactor {
    fn to_gl_factor(self) -> GLenum;
}

impl ToGLFactor for BlendFactor {
    fn to_gl_factor(self) -> GLenum {
        match self {
            BlendFactor::Zero => gl::ZERO,
            BlendFactor::One => gl::ONE,
            BlendFactor::SrcAlpha => gl::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
            BlendFactor::DestAlpha => gl::DST_ALPHA,
            BlendFactor::OneMinusDestAlpha => gl::ONE_MINUS_DST_ALPHA,
        }
    }
}

trait ToGLEquation {
    fn to_gl_equation(self) -> GLenum;
}

impl ToGLEquation for BlendOp {
    fn to_gl_equation(self) -> GLenum {
        match self {
            BlendOp::Add => gl::FUNC_ADD,
            BlendOp::Min => gl::MIN,
            BlendOp::Max => gl::MAX,
        }
    }
}

trait ToGLFunc {
    fn to_gl_func(self) -> GLenum;
}

impl ToGLFunc for DepthFunc {
    fn to_gl_func(self) -> GLenum {
        match self {
            DepthFunc::Less => gl::LESS,
            DepthFunc::LessEqual => gl::LEQUAL,
            DepthFunc::Always => gl::ALWAYS,
        }
    }
}

impl ToGLFunc for StencilFunc {
    fn to_gl_func(self) -> GLenum {
        match self {
            StencilFunc::Always => gl::ALWAYS,
            StencilFunc::Equal => gl::EQUAL,
        }
    }
}

trait ToGLTarget {
    fn to_gl_target(self) -> GLenum;
}

impl ToGLTarget for BufferTarget {
    fn to_gl_target(self) -> GLenum {
        match self {
            BufferTarget::Vertex => gl::ARRAY_BUFFER,
            BufferTarget::Index => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

trait ToGLUsage {
    fn to_gl_usage(self) -> GLenum;
}

impl ToGLUsage for BufferUploadMode {
    fn to_gl_usage(self) -> GLenum {
        match self {
            BufferUploadMode::Static => gl::STATIC_DRAW,
            BufferUploadMode::Dynamic => gl::DYNAMIC_DRAW,
            BufferUploadMode::Stream => gl::STREAM_DRAW,
        }
    }
}

trait ToGLPrimitive {
    fn to_gl_primitive(self) -> GLenum;
}

impl ToGLPrimitive for Primitive {
    fn to_gl_primitive(self) -> GLenum {
        match self {
            Primitive::Triangles => gl::TRIANGLES,
            Primitive::Lines => gl::LINES,
        }
    }
}

trait ToGLType {
    fn to_gl_type(self) -> GLenum;
}

impl ToGLType for VertexAttrType {
    fn to_gl_type(self) -> GLenum {
        match self {
            VertexAttrType::F32 => gl::FLOAT,
            VertexAttrType::I8 => gl::BYTE,
            VertexAttrType::I16 => gl::SHORT,
            VertexAttrType::I32 => gl::INT,
            VertexAttrType::U8 => gl::UNSIGNED_BYTE,
            VertexAttrType::U16 => gl::UNSIGNED_SHORT,
            VertexAttrType::U32 => gl::UNSIGNED_INT,
        }
    }
}

trait ToGLFormat {
    fn gl_internal_format(self) -> GLenum;
    fn gl_format(self) -> GLenum;
    fn gl_type(self) -> GLenum;
}

impl ToGLFormat for TextureFormat {
    fn gl_internal_format(self) -> GLenum {
        match self {
            TextureFormat::R8 => gl::R8,
            TextureFormat::R16UI => gl::R16UI,
            TextureFormat::R16F => gl::R16F,
            TextureFormat::R32F => gl::R32F,
            TextureFormat::RGBA8 => gl::RGBA8,
            TextureFormat::RGBA16F => gl::RGBA16F,
            TextureFormat::RGBA32F => gl::RGBA32F,
        }
    }

    fn gl_format(self) -> GLenum {
        match self {
            TextureFormat::R8 | TextureFormat::R16F | TextureFormat::R32F => gl::RED,
            TextureFormat::R16UI => gl::RED_INTEGER,
            TextureFormat::RGBA8 | TextureFormat::RGBA16F | TextureFormat::RGBA32F => gl::RGBA,
        }
    }

    fn gl_type(self) -> GLenum {
        match self {
            TextureFormat::R8 | TextureFormat::RGBA8 => gl::UNSIGNED_BYTE,
            TextureFormat::R16UI => gl::UNSIGNED_SHORT,
            TextureFormat::R16F | TextureFormat::RGBA16F => gl::HALF_FLOAT,
            TextureFormat::R32F | TextureFormat::RGBA32F => gl::FLOAT,
        }
    }
}
