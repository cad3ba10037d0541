// quill/renderer/src/gpu/shaders.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shader program wrappers and their vertex array bindings.

use crate::batch::MAX_PAINT_TEXTURES;
use quill_gpu::{BufferTarget, Device, VertexAttrClass, VertexAttrDescriptor, VertexAttrType};
use quill_resources::ResourceLoader;

pub(crate) const TILE_VERTEX_SIZE: usize = 40;
pub(crate) const FILL_VERTEX_SIZE: usize = 28;
const PRIMITIVE_INSTANCE_SIZE: usize = 24;

pub struct TileProgram<D>
where
    D: Device,
{
    pub program: D::Program,
    pub transform_uniform: D::Uniform,
    pub curves_texture_uniform: D::Uniform,
    pub bands_texture_uniform: D::Uniform,
    pub paint_texture_uniforms: Vec<D::Uniform>,
}

impl<D> TileProgram<D>
where
    D: Device,
{
    pub fn new(device: &D, resources: &dyn ResourceLoader) -> TileProgram<D> {
        let program = device.create_raster_program(resources, "tile");
        let transform_uniform = device.get_uniform(&program, "Transform");
        let curves_texture_uniform = device.get_uniform(&program, "CurvesTexture");
        let bands_texture_uniform = device.get_uniform(&program, "BandsTexture");
        let paint_texture_uniforms = (0..MAX_PAINT_TEXTURES)
            .map(|index| device.get_uniform(&program, &format!("PaintTexture{}", index)))
            .collect();
        TileProgram {
            program,
            transform_uniform,
            curves_texture_uniform,
            bands_texture_uniform,
            paint_texture_uniforms,
        }
    }
}

pub struct TileVertexArray<D>
where
    D: Device,
{
    pub vertex_array: D::VertexArray,
}

impl<D> TileVertexArray<D>
where
    D: Device,
{
    pub fn new(device: &D,
               tile_program: &TileProgram<D>,
               vertex_buffer: &D::Buffer,
               index_buffer: &D::Buffer)
               -> TileVertexArray<D> {
        let vertex_array = device.create_vertex_array();

        let position_attr = device.get_vertex_attr(&tile_program.program, "Position").unwrap();
        let color_attr = device.get_vertex_attr(&tile_program.program, "Color").unwrap();
        let tex_coord_attr = device.get_vertex_attr(&tile_program.program, "TexCoord").unwrap();
        let curves_coord_attr =
            device.get_vertex_attr(&tile_program.program, "CurvesCoord").unwrap();
        let attr_1_attr = device.get_vertex_attr(&tile_program.program, "Attr1").unwrap();
        let attr_2_attr = device.get_vertex_attr(&tile_program.program, "Attr2").unwrap();
        let attr_3_attr = device.get_vertex_attr(&tile_program.program, "Attr3").unwrap();

        device.bind_buffer(&vertex_array, vertex_buffer, BufferTarget::Vertex);
        device.configure_vertex_attr(&vertex_array, &position_attr, &VertexAttrDescriptor {
            size: 2,
            class: VertexAttrClass::Float,
            attr_type: VertexAttrType::F32,
            stride: TILE_VERTEX_SIZE,
            offset: 0,
            divisor: 0,
            buffer_index: 0,
        });
        device.configure_vertex_attr(&vertex_array, &color_attr, &VertexAttrDescriptor {
            size: 4,
            class: VertexAttrClass::FloatNorm,
            attr_type: VertexAttrType::U8,
            stride: TILE_VERTEX_SIZE,
            offset: 8,
            divisor: 0,
            buffer_index: 0,
        });
        device.configure_vertex_attr(&vertex_array, &tex_coord_attr, &VertexAttrDescriptor {
            size: 2,
            class: VertexAttrClass::Float,
            attr_type: VertexAttrType::F32,
            stride: TILE_VERTEX_SIZE,
            offset: 12,
            divisor: 0,
            buffer_index: 0,
        });
        device.configure_vertex_attr(&vertex_array, &curves_coord_attr, &VertexAttrDescriptor {
            size: 2,
            class: VertexAttrClass::Float,
            attr_type: VertexAttrType::F32,
            stride: TILE_VERTEX_SIZE,
            offset: 20,
            divisor: 0,
            buffer_index: 0,
        });
        for (offset, attr) in [(28, &attr_1_attr), (32, &attr_2_attr), (36, &attr_3_attr)].iter()
        {
            device.configure_vertex_attr(&vertex_array, attr, &VertexAttrDescriptor {
                size: 1,
                class: VertexAttrClass::Int,
                attr_type: VertexAttrType::U32,
                stride: TILE_VERTEX_SIZE,
                offset: *offset,
                divisor: 0,
                buffer_index: 0,
            });
        }
        device.bind_buffer(&vertex_array, index_buffer, BufferTarget::Index);

        TileVertexArray { vertex_array }
    }
}

pub struct FillProgram<D>
where
    D: Device,
{
    pub program: D::Program,
    pub transform_uniform: D::Uniform,
    pub paint_texture_uniforms: Vec<D::Uniform>,
}

impl<D> FillProgram<D>
where
    D: Device,
{
    pub fn new(device: &D, resources: &dyn ResourceLoader) -> FillProgram<D> {
        let program = device.create_raster_program(resources, "fill");
        let transform_uniform = device.get_uniform(&program, "Transform");
        let paint_texture_uniforms = (0..MAX_PAINT_TEXTURES)
            .map(|index| device.get_uniform(&program, &format!("PaintTexture{}", index)))
            .collect();
        FillProgram { program, transform_uniform, paint_texture_uniforms }
    }
}

pub struct FillVertexArray<D>
where
    D: Device,
{
    pub vertex_array: D::VertexArray,
}

impl<D> FillVertexArray<D>
where
    D: Device,
{
    pub fn new(device: &D,
               fill_program: &FillProgram<D>,
               vertex_buffer: &D::Buffer,
               index_buffer: &D::Buffer)
               -> FillVertexArray<D> {
        let vertex_array = device.create_vertex_array();

        let position_attr = device.get_vertex_attr(&fill_program.program, "Position").unwrap();
        let color_attr = device.get_vertex_attr(&fill_program.program, "Color").unwrap();
        let tex_coord_attr = device.get_vertex_attr(&fill_program.program, "TexCoord").unwrap();
        let attr_1_attr = device.get_vertex_attr(&fill_program.program, "Attr1").unwrap();
        let attr_2_attr = device.get_vertex_attr(&fill_program.program, "Attr2").unwrap();

        device.bind_buffer(&vertex_array, vertex_buffer, BufferTarget::Vertex);
        device.configure_vertex_attr(&vertex_array, &position_attr, &VertexAttrDescriptor {
            size: 2,
            class: VertexAttrClass::Float,
            attr_type: VertexAttrType::F32,
            stride: FILL_VERTEX_SIZE,
            offset: 0,
            divisor: 0,
            buffer_index: 0,
        });
        device.configure_vertex_attr(&vertex_array, &color_attr, &VertexAttrDescriptor {
            size: 4,
            class: VertexAttrClass::FloatNorm,
            attr_type: VertexAttrType::U8,
            stride: FILL_VERTEX_SIZE,
            offset: 8,
            divisor: 0,
            buffer_index: 0,
        });
        device.configure_vertex_attr(&vertex_array, &tex_coord_attr, &VertexAttrDescriptor {
            size: 2,
            class: VertexAttrClass::Float,
            attr_type: VertexAttrType::F32,
            stride: FILL_VERTEX_SIZE,
            offset: 12,
            divisor: 0,
            buffer_index: 0,
        });
        for (offset, attr) in [(20, &attr_1_attr), (24, &attr_2_attr)].iter() {
            device.configure_vertex_attr(&vertex_array, attr, &VertexAttrDescriptor {
                size: 1,
                class: VertexAttrClass::Int,
                attr_type: VertexAttrType::U32,
                stride: FILL_VERTEX_SIZE,
                offset: *offset,
                divisor: 0,
                buffer_index: 0,
            });
        }
        device.bind_buffer(&vertex_array, index_buffer, BufferTarget::Index);

        FillVertexArray { vertex_array }
    }
}

pub struct PrimitiveProgram<D>
where
    D: Device,
{
    pub program: D::Program,
    pub transform_uniform: D::Uniform,
    pub zoom_uniform: D::Uniform,
}

impl<D> PrimitiveProgram<D>
where
    D: Device,
{
    pub fn new(device: &D, resources: &dyn ResourceLoader) -> PrimitiveProgram<D> {
        let program = device.create_raster_program(resources, "primitive");
        let transform_uniform = device.get_uniform(&program, "Transform");
        let zoom_uniform = device.get_uniform(&program, "Zoom");
        PrimitiveProgram { program, transform_uniform, zoom_uniform }
    }
}

pub struct PrimitiveVertexArray<D>
where
    D: Device,
{
    pub vertex_array: D::VertexArray,
}

impl<D> PrimitiveVertexArray<D>
where
    D: Device,
{
    pub fn new(device: &D,
               primitive_program: &PrimitiveProgram<D>,
               corner_buffer: &D::Buffer,
               instance_buffer: &D::Buffer,
               index_buffer: &D::Buffer)
               -> PrimitiveVertexArray<D> {
        let vertex_array = device.create_vertex_array();

        let corner_attr =
            device.get_vertex_attr(&primitive_program.program, "Corner").unwrap();
        let attr_1_attr = device.get_vertex_attr(&primitive_program.program, "Attr1").unwrap();
        let attr_2_attr = device.get_vertex_attr(&primitive_program.program, "Attr2").unwrap();
        let attr_3_attr = device.get_vertex_attr(&primitive_program.program, "Attr3").unwrap();
        let color_attr = device.get_vertex_attr(&primitive_program.program, "Color").unwrap();

        device.bind_buffer(&vertex_array, corner_buffer, BufferTarget::Vertex);
        device.configure_vertex_attr(&vertex_array, &corner_attr, &VertexAttrDescriptor {
            size: 2,
            class: VertexAttrClass::Int,
            attr_type: VertexAttrType::U8,
            stride: 2,
            offset: 0,
            divisor: 0,
            buffer_index: 0,
        });
        device.bind_buffer(&vertex_array, instance_buffer, BufferTarget::Vertex);
        device.configure_vertex_attr(&vertex_array, &attr_1_attr, &VertexAttrDescriptor {
            size: 2,
            class: VertexAttrClass::Float,
            attr_type: VertexAttrType::F32,
            stride: PRIMITIVE_INSTANCE_SIZE,
            offset: 0,
            divisor: 1,
            buffer_index: 1,
        });
        device.configure_vertex_attr(&vertex_array, &attr_2_attr, &VertexAttrDescriptor {
            size: 2,
            class: VertexAttrClass::Float,
            attr_type: VertexAttrType::F32,
            stride: PRIMITIVE_INSTANCE_SIZE,
            offset: 8,
            divisor: 1,
            buffer_index: 1,
        });
        device.configure_vertex_attr(&vertex_array, &attr_3_attr, &VertexAttrDescriptor {
            size: 1,
            class: VertexAttrClass::Int,
            attr_type: VertexAttrType::U32,
            stride: PRIMITIVE_INSTANCE_SIZE,
            offset: 16,
            divisor: 1,
            buffer_index: 1,
        });
        device.configure_vertex_attr(&vertex_array, &color_attr, &VertexAttrDescriptor {
            size: 4,
            class: VertexAttrClass::Float,
            attr_type: VertexAttrType::U8,
            stride: PRIMITIVE_INSTANCE_SIZE,
            offset: 20,
            divisor: 1,
            buffer_index: 1,
        });
        device.bind_buffer(&vertex_array, index_buffer, BufferTarget::Index);

        PrimitiveVertexArray { vertex_array }
    }
}

pub struct BlitProgram<D>
where
    D: Device,
{
    pub program: D::Program,
    pub dest_rect_uniform: D::Uniform,
    pub src_rect_uniform: D::Uniform,
    pub src_uniform: D::Uniform,
}

impl<D> BlitProgram<D>
where
    D: Device,
{
    pub fn new(device: &D, resources: &dyn ResourceLoader) -> BlitProgram<D> {
        let program = device.create_raster_program(resources, "blit");
        let dest_rect_uniform = device.get_uniform(&program, "DestRect");
        let src_rect_uniform = device.get_uniform(&program, "SrcRect");
        let src_uniform = device.get_uniform(&program, "Src");
        BlitProgram { program, dest_rect_uniform, src_rect_uniform, src_uniform }
    }
}

pub struct BlitVertexArray<D>
where
    D: Device,
{
    pub vertex_array: D::VertexArray,
}

impl<D> BlitVertexArray<D>
where
    D: Device,
{
    pub fn new(device: &D,
               blit_program: &BlitProgram<D>,
               corner_buffer: &D::Buffer,
               index_buffer: &D::Buffer)
               -> BlitVertexArray<D> {
        let vertex_array = device.create_vertex_array();
        let corner_attr = device.get_vertex_attr(&blit_program.program, "Corner").unwrap();

        device.bind_buffer(&vertex_array, corner_buffer, BufferTarget::Vertex);
        device.configure_vertex_attr(&vertex_array, &corner_attr, &VertexAttrDescriptor {
            size: 2,
            class: VertexAttrClass::Int,
            attr_type: VertexAttrType::U8,
            stride: 2,
            offset: 0,
            divisor: 0,
            buffer_index: 0,
        });
        device.bind_buffer(&vertex_array, index_buffer, BufferTarget::Index);

        BlitVertexArray { vertex_array }
    }
}
