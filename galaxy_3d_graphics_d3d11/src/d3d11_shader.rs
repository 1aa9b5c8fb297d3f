/// HLSL shaders compiled to bytecode
///
/// The input layout only describes the attributes the shader declares, at
/// their offsets in the engine vertex. Constants of each stage are packed in
/// declaration order into one dynamic constant buffer bound to slot 0.

use crate::d3d11_api::{BufferDesc, InputElementDesc, RawCom};
use crate::d3d11_constants::*;
use crate::d3d11_error::{check_creation, SOURCE};
use crate::d3d11_format::vertex_format;
use crate::d3d11_resource::{com_handle, empty_handle, ComHandle, D3d11Context, Mapping};
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::render::{
    vertex_attribute_offsets, InitShaderCommand, ShaderConstantInfo, VertexUsage, VERTEX_ATTRIBUTES,
};
use galaxy_3d_graphics::galaxy3d::Result;
use std::collections::BTreeSet;

/// Constant buffer sizes are multiples of 16 bytes
const CONSTANT_BUFFER_ALIGNMENT: u32 = 16;

struct ConstantStage {
    name: &'static str,
    constants: Vec<ShaderConstantInfo>,
    buffer: ComHandle,
}

impl ConstantStage {
    fn new(context: &D3d11Context, name: &'static str, constants: Vec<ShaderConstantInfo>) -> Result<Self> {
        let size: u32 = constants.iter().map(|constant| constant.data_type.size()).sum();
        let mut buffer = empty_handle(&context.api);
        if size > 0 {
            let desc = BufferDesc {
                byte_width: size.div_ceil(CONSTANT_BUFFER_ALIGNMENT) * CONSTANT_BUFFER_ALIGNMENT,
                usage: D3D11_USAGE_DYNAMIC,
                bind_flags: D3D11_BIND_CONSTANT_BUFFER,
                cpu_access_flags: D3D11_CPU_ACCESS_WRITE,
            };
            let native = check_creation(context.api.create_buffer(&desc, None),
                "Failed to create constant buffer")?;
            buffer = com_handle(&context.api, native);
        }
        Ok(Self { name, constants, buffer })
    }

    /// Values packed contiguously, after checking them against the layout
    fn pack(&self, values: &[Vec<f32>]) -> Result<Vec<f32>> {
        if values.len() > self.constants.len() {
            engine_bail!(SOURCE, ProtocolError,
                "Too many {} shader constants: {} declared, {} given", self.name, self.constants.len(), values.len());
        }
        let mut packed = Vec::new();
        for (constant, value) in self.constants.iter().zip(values) {
            let expected = (constant.data_type.size() / 4) as usize;
            if value.len() != expected {
                engine_bail!(SOURCE, ProtocolError,
                    "Invalid {} shader constant size for {}: expected {} floats, got {}",
                    self.name, constant.name, expected, value.len());
            }
            packed.extend_from_slice(value);
        }
        Ok(packed)
    }

    fn upload(&self, context: &D3d11Context, values: &[f32]) -> Result<()> {
        let Some(buffer) = self.buffer.raw() else {
            return Ok(());
        };
        if values.is_empty() {
            return Ok(());
        }
        let bytes: Vec<u8> = values.iter().flat_map(|value| value.to_ne_bytes()).collect();
        let mut mapping = Mapping::new(context.api.as_ref(), buffer, 0, D3D11_MAP_WRITE_DISCARD,
            "Failed to map constant buffer")?;
        mapping.write(&bytes);
        Ok(())
    }
}

pub struct D3d11Shader {
    vertex_attributes: BTreeSet<VertexUsage>,
    fragment: ConstantStage,
    vertex: ConstantStage,
    pixel_shader: ComHandle,
    vertex_shader: ComHandle,
    input_layout: ComHandle,
}

impl D3d11Shader {
    pub fn new(context: &mut D3d11Context, command: InitShaderCommand) -> Result<Self> {
        if command.fragment_shader.is_empty() || command.vertex_shader.is_empty() {
            engine_bail!(SOURCE, InvalidParameter, "Shader bytecode is empty");
        }

        let api = &context.api;
        let pixel = check_creation(api.create_pixel_shader(&command.fragment_shader), "Failed to create pixel shader")?;
        let pixel_shader = com_handle(api, pixel);
        let vertex = check_creation(api.create_vertex_shader(&command.vertex_shader), "Failed to create vertex shader")?;
        let vertex_shader = com_handle(api, vertex);

        let offsets = vertex_attribute_offsets();
        let mut elements = Vec::new();
        for (index, attribute) in VERTEX_ATTRIBUTES.iter().enumerate() {
            if !command.vertex_attributes.contains(&attribute.usage) {
                continue;
            }
            let (semantic_name, semantic_index) = attribute.usage.semantic();
            elements.push(InputElementDesc {
                semantic_name,
                semantic_index,
                format: vertex_format(attribute.data_type)?,
                aligned_byte_offset: offsets[index],
            });
        }
        let layout = check_creation(api.create_input_layout(&elements, &command.vertex_shader),
            "Failed to create input layout")?;
        let input_layout = com_handle(api, layout);

        Ok(Self {
            vertex_attributes: command.vertex_attributes,
            fragment: ConstantStage::new(context, "fragment", command.fragment_shader_constants)?,
            vertex: ConstantStage::new(context, "vertex", command.vertex_shader_constants)?,
            pixel_shader,
            vertex_shader,
            input_layout,
        })
    }

    /// Bind both stages and the input layout
    pub fn bind(&self, context: &mut D3d11Context) {
        context.state.set_shaders(self.pixel_shader.raw(), self.vertex_shader.raw(), self.input_layout.raw());
    }

    /// Upload constant values, in declaration order, and bind the buffers
    ///
    /// Nothing is uploaded unless both stages match their layout.
    pub fn set_constants(&self, context: &mut D3d11Context, fragment_values: &[Vec<f32>], vertex_values: &[Vec<f32>]) -> Result<()> {
        let fragment = self.fragment.pack(fragment_values)?;
        let vertex = self.vertex.pack(vertex_values)?;

        self.fragment.upload(context, &fragment)?;
        self.vertex.upload(context, &vertex)?;
        context.state.set_constant_buffers(self.fragment.buffer.raw(), self.vertex.buffer.raw());
        Ok(())
    }

    pub fn vertex_attributes(&self) -> &BTreeSet<VertexUsage> {
        &self.vertex_attributes
    }

    pub fn pixel_shader(&self) -> Option<RawCom> {
        self.pixel_shader.raw()
    }

    pub fn vertex_shader(&self) -> Option<RawCom> {
        self.vertex_shader.raw()
    }

    pub fn input_layout(&self) -> Option<RawCom> {
        self.input_layout.raw()
    }

    /// Constant buffers of the fragment and vertex stages
    #[cfg(test)]
    pub fn constant_buffers(&self) -> (Option<RawCom>, Option<RawCom>) {
        (self.fragment.buffer.raw(), self.vertex.buffer.raw())
    }

    pub fn bindable_objects(&self) -> Vec<RawCom> {
        [
            &self.pixel_shader,
            &self.vertex_shader,
            &self.input_layout,
            &self.fragment.buffer,
            &self.vertex.buffer,
        ]
        .into_iter()
        .filter_map(|handle| handle.raw())
        .collect()
    }
}
