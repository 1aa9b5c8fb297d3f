/// Metal shaders loaded from compiled libraries
///
/// Each stage comes in its own `metallib` with a named entry point. The
/// vertex descriptor lists the attributes the shader declares, numbered in
/// declaration order, at their offsets in the engine vertex. Pipeline states
/// are built by the device from the shader, the blend state and the render
/// target formats.

use crate::metal_api::{RawId, VertexAttributeDescriptor};
use crate::metal_error::{check_creation, SOURCE};
use crate::metal_format::vertex_format;
use crate::metal_resource::{objc_handle, MetalContext, ObjcHandle};
use crate::metal_state_cache::VERTEX_BUFFER_INDEX;
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::render::{
    vertex_attribute_offsets, InitShaderCommand, ShaderConstantInfo, VERTEX_ATTRIBUTES,
};
use galaxy_3d_graphics::galaxy3d::Result;

/// Constants of one stage, packed in declaration order
struct ConstantLayout {
    name: &'static str,
    constants: Vec<ShaderConstantInfo>,
}

impl ConstantLayout {
    fn pack(&self, values: &[Vec<f32>]) -> Result<Vec<u8>> {
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
            packed.extend(value.iter().flat_map(|value| value.to_ne_bytes()));
        }
        Ok(packed)
    }
}

/// Library and entry point of one stage
struct Stage {
    _library: ObjcHandle,
    function: ObjcHandle,
}

impl Stage {
    fn load(context: &MetalContext, name: &str, data: &[u8], function: &str) -> Result<Self> {
        let api = &context.api;
        let library = check_creation(api.new_library(data), &format!("Failed to load {} shader library", name))?;
        let library = objc_handle(api, library);
        let raw = check_creation(api.new_function(library.get()?, function),
            &format!("Failed to find {} function {}", name, function))?;
        Ok(Self { _library: library, function: objc_handle(api, raw) })
    }
}

pub struct MetalShader {
    serial: u64,
    vertex_descriptor: Vec<VertexAttributeDescriptor>,
    fragment_constants: ConstantLayout,
    vertex_constants: ConstantLayout,
    fragment: Stage,
    vertex: Stage,
}

impl MetalShader {
    pub fn new(context: &mut MetalContext, command: InitShaderCommand) -> Result<Self> {
        if command.fragment_shader.is_empty() || command.vertex_shader.is_empty() {
            engine_bail!(SOURCE, InvalidParameter, "Shader bytecode is empty");
        }
        if command.fragment_shader_function.is_empty() || command.vertex_shader_function.is_empty() {
            engine_bail!(SOURCE, InvalidParameter, "Shader function name is empty");
        }

        let offsets = vertex_attribute_offsets();
        let mut vertex_descriptor = Vec::new();
        for (index, attribute) in VERTEX_ATTRIBUTES.iter().enumerate() {
            if !command.vertex_attributes.contains(&attribute.usage) {
                continue;
            }
            vertex_descriptor.push(VertexAttributeDescriptor {
                index: vertex_descriptor.len() as u32,
                format: vertex_format(attribute.data_type)?,
                offset: offsets[index],
                buffer_index: VERTEX_BUFFER_INDEX,
            });
        }

        let fragment = Stage::load(context, "fragment", &command.fragment_shader, &command.fragment_shader_function)?;
        let vertex = Stage::load(context, "vertex", &command.vertex_shader, &command.vertex_shader_function)?;

        Ok(Self {
            serial: context.next_serial(),
            vertex_descriptor,
            fragment_constants: ConstantLayout { name: "fragment", constants: command.fragment_shader_constants },
            vertex_constants: ConstantLayout { name: "vertex", constants: command.vertex_shader_constants },
            fragment,
            vertex,
        })
    }

    /// Constant bytes of both stages, in declaration order
    ///
    /// Fails unless both stages match their layout.
    pub fn pack_constants(&self, fragment: &[Vec<f32>], vertex: &[Vec<f32>]) -> Result<(Vec<u8>, Vec<u8>)> {
        Ok((self.fragment_constants.pack(fragment)?, self.vertex_constants.pack(vertex)?))
    }

    /// Identifies the shader in pipeline keys
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn vertex_descriptor(&self) -> &[VertexAttributeDescriptor] {
        &self.vertex_descriptor
    }

    pub fn fragment_function(&self) -> Result<RawId> {
        self.fragment.function.get()
    }

    pub fn vertex_function(&self) -> Result<RawId> {
        self.vertex.function.get()
    }
}
