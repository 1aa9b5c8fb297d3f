/// GLSL programs
///
/// Vertex attribute `i` of the engine vertex layout is always bound to
/// location `i`, whether or not the shader uses the attributes before it.
/// Samplers `texture0` and `texture1` are bound to texture units 0 and 1.

use crate::opengl_api::GlApi;
use crate::opengl_constants::*;
use crate::opengl_error::{check, check_creation, SOURCE};
use crate::opengl_resource::{empty_handle, name_of, GlContext, GlHandle, GlObject, GlObjectKind};
use galaxy_3d_graphics::galaxy3d::render::{
    ComponentType, DataType, InitShaderCommand, ShaderConstantInfo, VertexUsage, VERTEX_ATTRIBUTES,
};
use galaxy_3d_graphics::galaxy3d::resource::Reload;
use galaxy_3d_graphics::galaxy3d::{Error, NativeError, NativeErrorCode, Result};
use galaxy_3d_graphics::{engine_bail, engine_err, engine_error};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Texture unit sampler names
const SAMPLERS: [&str; 2] = ["texture0", "texture1"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConstantLocation {
    location: GLint,
    data_type: DataType,
}

pub struct GlShader {
    fragment_source: String,
    vertex_source: String,
    vertex_attributes: BTreeSet<VertexUsage>,
    fragment_constants: Vec<ShaderConstantInfo>,
    vertex_constants: Vec<ShaderConstantInfo>,
    fragment_locations: Vec<ConstantLocation>,
    vertex_locations: Vec<ConstantLocation>,
    program: GlHandle,
}

fn source_text(bytes: Vec<u8>, stage: &str) -> Result<String> {
    let mut text = String::from_utf8(bytes)
        .map_err(|_| engine_err!(SOURCE, InvalidParameter, "{} shader source is not UTF-8", stage))?;
    while text.ends_with('\0') {
        text.pop();
    }
    if text.is_empty() {
        engine_bail!(SOURCE, InvalidParameter, "{} shader source is empty", stage);
    }
    Ok(text)
}

fn native_failure(status: GLenum, message: String) -> Error {
    engine_error!(SOURCE, "{}", message);
    Error::NativeCreationFailure(NativeError::new(NativeErrorCode::OpenGl(status), message))
}

/// Compile one stage; the returned handle deletes the shader object on drop
fn compile(api: &Arc<dyn GlApi>, kind: GLenum, stage: &str, source: &str) -> Result<GlHandle> {
    let name = api.create_shader(kind);
    check_creation(api.as_ref(), "Failed to create shader")?;
    let shader = GlHandle::new(name, GlObject::new(Arc::clone(api), GlObjectKind::Shader));

    api.shader_source(name, source);
    api.compile_shader(name);
    check_creation(api.as_ref(), "Failed to compile shader")?;

    if !api.shader_compile_status(name) {
        let log = api.shader_info_log(name);
        return Err(native_failure(COMPILE_STATUS,
            format!("Failed to compile {} shader: {}", stage, log.trim_end())));
    }
    Ok(shader)
}

impl GlShader {
    pub fn new(context: &mut GlContext, command: InitShaderCommand) -> Result<Self> {
        let mut shader = Self {
            fragment_source: source_text(command.fragment_shader, "Fragment")?,
            vertex_source: source_text(command.vertex_shader, "Vertex")?,
            vertex_attributes: command.vertex_attributes,
            fragment_constants: command.fragment_shader_constants,
            vertex_constants: command.vertex_shader_constants,
            fragment_locations: Vec::new(),
            vertex_locations: Vec::new(),
            program: empty_handle(&context.api, GlObjectKind::Program),
        };
        shader.create(context)?;
        Ok(shader)
    }

    fn create(&mut self, context: &mut GlContext) -> Result<()> {
        let api = Arc::clone(&context.api);

        let fragment = compile(&api, FRAGMENT_SHADER, "fragment", &self.fragment_source)?;
        let vertex = compile(&api, VERTEX_SHADER, "vertex", &self.vertex_source)?;
        let fragment_name = fragment.get()?;
        let vertex_name = vertex.get()?;

        let program = api.create_program();
        check_creation(api.as_ref(), "Failed to create shader program")?;
        self.program.replace(program);

        api.attach_shader(program, vertex_name);
        api.attach_shader(program, fragment_name);
        for (index, attribute) in VERTEX_ATTRIBUTES.iter().enumerate() {
            if self.vertex_attributes.contains(&attribute.usage) {
                api.bind_attrib_location(program, index as GLuint, attribute.usage.attribute_name());
            }
        }
        check_creation(api.as_ref(), "Failed to bind attribute locations")?;

        api.link_program(program);
        if !api.program_link_status(program) {
            let log = api.program_info_log(program);
            return Err(native_failure(LINK_STATUS,
                format!("Failed to link shader: {}", log.trim_end())));
        }

        api.detach_shader(program, vertex_name);
        api.detach_shader(program, fragment_name);
        check_creation(api.as_ref(), "Failed to detach shader")?;
        drop(vertex);
        drop(fragment);

        // Sampler units are program state: set them with the program bound
        let previous = context.state.program();
        context.state.use_program(program)?;
        for (unit, sampler) in SAMPLERS.iter().enumerate() {
            if let Some(location) = api.uniform_location(program, sampler) {
                api.uniform_1i(location, unit as GLint);
            }
        }
        check_creation(api.as_ref(), "Failed to set texture units")?;
        context.state.use_program(previous)?;

        self.fragment_locations = locations(api.as_ref(), program, &self.fragment_constants)?;
        self.vertex_locations = locations(api.as_ref(), program, &self.vertex_constants)?;
        Ok(())
    }

    /// Upload constant values, in declaration order, to the bound program
    pub fn set_constants(
        &self,
        context: &mut GlContext,
        fragment_values: &[Vec<f32>],
        vertex_values: &[Vec<f32>],
    ) -> Result<()> {
        validate_constants("fragment", &self.fragment_locations, fragment_values)?;
        validate_constants("vertex", &self.vertex_locations, vertex_values)?;

        context.state.use_program(self.program())?;
        let api = context.api.as_ref();
        for (constant, values) in self.fragment_locations.iter().zip(fragment_values) {
            set_uniform(api, constant, values)?;
        }
        for (constant, values) in self.vertex_locations.iter().zip(vertex_values) {
            set_uniform(api, constant, values)?;
        }
        check(api, "Failed to set shader constants")
    }

    pub fn program(&self) -> GLuint {
        name_of(&self.program)
    }

    pub fn vertex_attributes(&self) -> &BTreeSet<VertexUsage> {
        &self.vertex_attributes
    }

    pub(crate) fn abandon(&mut self) {
        self.program.abandon();
    }
}

impl Reload<GlContext> for GlShader {
    fn reload(&mut self, context: &mut GlContext) -> Result<()> {
        self.create(context)
    }
}

fn locations(api: &dyn GlApi, program: GLuint, constants: &[ShaderConstantInfo]) -> Result<Vec<ConstantLocation>> {
    constants
        .iter()
        .map(|constant| {
            let location = api.uniform_location(program, &constant.name).ok_or_else(|| {
                engine_err!(SOURCE, InvalidParameter, "Failed to get location of uniform {}", constant.name)
            })?;
            Ok(ConstantLocation { location, data_type: constant.data_type })
        })
        .collect()
}

fn validate_constants(stage: &str, locations: &[ConstantLocation], values: &[Vec<f32>]) -> Result<()> {
    if values.len() > locations.len() {
        engine_bail!(SOURCE, ProtocolError,
            "Too many {} shader constants: {} declared, {} given", stage, locations.len(), values.len());
    }
    for (constant, value) in locations.iter().zip(values) {
        let expected = (constant.data_type.size() / 4) as usize;
        if value.len() != expected {
            engine_bail!(SOURCE, ProtocolError,
                "Invalid {} shader constant size: expected {} floats, got {}", stage, expected, value.len());
        }
    }
    Ok(())
}

/// Integer constants travel as the bit patterns of their f32 slots
fn set_uniform(api: &dyn GlApi, constant: &ConstantLocation, values: &[f32]) -> Result<()> {
    let location = constant.location;
    let data_type = constant.data_type;
    match data_type {
        DataType::FloatMatrix3 => api.uniform_matrix_fv(location, 3, values),
        DataType::FloatMatrix4 => api.uniform_matrix_fv(location, 4, values),
        _ => {
            let components = data_type.component_count();
            match data_type.component_type() {
                ComponentType::Float => api.uniform_fv(location, components, values),
                ComponentType::Integer => {
                    let ints: Vec<i32> = values.iter().map(|value| value.to_bits() as i32).collect();
                    api.uniform_iv(location, components, &ints);
                }
                ComponentType::UnsignedInteger => {
                    let uints: Vec<u32> = values.iter().map(|value| value.to_bits()).collect();
                    api.uniform_uiv(location, components, &uints);
                }
                _ => engine_bail!(SOURCE, InvalidParameter, "Unsupported uniform type {:?}", data_type),
            }
        }
    }
    Ok(())
}
