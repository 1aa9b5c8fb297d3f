/// OpenGL / OpenGL ES render device
///
/// Owns the GL context wrapper, the state cache and the resource table, and
/// executes commands on the render thread. The window system part (context
/// creation, buffer swaps, surface resize) stays behind `GlSurface`.

use crate::opengl_api::{GlApi, GlApiKind, GlProfile, GlVersion};
use crate::opengl_blend_state::GlBlendState;
use crate::opengl_buffer::GlBuffer;
use crate::opengl_capabilities::query_capabilities;
use crate::opengl_constants::*;
use crate::opengl_depth_stencil_state::GlDepthStencilState;
use crate::opengl_error::{check, SOURCE};
use crate::opengl_format::{cull_face, draw_mode, fill_mode, index_type, vertex_type};
use crate::opengl_glow::GlowApi;
use crate::opengl_render_target::GlRenderTarget;
use crate::opengl_resource::{GlContext, GlResource};
use crate::opengl_shader::GlShader;
use crate::opengl_state_cache::{GlBlend, GlRect, MAX_TEXTURE_UNITS};
use crate::opengl_texture::{GlAttachment, GlTexture};
use galaxy_3d_graphics::galaxy3d::render::{
    vertex_attribute_offsets, BlitCommand, BufferType, Capabilities, ClearRenderTargetCommand, Command,
    DrawCommand, Driver, FillMode, Rect, RenderDevice, RenderDeviceConfig, SetPipelineStateCommand,
    Vertex, VERTEX_ATTRIBUTES,
};
use galaxy_3d_graphics::galaxy3d::resource::{Reloadable, RenderResource, ResourceId, ResourceTable};
use galaxy_3d_graphics::galaxy3d::Result;
use galaxy_3d_graphics::glam::UVec2;
use galaxy_3d_graphics::{engine_bail, engine_err, engine_info, engine_warn};
use std::ffi::c_void;
use std::sync::Arc;

/// Window system side of a GL context
pub trait GlSurface: Send {
    /// Present the default framebuffer
    fn swap_buffers(&mut self) -> Result<()>;

    /// The drawable was resized
    fn resize(&mut self, size: UVec2) -> Result<()>;
}

/// Render device configuration for an existing GL context
#[derive(Debug, Clone, PartialEq)]
pub struct GlContextConfig {
    pub base: RenderDeviceConfig,
    pub api: GlApiKind,
}

impl GlContextConfig {
    pub fn new(base: RenderDeviceConfig, api: GlApiKind) -> Self {
        Self { base, api }
    }
}

pub struct OglRenderDevice {
    context: GlContext,
    resources: ResourceTable<GlResource>,
    surface: Box<dyn GlSurface>,
    size: UVec2,
    sample_count: u32,
    vertex_array: GLuint,
    current_shader: ResourceId,
    current_render_target: ResourceId,
}

impl OglRenderDevice {
    /// Create the device on a context that is current on this thread
    pub fn new(config: &GlContextConfig, api: Arc<dyn GlApi>, surface: Box<dyn GlSurface>) -> Result<Self> {
        config.base.validate()?;

        let version_string = api.get_string(VERSION);
        let version = GlVersion::parse(&version_string).ok_or_else(|| {
            engine_err!(SOURCE, InitializationFailed, "Failed to parse OpenGL version \"{}\"", version_string)
        })?;
        let profile = GlProfile::new(config.api, version, api.extensions());
        let mut capabilities = query_capabilities(&profile, api.as_ref());
        capabilities.supported_resolutions = vec![config.base.size];

        let mut sample_count = config.base.sample_count;
        if sample_count > 1 && !capabilities.multisampling {
            engine_warn!(SOURCE, "Multisampling is not supported, falling back to 1 sample");
            sample_count = 1;
        } else if sample_count > capabilities.sample_count {
            engine_warn!(SOURCE, "{} samples requested, using {}", sample_count, capabilities.sample_count);
            sample_count = capabilities.sample_count;
        }

        engine_info!(SOURCE, "Using {} by {} ({})",
            api.get_string(RENDERER), api.get_string(VENDOR), version_string);

        let mut device = Self {
            context: GlContext::new(api, profile, capabilities, config.base.srgb),
            resources: ResourceTable::new(),
            surface,
            size: config.base.size,
            sample_count,
            vertex_array: 0,
            current_shader: 0,
            current_render_target: 0,
        };
        device.initialize()?;
        Ok(device)
    }

    /// Create the device through a platform `GetProcAddress`
    ///
    /// # Safety
    ///
    /// Same contract as [`GlowApi::load`].
    pub unsafe fn with_loader<F>(config: &GlContextConfig, loader: F, surface: Box<dyn GlSurface>) -> Result<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        let api: Arc<dyn GlApi> = Arc::new(GlowApi::load(config.api, loader));
        Self::new(config, api, surface)
    }

    /// Context-wide state set once per context
    fn initialize(&mut self) -> Result<()> {
        let api = Arc::clone(&self.context.api);
        api.disable(DITHER);
        if !self.context.profile.is_es() {
            if self.context.srgb {
                api.enable(FRAMEBUFFER_SRGB);
            }
            if self.sample_count > 1 {
                api.enable(MULTISAMPLE);
            }
        }
        if self.context.capabilities.vertex_array_objects {
            self.vertex_array = api.gen_vertex_array();
            api.bind_vertex_array(self.vertex_array);
        }
        check(api.as_ref(), "Failed to initialize OpenGL state")?;

        self.current_render_target = 0;
        self.context.state.set_front_face(CW)?;
        self.context.state.set_viewport(GlRect::new(0, 0, self.size.x as GLsizei, self.size.y as GLsizei))
    }

    pub fn profile(&self) -> &GlProfile {
        &self.context.profile
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn resources(&self) -> &ResourceTable<GlResource> {
        &self.resources
    }

    // ===== Command handlers =====

    fn delete_resource(&mut self, id: ResourceId) {
        let Some(resource) = self.resources.remove(id) else {
            return;
        };
        let state = &mut self.context.state;
        match &resource {
            GlResource::Buffer(buffer) => state.forget_buffer(buffer.get().name()),
            GlResource::Texture(texture) => state.forget_texture(texture.get().name()),
            GlResource::Shader(shader) => {
                state.forget_program(shader.get().program());
                if self.current_shader == id {
                    self.current_shader = 0;
                }
            }
            GlResource::RenderTarget(render_target) => {
                state.forget_frame_buffer(render_target.get().frame_buffer());
                if self.current_render_target == id {
                    self.current_render_target = 0;
                }
            }
            GlResource::BlendState(_) | GlResource::DepthStencilState(_) => {}
        }
    }

    fn init_render_target(&mut self, id: ResourceId, color_textures: Vec<ResourceId>, depth_texture: ResourceId) -> Result<()> {
        if color_textures.is_empty() && depth_texture == 0 {
            engine_bail!(SOURCE, InvalidParameter, "Render target {} has no attachments", id);
        }
        let (colors, depth) = attachments(&mut self.resources, &mut self.context, &color_textures, depth_texture)?;
        let render_target = GlRenderTarget::new(&mut self.context, color_textures, depth_texture, &colors, depth)?;
        self.resources.insert(id, GlResource::RenderTarget(Reloadable::new(render_target)))
    }

    fn set_render_target(&mut self, id: ResourceId) -> Result<()> {
        if id == 0 {
            self.context.state.bind_frame_buffer(0)?;
            self.context.state.set_front_face(CW)?;
        } else {
            let frame_buffer = restore_render_target(&mut self.resources, &mut self.context, id)?;
            self.context.state.bind_frame_buffer(frame_buffer)?;
            // Render targets are sampled with a flipped y axis
            self.context.state.set_front_face(CCW)?;
        }
        self.current_render_target = id;
        Ok(())
    }

    fn clear_render_target(&mut self, command: &ClearRenderTargetCommand) -> Result<()> {
        let state = &mut self.context.state;
        let mut mask = 0;
        if command.clear_color_buffer {
            state.set_clear_color(command.clear_color.norm().to_array())?;
            mask |= COLOR_BUFFER_BIT;
        }
        if command.clear_depth_buffer {
            state.set_clear_depth(command.clear_depth)?;
            mask |= DEPTH_BUFFER_BIT;
        }
        if command.clear_stencil_buffer {
            state.set_clear_stencil(command.clear_stencil as GLint)?;
            mask |= STENCIL_BUFFER_BIT;
        }
        if mask != 0 {
            state.clear(mask)?;
        }
        Ok(())
    }

    fn set_pipeline_state(&mut self, command: &SetPipelineStateCommand) -> Result<()> {
        let (blend, color_mask) = if command.blend_state == 0 {
            (GlBlend::DISABLED, [true; 4])
        } else {
            let blend_state = self.resources.require::<GlBlendState>(command.blend_state)?;
            (blend_state.blend, blend_state.color_mask)
        };
        self.context.state.set_blend_state(blend)?;
        self.context.state.set_color_mask(color_mask)?;

        if command.shader == 0 {
            self.context.state.use_program(0)?;
        } else {
            let program = restore_shader(&mut self.resources, &mut self.context, command.shader)?.program();
            self.context.state.use_program(program)?;
        }
        self.current_shader = command.shader;

        self.context.state.set_cull_face(cull_face(command.cull_mode))?;
        if self.context.profile.is_es() {
            if command.fill_mode != FillMode::Solid {
                engine_warn!(SOURCE, "Fill mode {:?} is not supported on OpenGL ES", command.fill_mode);
            }
        } else {
            self.context.state.set_polygon_fill_mode(fill_mode(command.fill_mode))?;
        }
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        if self.current_shader == 0 {
            engine_bail!(SOURCE, ProtocolError, "No shader set");
        }
        if command.index_count == 0 {
            return Ok(());
        }
        let index_type = index_type(command.index_size, self.context.capabilities.uint_indices)?;

        let program = restore_shader(&mut self.resources, &mut self.context, self.current_shader)?.program();
        let index_buffer = restore_buffer(&mut self.resources, &mut self.context, command.index_buffer)?;
        if index_buffer.buffer_type() != BufferType::Index {
            engine_bail!(SOURCE, ProtocolError, "Buffer {} is not an index buffer", command.index_buffer);
        }
        let index_buffer = index_buffer.name();
        let vertex_buffer = restore_buffer(&mut self.resources, &mut self.context, command.vertex_buffer)?;
        if vertex_buffer.buffer_type() != BufferType::Vertex {
            engine_bail!(SOURCE, ProtocolError, "Buffer {} is not a vertex buffer", command.vertex_buffer);
        }
        let vertex_buffer = vertex_buffer.name();

        let state = &mut self.context.state;
        state.use_program(program)?;
        state.bind_buffer(ELEMENT_ARRAY_BUFFER, index_buffer)?;
        state.bind_buffer(ARRAY_BUFFER, vertex_buffer)?;

        let api = self.context.api.as_ref();
        let offsets = vertex_attribute_offsets();
        for (index, attribute) in VERTEX_ATTRIBUTES.iter().enumerate() {
            let data_type = vertex_type(attribute.data_type)?;
            api.enable_vertex_attrib_array(index as GLuint);
            api.vertex_attrib_pointer(
                index as GLuint,
                attribute.data_type.component_count() as GLint,
                data_type,
                attribute.data_type.is_normalized(),
                Vertex::STRIDE as GLsizei,
                offsets[index] as usize,
            );
        }
        check(api, "Failed to update vertex attributes")?;

        let offset = command.start_index as usize * command.index_size as usize;
        api.draw_elements(draw_mode(command.draw_mode), command.index_count as GLsizei, index_type, offset);
        check(api, "Failed to draw elements")
    }

    fn set_shader_constants(&mut self, fragment: &[Vec<f32>], vertex: &[Vec<f32>]) -> Result<()> {
        if self.current_shader == 0 {
            engine_bail!(SOURCE, ProtocolError, "No shader set");
        }
        let shader = restore_shader(&mut self.resources, &mut self.context, self.current_shader)?;
        shader.set_constants(&mut self.context, fragment, vertex)
    }

    /// Units past the end of `textures` are cleared
    fn set_textures(&mut self, textures: &[ResourceId]) -> Result<()> {
        if textures.len() > MAX_TEXTURE_UNITS {
            engine_bail!(SOURCE, InvalidParameter, "Too many textures ({}, at most {})",
                textures.len(), MAX_TEXTURE_UNITS);
        }
        for layer in 0..MAX_TEXTURE_UNITS {
            let id = textures.get(layer).copied().unwrap_or(0);
            if id == 0 {
                self.context.state.unbind_texture_unit(layer)?;
                continue;
            }
            let texture = restore_texture(&mut self.resources, &mut self.context, id)?;
            if texture.name() == 0 {
                engine_bail!(SOURCE, InvalidUsage, "Texture {} cannot be sampled", id);
            }
            let (target, name) = (texture.target(), texture.name());
            self.context.state.bind_texture(target, layer, name)?;
        }
        Ok(())
    }

    fn blit(&mut self, command: &BlitCommand) -> Result<()> {
        if !self.context.capabilities.copy_image {
            engine_warn!(SOURCE, "Texture copies are not supported by this context, blit skipped");
            return Ok(());
        }
        let source = restore_texture(&mut self.resources, &mut self.context, command.source_texture)?;
        let (source_name, source_target) = (source.name(), source.target());
        let destination = restore_texture(&mut self.resources, &mut self.context, command.destination_texture)?;
        let (destination_name, destination_target) = (destination.name(), destination.target());

        let api = self.context.api.as_ref();
        api.copy_image_sub_data(
            source_name,
            source_target,
            command.source_level as GLint,
            command.source_x as GLint,
            command.source_y as GLint,
            destination_name,
            destination_target,
            command.destination_level as GLint,
            command.destination_x as GLint,
            command.destination_y as GLint,
            command.source_width as GLsizei,
            command.source_height as GLsizei,
        );
        check(api, "Failed to copy texture")
    }
}

fn gl_rect(rect: &Rect) -> GlRect {
    GlRect::new(
        rect.position.x as GLint,
        rect.position.y as GLint,
        rect.size.x as GLsizei,
        rect.size.y as GLsizei,
    )
}

fn restore_buffer<'a>(
    resources: &'a mut ResourceTable<GlResource>,
    context: &mut GlContext,
    id: ResourceId,
) -> Result<&'a mut GlBuffer> {
    resources.require_mut::<Reloadable<GlBuffer>>(id)?.restore(context)
}

fn restore_texture<'a>(
    resources: &'a mut ResourceTable<GlResource>,
    context: &mut GlContext,
    id: ResourceId,
) -> Result<&'a mut GlTexture> {
    resources.require_mut::<Reloadable<GlTexture>>(id)?.restore(context)
}

fn restore_shader<'a>(
    resources: &'a mut ResourceTable<GlResource>,
    context: &mut GlContext,
    id: ResourceId,
) -> Result<&'a mut GlShader> {
    resources.require_mut::<Reloadable<GlShader>>(id)?.restore(context)
}

/// Attachments of a render target, restoring the textures first
fn attachments(
    resources: &mut ResourceTable<GlResource>,
    context: &mut GlContext,
    color_textures: &[ResourceId],
    depth_texture: ResourceId,
) -> Result<(Vec<GlAttachment>, Option<GlAttachment>)> {
    let mut attachment = |id: ResourceId| -> Result<GlAttachment> {
        let texture = restore_texture(resources, context, id)?;
        if !texture.is_render_target() {
            engine_bail!(SOURCE, InvalidUsage, "Texture {} is not a render target", id);
        }
        Ok(texture.attachment())
    };

    let colors = color_textures.iter().map(|&id| attachment(id)).collect::<Result<Vec<_>>>()?;
    let depth = if depth_texture == 0 { None } else { Some(attachment(depth_texture)?) };
    Ok((colors, depth))
}

/// Framebuffer name of a render target, recreating it after a context loss
fn restore_render_target(
    resources: &mut ResourceTable<GlResource>,
    context: &mut GlContext,
    id: ResourceId,
) -> Result<GLuint> {
    let render_target = resources.require::<Reloadable<GlRenderTarget>>(id)?;
    let valid = render_target.is_valid();
    let color_textures = render_target.get().color_textures().to_vec();
    let depth_texture = render_target.get().depth_texture();

    let (colors, depth) = if valid {
        (Vec::new(), None)
    } else {
        attachments(resources, context, &color_textures, depth_texture)?
    };
    let render_target = resources
        .require_mut::<Reloadable<GlRenderTarget>>(id)?
        .restore_with(|render_target| render_target.create(context, &colors, depth))?;
    Ok(render_target.frame_buffer())
}

impl RenderDevice for OglRenderDevice {
    fn driver(&self) -> Driver {
        Driver::OpenGl
    }

    fn capabilities(&self) -> &Capabilities {
        &self.context.capabilities
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Resize(c) => {
                self.surface.resize(c.size)?;
                self.size = c.size;
                Ok(())
            }
            Command::Present => self.surface.swap_buffers(),
            Command::DeleteResource(c) => {
                self.delete_resource(c.resource);
                Ok(())
            }
            Command::InitRenderTarget(c) => self.init_render_target(c.render_target, c.color_textures, c.depth_texture),
            Command::SetRenderTarget(c) => self.set_render_target(c.render_target),
            Command::ClearRenderTarget(c) => self.clear_render_target(&c),
            Command::SetScissorTest(c) => self.context.state.set_scissor_test(c.enabled, gl_rect(&c.rectangle)),
            Command::SetViewport(c) => self.context.state.set_viewport(gl_rect(&c.viewport)),
            Command::InitDepthStencilState(c) => {
                let state = GlDepthStencilState::new(&c.desc);
                self.resources.insert(c.depth_stencil_state, GlResource::DepthStencilState(state))
            }
            Command::SetDepthStencilState(c) => {
                if c.depth_stencil_state == 0 {
                    GlDepthStencilState::apply_disabled(&mut self.context)
                } else {
                    let state = self.resources.require::<GlDepthStencilState>(c.depth_stencil_state)?;
                    state.apply(&mut self.context, c.stencil_reference_value)
                }
            }
            Command::SetPipelineState(c) => self.set_pipeline_state(&c),
            Command::Draw(c) => self.draw(&c),
            Command::InitBlendState(c) => {
                let state = GlBlendState::new(&c.desc, &self.context.profile)?;
                self.resources.insert(c.blend_state, GlResource::BlendState(state))
            }
            Command::InitBuffer(c) => {
                let id = c.buffer;
                let buffer = GlBuffer::new(&mut self.context, c)?;
                self.resources.insert(id, GlResource::Buffer(Reloadable::new(buffer)))
            }
            Command::SetBufferData(c) => {
                let buffer = restore_buffer(&mut self.resources, &mut self.context, c.buffer)?;
                buffer.set_data(&mut self.context, c.data)
            }
            Command::InitShader(c) => {
                let id = c.shader;
                let shader = GlShader::new(&mut self.context, c)?;
                self.resources.insert(id, GlResource::Shader(Reloadable::new(shader)))
            }
            Command::SetShaderConstants(c) => {
                self.set_shader_constants(&c.fragment_shader_constants, &c.vertex_shader_constants)
            }
            Command::InitTexture(c) => {
                let id = c.texture;
                let texture = GlTexture::new(&mut self.context, c)?;
                self.resources.insert(id, GlResource::Texture(Reloadable::new(texture)))
            }
            Command::SetTextureData(c) => {
                let texture = restore_texture(&mut self.resources, &mut self.context, c.texture)?;
                texture.set_data(&mut self.context, c.levels, c.face)
            }
            Command::SetTextureParameters(c) => {
                let texture = restore_texture(&mut self.resources, &mut self.context, c.texture)?;
                texture.set_parameters(&mut self.context, &c)
            }
            Command::SetTextures(c) => self.set_textures(&c.textures),
            Command::Blit(c) => self.blit(&c),
            Command::PushDebugMarker(c) => {
                if self.context.capabilities.debug_markers {
                    self.context.api.push_debug_group(&c.name);
                }
                Ok(())
            }
            Command::PopDebugMarker => {
                if self.context.capabilities.debug_markers {
                    self.context.api.pop_debug_group();
                }
                Ok(())
            }
        }
    }

    fn invalidate(&mut self) {
        engine_info!(SOURCE, "OpenGL context lost, invalidating {} resources", self.resources.live_count());
        for (_, resource) in self.resources.iter_mut() {
            resource.invalidate();
        }
        self.vertex_array = 0;
    }

    fn restore_context(&mut self) -> Result<()> {
        self.context.state.reset();
        self.initialize()
    }
}

impl Drop for OglRenderDevice {
    fn drop(&mut self) {
        self.resources.clear();
        if self.vertex_array != 0 {
            self.context.api.delete_vertex_array(self.vertex_array);
        }
    }
}

#[cfg(test)]
#[path = "opengl_render_device_tests.rs"]
mod tests;
