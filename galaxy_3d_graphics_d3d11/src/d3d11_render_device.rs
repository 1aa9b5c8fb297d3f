/// Direct3D 11 render device
///
/// Owns the device context wrapper, the swap chain views, the resource table
/// and the interned rasterizer states, and executes commands on the render
/// thread. Creating the native device and the window's swap chain stays
/// behind `D3d11Api` and `D3d11SwapChain`.

use crate::d3d11_api::{D3d11Api, D3d11SwapChain, D3dBox, D3dRect, RasterizerDesc, RawCom, SwapChainDesc, Texture2dDesc, Viewport};
use crate::d3d11_blend_state::D3d11BlendState;
use crate::d3d11_buffer::D3d11Buffer;
use crate::d3d11_constants::*;
use crate::d3d11_depth_stencil_state::{depth_stencil_desc, D3d11DepthStencilState};
use crate::d3d11_error::{check_call, check_creation, SOURCE};
use crate::d3d11_format::{cull_mode, fill_mode, index_format, primitive_topology};
use crate::d3d11_render_target::D3d11RenderTarget;
use crate::d3d11_resource::{com_handle, empty_handle, ComHandle, D3d11Context, D3d11Resource};
use crate::d3d11_shader::D3d11Shader;
use crate::d3d11_texture::D3d11Texture;
use galaxy_3d_graphics::galaxy3d::render::{
    BlitCommand, BufferType, Capabilities, ClearRenderTargetCommand, ClipConvention, Command, CompareFunction,
    CullMode, DepthStencilDesc, DrawCommand, Driver, FillMode, Rect, RenderDevice, RenderDeviceConfig,
    SetPipelineStateCommand,
};
use galaxy_3d_graphics::galaxy3d::resource::{ResourceId, ResourceTable, StateObjectCache};
use galaxy_3d_graphics::galaxy3d::Result;
use galaxy_3d_graphics::glam::UVec2;
use galaxy_3d_graphics::{engine_bail, engine_err, engine_info, engine_warn};
use std::sync::Arc;

/// Largest sample count checked at initialization
const MAX_SAMPLE_COUNT: u32 = 32;

/// Render device configuration for a Direct3D 11 swap chain
#[derive(Debug, Clone, PartialEq)]
pub struct D3d11DeviceConfig {
    pub base: RenderDeviceConfig,
    /// Vertical blanks to wait for on present, 0 presents immediately
    pub swap_interval: u32,
}

impl D3d11DeviceConfig {
    pub fn new(base: RenderDeviceConfig) -> Self {
        let swap_interval = if base.vsync { 1 } else { 0 };
        Self { base, swap_interval }
    }
}

/// Descriptor of an interned rasterizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RasterizerKey {
    fill_mode: FillMode,
    cull_mode: CullMode,
    scissor: bool,
}

pub struct D3d11RenderDevice {
    context: D3d11Context,
    resources: ResourceTable<D3d11Resource>,
    swap_chain: Box<dyn D3d11SwapChain>,
    size: UVec2,
    sample_count: u32,
    swap_interval: u32,
    depth: bool,
    stencil: bool,
    back_buffer: ComHandle,
    back_buffer_view: ComHandle,
    depth_texture: ComHandle,
    depth_view: ComHandle,
    /// Bound when no depth-stencil state is selected
    default_depth_stencil_state: ComHandle,
    rasterizer_states: StateObjectCache<RasterizerKey, ComHandle>,
    rasterizer_key: RasterizerKey,
    current_shader: ResourceId,
    current_render_target: ResourceId,
}

impl D3d11RenderDevice {
    pub fn new(config: &D3d11DeviceConfig, api: Arc<dyn D3d11Api>, swap_chain: Box<dyn D3d11SwapChain>) -> Result<Self> {
        config.base.validate()?;

        let color_format = if config.base.srgb { DXGI_FORMAT_R8G8B8A8_UNORM_SRGB } else { DXGI_FORMAT_R8G8B8A8_UNORM };
        let supports_samples = |count: u32| -> Result<bool> {
            let levels = check_call(api.check_multisample_quality_levels(color_format, count),
                "Failed to check multisample quality levels")?;
            Ok(levels > 0)
        };

        let mut max_sample_count = 1;
        let mut count = 2;
        while count <= MAX_SAMPLE_COUNT && supports_samples(count)? {
            max_sample_count = count;
            count *= 2;
        }

        let mut sample_count = config.base.sample_count;
        while sample_count > 1 && !supports_samples(sample_count)? {
            sample_count /= 2;
        }
        if sample_count != config.base.sample_count {
            engine_warn!(SOURCE, "{} samples are not supported, using {}", config.base.sample_count, sample_count);
        }

        let feature_level = api.feature_level();
        let display_modes = swap_chain.display_modes();
        let capabilities = Capabilities {
            api_major_version: 11,
            api_minor_version: 0,
            npot_textures: feature_level >= D3D_FEATURE_LEVEL_10_0,
            anisotropic_filtering: true,
            render_targets: true,
            clamp_to_border: true,
            multisampling: max_sample_count > 1,
            uint_indices: true,
            copy_image: true,
            debug_markers: api.supports_annotations(),
            vertex_array_objects: false,
            texture_base_level: true,
            texture_max_level: true,
            max_anisotropy: D3D11_MAX_MAXANISOTROPY,
            sample_count: max_sample_count,
            supported_resolutions: if display_modes.is_empty() { vec![config.base.size] } else { display_modes },
            clip_convention: ClipConvention::ZeroToOne,
        };

        engine_info!(SOURCE, "Using {} (feature level {:#x}), {} samples",
            api.adapter_description(), feature_level, sample_count);

        let mut device = Self {
            back_buffer: empty_handle(&api),
            back_buffer_view: empty_handle(&api),
            depth_texture: empty_handle(&api),
            depth_view: empty_handle(&api),
            default_depth_stencil_state: empty_handle(&api),
            context: D3d11Context::new(api, capabilities, config.base.srgb),
            resources: ResourceTable::new(),
            swap_chain,
            size: config.base.size,
            sample_count,
            swap_interval: config.swap_interval,
            depth: config.base.depth,
            stencil: config.base.stencil,
            rasterizer_states: StateObjectCache::new(),
            rasterizer_key: RasterizerKey {
                fill_mode: FillMode::Solid,
                cull_mode: CullMode::None,
                scissor: false,
            },
            current_shader: 0,
            current_render_target: 0,
        };

        let desc = SwapChainDesc {
            width: device.size.x,
            height: device.size.y,
            format: color_format,
            sample_count,
        };
        check_creation(device.swap_chain.create(&desc), "Failed to create swap chain")?;
        device.create_frame_buffer()?;
        device.initialize()?;
        Ok(device)
    }

    /// Default state bound once after creation
    fn initialize(&mut self) -> Result<()> {
        let api = Arc::clone(&self.context.api);
        let desc = DepthStencilDesc {
            compare_function: CompareFunction::Always,
            ..DepthStencilDesc::default()
        };
        let state = check_creation(api.create_depth_stencil_state(&depth_stencil_desc(&desc)),
            "Failed to create depth stencil state")?;
        self.default_depth_stencil_state = com_handle(&api, state);

        self.bind_frame_buffer();
        self.context.state.set_viewport(viewport(&Rect {
            position: Default::default(),
            size: self.size.as_vec2(),
        }));
        self.context.state.set_depth_stencil_state(Some(state), 0);
        self.apply_rasterizer_state()
    }

    /// Back buffer view, and the depth buffer when the config asks for one
    fn create_frame_buffer(&mut self) -> Result<()> {
        let api = Arc::clone(&self.context.api);
        let back_buffer = check_creation(self.swap_chain.back_buffer(), "Failed to retrieve back buffer")?;
        self.back_buffer = com_handle(&api, back_buffer);
        let view = check_creation(api.create_render_target_view(back_buffer, None),
            "Failed to create back buffer view")?;
        self.back_buffer_view = com_handle(&api, view);

        if self.depth {
            let desc = Texture2dDesc {
                width: self.size.x,
                height: self.size.y,
                mip_levels: 1,
                array_size: 1,
                format: if self.stencil { DXGI_FORMAT_D24_UNORM_S8_UINT } else { DXGI_FORMAT_D32_FLOAT },
                sample_count: self.sample_count,
                usage: D3D11_USAGE_DEFAULT,
                bind_flags: D3D11_BIND_DEPTH_STENCIL,
                cpu_access_flags: 0,
                misc_flags: 0,
            };
            let texture = check_creation(api.create_texture_2d(&desc, &[]), "Failed to create depth buffer")?;
            self.depth_texture = com_handle(&api, texture);
            let view = check_creation(api.create_depth_stencil_view(texture, None),
                "Failed to create depth buffer view")?;
            self.depth_view = com_handle(&api, view);
        }
        Ok(())
    }

    fn bind_frame_buffer(&mut self) {
        let views: Vec<RawCom> = self.back_buffer_view.raw().into_iter().collect();
        self.context.state.set_render_targets(&views, self.depth_view.raw());
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn resources(&self) -> &ResourceTable<D3d11Resource> {
        &self.resources
    }

    fn apply_rasterizer_state(&mut self) -> Result<()> {
        let api = Arc::clone(&self.context.api);
        let multisample = self.sample_count > 1;
        let state = self.rasterizer_states.get_or_create(self.rasterizer_key, |key| {
            let desc = RasterizerDesc {
                fill_mode: fill_mode(key.fill_mode),
                cull_mode: cull_mode(key.cull_mode),
                front_counter_clockwise: false,
                depth_clip_enable: true,
                scissor_enable: key.scissor,
                multisample_enable: multisample,
                antialiased_line_enable: true,
            };
            let state = check_creation(api.create_rasterizer_state(&desc), "Failed to create rasterizer state")?;
            Ok(com_handle(&api, state))
        })?;
        self.context.state.set_rasterizer_state(state.raw());
        Ok(())
    }

    /// Color and depth views of the current render target
    fn current_views(&self) -> Result<(Vec<RawCom>, Option<RawCom>)> {
        if self.current_render_target == 0 {
            let views = self.back_buffer_view.raw().into_iter().collect();
            return Ok((views, self.depth_view.raw()));
        }
        let render_target = self.resources.require::<D3d11RenderTarget>(self.current_render_target)?;
        Ok((render_target.render_target_views(), render_target.depth_stencil_view()))
    }

    /// Resolve the multisampled storage of the current render target
    fn resolve_current_render_target(&self) -> Result<()> {
        if self.current_render_target == 0 {
            return Ok(());
        }
        let render_target = self.resources.require::<D3d11RenderTarget>(self.current_render_target)?;
        for &id in render_target.color_textures() {
            self.resources.require::<D3d11Texture>(id)?.resolve(&self.context);
        }
        Ok(())
    }

    // ===== Command handlers =====

    fn resize(&mut self, size: UVec2) -> Result<()> {
        if size.x == 0 || size.y == 0 {
            engine_bail!(SOURCE, InvalidParameter, "Invalid back buffer size {}x{}", size.x, size.y);
        }
        if size == self.size {
            return Ok(());
        }

        for handle in [&self.back_buffer_view, &self.depth_view] {
            if let Some(view) = handle.raw() {
                self.context.state.unbind(view);
            }
        }
        self.back_buffer_view.reset();
        self.depth_view.reset();
        self.depth_texture.reset();
        self.back_buffer.reset();

        check_call(self.swap_chain.resize_buffers(size.x, size.y), "Failed to resize back buffer")?;
        self.size = size;
        self.create_frame_buffer()?;
        if self.current_render_target == 0 {
            self.bind_frame_buffer();
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.resolve_current_render_target()?;
        check_call(self.swap_chain.present(self.swap_interval), "Failed to present")
    }

    fn delete_resource(&mut self, id: ResourceId) {
        let Some(resource) = self.resources.remove(id) else {
            return;
        };
        for object in resource.bindable_objects() {
            self.context.state.unbind(object);
        }
        match resource {
            D3d11Resource::Shader(_) if self.current_shader == id => self.current_shader = 0,
            D3d11Resource::RenderTarget(_) if self.current_render_target == id => {
                self.current_render_target = 0;
                self.bind_frame_buffer();
            }
            _ => {}
        }
    }

    fn init_render_target(&mut self, id: ResourceId, color_textures: Vec<ResourceId>, depth_texture: ResourceId) -> Result<()> {
        if color_textures.is_empty() && depth_texture == 0 {
            engine_bail!(SOURCE, InvalidParameter, "Render target {} has no attachments", id);
        }
        let colors = color_textures
            .iter()
            .map(|&texture_id| attachment(&self.resources, texture_id))
            .collect::<Result<Vec<_>>>()?;
        let depth = if depth_texture == 0 { None } else { Some(attachment(&self.resources, depth_texture)?) };

        let render_target = D3d11RenderTarget::new(&self.context, color_textures, depth_texture, &colors, depth)?;
        self.resources.insert(id, D3d11Resource::RenderTarget(render_target))
    }

    fn set_render_target(&mut self, id: ResourceId) -> Result<()> {
        self.resolve_current_render_target()?;
        if id == 0 {
            self.bind_frame_buffer();
        } else {
            let render_target = self.resources.require::<D3d11RenderTarget>(id)?;
            let views = render_target.render_target_views();
            let depth_stencil_view = render_target.depth_stencil_view();
            self.context.state.set_render_targets(&views, depth_stencil_view);
        }
        self.current_render_target = id;
        Ok(())
    }

    fn clear_render_target(&mut self, command: &ClearRenderTargetCommand) -> Result<()> {
        let (views, depth_stencil_view) = self.current_views()?;
        let api = self.context.api.as_ref();

        if command.clear_color_buffer {
            let color = command.clear_color.norm().to_array();
            for view in views {
                api.clear_render_target_view(view, color);
            }
        }

        let mut flags = 0;
        if command.clear_depth_buffer {
            flags |= D3D11_CLEAR_DEPTH;
        }
        if command.clear_stencil_buffer {
            flags |= D3D11_CLEAR_STENCIL;
        }
        if flags != 0 {
            if let Some(view) = depth_stencil_view {
                api.clear_depth_stencil_view(view, flags, command.clear_depth, (command.clear_stencil & 0xFF) as u8);
            }
        }
        Ok(())
    }

    fn set_scissor_test(&mut self, enabled: bool, rectangle: &Rect) -> Result<()> {
        if enabled {
            let left = rectangle.position.x as i32;
            let top = rectangle.position.y as i32;
            self.context.state.set_scissor_rect(D3dRect {
                left,
                top,
                right: left + rectangle.size.x as i32,
                bottom: top + rectangle.size.y as i32,
            });
        }
        self.rasterizer_key.scissor = enabled;
        self.apply_rasterizer_state()
    }

    fn set_depth_stencil_state(&mut self, id: ResourceId, stencil_reference: u32) -> Result<()> {
        let state = if id == 0 {
            self.default_depth_stencil_state.raw()
        } else {
            Some(self.resources.require::<D3d11DepthStencilState>(id)?.state())
        };
        self.context.state.set_depth_stencil_state(state, stencil_reference);
        Ok(())
    }

    fn set_pipeline_state(&mut self, command: &SetPipelineStateCommand) -> Result<()> {
        let blend_state = if command.blend_state == 0 {
            None
        } else {
            Some(self.resources.require::<D3d11BlendState>(command.blend_state)?.state())
        };
        self.context.state.set_blend_state(blend_state);

        if command.shader == 0 {
            self.context.state.set_shaders(None, None, None);
        } else {
            self.resources.require::<D3d11Shader>(command.shader)?.bind(&mut self.context);
        }
        self.current_shader = command.shader;

        self.rasterizer_key.cull_mode = command.cull_mode;
        self.rasterizer_key.fill_mode = command.fill_mode;
        self.apply_rasterizer_state()
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        if self.current_shader == 0 {
            engine_bail!(SOURCE, ProtocolError, "No shader set");
        }
        if command.index_count == 0 {
            return Ok(());
        }
        let format = index_format(command.index_size)?;

        let index_buffer = self.resources.require::<D3d11Buffer>(command.index_buffer)?;
        if index_buffer.buffer_type() != BufferType::Index {
            engine_bail!(SOURCE, ProtocolError, "Buffer {} is not an index buffer", command.index_buffer);
        }
        let index_buffer = index_buffer.buffer().ok_or_else(|| {
            engine_err!(SOURCE, InvalidUsage, "Index buffer {} is empty", command.index_buffer)
        })?;
        let vertex_buffer = self.resources.require::<D3d11Buffer>(command.vertex_buffer)?;
        if vertex_buffer.buffer_type() != BufferType::Vertex {
            engine_bail!(SOURCE, ProtocolError, "Buffer {} is not a vertex buffer", command.vertex_buffer);
        }
        let vertex_buffer = vertex_buffer.buffer().ok_or_else(|| {
            engine_err!(SOURCE, InvalidUsage, "Vertex buffer {} is empty", command.vertex_buffer)
        })?;

        let state = &mut self.context.state;
        state.set_vertex_buffer(Some(vertex_buffer));
        state.set_index_buffer(Some(index_buffer), format);
        state.set_primitive_topology(primitive_topology(command.draw_mode));
        self.context.api.draw_indexed(command.index_count, command.start_index, 0);
        Ok(())
    }

    fn set_shader_constants(&mut self, fragment: &[Vec<f32>], vertex: &[Vec<f32>]) -> Result<()> {
        if self.current_shader == 0 {
            engine_bail!(SOURCE, ProtocolError, "No shader set");
        }
        let shader = self.resources.require::<D3d11Shader>(self.current_shader)?;
        shader.set_constants(&mut self.context, fragment, vertex)
    }

    fn set_textures(&mut self, textures: &[ResourceId]) -> Result<()> {
        let mut views = Vec::with_capacity(textures.len());
        let mut samplers = Vec::with_capacity(textures.len());
        for &id in textures {
            if id == 0 {
                views.push(None);
                samplers.push(None);
                continue;
            }
            let texture = self.resources.require::<D3d11Texture>(id)?;
            if texture.shader_resource_view().is_none() {
                engine_bail!(SOURCE, InvalidUsage, "Texture {} cannot be sampled", id);
            }
            views.push(texture.shader_resource_view());
            samplers.push(texture.sampler());
        }
        self.context.state.set_shader_resources(&views, &samplers)
    }

    fn blit(&mut self, command: &BlitCommand) -> Result<()> {
        let source = self.resources.require::<D3d11Texture>(command.source_texture)?;
        let source_texture = source.texture().ok_or_else(|| {
            engine_err!(SOURCE, NotInitialized, "Texture {} has no storage", command.source_texture)
        })?;
        let source_subresource = command.source_level;
        let destination = self.resources.require::<D3d11Texture>(command.destination_texture)?;
        let destination_texture = destination.texture().ok_or_else(|| {
            engine_err!(SOURCE, NotInitialized, "Texture {} has no storage", command.destination_texture)
        })?;

        let source_box = D3dBox {
            left: command.source_x,
            top: command.source_y,
            front: 0,
            right: command.source_x + command.source_width,
            bottom: command.source_y + command.source_height,
            back: 1,
        };
        self.context.api.copy_subresource_region(
            destination_texture,
            command.destination_level,
            command.destination_x,
            command.destination_y,
            0,
            source_texture,
            source_subresource,
            &source_box,
        );
        Ok(())
    }
}

/// Texture usable as a render target attachment
fn attachment(resources: &ResourceTable<D3d11Resource>, id: ResourceId) -> Result<&D3d11Texture> {
    let texture = resources.require::<D3d11Texture>(id)?;
    if !texture.is_render_target() {
        engine_bail!(SOURCE, InvalidUsage, "Texture {} is not a render target", id);
    }
    Ok(texture)
}

fn viewport(rect: &Rect) -> Viewport {
    Viewport {
        top_left_x: rect.position.x,
        top_left_y: rect.position.y,
        width: rect.size.x,
        height: rect.size.y,
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

impl RenderDevice for D3d11RenderDevice {
    fn driver(&self) -> Driver {
        Driver::Direct3D11
    }

    fn capabilities(&self) -> &Capabilities {
        &self.context.capabilities
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Resize(c) => self.resize(c.size),
            Command::Present => self.present(),
            Command::DeleteResource(c) => {
                self.delete_resource(c.resource);
                Ok(())
            }
            Command::InitRenderTarget(c) => self.init_render_target(c.render_target, c.color_textures, c.depth_texture),
            Command::SetRenderTarget(c) => self.set_render_target(c.render_target),
            Command::ClearRenderTarget(c) => self.clear_render_target(&c),
            Command::SetScissorTest(c) => self.set_scissor_test(c.enabled, &c.rectangle),
            Command::SetViewport(c) => {
                self.context.state.set_viewport(viewport(&c.viewport));
                Ok(())
            }
            Command::InitDepthStencilState(c) => {
                let state = D3d11DepthStencilState::new(&mut self.context, &c.desc)?;
                self.resources.insert(c.depth_stencil_state, D3d11Resource::DepthStencilState(state))
            }
            Command::SetDepthStencilState(c) => self.set_depth_stencil_state(c.depth_stencil_state, c.stencil_reference_value),
            Command::SetPipelineState(c) => self.set_pipeline_state(&c),
            Command::Draw(c) => self.draw(&c),
            Command::InitBlendState(c) => {
                let state = D3d11BlendState::new(&mut self.context, &c.desc)?;
                self.resources.insert(c.blend_state, D3d11Resource::BlendState(state))
            }
            Command::InitBuffer(c) => {
                let id = c.buffer;
                let buffer = D3d11Buffer::new(&mut self.context, c)?;
                self.resources.insert(id, D3d11Resource::Buffer(buffer))
            }
            Command::SetBufferData(c) => {
                let buffer = self.resources.require_mut::<D3d11Buffer>(c.buffer)?;
                buffer.set_data(&mut self.context, c.data)
            }
            Command::InitShader(c) => {
                let id = c.shader;
                let shader = D3d11Shader::new(&mut self.context, c)?;
                self.resources.insert(id, D3d11Resource::Shader(shader))
            }
            Command::SetShaderConstants(c) => {
                self.set_shader_constants(&c.fragment_shader_constants, &c.vertex_shader_constants)
            }
            Command::InitTexture(c) => {
                let id = c.texture;
                let texture = D3d11Texture::new(&mut self.context, c)?;
                self.resources.insert(id, D3d11Resource::Texture(texture))
            }
            Command::SetTextureData(c) => {
                let texture = self.resources.require_mut::<D3d11Texture>(c.texture)?;
                texture.set_data(&mut self.context, c.levels, c.face)
            }
            Command::SetTextureParameters(c) => {
                let texture = self.resources.require_mut::<D3d11Texture>(c.texture)?;
                texture.set_parameters(&mut self.context, &c)
            }
            Command::SetTextures(c) => self.set_textures(&c.textures),
            Command::Blit(c) => self.blit(&c),
            Command::PushDebugMarker(c) => {
                if self.context.capabilities.debug_markers {
                    self.context.api.begin_event(&c.name);
                }
                Ok(())
            }
            Command::PopDebugMarker => {
                if self.context.capabilities.debug_markers {
                    self.context.api.end_event();
                }
                Ok(())
            }
        }
    }
}

impl Drop for D3d11RenderDevice {
    fn drop(&mut self) {
        self.context.state.reset();
        self.resources.clear();
        self.rasterizer_states.drain();
        self.context.samplers.drain();
    }
}

#[cfg(test)]
#[path = "d3d11_render_device_tests.rs"]
mod tests;
