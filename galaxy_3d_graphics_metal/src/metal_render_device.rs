/// Metal render device
///
/// Owns the context wrapper, the layer and its frame buffer, the resource
/// table and the interned pipeline states, and executes commands on the render
/// thread.
///
/// Work is recorded lazily: the first command that needs the GPU starts a
/// frame (command buffer and frame slot), the first draw of a pass creates its
/// render command encoder and the back buffer's drawable is only requested
/// when a pass draws into it. Pipeline state, depth-stencil state and
/// bindings are kept as requested values and applied through the encoder
/// cache at draw time, since every encoder starts from scratch.

use crate::metal_api::{MetalApi, MetalLayer, MtlRegion, MtlViewport, RawId, RenderPipelineDescriptor, ScissorRect, TextureDescriptor};
use crate::metal_blend_state::{default_blend, MetalBlendState};
use crate::metal_buffer::MetalBuffer;
use crate::metal_constants::*;
use crate::metal_depth_stencil_state::{depth_stencil_descriptor, MetalDepthStencilState};
use crate::metal_error::{check_call, check_creation, metal_error_name, SOURCE};
use crate::metal_format::{cull_mode, fill_mode, has_stencil, index_type, layer_pixel_format, primitive_type};
use crate::metal_frame::{ConstantRing, FrameSemaphore, BUFFER_COUNT};
use crate::metal_render_target::{pass_descriptor, ClearValues, ColorTarget, MetalRenderTarget};
use crate::metal_resource::{empty_handle, objc_handle, MetalContext, MetalResource, ObjcHandle};
use crate::metal_shader::MetalShader;
use crate::metal_state_cache::{BufferBinding, MAX_TEXTURE_SLOTS};
use crate::metal_texture::MetalTexture;
use galaxy_3d_graphics::galaxy3d::render::{
    BlitCommand, BufferType, Capabilities, ClearRenderTargetCommand, ClipConvention, Command, CompareFunction,
    CullMode, DepthStencilDesc, DrawCommand, Driver, FillMode, Rect, RenderDevice, RenderDeviceConfig,
    SetPipelineStateCommand, Vertex,
};
use galaxy_3d_graphics::galaxy3d::resource::{ResourceId, ResourceTable, StateObjectCache};
use galaxy_3d_graphics::galaxy3d::Result;
use galaxy_3d_graphics::glam::{UVec2, Vec2};
use galaxy_3d_graphics::{engine_bail, engine_debug, engine_err, engine_error, engine_info, engine_warn};
use std::sync::Arc;

/// Largest sample count checked at initialization
const MAX_SAMPLE_COUNT: u32 = 32;

/// Render device configuration for a `CAMetalLayer`
#[derive(Debug, Clone, PartialEq)]
pub struct MetalDeviceConfig {
    pub base: RenderDeviceConfig,
    /// Present in sync with the display refresh
    pub display_sync: bool,
}

impl MetalDeviceConfig {
    pub fn new(base: RenderDeviceConfig) -> Self {
        let display_sync = base.vsync;
        Self { base, display_sync }
    }
}

/// Everything a render pipeline state depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    /// Serial of the blend state, 0 for blending off
    blend_state: u64,
    shader: u64,
    sample_count: u32,
    color_formats: Vec<u64>,
    depth_format: u64,
    stencil_format: u64,
}

/// Attachments of the pass being drawn into
struct TargetInfo {
    color_formats: Vec<u64>,
    depth_format: u64,
    sample_count: u32,
    size: UVec2,
}

pub struct MetalRenderDevice {
    context: MetalContext,
    resources: ResourceTable<MetalResource>,
    layer: Box<dyn MetalLayer>,
    size: UVec2,
    sample_count: u32,
    depth: bool,
    color_format: u64,
    depth_format: u64,
    /// Multisampled color storage of the back buffer, resolved into the drawable
    msaa_texture: ObjcHandle,
    depth_texture: ObjcHandle,
    /// Bound when no depth-stencil state is selected
    default_depth_stencil_state: ObjcHandle,
    pipelines: StateObjectCache<PipelineKey, ObjcHandle>,
    semaphore: Arc<FrameSemaphore>,
    constants: ConstantRing,
    // Frame being recorded
    command_buffer: ObjcHandle,
    drawable: ObjcHandle,
    drawable_texture: Option<RawId>,
    encoder: ObjcHandle,
    pending_clear: ClearValues,
    debug_groups: u32,
    // Requested state
    current_render_target: ResourceId,
    current_shader: ResourceId,
    blend_state: ResourceId,
    cull_mode: CullMode,
    fill_mode: FillMode,
    viewport: Rect,
    scissor: Option<Rect>,
    depth_stencil_state: ResourceId,
    stencil_reference: u32,
    textures: Vec<ResourceId>,
    constant_bindings: (Option<BufferBinding>, Option<BufferBinding>),
}

impl MetalRenderDevice {
    pub fn new(config: &MetalDeviceConfig, api: Arc<dyn MetalApi>, mut layer: Box<dyn MetalLayer>) -> Result<Self> {
        config.base.validate()?;

        let mut max_sample_count = 1;
        let mut count = 2;
        while count <= MAX_SAMPLE_COUNT && api.supports_texture_sample_count(count) {
            max_sample_count = count;
            count *= 2;
        }

        let mut sample_count = config.base.sample_count;
        while sample_count > 1 && !api.supports_texture_sample_count(sample_count) {
            sample_count /= 2;
        }
        if sample_count != config.base.sample_count {
            engine_warn!(SOURCE, "{} samples are not supported, using {}", config.base.sample_count, sample_count);
        }

        let display_modes = layer.display_modes();
        let capabilities = Capabilities {
            api_major_version: 1,
            api_minor_version: 0,
            npot_textures: true,
            anisotropic_filtering: true,
            render_targets: true,
            clamp_to_border: api.supports_border_color(),
            multisampling: max_sample_count > 1,
            uint_indices: true,
            copy_image: true,
            debug_markers: true,
            vertex_array_objects: false,
            texture_base_level: true,
            texture_max_level: true,
            max_anisotropy: MTL_MAX_ANISOTROPY,
            sample_count: max_sample_count,
            supported_resolutions: if display_modes.is_empty() { vec![config.base.size] } else { display_modes },
            clip_convention: ClipConvention::ZeroToOne,
        };
        if !capabilities.clamp_to_border {
            engine_warn!(SOURCE, "Border colors are not supported, clamping to zero instead");
        }
        engine_info!(SOURCE, "Using {}, {} samples", api.device_name(), sample_count);

        let color_format = layer_pixel_format(config.base.srgb);
        layer.configure(color_format, config.base.size, config.display_sync);

        let depth_format = match (config.base.depth, config.base.stencil) {
            (false, _) => MTL_PIXEL_FORMAT_INVALID,
            (true, false) => MTL_PIXEL_FORMAT_DEPTH32_FLOAT,
            (true, true) => MTL_PIXEL_FORMAT_DEPTH32_FLOAT_STENCIL8,
        };

        let mut device = Self {
            msaa_texture: empty_handle(&api),
            depth_texture: empty_handle(&api),
            default_depth_stencil_state: empty_handle(&api),
            command_buffer: empty_handle(&api),
            drawable: empty_handle(&api),
            encoder: empty_handle(&api),
            context: MetalContext::new(api, capabilities, config.base.srgb),
            resources: ResourceTable::new(),
            layer,
            size: config.base.size,
            sample_count,
            depth: config.base.depth,
            color_format,
            depth_format,
            pipelines: StateObjectCache::new(),
            semaphore: FrameSemaphore::new(BUFFER_COUNT),
            constants: ConstantRing::new(),
            drawable_texture: None,
            pending_clear: ClearValues::default(),
            debug_groups: 0,
            current_render_target: 0,
            current_shader: 0,
            blend_state: 0,
            cull_mode: CullMode::None,
            fill_mode: FillMode::Solid,
            viewport: Rect { position: Vec2::ZERO, size: config.base.size.as_vec2() },
            scissor: None,
            depth_stencil_state: 0,
            stencil_reference: 0,
            textures: Vec::new(),
            constant_bindings: (None, None),
        };

        device.create_frame_buffer()?;
        let desc = DepthStencilDesc {
            compare_function: CompareFunction::Always,
            ..DepthStencilDesc::default()
        };
        let api = Arc::clone(&device.context.api);
        let state = check_creation(api.new_depth_stencil_state(&depth_stencil_descriptor(&desc)),
            "Failed to create depth stencil state")?;
        device.default_depth_stencil_state = objc_handle(&api, state);
        Ok(device)
    }

    /// Multisampled color and depth storage matching the drawable size
    fn create_frame_buffer(&mut self) -> Result<()> {
        let api = Arc::clone(&self.context.api);
        let multisampled = self.sample_count > 1;
        let desc = TextureDescriptor {
            texture_type: if multisampled { MTL_TEXTURE_TYPE_2D_MULTISAMPLE } else { MTL_TEXTURE_TYPE_2D },
            pixel_format: self.color_format,
            width: self.size.x,
            height: self.size.y,
            mipmap_level_count: 1,
            sample_count: self.sample_count,
            usage: MTL_TEXTURE_USAGE_RENDER_TARGET,
            storage_mode: MTL_STORAGE_MODE_PRIVATE,
        };

        self.msaa_texture.reset();
        if multisampled {
            let texture = check_creation(api.new_texture(&desc), "Failed to create multisampled back buffer")?;
            self.msaa_texture = objc_handle(&api, texture);
        }

        self.depth_texture.reset();
        if self.depth {
            let depth_desc = TextureDescriptor { pixel_format: self.depth_format, ..desc };
            let texture = check_creation(api.new_texture(&depth_desc), "Failed to create depth buffer")?;
            self.depth_texture = objc_handle(&api, texture);
        }
        Ok(())
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn resources(&self) -> &ResourceTable<MetalResource> {
        &self.resources
    }

    /// Frames committed and not completed yet, plus the one being recorded
    pub fn frames_in_flight(&self) -> usize {
        BUFFER_COUNT - self.semaphore.available()
    }

    // ===== Frame and encoders =====

    /// Start recording a frame unless one is already started
    fn begin_frame(&mut self) -> Result<RawId> {
        if let Some(command_buffer) = self.command_buffer.raw() {
            return Ok(command_buffer);
        }
        self.semaphore.acquire();
        let command_buffer = match check_creation(self.context.api.new_command_buffer(), "Failed to create command buffer") {
            Ok(command_buffer) => command_buffer,
            Err(err) => {
                self.semaphore.release();
                return Err(err);
            }
        };
        self.command_buffer = objc_handle(&self.context.api, command_buffer);
        self.constants.advance();
        Ok(command_buffer)
    }

    /// Texture of this frame's drawable, requested on first use
    fn acquire_drawable(&mut self) -> Result<RawId> {
        if let Some(texture) = self.drawable_texture {
            return Ok(texture);
        }
        let drawable = check_call(self.layer.next_drawable(), "Failed to get drawable")?;
        self.drawable = objc_handle(&self.context.api, drawable.drawable);
        self.drawable_texture = Some(drawable.texture);
        Ok(drawable.texture)
    }

    /// Encoder of the current pass, created with the pending clears
    fn render_encoder(&mut self) -> Result<RawId> {
        if let Some(encoder) = self.context.state.encoder() {
            return Ok(encoder);
        }
        let command_buffer = self.begin_frame()?;
        let desc = if self.current_render_target == 0 {
            let drawable = self.acquire_drawable()?;
            let color = match self.msaa_texture.raw() {
                Some(msaa) => ColorTarget { texture: msaa, resolve_texture: Some(drawable) },
                None => ColorTarget { texture: drawable, resolve_texture: None },
            };
            let depth = self.depth_texture.raw().map(|texture| (texture, self.depth_format));
            pass_descriptor(&[color], depth, &self.pending_clear)
        } else {
            self.resources
                .require::<MetalRenderTarget>(self.current_render_target)?
                .pass_descriptor(&self.pending_clear)
        };

        let api = Arc::clone(&self.context.api);
        let encoder = check_creation(api.new_render_command_encoder(command_buffer, &desc),
            "Failed to create render command encoder")?;
        self.encoder = objc_handle(&api, encoder);
        self.pending_clear = ClearValues::default();
        self.context.state.begin(encoder);
        Ok(encoder)
    }

    /// End the current pass; multisampled attachments resolve here
    fn end_encoder(&mut self) {
        if let Some(encoder) = self.context.state.encoder() {
            self.context.api.end_encoding(encoder);
            self.context.state.end();
        }
        self.encoder.reset();
    }

    fn target_info(&self) -> Result<TargetInfo> {
        if self.current_render_target == 0 {
            return Ok(TargetInfo {
                color_formats: vec![self.color_format],
                depth_format: self.depth_format,
                sample_count: self.sample_count,
                size: self.size,
            });
        }
        let render_target = self.resources.require::<MetalRenderTarget>(self.current_render_target)?;
        Ok(TargetInfo {
            color_formats: render_target.color_formats().to_vec(),
            depth_format: render_target.depth_format(),
            sample_count: render_target.sample_count(),
            size: render_target.size(),
        })
    }

    /// Pipeline state for the current shader, blend state and target
    fn pipeline_state(&mut self, target: &TargetInfo) -> Result<RawId> {
        let shader = self.resources.require::<MetalShader>(self.current_shader)?;
        let blend = if self.blend_state == 0 {
            None
        } else {
            Some(self.resources.require::<MetalBlendState>(self.blend_state)?)
        };
        let key = PipelineKey {
            blend_state: blend.map_or(0, |blend| blend.serial()),
            shader: shader.serial(),
            sample_count: target.sample_count,
            color_formats: target.color_formats.clone(),
            depth_format: target.depth_format,
            stencil_format: if has_stencil(target.depth_format) { target.depth_format } else { MTL_PIXEL_FORMAT_INVALID },
        };

        let api = Arc::clone(&self.context.api);
        let pipeline = self.pipelines.get_or_create(key, |key| {
            let desc = RenderPipelineDescriptor {
                vertex_function: shader.vertex_function()?,
                fragment_function: shader.fragment_function()?,
                vertex_attributes: shader.vertex_descriptor().to_vec(),
                vertex_stride: Vertex::STRIDE,
                sample_count: key.sample_count,
                color_attachments: key
                    .color_formats
                    .iter()
                    .map(|&format| blend.map_or_else(|| default_blend(format), |blend| blend.attachment(format)))
                    .collect(),
                depth_attachment_pixel_format: key.depth_format,
                stencil_attachment_pixel_format: key.stencil_format,
            };
            let state = check_creation(api.new_render_pipeline_state(&desc), "Failed to create render pipeline state")?;
            Ok(objc_handle(&api, state))
        })?;
        pipeline.get()
    }

    /// Bring the encoder in line with the requested state
    fn apply_state(&mut self, vertex_buffer: RawId) -> Result<()> {
        self.render_encoder()?;
        let target = self.target_info()?;
        let pipeline = self.pipeline_state(&target)?;
        let depth_stencil_state = if self.depth_stencil_state == 0 {
            self.default_depth_stencil_state.get()?
        } else {
            self.resources.require::<MetalDepthStencilState>(self.depth_stencil_state)?.state()
        };

        let mut textures = Vec::with_capacity(self.textures.len());
        let mut samplers = Vec::with_capacity(self.textures.len());
        for &id in &self.textures {
            if id == 0 {
                textures.push(None);
                samplers.push(None);
                continue;
            }
            let texture = self.resources.require::<MetalTexture>(id)?;
            textures.push(texture.sampled_texture());
            samplers.push(texture.sampler());
        }

        let state = &mut self.context.state;
        state.set_pipeline_state(pipeline);
        state.set_depth_stencil_state(depth_stencil_state, self.stencil_reference);
        state.set_cull_mode(cull_mode(self.cull_mode));
        state.set_fill_mode(fill_mode(self.fill_mode));
        state.set_viewport(viewport(&self.viewport));
        state.set_scissor_rect(scissor_rect(self.scissor.as_ref(), target.size));
        state.set_vertex_buffer(vertex_buffer);
        state.set_constant_buffers(self.constant_bindings.0, self.constant_bindings.1);
        state.set_fragment_textures(&textures, &samplers)
    }

    // ===== Command handlers =====

    fn resize(&mut self, size: UVec2) -> Result<()> {
        if size.x == 0 || size.y == 0 {
            engine_bail!(SOURCE, InvalidParameter, "Invalid back buffer size {}x{}", size.x, size.y);
        }
        if size == self.size {
            return Ok(());
        }

        self.end_encoder();
        self.drawable.reset();
        self.drawable_texture = None;
        self.layer.set_drawable_size(size);
        self.size = size;
        self.create_frame_buffer()
    }

    fn present(&mut self) -> Result<()> {
        let Some(command_buffer) = self.command_buffer.raw() else {
            engine_debug!(SOURCE, "Nothing to present");
            return Ok(());
        };
        self.end_encoder();

        let api = Arc::clone(&self.context.api);
        if self.debug_groups > 0 {
            engine_warn!(SOURCE, "{} debug markers left open at present", self.debug_groups);
            for _ in 0..self.debug_groups {
                api.pop_debug_group(command_buffer);
            }
            self.debug_groups = 0;
        }
        if let Some(drawable) = self.drawable.raw() {
            api.present_drawable(command_buffer, drawable);
        }

        let semaphore = Arc::clone(&self.semaphore);
        api.commit(command_buffer, Box::new(move |result| {
            if let Err(error) = result {
                engine_error!(SOURCE, "Command buffer failed: {} {}",
                    metal_error_name(error.domain, error.code), error.description);
            }
            semaphore.release();
        }));

        self.command_buffer.reset();
        self.drawable.reset();
        self.drawable_texture = None;
        Ok(())
    }

    fn delete_resource(&mut self, id: ResourceId) {
        let Some(resource) = self.resources.remove(id) else {
            return;
        };
        for object in resource.bindable_objects() {
            self.context.state.unbind(object);
        }
        match resource {
            MetalResource::Shader(_) if self.current_shader == id => {
                self.current_shader = 0;
                self.constant_bindings = (None, None);
            }
            MetalResource::BlendState(_) if self.blend_state == id => self.blend_state = 0,
            MetalResource::DepthStencilState(_) if self.depth_stencil_state == id => self.depth_stencil_state = 0,
            MetalResource::RenderTarget(_) if self.current_render_target == id => {
                self.end_encoder();
                self.current_render_target = 0;
            }
            MetalResource::Texture(_) => {
                for texture in self.textures.iter_mut().filter(|texture| **texture == id) {
                    *texture = 0;
                }
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

        let render_target = MetalRenderTarget::new(&self.context, &colors, depth)?;
        self.resources.insert(id, MetalResource::RenderTarget(render_target))
    }

    fn set_render_target(&mut self, id: ResourceId) -> Result<()> {
        if id != 0 {
            self.resources.require::<MetalRenderTarget>(id)?;
        }
        if id != self.current_render_target {
            self.end_encoder();
            self.current_render_target = id;
        }
        Ok(())
    }

    /// Clear through the load actions of a new pass
    fn clear_render_target(&mut self, command: &ClearRenderTargetCommand) -> Result<()> {
        let color = command.clear_color.norm().to_array().map(f64::from);
        let clear = ClearValues {
            color: command.clear_color_buffer.then_some(color),
            depth: command.clear_depth_buffer.then_some(command.clear_depth as f64),
            stencil: command.clear_stencil_buffer.then_some(command.clear_stencil & 0xFF),
        };
        if clear.is_empty() {
            return Ok(());
        }
        self.end_encoder();
        self.pending_clear = clear;
        self.render_encoder()?;
        Ok(())
    }

    fn set_depth_stencil_state(&mut self, id: ResourceId, stencil_reference: u32) -> Result<()> {
        if id != 0 {
            self.resources.require::<MetalDepthStencilState>(id)?;
        }
        self.depth_stencil_state = id;
        self.stencil_reference = stencil_reference;
        Ok(())
    }

    fn set_pipeline_state(&mut self, command: &SetPipelineStateCommand) -> Result<()> {
        if command.blend_state != 0 {
            self.resources.require::<MetalBlendState>(command.blend_state)?;
        }
        if command.shader != 0 {
            self.resources.require::<MetalShader>(command.shader)?;
        }
        if command.shader != self.current_shader {
            self.constant_bindings = (None, None);
        }
        self.blend_state = command.blend_state;
        self.current_shader = command.shader;
        self.cull_mode = command.cull_mode;
        self.fill_mode = command.fill_mode;
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        if self.current_shader == 0 {
            engine_bail!(SOURCE, ProtocolError, "No shader set");
        }
        if command.index_count == 0 {
            return Ok(());
        }
        let index_type = index_type(command.index_size)?;

        let index_buffer = self.resources.require::<MetalBuffer>(command.index_buffer)?;
        if index_buffer.buffer_type() != BufferType::Index {
            engine_bail!(SOURCE, ProtocolError, "Buffer {} is not an index buffer", command.index_buffer);
        }
        let index_buffer = index_buffer.buffer().ok_or_else(|| {
            engine_err!(SOURCE, InvalidUsage, "Index buffer {} is empty", command.index_buffer)
        })?;
        let vertex_buffer = self.resources.require::<MetalBuffer>(command.vertex_buffer)?;
        if vertex_buffer.buffer_type() != BufferType::Vertex {
            engine_bail!(SOURCE, ProtocolError, "Buffer {} is not a vertex buffer", command.vertex_buffer);
        }
        let vertex_buffer = vertex_buffer.buffer().ok_or_else(|| {
            engine_err!(SOURCE, InvalidUsage, "Vertex buffer {} is empty", command.vertex_buffer)
        })?;

        self.apply_state(vertex_buffer)?;
        let encoder = self.render_encoder()?;
        self.context.api.draw_indexed_primitives(
            encoder,
            primitive_type(command.draw_mode),
            command.index_count,
            index_type,
            index_buffer,
            command.start_index as usize * command.index_size as usize,
        );
        Ok(())
    }

    /// Copy constant values into this frame's constant storage
    fn set_shader_constants(&mut self, fragment: &[Vec<f32>], vertex: &[Vec<f32>]) -> Result<()> {
        if self.current_shader == 0 {
            engine_bail!(SOURCE, ProtocolError, "No shader set");
        }
        let shader = self.resources.require::<MetalShader>(self.current_shader)?;
        let (fragment, vertex) = shader.pack_constants(fragment, vertex)?;

        self.begin_frame()?;
        let api = Arc::clone(&self.context.api);
        let mut write = |data: &[u8]| -> Result<Option<BufferBinding>> {
            if data.is_empty() { Ok(None) } else { self.constants.write(&api, data).map(Some) }
        };
        self.constant_bindings = (write(&fragment)?, write(&vertex)?);
        Ok(())
    }

    fn set_textures(&mut self, textures: &[ResourceId]) -> Result<()> {
        if textures.len() > MAX_TEXTURE_SLOTS {
            engine_bail!(SOURCE, InvalidParameter,
                "At most {} textures can be bound, got {}", MAX_TEXTURE_SLOTS, textures.len());
        }
        for &id in textures.iter().filter(|&&id| id != 0) {
            if self.resources.require::<MetalTexture>(id)?.sampled_texture().is_none() {
                engine_bail!(SOURCE, InvalidUsage, "Texture {} cannot be sampled", id);
            }
        }
        self.textures = textures.to_vec();
        Ok(())
    }

    /// Copy between textures with a blit encoder, outside any render pass
    fn blit(&mut self, command: &BlitCommand) -> Result<()> {
        let source = self.resources.require::<MetalTexture>(command.source_texture)?;
        let source_texture = source.texture().ok_or_else(|| {
            engine_err!(SOURCE, NotInitialized, "Texture {} has no storage", command.source_texture)
        })?;
        let destination = self.resources.require::<MetalTexture>(command.destination_texture)?;
        let destination_texture = destination.texture().ok_or_else(|| {
            engine_err!(SOURCE, NotInitialized, "Texture {} has no storage", command.destination_texture)
        })?;

        self.end_encoder();
        let command_buffer = self.begin_frame()?;
        let api = Arc::clone(&self.context.api);
        let encoder = check_creation(api.new_blit_command_encoder(command_buffer), "Failed to create blit command encoder")?;
        let encoder = objc_handle(&api, encoder);
        let raw = encoder.get()?;

        let region = MtlRegion {
            x: command.source_x,
            y: command.source_y,
            width: command.source_width,
            height: command.source_height,
        };
        api.copy_from_texture(raw, source_texture, 0, command.source_level, region,
            destination_texture, 0, command.destination_level, UVec2::new(command.destination_x, command.destination_y));
        api.end_encoding(raw);
        Ok(())
    }

    fn push_debug_marker(&mut self, name: &str) -> Result<()> {
        self.end_encoder();
        let command_buffer = self.begin_frame()?;
        self.context.api.push_debug_group(command_buffer, name);
        self.debug_groups += 1;
        Ok(())
    }

    fn pop_debug_marker(&mut self) {
        let Some(command_buffer) = self.command_buffer.raw().filter(|_| self.debug_groups > 0) else {
            engine_warn!(SOURCE, "Debug marker popped without a matching push");
            return;
        };
        self.end_encoder();
        self.context.api.pop_debug_group(command_buffer);
        self.debug_groups -= 1;
    }
}

/// Texture usable as a render target attachment
fn attachment(resources: &ResourceTable<MetalResource>, id: ResourceId) -> Result<&MetalTexture> {
    let texture = resources.require::<MetalTexture>(id)?;
    if !texture.is_render_target() {
        engine_bail!(SOURCE, InvalidUsage, "Texture {} is not a render target", id);
    }
    Ok(texture)
}

fn viewport(rect: &Rect) -> MtlViewport {
    MtlViewport {
        origin_x: rect.position.x as f64,
        origin_y: rect.position.y as f64,
        width: rect.size.x as f64,
        height: rect.size.y as f64,
        znear: 0.0,
        zfar: 1.0,
    }
}

/// Scissor rectangle inside the target; the whole target when disabled
fn scissor_rect(rect: Option<&Rect>, target: UVec2) -> ScissorRect {
    let Some(rect) = rect else {
        return ScissorRect { x: 0, y: 0, width: target.x, height: target.y };
    };
    let x = (rect.position.x.max(0.0) as u32).min(target.x);
    let y = (rect.position.y.max(0.0) as u32).min(target.y);
    ScissorRect {
        x,
        y,
        width: (rect.size.x.max(0.0) as u32).min(target.x - x),
        height: (rect.size.y.max(0.0) as u32).min(target.y - y),
    }
}

impl RenderDevice for MetalRenderDevice {
    fn driver(&self) -> Driver {
        Driver::Metal
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
            Command::SetScissorTest(c) => {
                self.scissor = c.enabled.then_some(c.rectangle);
                Ok(())
            }
            Command::SetViewport(c) => {
                self.viewport = c.viewport;
                Ok(())
            }
            Command::InitDepthStencilState(c) => {
                let state = MetalDepthStencilState::new(&mut self.context, &c.desc)?;
                self.resources.insert(c.depth_stencil_state, MetalResource::DepthStencilState(state))
            }
            Command::SetDepthStencilState(c) => self.set_depth_stencil_state(c.depth_stencil_state, c.stencil_reference_value),
            Command::SetPipelineState(c) => self.set_pipeline_state(&c),
            Command::Draw(c) => self.draw(&c),
            Command::InitBlendState(c) => {
                let state = MetalBlendState::new(&mut self.context, &c.desc);
                self.resources.insert(c.blend_state, MetalResource::BlendState(state))
            }
            Command::InitBuffer(c) => {
                let id = c.buffer;
                let buffer = MetalBuffer::new(&mut self.context, c)?;
                self.resources.insert(id, MetalResource::Buffer(buffer))
            }
            Command::SetBufferData(c) => {
                let buffer = self.resources.require_mut::<MetalBuffer>(c.buffer)?;
                buffer.set_data(&mut self.context, c.data)
            }
            Command::InitShader(c) => {
                let id = c.shader;
                let shader = MetalShader::new(&mut self.context, c)?;
                self.resources.insert(id, MetalResource::Shader(shader))
            }
            Command::SetShaderConstants(c) => {
                self.set_shader_constants(&c.fragment_shader_constants, &c.vertex_shader_constants)
            }
            Command::InitTexture(c) => {
                let id = c.texture;
                let texture = MetalTexture::new(&mut self.context, c)?;
                self.resources.insert(id, MetalResource::Texture(texture))
            }
            Command::SetTextureData(c) => {
                let texture = self.resources.require_mut::<MetalTexture>(c.texture)?;
                texture.set_data(&mut self.context, c.levels, c.face)
            }
            Command::SetTextureParameters(c) => {
                let texture = self.resources.require_mut::<MetalTexture>(c.texture)?;
                texture.set_parameters(&mut self.context, &c)
            }
            Command::SetTextures(c) => self.set_textures(&c.textures),
            Command::Blit(c) => self.blit(&c),
            Command::PushDebugMarker(c) => self.push_debug_marker(&c.name),
            Command::PopDebugMarker => {
                self.pop_debug_marker();
                Ok(())
            }
        }
    }
}

impl Drop for MetalRenderDevice {
    fn drop(&mut self) {
        self.end_encoder();
        self.drawable.reset();
        self.drawable_texture = None;
        if !self.command_buffer.is_null() {
            self.command_buffer.reset();
            self.semaphore.release();
        }
        self.resources.clear();
        self.pipelines.drain();
        self.constants.clear();
        self.context.samplers.drain();
    }
}

#[cfg(test)]
#[path = "metal_render_device_tests.rs"]
mod tests;
