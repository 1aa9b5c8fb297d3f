/// Recording Metal fake for unit tests (no GPU required)
///
/// Encoder and command buffer calls are recorded as strings such as
/// `SetCullMode(2)`; creation calls record the new object's id, e.g.
/// `NewBuffer(3, 48)`. Every object carries a reference count so tests can
/// check that the device releases everything it created exactly once. Buffers
/// and texture slices are backed by memory.
///
/// Completion handlers run inside `commit` unless `hold_completions` is set;
/// held handlers run on `complete_pending`.

use crate::metal_api::*;
use crate::metal_constants::*;
use galaxy_3d_graphics::glam::UVec2;
use rustc_hash::FxHashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

fn o(object: Option<RawId>) -> String {
    object.map_or_else(|| "null".to_string(), |object| object.id().to_string())
}

/// Native object created through the fake
#[derive(Debug, Clone)]
pub enum MockObject {
    Buffer { length: usize, options: u64 },
    Texture(TextureDescriptor),
    Sampler(SamplerDescriptor),
    DepthStencil(DepthStencilDescriptor),
    Library,
    Function(String),
    Pipeline(RenderPipelineDescriptor),
    CommandBuffer,
    RenderEncoder(RenderPassDescriptor),
    BlitEncoder,
    Drawable { texture: RawId },
    DrawableTexture,
}

#[derive(Default)]
pub struct MockMetalState {
    pub calls: Vec<String>,
    pub max_sample_count: u32,
    pub border_color: bool,
    pub display_modes: Vec<UVec2>,
    pub objects: FxHashMap<usize, MockObject>,
    pub references: FxHashMap<usize, u32>,
    /// Objects released more often than they were referenced
    pub over_released: Vec<usize>,
    /// Contents of buffers and texture slices, keyed by (object, level, slice)
    pub memory: FxHashMap<(usize, u32, u32), Vec<u8>>,
    /// Next call to the named method fails with the error
    pub failures: FxHashMap<&'static str, MetalError>,
    /// Keep completion handlers until `complete_pending`
    pub hold_completions: bool,
    pub pending_completions: Vec<CompletionHandler>,
    next_id: usize,
}

pub struct MockMetal {
    state: Mutex<MockMetalState>,
}

impl MockMetal {
    pub fn new() -> Arc<Self> {
        let state = MockMetalState {
            max_sample_count: 8,
            border_color: true,
            next_id: 1,
            ..MockMetalState::default()
        };
        Arc::new(Self { state: Mutex::new(state) })
    }

    pub fn state(&self) -> MutexGuard<'_, MockMetalState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of recorded calls to the method `name`
    pub fn count(&self, name: &str) -> usize {
        let prefix = format!("{}(", name);
        self.state().calls.iter().filter(|call| call.starts_with(&prefix)).count()
    }

    /// Whether exactly this call was recorded
    pub fn called(&self, call: &str) -> bool {
        self.state().calls.iter().any(|recorded| recorded == call)
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Make the next call to `method` (e.g. `"NewTexture"`) fail
    pub fn fail_next(&self, method: &'static str, error: MetalError) {
        self.state().failures.insert(method, error);
    }

    pub fn object(&self, object: RawId) -> Option<MockObject> {
        self.state().objects.get(&object.id()).cloned()
    }

    pub fn references(&self, object: RawId) -> u32 {
        self.state().references.get(&object.id()).copied().unwrap_or(0)
    }

    /// Objects still referenced
    pub fn live_objects(&self) -> usize {
        self.state().references.values().filter(|count| **count > 0).count()
    }

    /// Ids of every created object matching `predicate`, in creation order
    pub fn objects_where(&self, predicate: impl Fn(&MockObject) -> bool) -> Vec<RawId> {
        let state = self.state();
        let mut ids: Vec<usize> = state
            .objects
            .iter()
            .filter(|(_, object)| predicate(object))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(NonZeroUsize::new).map(RawId::from_id).collect()
    }

    /// Most recently created texture
    pub fn last_texture(&self) -> Option<(RawId, TextureDescriptor)> {
        let textures = self.objects_where(|object| matches!(object, MockObject::Texture(_)));
        let texture = *textures.last()?;
        match self.object(texture)? {
            MockObject::Texture(desc) => Some((texture, desc)),
            _ => None,
        }
    }

    /// Most recently created render pipeline state
    pub fn last_pipeline(&self) -> Option<(RawId, RenderPipelineDescriptor)> {
        let pipelines = self.objects_where(|object| matches!(object, MockObject::Pipeline(_)));
        let pipeline = *pipelines.last()?;
        match self.object(pipeline)? {
            MockObject::Pipeline(desc) => Some((pipeline, desc)),
            _ => None,
        }
    }

    /// Pass descriptor of the most recently created render encoder
    pub fn last_render_pass(&self) -> Option<RenderPassDescriptor> {
        let encoders = self.objects_where(|object| matches!(object, MockObject::RenderEncoder(_)));
        match self.object(*encoders.last()?)? {
            MockObject::RenderEncoder(desc) => Some(desc),
            _ => None,
        }
    }

    pub fn contents(&self, object: RawId, level: u32, slice: u32) -> Option<Vec<u8>> {
        self.state().memory.get(&(object.id(), level, slice)).cloned()
    }

    /// Run the completion handlers held back so far
    pub fn complete_pending(&self) {
        let pending = std::mem::take(&mut self.state().pending_completions);
        for completed in pending {
            completed(Ok(()));
        }
    }

    fn record(&self, call: String) {
        self.state().calls.push(call);
    }

    fn take_failure(&self, method: &'static str) -> Option<MetalError> {
        self.state().failures.remove(method)
    }

    /// New object with one reference; `details` follow the id in the call string
    fn create(&self, method: &'static str, object: MockObject, details: &str) -> MetalResult<RawId> {
        if let Some(error) = self.take_failure(method) {
            self.record(format!("{}(failed)", method));
            return Err(error);
        }
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        state.objects.insert(id, object);
        state.references.insert(id, 1);
        state.calls.push(format!("{}({}{})", method, id, details));
        NonZeroUsize::new(id)
            .map(RawId::from_id)
            .ok_or_else(|| MetalError::new(MetalErrorDomain::Device, METAL_DEVICE_ERROR_NIL_OBJECT, ""))
    }
}

impl MetalApi for MockMetal {
    fn retain(&self, object: RawId) {
        let mut state = self.state();
        *state.references.entry(object.id()).or_insert(0) += 1;
    }

    fn release(&self, object: RawId) {
        let drawable_texture = {
            let mut state = self.state();
            let remaining = match state.references.get_mut(&object.id()) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    *count
                }
                _ => {
                    state.over_released.push(object.id());
                    return;
                }
            };
            match state.objects.get(&object.id()) {
                Some(MockObject::Drawable { texture }) if remaining == 0 => Some(*texture),
                _ => None,
            }
        };
        if let Some(texture) = drawable_texture {
            self.release(texture);
        }
    }

    fn device_name(&self) -> String {
        "Mock GPU".to_string()
    }

    fn supports_texture_sample_count(&self, sample_count: u32) -> bool {
        sample_count.is_power_of_two() && sample_count <= self.state().max_sample_count
    }

    fn supports_border_color(&self) -> bool {
        self.state().border_color
    }

    fn new_buffer(&self, length: usize, options: u64, initial_data: Option<&[u8]>) -> MetalResult<RawId> {
        let buffer = self.create("NewBuffer", MockObject::Buffer { length, options }, &format!(", {}", length))?;
        let mut contents = vec![0u8; length];
        if let Some(data) = initial_data {
            let copied = data.len().min(length);
            contents[..copied].copy_from_slice(&data[..copied]);
        }
        self.state().memory.insert((buffer.id(), 0, 0), contents);
        Ok(buffer)
    }

    fn copy_to_buffer(&self, buffer: RawId, offset: usize, data: &[u8]) {
        let mut state = self.state();
        state.calls.push(format!("CopyToBuffer({}, {}, {})", buffer.id(), offset, data.len()));
        let memory = state.memory.entry((buffer.id(), 0, 0)).or_default();
        if memory.len() < offset + data.len() {
            memory.resize(offset + data.len(), 0);
        }
        memory[offset..offset + data.len()].copy_from_slice(data);
    }

    fn new_texture(&self, desc: &TextureDescriptor) -> MetalResult<RawId> {
        self.create("NewTexture", MockObject::Texture(*desc), "")
    }

    fn replace_region(&self, texture: RawId, region: MtlRegion, level: u32, slice: u32, data: &[u8], bytes_per_row: u32) {
        let mut state = self.state();
        state.calls.push(format!(
            "ReplaceRegion({}, {}, {}, {}x{}, {}, {})",
            texture.id(), level, slice, region.width, region.height, data.len(), bytes_per_row
        ));
        state.memory.insert((texture.id(), level, slice), data.to_vec());
    }

    fn new_sampler_state(&self, desc: &SamplerDescriptor) -> MetalResult<RawId> {
        self.create("NewSamplerState", MockObject::Sampler(*desc), "")
    }

    fn new_depth_stencil_state(&self, desc: &DepthStencilDescriptor) -> MetalResult<RawId> {
        self.create("NewDepthStencilState", MockObject::DepthStencil(*desc), "")
    }

    fn new_library(&self, data: &[u8]) -> MetalResult<RawId> {
        if data.is_empty() {
            return Err(MetalError::new(MetalErrorDomain::Library, MTL_LIBRARY_ERROR_UNSUPPORTED, "empty library"));
        }
        self.create("NewLibrary", MockObject::Library, "")
    }

    fn new_function(&self, _library: RawId, name: &str) -> MetalResult<RawId> {
        self.create("NewFunction", MockObject::Function(name.to_string()), &format!(", {}", name))
    }

    fn new_render_pipeline_state(&self, desc: &RenderPipelineDescriptor) -> MetalResult<RawId> {
        self.create("NewRenderPipelineState", MockObject::Pipeline(desc.clone()), "")
    }

    fn new_command_buffer(&self) -> MetalResult<RawId> {
        self.create("NewCommandBuffer", MockObject::CommandBuffer, "")
    }

    fn push_debug_group(&self, command_buffer: RawId, name: &str) {
        self.record(format!("PushDebugGroup({}, {})", command_buffer.id(), name));
    }

    fn pop_debug_group(&self, command_buffer: RawId) {
        self.record(format!("PopDebugGroup({})", command_buffer.id()));
    }

    fn present_drawable(&self, command_buffer: RawId, drawable: RawId) {
        self.record(format!("PresentDrawable({}, {})", command_buffer.id(), drawable.id()));
    }

    fn commit(&self, command_buffer: RawId, completed: CompletionHandler) {
        let run_now = {
            let mut state = self.state();
            state.calls.push(format!("Commit({})", command_buffer.id()));
            if state.hold_completions {
                state.pending_completions.push(completed);
                None
            } else {
                Some(completed)
            }
        };
        if let Some(completed) = run_now {
            completed(Ok(()));
        }
    }

    fn new_render_command_encoder(&self, _command_buffer: RawId, desc: &RenderPassDescriptor) -> MetalResult<RawId> {
        self.create("NewRenderCommandEncoder", MockObject::RenderEncoder(desc.clone()), "")
    }

    fn end_encoding(&self, encoder: RawId) {
        self.record(format!("EndEncoding({})", encoder.id()));
    }

    fn set_render_pipeline_state(&self, _encoder: RawId, state: RawId) {
        self.record(format!("SetRenderPipelineState({})", state.id()));
    }

    fn set_depth_stencil_state(&self, _encoder: RawId, state: RawId) {
        self.record(format!("SetDepthStencilState({})", state.id()));
    }

    fn set_stencil_reference_value(&self, _encoder: RawId, value: u32) {
        self.record(format!("SetStencilReferenceValue({})", value));
    }

    fn set_cull_mode(&self, _encoder: RawId, mode: u64) {
        self.record(format!("SetCullMode({})", mode));
    }

    fn set_triangle_fill_mode(&self, _encoder: RawId, mode: u64) {
        self.record(format!("SetTriangleFillMode({})", mode));
    }

    fn set_viewport(&self, _encoder: RawId, viewport: &MtlViewport) {
        self.record(format!(
            "SetViewport({}, {}, {}, {}, {}, {})",
            viewport.origin_x, viewport.origin_y, viewport.width, viewport.height, viewport.znear, viewport.zfar
        ));
    }

    fn set_scissor_rect(&self, _encoder: RawId, rect: ScissorRect) {
        self.record(format!("SetScissorRect({}, {}, {}, {})", rect.x, rect.y, rect.width, rect.height));
    }

    fn set_vertex_buffer(&self, _encoder: RawId, buffer: Option<RawId>, offset: usize, index: u32) {
        self.record(format!("SetVertexBuffer({}, {}, {})", o(buffer), offset, index));
    }

    fn set_fragment_buffer(&self, _encoder: RawId, buffer: Option<RawId>, offset: usize, index: u32) {
        self.record(format!("SetFragmentBuffer({}, {}, {})", o(buffer), offset, index));
    }

    fn set_fragment_texture(&self, _encoder: RawId, texture: Option<RawId>, index: u32) {
        self.record(format!("SetFragmentTexture({}, {})", o(texture), index));
    }

    fn set_fragment_sampler_state(&self, _encoder: RawId, sampler: Option<RawId>, index: u32) {
        self.record(format!("SetFragmentSamplerState({}, {})", o(sampler), index));
    }

    fn draw_indexed_primitives(&self, _encoder: RawId, primitive_type: u64, index_count: u32, index_type: u64,
        index_buffer: RawId, index_buffer_offset: usize) {
        self.record(format!(
            "DrawIndexedPrimitives({}, {}, {}, {}, {})",
            primitive_type, index_count, index_type, index_buffer.id(), index_buffer_offset
        ));
    }

    fn new_blit_command_encoder(&self, _command_buffer: RawId) -> MetalResult<RawId> {
        self.create("NewBlitCommandEncoder", MockObject::BlitEncoder, "")
    }

    fn copy_from_texture(&self, _encoder: RawId, source: RawId, source_slice: u32, source_level: u32,
        source_region: MtlRegion, destination: RawId, destination_slice: u32, destination_level: u32,
        destination_origin: UVec2) {
        self.record(format!(
            "CopyFromTexture({}, {}, {}, [{}, {}, {}, {}], {}, {}, {}, {}, {})",
            source.id(), source_slice, source_level,
            source_region.x, source_region.y, source_region.width, source_region.height,
            destination.id(), destination_slice, destination_level, destination_origin.x, destination_origin.y
        ));
    }
}

// ============================================================================
// Layer
// ============================================================================

/// Layer whose drawables live in the same fake device
pub struct MockLayer {
    api: Arc<MockMetal>,
    pub pixel_format: u64,
    pub size: UVec2,
    pub display_sync: bool,
}

impl MockLayer {
    pub fn new(api: &Arc<MockMetal>) -> Box<Self> {
        Box::new(Self { api: Arc::clone(api), pixel_format: MTL_PIXEL_FORMAT_INVALID, size: UVec2::ZERO, display_sync: false })
    }
}

impl MetalLayer for MockLayer {
    fn configure(&mut self, pixel_format: u64, size: UVec2, display_sync: bool) {
        self.api.record(format!("Configure({}, {}, {}, {})", pixel_format, size.x, size.y, display_sync));
        self.pixel_format = pixel_format;
        self.size = size;
        self.display_sync = display_sync;
    }

    fn set_drawable_size(&mut self, size: UVec2) {
        self.api.record(format!("SetDrawableSize({}, {})", size.x, size.y));
        self.size = size;
    }

    fn next_drawable(&mut self) -> MetalResult<Drawable> {
        if let Some(error) = self.api.take_failure("NextDrawable") {
            self.api.record("NextDrawable(failed)".to_string());
            return Err(error);
        }
        let texture = self.api.create("DrawableTexture", MockObject::DrawableTexture, "")?;
        let drawable = self.api.create("NextDrawable", MockObject::Drawable { texture }, "")?;
        Ok(Drawable { drawable, texture })
    }

    fn display_modes(&self) -> Vec<UVec2> {
        self.api.state().display_modes.clone()
    }
}
