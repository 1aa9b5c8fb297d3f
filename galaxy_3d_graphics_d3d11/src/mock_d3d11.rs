/// Recording Direct3D 11 fake for unit tests (no GPU required)
///
/// Context calls are recorded as strings such as `PSSetShader(4)`; creation
/// calls record the new object's id, e.g. `CreateBuffer(3)`. Every object
/// carries a reference count so tests can check that the device releases
/// everything it created exactly once. Buffers and textures are backed by
/// memory: `Map` hands out a pointer into it and `Unmap` keeps the result.

use crate::d3d11_api::*;
use crate::d3d11_constants::*;
use galaxy_3d_graphics::glam::UVec2;
use rustc_hash::FxHashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

fn o(object: Option<RawCom>) -> String {
    object.map_or_else(|| "null".to_string(), |object| object.id().to_string())
}

fn list(objects: &[Option<RawCom>]) -> String {
    let items: Vec<String> = objects.iter().map(|object| o(*object)).collect();
    format!("[{}]", items.join(", "))
}

/// Bytes per pixel of the formats the backend creates textures with
fn format_size(format: u32) -> u32 {
    match format {
        DXGI_FORMAT_R8_UNORM | DXGI_FORMAT_R8_SNORM | DXGI_FORMAT_R8_UINT | DXGI_FORMAT_R8_SINT
        | DXGI_FORMAT_A8_UNORM => 1,
        DXGI_FORMAT_R16_UNORM | DXGI_FORMAT_R16_SNORM | DXGI_FORMAT_R16_UINT | DXGI_FORMAT_R16_SINT
        | DXGI_FORMAT_R16_FLOAT | DXGI_FORMAT_R8G8_UNORM | DXGI_FORMAT_R8G8_SNORM | DXGI_FORMAT_R8G8_UINT
        | DXGI_FORMAT_R8G8_SINT => 2,
        DXGI_FORMAT_R16G16B16A16_FLOAT | DXGI_FORMAT_R16G16B16A16_UNORM | DXGI_FORMAT_R16G16B16A16_UINT
        | DXGI_FORMAT_R16G16B16A16_SNORM | DXGI_FORMAT_R16G16B16A16_SINT => 8,
        DXGI_FORMAT_R32G32B32A32_FLOAT | DXGI_FORMAT_R32G32B32A32_UINT | DXGI_FORMAT_R32G32B32A32_SINT => 16,
        _ => 4,
    }
}

/// Native object created through the fake
#[derive(Debug, Clone)]
pub enum MockObject {
    Buffer(BufferDesc),
    Texture(Texture2dDesc),
    RenderTargetView { resource: RawCom, desc: Option<ViewDesc> },
    DepthStencilView { resource: RawCom, desc: Option<ViewDesc> },
    ShaderResourceView { resource: RawCom, desc: ViewDesc },
    Sampler(SamplerDesc),
    Rasterizer(RasterizerDesc),
    Blend(BlendDesc),
    DepthStencil(DepthStencilDesc),
    PixelShader,
    VertexShader,
    InputLayout(Vec<InputElementDesc>),
    BackBuffer,
}

#[derive(Default)]
pub struct MockD3d11State {
    pub calls: Vec<String>,
    pub feature_level: u32,
    pub annotations: bool,
    pub max_sample_count: u32,
    /// Extra alignment of mapped texture rows, 0 for tightly packed rows
    pub row_pitch_alignment: u32,
    pub display_modes: Vec<UVec2>,
    pub objects: FxHashMap<usize, MockObject>,
    pub references: FxHashMap<usize, u32>,
    /// Objects released more often than they were referenced
    pub over_released: Vec<usize>,
    /// Contents of buffers and texture subresources, keyed by (object, subresource)
    pub memory: FxHashMap<(usize, u32), Vec<u8>>,
    /// Next call to the named method fails with the HRESULT
    pub failures: FxHashMap<&'static str, i32>,
    next_id: usize,
}

pub struct MockD3d11 {
    state: Mutex<MockD3d11State>,
}

impl MockD3d11 {
    pub fn new() -> Arc<Self> {
        let state = MockD3d11State {
            feature_level: D3D_FEATURE_LEVEL_11_0,
            annotations: true,
            max_sample_count: 8,
            next_id: 1,
            ..MockD3d11State::default()
        };
        Arc::new(Self { state: Mutex::new(state) })
    }

    pub fn state(&self) -> MutexGuard<'_, MockD3d11State> {
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

    /// Make the next call to `method` (e.g. `"CreateTexture2D"`) fail
    pub fn fail_next(&self, method: &'static str, hresult: i32) {
        self.state().failures.insert(method, hresult);
    }

    pub fn object(&self, object: RawCom) -> Option<MockObject> {
        self.state().objects.get(&object.id()).cloned()
    }

    pub fn references(&self, object: RawCom) -> u32 {
        self.state().references.get(&object.id()).copied().unwrap_or(0)
    }

    /// Objects still referenced
    pub fn live_objects(&self) -> usize {
        self.state().references.values().filter(|count| **count > 0).count()
    }

    /// Ids of every created object matching `predicate`, in creation order
    pub fn objects_where(&self, predicate: impl Fn(&MockObject) -> bool) -> Vec<RawCom> {
        let state = self.state();
        let mut ids: Vec<usize> = state
            .objects
            .iter()
            .filter(|(_, object)| predicate(object))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(NonZeroUsize::new).map(RawCom::from_id).collect()
    }

    /// Most recently created buffer
    pub fn last_buffer(&self) -> Option<(RawCom, BufferDesc)> {
        let buffers = self.objects_where(|object| matches!(object, MockObject::Buffer(_)));
        let buffer = *buffers.last()?;
        match self.object(buffer)? {
            MockObject::Buffer(desc) => Some((buffer, desc)),
            _ => None,
        }
    }

    /// Most recently created texture
    pub fn last_texture(&self) -> Option<(RawCom, Texture2dDesc)> {
        let textures = self.objects_where(|object| matches!(object, MockObject::Texture(_)));
        let texture = *textures.last()?;
        match self.object(texture)? {
            MockObject::Texture(desc) => Some((texture, desc)),
            _ => None,
        }
    }

    pub fn contents(&self, object: RawCom, subresource: u32) -> Option<Vec<u8>> {
        self.state().memory.get(&(object.id(), subresource)).cloned()
    }

    fn record(&self, call: String) {
        self.state().calls.push(call);
    }

    fn take_failure(&self, method: &'static str) -> Option<i32> {
        self.state().failures.remove(method)
    }

    /// New object with one reference
    pub(crate) fn create(&self, method: &'static str, object: MockObject) -> ComResult<RawCom> {
        if let Some(hresult) = self.take_failure(method) {
            self.record(format!("{}(failed)", method));
            return Err(hresult);
        }
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        state.objects.insert(id, object);
        state.references.insert(id, 1);
        state.calls.push(format!("{}({})", method, id));
        NonZeroUsize::new(id).map(RawCom::from_id).ok_or(E_FAIL)
    }

    fn texture_row_pitch(&self, desc: &Texture2dDesc, level: u32) -> u32 {
        let width = (desc.width >> level).max(1);
        let row = width * format_size(desc.format);
        let alignment = self.state().row_pitch_alignment;
        if alignment > 1 {
            row.div_ceil(alignment) * alignment
        } else {
            row
        }
    }
}

impl D3d11Api for MockD3d11 {
    fn add_ref(&self, object: RawCom) -> u32 {
        let mut state = self.state();
        let count = state.references.entry(object.id()).or_insert(0);
        *count += 1;
        *count
    }

    fn release(&self, object: RawCom) -> u32 {
        let mut state = self.state();
        match state.references.get_mut(&object.id()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                *count
            }
            _ => {
                state.over_released.push(object.id());
                0
            }
        }
    }

    fn feature_level(&self) -> u32 {
        self.state().feature_level
    }

    fn adapter_description(&self) -> String {
        "Mock Adapter".to_string()
    }

    fn check_multisample_quality_levels(&self, _format: u32, sample_count: u32) -> ComResult<u32> {
        let max = self.state().max_sample_count;
        Ok(if sample_count.is_power_of_two() && sample_count <= max { 1 } else { 0 })
    }

    fn create_buffer(&self, desc: &BufferDesc, initial_data: Option<&[u8]>) -> ComResult<RawCom> {
        let buffer = self.create("CreateBuffer", MockObject::Buffer(*desc))?;
        let mut contents = vec![0u8; desc.byte_width as usize];
        if let Some(data) = initial_data {
            let length = data.len().min(contents.len());
            contents[..length].copy_from_slice(&data[..length]);
        }
        self.state().memory.insert((buffer.id(), 0), contents);
        Ok(buffer)
    }

    fn create_texture_2d(&self, desc: &Texture2dDesc, initial_data: &[SubresourceData<'_>]) -> ComResult<RawCom> {
        let texture = self.create("CreateTexture2D", MockObject::Texture(*desc))?;
        let mut state = self.state();
        for (subresource, data) in initial_data.iter().enumerate() {
            state.memory.insert((texture.id(), subresource as u32), data.data.to_vec());
        }
        Ok(texture)
    }

    fn create_render_target_view(&self, resource: RawCom, desc: Option<&ViewDesc>) -> ComResult<RawCom> {
        self.create("CreateRenderTargetView", MockObject::RenderTargetView { resource, desc: desc.copied() })
    }

    fn create_depth_stencil_view(&self, resource: RawCom, desc: Option<&ViewDesc>) -> ComResult<RawCom> {
        self.create("CreateDepthStencilView", MockObject::DepthStencilView { resource, desc: desc.copied() })
    }

    fn create_shader_resource_view(&self, resource: RawCom, desc: &ViewDesc) -> ComResult<RawCom> {
        self.create("CreateShaderResourceView", MockObject::ShaderResourceView { resource, desc: *desc })
    }

    fn create_sampler_state(&self, desc: &SamplerDesc) -> ComResult<RawCom> {
        self.create("CreateSamplerState", MockObject::Sampler(*desc))
    }

    fn create_rasterizer_state(&self, desc: &RasterizerDesc) -> ComResult<RawCom> {
        self.create("CreateRasterizerState", MockObject::Rasterizer(*desc))
    }

    fn create_blend_state(&self, desc: &BlendDesc) -> ComResult<RawCom> {
        self.create("CreateBlendState", MockObject::Blend(*desc))
    }

    fn create_depth_stencil_state(&self, desc: &DepthStencilDesc) -> ComResult<RawCom> {
        self.create("CreateDepthStencilState", MockObject::DepthStencil(*desc))
    }

    fn create_pixel_shader(&self, bytecode: &[u8]) -> ComResult<RawCom> {
        if bytecode.is_empty() {
            return Err(E_INVALIDARG);
        }
        self.create("CreatePixelShader", MockObject::PixelShader)
    }

    fn create_vertex_shader(&self, bytecode: &[u8]) -> ComResult<RawCom> {
        if bytecode.is_empty() {
            return Err(E_INVALIDARG);
        }
        self.create("CreateVertexShader", MockObject::VertexShader)
    }

    fn create_input_layout(&self, elements: &[InputElementDesc], _vertex_bytecode: &[u8]) -> ComResult<RawCom> {
        self.create("CreateInputLayout", MockObject::InputLayout(elements.to_vec()))
    }

    fn clear_state(&self) {
        self.record("ClearState()".to_string());
    }

    fn om_set_render_targets(&self, views: &[RawCom], depth_stencil_view: Option<RawCom>) {
        let views: Vec<Option<RawCom>> = views.iter().copied().map(Some).collect();
        self.record(format!("OMSetRenderTargets({}, {})", list(&views), o(depth_stencil_view)));
    }

    fn om_set_blend_state(&self, state: Option<RawCom>, _blend_factor: [f32; 4], _sample_mask: u32) {
        self.record(format!("OMSetBlendState({})", o(state)));
    }

    fn om_set_depth_stencil_state(&self, state: Option<RawCom>, stencil_ref: u32) {
        self.record(format!("OMSetDepthStencilState({}, {})", o(state), stencil_ref));
    }

    fn clear_render_target_view(&self, view: RawCom, color: [f32; 4]) {
        self.record(format!("ClearRenderTargetView({}, {:?})", view.id(), color));
    }

    fn clear_depth_stencil_view(&self, view: RawCom, clear_flags: u32, depth: f32, stencil: u8) {
        self.record(format!("ClearDepthStencilView({}, {}, {}, {})", view.id(), clear_flags, depth, stencil));
    }

    fn rs_set_state(&self, state: Option<RawCom>) {
        self.record(format!("RSSetState({})", o(state)));
    }

    fn rs_set_viewports(&self, viewports: &[Viewport]) {
        for viewport in viewports {
            self.record(format!(
                "RSSetViewports({}, {}, {}, {}, {}, {})",
                viewport.top_left_x, viewport.top_left_y, viewport.width, viewport.height,
                viewport.min_depth, viewport.max_depth
            ));
        }
    }

    fn rs_set_scissor_rects(&self, rects: &[D3dRect]) {
        for rect in rects {
            self.record(format!("RSSetScissorRects({}, {}, {}, {})", rect.left, rect.top, rect.right, rect.bottom));
        }
    }

    fn ia_set_input_layout(&self, layout: Option<RawCom>) {
        self.record(format!("IASetInputLayout({})", o(layout)));
    }

    fn ia_set_vertex_buffer(&self, slot: u32, buffer: Option<RawCom>, stride: u32, offset: u32) {
        self.record(format!("IASetVertexBuffers({}, {}, {}, {})", slot, o(buffer), stride, offset));
    }

    fn ia_set_index_buffer(&self, buffer: Option<RawCom>, format: u32, offset: u32) {
        self.record(format!("IASetIndexBuffer({}, {}, {})", o(buffer), format, offset));
    }

    fn ia_set_primitive_topology(&self, topology: u32) {
        self.record(format!("IASetPrimitiveTopology({})", topology));
    }

    fn vs_set_shader(&self, shader: Option<RawCom>) {
        self.record(format!("VSSetShader({})", o(shader)));
    }

    fn ps_set_shader(&self, shader: Option<RawCom>) {
        self.record(format!("PSSetShader({})", o(shader)));
    }

    fn vs_set_constant_buffer(&self, slot: u32, buffer: Option<RawCom>) {
        self.record(format!("VSSetConstantBuffers({}, {})", slot, o(buffer)));
    }

    fn ps_set_constant_buffer(&self, slot: u32, buffer: Option<RawCom>) {
        self.record(format!("PSSetConstantBuffers({}, {})", slot, o(buffer)));
    }

    fn ps_set_shader_resources(&self, start_slot: u32, views: &[Option<RawCom>]) {
        self.record(format!("PSSetShaderResources({}, {})", start_slot, list(views)));
    }

    fn ps_set_samplers(&self, start_slot: u32, samplers: &[Option<RawCom>]) {
        self.record(format!("PSSetSamplers({}, {})", start_slot, list(samplers)));
    }

    fn draw_indexed(&self, index_count: u32, start_index: u32, base_vertex: i32) {
        self.record(format!("DrawIndexed({}, {}, {})", index_count, start_index, base_vertex));
    }

    fn map(&self, resource: RawCom, subresource: u32, map_type: u32) -> ComResult<MappedSubresource> {
        if let Some(hresult) = self.take_failure("Map") {
            self.record(format!("Map({}, {}, {}) failed", resource.id(), subresource, map_type));
            return Err(hresult);
        }
        self.record(format!("Map({}, {}, {})", resource.id(), subresource, map_type));

        let object = self.object(resource);
        let (size, row_pitch) = match object {
            Some(MockObject::Buffer(desc)) => (desc.byte_width, desc.byte_width),
            Some(MockObject::Texture(desc)) => {
                let level = subresource % desc.mip_levels.max(1);
                let row_pitch = self.texture_row_pitch(&desc, level);
                (row_pitch * (desc.height >> level).max(1), row_pitch)
            }
            _ => return Err(E_INVALIDARG),
        };

        let mut state = self.state();
        let memory = state.memory.entry((resource.id(), subresource)).or_default();
        memory.resize(size as usize, 0);
        Ok(MappedSubresource { data: memory.as_mut_ptr(), row_pitch })
    }

    fn unmap(&self, resource: RawCom, subresource: u32) {
        self.record(format!("Unmap({}, {})", resource.id(), subresource));
    }

    fn update_subresource(&self, resource: RawCom, subresource: u32, data: &[u8], row_pitch: u32) {
        self.record(format!("UpdateSubresource({}, {}, {}, {})", resource.id(), subresource, data.len(), row_pitch));
        self.state().memory.insert((resource.id(), subresource), data.to_vec());
    }

    fn resolve_subresource(&self, destination: RawCom, destination_subresource: u32, source: RawCom,
        source_subresource: u32, format: u32) {
        self.record(format!(
            "ResolveSubresource({}, {}, {}, {}, {})",
            destination.id(), destination_subresource, source.id(), source_subresource, format
        ));
    }

    fn copy_subresource_region(&self, destination: RawCom, destination_subresource: u32, x: u32, y: u32,
        z: u32, source: RawCom, source_subresource: u32, source_box: &D3dBox) {
        self.record(format!(
            "CopySubresourceRegion({}, {}, {}, {}, {}, {}, {}, [{}, {}, {}, {}])",
            destination.id(), destination_subresource, x, y, z, source.id(), source_subresource,
            source_box.left, source_box.top, source_box.right, source_box.bottom
        ));
    }

    fn supports_annotations(&self) -> bool {
        self.state().annotations
    }

    fn begin_event(&self, name: &str) {
        self.record(format!("BeginEvent({})", name));
    }

    fn end_event(&self) {
        self.record("EndEvent()".to_string());
    }
}

// ============================================================================
// Swap chain
// ============================================================================

/// Swap chain whose back buffer lives in the same fake device
///
/// Like DXGI, `ResizeBuffers` fails while anyone but the swap chain still
/// references the back buffer.
pub struct MockSwapChain {
    api: Arc<MockD3d11>,
    back_buffer: Option<RawCom>,
    pub desc: Option<SwapChainDesc>,
}

impl MockSwapChain {
    pub fn new(api: &Arc<MockD3d11>) -> Box<Self> {
        Box::new(Self { api: Arc::clone(api), back_buffer: None, desc: None })
    }
}

impl D3d11SwapChain for MockSwapChain {
    fn create(&mut self, desc: &SwapChainDesc) -> ComResult<()> {
        self.api.record(format!(
            "CreateSwapChain({}, {}, {}, {})", desc.width, desc.height, desc.format, desc.sample_count
        ));
        self.back_buffer = Some(self.api.create("GetBuffer", MockObject::BackBuffer)?);
        self.desc = Some(*desc);
        Ok(())
    }

    fn back_buffer(&self) -> ComResult<RawCom> {
        let back_buffer = self.back_buffer.ok_or(DXGI_ERROR_INVALID_CALL)?;
        self.api.add_ref(back_buffer);
        Ok(back_buffer)
    }

    fn resize_buffers(&mut self, width: u32, height: u32) -> ComResult<()> {
        self.api.record(format!("ResizeBuffers({}, {})", width, height));
        if let Some(back_buffer) = self.back_buffer {
            if self.api.references(back_buffer) > 1 {
                return Err(DXGI_ERROR_INVALID_CALL);
            }
        }
        if let Some(hresult) = self.api.take_failure("ResizeBuffers") {
            return Err(hresult);
        }
        if let Some(desc) = self.desc.as_mut() {
            desc.width = width;
            desc.height = height;
        }
        Ok(())
    }

    fn present(&mut self, sync_interval: u32) -> ComResult<()> {
        self.api.record(format!("Present({})", sync_interval));
        match self.api.take_failure("Present") {
            Some(hresult) => Err(hresult),
            None => Ok(()),
        }
    }

    fn display_modes(&self) -> Vec<UVec2> {
        self.api.state().display_modes.clone()
    }
}

impl Drop for MockSwapChain {
    fn drop(&mut self) {
        if let Some(back_buffer) = self.back_buffer.take() {
            self.api.release(back_buffer);
        }
    }
}
