/// Device context shared by resources, COM reference ownership and the
/// resource enum stored in the device's table

use crate::d3d11_api::{D3d11Api, MappedSubresource, RawCom, SamplerDesc};
use crate::d3d11_blend_state::D3d11BlendState;
use crate::d3d11_buffer::D3d11Buffer;
use crate::d3d11_constants::*;
use crate::d3d11_depth_stencil_state::D3d11DepthStencilState;
use crate::d3d11_error::{call_failed, check_call, check_creation};
use crate::d3d11_format::{address_mode, sampler_filter};
use crate::d3d11_render_target::D3d11RenderTarget;
use crate::d3d11_shader::D3d11Shader;
use crate::d3d11_state_cache::StateCache;
use crate::d3d11_texture::D3d11Texture;
use galaxy_3d_graphics::galaxy3d::render::{Capabilities, Color, SamplerAddressMode, SamplerFilter};
use galaxy_3d_graphics::galaxy3d::resource::{
    NativeHandle, Release, RenderResource, ResourceType, Retain, StateObjectCache,
};
use galaxy_3d_graphics::galaxy3d::Result;
use galaxy_3d_graphics::impl_resource_cast;
use std::sync::Arc;

/// Releases and retains COM references
#[derive(Clone)]
pub struct ComObject {
    api: Arc<dyn D3d11Api>,
}

impl Release<RawCom> for ComObject {
    fn release(&self, object: RawCom) {
        self.api.release(object);
    }
}

impl Retain<RawCom> for ComObject {
    fn retain(&self, object: RawCom) {
        self.api.add_ref(object);
    }
}

/// Owned COM reference; cloning adds a reference
pub type ComHandle = NativeHandle<RawCom, ComObject>;

/// Take ownership of a reference returned by a `create_*` call
pub(crate) fn com_handle(api: &Arc<dyn D3d11Api>, object: RawCom) -> ComHandle {
    ComHandle::new(object, ComObject { api: Arc::clone(api) })
}

pub(crate) fn empty_handle(api: &Arc<dyn D3d11Api>) -> ComHandle {
    ComHandle::empty(ComObject { api: Arc::clone(api) })
}

/// Descriptor of an interned sampler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerKey {
    pub filter: SamplerFilter,
    pub address: [SamplerAddressMode; 3],
    pub max_anisotropy: u32,
    pub border_color: Color,
}

/// Everything a resource needs to talk to the device
pub struct D3d11Context {
    pub api: Arc<dyn D3d11Api>,
    pub capabilities: Capabilities,
    pub state: StateCache,
    pub samplers: StateObjectCache<SamplerKey, ComHandle>,
    /// Default pixel format resolves to sRGB
    pub srgb: bool,
}

impl D3d11Context {
    pub fn new(api: Arc<dyn D3d11Api>, capabilities: Capabilities, srgb: bool) -> Self {
        Self {
            state: StateCache::new(Arc::clone(&api)),
            samplers: StateObjectCache::new(),
            api,
            capabilities,
            srgb,
        }
    }

    /// Shared sampler state for `key`, created on first use
    pub fn intern_sampler(&mut self, key: SamplerKey) -> Result<ComHandle> {
        let api = Arc::clone(&self.api);
        let max_anisotropy = self.capabilities.max_anisotropy;
        self.samplers.get_or_create(key, |key| {
            let anisotropy = key.max_anisotropy.clamp(1, max_anisotropy.max(1));
            let desc = SamplerDesc {
                filter: sampler_filter(key.filter, anisotropy),
                address_u: address_mode(key.address[0]),
                address_v: address_mode(key.address[1]),
                address_w: address_mode(key.address[2]),
                max_anisotropy: anisotropy,
                comparison_func: D3D11_COMPARISON_NEVER,
                border_color: key.border_color.norm().to_array(),
                min_lod: 0.0,
                max_lod: D3D11_FLOAT32_MAX,
            };
            let sampler = check_creation(api.create_sampler_state(&desc), "Failed to create sampler state")?;
            Ok(com_handle(&api, sampler))
        })
    }
}

/// Mapped subresource, unmapped on drop
pub(crate) struct Mapping<'a> {
    api: &'a dyn D3d11Api,
    resource: RawCom,
    subresource: u32,
    mapped: MappedSubresource,
}

impl<'a> Mapping<'a> {
    pub fn new(api: &'a dyn D3d11Api, resource: RawCom, subresource: u32, map_type: u32, message: &str) -> Result<Self> {
        let mapped = check_call(api.map(resource, subresource, map_type), message)?;
        if mapped.data.is_null() {
            api.unmap(resource, subresource);
            return Err(call_failed(E_POINTER, message));
        }
        Ok(Self { api, resource, subresource, mapped })
    }

    /// Copy `data` to the start of the mapping
    pub fn write(&mut self, data: &[u8]) {
        // SAFETY: the mapping covers at least the resource size, which the
        // callers check `data` against
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), self.mapped.data, data.len());
        }
    }

    /// Copy `rows` tightly packed rows of `row_size` bytes, honoring the
    /// driver's row pitch
    pub fn write_rows(&mut self, data: &[u8], row_size: usize, rows: usize) {
        let pitch = self.mapped.row_pitch as usize;
        for (row, source) in data.chunks(row_size).take(rows).enumerate() {
            // SAFETY: a mapped texture level holds `rows` rows of `pitch >= row_size` bytes
            unsafe {
                std::ptr::copy_nonoverlapping(source.as_ptr(), self.mapped.data.add(row * pitch), source.len());
            }
        }
    }
}

impl Drop for Mapping<'_> {
    fn drop(&mut self) {
        self.api.unmap(self.resource, self.subresource);
    }
}

pub enum D3d11Resource {
    Buffer(D3d11Buffer),
    Texture(D3d11Texture),
    Shader(D3d11Shader),
    RenderTarget(D3d11RenderTarget),
    BlendState(D3d11BlendState),
    DepthStencilState(D3d11DepthStencilState),
}

impl D3d11Resource {
    /// Native objects the state cache may still have bound
    pub fn bindable_objects(&self) -> Vec<RawCom> {
        match self {
            D3d11Resource::Buffer(buffer) => buffer.buffer().into_iter().collect(),
            D3d11Resource::Texture(texture) => texture.bindable_objects(),
            D3d11Resource::Shader(shader) => shader.bindable_objects(),
            D3d11Resource::RenderTarget(render_target) => render_target.bindable_objects(),
            D3d11Resource::BlendState(state) => vec![state.state()],
            D3d11Resource::DepthStencilState(state) => vec![state.state()],
        }
    }
}

impl RenderResource for D3d11Resource {
    fn resource_type(&self) -> ResourceType {
        match self {
            D3d11Resource::Buffer(_) => ResourceType::Buffer,
            D3d11Resource::Texture(_) => ResourceType::Texture,
            D3d11Resource::Shader(_) => ResourceType::Shader,
            D3d11Resource::RenderTarget(_) => ResourceType::RenderTarget,
            D3d11Resource::BlendState(_) => ResourceType::BlendState,
            D3d11Resource::DepthStencilState(_) => ResourceType::DepthStencilState,
        }
    }
}

impl_resource_cast!(D3d11Resource, Buffer, D3d11Buffer);
impl_resource_cast!(D3d11Resource, Texture, D3d11Texture);
impl_resource_cast!(D3d11Resource, Shader, D3d11Shader);
impl_resource_cast!(D3d11Resource, RenderTarget, D3d11RenderTarget);
impl_resource_cast!(D3d11Resource, BlendState, D3d11BlendState);
impl_resource_cast!(D3d11Resource, DepthStencilState, D3d11DepthStencilState);
