/// Device context shared by resources, Objective-C reference ownership and
/// the resource enum stored in the device's table

use crate::metal_api::{MetalApi, RawId, SamplerDescriptor};
use crate::metal_blend_state::MetalBlendState;
use crate::metal_buffer::MetalBuffer;
use crate::metal_constants::MTL_LOD_MAX_CLAMP;
use crate::metal_depth_stencil_state::MetalDepthStencilState;
use crate::metal_error::check_creation;
use crate::metal_format::{address_mode, border_color, sampler_filters};
use crate::metal_render_target::MetalRenderTarget;
use crate::metal_shader::MetalShader;
use crate::metal_state_cache::StateCache;
use crate::metal_texture::MetalTexture;
use galaxy_3d_graphics::galaxy3d::render::{Capabilities, Color, SamplerAddressMode, SamplerFilter};
use galaxy_3d_graphics::galaxy3d::resource::{
    NativeHandle, Release, RenderResource, ResourceType, Retain, StateObjectCache,
};
use galaxy_3d_graphics::galaxy3d::Result;
use galaxy_3d_graphics::impl_resource_cast;
use std::sync::Arc;

/// Sends `retain` and `release`
#[derive(Clone)]
pub struct ObjcObject {
    api: Arc<dyn MetalApi>,
}

impl Release<RawId> for ObjcObject {
    fn release(&self, object: RawId) {
        self.api.release(object);
    }
}

impl Retain<RawId> for ObjcObject {
    fn retain(&self, object: RawId) {
        self.api.retain(object);
    }
}

/// Owned Objective-C reference; cloning retains
pub type ObjcHandle = NativeHandle<RawId, ObjcObject>;

/// Take ownership of a reference returned by a `new_*` call
pub(crate) fn objc_handle(api: &Arc<dyn MetalApi>, object: RawId) -> ObjcHandle {
    ObjcHandle::new(object, ObjcObject { api: Arc::clone(api) })
}

pub(crate) fn empty_handle(api: &Arc<dyn MetalApi>) -> ObjcHandle {
    ObjcHandle::empty(ObjcObject { api: Arc::clone(api) })
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
pub struct MetalContext {
    pub api: Arc<dyn MetalApi>,
    pub capabilities: Capabilities,
    pub state: StateCache,
    pub samplers: StateObjectCache<SamplerKey, ObjcHandle>,
    /// Default pixel format resolves to sRGB
    pub srgb: bool,
    serial: u64,
}

impl MetalContext {
    pub fn new(api: Arc<dyn MetalApi>, capabilities: Capabilities, srgb: bool) -> Self {
        Self {
            state: StateCache::new(Arc::clone(&api)),
            samplers: StateObjectCache::new(),
            api,
            capabilities,
            srgb,
            serial: 0,
        }
    }

    /// Identifier for pipeline keys, never 0 and never reused
    pub fn next_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }

    /// Shared sampler state for `key`, created on first use
    pub fn intern_sampler(&mut self, key: SamplerKey) -> Result<ObjcHandle> {
        let api = Arc::clone(&self.api);
        let max_anisotropy = self.capabilities.max_anisotropy;
        let border_supported = self.capabilities.clamp_to_border;
        self.samplers.get_or_create(key, |key| {
            let (min_filter, mag_filter, mip_filter) = sampler_filters(key.filter);
            let desc = SamplerDescriptor {
                min_filter,
                mag_filter,
                mip_filter,
                s_address_mode: address_mode(key.address[0], border_supported),
                t_address_mode: address_mode(key.address[1], border_supported),
                r_address_mode: address_mode(key.address[2], border_supported),
                max_anisotropy: key.max_anisotropy.clamp(1, max_anisotropy.max(1)),
                border_color: border_color(key.border_color),
                lod_max_clamp: MTL_LOD_MAX_CLAMP,
            };
            let sampler = check_creation(api.new_sampler_state(&desc), "Failed to create sampler state")?;
            Ok(objc_handle(&api, sampler))
        })
    }
}

pub enum MetalResource {
    Buffer(MetalBuffer),
    Texture(MetalTexture),
    Shader(MetalShader),
    RenderTarget(MetalRenderTarget),
    BlendState(MetalBlendState),
    DepthStencilState(MetalDepthStencilState),
}

impl MetalResource {
    /// Native objects the encoder state cache may still reference
    pub fn bindable_objects(&self) -> Vec<RawId> {
        match self {
            MetalResource::Buffer(buffer) => buffer.buffer().into_iter().collect(),
            MetalResource::Texture(texture) => texture.bindable_objects(),
            MetalResource::DepthStencilState(state) => vec![state.state()],
            MetalResource::Shader(_) | MetalResource::RenderTarget(_) | MetalResource::BlendState(_) => Vec::new(),
        }
    }
}

impl RenderResource for MetalResource {
    fn resource_type(&self) -> ResourceType {
        match self {
            MetalResource::Buffer(_) => ResourceType::Buffer,
            MetalResource::Texture(_) => ResourceType::Texture,
            MetalResource::Shader(_) => ResourceType::Shader,
            MetalResource::RenderTarget(_) => ResourceType::RenderTarget,
            MetalResource::BlendState(_) => ResourceType::BlendState,
            MetalResource::DepthStencilState(_) => ResourceType::DepthStencilState,
        }
    }
}

impl_resource_cast!(MetalResource, Buffer, MetalBuffer);
impl_resource_cast!(MetalResource, Texture, MetalTexture);
impl_resource_cast!(MetalResource, Shader, MetalShader);
impl_resource_cast!(MetalResource, RenderTarget, MetalRenderTarget);
impl_resource_cast!(MetalResource, BlendState, MetalBlendState);
impl_resource_cast!(MetalResource, DepthStencilState, MetalDepthStencilState);
