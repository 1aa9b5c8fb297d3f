/// GL context shared by resources, native object ownership and the
/// resource enum stored in the device's table

use crate::opengl_api::{GlApi, GlProfile};
use crate::opengl_blend_state::GlBlendState;
use crate::opengl_buffer::GlBuffer;
use crate::opengl_constants::GLuint;
use crate::opengl_depth_stencil_state::GlDepthStencilState;
use crate::opengl_render_target::GlRenderTarget;
use crate::opengl_shader::GlShader;
use crate::opengl_state_cache::StateCache;
use crate::opengl_texture::GlTexture;
use galaxy_3d_graphics::galaxy3d::render::Capabilities;
use galaxy_3d_graphics::galaxy3d::resource::{
    NativeHandle, Release, Reloadable, RenderResource, ResourceType,
};
use galaxy_3d_graphics::impl_resource_cast;
use std::sync::Arc;

/// Everything a resource needs to talk to the context
pub struct GlContext {
    pub api: Arc<dyn GlApi>,
    pub profile: GlProfile,
    pub capabilities: Capabilities,
    pub state: StateCache,
    /// Default pixel format resolves to sRGB
    pub srgb: bool,
}

impl GlContext {
    pub fn new(api: Arc<dyn GlApi>, profile: GlProfile, capabilities: Capabilities, srgb: bool) -> Self {
        Self {
            state: StateCache::new(Arc::clone(&api)),
            api,
            profile,
            capabilities,
            srgb,
        }
    }
}

/// Kind of GL object a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlObjectKind {
    Buffer,
    Texture,
    Renderbuffer,
    Framebuffer,
    Program,
    Shader,
}

/// Deletes GL names of one kind
pub struct GlObject {
    api: Arc<dyn GlApi>,
    kind: GlObjectKind,
}

impl GlObject {
    pub fn new(api: Arc<dyn GlApi>, kind: GlObjectKind) -> Self {
        Self { api, kind }
    }
}

impl Release<GLuint> for GlObject {
    fn release(&self, name: GLuint) {
        match self.kind {
            GlObjectKind::Buffer => self.api.delete_buffer(name),
            GlObjectKind::Texture => self.api.delete_texture(name),
            GlObjectKind::Renderbuffer => self.api.delete_renderbuffer(name),
            GlObjectKind::Framebuffer => self.api.delete_framebuffer(name),
            GlObjectKind::Program => self.api.delete_program(name),
            GlObjectKind::Shader => self.api.delete_shader(name),
        }
    }
}

/// Owned GL name, deleted on drop
pub type GlHandle = NativeHandle<GLuint, GlObject>;

pub(crate) fn empty_handle(api: &Arc<dyn GlApi>, kind: GlObjectKind) -> GlHandle {
    GlHandle::empty(GlObject::new(Arc::clone(api), kind))
}

/// Raw name of a handle, 0 when it owns nothing
pub(crate) fn name_of(handle: &GlHandle) -> GLuint {
    handle.raw().unwrap_or(0)
}

pub enum GlResource {
    Buffer(Reloadable<GlBuffer>),
    Texture(Reloadable<GlTexture>),
    Shader(Reloadable<GlShader>),
    RenderTarget(Reloadable<GlRenderTarget>),
    BlendState(GlBlendState),
    DepthStencilState(GlDepthStencilState),
}

impl RenderResource for GlResource {
    fn resource_type(&self) -> ResourceType {
        match self {
            GlResource::Buffer(_) => ResourceType::Buffer,
            GlResource::Texture(_) => ResourceType::Texture,
            GlResource::Shader(_) => ResourceType::Shader,
            GlResource::RenderTarget(_) => ResourceType::RenderTarget,
            GlResource::BlendState(_) => ResourceType::BlendState,
            GlResource::DepthStencilState(_) => ResourceType::DepthStencilState,
        }
    }

    /// Drop native names without deleting them and mark for reload
    fn invalidate(&mut self) {
        match self {
            GlResource::Buffer(buffer) => {
                buffer.get_mut().abandon();
                buffer.invalidate();
            }
            GlResource::Texture(texture) => {
                texture.get_mut().abandon();
                texture.invalidate();
            }
            GlResource::Shader(shader) => {
                shader.get_mut().abandon();
                shader.invalidate();
            }
            GlResource::RenderTarget(render_target) => {
                render_target.get_mut().abandon();
                render_target.invalidate();
            }
            GlResource::BlendState(_) | GlResource::DepthStencilState(_) => {}
        }
    }
}

impl_resource_cast!(GlResource, Buffer, Reloadable<GlBuffer>);
impl_resource_cast!(GlResource, Texture, Reloadable<GlTexture>);
impl_resource_cast!(GlResource, Shader, Reloadable<GlShader>);
impl_resource_cast!(GlResource, RenderTarget, Reloadable<GlRenderTarget>);
impl_resource_cast!(GlResource, BlendState, GlBlendState);
impl_resource_cast!(GlResource, DepthStencilState, GlDepthStencilState);
