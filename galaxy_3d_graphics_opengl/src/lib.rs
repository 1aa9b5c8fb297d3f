/*!
# Galaxy 3D Graphics - OpenGL Backend

OpenGL 2.0+ and OpenGL ES 2.0+ implementation of `RenderDevice`.

Every native call goes through the `GlApi` trait. `GlowApi` implements it with
the `glow` bindings, loaded from the platform's `GetProcAddress`. Optional
features (framebuffer objects, multisampling, texture copies, debug groups,
...) are queried once per context from the version, the extension string and
the entry points the loader actually resolved.

Creating the context and presenting it is left to the caller through
`GlSurface`.
*/

// Native seam
mod opengl_api;
mod opengl_constants;
mod opengl_error;
mod opengl_glow;

// Context state
mod opengl_capabilities;
mod opengl_format;
mod opengl_state_cache;

// Resources
mod opengl_blend_state;
mod opengl_buffer;
mod opengl_depth_stencil_state;
mod opengl_render_target;
mod opengl_resource;
mod opengl_shader;
mod opengl_texture;

mod opengl_render_device;

#[cfg(test)]
mod mock_gl;

pub use opengl_api::{GlApi, GlApiKind, GlProfile, GlVersion};
pub use opengl_capabilities::query_capabilities;
pub use opengl_error::{error_name, framebuffer_status_name};
pub use opengl_glow::{GlowApi, OPTIONAL_ENTRY_POINTS};
pub use opengl_render_device::{GlContextConfig, GlSurface, OglRenderDevice};
pub use opengl_resource::GlResource;
