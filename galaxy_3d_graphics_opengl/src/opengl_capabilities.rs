/// Capability probing
///
/// A feature is available when the context version makes it core, or when
/// one of the extensions providing it is advertised. Features that come with
/// entry points additionally require the loader to have resolved them.

use crate::opengl_api::{GlApi, GlProfile};
use crate::opengl_constants::*;
use crate::opengl_error::SOURCE;
use galaxy_3d_graphics::engine_debug;
use galaxy_3d_graphics::galaxy3d::render::{Capabilities, ClipConvention};

/// Resolves features against the profile and the loaded entry points
struct ProcResolver<'a> {
    profile: &'a GlProfile,
    api: &'a dyn GlApi,
}

impl<'a> ProcResolver<'a> {
    /// Entry point `name` from core `version`, or one of `(extension, entry point)`
    fn resolve(&self, version: (u16, u16), name: &str, extensions: &[(&str, &str)]) -> bool {
        if self.profile.at_least(version.0, version.1) {
            return self.api.has_entry_point(name);
        }
        extensions
            .iter()
            .any(|(extension, name)| self.profile.has_extension(extension) && self.api.has_entry_point(name))
    }

    /// Feature without entry points: core `version` or any of `extensions`
    fn feature(&self, version: (u16, u16), extensions: &[&str]) -> bool {
        self.profile.at_least(version.0, version.1)
            || extensions.iter().any(|extension| self.profile.has_extension(extension))
    }

    /// Feature only available through `extensions`
    fn extension(&self, extensions: &[&str]) -> bool {
        extensions.iter().any(|extension| self.profile.has_extension(extension))
    }
}

/// Query the features of the current context
pub fn query_capabilities(profile: &GlProfile, api: &dyn GlApi) -> Capabilities {
    let resolver = ProcResolver { profile, api };
    let mut capabilities = Capabilities {
        api_major_version: profile.version.major,
        api_minor_version: profile.version.minor,
        clip_convention: ClipConvention::NegativeOneToOne,
        ..Capabilities::default()
    };

    if profile.is_es() {
        capabilities.npot_textures = resolver.feature((3, 0), &["GL_OES_texture_npot"]);
        capabilities.render_targets = resolver.resolve((3, 0), "glGenFramebuffers", &[]);
        capabilities.clamp_to_border =
            resolver.feature((3, 2), &["GL_EXT_texture_border_clamp", "GL_OES_texture_border_clamp"]);
        capabilities.multisampling = resolver.resolve(
            (3, 0),
            "glRenderbufferStorageMultisample",
            &[
                ("GL_APPLE_framebuffer_multisample", "glRenderbufferStorageMultisampleAPPLE"),
                ("GL_EXT_multisampled_render_to_texture", "glRenderbufferStorageMultisampleEXT"),
                ("GL_IMG_multisampled_render_to_texture", "glRenderbufferStorageMultisampleIMG"),
            ],
        );
        capabilities.texture_base_level = resolver.feature((3, 0), &[]);
        capabilities.texture_max_level = resolver.feature((3, 0), &["GL_APPLE_texture_max_level"]);
        capabilities.uint_indices = resolver.feature((3, 0), &["GL_OES_element_index_uint"]);
        capabilities.anisotropic_filtering = resolver.extension(&["GL_EXT_texture_filter_anisotropic"]);
        capabilities.vertex_array_objects = resolver.resolve(
            (3, 0),
            "glGenVertexArrays",
            &[("GL_OES_vertex_array_object", "glGenVertexArraysOES")],
        );
        capabilities.copy_image = resolver.resolve(
            (3, 2),
            "glCopyImageSubData",
            &[
                ("GL_EXT_copy_image", "glCopyImageSubDataEXT"),
                ("GL_OES_copy_image", "glCopyImageSubDataOES"),
            ],
        );
        capabilities.debug_markers =
            resolver.resolve((3, 2), "glPushDebugGroup", &[("GL_KHR_debug", "glPushDebugGroupKHR")]);
    } else {
        capabilities.npot_textures = resolver.feature((2, 0), &[]);
        capabilities.render_targets = resolver.resolve(
            (3, 0),
            "glGenFramebuffers",
            &[
                ("GL_ARB_framebuffer_object", "glGenFramebuffers"),
                ("GL_EXT_framebuffer_object", "glGenFramebuffersEXT"),
            ],
        );
        capabilities.clamp_to_border = resolver.feature((1, 3), &[]);
        capabilities.multisampling = resolver.resolve(
            (3, 0),
            "glRenderbufferStorageMultisample",
            &[("GL_EXT_framebuffer_multisample", "glRenderbufferStorageMultisampleEXT")],
        );
        capabilities.texture_base_level = resolver.feature((1, 3), &[]);
        capabilities.texture_max_level = resolver.feature((1, 3), &[]);
        capabilities.uint_indices = resolver.feature((2, 0), &[]);
        capabilities.anisotropic_filtering = resolver.feature(
            (4, 6),
            &["GL_EXT_texture_filter_anisotropic", "GL_ARB_texture_filter_anisotropic"],
        );
        capabilities.vertex_array_objects = resolver.resolve(
            (3, 0),
            "glGenVertexArrays",
            &[
                ("GL_ARB_vertex_array_object", "glGenVertexArrays"),
                ("GL_APPLE_vertex_array_object", "glGenVertexArraysAPPLE"),
            ],
        );
        capabilities.copy_image =
            resolver.resolve((4, 3), "glCopyImageSubData", &[("GL_ARB_copy_image", "glCopyImageSubData")]);
        capabilities.debug_markers =
            resolver.resolve((4, 3), "glPushDebugGroup", &[("GL_KHR_debug", "glPushDebugGroup")]);
    }

    if capabilities.anisotropic_filtering {
        capabilities.max_anisotropy = api.get_integer(MAX_TEXTURE_MAX_ANISOTROPY_EXT).max(1) as u32;
    }
    if capabilities.multisampling {
        capabilities.sample_count = api.get_integer(MAX_SAMPLES).max(1) as u32;
    }

    engine_debug!(SOURCE, "OpenGL capabilities: {:?}", capabilities);
    capabilities
}

#[cfg(test)]
#[path = "opengl_capabilities_tests.rs"]
mod tests;
