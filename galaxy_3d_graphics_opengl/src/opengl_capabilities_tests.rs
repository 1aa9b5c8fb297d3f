use super::*;
use crate::mock_gl::MockGl;
use crate::opengl_api::{GlApiKind, GlVersion};

fn profile_of(gl: &MockGl, kind: GlApiKind) -> GlProfile {
    let version = GlVersion::parse(&gl.get_string(VERSION)).unwrap();
    GlProfile::new(kind, version, gl.extensions())
}

#[test]
fn test_bare_es2() {
    let gl = MockGl::es(2, 0);
    let capabilities = query_capabilities(&profile_of(&gl, GlApiKind::Es), gl.as_ref());

    assert_eq!(capabilities.api_major_version, 2);
    assert!(!capabilities.npot_textures);
    assert!(!capabilities.render_targets);
    assert!(!capabilities.multisampling);
    assert!(!capabilities.uint_indices);
    assert!(!capabilities.vertex_array_objects);
    assert!(!capabilities.copy_image);
    assert!(!capabilities.debug_markers);
    assert_eq!(capabilities.sample_count, 1);
    assert_eq!(capabilities.max_anisotropy, 1);
    assert_eq!(capabilities.clip_convention, ClipConvention::NegativeOneToOne);
}

#[test]
fn test_es2_extensions() {
    let gl = MockGl::es(2, 0);
    gl.set_extensions(&[
        "GL_OES_texture_npot",
        "GL_OES_element_index_uint",
        "GL_OES_vertex_array_object",
        "GL_EXT_texture_filter_anisotropic",
        "GL_APPLE_framebuffer_multisample",
    ]);
    gl.add_entry_points(&["glGenVertexArraysOES"]);
    gl.set_integer(MAX_TEXTURE_MAX_ANISOTROPY_EXT, 16);
    let capabilities = query_capabilities(&profile_of(&gl, GlApiKind::Es), gl.as_ref());

    assert!(capabilities.npot_textures);
    assert!(capabilities.uint_indices);
    assert!(capabilities.vertex_array_objects);
    assert!(capabilities.anisotropic_filtering);
    assert_eq!(capabilities.max_anisotropy, 16);
    // Extension advertised but its entry point was not resolved
    assert!(!capabilities.multisampling);
}

#[test]
fn test_es32_core_features() {
    let gl = MockGl::es(3, 2);
    gl.set_integer(MAX_SAMPLES, 4);
    let capabilities = query_capabilities(&profile_of(&gl, GlApiKind::Es), gl.as_ref());

    assert!(capabilities.render_targets);
    assert!(capabilities.clamp_to_border);
    assert!(capabilities.copy_image);
    assert!(capabilities.debug_markers);
    assert!(capabilities.multisampling);
    assert_eq!(capabilities.sample_count, 4);
}

#[test]
fn test_desktop_33() {
    let gl = MockGl::desktop(3, 3);
    let capabilities = query_capabilities(&profile_of(&gl, GlApiKind::Desktop), gl.as_ref());

    assert!(capabilities.npot_textures);
    assert!(capabilities.render_targets);
    assert!(capabilities.clamp_to_border);
    assert!(capabilities.uint_indices);
    assert!(capabilities.vertex_array_objects);
    assert!(capabilities.texture_max_level);
    assert!(!capabilities.anisotropic_filtering);
    assert!(!capabilities.copy_image);
    assert!(!capabilities.debug_markers);
}

#[test]
fn test_desktop_missing_entry_point() {
    let gl = MockGl::desktop(4, 6);
    gl.set_entry_points(&["glGenFramebuffers"]);
    let capabilities = query_capabilities(&profile_of(&gl, GlApiKind::Desktop), gl.as_ref());

    assert!(capabilities.render_targets);
    assert!(capabilities.anisotropic_filtering);
    assert!(!capabilities.copy_image);
    assert!(!capabilities.vertex_array_objects);
}
