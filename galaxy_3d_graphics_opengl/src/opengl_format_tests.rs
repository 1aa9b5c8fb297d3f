use super::*;
use crate::opengl_api::{GlApiKind, GlVersion};
use galaxy_3d_graphics::galaxy3d::Error;

fn es2() -> GlProfile {
    GlProfile::new(GlApiKind::Es, GlVersion::new(2, 0), Vec::new())
}

fn es3() -> GlProfile {
    GlProfile::new(GlApiKind::Es, GlVersion::new(3, 0), Vec::new())
}

fn desktop() -> GlProfile {
    GlProfile::new(GlApiKind::Desktop, GlVersion::new(3, 3), Vec::new())
}

// ============================================================================
// Blending
// ============================================================================

#[test]
fn test_blend_factors() {
    assert_eq!(blend_factor(BlendFactor::InvSrcAlpha), ONE_MINUS_SRC_ALPHA);
    assert_eq!(blend_factor(BlendFactor::SrcAlphaSat), SRC_ALPHA_SATURATE);
    assert_eq!(blend_factor(BlendFactor::BlendFactor), CONSTANT_COLOR);
    assert_eq!(blend_factor(BlendFactor::InvBlendFactor), ONE_MINUS_CONSTANT_COLOR);
}

#[test]
fn test_blend_min_max_requires_support() {
    assert!(matches!(
        blend_operation(BlendOperation::Max, &es2()),
        Err(Error::InvalidParameter(_))
    ));
    assert_eq!(blend_operation(BlendOperation::Max, &es3()).unwrap(), MAX);
    assert_eq!(blend_operation(BlendOperation::Min, &desktop()).unwrap(), MIN);

    let with_extension = GlProfile::new(
        GlApiKind::Es,
        GlVersion::new(2, 0),
        vec!["GL_EXT_blend_minmax".to_string()],
    );
    assert_eq!(blend_operation(BlendOperation::Min, &with_extension).unwrap(), MIN);
    assert_eq!(blend_operation(BlendOperation::Add, &es2()).unwrap(), FUNC_ADD);
}

// ============================================================================
// Rasterizer and draws
// ============================================================================

#[test]
fn test_rasterizer_tables() {
    assert_eq!(compare_function(CompareFunction::LessEqual), LEQUAL);
    assert_eq!(stencil_operation(StencilOperation::IncrementWrap), INCR_WRAP);
    assert_eq!(cull_face(CullMode::None), NONE);
    assert_eq!(cull_face(CullMode::Back), BACK);
    assert_eq!(fill_mode(FillMode::Wireframe), LINE);
    assert_eq!(draw_mode(DrawMode::TriangleStrip), TRIANGLE_STRIP);
    assert_eq!(buffer_target(BufferType::Index), ELEMENT_ARRAY_BUFFER);
}

#[test]
fn test_index_types() {
    assert_eq!(index_type(1, false).unwrap(), UNSIGNED_BYTE);
    assert_eq!(index_type(2, false).unwrap(), UNSIGNED_SHORT);
    assert_eq!(index_type(4, true).unwrap(), UNSIGNED_INT);
    assert!(matches!(index_type(4, false), Err(Error::InvalidParameter(_))));
    assert!(matches!(index_type(3, true), Err(Error::InvalidParameter(_))));
}

#[test]
fn test_vertex_types() {
    assert_eq!(vertex_type(DataType::FloatVector3).unwrap(), FLOAT);
    assert_eq!(vertex_type(DataType::UnsignedByteVector4Norm).unwrap(), UNSIGNED_BYTE);
    assert!(matches!(vertex_type(DataType::FloatMatrix4), Err(Error::InvalidParameter(_))));
}

// ============================================================================
// Textures
// ============================================================================

#[test]
fn test_texture_targets() {
    assert_eq!(texture_target(TextureType::Cube, &es2()).unwrap(), TEXTURE_CUBE_MAP);
    assert_eq!(texture_target(TextureType::OneDimensional, &desktop()).unwrap(), TEXTURE_1D);
    assert!(matches!(
        texture_target(TextureType::OneDimensional, &es3()),
        Err(Error::InvalidParameter(_))
    ));
    assert_eq!(cube_face(CubeFace::NegativeZ), TEXTURE_CUBE_MAP_NEGATIVE_Z);
}

#[test]
fn test_wrap_modes() {
    assert_eq!(wrap_mode(SamplerAddressMode::Repeat, false).unwrap(), REPEAT as GLint);
    assert_eq!(wrap_mode(SamplerAddressMode::ClampToBorder, true).unwrap(), CLAMP_TO_BORDER as GLint);
    assert!(matches!(
        wrap_mode(SamplerAddressMode::ClampToBorder, false),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn test_filters_follow_mip_count() {
    assert_eq!(filters(SamplerFilter::Point, 1), (NEAREST as GLint, NEAREST as GLint));
    assert_eq!(filters(SamplerFilter::Point, 4), (NEAREST_MIPMAP_NEAREST as GLint, NEAREST as GLint));
    assert_eq!(filters(SamplerFilter::Linear, 1), (LINEAR as GLint, NEAREST as GLint));
    assert_eq!(filters(SamplerFilter::Bilinear, 4), (LINEAR_MIPMAP_NEAREST as GLint, LINEAR as GLint));
    assert_eq!(filters(SamplerFilter::Trilinear, 4), (LINEAR_MIPMAP_LINEAR as GLint, LINEAR as GLint));
    assert_eq!(filters(SamplerFilter::Trilinear, 1), (LINEAR as GLint, LINEAR as GLint));
}

#[test]
fn test_internal_formats_es2() {
    let profile = es2();
    assert_eq!(internal_pixel_format(PixelFormat::RGBA8UNorm, &profile).unwrap(), RGBA);
    assert_eq!(internal_pixel_format(PixelFormat::A8UNorm, &profile).unwrap(), ALPHA);
    assert_eq!(internal_pixel_format(PixelFormat::Depth, &profile).unwrap(), DEPTH_COMPONENT24);
    assert!(matches!(
        internal_pixel_format(PixelFormat::R32Float, &profile),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn test_internal_formats_es3_and_desktop() {
    assert_eq!(internal_pixel_format(PixelFormat::R32Float, &es3()).unwrap(), R32F);
    assert!(internal_pixel_format(PixelFormat::RGBA16UNorm, &es3()).is_err());
    assert_eq!(internal_pixel_format(PixelFormat::RGBA16UNorm, &desktop()).unwrap(), RGBA16);
    assert_eq!(internal_pixel_format(PixelFormat::A8UNorm, &desktop()).unwrap(), ALPHA8);
    assert_eq!(internal_pixel_format(PixelFormat::RGBA8UNormSRGB, &desktop()).unwrap(), SRGB8_ALPHA8);
    assert!(internal_pixel_format(PixelFormat::Default, &desktop()).is_err());
}

#[test]
fn test_pixel_layouts() {
    assert_eq!(pixel_format(PixelFormat::RGBA8UNorm).unwrap(), RGBA);
    assert_eq!(pixel_format(PixelFormat::R16UInt).unwrap(), RED_INTEGER);
    assert_eq!(pixel_format(PixelFormat::DepthStencil).unwrap(), DEPTH_STENCIL);
    assert_eq!(pixel_type(PixelFormat::R16UNorm).unwrap(), UNSIGNED_SHORT);
    assert_eq!(pixel_type(PixelFormat::RGBA16SInt).unwrap(), SHORT);
    assert_eq!(pixel_type(PixelFormat::RGBA16Float).unwrap(), HALF_FLOAT);
    assert_eq!(pixel_type(PixelFormat::R32SInt).unwrap(), INT);
    assert_eq!(pixel_type(PixelFormat::DepthStencil).unwrap(), UNSIGNED_INT_24_8);
    assert!(pixel_type(PixelFormat::Default).is_err());
}
