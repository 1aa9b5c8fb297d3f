/// Engine enum -> OpenGL enum translation
///
/// Total mappings return the GL value directly. Mappings that depend on the
/// context (ES 2.0 lacks most sized formats, min/max blending needs an
/// extension there) return `InvalidParameter` for unsupported combinations,
/// before any native call is made.

use crate::opengl_api::GlProfile;
use crate::opengl_constants::*;
use crate::opengl_error::SOURCE;
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::render::{
    BlendFactor, BlendOperation, BufferType, CompareFunction, ComponentType, CubeFace, CullMode,
    DataType, DrawMode, FillMode, PixelFormat, SamplerAddressMode, SamplerFilter, StencilOperation,
    TextureType,
};
use galaxy_3d_graphics::galaxy3d::Result;

pub fn blend_factor(factor: BlendFactor) -> GLenum {
    match factor {
        BlendFactor::Zero => ZERO,
        BlendFactor::One => ONE,
        BlendFactor::SrcColor => SRC_COLOR,
        BlendFactor::InvSrcColor => ONE_MINUS_SRC_COLOR,
        BlendFactor::SrcAlpha => SRC_ALPHA,
        BlendFactor::InvSrcAlpha => ONE_MINUS_SRC_ALPHA,
        BlendFactor::DestAlpha => DST_ALPHA,
        BlendFactor::InvDestAlpha => ONE_MINUS_DST_ALPHA,
        BlendFactor::DestColor => DST_COLOR,
        BlendFactor::InvDestColor => ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlphaSat => SRC_ALPHA_SATURATE,
        BlendFactor::BlendFactor => CONSTANT_COLOR,
        BlendFactor::InvBlendFactor => ONE_MINUS_CONSTANT_COLOR,
    }
}

/// Blend equation; min/max need ES 3.0 or `GL_EXT_blend_minmax` on ES
pub fn blend_operation(operation: BlendOperation, profile: &GlProfile) -> Result<GLenum> {
    let minmax = !profile.is_es() || profile.at_least(3, 0) || profile.has_extension("GL_EXT_blend_minmax");
    match operation {
        BlendOperation::Add => Ok(FUNC_ADD),
        BlendOperation::Subtract => Ok(FUNC_SUBTRACT),
        BlendOperation::ReverseSubtract => Ok(FUNC_REVERSE_SUBTRACT),
        BlendOperation::Min | BlendOperation::Max if !minmax => {
            engine_bail!(SOURCE, InvalidParameter, "Blend operation {:?} is not supported", operation)
        }
        BlendOperation::Min => Ok(MIN),
        BlendOperation::Max => Ok(MAX),
    }
}

pub fn compare_function(function: CompareFunction) -> GLenum {
    match function {
        CompareFunction::Never => NEVER,
        CompareFunction::Less => LESS,
        CompareFunction::Equal => EQUAL,
        CompareFunction::LessEqual => LEQUAL,
        CompareFunction::Greater => GREATER,
        CompareFunction::NotEqual => NOTEQUAL,
        CompareFunction::GreaterEqual => GEQUAL,
        CompareFunction::Always => ALWAYS,
    }
}

pub fn stencil_operation(operation: StencilOperation) -> GLenum {
    match operation {
        StencilOperation::Keep => KEEP,
        StencilOperation::Zero => ZERO,
        StencilOperation::Replace => REPLACE,
        StencilOperation::IncrementClamp => INCR,
        StencilOperation::DecrementClamp => DECR,
        StencilOperation::Invert => INVERT,
        StencilOperation::IncrementWrap => INCR_WRAP,
        StencilOperation::DecrementWrap => DECR_WRAP,
    }
}

/// Face passed to `glCullFace` (`NONE` disables culling)
pub fn cull_face(mode: CullMode) -> GLenum {
    match mode {
        CullMode::None => NONE,
        CullMode::Front => FRONT,
        CullMode::Back => BACK,
    }
}

pub fn fill_mode(mode: FillMode) -> GLenum {
    match mode {
        FillMode::Solid => FILL,
        FillMode::Wireframe => LINE,
    }
}

pub fn draw_mode(mode: DrawMode) -> GLenum {
    match mode {
        DrawMode::PointList => POINTS,
        DrawMode::LineList => LINES,
        DrawMode::LineStrip => LINE_STRIP,
        DrawMode::TriangleList => TRIANGLES,
        DrawMode::TriangleStrip => TRIANGLE_STRIP,
    }
}

pub fn buffer_target(buffer_type: BufferType) -> GLenum {
    match buffer_type {
        BufferType::Index => ELEMENT_ARRAY_BUFFER,
        BufferType::Vertex => ARRAY_BUFFER,
    }
}

/// Index type for an index size in bytes
pub fn index_type(index_size: u32, uint_indices: bool) -> Result<GLenum> {
    match index_size {
        1 => Ok(UNSIGNED_BYTE),
        2 => Ok(UNSIGNED_SHORT),
        4 if uint_indices => Ok(UNSIGNED_INT),
        4 => engine_bail!(SOURCE, InvalidParameter, "32-bit indices are not supported"),
        _ => engine_bail!(SOURCE, InvalidParameter, "Invalid index size {}", index_size),
    }
}

/// Component type of a vertex attribute
pub fn vertex_type(data_type: DataType) -> Result<GLenum> {
    if data_type.is_matrix() {
        engine_bail!(SOURCE, InvalidParameter, "Matrix vertex attributes are not supported");
    }
    Ok(match data_type.component_type() {
        ComponentType::Byte => BYTE,
        ComponentType::UnsignedByte => UNSIGNED_BYTE,
        ComponentType::Short => SHORT,
        ComponentType::UnsignedShort => UNSIGNED_SHORT,
        ComponentType::Integer => INT,
        ComponentType::UnsignedInteger => UNSIGNED_INT,
        ComponentType::Float => FLOAT,
    })
}

pub fn texture_target(texture_type: TextureType, profile: &GlProfile) -> Result<GLenum> {
    match texture_type {
        TextureType::OneDimensional if profile.is_es() => {
            engine_bail!(SOURCE, InvalidParameter, "1D textures are not supported on OpenGL ES")
        }
        TextureType::OneDimensional => Ok(TEXTURE_1D),
        TextureType::TwoDimensional => Ok(TEXTURE_2D),
        TextureType::ThreeDimensional => Ok(TEXTURE_3D),
        TextureType::Cube => Ok(TEXTURE_CUBE_MAP),
    }
}

pub fn cube_face(face: CubeFace) -> GLenum {
    match face {
        CubeFace::PositiveX => TEXTURE_CUBE_MAP_POSITIVE_X,
        CubeFace::NegativeX => TEXTURE_CUBE_MAP_NEGATIVE_X,
        CubeFace::PositiveY => TEXTURE_CUBE_MAP_POSITIVE_Y,
        CubeFace::NegativeY => TEXTURE_CUBE_MAP_NEGATIVE_Y,
        CubeFace::PositiveZ => TEXTURE_CUBE_MAP_POSITIVE_Z,
        CubeFace::NegativeZ => TEXTURE_CUBE_MAP_NEGATIVE_Z,
    }
}

pub fn wrap_mode(address: SamplerAddressMode, clamp_to_border: bool) -> Result<GLint> {
    let mode = match address {
        SamplerAddressMode::ClampToEdge => CLAMP_TO_EDGE,
        SamplerAddressMode::ClampToBorder if !clamp_to_border => {
            engine_bail!(SOURCE, InvalidParameter, "Clamp to border is not supported")
        }
        SamplerAddressMode::ClampToBorder => CLAMP_TO_BORDER,
        SamplerAddressMode::Repeat => REPEAT,
        SamplerAddressMode::MirrorRepeat => MIRRORED_REPEAT,
    };
    Ok(mode as GLint)
}

/// `(min, mag)` filters for a texture with `mip_levels` levels
pub fn filters(filter: SamplerFilter, mip_levels: usize) -> (GLint, GLint) {
    let mipmapped = mip_levels > 1;
    let (min, mag) = match filter {
        SamplerFilter::Point => (if mipmapped { NEAREST_MIPMAP_NEAREST } else { NEAREST }, NEAREST),
        SamplerFilter::Linear => (if mipmapped { LINEAR_MIPMAP_NEAREST } else { LINEAR }, NEAREST),
        SamplerFilter::Bilinear => (if mipmapped { LINEAR_MIPMAP_NEAREST } else { LINEAR }, LINEAR),
        SamplerFilter::Trilinear => (if mipmapped { LINEAR_MIPMAP_LINEAR } else { LINEAR }, LINEAR),
    };
    (min as GLint, mag as GLint)
}

/// Sized internal format
///
/// OpenGL ES 2.0 only has unsized alpha and RGBA color formats; 16-bit
/// normalized formats do not exist on OpenGL ES at all.
pub fn internal_pixel_format(format: PixelFormat, profile: &GlProfile) -> Result<GLenum> {
    let internal = if profile.is_es() && !profile.at_least(3, 0) {
        match format {
            PixelFormat::A8UNorm => ALPHA,
            PixelFormat::RGBA8UNorm => RGBA,
            PixelFormat::Depth => DEPTH_COMPONENT24,
            PixelFormat::DepthStencil => DEPTH24_STENCIL8,
            _ => NONE,
        }
    } else {
        match format {
            PixelFormat::Default => NONE,
            PixelFormat::A8UNorm => ALPHA8,
            PixelFormat::R8UNorm => R8,
            PixelFormat::R8SNorm => R8_SNORM,
            PixelFormat::R8UInt => R8UI,
            PixelFormat::R8SInt => R8I,
            PixelFormat::R16UNorm if profile.is_es() => NONE,
            PixelFormat::R16UNorm => R16,
            PixelFormat::R16SNorm if profile.is_es() => NONE,
            PixelFormat::R16SNorm => R16_SNORM,
            PixelFormat::R16UInt => R16UI,
            PixelFormat::R16SInt => R16I,
            PixelFormat::R16Float => R16F,
            PixelFormat::R32UInt => R32UI,
            PixelFormat::R32SInt => R32I,
            PixelFormat::R32Float => R32F,
            PixelFormat::RG8UNorm => RG8,
            PixelFormat::RG8SNorm => RG8_SNORM,
            PixelFormat::RG8UInt => RG8UI,
            PixelFormat::RG8SInt => RG8I,
            PixelFormat::RGBA8UNorm => RGBA8,
            PixelFormat::RGBA8UNormSRGB => SRGB8_ALPHA8,
            PixelFormat::RGBA8SNorm => RGBA8_SNORM,
            PixelFormat::RGBA8UInt => RGBA8UI,
            PixelFormat::RGBA8SInt => RGBA8I,
            PixelFormat::RGBA16UNorm if profile.is_es() => NONE,
            PixelFormat::RGBA16UNorm => RGBA16,
            PixelFormat::RGBA16SNorm if profile.is_es() => NONE,
            PixelFormat::RGBA16SNorm => RGBA16_SNORM,
            PixelFormat::RGBA16UInt => RGBA16UI,
            PixelFormat::RGBA16SInt => RGBA16I,
            PixelFormat::RGBA16Float => RGBA16F,
            PixelFormat::RGBA32UInt => RGBA32UI,
            PixelFormat::RGBA32SInt => RGBA32I,
            PixelFormat::RGBA32Float => RGBA32F,
            PixelFormat::Depth => DEPTH_COMPONENT24,
            PixelFormat::DepthStencil => DEPTH24_STENCIL8,
        }
    };

    if internal == NONE {
        engine_bail!(SOURCE, InvalidParameter, "Pixel format {:?} is not supported", format);
    }
    Ok(internal)
}

/// Client-side pixel layout (`format` argument of `glTexImage2D`)
pub fn pixel_format(format: PixelFormat) -> Result<GLenum> {
    match format {
        PixelFormat::Default => {
            engine_bail!(SOURCE, InvalidParameter, "Pixel format must be resolved before upload")
        }
        PixelFormat::A8UNorm => Ok(ALPHA),
        PixelFormat::R8UNorm
        | PixelFormat::R8SNorm
        | PixelFormat::R16UNorm
        | PixelFormat::R16SNorm
        | PixelFormat::R16Float
        | PixelFormat::R32Float => Ok(RED),
        PixelFormat::R8UInt
        | PixelFormat::R8SInt
        | PixelFormat::R16UInt
        | PixelFormat::R16SInt
        | PixelFormat::R32UInt
        | PixelFormat::R32SInt => Ok(RED_INTEGER),
        PixelFormat::RG8UNorm | PixelFormat::RG8SNorm => Ok(RG),
        PixelFormat::RG8UInt | PixelFormat::RG8SInt => Ok(RG_INTEGER),
        PixelFormat::RGBA8UNorm
        | PixelFormat::RGBA8UNormSRGB
        | PixelFormat::RGBA8SNorm
        | PixelFormat::RGBA16UNorm
        | PixelFormat::RGBA16SNorm
        | PixelFormat::RGBA16Float
        | PixelFormat::RGBA32Float => Ok(RGBA),
        PixelFormat::RGBA8UInt
        | PixelFormat::RGBA8SInt
        | PixelFormat::RGBA16UInt
        | PixelFormat::RGBA16SInt
        | PixelFormat::RGBA32UInt
        | PixelFormat::RGBA32SInt => Ok(RGBA_INTEGER),
        PixelFormat::Depth => Ok(DEPTH_COMPONENT),
        PixelFormat::DepthStencil => Ok(DEPTH_STENCIL),
    }
}

/// Client-side component type (`type` argument of `glTexImage2D`)
pub fn pixel_type(format: PixelFormat) -> Result<GLenum> {
    match format {
        PixelFormat::Default => {
            engine_bail!(SOURCE, InvalidParameter, "Pixel format must be resolved before upload")
        }
        PixelFormat::A8UNorm
        | PixelFormat::R8UNorm
        | PixelFormat::R8UInt
        | PixelFormat::RG8UNorm
        | PixelFormat::RG8UInt
        | PixelFormat::RGBA8UNorm
        | PixelFormat::RGBA8UNormSRGB
        | PixelFormat::RGBA8UInt => Ok(UNSIGNED_BYTE),
        PixelFormat::R8SNorm
        | PixelFormat::R8SInt
        | PixelFormat::RG8SNorm
        | PixelFormat::RG8SInt
        | PixelFormat::RGBA8SNorm
        | PixelFormat::RGBA8SInt => Ok(BYTE),
        PixelFormat::R16UNorm | PixelFormat::R16UInt | PixelFormat::RGBA16UNorm | PixelFormat::RGBA16UInt => {
            Ok(UNSIGNED_SHORT)
        }
        PixelFormat::R16SNorm | PixelFormat::R16SInt | PixelFormat::RGBA16SNorm | PixelFormat::RGBA16SInt => {
            Ok(SHORT)
        }
        PixelFormat::R16Float | PixelFormat::RGBA16Float => Ok(HALF_FLOAT),
        PixelFormat::R32UInt | PixelFormat::RGBA32UInt | PixelFormat::Depth => Ok(UNSIGNED_INT),
        PixelFormat::R32SInt | PixelFormat::RGBA32SInt => Ok(INT),
        PixelFormat::R32Float | PixelFormat::RGBA32Float => Ok(FLOAT),
        PixelFormat::DepthStencil => Ok(UNSIGNED_INT_24_8),
    }
}

#[cfg(test)]
#[path = "opengl_format_tests.rs"]
mod tests;
