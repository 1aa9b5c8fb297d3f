/// Engine enum -> Direct3D 11 / DXGI value translation
///
/// Combinations Direct3D 11 cannot express (3-component byte and short
/// vertex formats, color factors in the alpha blend equation, 1-byte
/// indices) return `InvalidParameter` before any native call.

use crate::d3d11_constants::*;
use crate::d3d11_error::SOURCE;
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::render::{
    BlendFactor, BlendOperation, ColorMask, CompareFunction, CullMode, DataType, DrawMode, FillMode,
    PixelFormat, SamplerAddressMode, SamplerFilter, StencilOperation,
};
use galaxy_3d_graphics::galaxy3d::Result;

/// Resolve `Default` to the device's color format
pub fn resolve_pixel_format(format: PixelFormat, srgb: bool) -> PixelFormat {
    match format {
        PixelFormat::Default if srgb => PixelFormat::RGBA8UNormSRGB,
        PixelFormat::Default => PixelFormat::RGBA8UNorm,
        other => other,
    }
}

/// DXGI format of a resolved pixel format
pub fn pixel_format(format: PixelFormat) -> Result<u32> {
    Ok(match format {
        PixelFormat::A8UNorm => DXGI_FORMAT_A8_UNORM,
        PixelFormat::R8UNorm => DXGI_FORMAT_R8_UNORM,
        PixelFormat::R8SNorm => DXGI_FORMAT_R8_SNORM,
        PixelFormat::R8UInt => DXGI_FORMAT_R8_UINT,
        PixelFormat::R8SInt => DXGI_FORMAT_R8_SINT,
        PixelFormat::R16UNorm => DXGI_FORMAT_R16_UNORM,
        PixelFormat::R16SNorm => DXGI_FORMAT_R16_SNORM,
        PixelFormat::R16UInt => DXGI_FORMAT_R16_UINT,
        PixelFormat::R16SInt => DXGI_FORMAT_R16_SINT,
        PixelFormat::R16Float => DXGI_FORMAT_R16_FLOAT,
        PixelFormat::R32UInt => DXGI_FORMAT_R32_UINT,
        PixelFormat::R32SInt => DXGI_FORMAT_R32_SINT,
        PixelFormat::R32Float => DXGI_FORMAT_R32_FLOAT,
        PixelFormat::RG8UNorm => DXGI_FORMAT_R8G8_UNORM,
        PixelFormat::RG8SNorm => DXGI_FORMAT_R8G8_SNORM,
        PixelFormat::RG8UInt => DXGI_FORMAT_R8G8_UINT,
        PixelFormat::RG8SInt => DXGI_FORMAT_R8G8_SINT,
        PixelFormat::RGBA8UNorm => DXGI_FORMAT_R8G8B8A8_UNORM,
        PixelFormat::RGBA8UNormSRGB => DXGI_FORMAT_R8G8B8A8_UNORM_SRGB,
        PixelFormat::RGBA8SNorm => DXGI_FORMAT_R8G8B8A8_SNORM,
        PixelFormat::RGBA8UInt => DXGI_FORMAT_R8G8B8A8_UINT,
        PixelFormat::RGBA8SInt => DXGI_FORMAT_R8G8B8A8_SINT,
        PixelFormat::RGBA16UNorm => DXGI_FORMAT_R16G16B16A16_UNORM,
        PixelFormat::RGBA16SNorm => DXGI_FORMAT_R16G16B16A16_SNORM,
        PixelFormat::RGBA16UInt => DXGI_FORMAT_R16G16B16A16_UINT,
        PixelFormat::RGBA16SInt => DXGI_FORMAT_R16G16B16A16_SINT,
        PixelFormat::RGBA16Float => DXGI_FORMAT_R16G16B16A16_FLOAT,
        PixelFormat::RGBA32UInt => DXGI_FORMAT_R32G32B32A32_UINT,
        PixelFormat::RGBA32SInt => DXGI_FORMAT_R32G32B32A32_SINT,
        PixelFormat::RGBA32Float => DXGI_FORMAT_R32G32B32A32_FLOAT,
        PixelFormat::Depth => DXGI_FORMAT_D32_FLOAT,
        PixelFormat::DepthStencil => DXGI_FORMAT_D24_UNORM_S8_UINT,
        PixelFormat::Default => {
            engine_bail!(SOURCE, InvalidParameter, "Default pixel format must be resolved first")
        }
    })
}

/// Texture and shader view formats of a depth texture that is also sampled
///
/// `None` for color formats, which use the same format for both.
pub fn typeless_depth_formats(format: PixelFormat) -> Option<(u32, u32)> {
    match format {
        PixelFormat::Depth => Some((DXGI_FORMAT_R32_TYPELESS, DXGI_FORMAT_R32_FLOAT)),
        PixelFormat::DepthStencil => Some((DXGI_FORMAT_R24G8_TYPELESS, DXGI_FORMAT_R24_UNORM_X8_TYPELESS)),
        _ => None,
    }
}

/// DXGI format of a vertex attribute
pub fn vertex_format(data_type: DataType) -> Result<u32> {
    use DataType::*;
    Ok(match data_type {
        Byte => DXGI_FORMAT_R8_SINT,
        ByteNorm => DXGI_FORMAT_R8_SNORM,
        UnsignedByte => DXGI_FORMAT_R8_UINT,
        UnsignedByteNorm => DXGI_FORMAT_R8_UNORM,
        ByteVector2 => DXGI_FORMAT_R8G8_SINT,
        ByteVector2Norm => DXGI_FORMAT_R8G8_SNORM,
        UnsignedByteVector2 => DXGI_FORMAT_R8G8_UINT,
        UnsignedByteVector2Norm => DXGI_FORMAT_R8G8_UNORM,
        ByteVector4 => DXGI_FORMAT_R8G8B8A8_SINT,
        ByteVector4Norm => DXGI_FORMAT_R8G8B8A8_SNORM,
        UnsignedByteVector4 => DXGI_FORMAT_R8G8B8A8_UINT,
        UnsignedByteVector4Norm => DXGI_FORMAT_R8G8B8A8_UNORM,
        Short => DXGI_FORMAT_R16_SINT,
        ShortNorm => DXGI_FORMAT_R16_SNORM,
        UnsignedShort => DXGI_FORMAT_R16_UINT,
        UnsignedShortNorm => DXGI_FORMAT_R16_UNORM,
        ShortVector2 => DXGI_FORMAT_R16G16_SINT,
        ShortVector2Norm => DXGI_FORMAT_R16G16_SNORM,
        UnsignedShortVector2 => DXGI_FORMAT_R16G16_UINT,
        UnsignedShortVector2Norm => DXGI_FORMAT_R16G16_UNORM,
        ShortVector4 => DXGI_FORMAT_R16G16B16A16_SINT,
        ShortVector4Norm => DXGI_FORMAT_R16G16B16A16_SNORM,
        UnsignedShortVector4 => DXGI_FORMAT_R16G16B16A16_UINT,
        UnsignedShortVector4Norm => DXGI_FORMAT_R16G16B16A16_UNORM,
        Integer => DXGI_FORMAT_R32_SINT,
        UnsignedInteger => DXGI_FORMAT_R32_UINT,
        IntegerVector2 => DXGI_FORMAT_R32G32_SINT,
        UnsignedIntegerVector2 => DXGI_FORMAT_R32G32_UINT,
        IntegerVector3 => DXGI_FORMAT_R32G32B32_SINT,
        UnsignedIntegerVector3 => DXGI_FORMAT_R32G32B32_UINT,
        IntegerVector4 => DXGI_FORMAT_R32G32B32A32_SINT,
        UnsignedIntegerVector4 => DXGI_FORMAT_R32G32B32A32_UINT,
        Float => DXGI_FORMAT_R32_FLOAT,
        FloatVector2 => DXGI_FORMAT_R32G32_FLOAT,
        FloatVector3 => DXGI_FORMAT_R32G32B32_FLOAT,
        FloatVector4 => DXGI_FORMAT_R32G32B32A32_FLOAT,
        ByteVector3 | ByteVector3Norm | UnsignedByteVector3 | UnsignedByteVector3Norm | ShortVector3
        | ShortVector3Norm | UnsignedShortVector3 | UnsignedShortVector3Norm | FloatMatrix3 | FloatMatrix4 => {
            engine_bail!(SOURCE, InvalidParameter, "Invalid vertex format {:?}", data_type)
        }
    })
}

pub fn blend_factor(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => D3D11_BLEND_ZERO,
        BlendFactor::One => D3D11_BLEND_ONE,
        BlendFactor::SrcColor => D3D11_BLEND_SRC_COLOR,
        BlendFactor::InvSrcColor => D3D11_BLEND_INV_SRC_COLOR,
        BlendFactor::SrcAlpha => D3D11_BLEND_SRC_ALPHA,
        BlendFactor::InvSrcAlpha => D3D11_BLEND_INV_SRC_ALPHA,
        BlendFactor::DestAlpha => D3D11_BLEND_DEST_ALPHA,
        BlendFactor::InvDestAlpha => D3D11_BLEND_INV_DEST_ALPHA,
        BlendFactor::DestColor => D3D11_BLEND_DEST_COLOR,
        BlendFactor::InvDestColor => D3D11_BLEND_INV_DEST_COLOR,
        BlendFactor::SrcAlphaSat => D3D11_BLEND_SRC_ALPHA_SAT,
        BlendFactor::BlendFactor => D3D11_BLEND_BLEND_FACTOR,
        BlendFactor::InvBlendFactor => D3D11_BLEND_INV_BLEND_FACTOR,
    }
}

/// Factor of the alpha equation, where color factors are not allowed
pub fn alpha_blend_factor(factor: BlendFactor) -> Result<u32> {
    match factor {
        BlendFactor::SrcColor | BlendFactor::InvSrcColor | BlendFactor::DestColor | BlendFactor::InvDestColor => {
            engine_bail!(SOURCE, InvalidParameter, "Blend factor {:?} is not valid for alpha", factor)
        }
        other => Ok(blend_factor(other)),
    }
}

pub fn blend_operation(operation: BlendOperation) -> u32 {
    match operation {
        BlendOperation::Add => D3D11_BLEND_OP_ADD,
        BlendOperation::Subtract => D3D11_BLEND_OP_SUBTRACT,
        BlendOperation::ReverseSubtract => D3D11_BLEND_OP_REV_SUBTRACT,
        BlendOperation::Min => D3D11_BLEND_OP_MIN,
        BlendOperation::Max => D3D11_BLEND_OP_MAX,
    }
}

pub fn color_write_mask(mask: ColorMask) -> u8 {
    let mut write_mask = 0;
    if mask.contains(ColorMask::RED) {
        write_mask |= D3D11_COLOR_WRITE_ENABLE_RED;
    }
    if mask.contains(ColorMask::GREEN) {
        write_mask |= D3D11_COLOR_WRITE_ENABLE_GREEN;
    }
    if mask.contains(ColorMask::BLUE) {
        write_mask |= D3D11_COLOR_WRITE_ENABLE_BLUE;
    }
    if mask.contains(ColorMask::ALPHA) {
        write_mask |= D3D11_COLOR_WRITE_ENABLE_ALPHA;
    }
    write_mask
}

pub fn compare_function(function: CompareFunction) -> u32 {
    match function {
        CompareFunction::Never => D3D11_COMPARISON_NEVER,
        CompareFunction::Less => D3D11_COMPARISON_LESS,
        CompareFunction::Equal => D3D11_COMPARISON_EQUAL,
        CompareFunction::LessEqual => D3D11_COMPARISON_LESS_EQUAL,
        CompareFunction::Greater => D3D11_COMPARISON_GREATER,
        CompareFunction::NotEqual => D3D11_COMPARISON_NOT_EQUAL,
        CompareFunction::GreaterEqual => D3D11_COMPARISON_GREATER_EQUAL,
        CompareFunction::Always => D3D11_COMPARISON_ALWAYS,
    }
}

pub fn stencil_operation(operation: StencilOperation) -> u32 {
    match operation {
        StencilOperation::Keep => D3D11_STENCIL_OP_KEEP,
        StencilOperation::Zero => D3D11_STENCIL_OP_ZERO,
        StencilOperation::Replace => D3D11_STENCIL_OP_REPLACE,
        StencilOperation::IncrementClamp => D3D11_STENCIL_OP_INCR_SAT,
        StencilOperation::DecrementClamp => D3D11_STENCIL_OP_DECR_SAT,
        StencilOperation::Invert => D3D11_STENCIL_OP_INVERT,
        StencilOperation::IncrementWrap => D3D11_STENCIL_OP_INCR,
        StencilOperation::DecrementWrap => D3D11_STENCIL_OP_DECR,
    }
}

pub fn address_mode(mode: SamplerAddressMode) -> u32 {
    match mode {
        SamplerAddressMode::ClampToEdge => D3D11_TEXTURE_ADDRESS_CLAMP,
        SamplerAddressMode::ClampToBorder => D3D11_TEXTURE_ADDRESS_BORDER,
        SamplerAddressMode::Repeat => D3D11_TEXTURE_ADDRESS_WRAP,
        SamplerAddressMode::MirrorRepeat => D3D11_TEXTURE_ADDRESS_MIRROR,
    }
}

/// Sampler filter; any anisotropy above 1 selects anisotropic filtering
pub fn sampler_filter(filter: SamplerFilter, max_anisotropy: u32) -> u32 {
    if max_anisotropy > 1 {
        return D3D11_FILTER_ANISOTROPIC;
    }
    match filter {
        SamplerFilter::Point => D3D11_FILTER_MIN_MAG_MIP_POINT,
        SamplerFilter::Linear => D3D11_FILTER_MIN_MAG_POINT_MIP_LINEAR,
        SamplerFilter::Bilinear => D3D11_FILTER_MIN_MAG_LINEAR_MIP_POINT,
        SamplerFilter::Trilinear => D3D11_FILTER_MIN_MAG_MIP_LINEAR,
    }
}

pub fn primitive_topology(mode: DrawMode) -> u32 {
    match mode {
        DrawMode::PointList => D3D_PRIMITIVE_TOPOLOGY_POINTLIST,
        DrawMode::LineList => D3D_PRIMITIVE_TOPOLOGY_LINELIST,
        DrawMode::LineStrip => D3D_PRIMITIVE_TOPOLOGY_LINESTRIP,
        DrawMode::TriangleList => D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
        DrawMode::TriangleStrip => D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP,
    }
}

pub fn cull_mode(mode: CullMode) -> u32 {
    match mode {
        CullMode::None => D3D11_CULL_NONE,
        CullMode::Front => D3D11_CULL_FRONT,
        CullMode::Back => D3D11_CULL_BACK,
    }
}

pub fn fill_mode(mode: FillMode) -> u32 {
    match mode {
        FillMode::Solid => D3D11_FILL_SOLID,
        FillMode::Wireframe => D3D11_FILL_WIREFRAME,
    }
}

/// Index buffer format for 2- and 4-byte indices
pub fn index_format(index_size: u32) -> Result<u32> {
    match index_size {
        2 => Ok(DXGI_FORMAT_R16_UINT),
        4 => Ok(DXGI_FORMAT_R32_UINT),
        _ => engine_bail!(SOURCE, InvalidParameter, "Invalid index size {}", index_size),
    }
}

#[cfg(test)]
#[path = "d3d11_format_tests.rs"]
mod tests;
