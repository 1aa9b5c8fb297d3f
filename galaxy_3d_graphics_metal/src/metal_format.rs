/// Engine enum -> Metal value translation
///
/// Metal takes every blend factor in both equations and has scalar vertex
/// formats, so only matrix vertex types and 1-byte indices are rejected with
/// `InvalidParameter`.

use crate::metal_constants::*;
use crate::metal_error::SOURCE;
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::render::{
    BlendFactor, BlendOperation, Color, ColorMask, CompareFunction, CullMode, DataType, DrawMode, FillMode,
    PixelFormat, SamplerAddressMode, SamplerFilter, StencilOperation,
};
use galaxy_3d_graphics::galaxy3d::Result;

/// Resolve `Default` to the device's texture format
pub fn resolve_pixel_format(format: PixelFormat, srgb: bool) -> PixelFormat {
    match format {
        PixelFormat::Default if srgb => PixelFormat::RGBA8UNormSRGB,
        PixelFormat::Default => PixelFormat::RGBA8UNorm,
        other => other,
    }
}

/// Drawable format of the layer
pub fn layer_pixel_format(srgb: bool) -> u64 {
    if srgb { MTL_PIXEL_FORMAT_BGRA8_UNORM_SRGB } else { MTL_PIXEL_FORMAT_BGRA8_UNORM }
}

/// `MTLPixelFormat` of a resolved pixel format
pub fn pixel_format(format: PixelFormat) -> Result<u64> {
    Ok(match format {
        PixelFormat::A8UNorm => MTL_PIXEL_FORMAT_A8_UNORM,
        PixelFormat::R8UNorm => MTL_PIXEL_FORMAT_R8_UNORM,
        PixelFormat::R8SNorm => MTL_PIXEL_FORMAT_R8_SNORM,
        PixelFormat::R8UInt => MTL_PIXEL_FORMAT_R8_UINT,
        PixelFormat::R8SInt => MTL_PIXEL_FORMAT_R8_SINT,
        PixelFormat::R16UNorm => MTL_PIXEL_FORMAT_R16_UNORM,
        PixelFormat::R16SNorm => MTL_PIXEL_FORMAT_R16_SNORM,
        PixelFormat::R16UInt => MTL_PIXEL_FORMAT_R16_UINT,
        PixelFormat::R16SInt => MTL_PIXEL_FORMAT_R16_SINT,
        PixelFormat::R16Float => MTL_PIXEL_FORMAT_R16_FLOAT,
        PixelFormat::R32UInt => MTL_PIXEL_FORMAT_R32_UINT,
        PixelFormat::R32SInt => MTL_PIXEL_FORMAT_R32_SINT,
        PixelFormat::R32Float => MTL_PIXEL_FORMAT_R32_FLOAT,
        PixelFormat::RG8UNorm => MTL_PIXEL_FORMAT_RG8_UNORM,
        PixelFormat::RG8SNorm => MTL_PIXEL_FORMAT_RG8_SNORM,
        PixelFormat::RG8UInt => MTL_PIXEL_FORMAT_RG8_UINT,
        PixelFormat::RG8SInt => MTL_PIXEL_FORMAT_RG8_SINT,
        PixelFormat::RGBA8UNorm => MTL_PIXEL_FORMAT_RGBA8_UNORM,
        PixelFormat::RGBA8UNormSRGB => MTL_PIXEL_FORMAT_RGBA8_UNORM_SRGB,
        PixelFormat::RGBA8SNorm => MTL_PIXEL_FORMAT_RGBA8_SNORM,
        PixelFormat::RGBA8UInt => MTL_PIXEL_FORMAT_RGBA8_UINT,
        PixelFormat::RGBA8SInt => MTL_PIXEL_FORMAT_RGBA8_SINT,
        PixelFormat::RGBA16UNorm => MTL_PIXEL_FORMAT_RGBA16_UNORM,
        PixelFormat::RGBA16SNorm => MTL_PIXEL_FORMAT_RGBA16_SNORM,
        PixelFormat::RGBA16UInt => MTL_PIXEL_FORMAT_RGBA16_UINT,
        PixelFormat::RGBA16SInt => MTL_PIXEL_FORMAT_RGBA16_SINT,
        PixelFormat::RGBA16Float => MTL_PIXEL_FORMAT_RGBA16_FLOAT,
        PixelFormat::RGBA32UInt => MTL_PIXEL_FORMAT_RGBA32_UINT,
        PixelFormat::RGBA32SInt => MTL_PIXEL_FORMAT_RGBA32_SINT,
        PixelFormat::RGBA32Float => MTL_PIXEL_FORMAT_RGBA32_FLOAT,
        PixelFormat::Depth => MTL_PIXEL_FORMAT_DEPTH32_FLOAT,
        PixelFormat::DepthStencil => MTL_PIXEL_FORMAT_DEPTH32_FLOAT_STENCIL8,
        PixelFormat::Default => {
            engine_bail!(SOURCE, InvalidParameter, "Default pixel format must be resolved first")
        }
    })
}

/// Whether a depth format also carries stencil
pub fn has_stencil(format: u64) -> bool {
    matches!(format, MTL_PIXEL_FORMAT_DEPTH24_UNORM_STENCIL8 | MTL_PIXEL_FORMAT_DEPTH32_FLOAT_STENCIL8)
}

/// `MTLVertexFormat` of a vertex attribute
pub fn vertex_format(data_type: DataType) -> Result<u64> {
    use DataType::*;
    Ok(match data_type {
        Byte => MTL_VERTEX_FORMAT_CHAR,
        ByteNorm => MTL_VERTEX_FORMAT_CHAR_NORMALIZED,
        UnsignedByte => MTL_VERTEX_FORMAT_UCHAR,
        UnsignedByteNorm => MTL_VERTEX_FORMAT_UCHAR_NORMALIZED,
        ByteVector2 => MTL_VERTEX_FORMAT_CHAR2,
        ByteVector2Norm => MTL_VERTEX_FORMAT_CHAR2_NORMALIZED,
        UnsignedByteVector2 => MTL_VERTEX_FORMAT_UCHAR2,
        UnsignedByteVector2Norm => MTL_VERTEX_FORMAT_UCHAR2_NORMALIZED,
        ByteVector3 => MTL_VERTEX_FORMAT_CHAR3,
        ByteVector3Norm => MTL_VERTEX_FORMAT_CHAR3_NORMALIZED,
        UnsignedByteVector3 => MTL_VERTEX_FORMAT_UCHAR3,
        UnsignedByteVector3Norm => MTL_VERTEX_FORMAT_UCHAR3_NORMALIZED,
        ByteVector4 => MTL_VERTEX_FORMAT_CHAR4,
        ByteVector4Norm => MTL_VERTEX_FORMAT_CHAR4_NORMALIZED,
        UnsignedByteVector4 => MTL_VERTEX_FORMAT_UCHAR4,
        UnsignedByteVector4Norm => MTL_VERTEX_FORMAT_UCHAR4_NORMALIZED,
        Short => MTL_VERTEX_FORMAT_SHORT,
        ShortNorm => MTL_VERTEX_FORMAT_SHORT_NORMALIZED,
        UnsignedShort => MTL_VERTEX_FORMAT_USHORT,
        UnsignedShortNorm => MTL_VERTEX_FORMAT_USHORT_NORMALIZED,
        ShortVector2 => MTL_VERTEX_FORMAT_SHORT2,
        ShortVector2Norm => MTL_VERTEX_FORMAT_SHORT2_NORMALIZED,
        UnsignedShortVector2 => MTL_VERTEX_FORMAT_USHORT2,
        UnsignedShortVector2Norm => MTL_VERTEX_FORMAT_USHORT2_NORMALIZED,
        ShortVector3 => MTL_VERTEX_FORMAT_SHORT3,
        ShortVector3Norm => MTL_VERTEX_FORMAT_SHORT3_NORMALIZED,
        UnsignedShortVector3 => MTL_VERTEX_FORMAT_USHORT3,
        UnsignedShortVector3Norm => MTL_VERTEX_FORMAT_USHORT3_NORMALIZED,
        ShortVector4 => MTL_VERTEX_FORMAT_SHORT4,
        ShortVector4Norm => MTL_VERTEX_FORMAT_SHORT4_NORMALIZED,
        UnsignedShortVector4 => MTL_VERTEX_FORMAT_USHORT4,
        UnsignedShortVector4Norm => MTL_VERTEX_FORMAT_USHORT4_NORMALIZED,
        Integer => MTL_VERTEX_FORMAT_INT,
        UnsignedInteger => MTL_VERTEX_FORMAT_UINT,
        IntegerVector2 => MTL_VERTEX_FORMAT_INT2,
        UnsignedIntegerVector2 => MTL_VERTEX_FORMAT_UINT2,
        IntegerVector3 => MTL_VERTEX_FORMAT_INT3,
        UnsignedIntegerVector3 => MTL_VERTEX_FORMAT_UINT3,
        IntegerVector4 => MTL_VERTEX_FORMAT_INT4,
        UnsignedIntegerVector4 => MTL_VERTEX_FORMAT_UINT4,
        Float => MTL_VERTEX_FORMAT_FLOAT,
        FloatVector2 => MTL_VERTEX_FORMAT_FLOAT2,
        FloatVector3 => MTL_VERTEX_FORMAT_FLOAT3,
        FloatVector4 => MTL_VERTEX_FORMAT_FLOAT4,
        FloatMatrix3 | FloatMatrix4 => {
            engine_bail!(SOURCE, InvalidParameter, "Invalid vertex format {:?}", data_type)
        }
    })
}

pub fn blend_factor(factor: BlendFactor) -> u64 {
    match factor {
        BlendFactor::Zero => MTL_BLEND_FACTOR_ZERO,
        BlendFactor::One => MTL_BLEND_FACTOR_ONE,
        BlendFactor::SrcColor => MTL_BLEND_FACTOR_SOURCE_COLOR,
        BlendFactor::InvSrcColor => MTL_BLEND_FACTOR_ONE_MINUS_SOURCE_COLOR,
        BlendFactor::SrcAlpha => MTL_BLEND_FACTOR_SOURCE_ALPHA,
        BlendFactor::InvSrcAlpha => MTL_BLEND_FACTOR_ONE_MINUS_SOURCE_ALPHA,
        BlendFactor::DestAlpha => MTL_BLEND_FACTOR_DESTINATION_ALPHA,
        BlendFactor::InvDestAlpha => MTL_BLEND_FACTOR_ONE_MINUS_DESTINATION_ALPHA,
        BlendFactor::DestColor => MTL_BLEND_FACTOR_DESTINATION_COLOR,
        BlendFactor::InvDestColor => MTL_BLEND_FACTOR_ONE_MINUS_DESTINATION_COLOR,
        BlendFactor::SrcAlphaSat => MTL_BLEND_FACTOR_SOURCE_ALPHA_SATURATED,
        BlendFactor::BlendFactor => MTL_BLEND_FACTOR_BLEND_COLOR,
        BlendFactor::InvBlendFactor => MTL_BLEND_FACTOR_ONE_MINUS_BLEND_COLOR,
    }
}

pub fn blend_operation(operation: BlendOperation) -> u64 {
    match operation {
        BlendOperation::Add => MTL_BLEND_OPERATION_ADD,
        BlendOperation::Subtract => MTL_BLEND_OPERATION_SUBTRACT,
        BlendOperation::ReverseSubtract => MTL_BLEND_OPERATION_REVERSE_SUBTRACT,
        BlendOperation::Min => MTL_BLEND_OPERATION_MIN,
        BlendOperation::Max => MTL_BLEND_OPERATION_MAX,
    }
}

/// Metal orders the channel bits alpha-first
pub fn color_write_mask(mask: ColorMask) -> u64 {
    let mut write_mask = MTL_COLOR_WRITE_MASK_NONE;
    if mask.contains(ColorMask::RED) {
        write_mask |= MTL_COLOR_WRITE_MASK_RED;
    }
    if mask.contains(ColorMask::GREEN) {
        write_mask |= MTL_COLOR_WRITE_MASK_GREEN;
    }
    if mask.contains(ColorMask::BLUE) {
        write_mask |= MTL_COLOR_WRITE_MASK_BLUE;
    }
    if mask.contains(ColorMask::ALPHA) {
        write_mask |= MTL_COLOR_WRITE_MASK_ALPHA;
    }
    write_mask
}

pub fn compare_function(function: CompareFunction) -> u64 {
    match function {
        CompareFunction::Never => MTL_COMPARE_FUNCTION_NEVER,
        CompareFunction::Less => MTL_COMPARE_FUNCTION_LESS,
        CompareFunction::Equal => MTL_COMPARE_FUNCTION_EQUAL,
        CompareFunction::LessEqual => MTL_COMPARE_FUNCTION_LESS_EQUAL,
        CompareFunction::Greater => MTL_COMPARE_FUNCTION_GREATER,
        CompareFunction::NotEqual => MTL_COMPARE_FUNCTION_NOT_EQUAL,
        CompareFunction::GreaterEqual => MTL_COMPARE_FUNCTION_GREATER_EQUAL,
        CompareFunction::Always => MTL_COMPARE_FUNCTION_ALWAYS,
    }
}

pub fn stencil_operation(operation: StencilOperation) -> u64 {
    match operation {
        StencilOperation::Keep => MTL_STENCIL_OPERATION_KEEP,
        StencilOperation::Zero => MTL_STENCIL_OPERATION_ZERO,
        StencilOperation::Replace => MTL_STENCIL_OPERATION_REPLACE,
        StencilOperation::IncrementClamp => MTL_STENCIL_OPERATION_INCREMENT_CLAMP,
        StencilOperation::DecrementClamp => MTL_STENCIL_OPERATION_DECREMENT_CLAMP,
        StencilOperation::Invert => MTL_STENCIL_OPERATION_INVERT,
        StencilOperation::IncrementWrap => MTL_STENCIL_OPERATION_INCREMENT_WRAP,
        StencilOperation::DecrementWrap => MTL_STENCIL_OPERATION_DECREMENT_WRAP,
    }
}

/// Clamp-to-border falls back to clamp-to-zero where border colors are unsupported
pub fn address_mode(mode: SamplerAddressMode, border_color_supported: bool) -> u64 {
    match mode {
        SamplerAddressMode::ClampToEdge => MTL_SAMPLER_ADDRESS_MODE_CLAMP_TO_EDGE,
        SamplerAddressMode::ClampToBorder if border_color_supported => MTL_SAMPLER_ADDRESS_MODE_CLAMP_TO_BORDER_COLOR,
        SamplerAddressMode::ClampToBorder => MTL_SAMPLER_ADDRESS_MODE_CLAMP_TO_ZERO,
        SamplerAddressMode::Repeat => MTL_SAMPLER_ADDRESS_MODE_REPEAT,
        SamplerAddressMode::MirrorRepeat => MTL_SAMPLER_ADDRESS_MODE_MIRROR_REPEAT,
    }
}

/// Metal only has three border colors: transparent black, opaque black and opaque white
pub fn border_color(color: Color) -> u64 {
    if color.a < 128 {
        MTL_SAMPLER_BORDER_COLOR_TRANSPARENT_BLACK
    } else if u32::from(color.r) + u32::from(color.g) + u32::from(color.b) >= 3 * 128 {
        MTL_SAMPLER_BORDER_COLOR_OPAQUE_WHITE
    } else {
        MTL_SAMPLER_BORDER_COLOR_OPAQUE_BLACK
    }
}

/// Min, mag and mip filters
pub fn sampler_filters(filter: SamplerFilter) -> (u64, u64, u64) {
    match filter {
        SamplerFilter::Point => (
            MTL_SAMPLER_MIN_MAG_FILTER_NEAREST,
            MTL_SAMPLER_MIN_MAG_FILTER_NEAREST,
            MTL_SAMPLER_MIP_FILTER_NEAREST,
        ),
        SamplerFilter::Linear => (
            MTL_SAMPLER_MIN_MAG_FILTER_LINEAR,
            MTL_SAMPLER_MIN_MAG_FILTER_NEAREST,
            MTL_SAMPLER_MIP_FILTER_NEAREST,
        ),
        SamplerFilter::Bilinear => (
            MTL_SAMPLER_MIN_MAG_FILTER_LINEAR,
            MTL_SAMPLER_MIN_MAG_FILTER_LINEAR,
            MTL_SAMPLER_MIP_FILTER_NEAREST,
        ),
        SamplerFilter::Trilinear => (
            MTL_SAMPLER_MIN_MAG_FILTER_LINEAR,
            MTL_SAMPLER_MIN_MAG_FILTER_LINEAR,
            MTL_SAMPLER_MIP_FILTER_LINEAR,
        ),
    }
}

pub fn primitive_type(mode: DrawMode) -> u64 {
    match mode {
        DrawMode::PointList => MTL_PRIMITIVE_TYPE_POINT,
        DrawMode::LineList => MTL_PRIMITIVE_TYPE_LINE,
        DrawMode::LineStrip => MTL_PRIMITIVE_TYPE_LINE_STRIP,
        DrawMode::TriangleList => MTL_PRIMITIVE_TYPE_TRIANGLE,
        DrawMode::TriangleStrip => MTL_PRIMITIVE_TYPE_TRIANGLE_STRIP,
    }
}

pub fn cull_mode(mode: CullMode) -> u64 {
    match mode {
        CullMode::None => MTL_CULL_MODE_NONE,
        CullMode::Front => MTL_CULL_MODE_FRONT,
        CullMode::Back => MTL_CULL_MODE_BACK,
    }
}

pub fn fill_mode(mode: FillMode) -> u64 {
    match mode {
        FillMode::Solid => MTL_TRIANGLE_FILL_MODE_FILL,
        FillMode::Wireframe => MTL_TRIANGLE_FILL_MODE_LINES,
    }
}

/// Index type for 2- and 4-byte indices
pub fn index_type(index_size: u32) -> Result<u64> {
    match index_size {
        2 => Ok(MTL_INDEX_TYPE_UINT16),
        4 => Ok(MTL_INDEX_TYPE_UINT32),
        _ => engine_bail!(SOURCE, InvalidParameter, "Invalid index size {}", index_size),
    }
}

#[cfg(test)]
#[path = "metal_format_tests.rs"]
mod tests;
