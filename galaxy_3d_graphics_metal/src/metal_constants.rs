/// Metal constants used by the backend
///
/// Values match the Metal framework headers (MTLPixelFormat.h,
/// MTLVertexDescriptor.h, MTLRenderPipeline.h, MTLSampler.h, ...).

// ===== Errors =====

/// Device or layer call returned `nil` (platform layer code)
pub const METAL_DEVICE_ERROR_NIL_OBJECT: i64 = 1;
/// `nextDrawable` returned `nil` (platform layer code)
pub const METAL_DEVICE_ERROR_NO_DRAWABLE: i64 = 2;

pub const MTL_LIBRARY_ERROR_UNSUPPORTED: i64 = 1;
pub const MTL_LIBRARY_ERROR_INTERNAL: i64 = 2;
pub const MTL_LIBRARY_ERROR_COMPILE_FAILURE: i64 = 3;
pub const MTL_LIBRARY_ERROR_COMPILE_WARNING: i64 = 4;
pub const MTL_LIBRARY_ERROR_FUNCTION_NOT_FOUND: i64 = 5;
pub const MTL_LIBRARY_ERROR_FILE_NOT_FOUND: i64 = 6;

pub const MTL_COMMAND_BUFFER_ERROR_INTERNAL: i64 = 1;
pub const MTL_COMMAND_BUFFER_ERROR_TIMEOUT: i64 = 2;
pub const MTL_COMMAND_BUFFER_ERROR_PAGE_FAULT: i64 = 3;
pub const MTL_COMMAND_BUFFER_ERROR_ACCESS_REVOKED: i64 = 4;
pub const MTL_COMMAND_BUFFER_ERROR_NOT_PERMITTED: i64 = 7;
pub const MTL_COMMAND_BUFFER_ERROR_OUT_OF_MEMORY: i64 = 8;
pub const MTL_COMMAND_BUFFER_ERROR_INVALID_RESOURCE: i64 = 9;
pub const MTL_COMMAND_BUFFER_ERROR_MEMORYLESS: i64 = 10;
pub const MTL_COMMAND_BUFFER_ERROR_DEVICE_REMOVED: i64 = 11;
pub const MTL_COMMAND_BUFFER_ERROR_STACK_OVERFLOW: i64 = 12;

// ===== MTLPixelFormat =====

pub const MTL_PIXEL_FORMAT_INVALID: u64 = 0;
pub const MTL_PIXEL_FORMAT_A8_UNORM: u64 = 1;
pub const MTL_PIXEL_FORMAT_R8_UNORM: u64 = 10;
pub const MTL_PIXEL_FORMAT_R8_SNORM: u64 = 12;
pub const MTL_PIXEL_FORMAT_R8_UINT: u64 = 13;
pub const MTL_PIXEL_FORMAT_R8_SINT: u64 = 14;
pub const MTL_PIXEL_FORMAT_R16_UNORM: u64 = 20;
pub const MTL_PIXEL_FORMAT_R16_SNORM: u64 = 22;
pub const MTL_PIXEL_FORMAT_R16_UINT: u64 = 23;
pub const MTL_PIXEL_FORMAT_R16_SINT: u64 = 24;
pub const MTL_PIXEL_FORMAT_R16_FLOAT: u64 = 25;
pub const MTL_PIXEL_FORMAT_RG8_UNORM: u64 = 30;
pub const MTL_PIXEL_FORMAT_RG8_SNORM: u64 = 32;
pub const MTL_PIXEL_FORMAT_RG8_UINT: u64 = 33;
pub const MTL_PIXEL_FORMAT_RG8_SINT: u64 = 34;
pub const MTL_PIXEL_FORMAT_R32_UINT: u64 = 53;
pub const MTL_PIXEL_FORMAT_R32_SINT: u64 = 54;
pub const MTL_PIXEL_FORMAT_R32_FLOAT: u64 = 55;
pub const MTL_PIXEL_FORMAT_RGBA8_UNORM: u64 = 70;
pub const MTL_PIXEL_FORMAT_RGBA8_UNORM_SRGB: u64 = 71;
pub const MTL_PIXEL_FORMAT_RGBA8_SNORM: u64 = 72;
pub const MTL_PIXEL_FORMAT_RGBA8_UINT: u64 = 73;
pub const MTL_PIXEL_FORMAT_RGBA8_SINT: u64 = 74;
pub const MTL_PIXEL_FORMAT_BGRA8_UNORM: u64 = 80;
pub const MTL_PIXEL_FORMAT_BGRA8_UNORM_SRGB: u64 = 81;
pub const MTL_PIXEL_FORMAT_RGBA16_UNORM: u64 = 110;
pub const MTL_PIXEL_FORMAT_RGBA16_SNORM: u64 = 112;
pub const MTL_PIXEL_FORMAT_RGBA16_UINT: u64 = 113;
pub const MTL_PIXEL_FORMAT_RGBA16_SINT: u64 = 114;
pub const MTL_PIXEL_FORMAT_RGBA16_FLOAT: u64 = 115;
pub const MTL_PIXEL_FORMAT_RGBA32_UINT: u64 = 123;
pub const MTL_PIXEL_FORMAT_RGBA32_SINT: u64 = 124;
pub const MTL_PIXEL_FORMAT_RGBA32_FLOAT: u64 = 125;
pub const MTL_PIXEL_FORMAT_DEPTH32_FLOAT: u64 = 252;
pub const MTL_PIXEL_FORMAT_DEPTH24_UNORM_STENCIL8: u64 = 255;
pub const MTL_PIXEL_FORMAT_DEPTH32_FLOAT_STENCIL8: u64 = 260;

// ===== MTLVertexFormat =====

pub const MTL_VERTEX_FORMAT_UCHAR2: u64 = 1;
pub const MTL_VERTEX_FORMAT_UCHAR3: u64 = 2;
pub const MTL_VERTEX_FORMAT_UCHAR4: u64 = 3;
pub const MTL_VERTEX_FORMAT_CHAR2: u64 = 4;
pub const MTL_VERTEX_FORMAT_CHAR3: u64 = 5;
pub const MTL_VERTEX_FORMAT_CHAR4: u64 = 6;
pub const MTL_VERTEX_FORMAT_UCHAR2_NORMALIZED: u64 = 7;
pub const MTL_VERTEX_FORMAT_UCHAR3_NORMALIZED: u64 = 8;
pub const MTL_VERTEX_FORMAT_UCHAR4_NORMALIZED: u64 = 9;
pub const MTL_VERTEX_FORMAT_CHAR2_NORMALIZED: u64 = 10;
pub const MTL_VERTEX_FORMAT_CHAR3_NORMALIZED: u64 = 11;
pub const MTL_VERTEX_FORMAT_CHAR4_NORMALIZED: u64 = 12;
pub const MTL_VERTEX_FORMAT_USHORT2: u64 = 13;
pub const MTL_VERTEX_FORMAT_USHORT3: u64 = 14;
pub const MTL_VERTEX_FORMAT_USHORT4: u64 = 15;
pub const MTL_VERTEX_FORMAT_SHORT2: u64 = 16;
pub const MTL_VERTEX_FORMAT_SHORT3: u64 = 17;
pub const MTL_VERTEX_FORMAT_SHORT4: u64 = 18;
pub const MTL_VERTEX_FORMAT_USHORT2_NORMALIZED: u64 = 19;
pub const MTL_VERTEX_FORMAT_USHORT3_NORMALIZED: u64 = 20;
pub const MTL_VERTEX_FORMAT_USHORT4_NORMALIZED: u64 = 21;
pub const MTL_VERTEX_FORMAT_SHORT2_NORMALIZED: u64 = 22;
pub const MTL_VERTEX_FORMAT_SHORT3_NORMALIZED: u64 = 23;
pub const MTL_VERTEX_FORMAT_SHORT4_NORMALIZED: u64 = 24;
pub const MTL_VERTEX_FORMAT_FLOAT: u64 = 28;
pub const MTL_VERTEX_FORMAT_FLOAT2: u64 = 29;
pub const MTL_VERTEX_FORMAT_FLOAT3: u64 = 30;
pub const MTL_VERTEX_FORMAT_FLOAT4: u64 = 31;
pub const MTL_VERTEX_FORMAT_INT: u64 = 32;
pub const MTL_VERTEX_FORMAT_INT2: u64 = 33;
pub const MTL_VERTEX_FORMAT_INT3: u64 = 34;
pub const MTL_VERTEX_FORMAT_INT4: u64 = 35;
pub const MTL_VERTEX_FORMAT_UINT: u64 = 36;
pub const MTL_VERTEX_FORMAT_UINT2: u64 = 37;
pub const MTL_VERTEX_FORMAT_UINT3: u64 = 38;
pub const MTL_VERTEX_FORMAT_UINT4: u64 = 39;
pub const MTL_VERTEX_FORMAT_UCHAR: u64 = 45;
pub const MTL_VERTEX_FORMAT_CHAR: u64 = 46;
pub const MTL_VERTEX_FORMAT_UCHAR_NORMALIZED: u64 = 47;
pub const MTL_VERTEX_FORMAT_CHAR_NORMALIZED: u64 = 48;
pub const MTL_VERTEX_FORMAT_USHORT: u64 = 49;
pub const MTL_VERTEX_FORMAT_SHORT: u64 = 50;
pub const MTL_VERTEX_FORMAT_USHORT_NORMALIZED: u64 = 51;
pub const MTL_VERTEX_FORMAT_SHORT_NORMALIZED: u64 = 52;

// ===== Blending =====

pub const MTL_BLEND_FACTOR_ZERO: u64 = 0;
pub const MTL_BLEND_FACTOR_ONE: u64 = 1;
pub const MTL_BLEND_FACTOR_SOURCE_COLOR: u64 = 2;
pub const MTL_BLEND_FACTOR_ONE_MINUS_SOURCE_COLOR: u64 = 3;
pub const MTL_BLEND_FACTOR_SOURCE_ALPHA: u64 = 4;
pub const MTL_BLEND_FACTOR_ONE_MINUS_SOURCE_ALPHA: u64 = 5;
pub const MTL_BLEND_FACTOR_DESTINATION_COLOR: u64 = 6;
pub const MTL_BLEND_FACTOR_ONE_MINUS_DESTINATION_COLOR: u64 = 7;
pub const MTL_BLEND_FACTOR_DESTINATION_ALPHA: u64 = 8;
pub const MTL_BLEND_FACTOR_ONE_MINUS_DESTINATION_ALPHA: u64 = 9;
pub const MTL_BLEND_FACTOR_SOURCE_ALPHA_SATURATED: u64 = 10;
pub const MTL_BLEND_FACTOR_BLEND_COLOR: u64 = 11;
pub const MTL_BLEND_FACTOR_ONE_MINUS_BLEND_COLOR: u64 = 12;

pub const MTL_BLEND_OPERATION_ADD: u64 = 0;
pub const MTL_BLEND_OPERATION_SUBTRACT: u64 = 1;
pub const MTL_BLEND_OPERATION_REVERSE_SUBTRACT: u64 = 2;
pub const MTL_BLEND_OPERATION_MIN: u64 = 3;
pub const MTL_BLEND_OPERATION_MAX: u64 = 4;

pub const MTL_COLOR_WRITE_MASK_NONE: u64 = 0;
pub const MTL_COLOR_WRITE_MASK_ALPHA: u64 = 1;
pub const MTL_COLOR_WRITE_MASK_BLUE: u64 = 2;
pub const MTL_COLOR_WRITE_MASK_GREEN: u64 = 4;
pub const MTL_COLOR_WRITE_MASK_RED: u64 = 8;
pub const MTL_COLOR_WRITE_MASK_ALL: u64 = 15;

// ===== Depth and stencil =====

pub const MTL_COMPARE_FUNCTION_NEVER: u64 = 0;
pub const MTL_COMPARE_FUNCTION_LESS: u64 = 1;
pub const MTL_COMPARE_FUNCTION_EQUAL: u64 = 2;
pub const MTL_COMPARE_FUNCTION_LESS_EQUAL: u64 = 3;
pub const MTL_COMPARE_FUNCTION_GREATER: u64 = 4;
pub const MTL_COMPARE_FUNCTION_NOT_EQUAL: u64 = 5;
pub const MTL_COMPARE_FUNCTION_GREATER_EQUAL: u64 = 6;
pub const MTL_COMPARE_FUNCTION_ALWAYS: u64 = 7;

pub const MTL_STENCIL_OPERATION_KEEP: u64 = 0;
pub const MTL_STENCIL_OPERATION_ZERO: u64 = 1;
pub const MTL_STENCIL_OPERATION_REPLACE: u64 = 2;
pub const MTL_STENCIL_OPERATION_INCREMENT_CLAMP: u64 = 3;
pub const MTL_STENCIL_OPERATION_DECREMENT_CLAMP: u64 = 4;
pub const MTL_STENCIL_OPERATION_INVERT: u64 = 5;
pub const MTL_STENCIL_OPERATION_INCREMENT_WRAP: u64 = 6;
pub const MTL_STENCIL_OPERATION_DECREMENT_WRAP: u64 = 7;

// ===== Rasterizer =====

pub const MTL_CULL_MODE_NONE: u64 = 0;
pub const MTL_CULL_MODE_FRONT: u64 = 1;
pub const MTL_CULL_MODE_BACK: u64 = 2;

pub const MTL_TRIANGLE_FILL_MODE_FILL: u64 = 0;
pub const MTL_TRIANGLE_FILL_MODE_LINES: u64 = 1;

pub const MTL_PRIMITIVE_TYPE_POINT: u64 = 0;
pub const MTL_PRIMITIVE_TYPE_LINE: u64 = 1;
pub const MTL_PRIMITIVE_TYPE_LINE_STRIP: u64 = 2;
pub const MTL_PRIMITIVE_TYPE_TRIANGLE: u64 = 3;
pub const MTL_PRIMITIVE_TYPE_TRIANGLE_STRIP: u64 = 4;

pub const MTL_INDEX_TYPE_UINT16: u64 = 0;
pub const MTL_INDEX_TYPE_UINT32: u64 = 1;

// ===== Samplers =====

pub const MTL_SAMPLER_MIN_MAG_FILTER_NEAREST: u64 = 0;
pub const MTL_SAMPLER_MIN_MAG_FILTER_LINEAR: u64 = 1;

pub const MTL_SAMPLER_MIP_FILTER_NEAREST: u64 = 1;
pub const MTL_SAMPLER_MIP_FILTER_LINEAR: u64 = 2;

pub const MTL_SAMPLER_ADDRESS_MODE_CLAMP_TO_EDGE: u64 = 0;
pub const MTL_SAMPLER_ADDRESS_MODE_REPEAT: u64 = 2;
pub const MTL_SAMPLER_ADDRESS_MODE_MIRROR_REPEAT: u64 = 3;
pub const MTL_SAMPLER_ADDRESS_MODE_CLAMP_TO_ZERO: u64 = 4;
pub const MTL_SAMPLER_ADDRESS_MODE_CLAMP_TO_BORDER_COLOR: u64 = 5;

pub const MTL_SAMPLER_BORDER_COLOR_TRANSPARENT_BLACK: u64 = 0;
pub const MTL_SAMPLER_BORDER_COLOR_OPAQUE_BLACK: u64 = 1;
pub const MTL_SAMPLER_BORDER_COLOR_OPAQUE_WHITE: u64 = 2;

/// `lodMaxClamp` default
pub const MTL_LOD_MAX_CLAMP: f32 = f32::MAX;
pub const MTL_MAX_ANISOTROPY: u32 = 16;

// ===== Render passes =====

pub const MTL_LOAD_ACTION_LOAD: u64 = 1;
pub const MTL_LOAD_ACTION_CLEAR: u64 = 2;

pub const MTL_STORE_ACTION_STORE: u64 = 1;
pub const MTL_STORE_ACTION_STORE_AND_MULTISAMPLE_RESOLVE: u64 = 3;

/// Color attachments of a render pass
pub const MTL_MAX_COLOR_ATTACHMENTS: usize = 8;
/// Fragment texture and sampler slots tracked by the backend
pub const MTL_MAX_FRAGMENT_TEXTURES: usize = 16;

// ===== Textures and buffers =====

pub const MTL_TEXTURE_TYPE_2D: u64 = 2;
pub const MTL_TEXTURE_TYPE_2D_MULTISAMPLE: u64 = 4;
pub const MTL_TEXTURE_TYPE_CUBE: u64 = 5;

pub const MTL_TEXTURE_USAGE_SHADER_READ: u64 = 1;
pub const MTL_TEXTURE_USAGE_RENDER_TARGET: u64 = 4;

pub const MTL_STORAGE_MODE_MANAGED: u64 = 1;
pub const MTL_STORAGE_MODE_PRIVATE: u64 = 2;

pub const MTL_RESOURCE_CPU_CACHE_MODE_WRITE_COMBINED: u64 = 1;
pub const MTL_RESOURCE_STORAGE_MODE_SHARED: u64 = 0;
