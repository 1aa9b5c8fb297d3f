/// Direct3D 11 / DXGI constants used by the backend
///
/// Values match the Windows SDK headers (d3d11.h, dxgiformat.h, winerror.h).

// ===== HRESULT =====

#[cfg(test)]
pub const S_OK: i32 = 0;
pub const E_NOTIMPL: i32 = 0x8000_4001_u32 as i32;
pub const E_POINTER: i32 = 0x8000_4003_u32 as i32;
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;
pub const E_OUTOFMEMORY: i32 = 0x8007_000E_u32 as i32;
pub const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;
pub const D3D11_ERROR_TOO_MANY_UNIQUE_STATE_OBJECTS: i32 = 0x887C_0001_u32 as i32;
pub const D3D11_ERROR_FILE_NOT_FOUND: i32 = 0x887C_0002_u32 as i32;
pub const D3D11_ERROR_TOO_MANY_UNIQUE_VIEW_OBJECTS: i32 = 0x887C_0003_u32 as i32;
pub const D3D11_ERROR_DEFERRED_CONTEXT_MAP_WITHOUT_INITIAL_DISCARD: i32 = 0x887C_0004_u32 as i32;
pub const DXGI_ERROR_INVALID_CALL: i32 = 0x887A_0001_u32 as i32;
pub const DXGI_ERROR_DEVICE_REMOVED: i32 = 0x887A_0005_u32 as i32;
pub const DXGI_ERROR_DEVICE_HUNG: i32 = 0x887A_0006_u32 as i32;
pub const DXGI_ERROR_DEVICE_RESET: i32 = 0x887A_0007_u32 as i32;
pub const DXGI_ERROR_WAS_STILL_DRAWING: i32 = 0x887A_000A_u32 as i32;
pub const DXGI_ERROR_NOT_CURRENTLY_AVAILABLE: i32 = 0x887A_0022_u32 as i32;

// ===== Feature levels =====

#[cfg(test)]
pub const D3D_FEATURE_LEVEL_9_1: u32 = 0x9100;
pub const D3D_FEATURE_LEVEL_10_0: u32 = 0xA000;
#[cfg(test)]
pub const D3D_FEATURE_LEVEL_11_0: u32 = 0xB000;

// ===== DXGI_FORMAT =====

pub const DXGI_FORMAT_R32G32B32A32_FLOAT: u32 = 2;
pub const DXGI_FORMAT_R32G32B32A32_UINT: u32 = 3;
pub const DXGI_FORMAT_R32G32B32A32_SINT: u32 = 4;
pub const DXGI_FORMAT_R32G32B32_FLOAT: u32 = 6;
pub const DXGI_FORMAT_R32G32B32_UINT: u32 = 7;
pub const DXGI_FORMAT_R32G32B32_SINT: u32 = 8;
pub const DXGI_FORMAT_R16G16B16A16_FLOAT: u32 = 10;
pub const DXGI_FORMAT_R16G16B16A16_UNORM: u32 = 11;
pub const DXGI_FORMAT_R16G16B16A16_UINT: u32 = 12;
pub const DXGI_FORMAT_R16G16B16A16_SNORM: u32 = 13;
pub const DXGI_FORMAT_R16G16B16A16_SINT: u32 = 14;
pub const DXGI_FORMAT_R32G32_FLOAT: u32 = 16;
pub const DXGI_FORMAT_R32G32_UINT: u32 = 17;
pub const DXGI_FORMAT_R32G32_SINT: u32 = 18;
pub const DXGI_FORMAT_R8G8B8A8_UNORM: u32 = 28;
pub const DXGI_FORMAT_R8G8B8A8_UNORM_SRGB: u32 = 29;
pub const DXGI_FORMAT_R8G8B8A8_UINT: u32 = 30;
pub const DXGI_FORMAT_R8G8B8A8_SNORM: u32 = 31;
pub const DXGI_FORMAT_R8G8B8A8_SINT: u32 = 32;
pub const DXGI_FORMAT_R16G16_UNORM: u32 = 35;
pub const DXGI_FORMAT_R16G16_UINT: u32 = 36;
pub const DXGI_FORMAT_R16G16_SNORM: u32 = 37;
pub const DXGI_FORMAT_R16G16_SINT: u32 = 38;
pub const DXGI_FORMAT_R32_TYPELESS: u32 = 39;
pub const DXGI_FORMAT_D32_FLOAT: u32 = 40;
pub const DXGI_FORMAT_R32_FLOAT: u32 = 41;
pub const DXGI_FORMAT_R32_UINT: u32 = 42;
pub const DXGI_FORMAT_R32_SINT: u32 = 43;
pub const DXGI_FORMAT_R24G8_TYPELESS: u32 = 44;
pub const DXGI_FORMAT_D24_UNORM_S8_UINT: u32 = 45;
pub const DXGI_FORMAT_R24_UNORM_X8_TYPELESS: u32 = 46;
pub const DXGI_FORMAT_R8G8_UNORM: u32 = 49;
pub const DXGI_FORMAT_R8G8_UINT: u32 = 50;
pub const DXGI_FORMAT_R8G8_SNORM: u32 = 51;
pub const DXGI_FORMAT_R8G8_SINT: u32 = 52;
pub const DXGI_FORMAT_R16_FLOAT: u32 = 54;
pub const DXGI_FORMAT_R16_UNORM: u32 = 56;
pub const DXGI_FORMAT_R16_UINT: u32 = 57;
pub const DXGI_FORMAT_R16_SNORM: u32 = 58;
pub const DXGI_FORMAT_R16_SINT: u32 = 59;
pub const DXGI_FORMAT_R8_UNORM: u32 = 61;
pub const DXGI_FORMAT_R8_UINT: u32 = 62;
pub const DXGI_FORMAT_R8_SNORM: u32 = 63;
pub const DXGI_FORMAT_R8_SINT: u32 = 64;
pub const DXGI_FORMAT_A8_UNORM: u32 = 65;

// ===== Resource usage and binding =====

pub const D3D11_USAGE_DEFAULT: u32 = 0;
pub const D3D11_USAGE_IMMUTABLE: u32 = 1;
pub const D3D11_USAGE_DYNAMIC: u32 = 2;

pub const D3D11_BIND_VERTEX_BUFFER: u32 = 0x1;
pub const D3D11_BIND_INDEX_BUFFER: u32 = 0x2;
pub const D3D11_BIND_CONSTANT_BUFFER: u32 = 0x4;
pub const D3D11_BIND_SHADER_RESOURCE: u32 = 0x8;
pub const D3D11_BIND_RENDER_TARGET: u32 = 0x20;
pub const D3D11_BIND_DEPTH_STENCIL: u32 = 0x40;

pub const D3D11_CPU_ACCESS_WRITE: u32 = 0x1_0000;

pub const D3D11_RESOURCE_MISC_TEXTURECUBE: u32 = 0x4;

pub const D3D11_MAP_WRITE_DISCARD: u32 = 4;

// ===== View dimensions =====

pub const D3D11_RTV_DIMENSION_TEXTURE2D: u32 = 4;
pub const D3D11_RTV_DIMENSION_TEXTURE2DMS: u32 = 6;
pub const D3D11_DSV_DIMENSION_TEXTURE2D: u32 = 3;
pub const D3D11_DSV_DIMENSION_TEXTURE2DMS: u32 = 4;
pub const D3D11_SRV_DIMENSION_TEXTURE2D: u32 = 4;
pub const D3D11_SRV_DIMENSION_TEXTURE2DMS: u32 = 6;
pub const D3D11_SRV_DIMENSION_TEXTURECUBE: u32 = 9;

// ===== Samplers =====

pub const D3D11_FILTER_MIN_MAG_MIP_POINT: u32 = 0x0;
pub const D3D11_FILTER_MIN_MAG_POINT_MIP_LINEAR: u32 = 0x1;
pub const D3D11_FILTER_MIN_MAG_LINEAR_MIP_POINT: u32 = 0x14;
pub const D3D11_FILTER_MIN_MAG_MIP_LINEAR: u32 = 0x15;
pub const D3D11_FILTER_ANISOTROPIC: u32 = 0x55;

pub const D3D11_TEXTURE_ADDRESS_WRAP: u32 = 1;
pub const D3D11_TEXTURE_ADDRESS_MIRROR: u32 = 2;
pub const D3D11_TEXTURE_ADDRESS_CLAMP: u32 = 3;
pub const D3D11_TEXTURE_ADDRESS_BORDER: u32 = 4;

pub const D3D11_FLOAT32_MAX: f32 = 3.402_823_466e38;
pub const D3D11_MAX_MAXANISOTROPY: u32 = 16;

// ===== Depth / stencil =====

pub const D3D11_COMPARISON_NEVER: u32 = 1;
pub const D3D11_COMPARISON_LESS: u32 = 2;
pub const D3D11_COMPARISON_EQUAL: u32 = 3;
pub const D3D11_COMPARISON_LESS_EQUAL: u32 = 4;
pub const D3D11_COMPARISON_GREATER: u32 = 5;
pub const D3D11_COMPARISON_NOT_EQUAL: u32 = 6;
pub const D3D11_COMPARISON_GREATER_EQUAL: u32 = 7;
pub const D3D11_COMPARISON_ALWAYS: u32 = 8;

pub const D3D11_STENCIL_OP_KEEP: u32 = 1;
pub const D3D11_STENCIL_OP_ZERO: u32 = 2;
pub const D3D11_STENCIL_OP_REPLACE: u32 = 3;
pub const D3D11_STENCIL_OP_INCR_SAT: u32 = 4;
pub const D3D11_STENCIL_OP_DECR_SAT: u32 = 5;
pub const D3D11_STENCIL_OP_INVERT: u32 = 6;
pub const D3D11_STENCIL_OP_INCR: u32 = 7;
pub const D3D11_STENCIL_OP_DECR: u32 = 8;

pub const D3D11_DEPTH_WRITE_MASK_ZERO: u32 = 0;
pub const D3D11_DEPTH_WRITE_MASK_ALL: u32 = 1;

pub const D3D11_CLEAR_DEPTH: u32 = 0x1;
pub const D3D11_CLEAR_STENCIL: u32 = 0x2;

// ===== Blending =====

pub const D3D11_BLEND_ZERO: u32 = 1;
pub const D3D11_BLEND_ONE: u32 = 2;
pub const D3D11_BLEND_SRC_COLOR: u32 = 3;
pub const D3D11_BLEND_INV_SRC_COLOR: u32 = 4;
pub const D3D11_BLEND_SRC_ALPHA: u32 = 5;
pub const D3D11_BLEND_INV_SRC_ALPHA: u32 = 6;
pub const D3D11_BLEND_DEST_ALPHA: u32 = 7;
pub const D3D11_BLEND_INV_DEST_ALPHA: u32 = 8;
pub const D3D11_BLEND_DEST_COLOR: u32 = 9;
pub const D3D11_BLEND_INV_DEST_COLOR: u32 = 10;
pub const D3D11_BLEND_SRC_ALPHA_SAT: u32 = 11;
pub const D3D11_BLEND_BLEND_FACTOR: u32 = 14;
pub const D3D11_BLEND_INV_BLEND_FACTOR: u32 = 15;

pub const D3D11_BLEND_OP_ADD: u32 = 1;
pub const D3D11_BLEND_OP_SUBTRACT: u32 = 2;
pub const D3D11_BLEND_OP_REV_SUBTRACT: u32 = 3;
pub const D3D11_BLEND_OP_MIN: u32 = 4;
pub const D3D11_BLEND_OP_MAX: u32 = 5;

pub const D3D11_COLOR_WRITE_ENABLE_RED: u8 = 1;
pub const D3D11_COLOR_WRITE_ENABLE_GREEN: u8 = 2;
pub const D3D11_COLOR_WRITE_ENABLE_BLUE: u8 = 4;
pub const D3D11_COLOR_WRITE_ENABLE_ALPHA: u8 = 8;
#[cfg(test)]
pub const D3D11_COLOR_WRITE_ENABLE_ALL: u8 = 0xF;

// ===== Rasterizer / input assembler =====

pub const D3D11_FILL_WIREFRAME: u32 = 2;
pub const D3D11_FILL_SOLID: u32 = 3;

pub const D3D11_CULL_NONE: u32 = 1;
pub const D3D11_CULL_FRONT: u32 = 2;
pub const D3D11_CULL_BACK: u32 = 3;

pub const D3D_PRIMITIVE_TOPOLOGY_UNDEFINED: u32 = 0;
pub const D3D_PRIMITIVE_TOPOLOGY_POINTLIST: u32 = 1;
pub const D3D_PRIMITIVE_TOPOLOGY_LINELIST: u32 = 2;
pub const D3D_PRIMITIVE_TOPOLOGY_LINESTRIP: u32 = 3;
pub const D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST: u32 = 4;
pub const D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP: u32 = 5;

pub const D3D11_COMMONSHADER_SAMPLER_SLOT_COUNT: usize = 16;
pub const D3D11_SIMULTANEOUS_RENDER_TARGET_COUNT: usize = 8;
