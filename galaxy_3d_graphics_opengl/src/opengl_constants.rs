/// OpenGL enum values used by the backend
///
/// Values are identical between desktop OpenGL and OpenGL ES unless noted.
/// Core and ES enums come from `glow`; the legacy and extension enums below
/// are spelled out.

pub type GLenum = u32;
pub type GLuint = u32;
pub type GLint = i32;
pub type GLsizei = i32;
pub type GLbitfield = u32;

// Errors
pub use glow::{
    NO_ERROR, INVALID_ENUM, INVALID_VALUE, INVALID_OPERATION, STACK_OVERFLOW, STACK_UNDERFLOW,
    OUT_OF_MEMORY, INVALID_FRAMEBUFFER_OPERATION, CONTEXT_LOST, NONE,
};

// Blend factors
pub use glow::{
    ZERO, ONE, SRC_COLOR, ONE_MINUS_SRC_COLOR, SRC_ALPHA, ONE_MINUS_SRC_ALPHA, DST_ALPHA,
    ONE_MINUS_DST_ALPHA, DST_COLOR, ONE_MINUS_DST_COLOR, SRC_ALPHA_SATURATE, CONSTANT_COLOR,
    ONE_MINUS_CONSTANT_COLOR,
};

// Blend equations
pub use glow::{FUNC_ADD, MIN, MAX, FUNC_SUBTRACT, FUNC_REVERSE_SUBTRACT};

// Compare functions
pub use glow::{NEVER, LESS, EQUAL, LEQUAL, GREATER, NOTEQUAL, GEQUAL, ALWAYS};

// Stencil operations
pub use glow::{KEEP, REPLACE, INCR, DECR, INVERT, INCR_WRAP, DECR_WRAP};

// Faces and rasterization
pub use glow::{FRONT, BACK, FRONT_AND_BACK, CW, CCW, LINE, FILL};

// Primitives
pub use glow::{POINTS, LINES, LINE_STRIP, TRIANGLES, TRIANGLE_STRIP};

// Data types
pub use glow::{
    BYTE, UNSIGNED_BYTE, SHORT, UNSIGNED_SHORT, INT, UNSIGNED_INT, FLOAT, HALF_FLOAT,
    UNSIGNED_INT_24_8,
};

// Buffers
pub use glow::{ARRAY_BUFFER, ELEMENT_ARRAY_BUFFER, STATIC_DRAW, DYNAMIC_DRAW};

// Texture targets
pub use glow::{
    TEXTURE_1D, TEXTURE_2D, TEXTURE_3D, TEXTURE_CUBE_MAP, TEXTURE_CUBE_MAP_POSITIVE_X,
    TEXTURE_CUBE_MAP_NEGATIVE_X, TEXTURE_CUBE_MAP_POSITIVE_Y, TEXTURE_CUBE_MAP_NEGATIVE_Y,
    TEXTURE_CUBE_MAP_POSITIVE_Z, TEXTURE_CUBE_MAP_NEGATIVE_Z, TEXTURE_2D_MULTISAMPLE, TEXTURE0,
};

// Texture parameters
pub use glow::{
    TEXTURE_MAG_FILTER, TEXTURE_MIN_FILTER, TEXTURE_WRAP_S, TEXTURE_WRAP_T, TEXTURE_WRAP_R,
    TEXTURE_BORDER_COLOR, TEXTURE_BASE_LEVEL, TEXTURE_MAX_LEVEL,
};

// Filters and wrap modes
pub use glow::{
    NEAREST, LINEAR, NEAREST_MIPMAP_NEAREST, LINEAR_MIPMAP_NEAREST, LINEAR_MIPMAP_LINEAR, REPEAT,
    CLAMP_TO_BORDER, CLAMP_TO_EDGE, MIRRORED_REPEAT,
};

// Pixel formats
pub use glow::{
    DEPTH_COMPONENT, RED, ALPHA, RGBA, RG, RG_INTEGER, RED_INTEGER, RGBA_INTEGER, DEPTH_STENCIL,
};

// Internal formats
pub use glow::{
    RGBA8, RGBA16, R8, R16, RG8, R16F, R32F, R8I, R8UI, R16I, R16UI, R32I, R32UI, RG8I, RG8UI,
    RGBA32F, RGBA16F, SRGB8_ALPHA8, RGBA32UI, RGBA16UI, RGBA8UI, RGBA32I, RGBA16I, RGBA8I, R8_SNORM,
    RG8_SNORM, RGBA8_SNORM, R16_SNORM, RGBA16_SNORM, DEPTH_COMPONENT24, DEPTH24_STENCIL8,
};

// Framebuffers
pub use glow::{
    FRAMEBUFFER, RENDERBUFFER, COLOR_ATTACHMENT0, DEPTH_ATTACHMENT, DEPTH_STENCIL_ATTACHMENT,
    FRAMEBUFFER_COMPLETE, FRAMEBUFFER_INCOMPLETE_ATTACHMENT,
    FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT, FRAMEBUFFER_INCOMPLETE_DIMENSIONS,
    FRAMEBUFFER_UNSUPPORTED,
};

// Clear bits
pub use glow::{DEPTH_BUFFER_BIT, STENCIL_BUFFER_BIT, COLOR_BUFFER_BIT};

// Capabilities for glEnable / glDisable
pub use glow::{
    CULL_FACE, DEPTH_TEST, STENCIL_TEST, DITHER, BLEND, SCISSOR_TEST, MULTISAMPLE, FRAMEBUFFER_SRGB,
};

// Shaders
pub use glow::{FRAGMENT_SHADER, VERTEX_SHADER, COMPILE_STATUS, LINK_STATUS};

// Queries
pub use glow::{VENDOR, RENDERER, VERSION, MAX_SAMPLES};

// Debug output
pub use glow::DEBUG_SOURCE_APPLICATION;

// Legacy alpha-only internal format (OpenGL 2, OpenGL ES 2 with OES_required_internalformat)
pub const ALPHA8: GLenum = 0x803C;

// EXT_texture_filter_anisotropic
pub const TEXTURE_MAX_ANISOTROPY_EXT: GLenum = 0x84FE;
pub const MAX_TEXTURE_MAX_ANISOTROPY_EXT: GLenum = 0x84FF;
