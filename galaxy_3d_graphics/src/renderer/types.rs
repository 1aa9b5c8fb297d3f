/// Engine-level graphics enums and small value types
///
/// Every backend translates these into its own native constants. None of them
/// carries backend knowledge.

use bitflags::bitflags;
use glam::{UVec2, Vec2, Vec4};

// ============================================================================
// Blending
// ============================================================================

/// Blend factor applied to source or destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    InvSrcColor,
    SrcAlpha,
    InvSrcAlpha,
    DestAlpha,
    InvDestAlpha,
    DestColor,
    InvDestColor,
    SrcAlphaSat,
    BlendFactor,
    InvBlendFactor,
}

/// Blend equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOperation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

bitflags! {
    /// Color channels written by the output merger
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        const RED = 0x01;
        const GREEN = 0x02;
        const BLUE = 0x04;
        const ALPHA = 0x08;
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

/// Fixed-function blend configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendStateDesc {
    pub enable_blending: bool,
    pub color_blend_source: BlendFactor,
    pub color_blend_dest: BlendFactor,
    pub color_operation: BlendOperation,
    pub alpha_blend_source: BlendFactor,
    pub alpha_blend_dest: BlendFactor,
    pub alpha_operation: BlendOperation,
    pub color_mask: ColorMask,
}

impl Default for BlendStateDesc {
    fn default() -> Self {
        Self {
            enable_blending: false,
            color_blend_source: BlendFactor::One,
            color_blend_dest: BlendFactor::Zero,
            color_operation: BlendOperation::Add,
            alpha_blend_source: BlendFactor::One,
            alpha_blend_dest: BlendFactor::Zero,
            alpha_operation: BlendOperation::Add,
            color_mask: ColorMask::ALL,
        }
    }
}

// ============================================================================
// Depth / stencil
// ============================================================================

/// Comparison used by depth and stencil tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Stencil buffer update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOperation {
    Keep,
    Zero,
    Replace,
    IncrementClamp,
    DecrementClamp,
    Invert,
    IncrementWrap,
    DecrementWrap,
}

/// Stencil configuration for one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilFaceDesc {
    pub failure_operation: StencilOperation,
    pub depth_failure_operation: StencilOperation,
    pub pass_operation: StencilOperation,
    pub compare_function: CompareFunction,
}

impl Default for StencilFaceDesc {
    fn default() -> Self {
        Self {
            failure_operation: StencilOperation::Keep,
            depth_failure_operation: StencilOperation::Keep,
            pass_operation: StencilOperation::Keep,
            compare_function: CompareFunction::Always,
        }
    }
}

/// Fixed-function depth/stencil configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilDesc {
    pub depth_test: bool,
    pub depth_write: bool,
    pub compare_function: CompareFunction,
    pub stencil_enabled: bool,
    pub stencil_read_mask: u32,
    pub stencil_write_mask: u32,
    pub front_face: StencilFaceDesc,
    pub back_face: StencilFaceDesc,
}

impl Default for DepthStencilDesc {
    fn default() -> Self {
        Self {
            depth_test: false,
            depth_write: false,
            compare_function: CompareFunction::Less,
            stencil_enabled: false,
            stencil_read_mask: 0xFFFF_FFFF,
            stencil_write_mask: 0xFFFF_FFFF,
            front_face: StencilFaceDesc::default(),
            back_face: StencilFaceDesc::default(),
        }
    }
}

// ============================================================================
// Rasterizer / draw
// ============================================================================

/// Faces discarded by the rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Polygon rasterization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillMode {
    Solid,
    Wireframe,
}

/// Primitive topology of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

// ============================================================================
// Buffers
// ============================================================================

/// What a buffer is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferType {
    Index,
    Vertex,
}

bitflags! {
    /// Creation flags shared by buffers and textures
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u32 {
        /// Contents may be replaced after creation
        const DYNAMIC = 0x01;
        /// Texture may be attached to a render target
        const BIND_RENDER_TARGET = 0x02;
        /// Render target texture may also be sampled
        const BIND_SHADER = 0x04;
        /// Multisampled render target texture may be sampled without resolve
        const BIND_SHADER_MSAA = 0x08;
    }
}

// ============================================================================
// Textures and samplers
// ============================================================================

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    OneDimensional,
    TwoDimensional,
    ThreeDimensional,
    Cube,
}

/// Face of a cube texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

/// Texture filtering quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerFilter {
    Point,
    Linear,
    Bilinear,
    Trilinear,
}

/// Behaviour outside the [0, 1] texture coordinate range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerAddressMode {
    ClampToEdge,
    ClampToBorder,
    Repeat,
    MirrorRepeat,
}

/// One mip level: dimensions and (possibly empty) pixel data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    pub size: UVec2,
    pub data: Vec<u8>,
}

impl MipLevel {
    pub fn new(size: UVec2, data: Vec<u8>) -> Self {
        Self { size, data }
    }
}

// ============================================================================
// Value types
// ============================================================================

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Normalized [0, 1] channels
    pub fn norm(&self) -> Vec4 {
        Vec4::new(self.r as f32, self.g as f32, self.b as f32, self.a as f32) / 255.0
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { position: Vec2::new(x, y), size: Vec2::new(width, height) }
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
