/// Pixel formats understood by every backend

/// Texture pixel format
///
/// `Default` lets the device pick its preferred color format
/// (RGBA8, sRGB when the device was created with `srgb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Default,
    A8UNorm,
    R8UNorm,
    R8SNorm,
    R8UInt,
    R8SInt,
    R16UNorm,
    R16SNorm,
    R16UInt,
    R16SInt,
    R16Float,
    R32UInt,
    R32SInt,
    R32Float,
    RG8UNorm,
    RG8SNorm,
    RG8UInt,
    RG8SInt,
    RGBA8UNorm,
    RGBA8UNormSRGB,
    RGBA8SNorm,
    RGBA8UInt,
    RGBA8SInt,
    RGBA16UNorm,
    RGBA16SNorm,
    RGBA16UInt,
    RGBA16SInt,
    RGBA16Float,
    RGBA32UInt,
    RGBA32SInt,
    RGBA32Float,
    Depth,
    DepthStencil,
}

impl PixelFormat {
    /// Size of one pixel in bytes (0 for `Default`)
    pub fn pixel_size(&self) -> u32 {
        match self {
            PixelFormat::Default => 0,
            PixelFormat::A8UNorm
            | PixelFormat::R8UNorm
            | PixelFormat::R8SNorm
            | PixelFormat::R8UInt
            | PixelFormat::R8SInt => 1,
            PixelFormat::R16UNorm
            | PixelFormat::R16SNorm
            | PixelFormat::R16UInt
            | PixelFormat::R16SInt
            | PixelFormat::R16Float
            | PixelFormat::RG8UNorm
            | PixelFormat::RG8SNorm
            | PixelFormat::RG8UInt
            | PixelFormat::RG8SInt => 2,
            PixelFormat::R32UInt
            | PixelFormat::R32SInt
            | PixelFormat::R32Float
            | PixelFormat::RGBA8UNorm
            | PixelFormat::RGBA8UNormSRGB
            | PixelFormat::RGBA8SNorm
            | PixelFormat::RGBA8UInt
            | PixelFormat::RGBA8SInt
            | PixelFormat::Depth
            | PixelFormat::DepthStencil => 4,
            PixelFormat::RGBA16UNorm
            | PixelFormat::RGBA16SNorm
            | PixelFormat::RGBA16UInt
            | PixelFormat::RGBA16SInt
            | PixelFormat::RGBA16Float => 8,
            PixelFormat::RGBA32UInt | PixelFormat::RGBA32SInt | PixelFormat::RGBA32Float => 16,
        }
    }

    /// Whether this is a depth (or depth/stencil) format
    pub fn is_depth(&self) -> bool {
        matches!(self, PixelFormat::Depth | PixelFormat::DepthStencil)
    }

    /// Whether this format has a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(self, PixelFormat::DepthStencil)
    }
}
