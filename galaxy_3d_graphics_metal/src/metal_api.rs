/// Metal native seam
///
/// `MetalApi` covers the `MTLDevice` creation calls, the command queue, the
/// command buffer and encoder calls the backend issues and Objective-C
/// reference counting. `MetalLayer` is the `CAMetalLayer` of the window. The
/// platform layer implements both over the real Objective-C objects; tests use
/// a recording fake.
///
/// Descriptors mirror their `MTL*Descriptor` counterparts with the constants
/// from `metal_constants`.

use galaxy_3d_graphics::glam::UVec2;
use std::ffi::c_void;
use std::num::NonZeroUsize;

/// Raw Objective-C object pointer (`id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawId(NonZeroUsize);

impl RawId {
    /// `None` for `nil`
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonZeroUsize::new(ptr as usize).map(RawId)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.get() as *mut c_void
    }

    /// Opaque identifier, for fakes that are not backed by real pointers
    pub fn from_id(id: NonZeroUsize) -> Self {
        RawId(id)
    }

    pub fn id(&self) -> usize {
        self.0.get()
    }
}

/// Where a failure code comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetalErrorDomain {
    /// A device or layer call returned `nil`; codes from `METAL_DEVICE_ERROR_*`
    Device,
    /// `MTLLibraryErrorDomain`
    Library,
    /// `MTLCommandBufferErrorDomain`
    CommandBuffer,
}

/// `NSError` of a failed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetalError {
    pub domain: MetalErrorDomain,
    pub code: i64,
    /// `localizedDescription`, e.g. the compiler output
    pub description: String,
}

impl MetalError {
    pub fn new(domain: MetalErrorDomain, code: i64, description: impl Into<String>) -> Self {
        Self { domain, code, description: description.into() }
    }
}

pub type MetalResult<T> = std::result::Result<T, MetalError>;

// ============================================================================
// Descriptors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub texture_type: u64,
    pub pixel_format: u64,
    pub width: u32,
    pub height: u32,
    pub mipmap_level_count: u32,
    pub sample_count: u32,
    pub usage: u64,
    pub storage_mode: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MtlRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDescriptor {
    pub min_filter: u64,
    pub mag_filter: u64,
    pub mip_filter: u64,
    pub s_address_mode: u64,
    pub t_address_mode: u64,
    pub r_address_mode: u64,
    pub max_anisotropy: u32,
    pub border_color: u64,
    pub lod_max_clamp: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilDescriptor {
    pub stencil_failure_operation: u64,
    pub depth_failure_operation: u64,
    pub depth_stencil_pass_operation: u64,
    pub stencil_compare_function: u64,
    pub read_mask: u32,
    pub write_mask: u32,
}

/// `None` stencil faces disable the stencil test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilDescriptor {
    pub depth_compare_function: u64,
    pub depth_write_enabled: bool,
    pub front_face_stencil: Option<StencilDescriptor>,
    pub back_face_stencil: Option<StencilDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttributeDescriptor {
    pub index: u32,
    pub format: u64,
    pub offset: u32,
    pub buffer_index: u32,
}

/// Blending of one color attachment of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAttachmentBlend {
    pub pixel_format: u64,
    pub blending_enabled: bool,
    pub source_rgb_blend_factor: u64,
    pub destination_rgb_blend_factor: u64,
    pub rgb_blend_operation: u64,
    pub source_alpha_blend_factor: u64,
    pub destination_alpha_blend_factor: u64,
    pub alpha_blend_operation: u64,
    pub write_mask: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPipelineDescriptor {
    pub vertex_function: RawId,
    pub fragment_function: RawId,
    pub vertex_attributes: Vec<VertexAttributeDescriptor>,
    /// Stride of vertex buffer 0
    pub vertex_stride: u32,
    pub sample_count: u32,
    pub color_attachments: Vec<ColorAttachmentBlend>,
    pub depth_attachment_pixel_format: u64,
    pub stencil_attachment_pixel_format: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAttachmentDescriptor {
    pub texture: RawId,
    pub resolve_texture: Option<RawId>,
    pub load_action: u64,
    pub store_action: u64,
    pub clear_color: [f64; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthAttachmentDescriptor {
    pub texture: RawId,
    pub load_action: u64,
    pub store_action: u64,
    pub clear_depth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilAttachmentDescriptor {
    pub texture: RawId,
    pub load_action: u64,
    pub store_action: u64,
    pub clear_stencil: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPassDescriptor {
    pub color_attachments: Vec<ColorAttachmentDescriptor>,
    pub depth_attachment: Option<DepthAttachmentDescriptor>,
    pub stencil_attachment: Option<StencilAttachmentDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MtlViewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
    pub znear: f64,
    pub zfar: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Runs once the GPU is done with a committed command buffer, on any thread
pub type CompletionHandler = Box<dyn FnOnce(MetalResult<()>) + Send>;

// ============================================================================
// Device, command queue and encoders
// ============================================================================

/// `MTLDevice` + its `MTLCommandQueue`
///
/// Every `new_*` call returns an owned reference that the caller releases.
/// Encoder calls take borrowed objects and never change reference counts.
pub trait MetalApi: Send + Sync {
    // ===== NSObject =====

    fn retain(&self, object: RawId);
    fn release(&self, object: RawId);

    // ===== Device =====

    fn device_name(&self) -> String;
    fn supports_texture_sample_count(&self, sample_count: u32) -> bool;
    /// `MTLSamplerBorderColor` support (macOS GPU families)
    fn supports_border_color(&self) -> bool;

    /// `initial_data` fills the start of the buffer
    fn new_buffer(&self, length: usize, options: u64, initial_data: Option<&[u8]>) -> MetalResult<RawId>;
    /// Write through the buffer's `contents` pointer
    fn copy_to_buffer(&self, buffer: RawId, offset: usize, data: &[u8]);
    fn new_texture(&self, desc: &TextureDescriptor) -> MetalResult<RawId>;
    fn replace_region(&self, texture: RawId, region: MtlRegion, level: u32, slice: u32, data: &[u8], bytes_per_row: u32);
    fn new_sampler_state(&self, desc: &SamplerDescriptor) -> MetalResult<RawId>;
    fn new_depth_stencil_state(&self, desc: &DepthStencilDescriptor) -> MetalResult<RawId>;
    /// Library from compiled `metallib` data
    fn new_library(&self, data: &[u8]) -> MetalResult<RawId>;
    fn new_function(&self, library: RawId, name: &str) -> MetalResult<RawId>;
    fn new_render_pipeline_state(&self, desc: &RenderPipelineDescriptor) -> MetalResult<RawId>;

    // ===== Command buffers =====

    fn new_command_buffer(&self) -> MetalResult<RawId>;
    fn push_debug_group(&self, command_buffer: RawId, name: &str);
    fn pop_debug_group(&self, command_buffer: RawId);
    fn present_drawable(&self, command_buffer: RawId, drawable: RawId);
    fn commit(&self, command_buffer: RawId, completed: CompletionHandler);

    // ===== Render command encoder =====

    fn new_render_command_encoder(&self, command_buffer: RawId, desc: &RenderPassDescriptor) -> MetalResult<RawId>;
    /// Ends render and blit encoders alike
    fn end_encoding(&self, encoder: RawId);
    fn set_render_pipeline_state(&self, encoder: RawId, state: RawId);
    fn set_depth_stencil_state(&self, encoder: RawId, state: RawId);
    fn set_stencil_reference_value(&self, encoder: RawId, value: u32);
    fn set_cull_mode(&self, encoder: RawId, mode: u64);
    fn set_triangle_fill_mode(&self, encoder: RawId, mode: u64);
    fn set_viewport(&self, encoder: RawId, viewport: &MtlViewport);
    fn set_scissor_rect(&self, encoder: RawId, rect: ScissorRect);
    fn set_vertex_buffer(&self, encoder: RawId, buffer: Option<RawId>, offset: usize, index: u32);
    fn set_fragment_buffer(&self, encoder: RawId, buffer: Option<RawId>, offset: usize, index: u32);
    fn set_fragment_texture(&self, encoder: RawId, texture: Option<RawId>, index: u32);
    fn set_fragment_sampler_state(&self, encoder: RawId, sampler: Option<RawId>, index: u32);
    fn draw_indexed_primitives(&self, encoder: RawId, primitive_type: u64, index_count: u32, index_type: u64,
        index_buffer: RawId, index_buffer_offset: usize);

    // ===== Blit command encoder =====

    fn new_blit_command_encoder(&self, command_buffer: RawId) -> MetalResult<RawId>;
    #[allow(clippy::too_many_arguments)]
    fn copy_from_texture(&self, encoder: RawId, source: RawId, source_slice: u32, source_level: u32,
        source_region: MtlRegion, destination: RawId, destination_slice: u32, destination_level: u32,
        destination_origin: UVec2);
}

/// Drawable handed out by the layer for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawable {
    /// Owned reference to the `CAMetalDrawable`
    pub drawable: RawId,
    /// Its texture, valid while the drawable is
    pub texture: RawId,
}

/// `CAMetalLayer` of the platform window
pub trait MetalLayer: Send {
    fn configure(&mut self, pixel_format: u64, size: UVec2, display_sync: bool);

    fn set_drawable_size(&mut self, size: UVec2);

    /// Blocks until a drawable is available
    fn next_drawable(&mut self) -> MetalResult<Drawable>;

    /// Display modes of the screen showing the window (may be empty)
    fn display_modes(&self) -> Vec<UVec2>;
}
