/// Direct3D 11 native seam
///
/// `D3d11Api` covers the `ID3D11Device` creation calls, the immediate
/// `ID3D11DeviceContext` calls the backend issues and the `IUnknown`
/// reference counting of every interface it hands out. The platform layer
/// implements it over the real COM interfaces; tests use a recording fake.
///
/// Descriptors mirror their `D3D11_*_DESC` counterparts field for field, with
/// the constants from `d3d11_constants`.

use galaxy_3d_graphics::glam::UVec2;
use std::ffi::c_void;
use std::num::NonZeroUsize;

/// Raw COM interface pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawCom(NonZeroUsize);

impl RawCom {
    /// `None` for a null pointer
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonZeroUsize::new(ptr as usize).map(RawCom)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.get() as *mut c_void
    }

    /// Opaque identifier, for fakes that are not backed by real pointers
    pub fn from_id(id: NonZeroUsize) -> Self {
        RawCom(id)
    }

    pub fn id(&self) -> usize {
        self.0.get()
    }
}

/// Failed calls return their HRESULT
pub type ComResult<T> = std::result::Result<T, i32>;

// ============================================================================
// Descriptors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    pub byte_width: u32,
    pub usage: u32,
    pub bind_flags: u32,
    pub cpu_access_flags: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture2dDesc {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub array_size: u32,
    pub format: u32,
    pub sample_count: u32,
    pub usage: u32,
    pub bind_flags: u32,
    pub cpu_access_flags: u32,
    pub misc_flags: u32,
}

/// Initial contents of one subresource
#[derive(Debug, Clone, Copy)]
pub struct SubresourceData<'a> {
    pub data: &'a [u8],
    pub row_pitch: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDesc {
    pub format: u32,
    /// One of the `D3D11_*_DIMENSION_*` constants for the view kind
    pub dimension: u32,
    /// Mip levels visible to a shader resource view (ignored otherwise)
    pub mip_levels: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDesc {
    pub filter: u32,
    pub address_u: u32,
    pub address_v: u32,
    pub address_w: u32,
    pub max_anisotropy: u32,
    pub comparison_func: u32,
    pub border_color: [f32; 4],
    pub min_lod: f32,
    pub max_lod: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerDesc {
    pub fill_mode: u32,
    pub cull_mode: u32,
    pub front_counter_clockwise: bool,
    pub depth_clip_enable: bool,
    pub scissor_enable: bool,
    pub multisample_enable: bool,
    pub antialiased_line_enable: bool,
}

/// Blend configuration, applied to every bound render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendDesc {
    pub blend_enable: bool,
    pub src_blend: u32,
    pub dest_blend: u32,
    pub blend_op: u32,
    pub src_blend_alpha: u32,
    pub dest_blend_alpha: u32,
    pub blend_op_alpha: u32,
    pub render_target_write_mask: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilOpDesc {
    pub stencil_fail_op: u32,
    pub stencil_depth_fail_op: u32,
    pub stencil_pass_op: u32,
    pub stencil_func: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilDesc {
    pub depth_enable: bool,
    pub depth_write_mask: u32,
    pub depth_func: u32,
    pub stencil_enable: bool,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub front_face: DepthStencilOpDesc,
    pub back_face: DepthStencilOpDesc,
}

/// Per-vertex input element of slot 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputElementDesc {
    pub semantic_name: &'static str,
    pub semantic_index: u32,
    pub format: u32,
    pub aligned_byte_offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub top_left_x: f32,
    pub top_left_y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct D3dRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct D3dBox {
    pub left: u32,
    pub top: u32,
    pub front: u32,
    pub right: u32,
    pub bottom: u32,
    pub back: u32,
}

/// CPU view of a mapped subresource
#[derive(Debug, Clone, Copy)]
pub struct MappedSubresource {
    pub data: *mut u8,
    pub row_pitch: u32,
}

// ============================================================================
// Device and immediate context
// ============================================================================

/// `ID3D11Device` + immediate `ID3D11DeviceContext`
///
/// Every `create_*` call returns a new reference that the caller releases.
/// Context calls take borrowed pointers and never change reference counts.
pub trait D3d11Api: Send + Sync {
    // ===== IUnknown =====

    fn add_ref(&self, object: RawCom) -> u32;
    fn release(&self, object: RawCom) -> u32;

    // ===== Device =====

    fn feature_level(&self) -> u32;
    fn adapter_description(&self) -> String;
    fn check_multisample_quality_levels(&self, format: u32, sample_count: u32) -> ComResult<u32>;

    fn create_buffer(&self, desc: &BufferDesc, initial_data: Option<&[u8]>) -> ComResult<RawCom>;
    fn create_texture_2d(&self, desc: &Texture2dDesc, initial_data: &[SubresourceData<'_>]) -> ComResult<RawCom>;
    /// `desc` is `None` to view the whole resource with its own format
    fn create_render_target_view(&self, resource: RawCom, desc: Option<&ViewDesc>) -> ComResult<RawCom>;
    fn create_depth_stencil_view(&self, resource: RawCom, desc: Option<&ViewDesc>) -> ComResult<RawCom>;
    fn create_shader_resource_view(&self, resource: RawCom, desc: &ViewDesc) -> ComResult<RawCom>;
    fn create_sampler_state(&self, desc: &SamplerDesc) -> ComResult<RawCom>;
    fn create_rasterizer_state(&self, desc: &RasterizerDesc) -> ComResult<RawCom>;
    fn create_blend_state(&self, desc: &BlendDesc) -> ComResult<RawCom>;
    fn create_depth_stencil_state(&self, desc: &DepthStencilDesc) -> ComResult<RawCom>;
    fn create_pixel_shader(&self, bytecode: &[u8]) -> ComResult<RawCom>;
    fn create_vertex_shader(&self, bytecode: &[u8]) -> ComResult<RawCom>;
    fn create_input_layout(&self, elements: &[InputElementDesc], vertex_bytecode: &[u8]) -> ComResult<RawCom>;

    /// Unbind everything from the immediate context
    fn clear_state(&self);

    // ===== Output merger =====

    fn om_set_render_targets(&self, views: &[RawCom], depth_stencil_view: Option<RawCom>);
    fn om_set_blend_state(&self, state: Option<RawCom>, blend_factor: [f32; 4], sample_mask: u32);
    fn om_set_depth_stencil_state(&self, state: Option<RawCom>, stencil_ref: u32);
    fn clear_render_target_view(&self, view: RawCom, color: [f32; 4]);
    fn clear_depth_stencil_view(&self, view: RawCom, clear_flags: u32, depth: f32, stencil: u8);

    // ===== Rasterizer =====

    fn rs_set_state(&self, state: Option<RawCom>);
    fn rs_set_viewports(&self, viewports: &[Viewport]);
    fn rs_set_scissor_rects(&self, rects: &[D3dRect]);

    // ===== Input assembler =====

    fn ia_set_input_layout(&self, layout: Option<RawCom>);
    fn ia_set_vertex_buffer(&self, slot: u32, buffer: Option<RawCom>, stride: u32, offset: u32);
    fn ia_set_index_buffer(&self, buffer: Option<RawCom>, format: u32, offset: u32);
    fn ia_set_primitive_topology(&self, topology: u32);

    // ===== Shader stages =====

    fn vs_set_shader(&self, shader: Option<RawCom>);
    fn ps_set_shader(&self, shader: Option<RawCom>);
    fn vs_set_constant_buffer(&self, slot: u32, buffer: Option<RawCom>);
    fn ps_set_constant_buffer(&self, slot: u32, buffer: Option<RawCom>);
    fn ps_set_shader_resources(&self, start_slot: u32, views: &[Option<RawCom>]);
    fn ps_set_samplers(&self, start_slot: u32, samplers: &[Option<RawCom>]);

    // ===== Draws, uploads and copies =====

    fn draw_indexed(&self, index_count: u32, start_index: u32, base_vertex: i32);

    /// The returned pointer is valid until `unmap` for `row_pitch` bytes per
    /// row of the subresource (or the whole buffer for buffers)
    fn map(&self, resource: RawCom, subresource: u32, map_type: u32) -> ComResult<MappedSubresource>;
    fn unmap(&self, resource: RawCom, subresource: u32);
    fn update_subresource(&self, resource: RawCom, subresource: u32, data: &[u8], row_pitch: u32);
    fn resolve_subresource(&self, destination: RawCom, destination_subresource: u32, source: RawCom,
        source_subresource: u32, format: u32);
    #[allow(clippy::too_many_arguments)]
    fn copy_subresource_region(&self, destination: RawCom, destination_subresource: u32, x: u32, y: u32,
        z: u32, source: RawCom, source_subresource: u32, source_box: &D3dBox);

    // ===== ID3DUserDefinedAnnotation =====

    /// Whether the context exposes user-defined annotations
    fn supports_annotations(&self) -> bool;
    fn begin_event(&self, name: &str);
    fn end_event(&self);
}

/// Swap chain parameters chosen by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChainDesc {
    pub width: u32,
    pub height: u32,
    pub format: u32,
    pub sample_count: u32,
}

/// `IDXGISwapChain` bound to the platform window
pub trait D3d11SwapChain: Send {
    /// Create the swap chain for the window once the device knows its format
    fn create(&mut self, desc: &SwapChainDesc) -> ComResult<()>;

    /// New reference to back buffer 0
    fn back_buffer(&self) -> ComResult<RawCom>;

    fn resize_buffers(&mut self, width: u32, height: u32) -> ComResult<()>;

    fn present(&mut self, sync_interval: u32) -> ComResult<()>;

    /// Display modes of the output showing the window (may be empty)
    fn display_modes(&self) -> Vec<UVec2>;
}
