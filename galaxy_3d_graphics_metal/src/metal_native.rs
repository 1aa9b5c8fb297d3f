/// NativeMetal - `MetalApi` on top of `objc2-metal`
///
/// Created objects cross the seam as raw `id` pointers that own one
/// retain. Encoder calls borrow them back as protocol objects without
/// retaining them.

use crate::metal_api::{
    CompletionHandler, DepthStencilDescriptor, Drawable, MetalApi, MetalError, MetalErrorDomain, MetalLayer,
    MetalResult, MtlRegion, MtlViewport, RawId, RenderPassDescriptor, RenderPipelineDescriptor, SamplerDescriptor,
    ScissorRect, StencilDescriptor, TextureDescriptor,
};
use crate::metal_constants::*;
use block2::RcBlock;
use galaxy_3d_graphics::glam::UVec2;
use objc2::rc::Id;
use objc2::runtime::{AnyObject, ProtocolObject};
use objc2_foundation::{CGSize, NSError, NSString, NSURL};
use objc2_metal::*;
use objc2_quartz_core::{CAMetalDrawable, CAMetalLayer};
use std::cell::Cell;
use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

// The seam vocabulary is the framework's; keep it in step with the bindings.
const _: () = {
    assert!(MTL_PIXEL_FORMAT_BGRA8_UNORM == MTLPixelFormat::BGRA8Unorm.0 as u64);
    assert!(MTL_PIXEL_FORMAT_RGBA8_UNORM_SRGB == MTLPixelFormat::RGBA8Unorm_sRGB.0 as u64);
    assert!(MTL_PIXEL_FORMAT_DEPTH32_FLOAT_STENCIL8 == MTLPixelFormat::Depth32Float_Stencil8.0 as u64);
    assert!(MTL_VERTEX_FORMAT_FLOAT3 == MTLVertexFormat::Float3.0 as u64);
    assert!(MTL_VERTEX_FORMAT_SHORT_NORMALIZED == MTLVertexFormat::ShortNormalized.0 as u64);
    assert!(MTL_BLEND_FACTOR_ONE_MINUS_BLEND_COLOR == MTLBlendFactor::OneMinusBlendColor.0 as u64);
    assert!(MTL_BLEND_OPERATION_MAX == MTLBlendOperation::Max.0 as u64);
    assert!(MTL_COLOR_WRITE_MASK_ALL == MTLColorWriteMask::All.0 as u64);
    assert!(MTL_COMPARE_FUNCTION_GREATER_EQUAL == MTLCompareFunction::GreaterEqual.0 as u64);
    assert!(MTL_STENCIL_OPERATION_DECREMENT_WRAP == MTLStencilOperation::DecrementWrap.0 as u64);
    assert!(MTL_CULL_MODE_BACK == MTLCullMode::Back.0 as u64);
    assert!(MTL_TRIANGLE_FILL_MODE_LINES == MTLTriangleFillMode::Lines.0 as u64);
    assert!(MTL_PRIMITIVE_TYPE_TRIANGLE_STRIP == MTLPrimitiveType::TriangleStrip.0 as u64);
    assert!(MTL_INDEX_TYPE_UINT32 == MTLIndexType::UInt32.0 as u64);
    assert!(MTL_SAMPLER_MIP_FILTER_LINEAR == MTLSamplerMipFilter::Linear.0 as u64);
    assert!(MTL_SAMPLER_ADDRESS_MODE_CLAMP_TO_BORDER_COLOR == MTLSamplerAddressMode::ClampToBorderColor.0 as u64);
    assert!(MTL_SAMPLER_BORDER_COLOR_OPAQUE_WHITE == MTLSamplerBorderColor::OpaqueWhite.0 as u64);
    assert!(MTL_LOAD_ACTION_CLEAR == MTLLoadAction::Clear.0 as u64);
    assert!(MTL_STORE_ACTION_STORE_AND_MULTISAMPLE_RESOLVE == MTLStoreAction::StoreAndMultisampleResolve.0 as u64);
    assert!(MTL_TEXTURE_TYPE_CUBE == MTLTextureType::TypeCube.0 as u64);
    assert!(MTL_TEXTURE_USAGE_RENDER_TARGET == MTLTextureUsage::RenderTarget.0 as u64);
    assert!(MTL_STORAGE_MODE_PRIVATE == MTLStorageMode::Private.0 as u64);
    assert!(MTL_RESOURCE_CPU_CACHE_MODE_WRITE_COMBINED == MTLResourceOptions::CPUCacheModeWriteCombined.0 as u64);
    assert!(MTL_LIBRARY_ERROR_COMPILE_FAILURE == MTLLibraryError::CompileFailure.0 as i64);
    assert!(MTL_COMMAND_BUFFER_ERROR_OUT_OF_MEMORY == MTLCommandBufferError::OutOfMemory.0 as i64);
};

type Device = ProtocolObject<dyn MTLDevice>;

pub struct NativeMetal {
    device: Id<Device>,
    queue: Id<ProtocolObject<dyn MTLCommandQueue>>,
}

// SAFETY: Metal devices and command queues are thread safe; encoders and
// command buffers are only driven from the render thread.
unsafe impl Send for NativeMetal {}
unsafe impl Sync for NativeMetal {}

static LIBRARY_FILES: AtomicU64 = AtomicU64::new(0);

impl NativeMetal {
    /// System default device with a new command queue
    pub fn create() -> MetalResult<Self> {
        let device = unsafe { MTLCreateSystemDefaultDevice() }.ok_or_else(|| nil("MTLCreateSystemDefaultDevice"))?;
        Self::from_device(device)
    }

    /// Wrap a device chosen by the platform layer
    pub fn from_device(device: Id<Device>) -> MetalResult<Self> {
        let queue = device.newCommandQueue().ok_or_else(|| nil("newCommandQueue"))?;
        Ok(Self { device, queue })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

// ============================================================================
// Raw pointer plumbing
// ============================================================================

fn nil(call: &str) -> MetalError {
    MetalError::new(MetalErrorDomain::Device, METAL_DEVICE_ERROR_NIL_OBJECT, format!("{} returned nil", call))
}

fn ns_error(domain: MetalErrorDomain, error: &NSError) -> MetalError {
    MetalError::new(domain, error.code() as i64, error.localizedDescription().to_string())
}

/// Hand a new object across the seam, keeping its retain
fn into_raw<T: ?Sized>(object: Id<ProtocolObject<T>>) -> MetalResult<RawId> {
    RawId::from_ptr(Id::into_raw(object) as *mut c_void).ok_or_else(|| nil("object"))
}

fn created<T: ?Sized>(object: Option<Id<ProtocolObject<T>>>, call: &str) -> MetalResult<RawId> {
    into_raw(object.ok_or_else(|| nil(call))?)
}

/// # Safety
///
/// `object` must point to a live object of type `T` for `'a`.
unsafe fn borrowed<'a, T>(object: RawId) -> &'a T {
    &*(object.as_ptr() as *const T)
}

unsafe fn borrowed_opt<'a, T>(object: Option<RawId>) -> Option<&'a T> {
    object.map(|object| borrowed(object))
}

fn region(source: MtlRegion) -> MTLRegion {
    MTLRegion {
        origin: MTLOrigin { x: source.x as usize, y: source.y as usize, z: 0 },
        size: MTLSize { width: source.width as usize, height: source.height as usize, depth: 1 },
    }
}

// ============================================================================
// Descriptor conversion
// ============================================================================

pub(crate) fn texture_descriptor(desc: &TextureDescriptor) -> Id<MTLTextureDescriptor> {
    let native = unsafe { MTLTextureDescriptor::new() };
    unsafe {
        native.setTextureType(MTLTextureType(desc.texture_type as usize));
        native.setPixelFormat(MTLPixelFormat(desc.pixel_format as usize));
        native.setWidth(desc.width as usize);
        native.setHeight(desc.height as usize);
        native.setMipmapLevelCount(desc.mipmap_level_count.max(1) as usize);
        native.setSampleCount(desc.sample_count.max(1) as usize);
        native.setUsage(MTLTextureUsage(desc.usage as usize));
        native.setStorageMode(MTLStorageMode(desc.storage_mode as usize));
    }
    native
}

pub(crate) fn sampler_descriptor(desc: &SamplerDescriptor, border_color: bool) -> Id<MTLSamplerDescriptor> {
    let native = unsafe { MTLSamplerDescriptor::new() };
    unsafe {
        native.setMinFilter(MTLSamplerMinMagFilter(desc.min_filter as usize));
        native.setMagFilter(MTLSamplerMinMagFilter(desc.mag_filter as usize));
        native.setMipFilter(MTLSamplerMipFilter(desc.mip_filter as usize));
        native.setSAddressMode(MTLSamplerAddressMode(desc.s_address_mode as usize));
        native.setTAddressMode(MTLSamplerAddressMode(desc.t_address_mode as usize));
        native.setRAddressMode(MTLSamplerAddressMode(desc.r_address_mode as usize));
        native.setMaxAnisotropy(desc.max_anisotropy.max(1) as usize);
        native.setLodMaxClamp(desc.lod_max_clamp);
        if border_color {
            native.setBorderColor(MTLSamplerBorderColor(desc.border_color as usize));
        }
    }
    native
}

fn stencil_descriptor(desc: &StencilDescriptor) -> Id<MTLStencilDescriptor> {
    let native = unsafe { MTLStencilDescriptor::new() };
    unsafe {
        native.setStencilFailureOperation(MTLStencilOperation(desc.stencil_failure_operation as usize));
        native.setDepthFailureOperation(MTLStencilOperation(desc.depth_failure_operation as usize));
        native.setDepthStencilPassOperation(MTLStencilOperation(desc.depth_stencil_pass_operation as usize));
        native.setStencilCompareFunction(MTLCompareFunction(desc.stencil_compare_function as usize));
        native.setReadMask(desc.read_mask);
        native.setWriteMask(desc.write_mask);
    }
    native
}

pub(crate) fn depth_stencil_descriptor(desc: &DepthStencilDescriptor) -> Id<MTLDepthStencilDescriptor> {
    let native = unsafe { MTLDepthStencilDescriptor::new() };
    let front = desc.front_face_stencil.as_ref().map(stencil_descriptor);
    let back = desc.back_face_stencil.as_ref().map(stencil_descriptor);
    unsafe {
        native.setDepthCompareFunction(MTLCompareFunction(desc.depth_compare_function as usize));
        native.setDepthWriteEnabled(desc.depth_write_enabled);
        native.setFrontFaceStencil(front.as_deref());
        native.setBackFaceStencil(back.as_deref());
    }
    native
}

/// # Safety
///
/// The functions named by `desc` must be live `MTLFunction` objects.
unsafe fn render_pipeline_descriptor(desc: &RenderPipelineDescriptor) -> Id<MTLRenderPipelineDescriptor> {
    let native = MTLRenderPipelineDescriptor::new();
    native.setVertexFunction(Some(borrowed::<ProtocolObject<dyn MTLFunction>>(desc.vertex_function)));
    native.setFragmentFunction(Some(borrowed::<ProtocolObject<dyn MTLFunction>>(desc.fragment_function)));

    let vertex = MTLVertexDescriptor::vertexDescriptor();
    for attribute in &desc.vertex_attributes {
        let native_attribute = vertex.attributes().objectAtIndexedSubscript(attribute.index as usize);
        native_attribute.setFormat(MTLVertexFormat(attribute.format as usize));
        native_attribute.setOffset(attribute.offset as usize);
        native_attribute.setBufferIndex(attribute.buffer_index as usize);
    }
    vertex.layouts().objectAtIndexedSubscript(0).setStride(desc.vertex_stride as usize);
    native.setVertexDescriptor(Some(&vertex));
    native.setRasterSampleCount(desc.sample_count.max(1) as usize);

    for (index, blend) in desc.color_attachments.iter().enumerate() {
        let attachment = native.colorAttachments().objectAtIndexedSubscript(index);
        attachment.setPixelFormat(MTLPixelFormat(blend.pixel_format as usize));
        attachment.setBlendingEnabled(blend.blending_enabled);
        attachment.setSourceRGBBlendFactor(MTLBlendFactor(blend.source_rgb_blend_factor as usize));
        attachment.setDestinationRGBBlendFactor(MTLBlendFactor(blend.destination_rgb_blend_factor as usize));
        attachment.setRgbBlendOperation(MTLBlendOperation(blend.rgb_blend_operation as usize));
        attachment.setSourceAlphaBlendFactor(MTLBlendFactor(blend.source_alpha_blend_factor as usize));
        attachment.setDestinationAlphaBlendFactor(MTLBlendFactor(blend.destination_alpha_blend_factor as usize));
        attachment.setAlphaBlendOperation(MTLBlendOperation(blend.alpha_blend_operation as usize));
        attachment.setWriteMask(MTLColorWriteMask(blend.write_mask as usize));
    }
    native.setDepthAttachmentPixelFormat(MTLPixelFormat(desc.depth_attachment_pixel_format as usize));
    native.setStencilAttachmentPixelFormat(MTLPixelFormat(desc.stencil_attachment_pixel_format as usize));
    native
}

/// # Safety
///
/// Every texture named by `desc` must be a live `MTLTexture`.
unsafe fn render_pass_descriptor(desc: &RenderPassDescriptor) -> Id<MTLRenderPassDescriptor> {
    let native = MTLRenderPassDescriptor::new();
    for (index, color) in desc.color_attachments.iter().enumerate() {
        let attachment = native.colorAttachments().objectAtIndexedSubscript(index);
        attachment.setTexture(Some(borrowed::<ProtocolObject<dyn MTLTexture>>(color.texture)));
        attachment.setResolveTexture(borrowed_opt::<ProtocolObject<dyn MTLTexture>>(color.resolve_texture));
        attachment.setLoadAction(MTLLoadAction(color.load_action as usize));
        attachment.setStoreAction(MTLStoreAction(color.store_action as usize));
        let [red, green, blue, alpha] = color.clear_color;
        attachment.setClearColor(MTLClearColor { red, green, blue, alpha });
    }
    if let Some(depth) = &desc.depth_attachment {
        let attachment = native.depthAttachment();
        attachment.setTexture(Some(borrowed::<ProtocolObject<dyn MTLTexture>>(depth.texture)));
        attachment.setLoadAction(MTLLoadAction(depth.load_action as usize));
        attachment.setStoreAction(MTLStoreAction(depth.store_action as usize));
        attachment.setClearDepth(depth.clear_depth);
    }
    if let Some(stencil) = &desc.stencil_attachment {
        let attachment = native.stencilAttachment();
        attachment.setTexture(Some(borrowed::<ProtocolObject<dyn MTLTexture>>(stencil.texture)));
        attachment.setLoadAction(MTLLoadAction(stencil.load_action as usize));
        attachment.setStoreAction(MTLStoreAction(stencil.store_action as usize));
        attachment.setClearStencil(stencil.clear_stencil);
    }
    native
}

// ============================================================================
// MetalApi
// ============================================================================

impl MetalApi for NativeMetal {
    fn retain(&self, object: RawId) {
        unsafe { objc2::ffi::objc_retain(object.as_ptr() as *mut AnyObject) };
    }

    fn release(&self, object: RawId) {
        unsafe { objc2::ffi::objc_release(object.as_ptr() as *mut AnyObject) };
    }

    fn device_name(&self) -> String {
        self.device.name().to_string()
    }

    fn supports_texture_sample_count(&self, sample_count: u32) -> bool {
        self.device.supportsTextureSampleCount(sample_count as usize)
    }

    fn supports_border_color(&self) -> bool {
        self.device.supportsFamily(MTLGPUFamily::Mac2)
    }

    fn new_buffer(&self, length: usize, options: u64, initial_data: Option<&[u8]>) -> MetalResult<RawId> {
        let buffer = self
            .device
            .newBufferWithLength_options(length, MTLResourceOptions(options as usize))
            .ok_or_else(|| nil("newBufferWithLength"))?;
        if let Some(data) = initial_data {
            let count = data.len().min(length);
            unsafe {
                std::ptr::copy_nonoverlapping(data.as_ptr(), buffer.contents().as_ptr() as *mut u8, count);
            }
        }
        into_raw(buffer)
    }

    fn copy_to_buffer(&self, buffer: RawId, offset: usize, data: &[u8]) {
        let buffer = unsafe { borrowed::<ProtocolObject<dyn MTLBuffer>>(buffer) };
        if offset + data.len() > buffer.length() {
            return;
        }
        unsafe {
            let contents = (buffer.contents().as_ptr() as *mut u8).add(offset);
            std::ptr::copy_nonoverlapping(data.as_ptr(), contents, data.len());
        }
    }

    fn new_texture(&self, desc: &TextureDescriptor) -> MetalResult<RawId> {
        let native = texture_descriptor(desc);
        created(self.device.newTextureWithDescriptor(&native), "newTextureWithDescriptor")
    }

    fn replace_region(&self, texture: RawId, target: MtlRegion, level: u32, slice: u32, data: &[u8], bytes_per_row: u32) {
        let Some(bytes) = NonNull::new(data.as_ptr() as *mut c_void) else { return };
        unsafe {
            borrowed::<ProtocolObject<dyn MTLTexture>>(texture).replaceRegion_mipmapLevel_slice_withBytes_bytesPerRow_bytesPerImage(
                region(target),
                level as usize,
                slice as usize,
                bytes,
                bytes_per_row as usize,
                0,
            );
        }
    }

    fn new_sampler_state(&self, desc: &SamplerDescriptor) -> MetalResult<RawId> {
        let native = sampler_descriptor(desc, self.supports_border_color());
        created(self.device.newSamplerStateWithDescriptor(&native), "newSamplerStateWithDescriptor")
    }

    fn new_depth_stencil_state(&self, desc: &DepthStencilDescriptor) -> MetalResult<RawId> {
        let native = depth_stencil_descriptor(desc);
        created(self.device.newDepthStencilStateWithDescriptor(&native), "newDepthStencilStateWithDescriptor")
    }

    fn new_library(&self, data: &[u8]) -> MetalResult<RawId> {
        // Loaded from a file URL, which needs no libdispatch data object
        let number = LIBRARY_FILES.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("galaxy3d-{}-{}.metallib", std::process::id(), number));
        std::fs::write(&path, data).map_err(|error| {
            MetalError::new(MetalErrorDomain::Library, MTL_LIBRARY_ERROR_FILE_NOT_FOUND, error.to_string())
        })?;
        let url = unsafe { NSURL::fileURLWithPath(&NSString::from_str(&path.to_string_lossy())) };
        let library = self.device.newLibraryWithURL_error(&url);
        let _ = std::fs::remove_file(&path);
        into_raw(library.map_err(|error| ns_error(MetalErrorDomain::Library, &error))?)
    }

    fn new_function(&self, library: RawId, name: &str) -> MetalResult<RawId> {
        let library = unsafe { borrowed::<ProtocolObject<dyn MTLLibrary>>(library) };
        library.newFunctionWithName(&NSString::from_str(name)).map_or_else(
            || {
                Err(MetalError::new(
                    MetalErrorDomain::Library,
                    MTL_LIBRARY_ERROR_FUNCTION_NOT_FOUND,
                    format!("function {} not found", name),
                ))
            },
            into_raw,
        )
    }

    fn new_render_pipeline_state(&self, desc: &RenderPipelineDescriptor) -> MetalResult<RawId> {
        let native = unsafe { render_pipeline_descriptor(desc) };
        let state = self.device.newRenderPipelineStateWithDescriptor_error(&native);
        into_raw(state.map_err(|error| ns_error(MetalErrorDomain::Library, &error))?)
    }

    // ===== Command buffers =====

    fn new_command_buffer(&self) -> MetalResult<RawId> {
        created(self.queue.commandBuffer(), "commandBuffer")
    }

    fn push_debug_group(&self, command_buffer: RawId, name: &str) {
        let command_buffer = unsafe { borrowed::<ProtocolObject<dyn MTLCommandBuffer>>(command_buffer) };
        command_buffer.pushDebugGroup(&NSString::from_str(name));
    }

    fn pop_debug_group(&self, command_buffer: RawId) {
        unsafe { borrowed::<ProtocolObject<dyn MTLCommandBuffer>>(command_buffer) }.popDebugGroup();
    }

    fn present_drawable(&self, command_buffer: RawId, drawable: RawId) {
        let command_buffer = unsafe { borrowed::<ProtocolObject<dyn MTLCommandBuffer>>(command_buffer) };
        command_buffer.presentDrawable(unsafe { borrowed::<ProtocolObject<dyn MTLDrawable>>(drawable) });
    }

    fn commit(&self, command_buffer: RawId, completed: CompletionHandler) {
        let command_buffer = unsafe { borrowed::<ProtocolObject<dyn MTLCommandBuffer>>(command_buffer) };
        let completed = Cell::new(Some(completed));
        let block = RcBlock::new(move |buffer: NonNull<ProtocolObject<dyn MTLCommandBuffer>>| {
            let Some(completed) = completed.take() else { return };
            let error = unsafe { buffer.as_ref() }.error();
            completed(match error {
                Some(error) => Err(ns_error(MetalErrorDomain::CommandBuffer, &error)),
                None => Ok(()),
            });
        });
        unsafe { command_buffer.addCompletedHandler(&*block as *const _ as *mut _) };
        command_buffer.commit();
    }

    // ===== Render command encoder =====

    fn new_render_command_encoder(&self, command_buffer: RawId, desc: &RenderPassDescriptor) -> MetalResult<RawId> {
        let command_buffer = unsafe { borrowed::<ProtocolObject<dyn MTLCommandBuffer>>(command_buffer) };
        let native = unsafe { render_pass_descriptor(desc) };
        created(command_buffer.renderCommandEncoderWithDescriptor(&native), "renderCommandEncoderWithDescriptor")
    }

    fn end_encoding(&self, encoder: RawId) {
        unsafe { borrowed::<ProtocolObject<dyn MTLCommandEncoder>>(encoder) }.endEncoding();
    }

    fn set_render_pipeline_state(&self, encoder: RawId, state: RawId) {
        unsafe {
            render_encoder(encoder).setRenderPipelineState(borrowed::<ProtocolObject<dyn MTLRenderPipelineState>>(state))
        }
    }

    fn set_depth_stencil_state(&self, encoder: RawId, state: RawId) {
        unsafe {
            render_encoder(encoder)
                .setDepthStencilState(Some(borrowed::<ProtocolObject<dyn MTLDepthStencilState>>(state)))
        }
    }

    fn set_stencil_reference_value(&self, encoder: RawId, value: u32) {
        unsafe { render_encoder(encoder) }.setStencilReferenceValue(value);
    }

    fn set_cull_mode(&self, encoder: RawId, mode: u64) {
        unsafe { render_encoder(encoder) }.setCullMode(MTLCullMode(mode as usize));
    }

    fn set_triangle_fill_mode(&self, encoder: RawId, mode: u64) {
        unsafe { render_encoder(encoder) }.setTriangleFillMode(MTLTriangleFillMode(mode as usize));
    }

    fn set_viewport(&self, encoder: RawId, viewport: &MtlViewport) {
        unsafe { render_encoder(encoder) }.setViewport(MTLViewport {
            originX: viewport.origin_x,
            originY: viewport.origin_y,
            width: viewport.width,
            height: viewport.height,
            znear: viewport.znear,
            zfar: viewport.zfar,
        });
    }

    fn set_scissor_rect(&self, encoder: RawId, rect: ScissorRect) {
        unsafe { render_encoder(encoder) }.setScissorRect(MTLScissorRect {
            x: rect.x as usize,
            y: rect.y as usize,
            width: rect.width as usize,
            height: rect.height as usize,
        });
    }

    fn set_vertex_buffer(&self, encoder: RawId, buffer: Option<RawId>, offset: usize, index: u32) {
        unsafe {
            render_encoder(encoder).setVertexBuffer_offset_atIndex(
                borrowed_opt::<ProtocolObject<dyn MTLBuffer>>(buffer),
                offset,
                index as usize,
            )
        }
    }

    fn set_fragment_buffer(&self, encoder: RawId, buffer: Option<RawId>, offset: usize, index: u32) {
        unsafe {
            render_encoder(encoder).setFragmentBuffer_offset_atIndex(
                borrowed_opt::<ProtocolObject<dyn MTLBuffer>>(buffer),
                offset,
                index as usize,
            )
        }
    }

    fn set_fragment_texture(&self, encoder: RawId, texture: Option<RawId>, index: u32) {
        unsafe {
            render_encoder(encoder)
                .setFragmentTexture_atIndex(borrowed_opt::<ProtocolObject<dyn MTLTexture>>(texture), index as usize)
        }
    }

    fn set_fragment_sampler_state(&self, encoder: RawId, sampler: Option<RawId>, index: u32) {
        unsafe {
            render_encoder(encoder).setFragmentSamplerState_atIndex(
                borrowed_opt::<ProtocolObject<dyn MTLSamplerState>>(sampler),
                index as usize,
            )
        }
    }

    fn draw_indexed_primitives(&self, encoder: RawId, primitive_type: u64, index_count: u32, index_type: u64,
        index_buffer: RawId, index_buffer_offset: usize) {
        unsafe {
            render_encoder(encoder).drawIndexedPrimitives_indexCount_indexType_indexBuffer_indexBufferOffset(
                MTLPrimitiveType(primitive_type as usize),
                index_count as usize,
                MTLIndexType(index_type as usize),
                borrowed::<ProtocolObject<dyn MTLBuffer>>(index_buffer),
                index_buffer_offset,
            )
        }
    }

    // ===== Blit command encoder =====

    fn new_blit_command_encoder(&self, command_buffer: RawId) -> MetalResult<RawId> {
        let command_buffer = unsafe { borrowed::<ProtocolObject<dyn MTLCommandBuffer>>(command_buffer) };
        created(command_buffer.blitCommandEncoder(), "blitCommandEncoder")
    }

    fn copy_from_texture(&self, encoder: RawId, source: RawId, source_slice: u32, source_level: u32,
        source_region: MtlRegion, destination: RawId, destination_slice: u32, destination_level: u32,
        destination_origin: UVec2) {
        let source_region = region(source_region);
        unsafe {
            let encoder = borrowed::<ProtocolObject<dyn MTLBlitCommandEncoder>>(encoder);
            encoder.copyFromTexture_sourceSlice_sourceLevel_sourceOrigin_sourceSize_toTexture_destinationSlice_destinationLevel_destinationOrigin(
                borrowed::<ProtocolObject<dyn MTLTexture>>(source),
                source_slice as usize,
                source_level as usize,
                source_region.origin,
                source_region.size,
                borrowed::<ProtocolObject<dyn MTLTexture>>(destination),
                destination_slice as usize,
                destination_level as usize,
                MTLOrigin { x: destination_origin.x as usize, y: destination_origin.y as usize, z: 0 },
            )
        }
    }
}

unsafe fn render_encoder<'a>(encoder: RawId) -> &'a ProtocolObject<dyn MTLRenderCommandEncoder> {
    borrowed(encoder)
}

// ============================================================================
// NativeMetalLayer
// ============================================================================

/// `CAMetalLayer` of the platform window, attached to the device
pub struct NativeMetalLayer {
    layer: Id<CAMetalLayer>,
}

// SAFETY: drawables are only requested from the render thread.
unsafe impl Send for NativeMetalLayer {}

impl NativeMetalLayer {
    pub fn new(api: &NativeMetal, layer: Id<CAMetalLayer>) -> Self {
        unsafe {
            layer.setDevice(Some(api.device()));
            layer.setFramebufferOnly(true);
        }
        Self { layer }
    }
}

impl MetalLayer for NativeMetalLayer {
    fn configure(&mut self, pixel_format: u64, size: UVec2, display_sync: bool) {
        unsafe {
            self.layer.setPixelFormat(MTLPixelFormat(pixel_format as usize));
            #[cfg(target_os = "macos")]
            self.layer.setDisplaySyncEnabled(display_sync);
        }
        #[cfg(not(target_os = "macos"))]
        let _ = display_sync;
        self.set_drawable_size(size);
    }

    fn set_drawable_size(&mut self, size: UVec2) {
        unsafe { self.layer.setDrawableSize(CGSize::new(size.x as f64, size.y as f64)) };
    }

    fn next_drawable(&mut self) -> MetalResult<Drawable> {
        let drawable: Id<ProtocolObject<dyn CAMetalDrawable>> = unsafe { self.layer.nextDrawable() }.ok_or_else(|| {
            MetalError::new(MetalErrorDomain::Device, METAL_DEVICE_ERROR_NO_DRAWABLE, "nextDrawable returned nil")
        })?;
        // The drawable keeps its texture alive
        let texture = unsafe { drawable.texture() };
        let texture = RawId::from_ptr(Id::as_ptr(&texture) as *mut c_void).ok_or_else(|| nil("texture"))?;
        Ok(Drawable { drawable: into_raw(drawable)?, texture })
    }

    fn display_modes(&self) -> Vec<UVec2> {
        // Screen modes live in AppKit/UIKit; the layer only knows its own size
        Vec::new()
    }
}

#[cfg(test)]
#[path = "metal_native_tests.rs"]
mod tests;
