/*!
# Galaxy 3D Graphics - Metal Backend

Metal implementation of `RenderDevice`.

Every native call goes through the `MetalApi` trait, which mirrors the
`MTLDevice`, command buffer and encoder methods the backend needs and owns
Objective-C reference counting. On Apple platforms `NativeMetal` implements
it over `objc2-metal` and `NativeMetalLayer` wraps the window's
`CAMetalLayer`; the platform layer hands them over as `MetalApi` and
`MetalLayer`.

Up to three frames are in flight. Encoder state is cached per render pass;
sampler and render pipeline states are interned by descriptor and shared.
*/

// Native seam
mod metal_api;
mod metal_constants;
mod metal_error;
#[cfg(target_vendor = "apple")]
mod metal_native;

// Encoder state and frames
mod metal_format;
mod metal_frame;
mod metal_state_cache;

// Resources
mod metal_blend_state;
mod metal_buffer;
mod metal_depth_stencil_state;
mod metal_render_target;
mod metal_resource;
mod metal_shader;
mod metal_texture;

mod metal_render_device;

#[cfg(test)]
mod mock_metal;

pub use metal_api::{
    ColorAttachmentBlend, ColorAttachmentDescriptor, CompletionHandler, DepthAttachmentDescriptor,
    DepthStencilDescriptor, Drawable, MetalApi, MetalError, MetalErrorDomain, MetalLayer, MetalResult, MtlRegion,
    MtlViewport, RawId, RenderPassDescriptor, RenderPipelineDescriptor, SamplerDescriptor, ScissorRect,
    StencilAttachmentDescriptor, StencilDescriptor, TextureDescriptor, VertexAttributeDescriptor,
};
pub use metal_error::{metal_error_name, MetalErrorCode};
#[cfg(target_vendor = "apple")]
pub use metal_native::{NativeMetal, NativeMetalLayer};
pub use metal_render_device::{MetalDeviceConfig, MetalRenderDevice};
pub use metal_resource::MetalResource;
