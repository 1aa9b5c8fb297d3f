/// Blend states
///
/// Metal blending is part of the render pipeline state, so a blend state is
/// only a descriptor; its serial keys the pipelines built from it.

use crate::metal_api::ColorAttachmentBlend;
use crate::metal_constants::*;
use crate::metal_format::{blend_factor, blend_operation, color_write_mask};
use crate::metal_resource::MetalContext;
use galaxy_3d_graphics::galaxy3d::render::BlendStateDesc;

/// Pipeline blending with no blend state set
pub fn default_blend(pixel_format: u64) -> ColorAttachmentBlend {
    ColorAttachmentBlend {
        pixel_format,
        blending_enabled: false,
        source_rgb_blend_factor: MTL_BLEND_FACTOR_ONE,
        destination_rgb_blend_factor: MTL_BLEND_FACTOR_ZERO,
        rgb_blend_operation: MTL_BLEND_OPERATION_ADD,
        source_alpha_blend_factor: MTL_BLEND_FACTOR_ONE,
        destination_alpha_blend_factor: MTL_BLEND_FACTOR_ZERO,
        alpha_blend_operation: MTL_BLEND_OPERATION_ADD,
        write_mask: MTL_COLOR_WRITE_MASK_ALL,
    }
}

pub struct MetalBlendState {
    serial: u64,
    desc: BlendStateDesc,
}

impl MetalBlendState {
    pub fn new(context: &mut MetalContext, desc: &BlendStateDesc) -> Self {
        Self { serial: context.next_serial(), desc: *desc }
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Blending of a color attachment of `pixel_format`
    pub fn attachment(&self, pixel_format: u64) -> ColorAttachmentBlend {
        ColorAttachmentBlend {
            pixel_format,
            blending_enabled: self.desc.enable_blending,
            source_rgb_blend_factor: blend_factor(self.desc.color_blend_source),
            destination_rgb_blend_factor: blend_factor(self.desc.color_blend_dest),
            rgb_blend_operation: blend_operation(self.desc.color_operation),
            source_alpha_blend_factor: blend_factor(self.desc.alpha_blend_source),
            destination_alpha_blend_factor: blend_factor(self.desc.alpha_blend_dest),
            alpha_blend_operation: blend_operation(self.desc.alpha_operation),
            write_mask: color_write_mask(self.desc.color_mask),
        }
    }
}
