/// Blend state: translated once at creation, applied through the state cache

use crate::opengl_api::GlProfile;
use crate::opengl_format::{blend_factor, blend_operation};
use crate::opengl_state_cache::GlBlend;
use galaxy_3d_graphics::galaxy3d::render::{BlendStateDesc, ColorMask};
use galaxy_3d_graphics::galaxy3d::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlBlendState {
    pub blend: GlBlend,
    pub color_mask: [bool; 4],
}

impl GlBlendState {
    pub fn new(desc: &BlendStateDesc, profile: &GlProfile) -> Result<Self> {
        let blend = GlBlend {
            enabled: desc.enable_blending,
            mode_rgb: blend_operation(desc.color_operation, profile)?,
            mode_alpha: blend_operation(desc.alpha_operation, profile)?,
            source_rgb: blend_factor(desc.color_blend_source),
            dest_rgb: blend_factor(desc.color_blend_dest),
            source_alpha: blend_factor(desc.alpha_blend_source),
            dest_alpha: blend_factor(desc.alpha_blend_dest),
        };

        let mask = desc.color_mask;
        Ok(Self {
            blend,
            color_mask: [
                mask.contains(ColorMask::RED),
                mask.contains(ColorMask::GREEN),
                mask.contains(ColorMask::BLUE),
                mask.contains(ColorMask::ALPHA),
            ],
        })
    }
}
