/// Blend state objects, created once from their descriptor

use crate::d3d11_api::{BlendDesc, RawCom};
use crate::d3d11_error::check_creation;
use crate::d3d11_format::{alpha_blend_factor, blend_factor, blend_operation, color_write_mask};
use crate::d3d11_resource::{com_handle, ComHandle, D3d11Context};
use galaxy_3d_graphics::galaxy3d::render::BlendStateDesc;
use galaxy_3d_graphics::galaxy3d::Result;

pub struct D3d11BlendState {
    raw: RawCom,
    _state: ComHandle,
}

impl D3d11BlendState {
    pub fn new(context: &mut D3d11Context, desc: &BlendStateDesc) -> Result<Self> {
        let blend = BlendDesc {
            blend_enable: desc.enable_blending,
            src_blend: blend_factor(desc.color_blend_source),
            dest_blend: blend_factor(desc.color_blend_dest),
            blend_op: blend_operation(desc.color_operation),
            src_blend_alpha: alpha_blend_factor(desc.alpha_blend_source)?,
            dest_blend_alpha: alpha_blend_factor(desc.alpha_blend_dest)?,
            blend_op_alpha: blend_operation(desc.alpha_operation),
            render_target_write_mask: color_write_mask(desc.color_mask),
        };
        let raw = check_creation(context.api.create_blend_state(&blend), "Failed to create blend state")?;
        Ok(Self { raw, _state: com_handle(&context.api, raw) })
    }

    pub fn state(&self) -> RawCom {
        self.raw
    }
}
