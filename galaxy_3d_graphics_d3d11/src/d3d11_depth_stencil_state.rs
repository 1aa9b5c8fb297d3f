/// Depth-stencil state objects
///
/// The stencil reference value is not part of the object; it is passed with
/// every bind.

use crate::d3d11_api::{DepthStencilDesc as NativeDepthStencilDesc, DepthStencilOpDesc, RawCom};
use crate::d3d11_constants::*;
use crate::d3d11_error::check_creation;
use crate::d3d11_format::{compare_function, stencil_operation};
use crate::d3d11_resource::{com_handle, ComHandle, D3d11Context};
use galaxy_3d_graphics::galaxy3d::render::{DepthStencilDesc, StencilFaceDesc};
use galaxy_3d_graphics::galaxy3d::Result;

fn stencil_face(desc: &StencilFaceDesc) -> DepthStencilOpDesc {
    DepthStencilOpDesc {
        stencil_fail_op: stencil_operation(desc.failure_operation),
        stencil_depth_fail_op: stencil_operation(desc.depth_failure_operation),
        stencil_pass_op: stencil_operation(desc.pass_operation),
        stencil_func: compare_function(desc.compare_function),
    }
}

/// Native descriptor; Direct3D 11 stencil masks are 8 bits wide
pub fn depth_stencil_desc(desc: &DepthStencilDesc) -> NativeDepthStencilDesc {
    NativeDepthStencilDesc {
        depth_enable: desc.depth_test,
        depth_write_mask: if desc.depth_write { D3D11_DEPTH_WRITE_MASK_ALL } else { D3D11_DEPTH_WRITE_MASK_ZERO },
        depth_func: compare_function(desc.compare_function),
        stencil_enable: desc.stencil_enabled,
        stencil_read_mask: (desc.stencil_read_mask & 0xFF) as u8,
        stencil_write_mask: (desc.stencil_write_mask & 0xFF) as u8,
        front_face: stencil_face(&desc.front_face),
        back_face: stencil_face(&desc.back_face),
    }
}

pub struct D3d11DepthStencilState {
    raw: RawCom,
    _state: ComHandle,
}

impl D3d11DepthStencilState {
    pub fn new(context: &mut D3d11Context, desc: &DepthStencilDesc) -> Result<Self> {
        let native = depth_stencil_desc(desc);
        let raw = check_creation(context.api.create_depth_stencil_state(&native),
            "Failed to create depth stencil state")?;
        Ok(Self { raw, _state: com_handle(&context.api, raw) })
    }

    pub fn state(&self) -> RawCom {
        self.raw
    }
}
