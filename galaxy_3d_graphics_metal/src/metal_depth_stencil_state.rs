/// Depth-stencil state objects
///
/// With the depth test off Metal still runs the depth stage, so it compares
/// with `Always` and never writes. The stencil reference value is set on the
/// encoder with every bind.

use crate::metal_api::{DepthStencilDescriptor, RawId, StencilDescriptor};
use crate::metal_constants::MTL_COMPARE_FUNCTION_ALWAYS;
use crate::metal_error::check_creation;
use crate::metal_format::{compare_function, stencil_operation};
use crate::metal_resource::{objc_handle, MetalContext, ObjcHandle};
use galaxy_3d_graphics::galaxy3d::render::{DepthStencilDesc, StencilFaceDesc};
use galaxy_3d_graphics::galaxy3d::Result;

fn stencil_face(face: &StencilFaceDesc, desc: &DepthStencilDesc) -> StencilDescriptor {
    StencilDescriptor {
        stencil_failure_operation: stencil_operation(face.failure_operation),
        depth_failure_operation: stencil_operation(face.depth_failure_operation),
        depth_stencil_pass_operation: stencil_operation(face.pass_operation),
        stencil_compare_function: compare_function(face.compare_function),
        read_mask: desc.stencil_read_mask,
        write_mask: desc.stencil_write_mask,
    }
}

pub fn depth_stencil_descriptor(desc: &DepthStencilDesc) -> DepthStencilDescriptor {
    let stencil = |face: &StencilFaceDesc| desc.stencil_enabled.then(|| stencil_face(face, desc));
    DepthStencilDescriptor {
        depth_compare_function: if desc.depth_test { compare_function(desc.compare_function) } else { MTL_COMPARE_FUNCTION_ALWAYS },
        depth_write_enabled: desc.depth_test && desc.depth_write,
        front_face_stencil: stencil(&desc.front_face),
        back_face_stencil: stencil(&desc.back_face),
    }
}

pub struct MetalDepthStencilState {
    raw: RawId,
    _state: ObjcHandle,
}

impl MetalDepthStencilState {
    pub fn new(context: &mut MetalContext, desc: &DepthStencilDesc) -> Result<Self> {
        let native = depth_stencil_descriptor(desc);
        let raw = check_creation(context.api.new_depth_stencil_state(&native),
            "Failed to create depth stencil state")?;
        Ok(Self { raw, _state: objc_handle(&context.api, raw) })
    }

    pub fn state(&self) -> RawId {
        self.raw
    }
}
