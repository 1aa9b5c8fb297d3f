/// Depth and stencil state
///
/// Test enables, depth function and write masks go through the state cache;
/// per-face stencil operations and functions are issued on every bind
/// because the reference value comes with the bind command.

use crate::opengl_constants::*;
use crate::opengl_error::check;
use crate::opengl_format::{compare_function, stencil_operation};
use crate::opengl_resource::GlContext;
use galaxy_3d_graphics::galaxy3d::render::{DepthStencilDesc, StencilFaceDesc};
use galaxy_3d_graphics::galaxy3d::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlStencilFace {
    pub fail: GLenum,
    pub depth_fail: GLenum,
    pub pass: GLenum,
    pub function: GLenum,
}

impl GlStencilFace {
    fn new(desc: &StencilFaceDesc) -> Self {
        Self {
            fail: stencil_operation(desc.failure_operation),
            depth_fail: stencil_operation(desc.depth_failure_operation),
            pass: stencil_operation(desc.pass_operation),
            function: compare_function(desc.compare_function),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlDepthStencilState {
    pub depth_test: bool,
    pub depth_mask: bool,
    pub depth_function: GLenum,
    pub stencil_test: bool,
    pub stencil_read_mask: GLuint,
    pub stencil_write_mask: GLuint,
    pub front_face: GlStencilFace,
    pub back_face: GlStencilFace,
}

impl GlDepthStencilState {
    pub fn new(desc: &DepthStencilDesc) -> Self {
        Self {
            depth_test: desc.depth_test,
            depth_mask: desc.depth_write,
            depth_function: compare_function(desc.compare_function),
            stencil_test: desc.stencil_enabled,
            stencil_read_mask: desc.stencil_read_mask,
            stencil_write_mask: desc.stencil_write_mask,
            front_face: GlStencilFace::new(&desc.front_face),
            back_face: GlStencilFace::new(&desc.back_face),
        }
    }

    pub fn apply(&self, context: &mut GlContext, stencil_reference: u32) -> Result<()> {
        let state = &mut context.state;
        state.enable_depth_test(self.depth_test)?;
        state.set_depth_mask(self.depth_mask)?;
        state.set_depth_func(self.depth_function)?;
        state.enable_stencil_test(self.stencil_test)?;
        state.set_stencil_mask(self.stencil_write_mask)?;

        if self.stencil_test {
            let api = context.api.as_ref();
            for (face, desc) in [(FRONT, &self.front_face), (BACK, &self.back_face)] {
                api.stencil_op_separate(face, desc.fail, desc.depth_fail, desc.pass);
                api.stencil_func_separate(face, desc.function, stencil_reference as GLint, self.stencil_read_mask);
            }
            check(api, "Failed to set stencil state")?;
        }
        Ok(())
    }

    /// Depth and stencil testing off, depth writes off
    pub fn apply_disabled(context: &mut GlContext) -> Result<()> {
        let state = &mut context.state;
        state.enable_depth_test(false)?;
        state.set_depth_mask(false)?;
        state.enable_stencil_test(false)?;
        state.set_stencil_mask(0xFFFF_FFFF)
    }
}
