/// Clip space conventions
///
/// Projection matrices are built for OpenGL clip space (depth in [-1, 1]).
/// `projection_transform` returns the matrix to pre-multiply so the result
/// matches what the active backend expects.

use crate::renderer::render_device::ClipConvention;
use glam::{Mat4, Vec4};

/// Matrix mapping OpenGL clip space into `clip` conventions
///
/// * `ZeroToOne` remaps depth from [-1, 1] to [0, 1].
/// * `NegativeOneToOne` flips Y when rendering into a render target, since
///   OpenGL textures are stored bottom-up.
pub fn projection_transform(clip: ClipConvention, render_target: bool) -> Mat4 {
    match clip {
        ClipConvention::ZeroToOne => Mat4::from_cols(
            Vec4::X,
            Vec4::Y,
            Vec4::new(0.0, 0.0, 0.5, 0.0),
            Vec4::new(0.0, 0.0, 0.5, 1.0),
        ),
        ClipConvention::NegativeOneToOne if render_target => {
            Mat4::from_scale(glam::Vec3::new(1.0, -1.0, 1.0))
        }
        ClipConvention::NegativeOneToOne => Mat4::IDENTITY,
    }
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
