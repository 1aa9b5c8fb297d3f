/// Render device configuration shared by every backend

use crate::engine_bail;
use crate::error::Result;
use crate::renderer::types::SamplerFilter;
use glam::UVec2;

/// Native API implementing the render device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    /// Accepts every command and renders nothing
    Empty,
    OpenGl,
    Direct3D11,
    Metal,
}

impl Driver {
    pub fn name(&self) -> &'static str {
        match self {
            Driver::Empty => "Empty",
            Driver::OpenGl => "OpenGL",
            Driver::Direct3D11 => "Direct3D 11",
            Driver::Metal => "Metal",
        }
    }
}

/// Parameters used to create a render device
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDeviceConfig {
    pub driver: Driver,
    /// Drawable surface size in pixels
    pub size: UVec2,
    /// 1 disables multisampling
    pub sample_count: u32,
    /// Filter applied to the default sampler
    pub texture_filter: SamplerFilter,
    pub max_anisotropy: u32,
    pub srgb: bool,
    pub vsync: bool,
    pub depth: bool,
    pub stencil: bool,
    /// Enables native debug layers and error checks after every call
    pub debug_renderer: bool,
    /// Name of the render thread
    pub thread_name: String,
}

impl Default for RenderDeviceConfig {
    fn default() -> Self {
        Self {
            driver: Driver::Empty,
            size: UVec2::new(1280, 720),
            sample_count: 1,
            texture_filter: SamplerFilter::Point,
            max_anisotropy: 1,
            srgb: false,
            vsync: true,
            depth: true,
            stencil: false,
            debug_renderer: cfg!(debug_assertions),
            thread_name: "Render".to_string(),
        }
    }
}

impl RenderDeviceConfig {
    /// Reject configurations no backend can create
    pub fn validate(&self) -> Result<()> {
        const SOURCE: &str = "galaxy3d::RenderDeviceConfig";

        if self.size.x == 0 || self.size.y == 0 {
            engine_bail!(SOURCE, InvalidParameter,
                "Invalid surface size {}x{}", self.size.x, self.size.y);
        }
        if !self.sample_count.is_power_of_two() {
            engine_bail!(SOURCE, InvalidParameter,
                "Sample count must be a power of two, got {}", self.sample_count);
        }
        if self.max_anisotropy == 0 {
            engine_bail!(SOURCE, InvalidParameter, "Max anisotropy must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
