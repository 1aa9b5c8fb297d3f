/// RenderDevice trait - the contract every native backend implements

use crate::engine_bail;
use crate::error::Result;
use crate::renderer::command::Command;
use crate::renderer::config::Driver;
use glam::UVec2;

/// Clip space depth range expected by the native API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipConvention {
    /// Depth in [-1, 1], origin bottom-left (OpenGL)
    NegativeOneToOne,
    /// Depth in [0, 1], origin top-left (Direct3D, Metal)
    ZeroToOne,
}

/// Features queried at device initialization
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub api_major_version: u16,
    pub api_minor_version: u16,
    pub npot_textures: bool,
    pub anisotropic_filtering: bool,
    pub render_targets: bool,
    pub clamp_to_border: bool,
    pub multisampling: bool,
    pub uint_indices: bool,
    pub copy_image: bool,
    pub debug_markers: bool,
    pub vertex_array_objects: bool,
    pub texture_base_level: bool,
    pub texture_max_level: bool,
    pub max_anisotropy: u32,
    /// Highest supported sample count (1 without multisampling)
    pub sample_count: u32,
    pub supported_resolutions: Vec<UVec2>,
    pub clip_convention: ClipConvention,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            api_major_version: 0,
            api_minor_version: 0,
            npot_textures: false,
            anisotropic_filtering: false,
            render_targets: false,
            clamp_to_border: false,
            multisampling: false,
            uint_indices: false,
            copy_image: false,
            debug_markers: false,
            vertex_array_objects: false,
            texture_base_level: false,
            texture_max_level: false,
            max_anisotropy: 1,
            sample_count: 1,
            supported_resolutions: Vec::new(),
            clip_convention: ClipConvention::NegativeOneToOne,
        }
    }
}

/// A native graphics device driven by the render thread
///
/// A device is created on the render thread and never leaves it: resources,
/// state cache and native context are only touched from `execute`. Backends
/// implement `execute` with an exhaustive match over `Command`.
pub trait RenderDevice: Send {
    /// Native API of this device
    fn driver(&self) -> Driver;

    /// Features queried at initialization
    fn capabilities(&self) -> &Capabilities;

    /// Execute one command
    ///
    /// An error aborts the rest of the current command buffer.
    fn execute(&mut self, command: Command) -> Result<()>;

    /// The native context was lost
    ///
    /// Devices without context loss keep the default no-op.
    fn invalidate(&mut self) {}

    /// A new native context is current; reset cached state
    fn restore_context(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Coarse device lifecycle
///
/// Transitions only move forward, one step at a time; a destroyed device is
/// not reusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceState {
    Uninitialized,
    /// Native device/context creation and capability probing
    Initializing,
    /// Render thread alive, draining the queue
    Running,
    /// Running flag cleared, final buffer draining
    ShuttingDown,
    /// Native objects released, thread joined
    Destroyed,
}

impl DeviceState {
    /// The only state reachable from this one
    pub fn next(&self) -> Option<DeviceState> {
        match self {
            DeviceState::Uninitialized => Some(DeviceState::Initializing),
            DeviceState::Initializing => Some(DeviceState::Running),
            DeviceState::Running => Some(DeviceState::ShuttingDown),
            DeviceState::ShuttingDown => Some(DeviceState::Destroyed),
            DeviceState::Destroyed => None,
        }
    }

    /// Move to `next`, or fail with `InvalidState`
    ///
    /// A failed initialization may jump straight from `Initializing` to
    /// `Destroyed`.
    pub fn transition(&mut self, next: DeviceState) -> Result<()> {
        let allowed = self.next() == Some(next)
            || (*self == DeviceState::Initializing && next == DeviceState::Destroyed);
        if !allowed {
            engine_bail!("galaxy3d::RenderDevice", InvalidState,
                "Cannot move render device from {:?} to {:?}", self, next);
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "render_device_tests.rs"]
mod tests;
