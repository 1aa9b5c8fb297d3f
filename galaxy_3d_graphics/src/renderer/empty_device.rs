/// Render device that accepts every command and renders nothing
///
/// Used for headless runs (servers, tools) and as the `Driver::Empty` backend.
/// Resources are still tracked so handle misuse is reported like on a real device.

use crate::error::Result;
use crate::renderer::command::Command;
use crate::renderer::config::{Driver, RenderDeviceConfig};
use crate::renderer::render_device::{Capabilities, ClipConvention, RenderDevice};
use crate::resource::{RenderResource, ResourceTable, ResourceType};

/// Placeholder for a resource that has no native object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyResource {
    resource_type: ResourceType,
}

impl RenderResource for EmptyResource {
    fn resource_type(&self) -> ResourceType {
        self.resource_type
    }
}

pub struct EmptyRenderDevice {
    capabilities: Capabilities,
    resources: ResourceTable<EmptyResource>,
    frames: u64,
}

impl EmptyRenderDevice {
    pub fn new(config: &RenderDeviceConfig) -> Result<Self> {
        let capabilities = Capabilities {
            npot_textures: true,
            render_targets: true,
            uint_indices: true,
            sample_count: config.sample_count,
            max_anisotropy: config.max_anisotropy,
            supported_resolutions: vec![config.size],
            clip_convention: ClipConvention::NegativeOneToOne,
            ..Capabilities::default()
        };

        Ok(Self {
            capabilities,
            resources: ResourceTable::new(),
            frames: 0,
        })
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn resources(&self) -> &ResourceTable<EmptyResource> {
        &self.resources
    }

    fn create(&mut self, id: usize, resource_type: ResourceType) -> Result<()> {
        self.resources.insert(id, EmptyResource { resource_type })
    }
}

impl RenderDevice for EmptyRenderDevice {
    fn driver(&self) -> Driver {
        Driver::Empty
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::InitRenderTarget(c) => self.create(c.render_target, ResourceType::RenderTarget),
            Command::InitDepthStencilState(c) => {
                self.create(c.depth_stencil_state, ResourceType::DepthStencilState)
            }
            Command::InitBlendState(c) => self.create(c.blend_state, ResourceType::BlendState),
            Command::InitBuffer(c) => self.create(c.buffer, ResourceType::Buffer),
            Command::InitShader(c) => self.create(c.shader, ResourceType::Shader),
            Command::InitTexture(c) => self.create(c.texture, ResourceType::Texture),
            Command::DeleteResource(c) => {
                self.resources.remove(c.resource);
                Ok(())
            }
            Command::Present => {
                self.frames += 1;
                Ok(())
            }
            Command::Resize(_)
            | Command::SetRenderTarget(_)
            | Command::ClearRenderTarget(_)
            | Command::SetScissorTest(_)
            | Command::SetViewport(_)
            | Command::SetDepthStencilState(_)
            | Command::SetPipelineState(_)
            | Command::Draw(_)
            | Command::SetBufferData(_)
            | Command::SetShaderConstants(_)
            | Command::SetTextureData(_)
            | Command::SetTextureParameters(_)
            | Command::SetTextures(_)
            | Command::Blit(_)
            | Command::PushDebugMarker(_)
            | Command::PopDebugMarker => Ok(()),
        }
    }
}
