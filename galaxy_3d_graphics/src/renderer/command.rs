/// Render commands
///
/// A `Command` is a fully owned value: it never borrows from the producer, so it
/// can cross the thread boundary and be executed much later. The set of command
/// kinds is closed and every backend matches it exhaustively.

use crate::renderer::data_type::DataType;
use crate::renderer::pixel_format::PixelFormat;
use crate::renderer::types::{
    BlendStateDesc, BufferType, Color, CubeFace, CullMode, DepthStencilDesc, DrawMode, FillMode,
    Flags, MipLevel, Rect, SamplerAddressMode, SamplerFilter, TextureType,
};
use crate::renderer::vertex::VertexUsage;
use crate::resource::ResourceId;
use glam::UVec2;
use std::collections::BTreeSet;

/// Named shader constant and its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderConstantInfo {
    pub name: String,
    pub data_type: DataType,
}

impl ShaderConstantInfo {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self { name: name.into(), data_type }
    }
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeCommand {
    pub size: UVec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteResourceCommand {
    pub resource: ResourceId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitRenderTargetCommand {
    pub render_target: ResourceId,
    pub color_textures: Vec<ResourceId>,
    /// 0 for no depth attachment
    pub depth_texture: ResourceId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetRenderTargetCommand {
    /// 0 selects the default framebuffer
    pub render_target: ResourceId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClearRenderTargetCommand {
    pub clear_color_buffer: bool,
    pub clear_depth_buffer: bool,
    pub clear_stencil_buffer: bool,
    pub clear_color: Color,
    pub clear_depth: f32,
    pub clear_stencil: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetScissorTestCommand {
    pub enabled: bool,
    pub rectangle: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetViewportCommand {
    pub viewport: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitDepthStencilStateCommand {
    pub depth_stencil_state: ResourceId,
    pub desc: DepthStencilDesc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetDepthStencilStateCommand {
    /// 0 disables depth and stencil testing
    pub depth_stencil_state: ResourceId,
    pub stencil_reference_value: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetPipelineStateCommand {
    /// 0 disables blending
    pub blend_state: ResourceId,
    /// 0 unbinds the shader
    pub shader: ResourceId,
    pub cull_mode: CullMode,
    pub fill_mode: FillMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub index_buffer: ResourceId,
    pub index_count: u32,
    /// Bytes per index
    pub index_size: u32,
    pub vertex_buffer: ResourceId,
    pub draw_mode: DrawMode,
    pub start_index: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitBlendStateCommand {
    pub blend_state: ResourceId,
    pub desc: BlendStateDesc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitBufferCommand {
    pub buffer: ResourceId,
    pub buffer_type: BufferType,
    pub flags: Flags,
    pub data: Vec<u8>,
    /// Allocation size; the larger of this and `data.len()` is allocated
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetBufferDataCommand {
    pub buffer: ResourceId,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitShaderCommand {
    pub shader: ResourceId,
    pub fragment_shader: Vec<u8>,
    pub vertex_shader: Vec<u8>,
    pub vertex_attributes: BTreeSet<VertexUsage>,
    pub fragment_shader_constants: Vec<ShaderConstantInfo>,
    pub vertex_shader_constants: Vec<ShaderConstantInfo>,
    pub fragment_shader_function: String,
    pub vertex_shader_function: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetShaderConstantsCommand {
    pub fragment_shader_constants: Vec<Vec<f32>>,
    pub vertex_shader_constants: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitTextureCommand {
    pub texture: ResourceId,
    pub levels: Vec<MipLevel>,
    pub texture_type: TextureType,
    pub flags: Flags,
    pub sample_count: u32,
    pub pixel_format: PixelFormat,
    pub filter: SamplerFilter,
    pub max_anisotropy: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetTextureDataCommand {
    pub texture: ResourceId,
    pub levels: Vec<MipLevel>,
    pub face: CubeFace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetTextureParametersCommand {
    pub texture: ResourceId,
    pub filter: SamplerFilter,
    pub address_x: SamplerAddressMode,
    pub address_y: SamplerAddressMode,
    pub address_z: SamplerAddressMode,
    pub border_color: Color,
    pub max_anisotropy: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetTexturesCommand {
    /// One entry per texture unit, 0 leaves the unit empty
    pub textures: Vec<ResourceId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlitCommand {
    pub source_texture: ResourceId,
    pub source_level: u32,
    pub source_x: u32,
    pub source_y: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub destination_texture: ResourceId,
    pub destination_level: u32,
    pub destination_x: u32,
    pub destination_y: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushDebugMarkerCommand {
    pub name: String,
}

// ============================================================================
// Command
// ============================================================================

/// One unit of GPU work or state change
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Resize(ResizeCommand),
    Present,
    DeleteResource(DeleteResourceCommand),
    InitRenderTarget(InitRenderTargetCommand),
    SetRenderTarget(SetRenderTargetCommand),
    ClearRenderTarget(ClearRenderTargetCommand),
    SetScissorTest(SetScissorTestCommand),
    SetViewport(SetViewportCommand),
    InitDepthStencilState(InitDepthStencilStateCommand),
    SetDepthStencilState(SetDepthStencilStateCommand),
    SetPipelineState(SetPipelineStateCommand),
    Draw(DrawCommand),
    InitBlendState(InitBlendStateCommand),
    InitBuffer(InitBufferCommand),
    SetBufferData(SetBufferDataCommand),
    InitShader(InitShaderCommand),
    SetShaderConstants(SetShaderConstantsCommand),
    InitTexture(InitTextureCommand),
    SetTextureData(SetTextureDataCommand),
    SetTextureParameters(SetTextureParametersCommand),
    SetTextures(SetTexturesCommand),
    Blit(BlitCommand),
    PushDebugMarker(PushDebugMarkerCommand),
    PopDebugMarker,
}

impl Command {
    /// Command kind, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Resize(_) => "resize",
            Command::Present => "present",
            Command::DeleteResource(_) => "deleteResource",
            Command::InitRenderTarget(_) => "initRenderTarget",
            Command::SetRenderTarget(_) => "setRenderTarget",
            Command::ClearRenderTarget(_) => "clearRenderTarget",
            Command::SetScissorTest(_) => "setScissorTest",
            Command::SetViewport(_) => "setViewport",
            Command::InitDepthStencilState(_) => "initDepthStencilState",
            Command::SetDepthStencilState(_) => "setDepthStencilState",
            Command::SetPipelineState(_) => "setPipelineState",
            Command::Draw(_) => "draw",
            Command::InitBlendState(_) => "initBlendState",
            Command::InitBuffer(_) => "initBuffer",
            Command::SetBufferData(_) => "setBufferData",
            Command::InitShader(_) => "initShader",
            Command::SetShaderConstants(_) => "setShaderConstants",
            Command::InitTexture(_) => "initTexture",
            Command::SetTextureData(_) => "setTextureData",
            Command::SetTextureParameters(_) => "setTextureParameters",
            Command::SetTextures(_) => "setTextures",
            Command::Blit(_) => "blit",
            Command::PushDebugMarker(_) => "pushDebugMarker",
            Command::PopDebugMarker => "popDebugMarker",
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Command::Present)
    }

    /// Resource created by this command, if it is an `init*` command
    pub fn created_resource(&self) -> Option<ResourceId> {
        match self {
            Command::InitRenderTarget(c) => Some(c.render_target),
            Command::InitDepthStencilState(c) => Some(c.depth_stencil_state),
            Command::InitBlendState(c) => Some(c.blend_state),
            Command::InitBuffer(c) => Some(c.buffer),
            Command::InitShader(c) => Some(c.shader),
            Command::InitTexture(c) => Some(c.texture),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
