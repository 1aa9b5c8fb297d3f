/// Engine-wide vertex format
///
/// All vertex buffers use the same interleaved layout. Backends describe it to
/// the native API from `VERTEX_ATTRIBUTES`, in order, with stride `Vertex::STRIDE`.

use crate::renderer::data_type::DataType;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Semantic of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VertexUsage {
    Position,
    Color,
    TextureCoordinates0,
    TextureCoordinates1,
    Normal,
}

impl VertexUsage {
    /// Attribute name bound in shader sources
    pub fn attribute_name(&self) -> &'static str {
        match self {
            VertexUsage::Position => "position0",
            VertexUsage::Color => "color0",
            VertexUsage::TextureCoordinates0 => "texCoord0",
            VertexUsage::TextureCoordinates1 => "texCoord1",
            VertexUsage::Normal => "normal0",
        }
    }

    /// HLSL semantic name and index
    pub fn semantic(&self) -> (&'static str, u32) {
        match self {
            VertexUsage::Position => ("POSITION", 0),
            VertexUsage::Color => ("COLOR", 0),
            VertexUsage::TextureCoordinates0 => ("TEXCOORD", 0),
            VertexUsage::TextureCoordinates1 => ("TEXCOORD", 1),
            VertexUsage::Normal => ("NORMAL", 0),
        }
    }
}

/// One attribute of the vertex layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub usage: VertexUsage,
    pub data_type: DataType,
}

/// Layout of `Vertex`, in memory order
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 5] = [
    VertexAttribute { usage: VertexUsage::Position, data_type: DataType::FloatVector3 },
    VertexAttribute { usage: VertexUsage::Color, data_type: DataType::UnsignedByteVector4Norm },
    VertexAttribute { usage: VertexUsage::TextureCoordinates0, data_type: DataType::FloatVector2 },
    VertexAttribute { usage: VertexUsage::TextureCoordinates1, data_type: DataType::FloatVector2 },
    VertexAttribute { usage: VertexUsage::Normal, data_type: DataType::FloatVector3 },
];

/// Interleaved vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub color: [u8; 4],
    pub tex_coords: [Vec2; 2],
    pub normal: Vec3,
}

impl Vertex {
    /// Byte distance between consecutive vertices
    pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;

    pub fn new(position: Vec3, color: [u8; 4], tex_coord: Vec2, normal: Vec3) -> Self {
        Self { position, color, tex_coords: [tex_coord, Vec2::ZERO], normal }
    }
}

/// Byte offset of each attribute in `VERTEX_ATTRIBUTES`
pub fn vertex_attribute_offsets() -> [u32; 5] {
    let mut offsets = [0u32; 5];
    let mut offset = 0;
    for (i, attribute) in VERTEX_ATTRIBUTES.iter().enumerate() {
        offsets[i] = offset;
        offset += attribute.data_type.size();
    }
    offsets
}

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
