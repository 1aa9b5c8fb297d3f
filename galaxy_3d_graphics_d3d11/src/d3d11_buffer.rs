/// Vertex and index buffers
///
/// Dynamic buffers are CPU-writable and refilled with `Map(WRITE_DISCARD)`;
/// a larger upload recreates the buffer. Static buffers created with data are
/// immutable.

use crate::d3d11_api::{BufferDesc, RawCom};
use crate::d3d11_constants::*;
use crate::d3d11_error::{check_creation, SOURCE};
use crate::d3d11_resource::{com_handle, empty_handle, ComHandle, D3d11Context, Mapping};
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::render::{BufferType, Flags, InitBufferCommand};
use galaxy_3d_graphics::galaxy3d::Result;

pub struct D3d11Buffer {
    buffer_type: BufferType,
    flags: Flags,
    /// Allocated size in bytes
    capacity: usize,
    buffer: ComHandle,
}

impl D3d11Buffer {
    pub fn new(context: &mut D3d11Context, command: InitBufferCommand) -> Result<Self> {
        let capacity = (command.size as usize).max(command.data.len());
        let mut buffer = Self {
            buffer_type: command.buffer_type,
            flags: command.flags,
            capacity: 0,
            buffer: empty_handle(&context.api),
        };
        if capacity > 0 {
            let data = if command.data.is_empty() {
                None
            } else {
                let mut padded = command.data;
                padded.resize(capacity, 0);
                Some(padded)
            };
            buffer.create(context, capacity, data.as_deref())?;
        }
        Ok(buffer)
    }

    fn desc(&self, capacity: usize, with_data: bool) -> BufferDesc {
        let dynamic = self.flags.contains(Flags::DYNAMIC);
        BufferDesc {
            byte_width: capacity as u32,
            usage: if dynamic {
                D3D11_USAGE_DYNAMIC
            } else if with_data {
                D3D11_USAGE_IMMUTABLE
            } else {
                D3D11_USAGE_DEFAULT
            },
            bind_flags: match self.buffer_type {
                BufferType::Index => D3D11_BIND_INDEX_BUFFER,
                BufferType::Vertex => D3D11_BIND_VERTEX_BUFFER,
            },
            cpu_access_flags: if dynamic { D3D11_CPU_ACCESS_WRITE } else { 0 },
        }
    }

    /// Replace the native buffer; the old one is kept if creation fails
    fn create(&mut self, context: &mut D3d11Context, capacity: usize, data: Option<&[u8]>) -> Result<()> {
        let desc = self.desc(capacity, data.is_some());
        let buffer = check_creation(context.api.create_buffer(&desc, data), "Failed to create buffer")?;
        if let Some(old) = self.buffer.raw() {
            context.state.unbind(old);
        }
        self.buffer = com_handle(&context.api, buffer);
        self.capacity = capacity;
        Ok(())
    }

    /// Replace the contents, growing the allocation if needed
    pub fn set_data(&mut self, context: &mut D3d11Context, data: Vec<u8>) -> Result<()> {
        if !self.flags.contains(Flags::DYNAMIC) {
            engine_bail!(SOURCE, InvalidUsage, "Buffer is not dynamic");
        }
        if data.is_empty() {
            engine_bail!(SOURCE, InvalidParameter, "Data is empty");
        }

        if data.len() > self.capacity {
            return self.create(context, data.len(), Some(&data));
        }

        let buffer = self.buffer.get()?;
        let mut mapping = Mapping::new(context.api.as_ref(), buffer, 0, D3D11_MAP_WRITE_DISCARD, "Failed to map buffer")?;
        mapping.write(&data);
        Ok(())
    }

    /// `None` for a zero-sized buffer
    pub fn buffer(&self) -> Option<RawCom> {
        self.buffer.raw()
    }

    pub fn buffer_type(&self) -> BufferType {
        self.buffer_type
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
