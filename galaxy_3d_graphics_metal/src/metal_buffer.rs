/// Vertex and index buffers in shared storage
///
/// Dynamic buffers are refilled through their contents pointer; a larger
/// upload creates a new buffer.

use crate::metal_api::RawId;
use crate::metal_constants::{MTL_RESOURCE_CPU_CACHE_MODE_WRITE_COMBINED, MTL_RESOURCE_STORAGE_MODE_SHARED};
use crate::metal_error::{check_creation, SOURCE};
use crate::metal_resource::{empty_handle, objc_handle, MetalContext, ObjcHandle};
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::render::{BufferType, Flags, InitBufferCommand};
use galaxy_3d_graphics::galaxy3d::Result;

pub struct MetalBuffer {
    buffer_type: BufferType,
    flags: Flags,
    capacity: usize,
    buffer: ObjcHandle,
}

impl MetalBuffer {
    pub fn new(context: &mut MetalContext, command: InitBufferCommand) -> Result<Self> {
        let capacity = (command.size as usize).max(command.data.len());
        let mut buffer = Self {
            buffer_type: command.buffer_type,
            flags: command.flags,
            capacity: 0,
            buffer: empty_handle(&context.api),
        };
        if capacity > 0 {
            let data = if command.data.is_empty() { None } else { Some(command.data.as_slice()) };
            buffer.create(context, capacity, data)?;
        }
        Ok(buffer)
    }

    fn options(&self) -> u64 {
        if self.flags.contains(Flags::DYNAMIC) {
            MTL_RESOURCE_STORAGE_MODE_SHARED | MTL_RESOURCE_CPU_CACHE_MODE_WRITE_COMBINED
        } else {
            MTL_RESOURCE_STORAGE_MODE_SHARED
        }
    }

    /// Replace the native buffer; the old one is kept if creation fails
    fn create(&mut self, context: &mut MetalContext, capacity: usize, data: Option<&[u8]>) -> Result<()> {
        let buffer = check_creation(context.api.new_buffer(capacity, self.options(), data),
            "Failed to create buffer")?;
        if let Some(old) = self.buffer.raw() {
            context.state.unbind(old);
        }
        self.buffer = objc_handle(&context.api, buffer);
        self.capacity = capacity;
        Ok(())
    }

    /// Replace the contents, growing the allocation if needed
    pub fn set_data(&mut self, context: &mut MetalContext, data: Vec<u8>) -> Result<()> {
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
        context.api.copy_to_buffer(buffer, 0, &data);
        Ok(())
    }

    /// `None` for a zero-sized buffer
    pub fn buffer(&self) -> Option<RawId> {
        self.buffer.raw()
    }

    pub fn buffer_type(&self) -> BufferType {
        self.buffer_type
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
