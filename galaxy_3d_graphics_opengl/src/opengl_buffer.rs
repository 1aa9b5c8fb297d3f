/// Vertex and index buffers
///
/// The last uploaded data is kept so the buffer can be recreated after a
/// context loss.

use crate::opengl_constants::*;
use crate::opengl_error::{check, check_creation, SOURCE};
use crate::opengl_format::buffer_target;
use crate::opengl_resource::{empty_handle, name_of, GlContext, GlHandle, GlObjectKind};
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::render::{BufferType, Flags, InitBufferCommand};
use galaxy_3d_graphics::galaxy3d::resource::Reload;
use galaxy_3d_graphics::galaxy3d::Result;

pub struct GlBuffer {
    buffer_type: BufferType,
    flags: Flags,
    target: GLenum,
    data: Vec<u8>,
    /// Allocated size in bytes
    capacity: usize,
    handle: GlHandle,
}

impl GlBuffer {
    pub fn new(context: &mut GlContext, command: InitBufferCommand) -> Result<Self> {
        let capacity = (command.size as usize).max(command.data.len());
        let mut buffer = Self {
            buffer_type: command.buffer_type,
            flags: command.flags,
            target: buffer_target(command.buffer_type),
            data: command.data,
            capacity,
            handle: empty_handle(&context.api, GlObjectKind::Buffer),
        };
        buffer.create(context)?;
        Ok(buffer)
    }

    fn create(&mut self, context: &mut GlContext) -> Result<()> {
        let name = context.api.gen_buffer();
        check_creation(context.api.as_ref(), "Failed to create buffer")?;
        self.handle.replace(name);

        if self.capacity > 0 {
            context.state.bind_buffer(self.target, name)?;
            let data = if self.data.is_empty() { None } else { Some(self.data.as_slice()) };
            context.api.buffer_data(self.target, self.capacity, data, self.usage());
            check_creation(context.api.as_ref(), "Failed to create buffer")?;
        }
        Ok(())
    }

    fn usage(&self) -> GLenum {
        if self.flags.contains(Flags::DYNAMIC) {
            DYNAMIC_DRAW
        } else {
            STATIC_DRAW
        }
    }

    /// Replace the contents, growing the allocation if needed
    pub fn set_data(&mut self, context: &mut GlContext, data: Vec<u8>) -> Result<()> {
        if !self.flags.contains(Flags::DYNAMIC) {
            engine_bail!(SOURCE, InvalidUsage, "Buffer is not dynamic");
        }
        if data.is_empty() {
            engine_bail!(SOURCE, InvalidParameter, "Data is empty");
        }

        context.state.bind_buffer(self.target, self.name())?;
        if data.len() > self.capacity {
            context.api.buffer_data(self.target, data.len(), Some(&data), DYNAMIC_DRAW);
            check(context.api.as_ref(), "Failed to create buffer")?;
            self.capacity = data.len();
        } else {
            context.api.buffer_sub_data(self.target, 0, &data);
            check(context.api.as_ref(), "Failed to upload buffer")?;
        }

        self.data = data;
        Ok(())
    }

    pub fn name(&self) -> GLuint {
        name_of(&self.handle)
    }

    pub fn buffer_type(&self) -> BufferType {
        self.buffer_type
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget the GL name without deleting it
    pub(crate) fn abandon(&mut self) {
        self.handle.abandon();
    }
}

impl Reload<GlContext> for GlBuffer {
    fn reload(&mut self, context: &mut GlContext) -> Result<()> {
        self.create(context)
    }
}
