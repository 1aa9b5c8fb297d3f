/// Frames in flight and per-frame constant storage
///
/// Up to `BUFFER_COUNT` command buffers are in flight. A frame acquires the
/// semaphore when it starts and the command buffer's completion handler
/// releases it, so the CPU never writes constants the GPU may still read.
///
/// Shader constants are appended to shared buffers owned by the frame slot;
/// each draw binds its own offset, so constants set between draws do not
/// overwrite each other.

use crate::metal_api::{MetalApi, RawId};
use crate::metal_constants::{MTL_RESOURCE_CPU_CACHE_MODE_WRITE_COMBINED, MTL_RESOURCE_STORAGE_MODE_SHARED};
use crate::metal_error::{check_creation, SOURCE};
use crate::metal_resource::{objc_handle, ObjcHandle};
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::Result;
use std::sync::{Arc, Condvar, Mutex};

/// Size of one constant buffer
pub const BUFFER_SIZE: usize = 1024 * 1024;
/// Frames in flight
pub const BUFFER_COUNT: usize = 3;
/// Buffer offsets bound for constants must be multiples of this
pub const CONSTANT_ALIGNMENT: usize = 256;

/// Counting semaphore shared with completion handlers
pub struct FrameSemaphore {
    available: Mutex<usize>,
    released: Condvar,
}

impl FrameSemaphore {
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self { available: Mutex::new(count), released: Condvar::new() })
    }

    /// Block until a frame slot is free and take it
    pub fn acquire(&self) {
        let mut available = self.available.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        while *available == 0 {
            available = self.released.wait(available).unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        *available -= 1;
    }

    pub fn release(&self) {
        let mut available = self.available.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *available += 1;
        self.released.notify_one();
    }

    pub fn available(&self) -> usize {
        *self.available.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Default)]
struct FrameConstants {
    buffers: Vec<ObjcHandle>,
    /// Buffer being filled
    index: usize,
    /// Next free byte in that buffer
    offset: usize,
}

/// Constant buffers of every frame slot
pub struct ConstantRing {
    frames: Vec<FrameConstants>,
    current: usize,
}

impl ConstantRing {
    pub fn new() -> Self {
        Self {
            frames: (0..BUFFER_COUNT).map(|_| FrameConstants::default()).collect(),
            current: 0,
        }
    }

    /// Move to the next frame slot, whose buffers the GPU is done with
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % BUFFER_COUNT;
        let frame = &mut self.frames[self.current];
        frame.index = 0;
        frame.offset = 0;
    }

    /// Copy `data` into the current frame and return where it landed
    pub fn write(&mut self, api: &Arc<dyn MetalApi>, data: &[u8]) -> Result<(RawId, usize)> {
        if data.len() > BUFFER_SIZE {
            engine_bail!(SOURCE, InvalidParameter,
                "Shader constants of {} bytes exceed the {} byte limit", data.len(), BUFFER_SIZE);
        }
        let frame = &mut self.frames[self.current];
        if frame.offset + data.len() > BUFFER_SIZE {
            frame.index += 1;
            frame.offset = 0;
        }
        if frame.index == frame.buffers.len() {
            let buffer = check_creation(
                api.new_buffer(BUFFER_SIZE, MTL_RESOURCE_STORAGE_MODE_SHARED | MTL_RESOURCE_CPU_CACHE_MODE_WRITE_COMBINED, None),
                "Failed to create constant buffer",
            )?;
            frame.buffers.push(objc_handle(api, buffer));
        }

        let buffer = frame.buffers[frame.index].get()?;
        let offset = frame.offset;
        api.copy_to_buffer(buffer, offset, data);
        frame.offset = (offset + data.len()).next_multiple_of(CONSTANT_ALIGNMENT);
        Ok((buffer, offset))
    }

    /// Buffers allocated across all frame slots
    #[cfg(test)]
    pub fn buffer_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.buffers.len()).sum()
    }

    /// Release every buffer
    pub fn clear(&mut self) {
        for frame in &mut self.frames {
            frame.buffers.clear();
            frame.index = 0;
            frame.offset = 0;
        }
    }
}

#[cfg(test)]
#[path = "metal_frame_tests.rs"]
mod tests;
