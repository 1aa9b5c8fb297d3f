/// Command processor - drains the queue into a render device
///
/// One call to `process` is one render tick: run queued render-thread tasks,
/// then take buffers one after the other and execute their commands in order
/// until a `present`. Commands found after the `present` are kept for the next
/// tick.

use crate::engine_error;
use crate::engine_trace;
use crate::error::Result;
use crate::renderer::command::Command;
use crate::renderer::command_buffer::CommandBuffer;
use crate::renderer::command_queue::{CommandQueue, Work};
use crate::renderer::render_device::RenderDevice;
use crate::renderer::render_stats::RenderStats;
use std::sync::Arc;

const SOURCE: &str = "galaxy3d::RenderThread";

pub struct CommandProcessor {
    queue: Arc<CommandQueue>,
    stats: Arc<RenderStats>,
    /// Remainder of a buffer that continued past its `present`
    pending: Option<CommandBuffer>,
    frame_draw_calls: u32,
}

impl CommandProcessor {
    pub fn new(queue: Arc<CommandQueue>, stats: Arc<RenderStats>) -> Self {
        Self {
            queue,
            stats,
            pending: None,
            frame_draw_calls: 0,
        }
    }

    /// Commands carried over from the last tick
    pub fn pending_len(&self) -> usize {
        self.pending.as_ref().map_or(0, CommandBuffer::len)
    }

    /// Run one render tick (render thread only)
    ///
    /// Blocks until a `present` has executed, waiting for buffers as needed.
    /// If a command fails, the rest of its buffer is dropped, the failure is
    /// logged and returned; the queue itself is untouched and the next call
    /// proceeds with the next buffer.
    pub fn process(&mut self, device: &mut dyn RenderDevice) -> Result<()> {
        loop {
            let mut buffer = match self.pending.take() {
                Some(buffer) => buffer,
                None => match self.queue.wait_for_work() {
                    Work::Tasks(tasks) => {
                        for task in tasks {
                            task(device);
                        }
                        continue;
                    }
                    Work::Buffer(buffer) => buffer,
                },
            };

            if self.execute_until_present(device, &mut buffer)? {
                if !buffer.is_empty() {
                    self.pending = Some(buffer);
                }
                return Ok(());
            }
        }
    }

    /// Execute commands from `buffer`; `true` once a `present` ran
    fn execute_until_present(&mut self, device: &mut dyn RenderDevice, buffer: &mut CommandBuffer) -> Result<bool> {
        while let Some(command) = buffer.pop() {
            let name = command.name();
            let is_present = command.is_present();
            let is_draw = matches!(command, Command::Draw(_));

            engine_trace!(SOURCE, "Executing {} from '{}'", name, buffer.name());

            if let Err(error) = device.execute(command) {
                self.stats.record_aborted_buffer();
                engine_error!(SOURCE,
                    "Command {} in buffer '{}' failed, dropping {} remaining command(s): {}",
                    name, buffer.name(), buffer.len(), error);
                return Err(error);
            }

            self.stats.record_command();
            if is_draw {
                self.frame_draw_calls += 1;
            }

            if is_present {
                self.stats.record_frame(self.frame_draw_calls);
                self.frame_draw_calls = 0;
                return Ok(true);
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
#[path = "command_processor_tests.rs"]
mod tests;
