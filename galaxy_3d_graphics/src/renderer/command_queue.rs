/// Multi-producer, single-consumer queue of command buffers
///
/// Any number of threads may `submit`; only the render thread pops. Pushes are
/// serialized by one mutex, so the execution order is the order in which
/// producers acquired it.

use crate::renderer::command_buffer::CommandBuffer;
use crate::renderer::render_device::RenderDevice;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Closure run on the render thread with exclusive access to the device
pub type RenderTask = Box<dyn FnOnce(&mut dyn RenderDevice) + Send>;

/// What the render thread found when it woke up
pub enum Work {
    /// Closures queued with `execute_on_render_thread`, oldest first
    Tasks(Vec<RenderTask>),
    Buffer(CommandBuffer),
}

#[derive(Default)]
struct QueueState {
    buffers: VecDeque<CommandBuffer>,
    tasks: Vec<RenderTask>,
}

#[derive(Default)]
pub struct CommandQueue {
    state: Mutex<QueueState>,
    condition: Condvar,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand a finished buffer to the render thread
    pub fn submit(&self, buffer: CommandBuffer) {
        self.lock().buffers.push_back(buffer);
        self.condition.notify_all();
    }

    /// Wait until a buffer is available and take it (render thread only)
    pub fn pop_blocking(&self) -> CommandBuffer {
        let mut state = self.lock();
        loop {
            if let Some(buffer) = state.buffers.pop_front() {
                return buffer;
            }
            state = self.condition.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wait until a task or a buffer is available (render thread only)
    ///
    /// Pending tasks are handed out before the next buffer.
    pub fn wait_for_work(&self) -> Work {
        let mut state = self.lock();
        loop {
            if !state.tasks.is_empty() {
                return Work::Tasks(std::mem::take(&mut state.tasks));
            }
            if let Some(buffer) = state.buffers.pop_front() {
                return Work::Buffer(buffer);
            }
            state = self.condition.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Take a buffer if one is queued
    pub fn try_pop(&self) -> Option<CommandBuffer> {
        self.lock().buffers.pop_front()
    }

    /// Queue a closure to run on the render thread before the next buffer
    pub fn execute_on_render_thread(&self, task: RenderTask) {
        self.lock().tasks.push(task);
        self.condition.notify_all();
    }

    /// Number of queued buffers
    pub fn len(&self) -> usize {
        self.lock().buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().buffers.is_empty()
    }
}

#[cfg(test)]
#[path = "command_queue_tests.rs"]
mod tests;
