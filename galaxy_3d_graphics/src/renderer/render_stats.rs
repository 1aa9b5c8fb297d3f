/// Render thread counters readable from any thread

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RenderStats {
    frames: AtomicU64,
    last_frame_draw_calls: AtomicU32,
    commands_executed: AtomicU64,
    aborted_buffers: AtomicU64,
}

/// Point-in-time copy of `RenderStats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStatsSnapshot {
    /// Frames presented
    pub frames: u64,
    /// Draw calls issued by the last presented frame
    pub last_frame_draw_calls: u32,
    /// Commands that completed without error
    pub commands_executed: u64,
    /// Buffers whose remaining commands were dropped after an error
    pub aborted_buffers: u64,
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_command(&self) {
        self.commands_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame(&self, draw_calls: u32) {
        self.last_frame_draw_calls.store(draw_calls, Ordering::Relaxed);
        self.frames.fetch_add(1, Ordering::Release);
    }

    pub fn record_aborted_buffer(&self) {
        self.aborted_buffers.fetch_add(1, Ordering::Release);
    }

    pub fn snapshot(&self) -> RenderStatsSnapshot {
        RenderStatsSnapshot {
            frames: self.frames.load(Ordering::Acquire),
            last_frame_draw_calls: self.last_frame_draw_calls.load(Ordering::Relaxed),
            commands_executed: self.commands_executed.load(Ordering::Relaxed),
            aborted_buffers: self.aborted_buffers.load(Ordering::Acquire),
        }
    }
}
