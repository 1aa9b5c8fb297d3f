/// Render thread - owns a render device and drives it from the command queue
///
/// The device is created on the render thread itself (native contexts are
/// usually bound to the thread that made them) and never leaves it. Producers
/// talk to it only through the `CommandQueue`.

use crate::error::{Error, Result};
use crate::renderer::command::Command;
use crate::renderer::command_buffer::CommandBuffer;
use crate::renderer::command_processor::CommandProcessor;
use crate::renderer::command_queue::{CommandQueue, RenderTask};
use crate::renderer::config::{Driver, RenderDeviceConfig};
use crate::renderer::render_device::{Capabilities, DeviceState, RenderDevice};
use crate::renderer::render_stats::{RenderStats, RenderStatsSnapshot};
use crate::resource::{ResourceId, ResourceIdAllocator};
use crate::{engine_bail, engine_debug, engine_err, engine_info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

const SOURCE: &str = "galaxy3d::RenderThread";

pub struct RenderThread {
    state: DeviceState,
    driver: Driver,
    capabilities: Capabilities,
    queue: Arc<CommandQueue>,
    stats: Arc<RenderStats>,
    resource_ids: Arc<ResourceIdAllocator>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Start a render thread and create its device with `init`
    ///
    /// `init` runs on the new thread. An initialization failure is fatal:
    /// the thread exits and the error is returned here.
    pub fn spawn<D, F>(config: RenderDeviceConfig, init: F) -> Result<Self>
    where
        D: RenderDevice + 'static,
        F: FnOnce(&RenderDeviceConfig) -> Result<D> + Send + 'static,
    {
        config.validate()?;

        let mut state = DeviceState::Uninitialized;
        state.transition(DeviceState::Initializing)?;

        let queue = Arc::new(CommandQueue::new());
        let stats = Arc::new(RenderStats::new());
        let running = Arc::new(AtomicBool::new(true));
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(Driver, Capabilities)>>();

        let handle = {
            let queue = Arc::clone(&queue);
            let stats = Arc::clone(&stats);
            let running = Arc::clone(&running);
            let thread_config = config.clone();

            thread::Builder::new()
                .name(config.thread_name.clone())
                .spawn(move || {
                    let mut device = match init(&thread_config) {
                        Ok(device) => device,
                        Err(error) => {
                            let _ = ready_tx.send(Err(error));
                            return;
                        }
                    };

                    let ready = (device.driver(), device.capabilities().clone());
                    if ready_tx.send(Ok(ready)).is_err() {
                        return;
                    }

                    let mut processor = CommandProcessor::new(Arc::clone(&queue), stats);
                    loop {
                        if let Err(error) = processor.process(&mut device) {
                            engine_debug!(SOURCE, "Render loop continues after: {}", error);
                        }

                        // Everything submitted before shutdown is drained first
                        if !running.load(Ordering::Acquire)
                            && queue.is_empty()
                            && processor.pending_len() == 0
                        {
                            break;
                        }
                    }

                    engine_info!(SOURCE, "Render loop stopped, releasing {} device", device.driver().name());
                })
                .map_err(|e| engine_err!(SOURCE, InitializationFailed,
                    "Failed to spawn render thread: {}", e))?
        };

        match ready_rx.recv() {
            Ok(Ok((driver, capabilities))) => {
                state.transition(DeviceState::Running)?;
                engine_info!(SOURCE, "{} device running ({}.{}, {}x{}, {} sample(s))",
                    driver.name(),
                    capabilities.api_major_version,
                    capabilities.api_minor_version,
                    config.size.x,
                    config.size.y,
                    config.sample_count);

                Ok(Self {
                    state,
                    driver,
                    capabilities,
                    queue,
                    stats,
                    resource_ids: Arc::new(ResourceIdAllocator::new()),
                    running,
                    handle: Some(handle),
                })
            }
            Ok(Err(error)) => {
                let _ = handle.join();
                Err(engine_err!(SOURCE, InitializationFailed,
                    "{} device initialization failed: {}", config.driver.name(), error))
            }
            Err(_) => {
                let _ = handle.join();
                Err(engine_err!(SOURCE, InitializationFailed,
                    "Render thread exited during initialization"))
            }
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// Features reported by the device after initialization
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn stats(&self) -> RenderStatsSnapshot {
        self.stats.snapshot()
    }

    /// Queue shared with other producer threads
    pub fn queue(&self) -> Arc<CommandQueue> {
        Arc::clone(&self.queue)
    }

    /// Id allocator shared with other producer threads
    pub fn resource_ids(&self) -> Arc<ResourceIdAllocator> {
        Arc::clone(&self.resource_ids)
    }

    /// Allocate the handle for a resource about to be created by an `init*` command
    pub fn allocate_resource_id(&self) -> ResourceId {
        self.resource_ids.allocate()
    }

    /// Hand a command buffer to the render thread
    pub fn submit(&self, buffer: CommandBuffer) -> Result<()> {
        self.ensure_running()?;
        self.queue.submit(buffer);
        Ok(())
    }

    /// Run `task` on the render thread before the next buffer
    pub fn execute_on_render_thread(&self, task: RenderTask) -> Result<()> {
        self.ensure_running()?;
        self.queue.execute_on_render_thread(task);
        Ok(())
    }

    /// Stop the render loop and join the thread
    ///
    /// Buffers submitted before this call are still executed.
    pub fn shutdown(&mut self) -> Result<()> {
        self.state.transition(DeviceState::ShuttingDown)?;
        self.running.store(false, Ordering::Release);

        let mut sentinel = CommandBuffer::new("shutdown");
        sentinel.push(Command::Present);
        self.queue.submit(sentinel);

        let joined = match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        };
        self.state.transition(DeviceState::Destroyed)?;

        if joined.is_err() {
            engine_bail!(SOURCE, InvalidState, "Render thread panicked");
        }
        engine_info!(SOURCE, "Render thread joined");
        Ok(())
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state != DeviceState::Running {
            return Err(Error::InvalidState(format!(
                "Render device is {:?}, commands are not accepted", self.state)));
        }
        Ok(())
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        if self.state == DeviceState::Running {
            let _ = self.shutdown();
        }
    }
}
