/// Renderer module - command model, render device contract and render thread

pub mod command;
pub mod command_buffer;
pub mod command_processor;
pub mod command_queue;
pub mod config;
pub mod data_type;
pub mod empty_device;
pub mod pixel_format;
pub mod projection;
pub mod render_device;
pub mod render_stats;
pub mod render_thread;
pub mod types;
pub mod vertex;

pub use command::*;
pub use command_buffer::CommandBuffer;
pub use command_processor::CommandProcessor;
pub use command_queue::{CommandQueue, RenderTask, Work};
pub use config::{Driver, RenderDeviceConfig};
pub use data_type::{ComponentType, DataType};
pub use empty_device::{EmptyRenderDevice, EmptyResource};
pub use pixel_format::PixelFormat;
pub use projection::projection_transform;
pub use render_device::{Capabilities, ClipConvention, DeviceState, RenderDevice};
pub use render_stats::{RenderStats, RenderStatsSnapshot};
pub use render_thread::RenderThread;
pub use types::*;
pub use vertex::{vertex_attribute_offsets, Vertex, VertexAttribute, VertexUsage, VERTEX_ATTRIBUTES};
