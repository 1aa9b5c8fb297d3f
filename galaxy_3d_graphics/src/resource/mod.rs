//! GPU resource bookkeeping shared by every backend
//!
//! Backends keep their native objects in a `ResourceTable`, addressed by the
//! opaque 1-based ids that producers obtain from a `ResourceIdAllocator`.

pub mod native_handle;
pub mod reloadable;
pub mod render_resource;
pub mod resource_id_allocator;
pub mod resource_table;
pub mod state_object_cache;

/// Opaque resource handle: 0 means "no resource", otherwise a 1-based slot index
pub type ResourceId = usize;

/// The "no resource" handle
pub const NO_RESOURCE: ResourceId = 0;

pub use native_handle::{NativeHandle, Release, Retain};
pub use reloadable::{Reload, ReloadState, Reloadable};
pub use render_resource::{RenderResource, ResourceType};
pub use resource_id_allocator::ResourceIdAllocator;
pub use resource_table::{ResourceCast, ResourceTable};
pub use state_object_cache::StateObjectCache;
