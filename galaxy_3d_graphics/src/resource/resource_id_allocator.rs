use crate::resource::ResourceId;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Producer-side resource id allocation
///
/// `init*` commands carry the id of the resource they create, so producers need
/// an id before the render thread has seen the command. Ids are handed out from
/// an atomic counter starting at 1 and are never recycled: a command still in
/// flight can never observe a slot that was reused for another resource.
///
/// # Example
///
/// ```
/// use galaxy_3d_graphics::galaxy3d::resource::ResourceIdAllocator;
///
/// let ids = ResourceIdAllocator::new();
/// assert_eq!(ids.allocate(), 1);
/// assert_eq!(ids.allocate(), 2);
/// assert_eq!(ids.high_water_mark(), 2);
/// ```
pub struct ResourceIdAllocator {
    next_id: AtomicUsize,
}

impl ResourceIdAllocator {
    /// Create an allocator whose first id is 1
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
        }
    }

    /// Allocate the next id (callable from any thread)
    pub fn allocate(&self) -> ResourceId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Highest id handed out so far (0 if none)
    ///
    /// This is the minimum number of slots a resource table needs to hold
    /// every resource allocated so far.
    pub fn high_water_mark(&self) -> ResourceId {
        self.next_id.load(Ordering::Relaxed) - 1
    }
}

impl Default for ResourceIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "resource_id_allocator_tests.rs"]
mod tests;
