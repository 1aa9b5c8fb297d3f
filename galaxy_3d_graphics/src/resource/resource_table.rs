/// Growth-only, slot-indexed resource storage
///
/// Slot `id - 1` holds the resource created by the `init*` command for `id`.
/// Deleting a resource only empties its slot: the table never shrinks, so an
/// id captured by a command still in flight keeps pointing at the same slot.

use crate::engine_err;
use crate::error::Result;
use crate::resource::{RenderResource, ResourceId};

const SOURCE: &str = "galaxy3d::ResourceTable";

/// Typed view into a backend resource enum
///
/// Backends implement this once per concrete resource type with
/// `impl_resource_cast!`.
pub trait ResourceCast<U> {
    fn cast(&self) -> Option<&U>;
    fn cast_mut(&mut self) -> Option<&mut U>;
}

/// Implement `ResourceCast` for one variant of a backend resource enum
///
/// ```ignore
/// impl_resource_cast!(GlResource, Buffer, Buffer);
/// ```
#[macro_export]
macro_rules! impl_resource_cast {
    ($resource:ty, $variant:ident, $target:ty) => {
        impl $crate::galaxy3d::resource::ResourceCast<$target> for $resource {
            fn cast(&self) -> Option<&$target> {
                match self {
                    Self::$variant(value) => Some(value),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }

            fn cast_mut(&mut self) -> Option<&mut $target> {
                match self {
                    Self::$variant(value) => Some(value),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

pub struct ResourceTable<T> {
    slots: Vec<Option<T>>,
}

impl<T: RenderResource> ResourceTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Store the resource created for `id`, growing the table if needed
    pub fn insert(&mut self, id: ResourceId, resource: T) -> Result<()> {
        if id == 0 {
            return Err(engine_err!(SOURCE, InvalidParameter, "Resource id 0 is reserved"));
        }

        let index = id - 1;
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }

        if let Some(existing) = &self.slots[index] {
            return Err(engine_err!(SOURCE, ProtocolError,
                "Resource {} is already initialized as a {}", id, existing.resource_type().name()));
        }

        self.slots[index] = Some(resource);
        Ok(())
    }

    /// Untyped access (None for id 0, empty or unknown slots)
    pub fn slot(&self, id: ResourceId) -> Option<&T> {
        id.checked_sub(1)
            .and_then(|index| self.slots.get(index))
            .and_then(|slot| slot.as_ref())
    }

    /// Untyped mutable access
    pub fn slot_mut(&mut self, id: ResourceId) -> Option<&mut T> {
        id.checked_sub(1)
            .and_then(|index| self.slots.get_mut(index))
            .and_then(|slot| slot.as_mut())
    }

    /// Typed access
    ///
    /// Returns `Ok(None)` for id 0 or an empty slot, and a `ProtocolError` if
    /// the slot holds a resource of another type.
    pub fn get<U>(&self, id: ResourceId) -> Result<Option<&U>>
    where
        T: ResourceCast<U>,
    {
        match self.slot(id) {
            None => Ok(None),
            Some(resource) => match resource.cast() {
                Some(value) => Ok(Some(value)),
                None => Err(engine_err!(SOURCE, ProtocolError,
                    "Resource {} is a {}", id, resource.resource_type().name())),
            },
        }
    }

    /// Typed mutable access, same rules as `get`
    pub fn get_mut<U>(&mut self, id: ResourceId) -> Result<Option<&mut U>>
    where
        T: ResourceCast<U>,
    {
        match self.slot_mut(id) {
            None => Ok(None),
            Some(resource) => {
                let resource_type = resource.resource_type();
                match resource.cast_mut() {
                    Some(value) => Ok(Some(value)),
                    None => Err(engine_err!(SOURCE, ProtocolError,
                        "Resource {} is a {}", id, resource_type.name())),
                }
            }
        }
    }

    /// Typed access to a resource that must exist
    pub fn require<U>(&self, id: ResourceId) -> Result<&U>
    where
        T: ResourceCast<U>,
    {
        self.get(id)?
            .ok_or_else(|| engine_err!(SOURCE, ProtocolError, "Resource {} does not exist", id))
    }

    /// Typed mutable access to a resource that must exist
    pub fn require_mut<U>(&mut self, id: ResourceId) -> Result<&mut U>
    where
        T: ResourceCast<U>,
    {
        self.get_mut(id)?
            .ok_or_else(|| engine_err!(SOURCE, ProtocolError, "Resource {} does not exist", id))
    }

    /// Empty the slot for `id` and hand back its resource
    ///
    /// The table keeps its size.
    pub fn remove(&mut self, id: ResourceId) -> Option<T> {
        id.checked_sub(1)
            .and_then(|index| self.slots.get_mut(index))
            .and_then(|slot| slot.take())
    }

    /// Number of slots (never decreases)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots currently holding a resource
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Live resources with their ids
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|resource| (index + 1, resource)))
    }

    /// Live resources with their ids, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ResourceId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|resource| (index + 1, resource)))
    }

    /// Drop every resource, keeping the table size
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}

impl<T: RenderResource> Default for ResourceTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "resource_table_tests.rs"]
mod tests;
