/// Context-loss recovery for render resources
///
/// When a native context is lost (mobile OpenGL ES backgrounding), every
/// native object is gone but the engine-level parameters that created it are
/// still known. `Reloadable` tracks whether the native side is current and
/// re-runs creation exactly once, on first use after the loss.

use crate::error::Result;

/// Whether a resource's native objects are current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
    /// Native objects match the stored parameters
    Valid,
    /// Native objects were lost and must be recreated before use
    Invalidated,
}

/// Re-create native objects from stored parameters
///
/// `C` is whatever the resource needs to talk to the native API (for OpenGL,
/// the device's GL context and state cache).
pub trait Reload<C: ?Sized> {
    fn reload(&mut self, context: &mut C) -> Result<()>;
}

#[derive(Debug)]
pub struct Reloadable<T> {
    value: T,
    state: ReloadState,
    reload_count: u32,
}

impl<T> Reloadable<T> {
    /// Wrap a freshly created (valid) resource
    pub fn new(value: T) -> Self {
        Self {
            value,
            state: ReloadState::Valid,
            reload_count: 0,
        }
    }

    /// Mark the native side as lost
    pub fn invalidate(&mut self) {
        self.state = ReloadState::Invalidated;
    }

    pub fn state(&self) -> ReloadState {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state == ReloadState::Valid
    }

    /// How many times the resource was recreated
    pub fn reload_count(&self) -> u32 {
        self.reload_count
    }

    /// Access without restoring (for bookkeeping that never touches native objects)
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutable access without restoring
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Run `reload` if invalidated, then hand out the resource
    ///
    /// On failure the resource stays invalidated, so the next use retries.
    pub fn restore_with<F>(&mut self, reload: F) -> Result<&mut T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        if self.state == ReloadState::Invalidated {
            reload(&mut self.value)?;
            self.state = ReloadState::Valid;
            self.reload_count += 1;
        }
        Ok(&mut self.value)
    }

    /// `restore_with` through the resource's `Reload` implementation
    pub fn restore<C: ?Sized>(&mut self, context: &mut C) -> Result<&mut T>
    where
        T: Reload<C>,
    {
        self.restore_with(|value| value.reload(context))
    }
}

#[cfg(test)]
#[path = "reloadable_tests.rs"]
mod tests;
