/// Owning wrapper around a raw native object handle
///
/// A `NativeHandle` is the single logical owner of a native object (a GL name,
/// a COM interface pointer, an Objective-C object). Dropping it releases the
/// object through its `Release` owner. It can be cloned only when the native
/// object is reference counted, in which case cloning retains it.

use crate::engine_err;
use crate::error::Result;
use std::fmt;

/// Releases native handles of type `H`
pub trait Release<H> {
    fn release(&self, handle: H);
}

/// Adds a reference to native handles of type `H`
pub trait Retain<H> {
    fn retain(&self, handle: H);
}

pub struct NativeHandle<H: Copy, R: Release<H>> {
    raw: Option<H>,
    owner: R,
}

impl<H: Copy, R: Release<H>> NativeHandle<H, R> {
    /// Take ownership of `raw`
    pub fn new(raw: H, owner: R) -> Self {
        Self { raw: Some(raw), owner }
    }

    /// A handle that owns nothing yet
    pub fn empty(owner: R) -> Self {
        Self { raw: None, owner }
    }

    pub fn raw(&self) -> Option<H> {
        self.raw
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_none()
    }

    /// The raw handle, or `NotInitialized` if there is none
    pub fn get(&self) -> Result<H> {
        self.raw.ok_or_else(|| {
            engine_err!("galaxy3d::NativeHandle", NotInitialized, "Native object is not created")
        })
    }

    /// Release the current object (if any) and own `raw` instead
    pub fn replace(&mut self, raw: H) {
        if let Some(old) = self.raw.replace(raw) {
            self.owner.release(old);
        }
    }

    /// Release the current object now
    pub fn reset(&mut self) {
        if let Some(old) = self.raw.take() {
            self.owner.release(old);
        }
    }

    /// Forget the object without releasing it
    ///
    /// Used after a context loss: the native object no longer exists and
    /// releasing it would target an unrelated object in the new context.
    pub fn abandon(&mut self) -> Option<H> {
        self.raw.take()
    }

    pub fn owner(&self) -> &R {
        &self.owner
    }
}

impl<H: Copy, R: Release<H>> Drop for NativeHandle<H, R> {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            self.owner.release(raw);
        }
    }
}

impl<H: Copy, R: Release<H> + Retain<H> + Clone> Clone for NativeHandle<H, R> {
    fn clone(&self) -> Self {
        if let Some(raw) = self.raw {
            self.owner.retain(raw);
        }
        Self {
            raw: self.raw,
            owner: self.owner.clone(),
        }
    }
}

impl<H: Copy + fmt::Debug, R: Release<H>> fmt::Debug for NativeHandle<H, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle").field("raw", &self.raw).finish()
    }
}

#[cfg(test)]
#[path = "native_handle_tests.rs"]
mod tests;
