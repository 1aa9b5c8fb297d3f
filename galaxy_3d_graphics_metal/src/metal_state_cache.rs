/// Redundant-state filter in front of the current render command encoder
///
/// Metal state lives on the encoder, so the cache starts over with every
/// encoder: `begin` forgets everything and the first set of each value always
/// reaches the encoder. Setters are no-ops while no encoder is active. The
/// cached value is stored right after the call since encoder setters cannot
/// fail.
///
/// `unbind` is called before a native object is released. Metal encoders
/// retain what they are given, so it only forgets the object; the next set of
/// that slot is then always issued.

use crate::metal_api::{MetalApi, MtlViewport, RawId, ScissorRect};
use crate::metal_constants::MTL_MAX_FRAGMENT_TEXTURES;
use crate::metal_error::SOURCE;
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::Result;
use std::sync::Arc;

/// Texture and sampler slots tracked for the fragment stage
pub const MAX_TEXTURE_SLOTS: usize = MTL_MAX_FRAGMENT_TEXTURES;

/// Buffer index of the vertex data
pub const VERTEX_BUFFER_INDEX: u32 = 0;
/// Buffer index of the shader constants, in both stages
pub const CONSTANT_BUFFER_INDEX: u32 = 1;

/// Buffer bound at an offset
pub type BufferBinding = (RawId, usize);

#[derive(Debug, Clone, PartialEq, Default)]
struct CachedState {
    pipeline_state: Option<RawId>,
    depth_stencil_state: Option<RawId>,
    stencil_reference: Option<u32>,
    cull_mode: Option<u64>,
    fill_mode: Option<u64>,
    viewport: Option<MtlViewport>,
    scissor_rect: Option<ScissorRect>,
    vertex_buffer: Option<BufferBinding>,
    vertex_constants: Option<BufferBinding>,
    fragment_constants: Option<BufferBinding>,
    /// `Some(None)` is a slot known to be empty
    textures: [Option<Option<RawId>>; MAX_TEXTURE_SLOTS],
    samplers: [Option<Option<RawId>>; MAX_TEXTURE_SLOTS],
}

pub struct StateCache {
    api: Arc<dyn MetalApi>,
    encoder: Option<RawId>,
    state: CachedState,
}

impl StateCache {
    pub fn new(api: Arc<dyn MetalApi>) -> Self {
        Self { api, encoder: None, state: CachedState::default() }
    }

    /// Start tracking a new encoder, with nothing known about its state
    pub fn begin(&mut self, encoder: RawId) {
        self.encoder = Some(encoder);
        self.state = CachedState::default();
    }

    /// The encoder ended
    pub fn end(&mut self) {
        self.encoder = None;
        self.state = CachedState::default();
    }

    pub fn encoder(&self) -> Option<RawId> {
        self.encoder
    }

    pub fn set_pipeline_state(&mut self, state: RawId) {
        let Some(encoder) = self.encoder else { return };
        if self.state.pipeline_state != Some(state) {
            self.api.set_render_pipeline_state(encoder, state);
            self.state.pipeline_state = Some(state);
        }
    }

    #[cfg(test)]
    pub fn pipeline_state(&self) -> Option<RawId> {
        self.state.pipeline_state
    }

    pub fn set_depth_stencil_state(&mut self, state: RawId, stencil_reference: u32) {
        let Some(encoder) = self.encoder else { return };
        if self.state.depth_stencil_state != Some(state) {
            self.api.set_depth_stencil_state(encoder, state);
            self.state.depth_stencil_state = Some(state);
        }
        if self.state.stencil_reference != Some(stencil_reference) {
            self.api.set_stencil_reference_value(encoder, stencil_reference);
            self.state.stencil_reference = Some(stencil_reference);
        }
    }

    pub fn set_cull_mode(&mut self, mode: u64) {
        let Some(encoder) = self.encoder else { return };
        if self.state.cull_mode != Some(mode) {
            self.api.set_cull_mode(encoder, mode);
            self.state.cull_mode = Some(mode);
        }
    }

    pub fn set_fill_mode(&mut self, mode: u64) {
        let Some(encoder) = self.encoder else { return };
        if self.state.fill_mode != Some(mode) {
            self.api.set_triangle_fill_mode(encoder, mode);
            self.state.fill_mode = Some(mode);
        }
    }

    pub fn set_viewport(&mut self, viewport: MtlViewport) {
        let Some(encoder) = self.encoder else { return };
        if self.state.viewport != Some(viewport) {
            self.api.set_viewport(encoder, &viewport);
            self.state.viewport = Some(viewport);
        }
    }

    pub fn set_scissor_rect(&mut self, rect: ScissorRect) {
        let Some(encoder) = self.encoder else { return };
        if self.state.scissor_rect != Some(rect) {
            self.api.set_scissor_rect(encoder, rect);
            self.state.scissor_rect = Some(rect);
        }
    }

    pub fn set_vertex_buffer(&mut self, buffer: RawId) {
        let Some(encoder) = self.encoder else { return };
        let binding = Some((buffer, 0));
        if self.state.vertex_buffer != binding {
            self.api.set_vertex_buffer(encoder, Some(buffer), 0, VERTEX_BUFFER_INDEX);
            self.state.vertex_buffer = binding;
        }
    }

    /// Constant data of both stages; `None` leaves a stage as it is
    pub fn set_constant_buffers(&mut self, fragment: Option<BufferBinding>, vertex: Option<BufferBinding>) {
        let Some(encoder) = self.encoder else { return };
        if let Some((buffer, offset)) = fragment {
            if self.state.fragment_constants != fragment {
                self.api.set_fragment_buffer(encoder, Some(buffer), offset, CONSTANT_BUFFER_INDEX);
                self.state.fragment_constants = fragment;
            }
        }
        if let Some((buffer, offset)) = vertex {
            if self.state.vertex_constants != vertex {
                self.api.set_vertex_buffer(encoder, Some(buffer), offset, CONSTANT_BUFFER_INDEX);
                self.state.vertex_constants = vertex;
            }
        }
    }

    /// Bind textures and samplers to fragment slots `0..textures.len()`
    ///
    /// Slots past the end of the lists that hold an object in this encoder
    /// are cleared.
    pub fn set_fragment_textures(&mut self, textures: &[Option<RawId>], samplers: &[Option<RawId>]) -> Result<()> {
        if textures.len() > MAX_TEXTURE_SLOTS || samplers.len() > MAX_TEXTURE_SLOTS {
            engine_bail!(SOURCE, InvalidParameter,
                "At most {} textures can be bound, got {}", MAX_TEXTURE_SLOTS, textures.len().max(samplers.len()));
        }
        let Some(encoder) = self.encoder else { return Ok(()) };
        for slot in 0..MAX_TEXTURE_SLOTS {
            let texture = textures.get(slot).copied().flatten();
            if needs_bind(self.state.textures[slot], texture, slot < textures.len()) {
                self.api.set_fragment_texture(encoder, texture, slot as u32);
                self.state.textures[slot] = Some(texture);
            }
            let sampler = samplers.get(slot).copied().flatten();
            if needs_bind(self.state.samplers[slot], sampler, slot < samplers.len()) {
                self.api.set_fragment_sampler_state(encoder, sampler, slot as u32);
                self.state.samplers[slot] = Some(sampler);
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn texture(&self, slot: usize) -> Option<RawId> {
        self.state.textures.get(slot).copied().flatten().flatten()
    }

    /// Forget `object` wherever it is cached
    pub fn unbind(&mut self, object: RawId) {
        let state = &mut self.state;
        if state.pipeline_state == Some(object) {
            state.pipeline_state = None;
        }
        if state.depth_stencil_state == Some(object) {
            state.depth_stencil_state = None;
        }
        for binding in [&mut state.vertex_buffer, &mut state.vertex_constants, &mut state.fragment_constants] {
            if matches!(binding, Some((buffer, _)) if *buffer == object) {
                *binding = None;
            }
        }
        for slot in state.textures.iter_mut().chain(state.samplers.iter_mut()) {
            if *slot == Some(Some(object)) {
                *slot = None;
            }
        }
    }
}

/// Listed slots bind whenever they differ; the others only clear a known object
fn needs_bind(bound: Option<Option<RawId>>, next: Option<RawId>, listed: bool) -> bool {
    if listed {
        bound != Some(next)
    } else {
        matches!(bound, Some(Some(_)))
    }
}

#[cfg(test)]
#[path = "metal_state_cache_tests.rs"]
mod tests;
