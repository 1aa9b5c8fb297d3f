/// Redundant-state filter in front of the immediate context
///
/// Every setter compares against the last value it applied and skips the
/// native call when nothing changes. Context setters cannot fail, so the
/// cached value is stored right after the call. A fresh immediate context
/// has nothing bound, which is also the default cached state.
///
/// `unbind` is called before a native object is released: every slot still
/// holding it is set to null, so the cache never reports a released object
/// as bound.

use crate::d3d11_api::{D3dRect, D3d11Api, RawCom, Viewport};
use crate::d3d11_constants::{D3D11_COMMONSHADER_SAMPLER_SLOT_COUNT, D3D_PRIMITIVE_TOPOLOGY_UNDEFINED};
use crate::d3d11_error::SOURCE;
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::render::Vertex;
use galaxy_3d_graphics::galaxy3d::Result;
use std::sync::Arc;

/// Texture slots tracked for the pixel shader
pub const MAX_TEXTURE_SLOTS: usize = D3D11_COMMONSHADER_SAMPLER_SLOT_COUNT;

const BLEND_FACTOR: [f32; 4] = [1.0; 4];
const SAMPLE_MASK: u32 = 0xFFFF_FFFF;

#[derive(Debug, Clone, PartialEq)]
struct CachedState {
    render_target_views: Vec<RawCom>,
    depth_stencil_view: Option<RawCom>,
    rasterizer_state: Option<RawCom>,
    depth_stencil_state: Option<RawCom>,
    stencil_reference: u32,
    blend_state: Option<RawCom>,

    pixel_shader: Option<RawCom>,
    vertex_shader: Option<RawCom>,
    input_layout: Option<RawCom>,
    pixel_constant_buffer: Option<RawCom>,
    vertex_constant_buffer: Option<RawCom>,

    vertex_buffer: Option<RawCom>,
    index_buffer: Option<RawCom>,
    index_format: u32,
    topology: u32,

    viewport: Option<Viewport>,
    scissor_rect: Option<D3dRect>,

    shader_resources: [Option<RawCom>; MAX_TEXTURE_SLOTS],
    samplers: [Option<RawCom>; MAX_TEXTURE_SLOTS],
}

impl Default for CachedState {
    fn default() -> Self {
        Self {
            render_target_views: Vec::new(),
            depth_stencil_view: None,
            rasterizer_state: None,
            depth_stencil_state: None,
            stencil_reference: 0,
            blend_state: None,
            pixel_shader: None,
            vertex_shader: None,
            input_layout: None,
            pixel_constant_buffer: None,
            vertex_constant_buffer: None,
            vertex_buffer: None,
            index_buffer: None,
            index_format: 0,
            topology: D3D_PRIMITIVE_TOPOLOGY_UNDEFINED,
            viewport: None,
            scissor_rect: None,
            shader_resources: [None; MAX_TEXTURE_SLOTS],
            samplers: [None; MAX_TEXTURE_SLOTS],
        }
    }
}

pub struct StateCache {
    api: Arc<dyn D3d11Api>,
    state: CachedState,
}

impl StateCache {
    pub fn new(api: Arc<dyn D3d11Api>) -> Self {
        Self {
            api,
            state: CachedState::default(),
        }
    }

    /// Unbind everything and forget it
    pub fn reset(&mut self) {
        self.api.clear_state();
        self.state = CachedState::default();
    }

    // ===== Output merger =====

    pub fn set_render_targets(&mut self, views: &[RawCom], depth_stencil_view: Option<RawCom>) {
        if self.state.render_target_views != views || self.state.depth_stencil_view != depth_stencil_view {
            self.api.om_set_render_targets(views, depth_stencil_view);
            self.state.render_target_views = views.to_vec();
            self.state.depth_stencil_view = depth_stencil_view;
        }
    }

    pub fn render_target_views(&self) -> &[RawCom] {
        &self.state.render_target_views
    }

    pub fn depth_stencil_view(&self) -> Option<RawCom> {
        self.state.depth_stencil_view
    }

    pub fn set_depth_stencil_state(&mut self, state: Option<RawCom>, stencil_reference: u32) {
        if self.state.depth_stencil_state != state || self.state.stencil_reference != stencil_reference {
            self.api.om_set_depth_stencil_state(state, stencil_reference);
            self.state.depth_stencil_state = state;
            self.state.stencil_reference = stencil_reference;
        }
    }

    pub fn set_blend_state(&mut self, state: Option<RawCom>) {
        if self.state.blend_state != state {
            self.api.om_set_blend_state(state, BLEND_FACTOR, SAMPLE_MASK);
            self.state.blend_state = state;
        }
    }

    // ===== Rasterizer =====

    pub fn set_rasterizer_state(&mut self, state: Option<RawCom>) {
        if self.state.rasterizer_state != state {
            self.api.rs_set_state(state);
            self.state.rasterizer_state = state;
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.state.viewport != Some(viewport) {
            self.api.rs_set_viewports(&[viewport]);
            self.state.viewport = Some(viewport);
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.state.viewport
    }

    /// Only effective while the bound rasterizer state enables scissoring
    pub fn set_scissor_rect(&mut self, rect: D3dRect) {
        if self.state.scissor_rect != Some(rect) {
            self.api.rs_set_scissor_rects(&[rect]);
            self.state.scissor_rect = Some(rect);
        }
    }

    // ===== Shaders =====

    pub fn set_shaders(&mut self, pixel: Option<RawCom>, vertex: Option<RawCom>, input_layout: Option<RawCom>) {
        if self.state.pixel_shader != pixel {
            self.api.ps_set_shader(pixel);
            self.state.pixel_shader = pixel;
        }
        if self.state.vertex_shader != vertex {
            self.api.vs_set_shader(vertex);
            self.state.vertex_shader = vertex;
        }
        if self.state.input_layout != input_layout {
            self.api.ia_set_input_layout(input_layout);
            self.state.input_layout = input_layout;
        }
    }

    /// Constant buffers of slot 0
    pub fn set_constant_buffers(&mut self, pixel: Option<RawCom>, vertex: Option<RawCom>) {
        if self.state.pixel_constant_buffer != pixel {
            self.api.ps_set_constant_buffer(0, pixel);
            self.state.pixel_constant_buffer = pixel;
        }
        if self.state.vertex_constant_buffer != vertex {
            self.api.vs_set_constant_buffer(0, vertex);
            self.state.vertex_constant_buffer = vertex;
        }
    }

    /// Bind views and samplers to pixel shader slots `0..views.len()`
    ///
    /// Slots past the end of the lists are cleared.
    pub fn set_shader_resources(&mut self, views: &[Option<RawCom>], samplers: &[Option<RawCom>]) -> Result<()> {
        if views.len() > MAX_TEXTURE_SLOTS || samplers.len() > MAX_TEXTURE_SLOTS {
            engine_bail!(SOURCE, InvalidParameter,
                "At most {} textures can be bound, got {}", MAX_TEXTURE_SLOTS, views.len().max(samplers.len()));
        }

        let next_views = fill_slots(views);
        if self.state.shader_resources != next_views {
            let count = views.len().max(bound_slots(&self.state.shader_resources));
            self.api.ps_set_shader_resources(0, &next_views[..count]);
            self.state.shader_resources = next_views;
        }
        let next_samplers = fill_slots(samplers);
        if self.state.samplers != next_samplers {
            let count = samplers.len().max(bound_slots(&self.state.samplers));
            self.api.ps_set_samplers(0, &next_samplers[..count]);
            self.state.samplers = next_samplers;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn shader_resource(&self, slot: usize) -> Option<RawCom> {
        self.state.shader_resources.get(slot).copied().flatten()
    }

    // ===== Input assembler =====

    /// Vertex buffer of slot 0, with the engine vertex stride
    pub fn set_vertex_buffer(&mut self, buffer: Option<RawCom>) {
        if self.state.vertex_buffer != buffer {
            self.api.ia_set_vertex_buffer(0, buffer, Vertex::STRIDE, 0);
            self.state.vertex_buffer = buffer;
        }
    }

    pub fn set_index_buffer(&mut self, buffer: Option<RawCom>, format: u32) {
        if self.state.index_buffer != buffer || self.state.index_format != format {
            self.api.ia_set_index_buffer(buffer, format, 0);
            self.state.index_buffer = buffer;
            self.state.index_format = format;
        }
    }

    pub fn set_primitive_topology(&mut self, topology: u32) {
        if self.state.topology != topology {
            self.api.ia_set_primitive_topology(topology);
            self.state.topology = topology;
        }
    }

    // ===== Forgetting released objects =====

    /// Unbind `object` from every slot that still holds it
    pub fn unbind(&mut self, object: RawCom) {
        let held = Some(object);

        if self.state.render_target_views.contains(&object) || self.state.depth_stencil_view == held {
            let views: Vec<RawCom> = self
                .state
                .render_target_views
                .iter()
                .copied()
                .filter(|view| *view != object)
                .collect();
            let depth_stencil_view = self.state.depth_stencil_view.filter(|view| *view != object);
            self.set_render_targets(&views, depth_stencil_view);
        }
        if self.state.rasterizer_state == held {
            self.set_rasterizer_state(None);
        }
        if self.state.depth_stencil_state == held {
            self.set_depth_stencil_state(None, self.state.stencil_reference);
        }
        if self.state.blend_state == held {
            self.set_blend_state(None);
        }

        let pixel = self.state.pixel_shader.filter(|shader| *shader != object);
        let vertex = self.state.vertex_shader.filter(|shader| *shader != object);
        let input_layout = self.state.input_layout.filter(|layout| *layout != object);
        self.set_shaders(pixel, vertex, input_layout);

        let pixel = self.state.pixel_constant_buffer.filter(|buffer| *buffer != object);
        let vertex = self.state.vertex_constant_buffer.filter(|buffer| *buffer != object);
        self.set_constant_buffers(pixel, vertex);

        if self.state.vertex_buffer == held {
            self.set_vertex_buffer(None);
        }
        if self.state.index_buffer == held {
            self.set_index_buffer(None, self.state.index_format);
        }

        for slot in 0..MAX_TEXTURE_SLOTS {
            if self.state.shader_resources[slot] == held {
                self.api.ps_set_shader_resources(slot as u32, &[None]);
                self.state.shader_resources[slot] = None;
            }
            if self.state.samplers[slot] == held {
                self.api.ps_set_samplers(slot as u32, &[None]);
                self.state.samplers[slot] = None;
            }
        }
    }
}

/// `slots` followed by empty slots
fn fill_slots(slots: &[Option<RawCom>]) -> [Option<RawCom>; MAX_TEXTURE_SLOTS] {
    let mut filled = [None; MAX_TEXTURE_SLOTS];
    filled[..slots.len()].copy_from_slice(slots);
    filled
}

/// Length of the slot range holding every bound object
fn bound_slots(slots: &[Option<RawCom>]) -> usize {
    slots.iter().rposition(Option::is_some).map_or(0, |last| last + 1)
}

#[cfg(test)]
#[path = "d3d11_state_cache_tests.rs"]
mod tests;
