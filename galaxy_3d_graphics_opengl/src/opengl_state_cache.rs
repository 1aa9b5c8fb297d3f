/// Redundant-state filter in front of the OpenGL context
///
/// Every setter compares against the last value it successfully applied and
/// skips the native call when nothing changes. The cached value is only
/// updated once the call succeeded, so a failed call is retried next time.
/// After a context loss `reset` puts the cache back to OpenGL defaults.

use crate::opengl_api::GlApi;
use crate::opengl_constants::*;
use crate::opengl_error::{check, SOURCE};
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::Result;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Texture units tracked per target
pub const MAX_TEXTURE_UNITS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlRect {
    pub x: GLint,
    pub y: GLint,
    pub width: GLsizei,
    pub height: GLsizei,
}

impl GlRect {
    pub fn new(x: GLint, y: GLint, width: GLsizei, height: GLsizei) -> Self {
        Self { x, y, width, height }
    }
}

/// Blend configuration as applied to the context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlBlend {
    pub enabled: bool,
    pub mode_rgb: GLenum,
    pub mode_alpha: GLenum,
    pub source_rgb: GLenum,
    pub dest_rgb: GLenum,
    pub source_alpha: GLenum,
    pub dest_alpha: GLenum,
}

impl GlBlend {
    pub const DISABLED: GlBlend = GlBlend {
        enabled: false,
        mode_rgb: FUNC_ADD,
        mode_alpha: FUNC_ADD,
        source_rgb: ONE,
        dest_rgb: ZERO,
        source_alpha: ONE,
        dest_alpha: ZERO,
    };
}

#[derive(Debug, Clone, PartialEq)]
struct CachedState {
    front_face: GLenum,
    textures: FxHashMap<GLenum, [GLuint; MAX_TEXTURE_UNITS]>,
    program: GLuint,
    frame_buffer: GLuint,
    buffers: FxHashMap<GLenum, GLuint>,

    blend_enabled: bool,
    blend_equations: (GLenum, GLenum),
    blend_factors: [GLenum; 4],
    color_mask: [bool; 4],
    polygon_fill_mode: GLenum,

    scissor_enabled: bool,
    scissor: GlRect,

    depth_test: bool,
    depth_mask: bool,
    depth_func: GLenum,
    stencil_test: bool,
    stencil_mask: GLuint,

    viewport: GlRect,
    cull_enabled: bool,
    cull_face: GLenum,

    clear_color: [f32; 4],
    clear_depth: f32,
    clear_stencil: GLint,
}

impl Default for CachedState {
    fn default() -> Self {
        Self {
            front_face: CCW,
            textures: FxHashMap::default(),
            program: 0,
            frame_buffer: 0,
            buffers: FxHashMap::default(),
            blend_enabled: false,
            blend_equations: (0, 0),
            blend_factors: [0; 4],
            color_mask: [true; 4],
            polygon_fill_mode: FILL,
            scissor_enabled: false,
            scissor: GlRect::default(),
            depth_test: false,
            depth_mask: true,
            depth_func: LESS,
            stencil_test: false,
            stencil_mask: 0xFFFF_FFFF,
            viewport: GlRect::default(),
            cull_enabled: false,
            cull_face: NONE,
            clear_color: [0.0; 4],
            clear_depth: 1.0,
            clear_stencil: 0,
        }
    }
}

pub struct StateCache {
    api: Arc<dyn GlApi>,
    state: CachedState,
}

impl StateCache {
    pub fn new(api: Arc<dyn GlApi>) -> Self {
        Self {
            api,
            state: CachedState::default(),
        }
    }

    pub fn api(&self) -> &Arc<dyn GlApi> {
        &self.api
    }

    /// Forget everything: the context is back to OpenGL defaults
    pub fn reset(&mut self) {
        self.state = CachedState::default();
    }

    fn toggle(&self, capability: GLenum, enabled: bool) {
        if enabled {
            self.api.enable(capability);
        } else {
            self.api.disable(capability);
        }
    }

    // ===== Bindings =====

    pub fn set_front_face(&mut self, mode: GLenum) -> Result<()> {
        if self.state.front_face != mode {
            self.api.front_face(mode);
            check(self.api.as_ref(), "Failed to set front face mode")?;
            self.state.front_face = mode;
        }
        Ok(())
    }

    pub fn front_face(&self) -> GLenum {
        self.state.front_face
    }

    /// Bind `texture` to `target` on texture unit `layer`
    pub fn bind_texture(&mut self, target: GLenum, layer: usize, texture: GLuint) -> Result<()> {
        if layer >= MAX_TEXTURE_UNITS {
            engine_bail!(SOURCE, InvalidParameter, "Invalid texture unit {}", layer);
        }
        let bound = self
            .state
            .textures
            .get(&target)
            .map(|units| units[layer])
            .unwrap_or(0);
        if bound != texture {
            self.api.active_texture(TEXTURE0 + layer as GLenum);
            self.api.bind_texture(target, texture);
            check(self.api.as_ref(), "Failed to bind texture")?;
            self.state.textures.entry(target).or_insert([0; MAX_TEXTURE_UNITS])[layer] = texture;
        }
        Ok(())
    }

    /// Bind 0 to every target that has a texture on `layer`
    pub fn unbind_texture_unit(&mut self, layer: usize) -> Result<()> {
        let targets: Vec<GLenum> = self
            .state
            .textures
            .iter()
            .filter(|(_, units)| units.get(layer).is_some_and(|&name| name != 0))
            .map(|(&target, _)| target)
            .collect();
        for target in targets {
            self.bind_texture(target, layer, 0)?;
        }
        Ok(())
    }

    pub fn use_program(&mut self, program: GLuint) -> Result<()> {
        if self.state.program != program {
            self.api.use_program(program);
            check(self.api.as_ref(), "Failed to bind program")?;
            self.state.program = program;
        }
        Ok(())
    }

    pub fn program(&self) -> GLuint {
        self.state.program
    }

    pub fn bind_frame_buffer(&mut self, frame_buffer: GLuint) -> Result<()> {
        if self.state.frame_buffer != frame_buffer {
            self.api.bind_framebuffer(FRAMEBUFFER, frame_buffer);
            check(self.api.as_ref(), "Failed to bind frame buffer")?;
            self.state.frame_buffer = frame_buffer;
        }
        Ok(())
    }

    pub fn frame_buffer(&self) -> GLuint {
        self.state.frame_buffer
    }

    pub fn bind_buffer(&mut self, target: GLenum, buffer: GLuint) -> Result<()> {
        if self.bound_buffer(target) != buffer {
            self.api.bind_buffer(target, buffer);
            check(self.api.as_ref(), "Failed to bind buffer")?;
            self.state.buffers.insert(target, buffer);
        }
        Ok(())
    }

    pub fn bound_buffer(&self, target: GLenum) -> GLuint {
        self.state.buffers.get(&target).copied().unwrap_or(0)
    }

    // ===== Forgetting deleted objects =====

    pub fn forget_buffer(&mut self, buffer: GLuint) {
        for bound in self.state.buffers.values_mut() {
            if *bound == buffer {
                *bound = 0;
            }
        }
    }

    pub fn forget_texture(&mut self, texture: GLuint) {
        for units in self.state.textures.values_mut() {
            for bound in units.iter_mut() {
                if *bound == texture {
                    *bound = 0;
                }
            }
        }
    }

    pub fn forget_program(&mut self, program: GLuint) {
        if self.state.program == program {
            self.state.program = 0;
        }
    }

    pub fn forget_frame_buffer(&mut self, frame_buffer: GLuint) {
        if self.state.frame_buffer == frame_buffer {
            self.state.frame_buffer = 0;
        }
    }

    // ===== Fixed-function state =====

    pub fn set_scissor_test(&mut self, enabled: bool, rect: GlRect) -> Result<()> {
        if self.state.scissor_enabled != enabled {
            self.toggle(SCISSOR_TEST, enabled);
            check(self.api.as_ref(), "Failed to set scissor test")?;
            self.state.scissor_enabled = enabled;
        }

        if enabled && self.state.scissor != rect {
            self.api.scissor(rect.x, rect.y, rect.width, rect.height);
            check(self.api.as_ref(), "Failed to set scissor test")?;
            self.state.scissor = rect;
        }
        Ok(())
    }

    pub fn enable_depth_test(&mut self, enabled: bool) -> Result<()> {
        if self.state.depth_test != enabled {
            self.toggle(DEPTH_TEST, enabled);
            check(self.api.as_ref(), "Failed to change depth test state")?;
            self.state.depth_test = enabled;
        }
        Ok(())
    }

    pub fn enable_stencil_test(&mut self, enabled: bool) -> Result<()> {
        if self.state.stencil_test != enabled {
            self.toggle(STENCIL_TEST, enabled);
            check(self.api.as_ref(), "Failed to change stencil test state")?;
            self.state.stencil_test = enabled;
        }
        Ok(())
    }

    pub fn set_viewport(&mut self, rect: GlRect) -> Result<()> {
        if self.state.viewport != rect {
            self.api.viewport(rect.x, rect.y, rect.width, rect.height);
            check(self.api.as_ref(), "Failed to set viewport")?;
            self.state.viewport = rect;
        }
        Ok(())
    }

    pub fn viewport(&self) -> GlRect {
        self.state.viewport
    }

    pub fn set_blend_state(&mut self, blend: GlBlend) -> Result<()> {
        if self.state.blend_enabled != blend.enabled {
            self.toggle(BLEND, blend.enabled);
            check(self.api.as_ref(), "Failed to enable blend state")?;
            self.state.blend_enabled = blend.enabled;
        }

        if blend.enabled {
            let equations = (blend.mode_rgb, blend.mode_alpha);
            if self.state.blend_equations != equations {
                self.api.blend_equation_separate(blend.mode_rgb, blend.mode_alpha);
                check(self.api.as_ref(), "Failed to set blend state")?;
                self.state.blend_equations = equations;
            }

            let factors = [blend.source_rgb, blend.dest_rgb, blend.source_alpha, blend.dest_alpha];
            if self.state.blend_factors != factors {
                self.api.blend_func_separate(factors[0], factors[1], factors[2], factors[3]);
                check(self.api.as_ref(), "Failed to set blend state")?;
                self.state.blend_factors = factors;
            }
        }
        Ok(())
    }

    pub fn set_color_mask(&mut self, mask: [bool; 4]) -> Result<()> {
        if self.state.color_mask != mask {
            self.api.color_mask(mask[0], mask[1], mask[2], mask[3]);
            check(self.api.as_ref(), "Failed to set color mask")?;
            self.state.color_mask = mask;
        }
        Ok(())
    }

    pub fn set_depth_mask(&mut self, flag: bool) -> Result<()> {
        if self.state.depth_mask != flag {
            self.api.depth_mask(flag);
            check(self.api.as_ref(), "Failed to change depth mask state")?;
            self.state.depth_mask = flag;
        }
        Ok(())
    }

    pub fn set_depth_func(&mut self, func: GLenum) -> Result<()> {
        if self.state.depth_func != func {
            self.api.depth_func(func);
            check(self.api.as_ref(), "Failed to change depth test state")?;
            self.state.depth_func = func;
        }
        Ok(())
    }

    pub fn set_stencil_mask(&mut self, mask: GLuint) -> Result<()> {
        if self.state.stencil_mask != mask {
            self.api.stencil_mask(mask);
            check(self.api.as_ref(), "Failed to change stencil mask")?;
            self.state.stencil_mask = mask;
        }
        Ok(())
    }

    /// Cull `face` (`NONE` disables culling)
    pub fn set_cull_face(&mut self, face: GLenum) -> Result<()> {
        let enabled = face != NONE;
        if self.state.cull_enabled != enabled {
            self.toggle(CULL_FACE, enabled);
            check(self.api.as_ref(), "Failed to enable cull face")?;
            self.state.cull_enabled = enabled;
        }

        if enabled && self.state.cull_face != face {
            self.api.cull_face(face);
            check(self.api.as_ref(), "Failed to set cull face")?;
            self.state.cull_face = face;
        }
        Ok(())
    }

    pub fn set_polygon_fill_mode(&mut self, mode: GLenum) -> Result<()> {
        if self.state.polygon_fill_mode != mode {
            self.api.polygon_mode(FRONT_AND_BACK, mode);
            check(self.api.as_ref(), "Failed to set polygon fill mode")?;
            self.state.polygon_fill_mode = mode;
        }
        Ok(())
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) -> Result<()> {
        if self.state.clear_color != color {
            self.api.clear_color(color[0], color[1], color[2], color[3]);
            check(self.api.as_ref(), "Failed to set clear color")?;
            self.state.clear_color = color;
        }
        Ok(())
    }

    pub fn set_clear_depth(&mut self, depth: f32) -> Result<()> {
        if self.state.clear_depth != depth {
            self.api.clear_depth(depth);
            check(self.api.as_ref(), "Failed to set clear depth")?;
            self.state.clear_depth = depth;
        }
        Ok(())
    }

    pub fn set_clear_stencil(&mut self, stencil: GLint) -> Result<()> {
        if self.state.clear_stencil != stencil {
            self.api.clear_stencil(stencil);
            check(self.api.as_ref(), "Failed to set clear stencil")?;
            self.state.clear_stencil = stencil;
        }
        Ok(())
    }

    /// `glClear` with every targeted buffer fully writable and no scissor
    ///
    /// Write masks and the scissor test are overridden for the clear only and
    /// put back to their cached values afterwards.
    pub fn clear(&mut self, mask: GLbitfield) -> Result<()> {
        let api = self.api.as_ref();
        let state = &self.state;

        let color = mask & COLOR_BUFFER_BIT != 0 && state.color_mask != [true; 4];
        let depth = mask & DEPTH_BUFFER_BIT != 0 && !state.depth_mask;
        let stencil = mask & STENCIL_BUFFER_BIT != 0 && state.stencil_mask != 0xFFFF_FFFF;

        if color {
            api.color_mask(true, true, true, true);
        }
        if depth {
            api.depth_mask(true);
        }
        if stencil {
            api.stencil_mask(0xFFFF_FFFF);
        }
        if state.scissor_enabled {
            api.disable(SCISSOR_TEST);
        }

        api.clear(mask);

        if color {
            let [red, green, blue, alpha] = state.color_mask;
            api.color_mask(red, green, blue, alpha);
        }
        if depth {
            api.depth_mask(state.depth_mask);
        }
        if stencil {
            api.stencil_mask(state.stencil_mask);
        }
        if state.scissor_enabled {
            api.enable(SCISSOR_TEST);
        }

        check(api, "Failed to clear frame buffer")
    }
}

#[cfg(test)]
#[path = "opengl_state_cache_tests.rs"]
mod tests;
