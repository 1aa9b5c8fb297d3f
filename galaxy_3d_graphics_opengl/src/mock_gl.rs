/// Recording OpenGL fake for unit tests (no GPU required)
///
/// Every state-changing call is recorded as a string such as
/// `glBindBuffer(0x8892, 3)`; queries (`glGetError`, `glGetString`, ...) are
/// not. Buffer uploads are applied to in-memory buffers so their contents can
/// be read back.

use crate::opengl_api::GlApi;
use crate::opengl_constants::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

fn e(value: GLenum) -> String {
    format!("0x{:04X}", value)
}

#[derive(Default)]
pub struct MockGlState {
    pub calls: Vec<String>,
    pub version: String,
    pub renderer: String,
    pub extensions: Vec<String>,
    pub entry_points: FxHashSet<String>,
    pub errors: VecDeque<GLenum>,
    pub integers: FxHashMap<GLenum, GLint>,
    pub buffers: FxHashMap<GLuint, Vec<u8>>,
    /// `(target, level, data)` of every `glTexImage2D` with data
    pub texture_uploads: Vec<(GLenum, GLint, Vec<u8>)>,
    pub bound_buffers: FxHashMap<GLenum, GLuint>,
    pub uniform_locations: FxHashMap<(GLuint, String), GLint>,
    pub missing_uniforms: FxHashSet<String>,
    pub fail_compile: bool,
    pub fail_link: bool,
    pub framebuffer_status: GLenum,
    next_name: GLuint,
}

pub struct MockGl {
    state: Mutex<MockGlState>,
}

impl MockGl {
    fn new(version: &str) -> Arc<Self> {
        let state = MockGlState {
            version: version.to_string(),
            renderer: "Mock Renderer".to_string(),
            framebuffer_status: FRAMEBUFFER_COMPLETE,
            next_name: 1,
            ..MockGlState::default()
        };
        let mock = Arc::new(Self { state: Mutex::new(state) });
        mock.add_entry_points(&[
            "glGenVertexArrays",
            "glCopyImageSubData",
            "glPushDebugGroup",
            "glRenderbufferStorageMultisample",
            "glTexStorage2DMultisample",
            "glGenFramebuffers",
        ]);
        mock
    }

    /// Desktop context
    pub fn desktop(major: u16, minor: u16) -> Arc<Self> {
        Self::new(&format!("{}.{}.0 Mock", major, minor))
    }

    /// OpenGL ES context
    pub fn es(major: u16, minor: u16) -> Arc<Self> {
        Self::new(&format!("OpenGL ES {}.{} Mock", major, minor))
    }

    pub fn state(&self) -> MutexGuard<'_, MockGlState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of recorded calls to the entry point `name`
    pub fn count(&self, name: &str) -> usize {
        let prefix = format!("{}(", name);
        self.state().calls.iter().filter(|call| call.starts_with(&prefix)).count()
    }

    /// Whether exactly this call was recorded
    pub fn called(&self, call: &str) -> bool {
        self.state().calls.iter().any(|recorded| recorded == call)
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Make the next `glGetError` report `code`
    pub fn push_error(&self, code: GLenum) {
        self.state().errors.push_back(code);
    }

    pub fn set_extensions(&self, extensions: &[&str]) {
        self.state().extensions = extensions.iter().map(|name| name.to_string()).collect();
    }

    pub fn set_entry_points(&self, names: &[&str]) {
        let mut state = self.state();
        state.entry_points = names.iter().map(|name| name.to_string()).collect();
    }

    pub fn add_entry_points(&self, names: &[&str]) {
        let mut state = self.state();
        state.entry_points.extend(names.iter().map(|name| name.to_string()));
    }

    pub fn set_integer(&self, name: GLenum, value: GLint) {
        self.state().integers.insert(name, value);
    }

    pub fn buffer_contents(&self, buffer: GLuint) -> Option<Vec<u8>> {
        self.state().buffers.get(&buffer).cloned()
    }

    fn record(&self, call: String) {
        self.state().calls.push(call);
    }

    fn next_name(&self) -> GLuint {
        let mut state = self.state();
        let name = state.next_name;
        state.next_name += 1;
        name
    }
}

impl GlApi for MockGl {
    fn get_error(&self) -> GLenum {
        self.state().errors.pop_front().unwrap_or(NO_ERROR)
    }

    fn get_string(&self, name: GLenum) -> String {
        let state = self.state();
        match name {
            VERSION => state.version.clone(),
            RENDERER => state.renderer.clone(),
            VENDOR => "Mock".to_string(),
            _ => String::new(),
        }
    }

    fn get_integer(&self, name: GLenum) -> GLint {
        self.state().integers.get(&name).copied().unwrap_or(0)
    }

    fn extensions(&self) -> Vec<String> {
        self.state().extensions.clone()
    }

    fn has_entry_point(&self, name: &str) -> bool {
        self.state().entry_points.contains(name)
    }

    fn enable(&self, capability: GLenum) {
        self.record(format!("glEnable({})", e(capability)));
    }

    fn disable(&self, capability: GLenum) {
        self.record(format!("glDisable({})", e(capability)));
    }

    fn front_face(&self, mode: GLenum) {
        self.record(format!("glFrontFace({})", e(mode)));
    }

    fn cull_face(&self, mode: GLenum) {
        self.record(format!("glCullFace({})", e(mode)));
    }

    fn polygon_mode(&self, face: GLenum, mode: GLenum) {
        self.record(format!("glPolygonMode({}, {})", e(face), e(mode)));
    }

    fn blend_equation_separate(&self, mode_rgb: GLenum, mode_alpha: GLenum) {
        self.record(format!("glBlendEquationSeparate({}, {})", e(mode_rgb), e(mode_alpha)));
    }

    fn blend_func_separate(&self, src_rgb: GLenum, dst_rgb: GLenum, src_alpha: GLenum, dst_alpha: GLenum) {
        self.record(format!(
            "glBlendFuncSeparate({}, {}, {}, {})",
            e(src_rgb), e(dst_rgb), e(src_alpha), e(dst_alpha)
        ));
    }

    fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.record(format!("glColorMask({}, {}, {}, {})", red, green, blue, alpha));
    }

    fn depth_mask(&self, flag: bool) {
        self.record(format!("glDepthMask({})", flag));
    }

    fn depth_func(&self, func: GLenum) {
        self.record(format!("glDepthFunc({})", e(func)));
    }

    fn stencil_mask(&self, mask: GLuint) {
        self.record(format!("glStencilMask(0x{:08X})", mask));
    }

    fn stencil_op_separate(&self, face: GLenum, fail: GLenum, depth_fail: GLenum, pass: GLenum) {
        self.record(format!(
            "glStencilOpSeparate({}, {}, {}, {})",
            e(face), e(fail), e(depth_fail), e(pass)
        ));
    }

    fn stencil_func_separate(&self, face: GLenum, func: GLenum, reference: GLint, mask: GLuint) {
        self.record(format!(
            "glStencilFuncSeparate({}, {}, {}, 0x{:08X})",
            e(face), e(func), reference, mask
        ));
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.record(format!("glViewport({}, {}, {}, {})", x, y, width, height));
    }

    fn scissor(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.record(format!("glScissor({}, {}, {}, {})", x, y, width, height));
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(format!("glClearColor({}, {}, {}, {})", red, green, blue, alpha));
    }

    fn clear_depth(&self, depth: f32) {
        self.record(format!("glClearDepth({})", depth));
    }

    fn clear_stencil(&self, stencil: GLint) {
        self.record(format!("glClearStencil({})", stencil));
    }

    fn clear(&self, mask: GLbitfield) {
        self.record(format!("glClear({})", e(mask)));
    }

    fn active_texture(&self, unit: GLenum) {
        self.record(format!("glActiveTexture({})", e(unit)));
    }

    fn bind_texture(&self, target: GLenum, texture: GLuint) {
        self.record(format!("glBindTexture({}, {})", e(target), texture));
    }

    fn use_program(&self, program: GLuint) {
        self.record(format!("glUseProgram({})", program));
    }

    fn bind_framebuffer(&self, target: GLenum, framebuffer: GLuint) {
        self.record(format!("glBindFramebuffer({}, {})", e(target), framebuffer));
    }

    fn bind_renderbuffer(&self, target: GLenum, renderbuffer: GLuint) {
        self.record(format!("glBindRenderbuffer({}, {})", e(target), renderbuffer));
    }

    fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
        self.record(format!("glBindBuffer({}, {})", e(target), buffer));
        self.state().bound_buffers.insert(target, buffer);
    }

    fn gen_vertex_array(&self) -> GLuint {
        let name = self.next_name();
        self.record(format!("glGenVertexArrays() -> {}", name));
        name
    }

    fn bind_vertex_array(&self, vertex_array: GLuint) {
        self.record(format!("glBindVertexArray({})", vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: GLuint) {
        self.record(format!("glDeleteVertexArrays({})", vertex_array));
    }

    fn gen_buffer(&self) -> GLuint {
        let name = self.next_name();
        self.record(format!("glGenBuffers() -> {}", name));
        name
    }

    fn delete_buffer(&self, buffer: GLuint) {
        self.record(format!("glDeleteBuffers({})", buffer));
        self.state().buffers.remove(&buffer);
    }

    fn buffer_data(&self, target: GLenum, size: usize, data: Option<&[u8]>, usage: GLenum) {
        self.record(format!("glBufferData({}, {}, {})", e(target), size, e(usage)));
        let mut state = self.state();
        let bound = state.bound_buffers.get(&target).copied().unwrap_or(0);
        if bound == 0 {
            state.errors.push_back(INVALID_OPERATION);
            return;
        }
        let mut contents = vec![0u8; size];
        if let Some(data) = data {
            let len = data.len().min(size);
            contents[..len].copy_from_slice(&data[..len]);
        }
        state.buffers.insert(bound, contents);
    }

    fn buffer_sub_data(&self, target: GLenum, offset: usize, data: &[u8]) {
        self.record(format!("glBufferSubData({}, {}, {})", e(target), offset, data.len()));
        let mut state = self.state();
        let bound = state.bound_buffers.get(&target).copied().unwrap_or(0);
        let fits = state
            .buffers
            .get(&bound)
            .map(|contents| offset + data.len() <= contents.len())
            .unwrap_or(false);
        if !fits {
            state.errors.push_back(INVALID_VALUE);
            return;
        }
        if let Some(contents) = state.buffers.get_mut(&bound) {
            contents[offset..offset + data.len()].copy_from_slice(data);
        }
    }

    fn gen_texture(&self) -> GLuint {
        let name = self.next_name();
        self.record(format!("glGenTextures() -> {}", name));
        name
    }

    fn delete_texture(&self, texture: GLuint) {
        self.record(format!("glDeleteTextures({})", texture));
    }

    fn tex_image_2d(
        &self,
        target: GLenum,
        level: GLint,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        pixel_type: GLenum,
        data: Option<&[u8]>,
    ) {
        self.record(format!(
            "glTexImage2D({}, {}, {}, {}, {}, {}, {}, {})",
            e(target), level, e(internal_format), width, height, e(format), e(pixel_type),
            data.map(|d| d.len()).unwrap_or(0)
        ));
        if let Some(data) = data {
            self.state().texture_uploads.push((target, level, data.to_vec()));
        }
    }

    fn tex_sub_image_2d(
        &self,
        target: GLenum,
        level: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        pixel_type: GLenum,
        data: &[u8],
    ) {
        self.record(format!(
            "glTexSubImage2D({}, {}, {}, {}, {}, {}, {})",
            e(target), level, width, height, e(format), e(pixel_type), data.len()
        ));
    }

    fn tex_storage_2d_multisample(
        &self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.record(format!(
            "glTexStorage2DMultisample({}, {}, {}, {}, {})",
            e(target), samples, e(internal_format), width, height
        ));
    }

    fn tex_parameter_i(&self, target: GLenum, name: GLenum, value: GLint) {
        self.record(format!("glTexParameteri({}, {}, {})", e(target), e(name), value));
    }

    fn tex_parameter_fv(&self, target: GLenum, name: GLenum, values: &[f32; 4]) {
        self.record(format!("glTexParameterfv({}, {}, {:?})", e(target), e(name), values));
    }

    fn copy_image_sub_data(
        &self,
        source: GLuint,
        _source_target: GLenum,
        source_level: GLint,
        source_x: GLint,
        source_y: GLint,
        destination: GLuint,
        _destination_target: GLenum,
        destination_level: GLint,
        destination_x: GLint,
        destination_y: GLint,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.record(format!(
            "glCopyImageSubData({}, {}, {}, {}, {}, {}, {}, {}, {}, {})",
            source, source_level, source_x, source_y, destination, destination_level,
            destination_x, destination_y, width, height
        ));
    }

    fn gen_renderbuffer(&self) -> GLuint {
        let name = self.next_name();
        self.record(format!("glGenRenderbuffers() -> {}", name));
        name
    }

    fn delete_renderbuffer(&self, renderbuffer: GLuint) {
        self.record(format!("glDeleteRenderbuffers({})", renderbuffer));
    }

    fn renderbuffer_storage(&self, target: GLenum, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        self.record(format!(
            "glRenderbufferStorage({}, {}, {}, {})",
            e(target), e(internal_format), width, height
        ));
    }

    fn renderbuffer_storage_multisample(
        &self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.record(format!(
            "glRenderbufferStorageMultisample({}, {}, {}, {}, {})",
            e(target), samples, e(internal_format), width, height
        ));
    }

    fn gen_framebuffer(&self) -> GLuint {
        let name = self.next_name();
        self.record(format!("glGenFramebuffers() -> {}", name));
        name
    }

    fn delete_framebuffer(&self, framebuffer: GLuint) {
        self.record(format!("glDeleteFramebuffers({})", framebuffer));
    }

    fn framebuffer_texture_2d(&self, target: GLenum, attachment: GLenum, texture_target: GLenum, texture: GLuint, level: GLint) {
        self.record(format!(
            "glFramebufferTexture2D({}, {}, {}, {}, {})",
            e(target), e(attachment), e(texture_target), texture, level
        ));
    }

    fn framebuffer_renderbuffer(&self, target: GLenum, attachment: GLenum, renderbuffer_target: GLenum, renderbuffer: GLuint) {
        self.record(format!(
            "glFramebufferRenderbuffer({}, {}, {}, {})",
            e(target), e(attachment), e(renderbuffer_target), renderbuffer
        ));
    }

    fn check_framebuffer_status(&self, _target: GLenum) -> GLenum {
        self.state().framebuffer_status
    }

    fn create_shader(&self, kind: GLenum) -> GLuint {
        let name = self.next_name();
        self.record(format!("glCreateShader({}) -> {}", e(kind), name));
        name
    }

    fn delete_shader(&self, shader: GLuint) {
        self.record(format!("glDeleteShader({})", shader));
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        self.record(format!("glShaderSource({}, {})", shader, source.len()));
    }

    fn compile_shader(&self, shader: GLuint) {
        self.record(format!("glCompileShader({})", shader));
    }

    fn shader_compile_status(&self, _shader: GLuint) -> bool {
        !self.state().fail_compile
    }

    fn shader_info_log(&self, _shader: GLuint) -> String {
        "0:1: syntax error".to_string()
    }

    fn create_program(&self) -> GLuint {
        let name = self.next_name();
        self.record(format!("glCreateProgram() -> {}", name));
        name
    }

    fn delete_program(&self, program: GLuint) {
        self.record(format!("glDeleteProgram({})", program));
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(format!("glAttachShader({}, {})", program, shader));
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(format!("glDetachShader({}, {})", program, shader));
    }

    fn bind_attrib_location(&self, program: GLuint, index: GLuint, name: &str) {
        self.record(format!("glBindAttribLocation({}, {}, {})", program, index, name));
    }

    fn link_program(&self, program: GLuint) {
        self.record(format!("glLinkProgram({})", program));
    }

    fn program_link_status(&self, _program: GLuint) -> bool {
        !self.state().fail_link
    }

    fn program_info_log(&self, _program: GLuint) -> String {
        "unresolved varying".to_string()
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint> {
        let mut state = self.state();
        if state.missing_uniforms.contains(name) {
            return None;
        }
        let next = state.uniform_locations.len() as GLint;
        Some(*state.uniform_locations.entry((program, name.to_string())).or_insert(next))
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        self.record(format!("glUniform1i({}, {})", location, value));
    }

    fn uniform_fv(&self, location: GLint, components: u32, values: &[f32]) {
        self.record(format!("glUniform{}fv({}, {:?})", components, location, values));
    }

    fn uniform_iv(&self, location: GLint, components: u32, values: &[i32]) {
        self.record(format!("glUniform{}iv({}, {:?})", components, location, values));
    }

    fn uniform_uiv(&self, location: GLint, components: u32, values: &[u32]) {
        self.record(format!("glUniform{}uiv({}, {:?})", components, location, values));
    }

    fn uniform_matrix_fv(&self, location: GLint, dimension: u32, values: &[f32]) {
        self.record(format!("glUniformMatrix{}fv({}, {})", dimension, location, values.len()));
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.record(format!("glEnableVertexAttribArray({})", index));
    }

    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        data_type: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        self.record(format!(
            "glVertexAttribPointer({}, {}, {}, {}, {}, {})",
            index, size, e(data_type), normalized, stride, offset
        ));
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum, offset: usize) {
        self.record(format!("glDrawElements({}, {}, {}, {})", e(mode), count, e(index_type), offset));
    }

    fn push_debug_group(&self, name: &str) {
        self.record(format!("glPushDebugGroup({})", name));
    }

    fn pop_debug_group(&self) {
        self.record("glPopDebugGroup()".to_string());
    }
}
