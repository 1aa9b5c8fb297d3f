/// GlowApi - `GlApi` on top of a `glow` context
///
/// glow resolves every function at load time and panics when a missing one
/// is called. The entry points the backend treats as optional are looked up
/// through the same loader first, so capability checks can skip them.

use crate::opengl_api::{GlApi, GlApiKind};
use crate::opengl_constants::{GLbitfield, GLenum, GLint, GLsizei, GLuint};
use glow::HasContext;
use rustc_hash::FxHashSet;
use std::ffi::c_void;
use std::num::NonZeroU32;

/// Optional entry points looked up before the context is built
pub const OPTIONAL_ENTRY_POINTS: &[&str] = &[
    "glGenFramebuffers",
    "glGenFramebuffersEXT",
    "glRenderbufferStorageMultisample",
    "glRenderbufferStorageMultisampleAPPLE",
    "glRenderbufferStorageMultisampleEXT",
    "glRenderbufferStorageMultisampleIMG",
    "glTexStorage2DMultisample",
    "glGenVertexArrays",
    "glGenVertexArraysAPPLE",
    "glGenVertexArraysOES",
    "glCopyImageSubData",
    "glCopyImageSubDataEXT",
    "glCopyImageSubDataOES",
    "glPushDebugGroup",
    "glPushDebugGroupKHR",
];

pub struct GlowApi {
    gl: glow::Context,
    kind: GlApiKind,
    entry_points: FxHashSet<&'static str>,
}

// SAFETY: the context is current on the render thread only, which owns the
// device and every resource holding this api.
unsafe impl Send for GlowApi {}
unsafe impl Sync for GlowApi {}

impl GlowApi {
    /// Load a context through a platform `GetProcAddress`
    ///
    /// # Safety
    ///
    /// The context must be current on the calling thread and `loader` must
    /// return valid function pointers (or null) for that context.
    pub unsafe fn load<F>(kind: GlApiKind, mut loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        let entry_points = OPTIONAL_ENTRY_POINTS
            .iter()
            .copied()
            .filter(|name| !loader(name).is_null())
            .collect();
        let gl = glow::Context::from_loader_function(loader);
        Self { gl, kind, entry_points }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

fn name_of(id: Result<NonZeroU32, String>) -> GLuint {
    id.map(NonZeroU32::get).unwrap_or(0)
}

fn buffer(name: GLuint) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(name).map(glow::NativeBuffer)
}

fn texture(name: GLuint) -> Option<glow::NativeTexture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

fn renderbuffer(name: GLuint) -> Option<glow::NativeRenderbuffer> {
    NonZeroU32::new(name).map(glow::NativeRenderbuffer)
}

fn framebuffer(name: GLuint) -> Option<glow::NativeFramebuffer> {
    NonZeroU32::new(name).map(glow::NativeFramebuffer)
}

fn program(name: GLuint) -> Option<glow::NativeProgram> {
    NonZeroU32::new(name).map(glow::NativeProgram)
}

fn shader(name: GLuint) -> Option<glow::NativeShader> {
    NonZeroU32::new(name).map(glow::NativeShader)
}

fn vertex_array(name: GLuint) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(name).map(glow::NativeVertexArray)
}

fn uniform(location: GLint) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location as u32)
}

impl GlApi for GlowApi {
    fn get_error(&self) -> GLenum {
        unsafe { self.gl.get_error() }
    }

    fn get_string(&self, name: GLenum) -> String {
        unsafe { self.gl.get_parameter_string(name) }
    }

    fn get_integer(&self, name: GLenum) -> GLint {
        unsafe { self.gl.get_parameter_i32(name) }
    }

    fn extensions(&self) -> Vec<String> {
        self.gl.supported_extensions().iter().cloned().collect()
    }

    fn has_entry_point(&self, name: &str) -> bool {
        self.entry_points.contains(name)
    }

    fn enable(&self, capability: GLenum) {
        unsafe { self.gl.enable(capability) }
    }

    fn disable(&self, capability: GLenum) {
        unsafe { self.gl.disable(capability) }
    }

    fn front_face(&self, mode: GLenum) {
        unsafe { self.gl.front_face(mode) }
    }

    fn cull_face(&self, mode: GLenum) {
        unsafe { self.gl.cull_face(mode) }
    }

    fn polygon_mode(&self, face: GLenum, mode: GLenum) {
        unsafe { self.gl.polygon_mode(face, mode) }
    }

    fn blend_equation_separate(&self, mode_rgb: GLenum, mode_alpha: GLenum) {
        unsafe { self.gl.blend_equation_separate(mode_rgb, mode_alpha) }
    }

    fn blend_func_separate(&self, src_rgb: GLenum, dst_rgb: GLenum, src_alpha: GLenum, dst_alpha: GLenum) {
        unsafe { self.gl.blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha) }
    }

    fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool) {
        unsafe { self.gl.color_mask(red, green, blue, alpha) }
    }

    fn depth_mask(&self, flag: bool) {
        unsafe { self.gl.depth_mask(flag) }
    }

    fn depth_func(&self, func: GLenum) {
        unsafe { self.gl.depth_func(func) }
    }

    fn stencil_mask(&self, mask: GLuint) {
        unsafe { self.gl.stencil_mask(mask) }
    }

    fn stencil_op_separate(&self, face: GLenum, fail: GLenum, depth_fail: GLenum, pass: GLenum) {
        unsafe { self.gl.stencil_op_separate(face, fail, depth_fail, pass) }
    }

    fn stencil_func_separate(&self, face: GLenum, func: GLenum, reference: GLint, mask: GLuint) {
        unsafe { self.gl.stencil_func_separate(face, func, reference, mask) }
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn scissor(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { self.gl.scissor(x, y, width, height) }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.clear_color(red, green, blue, alpha) }
    }

    fn clear_depth(&self, depth: f32) {
        // glClearDepthf is core on desktop only since 4.1
        unsafe {
            match self.kind {
                GlApiKind::Desktop => self.gl.clear_depth_f64(depth as f64),
                GlApiKind::Es => self.gl.clear_depth_f32(depth),
            }
        }
    }

    fn clear_stencil(&self, stencil: GLint) {
        unsafe { self.gl.clear_stencil(stencil) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { self.gl.clear(mask) }
    }

    fn active_texture(&self, unit: GLenum) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn bind_texture(&self, target: GLenum, name: GLuint) {
        unsafe { self.gl.bind_texture(target, texture(name)) }
    }

    fn use_program(&self, name: GLuint) {
        unsafe { self.gl.use_program(program(name)) }
    }

    fn bind_framebuffer(&self, target: GLenum, name: GLuint) {
        unsafe { self.gl.bind_framebuffer(target, framebuffer(name)) }
    }

    fn bind_renderbuffer(&self, target: GLenum, name: GLuint) {
        unsafe { self.gl.bind_renderbuffer(target, renderbuffer(name)) }
    }

    fn bind_buffer(&self, target: GLenum, name: GLuint) {
        unsafe { self.gl.bind_buffer(target, buffer(name)) }
    }

    fn gen_vertex_array(&self) -> GLuint {
        name_of(unsafe { self.gl.create_vertex_array() }.map(|array| array.0))
    }

    fn bind_vertex_array(&self, name: GLuint) {
        unsafe { self.gl.bind_vertex_array(vertex_array(name)) }
    }

    fn delete_vertex_array(&self, name: GLuint) {
        if let Some(array) = vertex_array(name) {
            unsafe { self.gl.delete_vertex_array(array) }
        }
    }

    fn gen_buffer(&self) -> GLuint {
        name_of(unsafe { self.gl.create_buffer() }.map(|buffer| buffer.0))
    }

    fn delete_buffer(&self, name: GLuint) {
        if let Some(buffer) = buffer(name) {
            unsafe { self.gl.delete_buffer(buffer) }
        }
    }

    fn buffer_data(&self, target: GLenum, size: usize, data: Option<&[u8]>, usage: GLenum) {
        unsafe {
            match data {
                Some(data) if data.len() == size => self.gl.buffer_data_u8_slice(target, data, usage),
                Some(data) => {
                    self.gl.buffer_data_size(target, size as i32, usage);
                    self.gl.buffer_sub_data_u8_slice(target, 0, data);
                }
                None => self.gl.buffer_data_size(target, size as i32, usage),
            }
        }
    }

    fn buffer_sub_data(&self, target: GLenum, offset: usize, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target, offset as i32, data) }
    }

    fn gen_texture(&self) -> GLuint {
        name_of(unsafe { self.gl.create_texture() }.map(|texture| texture.0))
    }

    fn delete_texture(&self, name: GLuint) {
        if let Some(texture) = texture(name) {
            unsafe { self.gl.delete_texture(texture) }
        }
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
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                internal_format as i32,
                width,
                height,
                0,
                format,
                pixel_type,
                data,
            )
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
        unsafe {
            self.gl.tex_sub_image_2d(
                target,
                level,
                0,
                0,
                width,
                height,
                format,
                pixel_type,
                glow::PixelUnpackData::Slice(data),
            )
        }
    }

    fn tex_storage_2d_multisample(
        &self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        unsafe { self.gl.tex_storage_2d_multisample(target, samples, internal_format, width, height, true) }
    }

    fn tex_parameter_i(&self, target: GLenum, name: GLenum, value: GLint) {
        unsafe { self.gl.tex_parameter_i32(target, name, value) }
    }

    fn tex_parameter_fv(&self, target: GLenum, name: GLenum, values: &[f32; 4]) {
        unsafe { self.gl.tex_parameter_f32_slice(target, name, values) }
    }

    fn copy_image_sub_data(
        &self,
        source: GLuint,
        source_target: GLenum,
        source_level: GLint,
        source_x: GLint,
        source_y: GLint,
        destination: GLuint,
        destination_target: GLenum,
        destination_level: GLint,
        destination_x: GLint,
        destination_y: GLint,
        width: GLsizei,
        height: GLsizei,
    ) {
        let (Some(source), Some(destination)) = (texture(source), texture(destination)) else {
            return;
        };
        unsafe {
            self.gl.copy_image_sub_data(
                source,
                source_target,
                source_level,
                source_x,
                source_y,
                0,
                destination,
                destination_target,
                destination_level,
                destination_x,
                destination_y,
                0,
                width,
                height,
                1,
            )
        }
    }

    fn gen_renderbuffer(&self) -> GLuint {
        name_of(unsafe { self.gl.create_renderbuffer() }.map(|renderbuffer| renderbuffer.0))
    }

    fn delete_renderbuffer(&self, name: GLuint) {
        if let Some(renderbuffer) = renderbuffer(name) {
            unsafe { self.gl.delete_renderbuffer(renderbuffer) }
        }
    }

    fn renderbuffer_storage(&self, target: GLenum, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        unsafe { self.gl.renderbuffer_storage(target, internal_format, width, height) }
    }

    fn renderbuffer_storage_multisample(
        &self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        unsafe { self.gl.renderbuffer_storage_multisample(target, samples, internal_format, width, height) }
    }

    fn gen_framebuffer(&self) -> GLuint {
        name_of(unsafe { self.gl.create_framebuffer() }.map(|framebuffer| framebuffer.0))
    }

    fn delete_framebuffer(&self, name: GLuint) {
        if let Some(framebuffer) = framebuffer(name) {
            unsafe { self.gl.delete_framebuffer(framebuffer) }
        }
    }

    fn framebuffer_texture_2d(&self, target: GLenum, attachment: GLenum, texture_target: GLenum, name: GLuint, level: GLint) {
        unsafe { self.gl.framebuffer_texture_2d(target, attachment, texture_target, texture(name), level) }
    }

    fn framebuffer_renderbuffer(&self, target: GLenum, attachment: GLenum, renderbuffer_target: GLenum, name: GLuint) {
        unsafe { self.gl.framebuffer_renderbuffer(target, attachment, renderbuffer_target, renderbuffer(name)) }
    }

    fn check_framebuffer_status(&self, target: GLenum) -> GLenum {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn create_shader(&self, kind: GLenum) -> GLuint {
        name_of(unsafe { self.gl.create_shader(kind) }.map(|shader| shader.0))
    }

    fn delete_shader(&self, name: GLuint) {
        if let Some(shader) = shader(name) {
            unsafe { self.gl.delete_shader(shader) }
        }
    }

    fn shader_source(&self, name: GLuint, source: &str) {
        if let Some(shader) = shader(name) {
            unsafe { self.gl.shader_source(shader, source) }
        }
    }

    fn compile_shader(&self, name: GLuint) {
        if let Some(shader) = shader(name) {
            unsafe { self.gl.compile_shader(shader) }
        }
    }

    fn shader_compile_status(&self, name: GLuint) -> bool {
        shader(name).is_some_and(|shader| unsafe { self.gl.get_shader_compile_status(shader) })
    }

    fn shader_info_log(&self, name: GLuint) -> String {
        shader(name).map(|shader| unsafe { self.gl.get_shader_info_log(shader) }).unwrap_or_default()
    }

    fn create_program(&self) -> GLuint {
        name_of(unsafe { self.gl.create_program() }.map(|program| program.0))
    }

    fn delete_program(&self, name: GLuint) {
        if let Some(program) = program(name) {
            unsafe { self.gl.delete_program(program) }
        }
    }

    fn attach_shader(&self, program_name: GLuint, shader_name: GLuint) {
        if let (Some(program), Some(shader)) = (program(program_name), shader(shader_name)) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn detach_shader(&self, program_name: GLuint, shader_name: GLuint) {
        if let (Some(program), Some(shader)) = (program(program_name), shader(shader_name)) {
            unsafe { self.gl.detach_shader(program, shader) }
        }
    }

    fn bind_attrib_location(&self, name: GLuint, index: GLuint, attribute: &str) {
        if let Some(program) = program(name) {
            unsafe { self.gl.bind_attrib_location(program, index, attribute) }
        }
    }

    fn link_program(&self, name: GLuint) {
        if let Some(program) = program(name) {
            unsafe { self.gl.link_program(program) }
        }
    }

    fn program_link_status(&self, name: GLuint) -> bool {
        program(name).is_some_and(|program| unsafe { self.gl.get_program_link_status(program) })
    }

    fn program_info_log(&self, name: GLuint) -> String {
        program(name).map(|program| unsafe { self.gl.get_program_info_log(program) }).unwrap_or_default()
    }

    fn uniform_location(&self, name: GLuint, uniform_name: &str) -> Option<GLint> {
        let program = program(name)?;
        unsafe { self.gl.get_uniform_location(program, uniform_name) }.map(|location| location.0 as GLint)
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        unsafe { self.gl.uniform_1_i32(Some(&uniform(location)), value) }
    }

    fn uniform_fv(&self, location: GLint, components: u32, values: &[f32]) {
        let location = Some(uniform(location));
        unsafe {
            match components {
                1 => self.gl.uniform_1_f32_slice(location.as_ref(), values),
                2 => self.gl.uniform_2_f32_slice(location.as_ref(), values),
                3 => self.gl.uniform_3_f32_slice(location.as_ref(), values),
                _ => self.gl.uniform_4_f32_slice(location.as_ref(), values),
            }
        }
    }

    fn uniform_iv(&self, location: GLint, components: u32, values: &[i32]) {
        let location = Some(uniform(location));
        unsafe {
            match components {
                1 => self.gl.uniform_1_i32_slice(location.as_ref(), values),
                2 => self.gl.uniform_2_i32_slice(location.as_ref(), values),
                3 => self.gl.uniform_3_i32_slice(location.as_ref(), values),
                _ => self.gl.uniform_4_i32_slice(location.as_ref(), values),
            }
        }
    }

    fn uniform_uiv(&self, location: GLint, components: u32, values: &[u32]) {
        let location = Some(uniform(location));
        unsafe {
            match components {
                1 => self.gl.uniform_1_u32_slice(location.as_ref(), values),
                2 => self.gl.uniform_2_u32_slice(location.as_ref(), values),
                3 => self.gl.uniform_3_u32_slice(location.as_ref(), values),
                _ => self.gl.uniform_4_u32_slice(location.as_ref(), values),
            }
        }
    }

    fn uniform_matrix_fv(&self, location: GLint, dimension: u32, values: &[f32]) {
        let location = Some(uniform(location));
        unsafe {
            if dimension == 3 {
                self.gl.uniform_matrix_3_f32_slice(location.as_ref(), false, values)
            } else {
                self.gl.uniform_matrix_4_f32_slice(location.as_ref(), false, values)
            }
        }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
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
        unsafe { self.gl.vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset as i32) }
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum, offset: usize) {
        unsafe { self.gl.draw_elements(mode, count, index_type, offset as i32) }
    }

    fn push_debug_group(&self, name: &str) {
        unsafe { self.gl.push_debug_group(glow::DEBUG_SOURCE_APPLICATION, 0, name) }
    }

    fn pop_debug_group(&self) {
        unsafe { self.gl.pop_debug_group() }
    }
}
