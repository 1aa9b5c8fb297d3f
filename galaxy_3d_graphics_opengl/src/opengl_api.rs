/// GlApi - the native OpenGL seam
///
/// Every OpenGL call the backend makes goes through this trait. Object names
/// are raw `GLuint`s with 0 meaning "none", exactly as the C API uses them.
/// `GlowApi` implements it on top of a loaded `glow` context; tests use a
/// recording fake.

use crate::opengl_constants::{GLbitfield, GLenum, GLint, GLsizei, GLuint};
use rustc_hash::FxHashSet;

/// Which flavour of OpenGL the context speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlApiKind {
    Desktop,
    Es,
}

/// Context version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion {
    pub major: u16,
    pub minor: u16,
}

impl GlVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Parse a `GL_VERSION` string
    ///
    /// Accepts desktop strings ("4.6.0 NVIDIA 535.54") and ES strings
    /// ("OpenGL ES 3.2 Mesa 23.1", "OpenGL ES-CM 1.1").
    pub fn parse(version: &str) -> Option<Self> {
        let version = version.trim();
        let numbers = ["OpenGL ES-CM ", "OpenGL ES-CL ", "OpenGL ES "]
            .iter()
            .find_map(|prefix| version.strip_prefix(prefix))
            .unwrap_or(version);

        let token = numbers.split_whitespace().next()?;
        let mut parts = token.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts
            .next()?
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .ok()?;
        Some(Self { major, minor })
    }
}

/// API kind, version and extensions of the current context
#[derive(Debug, Clone)]
pub struct GlProfile {
    pub kind: GlApiKind,
    pub version: GlVersion,
    pub extensions: FxHashSet<String>,
}

impl GlProfile {
    pub fn new(kind: GlApiKind, version: GlVersion, extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            kind,
            version,
            extensions: extensions.into_iter().collect(),
        }
    }

    pub fn is_es(&self) -> bool {
        self.kind == GlApiKind::Es
    }

    pub fn at_least(&self, major: u16, minor: u16) -> bool {
        self.version >= GlVersion::new(major, minor)
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }
}

/// OpenGL entry points used by the backend
pub trait GlApi: Send + Sync {
    // ===== Queries =====

    fn get_error(&self) -> GLenum;
    fn get_string(&self, name: GLenum) -> String;
    fn get_integer(&self, name: GLenum) -> GLint;
    fn extensions(&self) -> Vec<String>;
    /// Whether the loader resolved `name` when the context was loaded
    fn has_entry_point(&self, name: &str) -> bool;

    // ===== Fixed-function state =====

    fn enable(&self, capability: GLenum);
    fn disable(&self, capability: GLenum);
    fn front_face(&self, mode: GLenum);
    fn cull_face(&self, mode: GLenum);
    fn polygon_mode(&self, face: GLenum, mode: GLenum);
    fn blend_equation_separate(&self, mode_rgb: GLenum, mode_alpha: GLenum);
    fn blend_func_separate(&self, src_rgb: GLenum, dst_rgb: GLenum, src_alpha: GLenum, dst_alpha: GLenum);
    fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool);
    fn depth_mask(&self, flag: bool);
    fn depth_func(&self, func: GLenum);
    fn stencil_mask(&self, mask: GLuint);
    fn stencil_op_separate(&self, face: GLenum, fail: GLenum, depth_fail: GLenum, pass: GLenum);
    fn stencil_func_separate(&self, face: GLenum, func: GLenum, reference: GLint, mask: GLuint);
    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn scissor(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_depth(&self, depth: f32);
    fn clear_stencil(&self, stencil: GLint);
    fn clear(&self, mask: GLbitfield);

    // ===== Bindings =====

    fn active_texture(&self, unit: GLenum);
    fn bind_texture(&self, target: GLenum, texture: GLuint);
    fn use_program(&self, program: GLuint);
    fn bind_framebuffer(&self, target: GLenum, framebuffer: GLuint);
    fn bind_renderbuffer(&self, target: GLenum, renderbuffer: GLuint);
    fn bind_buffer(&self, target: GLenum, buffer: GLuint);
    fn gen_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, vertex_array: GLuint);
    fn delete_vertex_array(&self, vertex_array: GLuint);

    // ===== Buffers =====

    fn gen_buffer(&self) -> GLuint;
    fn delete_buffer(&self, buffer: GLuint);
    fn buffer_data(&self, target: GLenum, size: usize, data: Option<&[u8]>, usage: GLenum);
    fn buffer_sub_data(&self, target: GLenum, offset: usize, data: &[u8]);

    // ===== Textures =====

    fn gen_texture(&self) -> GLuint;
    fn delete_texture(&self, texture: GLuint);
    #[allow(clippy::too_many_arguments)]
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
    );
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
        &self,
        target: GLenum,
        level: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        pixel_type: GLenum,
        data: &[u8],
    );
    fn tex_storage_2d_multisample(
        &self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    );
    fn tex_parameter_i(&self, target: GLenum, name: GLenum, value: GLint);
    fn tex_parameter_fv(&self, target: GLenum, name: GLenum, values: &[f32; 4]);
    #[allow(clippy::too_many_arguments)]
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
    );

    // ===== Renderbuffers and framebuffers =====

    fn gen_renderbuffer(&self) -> GLuint;
    fn delete_renderbuffer(&self, renderbuffer: GLuint);
    fn renderbuffer_storage(&self, target: GLenum, internal_format: GLenum, width: GLsizei, height: GLsizei);
    fn renderbuffer_storage_multisample(
        &self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    );
    fn gen_framebuffer(&self) -> GLuint;
    fn delete_framebuffer(&self, framebuffer: GLuint);
    fn framebuffer_texture_2d(&self, target: GLenum, attachment: GLenum, texture_target: GLenum, texture: GLuint, level: GLint);
    fn framebuffer_renderbuffer(&self, target: GLenum, attachment: GLenum, renderbuffer_target: GLenum, renderbuffer: GLuint);
    fn check_framebuffer_status(&self, target: GLenum) -> GLenum;

    // ===== Shaders =====

    fn create_shader(&self, kind: GLenum) -> GLuint;
    fn delete_shader(&self, shader: GLuint);
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn create_program(&self) -> GLuint;
    fn delete_program(&self, program: GLuint);
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn bind_attrib_location(&self, program: GLuint, index: GLuint, name: &str);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint>;
    fn uniform_1i(&self, location: GLint, value: GLint);
    /// `glUniform{components}fv`
    fn uniform_fv(&self, location: GLint, components: u32, values: &[f32]);
    /// `glUniform{components}iv`
    fn uniform_iv(&self, location: GLint, components: u32, values: &[i32]);
    /// `glUniform{components}uiv`
    fn uniform_uiv(&self, location: GLint, components: u32, values: &[u32]);
    /// `glUniformMatrix{dimension}fv`, column-major
    fn uniform_matrix_fv(&self, location: GLint, dimension: u32, values: &[f32]);

    // ===== Vertex input and draws =====

    fn enable_vertex_attrib_array(&self, index: GLuint);
    #[allow(clippy::too_many_arguments)]
    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        data_type: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    );
    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum, offset: usize);

    // ===== Debug markers =====

    fn push_debug_group(&self, name: &str);
    fn pop_debug_group(&self);
}

#[cfg(test)]
#[path = "opengl_api_tests.rs"]
mod tests;
