/// Textures and render target storage
///
/// A texture flagged `BIND_RENDER_TARGET` has a single level and no data.
/// When it is also sampled (`BIND_SHADER`) its storage is a texture,
/// otherwise a renderbuffer. Sampler parameters live on the texture object.

use crate::opengl_constants::*;
use crate::opengl_error::{check, check_creation, SOURCE};
use crate::opengl_format::{
    cube_face, filters, internal_pixel_format, pixel_format, pixel_type, texture_target, wrap_mode,
};
use crate::opengl_resource::{empty_handle, name_of, GlContext, GlHandle, GlObjectKind};
use galaxy_3d_graphics::galaxy3d::render::{
    Color, CubeFace, Flags, InitTextureCommand, MipLevel, PixelFormat, SamplerAddressMode,
    SamplerFilter, SetTextureParametersCommand, TextureType,
};
use galaxy_3d_graphics::galaxy3d::resource::Reload;
use galaxy_3d_graphics::galaxy3d::Result;
use galaxy_3d_graphics::glam::UVec2;
use galaxy_3d_graphics::{engine_bail, engine_warn};

const CUBE_FACES: [CubeFace; 6] = [
    CubeFace::PositiveX,
    CubeFace::NegativeX,
    CubeFace::PositiveY,
    CubeFace::NegativeY,
    CubeFace::PositiveZ,
    CubeFace::NegativeZ,
];

/// What a render target attaches for one texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlAttachment {
    /// Texture name, 0 if the storage is a renderbuffer
    pub texture: GLuint,
    pub renderbuffer: GLuint,
    pub target: GLenum,
    pub pixel_format: PixelFormat,
    pub size: UVec2,
}

pub struct GlTexture {
    texture_type: TextureType,
    flags: Flags,
    /// Mip levels per uploaded image: one entry, or one per cube face in
    /// `CUBE_FACES` order
    faces: Vec<Vec<MipLevel>>,
    sample_count: u32,
    pixel_format: PixelFormat,
    filter: SamplerFilter,
    address: [SamplerAddressMode; 3],
    border_color: Color,
    max_anisotropy: u32,
    target: GLenum,
    internal_format: GLenum,
    format: GLenum,
    pixel_type: GLenum,
    texture: GlHandle,
    renderbuffer: GlHandle,
}

impl GlTexture {
    pub fn new(context: &mut GlContext, command: InitTextureCommand) -> Result<Self> {
        if command.levels.is_empty() {
            engine_bail!(SOURCE, InvalidParameter, "Texture has no mip levels");
        }
        let render_target = command.flags.contains(Flags::BIND_RENDER_TARGET);
        if render_target && command.levels.len() != 1 {
            engine_bail!(SOURCE, InvalidParameter, "Invalid mip map count");
        }
        if render_target && !context.capabilities.render_targets {
            engine_bail!(SOURCE, InvalidUsage, "Render targets are not supported");
        }

        let target = texture_target(command.texture_type, &context.profile)?;
        if matches!(command.texture_type, TextureType::OneDimensional | TextureType::ThreeDimensional) {
            engine_bail!(SOURCE, InvalidParameter,
                "{:?} textures are not supported", command.texture_type);
        }

        let size = command.levels[0].size;
        if !context.capabilities.npot_textures
            && command.levels.len() > 1
            && (!size.x.is_power_of_two() || !size.y.is_power_of_two())
        {
            engine_bail!(SOURCE, InvalidParameter,
                "Non-power-of-two textures cannot have mip maps");
        }

        let resolved_format = match command.pixel_format {
            PixelFormat::Default if context.srgb => PixelFormat::RGBA8UNormSRGB,
            PixelFormat::Default => PixelFormat::RGBA8UNorm,
            format => format,
        };
        let internal_format = internal_pixel_format(resolved_format, &context.profile)?;
        let format = pixel_format(resolved_format)?;
        let pixel_type = pixel_type(resolved_format)?;

        let mut sample_count = command.sample_count.max(1);
        if sample_count > context.capabilities.sample_count {
            engine_warn!(SOURCE, "{} samples requested, using {}",
                sample_count, context.capabilities.sample_count);
            sample_count = context.capabilities.sample_count;
        }

        let faces = if command.texture_type == TextureType::Cube {
            vec![command.levels; CUBE_FACES.len()]
        } else {
            vec![command.levels]
        };

        let mut texture = Self {
            texture_type: command.texture_type,
            flags: command.flags,
            faces,
            sample_count,
            pixel_format: resolved_format,
            filter: command.filter,
            address: [SamplerAddressMode::ClampToEdge; 3],
            border_color: Color::TRANSPARENT,
            max_anisotropy: command.max_anisotropy.max(1),
            target,
            internal_format,
            format,
            pixel_type,
            texture: empty_handle(&context.api, GlObjectKind::Texture),
            renderbuffer: empty_handle(&context.api, GlObjectKind::Renderbuffer),
        };
        texture.create(context)?;
        Ok(texture)
    }

    fn create(&mut self, context: &mut GlContext) -> Result<()> {
        if self.is_render_target() {
            if self.flags.contains(Flags::BIND_SHADER) {
                self.create_render_texture(context)
            } else {
                self.create_renderbuffer(context)
            }
        } else {
            self.create_texture(context)
        }
    }

    fn create_texture(&mut self, context: &mut GlContext) -> Result<()> {
        let name = context.api.gen_texture();
        check_creation(context.api.as_ref(), "Failed to create texture")?;
        self.texture.replace(name);
        context.state.bind_texture(self.target, 0, name)?;

        let api = context.api.as_ref();
        if context.capabilities.texture_base_level {
            api.tex_parameter_i(self.target, TEXTURE_BASE_LEVEL, 0);
        }
        if context.capabilities.texture_max_level {
            api.tex_parameter_i(self.target, TEXTURE_MAX_LEVEL, self.level_count() as GLint - 1);
        }
        check_creation(api, "Failed to set texture base and max levels")?;

        for (index, levels) in self.faces.iter().enumerate() {
            let target = if self.texture_type == TextureType::Cube {
                cube_face(CUBE_FACES[index])
            } else {
                self.target
            };
            for (level, mip) in levels.iter().enumerate() {
                let data = if mip.data.is_empty() { None } else { Some(mip.data.as_slice()) };
                api.tex_image_2d(
                    target,
                    level as GLint,
                    self.internal_format,
                    mip.size.x as GLsizei,
                    mip.size.y as GLsizei,
                    self.format,
                    self.pixel_type,
                    data,
                );
            }
        }
        check_creation(api, "Failed to upload texture data")?;

        self.apply_parameters(context)
    }

    fn create_render_texture(&mut self, context: &mut GlContext) -> Result<()> {
        let name = context.api.gen_texture();
        check_creation(context.api.as_ref(), "Failed to create texture")?;
        self.texture.replace(name);

        let size = self.size();
        let multisample = self.sample_count > 1 && context.api.has_entry_point("glTexStorage2DMultisample");
        if multisample {
            self.target = TEXTURE_2D_MULTISAMPLE;
        }
        context.state.bind_texture(self.target, 0, name)?;

        let api = context.api.as_ref();
        if multisample {
            api.tex_storage_2d_multisample(
                self.target,
                self.sample_count as GLsizei,
                self.internal_format,
                size.x as GLsizei,
                size.y as GLsizei,
            );
        } else {
            api.tex_image_2d(
                self.target,
                0,
                self.internal_format,
                size.x as GLsizei,
                size.y as GLsizei,
                self.format,
                self.pixel_type,
                None,
            );
        }
        check_creation(api, "Failed to create render texture")?;

        if multisample {
            Ok(())
        } else {
            self.apply_parameters(context)
        }
    }

    fn create_renderbuffer(&mut self, context: &mut GlContext) -> Result<()> {
        let api = context.api.as_ref();
        let name = api.gen_renderbuffer();
        check_creation(api, "Failed to create render buffer")?;
        self.renderbuffer.replace(name);

        let size = self.size();
        api.bind_renderbuffer(RENDERBUFFER, name);
        if self.sample_count > 1 {
            api.renderbuffer_storage_multisample(
                RENDERBUFFER,
                self.sample_count as GLsizei,
                self.internal_format,
                size.x as GLsizei,
                size.y as GLsizei,
            );
        } else {
            api.renderbuffer_storage(RENDERBUFFER, self.internal_format, size.x as GLsizei, size.y as GLsizei);
        }
        check_creation(api, "Failed to set render buffer's storage")
    }

    fn apply_parameters(&self, context: &GlContext) -> Result<()> {
        let api = context.api.as_ref();
        let capabilities = &context.capabilities;

        let (min_filter, mag_filter) = filters(self.filter, self.level_count());
        api.tex_parameter_i(self.target, TEXTURE_MIN_FILTER, min_filter);
        api.tex_parameter_i(self.target, TEXTURE_MAG_FILTER, mag_filter);

        api.tex_parameter_i(self.target, TEXTURE_WRAP_S, wrap_mode(self.address[0], capabilities.clamp_to_border)?);
        api.tex_parameter_i(self.target, TEXTURE_WRAP_T, wrap_mode(self.address[1], capabilities.clamp_to_border)?);
        if self.texture_type == TextureType::ThreeDimensional {
            api.tex_parameter_i(self.target, TEXTURE_WRAP_R, wrap_mode(self.address[2], capabilities.clamp_to_border)?);
        }

        if self.address.contains(&SamplerAddressMode::ClampToBorder) {
            api.tex_parameter_fv(self.target, TEXTURE_BORDER_COLOR, &self.border_color.norm().to_array());
        }

        if self.max_anisotropy > 1 && capabilities.anisotropic_filtering {
            let anisotropy = self.max_anisotropy.min(capabilities.max_anisotropy);
            api.tex_parameter_i(self.target, TEXTURE_MAX_ANISOTROPY_EXT, anisotropy as GLint);
        }

        check(api, "Failed to set texture parameters")
    }

    /// Upload new level data to a dynamic texture
    pub fn set_data(&mut self, context: &mut GlContext, levels: Vec<MipLevel>, face: CubeFace) -> Result<()> {
        if !self.flags.contains(Flags::DYNAMIC) || self.is_render_target() {
            engine_bail!(SOURCE, InvalidUsage, "Texture is not dynamic");
        }
        if levels.len() > self.level_count() {
            engine_bail!(SOURCE, InvalidParameter,
                "Texture has {} mip levels, got {}", self.level_count(), levels.len());
        }

        context.state.bind_texture(self.target, 0, self.name())?;
        let (target, index) = if self.texture_type == TextureType::Cube {
            let index = CUBE_FACES.iter().position(|&cube| cube == face).unwrap_or(0);
            (cube_face(face), index)
        } else {
            (self.target, 0)
        };

        let api = context.api.as_ref();
        for (level, mip) in levels.iter().enumerate() {
            if !mip.data.is_empty() {
                api.tex_sub_image_2d(
                    target,
                    level as GLint,
                    mip.size.x as GLsizei,
                    mip.size.y as GLsizei,
                    self.format,
                    self.pixel_type,
                    &mip.data,
                );
            }
        }
        check(api, "Failed to upload texture data")?;

        for (level, mip) in levels.into_iter().enumerate() {
            self.faces[index][level] = mip;
        }
        Ok(())
    }

    /// Store sampler parameters and apply them to the texture object
    pub fn set_parameters(&mut self, context: &mut GlContext, command: &SetTextureParametersCommand) -> Result<()> {
        let address = [command.address_x, command.address_y, command.address_z];
        for mode in address {
            wrap_mode(mode, context.capabilities.clamp_to_border)?;
        }

        self.filter = command.filter;
        self.address = address;
        self.border_color = command.border_color;
        self.max_anisotropy = command.max_anisotropy.max(1);

        let name = self.name();
        if name == 0 || self.target == TEXTURE_2D_MULTISAMPLE {
            return Ok(());
        }
        context.state.bind_texture(self.target, 0, name)?;
        self.apply_parameters(context)
    }

    pub fn is_render_target(&self) -> bool {
        self.flags.contains(Flags::BIND_RENDER_TARGET)
    }

    pub fn size(&self) -> UVec2 {
        self.faces
            .first()
            .and_then(|levels| levels.first())
            .map(|level| level.size)
            .unwrap_or(UVec2::ZERO)
    }

    fn level_count(&self) -> usize {
        self.faces.first().map_or(0, Vec::len)
    }

    /// Texture name, 0 for renderbuffer storage
    pub fn name(&self) -> GLuint {
        name_of(&self.texture)
    }

    pub fn renderbuffer(&self) -> GLuint {
        name_of(&self.renderbuffer)
    }

    pub fn target(&self) -> GLenum {
        self.target
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn attachment(&self) -> GlAttachment {
        GlAttachment {
            texture: self.name(),
            renderbuffer: self.renderbuffer(),
            target: self.target,
            pixel_format: self.pixel_format,
            size: self.size(),
        }
    }

    pub(crate) fn abandon(&mut self) {
        self.texture.abandon();
        self.renderbuffer.abandon();
    }
}

impl Reload<GlContext> for GlTexture {
    fn reload(&mut self, context: &mut GlContext) -> Result<()> {
        self.create(context)
    }
}
