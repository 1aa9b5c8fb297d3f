/// 2D and cube textures, render target storage
///
/// The texture object always has one sample. A multisampled render target
/// renders into a second, multisampled texture; the pass resolves it into the
/// first one when it ends. Shaders sample the resolved texture unless
/// `BIND_SHADER_MSAA` asks for the multisampled one.
///
/// Render target storage is private to the GPU. Other textures are managed
/// and uploaded with `replaceRegion`, one slice per cube face.

use crate::metal_api::{MtlRegion, RawId, TextureDescriptor};
use crate::metal_constants::*;
use crate::metal_error::{check_creation, SOURCE};
use crate::metal_format::{pixel_format, resolve_pixel_format};
use crate::metal_resource::{empty_handle, objc_handle, MetalContext, ObjcHandle, SamplerKey};
use galaxy_3d_graphics::galaxy3d::render::{
    Color, CubeFace, Flags, InitTextureCommand, MipLevel, PixelFormat, SamplerAddressMode,
    SetTextureParametersCommand, TextureType,
};
use galaxy_3d_graphics::galaxy3d::Result;
use galaxy_3d_graphics::glam::UVec2;
use galaxy_3d_graphics::{engine_bail, engine_warn};

const CUBE_FACE_COUNT: u32 = 6;

pub fn cube_face_slice(face: CubeFace) -> u32 {
    match face {
        CubeFace::PositiveX => 0,
        CubeFace::NegativeX => 1,
        CubeFace::PositiveY => 2,
        CubeFace::NegativeY => 3,
        CubeFace::PositiveZ => 4,
        CubeFace::NegativeZ => 5,
    }
}

pub struct MetalTexture {
    texture_type: TextureType,
    flags: Flags,
    size: UVec2,
    mip_count: u32,
    sample_count: u32,
    pixel_format: PixelFormat,
    format: u64,
    sampler_key: SamplerKey,
    texture: ObjcHandle,
    msaa_texture: ObjcHandle,
    sampler: ObjcHandle,
}

impl MetalTexture {
    pub fn new(context: &mut MetalContext, command: InitTextureCommand) -> Result<Self> {
        if command.levels.is_empty() {
            engine_bail!(SOURCE, InvalidParameter, "Texture has no mip levels");
        }
        let render_target = command.flags.contains(Flags::BIND_RENDER_TARGET);
        if render_target && command.levels.len() != 1 {
            engine_bail!(SOURCE, InvalidParameter, "Invalid mip map count");
        }
        match command.texture_type {
            TextureType::TwoDimensional => {}
            TextureType::Cube if !render_target => {}
            TextureType::Cube => engine_bail!(SOURCE, InvalidParameter, "Cube textures cannot be render targets"),
            other => engine_bail!(SOURCE, InvalidParameter, "{:?} textures are not supported", other),
        }

        let size = command.levels[0].size;
        if size.x == 0 || size.y == 0 {
            engine_bail!(SOURCE, InvalidParameter, "Invalid texture size");
        }

        let resolved_format = resolve_pixel_format(command.pixel_format, context.srgb);
        let format = pixel_format(resolved_format)?;

        let mut sample_count = command.sample_count.max(1);
        if sample_count > context.capabilities.sample_count {
            engine_warn!(SOURCE, "{} samples requested, using {}",
                sample_count, context.capabilities.sample_count);
            sample_count = context.capabilities.sample_count;
        }

        let mut texture = Self {
            texture_type: command.texture_type,
            flags: command.flags,
            size,
            mip_count: command.levels.len() as u32,
            sample_count,
            pixel_format: resolved_format,
            format,
            sampler_key: SamplerKey {
                filter: command.filter,
                address: [SamplerAddressMode::ClampToEdge; 3],
                max_anisotropy: command.max_anisotropy.max(1),
                border_color: Color::TRANSPARENT,
            },
            texture: empty_handle(&context.api),
            msaa_texture: empty_handle(&context.api),
            sampler: empty_handle(&context.api),
        };
        texture.create(context, &command.levels)?;
        Ok(texture)
    }

    fn is_cube(&self) -> bool {
        self.texture_type == TextureType::Cube
    }

    fn face_count(&self) -> u32 {
        if self.is_cube() { CUBE_FACE_COUNT } else { 1 }
    }

    fn create(&mut self, context: &mut MetalContext, levels: &[MipLevel]) -> Result<()> {
        let render_target = self.is_render_target();
        let desc = if render_target {
            TextureDescriptor {
                texture_type: MTL_TEXTURE_TYPE_2D,
                pixel_format: self.format,
                width: self.size.x,
                height: self.size.y,
                mipmap_level_count: 1,
                sample_count: 1,
                usage: MTL_TEXTURE_USAGE_RENDER_TARGET
                    | if self.flags.contains(Flags::BIND_SHADER) { MTL_TEXTURE_USAGE_SHADER_READ } else { 0 },
                storage_mode: MTL_STORAGE_MODE_PRIVATE,
            }
        } else {
            TextureDescriptor {
                texture_type: if self.is_cube() { MTL_TEXTURE_TYPE_CUBE } else { MTL_TEXTURE_TYPE_2D },
                pixel_format: self.format,
                width: self.size.x,
                height: self.size.y,
                mipmap_level_count: self.mip_count,
                sample_count: 1,
                usage: MTL_TEXTURE_USAGE_SHADER_READ,
                storage_mode: MTL_STORAGE_MODE_MANAGED,
            }
        };

        let api = &context.api;
        let texture = check_creation(api.new_texture(&desc), "Failed to create texture")?;
        self.texture = objc_handle(api, texture);

        if render_target && self.sample_count > 1 {
            let msaa_desc = TextureDescriptor {
                texture_type: MTL_TEXTURE_TYPE_2D_MULTISAMPLE,
                sample_count: self.sample_count,
                usage: MTL_TEXTURE_USAGE_RENDER_TARGET
                    | if self.flags.contains(Flags::BIND_SHADER_MSAA) { MTL_TEXTURE_USAGE_SHADER_READ } else { 0 },
                ..desc
            };
            let msaa = check_creation(api.new_texture(&msaa_desc), "Failed to create texture")?;
            self.msaa_texture = objc_handle(api, msaa);
        }

        if !render_target {
            for slice in 0..self.face_count() {
                self.upload(context, texture, levels, slice)?;
            }
        }

        self.sampler = context.intern_sampler(self.sampler_key)?;
        Ok(())
    }

    /// Copy the non-empty levels into one slice
    fn upload(&self, context: &MetalContext, texture: RawId, levels: &[MipLevel], slice: u32) -> Result<()> {
        let pixel_size = self.pixel_format.pixel_size();
        for (level, mip) in levels.iter().enumerate() {
            if mip.data.is_empty() {
                continue;
            }
            let bytes_per_row = mip.size.x * pixel_size;
            let length = (bytes_per_row * mip.size.y) as usize;
            if mip.data.len() < length {
                engine_bail!(SOURCE, InvalidParameter,
                    "Level of {}x{} needs {} bytes, got {}", mip.size.x, mip.size.y, length, mip.data.len());
            }
            let region = MtlRegion { x: 0, y: 0, width: mip.size.x, height: mip.size.y };
            context.api.replace_region(texture, region, level as u32, slice, &mip.data[..length], bytes_per_row);
        }
        Ok(())
    }

    /// Replace the contents of some levels of `face`
    ///
    /// Levels with empty data are left untouched.
    pub fn set_data(&mut self, context: &mut MetalContext, levels: Vec<MipLevel>, face: CubeFace) -> Result<()> {
        if !self.flags.contains(Flags::DYNAMIC) || self.is_render_target() {
            engine_bail!(SOURCE, InvalidUsage, "Texture is not dynamic");
        }
        if levels.len() > self.mip_count as usize {
            engine_bail!(SOURCE, InvalidParameter,
                "Texture has {} mip levels, got {}", self.mip_count, levels.len());
        }
        let texture = self.texture.get()?;
        let slice = if self.is_cube() { cube_face_slice(face) } else { 0 };
        self.upload(context, texture, &levels, slice)
    }

    /// Switch to the shared sampler state matching the new parameters
    pub fn set_parameters(&mut self, context: &mut MetalContext, command: &SetTextureParametersCommand) -> Result<()> {
        let key = SamplerKey {
            filter: command.filter,
            address: [command.address_x, command.address_y, command.address_z],
            max_anisotropy: command.max_anisotropy.max(1),
            border_color: command.border_color,
        };
        self.sampler = context.intern_sampler(key)?;
        self.sampler_key = key;
        Ok(())
    }

    pub fn is_render_target(&self) -> bool {
        self.flags.contains(Flags::BIND_RENDER_TARGET)
    }

    /// Single-sampled storage, the resolve destination of a multisampled target
    pub fn texture(&self) -> Option<RawId> {
        self.texture.raw()
    }

    /// Texture a render pass draws into
    pub fn attachment_texture(&self) -> Option<RawId> {
        self.msaa_texture.raw().or_else(|| self.texture.raw())
    }

    /// Where a pass drawing into this texture resolves, for multisampled color targets
    pub fn resolve_texture(&self) -> Option<RawId> {
        if self.pixel_format.is_depth() {
            return None;
        }
        self.msaa_texture.raw().and(self.texture.raw())
    }

    /// Texture bound for sampling, `None` when it cannot be sampled
    pub fn sampled_texture(&self) -> Option<RawId> {
        if !self.is_render_target() {
            return self.texture.raw();
        }
        if self.flags.contains(Flags::BIND_SHADER_MSAA) && !self.msaa_texture.is_null() {
            return self.msaa_texture.raw();
        }
        if self.flags.intersects(Flags::BIND_SHADER | Flags::BIND_SHADER_MSAA) {
            return self.texture.raw();
        }
        None
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// `MTLPixelFormat` of the storage
    pub fn format(&self) -> u64 {
        self.format
    }

    pub fn sampler(&self) -> Option<RawId> {
        self.sampler.raw()
    }

    #[cfg(test)]
    pub fn sampler_key(&self) -> &SamplerKey {
        &self.sampler_key
    }

    /// Extra references to the storage, for render targets
    pub fn retain_storage(&self) -> Vec<ObjcHandle> {
        [&self.texture, &self.msaa_texture].into_iter().filter(|handle| !handle.is_null()).cloned().collect()
    }

    /// Textures the state cache may hold; samplers are shared and outlive the texture
    pub fn bindable_objects(&self) -> Vec<RawId> {
        [&self.texture, &self.msaa_texture].into_iter().filter_map(|handle| handle.raw()).collect()
    }
}

#[cfg(test)]
#[path = "metal_texture_tests.rs"]
mod tests;
