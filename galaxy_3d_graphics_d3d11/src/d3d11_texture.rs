/// 2D and cube textures, render target storage
///
/// The texture object always has one sample. A multisampled render target
/// renders into a second, multisampled texture that is resolved into the
/// first one; shaders sample the resolved texture unless `BIND_SHADER_MSAA`
/// asks for the multisampled one. Sampled depth textures use typeless
/// storage so both a depth view and a shader view can be created.
///
/// A cube texture stores its faces as a 6-element array; subresource
/// `face * mip_count + level` addresses one face level.

use crate::d3d11_api::{RawCom, SubresourceData, Texture2dDesc, ViewDesc};
use crate::d3d11_constants::*;
use crate::d3d11_error::{check_creation, SOURCE};
use crate::d3d11_format::{pixel_format, resolve_pixel_format, typeless_depth_formats};
use crate::d3d11_resource::{com_handle, empty_handle, ComHandle, D3d11Context, Mapping, SamplerKey};
use galaxy_3d_graphics::galaxy3d::render::{
    Color, CubeFace, Flags, InitTextureCommand, MipLevel, PixelFormat, SamplerAddressMode,
    SetTextureParametersCommand, TextureType,
};
use galaxy_3d_graphics::galaxy3d::Result;
use galaxy_3d_graphics::glam::UVec2;
use galaxy_3d_graphics::{engine_bail, engine_warn};

const CUBE_FACE_COUNT: u32 = 6;

pub fn cube_face_index(face: CubeFace) -> u32 {
    match face {
        CubeFace::PositiveX => 0,
        CubeFace::NegativeX => 1,
        CubeFace::PositiveY => 2,
        CubeFace::NegativeY => 3,
        CubeFace::PositiveZ => 4,
        CubeFace::NegativeZ => 5,
    }
}

pub struct D3d11Texture {
    texture_type: TextureType,
    flags: Flags,
    size: UVec2,
    mip_count: u32,
    sample_count: u32,
    pixel_format: PixelFormat,
    /// Format of the render target and resolve views
    format: u32,
    /// Dynamic 2D textures with one level are refilled through `Map`
    mappable: bool,
    sampler_key: SamplerKey,
    texture: ComHandle,
    msaa_texture: ComHandle,
    render_target_view: ComHandle,
    depth_stencil_view: ComHandle,
    shader_resource_view: ComHandle,
    sampler: ComHandle,
}

impl D3d11Texture {
    pub fn new(context: &mut D3d11Context, command: InitTextureCommand) -> Result<Self> {
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

        let mip_count = command.levels.len() as u32;
        let dynamic = command.flags.contains(Flags::DYNAMIC) && !render_target;
        let mut texture = Self {
            texture_type: command.texture_type,
            flags: command.flags,
            size,
            mip_count,
            sample_count,
            pixel_format: resolved_format,
            format,
            mappable: dynamic && mip_count == 1 && command.texture_type == TextureType::TwoDimensional,
            sampler_key: SamplerKey {
                filter: command.filter,
                address: [SamplerAddressMode::ClampToEdge; 3],
                max_anisotropy: command.max_anisotropy.max(1),
                border_color: Color::TRANSPARENT,
            },
            texture: empty_handle(&context.api),
            msaa_texture: empty_handle(&context.api),
            render_target_view: empty_handle(&context.api),
            depth_stencil_view: empty_handle(&context.api),
            shader_resource_view: empty_handle(&context.api),
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

    fn sampled(&self) -> bool {
        self.flags.intersects(Flags::BIND_SHADER | Flags::BIND_SHADER_MSAA)
    }

    fn create(&mut self, context: &mut D3d11Context, levels: &[MipLevel]) -> Result<()> {
        let render_target = self.is_render_target();
        let depth = self.pixel_format.is_depth();
        let multisampled = render_target && self.sample_count > 1;

        let (texture_format, view_format) = match typeless_depth_formats(self.pixel_format) {
            Some(formats) if self.sampled() => formats,
            _ => (self.format, self.format),
        };
        let attachment_bind = if depth { D3D11_BIND_DEPTH_STENCIL } else { D3D11_BIND_RENDER_TARGET };

        let bind_flags = if render_target {
            let mut bind = if multisampled { 0 } else { attachment_bind };
            if self.flags.contains(Flags::BIND_SHADER) && !self.flags.contains(Flags::BIND_SHADER_MSAA) {
                bind |= D3D11_BIND_SHADER_RESOURCE;
            }
            bind
        } else {
            D3D11_BIND_SHADER_RESOURCE
        };

        let has_data = levels.iter().any(|level| !level.data.is_empty());
        let usage = if render_target {
            D3D11_USAGE_DEFAULT
        } else if self.mappable {
            D3D11_USAGE_DYNAMIC
        } else if self.flags.contains(Flags::DYNAMIC) || !has_data {
            D3D11_USAGE_DEFAULT
        } else {
            D3D11_USAGE_IMMUTABLE
        };

        let desc = Texture2dDesc {
            width: self.size.x,
            height: self.size.y,
            mip_levels: self.mip_count,
            array_size: self.face_count(),
            format: texture_format,
            sample_count: 1,
            usage,
            bind_flags,
            cpu_access_flags: if self.mappable { D3D11_CPU_ACCESS_WRITE } else { 0 },
            misc_flags: if self.is_cube() { D3D11_RESOURCE_MISC_TEXTURECUBE } else { 0 },
        };

        // Every face gets the same levels; missing level data is zero-filled
        let pixel_size = self.pixel_format.pixel_size();
        let mut contents = Vec::new();
        if has_data && !render_target {
            for level in levels {
                let row_pitch = level.size.x * pixel_size;
                let length = (row_pitch * level.size.y) as usize;
                if !level.data.is_empty() && level.data.len() < length {
                    engine_bail!(SOURCE, InvalidParameter,
                        "Level of {}x{} needs {} bytes, got {}", level.size.x, level.size.y, length, level.data.len());
                }
                let mut data = level.data.clone();
                data.resize(length, 0);
                contents.push((data, row_pitch));
            }
        }
        let initial_data: Vec<SubresourceData<'_>> = (0..self.face_count())
            .flat_map(|_| contents.iter())
            .map(|(data, row_pitch)| SubresourceData { data, row_pitch: *row_pitch })
            .collect();

        let api = &context.api;
        let texture = check_creation(api.create_texture_2d(&desc, &initial_data), "Failed to create texture")?;
        self.texture = com_handle(api, texture);

        if multisampled {
            let msaa_desc = Texture2dDesc {
                mip_levels: 1,
                array_size: 1,
                sample_count: self.sample_count,
                usage: D3D11_USAGE_DEFAULT,
                bind_flags: attachment_bind
                    | if self.flags.contains(Flags::BIND_SHADER_MSAA) { D3D11_BIND_SHADER_RESOURCE } else { 0 },
                cpu_access_flags: 0,
                misc_flags: 0,
                ..desc
            };
            let msaa = check_creation(api.create_texture_2d(&msaa_desc, &[]), "Failed to create texture")?;
            self.msaa_texture = com_handle(api, msaa);
        }

        if render_target {
            let target = self.msaa_texture.raw().unwrap_or(texture);
            if depth {
                let view = ViewDesc {
                    format: self.format,
                    dimension: if multisampled { D3D11_DSV_DIMENSION_TEXTURE2DMS } else { D3D11_DSV_DIMENSION_TEXTURE2D },
                    mip_levels: 0,
                };
                let dsv = check_creation(api.create_depth_stencil_view(target, Some(&view)),
                    "Failed to create depth stencil view")?;
                self.depth_stencil_view = com_handle(api, dsv);
            } else {
                let view = ViewDesc {
                    format: self.format,
                    dimension: if multisampled { D3D11_RTV_DIMENSION_TEXTURE2DMS } else { D3D11_RTV_DIMENSION_TEXTURE2D },
                    mip_levels: 0,
                };
                let rtv = check_creation(api.create_render_target_view(target, Some(&view)),
                    "Failed to create render target view")?;
                self.render_target_view = com_handle(api, rtv);
            }
        }

        let shader_view = if multisampled && self.flags.contains(Flags::BIND_SHADER_MSAA) {
            self.msaa_texture.raw().map(|msaa| {
                (msaa, ViewDesc { format: view_format, dimension: D3D11_SRV_DIMENSION_TEXTURE2DMS, mip_levels: 1 })
            })
        } else if bind_flags & D3D11_BIND_SHADER_RESOURCE != 0 {
            let dimension = if self.is_cube() { D3D11_SRV_DIMENSION_TEXTURECUBE } else { D3D11_SRV_DIMENSION_TEXTURE2D };
            Some((texture, ViewDesc { format: view_format, dimension, mip_levels: self.mip_count }))
        } else {
            None
        };
        if let Some((resource, view)) = shader_view {
            let srv = check_creation(api.create_shader_resource_view(resource, &view),
                "Failed to create shader resource view")?;
            self.shader_resource_view = com_handle(api, srv);
        }

        self.sampler = context.intern_sampler(self.sampler_key)?;
        Ok(())
    }

    /// Replace the contents of some levels of `face`
    ///
    /// Levels with empty data are left untouched.
    pub fn set_data(&mut self, context: &mut D3d11Context, levels: Vec<MipLevel>, face: CubeFace) -> Result<()> {
        if !self.flags.contains(Flags::DYNAMIC) || self.is_render_target() {
            engine_bail!(SOURCE, InvalidUsage, "Texture is not dynamic");
        }
        if levels.len() > self.mip_count as usize {
            engine_bail!(SOURCE, InvalidParameter,
                "Texture has {} mip levels, got {}", self.mip_count, levels.len());
        }

        let texture = self.texture.get()?;
        let face_index = if self.is_cube() { cube_face_index(face) } else { 0 };
        let pixel_size = self.pixel_format.pixel_size() as usize;
        let api = context.api.as_ref();

        for (level, mip) in levels.iter().enumerate() {
            if mip.data.is_empty() {
                continue;
            }
            let row_size = mip.size.x as usize * pixel_size;
            let rows = mip.size.y as usize;
            if mip.data.len() < row_size * rows {
                engine_bail!(SOURCE, InvalidParameter,
                    "Level of {}x{} needs {} bytes, got {}", mip.size.x, mip.size.y, row_size * rows, mip.data.len());
            }

            let subresource = face_index * self.mip_count + level as u32;
            if self.mappable {
                let mut mapping = Mapping::new(api, texture, subresource, D3D11_MAP_WRITE_DISCARD, "Failed to map texture")?;
                mapping.write_rows(&mip.data, row_size, rows);
            } else {
                api.update_subresource(texture, subresource, &mip.data[..row_size * rows], row_size as u32);
            }
        }
        Ok(())
    }

    /// Switch to the shared sampler state matching the new parameters
    pub fn set_parameters(&mut self, context: &mut D3d11Context, command: &SetTextureParametersCommand) -> Result<()> {
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

    /// Resolve the multisampled color storage into the texture
    pub fn resolve(&self, context: &D3d11Context) {
        if self.pixel_format.is_depth() {
            return;
        }
        if let (Some(texture), Some(msaa)) = (self.texture.raw(), self.msaa_texture.raw()) {
            context.api.resolve_subresource(texture, 0, msaa, 0, self.format);
        }
    }

    pub fn is_render_target(&self) -> bool {
        self.flags.contains(Flags::BIND_RENDER_TARGET)
    }

    pub fn texture(&self) -> Option<RawCom> {
        self.texture.raw()
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn mip_count(&self) -> u32 {
        self.mip_count
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn render_target_view(&self) -> &ComHandle {
        &self.render_target_view
    }

    pub fn depth_stencil_view(&self) -> &ComHandle {
        &self.depth_stencil_view
    }

    pub fn shader_resource_view(&self) -> Option<RawCom> {
        self.shader_resource_view.raw()
    }

    pub fn sampler(&self) -> Option<RawCom> {
        self.sampler.raw()
    }

    pub fn sampler_key(&self) -> &SamplerKey {
        &self.sampler_key
    }

    /// Views the state cache may hold; samplers are shared and outlive the texture
    pub fn bindable_objects(&self) -> Vec<RawCom> {
        [&self.render_target_view, &self.depth_stencil_view, &self.shader_resource_view]
            .into_iter()
            .filter_map(|handle| handle.raw())
            .collect()
    }
}

#[cfg(test)]
#[path = "d3d11_texture_tests.rs"]
mod tests;
