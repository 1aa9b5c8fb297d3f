use super::*;
use crate::mock_d3d11::{MockD3d11, MockObject};
use galaxy_3d_graphics::galaxy3d::render::{Capabilities, SamplerFilter};
use galaxy_3d_graphics::galaxy3d::Error;
use std::sync::Arc;

fn context(api: &Arc<MockD3d11>) -> D3d11Context {
    let capabilities = Capabilities { sample_count: 4, max_anisotropy: 16, ..Capabilities::default() };
    D3d11Context::new(api.clone(), capabilities, false)
}

fn level(width: u32, height: u32, data: Vec<u8>) -> MipLevel {
    MipLevel::new(UVec2::new(width, height), data)
}

fn command(levels: Vec<MipLevel>, flags: Flags) -> InitTextureCommand {
    InitTextureCommand {
        texture: 1,
        levels,
        texture_type: TextureType::TwoDimensional,
        flags,
        sample_count: 1,
        pixel_format: PixelFormat::RGBA8UNorm,
        filter: SamplerFilter::Point,
        max_anisotropy: 1,
    }
}

fn render_target(format: PixelFormat, flags: Flags, sample_count: u32) -> InitTextureCommand {
    InitTextureCommand {
        pixel_format: format,
        sample_count,
        ..command(vec![level(64, 64, Vec::new())], Flags::BIND_RENDER_TARGET | flags)
    }
}

fn textures(api: &MockD3d11) -> Vec<(RawCom, Texture2dDesc)> {
    api.objects_where(|object| matches!(object, MockObject::Texture(_)))
        .into_iter()
        .filter_map(|texture| match api.object(texture) {
            Some(MockObject::Texture(desc)) => Some((texture, desc)),
            _ => None,
        })
        .collect()
}

fn shader_view(api: &MockD3d11, texture: &D3d11Texture) -> (RawCom, ViewDesc) {
    match texture.shader_resource_view().and_then(|view| api.object(view)) {
        Some(MockObject::ShaderResourceView { resource, desc }) => (resource, desc),
        other => panic!("No shader resource view: {:?}", other),
    }
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_static_texture_is_immutable_with_initial_data() {
    let api = MockD3d11::new();
    let mut context = context(&api);
    let data: Vec<u8> = (0..16).collect();

    let texture = D3d11Texture::new(&mut context, command(vec![level(2, 2, data.clone())], Flags::empty())).unwrap();

    let (native, desc) = api.last_texture().unwrap();
    assert_eq!(texture.texture(), Some(native));
    assert_eq!(desc.usage, D3D11_USAGE_IMMUTABLE);
    assert_eq!(desc.bind_flags, D3D11_BIND_SHADER_RESOURCE);
    assert_eq!(desc.format, DXGI_FORMAT_R8G8B8A8_UNORM);
    assert_eq!(api.contents(native, 0), Some(data));

    let (resource, view) = shader_view(&api, &texture);
    assert_eq!(resource, native);
    assert_eq!(view.dimension, D3D11_SRV_DIMENSION_TEXTURE2D);
    assert_eq!(view.mip_levels, 1);
    assert!(texture.sampler().is_some());
}

#[test]
fn test_missing_level_data_is_zero_filled() {
    let api = MockD3d11::new();
    let mut context = context(&api);
    let levels = vec![level(4, 4, vec![7; 64]), level(2, 2, Vec::new())];

    D3d11Texture::new(&mut context, command(levels, Flags::empty())).unwrap();

    let (native, desc) = api.last_texture().unwrap();
    assert_eq!(desc.mip_levels, 2);
    assert_eq!(api.contents(native, 1), Some(vec![0; 16]));
}

#[test]
fn test_empty_texture_uses_default_usage() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    D3d11Texture::new(&mut context, command(vec![level(4, 4, Vec::new())], Flags::empty())).unwrap();
    assert_eq!(api.last_texture().unwrap().1.usage, D3D11_USAGE_DEFAULT);
}

#[test]
fn test_invalid_textures_are_rejected_before_creation() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let short = command(vec![level(2, 2, vec![0; 15])], Flags::empty());
    let no_levels = command(Vec::new(), Flags::empty());
    let zero_size = command(vec![level(0, 4, Vec::new())], Flags::empty());
    let mipmapped_target = command(
        vec![level(4, 4, Vec::new()), level(2, 2, Vec::new())],
        Flags::BIND_RENDER_TARGET,
    );
    let volume = InitTextureCommand { texture_type: TextureType::ThreeDimensional, ..command(vec![level(4, 4, Vec::new())], Flags::empty()) };
    let cube_target = InitTextureCommand { texture_type: TextureType::Cube, ..render_target(PixelFormat::RGBA8UNorm, Flags::empty(), 1) };

    for invalid in [short, no_levels, zero_size, mipmapped_target, volume, cube_target] {
        assert!(matches!(D3d11Texture::new(&mut context, invalid), Err(Error::InvalidParameter(_))));
    }
    assert_eq!(api.count("CreateTexture2D"), 0);
}

#[test]
fn test_default_pixel_format_follows_srgb() {
    let api = MockD3d11::new();
    let mut context = context(&api);
    context.srgb = true;

    let texture = D3d11Texture::new(&mut context, InitTextureCommand {
        pixel_format: PixelFormat::Default,
        ..command(vec![level(2, 2, Vec::new())], Flags::empty())
    }).unwrap();

    assert_eq!(texture.pixel_format(), PixelFormat::RGBA8UNormSRGB);
    assert_eq!(api.last_texture().unwrap().1.format, DXGI_FORMAT_R8G8B8A8_UNORM_SRGB);
}

#[test]
fn test_cube_texture_replicates_initial_data() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let texture = D3d11Texture::new(&mut context, InitTextureCommand {
        texture_type: TextureType::Cube,
        ..command(vec![level(1, 1, vec![1, 2, 3, 4])], Flags::empty())
    }).unwrap();

    let (native, desc) = api.last_texture().unwrap();
    assert_eq!(desc.array_size, 6);
    assert_eq!(desc.misc_flags, D3D11_RESOURCE_MISC_TEXTURECUBE);
    for face in 0..6 {
        assert_eq!(api.contents(native, face), Some(vec![1, 2, 3, 4]));
    }
    assert_eq!(shader_view(&api, &texture).1.dimension, D3D11_SRV_DIMENSION_TEXTURECUBE);
}

// ============================================================================
// Render targets
// ============================================================================

#[test]
fn test_color_render_target_view() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let texture = D3d11Texture::new(&mut context, render_target(PixelFormat::RGBA8UNorm, Flags::empty(), 1)).unwrap();

    let (native, desc) = api.last_texture().unwrap();
    assert_eq!(desc.usage, D3D11_USAGE_DEFAULT);
    assert_eq!(desc.bind_flags, D3D11_BIND_RENDER_TARGET);
    assert_eq!(texture.shader_resource_view(), None);
    match api.object(texture.render_target_view().get().unwrap()) {
        Some(MockObject::RenderTargetView { resource, desc }) => {
            assert_eq!(resource, native);
            assert_eq!(desc.unwrap().dimension, D3D11_RTV_DIMENSION_TEXTURE2D);
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn test_multisampled_render_target_renders_into_second_texture() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let texture = D3d11Texture::new(&mut context, render_target(PixelFormat::RGBA8UNorm, Flags::BIND_SHADER, 4)).unwrap();

    let created = textures(&api);
    assert_eq!(created.len(), 2);
    let (resolved, resolved_desc) = created[0];
    let (msaa, msaa_desc) = created[1];
    assert_eq!(resolved_desc.sample_count, 1);
    assert_eq!(resolved_desc.bind_flags, D3D11_BIND_SHADER_RESOURCE);
    assert_eq!(msaa_desc.sample_count, 4);
    assert_eq!(msaa_desc.bind_flags, D3D11_BIND_RENDER_TARGET);

    match api.object(texture.render_target_view().get().unwrap()) {
        Some(MockObject::RenderTargetView { resource, desc }) => {
            assert_eq!(resource, msaa);
            assert_eq!(desc.unwrap().dimension, D3D11_RTV_DIMENSION_TEXTURE2DMS);
        }
        other => panic!("{:?}", other),
    }
    assert_eq!(shader_view(&api, &texture).0, resolved);

    texture.resolve(&context);
    assert!(api.called(&format!(
        "ResolveSubresource({}, 0, {}, 0, {})", resolved.id(), msaa.id(), DXGI_FORMAT_R8G8B8A8_UNORM
    )));
}

#[test]
fn test_msaa_shader_binding_samples_the_multisampled_texture() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let texture = D3d11Texture::new(&mut context, render_target(PixelFormat::RGBA8UNorm, Flags::BIND_SHADER_MSAA, 4)).unwrap();

    let created = textures(&api);
    let (msaa, msaa_desc) = created[1];
    assert_eq!(msaa_desc.bind_flags, D3D11_BIND_RENDER_TARGET | D3D11_BIND_SHADER_RESOURCE);
    let (resource, view) = shader_view(&api, &texture);
    assert_eq!(resource, msaa);
    assert_eq!(view.dimension, D3D11_SRV_DIMENSION_TEXTURE2DMS);
}

#[test]
fn test_sample_count_is_clamped_to_the_device() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let texture = D3d11Texture::new(&mut context, render_target(PixelFormat::RGBA8UNorm, Flags::empty(), 16)).unwrap();
    assert_eq!(texture.sample_count(), 4);
}

#[test]
fn test_sampled_depth_texture_uses_typeless_storage() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let texture = D3d11Texture::new(&mut context, render_target(PixelFormat::Depth, Flags::BIND_SHADER, 1)).unwrap();

    let (_, desc) = api.last_texture().unwrap();
    assert_eq!(desc.format, DXGI_FORMAT_R32_TYPELESS);
    assert_eq!(desc.bind_flags, D3D11_BIND_DEPTH_STENCIL | D3D11_BIND_SHADER_RESOURCE);
    match api.object(texture.depth_stencil_view().get().unwrap()) {
        Some(MockObject::DepthStencilView { desc, .. }) => assert_eq!(desc.unwrap().format, DXGI_FORMAT_D32_FLOAT),
        other => panic!("{:?}", other),
    }
    assert_eq!(shader_view(&api, &texture).1.format, DXGI_FORMAT_R32_FLOAT);

    // Depth is never resolved
    texture.resolve(&context);
    assert_eq!(api.count("ResolveSubresource"), 0);
}

// ============================================================================
// Uploads
// ============================================================================

#[test]
fn test_dynamic_texture_is_mapped_row_by_row() {
    let api = MockD3d11::new();
    api.state().row_pitch_alignment = 16;
    let mut context = context(&api);

    let mut texture = D3d11Texture::new(&mut context, command(vec![level(2, 2, Vec::new())], Flags::DYNAMIC)).unwrap();
    let (native, desc) = api.last_texture().unwrap();
    assert_eq!(desc.usage, D3D11_USAGE_DYNAMIC);
    assert_eq!(desc.cpu_access_flags, D3D11_CPU_ACCESS_WRITE);

    let data: Vec<u8> = (1..=16).collect();
    texture.set_data(&mut context, vec![level(2, 2, data.clone())], CubeFace::PositiveX).unwrap();

    assert!(api.called(&format!("Map({}, 0, {})", native.id(), D3D11_MAP_WRITE_DISCARD)));
    assert!(api.called(&format!("Unmap({}, 0)", native.id())));
    let contents = api.contents(native, 0).unwrap();
    assert_eq!(contents.len(), 32);
    assert_eq!(&contents[..8], &data[..8]);
    assert_eq!(&contents[16..24], &data[8..]);
}

#[test]
fn test_dynamic_mipmapped_texture_uses_update_subresource() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let levels = vec![level(2, 2, Vec::new()), level(1, 1, Vec::new())];
    let mut texture = D3d11Texture::new(&mut context, command(levels, Flags::DYNAMIC)).unwrap();
    let (native, desc) = api.last_texture().unwrap();
    assert_eq!(desc.usage, D3D11_USAGE_DEFAULT);

    texture.set_data(&mut context, vec![level(2, 2, Vec::new()), level(1, 1, vec![9; 4])], CubeFace::PositiveX).unwrap();

    assert_eq!(api.count("UpdateSubresource"), 1);
    assert!(api.called(&format!("UpdateSubresource({}, 1, 4, 4)", native.id())));
}

#[test]
fn test_cube_face_selects_the_subresource() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let mut texture = D3d11Texture::new(&mut context, InitTextureCommand {
        texture_type: TextureType::Cube,
        ..command(vec![level(1, 1, Vec::new())], Flags::DYNAMIC)
    }).unwrap();
    let (native, _) = api.last_texture().unwrap();

    texture.set_data(&mut context, vec![level(1, 1, vec![5; 4])], CubeFace::NegativeY).unwrap();
    assert!(api.called(&format!("UpdateSubresource({}, 3, 4, 4)", native.id())));
}

#[test]
fn test_static_texture_rejects_set_data() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let mut texture = D3d11Texture::new(&mut context, command(vec![level(2, 2, vec![0; 16])], Flags::empty())).unwrap();
    let result = texture.set_data(&mut context, vec![level(2, 2, vec![1; 16])], CubeFace::PositiveX);
    assert!(matches!(result, Err(Error::InvalidUsage(_))));
}

// ============================================================================
// Samplers
// ============================================================================

#[test]
fn test_identical_samplers_are_shared() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let first = D3d11Texture::new(&mut context, command(vec![level(2, 2, Vec::new())], Flags::empty())).unwrap();
    let second = D3d11Texture::new(&mut context, command(vec![level(2, 2, Vec::new())], Flags::empty())).unwrap();

    assert_eq!(api.count("CreateSamplerState"), 1);
    assert_eq!(first.sampler(), second.sampler());
    assert_eq!(context.samplers.hits(), 1);
}

#[test]
fn test_set_parameters_switches_sampler() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let mut texture = D3d11Texture::new(&mut context, command(vec![level(2, 2, Vec::new())], Flags::empty())).unwrap();
    texture.set_parameters(&mut context, &SetTextureParametersCommand {
        texture: 1,
        filter: SamplerFilter::Trilinear,
        address_x: SamplerAddressMode::Repeat,
        address_y: SamplerAddressMode::MirrorRepeat,
        address_z: SamplerAddressMode::ClampToBorder,
        border_color: Color::WHITE,
        max_anisotropy: 1,
    }).unwrap();

    assert_eq!(api.count("CreateSamplerState"), 2);
    match texture.sampler().and_then(|sampler| api.object(sampler)) {
        Some(MockObject::Sampler(desc)) => {
            assert_eq!(desc.filter, D3D11_FILTER_MIN_MAG_MIP_LINEAR);
            assert_eq!(desc.address_u, D3D11_TEXTURE_ADDRESS_WRAP);
            assert_eq!(desc.address_v, D3D11_TEXTURE_ADDRESS_MIRROR);
            assert_eq!(desc.address_w, D3D11_TEXTURE_ADDRESS_BORDER);
            assert_eq!(desc.border_color, [1.0; 4]);
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn test_anisotropy_is_clamped_to_the_device() {
    let api = MockD3d11::new();
    let mut context = context(&api);

    let texture = D3d11Texture::new(&mut context, InitTextureCommand {
        max_anisotropy: 64,
        ..command(vec![level(2, 2, Vec::new())], Flags::empty())
    }).unwrap();

    match texture.sampler().and_then(|sampler| api.object(sampler)) {
        Some(MockObject::Sampler(desc)) => {
            assert_eq!(desc.filter, D3D11_FILTER_ANISOTROPIC);
            assert_eq!(desc.max_anisotropy, 16);
        }
        other => panic!("{:?}", other),
    }
}

// ============================================================================
// Ownership
// ============================================================================

#[test]
fn test_every_reference_is_released() {
    let api = MockD3d11::new();
    {
        let mut context = context(&api);
        let texture = D3d11Texture::new(&mut context, render_target(PixelFormat::RGBA8UNorm, Flags::BIND_SHADER, 4)).unwrap();
        assert_eq!(texture.bindable_objects().len(), 2);
        assert!(api.live_objects() > 0);
    }
    assert_eq!(api.live_objects(), 0);
    assert!(api.state().over_released.is_empty());
}
