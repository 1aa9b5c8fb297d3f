/// NativeD3d11 - `D3d11Api` on top of the `windows` crate COM interfaces
///
/// Created objects cross the seam as raw interface pointers that own one
/// reference. Context calls borrow them back as typed interfaces without
/// touching the reference count.

use crate::d3d11_api::{
    BlendDesc, BufferDesc, ComResult, D3d11Api, D3d11SwapChain, D3dBox, D3dRect, DepthStencilDesc,
    DepthStencilOpDesc, InputElementDesc, MappedSubresource, RasterizerDesc, RawCom, SamplerDesc,
    SubresourceData, SwapChainDesc, Texture2dDesc, ViewDesc, Viewport,
};
use crate::d3d11_constants::*;
use galaxy_3d_graphics::glam::UVec2;
use std::ffi::{c_void, CString};
use windows::core::{ComInterface, IUnknown_Vtbl, Interface, PCSTR, PCWSTR};
use windows::Win32::Foundation::{BOOL, HMODULE, HWND, RECT};
use windows::Win32::Graphics::Direct3D as d3d;
use windows::Win32::Graphics::Direct3D11 as d3d11;
use windows::Win32::Graphics::Dxgi as dxgi;
use windows::Win32::Graphics::Dxgi::Common as dxgi_common;

// The seam vocabulary is the SDK's; keep it in step with the bindings.
const _: () = {
    assert!(E_FAIL == windows::Win32::Foundation::E_FAIL.0);
    assert!(E_OUTOFMEMORY == windows::Win32::Foundation::E_OUTOFMEMORY.0);
    assert!(E_POINTER == windows::Win32::Foundation::E_POINTER.0);
    assert!(DXGI_ERROR_DEVICE_REMOVED == dxgi::DXGI_ERROR_DEVICE_REMOVED.0);
    assert!(DXGI_ERROR_INVALID_CALL == dxgi::DXGI_ERROR_INVALID_CALL.0);
    assert!(D3D_FEATURE_LEVEL_10_0 == d3d::D3D_FEATURE_LEVEL_10_0.0 as u32);
    assert!(DXGI_FORMAT_R8G8B8A8_UNORM == dxgi_common::DXGI_FORMAT_R8G8B8A8_UNORM.0 as u32);
    assert!(DXGI_FORMAT_D24_UNORM_S8_UINT == dxgi_common::DXGI_FORMAT_D24_UNORM_S8_UINT.0 as u32);
    assert!(DXGI_FORMAT_A8_UNORM == dxgi_common::DXGI_FORMAT_A8_UNORM.0 as u32);
    assert!(D3D11_USAGE_DYNAMIC == d3d11::D3D11_USAGE_DYNAMIC.0 as u32);
    assert!(D3D11_BIND_SHADER_RESOURCE == d3d11::D3D11_BIND_SHADER_RESOURCE.0 as u32);
    assert!(D3D11_BIND_DEPTH_STENCIL == d3d11::D3D11_BIND_DEPTH_STENCIL.0 as u32);
    assert!(D3D11_CPU_ACCESS_WRITE == d3d11::D3D11_CPU_ACCESS_WRITE.0 as u32);
    assert!(D3D11_RESOURCE_MISC_TEXTURECUBE == d3d11::D3D11_RESOURCE_MISC_TEXTURECUBE.0 as u32);
    assert!(D3D11_MAP_WRITE_DISCARD == d3d11::D3D11_MAP_WRITE_DISCARD.0 as u32);
    assert!(D3D11_SRV_DIMENSION_TEXTURECUBE == d3d::D3D11_SRV_DIMENSION_TEXTURECUBE.0 as u32);
    assert!(D3D11_DSV_DIMENSION_TEXTURE2DMS == d3d11::D3D11_DSV_DIMENSION_TEXTURE2DMS.0 as u32);
    assert!(D3D11_FILTER_ANISOTROPIC == d3d11::D3D11_FILTER_ANISOTROPIC.0 as u32);
    assert!(D3D11_TEXTURE_ADDRESS_BORDER == d3d11::D3D11_TEXTURE_ADDRESS_BORDER.0 as u32);
    assert!(D3D11_COMPARISON_ALWAYS == d3d11::D3D11_COMPARISON_ALWAYS.0 as u32);
    assert!(D3D11_STENCIL_OP_DECR == d3d11::D3D11_STENCIL_OP_DECR.0 as u32);
    assert!(D3D11_BLEND_INV_BLEND_FACTOR == d3d11::D3D11_BLEND_INV_BLEND_FACTOR.0 as u32);
    assert!(D3D11_BLEND_OP_MAX == d3d11::D3D11_BLEND_OP_MAX.0 as u32);
    assert!(D3D11_CULL_BACK == d3d11::D3D11_CULL_BACK.0 as u32);
    assert!(D3D11_FILL_WIREFRAME == d3d11::D3D11_FILL_WIREFRAME.0 as u32);
    assert!(D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP == d3d::D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP.0 as u32);
    assert!(D3D11_CLEAR_STENCIL == d3d11::D3D11_CLEAR_STENCIL.0 as u32);
    assert!(D3D11_COMMONSHADER_SAMPLER_SLOT_COUNT == d3d11::D3D11_COMMONSHADER_SAMPLER_SLOT_COUNT as usize);
    assert!(D3D11_SIMULTANEOUS_RENDER_TARGET_COUNT == d3d11::D3D11_SIMULTANEOUS_RENDER_TARGET_COUNT as usize);
};

pub struct NativeD3d11 {
    device: d3d11::ID3D11Device,
    context: d3d11::ID3D11DeviceContext,
    annotation: Option<d3d11::ID3DUserDefinedAnnotation>,
}

// SAFETY: the immediate context is only driven from the render thread, which
// owns the device and every resource holding this api.
unsafe impl Send for NativeD3d11 {}
unsafe impl Sync for NativeD3d11 {}

impl NativeD3d11 {
    /// Hardware device on the default adapter, feature level 10.0 or above
    pub fn create(debug: bool) -> ComResult<Self> {
        let levels = [
            d3d::D3D_FEATURE_LEVEL_11_1,
            d3d::D3D_FEATURE_LEVEL_11_0,
            d3d::D3D_FEATURE_LEVEL_10_1,
            d3d::D3D_FEATURE_LEVEL_10_0,
        ];
        let mut flags = d3d11::D3D11_CREATE_DEVICE_BGRA_SUPPORT;
        if debug {
            flags |= d3d11::D3D11_CREATE_DEVICE_DEBUG;
        }
        let mut device = None;
        let mut context = None;
        unsafe {
            d3d11::D3D11CreateDevice(
                None,
                d3d::D3D_DRIVER_TYPE_HARDWARE,
                HMODULE::default(),
                flags,
                Some(&levels),
                d3d11::D3D11_SDK_VERSION,
                Some(&mut device),
                None,
                Some(&mut context),
            )
        }
        .map_err(|error| error.code().0)?;
        match (device, context) {
            (Some(device), Some(context)) => Ok(Self::from_device(device, context)),
            _ => Err(E_POINTER),
        }
    }

    /// Wrap a device and immediate context created by the platform layer
    pub fn from_device(device: d3d11::ID3D11Device, context: d3d11::ID3D11DeviceContext) -> Self {
        let annotation = context.cast::<d3d11::ID3DUserDefinedAnnotation>().ok();
        Self { device, context, annotation }
    }

    pub fn device(&self) -> &d3d11::ID3D11Device {
        &self.device
    }
}

// ============================================================================
// Raw pointer plumbing
// ============================================================================

fn hresult(error: windows::core::Error) -> i32 {
    error.code().0
}

/// Hand a created interface across the seam, keeping its reference
fn into_raw<T: Interface>(object: Option<T>) -> ComResult<RawCom> {
    object.and_then(|object| RawCom::from_ptr(object.into_raw())).ok_or(E_POINTER)
}

fn created<T: Interface>(result: windows::core::Result<()>, object: Option<T>) -> ComResult<RawCom> {
    result.map_err(hresult)?;
    into_raw(object)
}

/// Typed owned reference to `object` (one extra AddRef, released on drop)
fn owned<T: Interface + Clone>(object: RawCom) -> Option<T> {
    let raw = object.as_ptr();
    unsafe { T::from_raw_borrowed(&raw) }.cloned()
}

fn owned_opt<T: Interface + Clone>(object: Option<RawCom>) -> Option<T> {
    object.and_then(owned)
}

unsafe fn vtable(object: RawCom) -> *const IUnknown_Vtbl {
    *(object.as_ptr() as *const *const IUnknown_Vtbl)
}

fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

// ============================================================================
// Descriptor conversion
// ============================================================================

pub(crate) fn buffer_desc(desc: &BufferDesc) -> d3d11::D3D11_BUFFER_DESC {
    d3d11::D3D11_BUFFER_DESC {
        ByteWidth: desc.byte_width,
        Usage: d3d11::D3D11_USAGE(desc.usage as _),
        BindFlags: desc.bind_flags,
        CPUAccessFlags: desc.cpu_access_flags,
        MiscFlags: 0,
        StructureByteStride: 0,
    }
}

pub(crate) fn texture_2d_desc(desc: &Texture2dDesc) -> d3d11::D3D11_TEXTURE2D_DESC {
    d3d11::D3D11_TEXTURE2D_DESC {
        Width: desc.width,
        Height: desc.height,
        MipLevels: desc.mip_levels,
        ArraySize: desc.array_size,
        Format: dxgi_common::DXGI_FORMAT(desc.format as _),
        SampleDesc: dxgi_common::DXGI_SAMPLE_DESC { Count: desc.sample_count.max(1), Quality: 0 },
        Usage: d3d11::D3D11_USAGE(desc.usage as _),
        BindFlags: desc.bind_flags,
        CPUAccessFlags: desc.cpu_access_flags,
        MiscFlags: desc.misc_flags,
    }
}

pub(crate) fn sampler_desc(desc: &SamplerDesc) -> d3d11::D3D11_SAMPLER_DESC {
    d3d11::D3D11_SAMPLER_DESC {
        Filter: d3d11::D3D11_FILTER(desc.filter as _),
        AddressU: d3d11::D3D11_TEXTURE_ADDRESS_MODE(desc.address_u as _),
        AddressV: d3d11::D3D11_TEXTURE_ADDRESS_MODE(desc.address_v as _),
        AddressW: d3d11::D3D11_TEXTURE_ADDRESS_MODE(desc.address_w as _),
        MipLODBias: 0.0,
        MaxAnisotropy: desc.max_anisotropy,
        ComparisonFunc: d3d11::D3D11_COMPARISON_FUNC(desc.comparison_func as _),
        BorderColor: desc.border_color,
        MinLOD: desc.min_lod,
        MaxLOD: desc.max_lod,
    }
}

pub(crate) fn rasterizer_desc(desc: &RasterizerDesc) -> d3d11::D3D11_RASTERIZER_DESC {
    d3d11::D3D11_RASTERIZER_DESC {
        FillMode: d3d11::D3D11_FILL_MODE(desc.fill_mode as _),
        CullMode: d3d11::D3D11_CULL_MODE(desc.cull_mode as _),
        FrontCounterClockwise: desc.front_counter_clockwise.into(),
        DepthBias: 0,
        DepthBiasClamp: 0.0,
        SlopeScaledDepthBias: 0.0,
        DepthClipEnable: desc.depth_clip_enable.into(),
        ScissorEnable: desc.scissor_enable.into(),
        MultisampleEnable: desc.multisample_enable.into(),
        AntialiasedLineEnable: desc.antialiased_line_enable.into(),
    }
}

pub(crate) fn blend_desc(desc: &BlendDesc) -> d3d11::D3D11_BLEND_DESC {
    let target = d3d11::D3D11_RENDER_TARGET_BLEND_DESC {
        BlendEnable: desc.blend_enable.into(),
        SrcBlend: d3d11::D3D11_BLEND(desc.src_blend as _),
        DestBlend: d3d11::D3D11_BLEND(desc.dest_blend as _),
        BlendOp: d3d11::D3D11_BLEND_OP(desc.blend_op as _),
        SrcBlendAlpha: d3d11::D3D11_BLEND(desc.src_blend_alpha as _),
        DestBlendAlpha: d3d11::D3D11_BLEND(desc.dest_blend_alpha as _),
        BlendOpAlpha: d3d11::D3D11_BLEND_OP(desc.blend_op_alpha as _),
        RenderTargetWriteMask: desc.render_target_write_mask,
    };
    d3d11::D3D11_BLEND_DESC {
        AlphaToCoverageEnable: BOOL(0),
        IndependentBlendEnable: BOOL(0),
        RenderTarget: [target; D3D11_SIMULTANEOUS_RENDER_TARGET_COUNT],
    }
}

fn stencil_op_desc(desc: &DepthStencilOpDesc) -> d3d11::D3D11_DEPTH_STENCILOP_DESC {
    d3d11::D3D11_DEPTH_STENCILOP_DESC {
        StencilFailOp: d3d11::D3D11_STENCIL_OP(desc.stencil_fail_op as _),
        StencilDepthFailOp: d3d11::D3D11_STENCIL_OP(desc.stencil_depth_fail_op as _),
        StencilPassOp: d3d11::D3D11_STENCIL_OP(desc.stencil_pass_op as _),
        StencilFunc: d3d11::D3D11_COMPARISON_FUNC(desc.stencil_func as _),
    }
}

pub(crate) fn depth_stencil_desc(desc: &DepthStencilDesc) -> d3d11::D3D11_DEPTH_STENCIL_DESC {
    d3d11::D3D11_DEPTH_STENCIL_DESC {
        DepthEnable: desc.depth_enable.into(),
        DepthWriteMask: d3d11::D3D11_DEPTH_WRITE_MASK(desc.depth_write_mask as _),
        DepthFunc: d3d11::D3D11_COMPARISON_FUNC(desc.depth_func as _),
        StencilEnable: desc.stencil_enable.into(),
        StencilReadMask: desc.stencil_read_mask,
        StencilWriteMask: desc.stencil_write_mask,
        FrontFace: stencil_op_desc(&desc.front_face),
        BackFace: stencil_op_desc(&desc.back_face),
    }
}

fn render_target_view_desc(desc: &ViewDesc) -> d3d11::D3D11_RENDER_TARGET_VIEW_DESC {
    d3d11::D3D11_RENDER_TARGET_VIEW_DESC {
        Format: dxgi_common::DXGI_FORMAT(desc.format as _),
        ViewDimension: d3d11::D3D11_RTV_DIMENSION(desc.dimension as _),
        Anonymous: d3d11::D3D11_RENDER_TARGET_VIEW_DESC_0 {
            Texture2D: d3d11::D3D11_TEX2D_RTV { MipSlice: 0 },
        },
    }
}

fn depth_stencil_view_desc(desc: &ViewDesc) -> d3d11::D3D11_DEPTH_STENCIL_VIEW_DESC {
    d3d11::D3D11_DEPTH_STENCIL_VIEW_DESC {
        Format: dxgi_common::DXGI_FORMAT(desc.format as _),
        ViewDimension: d3d11::D3D11_DSV_DIMENSION(desc.dimension as _),
        Flags: 0,
        Anonymous: d3d11::D3D11_DEPTH_STENCIL_VIEW_DESC_0 {
            Texture2D: d3d11::D3D11_TEX2D_DSV { MipSlice: 0 },
        },
    }
}

fn shader_resource_view_desc(desc: &ViewDesc) -> d3d11::D3D11_SHADER_RESOURCE_VIEW_DESC {
    let anonymous = if desc.dimension == D3D11_SRV_DIMENSION_TEXTURECUBE {
        d3d11::D3D11_SHADER_RESOURCE_VIEW_DESC_0 {
            TextureCube: d3d11::D3D11_TEXCUBE_SRV { MostDetailedMip: 0, MipLevels: desc.mip_levels },
        }
    } else {
        d3d11::D3D11_SHADER_RESOURCE_VIEW_DESC_0 {
            Texture2D: d3d11::D3D11_TEX2D_SRV { MostDetailedMip: 0, MipLevels: desc.mip_levels },
        }
    };
    d3d11::D3D11_SHADER_RESOURCE_VIEW_DESC {
        Format: dxgi_common::DXGI_FORMAT(desc.format as _),
        ViewDimension: d3d::D3D_SRV_DIMENSION(desc.dimension as _),
        Anonymous: anonymous,
    }
}

fn d3d11_box(source: &D3dBox) -> d3d11::D3D11_BOX {
    d3d11::D3D11_BOX {
        left: source.left,
        top: source.top,
        front: source.front,
        right: source.right,
        bottom: source.bottom,
        back: source.back,
    }
}

pub(crate) fn viewport(source: &Viewport) -> d3d11::D3D11_VIEWPORT {
    d3d11::D3D11_VIEWPORT {
        TopLeftX: source.top_left_x,
        TopLeftY: source.top_left_y,
        Width: source.width,
        Height: source.height,
        MinDepth: source.min_depth,
        MaxDepth: source.max_depth,
    }
}

// ============================================================================
// D3d11Api
// ============================================================================

impl D3d11Api for NativeD3d11 {
    fn add_ref(&self, object: RawCom) -> u32 {
        unsafe { ((*vtable(object)).AddRef)(object.as_ptr()) }
    }

    fn release(&self, object: RawCom) -> u32 {
        unsafe { ((*vtable(object)).Release)(object.as_ptr()) }
    }

    fn feature_level(&self) -> u32 {
        unsafe { self.device.GetFeatureLevel() }.0 as u32
    }

    fn adapter_description(&self) -> String {
        let description = self
            .device
            .cast::<dxgi::IDXGIDevice>()
            .and_then(|device| unsafe { device.GetAdapter() })
            .and_then(|adapter| unsafe { adapter.GetDesc() });
        match description {
            Ok(description) => {
                let length = description.Description.iter().position(|&c| c == 0).unwrap_or(description.Description.len());
                String::from_utf16_lossy(&description.Description[..length])
            }
            Err(_) => String::new(),
        }
    }

    fn check_multisample_quality_levels(&self, format: u32, sample_count: u32) -> ComResult<u32> {
        unsafe { self.device.CheckMultisampleQualityLevels(dxgi_common::DXGI_FORMAT(format as _), sample_count) }
            .map_err(hresult)
    }

    fn create_buffer(&self, desc: &BufferDesc, initial_data: Option<&[u8]>) -> ComResult<RawCom> {
        let native = buffer_desc(desc);
        let data = initial_data.map(|data| d3d11::D3D11_SUBRESOURCE_DATA {
            pSysMem: data.as_ptr() as *const c_void,
            SysMemPitch: 0,
            SysMemSlicePitch: 0,
        });
        let mut buffer: Option<d3d11::ID3D11Buffer> = None;
        let result = unsafe {
            self.device.CreateBuffer(&native, data.as_ref().map(|data| data as *const _), Some(&mut buffer))
        };
        created(result, buffer)
    }

    fn create_texture_2d(&self, desc: &Texture2dDesc, initial_data: &[SubresourceData<'_>]) -> ComResult<RawCom> {
        let native = texture_2d_desc(desc);
        let data: Vec<d3d11::D3D11_SUBRESOURCE_DATA> = initial_data
            .iter()
            .map(|level| d3d11::D3D11_SUBRESOURCE_DATA {
                pSysMem: level.data.as_ptr() as *const c_void,
                SysMemPitch: level.row_pitch,
                SysMemSlicePitch: 0,
            })
            .collect();
        let mut texture: Option<d3d11::ID3D11Texture2D> = None;
        let initial = (!data.is_empty()).then(|| data.as_ptr());
        let result = unsafe { self.device.CreateTexture2D(&native, initial, Some(&mut texture)) };
        created(result, texture)
    }

    fn create_render_target_view(&self, resource: RawCom, desc: Option<&ViewDesc>) -> ComResult<RawCom> {
        let resource: d3d11::ID3D11Resource = owned(resource).ok_or(E_POINTER)?;
        let native = desc.map(render_target_view_desc);
        let mut view: Option<d3d11::ID3D11RenderTargetView> = None;
        let result = unsafe {
            self.device.CreateRenderTargetView(&resource, native.as_ref().map(|desc| desc as *const _), Some(&mut view))
        };
        created(result, view)
    }

    fn create_depth_stencil_view(&self, resource: RawCom, desc: Option<&ViewDesc>) -> ComResult<RawCom> {
        let resource: d3d11::ID3D11Resource = owned(resource).ok_or(E_POINTER)?;
        let native = desc.map(depth_stencil_view_desc);
        let mut view: Option<d3d11::ID3D11DepthStencilView> = None;
        let result = unsafe {
            self.device.CreateDepthStencilView(&resource, native.as_ref().map(|desc| desc as *const _), Some(&mut view))
        };
        created(result, view)
    }

    fn create_shader_resource_view(&self, resource: RawCom, desc: &ViewDesc) -> ComResult<RawCom> {
        let resource: d3d11::ID3D11Resource = owned(resource).ok_or(E_POINTER)?;
        let native = shader_resource_view_desc(desc);
        let mut view: Option<d3d11::ID3D11ShaderResourceView> = None;
        let result = unsafe { self.device.CreateShaderResourceView(&resource, Some(&native), Some(&mut view)) };
        created(result, view)
    }

    fn create_sampler_state(&self, desc: &SamplerDesc) -> ComResult<RawCom> {
        let native = sampler_desc(desc);
        let mut state: Option<d3d11::ID3D11SamplerState> = None;
        let result = unsafe { self.device.CreateSamplerState(&native, Some(&mut state)) };
        created(result, state)
    }

    fn create_rasterizer_state(&self, desc: &RasterizerDesc) -> ComResult<RawCom> {
        let native = rasterizer_desc(desc);
        let mut state: Option<d3d11::ID3D11RasterizerState> = None;
        let result = unsafe { self.device.CreateRasterizerState(&native, Some(&mut state)) };
        created(result, state)
    }

    fn create_blend_state(&self, desc: &BlendDesc) -> ComResult<RawCom> {
        let native = blend_desc(desc);
        let mut state: Option<d3d11::ID3D11BlendState> = None;
        let result = unsafe { self.device.CreateBlendState(&native, Some(&mut state)) };
        created(result, state)
    }

    fn create_depth_stencil_state(&self, desc: &DepthStencilDesc) -> ComResult<RawCom> {
        let native = depth_stencil_desc(desc);
        let mut state: Option<d3d11::ID3D11DepthStencilState> = None;
        let result = unsafe { self.device.CreateDepthStencilState(&native, Some(&mut state)) };
        created(result, state)
    }

    fn create_pixel_shader(&self, bytecode: &[u8]) -> ComResult<RawCom> {
        let mut shader: Option<d3d11::ID3D11PixelShader> = None;
        let result = unsafe { self.device.CreatePixelShader(bytecode, None, Some(&mut shader)) };
        created(result, shader)
    }

    fn create_vertex_shader(&self, bytecode: &[u8]) -> ComResult<RawCom> {
        let mut shader: Option<d3d11::ID3D11VertexShader> = None;
        let result = unsafe { self.device.CreateVertexShader(bytecode, None, Some(&mut shader)) };
        created(result, shader)
    }

    fn create_input_layout(&self, elements: &[InputElementDesc], vertex_bytecode: &[u8]) -> ComResult<RawCom> {
        let names = elements
            .iter()
            .map(|element| CString::new(element.semantic_name).map_err(|_| E_INVALIDARG))
            .collect::<ComResult<Vec<CString>>>()?;
        let native: Vec<d3d11::D3D11_INPUT_ELEMENT_DESC> = elements
            .iter()
            .zip(&names)
            .map(|(element, name)| d3d11::D3D11_INPUT_ELEMENT_DESC {
                SemanticName: PCSTR(name.as_ptr() as *const u8),
                SemanticIndex: element.semantic_index,
                Format: dxgi_common::DXGI_FORMAT(element.format as _),
                InputSlot: 0,
                AlignedByteOffset: element.aligned_byte_offset,
                InputSlotClass: d3d11::D3D11_INPUT_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            })
            .collect();
        let mut layout: Option<d3d11::ID3D11InputLayout> = None;
        let result = unsafe { self.device.CreateInputLayout(&native, vertex_bytecode, Some(&mut layout)) };
        created(result, layout)
    }

    fn clear_state(&self) {
        unsafe { self.context.ClearState() }
    }

    // ===== Output merger =====

    fn om_set_render_targets(&self, views: &[RawCom], depth_stencil_view: Option<RawCom>) {
        let views: Vec<Option<d3d11::ID3D11RenderTargetView>> = views.iter().map(|view| owned(*view)).collect();
        let depth: Option<d3d11::ID3D11DepthStencilView> = owned_opt(depth_stencil_view);
        let views = (!views.is_empty()).then_some(views.as_slice());
        unsafe { self.context.OMSetRenderTargets(views, depth.as_ref()) }
    }

    fn om_set_blend_state(&self, state: Option<RawCom>, blend_factor: [f32; 4], sample_mask: u32) {
        let state: Option<d3d11::ID3D11BlendState> = owned_opt(state);
        unsafe { self.context.OMSetBlendState(state.as_ref(), Some(&blend_factor), sample_mask) }
    }

    fn om_set_depth_stencil_state(&self, state: Option<RawCom>, stencil_ref: u32) {
        let state: Option<d3d11::ID3D11DepthStencilState> = owned_opt(state);
        unsafe { self.context.OMSetDepthStencilState(state.as_ref(), stencil_ref) }
    }

    fn clear_render_target_view(&self, view: RawCom, color: [f32; 4]) {
        if let Some(view) = owned::<d3d11::ID3D11RenderTargetView>(view) {
            unsafe { self.context.ClearRenderTargetView(&view, &color) }
        }
    }

    fn clear_depth_stencil_view(&self, view: RawCom, clear_flags: u32, depth: f32, stencil: u8) {
        if let Some(view) = owned::<d3d11::ID3D11DepthStencilView>(view) {
            unsafe { self.context.ClearDepthStencilView(&view, clear_flags, depth, stencil) }
        }
    }

    // ===== Rasterizer =====

    fn rs_set_state(&self, state: Option<RawCom>) {
        let state: Option<d3d11::ID3D11RasterizerState> = owned_opt(state);
        unsafe { self.context.RSSetState(state.as_ref()) }
    }

    fn rs_set_viewports(&self, viewports: &[Viewport]) {
        let native: Vec<d3d11::D3D11_VIEWPORT> = viewports.iter().map(viewport).collect();
        unsafe { self.context.RSSetViewports(Some(&native)) }
    }

    fn rs_set_scissor_rects(&self, rects: &[D3dRect]) {
        let native: Vec<RECT> = rects
            .iter()
            .map(|rect| RECT { left: rect.left, top: rect.top, right: rect.right, bottom: rect.bottom })
            .collect();
        unsafe { self.context.RSSetScissorRects(Some(&native)) }
    }

    // ===== Input assembler =====

    fn ia_set_input_layout(&self, layout: Option<RawCom>) {
        let layout: Option<d3d11::ID3D11InputLayout> = owned_opt(layout);
        unsafe { self.context.IASetInputLayout(layout.as_ref()) }
    }

    fn ia_set_vertex_buffer(&self, slot: u32, buffer: Option<RawCom>, stride: u32, offset: u32) {
        let buffers: [Option<d3d11::ID3D11Buffer>; 1] = [owned_opt(buffer)];
        unsafe { self.context.IASetVertexBuffers(slot, 1, Some(buffers.as_ptr()), Some(&stride), Some(&offset)) }
    }

    fn ia_set_index_buffer(&self, buffer: Option<RawCom>, format: u32, offset: u32) {
        let buffer: Option<d3d11::ID3D11Buffer> = owned_opt(buffer);
        unsafe { self.context.IASetIndexBuffer(buffer.as_ref(), dxgi_common::DXGI_FORMAT(format as _), offset) }
    }

    fn ia_set_primitive_topology(&self, topology: u32) {
        unsafe { self.context.IASetPrimitiveTopology(d3d::D3D_PRIMITIVE_TOPOLOGY(topology as _)) }
    }

    // ===== Shader stages =====

    fn vs_set_shader(&self, shader: Option<RawCom>) {
        let shader: Option<d3d11::ID3D11VertexShader> = owned_opt(shader);
        unsafe { self.context.VSSetShader(shader.as_ref(), None) }
    }

    fn ps_set_shader(&self, shader: Option<RawCom>) {
        let shader: Option<d3d11::ID3D11PixelShader> = owned_opt(shader);
        unsafe { self.context.PSSetShader(shader.as_ref(), None) }
    }

    fn vs_set_constant_buffer(&self, slot: u32, buffer: Option<RawCom>) {
        let buffers: [Option<d3d11::ID3D11Buffer>; 1] = [owned_opt(buffer)];
        unsafe { self.context.VSSetConstantBuffers(slot, Some(&buffers)) }
    }

    fn ps_set_constant_buffer(&self, slot: u32, buffer: Option<RawCom>) {
        let buffers: [Option<d3d11::ID3D11Buffer>; 1] = [owned_opt(buffer)];
        unsafe { self.context.PSSetConstantBuffers(slot, Some(&buffers)) }
    }

    fn ps_set_shader_resources(&self, start_slot: u32, views: &[Option<RawCom>]) {
        let views: Vec<Option<d3d11::ID3D11ShaderResourceView>> = views.iter().map(|view| owned_opt(*view)).collect();
        unsafe { self.context.PSSetShaderResources(start_slot, Some(&views)) }
    }

    fn ps_set_samplers(&self, start_slot: u32, samplers: &[Option<RawCom>]) {
        let samplers: Vec<Option<d3d11::ID3D11SamplerState>> =
            samplers.iter().map(|sampler| owned_opt(*sampler)).collect();
        unsafe { self.context.PSSetSamplers(start_slot, Some(&samplers)) }
    }

    // ===== Draws, uploads and copies =====

    fn draw_indexed(&self, index_count: u32, start_index: u32, base_vertex: i32) {
        unsafe { self.context.DrawIndexed(index_count, start_index, base_vertex) }
    }

    fn map(&self, resource: RawCom, subresource: u32, map_type: u32) -> ComResult<MappedSubresource> {
        let resource: d3d11::ID3D11Resource = owned(resource).ok_or(E_POINTER)?;
        let mut mapped = d3d11::D3D11_MAPPED_SUBRESOURCE::default();
        unsafe { self.context.Map(&resource, subresource, d3d11::D3D11_MAP(map_type as _), 0, Some(&mut mapped)) }
            .map_err(hresult)?;
        Ok(MappedSubresource { data: mapped.pData as *mut u8, row_pitch: mapped.RowPitch })
    }

    fn unmap(&self, resource: RawCom, subresource: u32) {
        if let Some(resource) = owned::<d3d11::ID3D11Resource>(resource) {
            unsafe { self.context.Unmap(&resource, subresource) }
        }
    }

    fn update_subresource(&self, resource: RawCom, subresource: u32, data: &[u8], row_pitch: u32) {
        if let Some(resource) = owned::<d3d11::ID3D11Resource>(resource) {
            unsafe {
                self.context.UpdateSubresource(&resource, subresource, None, data.as_ptr() as *const c_void, row_pitch, 0)
            }
        }
    }

    fn resolve_subresource(&self, destination: RawCom, destination_subresource: u32, source: RawCom,
        source_subresource: u32, format: u32) {
        let destination: Option<d3d11::ID3D11Resource> = owned(destination);
        let source: Option<d3d11::ID3D11Resource> = owned(source);
        if let (Some(destination), Some(source)) = (destination, source) {
            unsafe {
                self.context.ResolveSubresource(&destination, destination_subresource, &source, source_subresource,
                    dxgi_common::DXGI_FORMAT(format as _))
            }
        }
    }

    fn copy_subresource_region(&self, destination: RawCom, destination_subresource: u32, x: u32, y: u32,
        z: u32, source: RawCom, source_subresource: u32, source_box: &D3dBox) {
        let destination: Option<d3d11::ID3D11Resource> = owned(destination);
        let source: Option<d3d11::ID3D11Resource> = owned(source);
        let native = d3d11_box(source_box);
        if let (Some(destination), Some(source)) = (destination, source) {
            unsafe {
                self.context.CopySubresourceRegion(&destination, destination_subresource, x, y, z, &source,
                    source_subresource, Some(&native))
            }
        }
    }

    // ===== ID3DUserDefinedAnnotation =====

    fn supports_annotations(&self) -> bool {
        self.annotation.is_some()
    }

    fn begin_event(&self, name: &str) {
        if let Some(annotation) = &self.annotation {
            let name = to_wide(name);
            unsafe { annotation.BeginEvent(PCWSTR(name.as_ptr())) };
        }
    }

    fn end_event(&self) {
        if let Some(annotation) = &self.annotation {
            unsafe { annotation.EndEvent() };
        }
    }
}

// ============================================================================
// DxgiSwapChain
// ============================================================================

/// Windowed swap chain for a window handle
pub struct DxgiSwapChain {
    device: d3d11::ID3D11Device,
    window: HWND,
    swap_chain: Option<dxgi::IDXGISwapChain>,
    format: u32,
}

// SAFETY: presented from the render thread only.
unsafe impl Send for DxgiSwapChain {}

impl DxgiSwapChain {
    pub fn new(api: &NativeD3d11, window: HWND) -> Self {
        Self { device: api.device.clone(), window, swap_chain: None, format: 0 }
    }

    fn swap_chain(&self) -> ComResult<&dxgi::IDXGISwapChain> {
        self.swap_chain.as_ref().ok_or(DXGI_ERROR_INVALID_CALL)
    }
}

impl D3d11SwapChain for DxgiSwapChain {
    fn create(&mut self, desc: &SwapChainDesc) -> ComResult<()> {
        let factory: dxgi::IDXGIFactory = self
            .device
            .cast::<dxgi::IDXGIDevice>()
            .and_then(|device| unsafe { device.GetAdapter() })
            .and_then(|adapter| unsafe { adapter.GetParent() })
            .map_err(hresult)?;
        let native = dxgi::DXGI_SWAP_CHAIN_DESC {
            BufferDesc: dxgi_common::DXGI_MODE_DESC {
                Width: desc.width,
                Height: desc.height,
                Format: dxgi_common::DXGI_FORMAT(desc.format as _),
                ..Default::default()
            },
            SampleDesc: dxgi_common::DXGI_SAMPLE_DESC { Count: desc.sample_count.max(1), Quality: 0 },
            BufferUsage: dxgi::DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: 1,
            OutputWindow: self.window,
            Windowed: BOOL(1),
            SwapEffect: dxgi::DXGI_SWAP_EFFECT_DISCARD,
            Flags: 0,
        };
        let mut swap_chain = None;
        unsafe { factory.CreateSwapChain(&self.device, &native, &mut swap_chain) }.ok().map_err(hresult)?;
        self.swap_chain = Some(swap_chain.ok_or(E_POINTER)?);
        self.format = desc.format;
        Ok(())
    }

    fn back_buffer(&self) -> ComResult<RawCom> {
        let texture: d3d11::ID3D11Texture2D = unsafe { self.swap_chain()?.GetBuffer(0) }.map_err(hresult)?;
        into_raw(Some(texture))
    }

    fn resize_buffers(&mut self, width: u32, height: u32) -> ComResult<()> {
        let unknown = dxgi_common::DXGI_FORMAT(0);
        unsafe { self.swap_chain()?.ResizeBuffers(0, width, height, unknown, 0) }.map_err(hresult)
    }

    fn present(&mut self, sync_interval: u32) -> ComResult<()> {
        unsafe { self.swap_chain()?.Present(sync_interval, 0) }.ok().map_err(hresult)
    }

    fn display_modes(&self) -> Vec<UVec2> {
        let Ok(swap_chain) = self.swap_chain() else { return Vec::new() };
        let Ok(output) = (unsafe { swap_chain.GetContainingOutput() }) else { return Vec::new() };
        let format = dxgi_common::DXGI_FORMAT(self.format as _);
        let mut count = 0u32;
        if unsafe { output.GetDisplayModeList(format, 0, &mut count, None) }.is_err() {
            return Vec::new();
        }
        let mut modes = vec![dxgi_common::DXGI_MODE_DESC::default(); count as usize];
        if unsafe { output.GetDisplayModeList(format, 0, &mut count, Some(modes.as_mut_ptr())) }.is_err() {
            return Vec::new();
        }
        modes.truncate(count as usize);
        let mut sizes: Vec<UVec2> = modes.iter().map(|mode| UVec2::new(mode.Width, mode.Height)).collect();
        sizes.dedup();
        sizes
    }
}

#[cfg(test)]
#[path = "d3d11_native_tests.rs"]
mod tests;
