/*!
# Galaxy 3D Graphics - Direct3D 11 Backend

Direct3D 11 implementation of `RenderDevice`.

Every native call goes through the `D3d11Api` trait, which mirrors the
`ID3D11Device` and immediate context methods the backend needs and owns
COM reference counting. On Windows, `NativeD3d11` implements it over the
`windows` crate interfaces and `DxgiSwapChain` presents to a window handle;
the platform layer hands them over as `D3d11Api` and `D3d11SwapChain`.

Context state is cached so repeated binds are skipped; sampler and
rasterizer states are interned by descriptor and shared.
*/

// Native seam
mod d3d11_api;
mod d3d11_constants;
mod d3d11_error;
#[cfg(windows)]
mod d3d11_native;

// Context state
mod d3d11_format;
mod d3d11_state_cache;

// Resources
mod d3d11_blend_state;
mod d3d11_buffer;
mod d3d11_depth_stencil_state;
mod d3d11_render_target;
mod d3d11_resource;
mod d3d11_shader;
mod d3d11_texture;

mod d3d11_render_device;

#[cfg(test)]
mod mock_d3d11;

pub use d3d11_api::{
    BlendDesc, BufferDesc, ComResult, D3d11Api, D3d11SwapChain, D3dBox, D3dRect, DepthStencilDesc,
    DepthStencilOpDesc, InputElementDesc, MappedSubresource, RasterizerDesc, RawCom, SamplerDesc,
    SubresourceData, SwapChainDesc, Texture2dDesc, ViewDesc, Viewport,
};
pub use d3d11_error::{hresult_name, D3d11ErrorCode};
#[cfg(windows)]
pub use d3d11_native::{DxgiSwapChain, NativeD3d11};
pub use d3d11_render_device::{D3d11DeviceConfig, D3d11RenderDevice};
pub use d3d11_resource::D3d11Resource;
