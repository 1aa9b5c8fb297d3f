/// Render targets: a set of color views and an optional depth view
///
/// The views belong to the textures; the render target keeps its own
/// reference to each so binding never outlives them. Texture ids are kept to
/// resolve multisampled storage when the target stops being rendered to.

use crate::d3d11_api::RawCom;
use crate::d3d11_constants::D3D11_SIMULTANEOUS_RENDER_TARGET_COUNT;
use crate::d3d11_error::SOURCE;
use crate::d3d11_resource::{ComHandle, D3d11Context};
use crate::d3d11_texture::D3d11Texture;
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::resource::ResourceId;
use galaxy_3d_graphics::galaxy3d::Result;

pub struct D3d11RenderTarget {
    color_textures: Vec<ResourceId>,
    depth_texture: ResourceId,
    color_views: Vec<ComHandle>,
    depth_view: Option<ComHandle>,
}

impl D3d11RenderTarget {
    pub fn new(
        context: &D3d11Context,
        color_textures: Vec<ResourceId>,
        depth_texture: ResourceId,
        colors: &[&D3d11Texture],
        depth: Option<&D3d11Texture>,
    ) -> Result<Self> {
        if !context.capabilities.render_targets {
            engine_bail!(SOURCE, InvalidUsage, "Render targets are not supported");
        }
        if colors.len() > D3D11_SIMULTANEOUS_RENDER_TARGET_COUNT {
            engine_bail!(SOURCE, InvalidParameter, "Too many color attachments: {}", colors.len());
        }

        let mut color_views = Vec::with_capacity(colors.len());
        for texture in colors {
            if texture.render_target_view().is_null() {
                engine_bail!(SOURCE, InvalidParameter, "Color attachment is not a color render target");
            }
            color_views.push(texture.render_target_view().clone());
        }
        let depth_view = match depth {
            Some(texture) if texture.depth_stencil_view().is_null() => {
                engine_bail!(SOURCE, InvalidParameter, "Depth attachment is not a depth render target")
            }
            Some(texture) => Some(texture.depth_stencil_view().clone()),
            None => None,
        };

        Ok(Self { color_textures, depth_texture, color_views, depth_view })
    }

    pub fn color_textures(&self) -> &[ResourceId] {
        &self.color_textures
    }

    /// 0 without a depth attachment
    pub fn depth_texture(&self) -> ResourceId {
        self.depth_texture
    }

    pub fn render_target_views(&self) -> Vec<RawCom> {
        self.color_views.iter().filter_map(|view| view.raw()).collect()
    }

    pub fn depth_stencil_view(&self) -> Option<RawCom> {
        self.depth_view.as_ref().and_then(|view| view.raw())
    }

    pub fn bindable_objects(&self) -> Vec<RawCom> {
        let mut objects = self.render_target_views();
        objects.extend(self.depth_stencil_view());
        objects
    }
}
