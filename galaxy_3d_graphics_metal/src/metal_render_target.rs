/// Render targets and render pass descriptors
///
/// A render target keeps its own references to the attachment storage and
/// their formats, which key the pipelines drawing into it. Passes load the
/// previous contents unless a clear is pending; multisampled color
/// attachments store and resolve when the pass ends, so a pass split by a
/// clear keeps its samples.

use crate::metal_api::{
    ColorAttachmentDescriptor, DepthAttachmentDescriptor, RawId, RenderPassDescriptor, StencilAttachmentDescriptor,
};
use crate::metal_constants::*;
use crate::metal_error::SOURCE;
use crate::metal_format::has_stencil;
use crate::metal_resource::{MetalContext, ObjcHandle};
use crate::metal_texture::MetalTexture;
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::Result;
use galaxy_3d_graphics::glam::UVec2;

/// Values the next pass clears to; `None` loads
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClearValues {
    pub color: Option<[f64; 4]>,
    pub depth: Option<f64>,
    pub stencil: Option<u32>,
}

impl ClearValues {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.depth.is_none() && self.stencil.is_none()
    }
}

/// Color attachment: drawn texture and, when multisampled, resolve texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTarget {
    pub texture: RawId,
    pub resolve_texture: Option<RawId>,
}

/// Descriptor of a pass drawing into `colors` and `depth`, with its format
pub fn pass_descriptor(colors: &[ColorTarget], depth: Option<(RawId, u64)>, clear: &ClearValues) -> RenderPassDescriptor {
    let load = |cleared: bool| if cleared { MTL_LOAD_ACTION_CLEAR } else { MTL_LOAD_ACTION_LOAD };
    RenderPassDescriptor {
        color_attachments: colors
            .iter()
            .map(|color| ColorAttachmentDescriptor {
                texture: color.texture,
                resolve_texture: color.resolve_texture,
                load_action: load(clear.color.is_some()),
                store_action: if color.resolve_texture.is_some() {
                    MTL_STORE_ACTION_STORE_AND_MULTISAMPLE_RESOLVE
                } else {
                    MTL_STORE_ACTION_STORE
                },
                clear_color: clear.color.unwrap_or_default(),
            })
            .collect(),
        depth_attachment: depth.map(|(texture, _)| DepthAttachmentDescriptor {
            texture,
            load_action: load(clear.depth.is_some()),
            store_action: MTL_STORE_ACTION_STORE,
            clear_depth: clear.depth.unwrap_or(1.0),
        }),
        stencil_attachment: depth.filter(|(_, format)| has_stencil(*format)).map(|(texture, _)| {
            StencilAttachmentDescriptor {
                texture,
                load_action: load(clear.stencil.is_some()),
                store_action: MTL_STORE_ACTION_STORE,
                clear_stencil: clear.stencil.unwrap_or(0),
            }
        }),
    }
}

pub struct MetalRenderTarget {
    colors: Vec<ColorTarget>,
    color_formats: Vec<u64>,
    depth: Option<(RawId, u64)>,
    size: UVec2,
    sample_count: u32,
    _storage: Vec<ObjcHandle>,
}

impl MetalRenderTarget {
    pub fn new(
        context: &MetalContext,
        colors: &[&MetalTexture],
        depth: Option<&MetalTexture>,
    ) -> Result<Self> {
        if !context.capabilities.render_targets {
            engine_bail!(SOURCE, InvalidUsage, "Render targets are not supported");
        }
        if colors.len() > MTL_MAX_COLOR_ATTACHMENTS {
            engine_bail!(SOURCE, InvalidParameter, "Too many color attachments: {}", colors.len());
        }
        if colors.iter().any(|texture| texture.pixel_format().is_depth()) {
            engine_bail!(SOURCE, InvalidParameter, "Color attachment is not a color render target");
        }
        if depth.is_some_and(|texture| !texture.pixel_format().is_depth()) {
            engine_bail!(SOURCE, InvalidParameter, "Depth attachment is not a depth render target");
        }

        let attachments: Vec<&MetalTexture> = colors.iter().copied().chain(depth).collect();
        let Some(first) = attachments.first() else {
            engine_bail!(SOURCE, InvalidParameter, "Render target has no attachments");
        };
        let (size, sample_count) = (first.size(), first.sample_count());
        if attachments.iter().any(|texture| texture.sample_count() != sample_count) {
            engine_bail!(SOURCE, InvalidParameter, "Attachments have different sample counts");
        }

        let mut targets = Vec::with_capacity(colors.len());
        for texture in colors {
            let Some(attachment) = texture.attachment_texture() else {
                engine_bail!(SOURCE, NotInitialized, "Color attachment has no storage");
            };
            targets.push(ColorTarget { texture: attachment, resolve_texture: texture.resolve_texture() });
        }
        let depth_target = match depth {
            Some(texture) => match texture.attachment_texture() {
                Some(attachment) => Some((attachment, texture.format())),
                None => engine_bail!(SOURCE, NotInitialized, "Depth attachment has no storage"),
            },
            None => None,
        };

        Ok(Self {
            colors: targets,
            color_formats: colors.iter().map(|texture| texture.format()).collect(),
            depth: depth_target,
            size,
            sample_count,
            _storage: attachments.iter().flat_map(|texture| texture.retain_storage()).collect(),
        })
    }

    pub fn pass_descriptor(&self, clear: &ClearValues) -> RenderPassDescriptor {
        pass_descriptor(&self.colors, self.depth, clear)
    }

    pub fn color_formats(&self) -> &[u64] {
        &self.color_formats
    }

    /// `MTLPixelFormatInvalid` without a depth attachment
    pub fn depth_format(&self) -> u64 {
        self.depth.map_or(MTL_PIXEL_FORMAT_INVALID, |(_, format)| format)
    }

    /// Size of the first attachment
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}
