/// Framebuffer objects
///
/// Attachments are textures owned by the device's resource table; the
/// render target only keeps their ids and the framebuffer name. It is
/// recreated after a context loss once its attachments are back.

use crate::opengl_api::GlApi;
use crate::opengl_constants::*;
use crate::opengl_error::{check_creation, framebuffer_incomplete, SOURCE};
use crate::opengl_resource::{empty_handle, name_of, GlContext, GlHandle, GlObjectKind};
use crate::opengl_texture::GlAttachment;
use galaxy_3d_graphics::engine_bail;
use galaxy_3d_graphics::galaxy3d::resource::ResourceId;
use galaxy_3d_graphics::galaxy3d::Result;

pub struct GlRenderTarget {
    color_textures: Vec<ResourceId>,
    depth_texture: ResourceId,
    frame_buffer: GlHandle,
}

impl GlRenderTarget {
    pub fn new(
        context: &mut GlContext,
        color_textures: Vec<ResourceId>,
        depth_texture: ResourceId,
        color_attachments: &[GlAttachment],
        depth_attachment: Option<GlAttachment>,
    ) -> Result<Self> {
        if !context.capabilities.render_targets {
            engine_bail!(SOURCE, InvalidUsage, "Render targets are not supported");
        }

        let mut render_target = Self {
            color_textures,
            depth_texture,
            frame_buffer: empty_handle(&context.api, GlObjectKind::Framebuffer),
        };
        render_target.create(context, color_attachments, depth_attachment)?;
        Ok(render_target)
    }

    /// Create the framebuffer and attach everything
    ///
    /// The previously bound framebuffer is bound again afterwards.
    pub fn create(
        &mut self,
        context: &mut GlContext,
        color_attachments: &[GlAttachment],
        depth_attachment: Option<GlAttachment>,
    ) -> Result<()> {
        let previous = context.state.frame_buffer();

        let name = context.api.gen_framebuffer();
        check_creation(context.api.as_ref(), "Failed to create frame buffer")?;
        self.frame_buffer.replace(name);
        context.state.bind_frame_buffer(name)?;

        let api = context.api.as_ref();
        for (index, attachment) in color_attachments.iter().enumerate() {
            attach(api, COLOR_ATTACHMENT0 + index as GLenum, attachment);
        }
        if let Some(attachment) = &depth_attachment {
            let point = if attachment.pixel_format.has_stencil() {
                DEPTH_STENCIL_ATTACHMENT
            } else {
                DEPTH_ATTACHMENT
            };
            attach(api, point, attachment);
        }
        check_creation(api, "Failed to attach textures to frame buffer")?;

        let status = api.check_framebuffer_status(FRAMEBUFFER);
        context.state.bind_frame_buffer(previous)?;
        if status != FRAMEBUFFER_COMPLETE {
            return Err(framebuffer_incomplete(status));
        }
        Ok(())
    }

    pub fn color_textures(&self) -> &[ResourceId] {
        &self.color_textures
    }

    /// 0 without a depth attachment
    pub fn depth_texture(&self) -> ResourceId {
        self.depth_texture
    }

    pub fn frame_buffer(&self) -> GLuint {
        name_of(&self.frame_buffer)
    }

    pub(crate) fn abandon(&mut self) {
        self.frame_buffer.abandon();
    }
}

fn attach(api: &dyn GlApi, point: GLenum, attachment: &GlAttachment) {
    if attachment.texture != 0 {
        api.framebuffer_texture_2d(FRAMEBUFFER, point, attachment.target, attachment.texture, 0);
    } else {
        api.framebuffer_renderbuffer(FRAMEBUFFER, point, RENDERBUFFER, attachment.renderbuffer);
    }
}
