/// Logical kind of a GPU resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Buffer,
    Texture,
    Shader,
    BlendState,
    DepthStencilState,
    RenderTarget,
}

impl ResourceType {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::Buffer => "buffer",
            ResourceType::Texture => "texture",
            ResourceType::Shader => "shader",
            ResourceType::BlendState => "blend state",
            ResourceType::DepthStencilState => "depth stencil state",
            ResourceType::RenderTarget => "render target",
        }
    }
}

/// A backend GPU resource stored in a `ResourceTable`
///
/// Resources are owned by the render thread: they are created by `init*`
/// commands, mutated by `set*` commands and dropped by `deleteResource`.
/// Dropping a resource releases its native objects.
pub trait RenderResource {
    /// Logical kind of this resource
    fn resource_type(&self) -> ResourceType;

    /// Forget native objects after a context loss
    ///
    /// Backends without context loss keep the default no-op.
    fn invalidate(&mut self) {}
}
