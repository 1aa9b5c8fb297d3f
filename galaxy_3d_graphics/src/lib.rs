/*!
# Galaxy 3D Graphics

Backend-agnostic core of the Galaxy 3D graphics layer.

Producers build `CommandBuffer`s of plain-data `Command`s and submit them to a
`RenderThread`. The render thread owns one `RenderDevice` (OpenGL, Direct3D 11,
Metal or the empty device) and executes every command, in submission order, on
the native API. Backend crates implement `RenderDevice` on top of the shared
building blocks found here.

## Architecture

- **Command / CommandBuffer / CommandQueue**: the producer-to-render-thread stream
- **CommandProcessor / RenderThread**: the single consumer and its lifecycle
- **RenderDevice**: the contract each backend implements
- **ResourceTable**: growth-only slot table addressed by 1-based ids
- **Reloadable**: context-loss recovery wrapper
- **NativeHandle**: owning wrapper around native objects
- **StateObjectCache**: content-addressed cache of native state objects
*/

// Internal modules
mod engine;
mod error;
pub mod log;
pub mod renderer;
pub mod resource;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, NativeError, NativeErrorCode, Result};

    // Logging facade
    pub use crate::engine::Engine;

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }
}

// Re-export math library at crate root
pub use glam;
