/// OpenGL error reporting
///
/// `glGetError` is polled after each group of native calls; a non-zero code
/// becomes a `NativeError` carrying that code.

use crate::opengl_api::GlApi;
use crate::opengl_constants::*;
use galaxy_3d_graphics::engine_error;
use galaxy_3d_graphics::galaxy3d::{Error, NativeError, NativeErrorCode, Result};

pub(crate) const SOURCE: &str = "galaxy3d::opengl";

/// Symbolic name of a `glGetError` code
pub fn error_name(code: GLenum) -> &'static str {
    match code {
        NO_ERROR => "GL_NO_ERROR",
        INVALID_ENUM => "GL_INVALID_ENUM",
        INVALID_VALUE => "GL_INVALID_VALUE",
        INVALID_OPERATION => "GL_INVALID_OPERATION",
        STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        CONTEXT_LOST => "GL_CONTEXT_LOST",
        _ => "Unknown OpenGL error",
    }
}

/// Symbolic name of a `glCheckFramebufferStatus` result
pub fn framebuffer_status_name(status: GLenum) -> String {
    match status {
        FRAMEBUFFER_COMPLETE => "GL_FRAMEBUFFER_COMPLETE".to_string(),
        FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT".to_string(),
        FRAMEBUFFER_INCOMPLETE_DIMENSIONS => "GL_FRAMEBUFFER_INCOMPLETE_DIMENSIONS".to_string(),
        FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
            "GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT".to_string()
        }
        FRAMEBUFFER_UNSUPPORTED => "GL_FRAMEBUFFER_UNSUPPORTED".to_string(),
        other => format!("0x{:04X}", other),
    }
}

/// Build a `NativeCallFailed` error for `code`, logging it
pub(crate) fn call_failed(code: GLenum, message: &str) -> Error {
    engine_error!(SOURCE, "{}: {}", message, error_name(code));
    Error::NativeCallFailed(NativeError::new(NativeErrorCode::OpenGl(code), message))
}

/// Build a `NativeCreationFailure` error for `code`, logging it
pub(crate) fn creation_failed(code: GLenum, message: &str) -> Error {
    engine_error!(SOURCE, "{}: {}", message, error_name(code));
    Error::NativeCreationFailure(NativeError::new(NativeErrorCode::OpenGl(code), message))
}

/// `NativeCreationFailure` for a framebuffer that is not complete
pub(crate) fn framebuffer_incomplete(status: GLenum) -> Error {
    let message = format!("Failed to create frame buffer object: {}", framebuffer_status_name(status));
    engine_error!(SOURCE, "{}", message);
    Error::NativeCreationFailure(NativeError::new(NativeErrorCode::OpenGl(status), message))
}

/// Fail with `NativeCallFailed` if the context has a pending error
pub(crate) fn check(api: &dyn GlApi, message: &str) -> Result<()> {
    match api.get_error() {
        NO_ERROR => Ok(()),
        code => Err(call_failed(code, message)),
    }
}

/// Fail with `NativeCreationFailure` if the context has a pending error
pub(crate) fn check_creation(api: &dyn GlApi, message: &str) -> Result<()> {
    match api.get_error() {
        NO_ERROR => Ok(()),
        code => Err(creation_failed(code, message)),
    }
}

#[cfg(test)]
#[path = "opengl_error_tests.rs"]
mod tests;
