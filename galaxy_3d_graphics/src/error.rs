//! Error types for the Galaxy3D graphics layer
//!
//! Every failure raised while a render device executes commands is one of the
//! categories below. Native failures carry the backend's own error code so the
//! render thread can log exactly what the driver reported.

use std::fmt;

/// Result type for Galaxy3D graphics operations
pub type Result<T> = std::result::Result<T, Error>;

/// Backend-specific native error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeErrorCode {
    /// Value returned by `glGetError` or `glCheckFramebufferStatus`
    OpenGl(u32),
    /// HRESULT returned by a Direct3D 11 or DXGI call
    Direct3D(i32),
    /// Metal / NSError status code
    Metal(i64),
}

impl fmt::Display for NativeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeErrorCode::OpenGl(code) => write!(f, "OpenGL error 0x{:04X}", code),
            NativeErrorCode::Direct3D(hr) => write!(f, "Direct3D error 0x{:08X}", *hr as u32),
            NativeErrorCode::Metal(code) => write!(f, "Metal error {}", code),
        }
    }
}

/// A native API failure: the backend code plus a human-readable description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    /// Code reported by the native API
    pub code: NativeErrorCode,
    /// What the device was doing when the call failed
    pub message: String,
}

impl NativeError {
    /// Create a native error
    pub fn new(code: NativeErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Galaxy3D graphics errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad enum, size or format detected before any native call
    InvalidParameter(String),

    /// A native object could not be created
    NativeCreationFailure(NativeError),

    /// A native state, upload or draw call reported an error
    NativeCallFailed(NativeError),

    /// Operation not allowed for this resource (e.g. updating immutable data)
    InvalidUsage(String),

    /// Operation attempted before the resource or device was constructed
    NotInitialized(String),

    /// Producer-side bug: missing shader, missing resource, constant size mismatch
    ProtocolError(String),

    /// Device or context creation failed
    InitializationFailed(String),

    /// Illegal device lifecycle transition
    InvalidState(String),
}

impl Error {
    /// Native error code carried by this error, if any
    pub fn native_code(&self) -> Option<NativeErrorCode> {
        match self {
            Error::NativeCreationFailure(e) | Error::NativeCallFailed(e) => Some(e.code),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::NativeCreationFailure(e) => write!(f, "Native creation failure: {}", e),
            Error::NativeCallFailed(e) => write!(f, "Native call failed: {}", e),
            Error::InvalidUsage(msg) => write!(f, "Invalid usage: {}", msg),
            Error::NotInitialized(msg) => write!(f, "Not initialized: {}", msg),
            Error::ProtocolError(msg) => write!(f, "Protocol error: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
