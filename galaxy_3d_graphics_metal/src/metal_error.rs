/// Metal error reporting
///
/// Failed calls return an `NSError` domain and code; the code is kept in the
/// `NativeError` and named, with the error description, in the log message.

use crate::metal_api::{MetalError, MetalErrorDomain, MetalResult};
use crate::metal_constants::*;
use galaxy_3d_graphics::engine_error;
use galaxy_3d_graphics::galaxy3d::{Error, NativeError, NativeErrorCode, Result};

pub(crate) const SOURCE: &str = "galaxy3d::metal";

/// Error codes with a known symbolic name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetalErrorCode {
    NilObject,
    NoDrawable,
    LibraryUnsupported,
    LibraryInternal,
    CompileFailure,
    CompileWarning,
    FunctionNotFound,
    FileNotFound,
    CommandBufferInternal,
    Timeout,
    PageFault,
    AccessRevoked,
    NotPermitted,
    OutOfMemory,
    InvalidResource,
    Memoryless,
    DeviceRemoved,
    StackOverflow,
}

impl MetalErrorCode {
    pub const ALL: [MetalErrorCode; 18] = [
        MetalErrorCode::NilObject,
        MetalErrorCode::NoDrawable,
        MetalErrorCode::LibraryUnsupported,
        MetalErrorCode::LibraryInternal,
        MetalErrorCode::CompileFailure,
        MetalErrorCode::CompileWarning,
        MetalErrorCode::FunctionNotFound,
        MetalErrorCode::FileNotFound,
        MetalErrorCode::CommandBufferInternal,
        MetalErrorCode::Timeout,
        MetalErrorCode::PageFault,
        MetalErrorCode::AccessRevoked,
        MetalErrorCode::NotPermitted,
        MetalErrorCode::OutOfMemory,
        MetalErrorCode::InvalidResource,
        MetalErrorCode::Memoryless,
        MetalErrorCode::DeviceRemoved,
        MetalErrorCode::StackOverflow,
    ];

    pub fn domain(&self) -> MetalErrorDomain {
        match self {
            MetalErrorCode::NilObject | MetalErrorCode::NoDrawable => MetalErrorDomain::Device,
            MetalErrorCode::LibraryUnsupported
            | MetalErrorCode::LibraryInternal
            | MetalErrorCode::CompileFailure
            | MetalErrorCode::CompileWarning
            | MetalErrorCode::FunctionNotFound
            | MetalErrorCode::FileNotFound => MetalErrorDomain::Library,
            _ => MetalErrorDomain::CommandBuffer,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            MetalErrorCode::NilObject => METAL_DEVICE_ERROR_NIL_OBJECT,
            MetalErrorCode::NoDrawable => METAL_DEVICE_ERROR_NO_DRAWABLE,
            MetalErrorCode::LibraryUnsupported => MTL_LIBRARY_ERROR_UNSUPPORTED,
            MetalErrorCode::LibraryInternal => MTL_LIBRARY_ERROR_INTERNAL,
            MetalErrorCode::CompileFailure => MTL_LIBRARY_ERROR_COMPILE_FAILURE,
            MetalErrorCode::CompileWarning => MTL_LIBRARY_ERROR_COMPILE_WARNING,
            MetalErrorCode::FunctionNotFound => MTL_LIBRARY_ERROR_FUNCTION_NOT_FOUND,
            MetalErrorCode::FileNotFound => MTL_LIBRARY_ERROR_FILE_NOT_FOUND,
            MetalErrorCode::CommandBufferInternal => MTL_COMMAND_BUFFER_ERROR_INTERNAL,
            MetalErrorCode::Timeout => MTL_COMMAND_BUFFER_ERROR_TIMEOUT,
            MetalErrorCode::PageFault => MTL_COMMAND_BUFFER_ERROR_PAGE_FAULT,
            MetalErrorCode::AccessRevoked => MTL_COMMAND_BUFFER_ERROR_ACCESS_REVOKED,
            MetalErrorCode::NotPermitted => MTL_COMMAND_BUFFER_ERROR_NOT_PERMITTED,
            MetalErrorCode::OutOfMemory => MTL_COMMAND_BUFFER_ERROR_OUT_OF_MEMORY,
            MetalErrorCode::InvalidResource => MTL_COMMAND_BUFFER_ERROR_INVALID_RESOURCE,
            MetalErrorCode::Memoryless => MTL_COMMAND_BUFFER_ERROR_MEMORYLESS,
            MetalErrorCode::DeviceRemoved => MTL_COMMAND_BUFFER_ERROR_DEVICE_REMOVED,
            MetalErrorCode::StackOverflow => MTL_COMMAND_BUFFER_ERROR_STACK_OVERFLOW,
        }
    }

    pub fn from_code(domain: MetalErrorDomain, code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|known| known.domain() == domain && known.code() == code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetalErrorCode::NilObject => "nil object",
            MetalErrorCode::NoDrawable => "no drawable",
            MetalErrorCode::LibraryUnsupported => "MTLLibraryErrorUnsupported",
            MetalErrorCode::LibraryInternal => "MTLLibraryErrorInternal",
            MetalErrorCode::CompileFailure => "MTLLibraryErrorCompileFailure",
            MetalErrorCode::CompileWarning => "MTLLibraryErrorCompileWarning",
            MetalErrorCode::FunctionNotFound => "MTLLibraryErrorFunctionNotFound",
            MetalErrorCode::FileNotFound => "MTLLibraryErrorFileNotFound",
            MetalErrorCode::CommandBufferInternal => "MTLCommandBufferErrorInternal",
            MetalErrorCode::Timeout => "MTLCommandBufferErrorTimeout",
            MetalErrorCode::PageFault => "MTLCommandBufferErrorPageFault",
            MetalErrorCode::AccessRevoked => "MTLCommandBufferErrorAccessRevoked",
            MetalErrorCode::NotPermitted => "MTLCommandBufferErrorNotPermitted",
            MetalErrorCode::OutOfMemory => "MTLCommandBufferErrorOutOfMemory",
            MetalErrorCode::InvalidResource => "MTLCommandBufferErrorInvalidResource",
            MetalErrorCode::Memoryless => "MTLCommandBufferErrorMemoryless",
            MetalErrorCode::DeviceRemoved => "MTLCommandBufferErrorDeviceRemoved",
            MetalErrorCode::StackOverflow => "MTLCommandBufferErrorStackOverflow",
        }
    }
}

/// Symbolic name of an error, or its domain and number
pub fn metal_error_name(domain: MetalErrorDomain, code: i64) -> String {
    match MetalErrorCode::from_code(domain, code) {
        Some(known) => known.name().to_string(),
        None => format!("Unknown {:?} error ({})", domain, code),
    }
}

fn describe(error: &MetalError) -> String {
    let name = metal_error_name(error.domain, error.code);
    if error.description.is_empty() {
        name
    } else {
        format!("{} ({})", name, error.description)
    }
}

/// Build a `NativeCreationFailure` error, logging it
pub(crate) fn creation_failed(error: &MetalError, message: &str) -> Error {
    engine_error!(SOURCE, "{}: {}", message, describe(error));
    Error::NativeCreationFailure(NativeError::new(NativeErrorCode::Metal(error.code), message))
}

/// Build a `NativeCallFailed` error, logging it
pub(crate) fn call_failed(error: &MetalError, message: &str) -> Error {
    engine_error!(SOURCE, "{}: {}", message, describe(error));
    Error::NativeCallFailed(NativeError::new(NativeErrorCode::Metal(error.code), message))
}

/// Map a failed `new_*` call to `NativeCreationFailure`
pub(crate) fn check_creation<T>(result: MetalResult<T>, message: &str) -> Result<T> {
    result.map_err(|error| creation_failed(&error, message))
}

/// Map a failed call to `NativeCallFailed`
pub(crate) fn check_call<T>(result: MetalResult<T>, message: &str) -> Result<T> {
    result.map_err(|error| call_failed(&error, message))
}

#[cfg(test)]
#[path = "metal_error_tests.rs"]
mod tests;
