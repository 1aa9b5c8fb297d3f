/// Direct3D 11 / DXGI error reporting
///
/// Failed calls return their HRESULT; it is kept in the `NativeError` and
/// named in the log message.

use crate::d3d11_api::ComResult;
use crate::d3d11_constants::*;
use galaxy_3d_graphics::engine_error;
use galaxy_3d_graphics::galaxy3d::{Error, NativeError, NativeErrorCode, Result};

pub(crate) const SOURCE: &str = "galaxy3d::d3d11";

/// HRESULTs with a known symbolic name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum D3d11ErrorCode {
    FileNotFound,
    TooManyUniqueStateObjects,
    TooManyUniqueViewObjects,
    DeferredContextMapWithoutInitialDiscard,
    InvalidCall,
    WasStillDrawing,
    NotCurrentlyAvailable,
    DeviceRemoved,
    DeviceHung,
    DeviceReset,
    Fail,
    InvalidArgument,
    OutOfMemory,
    NotImplemented,
}

impl D3d11ErrorCode {
    pub const ALL: [D3d11ErrorCode; 14] = [
        D3d11ErrorCode::FileNotFound,
        D3d11ErrorCode::TooManyUniqueStateObjects,
        D3d11ErrorCode::TooManyUniqueViewObjects,
        D3d11ErrorCode::DeferredContextMapWithoutInitialDiscard,
        D3d11ErrorCode::InvalidCall,
        D3d11ErrorCode::WasStillDrawing,
        D3d11ErrorCode::NotCurrentlyAvailable,
        D3d11ErrorCode::DeviceRemoved,
        D3d11ErrorCode::DeviceHung,
        D3d11ErrorCode::DeviceReset,
        D3d11ErrorCode::Fail,
        D3d11ErrorCode::InvalidArgument,
        D3d11ErrorCode::OutOfMemory,
        D3d11ErrorCode::NotImplemented,
    ];

    pub fn hresult(&self) -> i32 {
        match self {
            D3d11ErrorCode::FileNotFound => D3D11_ERROR_FILE_NOT_FOUND,
            D3d11ErrorCode::TooManyUniqueStateObjects => D3D11_ERROR_TOO_MANY_UNIQUE_STATE_OBJECTS,
            D3d11ErrorCode::TooManyUniqueViewObjects => D3D11_ERROR_TOO_MANY_UNIQUE_VIEW_OBJECTS,
            D3d11ErrorCode::DeferredContextMapWithoutInitialDiscard => {
                D3D11_ERROR_DEFERRED_CONTEXT_MAP_WITHOUT_INITIAL_DISCARD
            }
            D3d11ErrorCode::InvalidCall => DXGI_ERROR_INVALID_CALL,
            D3d11ErrorCode::WasStillDrawing => DXGI_ERROR_WAS_STILL_DRAWING,
            D3d11ErrorCode::NotCurrentlyAvailable => DXGI_ERROR_NOT_CURRENTLY_AVAILABLE,
            D3d11ErrorCode::DeviceRemoved => DXGI_ERROR_DEVICE_REMOVED,
            D3d11ErrorCode::DeviceHung => DXGI_ERROR_DEVICE_HUNG,
            D3d11ErrorCode::DeviceReset => DXGI_ERROR_DEVICE_RESET,
            D3d11ErrorCode::Fail => E_FAIL,
            D3d11ErrorCode::InvalidArgument => E_INVALIDARG,
            D3d11ErrorCode::OutOfMemory => E_OUTOFMEMORY,
            D3d11ErrorCode::NotImplemented => E_NOTIMPL,
        }
    }

    pub fn from_hresult(hresult: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.hresult() == hresult)
    }

    pub fn name(&self) -> &'static str {
        match self {
            D3d11ErrorCode::FileNotFound => "D3D11_ERROR_FILE_NOT_FOUND",
            D3d11ErrorCode::TooManyUniqueStateObjects => "D3D11_ERROR_TOO_MANY_UNIQUE_STATE_OBJECTS",
            D3d11ErrorCode::TooManyUniqueViewObjects => "D3D11_ERROR_TOO_MANY_UNIQUE_VIEW_OBJECTS",
            D3d11ErrorCode::DeferredContextMapWithoutInitialDiscard => {
                "D3D11_ERROR_DEFERRED_CONTEXT_MAP_WITHOUT_INITIAL_DISCARD"
            }
            D3d11ErrorCode::InvalidCall => "DXGI_ERROR_INVALID_CALL",
            D3d11ErrorCode::WasStillDrawing => "DXGI_ERROR_WAS_STILL_DRAWING",
            D3d11ErrorCode::NotCurrentlyAvailable => "DXGI_ERROR_NOT_CURRENTLY_AVAILABLE",
            D3d11ErrorCode::DeviceRemoved => "DXGI_ERROR_DEVICE_REMOVED",
            D3d11ErrorCode::DeviceHung => "DXGI_ERROR_DEVICE_HUNG",
            D3d11ErrorCode::DeviceReset => "DXGI_ERROR_DEVICE_RESET",
            D3d11ErrorCode::Fail => "E_FAIL",
            D3d11ErrorCode::InvalidArgument => "E_INVALIDARG",
            D3d11ErrorCode::OutOfMemory => "E_OUTOFMEMORY",
            D3d11ErrorCode::NotImplemented => "E_NOTIMPL",
        }
    }
}

/// Symbolic name of an HRESULT, or its hex value
pub fn hresult_name(hresult: i32) -> String {
    match D3d11ErrorCode::from_hresult(hresult) {
        Some(code) => code.name().to_string(),
        None => format!("Unknown error (0x{:08X})", hresult as u32),
    }
}

/// Build a `NativeCreationFailure` error for `hresult`, logging it
pub(crate) fn creation_failed(hresult: i32, message: &str) -> Error {
    engine_error!(SOURCE, "{}: {}", message, hresult_name(hresult));
    Error::NativeCreationFailure(NativeError::new(NativeErrorCode::Direct3D(hresult), message))
}

/// Build a `NativeCallFailed` error for `hresult`, logging it
pub(crate) fn call_failed(hresult: i32, message: &str) -> Error {
    engine_error!(SOURCE, "{}: {}", message, hresult_name(hresult));
    Error::NativeCallFailed(NativeError::new(NativeErrorCode::Direct3D(hresult), message))
}

/// Map a failed creation call to `NativeCreationFailure`
pub(crate) fn check_creation<T>(result: ComResult<T>, message: &str) -> Result<T> {
    result.map_err(|hresult| creation_failed(hresult, message))
}

/// Map a failed call to `NativeCallFailed`
pub(crate) fn check_call<T>(result: ComResult<T>, message: &str) -> Result<T> {
    result.map_err(|hresult| call_failed(hresult, message))
}

#[cfg(test)]
#[path = "d3d11_error_tests.rs"]
mod tests;
