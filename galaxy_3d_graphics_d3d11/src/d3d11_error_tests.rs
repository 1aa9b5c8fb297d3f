use super::*;

#[test]
fn test_every_code_round_trips_through_its_hresult() {
    for code in D3d11ErrorCode::ALL {
        assert_eq!(D3d11ErrorCode::from_hresult(code.hresult()), Some(code), "{:?}", code);
    }
}

#[test]
fn test_names_match_their_codes() {
    assert_eq!(hresult_name(D3D11_ERROR_FILE_NOT_FOUND), "D3D11_ERROR_FILE_NOT_FOUND");
    assert_eq!(hresult_name(D3D11_ERROR_TOO_MANY_UNIQUE_VIEW_OBJECTS),
        "D3D11_ERROR_TOO_MANY_UNIQUE_VIEW_OBJECTS");
    assert_eq!(hresult_name(DXGI_ERROR_WAS_STILL_DRAWING), "DXGI_ERROR_WAS_STILL_DRAWING");
    assert_eq!(hresult_name(E_OUTOFMEMORY), "E_OUTOFMEMORY");
}

#[test]
fn test_unknown_hresult_is_printed_in_hex() {
    assert_eq!(hresult_name(0x8000_1234_u32 as i32), "Unknown error (0x80001234)");
    assert_eq!(D3d11ErrorCode::from_hresult(S_OK), None);
}

#[test]
fn test_check_creation_carries_hresult() {
    let result: ComResult<u32> = Err(E_INVALIDARG);
    let err = check_creation(result, "Failed to create buffer").unwrap_err();
    assert!(matches!(err, Error::NativeCreationFailure(_)));
    assert_eq!(err.native_code(), Some(NativeErrorCode::Direct3D(E_INVALIDARG)));
}

#[test]
fn test_check_call_category() {
    let result: ComResult<()> = Err(DXGI_ERROR_DEVICE_REMOVED);
    let err = check_call(result, "Failed to present").unwrap_err();
    assert!(matches!(err, Error::NativeCallFailed(_)));

    assert_eq!(check_call(Ok(7), "Failed to map").unwrap(), 7);
}
