use super::*;
use crate::d3d11_constants::*;
use crate::mock_d3d11::{MockD3d11, MockObject};
use galaxy_3d_graphics::galaxy3d::Error;
use std::num::NonZeroUsize;

fn setup() -> (Arc<MockD3d11>, StateCache) {
    let api = MockD3d11::new();
    let cache = StateCache::new(api.clone());
    (api, cache)
}

fn com(id: usize) -> RawCom {
    RawCom::from_id(NonZeroUsize::new(id).unwrap())
}

fn viewport(width: f32, height: f32) -> Viewport {
    Viewport { width, height, max_depth: 1.0, ..Viewport::default() }
}

// ============================================================================
// Redundant calls are filtered
// ============================================================================

#[test]
fn test_identical_viewport_is_set_once() {
    let (api, mut cache) = setup();

    cache.set_viewport(viewport(800.0, 600.0));
    cache.set_viewport(viewport(800.0, 600.0));
    assert_eq!(api.count("RSSetViewports"), 1);

    cache.set_viewport(viewport(1024.0, 768.0));
    assert_eq!(api.count("RSSetViewports"), 2);
    assert_eq!(cache.viewport(), Some(viewport(1024.0, 768.0)));
}

#[test]
fn test_every_setter_is_idempotent() {
    let (api, mut cache) = setup();

    for _ in 0..3 {
        cache.set_render_targets(&[com(1)], Some(com(2)));
        cache.set_depth_stencil_state(Some(com(3)), 1);
        cache.set_blend_state(Some(com(4)));
        cache.set_rasterizer_state(Some(com(5)));
        cache.set_scissor_rect(D3dRect { left: 0, top: 0, right: 10, bottom: 10 });
        cache.set_shaders(Some(com(6)), Some(com(7)), Some(com(8)));
        cache.set_constant_buffers(Some(com(9)), Some(com(10)));
        cache.set_vertex_buffer(Some(com(11)));
        cache.set_index_buffer(Some(com(12)), DXGI_FORMAT_R16_UINT);
        cache.set_primitive_topology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
        cache.set_shader_resources(&[Some(com(13))], &[Some(com(14))]).unwrap();
    }

    for name in [
        "OMSetRenderTargets",
        "OMSetDepthStencilState",
        "OMSetBlendState",
        "RSSetState",
        "RSSetScissorRects",
        "PSSetShader",
        "VSSetShader",
        "IASetInputLayout",
        "PSSetConstantBuffers",
        "VSSetConstantBuffers",
        "IASetVertexBuffers",
        "IASetIndexBuffer",
        "IASetPrimitiveTopology",
        "PSSetShaderResources",
        "PSSetSamplers",
    ] {
        assert_eq!(api.count(name), 1, "{} was issued more than once", name);
    }
}

#[test]
fn test_null_defaults_skip_native_calls() {
    let (api, mut cache) = setup();

    cache.set_render_targets(&[], None);
    cache.set_blend_state(None);
    cache.set_rasterizer_state(None);
    cache.set_shaders(None, None, None);
    cache.set_constant_buffers(None, None);
    cache.set_vertex_buffer(None);
    cache.set_primitive_topology(D3D_PRIMITIVE_TOPOLOGY_UNDEFINED);
    cache.set_shader_resources(&[None, None], &[None, None]).unwrap();

    assert!(api.calls().is_empty(), "{:?}", api.calls());
}

#[test]
fn test_stencil_reference_change_rebinds_state() {
    let (api, mut cache) = setup();

    cache.set_depth_stencil_state(Some(com(3)), 1);
    cache.set_depth_stencil_state(Some(com(3)), 2);
    assert!(api.called("OMSetDepthStencilState(3, 1)"));
    assert!(api.called("OMSetDepthStencilState(3, 2)"));
}

#[test]
fn test_vertex_buffer_uses_engine_stride() {
    let (api, mut cache) = setup();

    cache.set_vertex_buffer(Some(com(5)));
    assert!(api.called(&format!("IASetVertexBuffers(0, 5, {}, 0)", Vertex::STRIDE)));
}

// ============================================================================
// Texture slots
// ============================================================================

#[test]
fn test_changed_texture_slots_rebind_the_range() {
    let (api, mut cache) = setup();

    cache.set_shader_resources(&[Some(com(1)), Some(com(2))], &[Some(com(3)), Some(com(3))]).unwrap();
    cache.set_shader_resources(&[Some(com(1)), Some(com(4))], &[Some(com(3)), Some(com(3))]).unwrap();

    assert!(api.called("PSSetShaderResources(0, [1, 2])"));
    assert!(api.called("PSSetShaderResources(0, [1, 4])"));
    assert_eq!(api.count("PSSetSamplers"), 1);
    assert_eq!(cache.shader_resource(1), Some(com(4)));
}

#[test]
fn test_shorter_texture_list_clears_the_slots_left_out() {
    let (api, mut cache) = setup();

    cache.set_shader_resources(&[Some(com(1)), Some(com(2))], &[Some(com(3)), Some(com(3))]).unwrap();
    api.clear_calls();
    cache.set_shader_resources(&[Some(com(1))], &[Some(com(3))]).unwrap();

    assert_eq!(api.calls(), vec![
        "PSSetShaderResources(0, [1, null])".to_string(),
        "PSSetSamplers(0, [3, null])".to_string(),
    ]);
    assert_eq!(cache.shader_resource(1), None);

    api.clear_calls();
    cache.set_shader_resources(&[], &[]).unwrap();
    assert!(api.called("PSSetShaderResources(0, [null])"));
    assert_eq!(cache.shader_resource(0), None);
}

#[test]
fn test_too_many_texture_slots_are_rejected() {
    let (api, mut cache) = setup();

    let views = vec![Some(com(1)); MAX_TEXTURE_SLOTS + 1];
    let result = cache.set_shader_resources(&views, &[]);
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
    assert!(api.calls().is_empty());
}

// ============================================================================
// Forgetting released objects
// ============================================================================

#[test]
fn test_unbind_clears_every_slot_holding_the_object() {
    let (api, mut cache) = setup();

    cache.set_shader_resources(&[Some(com(1)), Some(com(2)), Some(com(1))], &[]).unwrap();
    cache.set_vertex_buffer(Some(com(1)));
    api.clear_calls();

    cache.unbind(com(1));

    assert!(api.called("PSSetShaderResources(0, [null])"));
    assert!(api.called("PSSetShaderResources(2, [null])"));
    assert!(api.called(&format!("IASetVertexBuffers(0, null, {}, 0)", Vertex::STRIDE)));
    assert_eq!(cache.shader_resource(0), None);
    assert_eq!(cache.shader_resource(1), Some(com(2)));
    assert_eq!(cache.shader_resource(2), None);
}

#[test]
fn test_unbind_removes_render_target_view() {
    let (api, mut cache) = setup();

    cache.set_render_targets(&[com(1), com(2)], Some(com(3)));
    api.clear_calls();

    cache.unbind(com(2));
    assert!(api.called("OMSetRenderTargets([1], 3)"));
    cache.unbind(com(3));
    assert!(api.called("OMSetRenderTargets([1], null)"));
    assert_eq!(cache.render_target_views(), &[com(1)]);
    assert_eq!(cache.depth_stencil_view(), None);
}

#[test]
fn test_unbind_of_unbound_object_is_silent() {
    let (api, mut cache) = setup();

    cache.set_shaders(Some(com(1)), Some(com(2)), Some(com(3)));
    cache.set_blend_state(Some(com(4)));
    api.clear_calls();

    cache.unbind(com(9));
    assert!(api.calls().is_empty(), "{:?}", api.calls());

    cache.unbind(com(2));
    assert_eq!(api.calls(), vec!["VSSetShader(null)".to_string()]);
}

#[test]
fn test_rebinding_after_unbind_is_not_filtered() {
    let (api, mut cache) = setup();

    cache.set_rasterizer_state(Some(com(5)));
    cache.unbind(com(5));
    cache.set_rasterizer_state(Some(com(5)));
    assert_eq!(api.count("RSSetState"), 3);
}

#[test]
fn test_reset_clears_state_and_cache() {
    let (api, mut cache) = setup();

    cache.set_blend_state(Some(com(4)));
    cache.reset();
    assert!(api.called("ClearState()"));

    cache.set_blend_state(Some(com(4)));
    assert_eq!(api.count("OMSetBlendState"), 2);
}

#[test]
fn test_cache_only_tracks_raw_pointers() {
    let (api, mut cache) = setup();

    let shader = api.create("CreatePixelShader", MockObject::PixelShader).unwrap();
    cache.set_shaders(Some(shader), None, None);
    assert_eq!(api.references(shader), 1);
}
