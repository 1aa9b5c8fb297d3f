use super::*;
use crate::mock_metal::MockMetal;
use std::num::NonZeroUsize;

fn id(value: usize) -> RawId {
    RawId::from_id(NonZeroUsize::new(value).unwrap())
}

fn setup() -> (Arc<MockMetal>, StateCache) {
    let api = MockMetal::new();
    let mut cache = StateCache::new(api.clone());
    cache.begin(id(100));
    (api, cache)
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_repeated_values_are_issued_once() {
    let (api, mut cache) = setup();
    cache.set_cull_mode(2);
    cache.set_cull_mode(2);
    cache.set_pipeline_state(id(7));
    cache.set_pipeline_state(id(7));
    cache.set_scissor_rect(ScissorRect { x: 0, y: 0, width: 64, height: 64 });
    cache.set_scissor_rect(ScissorRect { x: 0, y: 0, width: 64, height: 64 });

    assert_eq!(api.calls(), vec![
        "SetCullMode(2)".to_string(),
        "SetRenderPipelineState(7)".to_string(),
        "SetScissorRect(0, 0, 64, 64)".to_string(),
    ]);
}

#[test]
fn test_stencil_reference_is_filtered_separately() {
    let (api, mut cache) = setup();
    cache.set_depth_stencil_state(id(5), 0);
    cache.set_depth_stencil_state(id(5), 3);
    cache.set_depth_stencil_state(id(6), 3);

    assert_eq!(api.count("SetDepthStencilState"), 2);
    assert_eq!(api.count("SetStencilReferenceValue"), 2);
    assert!(api.called("SetStencilReferenceValue(3)"));
}

#[test]
fn test_new_encoder_forgets_state() {
    let (api, mut cache) = setup();
    cache.set_fill_mode(1);
    cache.begin(id(101));
    cache.set_fill_mode(1);
    assert_eq!(api.count("SetTriangleFillMode"), 2);
}

#[test]
fn test_setters_without_encoder_are_ignored() {
    let (api, mut cache) = setup();
    cache.end();
    cache.set_cull_mode(1);
    cache.set_vertex_buffer(id(9));
    cache.set_fragment_textures(&[Some(id(3))], &[Some(id(4))]).unwrap();
    assert!(api.calls().is_empty());
    assert_eq!(cache.encoder(), None);
}

// ============================================================================
// Buffers
// ============================================================================

#[test]
fn test_vertex_buffer_binds_index_zero() {
    let (api, mut cache) = setup();
    cache.set_vertex_buffer(id(9));
    cache.set_vertex_buffer(id(9));
    assert_eq!(api.calls(), vec!["SetVertexBuffer(9, 0, 0)".to_string()]);
}

#[test]
fn test_constant_buffers_track_offsets_per_stage() {
    let (api, mut cache) = setup();
    cache.set_constant_buffers(Some((id(8), 0)), Some((id(8), 256)));
    cache.set_constant_buffers(Some((id(8), 0)), Some((id(8), 512)));
    cache.set_constant_buffers(None, None);

    assert_eq!(api.calls(), vec![
        "SetFragmentBuffer(8, 0, 1)".to_string(),
        "SetVertexBuffer(8, 256, 1)".to_string(),
        "SetVertexBuffer(8, 512, 1)".to_string(),
    ]);
}

// ============================================================================
// Textures
// ============================================================================

#[test]
fn test_only_changed_texture_slots_are_issued() {
    let (api, mut cache) = setup();
    cache.set_fragment_textures(&[Some(id(3)), Some(id(4))], &[Some(id(13)), Some(id(14))]).unwrap();
    api.clear_calls();

    cache.set_fragment_textures(&[Some(id(3)), None], &[Some(id(13)), None]).unwrap();
    assert_eq!(api.calls(), vec![
        "SetFragmentTexture(null, 1)".to_string(),
        "SetFragmentSamplerState(null, 1)".to_string(),
    ]);
    assert_eq!(cache.texture(0), Some(id(3)));
    assert_eq!(cache.texture(1), None);
}

#[test]
fn test_shorter_texture_list_clears_slots_left_out() {
    let (api, mut cache) = setup();
    cache.set_fragment_textures(&[Some(id(3)), Some(id(4))], &[Some(id(13)), Some(id(14))]).unwrap();
    api.clear_calls();

    cache.set_fragment_textures(&[Some(id(3))], &[Some(id(13))]).unwrap();
    assert_eq!(api.calls(), vec![
        "SetFragmentTexture(null, 1)".to_string(),
        "SetFragmentSamplerState(null, 1)".to_string(),
    ]);
    assert_eq!(cache.texture(1), None);

    api.clear_calls();
    cache.set_fragment_textures(&[], &[]).unwrap();
    assert_eq!(api.calls(), vec![
        "SetFragmentTexture(null, 0)".to_string(),
        "SetFragmentSamplerState(null, 0)".to_string(),
    ]);
}

#[test]
fn test_too_many_textures_is_rejected() {
    let (api, mut cache) = setup();
    let textures = vec![Some(id(3)); MAX_TEXTURE_SLOTS + 1];
    let result = cache.set_fragment_textures(&textures, &[]);
    assert!(matches!(result, Err(galaxy_3d_graphics::galaxy3d::Error::InvalidParameter(_))));
    assert!(api.calls().is_empty());
}

// ============================================================================
// Unbind
// ============================================================================

#[test]
fn test_unbind_forgets_without_native_calls() {
    let (api, mut cache) = setup();
    cache.set_fragment_textures(&[Some(id(3))], &[Some(id(13))]).unwrap();
    cache.set_vertex_buffer(id(9));
    api.clear_calls();

    cache.unbind(id(3));
    cache.unbind(id(9));
    assert!(api.calls().is_empty());
    assert_eq!(cache.texture(0), None);

    cache.set_fragment_textures(&[Some(id(3))], &[Some(id(13))]).unwrap();
    cache.set_vertex_buffer(id(9));
    assert_eq!(api.calls(), vec![
        "SetFragmentTexture(3, 0)".to_string(),
        "SetVertexBuffer(9, 0, 0)".to_string(),
    ]);
}

#[test]
fn test_unbind_pipeline_state() {
    let (api, mut cache) = setup();
    cache.set_pipeline_state(id(7));
    cache.unbind(id(7));
    assert_eq!(cache.pipeline_state(), None);
    cache.set_pipeline_state(id(7));
    assert_eq!(api.count("SetRenderPipelineState"), 2);
}
