use super::*;
use crate::mock_metal::{MockMetal, MockObject};
use galaxy_3d_graphics::galaxy3d::Error;
use std::thread;
use std::time::Duration;

// ============================================================================
// Semaphore
// ============================================================================

#[test]
fn test_semaphore_counts_slots() {
    let semaphore = FrameSemaphore::new(2);
    semaphore.acquire();
    semaphore.acquire();
    assert_eq!(semaphore.available(), 0);
    semaphore.release();
    assert_eq!(semaphore.available(), 1);
}

#[test]
fn test_acquire_waits_for_release_from_another_thread() {
    let semaphore = FrameSemaphore::new(1);
    semaphore.acquire();

    let releaser = Arc::clone(&semaphore);
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        releaser.release();
    });
    semaphore.acquire();
    handle.join().unwrap();
    assert_eq!(semaphore.available(), 0);
}

// ============================================================================
// Constant ring
// ============================================================================

#[test]
fn test_writes_are_aligned_in_one_buffer() {
    let mock = MockMetal::new();
    let api: Arc<dyn MetalApi> = mock.clone();
    let mut ring = ConstantRing::new();

    let (first, first_offset) = ring.write(&api, &[1u8; 64]).unwrap();
    let (second, second_offset) = ring.write(&api, &[2u8; 16]).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_offset, 0);
    assert_eq!(second_offset, CONSTANT_ALIGNMENT);
    assert_eq!(ring.buffer_count(), 1);

    let contents = mock.contents(first, 0, 0).unwrap();
    assert_eq!(&contents[..64], &[1u8; 64][..]);
    assert_eq!(&contents[CONSTANT_ALIGNMENT..CONSTANT_ALIGNMENT + 16], &[2u8; 16][..]);

    match mock.object(first).unwrap() {
        MockObject::Buffer { length, options } => {
            assert_eq!(length, BUFFER_SIZE);
            assert_eq!(options, MTL_RESOURCE_STORAGE_MODE_SHARED | MTL_RESOURCE_CPU_CACHE_MODE_WRITE_COMBINED);
        }
        other => panic!("unexpected object {:?}", other),
    }
}

#[test]
fn test_full_buffer_spills_into_a_new_one() {
    let mock = MockMetal::new();
    let api: Arc<dyn MetalApi> = mock.clone();
    let mut ring = ConstantRing::new();

    let (first, _) = ring.write(&api, &vec![0u8; BUFFER_SIZE - 100]).unwrap();
    let (second, offset) = ring.write(&api, &[0u8; 200]).unwrap();
    assert_ne!(first, second);
    assert_eq!(offset, 0);
    assert_eq!(ring.buffer_count(), 2);
}

#[test]
fn test_frame_slots_reuse_their_buffers() {
    let mock = MockMetal::new();
    let api: Arc<dyn MetalApi> = mock.clone();
    let mut ring = ConstantRing::new();

    let (slot0, _) = ring.write(&api, &[0u8; 4]).unwrap();
    ring.advance();
    let (slot1, _) = ring.write(&api, &[0u8; 4]).unwrap();
    assert_ne!(slot0, slot1);

    for _ in 0..BUFFER_COUNT {
        ring.advance();
    }
    let (again, offset) = ring.write(&api, &[0u8; 4]).unwrap();
    assert_eq!(again, slot1);
    assert_eq!(offset, 0);
    assert_eq!(mock.count("NewBuffer"), 2);
}

#[test]
fn test_oversized_constants_are_rejected() {
    let mock = MockMetal::new();
    let api: Arc<dyn MetalApi> = mock.clone();
    let mut ring = ConstantRing::new();

    let result = ring.write(&api, &vec![0u8; BUFFER_SIZE + 1]);
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
    assert_eq!(mock.count("NewBuffer"), 0);
}

#[test]
fn test_clear_releases_buffers() {
    let mock = MockMetal::new();
    let api: Arc<dyn MetalApi> = mock.clone();
    let mut ring = ConstantRing::new();
    ring.write(&api, &[0u8; 4]).unwrap();
    ring.advance();
    ring.write(&api, &[0u8; 4]).unwrap();

    ring.clear();
    assert_eq!(ring.buffer_count(), 0);
    assert_eq!(mock.live_objects(), 0);
}
