use super::*;
use crate::renderer::command::{Command, PushDebugMarkerCommand};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn marker_buffer(name: &str) -> CommandBuffer {
    let mut buffer = CommandBuffer::new(name);
    buffer.push(Command::PushDebugMarker(PushDebugMarkerCommand { name: name.to_string() }));
    buffer.push(Command::PopDebugMarker);
    buffer
}

// ============================================================================
// FIFO behavior
// ============================================================================

#[test]
fn test_fifo_order() {
    let queue = CommandQueue::new();
    queue.submit(marker_buffer("first"));
    queue.submit(marker_buffer("second"));

    assert_eq!(queue.len(), 2);
    assert_eq!(queue.try_pop().unwrap().name(), "first");
    assert_eq!(queue.pop_blocking().name(), "second");
    assert!(queue.try_pop().is_none());
    assert!(queue.is_empty());
}

#[test]
fn test_buffer_keeps_command_order() {
    let mut buffer = marker_buffer("frame");
    buffer.push(Command::Present);

    assert_eq!(buffer.len(), 3);
    let names: Vec<&str> = buffer.iter().map(Command::name).collect();
    assert_eq!(names, vec!["pushDebugMarker", "popDebugMarker", "present"]);
    assert!(matches!(buffer.pop(), Some(Command::PushDebugMarker(_))));
}

// ============================================================================
// Blocking pop
// ============================================================================

#[test]
fn test_pop_blocking_wakes_on_submit() {
    let queue = Arc::new(CommandQueue::new());

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.pop_blocking().name().to_string())
    };

    thread::sleep(Duration::from_millis(20));
    queue.submit(marker_buffer("late"));

    assert_eq!(consumer.join().unwrap(), "late");
}

// ============================================================================
// Render thread tasks
// ============================================================================

#[test]
fn test_tasks_are_handed_out_before_buffers() {
    let queue = CommandQueue::new();
    queue.submit(marker_buffer("frame"));
    queue.execute_on_render_thread(Box::new(|_device: &mut dyn RenderDevice| {}));
    queue.execute_on_render_thread(Box::new(|_device: &mut dyn RenderDevice| {}));

    assert!(matches!(queue.wait_for_work(), Work::Tasks(tasks) if tasks.len() == 2));
    assert!(matches!(queue.wait_for_work(), Work::Buffer(buffer) if buffer.name() == "frame"));
    assert!(queue.is_empty());
}

#[test]
fn test_task_wakes_waiting_render_thread() {
    let queue = Arc::new(CommandQueue::new());

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || matches!(queue.wait_for_work(), Work::Tasks(tasks) if tasks.len() == 1))
    };

    thread::sleep(Duration::from_millis(20));
    queue.execute_on_render_thread(Box::new(|_device: &mut dyn RenderDevice| {}));

    assert!(consumer.join().unwrap());
}
