use super::*;

#[test]
fn test_command_names() {
    assert_eq!(Command::Present.name(), "present");
    assert_eq!(Command::PopDebugMarker.name(), "popDebugMarker");
    assert_eq!(
        Command::SetViewport(SetViewportCommand { viewport: Rect::new(0.0, 0.0, 640.0, 480.0) }).name(),
        "setViewport"
    );
}

#[test]
fn test_is_present() {
    assert!(Command::Present.is_present());
    assert!(!Command::PopDebugMarker.is_present());
}

#[test]
fn test_created_resource() {
    let init = Command::InitBuffer(InitBufferCommand {
        buffer: 7,
        buffer_type: BufferType::Vertex,
        flags: Flags::empty(),
        data: vec![0; 48],
        size: 48,
    });
    assert_eq!(init.created_resource(), Some(7));
    assert_eq!(Command::DeleteResource(DeleteResourceCommand { resource: 7 }).created_resource(), None);
}

#[test]
fn test_commands_are_send() {
    fn assert_send<T: Send + 'static>() {}
    assert_send::<Command>();
}
