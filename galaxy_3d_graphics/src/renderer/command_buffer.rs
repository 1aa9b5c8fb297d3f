/// Ordered batch of commands built on a producer thread
///
/// A buffer is filled completely by its producer, then moved into the
/// `CommandQueue` as one unit. The render thread pops its commands in push order.

use crate::renderer::command::Command;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    name: String,
    commands: VecDeque<Command>,
}

impl CommandBuffer {
    /// Create an empty buffer; `name` shows up in failure logs
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a command
    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Take the oldest command
    pub fn pop(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}

impl Extend<Command> for CommandBuffer {
    fn extend<I: IntoIterator<Item = Command>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}
