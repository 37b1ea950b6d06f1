//! Operator commands queued for the control loop.
//!
//! These arrive on the same serial channel as companion traffic but are
//! not applied while the input is being drained: the service queues them
//! and applies at most one per tick, after the protocol and indicator
//! work for that tick is done.

use heapless::{Deque, String};

use crate::link::MAX_LINE_LEN;

/// Capacity of the pending operator command queue.
pub const COMMAND_QUEUE_CAP: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCommand {
    /// `SET_TARGET:<raw>`; the raw argument is validated when applied.
    SetTarget(String<MAX_LINE_LEN>),
    /// `TEST_FLASH`: run one flash sequence without a companion verdict.
    TestFlash,
}

/// Bounded FIFO of pending operator commands.
pub struct CommandQueue {
    inner: Deque<LocalCommand, COMMAND_QUEUE_CAP>,
}

impl CommandQueue {
    pub const fn new() -> Self {
        Self {
            inner: Deque::new(),
        }
    }

    /// Enqueue `cmd`, handing it back if the queue is full.
    pub fn push(&mut self, cmd: LocalCommand) -> Result<(), LocalCommand> {
        self.inner.push_back(cmd)
    }

    pub fn pop(&mut self) -> Option<LocalCommand> {
        self.inner.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
