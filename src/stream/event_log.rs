// Bounded event log
//
// Keeps the most recent events in arrival order; the oldest entries are
// dropped once the capacity is exceeded.

use std::collections::VecDeque;

/// Origin of a logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Log,
    Thought,
    Chat,
    /// Input sent by the local operator
    User,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Log => "log",
            EventKind::Thought => "thought",
            EventKind::Chat => "chat",
            EventKind::User => "you",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub kind: EventKind,
    pub text: String,
}

impl StreamEvent {
    pub fn new(kind: EventKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<StreamEvent>,
    capacity: usize,
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append an event, evicting from the front past capacity
    pub fn push(&mut self, event: StreamEvent) {
        self.entries.push_back(event);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Events oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StreamEvent> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&StreamEvent> {
        self.entries.back()
    }
}
