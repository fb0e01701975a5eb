// In-memory transport for session tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{SessionError, Transport};

/// Shared view of what went over the fake wire
#[derive(Debug, Default)]
pub(crate) struct Wire {
    pub inbound: VecDeque<String>,
    pub sent: Vec<String>,
    /// Remote hangs up once the inbound queue is drained
    pub remote_closed: bool,
    pub fail_sends: bool,
    pub closed_locally: bool,
}

impl Wire {
    pub fn push_inbound(&mut self, text: &str) {
        self.inbound.push_back(text.to_string());
    }
}

/// Queue a frame for the session to read on its next poll
pub(crate) fn feed(wire: &RefCell<Wire>, text: &str) {
    wire.borrow_mut().push_inbound(text);
}

pub(crate) struct MockTransport {
    wire: Rc<RefCell<Wire>>,
}

impl MockTransport {
    pub fn new(wire: Rc<RefCell<Wire>>) -> Self {
        Self { wire }
    }
}

impl Transport for MockTransport {
    fn try_recv(&mut self) -> Result<Option<String>, SessionError> {
        let mut wire = self.wire.borrow_mut();
        match wire.inbound.pop_front() {
            Some(text) => Ok(Some(text)),
            None if wire.remote_closed => Err(SessionError::Closed),
            None => Ok(None),
        }
    }

    fn send_text(&mut self, text: String) -> Result<(), SessionError> {
        let mut wire = self.wire.borrow_mut();
        if wire.fail_sends {
            return Err(SessionError::Send("broken pipe".to_string()));
        }
        wire.sent.push(text);
        Ok(())
    }

    fn close(&mut self) {
        self.wire.borrow_mut().closed_locally = true;
    }
}
