// Telemetry session module
//
// One session per view: open once, poll on every loop turn, close at
// teardown. There is no reconnect; a disconnected session stays
// disconnected. The session owns the brain state and the event log and
// notifies subscribers synchronously when either the status or the brain
// state changes.

pub mod event_log;
pub mod protocol;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use event_log::{EventKind, EventLog, StreamEvent};
pub use protocol::{BrainState, InboundMessage, MessageKind};
pub use transport::{Transport, WsTransport};

use thiserror::Error;

/// Errors raised below the session; none of them escape it
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot connect to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("connection closed by remote")]
    Closed,

    #[error("receive failed: {0}")]
    Receive(String),

    #[error("send failed: {0}")]
    Send(String),
}

/// Lifecycle of a session: Idle -> Connected -> Disconnected, or
/// Idle -> Disconnected when the handshake fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Connected,
    /// Terminal
    Disconnected,
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Connected => "connected",
            SessionStatus::Disconnected => "disconnected",
        }
    }
}

/// Change delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionNotice<'a> {
    StatusChanged(SessionStatus),
    BrainStateChanged(&'a BrainState),
}

pub type Subscriber = Box<dyn FnMut(&SessionNotice<'_>)>;

/// Build the proxy endpoint for an upstream port
pub fn endpoint_url(host: &str, port: u16) -> String {
    format!("ws://{}/proxy/{}", host, port)
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub endpoint: String,
    /// Decode `state` messages into the brain state instead of dropping them
    pub accept_state_messages: bool,
    pub event_capacity: usize,
}

/// Live connection to the telemetry proxy
pub struct Session {
    config: SessionConfig,
    status: SessionStatus,
    transport: Option<Box<dyn Transport>>,
    brain: BrainState,
    events: EventLog,
    subscribers: Vec<Subscriber>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let events = EventLog::with_capacity(config.event_capacity);
        Self {
            config,
            status: SessionStatus::Idle,
            transport: None,
            brain: BrainState::initial(),
            events,
            subscribers: Vec::new(),
        }
    }

    /// Register an observer for status and brain-state changes
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Connect to the configured endpoint over WebSocket
    pub fn open(&mut self) {
        self.open_with(|endpoint| {
            let transport = WsTransport::connect(endpoint)?;
            Ok(Box::new(transport) as Box<dyn Transport>)
        });
    }

    /// Connect with a caller-supplied connector
    ///
    /// Only an idle session can be opened. A failed connect leaves the
    /// session disconnected for good.
    pub fn open_with<F>(&mut self, connect: F)
    where
        F: FnOnce(&str) -> Result<Box<dyn Transport>, SessionError>,
    {
        if self.status != SessionStatus::Idle {
            tracing::warn!(
                status = self.status.label(),
                "Session already opened; ignoring"
            );
            return;
        }

        match connect(&self.config.endpoint) {
            Ok(transport) => {
                self.transport = Some(transport);
                self.set_status(SessionStatus::Connected);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    endpoint = %self.config.endpoint,
                    "Session could not be established"
                );
                self.set_status(SessionStatus::Disconnected);
            }
        }
    }

    /// Handle every message already waiting on the transport
    ///
    /// Each message is handled on its own: a burst of N state-bearing
    /// messages yields N subscriber notifications. Returns the number of
    /// frames read.
    pub fn poll(&mut self) -> usize {
        let mut received = 0;

        loop {
            let Some(transport) = self.transport.as_mut() else {
                break;
            };

            match transport.try_recv() {
                Ok(Some(text)) => {
                    received += 1;
                    self.handle_text(&text);
                }
                Ok(None) => break,
                Err(SessionError::Closed) => {
                    tracing::info!("Session closed by remote");
                    self.terminate();
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Session transport failed");
                    self.terminate();
                    break;
                }
            }
        }

        received
    }

    fn handle_text(&mut self, text: &str) {
        let message = match InboundMessage::decode(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding malformed message");
                return;
            }
        };

        match message.kind {
            MessageKind::Log => {
                self.events
                    .push(StreamEvent::new(EventKind::Log, message.payload_text()));
            }
            MessageKind::Thought => {
                let thought = message.payload_text();
                self.brain.thought = thought.clone();
                self.events.push(StreamEvent::new(EventKind::Thought, thought));
                notify(
                    &mut self.subscribers,
                    &SessionNotice::BrainStateChanged(&self.brain),
                );
            }
            MessageKind::Chat => {
                self.events
                    .push(StreamEvent::new(EventKind::Chat, message.payload_text()));
            }
            MessageKind::State if self.config.accept_state_messages => {
                match serde_json::from_value::<BrainState>(message.payload) {
                    Ok(state) => {
                        self.brain = state;
                        notify(
                            &mut self.subscribers,
                            &SessionNotice::BrainStateChanged(&self.brain),
                        );
                    }
                    Err(e) => tracing::warn!(error = %e, "Discarding malformed state payload"),
                }
            }
            // Dropped unless state messages are opted in
            MessageKind::State => tracing::trace!("State message suppressed"),
            MessageKind::Unknown(ref kind) => tracing::trace!(kind = %kind, "Ignoring message"),
        }
    }

    /// Send operator input
    ///
    /// Only while connected; otherwise nothing is sent or logged. Returns
    /// whether the input went out.
    pub fn send(&mut self, payload: &str) -> bool {
        if self.status != SessionStatus::Connected {
            return false;
        }
        let Some(transport) = self.transport.as_mut() else {
            return false;
        };

        let encoded = match protocol::encode_input(payload) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot encode input");
                return false;
            }
        };

        match transport.send_text(encoded) {
            Ok(()) => {
                self.events.push(StreamEvent::new(EventKind::User, payload));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Input could not be sent");
                self.terminate();
                false
            }
        }
    }

    /// End the session. Safe to call more than once.
    pub fn close(&mut self) {
        self.terminate();
    }

    fn terminate(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
        }
        self.set_status(SessionStatus::Disconnected);
    }

    fn set_status(&mut self, status: SessionStatus) {
        if self.status == status {
            return;
        }
        tracing::info!(
            from = self.status.label(),
            to = status.label(),
            "Session status changed"
        );
        self.status = status;
        notify(&mut self.subscribers, &SessionNotice::StatusChanged(status));
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn brain(&self) -> &BrainState {
        &self.brain
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Whether `state` messages replace the brain state
    pub fn accepts_state(&self) -> bool {
        self.config.accept_state_messages
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

fn notify(subscribers: &mut [Subscriber], notice: &SessionNotice<'_>) {
    for subscriber in subscribers.iter_mut() {
        subscriber(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{feed, MockTransport, Wire};
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> SessionConfig {
        SessionConfig {
            endpoint: endpoint_url("localhost:5000", 9001),
            accept_state_messages: false,
            event_capacity: 50,
        }
    }

    fn connected(config: SessionConfig) -> (Session, Rc<RefCell<Wire>>) {
        let wire = Rc::new(RefCell::new(Wire::default()));
        let mut session = Session::new(config);
        let transport = MockTransport::new(Rc::clone(&wire));
        session.open_with(move |_| Ok(Box::new(transport) as Box<dyn Transport>));
        (session, wire)
    }

    fn texts(session: &Session) -> Vec<(EventKind, String)> {
        session
            .events()
            .iter()
            .map(|e| (e.kind, e.text.clone()))
            .collect()
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("example.org:5000", 9001),
            "ws://example.org:5000/proxy/9001"
        );
    }

    #[test]
    fn test_open_success_connects() {
        let (session, _wire) = connected(config());
        assert_eq!(session.status(), SessionStatus::Connected);
        assert_eq!(session.brain().thought, protocol::INITIAL_THOUGHT);
    }

    #[test]
    fn test_open_failure_is_terminal() {
        let mut session = Session::new(config());
        session.open_with(|endpoint| {
            Err(SessionError::Connect {
                endpoint: endpoint.to_string(),
                reason: "refused".to_string(),
            })
        });
        assert_eq!(session.status(), SessionStatus::Disconnected);

        // No second attempt
        let wire = Rc::new(RefCell::new(Wire::default()));
        let transport = MockTransport::new(Rc::clone(&wire));
        session.open_with(move |_| Ok(Box::new(transport) as Box<dyn Transport>));
        assert_eq!(session.status(), SessionStatus::Disconnected);
    }

    #[test]
    fn test_open_passes_endpoint() {
        let mut session = Session::new(config());
        let seen = Rc::new(RefCell::new(String::new()));
        let seen_in = Rc::clone(&seen);
        session.open_with(move |endpoint| {
            *seen_in.borrow_mut() = endpoint.to_string();
            Err(SessionError::Closed)
        });
        assert_eq!(*seen.borrow(), "ws://localhost:5000/proxy/9001");
    }

    #[test]
    fn test_open_real_socket_refused() {
        // Port 1 on loopback is not listening in any sane test environment
        let mut session = Session::new(SessionConfig {
            endpoint: endpoint_url("127.0.0.1:1", 9001),
            ..config()
        });
        session.open();
        assert_eq!(session.status(), SessionStatus::Disconnected);
    }

    #[test]
    fn test_message_classification() {
        let (mut session, wire) = connected(config());
        feed(&wire, r#"{"type":"log","payload":"booting"}"#);
        feed(&wire, r#"{"type":"thought","payload":"I wonder"}"#);
        feed(&wire, r#"{"type":"chat","payload":"hello"}"#);
        feed(&wire, r#"{"type":"neural_event","event_type":"spike"}"#);

        assert_eq!(session.poll(), 4);
        assert_eq!(
            texts(&session),
            vec![
                (EventKind::Log, "booting".to_string()),
                (EventKind::Thought, "I wonder".to_string()),
                (EventKind::Chat, "hello".to_string()),
            ]
        );
        assert_eq!(session.brain().thought, "I wonder");
        assert_eq!(session.status(), SessionStatus::Connected);
    }

    #[test]
    fn test_malformed_message_is_discarded() {
        let (mut session, wire) = connected(config());
        feed(&wire, "{not json");
        feed(&wire, r#"{"type":"log","payload":"after"}"#);

        assert_eq!(session.poll(), 2);
        assert_eq!(texts(&session), vec![(EventKind::Log, "after".to_string())]);
        assert_eq!(session.status(), SessionStatus::Connected);
    }

    #[test]
    fn test_state_message_suppressed_by_default() {
        let (mut session, wire) = connected(config());
        let notices = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&notices);
        session.subscribe(Box::new(move |notice| {
            if matches!(notice, SessionNotice::BrainStateChanged(_)) {
                *counter.borrow_mut() += 1;
            }
        }));

        feed(
            &wire,
            r#"{"type":"state","payload":{"language_encoder_activity":[1.0],"thought":"hidden"}}"#,
        );
        session.poll();

        assert!(session.events().is_empty());
        assert_eq!(session.brain().thought, protocol::INITIAL_THOUGHT);
        assert!(session.brain().language_encoder_activity.is_empty());
        assert_eq!(*notices.borrow(), 0);
    }

    #[test]
    fn test_state_message_replaces_state_when_accepted() {
        let (mut session, wire) = connected(SessionConfig {
            accept_state_messages: true,
            ..config()
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        session.subscribe(Box::new(move |notice| {
            if let SessionNotice::BrainStateChanged(state) = notice {
                let activity = state.language_encoder_activity.clone();
                seen_in.borrow_mut().push(activity);
            }
        }));

        feed(
            &wire,
            r#"{"type":"state","payload":{"language_encoder_activity":[0.0,0.25,1.0],"thought":"busy"}}"#,
        );
        feed(&wire, r#"{"type":"state","payload":"not an object"}"#);
        session.poll();

        assert_eq!(*seen.borrow(), vec![vec![0.0, 0.25, 1.0]]);
        assert_eq!(session.brain().thought, "busy");
        // State messages never land in the event log
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_thought_notifies_each_message() {
        let (mut session, wire) = connected(config());
        let thoughts = Rc::new(RefCell::new(Vec::new()));
        let thoughts_in = Rc::clone(&thoughts);
        session.subscribe(Box::new(move |notice| {
            if let SessionNotice::BrainStateChanged(state) = notice {
                thoughts_in.borrow_mut().push(state.thought.clone());
            }
        }));

        for i in 0..3 {
            feed(&wire, &format!(r#"{{"type":"thought","payload":"t{i}"}}"#));
        }
        session.poll();
        assert_eq!(*thoughts.borrow(), vec!["t0", "t1", "t2"]);
    }

    #[test]
    fn test_send_while_connected() {
        let (mut session, wire) = connected(config());
        assert!(session.send("hello brain"));
        assert_eq!(
            wire.borrow().sent,
            vec![r#"{"type":"input","payload":"hello brain"}"#.to_string()]
        );
        assert_eq!(
            texts(&session),
            vec![(EventKind::User, "hello brain".to_string())]
        );
    }

    #[test]
    fn test_send_when_not_open_is_silent() {
        let mut session = Session::new(config());
        assert!(!session.send("anyone?"));
        assert!(session.events().is_empty());

        let (mut session, wire) = connected(config());
        session.close();
        assert!(!session.send("anyone?"));
        assert!(wire.borrow().sent.is_empty());
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_send_failure_disconnects() {
        let (mut session, wire) = connected(config());
        wire.borrow_mut().fail_sends = true;
        assert!(!session.send("lost"));
        assert_eq!(session.status(), SessionStatus::Disconnected);
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_remote_close_disconnects() {
        let (mut session, wire) = connected(config());
        feed(&wire, r#"{"type":"log","payload":"last words"}"#);
        wire.borrow_mut().remote_closed = true;

        assert_eq!(session.poll(), 1);
        assert_eq!(session.status(), SessionStatus::Disconnected);
        assert!(wire.borrow().closed_locally);
        // Terminal: later polls read nothing
        feed(&wire, r#"{"type":"log","payload":"ghost"}"#);
        assert_eq!(session.poll(), 0);
        assert_eq!(session.events().len(), 1);
    }

    #[test]
    fn test_status_notifications() {
        let mut session = Session::new(config());
        let statuses = Rc::new(RefCell::new(Vec::new()));
        let statuses_in = Rc::clone(&statuses);
        session.subscribe(Box::new(move |notice| {
            if let SessionNotice::StatusChanged(status) = notice {
                statuses_in.borrow_mut().push(*status);
            }
        }));

        let wire = Rc::new(RefCell::new(Wire::default()));
        let transport = MockTransport::new(Rc::clone(&wire));
        session.open_with(move |_| Ok(Box::new(transport) as Box<dyn Transport>));
        session.close();
        session.close();

        assert_eq!(
            *statuses.borrow(),
            vec![SessionStatus::Connected, SessionStatus::Disconnected]
        );
        assert!(wire.borrow().closed_locally);
    }

    #[test]
    fn test_drop_closes_transport() {
        let (session, wire) = connected(config());
        drop(session);
        assert!(wire.borrow().closed_locally);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// However many messages arrive, the log holds at most 50 and they
        /// are the most recent ones in arrival order
        #[test]
        fn prop_event_log_bounded(count in 0usize..200) {
            let (mut session, wire) = connected(config());
            for i in 0..count {
                feed(&wire, &format!(r#"{{"type":"chat","payload":"m{i}"}}"#));
            }
            session.poll();

            prop_assert!(session.events().len() <= 50);
            let expected: Vec<String> = (count.saturating_sub(50)..count)
                .map(|i| format!("m{}", i))
                .collect();
            let actual: Vec<String> = session.events().iter().map(|e| e.text.clone()).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
