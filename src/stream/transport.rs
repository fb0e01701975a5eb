// Session transport
//
// Poll-based WebSocket client: the TCP connect and the HTTP upgrade block,
// bounded by timeouts, then the socket is switched to non-blocking so each
// poll drains only what is already there.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tungstenite::client::{client, IntoClientRequest};
use tungstenite::{Message, WebSocket};

use super::SessionError;

/// Upper bound for the TCP connect and for each handshake read or write
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(3);

/// Port used when the endpoint URL carries none
const DEFAULT_WS_PORT: u16 = 80;

/// Message pipe under a session
pub trait Transport {
    /// Next pending text frame, `Ok(None)` when nothing is waiting
    ///
    /// `Err(SessionError::Closed)` means the remote ended the session.
    fn try_recv(&mut self) -> Result<Option<String>, SessionError>;

    fn send_text(&mut self, text: String) -> Result<(), SessionError>;

    fn close(&mut self);
}

fn would_block(err: &tungstenite::Error) -> bool {
    matches!(err, tungstenite::Error::Io(e) if e.kind() == ErrorKind::WouldBlock)
}

/// Try each resolved address in turn until one accepts within `timeout`
fn connect_tcp(addrs: &[SocketAddr], timeout: Duration) -> std::io::Result<TcpStream> {
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(ErrorKind::AddrNotAvailable, "no address for host")
    }))
}

/// WebSocket transport over a plain TCP stream
pub struct WsTransport {
    socket: WebSocket<TcpStream>,
}

impl WsTransport {
    pub fn connect(endpoint: &str) -> Result<Self, SessionError> {
        Self::connect_with_timeout(endpoint, HANDSHAKE_TIMEOUT)
    }

    /// Connect and upgrade, giving up once `timeout` passes without progress
    pub fn connect_with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, SessionError> {
        let connect_err = |reason: String| SessionError::Connect {
            endpoint: endpoint.to_string(),
            reason,
        };

        let request = endpoint
            .into_client_request()
            .map_err(|e| connect_err(e.to_string()))?;
        let host = request
            .uri()
            .host()
            .ok_or_else(|| connect_err("endpoint has no host".to_string()))?
            .to_string();
        let port = request.uri().port_u16().unwrap_or(DEFAULT_WS_PORT);

        let addrs: Vec<SocketAddr> = (host.as_str(), port)
            .to_socket_addrs()
            .map_err(|e| connect_err(e.to_string()))?
            .collect();
        let stream = connect_tcp(&addrs, timeout)
            .map_err(|e| connect_err(e.to_string()))?;

        stream
            .set_read_timeout(Some(timeout))
            .and_then(|()| stream.set_write_timeout(Some(timeout)))
            .map_err(|e| connect_err(e.to_string()))?;

        let (socket, _response) = client(request, stream)
            .map_err(|e| connect_err(e.to_string()))?;

        socket
            .get_ref()
            .set_nonblocking(true)
            .map_err(|e| connect_err(e.to_string()))?;

        tracing::debug!(endpoint, "WebSocket handshake complete");
        Ok(Self { socket })
    }
}

impl Transport for WsTransport {
    fn try_recv(&mut self) -> Result<Option<String>, SessionError> {
        // Push out anything a previous non-blocking send left queued
        match self.socket.flush() {
            Ok(()) => {}
            Err(ref e) if would_block(e) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                return Err(SessionError::Closed)
            }
            Err(e) => return Err(SessionError::Send(e.to_string())),
        }

        loop {
            match self.socket.read() {
                Ok(Message::Text(text)) => return Ok(Some(text)),
                Ok(Message::Binary(data)) => {
                    return Ok(Some(String::from_utf8_lossy(&data).into_owned()))
                }
                Ok(Message::Close(_)) => return Err(SessionError::Closed),
                // Ping/Pong: tungstenite answers pings on the next write
                Ok(_) => continue,
                Err(ref e) if would_block(e) => return Ok(None),
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    return Err(SessionError::Closed)
                }
                Err(e) => return Err(SessionError::Receive(e.to_string())),
            }
        }
    }

    fn send_text(&mut self, text: String) -> Result<(), SessionError> {
        match self.socket.send(Message::Text(text)) {
            Ok(()) => Ok(()),
            // Frame is queued and goes out on the next flush
            Err(ref e) if would_block(e) => Ok(()),
            Err(e) => Err(SessionError::Send(e.to_string())),
        }
    }

    fn close(&mut self) {
        let _ = self.socket.close(None);
        let _ = self.socket.flush();
    }
}
