//! One authenticated TCP connection's lifetime.
//!
//! A [`Session`] owns exactly one connection and walks it through
//!
//! ```text
//! Disconnected → Connecting → Authenticating → Ready → (Executing ⇄ Ready)* → Closed
//! ```
//!
//! with `Errored` as a terminal state reachable from any non-terminal one.
//! Sessions are not reused across logical operations: the facade opens a
//! fresh one per command and closes it on every exit path.
//!
//! # Response aggregation
//!
//! The protocol has no end-of-response marker, and one logical response may
//! arrive as several frames. The session therefore reads the first reply
//! frame under the overall timeout, then keeps reading under a much shorter
//! *settle* window; when that window expires with no new frame, the response
//! is considered complete. This is a heuristic, not a protocol guarantee: it
//! trades a small fixed latency per command (waiting out the settle window)
//! for correctness on multi-frame responses. The window is a config knob
//! (`settle_timeout_ms`), not a constant.

use std::time::Duration;

use rcon_core::{
    decode_payload, decode_size, encode_packet, Packet, PacketKind, ProtocolError,
    AUTH_FAILURE_ID, AUTH_REQUEST_ID,
};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

/// Errors that can occur over a session's lifetime.
#[derive(Debug, Error)]
pub enum SessionError {
    /// TCP connect failed or timed out: refused, unreachable, DNS failure.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte stream violated the framing rules.
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    /// The server sent nothing in reply to the auth frame.
    #[error("no auth response from server")]
    NoAuthResponse,

    /// The server rejected the credential (reply frame with `id == -1`).
    #[error("RCON authentication failed (wrong password)")]
    AuthenticationFailed,

    /// No command reply and no connection closure within the overall
    /// timeout. Distinct from the settle-window expiry that normally ends a
    /// successful multi-frame read.
    #[error("no command response within the overall timeout")]
    CommandTimeout,

    /// A command was issued while the session was not in the `Ready` state.
    #[error("session is {0:?}, not ready for commands")]
    NotReady(SessionState),
}

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Authenticating,
    Ready,
    Executing,
    Closed,
    Errored,
}

/// One TCP connection to the game server.
#[derive(Debug)]
pub struct Session {
    stream: Option<TcpStream>,
    state: SessionState,
    overall_timeout: Duration,
    settle_timeout: Duration,
    /// Fresh id per command frame. Starts above [`AUTH_REQUEST_ID`]; only
    /// one command is ever in flight, so the scheme is not load-bearing.
    next_exec_id: i32,
}

impl Session {
    /// Opens a TCP connection under the overall timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Connect`] on refusal, unreachability, DNS
    /// failure, or timeout.
    pub async fn connect(
        addr: &str,
        overall_timeout: Duration,
        settle_timeout: Duration,
    ) -> Result<Self, SessionError> {
        trace!(addr, "state Disconnected → Connecting");
        let stream = match timeout(overall_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(SessionError::Connect {
                    addr: addr.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(SessionError::Connect {
                    addr: addr.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out"),
                })
            }
        };
        debug!(addr, "connected");

        Ok(Self {
            stream: Some(stream),
            state: SessionState::Connecting,
            overall_timeout,
            settle_timeout,
            next_exec_id: AUTH_REQUEST_ID + 1,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Sends the credential and reads exactly one reply frame.
    ///
    /// A reply with `id == -1` means the credential was rejected — the
    /// protocol's sole failure signal; the reply body carries nothing
    /// useful. Any other id is success.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoAuthResponse`] if no frame arrives (or the peer
    /// closes) within the overall timeout; [`SessionError::AuthenticationFailed`]
    /// on rejection. The session is terminal after any failure.
    pub async fn authenticate(&mut self, credential: &str) -> Result<(), SessionError> {
        trace!("state Connecting → Authenticating");
        self.state = SessionState::Authenticating;

        let frame = encode_packet(AUTH_REQUEST_ID, PacketKind::Auth, credential);
        let overall = self.overall_timeout;
        let stream = self.stream_mut()?;
        if let Err(e) = stream.write_all(&frame).await {
            self.state = SessionState::Errored;
            return Err(SessionError::Io(e));
        }

        let read = timeout(overall, Self::read_frame(stream)).await;
        let reply = match read {
            Ok(Ok(Some(packet))) => packet,
            Ok(Ok(None)) | Err(_) => {
                self.state = SessionState::Errored;
                return Err(SessionError::NoAuthResponse);
            }
            Ok(Err(e)) => {
                self.state = SessionState::Errored;
                return Err(e);
            }
        };

        if reply.id == AUTH_FAILURE_ID {
            warn!("authentication rejected by server");
            self.state = SessionState::Closed;
            return Err(SessionError::AuthenticationFailed);
        }

        trace!(reply_id = reply.id, "state Authenticating → Ready");
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Sends one command frame and aggregates the reply frames.
    ///
    /// The first reply frame is awaited under the overall timeout; further
    /// frames under the settle window, whose expiry is the normal end of
    /// the response, not an error. A clean close by the peer also ends
    /// aggregation. A framing violation mid-stream ends aggregation with
    /// whatever text accumulated and leaves the session `Errored` (the
    /// connection is dead either way).
    ///
    /// Returns the trimmed concatenation of all reply bodies in arrival
    /// order.
    ///
    /// # Errors
    ///
    /// [`SessionError::CommandTimeout`] if the server neither replies nor
    /// closes within the overall timeout; [`SessionError::Io`] on a reset
    /// or other socket failure.
    pub async fn execute(&mut self, command: &str) -> Result<String, SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NotReady(self.state));
        }
        trace!(command, "state Ready → Executing");
        self.state = SessionState::Executing;

        let id = self.next_exec_id;
        self.next_exec_id = self.next_exec_id.wrapping_add(1);

        let frame = encode_packet(id, PacketKind::Exec, command);
        let overall = self.overall_timeout;
        let settle = self.settle_timeout;
        let stream = self.stream_mut()?;
        if let Err(e) = stream.write_all(&frame).await {
            self.state = SessionState::Errored;
            return Err(SessionError::Io(e));
        }

        let mut body = String::new();
        let mut first = true;
        loop {
            let window = if first { overall } else { settle };
            let stream = self.stream_mut()?;
            let read = timeout(window, Self::read_frame(stream)).await;
            match read {
                // Settle window expired: the response is complete.
                Err(_) if !first => break,
                // Nothing at all within the overall timeout, peer still open.
                Err(_) => {
                    self.state = SessionState::Errored;
                    return Err(SessionError::CommandTimeout);
                }
                Ok(Ok(Some(packet))) => {
                    trace!(id = packet.id, bytes = packet.body.len(), "response frame");
                    body.push_str(&packet.body);
                    first = false;
                }
                // Peer closed cleanly: the response is complete.
                Ok(Ok(None)) => break,
                Ok(Err(SessionError::Protocol(e))) => {
                    warn!(error = %e, "framing violation mid-response, keeping partial text");
                    self.state = SessionState::Errored;
                    break;
                }
                Ok(Err(e)) => {
                    self.state = SessionState::Errored;
                    return Err(e);
                }
            }
        }

        if self.state == SessionState::Executing {
            trace!("state Executing → Ready");
            self.state = SessionState::Ready;
        }
        Ok(body.trim().to_string())
    }

    /// Closes the connection. Idempotent; safe on every exit path.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
            trace!("connection closed");
        }
        if self.state != SessionState::Errored {
            self.state = SessionState::Closed;
        }
    }

    fn stream_mut(&mut self) -> Result<&mut TcpStream, SessionError> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream),
            None => Err(SessionError::NotReady(self.state)),
        }
    }

    /// Reads one frame: the 4-byte size prefix, then exactly that many
    /// payload bytes. Returns `Ok(None)` if the peer closed the stream on a
    /// frame boundary.
    async fn read_frame(stream: &mut TcpStream) -> Result<Option<Packet>, SessionError> {
        let mut prefix = [0u8; 4];
        let got = read_until_full(stream, &mut prefix).await?;
        if got == 0 {
            return Ok(None);
        }
        let size = decode_size(&prefix[..got])?;

        let mut payload = vec![0u8; size];
        let got = read_until_full(stream, &mut payload).await?;
        if got < size {
            return Err(ProtocolError::TruncatedFrame {
                declared: size,
                available: got,
            }
            .into());
        }

        Ok(Some(decode_payload(&payload)?))
    }
}

impl Drop for Session {
    /// Dropping the owned `TcpStream` closes the descriptor, so abandoning
    /// a session (caller-side cancellation) cannot leak a socket.
    fn drop(&mut self) {
        self.stream.take();
    }
}

/// Reads into `buf` until it is full or the stream ends. Returns the number
/// of bytes actually read.
async fn read_until_full(stream: &mut TcpStream, buf: &mut [u8]) -> Result<usize, std::io::Error> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = stream.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Duration = Duration::from_millis(300);
    const SETTLE: Duration = Duration::from_millis(100);

    #[test]
    fn test_connect_refused_is_connect_error() {
        // Port 1 on loopback refuses immediately on any sane test host.
        let result = tokio_test::block_on(Session::connect("127.0.0.1:1", FAST, SETTLE));
        match result {
            Err(SessionError::Connect { addr, .. }) => assert_eq!(addr, "127.0.0.1:1"),
            other => panic!("expected Connect error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let mut session = Session::connect(&addr, FAST, SETTLE).await.unwrap();
        session.close().await;
        session.close().await;
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_execute_before_authenticate_is_not_ready() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let mut session = Session::connect(&addr, FAST, SETTLE).await.unwrap();
        let result = session.execute("status").await;
        assert!(matches!(result, Err(SessionError::NotReady(_))));
        session.close().await;
    }

    #[tokio::test]
    async fn test_authenticate_against_silent_server_is_no_auth_response() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        // Accept but never reply.
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let mut session = Session::connect(&addr, FAST, SETTLE).await.unwrap();
        let result = session.authenticate("secret").await;
        assert!(matches!(result, Err(SessionError::NoAuthResponse)));
        session.close().await;
    }
}
