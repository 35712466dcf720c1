//! Frame model for the Source remote console protocol.
//!
//! Wire format (all integers little-endian, over plain TCP):
//!
//! ```text
//! [size:4][id:4][type:4][body:size-10][0x00][0x00]
//! size = 4 (id) + 4 (type) + len(body) + 2 (terminators)
//! ```
//!
//! Note the `size` prefix itself is not counted in `size`, so a frame with
//! an empty body declares `size = 10` and occupies 14 bytes on the wire.

// ── Protocol constants ────────────────────────────────────────────────────────

/// The `id` every authentication request carries.
pub const AUTH_REQUEST_ID: i32 = 1;

/// The `id` the server echoes back when the credential was rejected.
///
/// This is the protocol's *only* authentication failure signal; the body of
/// the reply carries no distinguishing text.
pub const AUTH_FAILURE_ID: i32 = -1;

/// Byte length of the `id` and `type` fields together.
pub const FIELDS_SIZE: usize = 8;

/// Byte length of the two trailing NUL terminators.
pub const TERMINATOR_SIZE: usize = 2;

/// Smallest legal value of the declared `size` field (empty body).
pub const MIN_DECLARED_SIZE: i32 = (FIELDS_SIZE + TERMINATOR_SIZE) as i32;

// ── Frame kind ────────────────────────────────────────────────────────────────

/// Frame type codes defined by the protocol.
///
/// Wire value 2 is overloaded: it means *command request* when the client
/// sends it and *auth response* when the server does. The two cannot be told
/// apart from the field alone, so decoding keeps the raw `i32` on
/// [`Packet`] and the session interprets it from what it is waiting for
/// (pending auth vs. pending command).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PacketKind {
    /// Client → server credential check (`SERVERDATA_AUTH`).
    Auth = 3,
    /// Client → server command request (`SERVERDATA_EXECCOMMAND`); the same
    /// wire value doubles as the server's auth reply.
    Exec = 2,
    /// Server → client command output (`SERVERDATA_RESPONSE_VALUE`).
    ResponseValue = 0,
}

impl PacketKind {
    /// The `i32` written into the frame's `type` field.
    pub fn wire_value(self) -> i32 {
        self as i32
    }
}

// ── Packet ────────────────────────────────────────────────────────────────────

/// One decoded frame.
///
/// `kind` is kept as the raw wire integer rather than a [`PacketKind`]
/// because the server side of the type space is ambiguous (see
/// [`PacketKind`]) and because tolerating unknown values costs nothing: the
/// session only ever branches on `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Correlation token chosen by the sender.
    pub id: i32,
    /// Raw `type` field value.
    pub kind: i32,
    /// Body text, replacement-decoded from whatever bytes the server sent.
    pub body: String,
}

impl Packet {
    /// Declared `size` field for a frame carrying `body`.
    pub fn declared_size(body: &str) -> i32 {
        (FIELDS_SIZE + body.len() + TERMINATOR_SIZE) as i32
    }
}
