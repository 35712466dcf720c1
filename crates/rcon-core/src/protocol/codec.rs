//! Binary codec for encoding and decoding remote console frames.
//!
//! The codec is split at the same seam the stream is read at: the caller
//! first reads the 4-byte size prefix and passes it to [`decode_size`], then
//! reads exactly that many bytes and passes them to [`decode_payload`]. This
//! keeps all socket handling out of this crate.

use crate::protocol::packet::{
    Packet, PacketKind, FIELDS_SIZE, MIN_DECLARED_SIZE, TERMINATOR_SIZE,
};
use thiserror::Error;

/// Errors that can occur while framing or de-framing a byte stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The size prefix was unreadable or declared an impossible frame size.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// The stream ended before the declared number of payload bytes arrived.
    /// The connection must be treated as dead.
    #[error("truncated frame: declared {declared} payload bytes, got {available}")]
    TruncatedFrame { declared: usize, available: usize },
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Encodes an `(id, kind, body)` triple into one wire frame.
///
/// The body may be any UTF-8 text; protocol-specific escaping (quoting
/// arguments containing spaces and the like) is the caller's concern.
///
/// # Examples
///
/// ```rust
/// use rcon_core::{encode_packet, PacketKind};
///
/// let bytes = encode_packet(1, PacketKind::Auth, "secret");
/// // size = 4 + 4 + 6 + 2 = 16, little-endian in the first four bytes
/// assert_eq!(&bytes[0..4], &16i32.to_le_bytes());
/// assert_eq!(bytes.len(), 20);
/// ```
pub fn encode_packet(id: i32, kind: PacketKind, body: &str) -> Vec<u8> {
    let body_bytes = body.as_bytes();
    let size = Packet::declared_size(body);

    let mut buf = Vec::with_capacity(4 + size as usize);
    buf.extend_from_slice(&size.to_le_bytes());
    buf.extend_from_slice(&id.to_le_bytes());
    buf.extend_from_slice(&kind.wire_value().to_le_bytes());
    buf.extend_from_slice(body_bytes);
    buf.push(0x00);
    buf.push(0x00);
    buf
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Decodes the 4-byte size prefix into the declared payload length.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedFrame`] if fewer than four bytes are
/// available (the stream closed mid-header) or if the declared size is below
/// the 10-byte minimum a legal frame requires.
pub fn decode_size(bytes: &[u8]) -> Result<usize, ProtocolError> {
    if bytes.len() < 4 {
        return Err(ProtocolError::MalformedFrame(format!(
            "size prefix needs 4 bytes, got {}",
            bytes.len()
        )));
    }
    let size = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if size < MIN_DECLARED_SIZE {
        return Err(ProtocolError::MalformedFrame(format!(
            "declared size {size} below minimum {MIN_DECLARED_SIZE}"
        )));
    }
    Ok(size as usize)
}

/// Decodes the `size` bytes that follow the prefix into a [`Packet`].
///
/// The trailing two bytes are the NUL terminators and are stripped, not
/// interpreted. Everything between the first eight bytes and the last two is
/// decoded as UTF-8 with invalid sequences replaced, so game-server text
/// that is not valid UTF-8 never fails the decode.
///
/// # Errors
///
/// Returns [`ProtocolError::TruncatedFrame`] if `bytes` is shorter than the
/// declared size implied (caller passed what it managed to read before the
/// peer closed).
pub fn decode_payload(bytes: &[u8]) -> Result<Packet, ProtocolError> {
    if bytes.len() < FIELDS_SIZE + TERMINATOR_SIZE {
        return Err(ProtocolError::TruncatedFrame {
            declared: FIELDS_SIZE + TERMINATOR_SIZE,
            available: bytes.len(),
        });
    }

    let id = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let kind = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let body = String::from_utf8_lossy(&bytes[FIELDS_SIZE..bytes.len() - TERMINATOR_SIZE])
        .into_owned();

    Ok(Packet { id, kind, body })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::packet::{AUTH_FAILURE_ID, AUTH_REQUEST_ID};

    fn round_trip(id: i32, kind: PacketKind, body: &str) -> Packet {
        let encoded = encode_packet(id, kind, body);
        let size = decode_size(&encoded[..4]).expect("size decode failed");
        assert_eq!(size, encoded.len() - 4, "size field must cover the payload");
        decode_payload(&encoded[4..]).expect("payload decode failed")
    }

    #[test]
    fn test_auth_frame_round_trip() {
        let p = round_trip(AUTH_REQUEST_ID, PacketKind::Auth, "hunter2");
        assert_eq!(p.id, AUTH_REQUEST_ID);
        assert_eq!(p.kind, 3);
        assert_eq!(p.body, "hunter2");
    }

    #[test]
    fn test_exec_frame_round_trip() {
        let p = round_trip(7, PacketKind::Exec, "changelevel de_mirage");
        assert_eq!(p.id, 7);
        assert_eq!(p.kind, 2);
        assert_eq!(p.body, "changelevel de_mirage");
    }

    #[test]
    fn test_empty_body_round_trip() {
        let p = round_trip(2, PacketKind::Exec, "");
        assert_eq!(p.body, "");
    }

    #[test]
    fn test_negative_id_round_trip() {
        let p = round_trip(AUTH_FAILURE_ID, PacketKind::ResponseValue, "");
        assert_eq!(p.id, -1);
    }

    #[test]
    fn test_multibyte_body_round_trip() {
        let p = round_trip(3, PacketKind::Exec, "say Привет");
        assert_eq!(p.body, "say Привет");
    }

    #[test]
    fn test_encoded_layout_is_little_endian() {
        let bytes = encode_packet(1, PacketKind::Auth, "ab");
        // size = 4 + 4 + 2 + 2 = 12
        assert_eq!(&bytes[0..4], &12i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &1i32.to_le_bytes());
        assert_eq!(&bytes[8..12], &3i32.to_le_bytes());
        assert_eq!(&bytes[12..14], b"ab");
        assert_eq!(&bytes[14..16], &[0x00, 0x00]);
    }

    #[test]
    fn test_decode_size_short_header_is_malformed() {
        let result = decode_size(&[0x0A, 0x00]);
        assert!(matches!(result, Err(ProtocolError::MalformedFrame(_))));
    }

    #[test]
    fn test_decode_size_below_minimum_is_malformed() {
        let result = decode_size(&4i32.to_le_bytes());
        assert!(matches!(result, Err(ProtocolError::MalformedFrame(_))));
    }

    #[test]
    fn test_decode_size_negative_is_malformed() {
        let result = decode_size(&(-1i32).to_le_bytes());
        assert!(matches!(result, Err(ProtocolError::MalformedFrame(_))));
    }

    #[test]
    fn test_decode_payload_truncated_stream_fails() {
        // A full frame cut off after the id field.
        let encoded = encode_packet(5, PacketKind::Exec, "status");
        let result = decode_payload(&encoded[4..9]);
        assert!(matches!(result, Err(ProtocolError::TruncatedFrame { .. })));
    }

    #[test]
    fn test_decode_payload_invalid_utf8_is_replaced() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&9i32.to_le_bytes());
        payload.extend_from_slice(&0i32.to_le_bytes());
        payload.extend_from_slice(&[0xFF, 0xFE]); // not valid UTF-8
        payload.extend_from_slice(&[0x00, 0x00]);

        let p = decode_payload(&payload).expect("lossy decode must not fail");
        assert_eq!(p.body, "\u{FFFD}\u{FFFD}");
    }
}
