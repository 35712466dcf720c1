//! # rcon-core
//!
//! Shared library for RCON-Admin containing the wire codec for the Source
//! remote console protocol and the pure command-composition helpers used by
//! the client facade.
//!
//! This crate is used by the client application and by any alternative front
//! end (chat bot, web panel). It has zero dependencies on sockets, async
//! runtimes, or OS APIs: everything here is a pure function over bytes and
//! strings, which keeps the codec trivially testable.
//!
//! The crate defines:
//!
//! - **`protocol`** – How bytes travel over the wire. Each message is one
//!   length-prefixed little-endian frame (`size`, `id`, `type`, UTF-8 body,
//!   two NUL terminators) encoded into a byte vector and decoded back into
//!   a typed [`Packet`] on the other end.
//!
//! - **`command`** – Command-string composition: map changes, mode chains
//!   with workshop-map rewriting, player kicks, and the fixed bot priming
//!   sequence. These are shared between the facade and its tests so the
//!   exact text sent to the server is asserted in one place.

pub mod command;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `rcon_core::Packet` instead of `rcon_core::protocol::packet::Packet`.
pub use protocol::codec::{decode_payload, decode_size, encode_packet, ProtocolError};
pub use protocol::packet::{Packet, PacketKind, AUTH_FAILURE_ID, AUTH_REQUEST_ID};
