//! Protocol module containing the frame model and the binary codec.

pub mod codec;
pub mod packet;

pub use codec::{decode_payload, decode_size, encode_packet, ProtocolError};
pub use packet::*;
