//! # Wire Protocol
//!
//! The compatibility contract with every peer: the packed
//! position/direction field, the fixed packet layouts, and the
//! little-endian codec. Everything in this module is pure - no sockets,
//! no clocks.
//!
//! Any change to a bit position, a field order, or a size constant here is
//! a protocol change and breaks interoperability with deployed peers.

pub mod packets;
pub mod posdir;
pub mod wire;

pub use packets::{
    NamePacket, PacketHeader, PacketKind, StatePacket, MISSILE_NONE, NICKNAME_LEN,
};
pub use wire::{
    decode, decode_name, decode_state, encode_name, encode_state, frame_checksum, Packet,
    ProtocolError,
};
