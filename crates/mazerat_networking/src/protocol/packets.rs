//! # Packet Definitions
//!
//! The two packet kinds a rat broadcasts, and the shared header carried by
//! both. All layouts are fixed-size; the byte-level encoding lives in
//! [`wire`](crate::protocol::wire).
//!
//! ## Header layout (16 bytes on the wire)
//!
//! | offset | field |
//! |---|---|
//! | 0 | descriptor byte ([`PacketKind`]) |
//! | 1..4 | reserved, must be zero |
//! | 4..12 | sender id, u64 |
//! | 12..16 | sequence number, u32 |
//!
//! The reserved bytes exist only on the wire; the in-memory types model
//! logical content and the codec writes and verifies the zeros.

use mazerat_core::RatId;

/// Fixed size of the nickname wire field, terminating NUL included.
pub const NICKNAME_LEN: usize = 32;

/// Sentinel carried in a state packet's missile field when no missile is
/// in flight.
///
/// Decodes to x = y = 0x7FFF, a cell outside any real maze, so it can
/// never collide with a live missile position.
pub const MISSILE_NONE: u32 = 0xFFFF_FFFF;

/// Wire descriptor codes distinguishing the packet kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketKind {
    /// Volatile state broadcast: position, facing, missile.
    State = 1,
    /// Display-name broadcast, sent on a longer period.
    Nickname = 2,
}

impl PacketKind {
    /// Maps a wire descriptor byte back to a kind.
    #[inline]
    #[must_use]
    pub const fn from_descriptor(descriptor: u8) -> Option<Self> {
        match descriptor {
            1 => Some(Self::State),
            2 => Some(Self::Nickname),
            _ => None,
        }
    }

    /// The wire descriptor byte.
    #[inline]
    #[must_use]
    pub const fn descriptor(self) -> u8 {
        self as u8
    }
}

/// Header present in every packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketHeader {
    /// Which packet body follows.
    pub kind: PacketKind,
    /// Identity of the sending rat.
    pub sender: RatId,
    /// Per-sender sequence number, shared by both packet kinds.
    ///
    /// Wraps at `u32::MAX`; peers treat sequence numbers modulo 2^32.
    pub seqno: u32,
}

impl PacketHeader {
    /// Encoded size: descriptor + 3 reserved bytes + sender id + seqno.
    pub const SIZE: usize = 1 + 3 + 8 + 4;

    /// Creates a new packet header.
    #[inline]
    #[must_use]
    pub const fn new(kind: PacketKind, sender: RatId, seqno: u32) -> Self {
        Self { kind, sender, seqno }
    }
}

/// State packet: everything volatile about a rat, broadcast on every
/// change and every refresh period.
///
/// The trailing 4 bytes of the encoded frame are an integrity checksum
/// computed and verified by the codec; it is frame metadata, not entity
/// state, so it does not appear here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatePacket {
    /// Shared header, descriptor [`PacketKind::State`].
    pub header: PacketHeader,
    /// The rat's packed position/direction.
    pub rat_posdir: u32,
    /// The missile's packed position/direction, or [`MISSILE_NONE`].
    pub missile_posdir: u32,
    /// Reserved for a future score field; must be zero on the wire.
    pub score: u32,
    /// Wrapping milliseconds since the sender entity was created.
    pub timestamp: u32,
}

impl StatePacket {
    /// Encoded size: header + rat posdir + missile posdir + score +
    /// timestamp + checksum.
    pub const SIZE: usize = PacketHeader::SIZE + 4 + 4 + 4 + 4 + 4;
}

/// Nickname packet: the rat's display name, broadcast on the slow period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamePacket {
    /// Shared header, descriptor [`PacketKind::Nickname`].
    pub header: PacketHeader,
    /// NUL-terminated, zero-padded name field.
    pub nickname: [u8; NICKNAME_LEN],
}

impl NamePacket {
    /// Encoded size: header + fixed nickname field.
    pub const SIZE: usize = PacketHeader::SIZE + NICKNAME_LEN;

    /// Builds the fixed nickname field: the bytes of `name` up to the wire
    /// limit, always NUL-terminated, zero-padded to full width.
    #[must_use]
    pub fn pack_nickname(name: &str) -> [u8; NICKNAME_LEN] {
        let mut field = [0u8; NICKNAME_LEN];
        let take = name.len().min(NICKNAME_LEN - 1);
        field[..take].copy_from_slice(&name.as_bytes()[..take]);
        field
    }

    /// The nickname up to its NUL terminator, lossily decoded.
    #[must_use]
    pub fn nickname_str(&self) -> String {
        let end = self
            .nickname
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NICKNAME_LEN);
        String::from_utf8_lossy(&self.nickname[..end]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::posdir;

    #[test]
    fn test_descriptor_round_trip() {
        for kind in [PacketKind::State, PacketKind::Nickname] {
            assert_eq!(PacketKind::from_descriptor(kind.descriptor()), Some(kind));
        }
        assert_eq!(PacketKind::from_descriptor(0), None);
        assert_eq!(PacketKind::from_descriptor(0xFF), None);
    }

    #[test]
    fn test_packet_sizes() {
        assert_eq!(PacketHeader::SIZE, 16);
        assert_eq!(StatePacket::SIZE, 36);
        assert_eq!(NamePacket::SIZE, 48);
    }

    #[test]
    fn test_missile_none_lands_outside_any_maze() {
        let (x, y, _) = posdir::unpack(MISSILE_NONE);
        assert_eq!((x, y), (0x7FFF, 0x7FFF));
    }

    #[test]
    fn test_nickname_field_is_nul_terminated() {
        let field = NamePacket::pack_nickname("whiskers");
        assert_eq!(&field[..8], b"whiskers");
        assert!(field[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_overlong_nickname_truncates_keeping_terminator() {
        let long = "x".repeat(100);
        let field = NamePacket::pack_nickname(&long);
        assert!(field[..NICKNAME_LEN - 1].iter().all(|&b| b == b'x'));
        assert_eq!(field[NICKNAME_LEN - 1], 0);
    }

    #[test]
    fn test_nickname_str_stops_at_terminator() {
        let pkt = NamePacket {
            header: PacketHeader::new(
                PacketKind::Nickname,
                mazerat_core::RatId::from_raw(1),
                0,
            ),
            nickname: NamePacket::pack_nickname("squeak"),
        };
        assert_eq!(pkt.nickname_str(), "squeak");
    }
}
