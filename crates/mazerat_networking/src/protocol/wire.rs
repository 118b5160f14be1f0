//! # Wire Codec
//!
//! Fixed-layout encoding for the two packet kinds.
//!
//! ## Byte order
//!
//! Every multi-byte field is little-endian on the wire, written and read
//! explicitly rather than struct-copied, so the encoding is identical on
//! every host.
//!
//! ## Integrity
//!
//! State frames end in a 32-bit checksum - the XOR of every preceding
//! little-endian word - filled in by [`encode_state`] and verified by
//! [`decode_state`]. Nickname frames carry none; a stale name is harmless
//! and the next refresh supersedes it.

use thiserror::Error;

use mazerat_core::RatId;

use super::packets::{NamePacket, PacketHeader, PacketKind, StatePacket, NICKNAME_LEN};

/// Errors produced while decoding a received frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame length does not match the layout for its kind.
    #[error("bad frame length: expected {expected} bytes, got {got}")]
    BadLength {
        /// Length the layout requires.
        expected: usize,
        /// Length actually received.
        got: usize,
    },

    /// The descriptor byte names no known packet kind.
    #[error("unknown packet descriptor {0:#04x}")]
    UnknownDescriptor(u8),

    /// The descriptor byte is valid but not the kind being decoded.
    #[error("descriptor {0:#04x} does not match the expected packet kind")]
    KindMismatch(u8),

    /// A reserved header byte was non-zero.
    #[error("reserved header bytes must be zero")]
    ReservedNotZero,

    /// The state frame failed its integrity check.
    #[error("checksum mismatch: computed {computed:#010x}, frame carries {carried:#010x}")]
    ChecksumMismatch {
        /// Checksum recomputed from the received bytes.
        computed: u32,
        /// Checksum the frame carried.
        carried: u32,
    },
}

/// A decoded frame of either kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Packet {
    /// State broadcast.
    State(StatePacket),
    /// Nickname broadcast.
    Name(NamePacket),
}

/// Scratch buffer size, sized for the larger (nickname) frame.
const MAX_FRAME: usize = NamePacket::SIZE;

/// Positional writer over a zeroed scratch buffer.
///
/// Frame sizes are compile-time constants, so the offsets below can never
/// leave the buffer; there is no runtime capacity signalling.
struct WireWriter {
    buf: [u8; MAX_FRAME],
    at: usize,
}

impl WireWriter {
    const fn new() -> Self {
        Self {
            buf: [0; MAX_FRAME],
            at: 0,
        }
    }

    fn put_u8(&mut self, value: u8) {
        self.buf[self.at] = value;
        self.at += 1;
    }

    /// Skips over bytes that must stay zero (the buffer starts zeroed).
    fn put_zeros(&mut self, count: usize) {
        self.at += count;
    }

    fn put_u32(&mut self, value: u32) {
        self.buf[self.at..self.at + 4].copy_from_slice(&value.to_le_bytes());
        self.at += 4;
    }

    fn put_u64(&mut self, value: u64) {
        self.buf[self.at..self.at + 8].copy_from_slice(&value.to_le_bytes());
        self.at += 8;
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.at..self.at + bytes.len()].copy_from_slice(bytes);
        self.at += bytes.len();
    }
}

/// Positional reader over a length-validated frame.
///
/// Callers check the frame length before constructing one, so the offsets
/// never leave the slice.
struct WireReader<'a> {
    buf: &'a [u8],
    at: usize,
}

impl<'a> WireReader<'a> {
    const fn new(buf: &'a [u8]) -> Self {
        Self { buf, at: 0 }
    }

    fn take_u8(&mut self) -> u8 {
        let value = self.buf[self.at];
        self.at += 1;
        value
    }

    fn take_u32(&mut self) -> u32 {
        let value = u32::from_le_bytes([
            self.buf[self.at],
            self.buf[self.at + 1],
            self.buf[self.at + 2],
            self.buf[self.at + 3],
        ]);
        self.at += 4;
        value
    }

    fn take_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.buf[self.at..self.at + 8]);
        self.at += 8;
        u64::from_le_bytes(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buf[self.at..self.at + N]);
        self.at += N;
        bytes
    }
}

fn put_header(writer: &mut WireWriter, header: &PacketHeader) {
    writer.put_u8(header.kind.descriptor());
    writer.put_zeros(3);
    writer.put_u64(header.sender.raw());
    writer.put_u32(header.seqno);
}

fn take_header(
    reader: &mut WireReader<'_>,
    expect: PacketKind,
) -> Result<PacketHeader, ProtocolError> {
    let descriptor = reader.take_u8();
    let kind = PacketKind::from_descriptor(descriptor)
        .ok_or(ProtocolError::UnknownDescriptor(descriptor))?;
    if kind != expect {
        return Err(ProtocolError::KindMismatch(descriptor));
    }
    let reserved = [reader.take_u8(), reader.take_u8(), reader.take_u8()];
    if reserved != [0, 0, 0] {
        return Err(ProtocolError::ReservedNotZero);
    }
    let sender = RatId::from_raw(reader.take_u64());
    let seqno = reader.take_u32();
    Ok(PacketHeader::new(kind, sender, seqno))
}

/// XOR of a byte slice taken as little-endian 32-bit words.
///
/// State frames carry this over every word preceding the checksum slot.
#[must_use]
pub fn frame_checksum(bytes: &[u8]) -> u32 {
    bytes.chunks_exact(4).fold(0, |acc, word| {
        acc ^ u32::from_le_bytes([word[0], word[1], word[2], word[3]])
    })
}

/// Encodes a state packet into its fixed 36-byte frame, filling the
/// trailing checksum word.
#[must_use]
pub fn encode_state(pkt: &StatePacket) -> [u8; StatePacket::SIZE] {
    let mut writer = WireWriter::new();
    put_header(&mut writer, &pkt.header);
    writer.put_u32(pkt.rat_posdir);
    writer.put_u32(pkt.missile_posdir);
    writer.put_u32(pkt.score);
    writer.put_u32(pkt.timestamp);

    let mut frame = [0u8; StatePacket::SIZE];
    frame[..StatePacket::SIZE - 4].copy_from_slice(&writer.buf[..writer.at]);
    let sum = frame_checksum(&frame[..StatePacket::SIZE - 4]);
    frame[StatePacket::SIZE - 4..].copy_from_slice(&sum.to_le_bytes());
    frame
}

/// Decodes and verifies a state frame.
///
/// # Errors
///
/// Rejects wrong-length frames, wrong or unknown descriptors, non-zero
/// reserved bytes, and checksum mismatches.
pub fn decode_state(frame: &[u8]) -> Result<StatePacket, ProtocolError> {
    if frame.len() != StatePacket::SIZE {
        return Err(ProtocolError::BadLength {
            expected: StatePacket::SIZE,
            got: frame.len(),
        });
    }

    let body = &frame[..StatePacket::SIZE - 4];
    let computed = frame_checksum(body);
    let carried = WireReader::new(&frame[StatePacket::SIZE - 4..]).take_u32();
    if computed != carried {
        return Err(ProtocolError::ChecksumMismatch { computed, carried });
    }

    let mut reader = WireReader::new(body);
    let header = take_header(&mut reader, PacketKind::State)?;
    let rat_posdir = reader.take_u32();
    let missile_posdir = reader.take_u32();
    let score = reader.take_u32();
    let timestamp = reader.take_u32();
    Ok(StatePacket {
        header,
        rat_posdir,
        missile_posdir,
        score,
        timestamp,
    })
}

/// Encodes a nickname packet into its fixed 48-byte frame.
#[must_use]
pub fn encode_name(pkt: &NamePacket) -> [u8; NamePacket::SIZE] {
    let mut writer = WireWriter::new();
    put_header(&mut writer, &pkt.header);
    writer.put_bytes(&pkt.nickname);

    let mut frame = [0u8; NamePacket::SIZE];
    frame.copy_from_slice(&writer.buf[..writer.at]);
    frame
}

/// Decodes a nickname frame.
///
/// # Errors
///
/// Rejects wrong-length frames, wrong or unknown descriptors, and
/// non-zero reserved bytes.
pub fn decode_name(frame: &[u8]) -> Result<NamePacket, ProtocolError> {
    if frame.len() != NamePacket::SIZE {
        return Err(ProtocolError::BadLength {
            expected: NamePacket::SIZE,
            got: frame.len(),
        });
    }

    let mut reader = WireReader::new(frame);
    let header = take_header(&mut reader, PacketKind::Nickname)?;
    let nickname = reader.take_array::<NICKNAME_LEN>();
    Ok(NamePacket { header, nickname })
}

/// Decodes a frame of either kind, dispatching on the descriptor byte.
///
/// # Errors
///
/// Anything the kind-specific decoders reject, plus empty frames and
/// unknown descriptors.
pub fn decode(frame: &[u8]) -> Result<Packet, ProtocolError> {
    let descriptor = *frame.first().ok_or(ProtocolError::BadLength {
        expected: PacketHeader::SIZE,
        got: 0,
    })?;
    match PacketKind::from_descriptor(descriptor) {
        Some(PacketKind::State) => decode_state(frame).map(Packet::State),
        Some(PacketKind::Nickname) => decode_name(frame).map(Packet::Name),
        None => Err(ProtocolError::UnknownDescriptor(descriptor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::packets::MISSILE_NONE;
    use crate::protocol::posdir;
    use mazerat_core::Direction;

    fn state_pkt() -> StatePacket {
        StatePacket {
            header: PacketHeader::new(
                PacketKind::State,
                RatId::from_raw(0x1122_3344_5566_7788),
                9,
            ),
            rat_posdir: posdir::pack(2, 3, Direction::North),
            missile_posdir: MISSILE_NONE,
            score: 0,
            timestamp: 1234,
        }
    }

    fn refresh_checksum(frame: &mut [u8; StatePacket::SIZE]) {
        let sum = frame_checksum(&frame[..StatePacket::SIZE - 4]);
        frame[StatePacket::SIZE - 4..].copy_from_slice(&sum.to_le_bytes());
    }

    #[test]
    fn test_state_round_trip() {
        let pkt = state_pkt();
        assert_eq!(decode_state(&encode_state(&pkt)).unwrap(), pkt);
    }

    #[test]
    fn test_state_layout_bytes() {
        let frame = encode_state(&state_pkt());
        assert_eq!(frame.len(), StatePacket::SIZE);
        assert_eq!(frame[0], 1); // state descriptor
        assert_eq!(&frame[1..4], &[0, 0, 0]); // reserved
        assert_eq!(&frame[4..12], &0x1122_3344_5566_7788_u64.to_le_bytes());
        assert_eq!(&frame[12..16], &9_u32.to_le_bytes());
        assert_eq!(
            &frame[16..20],
            &posdir::pack(2, 3, Direction::North).to_le_bytes()
        );
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut frame = encode_state(&state_pkt());
        frame[20] ^= 0x40;
        assert!(matches!(
            decode_state(&frame),
            Err(ProtocolError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let frame = encode_state(&state_pkt());
        assert!(matches!(
            decode_state(&frame[..10]),
            Err(ProtocolError::BadLength { .. })
        ));
        assert!(matches!(decode(&[]), Err(ProtocolError::BadLength { .. })));
    }

    #[test]
    fn test_unknown_descriptor_rejected() {
        let mut frame = encode_state(&state_pkt());
        frame[0] = 0x7F;
        refresh_checksum(&mut frame);
        assert_eq!(decode(&frame), Err(ProtocolError::UnknownDescriptor(0x7F)));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        // A state-sized frame wearing the nickname descriptor is neither.
        let mut frame = encode_state(&state_pkt());
        frame[0] = PacketKind::Nickname.descriptor();
        refresh_checksum(&mut frame);
        assert_eq!(decode_state(&frame), Err(ProtocolError::KindMismatch(2)));
    }

    #[test]
    fn test_reserved_bytes_must_be_zero() {
        let mut frame = encode_state(&state_pkt());
        frame[2] = 1;
        refresh_checksum(&mut frame);
        assert_eq!(decode_state(&frame), Err(ProtocolError::ReservedNotZero));
    }

    #[test]
    fn test_name_round_trip_and_dispatch() {
        let pkt = NamePacket {
            header: PacketHeader::new(PacketKind::Nickname, RatId::from_raw(5), 0),
            nickname: NamePacket::pack_nickname("whiskers"),
        };
        let frame = encode_name(&pkt);
        assert_eq!(frame.len(), NamePacket::SIZE);
        match decode(&frame).unwrap() {
            Packet::Name(decoded) => {
                assert_eq!(decoded, pkt);
                assert_eq!(decoded.nickname_str(), "whiskers");
            }
            Packet::State(_) => panic!("expected a nickname frame"),
        }
    }
}
