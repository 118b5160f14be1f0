//! # MAZERAT Networking
//!
//! The player entity ("rat") and the broadcast protocol that keeps every
//! peer's view of it synchronized over an unreliable multicast transport.
//!
//! ## Consistency model
//!
//! There is no server and no acknowledgment. Every rat broadcasts its own
//! state: immediately on every change (move, turn, fire, missile motion),
//! and periodically from two independent refresh timers so peers that
//! missed an edge converge anyway. Lost packets are simply superseded by
//! the next refresh.
//!
//! ## Layers
//!
//! - [`protocol`] - the wire contract: packed position/direction field,
//!   fixed packet layouts, little-endian codec. Pure, no I/O.
//! - [`transport`] - the multicast link: a shared UDP socket plus group
//!   address, best-effort sends.
//! - [`rat`] - the entity state machine driving both.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mazerat_core::{Direction, Maze};
//! use mazerat_networking::{McastLink, Rat};
//!
//! let mut rat = Rat::new(1, 1, Direction::North, "whiskers", &mut rng)?;
//! rat.attach_link(McastLink::open("239.255.42.99".parse()?, 7878)?);
//! rat.fire(&maze)?;
//! loop {
//!     rat.update(&maze, &mut canvas)?; // once per game frame
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod protocol;
pub mod rat;
pub mod transport;

// Re-exports for convenience
pub use error::{NetError, NetResult, RatError};
pub use protocol::{
    NamePacket, Packet, PacketHeader, PacketKind, ProtocolError, StatePacket, MISSILE_NONE,
    NICKNAME_LEN,
};
pub use rat::{FireOutcome, Rat, Timings};
pub use transport::{LinkStats, McastLink};
