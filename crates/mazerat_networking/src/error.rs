//! # Networking Error Types
//!
//! All errors surfaced by entity construction and packet transmission.
//! Policy rejections (firing twice, firing into a wall) are not errors -
//! they are ordinary [`FireOutcome`](crate::rat::FireOutcome) values.

use std::io;

use thiserror::Error;

/// Errors surfaced by packet transmission.
#[derive(Error, Debug)]
pub enum NetError {
    /// A transmit was attempted before any multicast link was attached.
    ///
    /// Attaching the link is part of bring-up; hitting this in a running
    /// game is a driver bug.
    #[error("no multicast link attached")]
    LinkNotAttached,

    /// The underlying socket refused the send. The io error is passed
    /// through unchanged; no retry is attempted.
    #[error("send failed: {0}")]
    Send(#[from] io::Error),
}

/// Result alias for networking operations.
pub type NetResult<T> = Result<T, NetError>;

/// Rejections at rat construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RatError {
    /// The nickname cannot fit the fixed wire field. Rejected up front so
    /// a constructed rat's name is always transmittable verbatim.
    #[error("nickname too long: {len} bytes, wire field holds {max}")]
    NameTooLong {
        /// Byte length of the rejected nickname.
        len: usize,
        /// Maximum byte length the wire field can carry.
        max: usize,
    },
}
