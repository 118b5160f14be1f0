//! # Multicast Transport
//!
//! The thin layer between encoded frames and the wire: a shared UDP socket
//! handle plus the group address every frame is sent to.
//!
//! ## Delivery model
//!
//! Best-effort only. Sends block on the socket buffer, errors propagate
//! unchanged, and nothing is retried - a lost frame is superseded by the
//! next refresh broadcast.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::Arc;

use crate::error::{NetError, NetResult};

/// Counters for the traffic through one link.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkStats {
    /// Frames the socket accepted.
    pub frames_sent: u64,
    /// Bytes the socket accepted.
    pub bytes_sent: u64,
    /// Sends the socket refused.
    pub send_errors: u64,
}

/// A bound broadcast destination.
///
/// The socket is shared, not owned: the link holds a handle to a socket
/// opened elsewhere (or by [`McastLink::open`]) and can be rebound to a
/// rat at any time. Group membership lifecycle stays with whoever opened
/// the socket.
#[derive(Debug)]
pub struct McastLink {
    socket: Arc<UdpSocket>,
    group: SocketAddr,
    stats: LinkStats,
}

impl McastLink {
    /// Wraps an already-open socket and the group address to send to.
    #[must_use]
    pub fn new(socket: Arc<UdpSocket>, group: SocketAddr) -> Self {
        Self {
            socket,
            group,
            stats: LinkStats::default(),
        }
    }

    /// Opens a socket on `port`, joins `group`, and wraps the pair.
    ///
    /// The socket is left non-blocking so [`McastLink::recv`] can be
    /// polled from the tick loop.
    ///
    /// # Errors
    ///
    /// Whatever bind, join, or socket configuration reports.
    pub fn open(group: Ipv4Addr, port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port))?;
        socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?;
        socket.set_nonblocking(true)?;
        Ok(Self::new(
            Arc::new(socket),
            SocketAddr::from((group, port)),
        ))
    }

    /// Sends one frame to the group.
    ///
    /// Returns the transport's byte count unchanged.
    ///
    /// # Errors
    ///
    /// [`NetError::Send`] wrapping the socket error; no retry.
    pub fn send(&mut self, frame: &[u8]) -> NetResult<usize> {
        match self.socket.send_to(frame, self.group) {
            Ok(sent) => {
                self.stats.frames_sent += 1;
                self.stats.bytes_sent += sent as u64;
                Ok(sent)
            }
            Err(err) => {
                self.stats.send_errors += 1;
                Err(NetError::Send(err))
            }
        }
    }

    /// Receives one frame into `buf`, or `None` when nothing is pending.
    ///
    /// `None` covers both non-blocking would-block and a configured read
    /// timeout expiring.
    ///
    /// # Errors
    ///
    /// Any other socket error, unchanged.
    pub fn recv(&self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>> {
        match self.socket.recv_from(buf) {
            Ok((len, from)) => Ok(Some((len, from))),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// The group address frames are sent to.
    #[inline]
    #[must_use]
    pub const fn group(&self) -> SocketAddr {
        self.group
    }

    /// Traffic counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &LinkStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_pair() -> (McastLink, UdpSocket) {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver.set_nonblocking(true).unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        let link = McastLink::new(Arc::new(sender), receiver.local_addr().unwrap());
        (link, receiver)
    }

    #[test]
    fn test_send_counts_traffic() {
        let (mut link, receiver) = loopback_pair();
        assert_eq!(link.send(b"hello").unwrap(), 5);
        assert_eq!(link.send(b"rat").unwrap(), 3);

        let stats = link.stats();
        assert_eq!(stats.frames_sent, 2);
        assert_eq!(stats.bytes_sent, 8);
        assert_eq!(stats.send_errors, 0);

        // Give loopback a moment, then both frames should be waiting.
        std::thread::sleep(std::time::Duration::from_millis(20));
        let mut buf = [0u8; 16];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"hello");
    }

    #[test]
    fn test_recv_reports_empty_queue_as_none() {
        let (link, _receiver) = loopback_pair();
        // The link's own socket is blocking by default; make it pollable.
        link.socket.set_nonblocking(true).unwrap();
        let mut buf = [0u8; 16];
        assert!(link.recv(&mut buf).unwrap().is_none());
    }
}
