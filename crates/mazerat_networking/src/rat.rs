//! # The Rat Entity
//!
//! One rat per player: position, facing, an optional missile in flight,
//! and the broadcast machinery that announces all of it to peers.
//!
//! ## Broadcast policy
//!
//! Peers learn about this rat two ways:
//!
//! - **edge-triggered** - every explicit state change (move, turn, fire,
//!   missile motion or impact) transmits a state packet immediately,
//!   bypassing the timers;
//! - **periodic refresh** - two independent countdowns re-announce state
//!   and nickname so peers that missed an edge converge anyway.
//!
//! There are no acks. A lost packet is simply superseded by the next
//! refresh, which bounds how stale any peer's view can get.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use rand::Rng;

use mazerat_core::{Canvas, Countdown, Direction, Maze, Missile, RatId};

use crate::error::{NetError, NetResult, RatError};
use crate::protocol::packets::{
    NamePacket, PacketHeader, PacketKind, StatePacket, MISSILE_NONE, NICKNAME_LEN,
};
use crate::protocol::{posdir, wire};
use crate::transport::{LinkStats, McastLink};

/// Refresh periods for the two broadcast countdowns.
#[derive(Clone, Copy, Debug)]
pub struct Timings {
    /// State packet refresh period.
    pub state_refresh: Duration,
    /// Nickname packet refresh period.
    pub name_refresh: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            state_refresh: Duration::from_millis(500),
            name_refresh: Duration::from_secs(5),
        }
    }
}

/// Result of a fire request.
///
/// The non-[`Fired`](FireOutcome::Fired) variants are ignorable no-ops,
/// not errors: nothing changed and nothing was transmitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// A missile is now in flight and peers were told.
    Fired,
    /// The previous missile is still in flight; a rat owns at most one.
    AlreadyInFlight,
    /// The cell in front of the rat is a wall; no missile was created and
    /// no shot was consumed.
    BlockedByWall,
}

/// A player's networked game entity.
///
/// The rat exclusively owns its nickname and its missile; the maze grid
/// and the multicast socket are borrowed from the caller. All methods are
/// driven from a single caller-owned tick loop - nothing here spawns
/// threads or suspends.
#[derive(Debug)]
pub struct Rat {
    id: RatId,
    x: u16,
    y: u16,
    /// Where the renderer must erase the previous sprite.
    wipe_x: u16,
    wipe_y: u16,
    dir: Direction,
    name: String,
    missile: Option<Missile>,
    link: Option<McastLink>,
    /// Consumed by every transmitted packet, both kinds; wraps at
    /// `u32::MAX`.
    seqno: u32,
    state_timer: Countdown,
    name_timer: Countdown,
    /// Only used to compute elapsed time between ticks.
    last_tick: Instant,
    /// Epoch for wire timestamps.
    born: Instant,
}

impl Rat {
    /// Maximum nickname length in bytes; the wire field keeps one byte
    /// for the terminating NUL.
    pub const MAX_NAME: usize = NICKNAME_LEN - 1;

    /// Creates a rat with default refresh timings.
    ///
    /// # Errors
    ///
    /// [`RatError::NameTooLong`] when the nickname cannot fit the wire
    /// field.
    pub fn new<R: Rng + ?Sized>(
        x: u16,
        y: u16,
        dir: Direction,
        name: &str,
        rng: &mut R,
    ) -> Result<Self, RatError> {
        Self::with_timings(x, y, dir, name, Timings::default(), rng)
    }

    /// Creates a rat with explicit refresh timings.
    ///
    /// The id is drawn from the caller's generator; both countdowns start
    /// armed; there is no missile and no link.
    ///
    /// # Errors
    ///
    /// [`RatError::NameTooLong`] when the nickname cannot fit the wire
    /// field.
    pub fn with_timings<R: Rng + ?Sized>(
        x: u16,
        y: u16,
        dir: Direction,
        name: &str,
        timings: Timings,
        rng: &mut R,
    ) -> Result<Self, RatError> {
        if name.len() > Self::MAX_NAME {
            return Err(RatError::NameTooLong {
                len: name.len(),
                max: Self::MAX_NAME,
            });
        }
        let now = Instant::now();
        Ok(Self {
            id: RatId::random(rng),
            x,
            y,
            wipe_x: x,
            wipe_y: y,
            dir,
            name: name.to_owned(),
            missile: None,
            link: None,
            seqno: 0,
            state_timer: Countdown::new(timings.state_refresh),
            name_timer: Countdown::new(timings.name_refresh),
            last_tick: now,
            born: now,
        })
    }

    /// This rat's identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> RatId {
        self.id
    }

    /// Three-way comparison against a peer id, for ordered lookups.
    #[inline]
    #[must_use]
    pub fn cmp_id(&self, id: RatId) -> Ordering {
        self.id.cmp(&id)
    }

    /// Current x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> u16 {
        self.x
    }

    /// Current y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> u16 {
        self.y
    }

    /// Current facing.
    #[inline]
    #[must_use]
    pub const fn dir(&self) -> Direction {
        self.dir
    }

    /// The display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The missile in flight, if any.
    #[inline]
    #[must_use]
    pub const fn missile(&self) -> Option<&Missile> {
        self.missile.as_ref()
    }

    /// Sequence number the next transmitted packet will carry.
    #[inline]
    #[must_use]
    pub const fn seqno(&self) -> u32 {
        self.seqno
    }

    /// The attached link, if any (shared socket, so peers' frames can be
    /// drained from the same tick loop).
    #[inline]
    #[must_use]
    pub const fn link(&self) -> Option<&McastLink> {
        self.link.as_ref()
    }

    /// Traffic counters of the attached link, if any.
    #[inline]
    #[must_use]
    pub fn link_stats(&self) -> Option<&LinkStats> {
        self.link.as_ref().map(McastLink::stats)
    }

    /// Binds (or rebinds) the multicast destination used by every
    /// subsequent transmit.
    pub fn attach_link(&mut self, link: McastLink) {
        tracing::info!("rat {} bound to {}", self.id, link.group());
        self.link = Some(link);
    }

    /// Moves the rat to column `x`.
    ///
    /// The old coordinate becomes the wipe shadow for the renderer, and
    /// the move is announced to peers immediately - explicit moves never
    /// wait for the refresh timer, and never reset it either.
    ///
    /// # Errors
    ///
    /// Transmit failures; the move itself has already committed.
    pub fn set_x(&mut self, x: u16) -> NetResult<()> {
        self.wipe_x = self.x;
        self.x = x;
        self.send_state_pkt().map(|_| ())
    }

    /// Moves the rat to row `y`. Same contract as [`Rat::set_x`].
    ///
    /// # Errors
    ///
    /// Transmit failures; the move itself has already committed.
    pub fn set_y(&mut self, y: u16) -> NetResult<()> {
        self.wipe_y = self.y;
        self.y = y;
        self.send_state_pkt().map(|_| ())
    }

    /// Turns the rat to face `dir` and announces it immediately.
    ///
    /// # Errors
    ///
    /// Transmit failures; the turn itself has already committed.
    pub fn set_dir(&mut self, dir: Direction) -> NetResult<()> {
        self.dir = dir;
        self.send_state_pkt().map(|_| ())
    }

    /// Fires a missile from the cell directly in front of the rat.
    ///
    /// At most one missile exists per rat, and firing point-blank into a
    /// wall burns nothing: both cases are no-ops reported through
    /// [`FireOutcome`]. A successful fire announces the new missile to
    /// peers right away.
    ///
    /// # Errors
    ///
    /// Transmit failures while announcing a successful fire.
    pub fn fire(&mut self, maze: &Maze<'_>) -> NetResult<FireOutcome> {
        if self.missile.is_some() {
            return Ok(FireOutcome::AlreadyInFlight);
        }

        // The missile's first cell is directly in front of the rat.
        let x = self.dir.step_x(self.x);
        let y = self.dir.step_y(self.y);
        if maze.is_wall(x, y) {
            return Ok(FireOutcome::BlockedByWall);
        }

        self.missile = Some(Missile::new(x, y, self.dir));
        tracing::debug!("rat {} fired from ({}, {})", self.id, x, y);
        self.send_state_pkt()?;
        Ok(FireOutcome::Fired)
    }

    /// Per-frame driver: advances the missile, drains the broadcast
    /// countdowns by wall-clock time since the previous call, and emits
    /// whatever packets fell due. Call once per game tick.
    ///
    /// # Errors
    ///
    /// Transmit failures from any packet this tick owed.
    pub fn update<C: Canvas>(&mut self, maze: &Maze<'_>, canvas: &mut C) -> NetResult<()> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.step(maze, canvas, elapsed)
    }

    /// [`Rat::update`] with the elapsed duration supplied by the caller.
    ///
    /// The three sub-steps are ordered and must stay that way: missile
    /// motion first (its impact may transmit), then countdown drain, then
    /// expiry handling. The two countdowns are evaluated independently -
    /// both can fire in the same call.
    ///
    /// # Errors
    ///
    /// Transmit failures from any packet this tick owed.
    pub fn step<C: Canvas>(
        &mut self,
        maze: &Maze<'_>,
        canvas: &mut C,
        elapsed: Duration,
    ) -> NetResult<()> {
        self.update_missile(maze, canvas)?;

        self.state_timer.elapse(elapsed);
        self.name_timer.elapse(elapsed);

        if self.state_timer.expired() {
            self.state_timer.rearm();
            self.send_state_pkt()?;
        }
        if self.name_timer.expired() {
            self.name_timer.rearm();
            self.send_name_pkt()?;
        }
        Ok(())
    }

    fn update_missile<C: Canvas>(&mut self, maze: &Maze<'_>, canvas: &mut C) -> NetResult<()> {
        let Some(missile) = self.missile.as_mut() else {
            return Ok(());
        };

        let before = missile.pos();
        missile.advance();
        let after = missile.pos();

        if maze.is_wall(after.0, after.1) {
            // The impact cell must be wiped before the missile goes away;
            // after this point nothing remembers where it was.
            canvas.wipe(after.0, after.1);
            tracing::debug!(
                "rat {} missile impacted at ({}, {})",
                self.id,
                after.0,
                after.1
            );
            self.missile = None;
        }

        // Moved and destroyed both count as state changes peers must see.
        if before != after {
            self.send_state_pkt()?;
        }
        Ok(())
    }

    /// Builds and transmits one state packet.
    ///
    /// Consumes a sequence number only when the frame actually went out.
    /// Sending before a link is bound is a driver bug, surfaced as
    /// [`NetError::LinkNotAttached`].
    ///
    /// # Errors
    ///
    /// [`NetError::LinkNotAttached`] or the socket's send error.
    pub fn send_state_pkt(&mut self) -> NetResult<usize> {
        let pkt = StatePacket {
            header: PacketHeader::new(PacketKind::State, self.id, self.seqno),
            rat_posdir: posdir::pack(self.x, self.y, self.dir),
            missile_posdir: self
                .missile
                .as_ref()
                .map_or(MISSILE_NONE, |m| posdir::pack(m.x(), m.y(), m.dir())),
            score: 0,
            timestamp: self.wire_timestamp(),
        };
        let frame = wire::encode_state(&pkt);

        let link = self.link.as_mut().ok_or(NetError::LinkNotAttached)?;
        let sent = link.send(&frame)?;
        tracing::trace!("rat {} state seqno {}", self.id, self.seqno);
        self.seqno = self.seqno.wrapping_add(1);
        Ok(sent)
    }

    /// Builds and transmits one nickname packet.
    ///
    /// Shares the sequence counter with state packets.
    ///
    /// # Errors
    ///
    /// [`NetError::LinkNotAttached`] or the socket's send error.
    pub fn send_name_pkt(&mut self) -> NetResult<usize> {
        let pkt = NamePacket {
            header: PacketHeader::new(PacketKind::Nickname, self.id, self.seqno),
            nickname: NamePacket::pack_nickname(&self.name),
        };
        let frame = wire::encode_name(&pkt);

        let link = self.link.as_mut().ok_or(NetError::LinkNotAttached)?;
        let sent = link.send(&frame)?;
        tracing::trace!("rat {} nickname seqno {}", self.id, self.seqno);
        self.seqno = self.seqno.wrapping_add(1);
        Ok(sent)
    }

    /// Erases this rat's previous sprite, missile first.
    pub fn render_wipe<C: Canvas>(&self, canvas: &mut C) {
        if let Some(missile) = &self.missile {
            canvas.wipe(missile.x(), missile.y());
        }
        canvas.wipe(self.wipe_x, self.wipe_y);
    }

    /// Draws this rat at its current cell, missile first.
    pub fn render_draw<C: Canvas>(&self, canvas: &mut C) {
        if let Some(missile) = &self.missile {
            canvas.draw(missile.x(), missile.y(), missile.dir());
        }
        canvas.draw(self.x, self.y, self.dir);
    }

    fn wire_timestamp(&self) -> u32 {
        // Wrapping milliseconds since construction; peers only compare
        // recency, so the absolute epoch does not matter.
        (self.born.elapsed().as_millis() & u128::from(u32::MAX)) as u32
    }
}
