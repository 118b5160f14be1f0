//! # MAZERAT Core
//!
//! Leaf entity types for the maze game: the facing/movement convention, the
//! read-only maze occupancy view, the elapsed-time countdown behind the
//! broadcast timers, entity identity, and the missile projectile.
//!
//! Everything in this crate is free of I/O. The networking crate composes
//! these types into the rat entity and its broadcast protocol.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod direction;
pub mod ident;
pub mod maze;
pub mod missile;
pub mod render;
pub mod timer;

pub use direction::Direction;
pub use ident::RatId;
pub use maze::{Maze, WALL};
pub use missile::Missile;
pub use render::Canvas;
pub use timer::Countdown;
