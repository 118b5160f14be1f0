//! # Renderer Seam
//!
//! The core never touches pixels. Position and direction changes are
//! reported through this trait; the renderer behind it owns sprites and the
//! screen.

use crate::Direction;

/// Drawing surface consumed by the entity core.
///
/// The core supplies grid coordinates and a facing, nothing else. Wipes must
/// happen before the entity that occupied the cell is destroyed; the entity
/// drivers uphold that ordering.
pub trait Canvas {
    /// Erases whatever sprite was previously drawn at `(x, y)`.
    fn wipe(&mut self, x: u16, y: u16);

    /// Draws the sprite for an entity at `(x, y)` facing `dir`.
    fn draw(&mut self, x: u16, y: u16, dir: Direction);
}
