use thiserror::Error;

use crate::types::{Position, UnitId};

/// Errors raised while building or editing the battlefield.
/// The simulation itself never fails; it answers out-of-grid queries with neutral values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("Grid dimensions must be non-zero, got {width}x{length}x{height}")]
    EmptyGrid {
        width: i32,
        length: i32,
        height: i32,
    },

    #[error("Position ({}, {}, {}) is outside the grid", .0.x, .0.y, .0.z)]
    OutOfBounds(Position),

    #[error("Tile ({}, {}, {}) is already occupied by unit {occupant}", .position.x, .position.y, .position.z)]
    TileOccupied {
        position: Position,
        occupant: UnitId,
    },

    #[error("Unknown unit {0}")]
    UnknownUnit(UnitId),
}
