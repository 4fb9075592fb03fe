use glam::IVec3;

/// One of the 8 compass facings of a unit. North = +y, numbered clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

/// All 8 facings in index order.
pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

/// Horizontal step vector of each facing, indexed by `Direction as usize`.
const STEP_X: [i32; 8] = [0, 1, 1, 1, 0, -1, -1, -1];
const STEP_Y: [i32; 8] = [1, 1, 0, -1, -1, -1, 0, 1];

impl Direction {
    /// Facing for an index 0–7 (wraps modulo 8).
    pub fn from_index(index: i32) -> Direction {
        ALL_DIRECTIONS[index.rem_euclid(8) as usize]
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    /// Unit step in the horizontal plane.
    pub fn offset(self) -> IVec3 {
        let i = self as usize;
        IVec3::new(STEP_X[i], STEP_Y[i], 0)
    }

    /// Map a horizontal unit step to its facing. The z component is ignored.
    /// Anything that is not one of the 8 unit steps yields `None`.
    pub fn from_vector(vector: IVec3) -> Option<Direction> {
        (0..8)
            .find(|&i| STEP_X[i] == vector.x && STEP_Y[i] == vector.y)
            .map(|i| ALL_DIRECTIONS[i])
    }

    /// Numeric facing of a vector, -1 when it is not a unit step.
    pub fn index_of_vector(vector: IVec3) -> i32 {
        Direction::from_vector(vector).map_or(-1, Direction::index)
    }

    /// Whether this is one of the four diagonal facings.
    pub fn is_diagonal(self) -> bool {
        (self as u8) % 2 == 1
    }

    /// Facing one eighth of a turn clockwise.
    pub fn clockwise(self) -> Direction {
        Direction::from_index(self.index() + 1)
    }

    /// Facing one eighth of a turn counter-clockwise.
    pub fn counter_clockwise(self) -> Direction {
        Direction::from_index(self.index() - 1)
    }

    /// Facing that points from `from` towards `to`, snapped to 45° sectors.
    /// Returns `None` when both positions share the same column.
    pub fn towards(from: IVec3, to: IVec3) -> Option<Direction> {
        let dx = (to.x - from.x) as f64;
        let dy = (to.y - from.y) as f64;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        // Compass bearing: 0° = +y, clockwise positive.
        let bearing = dx.atan2(dy).to_degrees();
        let sector = (bearing / 45.0).round() as i32;
        Some(Direction::from_index(sector))
    }
}
