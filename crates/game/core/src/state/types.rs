use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ColorPair;

/// Stable external identity of a participant. The core never interprets it;
/// it maps to a chat-platform user ID externally.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Discrete grid position expressed in board coordinates.
///
/// The origin is the top-left corner: `Up` decrements `y`, `Down` increments
/// it, matching the rendered board image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: the maximum of the per-axis absolute differences.
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        if dx > dy { dx } else { dy }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Board dimensions in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

/// The playing field, valid only once the game has started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub origin: Position,
    pub size: Extent,
}

impl Board {
    /// Whether the position lies within `[origin, origin + size)`.
    pub const fn contains(&self, position: Position) -> bool {
        position.x >= self.origin.x
            && position.y >= self.origin.y
            && position.x < self.origin.x + self.size.width as i32
            && position.y < self.origin.y + self.size.height as i32
    }
}

/// One participant's tank.
///
/// Created on join with placeholder stats; position, health, and action
/// points become real atomically at game start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub color: ColorPair,
    pub health: u32,
    pub action_points: u32,
    pub position: Option<Position>,
}

impl Player {
    /// A pre-start roster entry: real color, placeholder everything else.
    pub fn joined(id: PlayerId, color: ColorPair) -> Self {
        Self {
            id,
            color,
            health: 0,
            action_points: 0,
            position: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_distance_takes_the_larger_axis() {
        let a = Position::new(0, 0);
        assert_eq!(a.chebyshev_distance(Position::new(3, 3)), 3);
        assert_eq!(a.chebyshev_distance(Position::new(1, 4)), 4);
        assert_eq!(a.chebyshev_distance(Position::new(-2, 1)), 2);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn board_bounds_are_half_open() {
        let board = Board {
            origin: Position::ORIGIN,
            size: Extent {
                width: 4,
                height: 2,
            },
        };
        assert!(board.contains(Position::new(0, 0)));
        assert!(board.contains(Position::new(3, 1)));
        assert!(!board.contains(Position::new(4, 1)));
        assert!(!board.contains(Position::new(3, 2)));
        assert!(!board.contains(Position::new(-1, 0)));
    }
}
