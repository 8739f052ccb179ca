//! World positions

use serde::{Deserialize, Serialize};

/// Point on the simulation plane
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }

    #[inline]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn within(self, other: Position, radius: f32) -> bool {
        self.distance_to(other) <= radius
    }

    /// Move toward `target` by at most `step`, snapping onto it when close
    pub fn step_toward(self, target: Position, step: f32) -> Position {
        let distance = self.distance_to(target);
        if distance <= step || distance == 0.0 {
            return target;
        }
        let t = step / distance;
        Position {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}
