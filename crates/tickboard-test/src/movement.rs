//! Straight-line movement at a fixed speed per tick

use tickboard_agent::Movement;
use tickboard_core::Position;

/// Walks straight toward its target, `speed` units per tick
#[derive(Debug, Clone)]
pub struct GridMovement {
    position: Position,
    target: Option<Position>,
    speed: f32,
    arrival_pending: bool,
    /// Total distance walked
    pub travelled: f32,
}

impl GridMovement {
    pub fn new(position: Position, speed: f32) -> Self {
        GridMovement {
            position,
            target: None,
            speed: speed.max(0.0),
            arrival_pending: false,
            travelled: 0.0,
        }
    }

    pub fn target(&self) -> Option<Position> {
        self.target
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

impl Movement for GridMovement {
    fn set_target(&mut self, target: Position) {
        self.target = Some(target);
        self.arrival_pending = self.position == target;
    }

    fn clear_target(&mut self) {
        self.target = None;
        self.arrival_pending = false;
    }

    fn is_at_target(&self) -> bool {
        self.target == Some(self.position)
    }

    fn consume_arrival(&mut self) -> bool {
        std::mem::take(&mut self.arrival_pending)
    }

    fn position(&self) -> Position {
        self.position
    }

    fn advance(&mut self) {
        let Some(target) = self.target else {
            return;
        };
        if self.position == target {
            return;
        }
        let next = self.position.step_toward(target, self.speed);
        self.travelled += self.position.distance_to(next);
        self.position = next;
        if next == target {
            self.arrival_pending = true;
        }
    }
}
