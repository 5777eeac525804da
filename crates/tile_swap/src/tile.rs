use std::time::Duration;

use bevy::prelude::*;

use crate::slots::TileId;

/// Resting z level of a tile.
pub const BASE_Z: f32 = 0.0;
/// z level of a tile that is being dragged or is flying back to its slot.
pub const RAISED_Z: f32 = 1.0;

/// Identity of a tile entity. The image it carries is chosen from this id and never changes.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
}

/// Quadratic ease-out: fast start, gentle landing.
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Animation of a tile from where it was released to where its slot is.
#[derive(Debug, Clone, PartialEq)]
pub struct SettleTween {
    from: Vec2,
    to: Vec2,
    timer: Timer,
}

impl SettleTween {
    pub fn new(from: Vec2, to: Vec2, duration: Duration) -> Self {
        Self {
            from,
            to,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    pub const fn target(&self) -> Vec2 {
        self.to
    }

    fn tick(&mut self, delta: Duration) -> Vec2 {
        self.timer.tick(delta);
        self.sample()
    }

    fn sample(&self) -> Vec2 {
        self.from.lerp(self.to, ease_out_quad(self.timer.fraction()))
    }

    fn finished(&self) -> bool {
        self.timer.finished()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TileState {
    Idle,
    Dragging { anchor: Vec2 },
    Settling(SettleTween),
}

/// Drag and settle state machine of one tile.
///
/// Cycles `Idle -> Dragging -> Settling -> Idle` for the whole life of the tile. Events
/// that make no sense in the current state, or that carry non-finite coordinates, are
/// ignored rather than rejected.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct TileController {
    state: TileState,
    position: Vec2,
    z: f32,
    settle_duration: Duration,
}

impl TileController {
    pub const fn new(position: Vec2, settle_duration: Duration) -> Self {
        Self {
            state: TileState::Idle,
            position,
            z: BASE_Z,
            settle_duration,
        }
    }

    pub const fn state(&self) -> &TileState {
        &self.state
    }

    pub const fn position(&self) -> Vec2 {
        self.position
    }

    pub const fn z(&self) -> f32 {
        self.z
    }

    pub const fn is_idle(&self) -> bool {
        matches!(self.state, TileState::Idle)
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, TileState::Dragging { .. })
    }

    pub const fn is_settling(&self) -> bool {
        matches!(self.state, TileState::Settling(_))
    }

    /// Picks the tile up. Returns `true` when a drag actually started, which is when the
    /// click cue should play. Grabbing a tile mid-flight cancels its animation.
    pub fn pointer_down(&mut self, pointer: Vec2) -> bool {
        if self.is_dragging() || !pointer.is_finite() {
            return false;
        }
        self.state = TileState::Dragging { anchor: pointer };
        self.z = RAISED_Z;
        true
    }

    /// Moves a dragged tile so it keeps the offset it was grabbed with, measured from the
    /// slot it is currently bound to.
    pub fn pointer_move(&mut self, pointer: Vec2, slot_position: Vec2) -> bool {
        let TileState::Dragging { anchor } = self.state else {
            return false;
        };
        if !pointer.is_finite() {
            return false;
        }
        self.position = slot_position + (pointer - anchor);
        true
    }

    /// Drops the tile. Returns the centre it was released at, or `None` if it was not
    /// being dragged.
    pub fn pointer_up(&mut self) -> Option<Vec2> {
        if !self.is_dragging() {
            return None;
        }
        self.state = TileState::Idle;
        self.z = BASE_Z;
        Some(self.position)
    }

    /// Starts animating towards `target`, replacing any animation already running.
    /// A tile held by the pointer is left alone; it follows its slot through
    /// [`Self::pointer_move`] instead.
    pub fn settle_to(&mut self, target: Vec2) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = TileState::Settling(SettleTween::new(
            self.position,
            target,
            self.settle_duration,
        ));
        self.z = RAISED_Z;
        true
    }

    /// Advances the settle animation. Returns `true` on the tick the tile comes to rest.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let TileState::Settling(tween) = &mut self.state else {
            return false;
        };
        self.position = tween.tick(delta);
        if !tween.finished() {
            return false;
        }
        self.position = tween.target();
        self.state = TileState::Idle;
        self.z = BASE_Z;
        true
    }
}
