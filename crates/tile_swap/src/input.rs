use bevy::input::InputSystem;
use bevy::prelude::*;
use bits_helpers::input::{PointerPhase, pointer_world_sample};

use crate::GameState;
use crate::puzzle::{PuzzleConfig, PuzzleRoot, TilePointer};
use crate::tile::{Tile, TileController};

/// Tile that received the last press, and so receives the moves and the release.
#[derive(Resource, Debug, Default)]
struct PointerCapture {
    tile: Option<Entity>,
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerCapture>()
            .add_systems(
                PreUpdate,
                route_pointer
                    .after(InputSystem)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnExit(GameState::Playing), release_capture);
    }
}

/// Topmost tile whose box contains `point`. On equal height the first candidate wins.
fn pick_tile(
    point: Vec2,
    half_size: Vec2,
    candidates: impl IntoIterator<Item = (Entity, Vec2, f32)>,
) -> Option<Entity> {
    candidates
        .into_iter()
        .filter(|(_, center, _)| Rect::from_center_half_size(*center, half_size).contains(point))
        .fold(None, |best: Option<(Entity, f32)>, (entity, _, z)| match best {
            Some((_, best_z)) if best_z >= z => best,
            _ => Some((entity, z)),
        })
        .map(|(entity, _)| entity)
}

/// Turns one pointer sample into tile events. `capture` is the tile that owns the gesture
/// and `pick` finds the tile under a press.
fn tile_events(
    phase: PointerPhase,
    position: Option<Vec2>,
    capture: &mut Option<Entity>,
    pick: impl FnOnce(Vec2) -> Option<Entity>,
) -> Vec<TilePointer> {
    fn release(capture: &mut Option<Entity>, events: &mut Vec<TilePointer>) {
        if let Some(tile) = capture.take() {
            events.push(TilePointer::Up { tile });
        }
    }

    let mut events = Vec::new();

    match (phase, position) {
        (PointerPhase::Pressed | PointerPhase::Tapped, Some(position)) => {
            // a release we never saw leaves the old tile captured
            release(capture, &mut events);
            *capture = pick(position);
            if let Some(tile) = *capture {
                events.push(TilePointer::Down { tile, position });
            }
            if phase == PointerPhase::Tapped {
                release(capture, &mut events);
            }
        }
        (PointerPhase::Held, Some(position)) => {
            if let Some(tile) = *capture {
                events.push(TilePointer::Move { tile, position });
            }
        }
        (PointerPhase::Released | PointerPhase::Tapped, _) => release(capture, &mut events),
        (PointerPhase::Pressed | PointerPhase::Held, None) => {}
    }
    events
}

fn route_pointer(
    windows: Query<&Window>,
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    camera: Query<(&Camera, &GlobalTransform)>,
    roots: Query<&GlobalTransform, With<PuzzleRoot>>,
    tiles: Query<(Entity, &TileController), With<Tile>>,
    config: Res<PuzzleConfig>,
    mut capture: ResMut<PointerCapture>,
    mut pointer_events: EventWriter<TilePointer>,
) {
    let Some(sample) = pointer_world_sample(&buttons, &touches, &windows, &camera) else {
        return;
    };
    let origin = roots
        .get_single()
        .map_or(Vec2::ZERO, |root| root.translation().truncate());
    let local = sample.position.map(|position| position - origin);

    let events = tile_events(sample.phase, local, &mut capture.tile, |position| {
        pick_tile(
            position,
            config.tile_half_size(),
            tiles
                .iter()
                .map(|(entity, controller)| (entity, controller.position(), controller.z())),
        )
    });
    pointer_events.send_batch(events);
}

fn release_capture(mut capture: ResMut<PointerCapture>) {
    capture.tile = None;
}
