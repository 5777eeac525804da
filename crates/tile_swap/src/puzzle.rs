use std::time::Duration;

use bevy::prelude::*;

use crate::GameState;
use crate::slots::{SlotRegistry, TileId};
use crate::tile::{Tile, TileController};

pub const SLOT_SPACING: f32 = 110.0;
pub const TILE_SIZE: f32 = 106.0;
pub const SETTLE_DURATION: Duration = Duration::from_millis(240);
pub const SOLVE_DELAY: Duration = Duration::from_millis(240);

#[derive(Resource, Debug, Clone)]
pub struct PuzzleConfig {
    /// Distance between neighbouring slot centres
    pub slot_spacing: f32,
    /// On-screen size of one tile, also the box used to find the slot under a released tile
    pub tile_size: Vec2,
    pub settle_duration: Duration,
    /// Time between the solving swap and [`PuzzleSolved`]
    pub solve_delay: Duration,
    pub click_volume: f64,
    pub clear_volume: f64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            slot_spacing: SLOT_SPACING,
            tile_size: Vec2::splat(TILE_SIZE),
            settle_duration: SETTLE_DURATION,
            solve_delay: SOLVE_DELAY,
            click_volume: 0.4,
            clear_volume: 0.2,
        }
    }
}

impl PuzzleConfig {
    pub fn tile_half_size(&self) -> Vec2 {
        self.tile_size / 2.0
    }
}

impl FromWorld for SlotRegistry {
    fn from_world(world: &mut World) -> Self {
        let spacing = world
            .get_resource::<PuzzleConfig>()
            .map_or(SLOT_SPACING, |config| config.slot_spacing);
        Self::new(spacing)
    }
}

#[derive(Resource)]
pub struct PuzzleRng(pub fastrand::Rng);

impl Default for PuzzleRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

/// Parent of every tile. Tile positions are local to it.
#[derive(Component)]
pub struct PuzzleRoot;

/// Pointer input already routed to the tile it concerns, in puzzle-local coordinates.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum TilePointer {
    Down { tile: Entity, position: Vec2 },
    Move { tile: Entity, position: Vec2 },
    Up { tile: Entity },
}

impl TilePointer {
    pub const fn tile(&self) -> Entity {
        match *self {
            Self::Down { tile, .. } | Self::Move { tile, .. } | Self::Up { tile } => tile,
        }
    }
}

/// A tile was picked up.
#[derive(Event, Debug, Clone, Copy)]
pub struct TileGrabbed {
    pub tile: Entity,
}

/// These tiles are bound to a different slot than before and have to move.
#[derive(Event, Debug, Clone)]
pub struct OccupancyChanged {
    pub tiles: Vec<TileId>,
}

/// The swap that solves the puzzle just happened.
#[derive(Event, Debug, Clone, Copy)]
pub struct PuzzleCleared;

/// Completion signal for the surrounding application, sent a short delay after
/// [`PuzzleCleared`].
#[derive(Event, Debug, Clone, Copy)]
pub struct PuzzleSolved;

/// Pending [`PuzzleSolved`], held as a deadline on the game clock.
#[derive(Resource, Debug, Default)]
pub struct SolveCountdown {
    deadline: Option<Duration>,
}

impl SolveCountdown {
    /// Arms the countdown to fire `delay` after `now`.
    pub fn start(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub const fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once, on the first poll at or past the deadline.
    fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Outcome of dropping a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    /// Slot the tile was dropped on, possibly its own
    pub landed_on: Option<usize>,
    /// Tiles that traded places, if any
    pub swapped: Option<[TileId; 2]>,
}

/// Swaps `tile` with whatever occupies the slot under `center`.
pub fn resolve_release(
    registry: &mut SlotRegistry,
    tile: TileId,
    center: Vec2,
    half_size: Vec2,
) -> Release {
    let landed_on = registry.find_slot_containing_point(center, half_size);
    let own_slot = registry.slot_index_of(tile);
    let swapped = landed_on
        .zip(own_slot)
        .and_then(|(target, own)| registry.swap_occupants(own, target));

    if let Some([moved, displaced]) = swapped {
        info!("Swapped tile {moved} with tile {displaced}\n{registry}");
    }

    Release { landed_on, swapped }
}

/// Deals a new layout. A layout that is already solved is dealt again.
fn deal(registry: &mut SlotRegistry, rng: &mut fastrand::Rng) {
    registry.initialize(rng);
    while registry.is_solved() {
        registry.initialize(rng);
    }
}

fn all_tiles_moved() -> OccupancyChanged {
    OccupancyChanged {
        tiles: TileId::all().collect(),
    }
}

fn start_round(
    mut registry: ResMut<SlotRegistry>,
    mut rng: ResMut<PuzzleRng>,
    mut countdown: ResMut<SolveCountdown>,
    mut occupancy: EventWriter<OccupancyChanged>,
) {
    deal(&mut registry, &mut rng.0);
    countdown.cancel();
    info!("New round\n{}", *registry);
    occupancy.send(all_tiles_moved());
}

/// Reshuffles the board outside of the state machine, for host initiated restarts.
pub fn restart_round(world: &mut World) {
    world.resource_scope(|world, mut registry: Mut<'_, SlotRegistry>| {
        let mut rng = world.resource_mut::<PuzzleRng>();
        deal(&mut registry, &mut rng.0);
        info!("Round restarted\n{}", *registry);
    });
    world.resource_mut::<SolveCountdown>().cancel();
    world.send_event(all_tiles_moved());
}

fn handle_tile_pointers(
    time: Res<Time>,
    mut pointer_events: EventReader<TilePointer>,
    mut tiles: Query<(&Tile, &mut TileController)>,
    mut registry: ResMut<SlotRegistry>,
    config: Res<PuzzleConfig>,
    mut countdown: ResMut<SolveCountdown>,
    mut grabbed: EventWriter<TileGrabbed>,
    mut occupancy: EventWriter<OccupancyChanged>,
    mut cleared: EventWriter<PuzzleCleared>,
) {
    for event in pointer_events.read() {
        let Ok((tile, mut controller)) = tiles.get_mut(event.tile()) else {
            debug!("Pointer event for missing tile {:?}", event.tile());
            continue;
        };

        match *event {
            TilePointer::Down { tile: entity, position } => {
                if controller.pointer_down(position) {
                    debug!("Picked up tile {}", tile.id);
                    grabbed.send(TileGrabbed { tile: entity });
                }
            }
            TilePointer::Move { position, .. } => {
                if let Some(slot) = registry.position_of(tile.id) {
                    controller.pointer_move(position, slot);
                }
            }
            TilePointer::Up { .. } => {
                let Some(center) = controller.pointer_up() else {
                    debug!("Ignoring release of tile {}, it was not picked up", tile.id);
                    continue;
                };

                let release =
                    resolve_release(&mut registry, tile.id, center, config.tile_half_size());
                if let Some(moved) = release.swapped {
                    occupancy.send(OccupancyChanged {
                        tiles: moved.to_vec(),
                    });
                }
                if let Some(target) = registry.position_of(tile.id) {
                    controller.settle_to(target);
                }

                if !registry.is_solved() {
                    if countdown.is_running() {
                        info!("Board scrambled again before the solve was reported");
                        countdown.cancel();
                    }
                } else if release.landed_on.is_some() && !countdown.is_running() {
                    info!("Puzzle cleared");
                    countdown.start(time.elapsed(), config.solve_delay);
                    cleared.send(PuzzleCleared);
                }
            }
        }
    }
}

/// Input stops outside of `Playing`, so a tile still in hand goes back to its slot.
fn drop_held_tiles(registry: Res<SlotRegistry>, mut tiles: Query<(&Tile, &mut TileController)>) {
    for (tile, mut controller) in &mut tiles {
        if !controller.is_dragging() {
            continue;
        }
        controller.pointer_up();
        if let Some(target) = registry.position_of(tile.id) {
            debug!("Dropping held tile {}", tile.id);
            controller.settle_to(target);
        }
    }
}

fn follow_slot_bindings(
    mut changes: EventReader<OccupancyChanged>,
    registry: Res<SlotRegistry>,
    mut tiles: Query<(&Tile, &mut TileController)>,
) {
    for change in changes.read() {
        for (tile, mut controller) in &mut tiles {
            if !change.tiles.contains(&tile.id) {
                continue;
            }
            if let Some(target) = registry.position_of(tile.id) {
                controller.settle_to(target);
            }
        }
    }
}

fn animate_tiles(time: Res<Time>, mut tiles: Query<(&Tile, &mut TileController)>) {
    for (tile, mut controller) in &mut tiles {
        if controller.is_settling() && controller.tick(time.delta()) {
            debug!("Tile {} settled", tile.id);
        }
    }
}

fn apply_tile_transforms(
    mut tiles: Query<(&TileController, &mut Transform), Changed<TileController>>,
) {
    for (controller, mut transform) in &mut tiles {
        transform.translation = controller.position().extend(controller.z());
    }
}

fn count_down_solve(
    time: Res<Time>,
    mut countdown: ResMut<SolveCountdown>,
    mut solved: EventWriter<PuzzleSolved>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if countdown.poll(time.elapsed()) {
        info!("Puzzle solved");
        solved.send(PuzzleSolved);
        next_state.set(GameState::Solved);
    }
}

/// Slot registry, tile state machines and the swap/solve rules. Knows nothing about
/// windows, cameras, images or sound.
pub struct PuzzlePlugin;

impl Plugin for PuzzlePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PuzzleConfig>()
            .init_resource::<SlotRegistry>()
            .init_resource::<PuzzleRng>()
            .init_resource::<SolveCountdown>()
            .add_event::<TilePointer>()
            .add_event::<TileGrabbed>()
            .add_event::<OccupancyChanged>()
            .add_event::<PuzzleCleared>()
            .add_event::<PuzzleSolved>()
            .add_systems(OnEnter(GameState::Playing), start_round)
            .add_systems(OnExit(GameState::Playing), drop_held_tiles)
            .add_systems(
                Update,
                // animations advance before this frame's input, so a settle started
                // now gets its first tick next frame
                (
                    animate_tiles,
                    handle_tile_pointers.run_if(in_state(GameState::Playing)),
                    follow_slot_bindings,
                    apply_tile_transforms,
                    count_down_solve,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::slots::SLOT_COUNT;
    use crate::tile::BASE_Z;

    const FRAME: Duration = Duration::from_millis(20);

    #[derive(Resource, Default)]
    struct Signals {
        grabbed: usize,
        cleared: usize,
        solved: usize,
    }

    fn record_signals(
        mut signals: ResMut<Signals>,
        mut grabbed: EventReader<TileGrabbed>,
        mut cleared: EventReader<PuzzleCleared>,
        mut solved: EventReader<PuzzleSolved>,
    ) {
        signals.grabbed += grabbed.read().count();
        signals.cleared += cleared.read().count();
        signals.solved += solved.read().count();
    }

    /// Headless app with the tiles resting on `occupants`.
    fn puzzle_app(occupants: [u8; SLOT_COUNT]) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
            .insert_resource(PuzzleRng(fastrand::Rng::with_seed(3)))
            .insert_state(GameState::Playing)
            .add_plugins(PuzzlePlugin)
            .init_resource::<Signals>()
            .add_systems(PostUpdate, record_signals);

        // the first frame enters Playing and deals a random round
        app.update();

        let registry = SlotRegistry::from_occupants(SLOT_SPACING, occupants).expect("layout");
        for id in TileId::all() {
            let position = registry.position_of(id).expect("every tile has a slot");
            app.world_mut().spawn((
                Tile { id },
                TileController::new(position, SETTLE_DURATION),
                Transform::from_translation(position.extend(BASE_Z)),
            ));
        }
        app.insert_resource(registry);
        app.update();
        app
    }

    fn tile_entity(app: &mut App, id: u8) -> Entity {
        let mut query = app.world_mut().query::<(Entity, &Tile)>();
        query
            .iter(app.world())
            .find(|(_, tile)| tile.id.get() == id)
            .map(|(entity, _)| entity)
            .expect("tile exists")
    }

    fn controller(app: &App, entity: Entity) -> TileController {
        app.world()
            .get::<TileController>(entity)
            .expect("tile has a controller")
            .clone()
    }

    fn occupants(app: &App) -> Vec<u8> {
        app.world()
            .resource::<SlotRegistry>()
            .occupants()
            .map(TileId::get)
            .collect()
    }

    fn slot_position(app: &App, slot: usize) -> Vec2 {
        app.world()
            .resource::<SlotRegistry>()
            .slots()
            .get(slot)
            .expect("slot exists")
            .position()
    }

    fn run_frames(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.update();
        }
    }

    fn drag(app: &mut App, tile: Entity, from: Vec2, to: Vec2) {
        app.world_mut().send_event(TilePointer::Down {
            tile,
            position: from,
        });
        app.world_mut().send_event(TilePointer::Move { tile, position: to });
        app.world_mut().send_event(TilePointer::Up { tile });
        app.update();
    }

    #[test]
    fn dragging_last_misplaced_tile_solves_after_delay() {
        let mut app = puzzle_app([2, 1, 3, 4, 5, 6, 7, 8, 9]);
        let tile_one = tile_entity(&mut app, 1);
        let tile_two = tile_entity(&mut app, 2);
        let first_slot = slot_position(&app, 0);
        let second_slot = slot_position(&app, 1);
        assert_eq!(controller(&app, tile_one).position(), second_slot);

        app.world_mut().send_event(TilePointer::Down {
            tile: tile_one,
            position: second_slot,
        });
        app.update();
        assert_eq!(app.world().resource::<Signals>().grabbed, 1);
        assert!(controller(&app, tile_one).is_dragging(), "tile one is held");

        app.world_mut().send_event(TilePointer::Move {
            tile: tile_one,
            position: first_slot,
        });
        app.update();
        assert_eq!(controller(&app, tile_one).position(), first_slot);

        app.world_mut().send_event(TilePointer::Up { tile: tile_one });
        app.update();
        assert_eq!(occupants(&app), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(app.world().resource::<SlotRegistry>().is_solved(), "solved");
        assert_eq!(app.world().resource::<Signals>().cleared, 1);
        assert_eq!(app.world().resource::<Signals>().solved, 0, "not before the delay");

        run_frames(&mut app, 5);
        assert_eq!(app.world().resource::<Signals>().solved, 0, "still waiting");

        run_frames(&mut app, 20);
        assert_eq!(app.world().resource::<Signals>().solved, 1, "signal fired once");
        assert_eq!(
            app.world().resource::<State<GameState>>().get(),
            &GameState::Solved
        );

        let displaced = controller(&app, tile_two);
        assert!(displaced.is_idle(), "tile two finished moving");
        assert_eq!(displaced.position(), second_slot);
        assert_eq!(controller(&app, tile_one).position(), first_slot);
    }

    #[test]
    fn displaced_tile_animates_to_vacated_slot() {
        let mut app = puzzle_app([4, 2, 9, 1, 5, 6, 7, 8, 3]);
        let tile_four = tile_entity(&mut app, 4);
        let tile_five = tile_entity(&mut app, 5);
        let first_slot = slot_position(&app, 0);
        let centre_slot = slot_position(&app, 4);

        drag(&mut app, tile_four, first_slot, centre_slot);
        assert_eq!(occupants(&app), vec![5, 2, 9, 1, 4, 6, 7, 8, 3]);

        let moving = controller(&app, tile_five);
        assert!(moving.is_settling(), "tile five is on its way");
        assert!(
            moving.z() > BASE_Z,
            "a moving tile is drawn above its neighbours"
        );

        run_frames(&mut app, 15);
        let rested = controller(&app, tile_five);
        assert!(rested.is_idle(), "tile five arrived");
        assert_eq!(rested.position(), first_slot);
        let transform = app
            .world()
            .get::<Transform>(tile_five)
            .expect("tile has a transform");
        assert_eq!(transform.translation, first_slot.extend(BASE_Z));
        assert_eq!(app.world().resource::<Signals>().cleared, 0);
    }

    #[test]
    fn release_outside_every_slot_snaps_back() {
        let layout = [4, 2, 9, 1, 5, 6, 7, 8, 3];
        let mut app = puzzle_app(layout);
        let tile_nine = tile_entity(&mut app, 9);
        let home = slot_position(&app, 2);

        drag(&mut app, tile_nine, home, home + Vec2::new(400.0, 400.0));
        assert_eq!(occupants(&app), layout.to_vec(), "occupancy unchanged");
        assert!(controller(&app, tile_nine).is_settling(), "flying home");

        run_frames(&mut app, 15);
        let tile = controller(&app, tile_nine);
        assert!(tile.is_idle(), "came to rest");
        assert_eq!(tile.position(), home);
    }

    #[test]
    fn small_nudge_lands_on_own_slot_without_swapping() {
        let layout = [4, 2, 9, 1, 5, 6, 7, 8, 3];
        let mut app = puzzle_app(layout);
        let tile_six = tile_entity(&mut app, 6);
        let home = slot_position(&app, 5);

        drag(&mut app, tile_six, home, home + Vec2::new(12.0, -8.0));
        assert_eq!(occupants(&app), layout.to_vec(), "self swap is a no-op");

        run_frames(&mut app, 15);
        assert_eq!(controller(&app, tile_six).position(), home);
        assert_eq!(app.world().resource::<Signals>().cleared, 0);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let layout = [4, 2, 9, 1, 5, 6, 7, 8, 3];
        let mut app = puzzle_app(layout);
        let tile_two = tile_entity(&mut app, 2);
        let before = controller(&app, tile_two);

        app.world_mut().send_event(TilePointer::Up { tile: tile_two });
        app.world_mut().send_event(TilePointer::Move {
            tile: tile_two,
            position: Vec2::new(300.0, 300.0),
        });
        app.update();

        assert_eq!(occupants(&app), layout.to_vec());
        assert_eq!(controller(&app, tile_two), before);
        assert_eq!(app.world().resource::<Signals>().grabbed, 0);
    }

    #[test]
    fn events_for_missing_tiles_are_ignored() {
        let layout = [4, 2, 9, 1, 5, 6, 7, 8, 3];
        let mut app = puzzle_app(layout);
        let stray = app.world_mut().spawn_empty().id();
        app.world_mut().despawn(stray);

        app.world_mut().send_event(TilePointer::Down {
            tile: stray,
            position: Vec2::ZERO,
        });
        app.world_mut().send_event(TilePointer::Up { tile: stray });
        app.update();

        assert_eq!(occupants(&app), layout.to_vec());
    }

    #[test]
    fn input_is_ignored_once_solved() {
        let mut app = puzzle_app([2, 1, 3, 4, 5, 6, 7, 8, 9]);
        let tile_one = tile_entity(&mut app, 1);
        drag(&mut app, tile_one, slot_position(&app, 1), slot_position(&app, 0));
        run_frames(&mut app, 20);
        assert_eq!(
            app.world().resource::<State<GameState>>().get(),
            &GameState::Solved
        );

        let tile_three = tile_entity(&mut app, 3);
        drag(&mut app, tile_three, slot_position(&app, 2), slot_position(&app, 0));
        assert!(app.world().resource::<SlotRegistry>().is_solved(), "nothing moved");
        assert_eq!(app.world().resource::<Signals>().grabbed, 1);
    }

    #[test]
    fn tile_still_held_when_play_stops_goes_home() {
        let mut app = puzzle_app([2, 1, 3, 4, 5, 6, 7, 8, 9]);
        let tile_three = tile_entity(&mut app, 3);
        let home = slot_position(&app, 2);
        app.world_mut().send_event(TilePointer::Down {
            tile: tile_three,
            position: home,
        });
        app.world_mut().send_event(TilePointer::Move {
            tile: tile_three,
            position: home + Vec2::new(-30.0, 0.0),
        });
        app.update();

        let tile_one = tile_entity(&mut app, 1);
        drag(&mut app, tile_one, slot_position(&app, 1), slot_position(&app, 0));
        assert!(controller(&app, tile_three).is_dragging(), "still in hand");

        run_frames(&mut app, 30);
        let dropped = controller(&app, tile_three);
        assert!(dropped.is_idle(), "released when play stopped");
        assert_eq!(dropped.position(), home);
        assert!(app.world().resource::<SlotRegistry>().is_solved(), "stays solved");
    }

    #[test]
    fn restart_deals_a_new_unsolved_round() {
        let mut app = puzzle_app([2, 1, 3, 4, 5, 6, 7, 8, 9]);
        let tile_one = tile_entity(&mut app, 1);
        drag(&mut app, tile_one, slot_position(&app, 1), slot_position(&app, 0));
        assert!(app.world().resource::<SolveCountdown>().is_running(), "counting down");

        restart_round(app.world_mut());
        assert!(
            !app.world().resource::<SolveCountdown>().is_running(),
            "pending signal dropped"
        );
        assert!(!app.world().resource::<SlotRegistry>().is_solved(), "reshuffled");

        run_frames(&mut app, 20);
        assert_eq!(app.world().resource::<Signals>().solved, 0);
        let registry = app.world().resource::<SlotRegistry>().clone();
        for id in TileId::all() {
            let entity = tile_entity(&mut app, id.get());
            assert_eq!(
                Some(controller(&app, entity).position()),
                registry.position_of(id),
                "tile {id} rests on its new slot"
            );
        }
    }

    #[test]
    fn solve_fires_exactly_after_the_delay() {
        let mut app = puzzle_app([2, 1, 3, 4, 5, 6, 7, 8, 9]);
        let tile_one = tile_entity(&mut app, 1);
        let tile_two = tile_entity(&mut app, 2);
        drag(&mut app, tile_one, slot_position(&app, 1), slot_position(&app, 0));

        // 20 ms frames: 240 ms is twelve frames after the solving swap
        run_frames(&mut app, 11);
        assert_eq!(app.world().resource::<Signals>().solved, 0, "one frame early");
        assert!(controller(&app, tile_two).is_settling(), "still flying");

        run_frames(&mut app, 1);
        assert_eq!(app.world().resource::<Signals>().solved, 1, "on time");
        assert!(controller(&app, tile_two).is_idle(), "landed on time");
    }

    #[test]
    fn scrambling_again_before_the_delay_cancels_the_solve() {
        let mut app = puzzle_app([2, 1, 3, 4, 5, 6, 7, 8, 9]);
        let tile_one = tile_entity(&mut app, 1);
        let tile_three = tile_entity(&mut app, 3);
        drag(&mut app, tile_one, slot_position(&app, 1), slot_position(&app, 0));
        assert_eq!(app.world().resource::<Signals>().cleared, 1, "cleared once");

        run_frames(&mut app, 3);
        drag(&mut app, tile_three, slot_position(&app, 2), slot_position(&app, 1));
        assert_eq!(occupants(&app), vec![1, 3, 2, 4, 5, 6, 7, 8, 9]);
        assert!(
            !app.world().resource::<SolveCountdown>().is_running(),
            "pending solve withdrawn"
        );

        run_frames(&mut app, 20);
        assert_eq!(app.world().resource::<Signals>().solved, 0, "never reported");
        assert_eq!(
            app.world().resource::<State<GameState>>().get(),
            &GameState::Playing,
            "still playing"
        );
    }

    #[test]
    fn non_finite_move_keeps_the_tile_where_it_was() {
        let mut app = puzzle_app([4, 2, 9, 1, 5, 6, 7, 8, 3]);
        let tile_two = tile_entity(&mut app, 2);
        let home = slot_position(&app, 1);
        app.world_mut().send_event(TilePointer::Down {
            tile: tile_two,
            position: home,
        });
        app.world_mut().send_event(TilePointer::Move {
            tile: tile_two,
            position: home + Vec2::new(10.0, 0.0),
        });
        app.update();
        let before = controller(&app, tile_two);

        app.world_mut().send_event(TilePointer::Move {
            tile: tile_two,
            position: Vec2::new(f32::NAN, f32::INFINITY),
        });
        app.update();

        assert_eq!(controller(&app, tile_two), before, "move ignored");
        let transform = app
            .world()
            .get::<Transform>(tile_two)
            .expect("tile has a transform");
        assert!(transform.translation.is_finite(), "transform stays finite");
    }

    #[test]
    fn resolve_release_swaps_with_slot_under_centre() {
        let mut registry =
            SlotRegistry::from_occupants(SLOT_SPACING, [2, 1, 3, 4, 5, 6, 7, 8, 9]).expect("layout");
        let half = Vec2::splat(TILE_SIZE / 2.0);
        let onto_first = registry.slots().first().expect("slot 1").position();

        let release = resolve_release(&mut registry, TileId::new(1).expect("id"), onto_first, half);
        assert_eq!(release.landed_on, Some(0));
        assert!(registry.is_solved(), "solved by the swap");
    }

    #[test]
    fn countdown_fires_once() {
        let start = Duration::from_millis(1_000);
        let mut countdown = SolveCountdown::default();
        assert!(!countdown.poll(start + SOLVE_DELAY), "idle countdown never fires");
        countdown.start(start, SOLVE_DELAY);
        assert!(!countdown.poll(start), "not on the frame it started");
        assert!(!countdown.poll(start + Duration::from_millis(220)), "too early");
        assert!(countdown.poll(start + SOLVE_DELAY), "fires at the delay");
        assert!(!countdown.poll(start + SOLVE_DELAY * 2), "only once");
    }
}
