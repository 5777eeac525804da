use bevy::prelude::*;

mod assets;
mod audio;
pub mod error;
mod input;
pub mod puzzle;
mod ribbit;
mod screen;
pub mod slots;
pub mod tile;

use assets::AssetsPlugin;
use audio::CuePlugin;
use input::InputPlugin;
use puzzle::PuzzlePlugin;
use screen::ScreenPlugin;

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Solved,
    AssetError,
}

pub fn run() {
    bits_helpers::get_default_app::<ribbit::TileSwap>(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )
    .init_state::<GameState>()
    .add_plugins(AssetsPlugin)
    .add_plugins(PuzzlePlugin)
    .add_plugins(InputPlugin)
    .add_plugins(CuePlugin)
    .add_plugins(ScreenPlugin)
    .add_systems(Startup, setup)
    .add_systems(Update, (ribbit::report_solved, log_state_changes))
    .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn log_state_changes(state: Res<State<GameState>>) {
    if state.is_changed() {
        info!("Game state: {:?}", state.get());
    }
}
