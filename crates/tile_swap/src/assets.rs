use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::AudioSource;

use crate::GameState;
use crate::error::PuzzleError;
use crate::puzzle::{PuzzleConfig, PuzzleRoot};
use crate::slots::{SLOT_COUNT, TileId};
use crate::tile::{BASE_Z, Tile, TileController};

const BOARD_COLOR: Color = Color::srgb(0.12, 0.12, 0.16);
const BOARD_Z: f32 = -10.0;

#[derive(AssetCollection, Resource)]
pub struct PuzzleAssets {
    #[asset(
        paths(
            "tiles/1.png",
            "tiles/2.png",
            "tiles/3.png",
            "tiles/4.png",
            "tiles/5.png",
            "tiles/6.png",
            "tiles/7.png",
            "tiles/8.png",
            "tiles/9.png"
        ),
        collection(typed)
    )]
    pub tiles: Vec<Handle<Image>>,
    #[asset(path = "sounds/click.wav")]
    pub click: Handle<AudioSource>,
    #[asset(path = "sounds/clear.wav")]
    pub clear: Handle<AudioSource>,
}

/// Tile artwork, checked to be nine distinct images. Image `k` belongs to tile `k + 1`
/// wherever that tile currently sits.
#[derive(Debug, Clone)]
pub struct TileImages(Vec<Handle<Image>>);

impl TileImages {
    pub fn from_handles(handles: Vec<Handle<Image>>) -> Result<Self, PuzzleError> {
        if handles.len() != SLOT_COUNT {
            return Err(PuzzleError::MissingTileImages {
                found: handles.len(),
            });
        }
        for (index, handle) in handles.iter().enumerate() {
            if let Some(previous) = handles
                .iter()
                .take(index)
                .position(|other| other.id() == handle.id())
            {
                return Err(PuzzleError::DuplicateTileImage {
                    index: index + 1,
                    previous: previous + 1,
                });
            }
        }
        Ok(Self(handles))
    }

    pub fn get(&self, tile: TileId) -> Option<&Handle<Image>> {
        self.0.get(usize::from(tile.get() - 1))
    }
}

pub struct AssetsPlugin;

impl Plugin for AssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_loading_state(
            LoadingState::new(GameState::Loading)
                .continue_to_state(GameState::Playing)
                .on_failure_continue_to_state(GameState::AssetError)
                .load_collection::<PuzzleAssets>(),
        )
        .add_systems(OnEnter(GameState::Playing), spawn_puzzle)
        .add_systems(OnEnter(GameState::AssetError), report_load_failure);
    }
}

fn report_load_failure() {
    error!("{}", PuzzleError::AssetLoad);
}

/// Builds the board once. Tiles start at the puzzle origin and fly to the slots dealt by
/// the round that is starting.
fn spawn_puzzle(
    mut commands: Commands,
    assets: Option<Res<PuzzleAssets>>,
    config: Res<PuzzleConfig>,
    roots: Query<(), With<PuzzleRoot>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !roots.is_empty() {
        return;
    }

    let images = assets
        .ok_or(PuzzleError::AssetLoad)
        .and_then(|assets| TileImages::from_handles(assets.tiles.clone()));
    let images = match images {
        Ok(images) => images,
        Err(err) => {
            error!("Cannot build the puzzle: {err}");
            next_state.set(GameState::AssetError);
            return;
        }
    };

    let board_size = Vec2::splat(config.slot_spacing * 3.0 + 8.0);
    commands
        .spawn((PuzzleRoot, Transform::default(), Visibility::default()))
        .with_children(|parent| {
            parent.spawn((
                Sprite::from_color(BOARD_COLOR, board_size),
                Transform::from_xyz(0.0, 0.0, BOARD_Z),
            ));

            for id in TileId::all() {
                let Some(image) = images.get(id) else {
                    continue;
                };
                parent.spawn((
                    Tile { id },
                    TileController::new(Vec2::ZERO, config.settle_duration),
                    Sprite {
                        image: image.clone(),
                        custom_size: Some(config.tile_size),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, BASE_Z),
                ));
            }
        });

    info!("Spawned puzzle with {SLOT_COUNT} tiles");
}
