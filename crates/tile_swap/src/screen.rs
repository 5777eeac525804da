use bevy::prelude::*;
use bits_helpers::input::just_pressed_world_position;

use crate::GameState;

const BANNER_Y: f32 = 200.0;
const HINT_Y: f32 = -200.0;

/// Marks text that belongs to the solved or error screen.
#[derive(Component)]
struct ScreenText;

pub struct ScreenPlugin;

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Solved), show_cleared)
            .add_systems(
                Update,
                play_again_on_tap.run_if(in_state(GameState::Solved)),
            )
            .add_systems(OnExit(GameState::Solved), clear_screen_text)
            .add_systems(OnEnter(GameState::AssetError), show_asset_error);
    }
}

fn screen_text(text: &'static str, font_size: f32, y: f32) -> impl Bundle {
    (
        ScreenText,
        Text2d::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_xyz(0.0, y, 10.0),
    )
}

fn show_cleared(mut commands: Commands) {
    commands.spawn(screen_text("Clear!", 48.0, BANNER_Y));
    commands.spawn(screen_text("Tap to play again", 24.0, HINT_Y));
}

fn show_asset_error(mut commands: Commands) {
    commands.spawn(screen_text("Could not load the puzzle", 24.0, 0.0));
}

fn play_again_on_tap(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if just_pressed_world_position(&buttons, &touches, &windows, &camera).is_some() {
        next_state.set(GameState::Playing);
    }
}

fn clear_screen_text(mut commands: Commands, texts: Query<Entity, With<ScreenText>>) {
    for entity in &texts {
        commands.entity(entity).despawn_recursive();
    }
}
