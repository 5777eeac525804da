use bevy::prelude::*;
use bevy_kira_audio::prelude::{Audio, AudioControl, AudioPlugin};

use crate::assets::PuzzleAssets;
use crate::puzzle::{PuzzleCleared, PuzzleConfig, TileGrabbed};

/// Fire-and-forget sound cues. Playback problems only ever mean silence.
pub struct CuePlugin;

impl Plugin for CuePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin).add_systems(
            Update,
            (click_cue, clear_cue).run_if(resource_exists::<PuzzleAssets>),
        );
    }
}

fn click_cue(
    assets: Res<PuzzleAssets>,
    audio: Res<Audio>,
    config: Res<PuzzleConfig>,
    mut grabbed: EventReader<TileGrabbed>,
) {
    for _ in grabbed.read() {
        audio
            .play(assets.click.clone_weak())
            .with_volume(config.click_volume);
    }
}

fn clear_cue(
    assets: Res<PuzzleAssets>,
    audio: Res<Audio>,
    config: Res<PuzzleConfig>,
    mut cleared: EventReader<PuzzleCleared>,
) {
    for _ in cleared.read() {
        audio
            .play(assets.clear.clone_weak())
            .with_volume(config.clear_volume);
    }
}
