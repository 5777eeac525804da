use bevy::prelude::*;
use bits_helpers::RibbitMessageHandler;
use ribbit_bits::{BitDuration, BitResult};

use crate::GameState;
use crate::puzzle::{PuzzleSolved, restart_round};
use crate::slots::SlotRegistry;

#[derive(Default, Clone, Copy)]
pub struct TileSwap;

impl RibbitMessageHandler for TileSwap {
    fn restart(world: &mut World) {
        info!("Restarting TileSwap");

        let state = world.resource::<State<GameState>>().get().clone();
        match state {
            // entering Playing deals a fresh round
            GameState::Solved => world
                .resource_mut::<NextState<GameState>>()
                .set(GameState::Playing),
            GameState::Playing => restart_round(world),
            GameState::Loading | GameState::AssetError => {
                debug!("Nothing to restart yet");
            }
        }
    }

    fn end(world: &mut World) -> BitResult {
        info!("Ending TileSwap");

        let solved = world
            .get_resource::<SlotRegistry>()
            .is_some_and(SlotRegistry::is_solved);
        if solved {
            BitResult::Success
        } else {
            BitResult::Failure
        }
    }

    fn duration(_world: &mut World) -> BitDuration {
        BitDuration::max_duration()
    }
}

pub fn report_solved(mut solved: EventReader<PuzzleSolved>) {
    for _ in solved.read() {
        bits_helpers::report_result(BitResult::Success);
    }
}
