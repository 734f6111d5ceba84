use bevy::log::info;
use bevy::prelude::World;
use bits_helpers::RibbitMessageHandler;
use ribbit_bits::{BitDuration, BitResult};

use crate::core::{ActiveDrag, CounterTimer};
use crate::interaction::DragDropInteraction;

#[derive(Default, Clone, Copy)]
pub struct PlateDrop;

impl RibbitMessageHandler for PlateDrop {
    fn restart(world: &mut World) {
        info!("Restarting PlateDrop");
        restart_session(world);
    }

    fn end(world: &mut World) -> BitResult {
        let points = world.resource::<DragDropInteraction>().counter();
        info!("Ending PlateDrop with {points} points");
        BitResult::HighestScore(points.into())
    }

    fn duration(_world: &mut World) -> BitDuration {
        BitDuration::max_duration()
    }
}

/// Back to a fresh board: tokens home and visible, counter at zero and running.
fn restart_session(world: &mut World) {
    world.resource_mut::<DragDropInteraction>().reset();
    world.resource_mut::<ActiveDrag>().0 = None;

    let mut timer = world.resource_mut::<CounterTimer>();
    timer.0.reset();
    timer.0.unpause();
}
