use bevy::prelude::*;
use bits_helpers::floating_label::FloatingLabelPlugin;
use ribbit::PlateDrop;

mod core;
mod counter;
mod gameplay;
mod interaction;
mod ribbit;
mod zone;

use crate::core::{ActiveDrag, CounterAdvanced, CounterTimer};
use crate::gameplay::{
    draw_zone_gizmos, handle_drag_input, spawn_counter_labels, spawn_scene, sync_tokens,
    tick_counter, update_score_text,
};
use crate::interaction::DragDropInteraction;

/// Entry point for the bit
pub fn run() {
    let mut app = bits_helpers::get_default_app::<PlateDrop>(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );

    app.add_plugins(FloatingLabelPlugin)
        .insert_resource(ClearColor(Color::WHITE))
        .init_resource::<DragDropInteraction>()
        .init_resource::<ActiveDrag>()
        .init_resource::<CounterTimer>()
        .add_event::<CounterAdvanced>()
        .add_systems(Startup, (setup_camera, spawn_scene))
        .add_systems(
            Update,
            (
                handle_drag_input,
                tick_counter,
                sync_tokens,
                update_score_text,
                spawn_counter_labels,
                draw_zone_gizmos,
            )
                .chain(),
        );

    app.run();
}

/// Sets up the main 2D camera
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
