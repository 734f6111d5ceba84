use core::time::Duration;

use bevy::prelude::*;

use crate::FONT;

const LIFETIME: Duration = Duration::from_millis(900);
const RISE: f32 = 40.0;

/// World-space text that drifts up and fades out, then despawns itself.
#[derive(Component)]
pub struct FloatingLabel {
    timer: Timer,
    origin: Vec2,
}

impl FloatingLabel {
    pub fn new(origin: Vec2) -> Self {
        Self {
            timer: Timer::new(LIFETIME, TimerMode::Once),
            origin,
        }
    }
}

pub struct FloatingLabelPlugin;

impl Plugin for FloatingLabelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, animate_floating_labels);
    }
}

pub fn spawn_floating_label(
    commands: &mut Commands,
    asset_server: &AssetServer,
    position: Vec2,
    text: &str,
    color: Srgba,
) -> Entity {
    commands
        .spawn((
            Text2d::new(text),
            TextFont {
                font: asset_server.load(FONT),
                font_size: 28.0,
                ..default()
            },
            TextColor(Color::Srgba(color)),
            Transform::from_translation(position.extend(10.0)),
            FloatingLabel::new(position),
        ))
        .id()
}

pub fn animate_floating_labels(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, Option<&mut TextColor>, &mut FloatingLabel)>,
) {
    for (entity, mut transform, color, mut label) in &mut query {
        label.timer.tick(time.delta());
        let progress = label.timer.fraction();

        transform.translation.y = RISE.mul_add(progress, label.origin.y);
        if let Some(mut color) = color {
            color.0.set_alpha(1.0 - progress);
        }

        if label.timer.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
