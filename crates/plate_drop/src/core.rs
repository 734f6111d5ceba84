use bevy::prelude::*;
use bits_helpers::input::Pointer;
use strum::{EnumCount, EnumIter};

use crate::interaction::TokenId;

/// The fixed set of foods that can be put on the plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum Food {
    Bread,
    Chicken,
    Fish,
    Carrot,
    Cucumber,
}

impl Food {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Bread => "🍞",
            Self::Chicken => "🍗",
            Self::Fish => "🐟",
            Self::Carrot => "🥕",
            Self::Cucumber => "🥒",
        }
    }

    /// Backing disc color, so a token stays recognizable when the font has no
    /// emoji glyphs.
    pub const fn color(self) -> Color {
        match self {
            Self::Bread => Color::srgb(0.87, 0.67, 0.38),
            Self::Chicken => Color::srgb(0.78, 0.45, 0.24),
            Self::Fish => Color::srgb(0.42, 0.62, 0.83),
            Self::Carrot => Color::srgb(0.95, 0.52, 0.13),
            Self::Cucumber => Color::srgb(0.38, 0.7, 0.3),
        }
    }
}

/// A draggable food on screen. `home` is the world position of a zero offset.
#[derive(Component, Clone, Copy, Debug)]
pub struct FoodToken {
    pub id: TokenId,
    pub home: Vec2,
}

#[derive(Component)]
pub struct Plate;

#[derive(Component)]
pub struct CerealPatch;

#[derive(Component)]
pub struct ScoreText;

/// The drag currently in flight. Screen-space origin, Y down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGesture {
    pub token: TokenId,
    pub pointer: Pointer,
    pub origin: Vec2,
}

/// At most one token follows the pointer at a time.
#[derive(Resource, Default, Debug)]
pub struct ActiveDrag(pub Option<DragGesture>);

/// Drives the points counter.
#[derive(Resource)]
pub struct CounterTimer(pub Timer);

impl Default for CounterTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(
            config::COUNTER_PERIOD_SECS,
            TimerMode::Repeating,
        ))
    }
}

/// Sent once per counter step, carrying the new value.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterAdvanced(pub u32);

/// World position of a token's rest spot in the row.
pub fn token_home(id: TokenId) -> Vec2 {
    let center = (Food::COUNT as f32 - 1.0) / 2.0;
    Vec2::new(
        (id.0 as f32 - center) * config::TOKEN_PITCH,
        config::TOKEN_ROW_Y,
    )
}

/// Drag offsets are screen pixels with Y pointing down; the world has Y up.
pub fn offset_to_world(home: Vec2, offset: Vec2) -> Vec2 {
    home + Vec2::new(offset.x, -offset.y)
}

/// Game configuration constants
pub mod config {
    use bevy::prelude::Vec2;

    use crate::zone::{BoundsPolicy, Zone, ZoneEffect};

    // Tokens
    pub const TOKEN_SIZE: f32 = 52.0;
    pub const TOKEN_FONT_SIZE: f32 = 40.0;
    pub const TOKEN_PITCH: f32 = TOKEN_SIZE + 20.0;
    pub const TOKEN_ROW_Y: f32 = 0.0;
    pub const TOKEN_Z: f32 = 2.0;
    pub const DRAGGED_TOKEN_Z: f32 = 5.0;

    // Plate
    pub const PLATE_CENTER: Vec2 = Vec2::new(0.0, 150.0);
    pub const PLATE_RADIUS: f32 = 140.0;
    pub const PLATE_Z: f32 = 0.0;
    pub const CEREAL_Z: f32 = 1.0;

    // Drop zones, in drag-offset space
    pub const PLATE_ZONE: Zone = Zone::new("plate", 0.0, 450.0, 0.0, 400.0, ZoneEffect::None);
    pub const CEREAL_ZONE: Zone =
        Zone::new("cereal", -163.0, -1.0, -70.0, -237.0, ZoneEffect::Absorb);
    pub const BOUNDS_POLICY: BoundsPolicy = BoundsPolicy::Normalized;

    // Counter
    pub const COUNTER_MAX: u32 = 10;
    pub const COUNTER_PERIOD_SECS: f32 = 3.0;
    pub const SCORE_FONT_SIZE: f32 = 50.0;
    pub const SCORE_BOTTOM_PX: f32 = 100.0;

    // Outlines every zone around the dragged token
    pub const DEBUG_ZONES: bool = false;
}
