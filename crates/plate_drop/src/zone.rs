use bevy::prelude::*;

/// What happens to a token dropped inside a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ZoneEffect {
    /// The token stays visible.
    #[default]
    None,
    /// The token is hidden until it is dragged out again.
    Absorb,
}

/// How zone bounds are read when hit-testing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// `min <= v <= max` exactly as configured. An inverted range never matches.
    Literal,
    /// Each axis is reordered so that `min <= max` before testing.
    #[default]
    Normalized,
}

/// Axis-aligned drop zone expressed in drag-offset space (pixels, Y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zone {
    name: &'static str,
    min: Vec2,
    max: Vec2,
    effect: ZoneEffect,
}

impl Zone {
    pub const fn new(
        name: &'static str,
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
        effect: ZoneEffect,
    ) -> Self {
        Self {
            name,
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
            effect,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn effect(&self) -> ZoneEffect {
        self.effect
    }

    /// Bounds with `min <= max` on both axes.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.min, self.max)
    }

    /// Inclusive on every edge.
    pub fn contains(&self, position: Vec2, policy: BoundsPolicy) -> bool {
        let (min, max) = match policy {
            BoundsPolicy::Literal => (self.min, self.max),
            BoundsPolicy::Normalized => (self.min.min(self.max), self.min.max(self.max)),
        };

        (min.x..=max.x).contains(&position.x) && (min.y..=max.y).contains(&position.y)
    }
}

/// Result of classifying a final drop position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropOutcome {
    pub position: Vec2,
    pub effect: ZoneEffect,
    /// Zone that decided the outcome, `None` when the drop missed every zone.
    pub zone: Option<&'static str>,
}

impl DropOutcome {
    pub const fn is_absorbed(&self) -> bool {
        matches!(self.effect, ZoneEffect::Absorb)
    }
}

/// Classifies `position` against `zones`. Absorb zones win over any other zone
/// containing the same point.
pub fn classify(zones: &[Zone], policy: BoundsPolicy, position: Vec2) -> DropOutcome {
    let mut hits = zones.iter().filter(|zone| zone.contains(position, policy));
    let first_hit = hits.next();

    let winner = first_hit
        .into_iter()
        .chain(hits)
        .find(|zone| zone.effect == ZoneEffect::Absorb)
        .or(first_hit);

    DropOutcome {
        position,
        effect: winner.map_or(ZoneEffect::None, Zone::effect),
        zone: winner.map(Zone::name),
    }
}
