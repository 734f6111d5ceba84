use core::fmt;

use bevy::prelude::*;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::core::Food;
use crate::core::config::{BOUNDS_POLICY, CEREAL_ZONE, PLATE_ZONE};
use crate::counter::ScoreCounter;
use crate::zone::{BoundsPolicy, DropOutcome, Zone, classify};

/// Stable index of a token, `0..N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub usize);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InteractionError {
    #[error("token {id} does not exist, the interaction has {count} tokens")]
    UnknownToken { id: TokenId, count: usize },

    #[error("drag delta ({dx}, {dy}) is not finite")]
    NonFiniteDelta { dx: f32, dy: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    AtRest,
    Dragging,
}

/// Per-token state. `offset` equals `anchor` whenever the token is at rest.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenState {
    symbol: &'static str,
    offset: Vec2,
    anchor: Vec2,
    visible: bool,
    phase: DragPhase,
}

impl TokenState {
    const fn new(symbol: &'static str) -> Self {
        Self {
            symbol,
            offset: Vec2::ZERO,
            anchor: Vec2::ZERO,
            visible: true,
            phase: DragPhase::AtRest,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Live position, follows the pointer during a drag.
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Position committed by the last completed drag.
    pub const fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub const fn visible(&self) -> bool {
        self.visible
    }

    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }
}

/// Drag-and-drop state for the whole board: one record per token, the static
/// drop zones and the points counter.
///
/// Every operation runs to completion and either applies fully or returns an
/// error without touching any state.
#[derive(Resource, Clone, Debug)]
pub struct DragDropInteraction {
    tokens: Vec<TokenState>,
    zones: Vec<Zone>,
    policy: BoundsPolicy,
    counter: ScoreCounter,
}

impl DragDropInteraction {
    pub fn new(
        symbols: impl IntoIterator<Item = &'static str>,
        zones: Vec<Zone>,
        policy: BoundsPolicy,
        counter: ScoreCounter,
    ) -> Self {
        Self {
            tokens: symbols.into_iter().map(TokenState::new).collect(),
            zones,
            policy,
            counter,
        }
    }

    pub fn token(&self, id: TokenId) -> Result<&TokenState, InteractionError> {
        self.tokens.get(id.0).ok_or(InteractionError::UnknownToken {
            id,
            count: self.tokens.len(),
        })
    }

    fn token_mut(&mut self, id: TokenId) -> Result<&mut TokenState, InteractionError> {
        let count = self.tokens.len();
        self.tokens
            .get_mut(id.0)
            .ok_or(InteractionError::UnknownToken { id, count })
    }

    pub fn tokens(&self) -> impl Iterator<Item = (TokenId, &TokenState)> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(index, token)| (TokenId(index), token))
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub const fn policy(&self) -> BoundsPolicy {
        self.policy
    }

    /// Explicit drag start. Already dragging is a no-op.
    pub fn on_drag_start(&mut self, id: TokenId) -> Result<(), InteractionError> {
        let token = self.token_mut(id)?;
        token.phase = DragPhase::Dragging;
        Ok(())
    }

    /// `delta` is the cumulative pointer movement since the drag began, so
    /// replaying the same delta lands on the same offset. A move on a resting
    /// token starts its drag.
    pub fn on_drag_move(&mut self, id: TokenId, delta: Vec2) -> Result<(), InteractionError> {
        if !delta.is_finite() {
            return Err(InteractionError::NonFiniteDelta {
                dx: delta.x,
                dy: delta.y,
            });
        }

        let token = self.token_mut(id)?;
        token.phase = DragPhase::Dragging;
        token.offset = token.anchor + delta;
        Ok(())
    }

    /// Classifies the final offset, updates visibility and commits the offset
    /// as the new anchor.
    pub fn on_drag_end(&mut self, id: TokenId) -> Result<DropOutcome, InteractionError> {
        let position = self.token(id)?.offset;
        let outcome = self.classify(position);

        let token = self.token_mut(id)?;
        token.visible = !outcome.is_absorbed();
        token.anchor = token.offset;
        token.phase = DragPhase::AtRest;
        Ok(outcome)
    }

    /// Abandons a drag: the token snaps back to its anchor, visibility is kept.
    pub fn on_drag_cancel(&mut self, id: TokenId) -> Result<(), InteractionError> {
        let token = self.token_mut(id)?;
        token.offset = token.anchor;
        token.phase = DragPhase::AtRest;
        Ok(())
    }

    /// Pure with respect to drag history.
    pub fn classify(&self, position: Vec2) -> DropOutcome {
        classify(&self.zones, self.policy, position)
    }

    /// Advances the counter unless it is saturated. Returns whether it moved.
    pub const fn tick(&mut self) -> bool {
        self.counter.tick()
    }

    pub const fn counter(&self) -> u32 {
        self.counter.value()
    }

    pub const fn is_saturated(&self) -> bool {
        self.counter.is_saturated()
    }

    /// Starts a fresh session with the same tokens and zones.
    pub fn reset(&mut self) {
        for token in &mut self.tokens {
            *token = TokenState::new(token.symbol);
        }
        self.counter.reset();
    }
}

impl Default for DragDropInteraction {
    fn default() -> Self {
        Self::new(
            Food::iter().map(Food::symbol),
            vec![PLATE_ZONE, CEREAL_ZONE],
            BOUNDS_POLICY,
            ScoreCounter::default(),
        )
    }
}
