use core::time::Duration;

use bevy::color::palettes::css::{GREEN, ORANGE, RED};
use bevy::math::Isometry2d;
use bevy::prelude::*;
use bits_helpers::floating_label::spawn_floating_label;
use bits_helpers::input::{
    held_pointer_position, just_pressed_pointer, pointer_canceled, pointer_held,
    released_pointer, screen_to_world,
};
use bits_helpers::{FONT, WINDOW_HEIGHT};
use strum::IntoEnumIterator;

use crate::core::config::{
    CEREAL_Z, CEREAL_ZONE, DEBUG_ZONES, DRAGGED_TOKEN_Z, PLATE_CENTER, PLATE_RADIUS, PLATE_Z,
    SCORE_BOTTOM_PX, SCORE_FONT_SIZE, TOKEN_FONT_SIZE, TOKEN_SIZE, TOKEN_Z,
};
use crate::core::{
    ActiveDrag, CerealPatch, CounterAdvanced, CounterTimer, DragGesture, Food, FoodToken, Plate,
    ScoreText, offset_to_world, token_home,
};
use crate::interaction::{DragDropInteraction, TokenId};
use crate::zone::ZoneEffect;

/// Spawns the plate, the food row and the points display.
pub fn spawn_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    interaction: Res<DragDropInteraction>,
) {
    commands.spawn((
        Mesh2d(meshes.add(Circle::new(PLATE_RADIUS))),
        MeshMaterial2d(materials.add(Color::srgb(0.92, 0.92, 0.9))),
        Transform::from_translation(PLATE_CENTER.extend(PLATE_Z)),
        Plate,
    ));

    // Cereal corner as seen from the middle of the row
    let cereal = CEREAL_ZONE.rect();
    let center_home = Vec2::new(0.0, token_home(TokenId(0)).y);
    let cereal = Rect::from_corners(
        offset_to_world(center_home, cereal.min),
        offset_to_world(center_home, cereal.max),
    );
    commands.spawn((
        Sprite::from_color(Color::srgba(0.85, 0.68, 0.35, 0.6), cereal.size()),
        Transform::from_translation(cereal.center().extend(CEREAL_Z)),
        CerealPatch,
    ));

    let font = asset_server.load(FONT);
    let disc = meshes.add(Circle::new(TOKEN_SIZE / 2.0));

    for ((id, state), food) in interaction.tokens().zip(Food::iter()) {
        let home = token_home(id);

        commands
            .spawn((
                Mesh2d(disc.clone()),
                MeshMaterial2d(materials.add(food.color())),
                Transform::from_translation(home.extend(TOKEN_Z)),
                Visibility::Inherited,
                FoodToken { id, home },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(state.symbol()),
                    TextFont {
                        font: font.clone(),
                        font_size: TOKEN_FONT_SIZE,
                        ..default()
                    },
                    TextColor(Color::BLACK),
                    Transform::from_xyz(0.0, 0.0, 0.1),
                ));
            });
    }

    commands.spawn((
        Text::new(score_label(interaction.counter())),
        TextFont {
            font,
            font_size: SCORE_FONT_SIZE,
            ..default()
        },
        TextColor(Color::BLACK),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(SCORE_BOTTOM_PX),
            width: Val::Percent(100.0),
            ..default()
        },
        ScoreText,
    ));

    info!(
        "Scene ready: {} tokens, {} zones ({:?} bounds)",
        interaction.token_count(),
        interaction.zones().len(),
        interaction.policy()
    );
}

pub fn score_label(points: u32) -> String {
    format!("Points: {points}")
}

/// Turns mouse and touch input into drag start, move, end and cancel calls.
pub fn handle_drag_input(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mouse_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    tokens: Query<(&FoodToken, &GlobalTransform)>,
    mut active_drag: ResMut<ActiveDrag>,
    mut interaction: ResMut<DragDropInteraction>,
) {
    if let Some(gesture) = active_drag.0 {
        if pointer_canceled(gesture.pointer, &touch_input) {
            if let Err(err) = interaction.on_drag_cancel(gesture.token) {
                error!("Drag cancel rejected: {err}");
            }
            debug!("Drag of token {} canceled", gesture.token);
            active_drag.0 = None;
            return;
        }

        if let Some(release) =
            released_pointer(gesture.pointer, &mouse_input, &touch_input, &windows)
        {
            if let Some(position) = release.position {
                follow_pointer(&mut interaction, gesture, position);
            }
            drop_token(&mut commands, &asset_server, &tokens, &mut interaction, gesture);
            active_drag.0 = None;
            return;
        }

        // Lifted in the frame it was pressed, so the release went unseen
        if !pointer_held(gesture.pointer, &mouse_input, &touch_input) {
            debug!("Pointer of token {} is gone", gesture.token);
            drop_token(&mut commands, &asset_server, &tokens, &mut interaction, gesture);
            active_drag.0 = None;
            return;
        }

        if let Some(position) =
            held_pointer_position(gesture.pointer, &mouse_input, &touch_input, &windows)
        {
            follow_pointer(&mut interaction, gesture, position);
        }
        return;
    }

    let Some(press) = just_pressed_pointer(&mouse_input, &touch_input, &windows) else {
        return;
    };
    let Some(world_position) = screen_to_world(&camera_query, press.position) else {
        return;
    };

    // Hidden tokens stay grabbable, so an absorbed food can be pulled back out.
    let Some(token) = pick_token(
        tokens
            .iter()
            .map(|(token, transform)| (token.id, transform.translation().truncate())),
        world_position,
    ) else {
        return;
    };

    match interaction.on_drag_start(token) {
        Ok(()) => {
            debug!("Drag of token {token} started");
            active_drag.0 = Some(DragGesture {
                token,
                pointer: press.pointer,
                origin: press.position,
            });
        }
        Err(err) => error!("Drag start rejected: {err}"),
    }
}

/// Ends the drag at the token's current offset.
fn drop_token(
    commands: &mut Commands,
    asset_server: &AssetServer,
    tokens: &Query<(&FoodToken, &GlobalTransform)>,
    interaction: &mut DragDropInteraction,
    gesture: DragGesture,
) {
    match interaction.on_drag_end(gesture.token) {
        Ok(outcome) => {
            info!(
                "Token {} dropped at ({:.0}, {:.0}) on {}",
                gesture.token,
                outcome.position.x,
                outcome.position.y,
                outcome.zone.unwrap_or("nothing")
            );

            if outcome.is_absorbed() {
                let home = tokens
                    .iter()
                    .find(|(token, _)| token.id == gesture.token)
                    .map_or(Vec2::ZERO, |(token, _)| token.home);
                spawn_floating_label(
                    commands,
                    asset_server,
                    offset_to_world(home, outcome.position),
                    "Yum!",
                    ORANGE,
                );
            }
        }
        Err(err) => error!("Drop rejected: {err}"),
    }
}

fn follow_pointer(interaction: &mut DragDropInteraction, gesture: DragGesture, position: Vec2) {
    if let Err(err) = interaction.on_drag_move(gesture.token, position - gesture.origin) {
        error!("Drag move rejected: {err}");
    }
}

/// Closest token whose disc contains `position`.
pub fn pick_token(
    tokens: impl Iterator<Item = (TokenId, Vec2)>,
    position: Vec2,
) -> Option<TokenId> {
    tokens
        .map(|(id, center)| (id, center.distance(position)))
        .filter(|(_, distance)| *distance <= TOKEN_SIZE / 2.0)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

/// Projects each token's offset and visibility onto its entity.
pub fn sync_tokens(
    interaction: Res<DragDropInteraction>,
    mut tokens: Query<(&FoodToken, &mut Transform, &mut Visibility)>,
) {
    if !interaction.is_changed() {
        return;
    }

    for (food_token, mut transform, mut visibility) in &mut tokens {
        let Ok(state) = interaction.token(food_token.id) else {
            continue;
        };

        let z = if state.is_dragging() {
            DRAGGED_TOKEN_Z
        } else {
            TOKEN_Z
        };
        transform.translation = offset_to_world(food_token.home, state.offset()).extend(z);
        *visibility = if state.visible() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Ticks the counter timer and the counter with it. Returns how many steps the
/// counter took. The timer is paused once the counter is saturated.
pub fn advance_counter(
    timer: &mut Timer,
    interaction: &mut DragDropInteraction,
    delta: Duration,
) -> u32 {
    if timer.paused() {
        return 0;
    }

    timer.tick(delta);
    let steps = (0..timer.times_finished_this_tick())
        .filter(|_| interaction.tick())
        .count() as u32;

    if interaction.is_saturated() {
        timer.pause();
        if steps > 0 {
            info!("Counter reached {}", interaction.counter());
        }
    }

    steps
}

pub fn tick_counter(
    time: Res<Time>,
    mut timer: ResMut<CounterTimer>,
    mut interaction: ResMut<DragDropInteraction>,
    mut advanced: EventWriter<CounterAdvanced>,
) {
    let steps = advance_counter(&mut timer.0, &mut interaction, time.delta());
    let value = interaction.counter();
    for step in 0..steps {
        advanced.send(CounterAdvanced(value - (steps - 1 - step)));
    }
}

pub fn update_score_text(
    interaction: Res<DragDropInteraction>,
    mut query: Query<&mut Text, With<ScoreText>>,
) {
    if !interaction.is_changed() {
        return;
    }
    if let Ok(mut text) = query.get_single_mut() {
        text.0 = score_label(interaction.counter());
    }
}

pub fn spawn_counter_labels(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut advanced: EventReader<CounterAdvanced>,
) {
    // Just above the points display
    let position = Vec2::new(
        90.0,
        -WINDOW_HEIGHT / 2.0 + SCORE_BOTTOM_PX + SCORE_FONT_SIZE * 1.5,
    );

    for CounterAdvanced(value) in advanced.read() {
        debug!("Counter advanced to {value}");
        spawn_floating_label(&mut commands, &asset_server, position, "+1", GREEN);
    }
}

/// Outlines every zone around the dragged token's home.
pub fn draw_zone_gizmos(
    active_drag: Res<ActiveDrag>,
    interaction: Res<DragDropInteraction>,
    tokens: Query<&FoodToken>,
    mut gizmos: Gizmos,
) {
    if !DEBUG_ZONES {
        return;
    }
    let Some(gesture) = active_drag.0 else {
        return;
    };
    let Some(token) = tokens.iter().find(|token| token.id == gesture.token) else {
        return;
    };

    for zone in interaction.zones() {
        let rect = zone.rect();
        let rect = Rect::from_corners(
            offset_to_world(token.home, rect.min),
            offset_to_world(token.home, rect.max),
        );
        let color = match zone.effect() {
            ZoneEffect::Absorb => RED,
            ZoneEffect::None => GREEN,
        };
        gizmos.rect_2d(Isometry2d::from_translation(rect.center()), rect.size(), color);
    }
}

#[cfg(test)]
mod tests {
    use bevy::input::InputPlugin;
    use bevy::input::touch::{TouchInput, TouchPhase};
    use bevy::time::TimeUpdateStrategy;
    use bits_helpers::input::Pointer;

    use super::*;
    use crate::core::config::{COUNTER_MAX, COUNTER_PERIOD_SECS};
    use crate::interaction::{DragPhase, TokenState};

    const FINGER: u64 = 7;
    const FIRST: TokenId = TokenId(0);

    /// Headless app with the drag systems and one token on screen.
    fn drag_app() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), InputPlugin))
            .init_resource::<DragDropInteraction>()
            .init_resource::<ActiveDrag>()
            .add_systems(Update, (handle_drag_input, sync_tokens).chain());

        let home = token_home(FIRST);
        let entity = app
            .world_mut()
            .spawn((
                FoodToken { id: FIRST, home },
                Transform::from_translation(home.extend(TOKEN_Z)),
                Visibility::Inherited,
            ))
            .id();
        app.update();

        (app, entity)
    }

    /// What a press on the token does once it has been picked.
    fn grab(app: &mut App, pointer: Pointer, origin: Vec2) {
        let world = app.world_mut();
        let started = world
            .resource_mut::<DragDropInteraction>()
            .on_drag_start(FIRST);
        assert!(started.is_ok(), "token exists");
        world.resource_mut::<ActiveDrag>().0 = Some(DragGesture {
            token: FIRST,
            pointer,
            origin,
        });
    }

    fn touch(app: &mut App, phase: TouchPhase, position: Vec2) {
        app.world_mut().send_event(TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id: FINGER,
        });
    }

    fn first_token(app: &App) -> TokenState {
        app.world()
            .resource::<DragDropInteraction>()
            .token(FIRST)
            .cloned()
            .expect("first token exists")
    }

    fn is_dragging(app: &App) -> bool {
        app.world().resource::<ActiveDrag>().0.is_some()
    }

    #[test]
    fn touch_drag_follows_the_finger_and_drops_on_the_plate() {
        let (mut app, entity) = drag_app();
        let origin = Vec2::new(100.0, 300.0);
        grab(&mut app, Pointer::Touch(FINGER), origin);

        touch(&mut app, TouchPhase::Started, origin);
        app.update();
        assert_eq!(first_token(&app).offset(), Vec2::ZERO, "no movement yet");

        touch(&mut app, TouchPhase::Moved, Vec2::new(150.0, 400.0));
        app.update();
        let token = first_token(&app);
        assert_eq!(token.offset(), Vec2::new(50.0, 100.0), "screen delta");
        assert_eq!(token.phase(), DragPhase::Dragging, "still held");

        let translation = app
            .world()
            .get::<Transform>(entity)
            .map(|transform| transform.translation.truncate());
        assert_eq!(
            translation,
            Some(token_home(FIRST) + Vec2::new(50.0, -100.0)),
            "moving down the screen moves down the world"
        );

        touch(&mut app, TouchPhase::Ended, Vec2::new(150.0, 400.0));
        app.update();
        let token = first_token(&app);
        assert_eq!(token.anchor(), Vec2::new(50.0, 100.0), "drop commits");
        assert_eq!(token.phase(), DragPhase::AtRest, "drag over");
        assert!(token.visible(), "plate keeps the food visible");
        assert!(!is_dragging(&app), "gesture released");
    }

    #[test]
    fn last_position_counts_before_classifying() {
        let (mut app, _) = drag_app();
        let origin = Vec2::new(200.0, 400.0);
        grab(&mut app, Pointer::Touch(FINGER), origin);

        touch(&mut app, TouchPhase::Started, origin);
        touch(&mut app, TouchPhase::Moved, Vec2::new(100.0, 300.0));
        app.update();
        let over_cereal = first_token(&app).offset();
        assert!(
            app.world()
                .resource::<DragDropInteraction>()
                .classify(over_cereal)
                .is_absorbed(),
            "hovering over the cereal"
        );

        // Slides off the cereal in the same frame it lifts
        touch(&mut app, TouchPhase::Moved, Vec2::new(250.0, 450.0));
        touch(&mut app, TouchPhase::Ended, Vec2::new(250.0, 450.0));
        app.update();
        let token = first_token(&app);
        assert_eq!(token.anchor(), Vec2::new(50.0, 50.0), "final position kept");
        assert!(token.visible(), "dropped on the plate, not the cereal");
    }

    #[test]
    fn canceled_touch_snaps_back() {
        let (mut app, entity) = drag_app();
        let origin = Vec2::new(100.0, 300.0);
        grab(&mut app, Pointer::Touch(FINGER), origin);

        touch(&mut app, TouchPhase::Started, origin);
        touch(&mut app, TouchPhase::Moved, Vec2::new(130.0, 340.0));
        app.update();
        assert_eq!(first_token(&app).offset(), Vec2::new(30.0, 40.0), "dragged");

        touch(&mut app, TouchPhase::Canceled, Vec2::new(130.0, 340.0));
        app.update();
        let token = first_token(&app);
        assert_eq!(token.offset(), token.anchor(), "back at the anchor");
        assert_eq!(token.anchor(), Vec2::ZERO, "anchor untouched");
        assert!(token.visible(), "visibility kept");
        assert!(!is_dragging(&app), "gesture dropped");
        assert_eq!(
            app.world()
                .get::<Transform>(entity)
                .map(|transform| transform.translation.truncate()),
            Some(token_home(FIRST)),
            "drawn at home again"
        );
    }

    #[test]
    fn drag_ends_when_its_pointer_is_gone() {
        let (mut app, _) = drag_app();
        // A tap lifted in the frame it landed leaves no release to see
        grab(&mut app, Pointer::Touch(FINGER), Vec2::ZERO);

        app.update();
        let token = first_token(&app);
        assert!(!is_dragging(&app), "gesture released");
        assert_eq!(token.phase(), DragPhase::AtRest, "drag ended");
        assert_eq!(token.anchor(), Vec2::ZERO, "token did not move");
        assert!(token.visible(), "still visible");
    }

    #[test]
    fn mouse_drag_ends_once_the_button_is_up() {
        let (mut app, _) = drag_app();
        grab(&mut app, Pointer::Mouse, Vec2::ZERO);

        app.update();
        assert!(!is_dragging(&app), "button was never held");
        assert_eq!(first_token(&app).phase(), DragPhase::AtRest, "drag ended");
    }

    #[test]
    fn sync_places_and_hides_tokens() {
        let (mut app, entity) = drag_app();
        {
            let mut interaction = app.world_mut().resource_mut::<DragDropInteraction>();
            let moved = interaction.on_drag_move(FIRST, Vec2::new(-100.0, -100.0));
            assert!(moved.is_ok(), "finite delta");
            let outcome = interaction.on_drag_end(FIRST);
            assert!(
                outcome.is_ok_and(|outcome| outcome.is_absorbed()),
                "dropped on the cereal"
            );
        }

        app.update();
        let world = app.world();
        assert_eq!(
            world
                .get::<Transform>(entity)
                .map(|transform| transform.translation),
            Some((token_home(FIRST) + Vec2::new(-100.0, 100.0)).extend(TOKEN_Z)),
            "offset up the screen is up in the world"
        );
        assert_eq!(
            world.get::<Visibility>(entity),
            Some(&Visibility::Hidden),
            "absorbed food is hidden"
        );
    }

    fn period() -> Duration {
        Duration::from_secs_f32(COUNTER_PERIOD_SECS)
    }

    #[test]
    fn counter_steps_once_per_period() {
        let mut timer = CounterTimer::default().0;
        let mut interaction = DragDropInteraction::default();

        assert_eq!(
            advance_counter(&mut timer, &mut interaction, period() / 2),
            0,
            "half a period does nothing"
        );
        assert_eq!(
            advance_counter(&mut timer, &mut interaction, period() / 2),
            1,
            "a full period steps once"
        );
        assert_eq!(
            advance_counter(&mut timer, &mut interaction, period() * 3),
            3,
            "a long frame catches up"
        );
        assert_eq!(interaction.counter(), 4, "four periods elapsed");
    }

    #[test]
    fn counter_timer_pauses_at_saturation() {
        let mut timer = CounterTimer::default().0;
        let mut interaction = DragDropInteraction::default();

        let steps = advance_counter(&mut timer, &mut interaction, period() * 15);
        assert_eq!(steps, COUNTER_MAX, "stops counting at the maximum");
        assert!(timer.paused(), "no reason to keep ticking");
        assert_eq!(
            advance_counter(&mut timer, &mut interaction, period()),
            0,
            "paused timer ignores time"
        );
        assert_eq!(interaction.counter(), COUNTER_MAX, "still saturated");
    }

    #[test]
    fn counter_runs_in_an_app() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(period()))
            .init_resource::<DragDropInteraction>()
            .init_resource::<CounterTimer>()
            .add_event::<CounterAdvanced>()
            .add_systems(Update, tick_counter);
        app.world_mut()
            .resource_mut::<Time<Virtual>>()
            .set_max_delta(period() * 2);

        for _ in 0..20 {
            app.update();
        }

        assert_eq!(
            app.world().resource::<DragDropInteraction>().counter(),
            COUNTER_MAX,
            "counter saturates"
        );
        assert!(
            app.world().resource::<CounterTimer>().0.paused(),
            "timer paused once saturated"
        );
    }

    #[test]
    fn pick_prefers_the_closest_token() {
        let tokens = [
            (TokenId(0), Vec2::new(0.0, 0.0)),
            (TokenId(1), Vec2::new(20.0, 0.0)),
        ];

        assert_eq!(
            pick_token(tokens.into_iter(), Vec2::new(15.0, 0.0)),
            Some(TokenId(1)),
            "closer disc wins"
        );
        assert_eq!(
            pick_token(tokens.into_iter(), Vec2::new(0.0, 200.0)),
            None,
            "press far from every disc"
        );
    }

    #[test]
    fn score_label_reads_points() {
        assert_eq!(score_label(7), "Points: 7", "label format");
    }
}
