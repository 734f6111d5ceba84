use bevy::input::touch::Touch;
use bevy::prelude::*;

/// A pointer that can hold a drag: the left mouse button or one finger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pointer {
    Mouse,
    Touch(u64),
}

/// Screen-space press, Y pointing down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPress {
    pub pointer: Pointer,
    pub position: Vec2,
}

fn cursor_position(windows: &Query<&Window>) -> Option<Vec2> {
    windows.get_single().ok()?.cursor_position()
}

/// First pointer pressed this frame, mouse before touch.
pub fn just_pressed_pointer(
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<PointerPress> {
    if button_input.just_pressed(MouseButton::Left) {
        let position = cursor_position(windows)?;
        Some(PointerPress {
            pointer: Pointer::Mouse,
            position,
        })
    } else {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(PointerPress {
            pointer: Pointer::Touch(touch.id()),
            position: touch.position(),
        })
    }
}

/// Current screen position of a pointer that is still held down.
pub fn held_pointer_position(
    pointer: Pointer,
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    match pointer {
        Pointer::Mouse if button_input.pressed(MouseButton::Left) => cursor_position(windows),
        Pointer::Mouse => None,
        Pointer::Touch(id) => touch_input.get_pressed(id).map(Touch::position),
    }
}

/// Whether a pointer is still down, wherever it is.
pub fn pointer_held(
    pointer: Pointer,
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
) -> bool {
    match pointer {
        Pointer::Mouse => button_input.pressed(MouseButton::Left),
        Pointer::Touch(id) => touch_input.get_pressed(id).is_some(),
    }
}

/// A pointer lifted this frame. The mouse can be released outside the window,
/// in which case there is no position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerRelease {
    pub position: Option<Vec2>,
}

pub fn released_pointer(
    pointer: Pointer,
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<PointerRelease> {
    match pointer {
        Pointer::Mouse if button_input.just_released(MouseButton::Left) => Some(PointerRelease {
            position: cursor_position(windows),
        }),
        Pointer::Mouse => None,
        Pointer::Touch(id) => touch_input.get_released(id).map(|touch| PointerRelease {
            position: Some(touch.position()),
        }),
    }
}

/// Whether the platform took the pointer away (touch canceled).
pub fn pointer_canceled(pointer: Pointer, touch_input: &Touches) -> bool {
    match pointer {
        Pointer::Mouse => false,
        Pointer::Touch(id) => touch_input.iter_just_canceled().any(|touch| touch.id() == id),
    }
}

pub fn screen_to_world(
    camera: &Query<(&Camera, &GlobalTransform)>,
    position: Vec2,
) -> Option<Vec2> {
    let (camera, camera_transform) = camera.get_single().ok()?;

    camera
        .viewport_to_world(camera_transform, position)
        .map(|ray| ray.origin.truncate())
        .ok()
}
