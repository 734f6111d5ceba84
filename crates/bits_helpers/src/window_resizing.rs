use bevy::math::Vec2;

/// Largest surface wgpu accepts on either axis in the browser.
///
/// Requesting more fails `Surface::configure` with a validation error.
pub const MAX_SURFACE_EXTENT: f32 = 2048.0;

/// Browser viewport size clamped to what the surface can be configured with.
pub fn fit_to_surface(target: Vec2) -> Vec2 {
    target.min(Vec2::splat(MAX_SURFACE_EXTENT))
}

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    mut primary_query: bevy::ecs::system::Query<
        &mut bevy::window::Window,
        bevy::ecs::query::With<bevy::window::PrimaryWindow>,
    >,
) {
    let Some(wasm_window) = web_sys::window() else {
        return;
    };
    let (Ok(inner_width), Ok(inner_height)) = (wasm_window.inner_width(), wasm_window.inner_height())
    else {
        return;
    };
    let (Some(width), Some(height)) = (inner_width.as_f64(), inner_height.as_f64()) else {
        return;
    };
    let target = fit_to_surface(Vec2::new(width as f32, height as f32));

    for mut window in &mut primary_query {
        let current = Vec2::new(window.resolution.width(), window.resolution.height());
        if (current - target).abs().max_element() > f32::EPSILON {
            window.resolution.set(target.x, target.y);
        }
    }
}
