use bevy::prelude::*;

/// Where a single-pointer gesture is at this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Pressed,
    Held,
    Released,
    /// Pressed and released within the same frame.
    Tapped,
}

impl PointerPhase {
    /// True for the phases that begin a gesture.
    pub const fn starts_gesture(self) -> bool {
        matches!(self, Self::Pressed | Self::Tapped)
    }
}

/// One frame of mouse or touch input, folded into a single pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    /// Screen or world space depending on the function that built the sample. `None` when
    /// the pointer is outside the window, which can happen on release.
    pub position: Option<Vec2>,
}

fn mouse_phase(button_input: &ButtonInput<MouseButton>) -> Option<PointerPhase> {
    let button = MouseButton::Left;
    match (
        button_input.just_pressed(button),
        button_input.just_released(button),
    ) {
        // still down at the end of the frame: an old press ended and a new one began
        (true, true) if button_input.pressed(button) => Some(PointerPhase::Pressed),
        (true, true) => Some(PointerPhase::Tapped),
        (true, false) => Some(PointerPhase::Pressed),
        (false, true) => Some(PointerPhase::Released),
        (false, false) => button_input.pressed(button).then_some(PointerPhase::Held),
    }
}

fn touch_phase(touch_input: &Touches) -> Option<(PointerPhase, Vec2)> {
    if let Some(touch) = touch_input.iter_just_pressed().next() {
        return Some(touch_input.get_released(touch.id()).map_or(
            (PointerPhase::Pressed, touch.position()),
            |released| (PointerPhase::Tapped, released.position()),
        ));
    }
    if let Some(touch) = touch_input.iter_just_released().next() {
        return Some((PointerPhase::Released, touch.position()));
    }
    touch_input
        .iter()
        .next()
        .map(|touch| (PointerPhase::Held, touch.position()))
}

/// Mouse wins over touch when both are active in the same frame.
pub fn pointer_screen_sample(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<PointerSample> {
    if let Some(phase) = mouse_phase(button_input) {
        let position = windows.get_single().ok().and_then(Window::cursor_position);
        return Some(PointerSample { phase, position });
    }
    touch_phase(touch_input).map(|(phase, position)| PointerSample {
        phase,
        position: Some(position),
    })
}

pub fn screen_to_world(
    position: Vec2,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let (camera, camera_transform) = camera.get_single().ok()?;

    camera
        .viewport_to_world(camera_transform, position)
        .map(|ray| ray.origin.truncate())
        .ok()
}

/// Same as [`pointer_screen_sample`] with the position in world space.
pub fn pointer_world_sample(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<PointerSample> {
    let sample = pointer_screen_sample(button_input, touch_input, windows)?;
    Some(PointerSample {
        position: sample
            .position
            .and_then(|position| screen_to_world(position, camera)),
        ..sample
    })
}

pub fn just_pressed_world_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let sample = pointer_world_sample(button_input, touch_input, windows, camera)?;
    if !sample.phase.starts_gesture() {
        return None;
    }
    sample.position
}
