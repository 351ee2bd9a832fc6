use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub pitch: f32,
    pub yaw: f32,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            // Standing eye height, looking slightly down at the floor.
            focus_point: Vec3::new(0.0, 1.5, 2.5),
            pitch: -0.35,
            yaw: 0.0,
        }
    }
}

/// Fixed aim location for all placement, removal, and sampling raycasts.
pub fn viewport_center(window: &Window) -> Vec2 {
    Vec2::new(window.width() * 0.5, window.height() * 0.5)
}

/// World-space ray through the crosshair.
pub fn crosshair_ray(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    window: &Window,
) -> Option<Ray3d> {
    camera
        .viewport_to_world(camera_transform, viewport_center(window))
        .ok()
}

/// Free-look controller: right-drag to look, WASD + QE to move, scroll to
/// dolly along the view direction, shift/ctrl speed modifiers. The camera
/// transform eases towards the target each frame.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Read mouse motion
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Mouse motion with right click (look around)
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewport.yaw += -mouse_delta.x * yaw_sens;
        viewport.pitch += -mouse_delta.y * pitch_sens;
        viewport.pitch = viewport.pitch.clamp(-1.55, 1.55);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    let view_rot = Quat::from_euler(EulerRot::YXZ, viewport.yaw, viewport.pitch, 0.0);

    // Scroll dollies along the view direction
    if scroll_accum.abs() > f32::EPSILON {
        let forward = (view_rot * Vec3::NEG_Z).normalize();
        viewport.focus_point += forward * (scroll_accum * 0.4);
    }

    // Keyboard movement input
    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        move_input.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        move_input.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        move_input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        move_input.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        move_input.y += 1.0; // Up
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        move_input.y -= 1.0; // Down
    }

    if move_input != Vec3::ZERO {
        let forward = (view_rot * Vec3::Z).normalize();
        let right = (view_rot * Vec3::X).normalize();
        let up = Vec3::Y;

        // Adjust speed, shift = faster, ctrl = slower
        let mut speed = 1.6;
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            speed *= 3.5;
        }
        if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
            speed *= 0.25;
        }

        let world_delta = right * move_input.x + up * move_input.y + forward * move_input.z;
        viewport.focus_point += world_delta.normalize() * speed * time.delta_secs();
    }

    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(viewport.focus_point, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(view_rot, lerp_speed);
}
