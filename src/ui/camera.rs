use bevy::{
    core_pipeline::tonemapping::Tonemapping,
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
    render::camera::{PerspectiveProjection, Projection},
    transform::TransformSystem,
};
use bevy_egui::EguiContexts;
use std::f32::consts::FRAC_PI_2;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(
                PostUpdate,
                camera_control_system.before(TransformSystem::TransformPropagate),
            );
    }
}

const START_POSITION: Vec3 = Vec3::new(3.0, 3.0, 3.0);
const ROTATE_SPEED: f32 = 0.005;
const DAMPING_FACTOR: f32 = 0.05;
const MIN_DISTANCE: f32 = 0.1;
const MAX_DISTANCE: f32 = 50.0;
// keeps the orbit from flipping over the poles
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);
    commands.spawn((
        Camera3d::default(),
        // vertex colors go to the screen as picked in the panel
        Tonemapping::None,
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Transform::from_translation(START_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::from_position(START_POSITION, Vec3::ZERO),
    ));
}

/// Orbit controls with damping, the camera keeps drifting briefly after a drag
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    smooth_zoom_buffer: f32,
}

impl OrbitCamera {
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length();
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).asin(),
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            smooth_zoom_buffer: 0.0,
        }
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance
    }

    pub fn look_pos(&self) -> Vec3 {
        self.target
    }

    /// Feeds a pointer drag into the angular velocity
    pub fn push(&mut self, drag: Vec2) {
        self.yaw_velocity -= drag.x * ROTATE_SPEED;
        self.pitch_velocity += drag.y * ROTATE_SPEED;
    }

    pub fn zoom(&mut self, amount: f32) {
        self.smooth_zoom_buffer += amount;
    }

    /// Applies one frame of motion, then lets velocity decay
    pub fn update(&mut self) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-MAX_PITCH, MAX_PITCH);
        self.yaw_velocity *= 1.0 - DAMPING_FACTOR;
        self.pitch_velocity *= 1.0 - DAMPING_FACTOR;

        // scroll delta is cached to a buffer
        // buffer is converted to actual zoom over time for a smooth zooming effect
        let smooth_zoom_min = 0.001f32;
        let smooth_zoom_factor = 0.2f32;

        let smooth_zoom_amount = if self.smooth_zoom_buffer < 0.0 {
            f32::min(
                self.smooth_zoom_buffer * smooth_zoom_factor,
                (-smooth_zoom_min).max(self.smooth_zoom_buffer),
            )
        } else {
            f32::max(
                self.smooth_zoom_buffer * smooth_zoom_factor,
                smooth_zoom_min.min(self.smooth_zoom_buffer),
            )
        };
        self.smooth_zoom_buffer -= smooth_zoom_amount;
        self.distance =
            (self.distance * (1.0 - smooth_zoom_amount)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };

    let ctx = contexts.ctx_mut();
    let pointer_captured = ctx.wants_pointer_input() || ctx.is_pointer_over_area();

    let drag: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    if !pointer_captured && mouse_buttons.pressed(MouseButton::Left) {
        orbit.push(drag);
    }

    for ev in scroll_evr.read() {
        if pointer_captured {
            continue;
        }
        match ev.unit {
            MouseScrollUnit::Line => orbit.zoom(ev.y * 0.05),
            MouseScrollUnit::Pixel => orbit.zoom(ev.y * 0.005),
        }
    }

    orbit.update();

    transform.translation = orbit.translation();
    transform.look_at(orbit.look_pos(), Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_where_it_was_placed() {
        let orbit = OrbitCamera::from_position(START_POSITION, Vec3::ZERO);
        assert!(orbit.translation().distance(START_POSITION) < 1e-4);
    }

    #[test]
    fn drag_keeps_drifting_then_settles() {
        let mut orbit = OrbitCamera::from_position(START_POSITION, Vec3::ZERO);
        orbit.push(Vec2::new(40.0, 0.0));

        orbit.update();
        let after_drag = orbit.translation();
        orbit.update();
        assert_ne!(orbit.translation(), after_drag);

        for _ in 0..1_000 {
            orbit.update();
        }
        let settled = orbit.translation();
        orbit.update();
        assert!(orbit.translation().distance(settled) < 1e-5);
        // orbiting never changes the distance to the target
        assert!((settled.length() - START_POSITION.length()).abs() < 1e-4);
    }

    #[test]
    fn pitch_stops_short_of_the_pole() {
        let mut orbit = OrbitCamera::from_position(START_POSITION, Vec3::ZERO);
        orbit.push(Vec2::new(0.0, 100_000.0));
        orbit.update();
        assert!(orbit.translation().y < START_POSITION.length());
    }

    #[test]
    fn scrolling_up_moves_closer() {
        let mut orbit = OrbitCamera::from_position(START_POSITION, Vec3::ZERO);
        orbit.zoom(0.5);
        for _ in 0..100 {
            orbit.update();
        }
        assert!(orbit.translation().length() < START_POSITION.length());
    }
}
