use bevy::{prelude::*, window::WindowResized};

/// Upper bound on the device pixel ratio the window renders at
pub const MAX_PIXEL_RATIO: f32 = 2.0;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (cap_pixel_ratio, log_resizes));
    }
}

/// The scale factor override to apply for a device reporting `base`, if any
pub fn pixel_ratio_override(base: f32) -> Option<f32> {
    (base > MAX_PIXEL_RATIO).then_some(MAX_PIXEL_RATIO)
}

fn cap_pixel_ratio(mut windows: Query<&mut Window, Changed<Window>>) {
    for mut window in &mut windows {
        let wanted = pixel_ratio_override(window.resolution.base_scale_factor());
        if window.resolution.scale_factor_override() != wanted {
            info!(pixel_ratio = ?wanted, "Capping window pixel ratio");
            window.resolution.set_scale_factor_override(wanted);
        }
    }
}

// camera aspect and surface size follow the window on their own, this is just for the logs
fn log_resizes(mut resizes: EventReader<WindowResized>) {
    for resize in resizes.read() {
        debug!(width = resize.width, height = resize.height, "Window resized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dense_displays_get_capped() {
        assert_eq!(pixel_ratio_override(1.0), None);
        assert_eq!(pixel_ratio_override(2.0), None);
        assert_eq!(pixel_ratio_override(3.0), Some(2.0));
    }
}
