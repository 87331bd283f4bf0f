use bevy::prelude::*;

mod camera;
mod config_egui;

pub use camera::{CameraPlugin, OrbitCamera};
pub use config_egui::{edit_finished, ConfigEguiPlugin, ParameterPanel};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((camera::CameraPlugin, config_egui::ConfigEguiPlugin));
    }
}
