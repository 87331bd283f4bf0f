use bevy::prelude::*;

mod point_cloud;
mod points_material;
mod viewport;

pub use point_cloud::{
    build_mesh, galaxy_rotation, GalaxyDisposed, GalaxyPointCloud, GalaxyPoints, PointCloudPlugin,
};
pub use points_material::{GalaxyPointsMaterial, GalaxyPointsMaterialPlugin, PointParams};
pub use viewport::{pixel_ratio_override, ViewportPlugin, MAX_PIXEL_RATIO};

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GalaxyPointsMaterialPlugin,
            PointCloudPlugin,
            ViewportPlugin,
        ));
    }
}
