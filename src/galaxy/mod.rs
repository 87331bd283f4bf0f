mod galaxy_parameters;
mod generator;

pub use galaxy_parameters::{GalaxyParameters, GalaxyParametersPlugin, ParametersChanged};
pub use generator::{branch_angle, generate, generate_with, PointBuffer};
