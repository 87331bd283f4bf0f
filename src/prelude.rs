pub use crate::galaxy::{GalaxyParameters, ParametersChanged, PointBuffer};
pub use crate::graphics::{GalaxyPointCloud, GalaxyPoints};
