use super::GalaxyParameters;
use bevy::color::{LinearRgba, Mix};
use rand::prelude::*;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Positions and linear colors of one generated galaxy, one entry per point
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointBuffer {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl PointBuffer {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat xyz triples, `len() * 3` floats
    pub fn positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Flat rgb triples, `len() * 3` floats
    pub fn colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = (&[f32; 3], &[f32; 3])> {
        self.positions.iter().zip(self.colors.iter())
    }
}

/// Arm angle for point `index`, arms are dealt out round-robin
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches as usize;
    (index % branches) as f32 / branches as f32 * TAU
}

struct ColorRamp {
    inside: LinearRgba,
    outside: LinearRgba,
}

impl ColorRamp {
    fn new(params: &GalaxyParameters) -> Self {
        Self {
            inside: params.inside_color.to_linear(),
            outside: params.outside_color.to_linear(),
        }
    }

    fn sample(&self, t: f32) -> [f32; 3] {
        let c = self.inside.mix(&self.outside, t);
        [c.red, c.green, c.blue]
    }
}

/// Signed offset, heavily biased towards zero for large powers
fn random_offset<R: Rng + ?Sized>(rng: &mut R, power: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(power);
    if rng.random::<f32>() < 0.5 {
        magnitude
    } else {
        -magnitude
    }
}

fn sample_point<R: Rng + ?Sized>(
    index: usize,
    params: &GalaxyParameters,
    ramp: &ColorRamp,
    rng: &mut R,
) -> ([f32; 3], [f32; 3]) {
    let radius = rng.random::<f32>() * params.radius;
    let spin_angle = radius * params.spin;
    let angle = branch_angle(index, params.branches) + spin_angle;

    let offset_x = random_offset(rng, params.randomness_power);
    let offset_y = random_offset(rng, params.randomness_power);
    let offset_z = random_offset(rng, params.randomness_power);

    let position = [
        angle.cos() * radius + offset_x,
        offset_y,
        angle.sin() * radius + offset_z,
    ];

    let t = if params.radius > 0.0 {
        (radius / params.radius).clamp(0.0, 1.0)
    } else {
        0.0
    };

    (position, ramp.sample(t))
}

/// Generates a galaxy drawing every random number from `rng`, points in index order.
/// The same parameters and the same random sequence always give the same buffer.
pub fn generate_with<R: Rng + ?Sized>(params: &GalaxyParameters, rng: &mut R) -> PointBuffer {
    let ramp = ColorRamp::new(params);

    let (positions, colors) = (0..params.count)
        .map(|i| sample_point(i, params, &ramp, rng))
        .unzip();

    PointBuffer { positions, colors }
}

/// Generates a galaxy across the rayon pool, each worker with its own thread rng
pub fn generate(params: &GalaxyParameters) -> PointBuffer {
    let ramp = ColorRamp::new(params);

    let mut positions = vec![[0.0; 3]; params.count];
    let mut colors = vec![[0.0; 3]; params.count];

    positions
        .par_iter_mut()
        .zip(colors.par_iter_mut())
        .enumerate()
        .for_each_init(rand::rng, |rng, (i, (position, color))| {
            (*position, *color) = sample_point(i, params, &ramp, rng);
        });

    PointBuffer { positions, colors }
}
