use bevy::prelude::*;

/// Everything the generator needs to lay out one galaxy.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct GalaxyParameters {
    pub count: usize,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    /// radians of spin per unit of radius
    pub spin: f32,
    /// Shown in the panel, but the offset formula only uses `randomness_power`
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Color,
    pub outside_color: Color,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 10_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 1.0,
            randomness_power: 3.0,
            inside_color: Color::srgb_u8(0xf7, 0x25, 0x85),
            outside_color: Color::srgb_u8(0x43, 0x61, 0xee),
        }
    }
}

impl GalaxyParameters {
    pub const MIN: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 1,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Color::BLACK,
        outside_color: Color::BLACK,
    };
    pub const MAX: Self = Self {
        count: 10_000,
        size: 0.1,
        radius: 20.0,
        branches: 36,
        spin: 5.0,
        randomness: 2.0,
        randomness_power: 10.0,
        inside_color: Color::WHITE,
        outside_color: Color::WHITE,
    };

    pub fn set_count(&mut self, count: usize) -> bool {
        replace(
            &mut self.count,
            count.clamp(Self::MIN.count, Self::MAX.count),
        )
    }

    pub fn set_size(&mut self, size: f32) -> bool {
        replace(&mut self.size, size.clamp(Self::MIN.size, Self::MAX.size))
    }

    pub fn set_radius(&mut self, radius: f32) -> bool {
        replace(
            &mut self.radius,
            radius.clamp(Self::MIN.radius, Self::MAX.radius),
        )
    }

    pub fn set_branches(&mut self, branches: u32) -> bool {
        replace(
            &mut self.branches,
            branches.clamp(Self::MIN.branches, Self::MAX.branches),
        )
    }

    pub fn set_spin(&mut self, spin: f32) -> bool {
        replace(&mut self.spin, spin.clamp(Self::MIN.spin, Self::MAX.spin))
    }

    pub fn set_randomness(&mut self, randomness: f32) -> bool {
        replace(
            &mut self.randomness,
            randomness.clamp(Self::MIN.randomness, Self::MAX.randomness),
        )
    }

    pub fn set_randomness_power(&mut self, randomness_power: f32) -> bool {
        replace(
            &mut self.randomness_power,
            randomness_power.clamp(Self::MIN.randomness_power, Self::MAX.randomness_power),
        )
    }

    pub fn set_inside_color(&mut self, color: Color) -> bool {
        replace(&mut self.inside_color, color)
    }

    pub fn set_outside_color(&mut self, color: Color) -> bool {
        replace(&mut self.outside_color, color)
    }

    /// Runs every setter with the values from `edited`.
    /// Returns true if anything actually changed.
    pub fn commit(&mut self, edited: &GalaxyParameters) -> bool {
        // no short-circuiting, every field has to be written
        let changed = [
            self.set_count(edited.count),
            self.set_size(edited.size),
            self.set_radius(edited.radius),
            self.set_branches(edited.branches),
            self.set_spin(edited.spin),
            self.set_randomness(edited.randomness),
            self.set_randomness_power(edited.randomness_power),
            self.set_inside_color(edited.inside_color),
            self.set_outside_color(edited.outside_color),
        ];
        changed.contains(&true)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Sent once per committed edit, never for intermediate values of a drag
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ParametersChanged;

pub struct GalaxyParametersPlugin;

impl Plugin for GalaxyParametersPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxyParameters>()
            .add_event::<ParametersChanged>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sit_inside_ranges() {
        let mut params = GalaxyParameters::default();
        let untouched = params.clone();
        assert!(!params.commit(&untouched));
        assert_eq!(params, untouched);
    }

    #[test]
    fn setters_clamp_to_range() {
        let mut params = GalaxyParameters::default();

        assert!(params.set_branches(0));
        assert_eq!(params.branches, 1);

        assert!(params.set_count(250_000));
        assert_eq!(params.count, GalaxyParameters::MAX.count);

        assert!(params.set_spin(-12.0));
        assert_eq!(params.spin, -5.0);

        assert!(params.set_randomness_power(0.0));
        assert_eq!(params.randomness_power, 1.0);
    }

    #[test]
    fn setters_report_only_real_changes() {
        let mut params = GalaxyParameters::default();
        assert!(!params.set_radius(5.0));
        assert!(params.set_radius(7.5));
        assert!(!params.set_radius(7.5));
        assert!(!params.set_inside_color(Color::srgb_u8(0xf7, 0x25, 0x85)));
    }

    #[test]
    fn commit_writes_every_field() {
        let mut params = GalaxyParameters::default();
        let edited = GalaxyParameters {
            count: 400,
            branches: 5,
            outside_color: Color::srgb(0.1, 0.9, 0.2),
            ..default()
        };

        assert!(params.commit(&edited));
        assert_eq!(params, edited);
    }
}
