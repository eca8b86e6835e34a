//! World management: city parameters, terrain grid and height field.

use bevy::prelude::*;

pub mod grid;
pub mod terrain;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CityConfig>();
    }
}

/// Global generation parameters. Edit before a regeneration to change the city.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct CityConfig {
    /// Edge length of the square terrain in world units.
    pub size: f32,
    /// Number of grid cells along X.
    pub x_subdivisions: u32,
    /// Number of grid cells along Y (ground depth axis).
    pub y_subdivisions: u32,
    /// Terrain amplitude. 0.0 gives a flat ground.
    pub height_scale: f32,
    /// Frequency of the terrain waves.
    pub wave_frequency: f32,
    /// Lower bound of building height.
    pub min_building_height: f32,
    /// Upper bound of building height.
    pub max_building_height: f32,
    /// Fraction of each cell kept free as street (0.0 to 1.0).
    pub street_width_factor: f32,
    /// How far building bases sink below the terrain surface.
    pub embed_depth: f32,
    /// Fixed seed for building heights. `None` draws fresh entropy each run.
    pub seed: Option<u64>,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            x_subdivisions: 20,
            y_subdivisions: 30,
            height_scale: 0.0,
            wave_frequency: 0.0,
            min_building_height: 1.0,
            max_building_height: 7.0,
            street_width_factor: 0.5,
            embed_depth: 0.1,
            seed: None,
        }
    }
}

impl CityConfig {
    /// Copy of the config with values clamped into their usable ranges.
    ///
    /// A negative street factor would make neighbouring buildings overlap, so
    /// it is raised to 0.0. A factor of exactly 1.0 is kept and yields
    /// zero-footprint buildings.
    ///
    /// Non-finite values are replaced with their defaults.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut config = self.clone();

        finite_or_default("size", &mut config.size, defaults.size);
        finite_or_default("height_scale", &mut config.height_scale, defaults.height_scale);
        finite_or_default(
            "wave_frequency",
            &mut config.wave_frequency,
            defaults.wave_frequency,
        );
        finite_or_default(
            "min_building_height",
            &mut config.min_building_height,
            defaults.min_building_height,
        );
        finite_or_default(
            "max_building_height",
            &mut config.max_building_height,
            defaults.max_building_height,
        );
        finite_or_default(
            "street_width_factor",
            &mut config.street_width_factor,
            defaults.street_width_factor,
        );
        finite_or_default("embed_depth", &mut config.embed_depth, defaults.embed_depth);

        if !(0.0..=1.0).contains(&config.street_width_factor) {
            warn!(
                "street_width_factor {} outside 0..=1, clamping",
                config.street_width_factor
            );
            config.street_width_factor = config.street_width_factor.clamp(0.0, 1.0);
        }
        if config.size < 0.0 {
            warn!("Negative terrain size {}, using its magnitude", config.size);
            config.size = config.size.abs();
        }
        if config.embed_depth < 0.0 {
            warn!("Negative embed depth {}, using 0.0", config.embed_depth);
            config.embed_depth = 0.0;
        }

        config
    }
}

fn finite_or_default(field: &str, value: &mut f32, default: f32) {
    if !value.is_finite() {
        warn!("{} is {}, using default {}", field, value, default);
        *value = default;
    }
}

/// Convert a Z-up ground position (x, y, height) into Bevy's Y-up space.
pub fn z_up_to_y_up(point: Vec3) -> Vec3 {
    Vec3::new(point.x, point.z, -point.y)
}
