//! Sun light placed relative to the city extent.

use bevy::prelude::*;

use crate::world::{z_up_to_y_up, CityConfig};

pub const SUN_NAME: &str = "SunLight";

/// Lux per unit of sun energy.
const LUX_PER_ENERGY: f32 = 25_000.0;

/// Marker for the scene sun.
#[derive(Component)]
pub struct Sun;

#[derive(Resource)]
pub struct SunConfig {
    /// Sun strength in host energy units.
    pub energy: f32,
    /// Position as multiples of the city size (Z-up).
    pub offset: Vec3,
    pub shadows: bool,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            energy: 4.0,
            offset: Vec3::new(0.8, -0.8, 1.2),
            shadows: true,
        }
    }
}

impl SunConfig {
    pub fn illuminance(&self) -> f32 {
        self.energy * LUX_PER_ENERGY
    }

    pub fn transform(&self, size: f32) -> Transform {
        Transform::from_translation(z_up_to_y_up(self.offset * size)).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

/// Create the sun if missing, otherwise update it in place.
pub fn upsert_sun(
    mut commands: Commands,
    config: Res<CityConfig>,
    sun_config: Res<SunConfig>,
    mut lights: Query<(&Name, &mut DirectionalLight, &mut Transform)>,
) {
    let light = DirectionalLight {
        illuminance: sun_config.illuminance(),
        shadows_enabled: sun_config.shadows,
        ..default()
    };
    let transform = sun_config.transform(config.size);

    if let Some((_, mut existing, mut existing_transform)) = lights
        .iter_mut()
        .find(|(name, _, _)| name.as_str() == SUN_NAME)
    {
        *existing = light;
        *existing_transform = transform;
        return;
    }

    commands.spawn((light, transform, Name::new(SUN_NAME), Sun));
}
