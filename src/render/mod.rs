//! Scene dressing: sun light, materials and render device settings.
//!
//! Everything here is upserted by name, so a regeneration updates the
//! existing light and materials instead of stacking new ones.

use bevy::prelude::*;

use crate::procgen::GenerationStage;

pub mod device;
pub mod lighting;
pub mod materials;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<device::RenderSettings>()
            .init_resource::<lighting::SunConfig>()
            .init_resource::<materials::MaterialLibrary>()
            .add_systems(
                Update,
                (
                    device::select_render_device,
                    lighting::upsert_sun,
                    materials::assign_materials,
                )
                    .in_set(GenerationStage::Dressing),
            );
    }
}
