//! Named flat-colour materials for terrain and buildings.

#![allow(dead_code)]

use std::collections::HashMap;

use bevy::prelude::*;

use crate::procgen::buildings::{Building, BuildingCollection};
use crate::world::terrain::Terrain;

pub const TERRAIN_MATERIAL: &str = "TerrainMaterial";
pub const BUILDING_MATERIAL: &str = "BuildingMaterial";

/// Materials registered by name so regenerations reuse them.
#[derive(Resource, Default)]
pub struct MaterialLibrary {
    by_name: HashMap<String, Handle<StandardMaterial>>,
}

impl MaterialLibrary {
    pub fn get(&self, name: &str) -> Option<&Handle<StandardMaterial>> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Return the material called `name`, creating it with `create` if it is
    /// unknown or its asset has been removed. Existing materials keep
    /// whatever edits were made to them.
    pub fn upsert(
        &mut self,
        name: &str,
        materials: &mut Assets<StandardMaterial>,
        create: impl FnOnce() -> StandardMaterial,
    ) -> Handle<StandardMaterial> {
        if let Some(handle) = self.by_name.get(name) {
            if materials.contains(handle.id()) {
                return handle.clone();
            }
        }

        let handle = materials.add(create());
        self.by_name.insert(name.to_string(), handle.clone());
        handle
    }
}

pub fn terrain_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(0.15, 0.2, 0.1),
        perceptual_roughness: 0.9,
        ..default()
    }
}

pub fn building_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(0.7, 0.7, 0.72),
        perceptual_roughness: 0.7,
        metallic: 0.0,
        ..default()
    }
}

/// Assign the terrain material to the terrain and the building material to
/// every building in a collection, replacing previous assignments.
pub fn assign_materials(
    mut commands: Commands,
    mut library: ResMut<MaterialLibrary>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    terrain: Query<Entity, With<Terrain>>,
    collections: Query<&Children, With<BuildingCollection>>,
    buildings: Query<(), (With<Building>, With<Mesh3d>)>,
) {
    let terrain_handle = library.upsert(TERRAIN_MATERIAL, &mut materials, terrain_material);
    for entity in &terrain {
        commands
            .entity(entity)
            .insert(MeshMaterial3d(terrain_handle.clone()));
    }

    let building_handle = library.upsert(BUILDING_MATERIAL, &mut materials, building_material);
    for children in &collections {
        for &child in children.iter() {
            if buildings.contains(child) {
                commands
                    .entity(child)
                    .insert(MeshMaterial3d(building_handle.clone()));
            }
        }
    }
}
