//! Scene reset ahead of a generation run.

use bevy::prelude::*;

use super::buildings::BuildingCollection;
use super::GeneratedMesh;
use crate::world::terrain::TerrainGrid;

/// Despawn generated meshes and any building collection left empty by that.
///
/// Lights, cameras and materials are untouched; dressing upserts them.
pub fn clear_generated_scene(
    mut commands: Commands,
    generated: Query<(Entity, Option<&Parent>), With<GeneratedMesh>>,
    collections: Query<(Entity, Option<&Children>), With<BuildingCollection>>,
    owned: Query<(), With<GeneratedMesh>>,
) {
    let mut emptied = Vec::new();
    for (entity, children) in &collections {
        let only_generated = children
            .map(|children| children.iter().all(|child| owned.contains(*child)))
            .unwrap_or(true);
        if only_generated {
            emptied.push(entity);
        }
    }

    let mut cleared = 0;
    for (entity, parent) in &generated {
        cleared += 1;
        // Children of an emptied collection go with it.
        if parent.is_some_and(|parent| emptied.contains(&parent.get())) {
            continue;
        }
        commands.entity(entity).despawn_recursive();
    }

    for collection in emptied {
        commands.entity(collection).despawn_recursive();
    }

    commands.remove_resource::<TerrainGrid>();

    if cleared > 0 {
        info!("Cleared {} generated mesh entities", cleared);
    }
}
