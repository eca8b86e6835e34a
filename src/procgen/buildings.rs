//! Building placement: one box per terrain vertex.
//!
//! Each building fills its grid cell minus the street margin, takes a random
//! height between the configured bounds and sinks its base slightly below
//! the terrain so uneven ground never shows a gap.

#![allow(dead_code)]

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{GeneratedMesh, GenerationReport};
use crate::world::{terrain::TerrainGrid, z_up_to_y_up, CityConfig};

/// Name of the collection entity that parents every building.
pub const BUILDING_COLLECTION_NAME: &str = "Buildings";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("grid subdivisions cannot be zero (got {x} x {y})")]
    ZeroSubdivisions { x: u32, y: u32 },
    #[error("terrain grid not found")]
    MissingTerrain,
}

/// Marker for a spawned building.
#[derive(Component)]
pub struct Building {
    pub index: usize,
}

/// Groups all buildings of a run under one parent.
#[derive(Component)]
pub struct BuildingCollection;

/// Planned box building in Z-up ground space.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingPlan {
    pub index: usize,
    /// Ground position of the source vertex.
    pub position: Vec2,
    /// Terrain height at the source vertex.
    pub terrain_height: f32,
    /// Horizontal extent along X and Y.
    pub footprint: Vec2,
    pub height: f32,
    /// Bottom face height (terrain height minus embed depth).
    pub base_z: f32,
}

impl BuildingPlan {
    pub fn name(&self) -> String {
        format!("Building_{:03}", self.index)
    }

    pub fn center_z(&self) -> f32 {
        self.base_z + self.height / 2.0
    }

    /// Transform of a unit cube stretched to this building, in Y-up space.
    pub fn transform(&self) -> Transform {
        let center = z_up_to_y_up(self.position.extend(self.center_z()));
        Transform::from_translation(center).with_scale(Vec3::new(
            self.footprint.x,
            self.height,
            self.footprint.y,
        ))
    }

    pub fn is_degenerate(&self) -> bool {
        // NaN compares false, so it counts as degenerate too.
        !(self.footprint.x > 0.0 && self.footprint.y > 0.0)
    }
}

/// Footprint of a building in a cell of `cell_size`, leaving the street margin.
pub fn building_footprint(cell_size: Vec2, street_width_factor: f32) -> Vec2 {
    cell_size * (1.0 - street_width_factor)
}

/// Plan one building per terrain vertex, in vertex order.
pub fn plan_buildings<R: Rng>(
    grid: &TerrainGrid,
    config: &CityConfig,
    rng: &mut R,
) -> Result<Vec<BuildingPlan>, PlacementError> {
    let cell_size = grid
        .layout
        .cell_size()
        .ok_or(PlacementError::ZeroSubdivisions {
            x: grid.layout.x_subdivisions,
            y: grid.layout.y_subdivisions,
        })?;
    let footprint = building_footprint(cell_size, config.street_width_factor);

    let low = config.min_building_height.min(config.max_building_height);
    let high = config.min_building_height.max(config.max_building_height);

    let plans = grid
        .vertices
        .iter()
        .enumerate()
        .map(|(index, vertex)| {
            let height = rng.gen_range(low..=high);
            BuildingPlan {
                index,
                position: vertex.truncate(),
                terrain_height: vertex.z,
                footprint,
                height,
                base_z: vertex.z - config.embed_depth,
            }
        })
        .collect();

    Ok(plans)
}

fn placement_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Spawn the planned buildings under the `Buildings` collection, reusing one
/// that survived the reset.
pub fn spawn_buildings(
    mut commands: Commands,
    config: Res<CityConfig>,
    grid: Option<Res<TerrainGrid>>,
    collections: Query<Entity, With<BuildingCollection>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut report: ResMut<GenerationReport>,
) {
    let config = config.sanitized();
    report.terrain_vertices = grid.as_ref().map(|grid| grid.vertices.len()).unwrap_or(0);
    report.buildings = 0;
    report.placement_error = None;

    let plans = match grid {
        Some(grid) => plan_buildings(&grid, &config, &mut placement_rng(config.seed)),
        None => Err(PlacementError::MissingTerrain),
    };
    let plans = match plans {
        Ok(plans) => plans,
        Err(err) => {
            error!("Building placement aborted: {}", err);
            report.placement_error = Some(err);
            return;
        }
    };

    info!("Spawning {} buildings...", plans.len());

    let cube_mesh = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    let collection = match collections.iter().next() {
        Some(existing) => existing,
        None => commands
            .spawn((
                Transform::IDENTITY,
                Visibility::default(),
                Name::new(BUILDING_COLLECTION_NAME),
                BuildingCollection,
            ))
            .id(),
    };

    let mut degenerate = 0;
    for plan in &plans {
        // Zero-area boxes have a singular transform; keep them but don't draw them.
        let visibility = if plan.is_degenerate() {
            degenerate += 1;
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };

        let building = commands
            .spawn((
                Mesh3d(cube_mesh.clone()),
                plan.transform(),
                visibility,
                Name::new(plan.name()),
                Building { index: plan.index },
                GeneratedMesh,
            ))
            .id();
        commands.entity(collection).add_child(building);
    }

    if degenerate > 0 {
        warn!("{} buildings have a zero footprint", degenerate);
    }
    report.buildings = plans.len();
}
