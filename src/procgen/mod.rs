//! Procedural generation pipeline.
//!
//! - Scene reset (previous terrain and buildings)
//! - Height-field terrain
//! - One building per terrain vertex
//! - Scene dressing hooks in after [`GenerationStage::Buildings`]
//!
//! The stages run in order on any frame where [`GenerationRequest`] is
//! pending, so a regeneration replaces the city in a single update.

use bevy::prelude::*;

use crate::world::terrain::spawn_terrain;

pub mod buildings;
pub mod reset;

pub struct ProcgenPlugin;

impl Plugin for ProcgenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GenerationRequest>()
            .init_resource::<GenerationReport>()
            .configure_sets(
                Update,
                (
                    GenerationStage::Reset,
                    GenerationStage::Terrain,
                    GenerationStage::Buildings,
                    GenerationStage::Dressing,
                    GenerationStage::Finish,
                )
                    .chain()
                    .in_set(CityPipeline),
            )
            .configure_sets(Update, CityPipeline.run_if(generation_requested))
            .add_systems(
                Update,
                (
                    reset::clear_generated_scene.in_set(GenerationStage::Reset),
                    spawn_terrain.in_set(GenerationStage::Terrain),
                    buildings::spawn_buildings.in_set(GenerationStage::Buildings),
                    finish_generation.in_set(GenerationStage::Finish),
                ),
            );
    }
}

/// Parent set of every generation stage; gated on a pending request.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityPipeline;

/// Ordered stages of one generation run.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationStage {
    Reset,
    Terrain,
    Buildings,
    Dressing,
    Finish,
}

/// Marker for mesh entities owned by the generator. Cleared on every run.
#[derive(Component)]
pub struct GeneratedMesh;

/// Set `pending` to rebuild the city on the next update.
#[derive(Resource)]
pub struct GenerationRequest {
    pub pending: bool,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        // Generate once on the first frame.
        Self { pending: true }
    }
}

impl GenerationRequest {
    pub fn request(&mut self) {
        self.pending = true;
    }
}

/// Outcome of the most recent generation run.
#[derive(Resource, Default, Debug)]
pub struct GenerationReport {
    pub runs: u32,
    pub terrain_vertices: usize,
    pub buildings: usize,
    pub placement_error: Option<buildings::PlacementError>,
}

fn generation_requested(request: Res<GenerationRequest>) -> bool {
    request.pending
}

fn finish_generation(mut request: ResMut<GenerationRequest>, mut report: ResMut<GenerationReport>) {
    request.pending = false;
    report.runs += 1;
    info!(
        "City generation #{} finished: {} terrain vertices, {} buildings",
        report.runs, report.terrain_vertices, report.buildings
    );
}
