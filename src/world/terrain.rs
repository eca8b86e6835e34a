//! Terrain generation from a closed-form wave height field.

use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
    },
};

use super::{grid::GridLayout, z_up_to_y_up, CityConfig};
use crate::procgen::GeneratedMesh;

/// Marker component for the terrain entity.
#[derive(Component)]
pub struct Terrain;

/// Name the terrain entity is registered under.
pub const TERRAIN_NAME: &str = "Terrain";

/// Wave height field: two superimposed sine/cosine products.
///
/// `height_scale = 0` flattens the terrain for any frequency, and
/// `frequency = 0` yields the constant `height_scale / 2 * sin(1)`.
pub fn wave_height(x: f32, y: f32, frequency: f32, height_scale: f32) -> f32 {
    let offset_x = x * frequency;
    let offset_y = y * frequency;
    let primary = offset_x.sin() * offset_y.cos();
    let secondary = (offset_x * 0.5 + 1.0).sin() * (offset_y * 0.5).cos();
    (primary + secondary) * height_scale / 2.0
}

/// Displaced terrain vertices, kept around so buildings can sit on them.
#[derive(Resource, Clone, Debug)]
pub struct TerrainGrid {
    pub layout: GridLayout,
    /// Z-up positions (x, y, height), row-major.
    pub vertices: Vec<Vec3>,
}

impl TerrainGrid {
    pub fn generate(config: &CityConfig) -> Self {
        let layout = GridLayout::from_config(config);
        let vertices = layout
            .positions()
            .map(|p| {
                let height = wave_height(p.x, p.y, config.wave_frequency, config.height_scale);
                p.extend(height)
            })
            .collect();

        Self { layout, vertices }
    }

    fn height_at(&self, column: usize, row: usize) -> f32 {
        self.vertices[row * self.layout.columns() + column].z
    }

    /// Build a renderable triangle mesh in Bevy's Y-up space.
    pub fn to_mesh(&self) -> Mesh {
        let columns = self.layout.columns();
        let rows = self.layout.rows();
        let step = Vec2::new(
            self.layout.size / self.layout.x_subdivisions.max(1) as f32,
            self.layout.size / self.layout.y_subdivisions.max(1) as f32,
        );

        let positions: Vec<[f32; 3]> = self
            .vertices
            .iter()
            .map(|v| z_up_to_y_up(*v).to_array())
            .collect();

        let mut normals: Vec<[f32; 3]> = Vec::with_capacity(self.vertices.len());
        let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(self.vertices.len());
        for row in 0..rows {
            for column in 0..columns {
                let h = self.height_at(column, row);
                let h_left = if column > 0 { self.height_at(column - 1, row) } else { h };
                let h_right = if column + 1 < columns { self.height_at(column + 1, row) } else { h };
                let h_down = if row > 0 { self.height_at(column, row - 1) } else { h };
                let h_up = if row + 1 < rows { self.height_at(column, row + 1) } else { h };

                let slope_x = if columns > 1 { (h_right - h_left) / (2.0 * step.x) } else { 0.0 };
                let slope_y = if rows > 1 { (h_up - h_down) / (2.0 * step.y) } else { 0.0 };
                let normal = z_up_to_y_up(Vec3::new(-slope_x, -slope_y, 1.0).normalize());
                normals.push(normal.to_array());

                uvs.push([
                    column as f32 / (columns - 1).max(1) as f32,
                    row as f32 / (rows - 1).max(1) as f32,
                ]);
            }
        }

        // Two triangles per cell, CCW seen from above once Y maps to -Z.
        let mut indices: Vec<u32> =
            Vec::with_capacity((columns - 1) * (rows.saturating_sub(1)) * 6);
        for row in 0..rows.saturating_sub(1) {
            for column in 0..columns - 1 {
                let near_left = (row * columns + column) as u32;
                let near_right = near_left + 1;
                let far_left = ((row + 1) * columns + column) as u32;
                let far_right = far_left + 1;

                indices.extend_from_slice(&[near_left, near_right, far_left]);
                indices.extend_from_slice(&[near_right, far_right, far_left]);
            }
        }

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh.insert_indices(Indices::U32(indices));
        mesh
    }
}

/// Synthesize the height field and spawn the terrain mesh.
pub fn spawn_terrain(
    mut commands: Commands,
    config: Res<CityConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let config = config.sanitized();
    let grid = TerrainGrid::generate(&config);
    info!(
        "Terrain grid {}x{} with {} vertices",
        config.x_subdivisions,
        config.y_subdivisions,
        grid.vertices.len()
    );

    commands.spawn((
        Mesh3d(meshes.add(grid.to_mesh())),
        Transform::IDENTITY,
        Name::new(TERRAIN_NAME),
        Terrain,
        GeneratedMesh,
    ));
    commands.insert_resource(grid);
}
