//! Regular ground grid: vertex layout and cell spacing.

#![allow(dead_code)]

use bevy::prelude::*;

use super::CityConfig;

/// Square grid centred on the origin, subdivided independently per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub size: f32,
    pub x_subdivisions: u32,
    pub y_subdivisions: u32,
}

impl GridLayout {
    pub fn new(size: f32, x_subdivisions: u32, y_subdivisions: u32) -> Self {
        Self {
            size,
            x_subdivisions,
            y_subdivisions,
        }
    }

    pub fn from_config(config: &CityConfig) -> Self {
        Self::new(config.size, config.x_subdivisions, config.y_subdivisions)
    }

    /// Vertices along X. An axis with no subdivisions collapses to one vertex.
    pub fn columns(&self) -> usize {
        self.x_subdivisions as usize + 1
    }

    /// Vertices along Y.
    pub fn rows(&self) -> usize {
        self.y_subdivisions as usize + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Cell width along each axis, or `None` if either axis has no cells.
    pub fn cell_size(&self) -> Option<Vec2> {
        if self.x_subdivisions == 0 || self.y_subdivisions == 0 {
            return None;
        }
        Some(Vec2::new(
            self.size / self.x_subdivisions as f32,
            self.size / self.y_subdivisions as f32,
        ))
    }

    /// Ground position of vertex (column, row), row-major from the -X/-Y corner.
    pub fn vertex_position(&self, column: usize, row: usize) -> Vec2 {
        Vec2::new(
            axis_coordinate(self.size, self.x_subdivisions, column),
            axis_coordinate(self.size, self.y_subdivisions, row),
        )
    }

    /// All ground positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.rows())
            .flat_map(move |row| (0..self.columns()).map(move |column| (column, row)))
            .map(|(column, row)| self.vertex_position(column, row))
    }
}

fn axis_coordinate(size: f32, subdivisions: u32, index: usize) -> f32 {
    if subdivisions == 0 {
        return 0.0;
    }
    let step = size / subdivisions as f32;
    index as f32 * step - size / 2.0
}
