//! BlockCity - procedural block city generator
//!
//! Builds a wave-displaced terrain grid, drops one box building on every
//! grid vertex and dresses the scene with a sun, a camera and two materials.
//! Press `R` to regenerate.

use bevy::{
    prelude::*,
    render::{
        settings::{PowerPreference, WgpuSettings},
        RenderPlugin as BevyRenderPlugin,
    },
};

mod camera;
mod procgen;
mod render;
#[cfg(test)]
mod test_harness;
mod world;

fn main() {
    // Force Vulkan backend on Windows (DX12 causes crashes on some systems)
    #[cfg(target_os = "windows")]
    std::env::set_var("WGPU_BACKEND", "vulkan");
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "BlockCity".into(),
                        resolution: (1280., 720.).into(),
                        ..default()
                    }),
                    ..default()
                })
                // Ask for the high-throughput adapter; render::device reports what we got.
                .set(BevyRenderPlugin {
                    render_creation: WgpuSettings {
                        power_preference: PowerPreference::HighPerformance,
                        ..default()
                    }
                    .into(),
                    ..default()
                }),
        )
        // City parameters
        .add_plugins(world::WorldPlugin)
        // Generation pipeline
        .add_plugins(procgen::ProcgenPlugin)
        // Scene dressing
        .add_plugins(render::RenderPlugin)
        .add_plugins(camera::CameraPlugin)
        // Interactive controls (need window input)
        .add_plugins(camera::CameraControlsPlugin)
        .run();
}
