//! Headless app for exercising the generation pipeline without a window or
//! renderer.

use bevy::{ecs::query::QueryFilter, prelude::*};

use crate::camera::CameraPlugin;
use crate::procgen::{GenerationReport, GenerationRequest, ProcgenPlugin};
use crate::render::RenderPlugin;
use crate::world::{CityConfig, WorldPlugin};

pub struct TestCity {
    app: App,
}

impl TestCity {
    /// Build the app with `config` and run the first generation.
    pub fn new(config: CityConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .add_plugins(WorldPlugin)
            .add_plugins(ProcgenPlugin)
            .add_plugins(RenderPlugin)
            .add_plugins(CameraPlugin)
            .insert_resource(config);

        app.update();
        Self { app }
    }

    pub fn seeded() -> Self {
        Self::new(CityConfig {
            seed: Some(42),
            ..default()
        })
    }

    /// Request another generation and run it.
    pub fn regenerate(&mut self) -> &mut Self {
        self.app
            .world_mut()
            .resource_mut::<GenerationRequest>()
            .request();
        self.app.update();
        self
    }

    pub fn tick(&mut self) -> &mut Self {
        self.app.update();
        self
    }

    pub fn config_mut(&mut self) -> Mut<'_, CityConfig> {
        self.app.world_mut().resource_mut::<CityConfig>()
    }

    pub fn resource<R: Resource>(&self) -> &R {
        self.app.world().resource::<R>()
    }

    pub fn report(&self) -> &GenerationReport {
        self.resource::<GenerationReport>()
    }

    pub fn count<F: QueryFilter>(&mut self) -> usize {
        let world = self.app.world_mut();
        let mut state = world.query_filtered::<Entity, F>();
        state.iter(world).count()
    }

    pub fn names<F: QueryFilter>(&mut self) -> Vec<String> {
        let world = self.app.world_mut();
        let mut state = world.query_filtered::<&Name, F>();
        let mut names: Vec<String> = state.iter(world).map(|n| n.as_str().to_string()).collect();
        names.sort();
        names
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::SceneCamera;
    use crate::procgen::buildings::{Building, BuildingCollection, PlacementError};
    use crate::procgen::GeneratedMesh;
    use crate::render::device::{DeviceKind, RenderSettings};
    use crate::render::lighting::Sun;
    use crate::render::materials::{MaterialLibrary, BUILDING_MATERIAL, TERRAIN_MATERIAL};
    use crate::world::terrain::Terrain;

    #[test]
    fn first_update_generates_the_city() {
        let mut city = TestCity::seeded();

        assert_eq!(city.report().runs, 1);
        assert_eq!(city.count::<With<Terrain>>(), 1);
        assert_eq!(city.count::<With<Building>>(), 21 * 31);
        assert_eq!(city.count::<With<BuildingCollection>>(), 1);
        assert_eq!(city.count::<With<Sun>>(), 1);
        assert_eq!(city.count::<With<SceneCamera>>(), 1);
        assert_eq!(city.report().buildings, 21 * 31);
        assert!(city.report().placement_error.is_none());
    }

    #[test]
    fn pipeline_only_runs_when_requested() {
        let mut city = TestCity::seeded();
        city.tick().tick();
        assert_eq!(city.report().runs, 1);
        assert_eq!(city.count::<With<Building>>(), 21 * 31);
    }

    #[test]
    fn regeneration_does_not_duplicate_resources() {
        let mut city = TestCity::seeded();
        let meshes_after_first = city.count::<With<GeneratedMesh>>();

        city.regenerate();

        assert_eq!(city.report().runs, 2);
        assert_eq!(city.count::<With<GeneratedMesh>>(), meshes_after_first);
        assert_eq!(city.count::<With<DirectionalLight>>(), 1);
        assert_eq!(city.count::<With<Camera>>(), 1);
        assert_eq!(city.count::<With<BuildingCollection>>(), 1);
        assert_eq!(city.resource::<MaterialLibrary>().len(), 2);
        assert_eq!(city.resource::<Assets<StandardMaterial>>().len(), 2);
    }

    #[test]
    fn regeneration_picks_up_config_changes() {
        let mut city = TestCity::seeded();
        {
            let mut config = city.config_mut();
            config.x_subdivisions = 4;
            config.y_subdivisions = 2;
        }
        city.regenerate();

        assert_eq!(city.count::<With<Building>>(), 5 * 3);
        assert_eq!(city.report().terrain_vertices, 15);
    }

    #[test]
    fn zero_subdivisions_keep_terrain_without_buildings() {
        let mut city = TestCity::new(CityConfig {
            x_subdivisions: 0,
            ..default()
        });

        assert_eq!(city.count::<With<Terrain>>(), 1);
        assert_eq!(city.count::<With<Building>>(), 0);
        assert_eq!(
            city.report().placement_error,
            Some(PlacementError::ZeroSubdivisions { x: 0, y: 30 })
        );
        // Dressing still happens after a failed placement.
        assert_eq!(city.count::<With<Sun>>(), 1);
    }

    #[test]
    fn materials_are_assigned_by_name() {
        let mut city = TestCity::seeded();
        let library = city.resource::<MaterialLibrary>();
        let terrain_material = library.get(TERRAIN_MATERIAL).cloned().unwrap();
        let building_material = library.get(BUILDING_MATERIAL).cloned().unwrap();

        let world = city.world_mut();
        let mut terrain = world.query_filtered::<&MeshMaterial3d<StandardMaterial>, With<Terrain>>();
        assert!(terrain.iter(world).all(|m| m.0 == terrain_material));

        let mut buildings =
            world.query_filtered::<&MeshMaterial3d<StandardMaterial>, With<Building>>();
        assert_eq!(buildings.iter(world).count(), 21 * 31);
        assert!(buildings.iter(world).all(|m| m.0 == building_material));
    }

    #[test]
    fn buildings_are_named_in_placement_order() {
        let mut city = TestCity::new(CityConfig {
            x_subdivisions: 1,
            y_subdivisions: 1,
            seed: Some(3),
            ..default()
        });
        assert_eq!(
            city.names::<With<Building>>(),
            vec!["Building_000", "Building_001", "Building_002", "Building_003"]
        );
        assert_eq!(city.names::<With<Terrain>>(), vec!["Terrain"]);
    }

    #[test]
    fn building_base_sits_below_terrain() {
        let mut city = TestCity::new(CityConfig {
            x_subdivisions: 2,
            y_subdivisions: 2,
            height_scale: 2.0,
            embed_depth: 0.1,
            seed: Some(9),
            ..default()
        });
        let expected_ground = 1.0_f32.sin();

        let world = city.world_mut();
        let mut buildings = world.query_filtered::<&Transform, With<Building>>();
        for transform in buildings.iter(world) {
            let base = transform.translation.y - transform.scale.y / 2.0;
            assert!((base - (expected_ground - 0.1)).abs() < 1e-5);
        }
    }

    #[test]
    fn headless_run_falls_back_to_default_device() {
        let city = TestCity::seeded();
        assert_eq!(
            city.resource::<RenderSettings>().active,
            Some(DeviceKind::Default)
        );
    }

    #[test]
    fn non_finite_config_falls_back_instead_of_panicking() {
        let mut city = TestCity::seeded();
        {
            let mut config = city.config_mut();
            config.max_building_height = f32::INFINITY;
            config.street_width_factor = f32::NAN;
        }
        city.regenerate();

        assert_eq!(city.report().runs, 2);
        assert_eq!(city.count::<With<Building>>(), 21 * 31);

        let world = city.world_mut();
        let mut buildings = world.query_filtered::<&Transform, With<Building>>();
        for transform in buildings.iter(world) {
            assert!(transform.scale.is_finite());
            assert!((1.0..=7.0).contains(&transform.scale.y));
        }
    }

    #[test]
    fn regeneration_reuses_a_collection_holding_other_entities() {
        let mut city = TestCity::seeded();
        let world = city.world_mut();
        let collection = world
            .query_filtered::<Entity, With<BuildingCollection>>()
            .single(world);
        let prop = world.spawn(Name::new("UserProp")).id();
        world.entity_mut(collection).add_child(prop);

        city.regenerate();

        assert_eq!(city.count::<With<BuildingCollection>>(), 1);
        assert_eq!(city.count::<With<Building>>(), 21 * 31);
        assert!(city
            .names::<Without<GeneratedMesh>>()
            .contains(&"UserProp".to_string()));

        let world = city.world_mut();
        let children = world
            .query_filtered::<&Children, With<BuildingCollection>>()
            .single(world);
        assert_eq!(children.len(), 21 * 31 + 1);
        assert!(children.contains(&prop));
    }

    #[test]
    fn full_street_factor_spawns_hidden_buildings() {
        let mut city = TestCity::new(CityConfig {
            street_width_factor: 1.0,
            seed: Some(4),
            ..default()
        });

        assert_eq!(city.count::<With<Building>>(), 21 * 31);
        assert_eq!(city.report().buildings, 21 * 31);

        let world = city.world_mut();
        let mut visibility = world.query_filtered::<&Visibility, With<Building>>();
        assert!(visibility
            .iter(world)
            .all(|visibility| *visibility == Visibility::Hidden));
    }

    #[test]
    fn camera_msaa_follows_render_settings() {
        let mut city = TestCity::seeded();
        city.world_mut().resource_mut::<RenderSettings>().samples = 2;
        city.regenerate();

        let world = city.world_mut();
        let msaa = world
            .query_filtered::<&Msaa, With<SceneCamera>>()
            .single(world);
        assert_eq!(*msaa, Msaa::Sample2);
    }
}
