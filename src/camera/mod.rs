//! Scene camera framing the generated city, plus interactive controls.

use bevy::{core_pipeline::tonemapping::DebandDither, input::mouse::MouseWheel, prelude::*};

use crate::procgen::{GenerationRequest, GenerationStage};
use crate::render::device::{select_render_device, RenderSettings};
use crate::world::{z_up_to_y_up, CityConfig};

pub const CAMERA_NAME: &str = "SceneCamera";

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraConfig>()
            .add_systems(
                Update,
                upsert_camera
                    .after(select_render_device)
                    .in_set(GenerationStage::Dressing),
            );
    }
}

/// Input handling; needs the windowed app's input resources.
pub struct CameraControlsPlugin;

impl Plugin for CameraControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (camera_zoom, regenerate_on_key));
    }
}

/// Marker for the scene camera.
#[derive(Component)]
pub struct SceneCamera;

#[derive(Resource)]
pub struct CameraConfig {
    /// Position as multiples of the city size (Z-up).
    pub offset: Vec3,
    /// Closest the camera may zoom to the origin.
    pub min_distance: f32,
    /// Fraction of the current distance moved per wheel step.
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(1.2, -1.2, 0.9),
            min_distance: 2.0,
            zoom_speed: 0.1,
        }
    }
}

impl CameraConfig {
    pub fn transform(&self, size: f32) -> Transform {
        Transform::from_translation(z_up_to_y_up(self.offset * size)).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

/// Create the scene camera if missing, otherwise reframe it for the current size.
fn upsert_camera(
    mut commands: Commands,
    config: Res<CityConfig>,
    camera_config: Res<CameraConfig>,
    settings: Res<RenderSettings>,
    mut cameras: Query<(&Name, &mut Camera, &mut Transform, &mut Msaa, &mut DebandDither)>,
) {
    let transform = camera_config.transform(config.size);
    let msaa = settings.msaa();

    if let Some((_, mut camera, mut existing_transform, mut existing_msaa, mut existing_dither)) =
        cameras
            .iter_mut()
            .find(|(name, ..)| name.as_str() == CAMERA_NAME)
    {
        camera.is_active = true;
        *existing_transform = transform;
        *existing_msaa = msaa;
        *existing_dither = settings.deband_dither();
        return;
    }

    commands.spawn((
        Camera3d::default(),
        Camera {
            is_active: true,
            ..default()
        },
        transform,
        msaa,
        settings.deband_dither(),
        Name::new(CAMERA_NAME),
        SceneCamera,
    ));
}

fn camera_zoom(
    mut query: Query<&mut Transform, With<SceneCamera>>,
    mut scroll_events: EventReader<MouseWheel>,
    camera_config: Res<CameraConfig>,
) {
    let scroll: f32 = scroll_events.read().map(|e| e.y).sum();
    if scroll == 0.0 {
        return;
    }

    for mut transform in &mut query {
        let distance = transform.translation.length();
        let target = (distance * (1.0 - scroll * camera_config.zoom_speed))
            .max(camera_config.min_distance);
        transform.translation = transform.translation.normalize_or_zero() * target;
    }
}

fn regenerate_on_key(keys: Res<ButtonInput<KeyCode>>, mut request: ResMut<GenerationRequest>) {
    if keys.just_pressed(KeyCode::KeyR) {
        info!("Regenerating city");
        request.request();
    }
}
