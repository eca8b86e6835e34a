//! Render device selection and sample settings.
//!
//! The app asks wgpu for the high-performance adapter at startup. Selection
//! here checks whether that request produced a usable adapter and falls back
//! to the default device otherwise.

use std::fmt;

use bevy::{
    core_pipeline::tonemapping::DebandDither, prelude::*, render::renderer::RenderAdapterInfo,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceKind {
    /// Discrete or otherwise high-throughput GPU.
    #[default]
    HighPerformance,
    /// Whatever adapter the backend hands out first.
    Default,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::HighPerformance => write!(f, "high-performance GPU"),
            DeviceKind::Default => write!(f, "default device"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("no render adapter available for {0}")]
    NoAdapter(DeviceKind),
    #[error("adapter '{0}' is a software rasterizer")]
    SoftwareAdapter(String),
}

/// Render device and sampling configuration.
#[derive(Resource, Clone, Debug)]
pub struct RenderSettings {
    /// Device tried first.
    pub preferred: DeviceKind,
    /// Device settled on by the last selection, if any ran.
    pub active: Option<DeviceKind>,
    /// Samples per pixel for the final image.
    pub samples: u32,
    /// Lower bound when sampling adaptively.
    pub adaptive_min_samples: u32,
    /// Smooth out banding noise in the final image.
    pub denoise: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            preferred: DeviceKind::HighPerformance,
            active: None,
            samples: 128,
            adaptive_min_samples: 64,
            denoise: true,
        }
    }
}

impl RenderSettings {
    /// Closest MSAA level to the requested sample count.
    pub fn msaa(&self) -> Msaa {
        match self.samples {
            0 | 1 => Msaa::Off,
            2 | 3 => Msaa::Sample2,
            _ => Msaa::Sample4,
        }
    }

    pub fn deband_dither(&self) -> DebandDither {
        if self.denoise {
            DebandDither::Enabled
        } else {
            DebandDither::Disabled
        }
    }
}

/// Try `preferred`; on any probe failure fall back to the default device.
pub fn select_device<F>(preferred: DeviceKind, probe: F) -> DeviceKind
where
    F: FnOnce(DeviceKind) -> Result<(), DeviceError>,
{
    if preferred == DeviceKind::Default {
        return DeviceKind::Default;
    }

    match probe(preferred) {
        Ok(()) => {
            info!("Render device set to {}", preferred);
            preferred
        }
        Err(err) => {
            warn!("Could not use {} ({}), using {}", preferred, err, DeviceKind::Default);
            DeviceKind::Default
        }
    }
}

fn probe_adapter(
    adapter: Option<&RenderAdapterInfo>,
    kind: DeviceKind,
) -> Result<(), DeviceError> {
    let adapter = adapter.ok_or(DeviceError::NoAdapter(kind))?;
    let name = adapter.name.to_lowercase();
    // llvmpipe, SwiftShader and WARP are the usual CPU fallbacks.
    if ["llvmpipe", "swiftshader", "warp", "software"]
        .iter()
        .any(|marker| name.contains(marker))
    {
        return Err(DeviceError::SoftwareAdapter(adapter.name.clone()));
    }
    Ok(())
}

pub fn select_render_device(
    mut settings: ResMut<RenderSettings>,
    adapter: Option<Res<RenderAdapterInfo>>,
) {
    let adapter = adapter.as_deref();
    let active = select_device(settings.preferred, |kind| probe_adapter(adapter, kind));
    settings.active = Some(active);
    info!(
        "Rendering with {} samples (adaptive minimum {}), denoise {}",
        settings.samples, settings.adaptive_min_samples, settings.denoise
    );
}
