//! GPU resources: device acquisition, the pass runner, the ping-pong
//! buffer pair, and the individual fullscreen passes.

pub mod buffers;
pub mod display;
pub mod pass;
pub mod step;

pub use buffers::BufferPair;
pub use display::{DisplayParams, DisplayPass, OverlayPass};
pub use pass::FullscreenPass;
pub use step::{FillPass, StepPass};

use crate::error::GpuError;

/// Texture format of the state buffers: one `u32` cell state per texel.
pub const STATE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Uint;

/// A wgpu device/queue pair shared by every pass.
///
/// The context can be created headlessly (tests, image export) or
/// compatible with a window surface (the interactive viewer).
pub struct GpuContext {
    adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Acquire a device without any surface. Used by the test suite and
    /// offscreen rendering.
    pub async fn headless() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        Self::request(&instance, None).await
    }

    /// Acquire a device compatible with `surface`.
    pub async fn for_surface(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<Self, GpuError> {
        Self::request(instance, Some(surface)).await
    }

    async fn request(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, GpuError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Automata Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }
}
