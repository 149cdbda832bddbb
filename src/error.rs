//! Error types for the automata engine.
//!
//! This module provides error types for GPU initialization, state readback,
//! and engine operations that can fail.

use std::fmt;

use crate::color::ColorSlotId;
use crate::rules::Rule;

/// Errors that can occur during GPU initialization and readback.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Failed to map buffer for reading.
    BufferMapping(String),
    /// A readback did not complete before its deadline.
    ReadbackTimeout,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::BufferMapping(msg) => write!(f, "Failed to map GPU buffer: {}", msg),
            GpuError::ReadbackTimeout => write!(f, "GPU readback timed out"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when operating the engine.
#[derive(Debug)]
pub enum EngineError {
    /// GPU initialization or readback failed.
    Gpu(GpuError),
    /// The render surface has zero area; setup must be deferred until the
    /// surface is laid out.
    ZeroSurface { width: u32, height: u32 },
    /// A color change named a slot the active rule does not declare.
    UnknownColorSlot { slot: ColorSlotId, rule: Rule },
    /// Cell size must be at least one pixel.
    InvalidCellSize(u32),
    /// Failed to encode an exported image.
    ImageEncoding(image::ImageError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Gpu(e) => write!(f, "GPU error: {}", e),
            EngineError::ZeroSurface { width, height } => write!(
                f,
                "Render surface has zero area ({}x{}); deferring setup",
                width, height
            ),
            EngineError::UnknownColorSlot { slot, rule } => write!(
                f,
                "Rule '{}' has no color slot '{}'",
                rule.label(),
                slot.label()
            ),
            EngineError::InvalidCellSize(size) => {
                write!(f, "Invalid cell size {}; must be at least 1 pixel", size)
            }
            EngineError::ImageEncoding(e) => write!(f, "Failed to encode image: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Gpu(e) => Some(e),
            EngineError::ImageEncoding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GpuError> for EngineError {
    fn from(e: GpuError) -> Self {
        EngineError::Gpu(e)
    }
}

impl From<image::ImageError> for EngineError {
    fn from(e: image::ImageError) -> Self {
        EngineError::ImageEncoding(e)
    }
}
