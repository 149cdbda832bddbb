//! CPU readback of the cell state.
//!
//! Used by `read_cells`, image export, and the preserve-on-resize path.
//! The copy goes through a staging buffer with rows padded to the
//! 256-byte copy alignment; mapping is driven by a bounded poll loop so
//! a wedged device surfaces as [`GpuError::ReadbackTimeout`] instead of
//! hanging the caller forever.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::color::CellState;
use crate::error::GpuError;

/// Default deadline for one readback.
pub const READBACK_TIMEOUT: Duration = Duration::from_millis(500);

/// Read a `width` x `height` state texture into a row-major vector.
pub fn read_state(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
    timeout: Duration,
) -> Result<Vec<CellState>, GpuError> {
    let row_bytes = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_row_bytes = row_bytes.div_ceil(align) * align;

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("State Readback"),
        size: padded_row_bytes as u64 * height as u64,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("State Readback"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row_bytes),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(Some(encoder.finish()));

    let slice = staging.slice(..);
    let (sender, receiver) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });

    // Deadline is checked before each poll, so a zero timeout always
    // reports ReadbackTimeout instead of racing the driver.
    let deadline = Instant::now() + timeout;
    let map_result = loop {
        match receiver.try_recv() {
            Ok(result) => break result,
            Err(mpsc::TryRecvError::Empty) => {
                if Instant::now() >= deadline {
                    return Err(GpuError::ReadbackTimeout);
                }
                let _ = device.poll(wgpu::Maintain::Poll);
                std::thread::sleep(Duration::from_millis(1));
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                return Err(GpuError::BufferMapping(
                    "map callback dropped without result".into(),
                ));
            }
        }
    };
    map_result.map_err(|e| GpuError::BufferMapping(e.to_string()))?;

    let mut cells = Vec::with_capacity(width as usize * height as usize);
    {
        let data = slice.get_mapped_range();
        for row in 0..height {
            let start = (row * padded_row_bytes) as usize;
            let end = start + row_bytes as usize;
            let texels: &[u32] = bytemuck::cast_slice(&data[start..end]);
            cells.extend(texels.iter().map(|&t| CellState::from_u32(t)));
        }
    }
    staging.unmap();

    Ok(cells)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_row_padding_aligns_to_copy_granularity() {
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        for width in [1u32, 13, 63, 64, 65, 640] {
            let padded = (width * 4).div_ceil(align) * align;
            assert_eq!(padded % align, 0);
            assert!(padded >= width * 4);
            assert!(padded - width * 4 < align);
        }
    }
}
