//! The double-buffered cell state.
//!
//! Two `R32Uint` textures at cell resolution hold consecutive
//! generations. `next_index` names the buffer the next step will write;
//! the other buffer holds the last committed generation. After each
//! step the pair flips, so the freshly written buffer becomes the one
//! displayed and read.

use crate::color::CellState;
use crate::gpu::STATE_FORMAT;

pub struct BufferPair {
    textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
    next_index: usize,
    width: u32,
    height: u32,
}

impl BufferPair {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let make = |label| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: STATE_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
        };
        let textures = [make("State Buffer A"), make("State Buffer B")];
        let views = [
            textures[0].create_view(&wgpu::TextureViewDescriptor::default()),
            textures[1].create_view(&wgpu::TextureViewDescriptor::default()),
        ];
        Self {
            textures,
            views,
            next_index: 0,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Index of the buffer the next step pass writes into.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Index of the last committed generation.
    pub fn previous_index(&self) -> usize {
        1 - self.next_index
    }

    /// View of the buffer the next step will write.
    pub fn next_view(&self) -> &wgpu::TextureView {
        &self.views[self.next_index]
    }

    /// View of the last committed generation.
    pub fn previous_view(&self) -> &wgpu::TextureView {
        &self.views[self.previous_index()]
    }

    pub fn previous_texture(&self) -> &wgpu::Texture {
        &self.textures[self.previous_index()]
    }

    pub fn view(&self, index: usize) -> &wgpu::TextureView {
        &self.views[index]
    }

    /// Commit the freshly written buffer: it becomes the previous
    /// (displayed) generation and the other slot becomes the write
    /// target.
    pub fn flip(&mut self) {
        self.next_index = 1 - self.next_index;
    }

    /// Overwrite the committed generation with `cells`, row-major,
    /// `width * height` entries.
    pub fn upload_previous(&self, queue: &wgpu::Queue, cells: &[CellState]) {
        debug_assert_eq!(cells.len(), self.width as usize * self.height as usize);
        let texels: Vec<u32> = cells.iter().map(|c| *c as u32).collect();
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: self.previous_texture(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&texels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Write a single cell into the committed generation.
    pub fn write_previous_cell(&self, queue: &wgpu::Queue, x: u32, y: u32, state: CellState) {
        if x >= self.width || y >= self.height {
            return;
        }
        let texel = [state as u32];
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: self.previous_texture(),
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&texel),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }
}
