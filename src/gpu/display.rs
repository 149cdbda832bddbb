//! Presentation passes: state-to-color display and the transient
//! drawing overlay.
//!
//! The display pass is the only place cell states become colors. It
//! reads the committed state buffer at cell resolution, scales it up to
//! the surface, looks each state up in the palette and optionally draws
//! grid lines. Changing a color never touches the state buffers, only
//! the palette uniform uploaded here each frame.

use wgpu::util::DeviceExt;

use crate::color::Palette;
use crate::gpu::pass::{state_texture_entry, uniform_entry, FullscreenPass};
use crate::grid::GridSpec;

pub const DISPLAY_SHADER: &str = r#"
struct DisplayUniforms {
    palette: array<vec4<f32>, 4>,
    grid_color: vec4<f32>,
    surface_size: vec2<f32>,
    cell_size: f32,
    grid_weight: f32,
    grid_width: u32,
    grid_height: u32,
    grid_active: u32,
    _pad: u32,
};

@group(0) @binding(0) var state: texture_2d<u32>;
@group(0) @binding(1) var<uniform> params: DisplayUniforms;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    return vec4<f32>(positions[vertex_index], 0.0, 1.0);
}

@fragment
fn fs_main(@builtin(position) position: vec4<f32>) -> @location(0) vec4<f32> {
    let cell_x = min(u32(position.x / params.cell_size), params.grid_width - 1u);
    let cell_y = min(u32(position.y / params.cell_size), params.grid_height - 1u);
    let cell_state = textureLoad(state, vec2<i32>(i32(cell_x), i32(cell_y)), 0).r;
    var color = params.palette[min(cell_state, 3u)];

    if params.grid_active == 1u {
        let in_cell = position.xy - floor(position.xy / params.cell_size) * params.cell_size;
        if in_cell.x < params.grid_weight || in_cell.y < params.grid_weight {
            color = params.grid_color;
        }
    }
    return color;
}
"#;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct DisplayUniforms {
    palette: [[f32; 4]; 4],
    grid_color: [f32; 4],
    surface_size: [f32; 2],
    cell_size: f32,
    grid_weight: f32,
    grid_width: u32,
    grid_height: u32,
    grid_active: u32,
    _pad: u32,
}

/// Everything the display pass needs for one frame.
pub struct DisplayParams<'a> {
    pub palette: &'a Palette,
    pub grid: GridSpec,
    pub grid_active: bool,
    pub grid_weight: f32,
}

/// Scales the committed state buffer up to the surface and colors it
/// through the palette.
pub struct DisplayPass {
    pass: FullscreenPass,
}

impl DisplayPass {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let pass = FullscreenPass::new(
            device,
            "Display Pass",
            DISPLAY_SHADER,
            &[state_texture_entry(0), uniform_entry(1)],
            target_format,
        );
        Self { pass }
    }

    pub fn encode(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        state: &wgpu::TextureView,
        target: &wgpu::TextureView,
        params: &DisplayParams<'_>,
    ) {
        let uniforms = DisplayUniforms {
            palette: params.palette.as_lut(),
            grid_color: params.palette.grid.to_array(),
            surface_size: [
                params.grid.surface_width as f32,
                params.grid.surface_height as f32,
            ],
            cell_size: params.grid.cell_size as f32,
            grid_weight: params.grid_weight,
            grid_width: params.grid.cells_x(),
            grid_height: params.grid.cells_y(),
            grid_active: params.grid_active as u32,
            _pad: 0,
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Display Uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = self.pass.create_bind_group(
            device,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(state),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffer.as_entire_binding(),
                },
            ],
        );
        self.pass.run(encoder, &bind_group, target);
    }
}

pub const OVERLAY_SHADER: &str = r#"
struct OverlayUniforms {
    color: vec4<f32>,
    surface_size: vec2<f32>,
    cell_size: f32,
    _pad: f32,
};

@group(0) @binding(0) var<uniform> params: OverlayUniforms;

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) cell: vec2<f32>,
) -> @builtin(position) vec4<f32> {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 0.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(0.0, 1.0),
    );
    let px = (cell + corners[vertex_index]) * params.cell_size;
    let ndc = px / params.surface_size * 2.0 - vec2<f32>(1.0, 1.0);
    return vec4<f32>(ndc.x, -ndc.y, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return params.color;
}
"#;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct OverlayUniforms {
    color: [f32; 4],
    surface_size: [f32; 2],
    cell_size: f32,
    _pad: f32,
}

/// Draws the transient (not yet committed) cells on top of the display
/// pass output, one instanced quad per cell.
pub struct OverlayPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl OverlayPass {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Overlay Pass"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Pass"),
            source: wgpu::ShaderSource::Wgsl(OVERLAY_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pass"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Overlay Pass"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: 8,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    /// Encode the overlay on top of whatever `target` already holds.
    /// Does nothing when `cells` is empty.
    pub fn encode(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        cells: &[(u32, u32)],
        grid: GridSpec,
        color: [f32; 4],
    ) {
        if cells.is_empty() {
            return;
        }

        let instances: Vec<[f32; 2]> = cells
            .iter()
            .map(|&(x, y)| [x as f32, y as f32])
            .collect();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Instances"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniforms = OverlayUniforms {
            color,
            surface_size: [grid.surface_width as f32, grid.surface_height as f32],
            cell_size: grid.cell_size as f32,
            _pad: 0.0,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Pass"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.set_vertex_buffer(0, instance_buffer.slice(..));
        pass.draw(0..6, 0..instances.len() as u32);
    }
}
