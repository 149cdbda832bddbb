//! The step pass (one generation of the automaton) and the fill pass
//! (flooding a buffer with a single state).
//!
//! The step shader is assembled once per rule: the shared template
//! provides neighbor counting with toroidal wraparound and the
//! copy-step path; [`crate::rules::Rule::to_wgsl`] supplies the body of
//! `evaluate`. Per-draw parameters travel in a small uniform buffer
//! created fresh for each encode, so several passes can share one
//! command encoder without clobbering each other's uniforms.

use wgpu::util::DeviceExt;

use crate::gpu::pass::{state_texture_entry, uniform_entry, FullscreenPass};
use crate::gpu::STATE_FORMAT;
use crate::rules::Rule;

const STEP_TEMPLATE: &str = r#"
const DEAD: u32 = 0u;
const ALIVE: u32 = 1u;
const DYING: u32 = 2u;

struct StepUniforms {
    grid_width: u32,
    grid_height: u32,
    copy_step: u32,
    _pad: u32,
};

@group(0) @binding(0) var source: texture_2d<u32>;
@group(0) @binding(1) var<uniform> params: StepUniforms;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    return vec4<f32>(positions[vertex_index], 0.0, 1.0);
}

fn load_cell(x: i32, y: i32) -> u32 {
    let w = i32(params.grid_width);
    let h = i32(params.grid_height);
    let wx = ((x % w) + w) % w;
    let wy = ((y % h) + h) % h;
    return textureLoad(source, vec2<i32>(wx, wy), 0).r;
}

fn alive_neighbors(x: i32, y: i32) -> u32 {
    var count = 0u;
    for (var dy: i32 = -1; dy <= 1; dy = dy + 1) {
        for (var dx: i32 = -1; dx <= 1; dx = dx + 1) {
            if dx == 0 && dy == 0 {
                continue;
            }
            if load_cell(x + dx, y + dy) == ALIVE {
                count = count + 1u;
            }
        }
    }
    return count;
}

fn evaluate(self_state: u32, alive: u32) -> u32 {
%EVALUATE_BODY%
}

@fragment
fn fs_main(@builtin(position) position: vec4<f32>) -> @location(0) vec4<u32> {
    let x = i32(position.x);
    let y = i32(position.y);
    let self_state = load_cell(x, y);
    if params.copy_step == 1u {
        return vec4<u32>(self_state, 0u, 0u, 1u);
    }
    return vec4<u32>(evaluate(self_state, alive_neighbors(x, y)), 0u, 0u, 1u);
}
"#;

/// Complete WGSL source for one rule's step shader.
pub fn step_shader_source(rule: Rule) -> String {
    STEP_TEMPLATE.replace("%EVALUATE_BODY%", &rule.to_wgsl())
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct StepUniforms {
    grid_width: u32,
    grid_height: u32,
    copy_step: u32,
    _pad: u32,
}

/// One generation of the automaton, reading the previous buffer and
/// writing the next.
pub struct StepPass {
    pass: FullscreenPass,
    rule: Rule,
}

impl StepPass {
    pub fn new(device: &wgpu::Device, rule: Rule) -> Self {
        let source = step_shader_source(rule);
        let pass = FullscreenPass::new(
            device,
            "Step Pass",
            &source,
            &[state_texture_entry(0), uniform_entry(1)],
            STATE_FORMAT,
        );
        Self { pass, rule }
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Encode one step from `source` into `target`. With `copy_step`
    /// set, the shader copies each texel unchanged instead of applying
    /// the rule.
    pub fn encode(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::TextureView,
        target: &wgpu::TextureView,
        grid_width: u32,
        grid_height: u32,
        copy_step: bool,
    ) {
        let uniforms = StepUniforms {
            grid_width,
            grid_height,
            copy_step: copy_step as u32,
            _pad: 0,
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Step Uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = self.pass.create_bind_group(
            device,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
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

const FILL_SHADER: &str = r#"
struct FillUniforms {
    value: u32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
};

@group(0) @binding(0) var<uniform> params: FillUniforms;

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
fn fs_main() -> @location(0) vec4<u32> {
    return vec4<u32>(params.value, 0u, 0u, 1u);
}
"#;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FillUniforms {
    value: u32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
}

/// Floods a state buffer with a single cell state. Used to clear the
/// grid and to initialize fresh buffers after a resize.
pub struct FillPass {
    pass: FullscreenPass,
}

impl FillPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let pass = FullscreenPass::new(
            device,
            "Fill Pass",
            FILL_SHADER,
            &[uniform_entry(0)],
            STATE_FORMAT,
        );
        Self { pass }
    }

    pub fn encode(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        value: u32,
    ) {
        let uniforms = FillUniforms {
            value,
            _pad0: 0,
            _pad1: 0,
            _pad2: 0,
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fill Uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = self.pass.create_bind_group(
            device,
            &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        );
        self.pass.run(encoder, &bind_group, target);
    }
}

pub fn fill_shader_source() -> &'static str {
    FILL_SHADER
}
