//! The engine: double-buffered stepping, drawing, presentation, and the
//! phase state machine that gates which operations are legal when.

use std::sync::mpsc;
use std::time::Duration;

use glam::Vec4;

use crate::color::{CellState, ColorSlotId, Palette};
use crate::error::EngineError;
use crate::gpu::{
    BufferPair, DisplayParams, DisplayPass, FillPass, GpuContext, OverlayPass, StepPass,
};
use crate::grid::GridSpec;
use crate::rules::Rule;
use crate::snapshot::{self, READBACK_TIMEOUT};
use crate::time::{FrameLimiter, Time};

/// What the engine is currently doing.
///
/// Operations check the phase and refuse (with a warning) when called
/// out of turn, so a stray event cannot corrupt the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Showing the committed state, not advancing.
    #[default]
    Idle,
    /// The user is painting cells; they overlay the committed state
    /// until the stroke ends.
    Drawing,
    /// Advancing at the capped rate.
    Playing,
}

/// Initial engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub surface_width: u32,
    pub surface_height: u32,
    pub cell_size: u32,
    pub fps_cap: f32,
    pub rule: Rule,
    pub palette: Palette,
    pub grid_active: bool,
    pub grid_weight: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            surface_width: 800,
            surface_height: 600,
            cell_size: 10,
            fps_cap: 10.0,
            rule: Rule::default(),
            palette: Palette::default(),
            grid_active: true,
            grid_weight: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn with_surface(mut self, width: u32, height: u32) -> Self {
        self.surface_width = width;
        self.surface_height = height;
        self
    }

    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_fps_cap(mut self, fps_cap: f32) -> Self {
        self.fps_cap = fps_cap;
        self
    }
}

pub struct Engine {
    gpu: GpuContext,
    grid: GridSpec,
    buffers: BufferPair,
    step_pass: StepPass,
    fill_pass: FillPass,
    display_pass: DisplayPass,
    overlay_pass: OverlayPass,
    palette: Palette,
    grid_active: bool,
    grid_weight: f32,
    phase: Phase,
    current_step: u64,
    transient: Vec<(u32, u32)>,
    time: Time,
    limiter: FrameLimiter,
    cell_size_watchers: Vec<mpsc::Sender<u32>>,
    readback_timeout: Duration,
}

impl Engine {
    /// Build an engine rendering to targets of `target_format`.
    ///
    /// Fails with [`EngineError::ZeroSurface`] when the surface has no
    /// area yet; callers retry once layout has happened.
    pub fn new(
        gpu: GpuContext,
        target_format: wgpu::TextureFormat,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        if config.surface_width == 0 || config.surface_height == 0 {
            return Err(EngineError::ZeroSurface {
                width: config.surface_width,
                height: config.surface_height,
            });
        }
        if config.cell_size == 0 {
            return Err(EngineError::InvalidCellSize(config.cell_size));
        }

        let grid = GridSpec::new(config.surface_width, config.surface_height, config.cell_size);
        let buffers = BufferPair::new(&gpu.device, grid.cells_x(), grid.cells_y());
        let step_pass = StepPass::new(&gpu.device, config.rule);
        let fill_pass = FillPass::new(&gpu.device);
        let display_pass = DisplayPass::new(&gpu.device, target_format);
        let overlay_pass = OverlayPass::new(&gpu.device, target_format);

        let mut engine = Self {
            gpu,
            grid,
            buffers,
            step_pass,
            fill_pass,
            display_pass,
            overlay_pass,
            palette: config.palette,
            grid_active: config.grid_active,
            grid_weight: config.grid_weight,
            phase: Phase::Idle,
            current_step: 0,
            transient: Vec::new(),
            time: Time::new(),
            limiter: FrameLimiter::new(config.fps_cap),
            cell_size_watchers: Vec::new(),
            readback_timeout: READBACK_TIMEOUT,
        };
        engine.fill_both(CellState::Dead);
        log::info!(
            "engine ready: {}x{} cells over {}x{} px, rule '{}'",
            engine.grid.cells_x(),
            engine.grid.cells_y(),
            config.surface_width,
            config.surface_height,
            engine.rule().label()
        );
        Ok(engine)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.gpu.device
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rule(&self) -> Rule {
        self.step_pass.rule()
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn cell_size(&self) -> u32 {
        self.grid.cell_size
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Generations committed since the last clear or resize fallback.
    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    /// Index of the buffer the next step will write; alternates with
    /// every committed step.
    pub fn next_buffer_index(&self) -> usize {
        self.buffers.next_index()
    }

    pub fn fps(&self) -> f32 {
        self.time.fps()
    }

    pub fn fps_cap(&self) -> f32 {
        self.limiter.cap()
    }

    pub fn set_fps_cap(&mut self, cap: f32) {
        self.limiter.set_cap(cap);
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_active
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.grid_active = visible;
    }

    pub fn set_readback_timeout(&mut self, timeout: Duration) {
        self.readback_timeout = timeout;
    }

    // --- phase transitions -------------------------------------------

    /// Start playing. Legal from `Idle`; a pending stroke is committed
    /// first when called while `Drawing`.
    pub fn start(&mut self) {
        match self.phase {
            Phase::Playing => {}
            Phase::Drawing => {
                self.end_drawing();
                self.phase = Phase::Playing;
            }
            Phase::Idle => self.phase = Phase::Playing,
        }
    }

    /// Stop playing and return to `Idle`.
    pub fn stop(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Idle;
        }
    }

    /// Begin a drawing stroke. Legal only from `Idle`.
    pub fn begin_drawing(&mut self) {
        match self.phase {
            Phase::Idle => self.phase = Phase::Drawing,
            other => log::warn!("ignoring begin_drawing in phase {:?}", other),
        }
    }

    /// Add the cell under a surface-pixel position to the current
    /// stroke. The cell stays an overlay until the stroke is committed.
    pub fn paint_cell(&mut self, px: f64, py: f64) {
        if self.phase != Phase::Drawing {
            log::warn!("ignoring paint_cell in phase {:?}", self.phase);
            return;
        }
        let cell = self.grid.cell_at_pixel(px, py);
        if !self.transient.contains(&cell) {
            self.transient.push(cell);
        }
    }

    /// Commit the current stroke into the state and return to `Idle`.
    pub fn end_drawing(&mut self) {
        if self.phase != Phase::Drawing {
            log::warn!("ignoring end_drawing in phase {:?}", self.phase);
            return;
        }
        for &(x, y) in &self.transient {
            self.buffers
                .write_previous_cell(&self.gpu.queue, x, y, CellState::Alive);
        }
        self.transient.clear();
        self.phase = Phase::Idle;
    }

    // --- stepping ----------------------------------------------------

    /// Advance one generation: rule over the committed buffer into the
    /// other slot, then flip.
    pub fn advance(&mut self) {
        self.encode_step(false);
        self.buffers.flip();
        self.current_step += 1;
    }

    /// A step that copies the state unchanged. Flips and counts like a
    /// normal step, so the buffer alternation stays in lockstep with
    /// the step counter.
    pub fn copy_step(&mut self) {
        self.encode_step(true);
        self.buffers.flip();
        self.current_step += 1;
    }

    fn encode_step(&mut self, copy: bool) {
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Step") });
        self.step_pass.encode(
            &self.gpu.device,
            &mut encoder,
            self.buffers.previous_view(),
            self.buffers.next_view(),
            self.buffers.width(),
            self.buffers.height(),
            copy,
        );
        self.gpu.queue.submit(Some(encoder.finish()));
    }

    /// Advance one generation and immediately draw the result.
    pub fn forward_and_display(&mut self, target: &wgpu::TextureView) {
        self.advance();
        self.render(target);
    }

    /// Drive one event-loop frame: advance when playing and the rate
    /// cap allows, then draw the committed state (plus any transient
    /// overlay) into `target`.
    pub fn render_frame(&mut self, target: &wgpu::TextureView) {
        if self.phase == Phase::Playing && self.limiter.ready() {
            self.advance();
        }
        self.render(target);
        self.time.update();
    }

    /// Draw the committed state into `target` without advancing.
    pub fn render(&mut self, target: &wgpu::TextureView) {
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Frame") });
        self.display_pass.encode(
            &self.gpu.device,
            &mut encoder,
            self.buffers.previous_view(),
            target,
            &DisplayParams {
                palette: &self.palette,
                grid: self.grid,
                grid_active: self.grid_active,
                grid_weight: self.grid_weight,
            },
        );
        self.overlay_pass.encode(
            &self.gpu.device,
            &mut encoder,
            target,
            &self.transient,
            self.grid,
            self.palette.alive.to_array(),
        );
        self.gpu.queue.submit(Some(encoder.finish()));
    }

    // --- state access ------------------------------------------------

    /// Overwrite the whole grid, row-major, `cell_count()` entries.
    pub fn set_cells(&mut self, cells: &[CellState]) {
        self.buffers.upload_previous(&self.gpu.queue, cells);
    }

    pub fn set_cell(&mut self, x: u32, y: u32, state: CellState) {
        self.buffers.write_previous_cell(&self.gpu.queue, x, y, state);
    }

    /// Read the committed state back to the CPU, row-major.
    pub fn read_cells(&self) -> Result<Vec<CellState>, EngineError> {
        let cells = snapshot::read_state(
            &self.gpu.device,
            &self.gpu.queue,
            self.buffers.previous_texture(),
            self.buffers.width(),
            self.buffers.height(),
            self.readback_timeout,
        )?;
        Ok(cells)
    }

    /// Flood both buffers with `Dead`, reset the step counter, drop any
    /// pending stroke, and return to `Idle`.
    pub fn clear(&mut self) {
        self.transient.clear();
        self.phase = Phase::Idle;
        self.fill_both(CellState::Dead);
        self.current_step = 0;
    }

    fn fill_both(&mut self, state: CellState) {
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Fill") });
        for index in 0..2 {
            self.fill_pass.encode(
                &self.gpu.device,
                &mut encoder,
                self.buffers.view(index),
                state as u32,
            );
        }
        self.gpu.queue.submit(Some(encoder.finish()));
    }

    // --- reconfiguration ---------------------------------------------

    /// Swap the transition rule and stop playback. With `preserve` the
    /// committed state is kept as-is; any `Dying` texels left over from
    /// Brian's Brain behave like dead cells under the two-state rules.
    /// Without it the grid restarts empty. A pending stroke is
    /// committed first.
    pub fn set_rule(&mut self, rule: Rule, preserve: bool) {
        if self.phase == Phase::Drawing {
            self.end_drawing();
        }
        self.stop();
        if rule != self.rule() {
            self.step_pass = StepPass::new(&self.gpu.device, rule);
            log::info!("rule changed to '{}'", rule.label());
        }
        if !preserve {
            self.clear();
        }
    }

    /// Change one palette entry. Purely presentational: no state pass
    /// runs, the next frame just samples the new palette. Playback is
    /// paused for the duration of the update and resumed after.
    pub fn change_color(&mut self, slot: ColorSlotId, color: Vec4) -> Result<(), EngineError> {
        if !self.rule().has_color_slot(slot) {
            return Err(EngineError::UnknownColorSlot {
                slot,
                rule: self.rule(),
            });
        }
        let was_playing = self.phase == Phase::Playing;
        self.stop();
        self.palette.set(slot, color);
        if was_playing {
            self.start();
        }
        Ok(())
    }

    /// Resize the render surface, preserving the overlapping region of
    /// the committed state. When the snapshot cannot be read before its
    /// deadline the engine logs the failure and restarts from an empty
    /// grid instead of blocking.
    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::ZeroSurface { width, height });
        }
        let new_grid = GridSpec::new(width, height, self.grid.cell_size);
        self.rebuild_buffers(new_grid);
        Ok(())
    }

    /// Change the cell size. With `preserve`, cell states carry over by
    /// cell coordinate; without it the grid restarts empty. Watchers
    /// registered via [`Engine::subscribe_cell_size`] are notified.
    pub fn set_cell_size(&mut self, cell_size: u32, preserve: bool) -> Result<(), EngineError> {
        if cell_size == 0 {
            return Err(EngineError::InvalidCellSize(cell_size));
        }
        if cell_size != self.grid.cell_size {
            let new_grid = GridSpec::new(self.grid.surface_width, self.grid.surface_height, cell_size);
            if preserve {
                self.rebuild_buffers(new_grid);
            } else {
                self.grid = new_grid;
                self.buffers =
                    BufferPair::new(&self.gpu.device, new_grid.cells_x(), new_grid.cells_y());
                self.clear();
            }
            self.cell_size_watchers
                .retain(|watcher| watcher.send(cell_size).is_ok());
        }
        Ok(())
    }

    /// Receive a message whenever the cell size changes.
    pub fn subscribe_cell_size(&mut self) -> mpsc::Receiver<u32> {
        let (sender, receiver) = mpsc::channel();
        self.cell_size_watchers.push(sender);
        receiver
    }

    fn rebuild_buffers(&mut self, new_grid: GridSpec) {
        if self.phase == Phase::Drawing {
            self.end_drawing();
        }
        let was_playing = self.phase == Phase::Playing;
        self.stop();
        let old_grid = self.grid;
        let snapshot = self.read_cells();

        self.grid = new_grid;
        self.buffers = BufferPair::new(&self.gpu.device, new_grid.cells_x(), new_grid.cells_y());
        self.fill_both(CellState::Dead);

        match snapshot {
            Ok(old_cells) => {
                let mut new_cells =
                    vec![CellState::Dead; new_grid.cell_count()];
                let copy_x = old_grid.cells_x().min(new_grid.cells_x());
                let copy_y = old_grid.cells_y().min(new_grid.cells_y());
                for y in 0..copy_y {
                    for x in 0..copy_x {
                        new_cells[new_grid.cell_index(x, y)] = old_cells[old_grid.cell_index(x, y)];
                    }
                }
                self.buffers.upload_previous(&self.gpu.queue, &new_cells);
                self.normalize_slots();
            }
            Err(e) => {
                log::warn!("state snapshot failed during resize, restarting empty: {}", e);
                self.current_step = 0;
            }
        }
        if was_playing {
            self.start();
        }
    }

    /// Copy the committed generation into the write slot so both
    /// buffers agree after a rebuild.
    fn normalize_slots(&mut self) {
        self.encode_step(true);
    }

    // --- export ------------------------------------------------------

    /// Render the committed state to a PNG at surface resolution,
    /// including grid lines when they are visible.
    pub fn export_png(&self, path: &std::path::Path) -> Result<(), EngineError> {
        let cells = self.read_cells()?;
        let image = self.compose_image(&cells);
        image.save_with_format(path, image::ImageFormat::Png)?;
        log::info!("exported {}x{} image to {}", image.width(), image.height(), path.display());
        Ok(())
    }

    fn compose_image(&self, cells: &[CellState]) -> image::RgbaImage {
        let to_rgba = |c: Vec4| {
            image::Rgba([
                (c.x.clamp(0.0, 1.0) * 255.0) as u8,
                (c.y.clamp(0.0, 1.0) * 255.0) as u8,
                (c.z.clamp(0.0, 1.0) * 255.0) as u8,
                (c.w.clamp(0.0, 1.0) * 255.0) as u8,
            ])
        };
        let grid_rgba = to_rgba(self.palette.grid);
        let size = self.grid.cell_size;
        let weight = self.grid_weight.round().max(1.0) as u32;

        image::RgbaImage::from_fn(self.grid.surface_width, self.grid.surface_height, |px, py| {
            if self.grid_active && (px % size < weight || py % size < weight) {
                return grid_rgba;
            }
            let (x, y) = (px / size, py / size);
            to_rgba(self.palette.color_of(cells[self.grid.cell_index(x, y)]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.cell_size, 10);
        assert_eq!(config.rule, Rule::GameOfLife);
        assert!(config.grid_active);
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::default()
            .with_surface(320, 240)
            .with_cell_size(4)
            .with_rule(Rule::Seeds)
            .with_fps_cap(30.0);
        assert_eq!(config.surface_width, 320);
        assert_eq!(config.surface_height, 240);
        assert_eq!(config.cell_size, 4);
        assert_eq!(config.rule, Rule::Seeds);
        assert_eq!(config.fps_cap, 30.0);
    }

    #[test]
    fn test_phase_default_is_idle() {
        assert_eq!(Phase::default(), Phase::Idle);
    }
}
