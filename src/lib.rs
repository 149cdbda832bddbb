//! # Automata - GPU cellular automata engine
//!
//! Double-buffered cellular automata stepping on the GPU. The whole
//! simulation lives in two `R32Uint` textures holding one cell state per
//! texel; each generation is one fullscreen fragment pass reading the
//! committed buffer and writing the other, then the pair flips. Color is
//! purely presentational: the display pass looks cell states up in a
//! palette, so recoloring never touches the simulation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use automata_gpu::prelude::*;
//!
//! let gpu = pollster::block_on(GpuContext::headless())?;
//! let mut engine = Engine::new(
//!     gpu,
//!     wgpu::TextureFormat::Rgba8UnormSrgb,
//!     EngineConfig::default()
//!         .with_surface(800, 600)
//!         .with_cell_size(10)
//!         .with_rule(Rule::GameOfLife),
//! )?;
//!
//! engine.set_cell(5, 4, CellState::Alive);
//! engine.set_cell(5, 5, CellState::Alive);
//! engine.set_cell(5, 6, CellState::Alive);
//! engine.advance();
//! let cells = engine.read_cells()?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Cell states
//!
//! [`CellState`] is a closed three-value enumeration (`Dead`, `Alive`,
//! `Dying`). `Dying` only participates in Brian's Brain; every other
//! rule treats it as dead, so leftover texels after a rule swap are
//! harmless.
//!
//! ### Rules
//!
//! [`Rule`] is a closed set of six automata sharing toroidal wraparound
//! and Moore neighborhoods. Each rule compiles to its own step shader
//! via [`Rule::to_wgsl`]; there is no runtime rule interpretation on
//! the GPU.
//!
//! ### Phases
//!
//! The engine is always in one [`Phase`]: `Idle` (showing the committed
//! state), `Drawing` (cells painted by the user overlay the state until
//! the stroke commits), or `Playing` (advancing at the capped rate).
//! Operations called in the wrong phase warn and do nothing.

pub mod color;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod grid;
pub mod rules;
pub mod snapshot;
pub mod time;
pub mod window;

pub use color::{CellState, ColorSlot, ColorSlotId, Palette};
pub use engine::{Engine, EngineConfig, Phase};
pub use error::{EngineError, GpuError};
pub use glam::Vec4;
pub use gpu::GpuContext;
pub use grid::GridSpec;
pub use rules::Rule;

pub mod prelude {
    pub use crate::color::{CellState, ColorSlotId, Palette};
    pub use glam::Vec4;
    pub use crate::engine::{Engine, EngineConfig, Phase};
    pub use crate::error::{EngineError, GpuError};
    pub use crate::gpu::GpuContext;
    pub use crate::grid::GridSpec;
    pub use crate::rules::Rule;
}
