//! Cell states and the presentation palette.
//!
//! Cell state is an explicit small enumeration stored per cell in a GPU
//! texture; color is purely a presentation-layer lookup applied by the
//! display pass. Changing a palette entry therefore never touches the
//! simulation state, it only changes how a state is drawn.

use glam::Vec4;

/// The state of a single cell, stored as one `u32` texel.
///
/// `Dying` only participates in multi-state rules (Brian's Brain); the
/// other rules treat any non-`Alive` state as dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum CellState {
    #[default]
    Dead = 0,
    Alive = 1,
    Dying = 2,
}

impl CellState {
    /// Decode a texel value. Unknown values fall back to `Dead` so a
    /// corrupted or foreign texture cannot wedge the simulation.
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => CellState::Alive,
            2 => CellState::Dying,
            _ => CellState::Dead,
        }
    }

    /// Index of this state's palette entry.
    pub fn palette_index(self) -> usize {
        self as u32 as usize
    }
}

/// Identifier of a palette entry that can be changed at runtime.
///
/// Slots are a closed set resolved at compile time; rules declare which
/// slots they use via [`crate::rules::Rule::color_slots`], and a color
/// change on an undeclared slot fails fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlotId {
    Alive,
    Dead,
    Dying,
    Grid,
}

impl ColorSlotId {
    pub fn label(self) -> &'static str {
        match self {
            ColorSlotId::Alive => "alive",
            ColorSlotId::Dead => "dead",
            ColorSlotId::Dying => "dying",
            ColorSlotId::Grid => "grid",
        }
    }
}

/// A color slot declaration: which slot a rule exposes and the state it
/// colors (grid lines have no state, they are an overlay).
#[derive(Debug, Clone, Copy)]
pub struct ColorSlot {
    pub id: ColorSlotId,
    pub label: &'static str,
}

/// The presentation lookup table mapping cell states to display colors.
///
/// Entries are linear RGBA in `0..=1`. The palette always carries all
/// slots; whether a slot is *exposed* for a given rule is decided by the
/// rule's slot list, not by the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub alive: Vec4,
    pub dead: Vec4,
    pub dying: Vec4,
    pub grid: Vec4,
}

impl Palette {
    /// Color for a given cell state.
    pub fn color_of(&self, state: CellState) -> Vec4 {
        match state {
            CellState::Dead => self.dead,
            CellState::Alive => self.alive,
            CellState::Dying => self.dying,
        }
    }

    pub fn get(&self, slot: ColorSlotId) -> Vec4 {
        match slot {
            ColorSlotId::Alive => self.alive,
            ColorSlotId::Dead => self.dead,
            ColorSlotId::Dying => self.dying,
            ColorSlotId::Grid => self.grid,
        }
    }

    pub fn set(&mut self, slot: ColorSlotId, color: Vec4) {
        match slot {
            ColorSlotId::Alive => self.alive = color,
            ColorSlotId::Dead => self.dead = color,
            ColorSlotId::Dying => self.dying = color,
            ColorSlotId::Grid => self.grid = color,
        }
    }

    /// The four palette entries in state order, padded for the display
    /// pass uniform (index 3 is a spare that renders like `Dead`).
    pub fn as_lut(&self) -> [[f32; 4]; 4] {
        [
            self.dead.to_array(),
            self.alive.to_array(),
            self.dying.to_array(),
            self.dead.to_array(),
        ]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            alive: Vec4::new(0.082, 0.149, 0.035, 1.0),
            dead: Vec4::new(0.0, 0.0, 0.0, 1.0),
            dying: Vec4::new(0.0, 0.235, 0.627, 1.0),
            grid: Vec4::new(0.051, 0.051, 0.051, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_state_roundtrip() {
        for state in [CellState::Dead, CellState::Alive, CellState::Dying] {
            assert_eq!(CellState::from_u32(state as u32), state);
        }
    }

    #[test]
    fn test_unknown_texel_decodes_to_dead() {
        assert_eq!(CellState::from_u32(3), CellState::Dead);
        assert_eq!(CellState::from_u32(u32::MAX), CellState::Dead);
    }

    #[test]
    fn test_palette_set_get() {
        let mut palette = Palette::default();
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        palette.set(ColorSlotId::Alive, red);
        assert_eq!(palette.get(ColorSlotId::Alive), red);
        assert_eq!(palette.color_of(CellState::Alive), red);
        // Other slots untouched.
        assert_eq!(palette.dead, Palette::default().dead);
    }

    #[test]
    fn test_lut_order_matches_state_indices() {
        let palette = Palette::default();
        let lut = palette.as_lut();
        assert_eq!(lut[CellState::Dead.palette_index()], palette.dead.to_array());
        assert_eq!(lut[CellState::Alive.palette_index()], palette.alive.to_array());
        assert_eq!(lut[CellState::Dying.palette_index()], palette.dying.to_array());
    }
}
