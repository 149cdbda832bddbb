//! Grid geometry: mapping between surface pixels and simulation cells.

/// The logical layout of the simulation grid over the render surface.
///
/// The grid covers the full surface; the rightmost/bottom cells may be
/// partially visible when the surface size is not a multiple of the cell
/// size, so cell counts round up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub surface_width: u32,
    pub surface_height: u32,
    /// Side length of a square cell, in pixels.
    pub cell_size: u32,
}

impl GridSpec {
    pub fn new(surface_width: u32, surface_height: u32, cell_size: u32) -> Self {
        Self {
            surface_width,
            surface_height,
            cell_size: cell_size.max(1),
        }
    }

    pub fn has_area(&self) -> bool {
        self.surface_width > 0 && self.surface_height > 0
    }

    /// Number of cell columns.
    pub fn cells_x(&self) -> u32 {
        self.surface_width.div_ceil(self.cell_size)
    }

    /// Number of cell rows.
    pub fn cells_y(&self) -> u32 {
        self.surface_height.div_ceil(self.cell_size)
    }

    pub fn cell_count(&self) -> usize {
        self.cells_x() as usize * self.cells_y() as usize
    }

    /// Map a surface-local pixel position to the cell under it, clamped
    /// to the grid bounds.
    pub fn cell_at_pixel(&self, px: f64, py: f64) -> (u32, u32) {
        let size = self.cell_size as f64;
        let x = (px / size).floor().max(0.0) as u32;
        let y = (py / size).floor().max(0.0) as u32;
        (
            x.min(self.cells_x().saturating_sub(1)),
            y.min(self.cells_y().saturating_sub(1)),
        )
    }

    /// Linear index of a cell in a row-major readback.
    pub fn cell_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.cells_x() as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_counts_round_up() {
        let grid = GridSpec::new(100, 50, 10);
        assert_eq!(grid.cells_x(), 10);
        assert_eq!(grid.cells_y(), 5);

        let ragged = GridSpec::new(101, 55, 10);
        assert_eq!(ragged.cells_x(), 11);
        assert_eq!(ragged.cells_y(), 6);
    }

    #[test]
    fn test_zero_cell_size_clamped() {
        let grid = GridSpec::new(100, 100, 0);
        assert_eq!(grid.cell_size, 1);
        assert_eq!(grid.cells_x(), 100);
    }

    #[test]
    fn test_pixel_to_cell_mapping() {
        let grid = GridSpec::new(100, 100, 10);
        assert_eq!(grid.cell_at_pixel(0.0, 0.0), (0, 0));
        assert_eq!(grid.cell_at_pixel(9.9, 9.9), (0, 0));
        assert_eq!(grid.cell_at_pixel(10.0, 0.0), (1, 0));
        assert_eq!(grid.cell_at_pixel(55.0, 87.0), (5, 8));
    }

    #[test]
    fn test_pixel_to_cell_clamps_to_bounds() {
        let grid = GridSpec::new(100, 100, 10);
        assert_eq!(grid.cell_at_pixel(-5.0, -5.0), (0, 0));
        assert_eq!(grid.cell_at_pixel(1000.0, 1000.0), (9, 9));
    }

    #[test]
    fn test_has_area() {
        assert!(GridSpec::new(1, 1, 1).has_area());
        assert!(!GridSpec::new(0, 100, 10).has_area());
        assert!(!GridSpec::new(100, 0, 10).has_area());
    }
}
