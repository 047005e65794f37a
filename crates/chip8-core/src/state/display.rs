/// Display width in cells.
pub const DISPLAY_WIDTH: usize = 64;
/// Display height in cells.
pub const DISPLAY_HEIGHT: usize = 32;
/// Total number of display cells.
pub const DISPLAY_CELLS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// 64×32 monochrome framebuffer, one byte per cell holding 0 or 1, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FrameBuffer {
    cells: Box<[u8]>,
    redraw: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            cells: vec![0; DISPLAY_CELLS].into_boxed_slice(),
            redraw: false,
        }
    }
}

impl FrameBuffer {
    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Cell at column `x`, row `y`; coordinates wrap around the screen.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.cells[(x % DISPLAY_WIDTH) + (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH]
    }

    /// Zeroes every cell and requests a redraw.
    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.redraw = true;
    }

    /// XORs the cell at `index` (wrapping) with 1.
    ///
    /// Returns `true` when the cell was set beforehand, i.e. the sprite collided.
    pub fn toggle(&mut self, index: usize) -> bool {
        let cell = &mut self.cells[index % DISPLAY_CELLS];
        let collided = *cell == 1;
        *cell ^= 1;
        collided
    }

    /// Returns `true` when the buffer changed since the consumer last rendered.
    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Marks the buffer as changed.
    pub const fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Clears the redraw flag once the consumer has rendered.
    pub const fn acknowledge_redraw(&mut self) {
        self.redraw = false;
    }

    /// Number of lit cells.
    #[must_use]
    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|cell| **cell != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameBuffer, DISPLAY_CELLS, DISPLAY_WIDTH};

    #[test]
    fn default_buffer_is_blank_and_clean() {
        let fb = FrameBuffer::default();
        assert_eq!(fb.cells().len(), DISPLAY_CELLS);
        assert_eq!(fb.lit_cells(), 0);
        assert!(!fb.needs_redraw());
    }

    #[test]
    fn toggle_reports_collision_only_when_clearing() {
        let mut fb = FrameBuffer::default();
        assert!(!fb.toggle(5));
        assert_eq!(fb.cell(5, 0), 1);
        assert!(fb.toggle(5));
        assert_eq!(fb.cell(5, 0), 0);
    }

    #[test]
    fn toggle_wraps_past_last_cell() {
        let mut fb = FrameBuffer::default();
        fb.toggle(DISPLAY_CELLS + DISPLAY_WIDTH + 1);
        assert_eq!(fb.cell(1, 1), 1);
    }

    #[test]
    fn clear_zeroes_and_requests_redraw() {
        let mut fb = FrameBuffer::default();
        fb.toggle(0);
        fb.toggle(DISPLAY_CELLS - 1);
        fb.clear();
        assert_eq!(fb.lit_cells(), 0);
        assert!(fb.needs_redraw());
        fb.acknowledge_redraw();
        assert!(!fb.needs_redraw());
    }
}
