//! Helper functions for instruction execution.

use crate::{DISPLAY_CELLS, DISPLAY_WIDTH};

/// Hundreds, tens and units digits of `value`.
#[must_use]
pub const fn bcd_digits(value: u8) -> [u8; 3] {
    [value / 100, (value / 10) % 10, value % 10]
}

/// Framebuffer cell touched by sprite column `col` of row `row` drawn at
/// `(x, y)`. Wraps around the end of the buffer.
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn sprite_cell_index(x: u8, y: u8, col: u8, row: u8) -> usize {
    let column = x as usize + col as usize;
    let line = y as usize + row as usize;
    (column + line * DISPLAY_WIDTH) % DISPLAY_CELLS
}

/// Key index named by a register value; only the low nibble selects a key.
#[must_use]
pub const fn key_index(value: u8) -> u8 {
    value & 0x0F
}

/// Result of `I + Vx` (wrapping at 16 bits) and whether the unwrapped sum
/// left the 12-bit address range.
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn add_to_index(index: u16, value: u8) -> (u16, bool) {
    let wide = index as u32 + value as u32;
    (index.wrapping_add(value as u16), wide > 0x0FFF)
}

#[cfg(test)]
mod tests {
    use super::{add_to_index, bcd_digits, key_index, sprite_cell_index};

    #[test]
    fn bcd_splits_decimal_digits() {
        assert_eq!(bcd_digits(0), [0, 0, 0]);
        assert_eq!(bcd_digits(7), [0, 0, 7]);
        assert_eq!(bcd_digits(42), [0, 4, 2]);
        assert_eq!(bcd_digits(255), [2, 5, 5]);
    }

    #[test]
    fn sprite_index_wraps_right_edge_into_next_row() {
        assert_eq!(sprite_cell_index(63, 0, 1, 0), 64);
        assert_eq!(sprite_cell_index(0, 0, 0, 0), 0);
    }

    #[test]
    fn sprite_index_wraps_bottom_to_top() {
        assert_eq!(sprite_cell_index(0, 31, 0, 1), 0);
        assert_eq!(sprite_cell_index(255, 255, 7, 14), (262 + 269 * 64) % 2048);
    }

    #[test]
    fn key_index_masks_high_nibble() {
        assert_eq!(key_index(0x1A), 0xA);
    }

    #[test]
    fn index_addition_flags_beyond_twelve_bits() {
        assert_eq!(add_to_index(0x0FFE, 1), (0x0FFF, false));
        assert_eq!(add_to_index(0x0FFF, 1), (0x1000, true));
        assert_eq!(add_to_index(0xFFFF, 2), (0x0001, true));
    }
}
