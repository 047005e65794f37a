//! Memory model primitives and fixed layout constants.

/// Fetch and load bounds checks.
pub mod access;
/// Built-in hexadecimal glyph table.
pub mod font;

pub use access::{fetch_word, program_capacity, validate_fetch_access, validate_load_len};
pub use font::{glyph_address, FONT_GLYPH_BYTES, FONT_SET, FONT_START};

/// Size in bytes of the addressable memory (4 KiB).
pub const MEMORY_BYTES: usize = 4096;

/// Address at which ROM content is loaded and execution starts.
pub const PROGRAM_START: u16 = 0x200;

/// Mask reducing any 16-bit address to the 12-bit address space.
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Allocates a zeroed memory image with the font table written at [`FONT_START`].
#[must_use]
pub fn new_address_space() -> Box<[u8]> {
    let mut memory = vec![0; MEMORY_BYTES].into_boxed_slice();
    let start = usize::from(FONT_START);
    memory[start..start + FONT_SET.len()].copy_from_slice(&FONT_SET);
    memory
}

/// Maps an index-relative address onto a memory offset, wrapping at 4 KiB.
#[must_use]
pub const fn wrap_address(addr: u16) -> usize {
    (addr & ADDRESS_MASK) as usize
}

#[cfg(test)]
mod tests {
    use super::{new_address_space, wrap_address, FONT_SET, MEMORY_BYTES, PROGRAM_START};

    #[test]
    fn backing_store_is_4kib_with_font_and_zeroed_program_area() {
        let memory = new_address_space();
        assert_eq!(memory.len(), MEMORY_BYTES);
        assert_eq!(&memory[..FONT_SET.len()], &FONT_SET);
        assert!(memory[FONT_SET.len()..].iter().all(|byte| *byte == 0));
        assert!(memory[usize::from(PROGRAM_START)..]
            .iter()
            .all(|byte| *byte == 0));
    }

    #[test]
    fn wrap_address_stays_inside_memory() {
        assert_eq!(wrap_address(0x0FFF), 0x0FFF);
        assert_eq!(wrap_address(0x1000), 0x0000);
        assert_eq!(wrap_address(0xFFFF), 0x0FFF);
    }
}
