//! Bounds checks for instruction fetch and ROM loading.

use crate::{FaultCode, LoadError, MEMORY_BYTES, PROGRAM_START};

/// Validates that a full instruction word can be fetched at `pc`.
///
/// # Errors
///
/// Returns [`FaultCode::FetchOutOfBounds`] when `pc + 1` lies outside memory.
pub const fn validate_fetch_access(pc: u16) -> Result<(), FaultCode> {
    if (pc as usize) + 1 < MEMORY_BYTES {
        Ok(())
    } else {
        Err(FaultCode::FetchOutOfBounds)
    }
}

/// Reads the big-endian instruction word at `pc`.
///
/// # Errors
///
/// Returns [`FaultCode::FetchOutOfBounds`] when the word would straddle or
/// exceed the end of memory.
pub fn fetch_word(memory: &[u8], pc: u16) -> Result<u16, FaultCode> {
    validate_fetch_access(pc)?;
    let addr = usize::from(pc);
    match (memory.get(addr), memory.get(addr + 1)) {
        (Some(hi), Some(lo)) => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(FaultCode::FetchOutOfBounds),
    }
}

/// Bytes available to a ROM between the program entry and the end of memory.
#[must_use]
pub const fn program_capacity() -> usize {
    MEMORY_BYTES - PROGRAM_START as usize
}

/// Validates that a ROM of `len` bytes fits at the program entry.
///
/// # Errors
///
/// Returns [`LoadError::CapacityExceeded`] when `0x200 + len > 4096`.
pub fn validate_load_len(len: usize) -> Result<(), LoadError> {
    let capacity = program_capacity();
    if len <= capacity {
        Ok(())
    } else {
        Err(LoadError::CapacityExceeded { len, capacity })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        fetch_word, new_address_space, program_capacity, validate_fetch_access,
        validate_load_len, FaultCode, LoadError, MEMORY_BYTES,
    };

    #[test]
    fn fetch_is_legal_up_to_the_penultimate_byte() {
        assert_eq!(validate_fetch_access(0x0000), Ok(()));
        assert_eq!(validate_fetch_access(0x0FFE), Ok(()));
        assert_eq!(
            validate_fetch_access(0x0FFF),
            Err(FaultCode::FetchOutOfBounds)
        );
        assert_eq!(
            validate_fetch_access(0x1000),
            Err(FaultCode::FetchOutOfBounds)
        );
        assert_eq!(
            validate_fetch_access(u16::MAX),
            Err(FaultCode::FetchOutOfBounds)
        );
    }

    #[test]
    fn fetch_word_is_big_endian() {
        let mut memory = new_address_space();
        memory[0x200] = 0x12;
        memory[0x201] = 0x34;
        assert_eq!(fetch_word(&memory, 0x200), Ok(0x1234));
    }

    #[test]
    fn fetch_word_reads_last_full_word() {
        let mut memory = new_address_space();
        memory[MEMORY_BYTES - 2] = 0xAB;
        memory[MEMORY_BYTES - 1] = 0xCD;
        assert_eq!(fetch_word(&memory, 0x0FFE), Ok(0xABCD));
        assert_eq!(
            fetch_word(&memory, 0x0FFF),
            Err(FaultCode::FetchOutOfBounds)
        );
    }

    #[test]
    fn load_capacity_is_memory_minus_program_entry() {
        assert_eq!(program_capacity(), 3584);
        assert!(validate_load_len(0).is_ok());
        assert!(validate_load_len(3584).is_ok());
        assert!(matches!(
            validate_load_len(3585),
            Err(LoadError::CapacityExceeded {
                len: 3585,
                capacity: 3584
            })
        ));
    }
}
