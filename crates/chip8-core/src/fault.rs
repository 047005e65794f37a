use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fault classes used for diagnostics aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Decoder found no operation for an instruction word.
    Decode,
    /// Instruction fetch would leave the address space.
    Fetch,
    /// Call stack depth invariant violation.
    Stack,
}

/// Step-level fault taxonomy.
///
/// None of these halt the machine: the step that raised one is reported to the
/// driver and execution continues on the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// No operation matches the instruction word.
    #[error("unrecognized instruction")]
    UnrecognizedInstruction = 0x01,
    /// `pc` points at the last byte of memory or beyond.
    #[error("instruction fetch outside memory")]
    FetchOutOfBounds = 0x02,
    /// `CALL` with all 16 stack frames in use.
    #[error("call stack overflow")]
    StackOverflow = 0x03,
    /// `RET` with no active call.
    #[error("call stack underflow")]
    StackUnderflow = 0x04,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::UnrecognizedInstruction),
            0x02 => Some(Self::FetchOutOfBounds),
            0x03 => Some(Self::StackOverflow),
            0x04 => Some(Self::StackUnderflow),
            _ => None,
        }
    }

    /// Returns the diagnostics fault class for this fault code.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::UnrecognizedInstruction => FaultClass::Decode,
            Self::FetchOutOfBounds => FaultClass::Fetch,
            Self::StackOverflow | Self::StackUnderflow => FaultClass::Stack,
        }
    }
}

/// Failure of a ROM load attempt. The machine state is left untouched.
#[derive(Debug, Error)]
pub enum LoadError {
    /// ROM does not fit between the program entry and the end of memory.
    #[error("rom of {len} bytes exceeds the {capacity} bytes available for programs")]
    CapacityExceeded {
        /// Length of the rejected byte sequence.
        len: usize,
        /// Bytes available from the program entry to the end of memory.
        capacity: usize,
    },
    /// ROM source could not be opened or read.
    #[error("rom source {} is unavailable", path.display())]
    IoUnavailable {
        /// Path of the byte source, or `-` for an anonymous reader.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}
