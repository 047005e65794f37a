//! Fetch-decode-execute core for the CHIP-8 virtual machine.
//!
//! The crate owns the machine state (registers, 4 KiB memory, call stack,
//! timers, framebuffer, keypad) and executes one instruction per
//! [`Interpreter::step`] call. Pacing, rendering and input capture belong to
//! the driver.

/// Memory layout, font table and bounds checks.
pub mod memory;
pub use memory::{
    fetch_word, glyph_address, new_address_space, program_capacity, validate_fetch_access,
    validate_load_len, wrap_address, ADDRESS_MASK, FONT_GLYPH_BYTES, FONT_SET, FONT_START,
    MEMORY_BYTES, PROGRAM_START,
};

/// Diagnostic counters.
pub mod diag;
pub use diag::DiagCoreFields;

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    CoreConfig, MachineState, RandomMaskPolicy, RandomSource, SeededRandom, ShiftSource,
    SoundTimerPolicy, StepOutcome, TimerMode, TraceEvent, TraceSink, LEGACY_RANDOM_MASK,
};

/// Machine state primitives.
pub mod state;
pub use state::{
    CallStack, FrameBuffer, Keypad, Register, RegisterFile, RunState, Timers, DISPLAY_CELLS,
    DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, REGISTER_COUNT, STACK_DEPTH,
};

/// Opcode groups and operand field extraction.
pub mod encoding;
pub use encoding::{OpcodeGroup, OperandFields, SecondarySelector};

/// Instruction decoder.
pub mod decoder;
pub use decoder::{DecodedOrFault, Decoder, Instruction};

/// Fault and load-error taxonomy.
pub mod fault;
pub use fault::{FaultClass, FaultCode, LoadError};

/// Driver pacing constants.
pub mod timing;
pub use timing::{
    step_interval_nanos, steps_per_timer_tick, DEFAULT_INSTRUCTIONS_PER_SECOND, TIMER_HZ,
};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    commit_execution, execute_instruction, step_one, ExecuteOutcome, ExecuteState, FlagsUpdate,
};

/// Host-facing interpreter facade.
pub mod interpreter;
pub use interpreter::Interpreter;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
