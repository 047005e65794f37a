//! Public host-facing API contracts for embedding the interpreter core.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    new_address_space, program_capacity, validate_load_len, CallStack, FaultCode, FrameBuffer,
    Keypad, LoadError, Register, RegisterFile, RunState, Timers, PROGRAM_START, REGISTER_COUNT,
};

/// Fixed mask applied by `Cxkk` under [`RandomMaskPolicy::Fixed`] in legacy builds.
pub const LEGACY_RANDOM_MASK: u8 = 0x05;

/// How a timer tick treats the sound timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SoundTimerPolicy {
    /// A nonzero sound timer drops straight to zero on the next tick.
    #[default]
    ForceZero,
    /// The sound timer counts down by one per tick, like the delay timer.
    Decrement,
}

/// Mask source for the random-and-mask instruction (`Cxkk`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RandomMaskPolicy {
    /// Mask with the instruction's `kk` byte.
    #[default]
    Immediate,
    /// Mask with a constant, ignoring `kk`.
    Fixed(u8),
}

impl RandomMaskPolicy {
    /// Resolves the mask for an instruction whose immediate is `kk`.
    #[must_use]
    pub const fn mask(self, kk: u8) -> u8 {
        match self {
            Self::Immediate => kk,
            Self::Fixed(mask) => mask,
        }
    }
}

/// Operand shifted by `8xy6` / `8xyE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ShiftSource {
    /// Shift `Vx` in place; `Vy` is ignored.
    #[default]
    Vx,
    /// Shift `Vy` and store the result in `Vx`.
    Vy,
}

/// Who drives the delay/sound timer cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TimerMode {
    /// Timers tick once after every executed step.
    #[default]
    PerStep,
    /// Timers only tick when the host calls the tick entry point (60 Hz).
    External,
}

/// Top-level immutable configuration for an interpreter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Sound timer tick behavior.
    pub sound_timer: SoundTimerPolicy,
    /// Mask source for `Cxkk`.
    pub random_mask: RandomMaskPolicy,
    /// Operand shifted by the shift instructions.
    pub shift_source: ShiftSource,
    /// Timer cadence.
    pub timer_mode: TimerMode,
    /// Seed for the random source; entropy-seeded when absent.
    pub rng_seed: Option<u64>,
    /// Enables trace callback dispatch.
    pub tracing_enabled: bool,
}

/// Complete machine state: registers, memory, stack, timers, display and keypad.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    /// Data registers, index register and program counter.
    pub registers: RegisterFile,
    /// 4 KiB memory image with the font at address zero.
    pub memory: Box<[u8]>,
    /// Return-address stack.
    pub stack: CallStack,
    /// Delay and sound timers.
    pub timers: Timers,
    /// Framebuffer and redraw flag.
    pub display: FrameBuffer,
    /// Driver-supplied key states.
    pub keypad: Keypad,
    /// Current execution state.
    pub run_state: RunState,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineState {
    /// Creates a freshly initialized machine: zeroed, font loaded, `pc = 0x200`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registers: RegisterFile::default(),
            memory: new_address_space(),
            stack: CallStack::default(),
            timers: Timers::default(),
            display: FrameBuffer::default(),
            keypad: Keypad::default(),
            run_state: RunState::Running,
        }
    }

    /// Restores the power-on state. Calling it twice is the same as calling it once.
    pub fn initialize(&mut self) {
        *self = Self::new();
    }

    /// Copies `rom` verbatim into memory at [`PROGRAM_START`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::CapacityExceeded`] when the ROM does not fit; the
    /// state is left untouched in that case.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        validate_load_len(rom.len())?;
        let start = usize::from(PROGRAM_START);
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} rom bytes at {PROGRAM_START:#05x}", rom.len());
        Ok(())
    }

    /// Reads a whole ROM from `reader` and loads it.
    ///
    /// At most one byte past the program capacity is read, so an endless
    /// source is rejected rather than buffered.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::IoUnavailable`] (with path `-`) when reading fails
    /// and [`LoadError::CapacityExceeded`] when the ROM does not fit.
    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> Result<usize, LoadError> {
        let rom = read_limited(reader, Path::new("-"))?;
        self.load(&rom)?;
        Ok(rom.len())
    }

    /// Opens `path`, reads it whole and loads it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::IoUnavailable`] when the file cannot be opened or
    /// read and [`LoadError::CapacityExceeded`] when it does not fit.
    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::IoUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let rom = read_limited(file, path)?;
        self.load(&rom)?;
        Ok(rom.len())
    }

    /// Program counter of the next instruction.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.registers.pc()
    }

    /// Reads a data register.
    #[must_use]
    pub const fn v(&self, reg: Register) -> u8 {
        self.registers.v(reg)
    }
}

fn read_limited<R: Read>(reader: R, path: &Path) -> Result<Vec<u8>, LoadError> {
    let limit = u64::try_from(program_capacity()).map_or(u64::MAX, |cap| cap + 1);
    let mut rom = Vec::new();
    reader
        .take(limit)
        .read_to_end(&mut rom)
        .map_err(|source| LoadError::IoUnavailable {
            path: PathBuf::from(path),
            source,
        })?;
    Ok(rom)
}

/// Source of random bytes for `Cxkk`.
pub trait RandomSource {
    /// Returns the next uniformly distributed byte.
    fn next_byte(&mut self) -> u8;
}

/// [`RandomSource`] backed by a seedable standard RNG.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a source seeded with `seed`, or from OS entropy when `None`.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self { rng }
    }
}

impl RandomSource for SeededRandom {
    fn next_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}

/// Output status from one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The instruction at `pc` executed.
    Retired {
        /// Address the instruction was fetched from.
        pc: u16,
        /// Raw instruction word.
        word: u16,
    },
    /// `Fx0A` found no key down; `pc` stays on the wait instruction.
    AwaitingKey {
        /// Register that will receive the key index.
        register: Register,
    },
    /// A fault was reported. Execution continues on the next step.
    Fault {
        /// Reported fault.
        cause: FaultCode,
        /// Program counter of the faulting fetch or instruction.
        pc: u16,
    },
}

/// Trace events emitted at step boundaries when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Pre-execute snapshot of the machine for the fetched word.
    InstructionStart {
        /// Program counter used for this fetch.
        pc: u16,
        /// Raw 16-bit instruction word.
        word: u16,
        /// Stack pointer.
        sp: u8,
        /// Index register.
        index: u16,
        /// Data registers `V0..VF`.
        registers: [u8; REGISTER_COUNT],
    },
    /// Instruction finished executing.
    InstructionRetired {
        /// Program counter of the retired instruction.
        pc: u16,
        /// Program counter after the instruction.
        next_pc: u16,
    },
    /// Fault emission event.
    FaultRaised {
        /// Reported fault.
        cause: FaultCode,
        /// Program counter active when the fault was observed.
        pc: u16,
    },
}

/// Sink trait for trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}
