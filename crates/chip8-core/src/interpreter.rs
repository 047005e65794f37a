//! Host-facing interpreter: machine state, random source, diagnostics and
//! tracing bundled behind one step entry point.

use std::fmt;
use std::io::Read;
use std::path::Path;

use log::{debug, trace, warn};

use crate::execute::step_one;
use crate::memory::fetch_word;
use crate::{
    CoreConfig, DiagCoreFields, FrameBuffer, LoadError, MachineState, RandomSource, RunState,
    SeededRandom, StepOutcome, TraceEvent, TraceSink,
};

/// A CHIP-8 machine plus the collaborators one step needs.
pub struct Interpreter {
    config: CoreConfig,
    state: MachineState,
    rng: Box<dyn RandomSource>,
    diag: DiagCoreFields,
    trace_sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("config", &self.config)
            .field("pc", &self.state.pc())
            .field("run_state", &self.state.run_state)
            .field("diag", &self.diag)
            .finish_non_exhaustive()
    }
}

impl Interpreter {
    /// Creates an interpreter with a freshly initialized machine and a
    /// [`SeededRandom`] source seeded from `config.rng_seed`.
    #[must_use]
    pub fn new(config: CoreConfig) -> Self {
        Self::with_random(config, Box::new(SeededRandom::new(config.rng_seed)))
    }

    /// Creates an interpreter using a caller-supplied random source.
    #[must_use]
    pub fn with_random(config: CoreConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            state: MachineState::new(),
            rng,
            diag: DiagCoreFields::new(),
            trace_sink: None,
        }
    }

    /// Installs the sink receiving [`TraceEvent`]s while tracing is enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace_sink = Some(sink);
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Read-only view of the machine.
    #[must_use]
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Mutable access to the machine, for drivers and tests that poke state directly.
    pub const fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// Diagnostic counters.
    #[must_use]
    pub const fn diag(&self) -> &DiagCoreFields {
        &self.diag
    }

    /// Loads ROM bytes at the program entry.
    ///
    /// # Errors
    ///
    /// See [`MachineState::load`].
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        self.state.load(rom)
    }

    /// Loads a ROM from any byte source.
    ///
    /// # Errors
    ///
    /// See [`MachineState::load_from_reader`].
    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> Result<usize, LoadError> {
        self.state.load_from_reader(reader)
    }

    /// Loads a ROM file.
    ///
    /// # Errors
    ///
    /// See [`MachineState::load_rom_file`].
    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        self.state.load_rom_file(path)
    }

    /// Replaces the machine with a freshly initialized one and clears the
    /// diagnostics. The ROM must be loaded again.
    pub fn reset(&mut self) {
        debug!("reset to power-on state");
        self.state = MachineState::new();
        self.diag.reset();
    }

    /// Executes one fetch-decode-execute cycle.
    pub fn step(&mut self) -> StepOutcome {
        let pc = self.state.pc();
        if self.config.tracing_enabled {
            if let Ok(word) = fetch_word(&self.state.memory, pc) {
                self.emit(TraceEvent::InstructionStart {
                    pc,
                    word,
                    sp: self.state.stack.sp(),
                    index: self.state.registers.index(),
                    registers: self.state.registers.values(),
                });
            }
        }

        let outcome = step_one(&mut self.state, self.rng.as_mut(), &self.config);

        match outcome {
            StepOutcome::Retired { pc, word } => {
                trace!("{pc:#05x}: {word:04x}");
                self.diag.increment_instruction_count();
                let next_pc = self.state.pc();
                self.emit(TraceEvent::InstructionRetired { pc, next_pc });
            }
            StepOutcome::AwaitingKey { register } => {
                trace!("{pc:#05x}: waiting for key into {register:?}");
                self.diag.record_key_wait();
            }
            StepOutcome::Fault { cause, pc } => {
                warn!("{cause} at {pc:#05x}");
                self.diag.record_fault(cause, pc);
                self.emit(TraceEvent::FaultRaised { cause, pc });
            }
        }
        outcome
    }

    /// Runs up to `steps` steps, stopping early while stalled on a key wait.
    /// Returns the number of steps taken.
    pub fn run(&mut self, steps: u32) -> u32 {
        let mut taken = 0;
        while taken < steps {
            taken += 1;
            if matches!(self.step(), StepOutcome::AwaitingKey { .. }) {
                break;
            }
        }
        taken
    }

    /// Decrements the timers once. Drivers call this at 60 Hz under
    /// [`crate::TimerMode::External`].
    pub const fn tick_timers(&mut self) {
        self.state.timers.tick(self.config.sound_timer);
    }

    /// Sets the state of key `key` (`0x0..=0xF`).
    pub const fn set_key(&mut self, key: u8, down: bool) {
        self.state.keypad.set(key, down);
    }

    /// Current execution state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.state.run_state
    }

    /// Framebuffer contents.
    #[must_use]
    pub const fn display(&self) -> &FrameBuffer {
        &self.state.display
    }

    /// Returns `true` when the display changed since the last acknowledgement.
    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.state.display.needs_redraw()
    }

    /// Clears the redraw flag after the consumer rendered the display.
    pub const fn acknowledge_redraw(&mut self) {
        self.state.display.acknowledge_redraw();
    }

    /// Returns `true` while the sound timer requests a tone.
    #[must_use]
    pub const fn sound_active(&self) -> bool {
        self.state.timers.sound_active()
    }

    fn emit(&mut self, event: TraceEvent) {
        if !self.config.tracing_enabled {
            return;
        }
        if let Some(sink) = self.trace_sink.as_mut() {
            sink.on_event(event);
        }
    }
}
