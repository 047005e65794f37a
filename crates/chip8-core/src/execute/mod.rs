//! Instruction execution pipeline.
//!
//! Each operation runs in two phases. [`execute_instruction`] reads its
//! operands and gathers the register-file effects (destination register, `VF`
//! ordering, index, timers, next `pc`) into an [`ExecuteState`];
//! [`commit_execution`] then applies them in a fixed order. Memory, display and
//! stack effects are applied in place by the operation itself.

mod flags;
mod helpers;

pub use flags::FlagsUpdate;
pub use helpers::{add_to_index, bcd_digits, key_index, sprite_cell_index};

use crate::decoder::{DecodedOrFault, Decoder, Instruction};
use crate::fault::FaultCode;
use crate::memory::{fetch_word, glyph_address, wrap_address};
use crate::{
    CoreConfig, MachineState, RandomSource, Register, RunState, ShiftSource, StepOutcome,
    TimerMode,
};

/// Width of a sprite row in cells.
const SPRITE_WIDTH: u8 = 8;

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Instruction completed.
    Retired,
    /// `Fx0A` found no key down.
    AwaitingKey(Register),
    /// A fault was reported; the gathered effects still commit.
    Fault(FaultCode),
}

/// Register-file effects gathered while executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteState {
    /// Destination data register.
    pub dest_reg: Option<Register>,
    /// Value for `dest_reg`.
    pub dest_value: Option<u8>,
    /// `VF` update and its ordering relative to the destination write.
    pub flags_update: FlagsUpdate,
    /// New index register value.
    pub index: Option<u16>,
    /// New delay timer value.
    pub delay: Option<u8>,
    /// New sound timer value.
    pub sound: Option<u8>,
    /// New program counter.
    pub next_pc: Option<u16>,
    /// Run state after the instruction.
    pub run_state: RunState,
}

impl ExecuteState {
    /// Effects of an instruction that only advances past itself.
    #[must_use]
    pub fn advance(pc: u16) -> Self {
        Self {
            next_pc: Some(pc.wrapping_add(2)),
            ..Self::default()
        }
    }

    fn write(&mut self, reg: Register, value: u8) {
        self.dest_reg = Some(reg);
        self.dest_value = Some(value);
    }

    fn skip_if(&mut self, pc: u16, condition: bool) {
        let step = if condition { 4 } else { 2 };
        self.next_pc = Some(pc.wrapping_add(step));
    }
}

/// Executes one decoded instruction against `state`.
///
/// Returns the outcome together with the gathered effects; the caller applies
/// the latter with [`commit_execution`].
#[allow(clippy::too_many_lines)]
pub fn execute_instruction(
    instr: Instruction,
    state: &mut MachineState,
    rng: &mut dyn RandomSource,
    config: &CoreConfig,
) -> (ExecuteOutcome, ExecuteState) {
    let pc = state.registers.pc();
    let regs = &state.registers;
    let mut exec = ExecuteState::advance(pc);
    let mut outcome = ExecuteOutcome::Retired;

    match instr {
        Instruction::ClearScreen => state.display.clear(),
        Instruction::Return => match state.stack.pop() {
            Ok(addr) => exec.next_pc = Some(addr.wrapping_add(2)),
            Err(cause) => outcome = ExecuteOutcome::Fault(cause),
        },
        Instruction::Jump { addr } => exec.next_pc = Some(addr),
        Instruction::Call { addr } => match state.stack.push(pc) {
            Ok(()) => exec.next_pc = Some(addr),
            Err(cause) => outcome = ExecuteOutcome::Fault(cause),
        },
        Instruction::SkipIfEqualImm { x, kk } => exec.skip_if(pc, regs.v(x) == kk),
        Instruction::SkipIfNotEqualImm { x, kk } => exec.skip_if(pc, regs.v(x) != kk),
        Instruction::SkipIfRegsEqual { x, y } => exec.skip_if(pc, regs.v(x) == regs.v(y)),
        Instruction::SkipIfRegsNotEqual { x, y } => exec.skip_if(pc, regs.v(x) != regs.v(y)),
        Instruction::LoadImm { x, kk } => exec.write(x, kk),
        Instruction::AddImm { x, kk } => exec.write(x, regs.v(x).wrapping_add(kk)),
        Instruction::LoadReg { x, y } => exec.write(x, regs.v(y)),
        Instruction::Or { x, y } => {
            exec.write(x, regs.v(x) | regs.v(y));
            exec.flags_update = FlagsUpdate::Trailing(0);
        }
        Instruction::And { x, y } => {
            exec.write(x, regs.v(x) & regs.v(y));
            exec.flags_update = FlagsUpdate::Trailing(0);
        }
        Instruction::Xor { x, y } => {
            exec.write(x, regs.v(x) ^ regs.v(y));
            exec.flags_update = FlagsUpdate::Trailing(0);
        }
        Instruction::AddReg { x, y } => {
            let (sum, carry) = regs.v(x).overflowing_add(regs.v(y));
            exec.write(x, sum);
            exec.flags_update = FlagsUpdate::Preceding(u8::from(carry));
        }
        Instruction::Sub { x, y } => {
            let (vx, vy) = (regs.v(x), regs.v(y));
            exec.write(x, vx.wrapping_sub(vy));
            exec.flags_update = FlagsUpdate::Preceding(u8::from(vx >= vy));
        }
        Instruction::SubReverse { x, y } => {
            let (vx, vy) = (regs.v(x), regs.v(y));
            exec.write(x, vy.wrapping_sub(vx));
            exec.flags_update = FlagsUpdate::Preceding(u8::from(vy >= vx));
        }
        Instruction::ShiftRight { x, y } => {
            let source = shift_operand(state, config, x, y);
            exec.write(x, source >> 1);
            exec.flags_update = FlagsUpdate::Preceding(source & 0x01);
        }
        Instruction::ShiftLeft { x, y } => {
            let source = shift_operand(state, config, x, y);
            exec.write(x, source << 1);
            exec.flags_update = FlagsUpdate::Preceding(source >> 7);
        }
        Instruction::LoadIndex { addr } => exec.index = Some(addr),
        Instruction::JumpPlusV0 { addr } => {
            exec.next_pc = Some(addr.wrapping_add(u16::from(regs.v(Register::V0))));
        }
        Instruction::Random { x, kk } => {
            let mask = config.random_mask.mask(kk);
            exec.write(x, rng.next_byte() & mask);
        }
        Instruction::Draw { x, y, n } => {
            let collided = draw_sprite(state, x, y, n);
            exec.flags_update = FlagsUpdate::Trailing(u8::from(collided));
        }
        Instruction::SkipIfKeyDown { x } => {
            exec.skip_if(pc, state.keypad.is_down(key_index(regs.v(x))));
        }
        Instruction::SkipIfKeyUp { x } => {
            exec.skip_if(pc, !state.keypad.is_down(key_index(regs.v(x))));
        }
        Instruction::LoadDelay { x } => exec.write(x, state.timers.delay),
        Instruction::WaitKey { x } => {
            if let Some(key) = state.keypad.pressed_key() {
                exec.write(x, key);
            } else {
                exec.next_pc = Some(pc);
                exec.run_state = RunState::AwaitingKey(x);
                outcome = ExecuteOutcome::AwaitingKey(x);
            }
        }
        Instruction::SetDelay { x } => exec.delay = Some(regs.v(x)),
        Instruction::SetSound { x } => exec.sound = Some(regs.v(x)),
        Instruction::AddIndex { x } => {
            let (index, overflow) = add_to_index(regs.index(), regs.v(x));
            exec.index = Some(index);
            exec.flags_update = FlagsUpdate::Preceding(u8::from(overflow));
        }
        Instruction::FontGlyph { x } => exec.index = Some(glyph_address(regs.v(x))),
        Instruction::StoreBcd { x } => {
            let index = regs.index();
            for (offset, digit) in (0u16..).zip(bcd_digits(regs.v(x))) {
                state.memory[wrap_address(index.wrapping_add(offset))] = digit;
            }
        }
        Instruction::DumpRegisters { x } => {
            let index = regs.index();
            let values = regs.values();
            for (offset, reg) in (0u16..).zip(x.through()) {
                state.memory[wrap_address(index.wrapping_add(offset))] = values[reg.index()];
            }
            exec.index = Some(index_after_block(index, x));
        }
        Instruction::LoadRegisters { x } => {
            let index = regs.index();
            for (offset, reg) in (0u16..).zip(x.through()) {
                let value = state.memory[wrap_address(index.wrapping_add(offset))];
                state.registers.set_v(*reg, value);
            }
            exec.index = Some(index_after_block(index, x));
        }
    }

    (outcome, exec)
}

fn shift_operand(state: &MachineState, config: &CoreConfig, x: Register, y: Register) -> u8 {
    match config.shift_source {
        ShiftSource::Vx => state.registers.v(x),
        ShiftSource::Vy => state.registers.v(y),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn index_after_block(index: u16, last: Register) -> u16 {
    index.wrapping_add(last.index() as u16 + 1)
}

/// XORs an `n`-row sprite from memory at `I` onto the display at `(Vx, Vy)`.
///
/// Returns `true` when any lit cell was switched off.
fn draw_sprite(state: &mut MachineState, x: Register, y: Register, n: u8) -> bool {
    let origin_x = state.registers.v(x);
    let origin_y = state.registers.v(y);
    let index = state.registers.index();
    let mut collided = false;

    for row in 0..n {
        let bits = state.memory[wrap_address(index.wrapping_add(u16::from(row)))];
        for col in 0..SPRITE_WIDTH {
            if bits & (0x80 >> col) != 0 {
                let cell = sprite_cell_index(origin_x, origin_y, col, row);
                collided |= state.display.toggle(cell);
            }
        }
    }
    state.display.request_redraw();
    collided
}

/// Applies gathered effects to `state`.
///
/// Order: flag (when preceding), destination register, flag (when trailing),
/// index, timers, program counter, run state.
pub fn commit_execution(state: &mut MachineState, exec: &ExecuteState) {
    if let FlagsUpdate::Preceding(flag) = exec.flags_update {
        state.registers.set_flag(flag);
    }

    if let (Some(reg), Some(value)) = (exec.dest_reg, exec.dest_value) {
        state.registers.set_v(reg, value);
    }

    if let FlagsUpdate::Trailing(flag) = exec.flags_update {
        state.registers.set_flag(flag);
    }

    if let Some(index) = exec.index {
        state.registers.set_index(index);
    }
    if let Some(delay) = exec.delay {
        state.timers.delay = delay;
    }
    if let Some(sound) = exec.sound {
        state.timers.sound = sound;
    }
    if let Some(pc) = exec.next_pc {
        state.registers.set_pc(pc);
    }
    state.run_state = exec.run_state;
}

/// Performs exactly one fetch-decode-execute cycle.
///
/// Unrecognized words and stack violations are reported and skipped with the
/// default `pc` advance. An out-of-bounds fetch is reported without touching
/// the state. Timers tick after every executed word when
/// [`TimerMode::PerStep`] is configured.
pub fn step_one(
    state: &mut MachineState,
    rng: &mut dyn RandomSource,
    config: &CoreConfig,
) -> StepOutcome {
    let pc = state.registers.pc();
    let word = match fetch_word(&state.memory, pc) {
        Ok(word) => word,
        Err(cause) => return StepOutcome::Fault { cause, pc },
    };

    let (outcome, exec) = match Decoder::decode(word) {
        DecodedOrFault::Instruction(instr) => execute_instruction(instr, state, rng, config),
        DecodedOrFault::Fault(cause) => (ExecuteOutcome::Fault(cause), ExecuteState::advance(pc)),
    };

    commit_execution(state, &exec);

    if config.timer_mode == TimerMode::PerStep {
        state.timers.tick(config.sound_timer);
    }

    match outcome {
        ExecuteOutcome::Retired => StepOutcome::Retired { pc, word },
        ExecuteOutcome::AwaitingKey(register) => StepOutcome::AwaitingKey { register },
        ExecuteOutcome::Fault(cause) => StepOutcome::Fault { cause, pc },
    }
}
