//! Machine state primitives: registers, stack, timers, display, keypad.

/// Framebuffer and redraw flag.
pub mod display;
/// Hexadecimal keypad input state.
pub mod keypad;
/// Data registers, index register and program counter.
pub mod registers;
/// Execution-state machine.
pub mod run_state;
/// Bounded return-address stack.
pub mod stack;
/// Delay and sound timers.
pub mod timers;

pub use display::{FrameBuffer, DISPLAY_CELLS, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use keypad::{Keypad, KEY_COUNT};
pub use registers::{Register, RegisterFile, REGISTER_COUNT};
pub use run_state::RunState;
pub use stack::{CallStack, STACK_DEPTH};
pub use timers::Timers;
