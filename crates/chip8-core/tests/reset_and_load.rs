//! ROM loading from files and readers, and reset semantics.

#![allow(clippy::pedantic, clippy::nursery)]

use std::io::Write;

use chip8_core::{
    CoreConfig, Interpreter, LoadError, MachineState, Register, FONT_SET, MEMORY_BYTES,
    PROGRAM_START,
};
use log as _;
use proptest as _;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

#[test]
fn rom_file_loads_verbatim_at_program_start() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&[0x60, 0x2A, 0x12, 0x02]).expect("write rom");

    let mut interp = Interpreter::new(CoreConfig::default());
    let len = interp.load_rom_file(file.path()).expect("load");
    assert_eq!(len, 4);
    interp.run(4);
    assert_eq!(interp.state().v(Register::V0), 0x2A);
    assert_eq!(interp.state().pc(), 0x202);
}

#[test]
fn rom_file_at_capacity_loads_and_one_more_byte_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let capacity = MEMORY_BYTES - usize::from(PROGRAM_START);

    let fits = dir.path().join("fits.ch8");
    std::fs::write(&fits, vec![0x11; capacity]).expect("write");
    let mut state = MachineState::new();
    assert_eq!(state.load_rom_file(&fits).expect("fits"), capacity);

    let too_big = dir.path().join("too_big.ch8");
    std::fs::write(&too_big, vec![0x22; capacity + 1]).expect("write");
    let mut fresh = MachineState::new();
    let err = fresh.load_rom_file(&too_big).expect_err("too big");
    assert!(matches!(
        err,
        LoadError::CapacityExceeded { capacity: c, .. } if c == capacity
    ));
    assert_eq!(fresh, MachineState::new());
}

#[test]
fn missing_rom_file_is_io_unavailable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.ch8");
    let mut state = MachineState::new();
    let err = state.load_rom_file(&missing).expect_err("missing");
    match err {
        LoadError::IoUnavailable { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected {other}"),
    }
}

#[test]
fn directory_as_rom_is_io_unavailable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut state = MachineState::new();
    let err = state.load_rom_file(dir.path()).expect_err("directory");
    assert!(matches!(err, LoadError::IoUnavailable { .. }));
}

#[test]
fn reset_rebuilds_power_on_state() {
    let mut interp = Interpreter::new(CoreConfig::default());
    interp
        .load(&[0x60, 0xFF, 0xA3, 0x00, 0xF0, 0x55, 0x00, 0xE0, 0x22, 0x00])
        .expect("fits");
    interp.set_key(3, true);
    interp.run(5);
    assert!(!interp.state().stack.is_empty());

    interp.reset();
    let state = interp.state();
    assert_eq!(state, &MachineState::new());
    assert_eq!(&state.memory[..FONT_SET.len()], &FONT_SET);
    assert_eq!(state.memory[0x300], 0);
    assert!(!state.keypad.is_down(3));
}

#[test]
fn reader_loads_then_second_load_overlays() {
    let mut state = MachineState::new();
    state
        .load_from_reader(std::io::Cursor::new(vec![0xAA, 0xBB, 0xCC]))
        .expect("first");
    state.load(&[0x11]).expect("second");
    let start = usize::from(PROGRAM_START);
    assert_eq!(&state.memory[start..start + 3], &[0x11, 0xBB, 0xCC]);
}
