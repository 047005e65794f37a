#![no_main]

use chip8_core::{CoreConfig, Decoder, FaultCode, Interpreter, StepOutcome};
use libfuzzer_sys::fuzz_target;

const MAX_STEPS: usize = 2_000;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let keys = u16::from_be_bytes([data[0], data[1]]);
    let rom = &data[2..];

    for pair in rom.chunks_exact(2) {
        let _ = Decoder::decode(u16::from_be_bytes([pair[0], pair[1]]));
    }

    let mut interp = Interpreter::new(CoreConfig {
        rng_seed: Some(0),
        ..CoreConfig::default()
    });
    if interp.load(rom).is_err() {
        return;
    }
    for key in 0u8..16 {
        interp.set_key(key, keys & (1 << key) != 0);
    }

    for _ in 0..MAX_STEPS {
        if let StepOutcome::Fault {
            cause: FaultCode::FetchOutOfBounds,
            ..
        } = interp.step()
        {
            break;
        }
    }
});
