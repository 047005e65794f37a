//! CLI entry point for the headless CHIP-8 driver.

mod logger;

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use chip8_core::{
    step_interval_nanos, steps_per_timer_tick, CoreConfig, FrameBuffer, Interpreter,
    RandomMaskPolicy, ShiftSource, SoundTimerPolicy, TimerMode, TraceEvent, TraceSink,
    DEFAULT_INSTRUCTIONS_PER_SECOND, DISPLAY_HEIGHT, DISPLAY_WIDTH, LEGACY_RANDOM_MASK,
};
use log::{info, LevelFilter};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: chip8-run <rom> [options]

Options:
  --steps <n>                     Number of steps to execute (default: 1000)
  --rate <hz>                     Pace steps in real time; timers tick at 60 Hz
  --realtime                      Pace at 700 Hz unless --rate is given
  --trace                         Print pc, opcode, sp and V0..VF before each step
  --seed <n>                      Seed the random source
  --sound <decrement|zero>        Sound timer tick behavior (default: zero)
  --random-mask <immediate|fixed> Mask for Cxkk (default: immediate)
  --shift-vy                      Shift Vy into Vx instead of shifting Vx
  --key <k>                       Hold hex key k down for the whole run (repeatable)
  -v, --verbose                   Log debug messages to stderr
  -h, --help                      Show this help message

Examples:
  chip8-run pong.ch8 --steps 5000
  chip8-run test.ch8 --trace --seed 1 --key a
";

const DEFAULT_STEPS: u32 = 1000;

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    rom: PathBuf,
    steps: u32,
    rate: Option<u32>,
    trace: bool,
    verbose: bool,
    keys: Vec<u8>,
    config: CoreConfig,
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

fn option_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String, String> {
    args.next()
        .map(|value| value.to_string_lossy().into_owned())
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn parse_number(value: &str, flag: &str) -> Result<u64, String> {
    value
        .parse::<u64>()
        .map_err(|_| format!("invalid value for {flag}: {value}"))
}

fn parse_key(value: &str) -> Result<u8, String> {
    u8::from_str_radix(value.trim_start_matches("0x"), 16)
        .ok()
        .filter(|key| *key <= 0xF)
        .ok_or_else(|| format!("invalid key: {value} (expected 0-f)"))
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut rom: Option<PathBuf> = None;
    let mut steps = DEFAULT_STEPS;
    let mut rate = None;
    let mut trace = false;
    let mut verbose = false;
    let mut keys = Vec::new();
    let mut config = CoreConfig::default();

    while let Some(arg) = args.next() {
        let flag = arg.to_string_lossy().into_owned();
        match flag.as_str() {
            "--help" | "-h" => return Ok(ParseResult::Help),
            "--trace" => trace = true,
            "--verbose" | "-v" => verbose = true,
            "--shift-vy" => config.shift_source = ShiftSource::Vy,
            "--realtime" => {
                if rate.is_none() {
                    rate = Some(DEFAULT_INSTRUCTIONS_PER_SECOND);
                }
                config.timer_mode = TimerMode::External;
            }
            "--steps" => {
                let value = option_value(&mut args, &flag)?;
                steps = u32::try_from(parse_number(&value, &flag)?)
                    .map_err(|_| format!("invalid value for {flag}: {value}"))?;
            }
            "--rate" => {
                let value = option_value(&mut args, &flag)?;
                let hz = u32::try_from(parse_number(&value, &flag)?)
                    .ok()
                    .filter(|hz| *hz > 0)
                    .ok_or_else(|| format!("invalid value for {flag}: {value}"))?;
                rate = Some(hz);
                config.timer_mode = TimerMode::External;
            }
            "--seed" => {
                let value = option_value(&mut args, &flag)?;
                config.rng_seed = Some(parse_number(&value, &flag)?);
            }
            "--sound" => {
                config.sound_timer = match option_value(&mut args, &flag)?.as_str() {
                    "decrement" => SoundTimerPolicy::Decrement,
                    "zero" => SoundTimerPolicy::ForceZero,
                    other => return Err(format!("invalid value for --sound: {other}")),
                };
            }
            "--random-mask" => {
                config.random_mask = match option_value(&mut args, &flag)?.as_str() {
                    "immediate" => RandomMaskPolicy::Immediate,
                    "fixed" => RandomMaskPolicy::Fixed(LEGACY_RANDOM_MASK),
                    other => return Err(format!("invalid value for --random-mask: {other}")),
                };
            }
            "--key" => {
                let value = option_value(&mut args, &flag)?;
                keys.push(parse_key(&value)?);
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}"));
            }
            _ => {
                if rom.is_some() {
                    return Err("multiple rom paths provided".to_string());
                }
                rom = Some(PathBuf::from(arg));
            }
        }
    }

    let rom = rom.ok_or_else(|| "missing rom path".to_string())?;
    config.tracing_enabled = trace;
    Ok(ParseResult::Run(RunArgs {
        rom,
        steps,
        rate,
        trace,
        verbose,
        keys,
        config,
    }))
}

/// Prints one line per fetched instruction.
struct StdoutTrace;

impl TraceSink for StdoutTrace {
    fn on_event(&mut self, event: TraceEvent) {
        if let TraceEvent::InstructionStart {
            pc,
            word,
            sp,
            registers,
            ..
        } = event
        {
            println!("{}", format_trace_line(pc, word, sp, &registers));
        }
    }
}

fn format_trace_line(pc: u16, word: u16, sp: u8, registers: &[u8]) -> String {
    let values: String = registers
        .iter()
        .enumerate()
        .map(|(index, value)| format!(" v[{index}]:{value:02X}"))
        .collect();
    format!("pc: {pc:04X} opcode: {word:04X} sp: {sp:02X}{values}")
}

fn render_display(display: &FrameBuffer) -> String {
    let mut out = String::with_capacity((DISPLAY_WIDTH + 1) * DISPLAY_HEIGHT);
    for y in 0..DISPLAY_HEIGHT {
        for x in 0..DISPLAY_WIDTH {
            out.push(if display.cell(x, y) == 0 { '.' } else { '#' });
        }
        out.push('\n');
    }
    out
}

fn run(args: &RunArgs) -> Result<(), i32> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = logger::init(level) {
        eprintln!("error: failed to install logger: {e}");
        return Err(1);
    }

    let mut interp = Interpreter::new(args.config);
    if args.trace {
        interp.set_trace_sink(Box::new(StdoutTrace));
    }

    match interp.load_rom_file(&args.rom) {
        Ok(len) => info!("loaded {} ({len} bytes)", args.rom.display()),
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    }
    for key in &args.keys {
        interp.set_key(*key, true);
    }

    let tick_every = args.rate.map(steps_per_timer_tick);
    let interval = args
        .rate
        .map(|hz| Duration::from_nanos(step_interval_nanos(hz)));

    let mut executed = 0u32;
    while executed < args.steps {
        executed += 1;
        interp.step();
        if let Some(every) = tick_every {
            if executed % every == 0 {
                interp.tick_timers();
            }
        }
        if let Some(interval) = interval {
            thread::sleep(interval);
        }
    }

    print!("{}", render_display(interp.display()));
    let diag = interp.diag();
    let waiting = interp
        .run_state()
        .awaiting_register()
        .map(|reg| format!(" (waiting for key into {reg:?})"))
        .unwrap_or_default();
    println!(
        "steps: {executed} retired: {} faults: {} pc: {:04X}{waiting}",
        diag.instruction_count,
        diag.total_faults(),
        interp.state().pc(),
    );
    Ok(())
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
