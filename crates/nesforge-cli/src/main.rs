//! NesForge headless host driver.
//!
//! Loads a ROM, runs the console for a fixed number of frames (or until a
//! frame-count budget is reached), and dumps the final frame buffer as a
//! PPM image for inspection. No windowing, audio, or input — see
//! `nesforge-core` for the emulation core this wraps.

#![warn(missing_docs)]

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use nesforge_core::{Console, ConsoleError};

/// Run an NES ROM headlessly and dump the final frame as a PPM image.
#[derive(Parser, Debug)]
#[command(name = "nesforge", version, about)]
struct Args {
    /// Path to an iNES (.nes) ROM file.
    rom: PathBuf,

    /// Number of frames to run before dumping output.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Run until this absolute frame count is reached instead of
    /// `--frames` (overrides `--frames` when given).
    #[arg(long)]
    until_frame: Option<u64>,

    /// Where to write the final frame as a PPM image.
    #[arg(long, default_value = "frame.ppm")]
    output: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Rom(#[from] ConsoleError),
    #[error("failed to read ROM file: {0}")]
    ReadRom(io::Error),
    #[error("failed to write output image: {0}")]
    WriteImage(io::Error),
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let rom_data = fs::read(&args.rom).map_err(CliError::ReadRom)?;
    let mut console = Console::from_rom_bytes(&rom_data)?;
    log::info!("loaded {}", args.rom.display());

    let target_frame = args.until_frame.unwrap_or(args.frames);
    while console.frame_count() < target_frame {
        if console.nmi_pending() {
            console.cpu_nmi();
        }
        console.step();
    }
    log::info!(
        "ran {} frames ({} CPU cycles)",
        console.frame_count(),
        console.total_cycles()
    );

    let frame = console.take_frame();
    write_ppm(&args.output, frame).map_err(CliError::WriteImage)?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}

/// Write a packed `0x00RRGGBB` frame buffer out as a binary (P6) PPM image.
fn write_ppm(path: &PathBuf, frame: &[u32]) -> io::Result<()> {
    let width = nesforge_core::screen::WIDTH;
    let height = nesforge_core::screen::HEIGHT;
    debug_assert_eq!(frame.len(), (width * height) as usize);

    let mut file = fs::File::create(path)?;
    write!(file, "P6\n{width} {height}\n255\n")?;

    let mut pixels = Vec::with_capacity(frame.len() * 3);
    for &pixel in frame {
        pixels.push(((pixel >> 16) & 0xFF) as u8);
        pixels.push(((pixel >> 8) & 0xFF) as u8);
        pixels.push((pixel & 0xFF) as u8);
    }
    file.write_all(&pixels)
}
