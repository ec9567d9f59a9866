//! NesForge Core - NES Emulation Integration Layer.
//!
//! This crate ties the CPU, PPU, and cartridge/mapper crates into a
//! complete console emulator with the timing a host application needs to
//! drive frame-by-frame.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                     Console                      │
//! │  ┌─────────────────────────────────────────┐    │
//! │  │                  NesBus                  │    │
//! │  │  ┌─────┐   ┌─────┐   ┌───────────────┐   │    │
//! │  │  │ RAM │   │ PPU │   │   Cartridge   │   │    │
//! │  │  │ 2KB │   │     │   │ (PRG/CHR/NROM)│   │    │
//! │  │  └─────┘   └─────┘   └───────────────┘   │    │
//! │  └─────────────────────────────────────────┘    │
//! │                       ▲                          │
//! │                       │                          │
//! │                  ┌────┴────┐                     │
//! │                  │   CPU   │                     │
//! │                  │  6502   │                     │
//! │                  └─────────┘                     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use nesforge_core::Console;
//!
//! let rom_data = std::fs::read("game.nes").expect("Failed to read ROM");
//! let mut console = Console::from_rom_bytes(&rom_data).expect("Failed to create console");
//!
//! loop {
//!     console.step_frame();
//!     let _frame = console.take_frame();
//! }
//! ```

#![warn(missing_docs)]

mod bus;
mod console;
pub mod palette;

pub use bus::NesBus;
pub use console::{Console, ConsoleError, timing};

pub use nesforge_cpu::Cpu;
pub use nesforge_mappers::{Cartridge, Mapper, Mirroring, Rom, RomError, RomHeader};
pub use nesforge_ppu::Ppu;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// NES screen dimensions.
pub mod screen {
    /// Screen width in pixels.
    pub const WIDTH: u32 = 256;
    /// Screen height in pixels.
    pub const HEIGHT: u32 = 240;
    /// Total pixels per frame.
    pub const PIXELS: u32 = WIDTH * HEIGHT;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_constants() {
        assert_eq!(screen::WIDTH, 256);
        assert_eq!(screen::HEIGHT, 240);
        assert_eq!(screen::PIXELS, 61440);
    }

    #[test]
    fn test_timing_constants() {
        assert_eq!(timing::MASTER_CLOCK_NTSC, 21_477_272);
        assert_eq!(timing::CPU_CLOCK_NTSC, 1_789_772);
        assert_eq!(timing::PPU_CLOCK_NTSC, 5_369_318);
        assert_eq!(timing::CPU_CYCLES_PER_FRAME, 29_780);
    }

    #[test]
    fn test_palette_module() {
        assert_eq!(palette::NES_PALETTE.len(), 64);
        assert_eq!(palette::palette_to_rgba(0x0D), [0, 0, 0, 255]);
    }

    #[test]
    fn test_console_from_rom_bytes() {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A];
        data.push(2);
        data.push(1);
        data.extend_from_slice(&[0; 10]);
        data.extend_from_slice(&[0xEA; 32768]);
        data.extend_from_slice(&[0; 8192]);

        let console = Console::from_rom_bytes(&data).unwrap();
        assert_eq!(console.total_cycles(), 0);
    }
}
