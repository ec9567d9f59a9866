//! NES cartridge loading and mapper 0 (NROM) emulation.
//!
//! # Overview
//!
//! This crate parses iNES/NES 2.0 ROM files and provides the memory-banking
//! logic cartridges expose to the CPU and PPU buses. Only mapper 0 (NROM) is
//! implemented; [`Cartridge::load`] rejects ROMs declaring any other mapper.
//!
//! # Example
//!
//! ```no_run
//! use nesforge_mappers::Cartridge;
//!
//! let rom_data = std::fs::read("game.nes").expect("Failed to read ROM");
//! let cart = Cartridge::load(&rom_data).expect("Unsupported ROM");
//!
//! let opcode = cart.read_prg(0x8000);
//! let tile = cart.read_chr(0x0000);
//! ```

#![warn(missing_docs)]

mod cartridge;
mod mapper;
mod nrom;
mod rom;

pub use cartridge::Cartridge;
pub use mapper::{Mapper, Mirroring};
pub use nrom::Nrom;
pub use rom::{Rom, RomError, RomHeader};
