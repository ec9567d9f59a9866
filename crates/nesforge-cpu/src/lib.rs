//! Cycle-accurate MOS 6502 CPU emulator for NES.
//!
//! This crate provides a cycle-accurate emulation of the MOS 6502 CPU
//! as used in the Nintendo Entertainment System (NES). It supports:
//!
//! - All 256 opcodes (official and unofficial)
//! - Cycle-accurate timing with per-cycle state machine execution
//! - Proper interrupt handling (NMI, IRQ, BRK) with correct timing
//! - DMA support for OAM and DMC transfers
//! - Page boundary crossing penalty cycles
//!
//! # Architecture
//!
//! The CPU uses a trait-based abstraction for memory access via the [`Bus`] trait,
//! allowing it to be integrated with any memory subsystem.
//!
//! # Example
//!
//! ```no_run
//! use nesforge_cpu::{Cpu, Bus};
//!
//! struct SimpleBus {
//!     memory: [u8; 65536],
//! }
//!
//! impl Bus for SimpleBus {
//!     fn read(&mut self, addr: u16) -> u8 {
//!         self.memory[addr as usize]
//!     }
//!
//!     fn write(&mut self, addr: u16, value: u8) {
//!         self.memory[addr as usize] = value;
//!     }
//! }
//!
//! let mut bus = SimpleBus { memory: [0; 65536] };
//! let mut cpu = Cpu::new();
//! cpu.reset(&mut bus);
//! cpu.step(&mut bus);
//! ```

#![warn(missing_docs)]

mod addressing;
mod bus;
mod cpu;
mod instructions;
mod status;

pub use addressing::AddrMode;
pub use cpu::{Bus, Cpu, CpuState, Interrupt};
pub use status::Status;

/// CPU error types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CpuError {
    /// Invalid opcode encountered.
    #[error("Invalid opcode: 0x{0:02X} at address 0x{1:04X}")]
    InvalidOpcode(u8, u16),
}

/// Result type for CPU operations.
pub type Result<T> = std::result::Result<T, CpuError>;

/// Interrupt vector addresses.
pub mod vectors {
    /// NMI (Non-Maskable Interrupt) vector address.
    pub const NMI: u16 = 0xFFFA;
    /// Reset vector address.
    pub const RESET: u16 = 0xFFFC;
    /// IRQ/BRK vector address.
    pub const IRQ: u16 = 0xFFFE;
}
