//! The MOS 6502 processor core.
//!
//! [`Cpu`] holds all architectural state (registers, flags, cycle count)
//! and drives execution one instruction at a time via [`Cpu::step`].
//! Memory access is delegated to a [`Bus`] implementation supplied by the
//! host system, so this crate has no knowledge of the NES memory map.

pub use crate::bus::Bus;
use crate::addressing::{AddrMode, ADDR_MODE_TABLE};
use crate::instructions::OPCODE_TABLE;
use crate::status::Status;
use crate::vectors;

/// Which interrupt line most recently drove the CPU into its interrupt
/// sequence. Exposed for host-side tracing and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Reset line.
    Reset,
    /// Non-maskable interrupt.
    Nmi,
    /// Maskable interrupt request (also entered via BRK).
    Irq,
}

/// A snapshot of the CPU's architectural registers, useful for debuggers,
/// trace logging, and test assertions without borrowing the live [`Cpu`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer.
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub status: Status,
    /// Total elapsed CPU cycles since power-on.
    pub cycles: u64,
}

/// Cycle-accurate MOS 6502 processor core.
///
/// The CPU decodes and executes one full instruction per [`Cpu::step`]
/// call, charging the exact number of cycles the real hardware would take
/// (including addressing-mode page-cross penalties and branch timing).
/// Interrupts ([`Cpu::nmi`], [`Cpu::irq`]) are latched and serviced at
/// instruction boundaries, matching real 6502 behavior.
#[derive(Debug, Clone)]
pub struct Cpu {
    /// Accumulator.
    pub(crate) a: u8,
    /// X index register.
    pub(crate) x: u8,
    /// Y index register.
    pub(crate) y: u8,
    /// Stack pointer (offset into page 1, $0100-$01FF).
    pub(crate) sp: u8,
    /// Program counter.
    pub(crate) pc: u16,
    /// Processor status flags.
    pub(crate) status: Status,

    /// Effective address resolved by the current instruction's addressing
    /// mode. Valid for every mode except `Imp`/`Acc`.
    pub(crate) operand_addr: u16,
    /// Raw operand byte fetched for the current instruction; used by `Rel`
    /// addressing as a signed branch offset.
    pub(crate) operand_value: u8,

    /// Total elapsed cycles since power-on.
    cycles: u64,

    /// Set by [`Cpu::nmi`]; consumed at the next instruction boundary.
    pub(crate) nmi_pending: bool,
    /// Mirrors `nmi_pending` for the duration of a single `BRK` dispatch so
    /// BRK can detect and react to an NMI hijack that happened during its
    /// own sequencing.
    pub(crate) nmi_triggered: bool,

    /// Set while the IRQ line is asserted and unmasked.
    pub(crate) run_irq: bool,
    /// Value of `run_irq` as of the start of the current instruction, used
    /// by the branch instructions to implement the one-instruction IRQ
    /// response delay that follows a taken branch.
    pub(crate) prev_run_irq: bool,

    last_interrupt: Interrupt,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Creates a new CPU in its power-on state.
    ///
    /// The program counter is left at zero; call [`Cpu::reset`] before
    /// stepping to load it from the reset vector as real hardware does.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: Status::POWER_ON,
            operand_addr: 0,
            operand_value: 0,
            cycles: 0,
            nmi_pending: false,
            nmi_triggered: false,
            run_irq: false,
            prev_run_irq: false,
            last_interrupt: Interrupt::Reset,
        }
    }

    /// Performs a CPU reset: reloads `PC` from the reset vector, sets `SP`
    /// to `0xFD`, sets the `I` flag, and charges the 7-cycle reset
    /// sequence. Pending interrupts are cleared.
    pub fn reset(&mut self, bus: &mut dyn Bus) {
        self.sp = 0xFD;
        self.status = Status::POWER_ON;
        self.nmi_pending = false;
        self.nmi_triggered = false;
        self.run_irq = false;
        self.prev_run_irq = false;
        self.last_interrupt = Interrupt::Reset;

        for _ in 0..5 {
            self.tick(bus);
        }

        let lo = self.read_byte(bus, vectors::RESET);
        let hi = self.read_byte(bus, vectors::RESET + 1);
        self.pc = u16::from_le_bytes([lo, hi]);
    }

    /// Asserts the non-maskable interrupt line. NMI is always serviced,
    /// regardless of the `I` flag, at the next instruction boundary.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
        self.nmi_triggered = true;
    }

    /// Asserts (or de-asserts) the maskable interrupt line. Unlike NMI,
    /// IRQ is level-triggered and ignored while the `I` flag is set.
    pub fn irq(&mut self, asserted: bool) {
        self.run_irq = asserted;
    }

    /// Executes exactly one instruction, or services a pending interrupt,
    /// and returns the number of cycles it consumed.
    pub fn step(&mut self, bus: &mut dyn Bus) -> u8 {
        self.prev_run_irq = self.run_irq;
        let cycles_before = self.cycles;

        if self.nmi_pending {
            self.service_interrupt(bus, Interrupt::Nmi);
            return (self.cycles - cycles_before) as u8;
        }
        if self.run_irq && !self.status.contains(Status::I) {
            self.service_interrupt(bus, Interrupt::Irq);
            return (self.cycles - cycles_before) as u8;
        }

        let opcode = self.fetch_opcode(bus);
        let mode = ADDR_MODE_TABLE[opcode as usize];
        self.resolve_operand(bus, mode);

        let handler = OPCODE_TABLE[opcode as usize];
        handler(self, bus);

        (self.cycles - cycles_before) as u8
    }

    /// Total elapsed cycles since power-on.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Accumulator.
    #[must_use]
    pub fn a(&self) -> u8 {
        self.a
    }

    /// X index register.
    #[must_use]
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Y index register.
    #[must_use]
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Stack pointer.
    #[must_use]
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Program counter.
    #[must_use]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Forces the program counter, bypassing the reset vector. Used by test
    /// harnesses that enter a ROM's test-mode entry point directly (e.g.
    /// `nestest.nes`'s automation mode at `$C000`).
    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    /// Processor status flags.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Which interrupt line the CPU most recently serviced (or `Reset`, if
    /// none has been serviced since the last reset).
    #[must_use]
    pub fn last_interrupt(&self) -> Interrupt {
        self.last_interrupt
    }

    /// Captures the current architectural registers as a standalone value.
    #[must_use]
    pub fn state(&self) -> CpuState {
        CpuState {
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            pc: self.pc,
            status: self.status,
            cycles: self.cycles,
        }
    }

    /// Sets the Zero and Negative flags from `value`.
    pub(crate) fn set_zn(&mut self, value: u8) {
        self.status.set_zn(value);
    }

    /// The effective address resolved for the current instruction.
    pub(crate) fn operand_addr(&self) -> u16 {
        self.operand_addr
    }

    /// Consumes one CPU cycle without touching the bus. Used for internal
    /// and dummy-read cycles that real hardware spends but whose bus
    /// activity has no externally visible effect worth modeling precisely.
    pub(crate) fn tick(&mut self, _bus: &mut dyn Bus) {
        self.cycles = self.cycles.wrapping_add(1);
    }

    pub(crate) fn read_byte(&mut self, bus: &mut dyn Bus, addr: u16) -> u8 {
        let value = bus.read(addr);
        self.cycles = self.cycles.wrapping_add(1);
        value
    }

    pub(crate) fn write_byte(&mut self, bus: &mut dyn Bus, addr: u16, value: u8) {
        bus.write(addr, value);
        self.cycles = self.cycles.wrapping_add(1);
    }

    pub(crate) fn push_byte(&mut self, bus: &mut dyn Bus, value: u8) {
        let addr = 0x0100 | u16::from(self.sp);
        self.write_byte(bus, addr, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn push_word(&mut self, bus: &mut dyn Bus, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push_byte(bus, hi);
        self.push_byte(bus, lo);
    }

    pub(crate) fn pop_byte(&mut self, bus: &mut dyn Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        let addr = 0x0100 | u16::from(self.sp);
        self.read_byte(bus, addr)
    }

    pub(crate) fn pop_word(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = self.pop_byte(bus);
        let hi = self.pop_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn fetch_opcode(&mut self, bus: &mut dyn Bus) -> u8 {
        let opcode = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.cycles = self.cycles.wrapping_add(1);
        opcode
    }

    fn fetch_operand_byte(&mut self, bus: &mut dyn Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.cycles = self.cycles.wrapping_add(1);
        value
    }

    /// Resolves `operand_addr`/`operand_value` for `mode`, fetching operand
    /// bytes from the instruction stream and charging addressing-mode
    /// cycles (including page-cross penalties) exactly as real hardware
    /// does.
    fn resolve_operand(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        match mode {
            AddrMode::Imp | AddrMode::Acc => {
                // Real hardware spends a cycle reading (and discarding) the
                // byte following the opcode even when it carries no operand.
                self.tick(bus);
            }
            AddrMode::Imm => {
                // The operand byte itself is the value; instruction bodies
                // read it through `operand_addr` via `Cpu::read_byte`, so
                // the single immediate-mode cycle is charged there rather
                // than here.
                self.operand_addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
            }
            AddrMode::Zp0 => {
                let addr = self.fetch_operand_byte(bus);
                self.operand_addr = u16::from(addr);
            }
            AddrMode::Zpx => {
                let addr = self.fetch_operand_byte(bus);
                self.tick(bus);
                self.operand_addr = u16::from(addr.wrapping_add(self.x));
            }
            AddrMode::Zpy => {
                let addr = self.fetch_operand_byte(bus);
                self.tick(bus);
                self.operand_addr = u16::from(addr.wrapping_add(self.y));
            }
            AddrMode::Rel => {
                self.operand_value = self.fetch_operand_byte(bus);
            }
            AddrMode::Abs => {
                let lo = self.fetch_operand_byte(bus);
                let hi = self.fetch_operand_byte(bus);
                self.operand_addr = u16::from_le_bytes([lo, hi]);
            }
            AddrMode::Abx | AddrMode::Aby => {
                let (base, index) = self.fetch_indexed_abs(bus, mode);
                let addr = base.wrapping_add(u16::from(index));
                if (base & 0xFF00) != (addr & 0xFF00) {
                    self.tick(bus);
                }
                self.operand_addr = addr;
            }
            AddrMode::AbxW | AddrMode::AbyW => {
                let unindexed = if mode == AddrMode::AbxW {
                    AddrMode::Abx
                } else {
                    AddrMode::Aby
                };
                let (base, index) = self.fetch_indexed_abs(bus, unindexed);
                self.tick(bus);
                self.operand_addr = base.wrapping_add(u16::from(index));
            }
            AddrMode::Ind => {
                let lo = self.fetch_operand_byte(bus);
                let hi = self.fetch_operand_byte(bus);
                let ptr = u16::from_le_bytes([lo, hi]);
                self.operand_addr = self.read_indirect_wrap(bus, ptr);
            }
            AddrMode::Idx => {
                let zp = self.fetch_operand_byte(bus);
                self.tick(bus);
                let ptr = zp.wrapping_add(self.x);
                let lo = self.read_byte(bus, u16::from(ptr));
                let hi = self.read_byte(bus, u16::from(ptr.wrapping_add(1)));
                self.operand_addr = u16::from_le_bytes([lo, hi]);
            }
            AddrMode::Idy => {
                let (addr, base) = self.fetch_indirect_indexed(bus);
                if (base & 0xFF00) != (addr & 0xFF00) {
                    self.tick(bus);
                }
                self.operand_addr = addr;
            }
            AddrMode::IdyW => {
                let (addr, _base) = self.fetch_indirect_indexed(bus);
                self.tick(bus);
                self.operand_addr = addr;
            }
        }
    }

    fn fetch_indexed_abs(&mut self, bus: &mut dyn Bus, mode: AddrMode) -> (u16, u8) {
        let lo = self.fetch_operand_byte(bus);
        let hi = self.fetch_operand_byte(bus);
        let base = u16::from_le_bytes([lo, hi]);
        let index = if mode == AddrMode::Abx { self.x } else { self.y };
        (base, index)
    }

    fn fetch_indirect_indexed(&mut self, bus: &mut dyn Bus) -> (u16, u16) {
        let zp = self.fetch_operand_byte(bus);
        let lo = self.read_byte(bus, u16::from(zp));
        let hi = self.read_byte(bus, u16::from(zp.wrapping_add(1)));
        let base = u16::from_le_bytes([lo, hi]);
        let addr = base.wrapping_add(u16::from(self.y));
        (addr, base)
    }

    /// Reads a little-endian word from `addr`, reproducing the `JMP
    /// ($xxFF)` hardware bug where the high byte is fetched from the start
    /// of the same page instead of wrapping into the next one.
    fn read_indirect_wrap(&mut self, bus: &mut dyn Bus, addr: u16) -> u16 {
        let lo = self.read_byte(bus, addr);
        let hi_addr = if addr & 0x00FF == 0x00FF {
            addr & 0xFF00
        } else {
            addr.wrapping_add(1)
        };
        let hi = self.read_byte(bus, hi_addr);
        u16::from_le_bytes([lo, hi])
    }

    fn service_interrupt(&mut self, bus: &mut dyn Bus, kind: Interrupt) {
        self.tick(bus);
        self.tick(bus);

        self.push_word(bus, self.pc);
        let status_byte = self.status.to_stack_byte(false);
        self.push_byte(bus, status_byte);
        self.status.set_flag(Status::I, true);

        let vector = match kind {
            Interrupt::Nmi => vectors::NMI,
            Interrupt::Irq => vectors::IRQ,
            Interrupt::Reset => vectors::RESET,
        };
        let lo = self.read_byte(bus, vector);
        let hi = self.read_byte(bus, vector + 1);
        self.pc = u16::from_le_bytes([lo, hi]);

        if kind == Interrupt::Nmi {
            self.nmi_pending = false;
            self.nmi_triggered = false;
        }
        self.last_interrupt = kind;
    }
}
