//! NES console integration: ties the CPU, PPU, and cartridge together with
//! the timing a host application needs to drive.

use crate::bus::NesBus;
use nesforge_cpu::Cpu;
use nesforge_mappers::{Cartridge, RomError};

/// NES emulation timing constants.
pub mod timing {
    /// Master clock frequency (NTSC).
    pub const MASTER_CLOCK_NTSC: u32 = 21_477_272;
    /// CPU clock frequency (NTSC).
    pub const CPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 12;
    /// PPU clock frequency (NTSC).
    pub const PPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 4;
    /// CPU cycles per frame (NTSC), approximate (actual frame length varies
    /// with odd-frame skip).
    pub const CPU_CYCLES_PER_FRAME: u32 = 29_780;
    /// PPU dots per scanline.
    pub const PPU_DOTS_PER_SCANLINE: u16 = 341;
    /// Total scanlines (including vblank).
    pub const PPU_SCANLINES: u16 = 262;
    /// Target frame rate (NTSC).
    pub const FRAME_RATE_NTSC: f64 = 60.0988;
}

/// Console error type.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// ROM loading error.
    #[error("ROM error: {0}")]
    Rom(#[from] RomError),
}

/// NES console emulator: a CPU, a system bus, and a framebuffer.
///
/// `step()` runs one CPU instruction and its matching PPU dots; it does not
/// service NMI on its own. A host polls [`Console::nmi_pending`] and calls
/// [`Console::cpu_nmi`] to latch it onto the CPU for the next `step()` call,
/// and polls [`Console::frame_ready`]/[`Console::take_frame`] for display
/// output. [`Console::step_frame`] wraps this loop for callers that just
/// want to run to the next frame.
pub struct Console {
    cpu: Cpu,
    bus: NesBus,
    /// Frame buffer, one packed `0x00RRGGBB` pixel per dot, 256x240.
    framebuffer: Vec<u32>,
    total_cycles: u64,
    frame_count: u64,
}

impl Console {
    /// Load a ROM and build a console around it.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] if the ROM is malformed or uses an
    /// unsupported mapper.
    pub fn from_rom_bytes(rom_data: &[u8]) -> Result<Self, ConsoleError> {
        let cartridge = Cartridge::load(rom_data)?;
        Ok(Self::new(cartridge))
    }

    /// Build a console around an already-loaded cartridge.
    #[must_use]
    pub fn new(cartridge: Cartridge) -> Self {
        let mut console = Self {
            cpu: Cpu::new(),
            bus: NesBus::new(cartridge),
            framebuffer: vec![0; crate::screen::PIXELS as usize],
            total_cycles: 0,
            frame_count: 0,
        };
        console.power_on();
        console
    }

    /// Reset the console as if the reset line were pulsed (RAM retained).
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
    }

    /// Power on the console (cold boot: RAM and PPU state cleared).
    pub fn power_on(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        self.total_cycles = 0;
        self.frame_count = 0;
    }

    /// Run one CPU instruction and its matching PPU dots. Returns the
    /// number of CPU cycles spent. OAM DMA, if pending, runs first and is
    /// charged as its own step.
    pub fn step(&mut self) -> u32 {
        if self.bus.oam_dma_pending() {
            let dma_cycles = self.bus.execute_oam_dma();
            log::debug!("OAM DMA: {dma_cycles} cycles");
            self.step_ppu_for_cpu_cycles(dma_cycles);
            self.total_cycles += u64::from(dma_cycles);
            return u32::from(dma_cycles);
        }

        let cycles = self.cpu.step(&mut self.bus);
        self.bus.add_cpu_cycles(cycles);
        self.step_ppu_for_cpu_cycles(u16::from(cycles));
        self.total_cycles += u64::from(cycles);

        u32::from(cycles)
    }

    fn step_ppu_for_cpu_cycles(&mut self, cpu_cycles: u16) {
        self.bus.step_ppu(u32::from(cpu_cycles) * 3);
        if self.bus.frame_ready() {
            self.update_framebuffer();
            self.frame_count += 1;
            log::trace!("frame {} complete", self.frame_count);
        }
    }

    /// Whether the PPU has raised NMI since the last [`Console::cpu_nmi`].
    #[must_use]
    pub fn nmi_pending(&self) -> bool {
        self.bus.nmi_pending()
    }

    /// Latch the pending NMI onto the CPU; it is serviced on the next
    /// [`Console::step`] call.
    pub fn cpu_nmi(&mut self) {
        self.bus.acknowledge_nmi();
        self.cpu.nmi();
    }

    /// Whether the PPU has completed a frame since the last
    /// [`Console::take_frame`].
    #[must_use]
    pub fn frame_ready(&self) -> bool {
        self.bus.frame_ready()
    }

    /// Take the rendered frame (clearing the ready flag). One packed
    /// `0x00RRGGBB` pixel per dot, 256x240, row-major.
    pub fn take_frame(&mut self) -> &[u32] {
        self.bus.acknowledge_frame();
        &self.framebuffer
    }

    /// Run emulation until a frame completes, servicing NMI automatically.
    /// Returns the CPU cycles spent.
    pub fn step_frame(&mut self) -> u64 {
        let target_frame = self.frame_count + 1;
        let start_cycles = self.total_cycles;
        while self.frame_count < target_frame {
            if self.nmi_pending() {
                self.cpu_nmi();
            }
            self.step();
        }
        self.total_cycles - start_cycles
    }

    fn update_framebuffer(&mut self) {
        let ppu_buffer = self.bus.ppu.frame_buffer();
        for (i, &palette_idx) in ppu_buffer.iter().enumerate() {
            let (r, g, b) = crate::palette::NES_PALETTE[(palette_idx & 0x3F) as usize];
            self.framebuffer[i] = (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
        }
    }

    /// Total CPU cycles executed since power-on.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Number of frames completed since power-on.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Reference to the CPU, for debugging/tracing.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Reference to the PPU, for debugging/tracing.
    #[must_use]
    pub fn ppu(&self) -> &nesforge_ppu::Ppu {
        &self.bus.ppu
    }

    /// Read memory without side effects, for debugging/disassembly.
    #[must_use]
    pub fn peek_memory(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    /// Reference to the system bus.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable reference to the system bus.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }
}
