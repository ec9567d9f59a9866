//! `nestest.nes` golden log validation test.
//!
//! Runs the CPU through nestest's automation mode (entered directly at
//! `$C000`, bypassing the ROM's own reset vector) and checks the
//! architectural register state after every instruction against the
//! widely published reference log.

use nesforge_cpu::{Bus, Cpu};
use std::path::PathBuf;

/// Minimal bus wrapping a raw NROM image, enough to run nestest's CPU-only
/// automation mode (no PPU/APU interaction needed for the traced portion).
struct NestestBus {
    ram: [u8; 0x0800],
    prg_rom: Vec<u8>,
}

impl NestestBus {
    fn new(prg_rom: Vec<u8>) -> Self {
        Self {
            ram: [0; 0x0800],
            prg_rom,
        }
    }
}

impl Bus for NestestBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x8000..=0xFFFF => {
                let rom_addr = (addr - 0x8000) as usize;
                if self.prg_rom.len() == 16384 {
                    self.prg_rom[rom_addr % 16384]
                } else {
                    self.prg_rom[rom_addr]
                }
            }
            _ => 0,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let 0x0000..=0x1FFF = addr {
            self.ram[(addr & 0x07FF) as usize] = value;
        }
    }
}

/// Register state parsed from one line of the golden log.
#[derive(Debug, PartialEq)]
struct GoldenState {
    pc: u16,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    sp: u8,
    cyc: u64,
}

fn parse_golden_line(line: &str) -> GoldenState {
    let pc = u16::from_str_radix(&line[0..4], 16).expect("PC field");

    let field = |tag: &str| -> &str {
        let start = line.find(tag).unwrap_or_else(|| panic!("missing {tag} in: {line}")) + tag.len();
        let rest = &line[start..];
        rest.split_whitespace().next().unwrap()
    };

    GoldenState {
        pc,
        a: u8::from_str_radix(field("A:"), 16).unwrap(),
        x: u8::from_str_radix(field("X:"), 16).unwrap(),
        y: u8::from_str_radix(field("Y:"), 16).unwrap(),
        p: u8::from_str_radix(field("P:"), 16).unwrap(),
        sp: u8::from_str_radix(field("SP:"), 16).unwrap(),
        cyc: field("CYC:").parse().unwrap(),
    }
}

fn cpu_state(cpu: &Cpu) -> GoldenState {
    let state = cpu.state();
    GoldenState {
        pc: state.pc,
        a: state.a,
        x: state.x,
        y: state.y,
        p: state.status.bits(),
        sp: state.sp,
        cyc: state.cycles,
    }
}

#[test]
fn nestest_golden_log_validation() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");
    let rom_path = root.join("test-roms/cpu/nestest.nes");
    let log_path = root.join("test-roms/cpu/nestest.log");

    if !rom_path.exists() || !log_path.exists() {
        eprintln!("Skipping nestest validation: test-roms/cpu/{{nestest.nes,nestest.log}} not found");
        eprintln!("Download both from https://github.com/christopherpow/nes-test-roms");
        return;
    }

    let rom_data = std::fs::read(&rom_path).expect("failed to read nestest.nes");
    assert_eq!(&rom_data[0..4], b"NES\x1a", "not a valid iNES file");

    let prg_size = usize::from(rom_data[4]) * 16384;
    let prg_rom = rom_data[16..16 + prg_size].to_vec();
    assert_eq!(rom_data[6] >> 4, 0, "nestest.nes should use mapper 0");

    let golden_log = std::fs::read_to_string(&log_path).expect("failed to read nestest.log");
    let golden: Vec<GoldenState> = golden_log.lines().map(parse_golden_line).collect();

    let mut bus = NestestBus::new(prg_rom);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    cpu.set_pc(0xC000);

    for (line_num, expected) in golden.iter().enumerate() {
        let actual = cpu_state(&cpu);
        assert_eq!(
            actual,
            *expected,
            "register mismatch at golden log line {} (1-indexed)",
            line_num + 1
        );
        cpu.step(&mut bus);

        if cpu.pc() == 0xC66E {
            break;
        }
    }
}
