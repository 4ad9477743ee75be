use famicore::cpu::state::{NMI_VECTOR, RESET_VECTOR};
use famicore::loader::set_vector;
use famicore::{Console, ConsoleConfig, CoreError};

/// Demo program: fill the first nametable row through the data port, enable
/// vblank NMI, then count frames in $00 from the NMI handler.
fn demo_program() -> Vec<u8> {
    let mut prg = vec![0xEA; 0x40];
    let main: &[u8] = &[
        0xA9, 0x20, // LDA #$20
        0x8D, 0x06, 0x20, // STA $2006
        0xA9, 0x00, // LDA #$00
        0x8D, 0x06, 0x20, // STA $2006
        0xA2, 0x20, // LDX #$20
        0xA9, 0x01, // LDA #$01        (tile 1)
        0x8D, 0x07, 0x20, // STA $2007
        0xCA, // DEX
        0xD0, 0xFA, // BNE -6
        0xA9, 0x80, // LDA #$80
        0x8D, 0x00, 0x20, // STA $2000    (NMI on)
        0x4C, 0x19, 0x80, // JMP $8019    (spin)
    ];
    prg[..main.len()].copy_from_slice(main);
    // NMI handler at $8030: INC $00; RTI
    prg[0x30..0x33].copy_from_slice(&[0xE6, 0x00, 0x40]);
    prg
}

/// Tile 1 is solid colour 1; palette entry 1 is a bright green.
fn demo_patterns() -> Vec<u8> {
    let mut chr = vec![0u8; 0x20];
    chr[0x10..0x18].fill(0xFF);
    chr
}

fn main() -> Result<(), CoreError> {
    let mut console = Console::new(ConsoleConfig::default());
    console.load_program(&demo_program())?;
    console.load_patterns(&demo_patterns())?;
    set_vector(console.bus_mut(), RESET_VECTOR, 0x8000);
    set_vector(console.bus_mut(), NMI_VECTOR, 0x8030);
    console.ppu_mut().poke_vram(0x3F01, 0x2A);
    console.reset();

    let frames = 3;
    let mut cycles = 0u64;
    for _ in 0..frames {
        cycles += console.run_frame()?;
    }

    let cpu = console.cpu();
    println!("frames: {frames} ({cycles} CPU cycles)");
    println!("A: 0x{:02X}", cpu.a());
    println!("X: 0x{:02X}", cpu.x());
    println!("Y: 0x{:02X}", cpu.y());
    println!("SP: 0x{:02X}", cpu.sp());
    println!("PC: 0x{:04X}", cpu.pc());
    println!("P (flags): 0b{:08b}", cpu.status());
    println!("NMI count [$00]: {}", console.bus().peek(0x0000));
    println!("pixel (0,0): palette 0x{:02X}", console.frame().get(0, 0).unwrap_or(0));

    #[cfg(feature = "screenshot")]
    if let Some(path) = std::env::args().nth(1) {
        console.frame().save_png(&path)?;
        println!("wrote {path}");
    }

    Ok(())
}
