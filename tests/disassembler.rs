use soft6502::{Bus, Disassembler, FormatOptions, Mnemonic};

#[test]
fn read_program() {
    let mut bus = Bus::with_ram();
    bus.write_bytes(
        0x0800,
        &[
            0xa9, 0xc0, 0xaa, 0xe8, 0x69, 0x14, 0x00, 0x02, 0xd5, 0x20, 0xd0, 0xfe, 0x6c, 0x00,
            0x80,
        ],
    )
    .unwrap();
    let expected_output: Vec<&str> = vec![
        "$0800: A9 C0       LDA #$C0",
        "$0802: AA          TAX",
        "$0803: E8          INX",
        "$0804: 69 14       ADC #$14",
        "$0806: 00          BRK",
        "$0807: 02          ??? ($02)",
        "$0808: D5 20       CMP $20,X",
        "$080A: D0 FE       BNE $080A",
        "$080C: 6C 00 80    JMP ($8000)",
    ];
    let output = Disassembler::standard()
        .unwrap()
        .disassemble_to_strings(&bus, 0x0800, 15)
        .unwrap();

    assert_eq!(expected_output, output);
}

#[test]
fn bare_listing() {
    let mut bus = Bus::with_ram();
    bus.write_bytes(0xc000, &[0x20, 0x00, 0xd0, 0x60]).unwrap();
    let disassembler = Disassembler::standard().unwrap().with_options(FormatOptions {
        show_address: false,
        show_bytes: false,
        uppercase: false,
        bytes_width: 0,
    });
    let output = disassembler.disassemble_to_strings(&bus, 0xc000, 4).unwrap();

    assert_eq!(vec!["jsr $D000", "rts"], output);
}

#[test]
fn iterate_until_rts() {
    let mut bus = Bus::with_ram();
    bus.write_bytes(0x0600, &[0xa2, 0x05, 0xca, 0xd0, 0xfd, 0x60, 0xff]).unwrap();
    let disassembler = Disassembler::standard().unwrap();
    let lines: Vec<Mnemonic> = disassembler
        .iter(&bus, 0x0600)
        .map(|line| line.unwrap())
        .filter_map(|line| line.mnemonic())
        .take_while(|mnemonic| *mnemonic != Mnemonic::RTS)
        .collect();

    assert_eq!(vec![Mnemonic::LDX, Mnemonic::DEX, Mnemonic::BNE], lines);
}
