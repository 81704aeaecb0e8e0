/*
 * This is the CLI frontend for the Soft6502 library.
 */
use ansi_term::Colour;
use anyhow::{bail, Context, Result};
use log::LevelFilter;
use soft6502::{load_program, CpuConfig, Disassembler, UnknownOpcodePolicy, VERSION};
use std::fs::File;
use std::io::prelude::*;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "soft6502", about = "MOS 6502 emulator")]
struct CLOptions {
    /// verbosity, repeat for more (-v debug, -vv trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Print the assembler listing of a binary file
    Disassemble {
        /// binary file to read
        #[structopt(short, long)]
        filename: String,

        /// hexadecimal address the file is loaded at
        #[structopt(short, long, default_value = "0600")]
        address: String,

        /// number of bytes to disassemble, the whole file by default
        #[structopt(short, long)]
        length: Option<usize>,

        /// write the listing in this file instead of the standard output
        #[structopt(short, long)]
        output: Option<String>,
    },
    /// Load a binary file in RAM and execute it from its first byte
    Run {
        /// binary file to read
        #[structopt(short, long)]
        filename: String,

        /// hexadecimal address the file is loaded at
        #[structopt(short, long, default_value = "0600")]
        address: String,

        /// maximum number of instructions to execute
        #[structopt(short = "s", long, default_value = "100000")]
        max_steps: usize,

        /// stop on illegal opcodes instead of skipping them
        #[structopt(long)]
        halt_on_illegal: bool,
    },
}

fn parse_address(address: &str) -> Result<u16> {
    let address = address.trim_start_matches("0x").trim_start_matches('$');
    let padded = if address.len() % 2 == 1 {
        format!("0{}", address)
    } else {
        address.to_owned()
    };
    let bytes = hex::decode(&padded).with_context(|| format!("invalid address '{}'", address))?;
    if bytes.is_empty() || bytes.len() > 2 {
        bail!("address '{}' must be one or two bytes long", address);
    }

    Ok(bytes.iter().fold(0u16, |acc, byte| acc << 8 | *byte as u16))
}

fn read_file(filename: &str) -> Result<Vec<u8>> {
    let mut f = File::open(filename).with_context(|| format!("could not open '{}'", filename))?;
    let mut buffer: Vec<u8> = vec![];
    f.read_to_end(&mut buffer)?;

    Ok(buffer)
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn disassemble(filename: &str, address: &str, length: Option<usize>, output: Option<String>) -> Result<()> {
    let address = parse_address(address)?;
    let program = read_file(filename)?;
    let length = length.unwrap_or_else(|| program.len());
    let mut bus = soft6502::Bus::with_ram();
    bus.write_bytes(address, &program)?;

    let lines = Disassembler::standard()?.disassemble_to_strings(&bus, address, length)?;
    match output {
        Some(path) => {
            let mut f = File::create(&path).with_context(|| format!("could not create '{}'", path))?;
            for line in lines {
                writeln!(f, "{}", line)?;
            }
        }
        None => {
            for line in lines {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn run(filename: &str, address: &str, max_steps: usize, halt_on_illegal: bool) -> Result<()> {
    let address = parse_address(address)?;
    let program = read_file(filename)?;
    let policy = if halt_on_illegal {
        UnknownOpcodePolicy::Halt
    } else {
        UnknownOpcodePolicy::Skip
    };
    let mut cpu = load_program(address, &program, CpuConfig::default().with_unknown_opcode(policy))?;

    let logs = cpu.run(max_steps)?;
    if let Some(line) = logs.last() {
        println!("{}", Colour::Fixed(130).paint(line.to_string()));
    }
    println!("{}", Colour::Green.bold().paint(cpu.to_string()));
    println!(
        "{} instructions executed, {} cycles.",
        cpu.instructions_executed(),
        cpu.total_cycles()
    );

    Ok(())
}

fn main() {
    let cli_opt = CLOptions::from_args();
    init_logger(cli_opt.verbose);
    log::debug!("soft6502 version {}", VERSION);

    let result = match cli_opt.command {
        Command::Disassemble {
            filename,
            address,
            length,
            output,
        } => disassemble(&filename, &address, length, output),
        Command::Run {
            filename,
            address,
            max_steps,
            halt_on_illegal,
        } => run(&filename, &address, max_steps, halt_on_illegal),
    };

    if let Err(e) = result {
        eprintln!("{}", Colour::Red.paint(format!("ERROR: {:#}", e)));
        std::process::exit(1);
    }
}
