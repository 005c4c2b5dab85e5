//! LS-8 Emulator - CLI Entry Point
//!
//! Commands:
//! - `ls8-emu run <program>` - Run an image or ASM file until it halts
//! - `ls8-emu debug <program>` - Interactive debugger
//! - `ls8-emu asm <source>` - Assemble to an image
//! - `ls8-emu disasm <image>` - Disassemble an image

use clap::{Parser, Subcommand};
use log::{error, info};

#[derive(Parser)]
#[command(name = "ls8-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator for the LS-8 8-bit byte-code CPU")]
struct Cli {
    /// Enable debug logging (interrupt delivery, load details)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Log every executed instruction
    #[arg(long, global = true)]
    trace: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Path to the image (.ls8) or ASM file to execute
        program: String,
        /// Stop after this many instructions
        #[arg(short, long)]
        max_cycles: Option<u64>,
        /// Print the final CPU state as JSON
        #[arg(long)]
        dump_state: bool,
    },
    /// Interactive debugger
    Debug {
        /// Path to the image or ASM file to debug
        program: String,
    },
    /// Assemble source to an image
    Asm {
        /// Path to the source file
        source: String,
        /// Output image file
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Disassemble an image to readable text
    Disasm {
        /// Path to the image file
        image: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Run { program, max_cycles, dump_state } => {
            run_program(&program, max_cycles, dump_state);
        }
        Commands::Debug { program } => {
            debug_program(&program);
        }
        Commands::Asm { source, output } => {
            assemble_file(&source, output);
        }
        Commands::Disasm { image } => {
            disassemble_file(&image);
        }
    }
}

/// Load program bytes from an image, assembling `.asm` files first.
fn load_program_file(path: &str) -> Vec<u8> {
    use ls8::{assemble, load_image};

    let bytes = if path.ends_with(".asm") {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to read {}: {}", path, e);
                std::process::exit(1);
            }
        };

        match assemble(&source) {
            Ok(bytes) => {
                info!("Assembled {} bytes from {}", bytes.len(), path);
                bytes
            }
            Err(e) => {
                error!("Assembly error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match load_image(path) {
            Ok(bytes) => {
                info!("Loaded {} bytes from {}", bytes.len(), path);
                bytes
            }
            Err(e) => {
                error!("Failed to load image {}: {}", path, e);
                std::process::exit(1);
            }
        }
    };

    if bytes.is_empty() {
        error!("No instructions to execute");
        std::process::exit(1);
    }

    bytes
}

fn run_program(path: &str, max_cycles: Option<u64>, dump_state: bool) {
    use ls8::Cpu;

    let program = load_program_file(path);

    let mut cpu = Cpu::new();
    if let Err(e) = cpu.load_program(&program) {
        error!("Failed to load program: {}", e);
        std::process::exit(1);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match max_cycles {
        Some(limit) => cpu.run_limited(&mut out, limit),
        None => cpu.run(&mut out),
    };

    match result {
        Ok(cycles) if cpu.is_halted() => info!("Halted after {} cycles", cycles),
        Ok(cycles) => info!("Stopped at cycle limit ({}), PC={:02X}", cycles, cpu.pc),
        Err(e) => {
            error!("Fatal: {}: {}", path, e);
            std::process::exit(1);
        }
    }

    if dump_state {
        match serde_json::to_string_pretty(&cpu.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize state: {}", e);
                std::process::exit(1);
            }
        }
    }
}

#[cfg(feature = "tui")]
fn debug_program(path: &str) {
    use ls8::tui::run_debugger;

    let program = load_program_file(path);
    info!("Launching debugger...");

    if let Err(e) = run_debugger(program) {
        error!("Debugger error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn debug_program(_path: &str) {
    error!("The debugger needs the `tui` feature");
    std::process::exit(1);
}

fn assemble_file(source_path: &str, output: Option<String>) {
    use ls8::{assemble, save_image};

    let out_path = output.unwrap_or_else(|| {
        source_path.trim_end_matches(".asm").to_string() + ".ls8"
    });

    info!("Assembling: {} -> {}", source_path, out_path);

    let source = match std::fs::read_to_string(source_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to read file: {}", e);
            std::process::exit(1);
        }
    };

    let bytes = match assemble(&source) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Assembly error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = save_image(&out_path, &bytes) {
        error!("Failed to save image: {}", e);
        std::process::exit(1);
    }

    info!("Saved {} bytes to {}", bytes.len(), out_path);
}

fn disassemble_file(image_path: &str) {
    use ls8::{disassemble, load_image};

    let bytes = match load_image(image_path) {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to load image: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", disassemble(&bytes));
}
