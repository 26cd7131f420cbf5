use clap::Parser;

use std::io::Write;

use fec_codec::packet::{self, PacketMode};
use fec_config::{FecConfig, toml_config};
use fec_core::{BitBuffer, FecResult, debug};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "CC1101 FEC encoder/decoder",
    long_about = "Encodes or decodes a captured CC1101 packet given as a bitstring, keeping preamble and sync word intact"
)]
struct Args {
    /// Operation to perform
    #[arg(
        help = "Mode: [ e | encode | d | decode | f | decode-stripped ]"
    )]
    mode: String,

    /// Raw bitstring of the captured packet
    #[arg(
        help = "Raw bitstring (binary representation) starting at the preamble"
    )]
    bitstring: String,

    #[arg(
        short = 'c',
        long = "config",
        help = "TOML configuration file"
    )]
    config: Option<String>,

    #[arg(
        short = 'v',
        long = "verbose",
        help = "Log everything down to trace level on stderr"
    )]
    verbose: bool,
}

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> FecConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

fn run(bitstring: &str, mode: PacketMode, cfg: &FecConfig) -> FecResult<String> {
    let bits = BitBuffer::from_bitstr(bitstring)?;
    let packet = bits.to_bytes();
    tracing::debug!("input: {} bits, {} bytes {:02X?}", bits.len_bits(), packet.len(), packet);

    let out = packet::process(&packet, mode, cfg)?;
    tracing::debug!("output: {} bytes {:02X?}", out.len(), out);
    Ok(BitBuffer::bytes_to_bitstr(&out))
}

fn main() {
    eprintln!("[+] CC1101 FEC encoding/decoding tool");

    let args = Args::parse();

    let mode = match args.mode.to_lowercase().as_str() {
        "e" | "encode" => PacketMode::Encode,
        "d" | "decode" => PacketMode::Decode { keep_header: true },
        "f" | "decode-stripped" => PacketMode::Decode { keep_header: false },
        _ => {
            eprintln!("Error: Unsupported mode '{}'. Use: e, d, f", args.mode);
            std::process::exit(1);
        }
    };

    let cfg = match &args.config {
        Some(path) => load_config_from_toml(path),
        None => FecConfig::default(),
    };

    let _log_guard = if args.verbose {
        debug::setup_logging_verbose();
        None
    } else {
        match debug::setup_logging_default(cfg.debug_log.clone()) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Error: cannot open log file: {}", e);
                std::process::exit(1);
            }
        }
    };

    match run(&args.bitstring, mode, &cfg) {
        Ok(bits) => {
            // Bits only, no newline
            print!("{}", bits);
            let _ = std::io::stdout().flush();
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
