//! # Tirilla CLI
//!
//! Command-line front end for the receipt pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Compose a receipt from a JSON order and send it to a printer
//! tirilla print order.json --printer 192.168.1.50:9100
//!
//! # Write the command stream to a file instead
//! tirilla print order.json --out receipt.bin
//!
//! # Generate a standalone barcode
//! tirilla barcode "ORDER-42" --symbology code128 --out barcode.bin
//!
//! # Hex-dump a command stream for protocol debugging
//! tirilla inspect receipt.bin
//! ```
//!
//! With neither `--printer` nor `--out`, the command stream is
//! hex-dumped to stdout.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tirilla::protocol::barcode::{self, BarcodeSpec, Symbology};
use tirilla::protocol::hex_dump;
use tirilla::transport::{TcpTransport, Transport};
use tirilla::{PrinterConfig, RasterMode, ReceiptComposer, ReceiptDocument};

/// Tirilla - ESC/POS receipt utility
#[derive(Parser, Debug)]
#[command(name = "tirilla")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose a receipt from a JSON order document
    Print {
        /// Path to the order document (JSON)
        document: PathBuf,

        /// Printer address (host:port) to send the job to
        #[arg(long)]
        printer: Option<String>,

        /// Write the command stream to a file instead of printing
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Printer profile: 58mm or 80mm
        #[arg(long, default_value = "58mm")]
        profile: String,

        /// Use fast raster mode for the logo (lower quality, fewer bytes)
        #[arg(long)]
        fast: bool,
    },

    /// Generate a standalone barcode command stream
    Barcode {
        /// Payload to encode
        payload: String,

        /// Symbology: code39, code128, ean13, ean8, upc-a, itf
        #[arg(long, default_value = "code128")]
        symbology: String,

        /// Bar height in dots (1-255)
        #[arg(long, default_value_t = 80)]
        height: u8,

        /// Module width in dots (2-6)
        #[arg(long, default_value_t = 3)]
        module_width: u8,

        /// Printer address (host:port) to send the barcode to
        #[arg(long)]
        printer: Option<String>,

        /// Write the command stream to a file
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Hex-dump a command stream file
    Inspect {
        /// File to dump
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Print {
            document,
            printer,
            out,
            profile,
            fast,
        } => {
            let config = PrinterConfig::by_name(&profile)
                .ok_or_else(|| format!("Unknown profile '{}'. Use 58mm or 80mm.", profile))?;

            let json = std::fs::read_to_string(&document)?;
            let doc: ReceiptDocument = serde_json::from_str(&json)?;

            let mut composer = ReceiptComposer::new().config(config);
            if fast {
                composer = composer.logo_mode(RasterMode::fast());
            }
            let data = composer.compose(&doc).await?;

            deliver(&data, printer.as_deref(), out.as_deref()).await?;
        }

        Commands::Barcode {
            payload,
            symbology,
            height,
            module_width,
            printer,
            out,
        } => {
            let spec = BarcodeSpec::new(Symbology::from_name(&symbology))
                .height(height)
                .module_width(module_width);
            let data = barcode::encode(&payload, &spec)?;

            deliver(&data, printer.as_deref(), out.as_deref()).await?;
        }

        Commands::Inspect { file } => {
            let data = std::fs::read(&file)?;
            println!("{}", hex_dump(&data));
        }
    }

    Ok(())
}

/// Send a command stream to a printer, a file, or hex-dump it.
async fn deliver(
    data: &[u8],
    printer: Option<&str>,
    out: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(addr) = printer {
        let transport = TcpTransport::from_addr(addr)?;
        transport.send(data).await?;
        println!("Sent {} bytes to {}", data.len(), addr);
    } else if let Some(path) = out {
        std::fs::write(path, data)?;
        println!("Wrote {} bytes to {}", data.len(), path.display());
    } else {
        println!("{}", hex_dump(data));
    }
    Ok(())
}
