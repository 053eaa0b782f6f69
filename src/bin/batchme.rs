//! BatchMe CLI
//!
//! Default: interactive terminal session
//! --cli: read UPCs from stdin until EOF, one batch
//! Returns non-zero only when no input was supplied or setup failed

use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::util::SubscriberInitExt;

use batchme::{
    logging, run_line_mode, BarcodeGenerator, GeneratorConfig, InteractiveSession, RasterOptions,
    SessionError, DEFAULT_OUTPUT_DIR,
};

#[derive(Parser)]
#[command(name = "batchme", version)]
#[command(about = "BatchMe - UPC Barcode Generator")]
struct Cli {
    /// Line mode: read UPC numbers from stdin instead of the interactive session
    #[arg(long)]
    cli: bool,

    /// Directory barcode images are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Pixels per barcode module
    #[arg(long, default_value_t = 3)]
    module_width: u32,

    /// Bar height in pixels
    #[arg(long, default_value_t = 150)]
    bar_height: u32,

    /// Fail items whose check digit is wrong instead of correcting it
    #[arg(long)]
    strict_check_digit: bool,

    /// Print the batch report as JSON instead of progress lines (line mode)
    #[arg(long)]
    json: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::subscriber(logging::env_filter(cli.verbose), io::stderr, io::stderr().is_terminal())
        .init();

    let raster = match RasterOptions::from_user(cli.module_width, cli.bar_height) {
        Ok(r) => RasterOptions {
            strict_check_digit: cli.strict_check_digit,
            ..r
        },
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = GeneratorConfig {
        output_dir: cli.output_dir.clone(),
        raster,
    };
    let mut generator = match BarcodeGenerator::new(config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = if cli.cli {
        run_line_mode(
            &generator,
            io::stdin().lock(),
            io::stdout().lock(),
            io::stderr(),
            cli.json,
        )
        .map(|_| ())
    } else {
        let stdin = io::stdin();
        InteractiveSession::new(&mut generator, stdin.lock(), io::stdout())
            .run()
            .map(|_| ())
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(SessionError::NoInput) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
