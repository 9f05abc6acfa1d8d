//! OxiWebP CLI - lossless WebP from the command line
//!
//! A Pure Rust tool for converting images to lossless WebP (VP8L) and back.

mod commands;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use commands::{EncodeArgs, Preset, cmd_decode, cmd_detect, cmd_encode, cmd_info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxiwebp")]
#[command(author, version, about = "Pure Rust lossless WebP encoder")]
#[command(long_about = "
OxiWebP encodes images as lossless WebP (VP8L).
Input formats: PNG, JPEG, GIF, BMP, WebP

Examples:
  oxiwebp encode photo.png
  oxiwebp encode *.png -o out/
  oxiwebp encode logo.png -o logo.webp --cache-bits 0
  oxiwebp decode logo.webp -o logo.png
  oxiwebp info logo.webp --json
  oxiwebp detect unknown.bin
")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode images as lossless WebP
    #[command(alias = "e")]
    Encode {
        /// Images to encode
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (single input) or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encoder preset
        #[arg(short, long, value_enum, default_value = "default")]
        preset: Preset,

        /// Color cache size in bits (0 disables the cache)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=11))]
        cache_bits: Option<u8>,

        /// Never use the color-indexing transform
        #[arg(long)]
        no_palette: bool,

        /// Apply the color transform
        #[arg(long)]
        color_transform: bool,

        /// Overwrite existing files without asking
        #[arg(short, long)]
        force: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decode a WebP file to another image format
    #[command(alias = "d")]
    Decode {
        /// WebP file to decode
        input: PathBuf,

        /// Output image (format from extension)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the header of a lossless WebP file
    #[command(alias = "i")]
    Info {
        /// WebP file to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Detect the image format of a file
    Detect {
        /// File to detect
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Encode {
            inputs,
            output,
            preset,
            cache_bits,
            no_palette,
            color_transform,
            force,
            progress,
        } => cmd_encode(&EncodeArgs {
            inputs: &inputs,
            output: output.as_deref(),
            preset,
            cache_bits,
            no_palette,
            color_transform,
            force,
            progress,
            verbose: cli.verbose > 0,
        }),
        Commands::Decode { input, output } => cmd_decode(&input, &output),
        Commands::Info { file, json } => cmd_info(&file, json),
        Commands::Detect { file } => cmd_detect(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
