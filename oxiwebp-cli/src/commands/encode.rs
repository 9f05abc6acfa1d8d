//! Encode command implementation.

use crate::utils::{encode_progress_bar, format_size, webp_output_path};
use clap::ValueEnum;
use dialoguer::Confirm;
use image::DynamicImage;
use log::{debug, info};
use oxiwebp_vp8l::{EncoderOptions, encode};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Encoder preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Preset {
    /// Palette or predictor, 4-bit color cache
    #[default]
    Default,
    /// No predictor search, no color cache
    Fast,
}

impl Preset {
    fn options(self) -> EncoderOptions {
        match self {
            Preset::Default => EncoderOptions::DEFAULT,
            Preset::Fast => EncoderOptions::FAST,
        }
    }
}

/// Arguments of `oxiwebp encode`.
pub struct EncodeArgs<'a> {
    pub inputs: &'a [PathBuf],
    pub output: Option<&'a Path>,
    pub preset: Preset,
    pub cache_bits: Option<u8>,
    pub no_palette: bool,
    pub color_transform: bool,
    pub force: bool,
    pub progress: bool,
    pub verbose: bool,
}

impl EncodeArgs<'_> {
    fn encoder_options(&self) -> EncoderOptions {
        let mut options = self.preset.options();
        if let Some(bits) = self.cache_bits {
            options = options.with_color_cache_bits(bits);
        }
        if self.no_palette {
            options = options.with_palette(false);
        }
        if self.color_transform {
            options = options.with_color_transform(true);
        }
        options
    }
}

/// Outcome of encoding one file.
struct Encoded {
    input_size: u64,
    output_size: u64,
}

/// Load `input`, converting high bit depth images to 8-bit RGBA.
fn load_image(input: &Path) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let image = image::open(input)?;
    Ok(match image {
        DynamicImage::ImageRgba8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_) => image,
        other => {
            info!(
                "{}: converting {:?} to 8-bit RGBA",
                input.display(),
                other.color()
            );
            DynamicImage::ImageRgba8(other.to_rgba8())
        }
    })
}

fn encode_file(
    input: &Path,
    output: &Path,
    options: &EncoderOptions,
) -> Result<Encoded, Box<dyn std::error::Error>> {
    let image = load_image(input)?;
    debug!(
        "{}: {}x{} {:?}",
        input.display(),
        image.width(),
        image.height(),
        image.color()
    );

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let writer = BufWriter::new(File::create(output)?);
    encode(writer, &image, options)?;

    Ok(Encoded {
        input_size: std::fs::metadata(input)?.len(),
        output_size: std::fs::metadata(output)?.len(),
    })
}

pub fn cmd_encode(args: &EncodeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.encoder_options();
    options.validate()?;

    let multiple = args.inputs.len() > 1;
    let jobs: Vec<(PathBuf, PathBuf)> = args
        .inputs
        .iter()
        .map(|input| (input.clone(), webp_output_path(input, args.output, multiple)))
        .collect();

    let existing: Vec<&PathBuf> = jobs
        .iter()
        .map(|(_, output)| output)
        .filter(|output| output.exists())
        .collect();
    if !existing.is_empty() && !args.force {
        for path in &existing {
            eprintln!("  exists: {}", path.display());
        }
        let overwrite = Confirm::new()
            .with_prompt(format!("Overwrite {} existing file(s)?", existing.len()))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let pb = encode_progress_bar(jobs.len(), args.progress && multiple);

    let results: Vec<_> = jobs
        .par_iter()
        .map(|(input, output)| {
            let result = encode_file(input, output, &options).map_err(|e| e.to_string());
            if let Some(name) = input.file_name() {
                pb.set_message(name.to_string_lossy().into_owned());
            }
            pb.inc(1);
            (input, output, result)
        })
        .collect();

    pb.finish_and_clear();

    let mut failures = 0;
    for (input, output, result) in &results {
        match result {
            Ok(encoded) => {
                if args.verbose || !multiple {
                    let ratio = if encoded.input_size > 0 {
                        encoded.output_size as f64 / encoded.input_size as f64 * 100.0
                    } else {
                        0.0
                    };
                    println!(
                        "{} -> {} ({}, {:.1}% of input)",
                        input.display(),
                        output.display(),
                        format_size(encoded.output_size),
                        ratio
                    );
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", input.display(), e);
            }
        }
    }

    if multiple {
        println!("Encoded {}/{} files", results.len() - failures, results.len());
    }

    if failures > 0 {
        return Err(format!("{} file(s) failed to encode", failures).into());
    }

    Ok(())
}
