//! Info command implementation.

use crate::utils::format_size;
use oxiwebp_vp8l::{Vp8lHeader, read_header};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JSON output for `oxiwebp info`.
#[derive(Debug, Serialize, Deserialize)]
struct InfoJson {
    file: String,
    file_size: u64,
    width: u32,
    height: u32,
    alpha: bool,
    version: u8,
    riff_size: u32,
    chunk_size: u32,
    bits_per_pixel: f64,
}

impl InfoJson {
    fn new(file: &PathBuf, file_size: u64, header: &Vp8lHeader) -> Self {
        let pixels = header.width as u64 * header.height as u64;
        Self {
            file: file.display().to_string(),
            file_size,
            width: header.width,
            height: header.height,
            alpha: header.alpha_is_used,
            version: header.version,
            riff_size: header.riff_size,
            chunk_size: header.chunk_size,
            bits_per_pixel: header.chunk_size as f64 * 8.0 / pixels as f64,
        }
    }
}

pub fn cmd_info(file: &PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(file)?;
    let header = read_header(&bytes)?;
    let info = InfoJson::new(file, bytes.len() as u64, &header);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("WebP Information");
    println!("================");
    println!("File: {}", info.file);
    println!("Size: {} ({} bytes)", format_size(info.file_size), info.file_size);
    println!("Format: lossless (VP8L)");
    println!();
    println!("Image:");
    println!("  Dimensions: {}x{}", info.width, info.height);
    println!("  Alpha: {}", if info.alpha { "yes" } else { "no" });
    println!("  Version: {}", info.version);
    println!();
    println!("Container:");
    println!("  RIFF size: {} bytes", info.riff_size);
    println!("  VP8L chunk: {} bytes", info.chunk_size);
    println!("  Bits per pixel: {:.3}", info.bits_per_pixel);

    if info.riff_size as u64 + 8 != info.file_size {
        println!("  Warning: RIFF size does not match file size");
    }

    Ok(())
}
