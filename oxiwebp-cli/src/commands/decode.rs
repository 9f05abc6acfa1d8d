//! Decode command implementation.

use log::debug;
use oxiwebp_vp8l::decode;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

pub fn cmd_decode(input: &PathBuf, output: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(input)?);
    let image = decode(reader)?;
    debug!(
        "{}: {}x{} {:?}",
        input.display(),
        image.width(),
        image.height(),
        image.color()
    );

    image.save(output)?;

    println!(
        "{} -> {} ({}x{})",
        input.display(),
        output.display(),
        image.width(),
        image.height()
    );

    Ok(())
}
