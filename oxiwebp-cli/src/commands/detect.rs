//! Detect command implementation.

use oxiwebp_vp8l::container::{CONTAINER_HEADER_SIZE, VP8L_TAG};
use oxiwebp_vp8l::is_webp;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// Describe the first chunk of a WebP file.
fn webp_kind(magic: &[u8]) -> &'static str {
    match magic.get(12..16) {
        Some(tag) if tag == VP8L_TAG => "lossless (VP8L)",
        Some(b"VP8 ") => "lossy (VP8)",
        Some(b"VP8X") => "extended (VP8X)",
        _ => "unknown chunk",
    }
}

pub fn cmd_detect(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut magic = Vec::with_capacity(CONTAINER_HEADER_SIZE);
    File::open(file)?
        .take(CONTAINER_HEADER_SIZE as u64)
        .read_to_end(&mut magic)?;

    println!("File: {}", file.display());

    if is_webp(&magic) {
        println!("Format: WebP");
        println!("Kind: {}", webp_kind(&magic));
        println!("MIME type: image/webp");
    } else {
        match image::guess_format(&magic) {
            Ok(format) => {
                println!("Format: {:?}", format);
                println!("MIME type: {}", format.to_mime_type());
            }
            Err(_) => println!("Format: unknown"),
        }
    }
    println!("Magic bytes: {:02X?}", &magic[..magic.len().min(16)]);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webp_kind() {
        assert_eq!(webp_kind(b"RIFF\0\0\0\0WEBPVP8L"), "lossless (VP8L)");
        assert_eq!(webp_kind(b"RIFF\0\0\0\0WEBPVP8 "), "lossy (VP8)");
        assert_eq!(webp_kind(b"RIFF\0\0\0\0WEBP"), "unknown chunk");
    }
}
