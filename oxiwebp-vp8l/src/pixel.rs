//! Non-premultiplied RGBA pixel type shared by transforms and the token
//! encoder.

/// One non-premultiplied RGBA pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba {
    /// Opaque black, the prediction for the top-left pixel.
    pub const OPAQUE_BLACK: Self = Self::new(0, 0, 0, 255);

    /// Create a pixel from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a pixel from a 4-byte RGBA slice.
    #[inline]
    pub fn from_slice(px: &[u8]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }

    /// Pack as `0xAARRGGBB`, the layout VP8L hashes.
    #[inline]
    pub fn argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Per-channel difference modulo 256.
    #[inline]
    pub fn wrapping_sub(self, other: Self) -> Self {
        Self::new(
            self.r.wrapping_sub(other.r),
            self.g.wrapping_sub(other.g),
            self.b.wrapping_sub(other.b),
            self.a.wrapping_sub(other.a),
        )
    }

    /// Per-channel sum modulo 256.
    #[inline]
    pub fn wrapping_add(self, other: Self) -> Self {
        Self::new(
            self.r.wrapping_add(other.r),
            self.g.wrapping_add(other.g),
            self.b.wrapping_add(other.b),
            self.a.wrapping_add(other.a),
        )
    }

    /// Per-channel truncating average.
    #[inline]
    pub fn average2(self, other: Self) -> Self {
        let avg = |x: u8, y: u8| ((x as u16 + y as u16) / 2) as u8;
        Self::new(
            avg(self.r, other.r),
            avg(self.g, other.g),
            avg(self.b, other.b),
            avg(self.a, other.a),
        )
    }

    /// Channels in RGBA order.
    #[inline]
    pub fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Split an interleaved RGBA byte buffer into pixels.
pub fn pixels_from_rgba(rgba: &[u8]) -> Vec<Rgba> {
    rgba.chunks_exact(4).map(Rgba::from_slice).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_packing() {
        assert_eq!(Rgba::new(0x11, 0x22, 0x33, 0x44).argb(), 0x44112233);
        assert_eq!(Rgba::OPAQUE_BLACK.argb(), 0xFF000000);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        let a = Rgba::new(10, 200, 0, 255);
        let b = Rgba::new(20, 100, 1, 255);
        let d = a.wrapping_sub(b);
        assert_eq!(d, Rgba::new(246, 100, 255, 0));
        assert_eq!(d.wrapping_add(b), a);
    }

    #[test]
    fn test_average2_truncates() {
        let a = Rgba::new(255, 0, 3, 1);
        let b = Rgba::new(254, 1, 4, 0);
        assert_eq!(a.average2(b), Rgba::new(254, 0, 3, 0));
    }

    #[test]
    fn test_pixels_from_rgba() {
        let px = pixels_from_rgba(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(px, vec![Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 8)]);
    }
}
