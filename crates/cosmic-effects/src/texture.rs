//! Soft circular sprite texture: a white disc whose alpha falls off radially,
//! rendered on the CPU into an RGBA8 buffer.

use std::sync::Arc;

/// Fraction of the edge length at which the gradient starts fading.
const INNER_RADIUS: f32 = 0.1;
/// Fraction of the edge length at which alpha reaches zero.
const OUTER_RADIUS: f32 = 0.5;

/// Immutable square RGBA8 image shared by every material of one effect family.
#[derive(Clone, Debug, PartialEq)]
pub struct SoftTexture {
    size: u32,
    rgba: Vec<u8>,
}

impl SoftTexture {
    /// Render a `size`×`size` radial gradient: fully opaque inside
    /// `0.1 * size`, linearly fading to transparent at the disc edge.
    pub fn generate(size: u32) -> Self {
        let size = size.max(1);
        let edge = size as f32;
        let center = edge * 0.5;
        let inner = edge * INNER_RADIUS;
        let outer = edge * OUTER_RADIUS;

        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let distance = (dx * dx + dy * dy).sqrt();
                let alpha = if distance >= outer {
                    0.0
                } else {
                    1.0 - ((distance - inner) / (outer - inner)).clamp(0.0, 1.0)
                };
                rgba.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
            }
        }

        Self { size, rgba }
    }

    /// Convenience for the common case of sharing one texture across materials.
    pub fn shared(size: u32) -> Arc<Self> {
        Arc::new(Self::generate(size))
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Raw RGBA8 bytes, row-major, `size * size * 4` long.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Alpha at pixel `(x, y)`, or `None` outside the image.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let idx = ((y * self.size + x) * 4 + 3) as usize;
        self.rgba.get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_length_matches_size() {
        let texture = SoftTexture::generate(64);
        assert_eq!(texture.size(), 64);
        assert_eq!(texture.rgba().len(), 64 * 64 * 4);
    }

    #[test]
    fn test_center_is_opaque_and_corners_transparent() {
        let texture = SoftTexture::generate(128);
        assert_eq!(texture.alpha_at(64, 64), Some(255));
        assert_eq!(texture.alpha_at(0, 0), Some(0));
        assert_eq!(texture.alpha_at(127, 127), Some(0));
    }

    #[test]
    fn test_alpha_decreases_toward_edge() {
        let texture = SoftTexture::generate(128);
        let row: Vec<u8> = (64..128).filter_map(|x| texture.alpha_at(x, 64)).collect();
        for pair in row.windows(2) {
            assert!(pair[1] <= pair[0], "alpha rose along the radius: {pair:?}");
        }
    }

    #[test]
    fn test_color_channels_are_white() {
        let texture = SoftTexture::generate(16);
        for pixel in texture.rgba().chunks_exact(4) {
            assert_eq!(&pixel[..3], &[255, 255, 255]);
        }
    }

    #[test]
    fn test_out_of_range_lookup() {
        let texture = SoftTexture::generate(8);
        assert_eq!(texture.alpha_at(8, 0), None);
    }
}
