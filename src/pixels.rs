use crate::error::{Error, Result};

/// Largest accepted width or height. Raster surfaces address pixels with `i32`.
pub const MAX_SIDE: u32 = i32::MAX as u32;

/// A decoded image: `width * height` pixels of straight (non-premultiplied) RGBA, row-major.
///
/// The buffer is validated on construction and never mutated afterward, so every other part of
/// the crate may assume `data.len() == width * height * 4` with both dimensions positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_buffer(format!(
                "empty dimensions {}x{}",
                width, height
            )));
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(Error::invalid_buffer(format!(
                "{}x{} exceeds the largest side of {}",
                width, height, MAX_SIDE
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| Error::invalid_buffer("dimensions overflow"))?;
        if data.len() != expected {
            return Err(Error::invalid_buffer(format!(
                "{}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(PixelBuffer {
            width,
            height,
            data,
        })
    }

    /// Builds a buffer where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let count = (width as usize) * (height as usize);
        Self::new(width, height, rgba.repeat(count))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// The longer of the two sides; drives the size-aware radius schedule.
    pub fn long_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Returns the pixel at linear index `i` (that is, `y * width + x`).
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.pixel_count()`.
    pub fn rgba(&self, i: usize) -> [u8; 4] {
        let px = &self.data[i * 4..i * 4 + 4];
        [px[0], px[1], px[2], px[3]]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rejects_bad_shapes() {
        const TEST_CASES: &[(u32, u32, usize)] = &[(0, 10, 0), (10, 0, 0), (2, 2, 15), (2, 2, 17)];
        for &(w, h, len) in TEST_CASES {
            match PixelBuffer::new(w, h, vec![0; len]) {
                Err(Error::InvalidBuffer(_)) => {}
                other => panic!("{}x{} with {} bytes: got {:?}", w, h, len, other),
            }
        }
    }

    #[test]
    fn test_rejects_oversized_sides() {
        const TEST_CASES: &[(u32, u32)] = &[(MAX_SIDE + 1, 1), (1, MAX_SIDE + 1), (u32::MAX, 1)];
        for &(w, h) in TEST_CASES {
            match PixelBuffer::new(w, h, Vec::new()) {
                Err(Error::InvalidBuffer(msg)) if msg.contains("exceeds") => {}
                other => panic!("{}x{}: got {:?}", w, h, other),
            }
        }
    }

    #[test]
    fn test_accessors() {
        let data: Vec<u8> = (0..24).collect();
        let buf = PixelBuffer::new(3, 2, data).unwrap();
        assert_eq!(buf.pixel_count(), 6);
        assert_eq!(buf.long_edge(), 3);
        assert_eq!(buf.rgba(0), [0, 1, 2, 3]);
        assert_eq!(buf.rgba(5), [20, 21, 22, 23]);
    }

    #[test]
    fn test_filled() {
        let buf = PixelBuffer::filled(10, 10, [0, 0, 0, 255]).unwrap();
        assert_eq!(buf.as_bytes().len(), 400);
        assert!((0..100).all(|i| buf.rgba(i) == [0, 0, 0, 255]));
    }
}
