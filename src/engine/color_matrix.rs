/// 4x5 row-major affine color transform: each output channel is a weighted
/// sum of the input channels plus an offset (offset 1.0 = full intensity).
/// Results clip to the displayable range instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    rows: [[f32; 5]; 4],
}

pub const IDENTITY: ColorMatrix = ColorMatrix::new([
    [1.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 0.0],
]);

/// The one filter the app offers: a 2x gain on red, green and blue, alpha
/// passed through unchanged.
pub const SATURATION_BOOST: ColorMatrix = ColorMatrix::new([
    [2.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 2.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 2.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 0.0],
]);

impl ColorMatrix {
    pub const fn new(rows: [[f32; 5]; 4]) -> Self {
        Self { rows }
    }

    pub fn is_identity(&self) -> bool {
        *self == IDENTITY
    }

    /// Transforms an RGBA8 buffer in place.
    pub fn apply_rgba(&self, pixels: &mut [u8]) {
        if self.is_identity() {
            return;
        }

        for pixel in pixels.chunks_exact_mut(4) {
            let input = [
                f32::from(pixel[0]),
                f32::from(pixel[1]),
                f32::from(pixel[2]),
                f32::from(pixel[3]),
            ];
            for (channel, row) in self.rows.iter().enumerate() {
                let value = row[0] * input[0]
                    + row[1] * input[1]
                    + row[2] * input[2]
                    + row[3] * input[3]
                    + row[4] * 255.0;
                pixel[channel] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
