/// Destination rectangle of an image letterboxed into a canvas, offsets
/// relative to the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FitRect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Scales the source to fit entirely within the destination, preserving
/// aspect ratio and centering the result. Never crops or stretches; small
/// sources are scaled up.
pub fn fit_contain(src_width: u32, src_height: u32, dst_width: f32, dst_height: f32) -> FitRect {
    if src_width == 0 || src_height == 0 || dst_width <= 0.0 || dst_height <= 0.0 {
        return FitRect {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        };
    }

    let scale = (dst_width / src_width as f32).min(dst_height / src_height as f32);
    let width = src_width as f32 * scale;
    let height = src_height as f32 * scale;
    FitRect {
        x: (dst_width - width) / 2.0,
        y: (dst_height - height) / 2.0,
        width,
        height,
    }
}
