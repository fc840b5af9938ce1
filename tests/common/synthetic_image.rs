use window_detector::image::{ImageF32, ImageU8};
use window_detector::BoundingBox;

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let cx = (x / cell) as i32;
            let cy = (y / cell) as i32;
            let sum = cx + cy;
            let val = if sum & 1 == 0 { 32u8 } else { 220u8 };
            img[y * width + x] = val;
        }
    }
    img
}

/// Checkerboard converted to the float working format.
pub fn checkerboard_f32(width: usize, height: usize, cell: usize) -> ImageF32 {
    let data = checkerboard_u8(width, height, cell);
    let view = ImageU8::packed(width, height, &data).expect("packed checkerboard");
    ImageF32::from_u8(&view)
}

/// Dark background with one bright filled square.
pub fn bright_square_f32(width: usize, height: usize, square: BoundingBox) -> ImageF32 {
    let mut img = ImageF32::new(width, height);
    for y in square.y_range() {
        for x in square.x_range() {
            img.set(x, y, 1.0);
        }
    }
    img
}

/// True when `a` and `b` share at least one pixel.
pub fn overlaps(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// `b` grown by `margin` pixels on every side.
pub fn grown(b: &BoundingBox, margin: i32) -> BoundingBox {
    BoundingBox::new(b.x0 - margin, b.y0 - margin, b.x1 + margin, b.y1 + margin)
}
