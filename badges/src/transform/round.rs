use std::num::NonZeroU32;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::map::map_colors2;


/// Pixels kept between the circle edge and the image border.
pub const EDGE_MARGIN: i64 = 2;

pub const OPAQUE: Luma<u8> = Luma([255]);
pub const CLEAR: Luma<u8> = Luma([0]);

/// Radius of the visible disk for a square of side `size`, negative for tiny badges.
pub fn mask_radius(size: NonZeroU32) -> i64 {
    (size.get() / 2) as i64 - EDGE_MARGIN
}

/// Binary alpha mask with an opaque disk centered in a `size` x `size` square.
pub fn circular_mask(size: NonZeroU32) -> GrayImage {
    let s = size.get();
    let center = (s / 2) as i64;
    let radius = mask_radius(size);

    // Nothing visible, skip the distance test entirely
    if radius < 0 {
        return GrayImage::from_pixel(s, s, CLEAR);
    }

    let r2 = radius * radius;

    GrayImage::from_fn(s, s, |x, y| {
        let dx = x as i64 - center;
        let dy = y as i64 - center;

        match dx * dx + dy * dy <= r2 {
            true => OPAQUE,
            false => CLEAR,
        }
    })
}

/// Replace the alpha channel of `square` with the mask values.
pub fn round_from_square(square: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    map_colors2(square, mask, |p, m| Rgba([p[0], p[1], p[2], m[0]]))
}
