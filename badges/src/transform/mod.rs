mod round;

use std::{num::NonZeroU32, path::PathBuf};
use image::{imageops, DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use tracing::debug;

use crate::error::BadgeError;

pub use round::*;


pub const TRANSPARENT: Rgba<u8> = image::Rgba::<u8>([0, 0, 0, 0]);

#[derive(Clone, Debug)]
pub struct Badge {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
    pub format: ImageFormat,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
}

impl Badge {
    /// Side length of the circular output.
    pub fn size(&self) -> NonZeroU32 {
        self.width.min(self.height)
    }
}

/// Centered square crop of a `width` x `height` raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub size: u32,
}

pub fn square_crop(width: u32, height: u32) -> CropRect {
    let size = width.min(height);

    CropRect {
        left: (width - size) / 2,
        top: (height - size) / 2,
        size,
    }
}

/// Decode a badge from file. Blocking, call from a blocking task.
pub fn badge_img(importable: PathBuf, target_path: PathBuf) -> Result<(Badge, DynamicImage), BadgeError> {
    // Read source image from file
    let reader = ImageReader::open(&importable)
        .map_err(|e| BadgeError::Read { path: importable.to_owned(), source: e })?
        .with_guessed_format()
        .map_err(|e| BadgeError::Read { path: importable.to_owned(), source: e })?;

    let format = match reader.format() {
        Some(ImageFormat::Png) => ImageFormat::Png,
        f => return Err(BadgeError::Unsupported { path: importable, format: f }),
    };

    let img = reader.decode()
        .map_err(|e| BadgeError::Decode { path: importable.to_owned(), source: e })?;

    // Read image width and height into non-zero ints to avoid problems later on
    let (width, height) = match (NonZeroU32::new(img.width()), NonZeroU32::new(img.height())) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(BadgeError::Empty { path: importable }),
    };

    debug!("Circularizer received {:?} image {:?} from width: {} and height: {}", format, importable, width, height);

    let badge = Badge {
        width,
        height,
        format,
        source_path: importable,
        target_path,
    };

    Ok((badge, img))
}

/// Color model normalization, anything without alpha gets an opaque one.
pub fn normalize_rgba(img: DynamicImage) -> RgbaImage {
    match img {
        DynamicImage::ImageRgba8(buf) => buf,
        other => other.into_rgba8(),
    }
}

/// Crop the centered square out of `buf` and cut a circle out of it.
pub fn circularize(buf: &RgbaImage) -> RgbaImage {
    let crop = square_crop(buf.width(), buf.height());

    let size = match NonZeroU32::new(crop.size) {
        Some(s) => s,
        None => return RgbaImage::new(0, 0),
    };

    debug!("Cropping {}x{} to square {:?}", buf.width(), buf.height(), crop);

    let square = imageops::crop_imm(buf, crop.left, crop.top, crop.size, crop.size).to_image();
    let mask = circular_mask(size);

    // Paste over a transparent canvas, pixels are overwritten, not blended
    let mut canvas = RgbaImage::from_pixel(crop.size, crop.size, TRANSPARENT);
    imageops::replace(&mut canvas, &square, 0, 0);

    round_from_square(&canvas, &mask)
}
