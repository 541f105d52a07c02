use crate::error::BizErrorEnum;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{
    DynamicImage, ExtendedColorType, GenericImageView, ImageDecoder, ImageError, ImageReader, Rgb,
    RgbImage,
};
use std::io::Cursor;

const INITIAL_QUALITY: u8 = 85;
const MIN_QUALITY: u8 = 20;
const QUALITY_STEP: u8 = 10;
/// Below this quality every pass also shrinks the image.
const RESIZE_BELOW_QUALITY: u8 = 50;
const MAX_DIMENSION: u32 = 2048;
const MIN_DIMENSION: u32 = 400;

/// The bytes to upload and the name to upload them under.
#[derive(Debug)]
pub struct CompressedImage {
    pub name: String,
    pub bytes: Vec<u8>,
    pub compressed: bool,
}

/// Shrink `bytes` below `max_bytes` by re-encoding as JPEG.
///
/// Files already under the limit are returned untouched. Otherwise the
/// image is turned upright per its EXIF orientation, then the quality steps down from 85 to 20; once it drops below 50 each pass also
/// scales the longest side down by 20%, never below 400 px.
pub fn compress(name: &str, bytes: Vec<u8>, max_bytes: u64) -> Result<CompressedImage, BizErrorEnum> {
    if bytes.len() as u64 <= max_bytes {
        return Ok(CompressedImage {
            name: name.to_string(),
            bytes,
            compressed: false,
        });
    }
    if name.to_lowercase().ends_with(".svg") {
        tracing::error!("Vector image {} is above the upload limit", name);
        return Err(BizErrorEnum::ImageTooLarge {
            name: name.to_string(),
            limit: max_bytes,
        });
    }

    let original = decode_upright(&bytes).map_err(|e| {
        tracing::error!("Failed to decode {}: {:?}", name, e);
        BizErrorEnum::DecodeImageError(e)
    })?;
    let original = flatten_on_white(&original);

    let mut current = original.clone();
    let mut dimension = MAX_DIMENSION;
    let mut quality = INITIAL_QUALITY;
    loop {
        let encoded = encode_jpeg(&current, quality)?;
        tracing::debug!(
            "{} at quality {} and {}x{}: {} bytes",
            name,
            quality,
            current.width(),
            current.height(),
            encoded.len()
        );
        if encoded.len() as u64 <= max_bytes {
            return Ok(CompressedImage {
                name: jpeg_name(name),
                bytes: encoded,
                compressed: true,
            });
        }

        if quality < MIN_QUALITY + QUALITY_STEP {
            break;
        }
        quality -= QUALITY_STEP;
        if quality < RESIZE_BELOW_QUALITY && dimension > MIN_DIMENSION {
            dimension = MIN_DIMENSION.max(dimension * 4 / 5);
            current = fit_within(&original, dimension);
        }
    }

    tracing::error!("Could not compress {} below {} bytes", name, max_bytes);
    Err(BizErrorEnum::ImageTooLarge {
        name: name.to_string(),
        limit: max_bytes,
    })
}

/// Re-encoding drops the EXIF block, so its rotation is applied to the pixels.
fn decode_upright(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// JPEG has no alpha channel.
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let rgba = image.to_rgba8();
    RgbImage::from_fn(width, height, |x, y| {
        let pixel = rgba.get_pixel(x, y);
        let alpha = pixel[3] as u32;
        let blend = |channel: u8| ((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])])
    })
}

fn fit_within(image: &RgbImage, dimension: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width <= dimension && height <= dimension {
        return image.clone();
    }
    let (new_width, new_height) = if width > height {
        (dimension, (height as u64 * dimension as u64 / width as u64).max(1) as u32)
    } else {
        ((width as u64 * dimension as u64 / height as u64).max(1) as u32, dimension)
    };
    image::imageops::resize(image, new_width, new_height, FilterType::Lanczos3)
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, BizErrorEnum> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| {
            tracing::error!("Failed to encode jpeg: {:?}", e);
            BizErrorEnum::EncodeImageError(e)
        })?;
    Ok(buffer)
}

/// `img-hero.png` -> `img-hero.jpg`
fn jpeg_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => format!("{}.jpg", stem),
        None => format!("{}.jpg", name),
    }
}
