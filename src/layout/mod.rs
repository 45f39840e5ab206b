use ab_glyph::{FontVec, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("decode: {0}")]
    Decode(image::ImageError),

    #[error("encode: {0}")]
    Encode(image::ImageError),

    #[error("font: {0}")]
    Font(String),
}

/// Geometry derived from the source image dimensions. Font sizes scale with
/// width, text bands sit at fixed fractions of the height, and the logo
/// occupies a sixth of the width in the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub width: u32,
    pub height: u32,
    pub title_px: f32,
    pub description_px: f32,
    pub title_y: i32,
    pub description_y: i32,
    pub logo_size: u32,
    pub logo_margin: i64,
}

impl LayoutPlan {
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            title_px: (width / 15) as f32,
            description_px: (width / 25) as f32,
            title_y: (height as f32 * 0.4) as i32,
            description_y: (height as f32 * 0.55) as i32,
            logo_size: (width / 6).max(1),
            logo_margin: (width / 40) as i64,
        }
    }
}

pub fn load_font(path: &str) -> Result<FontVec, LayoutError> {
    let bytes = std::fs::read(path)
        .map_err(|e| LayoutError::Font(format!("cannot read {}: {}", path, e)))?;
    FontVec::try_from_vec(bytes).map_err(|e| LayoutError::Font(format!("invalid font: {}", e)))
}

/// Compose the overlay: scrim, centred title and description, circular logo.
/// Returns JPEG bytes ready for upload.
pub fn compose(
    source_bytes: &[u8],
    logo_bytes: &[u8],
    title: &str,
    description: &str,
    font: &FontVec,
    jpeg_quality: u8,
) -> Result<Vec<u8>, LayoutError> {
    let source = image::load_from_memory(source_bytes).map_err(LayoutError::Decode)?;
    let mut canvas = source.to_rgba8();
    let plan = LayoutPlan::for_dimensions(canvas.width(), canvas.height());

    apply_scrim(&mut canvas, 0.4);

    draw_centered_text(&mut canvas, font, title, plan.title_px, plan.title_y, 3);
    draw_centered_text(
        &mut canvas,
        font,
        description,
        plan.description_px,
        plan.description_y,
        2,
    );

    let logo = circular_logo(logo_bytes, plan.logo_size)?;
    imageops::overlay(&mut canvas, &logo, plan.logo_margin, plan.logo_margin);

    encode_jpeg(canvas, jpeg_quality)
}

/// Darken the whole frame toward black so white overlay text stays readable
fn apply_scrim(canvas: &mut RgbaImage, opacity: f32) {
    let keep = 1.0 - opacity.clamp(0.0, 1.0);
    for pixel in canvas.pixels_mut() {
        for channel in 0..3 {
            pixel[channel] = (pixel[channel] as f32 * keep) as u8;
        }
    }
}

/// White text with a dark outline, centred horizontally, `y` being the top
/// of the text band
fn draw_centered_text(
    canvas: &mut RgbaImage,
    font: &FontVec,
    text: &str,
    font_px: f32,
    y: i32,
    stroke_px: i32,
) {
    if text.is_empty() {
        return;
    }
    let scale = PxScale::from(font_px);
    let (text_w, _) = text_size(scale, font, text);
    let x = (canvas.width().saturating_sub(text_w) / 2) as i32;

    let outline = Rgba([0u8, 0, 0, 255]);
    for (dx, dy) in [(-stroke_px, 0), (stroke_px, 0), (0, -stroke_px), (0, stroke_px)] {
        draw_text_mut(canvas, outline, x + dx, y + dy, scale, font, text);
    }
    draw_text_mut(canvas, Rgba([255u8, 255, 255, 255]), x, y, scale, font, text);
}

/// Resize the logo to a square and mask everything outside the inscribed
/// circle transparent
fn circular_logo(logo_bytes: &[u8], size: u32) -> Result<RgbaImage, LayoutError> {
    let logo = image::load_from_memory(logo_bytes).map_err(LayoutError::Decode)?;
    let mut logo = imageops::resize(&logo.to_rgba8(), size, size, FilterType::Lanczos3);
    apply_circle_mask(&mut logo);
    Ok(logo)
}

fn apply_circle_mask(img: &mut RgbaImage) {
    let size = img.width().min(img.height());
    let center = size as f32 / 2.0;
    let radius = center;
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        if dx * dx + dy * dy > radius * radius {
            pixel[3] = 0;
        }
    }
}

fn encode_jpeg(canvas: RgbaImage, quality: u8) -> Result<Vec<u8>, LayoutError> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(&rgb)
        .map_err(LayoutError::Encode)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_scales_with_dimensions() {
        let plan = LayoutPlan::for_dimensions(800, 600);
        assert_eq!(plan.title_px, 53.0);
        assert_eq!(plan.description_px, 32.0);
        assert_eq!(plan.title_y, 240);
        assert_eq!(plan.description_y, 330);
        assert_eq!(plan.logo_size, 133);
        assert_eq!(plan.logo_margin, 20);
    }

    #[test]
    fn plan_never_produces_zero_logo() {
        let plan = LayoutPlan::for_dimensions(4, 4);
        assert!(plan.logo_size >= 1);
    }

    #[test]
    fn scrim_darkens_but_keeps_alpha() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255]));
        apply_scrim(&mut img, 0.4);
        let p = img.get_pixel(0, 0);
        assert_eq!(p[0], 120);
        assert_eq!(p[1], 60);
        assert_eq!(p[2], 30);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn circle_mask_clears_corners_keeps_center() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        apply_circle_mask(&mut img);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(9, 9)[3], 0);
        assert_eq!(img.get_pixel(5, 5)[3], 255);
    }

    #[test]
    fn jpeg_encoding_produces_jfif_bytes() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        let bytes = encode_jpeg(img, 90).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
