//! Image preparation for the scan model.
//!
//! The model was trained on grayscale scans loaded at a fixed size with
//! nearest-neighbour sampling and scaled to `[0, 1]`. Input is NHWC with a
//! single channel.

use image::{imageops::FilterType, DynamicImage, GrayImage, Luma};
use ndarray::Array4;

pub const DEFAULT_HEIGHT: u32 = 180;
pub const DEFAULT_WIDTH: u32 = 180;

/// ITU-R 601-2 luma in 16-bit fixed point, rounded to nearest like PIL's `convert("L")`.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (x, y, pixel) in rgb.enumerate_pixels() {
        gray.put_pixel(x, y, Luma([luma(pixel[0], pixel[1], pixel[2])]));
    }
    gray
}

/// Builds the `(1, height, width, 1)` input tensor for `image`.
pub fn to_input_tensor(image: &DynamicImage, height: u32, width: u32) -> Array4<f32> {
    let gray = to_grayscale(image);
    let resized = image::imageops::resize(&gray, width, height, FilterType::Nearest);

    Array4::from_shape_fn(
        (1, height as usize, width as usize, 1),
        |(_, y, x, _)| resized[(x as u32, y as u32)][0] as f32 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn tensor_has_model_shape() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let tensor = to_input_tensor(&image, DEFAULT_HEIGHT, DEFAULT_WIDTH);
        assert_eq!(tensor.shape(), &[1, 180, 180, 1]);
    }

    #[test]
    fn values_are_scaled_to_unit_range() {
        let mut rgb = RgbImage::new(32, 32);
        for (x, y, pixel) in rgb.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 8) as u8, (y * 8) as u8, 255]);
        }
        let tensor = to_input_tensor(&DynamicImage::ImageRgb8(rgb), 16, 16);
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn white_maps_to_one_and_black_to_zero() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])));
        let tensor = to_input_tensor(&white, 2, 2);
        assert!(tensor.iter().all(|v| (*v - 1.0).abs() < 1e-6));

        let black = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let tensor = to_input_tensor(&black, 2, 2);
        assert!(tensor.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn grayscale_uses_601_weights() {
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
        assert_eq!(luma(255, 255, 255), 255);
    }

    #[test]
    fn grayscale_rounds_to_nearest() {
        // 100*299 + 150*587 + 200*114 = 140750, i.e. 140.75 before rounding
        assert_eq!(luma(100, 150, 200), 141);
        assert_eq!(luma(1, 1, 1), 1);

        let rgb = RgbImage::from_pixel(1, 1, Rgb([0, 255, 0]));
        let gray = to_grayscale(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(gray.get_pixel(0, 0)[0], 150);
    }

    #[test]
    fn non_square_resize_is_exact() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(300, 100));
        let tensor = to_input_tensor(&image, 20, 40);
        assert_eq!(tensor.shape(), &[1, 20, 40, 1]);
    }
}
