use crate::RawImage;
use image::{imageops, RgbImage};

/// Per-channel histogram equalization, the contrast normalization step
/// of the augmentation pipeline.
pub fn equalize_contrast(image: &RawImage) -> RawImage {
    let (width, height) = image.get_size();
    let total = width as f32 * height as f32;

    let mut histogram = [[0u32; 256]; 3];
    for pixel in image.inner.pixels() {
        for channel in 0..3 {
            histogram[channel][pixel[channel] as usize] += 1;
        }
    }

    let mut lut = [[0u8; 256]; 3];
    for channel in 0..3 {
        // Anchor the lowest occupied bin at 0, as equalizeHist does, so
        // black padding frames stay black.
        let cdf_min = histogram[channel]
            .iter()
            .copied()
            .find(|&count| count > 0)
            .unwrap_or(0) as f32;
        let range = total - cdf_min;

        let mut cumulative = 0u32;
        for value in 0..256 {
            cumulative += histogram[channel][value];
            lut[channel][value] = if range > 0.0 {
                (((cumulative as f32 - cdf_min) / range) * 255.0).round() as u8
            } else {
                // Single-valued channel, nothing to stretch.
                value as u8
            };
        }
    }

    let mut output = image.inner.clone();
    for pixel in output.pixels_mut() {
        for channel in 0..3 {
            pixel[channel] = lut[channel][pixel[channel] as usize];
        }
    }

    RawImage::from_rgb(output)
}

pub fn adjust_gamma(image: &RawImage, gamma: f32) -> RawImage {
    let mut lut = [0u8; 256];
    for (value, entry) in lut.iter_mut().enumerate() {
        let normalized = value as f32 / 255.0;
        *entry = (normalized.powf(gamma) * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    let mut output = image.inner.clone();
    for pixel in output.pixels_mut() {
        for channel in 0..3 {
            pixel[channel] = lut[pixel[channel] as usize];
        }
    }

    RawImage::from_rgb(output)
}

/// Centers the image on a black canvas of at least `min_width` x
/// `min_height`. Images already large enough pass through unchanged.
pub fn pad_to_min(image: &RawImage, min_width: u32, min_height: u32) -> RawImage {
    let (width, height) = image.get_size();
    if width >= min_width && height >= min_height {
        return image.clone();
    }

    let out_width = width.max(min_width);
    let out_height = height.max(min_height);
    let left = (out_width - width) / 2;
    let top = (out_height - height) / 2;

    let mut canvas = RgbImage::new(out_width, out_height);
    imageops::replace(&mut canvas, &image.inner, left as i64, top as i64);

    RawImage::from_rgb(canvas)
}

pub fn center_crop(image: &RawImage, crop_width: u32, crop_height: u32) -> RawImage {
    let (width, height) = image.get_size();
    let crop_width = crop_width.min(width);
    let crop_height = crop_height.min(height);
    let left = (width - crop_width) / 2;
    let top = (height - crop_height) / 2;

    let cropped = imageops::crop_imm(&image.inner, left, top, crop_width, crop_height);
    RawImage::from_rgb(cropped.to_image())
}

pub fn flip_horizontal(image: &RawImage) -> RawImage {
    RawImage::from_rgb(imageops::flip_horizontal(&image.inner))
}

pub fn flip_vertical(image: &RawImage) -> RawImage {
    RawImage::from_rgb(imageops::flip_vertical(&image.inner))
}

/// Rotates about the image center, bilinear sampling, black fill
/// outside the source frame. Output keeps the input size.
pub fn rotate(image: &RawImage, angle_deg: f32) -> RawImage {
    let (width, height) = image.get_size();
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let center_x = (width as f32 - 1.0) * 0.5;
    let center_y = (height as f32 - 1.0) * 0.5;

    let mut output = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            // Inverse mapping: where in the source does this output pixel land?
            let dx = x as f32 - center_x;
            let dy = y as f32 - center_y;
            let source_x = cos * dx + sin * dy + center_x;
            let source_y = -sin * dx + cos * dy + center_y;

            if source_x < 0.0
                || source_y < 0.0
                || source_x > (width - 1) as f32
                || source_y > (height - 1) as f32
            {
                continue;
            }

            let x0 = source_x.floor() as u32;
            let x1 = source_x.ceil() as u32;
            let y0 = source_y.floor() as u32;
            let y1 = source_y.ceil() as u32;

            let wx = source_x - x0 as f32;
            let wy = source_y - y0 as f32;

            let mut pixel = [0u8; 3];
            for channel in 0..3 {
                let p00 = image.inner.get_pixel(x0, y0)[channel] as f32;
                let p01 = image.inner.get_pixel(x1, y0)[channel] as f32;
                let p10 = image.inner.get_pixel(x0, y1)[channel] as f32;
                let p11 = image.inner.get_pixel(x1, y1)[channel] as f32;

                let interpolated = p00 * (1.0 - wx) * (1.0 - wy)
                    + p01 * wx * (1.0 - wy)
                    + p10 * (1.0 - wx) * wy
                    + p11 * wx * wy;

                pixel[channel] = interpolated.round().clamp(0.0, 255.0) as u8;
            }
            output.put_pixel(x, y, image::Rgb(pixel));
        }
    }

    RawImage::from_rgb(output)
}
