//! Cheek-region sampling.
//!
//! Two fixed sub-rectangles of the face box are read from the pixel source.
//! Pixels that are translucent, strongly saturated (lips, eyes, makeup) or
//! outside a lightness band (specular highlights, deep shadow) are dropped,
//! and the rest are averaged per channel.

use crate::color::rgb_to_hsl;
use crate::types::{BoundingBox, RgbSample};
use serde::{Deserialize, Serialize};

// Cheek placement as fractions of the face box.
const LEFT_CHEEK_X: f32 = 0.18;
const RIGHT_CHEEK_X: f32 = 0.66;
const CHEEK_Y: f32 = 0.44;
const CHEEK_WIDTH: f32 = 0.16;
const CHEEK_HEIGHT: f32 = 0.12;

// Pixel rejection bounds. Empirical; see DESIGN.md before changing.
const MIN_ALPHA: u8 = 200;
const MAX_SATURATION: f64 = 0.6;
const MIN_LIGHTNESS: f64 = 0.15;
const MAX_LIGHTNESS: f64 = 0.95;

/// Read access to an RGBA, row-major pixel buffer.
pub trait PixelSource {
    /// (width, height) in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// RGBA value at (x, y). Callers stay within `dimensions()`.
    fn pixel(&self, x: u32, y: u32) -> [u8; 4];
}

/// Left and right cheek rectangles, in the face box's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheekRegions {
    pub left: BoundingBox,
    pub right: BoundingBox,
}

/// Averaged colour of each cheek; either may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CheekSamples {
    pub left: Option<RgbSample>,
    pub right: Option<RgbSample>,
}

/// Derive both cheek rectangles from a face box.
pub fn cheek_regions(face: &BoundingBox) -> CheekRegions {
    let w = CHEEK_WIDTH * face.width;
    let h = CHEEK_HEIGHT * face.height;
    let y = face.y + CHEEK_Y * face.height;
    CheekRegions {
        left: BoundingBox::new(face.x + LEFT_CHEEK_X * face.width, y, w, h),
        right: BoundingBox::new(face.x + RIGHT_CHEEK_X * face.width, y, w, h),
    }
}

/// Whether a pixel counts as skin for averaging.
pub fn is_skin_pixel(rgba: [u8; 4]) -> bool {
    let [r, g, b, a] = rgba;
    if a < MIN_ALPHA {
        return false;
    }
    let hsl = rgb_to_hsl(r, g, b);
    !(hsl.s > MAX_SATURATION || hsl.l < MIN_LIGHTNESS || hsl.l > MAX_LIGHTNESS)
}

/// Average the qualifying pixels inside `rect`.
///
/// The rectangle is truncated to whole pixels and clipped to the source.
/// Returns `None` when no pixel qualifies.
pub fn sample_region<P: PixelSource + ?Sized>(
    pixels: &P,
    rect: &BoundingBox,
) -> Option<RgbSample> {
    let (width, height) = pixels.dimensions();

    // Edges are clipped while still floats; any box, however large, maps to
    // an in-bounds pixel range.
    let clip = |v: f32, limit: u32| v.clamp(0.0, limit as f32) as u32;
    let x0 = rect.x.trunc();
    let y0 = rect.y.trunc();
    let xs = clip(x0, width)..clip(x0 + rect.width.trunc(), width);
    let ys = clip(y0, height)..clip(y0 + rect.height.trunc(), height);

    let mut sum = [0u64; 3];
    let mut count = 0u64;

    for y in ys {
        for x in xs.clone() {
            let px = pixels.pixel(x, y);
            if !is_skin_pixel(px) {
                continue;
            }
            sum[0] += px[0] as u64;
            sum[1] += px[1] as u64;
            sum[2] += px[2] as u64;
            count += 1;
        }
    }

    tracing::trace!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        accepted = count,
        "region sampled"
    );

    if count == 0 {
        return None;
    }

    let mean = |s: u64| (s as f64 / count as f64).round() as u8;
    Some(RgbSample::new(mean(sum[0]), mean(sum[1]), mean(sum[2])))
}

/// Sample both cheeks of a face.
pub fn sample_cheeks<P: PixelSource + ?Sized>(
    pixels: &P,
    regions: &CheekRegions,
) -> CheekSamples {
    CheekSamples {
        left: sample_region(pixels, &regions.left),
        right: sample_region(pixels, &regions.right),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal in-memory RGBA buffer for tests.
    pub(crate) struct TestImage {
        pub width: u32,
        pub height: u32,
        pub data: Vec<u8>,
    }

    impl TestImage {
        pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
            let data = rgba
                .iter()
                .copied()
                .cycle()
                .take((width * height * 4) as usize)
                .collect();
            Self { width, height, data }
        }

        pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
            let i = ((y * self.width + x) * 4) as usize;
            self.data[i..i + 4].copy_from_slice(&rgba);
        }
    }

    impl PixelSource for TestImage {
        fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
            let i = ((y * self.width + x) * 4) as usize;
            [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
        }
    }

    const SKIN: [u8; 4] = [200, 150, 120, 255];

    #[test]
    fn test_cheek_regions_fractions() {
        let close = |a: &BoundingBox, b: [f32; 4]| {
            [a.x, a.y, a.width, a.height]
                .iter()
                .zip(b.iter())
                .all(|(x, y)| (x - y).abs() < 1e-3)
        };
        let regions = cheek_regions(&BoundingBox::new(100.0, 50.0, 200.0, 100.0));
        assert!(close(&regions.left, [136.0, 94.0, 32.0, 12.0]), "{:?}", regions.left);
        assert!(close(&regions.right, [232.0, 94.0, 32.0, 12.0]), "{:?}", regions.right);
    }

    #[test]
    fn test_skin_pixel_filter() {
        assert!(is_skin_pixel(SKIN));
        // translucent
        assert!(!is_skin_pixel([200, 150, 120, 199]));
        // saturated red (lips)
        assert!(!is_skin_pixel([220, 20, 40, 255]));
        // shadow
        assert!(!is_skin_pixel([20, 20, 20, 255]));
        // highlight
        assert!(!is_skin_pixel([250, 250, 250, 255]));
        // alpha exactly at the bound is kept
        assert!(is_skin_pixel([200, 150, 120, 200]));
    }

    #[test]
    fn test_uniform_region_average() {
        let img = TestImage::filled(20, 20, SKIN);
        let s = sample_region(&img, &BoundingBox::new(2.0, 2.0, 5.0, 5.0));
        assert_eq!(s, Some(RgbSample::new(200, 150, 120)));
    }

    #[test]
    fn test_outliers_excluded_from_mean() {
        let mut img = TestImage::filled(10, 10, [180, 140, 120, 255]);
        // Two qualifying pixels of a different colour, plus outliers of every kind.
        img.set(0, 0, [190, 150, 131, 255]);
        img.set(1, 0, [255, 0, 0, 255]);
        img.set(2, 0, [5, 5, 5, 255]);
        img.set(3, 0, [252, 252, 252, 255]);
        img.set(0, 1, [0, 0, 0, 0]);
        img.set(1, 1, [190, 150, 131, 255]);

        // 4x2 region: 2 odd pixels qualify, 4 outliers, 2 plain pixels.
        let s = sample_region(&img, &BoundingBox::new(0.0, 0.0, 4.0, 2.0)).unwrap();
        // (190*2 + 180*2) / 4 = 185, (150*2 + 140*2) / 4 = 145, (131*2 + 120*2) / 4 = 125.5 → 126
        assert_eq!(s, RgbSample::new(185, 145, 126));
    }

    #[test]
    fn test_no_qualifying_pixels_is_none() {
        let img = TestImage::filled(10, 10, [0, 0, 0, 255]);
        assert_eq!(sample_region(&img, &BoundingBox::new(0.0, 0.0, 5.0, 5.0)), None);
    }

    #[test]
    fn test_fractional_rect_truncates() {
        let mut img = TestImage::filled(10, 10, [0, 0, 0, 255]);
        img.set(1, 1, SKIN);
        // x 1.9 → 1, width 0.9 → 0: empty region.
        assert_eq!(sample_region(&img, &BoundingBox::new(1.9, 1.0, 0.9, 1.0)), None);
        // x 1.9 → 1, width 1.5 → 1: exactly pixel (1, 1).
        assert_eq!(
            sample_region(&img, &BoundingBox::new(1.9, 1.2, 1.5, 1.7)),
            Some(RgbSample::new(200, 150, 120))
        );
    }

    #[test]
    fn test_region_clipped_to_buffer() {
        let img = TestImage::filled(4, 4, SKIN);
        let s = sample_region(&img, &BoundingBox::new(-2.0, 2.0, 10.0, 10.0));
        assert_eq!(s, Some(RgbSample::new(200, 150, 120)));
        assert_eq!(sample_region(&img, &BoundingBox::new(10.0, 10.0, 5.0, 5.0)), None);
    }

    #[test]
    fn test_oversized_rect_is_clipped() {
        let img = TestImage::filled(4, 4, SKIN);
        let huge = BoundingBox::new(0.0, 0.0, f32::MAX, f32::MAX);
        assert_eq!(sample_region(&img, &huge), Some(RgbSample::new(200, 150, 120)));
        let far = BoundingBox::new(f32::MAX, -f32::MAX, f32::MAX, f32::MAX);
        assert_eq!(sample_region(&img, &far), None);
        let nan = BoundingBox::new(f32::NAN, 0.0, 2.0, 2.0);
        assert_eq!(sample_region(&img, &nan), None);
    }

    #[test]
    fn test_sample_cheeks_independent() {
        let mut img = TestImage::filled(100, 100, [0, 0, 0, 255]);
        let regions = cheek_regions(&BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        // Paint only the right cheek with skin.
        for y in 44..56 {
            for x in 66..82 {
                img.set(x, y, SKIN);
            }
        }
        let samples = sample_cheeks(&img, &regions);
        assert_eq!(samples.left, None);
        assert_eq!(samples.right, Some(RgbSample::new(200, 150, 120)));
    }

    #[test]
    fn test_input_not_mutated() {
        let img = TestImage::filled(8, 8, SKIN);
        let before = img.data.clone();
        let _ = sample_region(&img, &BoundingBox::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(img.data, before);
    }
}
