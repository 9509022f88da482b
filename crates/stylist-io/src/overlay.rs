//! Debug overlay: face boxes and sampled cheek regions drawn over the photo.

use crate::frame::Frame;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;
use stylist_core::{BoundingBox, CheekRegions, Detection};

const PRIMARY_COLOR: Rgba<u8> = Rgba([0, 220, 90, 255]);
const SECONDARY_COLOR: Rgba<u8> = Rgba([160, 160, 160, 255]);
const CHEEK_COLOR: Rgba<u8> = Rgba([255, 140, 0, 255]);

/// Stroke width of the primary face box, in pixels.
const PRIMARY_STROKE: i32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("cannot write overlay {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Convert a float box to a drawable rect, or `None` if it is empty.
fn to_rect(bbox: &BoundingBox) -> Option<Rect> {
    let w = bbox.width.round() as u32;
    let h = bbox.height.round() as u32;
    if w == 0 || h == 0 {
        return None;
    }
    Some(Rect::at(bbox.x.round() as i32, bbox.y.round() as i32).of_size(w, h))
}

/// Draw a rectangle `stroke` pixels thick, growing inwards.
fn draw_box(img: &mut RgbaImage, bbox: &BoundingBox, color: Rgba<u8>, stroke: i32) {
    for inset in 0..stroke {
        let inner = BoundingBox::new(
            bbox.x + inset as f32,
            bbox.y + inset as f32,
            bbox.width - 2.0 * inset as f32,
            bbox.height - 2.0 * inset as f32,
        );
        if let Some(rect) = to_rect(&inner) {
            draw_hollow_rect_mut(img, rect, color);
        }
    }
}

/// Render every detection (primary highlighted) and the primary's cheek regions.
pub fn render_overlay(
    frame: &Frame,
    detections: &[Detection],
    primary: usize,
    cheeks: &CheekRegions,
) -> RgbaImage {
    let mut img = frame.to_image();

    for (i, det) in detections.iter().enumerate() {
        if i != primary {
            draw_box(&mut img, &det.bbox, SECONDARY_COLOR, 1);
        }
    }
    if let Some(det) = detections.get(primary) {
        draw_box(&mut img, &det.bbox, PRIMARY_COLOR, PRIMARY_STROKE);
    }
    draw_box(&mut img, &cheeks.left, CHEEK_COLOR, 1);
    draw_box(&mut img, &cheeks.right, CHEEK_COLOR, 1);

    img
}

/// Save an overlay; the format follows the file extension.
pub fn save_overlay(img: &RgbaImage, path: impl AsRef<Path>) -> Result<(), OverlayError> {
    let path = path.as_ref();
    img.save(path).map_err(|source| OverlayError::Save {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), "overlay written");
    Ok(())
}
