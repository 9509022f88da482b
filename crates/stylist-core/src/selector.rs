//! Primary face selection.

use crate::types::Detection;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("no face found in the photo; try a clearer, front-facing picture")]
    NoFaceFound,
}

/// Pick the detection with the largest box area.
///
/// Ties keep the earliest detection.
pub fn select_primary(detections: &[Detection]) -> Result<&Detection, SelectError> {
    let mut iter = detections.iter();
    let first = iter.next().ok_or(SelectError::NoFaceFound)?;

    let primary = iter.fold(first, |best, d| {
        if d.bbox.area() > best.bbox.area() {
            d
        } else {
            best
        }
    });

    tracing::debug!(
        candidates = detections.len(),
        area = primary.bbox.area(),
        score = primary.score,
        "primary face selected"
    );
    Ok(primary)
}

/// Index of the primary face within `detections`.
pub fn select_primary_index(detections: &[Detection]) -> Result<usize, SelectError> {
    let primary = select_primary(detections)?;
    Ok(detections
        .iter()
        .position(|d| std::ptr::eq(d, primary))
        .unwrap_or(0))
}
