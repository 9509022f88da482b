//! Skin tone and undertone classification.

use crate::color::relative_luminance;
use crate::sampler::CheekSamples;
use crate::types::{RgbSample, SkinAnalysis, Tone, Undertone};

/// Used when neither cheek yields a qualifying pixel.
pub const DEFAULT_SKIN_SAMPLE: RgbSample = RgbSample::new(180, 140, 120);

// Luminance bucket edges.
const LIGHT_MIN_LUMINANCE: f64 = 0.70;
const MEDIUM_MIN_LUMINANCE: f64 = 0.45;

// Red/blue imbalance needed for a warm or cool call. Empirical.
const WARM_MIN_RED_BLUE: f64 = 0.12;
const COOL_MIN_BLUE_RED: f64 = 0.10;

/// Merge the two cheek samples into one.
///
/// Mean of both when present, the single one otherwise, and
/// [`DEFAULT_SKIN_SAMPLE`] when neither cheek produced a sample.
pub fn combine(samples: &CheekSamples) -> RgbSample {
    match (samples.left, samples.right) {
        (Some(a), Some(b)) => {
            let mean = |x: u8, y: u8| ((x as f64 + y as f64) / 2.0).round() as u8;
            RgbSample::new(mean(a.r, b.r), mean(a.g, b.g), mean(a.b, b.b))
        }
        (Some(s), None) | (None, Some(s)) => s,
        (None, None) => {
            tracing::debug!("no qualifying skin pixels in either cheek; using default sample");
            DEFAULT_SKIN_SAMPLE
        }
    }
}

pub fn tone_for_luminance(y: f64) -> Tone {
    if y >= LIGHT_MIN_LUMINANCE {
        Tone::Light
    } else if y >= MEDIUM_MIN_LUMINANCE {
        Tone::Medium
    } else {
        Tone::Deep
    }
}

pub fn undertone_for(sample: RgbSample) -> Undertone {
    let r = sample.r as f64;
    let b = sample.b as f64;
    let red_blue = (r - b) / 255.0;
    let blue_red = (b - r) / 255.0;

    if red_blue > WARM_MIN_RED_BLUE && sample.g >= sample.b {
        Undertone::Warm
    } else if blue_red > COOL_MIN_BLUE_RED {
        Undertone::Cool
    } else {
        Undertone::Neutral
    }
}

/// Classify one colour sample.
pub fn classify(sample: RgbSample) -> SkinAnalysis {
    let luminance = relative_luminance(sample);
    let analysis = SkinAnalysis {
        rgb: sample,
        hex: sample.hex(),
        tone: tone_for_luminance(luminance),
        undertone: undertone_for(sample),
    };
    tracing::debug!(
        hex = %analysis.hex,
        luminance,
        tone = %analysis.tone,
        undertone = %analysis.undertone,
        "skin classified"
    );
    analysis
}

/// Combine cheek samples and classify the result.
pub fn classify_cheeks(samples: &CheekSamples) -> SkinAnalysis {
    classify(combine(samples))
}
