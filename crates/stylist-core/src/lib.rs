//! stylist-core — Skin tone estimation and outfit lookup for a single photo.
//!
//! Consumes face detections produced elsewhere, samples the primary face's
//! cheeks from an RGBA pixel source, buckets the averaged colour into a tone
//! and undertone, and looks up a season-keyed outfit with a matching palette.

pub mod color;
pub mod pipeline;
pub mod recommend;
pub mod sampler;
pub mod selector;
pub mod tone;
pub mod types;

pub use pipeline::{analyze_primary, analyze_skin, FaceAnalysis, StyleReport, Stylist};
pub use recommend::{PaletteTable, RecommendationRequest, Recommender};
pub use sampler::{CheekRegions, CheekSamples, PixelSource};
pub use selector::{select_primary, SelectError};
pub use types::{
    BoundingBox, Detection, OutfitSuggestion, Palette, PersonAttributes, RgbSample, Season,
    SkinAnalysis, Tone, Undertone,
};
