//! End-to-end flow for one photo: primary face → cheeks → skin → outfit.

use crate::recommend::{RecommendationRequest, Recommender};
use crate::sampler::{cheek_regions, sample_cheeks, CheekRegions, CheekSamples, PixelSource};
use crate::selector::{select_primary_index, SelectError};
use crate::tone::classify_cheeks;
use crate::types::{
    BoundingBox, Detection, OutfitSuggestion, PersonAttributes, Season, SkinAnalysis,
};
use serde::{Deserialize, Serialize};

/// Everything derived from one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleReport {
    /// Index of the primary face in the detections passed in.
    pub primary_index: usize,
    pub primary: Detection,
    pub cheeks: CheekRegions,
    pub samples: CheekSamples,
    pub skin: SkinAnalysis,
    pub person: PersonAttributes,
    pub season: Season,
    pub outfit: OutfitSuggestion,
}

/// The primary face and its skin estimate, before any outfit is chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAnalysis {
    pub primary_index: usize,
    pub primary: Detection,
    pub cheeks: CheekRegions,
    pub samples: CheekSamples,
    pub skin: SkinAnalysis,
}

impl FaceAnalysis {
    /// Attach the person, season and chosen outfit.
    pub fn into_report(
        self,
        person: PersonAttributes,
        season: Season,
        outfit: OutfitSuggestion,
    ) -> StyleReport {
        StyleReport {
            primary_index: self.primary_index,
            primary: self.primary,
            cheeks: self.cheeks,
            samples: self.samples,
            skin: self.skin,
            person,
            season,
            outfit,
        }
    }
}

/// Skin analysis for a single face box.
pub fn analyze_skin<P: PixelSource + ?Sized>(face: &BoundingBox, pixels: &P) -> SkinAnalysis {
    let regions = cheek_regions(face);
    classify_cheeks(&sample_cheeks(pixels, &regions))
}

/// Pick the primary face and estimate its skin colour.
pub fn analyze_primary<P: PixelSource + ?Sized>(
    detections: &[Detection],
    pixels: &P,
) -> Result<FaceAnalysis, SelectError> {
    let primary_index = select_primary_index(detections)?;
    let primary = detections[primary_index].clone();

    let cheeks = cheek_regions(&primary.bbox);
    let samples = sample_cheeks(pixels, &cheeks);
    let skin = classify_cheeks(&samples);

    tracing::info!(
        faces = detections.len(),
        primary = primary_index,
        hex = %skin.hex,
        tone = %skin.tone,
        undertone = %skin.undertone,
        "photo analyzed"
    );

    Ok(FaceAnalysis {
        primary_index,
        primary,
        cheeks,
        samples,
        skin,
    })
}

/// Runs the whole pipeline with a fixed recommender.
#[derive(Debug, Clone, Default)]
pub struct Stylist {
    recommender: Recommender,
}

impl Stylist {
    pub fn new(recommender: Recommender) -> Self {
        Self { recommender }
    }

    pub fn analyze<P: PixelSource + ?Sized>(
        &self,
        detections: &[Detection],
        pixels: &P,
        season: Season,
        person: &PersonAttributes,
    ) -> Result<StyleReport, SelectError> {
        let face = analyze_primary(detections, pixels)?;
        let outfit = self.recommender.recommend(&RecommendationRequest {
            season,
            undertone: face.skin.undertone,
            tone: face.skin.tone,
            gender: person.gender.clone(),
        });
        Ok(face.into_report(person.clone(), season, outfit))
    }
}
