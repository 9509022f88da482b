//! Human-readable and JSON rendering of results.

use crate::remote::SuggestionSource;
use serde::Serialize;
use std::fmt::Write;
use stylist_core::{
    Detection, OutfitSuggestion, PersonAttributes, Season, SkinAnalysis, StyleReport,
};

/// JSON shape printed by `stylist analyze --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput<'a> {
    pub faces: usize,
    pub primary: &'a Detection,
    pub skin: &'a SkinAnalysis,
    pub person: &'a PersonAttributes,
    pub season: Season,
    pub outfit: &'a OutfitSuggestion,
    pub source: SuggestionSource,
}

impl<'a> AnalysisOutput<'a> {
    pub fn new(report: &'a StyleReport, faces: usize, source: SuggestionSource) -> Self {
        Self {
            faces,
            primary: &report.primary,
            skin: &report.skin,
            person: &report.person,
            season: report.season,
            outfit: &report.outfit,
            source,
        }
    }
}

pub fn render_skin(skin: &SkinAnalysis) -> String {
    format!(
        "Skin: {} (rgb {}, {}, {}) tone={} undertone={}\n",
        skin.hex, skin.rgb.r, skin.rgb.g, skin.rgb.b, skin.tone, skin.undertone
    )
}

pub fn render_outfit(outfit: &OutfitSuggestion) -> String {
    let mut out = String::new();
    let slots = [
        ("Headwear", &outfit.headwear),
        ("Top", &outfit.top),
        ("Midlayer", &outfit.midlayer),
        ("Bottoms", &outfit.bottoms),
        ("Footwear", &outfit.footwear),
        ("Accessories", &outfit.accessories),
    ];
    for (name, value) in slots {
        let _ = writeln!(out, "  {name:<12}{value}");
    }
    let p = &outfit.palette;
    let _ = writeln!(
        out,
        "  {:<12}primary {}  accent {}  neutral {}",
        "Palette", p.primary, p.accent, p.neutral
    );
    if let Some(rationale) = &outfit.rationale {
        let _ = writeln!(out, "  {rationale}");
    }
    out
}

pub fn render_analysis(output: &AnalysisOutput<'_>) -> String {
    let mut out = String::new();
    let b = &output.primary.bbox;
    let _ = writeln!(
        out,
        "Faces: {} (primary {:.0}x{:.0} at {:.0},{:.0}, score {:.2})",
        output.faces, b.width, b.height, b.x, b.y, output.primary.score
    );
    let person = output.person;
    let _ = writeln!(
        out,
        "Person: age {}, {} ({:.0}%)",
        person.age,
        person.gender,
        person.gender_confidence * 100.0
    );
    out.push_str(&render_skin(output.skin));
    let source = match output.source {
        SuggestionSource::Remote => "remote",
        SuggestionSource::Local => "local",
    };
    let _ = writeln!(out, "Outfit for {} ({source}):", output.season);
    out.push_str(&render_outfit(output.outfit));
    out
}
