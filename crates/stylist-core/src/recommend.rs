//! Rule-based outfit lookup keyed by season, undertone and tone.
//!
//! The palette table is a value owned by [`Recommender`] so callers can swap
//! it out (configuration, tests). Wardrobe templates are an explicit match
//! over every season.

use crate::types::{OutfitSuggestion, Palette, Season, Tone, Undertone};
use serde::{Deserialize, Serialize};

/// Base palette for each undertone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteTable {
    pub warm: Palette,
    pub cool: Palette,
    pub neutral: Palette,
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self {
            warm: Palette::new("#C8553D", "#F2A541", "#F4E9D8"),
            cool: Palette::new("#355C7D", "#6C5B7B", "#E5E5E5"),
            neutral: Palette::new("#5B7065", "#D9A5B3", "#EDE6DB"),
        }
    }
}

impl PaletteTable {
    pub fn for_undertone(&self, undertone: Undertone) -> &Palette {
        match undertone {
            Undertone::Warm => &self.warm,
            Undertone::Cool => &self.cool,
            Undertone::Neutral => &self.neutral,
        }
    }
}

/// Adjust a base palette for the season.
///
/// Summer and spring keep the base palette; the darker seasons swap in
/// deeper colours.
pub fn season_palette(season: Season, base: &Palette) -> Palette {
    let mut palette = base.clone();
    match season {
        Season::Summer | Season::Spring => {}
        Season::Rainy => {
            palette.primary = "#2F4858".to_string();
            palette.neutral = "#6B6E70".to_string();
        }
        Season::Autumn => {
            palette.accent = "#B5651D".to_string();
            palette.neutral = "#8B6F47".to_string();
        }
        Season::Winter => {
            palette.primary = "#1F2A44".to_string();
            palette.accent = "#8E1B2B".to_string();
            palette.neutral = "#3A3A3A".to_string();
        }
    }
    palette
}

/// The six clothing slots and the rationale, before a palette is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wardrobe {
    pub headwear: String,
    pub top: String,
    pub midlayer: String,
    pub bottoms: String,
    pub footwear: String,
    pub accessories: String,
    pub rationale: String,
}

impl Wardrobe {
    pub fn with_palette(self, palette: Palette) -> OutfitSuggestion {
        OutfitSuggestion {
            headwear: self.headwear,
            top: self.top,
            midlayer: self.midlayer,
            bottoms: self.bottoms,
            footwear: self.footwear,
            accessories: self.accessories,
            palette,
            rationale: Some(self.rationale),
        }
    }
}

/// Pick one of three strings by gender presentation.
fn by_gender<'a>(
    is_male: bool,
    is_female: bool,
    male: &'a str,
    female: &'a str,
    other: &'a str,
) -> &'a str {
    if is_male {
        male
    } else if is_female {
        female
    } else {
        other
    }
}

/// Wardrobe template for a season.
pub fn template(
    season: Season,
    is_male: bool,
    is_female: bool,
    tone: Tone,
    undertone: Undertone,
) -> Wardrobe {
    let pick = |m, f, o| by_gender(is_male, is_female, m, f, o).to_string();
    let colours = format!("a {tone} skin tone with {undertone} undertones");

    match season {
        Season::Summer => Wardrobe {
            headwear: "Wide-brim straw hat".to_string(),
            top: pick(
                "Linen short-sleeve shirt",
                "Cotton camisole or linen blouse",
                "Relaxed linen tee",
            ),
            midlayer: "None; keep it breathable".to_string(),
            bottoms: pick(
                "Chino shorts",
                "Flowy midi skirt",
                "Lightweight drawstring trousers",
            ),
            footwear: pick("Canvas sneakers", "Leather sandals", "Espadrilles"),
            accessories: "Sunglasses and a woven tote".to_string(),
            rationale: format!(
                "Light, breathable fabrics for summer heat, coloured to flatter {colours}."
            ),
        },
        Season::Spring => Wardrobe {
            headwear: "Baseball cap".to_string(),
            top: pick(
                "Oxford button-down",
                "Floral print blouse",
                "Striped long-sleeve tee",
            ),
            midlayer: pick(
                "Light bomber jacket",
                "Cropped denim jacket",
                "Cotton overshirt",
            ),
            bottoms: pick("Slim chinos", "Straight-leg jeans", "Relaxed chinos"),
            footwear: pick("White leather sneakers", "Ballet flats", "Low-top sneakers"),
            accessories: "Canvas watch strap and a light scarf".to_string(),
            rationale: format!(
                "Layerable pieces for changeable spring days, coloured to flatter {colours}."
            ),
        },
        Season::Rainy => Wardrobe {
            headwear: "Waterproof bucket hat".to_string(),
            top: pick("Quick-dry polo", "Quick-dry blouse", "Quick-dry tee"),
            midlayer: pick(
                "Hooded rain shell",
                "Belted trench coat",
                "Packable rain jacket",
            ),
            bottoms: pick(
                "Water-resistant joggers",
                "Cropped trousers",
                "Water-resistant joggers",
            ),
            footwear: pick(
                "Rubber-soled boots",
                "Ankle rain boots",
                "Waterproof sneakers",
            ),
            accessories: "Compact umbrella and a dry bag".to_string(),
            rationale: format!(
                "Water-resistant layers that dry fast, in muted shades that suit {colours}."
            ),
        },
        Season::Autumn => Wardrobe {
            headwear: "Wool flat cap".to_string(),
            top: pick("Flannel shirt", "Fine-knit turtleneck", "Henley"),
            midlayer: pick(
                "Suede or corduroy jacket",
                "Chunky cardigan",
                "Quilted vest",
            ),
            bottoms: pick("Dark denim", "Corduroy skirt with tights", "Dark denim"),
            footwear: pick("Chelsea boots", "Knee-high boots", "Leather boots"),
            accessories: "Leather belt and a knit scarf".to_string(),
            rationale: format!(
                "Textured, earthy layers for cooler days, coloured to flatter {colours}."
            ),
        },
        Season::Winter => Wardrobe {
            headwear: "Ribbed beanie".to_string(),
            top: pick(
                "Thermal long-sleeve",
                "Thermal base layer",
                "Thermal long-sleeve",
            ),
            midlayer: pick(
                "Wool overcoat over a crewneck sweater",
                "Long wool coat over a cashmere sweater",
                "Puffer jacket over a fleece",
            ),
            bottoms: pick(
                "Wool trousers",
                "Wool-blend trousers or a skirt with thick tights",
                "Lined trousers",
            ),
            footwear: pick(
                "Insulated leather boots",
                "Insulated ankle boots",
                "Insulated boots",
            ),
            accessories: "Gloves and a heavy scarf".to_string(),
            rationale: format!(
                "Insulating layers for the cold, in deeper shades that suit {colours}."
            ),
        },
    }
}

/// Inputs for one recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub season: Season,
    pub undertone: Undertone,
    pub tone: Tone,
    /// Free-form gender label from the external estimator.
    pub gender: String,
}

impl RecommendationRequest {
    /// Build a request from raw labels; unknown season and undertone fall back.
    pub fn from_labels(season: &str, undertone: &str, tone: Tone, gender: &str) -> Self {
        Self {
            season: Season::from_label(season),
            undertone: Undertone::from_label(undertone),
            tone,
            gender: gender.to_string(),
        }
    }

    pub fn is_male(&self) -> bool {
        self.gender.trim().to_ascii_lowercase().starts_with("male")
    }

    pub fn is_female(&self) -> bool {
        self.gender.trim().to_ascii_lowercase().starts_with("female")
    }
}

/// Outfit lookup over an explicit palette table.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    palettes: PaletteTable,
}

impl Recommender {
    pub fn new(palettes: PaletteTable) -> Self {
        Self { palettes }
    }

    pub fn recommend(&self, req: &RecommendationRequest) -> OutfitSuggestion {
        let base = self.palettes.for_undertone(req.undertone);
        let palette = season_palette(req.season, base);
        let wardrobe = template(
            req.season,
            req.is_male(),
            req.is_female(),
            req.tone,
            req.undertone,
        );

        tracing::debug!(
            season = %req.season,
            undertone = %req.undertone,
            tone = %req.tone,
            primary = %palette.primary,
            "outfit selected"
        );
        wardrobe.with_palette(palette)
    }
}
