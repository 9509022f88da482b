use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis-aligned face box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Map this box from a coordinate space of size `from` into one of size `to`.
    ///
    /// Detectors usually run on a resized copy of the photo; this brings their
    /// boxes back to natural pixel coordinates. A degenerate `from` size leaves
    /// the box untouched.
    pub fn rescale(&self, from: (f32, f32), to: (f32, f32)) -> Self {
        if from.0 <= 0.0 || from.1 <= 0.0 {
            return *self;
        }
        let sx = to.0 / from.0;
        let sy = to.1 / from.1;
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Clip the box to `[0, width] × [0, height]`.
    pub fn clamp_to(&self, width: f32, height: f32) -> Self {
        let x0 = self.x.clamp(0.0, width);
        let y0 = self.y.clamp(0.0, height);
        let x1 = (self.x + self.width).clamp(0.0, width);
        let y1 = (self.y + self.height).clamp(0.0, height);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// One face reported by the external detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    /// Detector confidence in [0, 1].
    pub score: f32,
}

/// Averaged 8-bit colour of a sampled region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbSample {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `#RRGGBB`.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Luminance bucket of a skin sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Light,
    Medium,
    Deep,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Light, Tone::Medium, Tone::Deep];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Light => "light",
            Tone::Medium => "medium",
            Tone::Deep => "deep",
        }
    }
}

/// Coarse red-versus-blue balance of a skin sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Undertone {
    Warm,
    Cool,
    Neutral,
}

impl Undertone {
    pub const ALL: [Undertone; 3] = [Undertone::Warm, Undertone::Cool, Undertone::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Undertone::Warm => "warm",
            Undertone::Cool => "cool",
            Undertone::Neutral => "neutral",
        }
    }

    /// Resolve a free-form label, falling back to `Neutral` for anything unknown.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            tracing::debug!(label, "unmapped undertone label; using neutral");
            Undertone::Neutral
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Winter,
    Rainy,
    Spring,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 5] = [
        Season::Summer,
        Season::Winter,
        Season::Rainy,
        Season::Spring,
        Season::Autumn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
            Season::Rainy => "rainy",
            Season::Spring => "spring",
            Season::Autumn => "autumn",
        }
    }

    /// Resolve a free-form label, falling back to `Summer` for anything unknown.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            tracing::debug!(label, "unmapped season label; using summer");
            Season::Summer
        })
    }
}

/// A label that is not one of a closed set of names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{label}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub label: String,
}

fn parse_label<T: Copy>(
    kind: &'static str,
    s: &str,
    all: &[T],
    name: impl Fn(&T) -> &'static str,
) -> Result<T, UnknownLabel> {
    let wanted = s.trim().to_ascii_lowercase();
    all.iter()
        .find(|v| name(v) == wanted)
        .copied()
        .ok_or_else(|| UnknownLabel {
            kind,
            label: s.to_string(),
        })
}

impl FromStr for Tone {
    type Err = UnknownLabel;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("tone", s, &Tone::ALL, Tone::as_str)
    }
}

impl FromStr for Undertone {
    type Err = UnknownLabel;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("undertone", s, &Undertone::ALL, Undertone::as_str)
    }
}

impl FromStr for Season {
    type Err = UnknownLabel;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("season", s, &Season::ALL, Season::as_str)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Undertone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skin colour estimate for one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinAnalysis {
    pub rgb: RgbSample,
    pub hex: String,
    pub tone: Tone,
    pub undertone: Undertone,
}

/// Age and gender as estimated by the external model. Treated as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonAttributes {
    pub age: u32,
    pub gender: String,
    /// Estimator confidence in the gender label, in [0, 1].
    pub gender_confidence: f32,
}

impl Default for PersonAttributes {
    fn default() -> Self {
        Self {
            age: 0,
            gender: "unknown".to_string(),
            gender_confidence: 0.0,
        }
    }
}

/// Three `#RRGGBB` colours suggested for an outfit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub accent: String,
    pub neutral: String,
}

impl Palette {
    pub fn new(primary: &str, accent: &str, neutral: &str) -> Self {
        Self {
            primary: primary.to_string(),
            accent: accent.to_string(),
            neutral: neutral.to_string(),
        }
    }
}

/// A complete outfit: six wardrobe slots plus a palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitSuggestion {
    pub headwear: String,
    pub top: String,
    pub midlayer: String,
    pub bottoms: String,
    pub footwear: String,
    pub accessories: String,
    pub palette: Palette,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area() {
        assert_eq!(BoundingBox::new(5.0, 5.0, 10.0, 4.0).area(), 40.0);
    }

    #[test]
    fn test_new_clamps_negative_size() {
        let b = BoundingBox::new(0.0, 0.0, -3.0, 2.0);
        assert_eq!(b.width, 0.0);
        assert_eq!(b.height, 2.0);
    }

    #[test]
    fn test_rescale_to_natural_size() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        let r = b.rescale((320.0, 240.0), (640.0, 480.0));
        assert_eq!(r, BoundingBox::new(20.0, 40.0, 60.0, 80.0));
    }

    #[test]
    fn test_rescale_degenerate_source() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.rescale((0.0, 240.0), (640.0, 480.0)), b);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let b = BoundingBox::new(-10.0, 90.0, 50.0, 50.0);
        let c = b.clamp_to(100.0, 100.0);
        assert_eq!(c, BoundingBox::new(0.0, 90.0, 40.0, 10.0));
    }

    #[test]
    fn test_clamp_fully_outside() {
        let b = BoundingBox::new(200.0, 200.0, 50.0, 50.0);
        let c = b.clamp_to(100.0, 100.0);
        assert_eq!(c.area(), 0.0);
    }

    #[test]
    fn test_hex_uppercase() {
        assert_eq!(RgbSample::new(171, 205, 239).hex(), "#ABCDEF");
        assert_eq!(RgbSample::new(0, 5, 10).hex(), "#00050A");
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("Winter".parse::<Season>(), Ok(Season::Winter));
        assert_eq!(" autumn ".parse::<Season>(), Ok(Season::Autumn));
        assert_eq!("COOL".parse::<Undertone>(), Ok(Undertone::Cool));
        assert_eq!("deep".parse::<Tone>(), Ok(Tone::Deep));
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn test_lenient_labels_fall_back() {
        assert_eq!(Season::from_label("monsoon"), Season::Summer);
        assert_eq!(Undertone::from_label("olive"), Undertone::Neutral);
        assert_eq!(Season::from_label("rainy"), Season::Rainy);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Detection {
            bbox: BoundingBox::new(1.0, 2.0, 3.0, 4.0),
            score: 0.5,
        })
        .unwrap();
        assert!(json.contains("\"box\""));
        assert_eq!(serde_json::to_string(&Tone::Medium).unwrap(), "\"medium\"");

        let attrs = PersonAttributes {
            age: 30,
            gender: "female".into(),
            gender_confidence: 0.9,
        };
        let json = serde_json::to_string(&attrs).unwrap();
        assert!(json.contains("genderConfidence"));
    }
}
