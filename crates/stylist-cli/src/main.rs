use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use stylist_core::{
    analyze_primary, PersonAttributes, RecommendationRequest, Recommender, SelectError, Tone,
};
use stylist_io::{render_overlay, save_overlay, DetectionSet, Frame};

mod config;
mod remote;
mod report;

use config::Config;
use remote::{RemoteRecommender, RemoteRequest};
use report::AnalysisOutput;

#[derive(Parser)]
#[command(
    name = "stylist",
    version,
    about = "Skin tone analysis and outfit suggestions from a photo"
)]
struct Cli {
    /// Config file (default: $STYLIST_CONFIG or ~/.config/stylist/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Photo plus the external detector's output for it.
#[derive(clap::Args)]
struct PhotoArgs {
    /// Photo to analyze
    #[arg(short, long)]
    image: PathBuf,
    /// Face detector output (JSON)
    #[arg(short, long)]
    detections: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a photo and suggest an outfit
    Analyze {
        #[command(flatten)]
        photo: PhotoArgs,
        /// Season (summer, winter, rainy, spring, autumn); unknown values mean summer
        #[arg(short, long)]
        season: Option<String>,
        /// Age, overriding the detector's estimate
        #[arg(long)]
        age: Option<u32>,
        /// Gender label, overriding the detector's estimate
        #[arg(long)]
        gender: Option<String>,
        /// Confidence in the gender label, 0–1
        #[arg(long)]
        gender_confidence: Option<f32>,
        /// Write the photo with face and cheek boxes drawn on it
        #[arg(long)]
        overlay: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Estimate skin tone and undertone only
    Skin {
        #[command(flatten)]
        photo: PhotoArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Look up an outfit without a photo
    Recommend {
        #[arg(short, long)]
        season: String,
        #[arg(short, long)]
        undertone: String,
        #[arg(short, long)]
        tone: Tone,
        #[arg(short, long, default_value = "unknown")]
        gender: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
}

/// Options of `stylist analyze` beyond the photo itself.
struct AnalyzeOptions {
    season: Option<String>,
    overrides: PersonOverrides,
    overlay: Option<PathBuf>,
    json: bool,
}

/// Detector-supplied attributes with command-line overrides applied.
struct PersonOverrides {
    age: Option<u32>,
    gender: Option<String>,
    gender_confidence: Option<f32>,
}

impl PersonOverrides {
    fn apply(&self, detected: Option<PersonAttributes>) -> PersonAttributes {
        let mut person = detected.unwrap_or_default();
        if let Some(age) = self.age {
            person.age = age;
        }
        if let Some(gender) = &self.gender {
            person.gender = gender.clone();
            // A label given by hand is taken as certain unless stated otherwise.
            person.gender_confidence = 1.0;
        }
        if let Some(c) = self.gender_confidence {
            person.gender_confidence = c.clamp(0.0, 1.0);
        }
        person
    }
}

/// What a photo command produced.
#[derive(Debug)]
enum Outcome {
    /// Text for stdout.
    Report(String),
    NoFace(SelectError),
}

impl Outcome {
    fn exit_code(&self) -> u8 {
        match self {
            Outcome::Report(_) => 0,
            Outcome::NoFace(_) => 2,
        }
    }

    fn finish(self) -> ExitCode {
        let code = self.exit_code();
        match self {
            Outcome::Report(text) => print!("{text}"),
            Outcome::NoFace(err) => eprintln!("{err}"),
        }
        ExitCode::from(code)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Analyze {
            photo,
            season,
            age,
            gender,
            gender_confidence,
            overlay,
            json,
        } => {
            let opts = AnalyzeOptions {
                season,
                overrides: PersonOverrides {
                    age,
                    gender,
                    gender_confidence,
                },
                overlay,
                json,
            };
            let (frame, set) = load_photo(&photo)?;
            Ok(analyze(&cfg, &frame, &set, &opts).await?.finish())
        }
        Commands::Skin { photo, json } => {
            let (frame, set) = load_photo(&photo)?;
            Ok(skin(&frame, &set, json)?.finish())
        }
        Commands::Recommend {
            season,
            undertone,
            tone,
            gender,
            json,
        } => {
            let recommender = Recommender::new(cfg.palettes.clone());
            let request =
                RecommendationRequest::from_labels(&season, &undertone, tone, &gender);
            let outfit = recommender.recommend(&request);
            if json {
                println!("{}", serde_json::to_string_pretty(&outfit)?);
            } else {
                println!("Outfit for {}:", request.season);
                print!("{}", report::render_outfit(&outfit));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&cfg)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Decode the photo and bring the detections into its pixel space.
fn load_photo(photo: &PhotoArgs) -> Result<(Frame, DetectionSet)> {
    let frame = Frame::open(&photo.image)?;
    if frame.is_dark() {
        tracing::warn!(
            brightness = frame.avg_brightness(),
            "photo is very dark; skin tone will be unreliable"
        );
    }
    let detections =
        DetectionSet::load(&photo.detections)?.to_frame_space(frame.width, frame.height);
    tracing::info!(
        width = frame.width,
        height = frame.height,
        faces = detections.faces.len(),
        "photo loaded"
    );
    Ok((frame, detections))
}

/// Analyze the primary face and suggest an outfit for it.
async fn analyze(
    cfg: &Config,
    frame: &Frame,
    set: &DetectionSet,
    opts: &AnalyzeOptions,
) -> Result<Outcome> {
    let detections = set.detections();
    let face = match analyze_primary(&detections, frame) {
        Ok(face) => face,
        Err(err) => return Ok(Outcome::NoFace(err)),
    };

    let person = opts
        .overrides
        .apply(set.faces[face.primary_index].attributes.clone());
    let season = opts
        .season
        .as_deref()
        .map(stylist_core::Season::from_label)
        .unwrap_or(cfg.default_season);

    let remote = cfg.remote.endpoint.as_deref().and_then(|endpoint| {
        RemoteRecommender::new(endpoint, Duration::from_secs(cfg.remote.timeout_secs))
            .map_err(|err| tracing::warn!(error = %err, "remote recommender unavailable"))
            .ok()
    });
    let local = Recommender::new(cfg.palettes.clone());
    let request = RemoteRequest::new(&person, &face.skin, season);
    let (outfit, source) = remote::suggest(remote.as_ref(), &request, &local).await;
    let report = face.into_report(person, season, outfit);

    if let Some(path) = &opts.overlay {
        let img = render_overlay(frame, &detections, report.primary_index, &report.cheeks);
        save_overlay(&img, path)?;
    }

    let output = AnalysisOutput::new(&report, detections.len(), source);
    let text = if opts.json {
        format!("{}\n", serde_json::to_string_pretty(&output)?)
    } else {
        report::render_analysis(&output)
    };
    Ok(Outcome::Report(text))
}

/// Skin tone and undertone of the primary face only.
fn skin(frame: &Frame, set: &DetectionSet, json: bool) -> Result<Outcome> {
    let detections = set.detections();
    let primary = match stylist_core::select_primary(&detections) {
        Ok(d) => d,
        Err(err) => return Ok(Outcome::NoFace(err)),
    };

    let skin = stylist_core::analyze_skin(&primary.bbox, frame);
    let text = if json {
        format!("{}\n", serde_json::to_string_pretty(&skin)?)
    } else {
        report::render_skin(&skin)
    };
    Ok(Outcome::Report(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "stylist",
            "analyze",
            "-i",
            "me.jpg",
            "-d",
            "faces.json",
            "--season",
            "rainy",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                photo, season, json, ..
            } => {
                assert_eq!(photo.image, PathBuf::from("me.jpg"));
                assert_eq!(season.as_deref(), Some("rainy"));
                assert!(json);
            }
            _ => panic!("expected analyze"),
        }
    }

    /// Pale left half, dark right half; a small face on the left and a
    /// large one on the right, each with its own estimated attributes.
    fn write_photo(dir: &std::path::Path, faces_json: &str) -> PhotoArgs {
        let (w, h) = (200u32, 100u32);
        let mut data = Vec::with_capacity((w * h * 4) as usize);
        for _y in 0..h {
            for x in 0..w {
                let px = if x < 100 {
                    [235, 215, 200, 255]
                } else {
                    [110, 75, 55, 255]
                };
                data.extend_from_slice(&px);
            }
        }
        let image = dir.join("photo.png");
        let detections = dir.join("faces.json");
        Frame::from_rgba(data, w, h)
            .unwrap()
            .to_image()
            .save(&image)
            .unwrap();
        std::fs::write(&detections, faces_json).unwrap();
        PhotoArgs { image, detections }
    }

    const TWO_FACES: &str = r#"[
        {"box": {"x": 10, "y": 10, "width": 40, "height": 40}, "score": 0.99,
         "age": 63, "gender": "male", "genderProbability": 0.8},
        {"box": {"x": 110, "y": 5, "width": 80, "height": 90}, "score": 0.7,
         "age": 31, "gender": "female", "genderProbability": 0.9}
    ]"#;

    fn options(season: Option<&str>, overlay: Option<PathBuf>) -> AnalyzeOptions {
        AnalyzeOptions {
            season: season.map(str::to_string),
            overrides: PersonOverrides {
                age: None,
                gender: None,
                gender_confidence: None,
            },
            overlay,
            json: true,
        }
    }

    fn report_json(outcome: Outcome) -> serde_json::Value {
        match outcome {
            Outcome::Report(text) => serde_json::from_str(&text).unwrap(),
            Outcome::NoFace(err) => panic!("unexpected {err}"),
        }
    }

    #[tokio::test]
    async fn test_analyze_uses_primary_face_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_photo(dir.path(), TWO_FACES);
        let (frame, set) = load_photo(&photo).unwrap();
        let mut cfg = Config::default();
        cfg.default_season = stylist_core::Season::Winter;

        let opts = options(None, None);
        let outcome = analyze(&cfg, &frame, &set, &opts).await.unwrap();
        assert_eq!(outcome.exit_code(), 0);
        let json = report_json(outcome);
        assert_eq!(json["faces"], 2);
        assert_eq!(json["person"]["age"], 31);
        assert_eq!(json["person"]["gender"], "female");
        assert_eq!(json["skin"]["hex"], "#6E4B37");
        assert_eq!(json["season"], "winter");
        assert_eq!(json["outfit"]["footwear"], "Insulated ankle boots");
        assert_eq!(json["source"], "local");
    }

    #[tokio::test]
    async fn test_season_flag_beats_config_default() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_photo(dir.path(), TWO_FACES);
        let (frame, set) = load_photo(&photo).unwrap();
        let mut cfg = Config::default();
        cfg.default_season = stylist_core::Season::Winter;

        let opts = options(Some("rainy"), None);
        let json = report_json(analyze(&cfg, &frame, &set, &opts).await.unwrap());
        assert_eq!(json["season"], "rainy");
        assert_eq!(json["outfit"]["palette"]["primary"], "#2F4858");
    }

    #[tokio::test]
    async fn test_overlay_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_photo(dir.path(), TWO_FACES);
        let (frame, set) = load_photo(&photo).unwrap();
        let overlay = dir.path().join("overlay.png");

        let opts = options(None, Some(overlay.clone()));
        let cfg = Config::default();
        let outcome = analyze(&cfg, &frame, &set, &opts).await.unwrap();
        assert_eq!(outcome.exit_code(), 0);
        let written = Frame::open(&overlay).unwrap();
        assert_eq!((written.width, written.height), (200, 100));
    }

    #[tokio::test]
    async fn test_no_face_exits_with_code_two() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_photo(dir.path(), "[]");
        let (frame, set) = load_photo(&photo).unwrap();
        let overlay = dir.path().join("overlay.png");

        let opts = options(None, Some(overlay.clone()));
        let cfg = Config::default();
        let outcome = analyze(&cfg, &frame, &set, &opts).await.unwrap();
        assert_eq!(outcome.exit_code(), 2);
        assert!(matches!(outcome, Outcome::NoFace(SelectError::NoFaceFound)));
        assert!(!overlay.exists());

        let outcome = skin(&frame, &set, false).unwrap();
        assert_eq!(outcome.exit_code(), 2);
        let Outcome::NoFace(err) = outcome else {
            panic!("expected no face");
        };
        assert!(err.to_string().contains("no face found"));
    }

    #[test]
    fn test_skin_reports_primary_face() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_photo(dir.path(), TWO_FACES);
        let (frame, set) = load_photo(&photo).unwrap();

        match skin(&frame, &set, false).unwrap() {
            Outcome::Report(text) => {
                assert_eq!(text, "Skin: #6E4B37 (rgb 110, 75, 55) tone=deep undertone=warm\n");
            }
            Outcome::NoFace(err) => panic!("unexpected {err}"),
        }
    }

    #[test]
    fn test_recommend_rejects_unknown_tone() {
        let result = Cli::try_parse_from([
            "stylist", "recommend", "-s", "summer", "-u", "warm", "-t", "olive",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let detected = PersonAttributes {
            age: 27,
            gender: "male".into(),
            gender_confidence: 0.6,
        };
        let person = PersonOverrides {
            age: Some(40),
            gender: Some("female".into()),
            gender_confidence: None,
        }
        .apply(Some(detected.clone()));
        assert_eq!(person.age, 40);
        assert_eq!(person.gender, "female");
        assert_eq!(person.gender_confidence, 1.0);

        let untouched = PersonOverrides {
            age: None,
            gender: None,
            gender_confidence: None,
        }
        .apply(Some(detected.clone()));
        assert_eq!(untouched, detected);

        let none = PersonOverrides {
            age: None,
            gender: None,
            gender_confidence: Some(3.0),
        }
        .apply(None);
        assert_eq!(none.gender, "unknown");
        assert_eq!(none.gender_confidence, 1.0);
    }
}
