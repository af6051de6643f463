//! # Image Editor CLI
//!
//! Replays an edit script over an optional background image and flattens
//! the result to a PNG, JPEG or SVG file.
//!
//! ## Usage
//!
//! ```bash
//! image-editor --background photo.jpg --script edit.json
//! image-editor --scene saved.json --output poster.jpg --format jpeg
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved configuration for a run
//! - `script` - JSON edit scripts replayed over the scene
//! - `run` - Build the scene, replay, save and export

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use editor_core::{loader, DecodeTarget, EditorConfig, Scene};
use editor_renderer::{ExportConfig, ExportFormat, SceneExporter, DEFAULT_FILE_NAME};

pub use script::{ReplayReport, Script, ScriptStep};

/// Command-line arguments for image-editor.
#[derive(Debug, Clone, Parser)]
#[command(name = "image-editor")]
#[command(about = "Layer text, rectangles and images over a picture and flatten it")]
#[command(version)]
pub struct CliArgs {
    /// Edit script (JSON array of steps)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Background image, applied before the script
    #[arg(long)]
    pub background: Option<PathBuf>,

    /// Canvas width in pixels (ignored with --scene)
    #[arg(long, env = "EDITOR_WIDTH", default_value = "800")]
    pub width: f32,

    /// Canvas height in pixels (default: 3/4 of the width; ignored with --scene)
    #[arg(long, env = "EDITOR_HEIGHT")]
    pub height: Option<f32>,

    /// Output file
    #[arg(long, short, env = "EDITOR_OUTPUT", default_value = DEFAULT_FILE_NAME)]
    pub output: PathBuf,

    /// Output format: png, jpeg or svg (default: from the output extension)
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Write the edited scene as JSON
    #[arg(long)]
    pub save_scene: Option<PathBuf>,

    /// Start from a previously saved scene instead of an empty canvas
    #[arg(long)]
    pub scene: Option<PathBuf>,
}

/// Resolved configuration for a run.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Scene configuration for a fresh canvas. A saved scene keeps its own.
    pub editor: EditorConfig,
    /// Edit script.
    pub script: Option<PathBuf>,
    /// Initial background image.
    pub background: Option<PathBuf>,
    /// Saved scene to start from.
    pub scene: Option<PathBuf>,
    /// Where to write the scene JSON.
    pub save_scene: Option<PathBuf>,
    /// Output file.
    pub output: PathBuf,
    /// Output format.
    pub format: ExportFormat,
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        let editor = match args.height {
            Some(height) => EditorConfig::default().with_size(args.width, height),
            None => EditorConfig::with_width(args.width),
        };
        let format = args
            .format
            .unwrap_or_else(|| ExportFormat::from_path(&args.output));
        Self {
            editor,
            script: args.script,
            background: args.background,
            scene: args.scene,
            save_scene: args.save_scene,
            output: args.output,
            format,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Objects in the final scene.
    pub objects: usize,
    /// Script replay counts.
    pub replay: ReplayReport,
    /// Format written.
    pub format: ExportFormat,
    /// File written.
    pub output: PathBuf,
}

/// Build the scene, replay the script, then save and export.
///
/// # Errors
///
/// Returns an error if an input cannot be read, the script is invalid or
/// the output cannot be written.
pub async fn run(config: CliConfig) -> anyhow::Result<RunSummary> {
    let mut scene = match &config.scene {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading scene {}", path.display()))?;
            Scene::from_json(&json).with_context(|| format!("parsing scene {}", path.display()))?
        }
        None => Scene::new(config.editor.clone()),
    };

    if let Some(path) = &config.background {
        let result = loader::load_file(path).await;
        if !scene.apply_decoded(DecodeTarget::Background, result) {
            anyhow::bail!("could not load background {}", path.display());
        }
    }

    let replay = match &config.script {
        Some(path) => Script::load(path).await?.replay(&mut scene).await?,
        None => ReplayReport::default(),
    };

    if let Some(path) = &config.save_scene {
        tokio::fs::write(path, scene.to_json()?)
            .await
            .with_context(|| format!("writing scene {}", path.display()))?;
        tracing::info!("Saved scene to {}", path.display());
    }

    let exporter = SceneExporter::new(ExportConfig::default());
    let bytes = exporter
        .export(&scene, config.format)
        .context("flattening scene")?;
    tokio::fs::write(&config.output, &bytes)
        .await
        .with_context(|| format!("writing {}", config.output.display()))?;

    Ok(RunSummary {
        objects: scene.len(),
        replay,
        format: config.format,
        output: config.output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor() {
        let args = CliArgs::try_parse_from(["image-editor"]).expect("parse");
        let config = CliConfig::from(args);
        assert_eq!(config.output, PathBuf::from("edited-image.png"));
        assert_eq!(config.format, ExportFormat::Png);
        assert!((config.editor.width - 800.0).abs() < f32::EPSILON);
        assert!((config.editor.height - 600.0).abs() < f32::EPSILON);
    }

    #[test]
    fn height_follows_width_unless_given() {
        let args = CliArgs::try_parse_from(["image-editor", "--width", "640"]).expect("parse");
        assert!((CliConfig::from(args).editor.height - 480.0).abs() < f32::EPSILON);

        let args = CliArgs::try_parse_from(["image-editor", "--width", "640", "--height", "100"])
            .expect("parse");
        assert!((CliConfig::from(args).editor.height - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn format_from_flag_or_extension() {
        let args = CliArgs::try_parse_from(["image-editor", "-o", "out.svg"]).expect("parse");
        assert_eq!(CliConfig::from(args).format, ExportFormat::Svg);

        let args = CliArgs::try_parse_from(["image-editor", "-o", "out.png", "--format", "jpeg"])
            .expect("parse");
        assert_eq!(CliConfig::from(args).format, ExportFormat::Jpeg);

        assert!(CliArgs::try_parse_from(["image-editor", "--format", "tiff"]).is_err());
    }

    #[test]
    fn saved_scene_accepts_size_flags() {
        let args = CliArgs::try_parse_from(["image-editor", "--scene", "s.json", "--width", "100"])
            .expect("parse");
        assert_eq!(CliConfig::from(args).scene, Some(PathBuf::from("s.json")));
    }
}
