//! Edit scripts: a JSON array of steps replayed over a scene.
//!
//! A step is either an image load or any [`EditCommand`]:
//!
//! ```json
//! [
//!   {"op": "set_background", "path": "photo.jpg"},
//!   {"op": "add_text", "content": "Hello"},
//!   {"op": "add_image", "path": "logo.png"},
//!   {"op": "reorder", "direction": "back"}
//! ]
//! ```
//!
//! Relative image paths resolve against the script's directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use editor_core::{loader, DecodeTarget, EditCommand, Scene};
use serde::{Deserialize, Serialize};

/// Loads an image file into the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LoadStep {
    /// Replace the background, clearing the scene.
    SetBackground {
        /// Image file.
        path: PathBuf,
    },
    /// Add an image object.
    AddImage {
        /// Image file.
        path: PathBuf,
    },
}

impl LoadStep {
    /// The image file to read.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::SetBackground { path } | Self::AddImage { path } => path,
        }
    }

    /// Where the decoded image goes.
    #[must_use]
    pub fn target(&self) -> DecodeTarget {
        match self {
            Self::SetBackground { .. } => DecodeTarget::Background,
            Self::AddImage { .. } => DecodeTarget::Object,
        }
    }
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// Image load.
    Load(LoadStep),
    /// Scene edit.
    Edit(EditCommand),
}

/// What happened while replaying a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Edits applied.
    pub edits: usize,
    /// Images decoded and applied.
    pub images: usize,
    /// Images that failed to load and were skipped.
    pub skipped_images: usize,
}

/// A parsed edit script.
#[derive(Debug, Clone, Default)]
pub struct Script {
    steps: Vec<ScriptStep>,
    base_dir: PathBuf,
}

impl Script {
    /// Parse a script, resolving relative paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of known steps.
    pub fn parse(json: &str, base_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let steps = serde_json::from_str(json).context("script must be a JSON array of steps")?;
        Ok(Self {
            steps,
            base_dir: base_dir.into(),
        })
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading script {}", path.display()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::parse(&json, base_dir).with_context(|| format!("parsing script {}", path.display()))
    }

    /// The parsed steps.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Replay the script over a scene.
    ///
    /// All images are decoded concurrently before any step runs; mutations
    /// are then applied in script order so the result is deterministic. An
    /// image that fails to load is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an edit addresses a missing object.
    pub async fn replay(&self, scene: &mut Scene) -> anyhow::Result<ReplayReport> {
        let loads = self.steps.iter().filter_map(|step| match step {
            ScriptStep::Load(load) => Some(loader::load_file(self.resolve(load.path()))),
            ScriptStep::Edit(_) => None,
        });
        let mut decoded = futures::future::join_all(loads).await.into_iter();
        tracing::debug!("Decoded {} script images", decoded.len());

        let mut report = ReplayReport::default();
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                ScriptStep::Load(load) => {
                    let result = decoded
                        .next()
                        .with_context(|| format!("step {index}: missing decode result"))?;
                    if scene.apply_decoded(load.target(), result) {
                        report.images += 1;
                    } else {
                        tracing::warn!("Step {index}: skipped {}", load.path().display());
                        report.skipped_images += 1;
                    }
                }
                ScriptStep::Edit(command) => {
                    scene
                        .apply(command)
                        .with_context(|| format!("step {index}: {command:?}"))?;
                    report.edits += 1;
                }
            }
        }
        Ok(report)
    }
}
