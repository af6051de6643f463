//! Scene export to image formats.
//!
//! Renders a [`Scene`] to PNG, JPEG or SVG using an SVG intermediate
//! representation and the resvg/tiny-skia rasterization pipeline. Export
//! only reads the scene.

use std::fmt::Write;
use std::path::Path;
use std::str::FromStr;

use editor_core::{DecodedImage, ObjectKind, Rgba, Scene, SceneObject};
use image::ImageEncoder;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// File name offered for a flattened image.
pub const DEFAULT_FILE_NAME: &str = "edited-image.png";

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG image.
    #[default]
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector graphics (returns the SVG XML string as UTF-8 bytes).
    Svg,
}

impl ExportFormat {
    /// Conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
        }
    }

    /// Guess the format from a file extension, defaulting to PNG.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for ExportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            other => Err(RenderError::Export(format!("unknown format: {other}"))),
        }
    }
}

/// Configuration for scene export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output width in pixels (default: scene canvas width).
    pub width: Option<u32>,
    /// Output height in pixels (default: scene canvas height).
    pub height: Option<u32>,
    /// Canvas fill under the background image, as RGBA bytes.
    pub background: [u8; 4],
    /// JPEG quality 1-100 (default: 85).
    pub jpeg_quality: u8,
    /// Scale factor (e.g. 2.0 for retina).
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: [255, 255, 255, 255],
            jpeg_quality: 85,
            scale: 1.0,
        }
    }
}

/// Flattens a [`Scene`] into image bytes.
pub struct SceneExporter {
    config: ExportConfig,
}

impl SceneExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Export a scene to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot be rendered or encoded.
    pub fn export(&self, scene: &Scene, format: ExportFormat) -> RenderResult<Vec<u8>> {
        match format {
            ExportFormat::Png => self.render_to_png(scene),
            ExportFormat::Jpeg => self.render_to_jpeg(scene),
            ExportFormat::Svg => {
                let svg = self.render_to_svg(scene)?;
                Ok(svg.into_bytes())
            }
        }
    }

    /// Export to a file, picking the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn export_to_file(&self, scene: &Scene, path: impl AsRef<Path>) -> RenderResult<ExportFormat> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path);
        let bytes = self.export(scene, format)?;
        std::fs::write(path, &bytes)?;
        tracing::info!(
            "Exported {} objects to {} ({} bytes)",
            scene.len(),
            path.display(),
            bytes.len()
        );
        Ok(format)
    }

    /// Export the scene to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, scene: &Scene) -> RenderResult<Vec<u8>> {
        let svg_string = self.render_to_svg(scene)?;
        let pixmap = Self::rasterize_svg(&svg_string)?;

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))
    }

    /// Export the scene to JPEG bytes.
    ///
    /// JPEG has no alpha; translucent pixels are composited over the
    /// configured canvas fill.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_jpeg(&self, scene: &Scene) -> RenderResult<Vec<u8>> {
        let svg_string = self.render_to_svg(scene)?;
        let pixmap = Self::rasterize_svg(&svg_string)?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let bg = &self.config.background;
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        // pixmap data is premultiplied
        for pixel in pixmap.data().chunks_exact(4) {
            let inv = 1.0 - f32::from(pixel[3]) / 255.0;
            for (&channel, &fill) in pixel[..3].iter().zip(bg.iter()) {
                let value = f32::from(fill).mul_add(inv, f32::from(channel));
                rgb_data.push(value.round().min(255.0) as u8);
            }
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::Encode(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the scene to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded image cannot be encoded.
    #[allow(clippy::cast_precision_loss)]
    pub fn render_to_svg(&self, scene: &Scene) -> RenderResult<String> {
        let (out_w, out_h) = self.output_dimensions(scene);
        let view_w = scene.width();
        let view_h = scene.height();

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\" preserveAspectRatio=\"none\">",
        );

        // Canvas fill
        let bg = &self.config.background;
        let bg_alpha = f32::from(bg[3]) / 255.0;
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"rgb({},{},{})\" fill-opacity=\"{bg_alpha}\"/>",
            bg[0], bg[1], bg[2],
        );

        if let Some(background) = scene.background() {
            write_image(&mut svg, background, 0.0, 0.0, view_w, view_h)?;
        }

        for object in scene.objects() {
            render_object_svg(&mut svg, object)?;
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Get output dimensions (width, height) in pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn output_dimensions(&self, scene: &Scene) -> (u32, u32) {
        let base_w = self
            .config
            .width
            .unwrap_or_else(|| scene.width().max(1.0) as u32);
        let base_h = self
            .config
            .height
            .unwrap_or_else(|| scene.height().max(1.0) as u32);

        #[allow(clippy::cast_precision_loss)]
        let out_w = (base_w as f32 * self.config.scale) as u32;
        #[allow(clippy::cast_precision_loss)]
        let out_h = (base_h as f32 * self.config.scale) as u32;
        (out_w.max(1), out_h.max(1))
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(svg_string: &str) -> RenderResult<tiny_skia::Pixmap> {
        let mut opt = usvg::Options::default();
        opt.fontdb_mut().load_system_fonts();
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width() as u32;
        let px_h = tree.size().height() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl Default for SceneExporter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Render a single object to SVG.
fn render_object_svg(svg: &mut String, object: &SceneObject) -> RenderResult<()> {
    let (x, y) = (object.x, object.y);

    match &object.kind {
        ObjectKind::Text(text) => {
            if !text.background.is_transparent() {
                let (w, h) = text.size();
                let _ = write!(
                    svg,
                    "<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" {}/>",
                    paint("fill", text.background),
                );
            }
            let font_size = text.font_size.px();
            for (line_no, line) in text.lines().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let baseline =
                    y + font_size * (line_no as f32).mul_add(editor_core::TEXT_LINE_HEIGHT, 1.0);
                let _ = write!(
                    svg,
                    "<text x=\"{x}\" y=\"{baseline}\" font-size=\"{font_size}\" font-family=\"sans-serif\" xml:space=\"preserve\" {}>{}</text>",
                    paint("fill", text.fill),
                    escape_xml(line),
                );
            }
        }

        ObjectKind::Rect(rect) => {
            // Stroke is centred on the outline, which sits half a stroke in.
            let stroke_width = rect.stroke_width.px();
            let inset = stroke_width / 2.0;
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {} {} stroke-width=\"{stroke_width}\"/>",
                x + inset,
                y + inset,
                rect.width,
                rect.height,
                paint("fill", rect.fill),
                paint("stroke", rect.stroke),
            );
        }

        ObjectKind::Image(img) => {
            write_image(svg, &img.image, x, y, img.width, img.height)?;
        }
    }
    Ok(())
}

/// Embed pixels as a data URI, stretched to the given box.
fn write_image(
    svg: &mut String,
    image: &DecodedImage,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> RenderResult<()> {
    let uri = image
        .to_data_uri()
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    let _ = write!(
        svg,
        "<image x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"none\" xlink:href=\"{uri}\"/>",
    );
    Ok(())
}

/// `fill`/`stroke` attribute pair with separate opacity.
fn paint(attribute: &str, color: Rgba) -> String {
    format!(
        "{attribute}=\"{}\" {attribute}-opacity=\"{}\"",
        color.rgb_string(),
        color.a
    )
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
