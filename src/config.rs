use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use crate::foundation::error::{SlideError, SlideResult};

/// Largest accepted output width or height.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest accepted font size, in pixels.
pub const MAX_FONT_SIZE: u32 = 2_048;

/// Run-wide defaults. Every field can be set from a JSON file; missing fields
/// keep their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Directory the slide PNGs are written into.
    pub output_dir: PathBuf,
    /// Show name used when the description never sets one.
    pub show_name: String,
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    /// Background color before any template is activated (`0xRRGGBB[AA]`).
    pub background: String,
    /// Foreground (text) color before any template is activated.
    pub foreground: String,
    pub margin_x: i32,
    pub margin_y: i32,
    /// Horizontal advance of a space character, in pixels.
    pub space_advance: i32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            show_name: "slides".to_owned(),
            width: 1024,
            height: 768,
            font_size: 32,
            background: "0x3366cc".to_owned(),
            foreground: "0xffcccc".to_owned(),
            margin_x: 32,
            margin_y: 32,
            space_advance: 8,
        }
    }
}

impl RenderOptions {
    /// Load options from a JSON file and validate them.
    pub fn from_json_file(path: &Path) -> SlideResult<Self> {
        let f = File::open(path)
            .map_err(|e| SlideError::load(format!("open config '{}': {e}", path.display())))?;
        let opts: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| SlideError::load(format!("parse config '{}': {e}", path.display())))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check the canvas size and font size limits.
    pub fn validate(&self) -> SlideResult<()> {
        for (field, v, max) in [
            ("width", self.width, MAX_DIMENSION),
            ("height", self.height, MAX_DIMENSION),
            ("font_size", self.font_size, MAX_FONT_SIZE),
        ] {
            if !(1..=max).contains(&v) {
                return Err(SlideError::load(format!(
                    "render option {field} = {v} must be in 1..={max}"
                )));
            }
        }
        Ok(())
    }

    /// Output path for slide `index`: `<dir>/<show>_<NNNN>.png`.
    pub fn slide_path(&self, show_name: &str, index: usize) -> PathBuf {
        self.output_dir.join(slide_file_name(show_name, index))
    }
}

pub fn slide_file_name(show_name: &str, index: usize) -> String {
    format!("{show_name}_{index:04}.png")
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
