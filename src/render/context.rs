use std::path::{Path, PathBuf};

use crate::{
    assets::decode::DecodedImage,
    config::RenderOptions,
    foundation::{
        core::{Justify, Rgba8, parse_color_or_default},
        error::{SlideError, SlideResult},
    },
    render::framebuffer::{Framebuffer, Layers},
    text::glyph_cache::{Font, FontBackend, FontdueBackend},
};

/// Which interpreter pass is executing handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Asset loading and table registration; tables may grow.
    RunOnce,
    /// Slide rendering; tables are frozen.
    Slide,
}

/// Named background/foreground/justification bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub bg: Rgba8,
    pub fg: Rgba8,
    pub justify: Justify,
}

/// Image registered by name for later placement.
#[derive(Clone, Debug)]
pub struct ShowImage {
    pub name: String,
    pub path: PathBuf,
    pub image: DecodedImage,
}

/// Mutable render state, changed only by handlers in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    pub cursor_x: i32,
    pub cursor_y: i32,
    pub font: Option<usize>,
    pub font_size: u32,
    pub template: Option<usize>,
    pub slide: usize,
    pub width: u32,
    pub height: u32,
    pub bg: Rgba8,
    pub fg: Rgba8,
    pub justify: Justify,
}

/// Everything a handler may touch, passed explicitly to each one.
pub struct RenderContext {
    pub options: RenderOptions,
    pub settings: RenderSettings,
    pub show_name: String,
    pub fonts: Vec<Font>,
    pub templates: Vec<Template>,
    pub images: Vec<ShowImage>,
    pub layers: Layers,
    assets_root: PathBuf,
    font_backend: Box<dyn FontBackend>,
    phase: Phase,
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("show_name", &self.show_name)
            .field("settings", &self.settings)
            .field("fonts", &self.fonts)
            .field("templates", &self.templates)
            .field("images", &self.images.len())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl RenderContext {
    pub fn new(options: RenderOptions) -> Self {
        let settings = RenderSettings {
            cursor_x: options.margin_x,
            cursor_y: options.margin_y,
            font: None,
            font_size: options.font_size,
            template: None,
            slide: 0,
            width: options.width,
            height: options.height,
            bg: parse_color_or_default(&options.background),
            fg: parse_color_or_default(&options.foreground),
            justify: Justify::None,
        };

        Self {
            show_name: options.show_name.clone(),
            layers: Layers::new(options.width, options.height),
            settings,
            options,
            fonts: Vec::new(),
            templates: Vec::new(),
            images: Vec::new(),
            assets_root: PathBuf::from("."),
            font_backend: Box::new(FontdueBackend),
            phase: Phase::RunOnce,
        }
    }

    /// Directory relative asset paths are resolved against.
    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = root.into();
        self
    }

    pub fn with_font_backend(mut self, backend: Box<dyn FontBackend>) -> Self {
        self.font_backend = backend;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn font_backend(&self) -> &dyn FontBackend {
        self.font_backend.as_ref()
    }

    pub fn resolve_path(&self, p: &str) -> PathBuf {
        let p = Path::new(p);
        if p.is_absolute() {
            p.to_owned()
        } else {
            self.assets_root.join(p)
        }
    }

    fn require_run_once(&self, what: &str) -> SlideResult<()> {
        if self.phase != Phase::RunOnce {
            return Err(SlideError::command(format!(
                "{what} can only be registered during the run-once pass"
            )));
        }
        Ok(())
    }

    pub fn add_font(&mut self, font: Font) -> SlideResult<()> {
        self.require_run_once("fonts")?;
        if self.find_font(font.name()).is_some() {
            return Err(SlideError::command(format!(
                "font '{}' is already loaded",
                font.name()
            )));
        }
        self.fonts.push(font);
        Ok(())
    }

    pub fn add_template(&mut self, template: Template) -> SlideResult<()> {
        self.require_run_once("templates")?;
        if self.find_template(&template.name).is_some() {
            return Err(SlideError::command(format!(
                "template '{}' is already defined",
                template.name
            )));
        }
        self.templates.push(template);
        Ok(())
    }

    pub fn add_image(&mut self, image: ShowImage) -> SlideResult<()> {
        self.require_run_once("images")?;
        if self.find_image(&image.name).is_some() {
            return Err(SlideError::command(format!(
                "image '{}' is already loaded",
                image.name
            )));
        }
        self.images.push(image);
        Ok(())
    }

    pub fn find_font(&self, name: &str) -> Option<usize> {
        self.fonts.iter().position(|f| f.name() == name)
    }

    pub fn find_template(&self, name: &str) -> Option<usize> {
        self.templates.iter().position(|t| t.name == name)
    }

    pub fn find_image(&self, name: &str) -> Option<usize> {
        self.images.iter().position(|i| i.name == name)
    }

    pub fn reset_cursor(&mut self) {
        self.settings.cursor_x = self.options.margin_x;
        self.settings.cursor_y = self.options.margin_y;
    }

    /// Reset per-slide drawing state for slide `index`.
    pub fn begin_slide(&mut self, index: usize) {
        self.settings.slide = index;
        self.reset_cursor();
        self.layers.clear(self.settings.bg);
    }

    /// Flatten the layers into the composite buffer.
    pub fn finish_slide(&mut self) -> &Framebuffer {
        self.layers.flatten(self.settings.fg)
    }

    /// Last flattened slide.
    pub fn composite(&self) -> &Framebuffer {
        &self.layers.composite
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
