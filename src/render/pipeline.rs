use std::path::{Path, PathBuf};

use crate::{
    assets::decode::encode_png,
    config::RenderOptions,
    foundation::error::{SlideError, SlideResult},
    render::{
        context::RenderContext,
        interp::{Diagnostic, Interpreter},
    },
    show::{
        handlers::default_table,
        loader::{Command, load_show},
    },
    text::glyph_cache::{FontBackend, FontdueBackend},
};

/// Outcome of a full show render.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ShowReport {
    pub show_name: String,
    pub slides: usize,
    /// Written PNG paths, in slide order.
    pub written: Vec<PathBuf>,
    /// Recoverable errors; the affected commands were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

/// Load a show description and render every slide to PNG.
///
/// Pipeline:
/// 1. [`load_show`]: file -> commands (fatal on I/O error)
/// 2. run-once pass: fonts, images, templates, show name
/// 3. per-slide pass + flatten + [`encode_png`] (fatal on write error)
///
/// Relative asset paths are resolved against the show file's directory.
pub fn render_show_file(path: &Path, options: &RenderOptions) -> SlideResult<ShowReport> {
    let commands = load_show(path)?;
    render_commands(
        &commands,
        options,
        assets_root_for(path),
        Box::new(FontdueBackend),
    )
}

/// Render an already parsed command list.
pub fn render_commands(
    commands: &[Command],
    options: &RenderOptions,
    assets_root: &Path,
    font_backend: Box<dyn FontBackend>,
) -> SlideResult<ShowReport> {
    options.validate()?;
    let mut ctx = RenderContext::new(options.clone())
        .with_assets_root(assets_root)
        .with_font_backend(font_backend);
    let mut interp = Interpreter::new(default_table()?);

    std::fs::create_dir_all(&options.output_dir).map_err(|e| {
        SlideError::encode(format!(
            "create output dir '{}': {e}",
            options.output_dir.display()
        ))
    })?;

    let mut written = Vec::new();
    let slides = interp.render_show(commands, &mut ctx, |ctx, index| {
        let out = options.slide_path(&ctx.show_name, index);
        encode_png(&out, ctx.composite())?;
        tracing::info!("wrote {}", out.display());
        written.push(out);
        Ok(())
    })?;

    Ok(ShowReport {
        show_name: ctx.show_name.clone(),
        slides,
        written,
        diagnostics: interp.take_diagnostics(),
    })
}

/// Directory that relative asset paths in `show_path` refer to.
pub fn assets_root_for(show_path: &Path) -> &Path {
    show_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
