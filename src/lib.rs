//! slidepress renders a line-oriented show description into one PNG per slide.
//!
//! # Pipeline overview
//!
//! 1. **Load**: show text -> flat [`Command`] list (`: verb args` directives, bare
//!    lines become `printline`)
//! 2. **Run-once pass**: fonts, images and templates are registered exactly once
//! 3. **Per-slide pass**: each `newslide` segment mutates the shared
//!    [`RenderContext`] and draws into background, image and text layers
//! 4. **Encode**: the flattened composite is written as `<name>_<NNNN>.png`
//!
//! Everything runs on one thread in document order. Command errors are collected as
//! [`Diagnostic`]s and never abort a slide; only load and encode failures are fatal.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod foundation;
mod render;
mod show;
mod text;

pub use assets::decode::{DecodedImage, decode_image, decode_image_file, encode_png, resample};
pub use config::{MAX_DIMENSION, MAX_FONT_SIZE, RenderOptions, slide_file_name};
pub use foundation::core::{Justify, Rect, Rgba8, parse_color, parse_color_or_default};
pub use foundation::error::{SlideError, SlideResult};
pub use render::blit::{blend_px, blit, fit_image};
pub use render::context::{Phase, RenderContext, RenderSettings, ShowImage, Template};
pub use render::framebuffer::{Framebuffer, Layers};
pub use render::interp::{Diagnostic, InterpState, Interpreter};
pub use render::pipeline::{ShowReport, assets_root_for, render_commands, render_show_file};
pub use show::dispatch::{DEFAULT_TABLE_CAPACITY, FunctionTable, HandlerFn, Registration};
pub use show::handlers::{NEWSLIDE, default_table, draw_text};
pub use show::loader::{
    COMMENT_MARKERS, Command, DIRECTIVE_MARKER, PRINTLINE_VERB, load_show, parse_show,
};
pub use text::glyph_cache::{
    Font, FontBackend, FontFace, FontdueBackend, Glyph, LineMetrics, RasterGlyph,
};
