use crate::{
    assets::decode::{decode_image_file, resample},
    config::{MAX_DIMENSION, MAX_FONT_SIZE},
    foundation::{
        core::{Justify, Rect, parse_color_or_default},
        error::{SlideError, SlideResult},
    },
    render::{
        blit::{blit, fit_image},
        context::{RenderContext, ShowImage, Template},
    },
    show::{dispatch::FunctionTable, loader::Command},
    text::glyph_cache::Font,
};

/// Slide boundary. Recognized by the interpreter, never dispatched.
pub const NEWSLIDE: &str = "newslide";

/// Table with every built-in verb registered.
pub fn default_table() -> SlideResult<FunctionTable> {
    let mut t = FunctionTable::default();

    t.register("name", true, name)?;
    t.register("templateadd", true, template_add)?;
    t.register("fontadd", true, font_add)?;
    t.register("imageadd", true, image_add)?;

    t.register("clear", false, clear)?;
    t.register("dimensions", false, dimensions)?;
    t.register("templateset", false, template_set)?;
    t.register("color", false, color)?;
    t.register("justify", false, justify)?;
    t.register("fontset", false, font_set)?;
    t.register("fontsizeset", false, font_size_set)?;
    t.register("printline", false, print_line)?;
    t.register("blank", false, blank)?;
    t.register("image", false, image)?;

    Ok(t)
}

fn name(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [show] = cmd.expect_args::<1>()?;
    ctx.show_name = show.clone();
    Ok(())
}

fn template_add(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let args = cmd.args();
    let (name, bg, fg, justify) = match args {
        [name, bg, fg] => (name, bg, fg, Justify::None),
        [name, bg, fg, j] => (name, bg, fg, Justify::parse(j)?),
        _ => {
            return Err(SlideError::command(format!(
                "line {}: 'templateadd' takes <name> <bg> <fg> [justify], got {} argument(s)",
                cmd.line(),
                args.len()
            )));
        }
    };

    ctx.add_template(Template {
        name: name.clone(),
        bg: parse_color_or_default(bg),
        fg: parse_color_or_default(fg),
        justify,
    })
}

fn font_add(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [name, path] = cmd.expect_args::<2>()?;
    if ctx.find_font(name).is_some() {
        return Err(SlideError::command(format!("font '{name}' is already loaded")));
    }
    let path = ctx.resolve_path(path);
    let font = Font::load(name, &path, ctx.font_backend())?;
    tracing::debug!(font = %name, path = %path.display(), "loaded font");
    ctx.add_font(font)
}

fn image_add(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [name, path] = cmd.expect_args::<2>()?;
    if ctx.find_image(name).is_some() {
        return Err(SlideError::command(format!("image '{name}' is already loaded")));
    }
    let path = ctx.resolve_path(path);
    let image = decode_image_file(&path)?;
    tracing::debug!(image = %name, w = image.width, h = image.height, "loaded image");
    ctx.add_image(ShowImage {
        name: name.clone(),
        path,
        image,
    })
}

fn clear(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    cmd.expect_args::<0>()?;
    ctx.reset_cursor();
    ctx.layers.clear(ctx.settings.bg);
    Ok(())
}

fn dimensions(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [w, h] = cmd.expect_args::<2>()?;
    let w = parse_dimension(w)?;
    let h = parse_dimension(h)?;

    ctx.settings.width = w;
    ctx.settings.height = h;
    if ctx.layers.resize(w, h) {
        ctx.layers.clear(ctx.settings.bg);
    }
    Ok(())
}

fn parse_dimension(s: &str) -> SlideResult<u32> {
    match s.parse::<u32>() {
        Ok(v) if (1..=MAX_DIMENSION).contains(&v) => Ok(v),
        _ => Err(SlideError::command(format!(
            "dimension '{s}' must be an integer in 1..={MAX_DIMENSION}"
        ))),
    }
}

fn template_set(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [name] = cmd.expect_args::<1>()?;
    let idx = ctx
        .find_template(name)
        .ok_or_else(|| SlideError::command(format!("unknown template '{name}'")))?;

    let t = &ctx.templates[idx];
    ctx.settings.template = Some(idx);
    ctx.settings.bg = t.bg;
    ctx.settings.fg = t.fg;
    ctx.settings.justify = t.justify;
    ctx.layers.background.fill(t.bg);
    Ok(())
}

fn color(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [which, value] = cmd.expect_args::<2>()?;
    let c = parse_color_or_default(value);
    match which.as_str() {
        "bg" => {
            ctx.settings.bg = c;
            ctx.layers.background.fill(c);
        }
        "fg" => ctx.settings.fg = c,
        other => {
            return Err(SlideError::command(format!(
                "unknown color target '{other}' (expected bg|fg)"
            )));
        }
    }
    Ok(())
}

fn justify(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [j] = cmd.expect_args::<1>()?;
    ctx.settings.justify = Justify::parse(j)?;
    Ok(())
}

fn font_set(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [name] = cmd.expect_args::<1>()?;
    let idx = ctx
        .find_font(name)
        .ok_or_else(|| SlideError::command(format!("unknown font '{name}'")))?;
    ctx.settings.font = Some(idx);
    Ok(())
}

fn font_size_set(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [px] = cmd.expect_args::<1>()?;
    match px.parse::<u32>() {
        Ok(v) if (1..=MAX_FONT_SIZE).contains(&v) => {
            ctx.settings.font_size = v;
            Ok(())
        }
        _ => Err(SlideError::command(format!(
            "font size '{px}' must be an integer in 1..={MAX_FONT_SIZE}"
        ))),
    }
}

fn print_line(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let text = cmd.args().join(" ");
    draw_text(ctx, &text)
}

fn blank(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    cmd.expect_args::<0>()?;
    let size = ctx.settings.font_size;
    let advance = match ctx.settings.font {
        Some(idx) => ctx.fonts[idx].vertical_advance(size)?,
        None => i32::try_from(size).unwrap_or(i32::MAX),
    };
    ctx.settings.cursor_x = ctx.options.margin_x;
    ctx.settings.cursor_y = ctx.settings.cursor_y.saturating_add(advance);
    Ok(())
}

fn image(ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
    let [name] = cmd.expect_args::<1>()?;
    let idx = ctx
        .find_image(name)
        .ok_or_else(|| SlideError::command(format!("unknown image '{name}'")))?;

    let src = &ctx.images[idx].image;
    let dst = &mut ctx.layers.images;
    let bound = fit_image(src.width, src.height, dst.width(), dst.height());
    if bound.is_empty() {
        return Err(SlideError::asset(format!("image '{name}' has no drawable area")));
    }

    let scaled = resample(src, bound.w as u32, bound.h as u32)
        .map_err(|e| SlideError::asset(format!("scale image '{name}': {e}")))?;
    let extent = dst.extent();
    blit(
        dst.pixels_mut(),
        &scaled.pixels,
        extent,
        scaled.extent(),
        bound,
        scaled.extent(),
        false,
    );
    Ok(())
}

/// Lay out one line of text at the cursor and blend its glyphs into the text layer.
///
/// The cursor ends at the left margin of the next line.
pub fn draw_text(ctx: &mut RenderContext, text: &str) -> SlideResult<()> {
    let idx = ctx
        .settings
        .font
        .ok_or_else(|| SlideError::command("no active font; use 'fontset' first"))?;

    let RenderContext {
        fonts,
        layers,
        settings,
        options,
        ..
    } = ctx;
    let font = &mut fonts[idx];
    let size = settings.font_size;
    let space = options.space_advance;

    let mut line_w = 0i32;
    for ch in text.chars() {
        line_w = line_w.saturating_add(if ch == ' ' {
            space
        } else {
            glyph_advance(font, ch, size)
        });
    }

    let width = layers.text.width() as i32;
    let mut pen = match settings.justify {
        Justify::None | Justify::Left => settings.cursor_x,
        Justify::Center => (width - line_w) / 2,
        Justify::Right => width - options.margin_x - line_w,
    };
    let baseline = settings.cursor_y + font.line_metrics(size)?.ascent.round() as i32;

    let extent = layers.text.extent();
    for ch in text.chars() {
        if ch == ' ' {
            pen += space;
            continue;
        }
        // failures were already reported while measuring
        let Ok(g) = font.get_glyph(ch, size) else {
            continue;
        };
        let dst = Rect::new(pen + g.bearing_x, baseline + g.bearing_y, g.extent().w, g.extent().h);
        blit(
            layers.text.pixels_mut(),
            &g.bitmap,
            extent,
            g.extent(),
            dst,
            g.extent(),
            true,
        );
        pen += g.advance;
        settings.cursor_x = pen;
    }

    settings.cursor_x = options.margin_x;
    settings.cursor_y = settings.cursor_y.saturating_add(font.vertical_advance(size)?);
    Ok(())
}

fn glyph_advance(font: &mut Font, ch: char, size: u32) -> i32 {
    match font.get_glyph(ch, size) {
        Ok(g) => g.advance,
        Err(err) => {
            tracing::warn!(
                font = %font.name(),
                path = %font.path().display(),
                ?ch,
                size,
                "{err}; glyph skipped"
            );
            0
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/handlers.rs"]
mod tests;
