use super::*;

fn template(name: &str) -> Template {
    Template {
        name: name.to_owned(),
        bg: Rgba8::BLACK,
        fg: Rgba8::WHITE,
        justify: Justify::Center,
    }
}

#[test]
fn defaults_come_from_options() {
    let ctx = RenderContext::new(RenderOptions::default());
    assert_eq!(ctx.show_name, "slides");
    assert_eq!((ctx.settings.width, ctx.settings.height), (1024, 768));
    assert_eq!((ctx.layers.width(), ctx.layers.height()), (1024, 768));
    assert_eq!(ctx.settings.bg, Rgba8::opaque(0x33, 0x66, 0xcc));
    assert_eq!(ctx.settings.fg, Rgba8::opaque(0xff, 0xcc, 0xcc));
    assert_eq!(ctx.phase(), Phase::RunOnce);
}

#[test]
fn tables_only_grow_during_run_once() {
    let mut ctx = RenderContext::new(RenderOptions::default());
    ctx.add_template(template("a")).unwrap();

    ctx.set_phase(Phase::Slide);
    assert!(ctx.add_template(template("b")).is_err());
    assert_eq!(ctx.templates.len(), 1);
    assert_eq!(ctx.find_template("a"), Some(0));
    assert_eq!(ctx.find_template("b"), None);
}

#[test]
fn duplicate_template_is_rejected() {
    let mut ctx = RenderContext::new(RenderOptions::default());
    ctx.add_template(template("a")).unwrap();
    assert!(ctx.add_template(template("a")).is_err());
    assert_eq!(ctx.templates.len(), 1);
}

#[test]
fn relative_paths_resolve_against_assets_root() {
    let ctx = RenderContext::new(RenderOptions::default()).with_assets_root("decks/one");
    assert_eq!(
        ctx.resolve_path("fonts/a.ttf"),
        PathBuf::from("decks/one").join("fonts/a.ttf")
    );
}

#[test]
fn begin_slide_resets_cursor_and_layers() {
    let mut ctx = RenderContext::new(RenderOptions {
        width: 2,
        height: 2,
        ..RenderOptions::default()
    });
    ctx.settings.cursor_x = 500;
    ctx.settings.cursor_y = 500;
    ctx.layers.text.fill(Rgba8::WHITE);

    ctx.begin_slide(3);
    assert_eq!(ctx.settings.slide, 3);
    assert_eq!((ctx.settings.cursor_x, ctx.settings.cursor_y), (32, 32));
    assert!(ctx.layers.text.pixels().iter().all(|&p| p == Rgba8::TRANSPARENT));
    assert!(
        ctx.layers
            .background
            .pixels()
            .iter()
            .all(|&p| p == ctx.settings.bg)
    );
}
