use std::{cell::Cell, rc::Rc};

use super::*;

#[derive(Clone, Default)]
struct Calls {
    raster: Rc<Cell<usize>>,
    metrics: Rc<Cell<usize>>,
}

struct BoxFace(Calls);

impl FontFace for BoxFace {
    fn rasterize(&self, _codepoint: char, px: f32) -> SlideResult<RasterGlyph> {
        self.0.raster.set(self.0.raster.get() + 1);
        let side = (px / 4.0) as u32;
        Ok(RasterGlyph {
            width: side,
            height: side,
            coverage: vec![200; (side * side) as usize],
            bearing_x: 1,
            bearing_y: -(side as i32),
            advance: side as i32 + 2,
        })
    }

    fn line_metrics(&self, px: f32) -> SlideResult<LineMetrics> {
        self.0.metrics.set(self.0.metrics.get() + 1);
        Ok(LineMetrics {
            ascent: px * 0.75,
            descent: -px * 0.25,
            line_gap: 2.0,
        })
    }
}

struct BoxBackend(Calls);

impl FontBackend for BoxBackend {
    fn parse(&self, _bytes: &[u8]) -> SlideResult<Box<dyn FontFace>> {
        Ok(Box::new(BoxFace(self.0.clone())))
    }
}

fn font(calls: &Calls) -> Font {
    Font::from_bytes(
        "sans",
        Path::new("sans.ttf"),
        vec![0; 4],
        &BoxBackend(calls.clone()),
    )
    .unwrap()
}

#[test]
fn second_request_hits_cache() {
    let calls = Calls::default();
    let mut f = font(&calls);

    let first = f.get_glyph('A', 16).unwrap().clone();
    let second = f.get_glyph('A', 16).unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(calls.raster.get(), 1);
    assert_eq!(f.glyph_count(), 1);
}

#[test]
fn size_is_part_of_the_key() {
    let calls = Calls::default();
    let mut f = font(&calls);

    assert_eq!(f.get_glyph('A', 16).unwrap().width, 4);
    assert_eq!(f.get_glyph('A', 32).unwrap().width, 8);
    f.get_glyph('B', 16).unwrap();
    f.get_glyph('A', 32).unwrap();

    assert_eq!(calls.raster.get(), 3);
    assert_eq!(f.glyph_count(), 3);
}

#[test]
fn coverage_becomes_white_rgba() {
    let calls = Calls::default();
    let mut f = font(&calls);
    let g = f.get_glyph('x', 8).unwrap();

    assert_eq!(g.bitmap.len(), 4);
    assert!(g.bitmap.iter().all(|&p| p == Rgba8::new(255, 255, 255, 200)));
    assert_eq!(g.extent(), Rect::new(0, 0, 2, 2));
}

#[test]
fn metrics_are_captured_once_per_size() {
    let calls = Calls::default();
    let mut f = font(&calls);

    f.get_glyph('a', 20).unwrap();
    f.get_glyph('b', 20).unwrap();
    assert_eq!(calls.metrics.get(), 1);
    // 15 + 5 + 2
    assert_eq!(f.vertical_advance(20).unwrap(), 22);
    assert_eq!(calls.metrics.get(), 1);

    // 30 + 10 + 2
    assert_eq!(f.vertical_advance(40).unwrap(), 42);
    assert_eq!(calls.metrics.get(), 2);
}

#[test]
fn mismatched_bitmap_is_an_asset_error() {
    struct Broken;
    impl FontFace for Broken {
        fn rasterize(&self, _: char, _: f32) -> SlideResult<RasterGlyph> {
            Ok(RasterGlyph {
                width: 3,
                height: 3,
                coverage: vec![0; 2],
                ..RasterGlyph::default()
            })
        }
        fn line_metrics(&self, _: f32) -> SlideResult<LineMetrics> {
            Ok(LineMetrics::default())
        }
    }
    struct BrokenBackend;
    impl FontBackend for BrokenBackend {
        fn parse(&self, _: &[u8]) -> SlideResult<Box<dyn FontFace>> {
            Ok(Box::new(Broken))
        }
    }

    let mut f = Font::from_bytes("b", Path::new("b.ttf"), vec![], &BrokenBackend).unwrap();
    assert!(matches!(f.get_glyph('a', 10), Err(SlideError::Asset(_))));
    assert_eq!(f.glyph_count(), 0);
}

#[test]
fn fontdue_rejects_garbage_bytes() {
    let err = Font::from_bytes(
        "junk",
        Path::new("junk.ttf"),
        b"not a font".to_vec(),
        &FontdueBackend,
    )
    .unwrap_err();
    assert!(matches!(err, SlideError::Asset(_)));
}

fn dejavu_mono() -> Font {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf");
    Font::load("mono", &path, &FontdueBackend).unwrap()
}

#[test]
fn loaded_font_keeps_source_and_bytes() {
    let f = dejavu_mono();
    assert_eq!(f.name(), "mono");
    assert!(f.path().ends_with("tests/fixtures/DejaVuSansMono.ttf"));
    // TrueType sfnt version
    assert_eq!(&f.bytes()[..4], &[0, 1, 0, 0]);
    assert_eq!(f.bytes().len() as u64, std::fs::metadata(f.path()).unwrap().len());
}

#[test]
fn fontdue_line_metrics_follow_hhea() {
    let mut f = dejavu_mono();
    let lm = f.line_metrics(32).unwrap();

    // hhea: ascender 1901, descender -483, line gap 0 at 2048 units/em
    assert!((lm.ascent - 29.70).abs() < 0.05, "{lm:?}");
    assert!((lm.descent + 7.55).abs() < 0.05, "{lm:?}");
    assert_eq!(lm.line_gap, 0.0);
    assert_eq!(f.vertical_advance(32).unwrap(), 37);
}

#[test]
fn fontdue_glyphs_sit_on_the_baseline() {
    let mut f = dejavu_mono();
    let ascent = f.line_metrics(32).unwrap().ascent.round() as i32;

    let h = f.get_glyph('H', 32).unwrap().clone();
    assert!(h.width > 0 && h.height > 0);
    // top above the baseline, bottom on it
    assert!(h.bearing_y < 0, "{h:?}");
    assert!((h.bearing_y + h.height as i32).abs() <= 1, "{h:?}");
    // cap height is about 23px, so the top lands about ascent - 23 below the line top
    let top = ascent + h.bearing_y;
    assert!((5..=9).contains(&top), "top {top}");
    assert_eq!(h.advance, 19);

    let g = f.get_glyph('g', 32).unwrap().clone();
    let below = g.bearing_y + g.height as i32;
    assert!(below > 3, "descender only {below}px below baseline");
    assert!(below <= 8, "descender {below}px past the font's descent");
    assert_eq!(g.advance, h.advance);

    assert!(h.bitmap.iter().any(|p| p.a > 200));
    assert!(h.bitmap.iter().all(|p| (p.r, p.g, p.b) == (255, 255, 255)));
}

#[test]
fn load_missing_font_file_is_asset_error() {
    let err = Font::load("x", Path::new("no/such/font.ttf"), &FontdueBackend).unwrap_err();
    assert!(matches!(err, SlideError::Asset(_)));
}
