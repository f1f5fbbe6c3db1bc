pub mod glyph_cache;
