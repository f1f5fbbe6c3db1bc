use crate::foundation::error::{SlideError, SlideResult};

/// Straight (non-premultiplied) RGBA8 pixel. Also used for color literals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Integer rectangle. Buffer extents use an origin of (0, 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Extent of a `w` x `h` buffer.
    pub fn extent(w: u32, h: u32) -> Self {
        Self::new(0, 0, clamp_i32(w), clamp_i32(h))
    }

    /// Half-open containment: `x == w` or `y == h` is outside.
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }

    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Horizontal text placement within a slide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Justify {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Justify {
    pub fn parse(s: &str) -> SlideResult<Self> {
        match s {
            "none" => Ok(Self::None),
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(SlideError::command(format!(
                "unknown justification '{other}' (expected none|left|center|right)"
            ))),
        }
    }
}

/// Parse `0xRRGGBB` or `0xRRGGBBAA`. The six-digit form is fully opaque.
pub fn parse_color(s: &str) -> SlideResult<Rgba8> {
    let hex = s
        .strip_prefix("0x")
        .ok_or_else(|| SlideError::command(format!("color '{s}' must start with 0x")))?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SlideError::command(format!(
            "color '{s}' must have 6 or 8 hex digits"
        )));
    }

    let channel = |i: usize| -> SlideResult<u8> {
        u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|e| SlideError::command(format!("color '{s}': {e}")))
    };

    let a = if hex.len() == 8 { channel(3)? } else { 255 };
    Ok(Rgba8::new(channel(0)?, channel(1)?, channel(2)?, a))
}

/// Like [`parse_color`], but a malformed literal is logged and yields the zero color.
pub fn parse_color_or_default(s: &str) -> Rgba8 {
    match parse_color(s) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!("{err}; using 0x00000000");
            Rgba8::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
