use crate::{
    foundation::core::{Rect, Rgba8},
    render::blit::blit,
};

/// Fixed-size row-major RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, fill: Rgba8) -> Self {
        let len = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            pixels: vec![fill; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn extent(&self) -> Rect {
        Rect::extent(self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba8] {
        &mut self.pixels
    }

    pub fn fill(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Blit another buffer's full extent onto this one at `(x, y)`.
    pub fn draw(&mut self, src: &Framebuffer, x: i32, y: i32, blend: bool) {
        let src_extent = src.extent();
        let dst_extent = self.extent();
        blit(
            &mut self.pixels,
            &src.pixels,
            dst_extent,
            src_extent,
            Rect::new(x, y, src_extent.w, src_extent.h),
            src_extent,
            blend,
        );
    }

    /// Flat `[r, g, b, a, ...]` bytes for encoding.
    pub fn to_rgba8_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }
}

/// The four identically sized layers a slide is drawn into.
///
/// `text` is a coverage mask: white glyphs blended onto black, so the red channel
/// holds the accumulated coverage. It is tinted with the foreground color when the
/// layers are flattened.
#[derive(Clone, Debug)]
pub struct Layers {
    pub composite: Framebuffer,
    pub background: Framebuffer,
    pub images: Framebuffer,
    pub text: Framebuffer,
}

impl Layers {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            composite: Framebuffer::new(width, height, Rgba8::TRANSPARENT),
            background: Framebuffer::new(width, height, Rgba8::TRANSPARENT),
            images: Framebuffer::new(width, height, Rgba8::TRANSPARENT),
            text: Framebuffer::new(width, height, Rgba8::TRANSPARENT),
        }
    }

    pub fn width(&self) -> u32 {
        self.composite.width()
    }

    pub fn height(&self) -> u32 {
        self.composite.height()
    }

    /// Reallocate every layer when the size changes. Returns whether it did.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width() == width && self.height() == height {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    /// Reset for a fresh slide: background filled, image and text layers empty.
    pub fn clear(&mut self, bg: Rgba8) {
        self.background.fill(bg);
        self.images.fill(Rgba8::TRANSPARENT);
        self.text.fill(Rgba8::TRANSPARENT);
    }

    /// Merge background, images and tinted text into `composite`.
    pub fn flatten(&mut self, fg: Rgba8) -> &Framebuffer {
        self.composite.draw(&self.background, 0, 0, false);
        self.composite.draw(&self.images, 0, 0, true);

        let mut tinted = Framebuffer::new(self.width(), self.height(), Rgba8::TRANSPARENT);
        for (t, m) in tinted.pixels_mut().iter_mut().zip(self.text.pixels()) {
            let a = (u16::from(m.r) * u16::from(fg.a) + 127) / 255;
            *t = Rgba8::new(fg.r, fg.g, fg.b, a as u8);
        }
        self.composite.draw(&tinted, 0, 0, true);

        &self.composite
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/framebuffer.rs"]
mod tests;
