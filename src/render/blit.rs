use crate::foundation::core::{Rect, Rgba8};

/// Copy or blend `src_rect` of `src` onto `dst`, offset to `dst_rect`.
///
/// Both buffers are row-major with the stride given by their extent width. Any
/// source or destination coordinate outside its extent is skipped; the check is
/// half-open, so a coordinate equal to the extent width/height is never written.
///
/// With `blend == false` the destination pixel is replaced, alpha included. With
/// `blend == true` the destination RGB moves toward the source RGB by the source
/// alpha and the destination alpha becomes opaque.
pub fn blit(
    dst: &mut [Rgba8],
    src: &[Rgba8],
    dst_extent: Rect,
    src_extent: Rect,
    dst_rect: Rect,
    src_rect: Rect,
    blend: bool,
) {
    let w = src_rect.w.min(dst_rect.w);
    let h = src_rect.h.min(dst_rect.h);
    if w <= 0 || h <= 0 {
        return;
    }

    for oy in 0..h {
        let sy = src_rect.y + oy;
        let dy = dst_rect.y + oy;
        for ox in 0..w {
            let sx = src_rect.x + ox;
            let dx = dst_rect.x + ox;
            if !src_extent.contains(sx, sy) || !dst_extent.contains(dx, dy) {
                continue;
            }

            let si = index(src_extent, sx, sy);
            let di = index(dst_extent, dx, dy);
            let (Some(&s), Some(d)) = (src.get(si), dst.get_mut(di)) else {
                continue;
            };

            *d = if blend { blend_px(*d, s) } else { s };
        }
    }
}

/// Linear blend of `dst` toward `src` by `src.a`; the result is opaque.
pub fn blend_px(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let t = f32::from(src.a) / 255.0;
    Rgba8::new(
        lerp_u8(dst.r, src.r, t),
        lerp_u8(dst.g, src.g, t),
        lerp_u8(dst.b, src.b, t),
        255,
    )
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = f32::from(a);
    let b = f32::from(b);
    (a + t * (b - a)).round().clamp(0.0, 255.0) as u8
}

fn index(extent: Rect, x: i32, y: i32) -> usize {
    (y - extent.y) as usize * extent.w as usize + (x - extent.x) as usize
}

/// Placement of a `img_w` x `img_h` image inside a `out_w` x `out_h` output.
///
/// Uses one uniform scale factor no greater than 1: width is checked first, then
/// height against the already-scaled image. The result is centered on the axis
/// that did not bind.
pub fn fit_image(img_w: u32, img_h: u32, out_w: u32, out_h: u32) -> Rect {
    if img_w == 0 || img_h == 0 || out_w == 0 || out_h == 0 {
        return Rect::default();
    }

    let (iw, ih) = (f64::from(img_w), f64::from(img_h));
    let (ow, oh) = (f64::from(out_w), f64::from(out_h));

    let mut scale = 1.0f64;
    if iw > ow {
        scale = ow / iw;
    }
    if ih * scale > oh {
        scale = oh / ih;
    }

    let w = ((iw * scale).round() as u32).clamp(1, out_w);
    let h = ((ih * scale).round() as u32).clamp(1, out_h);
    let x = (out_w - w) / 2;
    let y = (out_h - h) / 2;

    Rect::new(x as i32, y as i32, w as i32, h as i32)
}

#[cfg(test)]
#[path = "../../tests/unit/render/blit.rs"]
mod tests;
